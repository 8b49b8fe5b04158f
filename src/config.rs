use crate::Args;
use contrast_enhance::preprocessing::Mode;
use contrast_enhance::{ClaheConfig, ClipLimit, EnhanceError};
use std::path::PathBuf;

/// Run configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub mode: Mode,
    pub clahe: ClaheConfig,
    pub write_report: bool,
}

impl TryFrom<Args> for Config {
    type Error = EnhanceError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let clip_limit = match args.clip_count {
            Some(count) => ClipLimit::Absolute(count),
            None => ClipLimit::Relative(args.clip_limit),
        };
        let clahe = ClaheConfig::new(args.tile_rows, args.tile_cols, clip_limit);
        clahe.validate()?;

        Ok(Self {
            input: args.input,
            output_dir: args.output_dir,
            mode: args.mode.parse()?,
            clahe,
            write_report: !args.no_report,
        })
    }
}
