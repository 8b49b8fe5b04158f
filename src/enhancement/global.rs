use super::remap::RemapTable;
use crate::buffer::PixelBuffer;
use crate::error::EnhanceError;
use crate::histogram::analyze;

/// Equalization table for the whole buffer.
///
/// A buffer holding a single intensity has nothing to spread and gets the
/// identity table.
pub fn equalization_table(buffer: &PixelBuffer) -> Result<RemapTable, EnhanceError> {
    let (_, cdf) = analyze(buffer)?;
    match RemapTable::equalizing(&cdf) {
        Some(table) => Ok(table),
        None => {
            tracing::debug!("Single-valued buffer, equalization leaves it unchanged");
            Ok(RemapTable::identity())
        }
    }
}

/// Classic global histogram equalization
pub fn equalize(buffer: &PixelBuffer) -> Result<PixelBuffer, EnhanceError> {
    let table = equalization_table(buffer)?;
    Ok(table.apply(buffer))
}
