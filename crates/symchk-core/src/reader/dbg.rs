//! Separate debug (`.dbg`) files: `IMAGE_SEPARATE_DEBUG_HEADER`, section
//! table, exported names, then the debug directory.

use super::directory::{entry_data, parse_entries, read_u16, read_u32};
use super::ReadError;
use crate::identity::IMAGE_DEBUG_TYPE_CODEVIEW;

/// "DI" little-endian.
const IMAGE_SEPARATE_DEBUG_SIGNATURE: u16 = 0x4944;
const SEPARATE_DEBUG_HEADER_LEN: usize = 48;
const SECTION_HEADER_LEN: usize = 40;

/// Raw data of the CodeView entry in a `.dbg` file's debug directory.
pub fn parse_dbg_codeview(bytes: &[u8]) -> Result<Vec<u8>, ReadError> {
    let signature = read_u16(bytes, 0, "dbg header")?;
    if signature != IMAGE_SEPARATE_DEBUG_SIGNATURE {
        return Err(ReadError::BadDbgSignature(signature));
    }
    let sections = read_u32(bytes, 24, "dbg header")? as usize;
    let exported_names = read_u32(bytes, 28, "dbg header")? as usize;
    let directory_size = read_u32(bytes, 32, "dbg header")? as usize;

    let directory = sections
        .checked_mul(SECTION_HEADER_LEN)
        .and_then(|n| n.checked_add(SEPARATE_DEBUG_HEADER_LEN))
        .and_then(|n| n.checked_add(exported_names))
        .ok_or(ReadError::Truncated("dbg section table"))?;

    let entries = parse_entries(bytes, directory, directory_size)?;
    let cv = entries
        .iter()
        .find(|e| e.debug_type == IMAGE_DEBUG_TYPE_CODEVIEW)
        .ok_or(ReadError::NoCodeView)?;
    entry_data(bytes, cv.pointer_to_raw_data as usize, cv.size_of_data)
}
