//! `IMAGE_DEBUG_DIRECTORY` entries, shared by PE images and `.dbg` files.

use super::ReadError;

pub const DEBUG_DIRECTORY_ENTRY_SIZE: usize = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawDebugEntry {
    pub debug_type: u32,
    pub size_of_data: u32,
    pub address_of_raw_data: u32,
    pub pointer_to_raw_data: u32,
}

pub(super) fn read_u16(bytes: &[u8], offset: usize, what: &'static str) -> Result<u16, ReadError> {
    offset
        .checked_add(2)
        .and_then(|end| bytes.get(offset..end))
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .ok_or(ReadError::Truncated(what))
}

pub(super) fn read_u32(bytes: &[u8], offset: usize, what: &'static str) -> Result<u32, ReadError> {
    offset
        .checked_add(4)
        .and_then(|end| bytes.get(offset..end))
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or(ReadError::Truncated(what))
}

/// Reads `size / 28` consecutive entries starting at file offset `offset`.
///
/// `size` comes straight from the file, so the allocation is bounded by
/// what the file could actually hold.
pub(super) fn parse_entries(
    bytes: &[u8],
    offset: usize,
    size: usize,
) -> Result<Vec<RawDebugEntry>, ReadError> {
    let count = size / DEBUG_DIRECTORY_ENTRY_SIZE;
    let mut entries = Vec::with_capacity(count.min(bytes.len() / DEBUG_DIRECTORY_ENTRY_SIZE));
    for i in 0..count {
        let base = i
            .checked_mul(DEBUG_DIRECTORY_ENTRY_SIZE)
            .and_then(|n| n.checked_add(offset))
            .ok_or(ReadError::Truncated("debug directory"))?;
        entries.push(RawDebugEntry {
            debug_type: read_u32(bytes, base + 12, "debug directory")?,
            size_of_data: read_u32(bytes, base + 16, "debug directory")?,
            address_of_raw_data: read_u32(bytes, base + 20, "debug directory")?,
            pointer_to_raw_data: read_u32(bytes, base + 24, "debug directory")?,
        });
    }
    Ok(entries)
}

/// Raw bytes an entry points at, by file offset.
pub(super) fn entry_data(bytes: &[u8], file_offset: usize, size: u32) -> Result<Vec<u8>, ReadError> {
    bytes
        .get(file_offset..file_offset.saturating_add(size as usize))
        .map(<[u8]>::to_vec)
        .ok_or(ReadError::Truncated("debug data"))
}
