//! PE images via goblin.

use goblin::pe::PE;
use std::fs;
use std::path::Path;

use super::dbg::parse_dbg_codeview;
use super::directory::{entry_data, parse_entries, RawDebugEntry};
use super::{ImageReader, ReadError};
use crate::identity::{DebugDirectoryEntry, DebugKind, IMAGE_DEBUG_TYPE_CODEVIEW, IMAGE_DEBUG_TYPE_MISC};

/// Production [`ImageReader`] for PE32/PE32+ images and `.dbg` companions.
#[derive(Debug, Clone, Copy, Default)]
pub struct PeReader;

fn rva_to_offset(pe: &PE<'_>, rva: u32) -> Option<usize> {
    pe.sections.iter().find_map(|s| {
        let span = s.virtual_size.max(s.size_of_raw_data);
        let end = s.virtual_address.saturating_add(span);
        (rva >= s.virtual_address && rva < end)
            .then(|| (rva - s.virtual_address) as usize + s.pointer_to_raw_data as usize)
    })
}

fn debug_entries(pe: &PE<'_>, bytes: &[u8]) -> Result<Vec<RawDebugEntry>, ReadError> {
    let opt = pe
        .header
        .optional_header
        .as_ref()
        .ok_or(ReadError::NoOptionalHeader)?;
    let table = opt.data_directories.get_debug_table();
    let dir = table
        .as_ref()
        .filter(|d| d.virtual_address != 0 && d.size != 0)
        .ok_or(ReadError::NoDebugDirectory)?;
    let offset =
        rva_to_offset(pe, dir.virtual_address).ok_or(ReadError::Truncated("debug directory RVA"))?;
    parse_entries(bytes, offset, dir.size as usize)
}

fn entry_payload(pe: &PE<'_>, bytes: &[u8], entry: &RawDebugEntry) -> Result<Vec<u8>, ReadError> {
    let offset = if entry.pointer_to_raw_data != 0 {
        entry.pointer_to_raw_data as usize
    } else {
        rva_to_offset(pe, entry.address_of_raw_data).ok_or(ReadError::Truncated("debug data RVA"))?
    };
    entry_data(bytes, offset, entry.size_of_data)
}

/// First CodeView entry, else first Misc entry, else whatever comes first.
pub fn select_entry(entries: &[RawDebugEntry]) -> Option<&RawDebugEntry> {
    entries
        .iter()
        .find(|e| e.debug_type == IMAGE_DEBUG_TYPE_CODEVIEW)
        .or_else(|| entries.iter().find(|e| e.debug_type == IMAGE_DEBUG_TYPE_MISC))
        .or_else(|| entries.first())
}

/// `%08X` COFF timestamp followed by `%X` SizeOfImage.
pub fn image_identity_from_bytes(bytes: &[u8]) -> Result<String, ReadError> {
    let pe = PE::parse(bytes)?;
    let opt = pe
        .header
        .optional_header
        .as_ref()
        .ok_or(ReadError::NoOptionalHeader)?;
    Ok(format!(
        "{:08X}{:X}",
        pe.header.coff_header.time_date_stamp, opt.windows_fields.size_of_image
    ))
}

impl ImageReader for PeReader {
    fn debug_entry(&self, path: &Path) -> Result<DebugDirectoryEntry, ReadError> {
        let bytes = fs::read(path)?;
        let pe = PE::parse(&bytes)?;
        let entries = debug_entries(&pe, &bytes)?;
        let chosen = select_entry(&entries).ok_or(ReadError::NoDebugDirectory)?;
        let payload = entry_payload(&pe, &bytes, chosen)?;
        Ok(DebugDirectoryEntry::new(
            DebugKind::from_raw(chosen.debug_type),
            payload,
        ))
    }

    fn image_identity(&self, path: &Path) -> Result<String, ReadError> {
        let bytes = fs::read(path)?;
        image_identity_from_bytes(&bytes)
    }

    fn dbg_codeview(&self, path: &Path) -> Result<Vec<u8>, ReadError> {
        let bytes = fs::read(path)?;
        parse_dbg_codeview(&bytes)
    }
}
