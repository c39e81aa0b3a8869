//! `IMAGE_DEBUG_MISC` decoding: the `.dbg` companion name of pre-XP images.
//!
//! Linkers of that era wrote the string table with whatever code page the
//! build machine used, so a strict decode is tried first and a tolerant
//! byte-level decode backs it up. The tolerant path cannot fail.

use super::base_name;

const MISC_HEADER_LEN: usize = 12;
const IMAGE_DEBUG_MISC_EXENAME: u32 = 1;

/// Name extracted from a MISC record, tagged with the decoding that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MiscName {
    Exact(String),
    /// Strict decoding failed; this is a lossy read of the first string-table entry.
    Degraded(String),
}

impl MiscName {
    pub fn as_str(&self) -> &str {
        match self {
            MiscName::Exact(s) | MiscName::Degraded(s) => s,
        }
    }

    pub fn into_inner(self) -> String {
        match self {
            MiscName::Exact(s) | MiscName::Degraded(s) => s,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, MiscName::Degraded(_))
    }
}

/// Extracts the `.dbg` base name from a MISC debug payload.
pub fn misc_filename(payload: &[u8]) -> MiscName {
    match strict(payload) {
        Some(name) => MiscName::Exact(name),
        None => MiscName::Degraded(tolerant(payload)),
    }
}

fn header(payload: &[u8]) -> Option<(u32, usize, bool)> {
    if payload.len() < MISC_HEADER_LEN {
        return None;
    }
    let data_type = u32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]);
    let length = u32::from_le_bytes([payload[4], payload[5], payload[6], payload[7]]) as usize;
    Some((data_type, length, payload[8] != 0))
}

fn strict(payload: &[u8]) -> Option<String> {
    let (data_type, length, unicode) = header(payload)?;
    if data_type != IMAGE_DEBUG_MISC_EXENAME || length < MISC_HEADER_LEN || length > payload.len() {
        return None;
    }
    let data = &payload[MISC_HEADER_LEN..length];
    let raw = if unicode {
        let units: Vec<u16> = data
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .take_while(|&u| u != 0)
            .collect();
        String::from_utf16(&units).ok()?
    } else {
        let end = data.iter().position(|&b| b == 0)?;
        std::str::from_utf8(&data[..end]).ok()?.to_string()
    };
    let name = base_name(&raw);
    if name.is_empty() {
        return None;
    }
    Some(name.to_string())
}

fn tolerant(payload: &[u8]) -> String {
    let unicode = header(payload).map(|(_, _, u)| u).unwrap_or(false);
    let data = payload.get(MISC_HEADER_LEN..).unwrap_or(payload);
    let raw = if unicode {
        let units: Vec<u16> = data
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .take_while(|&u| u != 0)
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
        String::from_utf8_lossy(&data[..end]).into_owned()
    };
    base_name(&raw).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(data_type: u32, unicode: bool, data: &[u8]) -> Vec<u8> {
        let mut body = data.to_vec();
        while (MISC_HEADER_LEN + body.len()) % 4 != 0 {
            body.push(0);
        }
        let mut v = data_type.to_le_bytes().to_vec();
        v.extend_from_slice(&((MISC_HEADER_LEN + body.len()) as u32).to_le_bytes());
        v.push(unicode as u8);
        v.extend_from_slice(&[0, 0, 0]);
        v.extend_from_slice(&body);
        v
    }

    #[test]
    fn ascii_exename_decodes_exactly() {
        let payload = record(1, false, b"dll\\ntdll.dbg\0");
        assert_eq!(misc_filename(&payload), MiscName::Exact("ntdll.dbg".into()));
    }

    #[test]
    fn unicode_exename_decodes_exactly() {
        let mut data = Vec::new();
        for u in "sym\\Kernel32.dbg".encode_utf16() {
            data.extend_from_slice(&u.to_le_bytes());
        }
        data.extend_from_slice(&[0, 0]);
        let payload = record(1, true, &data);
        assert_eq!(misc_filename(&payload).as_str(), "Kernel32.dbg");
        assert!(!misc_filename(&payload).is_degraded());
    }

    #[test]
    fn invalid_utf8_falls_back_to_lossy() {
        let payload = record(1, false, b"dll\\caf\xe9.dbg\0junk");
        let name = misc_filename(&payload);
        assert!(name.is_degraded());
        assert!(name.as_str().starts_with("caf"));
        assert!(name.as_str().ends_with(".dbg"));
    }

    #[test]
    fn wrong_data_type_falls_back() {
        let payload = record(7, false, b"user32.dbg\0");
        assert_eq!(
            misc_filename(&payload),
            MiscName::Degraded("user32.dbg".into())
        );
    }

    #[test]
    fn bogus_length_falls_back() {
        let mut payload = record(1, false, b"gdi32.dbg\0");
        payload[4..8].copy_from_slice(&4096u32.to_le_bytes());
        assert_eq!(misc_filename(&payload).into_inner(), "gdi32.dbg");
    }

    #[test]
    fn tolerant_decode_never_fails() {
        assert_eq!(misc_filename(b""), MiscName::Degraded(String::new()));
        assert_eq!(misc_filename(b"abc"), MiscName::Degraded("abc".into()));
    }
}
