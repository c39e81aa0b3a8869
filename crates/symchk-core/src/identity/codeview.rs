//! CodeView record decoding: tag dispatch over RSDS, NB10 and NB09.

use super::{base_name, ResolveError, SymbolIdentity};

const RSDS_HEADER_LEN: usize = 4 + 16 + 4;
const NB10_HEADER_LEN: usize = 4 + 4 + 4 + 4;

/// A CodeView debug record, decoded once from its four-byte tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeViewRecord {
    /// PDB 7.0: GUID + age.
    Rsds {
        guid: [u8; 16],
        age: u32,
        filename: String,
    },
    /// PDB 2.0: timestamp signature + age.
    Nb10 {
        timestamp: u32,
        age: u32,
        filename: String,
    },
    /// Pre-PDB CodeView embedded in `.dbg` files; no symbol-server key.
    Nb09,
    Unknown([u8; 4]),
}

fn u32_at(data: &[u8], offset: usize) -> u32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&data[offset..offset + 4]);
    u32::from_le_bytes(b)
}

fn u16_at(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

/// NUL-terminated (or end-of-buffer-terminated) name, reduced to its base name.
fn embedded_filename(data: &[u8]) -> Result<String, ResolveError> {
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    let raw = String::from_utf8_lossy(&data[..end]);
    let name = base_name(&raw);
    if name.is_empty() {
        return Err(ResolveError::MalformedCodeView("empty filename"));
    }
    Ok(name.to_string())
}

impl CodeViewRecord {
    pub fn parse(payload: &[u8]) -> Result<Self, ResolveError> {
        if payload.len() < 4 {
            return Err(ResolveError::MalformedCodeView("shorter than its tag"));
        }
        let mut tag = [0u8; 4];
        tag.copy_from_slice(&payload[..4]);

        match &tag {
            b"RSDS" => {
                if payload.len() < RSDS_HEADER_LEN {
                    return Err(ResolveError::MalformedCodeView("truncated RSDS header"));
                }
                let mut guid = [0u8; 16];
                guid.copy_from_slice(&payload[4..20]);
                Ok(CodeViewRecord::Rsds {
                    guid,
                    age: u32_at(payload, 20),
                    filename: embedded_filename(&payload[RSDS_HEADER_LEN..])?,
                })
            }
            b"NB10" => {
                if payload.len() < NB10_HEADER_LEN {
                    return Err(ResolveError::MalformedCodeView("truncated NB10 header"));
                }
                Ok(CodeViewRecord::Nb10 {
                    timestamp: u32_at(payload, 8),
                    age: u32_at(payload, 12),
                    filename: embedded_filename(&payload[NB10_HEADER_LEN..])?,
                })
            }
            b"NB09" => Ok(CodeViewRecord::Nb09),
            _ => Ok(CodeViewRecord::Unknown(tag)),
        }
    }

    /// Symbol-server identity for this record.
    pub fn into_identity(self) -> Result<SymbolIdentity, ResolveError> {
        match self {
            CodeViewRecord::Rsds {
                guid,
                age,
                filename,
            } => {
                let mut id = format!(
                    "{:08X}{:04X}{:04X}",
                    u32_at(&guid, 0),
                    u16_at(&guid, 4),
                    u16_at(&guid, 6)
                );
                for b in &guid[8..] {
                    id.push_str(&format!("{:02X}", b));
                }
                id.push_str(&format!("{:X}", age));
                Ok(SymbolIdentity::new(id, filename))
            }
            CodeViewRecord::Nb10 {
                timestamp,
                age,
                filename,
            } => Ok(SymbolIdentity::new(
                format!("{:08X}{:X}", timestamp, age),
                filename,
            )),
            CodeViewRecord::Nb09 => Err(ResolveError::UnsupportedLegacyFormat {
                tag: "NB09".to_string(),
            }),
            CodeViewRecord::Unknown(tag) => Err(ResolveError::UnsupportedCodeViewFormat {
                tag: String::from_utf8_lossy(&tag).into_owned(),
            }),
        }
    }
}

/// Decodes a CodeView payload straight to its identity.
pub fn identity_from_codeview(payload: &[u8]) -> Result<SymbolIdentity, ResolveError> {
    CodeViewRecord::parse(payload)?.into_identity()
}
