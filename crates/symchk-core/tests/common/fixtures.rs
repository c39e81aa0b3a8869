//! Synthetic PE32 images, `.dbg` companions and CodeView records.

const PE_OFFSET: usize = 0x80;
const SECTION_RVA: u32 = 0x1000;
const SECTION_FILE: u32 = 0x200;

pub const CODEVIEW: u32 = 2;
pub const MISC: u32 = 4;

pub const NTDLL_GUID: [u8; 16] = [
    0xF0, 0x56, 0xDD, 0x7E, 0x47, 0x6D, 0x12, 0xFF, 0x47, 0xF4, 0x46, 0xFD, 0x1B, 0x11, 0x1F, 0x2C,
];
pub const NTDLL_ID: &str = "7EDD56F06D47FF1247F446FD1B111F2C1";

fn put16(buf: &mut [u8], at: usize, v: u16) {
    buf[at..at + 2].copy_from_slice(&v.to_le_bytes());
}

fn put32(buf: &mut [u8], at: usize, v: u32) {
    buf[at..at + 4].copy_from_slice(&v.to_le_bytes());
}

pub fn rsds(guid: [u8; 16], age: u32, name: &str) -> Vec<u8> {
    let mut v = b"RSDS".to_vec();
    v.extend_from_slice(&guid);
    v.extend_from_slice(&age.to_le_bytes());
    v.extend_from_slice(name.as_bytes());
    v.push(0);
    v
}

pub fn nb10(timestamp: u32, age: u32, name: &str) -> Vec<u8> {
    let mut v = b"NB10".to_vec();
    v.extend_from_slice(&0u32.to_le_bytes());
    v.extend_from_slice(&timestamp.to_le_bytes());
    v.extend_from_slice(&age.to_le_bytes());
    v.extend_from_slice(name.as_bytes());
    v.push(0);
    v
}

/// `IMAGE_DEBUG_MISC` EXENAME record, ASCII.
pub fn misc(name: &str) -> Vec<u8> {
    let mut data = name.as_bytes().to_vec();
    data.push(0);
    while data.len() % 4 != 0 {
        data.push(0);
    }
    let mut v = 1u32.to_le_bytes().to_vec();
    v.extend_from_slice(&((12 + data.len()) as u32).to_le_bytes());
    v.extend_from_slice(&[0, 0, 0, 0]);
    v.extend_from_slice(&data);
    v
}

/// Minimal PE32 with one section holding the debug directory and payloads.
pub fn pe(timestamp: u32, size_of_image: u32, entries: &[(u32, Vec<u8>)]) -> Vec<u8> {
    let dir_len = entries.len() * 28;
    let mut body = vec![0u8; dir_len];
    let mut offsets = Vec::new();
    for (_, payload) in entries {
        offsets.push(body.len() as u32);
        body.extend_from_slice(payload);
    }
    for (i, ((ty, payload), off)) in entries.iter().zip(&offsets).enumerate() {
        let e = i * 28;
        put32(&mut body, e + 12, *ty);
        put32(&mut body, e + 16, payload.len() as u32);
        put32(&mut body, e + 20, SECTION_RVA + off);
        put32(&mut body, e + 24, SECTION_FILE + off);
    }
    let raw_size = ((body.len() + 0x1ff) / 0x200).max(1) * 0x200;

    let mut img = vec![0u8; SECTION_FILE as usize];
    img[0..2].copy_from_slice(b"MZ");
    put32(&mut img, 0x3c, PE_OFFSET as u32);
    img[PE_OFFSET..PE_OFFSET + 4].copy_from_slice(b"PE\0\0");
    let coff = PE_OFFSET + 4;
    put16(&mut img, coff, 0x14c);
    put16(&mut img, coff + 2, 1);
    put32(&mut img, coff + 4, timestamp);
    put16(&mut img, coff + 16, 0xE0);
    put16(&mut img, coff + 18, 0x0102);
    let opt = coff + 20;
    put16(&mut img, opt, 0x10b);
    put32(&mut img, opt + 28, 0x0040_0000);
    put32(&mut img, opt + 32, 0x1000);
    put32(&mut img, opt + 36, 0x200);
    put16(&mut img, opt + 40, 4);
    put16(&mut img, opt + 48, 4);
    put32(&mut img, opt + 56, size_of_image);
    put32(&mut img, opt + 60, 0x200);
    put16(&mut img, opt + 68, 3);
    put32(&mut img, opt + 92, 16);
    if dir_len > 0 {
        put32(&mut img, opt + 96 + 6 * 8, SECTION_RVA);
        put32(&mut img, opt + 96 + 6 * 8 + 4, dir_len as u32);
    }
    let sec = opt + 0xE0;
    img[sec..sec + 6].copy_from_slice(b".rdata");
    put32(&mut img, sec + 8, body.len().max(1) as u32);
    put32(&mut img, sec + 12, SECTION_RVA);
    put32(&mut img, sec + 16, raw_size as u32);
    put32(&mut img, sec + 20, SECTION_FILE);
    put32(&mut img, sec + 36, 0x4000_0040);

    body.resize(raw_size, 0);
    img.extend_from_slice(&body);
    img
}

/// `.dbg` file: 48-byte header, no sections or exports, then the directory.
pub fn dbg(entries: &[(u32, Vec<u8>)]) -> Vec<u8> {
    let mut v = vec![0u8; 48];
    v[0..2].copy_from_slice(b"DI");
    v[32..36].copy_from_slice(&((entries.len() * 28) as u32).to_le_bytes());
    let dir_start = v.len();
    v.resize(dir_start + entries.len() * 28, 0);
    for (i, (ty, payload)) in entries.iter().enumerate() {
        let ptr = v.len() as u32;
        v.extend_from_slice(payload);
        let e = dir_start + i * 28;
        v[e + 12..e + 16].copy_from_slice(&ty.to_le_bytes());
        v[e + 16..e + 20].copy_from_slice(&(payload.len() as u32).to_le_bytes());
        v[e + 24..e + 28].copy_from_slice(&ptr.to_le_bytes());
    }
    v
}
