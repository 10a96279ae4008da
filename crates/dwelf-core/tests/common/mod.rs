//! Shared fixtures: synthetic in-memory ELF images and LEB128 encoders.
//!
//! Every integration test decodes buffers assembled here; nothing touches
//! the filesystem.

#![allow(dead_code)]

pub fn push_u16(out: &mut Vec<u8>, value: u16)
{
    out.extend_from_slice(&value.to_le_bytes());
}

pub fn push_u32(out: &mut Vec<u8>, value: u32)
{
    out.extend_from_slice(&value.to_le_bytes());
}

pub fn push_u64(out: &mut Vec<u8>, value: u64)
{
    out.extend_from_slice(&value.to_le_bytes());
}

/// Minimal canonical ULEB128 encoding.
pub fn encode_uleb128(mut value: u64) -> Vec<u8>
{
    let mut out = Vec::new();
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if value == 0 {
            break;
        }
    }
    out
}

/// Minimal canonical SLEB128 encoding.
pub fn encode_sleb128(mut value: i64) -> Vec<u8>
{
    let mut out = Vec::new();
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        let done = (value == 0 && byte & 0x40 == 0) || (value == -1 && byte & 0x40 != 0);
        out.push(if done { byte } else { byte | 0x80 });
        if done {
            break;
        }
    }
    out
}

/// Builder for a small 64-bit little-endian relocatable ELF image.
///
/// Layout: 64-byte file header, section bodies in declaration order, the
/// section-header string table, then the section header table. A null
/// section occupies index 0 and `.shstrtab` sits last, so the first
/// declared section gets index 1 and name offset 1.
pub struct ElfImage
{
    sections: Vec<(String, u32, Vec<u8>)>,
}

impl ElfImage
{
    pub fn new() -> Self
    {
        Self { sections: Vec::new() }
    }

    /// Add a `ProgramBits` section with the given body.
    pub fn section(mut self, name: &str, data: Vec<u8>) -> Self
    {
        self.sections.push((name.to_string(), 0x01, data));
        self
    }

    pub fn build(self) -> Vec<u8>
    {
        let mut shstrtab = vec![0u8];
        let mut name_offsets = Vec::new();
        for (name, _, _) in &self.sections {
            name_offsets.push(shstrtab.len() as u32);
            shstrtab.extend_from_slice(name.as_bytes());
            shstrtab.push(0);
        }
        let shstrtab_name = shstrtab.len() as u32;
        shstrtab.extend_from_slice(b".shstrtab");
        shstrtab.push(0);

        let mut offset = 64usize;
        let mut placements = Vec::new();
        for (_, _, data) in &self.sections {
            placements.push((offset as u64, data.len() as u64));
            offset += data.len();
        }
        let shstrtab_offset = offset as u64;
        offset += shstrtab.len();
        let section_table_offset = offset as u64;
        let count = self.sections.len() as u16 + 2;

        let mut out = Vec::new();
        out.extend_from_slice(&[0x7f, b'E', b'L', b'F']);
        out.push(0x02); // ELF64
        out.push(0x01); // little-endian
        out.push(0x01); // EI_VERSION
        out.push(0x00); // System V
        out.push(0x00); // ABI version
        out.extend_from_slice(&[0u8; 7]);
        push_u16(&mut out, 0x01); // relocatable
        push_u16(&mut out, 0x3e); // x86-64
        push_u32(&mut out, 1);
        push_u64(&mut out, 0); // entry
        push_u64(&mut out, 0); // program header offset
        push_u64(&mut out, section_table_offset);
        push_u32(&mut out, 0); // flags
        push_u16(&mut out, 64); // header size
        push_u16(&mut out, 0); // program header entry size
        push_u16(&mut out, 0); // program header count
        push_u16(&mut out, 64); // section header entry size
        push_u16(&mut out, count);
        push_u16(&mut out, count - 1); // .shstrtab index

        for (_, _, data) in &self.sections {
            out.extend_from_slice(data);
        }
        out.extend_from_slice(&shstrtab);

        // null section at index 0
        out.extend_from_slice(&[0u8; 64]);
        for (index, (_, section_type, _)) in self.sections.iter().enumerate() {
            let (offset, size) = placements[index];
            push_section_header(&mut out, name_offsets[index], *section_type, offset, size);
        }
        push_section_header(&mut out, shstrtab_name, 0x03, shstrtab_offset, shstrtab.len() as u64);

        out
    }
}

fn push_section_header(out: &mut Vec<u8>, name: u32, section_type: u32, offset: u64, size: u64)
{
    push_u32(out, name);
    push_u32(out, section_type);
    push_u64(out, 0); // flags
    push_u64(out, 0); // address
    push_u64(out, offset);
    push_u64(out, size);
    push_u32(out, 0); // link
    push_u32(out, 0); // info
    push_u64(out, 1); // alignment
    push_u64(out, 0); // entry size
}

/// Wrap unit-body bytes in a DWARF5 compilation-unit header.
///
/// `dies` is the raw DIE stream; the length field covers everything after
/// itself, per the format.
pub fn debug_info_unit(version: u16, abbrev_offset: u32, address_size: u8, dies: &[u8]) -> Vec<u8>
{
    let mut body = Vec::new();
    push_u16(&mut body, version);
    body.push(0x01); // DW_UT_compile
    push_u32(&mut body, abbrev_offset);
    body.push(address_size);
    body.extend_from_slice(dies);

    let mut out = Vec::new();
    push_u32(&mut out, body.len() as u32);
    out.extend_from_slice(&body);
    out
}
