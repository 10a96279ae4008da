//! Section header table decoding and section name resolution.

use super::{ElfClass, ElfSectionType};
use crate::cursor::ByteCursor;
use crate::elf::ElfHeader;
use crate::error::{DwelfError, DwelfResult};

/// Longest span of string-table bytes a single name lookup will read.
pub const SECTION_NAME_SPAN: usize = 0x100;

/// One record of the section header table.
///
/// `name` is an offset into the section-header string table, not the name
/// itself; resolve it with [`section_name`]. The class-dependent fields
/// (`flags`, `address`, `offset`, `size`, `address_alignment`, `entry_size`)
/// occupy 4 bytes in 32-bit images and 8 bytes in 64-bit images, selected by
/// the owning header's class.
#[derive(Debug, Clone)]
pub struct ElfSectionHeader
{
    pub name: u32,
    pub section_type: ElfSectionType,
    pub flags: u64,
    pub address: u64,
    pub offset: u64,
    pub size: u64,
    pub link: u32,
    pub info: u32,
    pub address_alignment: u64,
    pub entry_size: u64,
}

/// Read `count` fixed-size section header records starting at `offset`.
///
/// No bounds validation against the file length beyond what the cursor
/// itself enforces; a truncated file surfaces as `OutOfBounds` mid-decode.
pub(crate) fn decode_section_headers(
    buffer: &[u8],
    class: ElfClass,
    offset: u64,
    count: u16,
) -> DwelfResult<Vec<ElfSectionHeader>>
{
    let mut cursor = ByteCursor::at(buffer, usize::try_from(offset).unwrap_or(usize::MAX));
    let mut sections = Vec::with_capacity(usize::from(count));

    for _ in 0..count {
        let name = cursor.read_u32_le()?;
        let section_type = ElfSectionType::from_code(cursor.read_u32_le()?);
        let flags = class.read_word(&mut cursor)?;
        let address = class.read_word(&mut cursor)?;
        let offset = class.read_word(&mut cursor)?;
        let size = class.read_word(&mut cursor)?;
        let link = cursor.read_u32_le()?;
        let info = cursor.read_u32_le()?;
        let address_alignment = class.read_word(&mut cursor)?;
        let entry_size = class.read_word(&mut cursor)?;

        sections.push(ElfSectionHeader {
            name,
            section_type,
            flags,
            address,
            offset,
            size,
            link,
            info,
            address_alignment,
            entry_size,
        });
    }

    Ok(sections)
}

/// Resolve a section's human-readable name.
///
/// Positions a cursor at the string-table section's file offset plus the
/// target section's `name` field, reads at most [`SECTION_NAME_SPAN`] bytes
/// (clamped to the string table's end and the buffer's end), and returns the
/// prefix up to the first NUL, decoded lossily as UTF-8. A `name` offset
/// pointing past the string table resolves to the empty string.
///
/// ## Errors
///
/// [`DwelfError::MissingSection`] if the header's string-table index does
/// not denote a section.
pub fn section_name(buffer: &[u8], elf: &ElfHeader, section: &ElfSectionHeader) -> DwelfResult<String>
{
    let strings = elf
        .section_headers
        .get(usize::from(elf.section_header_string_table_index))
        .ok_or(DwelfError::MissingSection("section header string table"))?;

    let start = strings.offset.saturating_add(u64::from(section.name));
    let limit = strings
        .offset
        .saturating_add(strings.size)
        .min(buffer.len() as u64);
    let span = usize::try_from(limit.saturating_sub(start)).unwrap_or(0).min(SECTION_NAME_SPAN);

    let mut cursor = ByteCursor::at(buffer, usize::try_from(start).unwrap_or(usize::MAX).min(buffer.len()));
    let bytes = cursor.read_bytes(span)?;
    let name = bytes.split(|byte| *byte == 0).next().unwrap_or(&[]);
    Ok(String::from_utf8_lossy(name).into_owned())
}
