//! DWARF version-5 debug information decoding.
//!
//! Three pieces, leaves first: the abbreviation-table decoder over
//! `.debug_abbrev`, the per-form attribute value decoder, and the
//! compilation-unit iterator over `.debug_info` that ties the two together
//! into a tree of Debug Information Entries per unit.
//!
//! Only DWARF version 5 in the 32-bit format is accepted. Location
//! expressions, line tables, and macro sections are out of scope; their
//! raw offsets and expression bytes are carried through undecoded.

use crate::cursor::ByteCursor;
use crate::elf::ElfHeader;
use crate::error::DwelfResult;

pub mod abbrev;
pub mod constants;
pub mod die;
pub mod unit;

pub use abbrev::{decode_abbreviations, AbbreviationAttribute, AbbreviationEntry};
pub use constants::{AttributeName, Form, Tag};
pub use die::{AttributeValue, DebugEntry};
pub use unit::{CompilationUnit, CompilationUnitHeader, Dwarf};

/// Resolve a string-valued attribute against the image.
///
/// Inline strings resolve to themselves; `.debug_str` and `.debug_line_str`
/// offsets are chased into their sections. Any other value shape, and any
/// offset whose section is absent from the image, resolves to `None` rather
/// than failing: a missing string is a property of the input, not a decode
/// error. An offset pointing past the section, or a string missing its NUL
/// before the section ends, is [`DwelfError::OutOfBounds`]; the scan never
/// reads into whatever follows the string section.
///
/// [`DwelfError::OutOfBounds`]: crate::error::DwelfError::OutOfBounds
pub fn resolve_string(buffer: &[u8], elf: &ElfHeader, value: &AttributeValue) -> DwelfResult<Option<String>>
{
    let (section, offset) = match value {
        AttributeValue::Str(text) => return Ok(Some(text.clone())),
        AttributeValue::StrRef(offset) => (".debug_str", *offset),
        AttributeValue::LineStrRef(offset) => (".debug_line_str", *offset),
        _ => return Ok(None),
    };

    let Some(strings) = elf.section_by_name(buffer, section)? else {
        return Ok(None);
    };

    let start = strings.offset.saturating_add(offset);
    let limit = strings
        .offset
        .saturating_add(strings.size)
        .min(buffer.len() as u64);
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);

    let mut cursor = ByteCursor::at(&buffer[..limit], usize::try_from(start).unwrap_or(usize::MAX));
    let bytes = cursor.read_cstr()?;
    Ok(Some(String::from_utf8_lossy(bytes).into_owned()))
}
