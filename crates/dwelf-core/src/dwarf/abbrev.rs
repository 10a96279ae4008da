//! `.debug_abbrev` abbreviation table decoding.
//!
//! An abbreviation table is the schema side of the DIE stream: each entry
//! pairs a positive code with a tag, a has-children flag, and an ordered
//! list of (attribute name, form) declarations. DIEs in `.debug_info` refer
//! back to these entries by code.

use smallvec::SmallVec;
use tracing::debug;

use super::constants::{AttributeName, Form, Tag};
use crate::cursor::ByteCursor;
use crate::elf::ElfHeader;
use crate::error::{DwelfError, DwelfResult};

/// One declared attribute of an abbreviation entry.
#[derive(Debug, Clone)]
pub struct AbbreviationAttribute
{
    pub name: AttributeName,
    /// Decode rule for the attribute's value in the DIE stream.
    pub form: Form,
    /// Present only for `DW_FORM_implicit_const`, whose value lives in the
    /// abbreviation declaration itself rather than in `.debug_info`.
    pub implicit_value: Option<i64>,
}

/// One abbreviation entry.
///
/// Code 0 is the table terminator and is never stored as an entry.
#[derive(Debug, Clone)]
pub struct AbbreviationEntry
{
    pub code: u64,
    pub tag: Tag,
    pub has_children: bool,
    pub attributes: SmallVec<[AbbreviationAttribute; 8]>,
}

/// Decode one abbreviation table from `.debug_abbrev` starting at
/// `abbrev_offset` (relative to the section start).
///
/// Permissive variant: if the image has no `.debug_abbrev` section the
/// result is an empty table, not an error. The top-level unit iterator
/// checks for the section itself and fails loudly instead.
///
/// The decode stops exactly at the `code == 0` terminator. Bytes remaining
/// after it belong to other units' tables (reachable through different
/// offsets) and are never inspected. Reaching the section's end without a
/// terminator is [`DwelfError::TruncatedAbbreviationTable`].
pub fn decode_abbreviations(buffer: &[u8], elf: &ElfHeader, abbrev_offset: u64) -> DwelfResult<Vec<AbbreviationEntry>>
{
    let Some(section) = elf.section_by_name(buffer, ".debug_abbrev")? else {
        debug!("no .debug_abbrev section, returning empty abbreviation table");
        return Ok(Vec::new());
    };

    let section_start = usize::try_from(section.offset).unwrap_or(usize::MAX);
    let section_end = usize::try_from(section.offset.saturating_add(section.size)).unwrap_or(usize::MAX);
    let table_start = section_start.saturating_add(usize::try_from(abbrev_offset).unwrap_or(usize::MAX));

    let mut cursor = ByteCursor::at(buffer, table_start);
    let mut entries = Vec::new();

    loop {
        if cursor.offset() >= section_end {
            return Err(DwelfError::TruncatedAbbreviationTable {
                table_offset: abbrev_offset,
            });
        }

        let code = cursor.read_uleb128()?;
        if code == 0 {
            // Table terminator, unconditional even if section bytes remain.
            break;
        }

        let tag = Tag::from_code(cursor.read_uleb128()?);
        let has_children = cursor.read_u8()? == 1;

        let mut attributes = SmallVec::new();
        loop {
            let name = cursor.read_uleb128()?;
            let form = cursor.read_uleb128()?;
            if name == 0 && form == 0 {
                break;
            }

            let form = Form::from_code(form);
            let implicit_value = if form == Form::ImplicitConst {
                Some(cursor.read_sleb128()?)
            } else {
                None
            };

            attributes.push(AbbreviationAttribute {
                name: AttributeName::from_code(name),
                form,
                implicit_value,
            });
        }

        if cursor.offset() > section_end {
            return Err(DwelfError::TruncatedAbbreviationTable {
                table_offset: abbrev_offset,
            });
        }

        entries.push(AbbreviationEntry {
            code,
            tag,
            has_children,
            attributes,
        });
    }

    Ok(entries)
}
