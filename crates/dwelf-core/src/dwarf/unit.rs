//! `.debug_info` compilation unit iteration and DIE tree construction.

use tracing::debug;

use super::abbrev::{decode_abbreviations, AbbreviationEntry};
use super::die::{decode_form_value, DebugEntry};
use crate::cursor::ByteCursor;
use crate::elf::ElfHeader;
use crate::error::{DwelfError, DwelfResult};

/// DWARF5 compilation unit header.
#[derive(Debug, Clone, Copy)]
pub struct CompilationUnitHeader
{
    /// Always 5; anything else aborts the decode.
    pub version: u16,
    /// DWARF5 unit-type byte, recorded but not interpreted further.
    pub unit_type: u8,
    /// Offset of the unit's abbreviation table within `.debug_abbrev`.
    pub abbrev_offset: u64,
    /// Byte width of `DW_FORM_addr` values in this unit.
    pub address_size: u8,
}

/// One compilation unit: header, abbreviation table, and DIE tree.
///
/// Each unit resolves its own abbreviation table through `abbrev_offset`,
/// even when offsets coincide across units; tables are never shared or
/// cached.
#[derive(Debug, Clone)]
pub struct CompilationUnit
{
    pub header: CompilationUnitHeader,
    pub abbreviations: Vec<AbbreviationEntry>,
    /// Root DIEs of the unit, children nested beneath them.
    pub entries: Vec<DebugEntry>,
}

/// Decoded `.debug_info` contents: compilation units in file order.
#[derive(Debug, Clone)]
pub struct Dwarf
{
    pub units: Vec<CompilationUnit>,
}

impl Dwarf
{
    /// Walk `.debug_info` and decode every compilation unit, including the
    /// full DIE tree of each.
    ///
    /// ## Errors
    ///
    /// Requires both `.debug_info` and `.debug_abbrev`; either missing is
    /// [`DwelfError::MissingSection`]. A unit version other than 5 is
    /// [`DwelfError::UnsupportedDwarfVersion`], rejected before any
    /// abbreviation decoding. A DIE code with no matching abbreviation is
    /// [`DwelfError::UnknownAbbreviationCode`]; the stream cannot be
    /// resynchronized past it. All failures abort the decode; no partial
    /// result is returned.
    pub fn decode(buffer: &[u8], elf: &ElfHeader) -> DwelfResult<Self>
    {
        let info = elf
            .section_by_name(buffer, ".debug_info")?
            .ok_or(DwelfError::MissingSection(".debug_info"))?;
        let info_start = usize::try_from(info.offset).unwrap_or(usize::MAX);
        let info_end = usize::try_from(info.offset.saturating_add(info.size)).unwrap_or(usize::MAX);

        // The per-unit abbreviation decode tolerates a missing section; the
        // top-level entry point must not.
        if elf.section_by_name(buffer, ".debug_abbrev")?.is_none() {
            return Err(DwelfError::MissingSection(".debug_abbrev"));
        }

        let mut cursor = ByteCursor::at(buffer, info_start);
        let mut units = Vec::new();

        while cursor.offset() < info_end {
            let unit_offset = cursor.offset() - info_start;

            // Unit body length, excluding the 4-byte length field itself.
            let length = cursor.read_u32_le()?;
            if length == 0xffff_ffff {
                return Err(DwelfError::UnsupportedDwarfFormat { offset: unit_offset });
            }
            let header_start = cursor.offset();
            let unit_end = header_start + usize::try_from(length).unwrap_or(usize::MAX);

            let version = cursor.read_u16_le()?;
            if version != 5 {
                return Err(DwelfError::UnsupportedDwarfVersion {
                    found: version,
                    offset: unit_offset,
                });
            }

            let unit_type = cursor.read_u8()?;
            let abbrev_offset = u64::from(cursor.read_u32_le()?);
            let address_size = cursor.read_u8()?;

            let abbreviations = decode_abbreviations(buffer, elf, abbrev_offset)?;

            let entries = decode_entries(&mut cursor, &abbreviations, info_start, unit_end, address_size)?;

            debug!(
                unit = units.len(),
                offset = unit_offset,
                abbreviations = abbreviations.len(),
                roots = entries.len(),
                "decoded compilation unit"
            );

            units.push(CompilationUnit {
                header: CompilationUnitHeader {
                    version,
                    unit_type,
                    abbrev_offset,
                    address_size,
                },
                abbreviations,
                entries,
            });

            cursor.set_offset(unit_end);
        }

        Ok(Self { units })
    }
}

/// Walk the unit's DIE stream up to `unit_end`, building the entry tree.
///
/// A nonzero abbreviation code opens an entry; if its abbreviation declares
/// children, subsequent entries nest beneath it until a null DIE (code 0)
/// closes the sibling list. A null DIE with no open parent is skipped. An
/// explicit stack of open entries keeps the construction iterative.
fn decode_entries(
    cursor: &mut ByteCursor<'_>,
    abbreviations: &[AbbreviationEntry],
    info_start: usize,
    unit_end: usize,
    address_size: u8,
) -> DwelfResult<Vec<DebugEntry>>
{
    let mut roots = Vec::new();
    let mut open: Vec<DebugEntry> = Vec::new();

    while cursor.offset() < unit_end {
        let die_offset = cursor.offset() - info_start;
        let code = cursor.read_uleb128()?;

        if code == 0 {
            // Null DIE: end of the current sibling list.
            if let Some(done) = open.pop() {
                attach(&mut open, &mut roots, done);
            }
            continue;
        }

        let abbreviation = abbreviations
            .iter()
            .find(|entry| entry.code == code)
            .ok_or(DwelfError::UnknownAbbreviationCode {
                code,
                offset: die_offset,
            })?;

        let mut attributes = Vec::with_capacity(abbreviation.attributes.len());
        for declared in &abbreviation.attributes {
            let value = decode_form_value(cursor, declared.form, address_size, declared.implicit_value)?;
            attributes.push((declared.name, value));
        }

        let entry = DebugEntry {
            offset: die_offset as u64,
            code,
            tag: abbreviation.tag,
            attributes,
            children: Vec::new(),
        };

        if abbreviation.has_children {
            open.push(entry);
        } else {
            attach(&mut open, &mut roots, entry);
        }
    }

    // A truncated unit can leave sibling lists without their null DIE;
    // close them innermost-first.
    while let Some(done) = open.pop() {
        attach(&mut open, &mut roots, done);
    }

    Ok(roots)
}

fn attach(open: &mut Vec<DebugEntry>, roots: &mut Vec<DebugEntry>, entry: DebugEntry)
{
    match open.last_mut() {
        Some(parent) => parent.children.push(entry),
        None => roots.push(entry),
    }
}
