//! Debug Information Entries and per-form attribute value decoding.
//!
//! The form table here is the central algorithm of the unit iterator: every
//! attribute a DIE declares is turned into a concrete typed value by the
//! decode rule keyed on its form. All DWARF5 forms (0x01–0x2c) have a rule;
//! a form outside that set is fatal because its width is unknown and the
//! DIE stream cannot be advanced past it.

use super::constants::{AttributeName, Form, Tag};
use crate::cursor::ByteCursor;
use crate::elf::ElfHeader;
use crate::error::{DwelfError, DwelfResult};

/// A decoded attribute value.
///
/// Variants mirror the decode shapes, not individual forms: the `Data1/2/4`
/// forms all land in `UInt`, the `Ref1/2/4/8/RefUdata` forms in `UnitRef`,
/// and so on. Offset-valued variants keep the raw offset; resolving it
/// against the referenced section is a separate step (see
/// [`resolve_string`](super::resolve_string)).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue
{
    /// Machine address (`DW_FORM_addr`), `addressSize` bytes wide.
    Address(u64),
    /// Unsigned constant (`DW_FORM_data1/2/4/8`, `DW_FORM_udata`).
    UInt(u64),
    /// Signed constant (`DW_FORM_sdata`, `DW_FORM_implicit_const`).
    Int(i64),
    /// Boolean flag (`DW_FORM_flag`, `DW_FORM_flag_present`).
    Flag(bool),
    /// NUL-terminated string stored inline in `.debug_info`.
    Str(String),
    /// Offset into `.debug_str`.
    StrRef(u64),
    /// Offset into `.debug_line_str`.
    LineStrRef(u64),
    /// Offset into a supplementary object file's string section.
    SupStrRef(u64),
    /// Offset into some other debug section (`DW_FORM_sec_offset`).
    SecOffset(u64),
    /// Reference to a DIE, relative to the owning unit's header.
    UnitRef(u64),
    /// Reference to a DIE as an absolute `.debug_info` offset.
    InfoRef(u64),
    /// Reference into a supplementary object file's `.debug_info`.
    SupRef(u64),
    /// 8-byte type unit signature (`DW_FORM_ref_sig8`).
    TypeSignature(u64),
    /// Raw block of bytes (`DW_FORM_block*`, `DW_FORM_data16`).
    Block(Vec<u8>),
    /// DWARF expression bytes (`DW_FORM_exprloc`); not interpreted here.
    Exprloc(Vec<u8>),
    /// Index into `.debug_str_offsets` (`DW_FORM_strx*`).
    StrIndex(u64),
    /// Index into `.debug_addr` (`DW_FORM_addrx*`).
    AddrIndex(u64),
    /// Index into `.debug_loclists` (`DW_FORM_loclistx`).
    LocListIndex(u64),
    /// Index into `.debug_rnglists` (`DW_FORM_rnglistx`).
    RngListIndex(u64),
}

/// One decoded Debug Information Entry, with its attached children.
#[derive(Debug, Clone)]
pub struct DebugEntry
{
    /// `.debug_info`-relative offset of the entry's abbreviation code.
    pub offset: u64,
    /// Abbreviation code the entry was resolved through.
    pub code: u64,
    pub tag: Tag,
    /// Attribute values in declaration order.
    pub attributes: Vec<(AttributeName, AttributeValue)>,
    /// Nested entries, attached per the has-children/null-DIE protocol.
    pub children: Vec<DebugEntry>,
}

impl DebugEntry
{
    /// First value decoded for `name`, if the entry declares it.
    pub fn attribute(&self, name: AttributeName) -> Option<&AttributeValue>
    {
        self.attributes
            .iter()
            .find(|(attr, _)| *attr == name)
            .map(|(_, value)| value)
    }

    /// Resolve the entry's `DW_AT_name`, following `.debug_str` offsets.
    pub fn name(&self, buffer: &[u8], elf: &ElfHeader) -> DwelfResult<Option<String>>
    {
        match self.attribute(AttributeName::Name) {
            Some(value) => super::resolve_string(buffer, elf, value),
            None => Ok(None),
        }
    }
}

/// Decode one attribute value at the cursor, keyed by `form`.
///
/// `address_size` comes from the unit header and selects the width of
/// `DW_FORM_addr`. `implicit_value` is the constant carried by the
/// abbreviation declaration for `DW_FORM_implicit_const`.
pub(crate) fn decode_form_value(
    cursor: &mut ByteCursor<'_>,
    form: Form,
    address_size: u8,
    implicit_value: Option<i64>,
) -> DwelfResult<AttributeValue>
{
    // DW_FORM_indirect stores the concrete form as a ULEB128 ahead of the
    // value. Chains of indirect forms are resolved iteratively; each link
    // consumes at least one byte, so a malformed chain ends at the buffer
    // bound.
    let mut form = form;
    while form == Form::Indirect {
        form = Form::from_code(cursor.read_uleb128()?);
    }

    let value = match form {
        Form::Addr => {
            if address_size == 4 {
                AttributeValue::Address(u64::from(cursor.read_u32_le()?))
            } else {
                AttributeValue::Address(cursor.read_u64_le()?)
            }
        }

        Form::Data1 => AttributeValue::UInt(u64::from(cursor.read_u8()?)),
        Form::Data2 => AttributeValue::UInt(u64::from(cursor.read_u16_le()?)),
        Form::Data4 => AttributeValue::UInt(u64::from(cursor.read_u32_le()?)),
        Form::Data8 => AttributeValue::UInt(cursor.read_u64_le()?),
        Form::Udata => AttributeValue::UInt(cursor.read_uleb128()?),
        Form::Sdata => AttributeValue::Int(cursor.read_sleb128()?),
        Form::ImplicitConst => AttributeValue::Int(implicit_value.unwrap_or_default()),

        Form::Flag => AttributeValue::Flag(cursor.read_u8()? != 0),
        Form::FlagPresent => AttributeValue::Flag(true),

        Form::String => AttributeValue::Str(String::from_utf8_lossy(cursor.read_cstr()?).into_owned()),
        Form::Strp => AttributeValue::StrRef(u64::from(cursor.read_u32_le()?)),
        Form::LineStrp => AttributeValue::LineStrRef(u64::from(cursor.read_u32_le()?)),
        Form::StrpSup => AttributeValue::SupStrRef(u64::from(cursor.read_u32_le()?)),

        Form::SecOffset => AttributeValue::SecOffset(u64::from(cursor.read_u32_le()?)),

        Form::Ref1 => AttributeValue::UnitRef(u64::from(cursor.read_u8()?)),
        Form::Ref2 => AttributeValue::UnitRef(u64::from(cursor.read_u16_le()?)),
        Form::Ref4 => AttributeValue::UnitRef(u64::from(cursor.read_u32_le()?)),
        Form::Ref8 => AttributeValue::UnitRef(cursor.read_u64_le()?),
        Form::RefUdata => AttributeValue::UnitRef(cursor.read_uleb128()?),
        Form::RefAddr => AttributeValue::InfoRef(u64::from(cursor.read_u32_le()?)),
        Form::RefSup4 => AttributeValue::SupRef(u64::from(cursor.read_u32_le()?)),
        Form::RefSup8 => AttributeValue::SupRef(cursor.read_u64_le()?),
        Form::RefSig8 => AttributeValue::TypeSignature(cursor.read_u64_le()?),

        Form::Block1 => {
            let len = usize::from(cursor.read_u8()?);
            AttributeValue::Block(cursor.read_bytes(len)?.to_vec())
        }
        Form::Block2 => {
            let len = usize::from(cursor.read_u16_le()?);
            AttributeValue::Block(cursor.read_bytes(len)?.to_vec())
        }
        Form::Block4 => {
            let len = usize::try_from(cursor.read_u32_le()?).unwrap_or(usize::MAX);
            AttributeValue::Block(cursor.read_bytes(len)?.to_vec())
        }
        Form::Block => {
            let len = usize::try_from(cursor.read_uleb128()?).unwrap_or(usize::MAX);
            AttributeValue::Block(cursor.read_bytes(len)?.to_vec())
        }
        Form::Data16 => AttributeValue::Block(cursor.read_bytes(16)?.to_vec()),
        Form::Exprloc => {
            let len = usize::try_from(cursor.read_uleb128()?).unwrap_or(usize::MAX);
            AttributeValue::Exprloc(cursor.read_bytes(len)?.to_vec())
        }

        Form::Strx => AttributeValue::StrIndex(cursor.read_uleb128()?),
        Form::Strx1 => AttributeValue::StrIndex(u64::from(cursor.read_u8()?)),
        Form::Strx2 => AttributeValue::StrIndex(u64::from(cursor.read_u16_le()?)),
        Form::Strx3 => AttributeValue::StrIndex(read_u24_le(cursor)?),
        Form::Strx4 => AttributeValue::StrIndex(u64::from(cursor.read_u32_le()?)),
        Form::Addrx => AttributeValue::AddrIndex(cursor.read_uleb128()?),
        Form::Addrx1 => AttributeValue::AddrIndex(u64::from(cursor.read_u8()?)),
        Form::Addrx2 => AttributeValue::AddrIndex(u64::from(cursor.read_u16_le()?)),
        Form::Addrx3 => AttributeValue::AddrIndex(read_u24_le(cursor)?),
        Form::Addrx4 => AttributeValue::AddrIndex(u64::from(cursor.read_u32_le()?)),

        Form::Loclistx => AttributeValue::LocListIndex(cursor.read_uleb128()?),
        Form::Rnglistx => AttributeValue::RngListIndex(cursor.read_uleb128()?),

        Form::Indirect => unreachable!("indirection resolved above"),
        Form::Unknown(code) => {
            return Err(DwelfError::UnknownForm {
                form: code,
                offset: cursor.offset(),
            })
        }
    };

    Ok(value)
}

/// The 3-byte little-endian integer used by `DW_FORM_strx3`/`DW_FORM_addrx3`.
fn read_u24_le(cursor: &mut ByteCursor<'_>) -> DwelfResult<u64>
{
    let bytes = cursor.read_bytes(3)?;
    Ok(u64::from(bytes[0]) | u64::from(bytes[1]) << 8 | u64::from(bytes[2]) << 16)
}
