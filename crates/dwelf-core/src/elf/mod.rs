//! ELF object-file decoding.
//!
//! Covers the fixed-layout file header, the section header table, and
//! section name resolution through the section-header string table. Program
//! headers are recorded (size/count fields) but their table is not decoded;
//! nothing downstream of this crate consumes it.
//!
//! Every enumerated identification code decodes into a closed enum with an
//! `Unknown(raw)` fallback, so an unrecognized but structurally valid code
//! never aborts the decode.

use std::fmt;

use crate::cursor::ByteCursor;
use crate::error::DwelfResult;

pub mod header;
pub mod section;

pub use header::ElfHeader;
pub use section::{section_name, ElfSectionHeader, SECTION_NAME_SPAN};

/// The fixed four-byte ELF identification magic.
pub const ELF_MAGIC: [u8; 4] = [0x7f, b'E', b'L', b'F'];

/// Address/offset field width class (`EI_CLASS`).
///
/// This is the entry point for the standing field-width rule: once the class
/// is known, every "class-dependent" field in the file header and in each
/// section header is read as 4 bytes for `Bit32` and 8 bytes otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElfClass
{
    /// 32-bit addressing, 4-byte class-dependent fields.
    Bit32,
    /// 64-bit addressing, 8-byte class-dependent fields.
    Bit64,
    /// Unrecognized class byte; treated as 64-bit for field widths.
    Unknown(u8),
}

impl ElfClass
{
    pub fn from_code(code: u8) -> Self
    {
        match code {
            0x01 => ElfClass::Bit32,
            0x02 => ElfClass::Bit64,
            other => ElfClass::Unknown(other),
        }
    }

    pub fn code(&self) -> u8
    {
        match self {
            ElfClass::Bit32 => 0x01,
            ElfClass::Bit64 => 0x02,
            ElfClass::Unknown(code) => *code,
        }
    }

    /// Read one class-dependent word: 4 bytes when 32-bit, 8 bytes otherwise.
    ///
    /// Centralized so the width selection stays a single standing rule
    /// rather than a per-field branch.
    pub(crate) fn read_word(&self, cursor: &mut ByteCursor<'_>) -> DwelfResult<u64>
    {
        match self {
            ElfClass::Bit32 => Ok(u64::from(cursor.read_u32_le()?)),
            _ => cursor.read_u64_le(),
        }
    }
}

impl fmt::Display for ElfClass
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            ElfClass::Bit32 => write!(f, "ELF32"),
            ElfClass::Bit64 => write!(f, "ELF64"),
            ElfClass::Unknown(code) => write!(f, "unknown class 0x{code:02x}"),
        }
    }
}

/// Data encoding (`EI_DATA`).
///
/// Recorded on the header, but the decoder itself only ever reads
/// little-endian; anything else is rejected up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElfEndianness
{
    Little,
    Big,
    Unknown(u8),
}

impl ElfEndianness
{
    pub fn from_code(code: u8) -> Self
    {
        match code {
            0x01 => ElfEndianness::Little,
            0x02 => ElfEndianness::Big,
            other => ElfEndianness::Unknown(other),
        }
    }

    pub fn code(&self) -> u8
    {
        match self {
            ElfEndianness::Little => 0x01,
            ElfEndianness::Big => 0x02,
            ElfEndianness::Unknown(code) => *code,
        }
    }
}

/// Target operating system ABI (`EI_OSABI`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElfOsAbi
{
    SystemV,
    HpUx,
    NetBsd,
    Linux,
    GnuHurd,
    Solaris,
    Aix,
    Irix,
    FreeBsd,
    Tru64,
    NovellModesto,
    OpenBsd,
    OpenVms,
    NonStopKernel,
    Aros,
    FenixOs,
    CloudAbi,
    OpenVos,
    Unknown(u8),
}

impl ElfOsAbi
{
    pub fn from_code(code: u8) -> Self
    {
        match code {
            0x00 => ElfOsAbi::SystemV,
            0x01 => ElfOsAbi::HpUx,
            0x02 => ElfOsAbi::NetBsd,
            0x03 => ElfOsAbi::Linux,
            0x04 => ElfOsAbi::GnuHurd,
            0x06 => ElfOsAbi::Solaris,
            0x07 => ElfOsAbi::Aix,
            0x08 => ElfOsAbi::Irix,
            0x09 => ElfOsAbi::FreeBsd,
            0x0a => ElfOsAbi::Tru64,
            0x0b => ElfOsAbi::NovellModesto,
            0x0c => ElfOsAbi::OpenBsd,
            0x0d => ElfOsAbi::OpenVms,
            0x0e => ElfOsAbi::NonStopKernel,
            0x0f => ElfOsAbi::Aros,
            0x10 => ElfOsAbi::FenixOs,
            0x11 => ElfOsAbi::CloudAbi,
            0x12 => ElfOsAbi::OpenVos,
            other => ElfOsAbi::Unknown(other),
        }
    }

    pub fn code(&self) -> u8
    {
        match self {
            ElfOsAbi::SystemV => 0x00,
            ElfOsAbi::HpUx => 0x01,
            ElfOsAbi::NetBsd => 0x02,
            ElfOsAbi::Linux => 0x03,
            ElfOsAbi::GnuHurd => 0x04,
            ElfOsAbi::Solaris => 0x06,
            ElfOsAbi::Aix => 0x07,
            ElfOsAbi::Irix => 0x08,
            ElfOsAbi::FreeBsd => 0x09,
            ElfOsAbi::Tru64 => 0x0a,
            ElfOsAbi::NovellModesto => 0x0b,
            ElfOsAbi::OpenBsd => 0x0c,
            ElfOsAbi::OpenVms => 0x0d,
            ElfOsAbi::NonStopKernel => 0x0e,
            ElfOsAbi::Aros => 0x0f,
            ElfOsAbi::FenixOs => 0x10,
            ElfOsAbi::CloudAbi => 0x11,
            ElfOsAbi::OpenVos => 0x12,
            ElfOsAbi::Unknown(code) => *code,
        }
    }
}

/// Object file type (`e_type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElfFileType
{
    None,
    Relocatable,
    Executable,
    SharedObject,
    Core,
    Unknown(u16),
}

impl ElfFileType
{
    pub fn from_code(code: u16) -> Self
    {
        match code {
            0x00 => ElfFileType::None,
            0x01 => ElfFileType::Relocatable,
            0x02 => ElfFileType::Executable,
            0x03 => ElfFileType::SharedObject,
            0x04 => ElfFileType::Core,
            other => ElfFileType::Unknown(other),
        }
    }

    pub fn code(&self) -> u16
    {
        match self {
            ElfFileType::None => 0x00,
            ElfFileType::Relocatable => 0x01,
            ElfFileType::Executable => 0x02,
            ElfFileType::SharedObject => 0x03,
            ElfFileType::Core => 0x04,
            ElfFileType::Unknown(code) => *code,
        }
    }
}

/// Target instruction set architecture (`e_machine`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElfTargetIsa
{
    None,
    Sparc,
    X86,
    Mips,
    PowerPc,
    Arm,
    X86_64,
    Aarch64,
    RiscV,
    Unknown(u16),
}

impl ElfTargetIsa
{
    pub fn from_code(code: u16) -> Self
    {
        match code {
            0x00 => ElfTargetIsa::None,
            0x02 => ElfTargetIsa::Sparc,
            0x03 => ElfTargetIsa::X86,
            0x08 => ElfTargetIsa::Mips,
            0x14 => ElfTargetIsa::PowerPc,
            0x28 => ElfTargetIsa::Arm,
            0x3e => ElfTargetIsa::X86_64,
            0xb7 => ElfTargetIsa::Aarch64,
            0xf3 => ElfTargetIsa::RiscV,
            other => ElfTargetIsa::Unknown(other),
        }
    }

    pub fn code(&self) -> u16
    {
        match self {
            ElfTargetIsa::None => 0x00,
            ElfTargetIsa::Sparc => 0x02,
            ElfTargetIsa::X86 => 0x03,
            ElfTargetIsa::Mips => 0x08,
            ElfTargetIsa::PowerPc => 0x14,
            ElfTargetIsa::Arm => 0x28,
            ElfTargetIsa::X86_64 => 0x3e,
            ElfTargetIsa::Aarch64 => 0xb7,
            ElfTargetIsa::RiscV => 0xf3,
            ElfTargetIsa::Unknown(code) => *code,
        }
    }
}

/// Section type (`sh_type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElfSectionType
{
    Null,
    ProgramBits,
    SymbolTable,
    StringTable,
    RelocationAddends,
    HashTable,
    DynamicLinkingInfo,
    Note,
    NoBits,
    Relocation,
    Shlib,
    DynamicLoaderSymbolTable,
    InitArray,
    FiniArray,
    PreinitArray,
    Group,
    SymbolTableIndex,
    Unknown(u32),
}

impl ElfSectionType
{
    pub fn from_code(code: u32) -> Self
    {
        match code {
            0x00 => ElfSectionType::Null,
            0x01 => ElfSectionType::ProgramBits,
            0x02 => ElfSectionType::SymbolTable,
            0x03 => ElfSectionType::StringTable,
            0x04 => ElfSectionType::RelocationAddends,
            0x05 => ElfSectionType::HashTable,
            0x06 => ElfSectionType::DynamicLinkingInfo,
            0x07 => ElfSectionType::Note,
            0x08 => ElfSectionType::NoBits,
            0x09 => ElfSectionType::Relocation,
            0x0a => ElfSectionType::Shlib,
            0x0b => ElfSectionType::DynamicLoaderSymbolTable,
            0x0e => ElfSectionType::InitArray,
            0x0f => ElfSectionType::FiniArray,
            0x10 => ElfSectionType::PreinitArray,
            0x11 => ElfSectionType::Group,
            0x12 => ElfSectionType::SymbolTableIndex,
            other => ElfSectionType::Unknown(other),
        }
    }

    pub fn code(&self) -> u32
    {
        match self {
            ElfSectionType::Null => 0x00,
            ElfSectionType::ProgramBits => 0x01,
            ElfSectionType::SymbolTable => 0x02,
            ElfSectionType::StringTable => 0x03,
            ElfSectionType::RelocationAddends => 0x04,
            ElfSectionType::HashTable => 0x05,
            ElfSectionType::DynamicLinkingInfo => 0x06,
            ElfSectionType::Note => 0x07,
            ElfSectionType::NoBits => 0x08,
            ElfSectionType::Relocation => 0x09,
            ElfSectionType::Shlib => 0x0a,
            ElfSectionType::DynamicLoaderSymbolTable => 0x0b,
            ElfSectionType::InitArray => 0x0e,
            ElfSectionType::FiniArray => 0x0f,
            ElfSectionType::PreinitArray => 0x10,
            ElfSectionType::Group => 0x11,
            ElfSectionType::SymbolTableIndex => 0x12,
            ElfSectionType::Unknown(code) => *code,
        }
    }
}
