//! Common module for library exports

pub use crate::cursor::ByteCursor;
pub use crate::dwarf::{
    decode_abbreviations, resolve_string, AbbreviationAttribute, AbbreviationEntry, AttributeName, AttributeValue,
    CompilationUnit, CompilationUnitHeader, DebugEntry, Dwarf, Form, Tag,
};
pub use crate::elf::{
    section_name, ElfClass, ElfEndianness, ElfFileType, ElfHeader, ElfOsAbi, ElfSectionHeader, ElfSectionType,
    ElfTargetIsa,
};
pub use crate::error::{DwelfError, DwelfResult};
