//! # dwelf-core
//!
//! Raw ELF and DWARF5 binary decoding for Dwelf.
//!
//! This crate decodes object-file structure directly from an in-memory byte
//! buffer, with no external tooling:
//! - ELF file header and section header table, with section name resolution
//! - DWARF5 abbreviation tables from `.debug_abbrev`
//! - DWARF5 compilation units from `.debug_info`, with full per-form
//!   attribute decoding into a tree of Debug Information Entries
//!
//! ## Scope
//!
//! Little-endian images only; the 32-bit ELF class is supported through
//! uniform field-width selection, but DWARF decoding accepts version 5 in
//! the 32-bit format exclusively. Location expressions, line tables, and
//! macro sections are not decoded.
//!
//! ## Usage
//!
//! Decoding is one-shot and fully synchronous. The caller supplies the
//! complete file contents; nothing here touches the filesystem.
//!
//! ```rust,no_run
//! use dwelf_core::{Dwarf, ElfHeader};
//!
//! # fn run(buffer: &[u8]) -> dwelf_core::DwelfResult<()> {
//! let elf = ElfHeader::decode(buffer)?;
//! let dwarf = Dwarf::decode(buffer, &elf)?;
//! for unit in &dwarf.units {
//!     println!("unit with {} root entries", unit.entries.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Decoding one file is independent of any other; buffers are read-only
//! throughout, so parallel decoding across files needs no coordination.

pub mod cursor;
pub mod dwarf;
pub mod elf;
pub mod error;
pub mod prelude;

pub use cursor::ByteCursor;
pub use dwarf::{AttributeValue, CompilationUnit, DebugEntry, Dwarf};
// Re-export commonly used types
pub use elf::{ElfHeader, ElfSectionHeader};
pub use error::{DwelfError, DwelfResult};
