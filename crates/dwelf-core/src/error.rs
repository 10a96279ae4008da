//! # Error Types
//!
//! General error handling for the decoder.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages.
//!
//! Every variant carries the context a caller needs to locate the problem in
//! the input image (the offending offset, and the expected vs. actual value
//! where one exists). None of these conditions is recoverable for the decode
//! in progress: binary decoding is deterministic, so a failure means the
//! input is either malformed or an unsupported format variant. The caller
//! decides whether to fail the whole run or report per file.

use thiserror::Error;

/// Main error type for decoding operations
///
/// This enum represents all the ways decoding an object file can fail.
///
/// ## Error Categories
///
/// 1. **Identification errors**: InvalidMagic, UnsupportedEndianness
/// 2. **Bounds errors**: OutOfBounds (cursor read past buffer or section end)
/// 3. **Layout errors**: MissingSection, TruncatedAbbreviationTable
/// 4. **Version errors**: UnsupportedDwarfVersion, UnsupportedDwarfFormat
/// 5. **Cross-reference errors**: UnknownAbbreviationCode, UnknownForm
#[derive(Error, Debug)]
pub enum DwelfError
{
    /// The first four bytes are not `0x7f 'E' 'L' 'F'`
    #[error("invalid ELF magic {found:02x?} (expected [7f, 45, 4c, 46])")]
    InvalidMagic
    {
        /// The four bytes actually found at offset 0
        found: [u8; 4],
    },

    /// The ELF identification marks the image as anything but little-endian
    ///
    /// Every numeric read in this crate is little-endian, so accepting a
    /// big-endian image would silently decode garbage.
    #[error("unsupported ELF data encoding 0x{encoding:02x} (only little-endian is supported)")]
    UnsupportedEndianness
    {
        /// Raw value of the `EI_DATA` identification byte
        encoding: u8,
    },

    /// A read would consume bytes past the end of the buffer
    ///
    /// The cursor never wraps, truncates, or returns partial data; the
    /// failing read leaves the cursor offset unchanged.
    #[error("read of {wanted} byte(s) at offset {offset} overruns buffer of {len} byte(s)")]
    OutOfBounds
    {
        /// Cursor offset at which the read was attempted
        offset: usize,
        /// Number of bytes the read asked for
        wanted: usize,
        /// Total length of the underlying buffer
        len: usize,
    },

    /// A section the operation requires is not present in the image
    #[error("required section {0} is not present")]
    MissingSection(&'static str),

    /// A compilation unit header declares a DWARF version other than 5
    #[error("unsupported DWARF version {found} in unit at .debug_info+{offset} (only version 5 is supported)")]
    UnsupportedDwarfVersion
    {
        /// Version field actually read from the unit header
        found: u16,
        /// Section-relative offset of the unit
        offset: usize,
    },

    /// A compilation unit uses the 64-bit DWARF format
    ///
    /// Signalled by the reserved initial-length escape value `0xffff_ffff`.
    #[error("64-bit DWARF format in unit at .debug_info+{offset} is not supported")]
    UnsupportedDwarfFormat
    {
        /// Section-relative offset of the unit
        offset: usize,
    },

    /// A DIE references an abbreviation code absent from its unit's table
    ///
    /// The DIE stream cannot be resynchronized without the matching
    /// declaration, so this aborts the whole decode.
    #[error("DIE at .debug_info+{offset} references unknown abbreviation code {code}")]
    UnknownAbbreviationCode
    {
        /// The unmatched abbreviation code
        code: u64,
        /// Section-relative offset of the DIE
        offset: usize,
    },

    /// An abbreviation table ran past its section end without a terminator
    #[error("abbreviation table at .debug_abbrev+{table_offset} ran past the section end without a zero terminator")]
    TruncatedAbbreviationTable
    {
        /// Section-relative offset the table decode started at
        table_offset: u64,
    },

    /// An attribute declares a form code this decoder has no rule for
    ///
    /// Unlike unrecognized tags or attribute names, an unknown form is fatal:
    /// without a decode rule the value's width is unknown and the DIE stream
    /// cannot be advanced past it.
    #[error("attribute at offset {offset} uses unknown form 0x{form:02x}")]
    UnknownForm
    {
        /// Raw form code read from the abbreviation declaration
        form: u64,
        /// Buffer offset at which the value would have been decoded
        offset: usize,
    },
}

/// Convenience type alias for `Result<T, DwelfError>`
///
/// ```rust
/// use dwelf_core::error::DwelfResult;
/// fn foo() -> DwelfResult<()>
/// {
///     Ok(())
/// }
/// ```
pub type DwelfResult<T> = std::result::Result<T, DwelfError>;
