//! Tests for error handling

use dwelf_core::error::{DwelfError, DwelfResult};

#[test]
fn test_invalid_magic_display()
{
    let error = DwelfError::InvalidMagic { found: [0x7f, b'B', b'A', b'D'] };
    let message = format!("{}", error);
    assert!(message.contains("magic"));
    assert!(message.contains("7f"));
}

#[test]
fn test_unsupported_endianness_display()
{
    let error = DwelfError::UnsupportedEndianness { encoding: 0x02 };
    let message = format!("{}", error);
    assert!(message.contains("0x02"));
    assert!(message.contains("little-endian"));
}

#[test]
fn test_out_of_bounds_display()
{
    let error = DwelfError::OutOfBounds { offset: 60, wanted: 8, len: 64 };
    let message = format!("{}", error);
    assert!(message.contains("60"));
    assert!(message.contains("8"));
    assert!(message.contains("64"));
}

#[test]
fn test_missing_section_display()
{
    let error = DwelfError::MissingSection(".debug_abbrev");
    let message = format!("{}", error);
    assert!(message.contains(".debug_abbrev"));
    assert!(message.contains("not present"));
}

#[test]
fn test_unsupported_dwarf_version_display()
{
    let error = DwelfError::UnsupportedDwarfVersion { found: 4, offset: 0 };
    let message = format!("{}", error);
    assert!(message.contains("version 4"));
    assert!(message.contains(".debug_info+0"));
}

#[test]
fn test_unknown_abbreviation_code_display()
{
    let error = DwelfError::UnknownAbbreviationCode { code: 42, offset: 12 };
    let message = format!("{}", error);
    assert!(message.contains("42"));
    assert!(message.contains("12"));
}

#[test]
fn test_truncated_abbreviation_table_display()
{
    let error = DwelfError::TruncatedAbbreviationTable { table_offset: 0x30 };
    let message = format!("{}", error);
    assert!(message.contains(".debug_abbrev+48"));
    assert!(message.contains("terminator"));
}

#[test]
fn test_unknown_form_display()
{
    let error = DwelfError::UnknownForm { form: 0x7f, offset: 99 };
    let message = format!("{}", error);
    assert!(message.contains("0x7f"));
    assert!(message.contains("99"));
}

#[test]
fn test_result_type()
{
    // Test that the Result type is properly aliased
    let _result: DwelfResult<()> = Ok(());
    let _error_result: DwelfResult<()> = Err(DwelfError::MissingSection(".debug_info"));
}
