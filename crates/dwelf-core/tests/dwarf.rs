//! Tests for DWARF5 abbreviation and compilation unit decoding

mod common;

use common::{debug_info_unit, encode_sleb128, encode_uleb128, ElfImage};
use dwelf_core::dwarf::{decode_abbreviations, resolve_string, AttributeName, AttributeValue, Dwarf, Form, Tag};
use dwelf_core::elf::ElfHeader;
use dwelf_core::error::DwelfError;

/// `(code=1, tag=Subprogram, hasChildren=false, attributes=[(Name, String)])`
/// followed by the attribute-list and table terminators.
fn subprogram_name_table() -> Vec<u8>
{
    vec![
        0x01, // code
        0x2e, // DW_TAG_subprogram
        0x00, // no children
        0x03, 0x08, // DW_AT_name, DW_FORM_string
        0x00, 0x00, // attribute-list terminator
        0x00, // table terminator
    ]
}

#[test]
fn test_single_unit_scenario()
{
    let mut dies = vec![0x01];
    dies.extend_from_slice(b"hello\0");

    let buffer = ElfImage::new()
        .section(".debug_info", debug_info_unit(5, 0, 8, &dies))
        .section(".debug_abbrev", subprogram_name_table())
        .build();
    let elf = ElfHeader::decode(&buffer).unwrap();
    let dwarf = Dwarf::decode(&buffer, &elf).unwrap();

    assert_eq!(dwarf.units.len(), 1);
    let unit = &dwarf.units[0];
    assert_eq!(unit.header.version, 5);
    assert_eq!(unit.header.abbrev_offset, 0);
    assert_eq!(unit.header.address_size, 8);

    assert_eq!(unit.abbreviations.len(), 1);
    let abbreviation = &unit.abbreviations[0];
    assert_eq!(abbreviation.code, 1);
    assert_eq!(abbreviation.tag, Tag::Subprogram);
    assert!(!abbreviation.has_children);
    assert_eq!(abbreviation.attributes.len(), 1);
    assert_eq!(abbreviation.attributes[0].name, AttributeName::Name);
    assert_eq!(abbreviation.attributes[0].form, Form::String);

    assert_eq!(unit.entries.len(), 1);
    let entry = &unit.entries[0];
    assert_eq!(entry.code, 1);
    assert_eq!(entry.tag, Tag::Subprogram);
    assert_eq!(
        entry.attribute(AttributeName::Name),
        Some(&AttributeValue::Str("hello".to_string()))
    );
    assert_eq!(entry.name(&buffer, &elf).unwrap().as_deref(), Some("hello"));
}

#[test]
fn test_version_4_rejected_before_abbreviations()
{
    let buffer = ElfImage::new()
        .section(".debug_info", debug_info_unit(4, 0, 8, &[]))
        .section(".debug_abbrev", subprogram_name_table())
        .build();
    let elf = ElfHeader::decode(&buffer).unwrap();

    match Dwarf::decode(&buffer, &elf) {
        Err(DwelfError::UnsupportedDwarfVersion { found, offset }) => {
            assert_eq!(found, 4);
            assert_eq!(offset, 0);
        }
        other => panic!("expected UnsupportedDwarfVersion, got {other:?}"),
    }
}

#[test]
fn test_sixty_four_bit_format_rejected()
{
    let mut info = Vec::new();
    info.extend_from_slice(&0xffff_ffffu32.to_le_bytes());
    let buffer = ElfImage::new()
        .section(".debug_info", info)
        .section(".debug_abbrev", subprogram_name_table())
        .build();
    let elf = ElfHeader::decode(&buffer).unwrap();

    assert!(matches!(
        Dwarf::decode(&buffer, &elf),
        Err(DwelfError::UnsupportedDwarfFormat { offset: 0 })
    ));
}

#[test]
fn test_missing_sections_are_fatal_at_top_level()
{
    let only_info = ElfImage::new()
        .section(".debug_info", debug_info_unit(5, 0, 8, &[]))
        .build();
    let elf = ElfHeader::decode(&only_info).unwrap();
    assert!(matches!(
        Dwarf::decode(&only_info, &elf),
        Err(DwelfError::MissingSection(".debug_abbrev"))
    ));

    let only_abbrev = ElfImage::new().section(".debug_abbrev", subprogram_name_table()).build();
    let elf = ElfHeader::decode(&only_abbrev).unwrap();
    assert!(matches!(
        Dwarf::decode(&only_abbrev, &elf),
        Err(DwelfError::MissingSection(".debug_info"))
    ));
}

#[test]
fn test_abbreviation_decoder_is_permissive_without_section()
{
    // Same image that makes the top-level iterator fail loudly: the
    // lower-level decoder returns an empty table instead.
    let buffer = ElfImage::new()
        .section(".debug_info", debug_info_unit(5, 0, 8, &[]))
        .build();
    let elf = ElfHeader::decode(&buffer).unwrap();

    let table = decode_abbreviations(&buffer, &elf, 0).unwrap();
    assert!(table.is_empty());
}

#[test]
fn test_abbreviation_decode_stops_at_terminator()
{
    // Two tables back to back; each decode must stop at its own zero
    // terminator and never read into the neighbor.
    let table_a = subprogram_name_table();
    let table_b = vec![
        0x01, 0x34, 0x00, // code 1, DW_TAG_variable, no children
        0x03, 0x08, // DW_AT_name, DW_FORM_string
        0x00, 0x00, 0x00,
    ];
    let offset_b = table_a.len() as u64;
    let mut section = table_a;
    section.extend_from_slice(&table_b);

    let buffer = ElfImage::new().section(".debug_abbrev", section).build();
    let elf = ElfHeader::decode(&buffer).unwrap();

    let first = decode_abbreviations(&buffer, &elf, 0).unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].tag, Tag::Subprogram);

    let second = decode_abbreviations(&buffer, &elf, offset_b).unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].tag, Tag::Variable);
}

#[test]
fn test_truncated_abbreviation_table()
{
    // Complete entry but no table terminator before the section ends.
    let section = vec![0x01, 0x2e, 0x00, 0x03, 0x08, 0x00, 0x00];
    let buffer = ElfImage::new().section(".debug_abbrev", section).build();
    let elf = ElfHeader::decode(&buffer).unwrap();

    assert!(matches!(
        decode_abbreviations(&buffer, &elf, 0),
        Err(DwelfError::TruncatedAbbreviationTable { table_offset: 0 })
    ));
}

#[test]
fn test_unknown_abbreviation_code()
{
    let dies = vec![0x07]; // no abbreviation declares code 7
    let buffer = ElfImage::new()
        .section(".debug_info", debug_info_unit(5, 0, 8, &dies))
        .section(".debug_abbrev", subprogram_name_table())
        .build();
    let elf = ElfHeader::decode(&buffer).unwrap();

    match Dwarf::decode(&buffer, &elf) {
        Err(DwelfError::UnknownAbbreviationCode { code, offset }) => {
            assert_eq!(code, 7);
            // length (4) + version (2) + unit type (1) + abbrev offset (4)
            // + address size (1)
            assert_eq!(offset, 12);
        }
        other => panic!("expected UnknownAbbreviationCode, got {other:?}"),
    }
}

#[test]
fn test_null_die_is_skipped()
{
    let mut dies = vec![0x00, 0x01];
    dies.extend_from_slice(b"after\0");
    let buffer = ElfImage::new()
        .section(".debug_info", debug_info_unit(5, 0, 8, &dies))
        .section(".debug_abbrev", subprogram_name_table())
        .build();
    let elf = ElfHeader::decode(&buffer).unwrap();
    let dwarf = Dwarf::decode(&buffer, &elf).unwrap();

    assert_eq!(dwarf.units[0].entries.len(), 1);
    assert_eq!(
        dwarf.units[0].entries[0].attribute(AttributeName::Name),
        Some(&AttributeValue::Str("after".to_string()))
    );
}

#[test]
fn test_children_form_a_tree()
{
    let table = vec![
        0x01, 0x11, 0x01, 0x00, 0x00, // compile_unit, children, no attributes
        0x02, 0x2e, 0x01, 0x03, 0x08, 0x00, 0x00, // subprogram, children, name
        0x03, 0x05, 0x00, 0x03, 0x08, 0x00, 0x00, // formal_parameter, name
        0x00,
    ];
    let mut dies = vec![0x01, 0x02];
    dies.extend_from_slice(b"f\0");
    dies.push(0x03);
    dies.extend_from_slice(b"x\0");
    dies.push(0x00); // closes f's children
    dies.push(0x00); // closes the unit's children

    let buffer = ElfImage::new()
        .section(".debug_info", debug_info_unit(5, 0, 8, &dies))
        .section(".debug_abbrev", table)
        .build();
    let elf = ElfHeader::decode(&buffer).unwrap();
    let dwarf = Dwarf::decode(&buffer, &elf).unwrap();

    assert_eq!(dwarf.units[0].entries.len(), 1);
    let root = &dwarf.units[0].entries[0];
    assert_eq!(root.tag, Tag::CompileUnit);
    assert_eq!(root.children.len(), 1);

    let subprogram = &root.children[0];
    assert_eq!(subprogram.tag, Tag::Subprogram);
    assert_eq!(subprogram.name(&buffer, &elf).unwrap().as_deref(), Some("f"));
    assert_eq!(subprogram.children.len(), 1);

    let parameter = &subprogram.children[0];
    assert_eq!(parameter.tag, Tag::FormalParameter);
    assert_eq!(parameter.name(&buffer, &elf).unwrap().as_deref(), Some("x"));
    assert!(parameter.children.is_empty());
}

#[test]
fn test_form_value_decoding()
{
    let table = vec![
        0x01, 0x2e, 0x00, // subprogram, no children
        0x11, 0x01, // DW_AT_low_pc, DW_FORM_addr
        0x0b, 0x05, // DW_AT_byte_size, DW_FORM_data2
        0x3b, 0x0f, // DW_AT_decl_line, DW_FORM_udata
        0x1c, 0x0d, // DW_AT_const_value, DW_FORM_sdata
        0x3f, 0x19, // DW_AT_external, DW_FORM_flag_present
        0x3c, 0x0c, // DW_AT_declaration, DW_FORM_flag
        0x03, 0x0e, // DW_AT_name, DW_FORM_strp
        0x00, 0x00, 0x00,
    ];

    let mut dies = vec![0x01];
    dies.extend_from_slice(&0x0040_1000u64.to_le_bytes()); // low_pc
    dies.extend_from_slice(&0x0040u16.to_le_bytes()); // byte_size
    dies.extend_from_slice(&encode_uleb128(300)); // decl_line
    dies.extend_from_slice(&encode_sleb128(-5)); // const_value
    dies.push(0x00); // declaration: flag clear
    dies.extend_from_slice(&1u32.to_le_bytes()); // name: .debug_str+1

    let buffer = ElfImage::new()
        .section(".debug_info", debug_info_unit(5, 0, 8, &dies))
        .section(".debug_abbrev", table)
        .section(".debug_str", b"\0main\0".to_vec())
        .build();
    let elf = ElfHeader::decode(&buffer).unwrap();
    let dwarf = Dwarf::decode(&buffer, &elf).unwrap();

    let entry = &dwarf.units[0].entries[0];
    assert_eq!(entry.attribute(AttributeName::LowPc), Some(&AttributeValue::Address(0x0040_1000)));
    assert_eq!(entry.attribute(AttributeName::ByteSize), Some(&AttributeValue::UInt(0x40)));
    assert_eq!(entry.attribute(AttributeName::DeclLine), Some(&AttributeValue::UInt(300)));
    assert_eq!(entry.attribute(AttributeName::ConstValue), Some(&AttributeValue::Int(-5)));
    assert_eq!(entry.attribute(AttributeName::External), Some(&AttributeValue::Flag(true)));
    assert_eq!(entry.attribute(AttributeName::Declaration), Some(&AttributeValue::Flag(false)));
    assert_eq!(entry.attribute(AttributeName::Name), Some(&AttributeValue::StrRef(1)));
    assert_eq!(entry.name(&buffer, &elf).unwrap().as_deref(), Some("main"));
}

#[test]
fn test_index_and_offset_forms()
{
    let table = vec![
        0x01, 0x11, 0x00, // compile_unit, no children
        0x03, 0x25, // DW_AT_name, DW_FORM_strx1
        0x10, 0x17, // DW_AT_stmt_list, DW_FORM_sec_offset
        0x49, 0x13, // DW_AT_type, DW_FORM_ref4
        0x00, 0x00, 0x00,
    ];
    let mut dies = vec![0x01];
    dies.push(0x05); // strx1
    dies.extend_from_slice(&0x80u32.to_le_bytes()); // sec_offset
    dies.extend_from_slice(&0x2au32.to_le_bytes()); // ref4

    let buffer = ElfImage::new()
        .section(".debug_info", debug_info_unit(5, 0, 8, &dies))
        .section(".debug_abbrev", table)
        .build();
    let elf = ElfHeader::decode(&buffer).unwrap();
    let dwarf = Dwarf::decode(&buffer, &elf).unwrap();

    let entry = &dwarf.units[0].entries[0];
    assert_eq!(entry.attribute(AttributeName::Name), Some(&AttributeValue::StrIndex(5)));
    assert_eq!(entry.attribute(AttributeName::StmtList), Some(&AttributeValue::SecOffset(0x80)));
    assert_eq!(entry.attribute(AttributeName::Type), Some(&AttributeValue::UnitRef(0x2a)));
    // An index form is not resolvable to a string without .debug_str_offsets.
    assert_eq!(
        resolve_string(&buffer, &elf, entry.attribute(AttributeName::Name).unwrap()).unwrap(),
        None
    );
}

#[test]
fn test_string_offset_past_buffer_is_an_error()
{
    let buffer = ElfImage::new().section(".debug_str", b"\0main\0".to_vec()).build();
    let elf = ElfHeader::decode(&buffer).unwrap();

    assert!(matches!(
        resolve_string(&buffer, &elf, &AttributeValue::StrRef(1_000_000)),
        Err(DwelfError::OutOfBounds { .. })
    ));
}

#[test]
fn test_unterminated_string_does_not_read_past_its_section()
{
    // "abc" ends .debug_str with no NUL; the next section's bytes would
    // extend it if the scan were not clamped.
    let buffer = ElfImage::new()
        .section(".debug_str", b"\0abc".to_vec())
        .section(".extra", b"XYZ\0".to_vec())
        .build();
    let elf = ElfHeader::decode(&buffer).unwrap();

    assert!(matches!(
        resolve_string(&buffer, &elf, &AttributeValue::StrRef(1)),
        Err(DwelfError::OutOfBounds { .. })
    ));
}

#[test]
fn test_implicit_const_reads_no_die_bytes()
{
    let mut table = vec![
        0x01, 0x34, 0x00, // variable, no children
        0x3a, 0x21, // DW_AT_decl_file, DW_FORM_implicit_const
    ];
    table.extend_from_slice(&encode_sleb128(-7)); // constant lives in the declaration
    table.extend_from_slice(&[0x00, 0x00, 0x00]);

    let dies = vec![0x01]; // the DIE itself carries no attribute bytes
    let buffer = ElfImage::new()
        .section(".debug_info", debug_info_unit(5, 0, 8, &dies))
        .section(".debug_abbrev", table)
        .build();
    let elf = ElfHeader::decode(&buffer).unwrap();
    let dwarf = Dwarf::decode(&buffer, &elf).unwrap();

    let entry = &dwarf.units[0].entries[0];
    assert_eq!(entry.attribute(AttributeName::DeclFile), Some(&AttributeValue::Int(-7)));

    let abbreviation = &dwarf.units[0].abbreviations[0];
    assert_eq!(abbreviation.attributes[0].implicit_value, Some(-7));
}

#[test]
fn test_units_decode_in_file_order()
{
    let table_a = subprogram_name_table();
    let table_b = vec![
        0x01, 0x34, 0x00, // variable, no children
        0x03, 0x08, // name, string
        0x00, 0x00, 0x00,
    ];
    let offset_b = table_a.len() as u32;
    let mut abbrev = table_a;
    abbrev.extend_from_slice(&table_b);

    let mut dies_a = vec![0x01];
    dies_a.extend_from_slice(b"one\0");
    let mut dies_b = vec![0x01];
    dies_b.extend_from_slice(b"two\0");

    let mut info = debug_info_unit(5, 0, 8, &dies_a);
    info.extend_from_slice(&debug_info_unit(5, offset_b, 4, &dies_b));

    let buffer = ElfImage::new()
        .section(".debug_info", info)
        .section(".debug_abbrev", abbrev)
        .build();
    let elf = ElfHeader::decode(&buffer).unwrap();
    let dwarf = Dwarf::decode(&buffer, &elf).unwrap();

    assert_eq!(dwarf.units.len(), 2);
    assert_eq!(dwarf.units[0].entries[0].tag, Tag::Subprogram);
    assert_eq!(dwarf.units[0].entries[0].name(&buffer, &elf).unwrap().as_deref(), Some("one"));
    assert_eq!(dwarf.units[1].header.abbrev_offset, u64::from(offset_b));
    assert_eq!(dwarf.units[1].header.address_size, 4);
    assert_eq!(dwarf.units[1].entries[0].tag, Tag::Variable);
    assert_eq!(dwarf.units[1].entries[0].name(&buffer, &elf).unwrap().as_deref(), Some("two"));
}
