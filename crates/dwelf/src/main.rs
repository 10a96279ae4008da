use std::path::PathBuf;
use std::{fs, process};

use clap::{Parser, Subcommand};
use dwelf_core::dwarf::{resolve_string, AttributeValue, DebugEntry};
use dwelf_core::{Dwarf, ElfHeader};
use dwelf_utils::{info, init_logging};

/// Inspect ELF object files and their DWARF5 debug information.
#[derive(Parser, Debug)]
#[command(name = "dwelf")]
#[command(version)]
#[command(about = "Inspect ELF object files and their DWARF5 debug information", long_about = None)]
struct Cli
{
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands
{
    /// Display the decoded ELF file header
    Header
    {
        /// Path to the object file
        file: PathBuf,
    },
    /// List sections with their resolved names
    Sections
    {
        /// Path to the object file
        file: PathBuf,
    },
    /// List DWARF5 compilation units
    Units
    {
        /// Path to the object file
        file: PathBuf,
    },
    /// Print the full DIE tree of every compilation unit
    Dump
    {
        /// Path to the object file
        file: PathBuf,
    },
}

fn main()
{
    // Initialize logging (reads from RUST_LOG env var)
    // Defaults to INFO level and Pretty format if not set
    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    let cli = Cli::parse();

    if let Err(e) = run_command(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_command(cli: Cli) -> Result<(), Box<dyn std::error::Error>>
{
    match cli.command {
        Commands::Header { file } => {
            let buffer = fs::read(&file)?;
            let elf = ElfHeader::decode(&buffer)?;
            print_header(&elf);
            Ok(())
        }
        Commands::Sections { file } => {
            let buffer = fs::read(&file)?;
            let elf = ElfHeader::decode(&buffer)?;
            println!("{} section(s):", elf.section_headers.len());
            for (index, section) in elf.section_headers.iter().enumerate() {
                let name = elf.section_name(&buffer, section)?;
                println!(
                    "  [{index:2}] {name:<24} {:?} offset=0x{:x} size=0x{:x}",
                    section.section_type, section.offset, section.size
                );
            }
            Ok(())
        }
        Commands::Units { file } => {
            let buffer = fs::read(&file)?;
            let elf = ElfHeader::decode(&buffer)?;
            let dwarf = Dwarf::decode(&buffer, &elf)?;
            info!("decoded {} compilation unit(s)", dwarf.units.len());
            for (index, unit) in dwarf.units.iter().enumerate() {
                println!(
                    "unit {index}: version={} abbrev_offset=0x{:x} address_size={} abbreviations={} roots={}",
                    unit.header.version,
                    unit.header.abbrev_offset,
                    unit.header.address_size,
                    unit.abbreviations.len(),
                    unit.entries.len()
                );
            }
            Ok(())
        }
        Commands::Dump { file } => {
            let buffer = fs::read(&file)?;
            let elf = ElfHeader::decode(&buffer)?;
            let dwarf = Dwarf::decode(&buffer, &elf)?;
            for (index, unit) in dwarf.units.iter().enumerate() {
                println!("compilation unit {index}:");
                for entry in &unit.entries {
                    print_entry(&buffer, &elf, entry, 1)?;
                }
            }
            Ok(())
        }
    }
}

fn print_header(elf: &ElfHeader)
{
    println!("ELF Header:");
    println!("  Class:        {}", elf.class);
    println!("  OS/ABI:       {:?} (version {})", elf.os_abi, elf.os_abi_version);
    println!("  Type:         {:?}", elf.file_type);
    println!("  Machine:      {:?}", elf.isa);
    println!("  Entry point:  0x{:x}", elf.entry);
    println!(
        "  Program headers: {} x {} bytes at 0x{:x}",
        elf.program_header_count, elf.program_header_size, elf.program_header_offset
    );
    println!(
        "  Section headers: {} x {} bytes at 0x{:x}",
        elf.section_header_count, elf.section_header_size, elf.section_header_offset
    );
    println!("  String table index: {}", elf.section_header_string_table_index);
}

fn print_entry(buffer: &[u8], elf: &ElfHeader, entry: &DebugEntry, depth: usize) -> Result<(), Box<dyn std::error::Error>>
{
    let indent = "  ".repeat(depth);
    println!("{indent}<0x{:x}> {}", entry.offset, entry.tag);
    for (name, value) in &entry.attributes {
        match resolve_string(buffer, elf, value)? {
            Some(text) => println!("{indent}  {name} \"{text}\""),
            None => println!("{indent}  {name} {}", format_value(value)),
        }
    }
    for child in &entry.children {
        print_entry(buffer, elf, child, depth + 1)?;
    }
    Ok(())
}

fn format_value(value: &AttributeValue) -> String
{
    match value {
        AttributeValue::Address(addr) => format!("0x{addr:x}"),
        AttributeValue::UInt(n) => format!("{n}"),
        AttributeValue::Int(n) => format!("{n}"),
        AttributeValue::Flag(set) => (if *set { "yes(1)" } else { "no(0)" }).to_string(),
        AttributeValue::UnitRef(offset) => format!("<0x{offset:x}>"),
        AttributeValue::InfoRef(offset) => format!("<.debug_info+0x{offset:x}>"),
        AttributeValue::SecOffset(offset) => format!("section offset 0x{offset:x}"),
        AttributeValue::TypeSignature(sig) => format!("type signature 0x{sig:016x}"),
        AttributeValue::Block(bytes) => format!("{} byte block", bytes.len()),
        AttributeValue::Exprloc(bytes) => format!("{} byte expression", bytes.len()),
        other => format!("{other:?}"),
    }
}
