//! ELF file header decoding.

use tracing::debug;

use super::section::{decode_section_headers, section_name, ElfSectionHeader};
use super::{ElfClass, ElfEndianness, ElfFileType, ElfOsAbi, ElfTargetIsa, ELF_MAGIC};
use crate::cursor::ByteCursor;
use crate::error::{DwelfError, DwelfResult};

/// Decoded ELF file header, including its section header table.
///
/// Immutable once decoded. Offsets and sizes are widened to `u64`
/// regardless of class; the class only controls how many bytes each
/// class-dependent field occupies in the file.
#[derive(Debug, Clone)]
pub struct ElfHeader
{
    pub magic: [u8; 4],
    pub class: ElfClass,
    pub endianness: ElfEndianness,
    /// `EI_VERSION` identification byte.
    pub elf_version: u8,
    pub os_abi: ElfOsAbi,
    pub os_abi_version: u8,
    pub file_type: ElfFileType,
    pub isa: ElfTargetIsa,
    /// `e_version` field.
    pub version: u32,
    pub entry: u64,
    pub program_header_offset: u64,
    pub section_header_offset: u64,
    pub flags: u32,
    pub header_size: u16,
    pub program_header_size: u16,
    pub program_header_count: u16,
    pub section_header_size: u16,
    pub section_header_count: u16,
    pub section_header_string_table_index: u16,
    pub section_headers: Vec<ElfSectionHeader>,
}

impl ElfHeader
{
    /// Decode the file header and its section header table from a complete
    /// in-memory image.
    ///
    /// ## Errors
    ///
    /// - [`DwelfError::InvalidMagic`] if the image does not start with
    ///   `0x7f 'E' 'L' 'F'`.
    /// - [`DwelfError::UnsupportedEndianness`] if the data encoding byte is
    ///   anything but little-endian.
    /// - [`DwelfError::OutOfBounds`] if the image is truncated anywhere the
    ///   header or section table reaches.
    pub fn decode(buffer: &[u8]) -> DwelfResult<Self>
    {
        let mut cursor = ByteCursor::new(buffer);

        let mut magic = [0u8; 4];
        magic.copy_from_slice(cursor.read_bytes(4)?);
        if magic != ELF_MAGIC {
            return Err(DwelfError::InvalidMagic { found: magic });
        }

        let class = ElfClass::from_code(cursor.read_u8()?);
        let endianness = ElfEndianness::from_code(cursor.read_u8()?);
        if endianness != ElfEndianness::Little {
            return Err(DwelfError::UnsupportedEndianness {
                encoding: endianness.code(),
            });
        }
        let elf_version = cursor.read_u8()?;
        let os_abi = ElfOsAbi::from_code(cursor.read_u8()?);
        let os_abi_version = cursor.read_u8()?;

        // identification padding
        cursor.read_bytes(7)?;

        let file_type = ElfFileType::from_code(cursor.read_u16_le()?);
        let isa = ElfTargetIsa::from_code(cursor.read_u16_le()?);
        let version = cursor.read_u32_le()?;

        let entry = class.read_word(&mut cursor)?;
        let program_header_offset = class.read_word(&mut cursor)?;
        let section_header_offset = class.read_word(&mut cursor)?;
        let flags = cursor.read_u32_le()?;
        let header_size = cursor.read_u16_le()?;
        let program_header_size = cursor.read_u16_le()?;
        let program_header_count = cursor.read_u16_le()?;
        let section_header_size = cursor.read_u16_le()?;
        let section_header_count = cursor.read_u16_le()?;
        let section_header_string_table_index = cursor.read_u16_le()?;

        let section_headers = decode_section_headers(buffer, class, section_header_offset, section_header_count)?;

        debug!(
            class = %class,
            sections = section_headers.len(),
            "decoded ELF header"
        );

        Ok(Self {
            magic,
            class,
            endianness,
            elf_version,
            os_abi,
            os_abi_version,
            file_type,
            isa,
            version,
            entry,
            program_header_offset,
            section_header_offset,
            flags,
            header_size,
            program_header_size,
            program_header_count,
            section_header_size,
            section_header_count,
            section_header_string_table_index,
            section_headers,
        })
    }

    /// Resolve a section's name through the section-header string table.
    pub fn section_name(&self, buffer: &[u8], section: &ElfSectionHeader) -> DwelfResult<String>
    {
        section_name(buffer, self, section)
    }

    /// Find a section by its resolved name, e.g. `".debug_info"`.
    ///
    /// Returns `Ok(None)` when no section carries that name; errors only
    /// when name resolution itself fails.
    pub fn section_by_name<'elf>(&'elf self, buffer: &[u8], name: &str) -> DwelfResult<Option<&'elf ElfSectionHeader>>
    {
        for section in &self.section_headers {
            if section_name(buffer, self, section)? == name {
                return Ok(Some(section));
            }
        }
        Ok(None)
    }
}
