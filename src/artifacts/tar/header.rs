//! Tar header block parsing
//!
//! Headers are validated before anything is written: the checksum must match
//! (all header bytes summed with the checksum field blanked to spaces) and
//! entry paths are sanitized so no entry can escape the target directory.

use crate::artifacts::errors::{ExtractError, Result};
use crate::artifacts::tar::{BLOCK_SIZE, CHECKSUM_LEN, CHECKSUM_OFFSET};
use bitflags::bitflags;
use std::path::{Component, Path, PathBuf};

const NAME_LEN: usize = 100;
const LINKNAME_OFFSET: usize = 157;
const MAGIC_OFFSET: usize = 257;
const PREFIX_OFFSET: usize = 345;
const PREFIX_LEN: usize = 155;

bitflags! {
    /// Permission bits from the tar mode field.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EntryMode: u32 {
        const SETUID = 0o4000;
        const SETGID = 0o2000;
        const STICKY = 0o1000;
        const OWNER_READ = 0o400;
        const OWNER_WRITE = 0o200;
        const OWNER_EXEC = 0o100;
        const GROUP_READ = 0o040;
        const GROUP_WRITE = 0o020;
        const GROUP_EXEC = 0o010;
        const OTHER_READ = 0o004;
        const OTHER_WRITE = 0o002;
        const OTHER_EXEC = 0o001;
    }
}

impl EntryMode {
    pub fn permissions(self) -> u32 {
        self.bits()
    }
}

/// Classified entry type flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Regular,
    Directory,
    HardLink,
    SymLink,
    /// Device nodes, FIFOs and vendor-specific flags; skipped on extraction
    Other(u8),
}

impl EntryKind {
    /// Maps the raw type flag, rejecting extension records (PAX `x`/`g`,
    /// GNU long-name `L`/`K`) that would be silently mis-parsed as data.
    fn from_flag(flag: u8) -> Result<Self> {
        match flag {
            b'0' | 0 => Ok(EntryKind::Regular),
            b'5' => Ok(EntryKind::Directory),
            b'1' => Ok(EntryKind::HardLink),
            b'2' => Ok(EntryKind::SymLink),
            b'x' | b'g' | b'L' | b'K' => Err(ExtractError::UnsupportedFormat(flag as char)),
            other => Ok(EntryKind::Other(other)),
        }
    }

    /// Single-character rendering for listings.
    pub fn symbol(self) -> char {
        match self {
            EntryKind::Regular => '-',
            EntryKind::Directory => 'd',
            EntryKind::HardLink => 'h',
            EntryKind::SymLink => 'l',
            EntryKind::Other(_) => '?',
        }
    }
}

/// Parsed view of a 512-byte tar header block.
#[derive(Debug, Clone)]
pub struct TarHeader {
    pub name: PathBuf,
    pub mode: EntryMode,
    pub uid: u64,
    pub gid: u64,
    pub size: u64,
    pub mtime: u64,
    pub kind: EntryKind,
    pub link_name: Option<PathBuf>,
}

impl TarHeader {
    pub fn parse(block: &[u8; BLOCK_SIZE]) -> Result<Self> {
        let stored = parse_octal(&block[CHECKSUM_OFFSET..CHECKSUM_OFFSET + CHECKSUM_LEN])
            .ok_or_else(|| ExtractError::CorruptHeader("malformed checksum field".to_string()))?;
        let computed = u64::from(compute_checksum(block));
        if stored != computed {
            return Err(ExtractError::CorruptHeader(format!(
                "checksum mismatch (stored {stored}, computed {computed})"
            )));
        }

        let name = parse_name(block);
        let link_name = parse_string(&block[LINKNAME_OFFSET..LINKNAME_OFFSET + NAME_LEN]);

        Ok(TarHeader {
            name,
            mode: EntryMode::from_bits_truncate(parse_octal_field(block, 100, 8, "mode")? as u32),
            uid: parse_octal_field(block, 108, 8, "uid")?,
            gid: parse_octal_field(block, 116, 8, "gid")?,
            size: parse_octal_field(block, 124, 12, "size")?,
            mtime: parse_octal_field(block, 136, 12, "mtime")?,
            kind: EntryKind::from_flag(block[156])?,
            link_name: link_name.map(PathBuf::from),
        })
    }

    /// Returns the entry path as a safe path relative to the extraction
    /// root: absolute paths and `..` segments are rejected, `.` segments
    /// are dropped.
    pub fn sanitized_path(&self) -> Result<PathBuf> {
        sanitize_path(&self.name)
    }
}

pub(crate) fn sanitize_path(path: &Path) -> Result<PathBuf> {
    let mut sanitized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Normal(part) => sanitized.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ExtractError::PathTraversal(path.to_path_buf()));
            }
        }
    }

    Ok(sanitized)
}

/// Sums all header bytes with the checksum field treated as spaces.
pub fn compute_checksum(block: &[u8; BLOCK_SIZE]) -> u32 {
    let checksum_field = CHECKSUM_OFFSET..CHECKSUM_OFFSET + CHECKSUM_LEN;
    block
        .iter()
        .enumerate()
        .map(|(index, byte)| {
            if checksum_field.contains(&index) {
                u32::from(b' ')
            } else {
                u32::from(*byte)
            }
        })
        .sum()
}

/// Joins the ustar prefix field (when present) onto the name field.
fn parse_name(block: &[u8; BLOCK_SIZE]) -> PathBuf {
    let name = parse_string(&block[..NAME_LEN]).unwrap_or_default();

    if &block[MAGIC_OFFSET..MAGIC_OFFSET + 6] == b"ustar\0" {
        if let Some(prefix) = parse_string(&block[PREFIX_OFFSET..PREFIX_OFFSET + PREFIX_LEN]) {
            return Path::new(&prefix).join(name);
        }
    }

    PathBuf::from(name)
}

/// Reads a NUL-padded string field; `None` when the field is empty.
fn parse_string(field: &[u8]) -> Option<String> {
    let len = field.iter().position(|byte| *byte == 0).unwrap_or(field.len());
    if len == 0 {
        return None;
    }
    Some(String::from_utf8_lossy(&field[..len]).into_owned())
}

/// Parses an octal ASCII field: leading spaces or NULs are skipped, the
/// value ends at the first space or NUL.
fn parse_octal(field: &[u8]) -> Option<u64> {
    let mut value: u64 = 0;
    let mut seen_digit = false;

    for byte in field {
        match byte {
            b' ' | 0 if !seen_digit => continue,
            b' ' | 0 => break,
            b'0'..=b'7' => {
                seen_digit = true;
                value = value.checked_mul(8)?.checked_add(u64::from(byte - b'0'))?;
            }
            _ => return None,
        }
    }

    seen_digit.then_some(value)
}

fn parse_octal_field(
    block: &[u8; BLOCK_SIZE],
    offset: usize,
    len: usize,
    field: &str,
) -> Result<u64> {
    // an all-blank numeric field reads as zero (old archivers leave
    // uid/gid/mtime blank for directories)
    if block[offset..offset + len].iter().all(|byte| *byte == 0 || *byte == b' ') {
        return Ok(0);
    }

    parse_octal(&block[offset..offset + len])
        .ok_or_else(|| ExtractError::CorruptHeader(format!("malformed octal {field} field")))
}

/// Builds a valid header block; shared by the tar unit tests.
#[cfg(test)]
pub(crate) fn header_block(name: &str, size: u64, typeflag: u8, mtime: u64) -> [u8; BLOCK_SIZE] {
    let mut block = [0u8; BLOCK_SIZE];
    block[..name.len()].copy_from_slice(name.as_bytes());
    block[100..108].copy_from_slice(b"0000644\0");
    block[108..116].copy_from_slice(b"0000000\0");
    block[116..124].copy_from_slice(b"0000000\0");
    block[124..136].copy_from_slice(format!("{size:011o}\0").as_bytes());
    block[136..148].copy_from_slice(format!("{mtime:011o}\0").as_bytes());
    block[156] = typeflag;
    block[257..263].copy_from_slice(b"ustar\0");
    block[263..265].copy_from_slice(b"00");

    let checksum = compute_checksum(&block);
    block[148..156].copy_from_slice(format!("{checksum:06o}\0 ").as_bytes());
    block
}
