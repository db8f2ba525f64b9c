#![allow(dead_code)]

//! Shared fixture builders: a reference LZW compressor producing classic
//! `.Z` streams and a minimal tar archive writer.

use std::collections::HashMap;
use zextract::artifacts::tar::header::compute_checksum;
use zextract::artifacts::tar::BLOCK_SIZE;

/// Packs codes LSB-first, the way `compress` lays them out.
struct BitWriter {
    out: Vec<u8>,
    acc: u32,
    acc_bits: u32,
}

impl BitWriter {
    fn push(&mut self, code: u16, width: u32) {
        self.acc |= u32::from(code) << self.acc_bits;
        self.acc_bits += width;
        while self.acc_bits >= 8 {
            self.out.push((self.acc & 0xff) as u8);
            self.acc >>= 8;
            self.acc_bits -= 8;
        }
    }

    fn finish(mut self) -> Vec<u8> {
        if self.acc_bits > 0 {
            self.out.push((self.acc & 0xff) as u8);
        }
        self.out
    }
}

/// Reference LZW encoder emitting a block-mode `.Z` stream (max width 16).
///
/// The width schedule mirrors the decoder's: the encoder widens codes when
/// its table reaches `2^width` entries, one entry after the decoder (whose
/// table runs one insertion behind) widens at `2^width - 1`.
pub fn lzw_compress(data: &[u8]) -> Vec<u8> {
    let mut writer = BitWriter {
        out: vec![0x1f, 0x9d, 0x90],
        acc: 0,
        acc_bits: 0,
    };

    let mut dict: HashMap<Vec<u8>, u16> = (0..=255u8).map(|byte| (vec![byte], byte as u16)).collect();
    let mut next_code: usize = 258;
    let mut width: u32 = 9;
    let mut pattern: Vec<u8> = Vec::new();

    for &byte in data {
        let mut extended = pattern.clone();
        extended.push(byte);
        if dict.contains_key(&extended) {
            pattern = extended;
            continue;
        }

        writer.push(dict[&pattern], width);
        if next_code < 1 << 16 {
            dict.insert(extended, next_code as u16);
            next_code += 1;
            if next_code == 1 << width && width < 16 {
                width += 1;
            }
        }
        pattern = vec![byte];
    }

    if !pattern.is_empty() {
        writer.push(dict[&pattern], width);
    }

    writer.finish()
}

/// Builds one valid tar header block.
pub fn tar_header_block(name: &str, size: u64, typeflag: u8, mtime: u64) -> [u8; BLOCK_SIZE] {
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

/// Builds a tar archive of regular files and directories (names ending in
/// `/` become directory entries), terminated by two zero blocks.
pub fn tar_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut data = Vec::new();

    for (name, body) in entries {
        let typeflag = if name.ends_with('/') { b'5' } else { b'0' };
        data.extend_from_slice(&tar_header_block(
            name,
            body.len() as u64,
            typeflag,
            1_700_000_000,
        ));
        data.extend_from_slice(body);
        let padding = (BLOCK_SIZE - body.len() % BLOCK_SIZE) % BLOCK_SIZE;
        data.extend_from_slice(&vec![0u8; padding]);
    }

    data.extend_from_slice(&[0u8; BLOCK_SIZE]);
    data.extend_from_slice(&[0u8; BLOCK_SIZE]);
    data
}

/// A compressed `.tar.Z` payload in one call.
pub fn tar_z_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    lzw_compress(&tar_archive(entries))
}
