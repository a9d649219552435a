//! Table-driven CRC-32 (IEEE, reflected polynomial `0xEDB88320`).
//!
//! Computations chain through a seed: a zero seed starts fresh, a non-zero
//! seed is the result of a previous call and continues the rolling state.
//! `crc32(crc32(0, a), b) == crc32(0, a ++ b)` for all byte strings.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;

const POLY: u32 = 0xEDB8_8320;

const TABLE: [u32; 256] = build_table();

const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        #[allow(clippy::cast_possible_truncation)]
        let mut crc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 { (crc >> 1) ^ POLY } else { crc >> 1 };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Rolling CRC-32 state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crc32 {
    state: u32,
}

impl Crc32 {
    /// Start a computation, continuing from `seed` when it is non-zero.
    #[must_use]
    pub const fn with_seed(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0xFFFF_FFFF } else { seed ^ 0xFFFF_FFFF },
        }
    }

    pub fn update(&mut self, bytes: &[u8]) {
        let mut crc = self.state;
        for &byte in bytes {
            crc = TABLE[((crc ^ u32::from(byte)) & 0xFF) as usize] ^ (crc >> 8);
        }
        self.state = crc;
    }

    #[must_use]
    pub const fn finish(self) -> u32 {
        self.state ^ 0xFFFF_FFFF
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

/// CRC-32 of `bytes`, chained onto `seed`.
#[must_use]
pub fn crc32(seed: u32, bytes: &[u8]) -> u32 {
    let mut crc = Crc32::with_seed(seed);
    crc.update(bytes);
    crc.finish()
}

/// CRC-32 of a file's contents, chained onto `seed`.
///
/// A missing file contributes no bytes.
///
/// # Errors
///
/// Returns any I/O error other than `NotFound`.
pub fn crc32_file(seed: u32, path: &Path) -> io::Result<u32> {
    match fs::read(path) {
        Ok(bytes) => Ok(crc32(seed, &bytes)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(crc32(seed, &[])),
        Err(err) => Err(err),
    }
}
