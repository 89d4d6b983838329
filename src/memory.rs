//! # Memory Bus Abstraction
//!
//! This module provides the `MemoryBus` trait that decouples the CPU from specific
//! memory implementations, and `FlatMemory`, the 64KB store the interpreter runs on.
//!
//! ## Design Principles
//!
//! The MemoryBus trait follows 6502 hardware behavior:
//! - No bus errors - reads/writes always succeed
//! - The 16-bit address space is fully backed, so address arithmetic wraps
//!   modulo 65536 instead of failing
//! - Words are little-endian, and the two bytes of a word are accessed
//!   independently so that `0xFFFF + 1` wraps to `0x0000`
//!
//! Failures only originate on the host side, when a binary image is loaded
//! (see [`FlatMemory::load_file`]).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::LoadError;

/// Splits a word into its little-endian byte pair (low byte first).
///
/// ```
/// use step6502::memory::word_to_bytes;
///
/// assert_eq!(word_to_bytes(0x9559), [0x59, 0x95]);
/// ```
pub fn word_to_bytes(word: u16) -> [u8; 2] {
    word.to_le_bytes()
}

/// Joins a little-endian byte pair (low byte first) into a word.
///
/// ```
/// use step6502::memory::bytes_to_word;
///
/// assert_eq!(bytes_to_word([0x59, 0x95]), 0x9559);
/// ```
pub fn bytes_to_word(bytes: [u8; 2]) -> u16 {
    u16::from_le_bytes(bytes)
}

/// Memory bus trait for CPU to read/write bytes.
///
/// Implementations of this trait provide the memory backend for the CPU.
/// The CPU accesses all memory (RAM, ROM, I/O) through this abstraction.
///
/// # Design
///
/// - `read(&self)`: Immutable reference allows shared reads (observers only ever
///   get `&M`)
/// - `write(&mut self)`: Mutable reference makes side effects explicit
/// - No error types: 6502 hardware has no bus error mechanism
///
/// # Examples
///
/// ```
/// use step6502::{MemoryBus, FlatMemory};
///
/// let mut mem = FlatMemory::new();
/// mem.write_word(0x1234, 0xBEEF);
///
/// assert_eq!(mem.read(0x1234), 0xEF);
/// assert_eq!(mem.read(0x1235), 0xBE);
/// assert_eq!(mem.read_word(0x1234), 0xBEEF);
/// ```
pub trait MemoryBus {
    /// Reads a byte from the specified 16-bit address.
    ///
    /// This method must never panic. Unmapped addresses may return garbage.
    fn read(&self, addr: u16) -> u8;

    /// Writes a byte to the specified 16-bit address.
    ///
    /// This method must never panic. Writes to read-only or unmapped
    /// addresses may be ignored.
    fn write(&mut self, addr: u16, value: u8);

    /// Reads a little-endian word from `addr` and `addr + 1`.
    ///
    /// The high byte address wraps, so reading 0xFFFF takes its high byte
    /// from 0x0000.
    fn read_word(&self, addr: u16) -> u16 {
        bytes_to_word([self.read(addr), self.read(addr.wrapping_add(1))])
    }

    /// Writes a little-endian word to `addr` and `addr + 1` (wrapping).
    fn write_word(&mut self, addr: u16, word: u16) {
        let [low, high] = word_to_bytes(word);
        self.write(addr, low);
        self.write(addr.wrapping_add(1), high);
    }

    /// Checks if the IRQ (Interrupt Request) line is active.
    ///
    /// The CPU polls this after each instruction. When it returns `true`, no
    /// other interrupt is pending and the I flag is clear, an IRQ is serviced
    /// before the next fetch.
    ///
    /// Returns `false` by default; plain RAM has no interrupt sources.
    fn irq_active(&self) -> bool {
        false
    }
}

/// Simple 64KB flat memory implementation.
///
/// All 65536 addresses (0x0000-0xFFFF) are mapped to a single contiguous RAM
/// array initialized to 0x00. There is no paging and no mirroring.
///
/// # Examples
///
/// ```
/// use step6502::{CPU, FlatMemory, MemoryBus};
///
/// let mut memory = FlatMemory::new();
/// memory.load_range(&[0xA9, 0x42], 0x8000, 0x8001).unwrap(); // LDA #$42
///
/// let cpu = CPU::new(memory);
/// assert_eq!(cpu.memory().read(0x8001), 0x42);
/// ```
pub struct FlatMemory {
    /// 64KB contiguous memory array
    data: Box<[u8; 65536]>,
}

impl FlatMemory {
    /// Creates a new FlatMemory instance with all bytes initialized to zero.
    pub fn new() -> Self {
        Self {
            data: Box::new([0; 65536]),
        }
    }

    /// Returns the whole address space as a slice, for dumps and inspection.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..]
    }

    /// Overwrites `start..=end` with `bytes`.
    ///
    /// Fails when `end < start` or when `bytes` does not exactly fill the range.
    /// Nothing is written on failure.
    pub fn load_range(&mut self, bytes: &[u8], start: u16, end: u16) -> Result<(), LoadError> {
        let expected = range_len(start, end)?;
        if bytes.len() != expected {
            return Err(LoadError::RangeMismatch {
                start,
                end,
                expected,
                actual: bytes.len(),
            });
        }

        let start = start as usize;
        self.data[start..start + expected].copy_from_slice(bytes);
        Ok(())
    }

    /// Copies the file at `path` verbatim into `start..=end`.
    ///
    /// Only the first `end - start + 1` bytes of the file are used. Fails if the
    /// file cannot be opened or read, or if it holds fewer bytes than the range.
    /// WARNING: overwrites memory.
    pub fn load_file(
        &mut self,
        path: impl AsRef<Path>,
        start: u16,
        end: u16,
    ) -> Result<(), LoadError> {
        let path = path.as_ref();
        let expected = range_len(start, end)?;

        let file = File::open(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut bytes = Vec::with_capacity(expected);
        file.take(expected as u64)
            .read_to_end(&mut bytes)
            .map_err(|source| LoadError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        if bytes.len() < expected {
            return Err(LoadError::ShortRead {
                path: path.to_path_buf(),
                expected,
                actual: bytes.len(),
            });
        }

        log::debug!(
            "loaded {} bytes from {} into 0x{:04X}..=0x{:04X}",
            expected,
            path.display(),
            start,
            end
        );
        self.load_range(&bytes, start, end)
    }
}

fn range_len(start: u16, end: u16) -> Result<usize, LoadError> {
    if end < start {
        return Err(LoadError::InvalidRange { start, end });
    }
    Ok((end - start) as usize + 1)
}

impl Default for FlatMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBus for FlatMemory {
    fn read(&self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.data[addr as usize] = value;
    }
}
