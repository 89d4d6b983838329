//! # Error Types
//!
//! Every failure the interpreter can report. Execution errors terminate the
//! current run; there is no partial-instruction rollback and no retry.
//! Load errors are raised by the host before a run starts.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::{AddressingMode, Mnemonic};

/// Errors that can occur while stepping the CPU.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// The fetched opcode has no entry in the opcode table.
    #[error("opcode 0x{opcode:02X} at 0x{pc:04X} does not exist")]
    Decode {
        /// Opcode byte that failed to decode.
        opcode: u8,
        /// Address the opcode was fetched from.
        pc: u16,
    },

    /// The opcode decodes to a known mnemonic that has no handler.
    #[error("instruction {mnemonic} {mode:?} (opcode 0x{opcode:02X} at 0x{pc:04X}) has not been implemented")]
    NotImplemented {
        /// Opcode byte of the instruction.
        opcode: u8,
        /// Decoded mnemonic.
        mnemonic: Mnemonic,
        /// Decoded addressing mode.
        mode: AddressingMode,
        /// Address the opcode was fetched from.
        pc: u16,
    },

    /// A handler that operates on memory was dispatched without an operand address.
    #[error("couldn't find target address for instruction {mnemonic} {mode:?} at 0x{pc:04X}")]
    AddressResolution {
        /// Mnemonic of the instruction being executed.
        mnemonic: Mnemonic,
        /// Addressing mode that produced no address.
        mode: AddressingMode,
        /// Address of the instruction.
        pc: u16,
    },

    /// A bus rejected an access. `FlatMemory` never produces this.
    #[error("memory access to 0x{address:04X} was rejected")]
    MemoryAccess {
        /// Rejected address.
        address: u16,
    },

    /// A panic raised mid-step, caught at the emulation loop boundary.
    #[error("internal fault executing opcode 0x{opcode:02X} at 0x{pc:04X}: {message}")]
    InternalFault {
        /// Last fetched opcode.
        opcode: u8,
        /// Program counter at the start of the faulting step.
        pc: u16,
        /// Panic payload rendered as text.
        message: String,
    },
}

/// Errors raised while copying a binary image into memory.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The end address lies below the start address.
    #[error("invalid load range 0x{start:04X}..=0x{end:04X}")]
    InvalidRange {
        /// First address of the range.
        start: u16,
        /// Last address of the range.
        end: u16,
    },

    /// The byte slice length does not match the target range.
    #[error("range 0x{start:04X}..=0x{end:04X} needs {expected} bytes, got {actual}")]
    RangeMismatch {
        /// First address of the range.
        start: u16,
        /// Last address of the range.
        end: u16,
        /// Number of bytes the range holds.
        expected: usize,
        /// Number of bytes supplied.
        actual: usize,
    },

    /// The image file could not be opened.
    #[error("error opening file {}", path.display())]
    Open {
        /// Image path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Reading the image file failed part way.
    #[error("error reading file {}", path.display())]
    Read {
        /// Image path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The file ended before the range was filled.
    #[error("file {} holds {actual} bytes, range needs {expected}", path.display())]
    ShortRead {
        /// Image path.
        path: PathBuf,
        /// Number of bytes the range holds.
        expected: usize,
        /// Number of bytes the file provided.
        actual: usize,
    },
}
