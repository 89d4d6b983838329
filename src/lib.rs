//! # step6502
//!
//! An instruction-stepped NMOS 6502 interpreter.
//!
//! The CPU fetches one instruction at a time from a flat 64KB memory, resolves
//! the operand address for one of the 6502 addressing modes, applies the
//! instruction's effect on registers and flags, and services interrupts between
//! instructions. Instructions are indivisible; there is no cycle timing and
//! decimal mode is tracked but not honored by ADC/SBC.
//!
//! ## Quick Start
//!
//! ```rust
//! use step6502::{CPU, FlatMemory, InstructionLimit, MemoryBus};
//!
//! // Create 64KB flat memory
//! let mut memory = FlatMemory::new();
//!
//! // Reset vector points to the program at 0x8000
//! memory.write_word(0xFFFC, 0x8000);
//!
//! // LDX #$05 / DEX / BNE -3
//! memory.load_range(&[0xA2, 0x05, 0xCA, 0xD0, 0xFD], 0x8000, 0x8004).unwrap();
//!
//! let mut cpu = CPU::new(memory);
//! cpu.register_observer(Box::new(InstructionLimit::new(11)));
//! cpu.start_emulation().unwrap();
//!
//! assert_eq!(cpu.x(), 0);
//! assert_eq!(cpu.pc(), 0x8005);
//! assert!(cpu.flag_z());
//! ```
//!
//! ## Modules
//!
//! - `cpu` - CPU state and the fetch-decode-execute-interrupt loop
//! - `memory` - MemoryBus trait and the flat 64KB implementation
//! - `status` - Status register flags and their byte encoding
//! - `addressing` - Addressing modes and effective address resolution
//! - `opcodes` - Opcode metadata table
//! - `interrupts` - Interrupt sources and vectors
//! - `observer` - Per-instruction observer hooks
//! - `error` - Execution and load errors

pub mod addressing;
pub mod cpu;
pub mod error;
pub mod interrupts;
pub mod memory;
pub mod observer;
pub mod opcodes;
pub mod status;

// Internal instruction implementations (not part of public API)
mod instructions;

// WebAssembly bindings (only compiled with wasm feature)
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export public API
pub use addressing::AddressingMode;
pub use cpu::CPU;
pub use error::{ExecutionError, LoadError};
pub use interrupts::Interrupt;
pub use memory::{bytes_to_word, word_to_bytes, FlatMemory, MemoryBus};
pub use observer::{CpuView, DebugObserver, InstructionLimit, Observer, RunControl, Throttle};
pub use opcodes::{decode, Mnemonic, OpcodeMetadata, OPCODE_TABLE};
pub use status::Status;
