//! # Opcode Metadata Table
//!
//! This module contains the 256-entry opcode table that serves as the single
//! source of truth for instruction decoding.
//!
//! The table covers the **151 documented NMOS 6502 opcodes**. Undocumented
//! opcodes have no entry (`None`) and fail to decode.
//!
//! Each entry records:
//! - Opcode byte
//! - Mnemonic (closed enum, dispatched by `match` in the instruction handlers)
//! - Addressing mode
//! - Instruction size in bytes

use std::fmt;

use crate::addressing::AddressingMode;

/// The 56 documented 6502 instruction mnemonics.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    ADC,
    AND,
    ASL,
    BCC,
    BCS,
    BEQ,
    BIT,
    BMI,
    BNE,
    BPL,
    BRK,
    BVC,
    BVS,
    CLC,
    CLD,
    CLI,
    CLV,
    CMP,
    CPX,
    CPY,
    DEC,
    DEX,
    DEY,
    EOR,
    INC,
    INX,
    INY,
    JMP,
    JSR,
    LDA,
    LDX,
    LDY,
    LSR,
    NOP,
    ORA,
    PHA,
    PHP,
    PLA,
    PLP,
    ROL,
    ROR,
    RTI,
    RTS,
    SBC,
    SEC,
    SED,
    SEI,
    STA,
    STX,
    STY,
    TAX,
    TAY,
    TSX,
    TXA,
    TXS,
    TYA,
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Metadata for a single documented 6502 opcode.
///
/// # Examples
///
/// ```
/// use step6502::{AddressingMode, Mnemonic, OPCODE_TABLE};
///
/// // Look up LDA immediate (opcode 0xA9)
/// let lda_imm = OPCODE_TABLE[0xA9].unwrap();
/// assert_eq!(lda_imm.mnemonic, Mnemonic::LDA);
/// assert_eq!(lda_imm.addressing_mode, AddressingMode::Immediate);
/// assert_eq!(lda_imm.size_bytes, 2);
///
/// // Undocumented opcodes have no entry
/// assert!(OPCODE_TABLE[0x02].is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeMetadata {
    /// Opcode byte this entry describes.
    pub opcode: u8,

    /// Instruction mnemonic.
    pub mnemonic: Mnemonic,

    /// Addressing mode for this instruction.
    pub addressing_mode: AddressingMode,

    /// Total instruction size in bytes (opcode + operands), 1-3.
    pub size_bytes: u8,
}

impl OpcodeMetadata {
    /// Whether the handler for this mnemonic exists.
    ///
    /// The stack push/pull instructions and BIT are decoded but not executed.
    pub const fn implemented(&self) -> bool {
        !matches!(
            self.mnemonic,
            Mnemonic::BIT | Mnemonic::PHA | Mnemonic::PHP | Mnemonic::PLA | Mnemonic::PLP
        )
    }
}

/// Looks up the metadata for an opcode byte.
///
/// Returns `None` for undocumented opcodes.
pub fn decode(opcode: u8) -> Option<OpcodeMetadata> {
    OPCODE_TABLE[opcode as usize]
}

use AddressingMode::*;
use Mnemonic::*;

/// Documented opcodes as (opcode, mnemonic, addressing mode).
const DOCUMENTED: [(u8, Mnemonic, AddressingMode); 151] = [
    // ADC
    (0x69, ADC, Immediate),
    (0x65, ADC, ZeroPage),
    (0x75, ADC, ZeroPageX),
    (0x6D, ADC, Absolute),
    (0x7D, ADC, AbsoluteX),
    (0x79, ADC, AbsoluteY),
    (0x61, ADC, IndirectX),
    (0x71, ADC, IndirectY),
    // AND
    (0x29, AND, Immediate),
    (0x25, AND, ZeroPage),
    (0x35, AND, ZeroPageX),
    (0x2D, AND, Absolute),
    (0x3D, AND, AbsoluteX),
    (0x39, AND, AbsoluteY),
    (0x21, AND, IndirectX),
    (0x31, AND, IndirectY),
    // ASL
    (0x0A, ASL, Accumulator),
    (0x06, ASL, ZeroPage),
    (0x16, ASL, ZeroPageX),
    (0x0E, ASL, Absolute),
    (0x1E, ASL, AbsoluteX),
    // Branches
    (0x90, BCC, Relative),
    (0xB0, BCS, Relative),
    (0xF0, BEQ, Relative),
    (0x30, BMI, Relative),
    (0xD0, BNE, Relative),
    (0x10, BPL, Relative),
    (0x50, BVC, Relative),
    (0x70, BVS, Relative),
    // BIT
    (0x24, BIT, ZeroPage),
    (0x2C, BIT, Absolute),
    // BRK
    (0x00, BRK, Implicit),
    // Flag clears
    (0x18, CLC, Implicit),
    (0xD8, CLD, Implicit),
    (0x58, CLI, Implicit),
    (0xB8, CLV, Implicit),
    // CMP
    (0xC9, CMP, Immediate),
    (0xC5, CMP, ZeroPage),
    (0xD5, CMP, ZeroPageX),
    (0xCD, CMP, Absolute),
    (0xDD, CMP, AbsoluteX),
    (0xD9, CMP, AbsoluteY),
    (0xC1, CMP, IndirectX),
    (0xD1, CMP, IndirectY),
    // CPX
    (0xE0, CPX, Immediate),
    (0xE4, CPX, ZeroPage),
    (0xEC, CPX, Absolute),
    // CPY
    (0xC0, CPY, Immediate),
    (0xC4, CPY, ZeroPage),
    (0xCC, CPY, Absolute),
    // DEC
    (0xC6, DEC, ZeroPage),
    (0xD6, DEC, ZeroPageX),
    (0xCE, DEC, Absolute),
    (0xDE, DEC, AbsoluteX),
    (0xCA, DEX, Implicit),
    (0x88, DEY, Implicit),
    // EOR
    (0x49, EOR, Immediate),
    (0x45, EOR, ZeroPage),
    (0x55, EOR, ZeroPageX),
    (0x4D, EOR, Absolute),
    (0x5D, EOR, AbsoluteX),
    (0x59, EOR, AbsoluteY),
    (0x41, EOR, IndirectX),
    (0x51, EOR, IndirectY),
    // INC
    (0xE6, INC, ZeroPage),
    (0xF6, INC, ZeroPageX),
    (0xEE, INC, Absolute),
    (0xFE, INC, AbsoluteX),
    (0xE8, INX, Implicit),
    (0xC8, INY, Implicit),
    // Jumps
    (0x4C, JMP, Absolute),
    (0x6C, JMP, Indirect),
    (0x20, JSR, Absolute),
    // LDA
    (0xA9, LDA, Immediate),
    (0xA5, LDA, ZeroPage),
    (0xB5, LDA, ZeroPageX),
    (0xAD, LDA, Absolute),
    (0xBD, LDA, AbsoluteX),
    (0xB9, LDA, AbsoluteY),
    (0xA1, LDA, IndirectX),
    (0xB1, LDA, IndirectY),
    // LDX
    (0xA2, LDX, Immediate),
    (0xA6, LDX, ZeroPage),
    (0xB6, LDX, ZeroPageY),
    (0xAE, LDX, Absolute),
    (0xBE, LDX, AbsoluteY),
    // LDY
    (0xA0, LDY, Immediate),
    (0xA4, LDY, ZeroPage),
    (0xB4, LDY, ZeroPageX),
    (0xAC, LDY, Absolute),
    (0xBC, LDY, AbsoluteX),
    // LSR
    (0x4A, LSR, Accumulator),
    (0x46, LSR, ZeroPage),
    (0x56, LSR, ZeroPageX),
    (0x4E, LSR, Absolute),
    (0x5E, LSR, AbsoluteX),
    // NOP
    (0xEA, NOP, Implicit),
    // ORA
    (0x09, ORA, Immediate),
    (0x05, ORA, ZeroPage),
    (0x15, ORA, ZeroPageX),
    (0x0D, ORA, Absolute),
    (0x1D, ORA, AbsoluteX),
    (0x19, ORA, AbsoluteY),
    (0x01, ORA, IndirectX),
    (0x11, ORA, IndirectY),
    // Stack
    (0x48, PHA, Implicit),
    (0x08, PHP, Implicit),
    (0x68, PLA, Implicit),
    (0x28, PLP, Implicit),
    // ROL
    (0x2A, ROL, Accumulator),
    (0x26, ROL, ZeroPage),
    (0x36, ROL, ZeroPageX),
    (0x2E, ROL, Absolute),
    (0x3E, ROL, AbsoluteX),
    // ROR
    (0x6A, ROR, Accumulator),
    (0x66, ROR, ZeroPage),
    (0x76, ROR, ZeroPageX),
    (0x6E, ROR, Absolute),
    (0x7E, ROR, AbsoluteX),
    // Returns
    (0x40, RTI, Implicit),
    (0x60, RTS, Implicit),
    // SBC
    (0xE9, SBC, Immediate),
    (0xE5, SBC, ZeroPage),
    (0xF5, SBC, ZeroPageX),
    (0xED, SBC, Absolute),
    (0xFD, SBC, AbsoluteX),
    (0xF9, SBC, AbsoluteY),
    (0xE1, SBC, IndirectX),
    (0xF1, SBC, IndirectY),
    // Flag sets
    (0x38, SEC, Implicit),
    (0xF8, SED, Implicit),
    (0x78, SEI, Implicit),
    // STA
    (0x85, STA, ZeroPage),
    (0x95, STA, ZeroPageX),
    (0x8D, STA, Absolute),
    (0x9D, STA, AbsoluteX),
    (0x99, STA, AbsoluteY),
    (0x81, STA, IndirectX),
    (0x91, STA, IndirectY),
    // STX
    (0x86, STX, ZeroPage),
    (0x96, STX, ZeroPageY),
    (0x8E, STX, Absolute),
    // STY
    (0x84, STY, ZeroPage),
    (0x94, STY, ZeroPageX),
    (0x8C, STY, Absolute),
    // Transfers
    (0xAA, TAX, Implicit),
    (0xA8, TAY, Implicit),
    (0xBA, TSX, Implicit),
    (0x8A, TXA, Implicit),
    (0x9A, TXS, Implicit),
    (0x98, TYA, Implicit),
];

const fn build_table() -> [Option<OpcodeMetadata>; 256] {
    let mut table: [Option<OpcodeMetadata>; 256] = [None; 256];

    let mut i = 0;
    while i < DOCUMENTED.len() {
        let (opcode, mnemonic, addressing_mode) = DOCUMENTED[i];
        table[opcode as usize] = Some(OpcodeMetadata {
            opcode,
            mnemonic,
            addressing_mode,
            size_bytes: addressing_mode.instruction_size(),
        });
        i += 1;
    }

    table
}

/// Complete 256-entry opcode table indexed by opcode byte value.
///
/// Built at compile time; no runtime map lookups happen during decode.
pub static OPCODE_TABLE: [Option<OpcodeMetadata>; 256] = build_table();
