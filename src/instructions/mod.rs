//! # 6502 Instruction Implementations
//!
//! This module contains the implementations of all 6502 instructions, organized by category.
//! Each handler receives a mutable reference to the CPU, the decoded instruction and the
//! effective address computed by the resolver (`None` for implied/accumulator modes).
//!
//! Handlers never advance PC themselves. The engine adds the instruction size afterwards
//! unless the handler called `stop_auto_increment()`.
//!
//! ## Categories
//!
//! - **alu**: Arithmetic and logic operations (ADC, SBC, AND, ORA, EOR, CMP, CPX, CPY)
//! - **branches**: Conditional branch instructions (BCC, BCS, BEQ, BNE, BMI, BPL, BVC, BVS)
//! - **shifts**: Shift and rotate operations (ASL, LSR, ROL, ROR)
//! - **load_store**: Load and store instructions (LDA, LDX, LDY, STA, STX, STY)
//! - **inc_dec**: Increment and decrement operations (INC, DEC, INX, INY, DEX, DEY)
//! - **control**: Control flow instructions (JMP, JSR, RTS, RTI, BRK, NOP)
//! - **flags**: Status flag manipulation (CLC, SEC, CLI, SEI, CLD, SED, CLV)
//! - **transfer**: Register transfer operations (TAX, TAY, TXA, TYA, TSX, TXS)
//!
//! Mnemonics that `OpcodeMetadata::implemented()` rejects (BIT and the stack push/pull
//! group) decode but fail with `ExecutionError::NotImplemented` before any dispatch.

mod alu;
mod branches;
mod control;
mod flags;
mod inc_dec;
mod load_store;
mod shifts;
mod transfer;

use crate::opcodes::{Mnemonic, OpcodeMetadata};
use crate::{ExecutionError, MemoryBus, CPU};

/// Dispatches a decoded instruction to its handler.
pub(crate) fn execute<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: OpcodeMetadata,
    address: Option<u16>,
) -> Result<(), ExecutionError> {
    use Mnemonic::*;

    if !instruction.implemented() {
        return Err(not_implemented(cpu, instruction));
    }

    match instruction.mnemonic {
        ADC => alu::execute_adc(cpu, instruction, address),
        SBC => alu::execute_sbc(cpu, instruction, address),
        AND => alu::execute_and(cpu, instruction, address),
        ORA => alu::execute_ora(cpu, instruction, address),
        EOR => alu::execute_eor(cpu, instruction, address),
        CMP => alu::execute_cmp(cpu, instruction, address),
        CPX => alu::execute_cpx(cpu, instruction, address),
        CPY => alu::execute_cpy(cpu, instruction, address),

        ASL => shifts::execute_asl(cpu, instruction, address),
        LSR => shifts::execute_lsr(cpu, instruction, address),
        ROL => shifts::execute_rol(cpu, instruction, address),
        ROR => shifts::execute_ror(cpu, instruction, address),

        BCC => branches::execute_bcc(cpu, instruction, address),
        BCS => branches::execute_bcs(cpu, instruction, address),
        BEQ => branches::execute_beq(cpu, instruction, address),
        BNE => branches::execute_bne(cpu, instruction, address),
        BMI => branches::execute_bmi(cpu, instruction, address),
        BPL => branches::execute_bpl(cpu, instruction, address),
        BVC => branches::execute_bvc(cpu, instruction, address),
        BVS => branches::execute_bvs(cpu, instruction, address),

        LDA => load_store::execute_lda(cpu, instruction, address),
        LDX => load_store::execute_ldx(cpu, instruction, address),
        LDY => load_store::execute_ldy(cpu, instruction, address),
        STA => load_store::execute_sta(cpu, instruction, address),
        STX => load_store::execute_stx(cpu, instruction, address),
        STY => load_store::execute_sty(cpu, instruction, address),

        INC => inc_dec::execute_inc(cpu, instruction, address),
        DEC => inc_dec::execute_dec(cpu, instruction, address),
        INX => inc_dec::execute_inx(cpu),
        INY => inc_dec::execute_iny(cpu),
        DEX => inc_dec::execute_dex(cpu),
        DEY => inc_dec::execute_dey(cpu),

        JMP => control::execute_jmp(cpu, instruction, address),
        JSR => control::execute_jsr(cpu, instruction, address),
        RTS => control::execute_rts(cpu),
        RTI => control::execute_rti(cpu),
        BRK => control::execute_brk(cpu),
        NOP => Ok(()),

        CLC => flags::execute_clc(cpu),
        SEC => flags::execute_sec(cpu),
        CLI => flags::execute_cli(cpu),
        SEI => flags::execute_sei(cpu),
        CLD => flags::execute_cld(cpu),
        SED => flags::execute_sed(cpu),
        CLV => flags::execute_clv(cpu),

        TAX => transfer::execute_tax(cpu),
        TAY => transfer::execute_tay(cpu),
        TXA => transfer::execute_txa(cpu),
        TYA => transfer::execute_tya(cpu),
        TSX => transfer::execute_tsx(cpu),
        TXS => transfer::execute_txs(cpu),

        BIT | PHA | PHP | PLA | PLP => Err(not_implemented(cpu, instruction)),
    }
}

fn not_implemented<M: MemoryBus>(cpu: &CPU<M>, instruction: OpcodeMetadata) -> ExecutionError {
    ExecutionError::NotImplemented {
        opcode: instruction.opcode,
        mnemonic: instruction.mnemonic,
        mode: instruction.addressing_mode,
        pc: cpu.pc,
    }
}

/// Returns the operand address, or an error naming the instruction if there is none.
pub(crate) fn require_address<M: MemoryBus>(
    cpu: &CPU<M>,
    instruction: OpcodeMetadata,
    address: Option<u16>,
) -> Result<u16, ExecutionError> {
    address.ok_or(ExecutionError::AddressResolution {
        mnemonic: instruction.mnemonic,
        mode: instruction.addressing_mode,
        pc: cpu.pc,
    })
}

/// Reads the byte an instruction operates on.
pub(crate) fn read_operand<M: MemoryBus>(
    cpu: &CPU<M>,
    instruction: OpcodeMetadata,
    address: Option<u16>,
) -> Result<u8, ExecutionError> {
    let addr = require_address(cpu, instruction, address)?;
    Ok(cpu.memory.read(addr))
}
