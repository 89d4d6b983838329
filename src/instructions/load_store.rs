//! # Load and Store Instructions
//!
//! Loads (LDA, LDX, LDY) copy the operand byte into a register and update Z
//! and N. Stores (STA, STX, STY) write a register to the effective address and
//! leave the flags alone.

use super::{read_operand, require_address};
use crate::opcodes::OpcodeMetadata;
use crate::{ExecutionError, MemoryBus, CPU};

/// Executes the LDA (Load Accumulator) instruction.
pub(crate) fn execute_lda<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: OpcodeMetadata,
    address: Option<u16>,
) -> Result<(), ExecutionError> {
    let value = read_operand(cpu, instruction, address)?;
    cpu.a = value;
    cpu.status.set_zn(value);
    Ok(())
}

/// Executes the LDX (Load X Register) instruction.
pub(crate) fn execute_ldx<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: OpcodeMetadata,
    address: Option<u16>,
) -> Result<(), ExecutionError> {
    let value = read_operand(cpu, instruction, address)?;
    cpu.x = value;
    cpu.status.set_zn(value);
    Ok(())
}

/// Executes the LDY (Load Y Register) instruction.
pub(crate) fn execute_ldy<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: OpcodeMetadata,
    address: Option<u16>,
) -> Result<(), ExecutionError> {
    let value = read_operand(cpu, instruction, address)?;
    cpu.y = value;
    cpu.status.set_zn(value);
    Ok(())
}

/// Executes the STA (Store Accumulator) instruction.
pub(crate) fn execute_sta<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: OpcodeMetadata,
    address: Option<u16>,
) -> Result<(), ExecutionError> {
    let addr = require_address(cpu, instruction, address)?;
    cpu.memory.write(addr, cpu.a);
    Ok(())
}

/// Executes the STX (Store X Register) instruction.
pub(crate) fn execute_stx<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: OpcodeMetadata,
    address: Option<u16>,
) -> Result<(), ExecutionError> {
    let addr = require_address(cpu, instruction, address)?;
    cpu.memory.write(addr, cpu.x);
    Ok(())
}

/// Executes the STY (Store Y Register) instruction.
pub(crate) fn execute_sty<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: OpcodeMetadata,
    address: Option<u16>,
) -> Result<(), ExecutionError> {
    let addr = require_address(cpu, instruction, address)?;
    cpu.memory.write(addr, cpu.y);
    Ok(())
}
