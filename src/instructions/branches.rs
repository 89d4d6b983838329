//! # Branch Instructions
//!
//! This module implements conditional branch operations:
//! - BCC / BCS: Branch on Carry clear / set
//! - BEQ / BNE: Branch on Zero set / clear
//! - BMI / BPL: Branch on Negative set / clear
//! - BVC / BVS: Branch on Overflow clear / set
//!
//! All branch instructions use relative addressing. The resolver already
//! produced the target (PC + 2 + signed offset); a taken branch loads it into
//! PC and suppresses the automatic advance. No flags are affected.

use super::require_address;
use crate::opcodes::OpcodeMetadata;
use crate::{ExecutionError, MemoryBus, CPU};

/// Jumps to `target` when `condition` holds.
fn branch_if<M: MemoryBus>(
    cpu: &mut CPU<M>,
    condition: bool,
    instruction: OpcodeMetadata,
    target: Option<u16>,
) -> Result<(), ExecutionError> {
    if condition {
        cpu.pc = require_address(cpu, instruction, target)?;
        cpu.stop_auto_increment();
    }
    Ok(())
}

/// Executes the BCC (Branch if Carry Clear) instruction.
pub(crate) fn execute_bcc<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: OpcodeMetadata,
    target: Option<u16>,
) -> Result<(), ExecutionError> {
    let condition = !cpu.status.carry;
    branch_if(cpu, condition, instruction, target)
}

/// Executes the BCS (Branch if Carry Set) instruction.
pub(crate) fn execute_bcs<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: OpcodeMetadata,
    target: Option<u16>,
) -> Result<(), ExecutionError> {
    let condition = cpu.status.carry;
    branch_if(cpu, condition, instruction, target)
}

/// Executes the BEQ (Branch if Equal) instruction.
pub(crate) fn execute_beq<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: OpcodeMetadata,
    target: Option<u16>,
) -> Result<(), ExecutionError> {
    let condition = cpu.status.zero;
    branch_if(cpu, condition, instruction, target)
}

/// Executes the BNE (Branch if Not Equal) instruction.
pub(crate) fn execute_bne<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: OpcodeMetadata,
    target: Option<u16>,
) -> Result<(), ExecutionError> {
    let condition = !cpu.status.zero;
    branch_if(cpu, condition, instruction, target)
}

/// Executes the BMI (Branch if Minus) instruction.
pub(crate) fn execute_bmi<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: OpcodeMetadata,
    target: Option<u16>,
) -> Result<(), ExecutionError> {
    let condition = cpu.status.negative;
    branch_if(cpu, condition, instruction, target)
}

/// Executes the BPL (Branch if Positive) instruction.
pub(crate) fn execute_bpl<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: OpcodeMetadata,
    target: Option<u16>,
) -> Result<(), ExecutionError> {
    let condition = !cpu.status.negative;
    branch_if(cpu, condition, instruction, target)
}

/// Executes the BVC (Branch if Overflow Clear) instruction.
pub(crate) fn execute_bvc<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: OpcodeMetadata,
    target: Option<u16>,
) -> Result<(), ExecutionError> {
    let condition = !cpu.status.overflow;
    branch_if(cpu, condition, instruction, target)
}

/// Executes the BVS (Branch if Overflow Set) instruction.
pub(crate) fn execute_bvs<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: OpcodeMetadata,
    target: Option<u16>,
) -> Result<(), ExecutionError> {
    let condition = cpu.status.overflow;
    branch_if(cpu, condition, instruction, target)
}
