//! # Increment and Decrement Instructions
//!
//! - INC / DEC: memory, read-modify-write
//! - INX / INY / DEX / DEY: index registers
//!
//! All wrap modulo 256 and update Z and N. C and V are untouched.

use super::require_address;
use crate::opcodes::OpcodeMetadata;
use crate::{ExecutionError, MemoryBus, CPU};

/// Executes the INC (Increment Memory) instruction.
pub(crate) fn execute_inc<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: OpcodeMetadata,
    address: Option<u16>,
) -> Result<(), ExecutionError> {
    let addr = require_address(cpu, instruction, address)?;
    let result = cpu.memory.read(addr).wrapping_add(1);
    cpu.memory.write(addr, result);
    cpu.status.set_zn(result);
    Ok(())
}

/// Executes the DEC (Decrement Memory) instruction.
pub(crate) fn execute_dec<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: OpcodeMetadata,
    address: Option<u16>,
) -> Result<(), ExecutionError> {
    let addr = require_address(cpu, instruction, address)?;
    let result = cpu.memory.read(addr).wrapping_sub(1);
    cpu.memory.write(addr, result);
    cpu.status.set_zn(result);
    Ok(())
}

/// Executes the INX (Increment X Register) instruction.
pub(crate) fn execute_inx<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.x = cpu.x.wrapping_add(1);
    cpu.status.set_zn(cpu.x);
    Ok(())
}

/// Executes the INY (Increment Y Register) instruction.
pub(crate) fn execute_iny<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.y = cpu.y.wrapping_add(1);
    cpu.status.set_zn(cpu.y);
    Ok(())
}

/// Executes the DEX (Decrement X Register) instruction.
pub(crate) fn execute_dex<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.x = cpu.x.wrapping_sub(1);
    cpu.status.set_zn(cpu.x);
    Ok(())
}

/// Executes the DEY (Decrement Y Register) instruction.
pub(crate) fn execute_dey<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.y = cpu.y.wrapping_sub(1);
    cpu.status.set_zn(cpu.y);
    Ok(())
}
