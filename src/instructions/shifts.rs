//! # Shift and Rotate Instructions
//!
//! - ASL: Arithmetic Shift Left
//! - LSR: Logical Shift Right
//! - ROL: Rotate Left through carry
//! - ROR: Rotate Right through carry
//!
//! Each operates on the accumulator in Accumulator mode and on memory otherwise.
//! The bit shifted out lands in C; Z and N follow the result.

use super::require_address;
use crate::opcodes::OpcodeMetadata;
use crate::{AddressingMode, ExecutionError, MemoryBus, CPU};

/// Applies `op` to the accumulator or to the byte at the operand address.
///
/// `op` receives the old value and the incoming carry, and returns the new
/// value with the outgoing carry.
fn modify<M, F>(
    cpu: &mut CPU<M>,
    instruction: OpcodeMetadata,
    address: Option<u16>,
    op: F,
) -> Result<(), ExecutionError>
where
    M: MemoryBus,
    F: FnOnce(u8, bool) -> (u8, bool),
{
    let carry_in = cpu.status.carry;

    let result = if instruction.addressing_mode == AddressingMode::Accumulator {
        let (result, carry_out) = op(cpu.a, carry_in);
        cpu.a = result;
        cpu.status.carry = carry_out;
        result
    } else {
        let addr = require_address(cpu, instruction, address)?;
        let (result, carry_out) = op(cpu.memory.read(addr), carry_in);
        cpu.memory.write(addr, result);
        cpu.status.carry = carry_out;
        result
    };

    cpu.status.set_zn(result);
    Ok(())
}

/// Executes the ASL (Arithmetic Shift Left) instruction.
///
/// Bit 7 goes to C, bit 0 becomes 0.
pub(crate) fn execute_asl<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: OpcodeMetadata,
    address: Option<u16>,
) -> Result<(), ExecutionError> {
    modify(cpu, instruction, address, |value, _| {
        (value << 1, value & 0x80 != 0)
    })
}

/// Executes the LSR (Logical Shift Right) instruction.
///
/// Bit 0 goes to C, bit 7 becomes 0, so N always ends up clear.
pub(crate) fn execute_lsr<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: OpcodeMetadata,
    address: Option<u16>,
) -> Result<(), ExecutionError> {
    modify(cpu, instruction, address, |value, _| {
        (value >> 1, value & 0x01 != 0)
    })
}

/// Executes the ROL (Rotate Left) instruction.
///
/// Bit 7 goes to C, the old C enters bit 0.
pub(crate) fn execute_rol<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: OpcodeMetadata,
    address: Option<u16>,
) -> Result<(), ExecutionError> {
    modify(cpu, instruction, address, |value, carry| {
        ((value << 1) | carry as u8, value & 0x80 != 0)
    })
}

/// Executes the ROR (Rotate Right) instruction.
///
/// Bit 0 goes to C, the old C enters bit 7.
pub(crate) fn execute_ror<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: OpcodeMetadata,
    address: Option<u16>,
) -> Result<(), ExecutionError> {
    modify(cpu, instruction, address, |value, carry| {
        ((value >> 1) | ((carry as u8) << 7), value & 0x01 != 0)
    })
}
