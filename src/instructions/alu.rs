//! # ALU (Arithmetic Logic Unit) Instructions
//!
//! This module implements arithmetic and logical operations:
//! - ADC: Add with Carry
//! - SBC: Subtract with Carry
//! - AND, ORA, EOR: Logical operations on the accumulator
//! - CMP, CPX, CPY: Compare register with memory
//!
//! The decimal flag is tracked but ignored: ADC and SBC always work in binary.

use super::read_operand;
use crate::opcodes::OpcodeMetadata;
use crate::{ExecutionError, MemoryBus, CPU};

/// Binary addition of `value` and the carry flag into the accumulator.
///
/// Shared by ADC and SBC, since SBC is ADC of the one's complement.
fn add_with_carry<M: MemoryBus>(cpu: &mut CPU<M>, value: u8) {
    let a = cpu.a;
    let carry_in = cpu.status.carry as u16;

    // 16-bit intermediate so bit 8 becomes the carry
    let result16 = a as u16 + value as u16 + carry_in;
    let result = result16 as u8;

    cpu.status.carry = result16 > 0xFF;

    // Overflow: both operands had the same sign and the result has the other one
    cpu.status.overflow = ((a ^ result) & (value ^ result) & 0x80) != 0;

    cpu.status.set_zn(result);
    cpu.a = result;
}

/// Executes the ADC (Add with Carry) instruction.
///
/// A = A + M + C. Updates N, V, Z and C.
pub(crate) fn execute_adc<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: OpcodeMetadata,
    address: Option<u16>,
) -> Result<(), ExecutionError> {
    let value = read_operand(cpu, instruction, address)?;
    add_with_carry(cpu, value);
    Ok(())
}

/// Executes the SBC (Subtract with Carry) instruction.
///
/// A = A - M - (1 - C). Carry is set when no borrow occurred.
pub(crate) fn execute_sbc<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: OpcodeMetadata,
    address: Option<u16>,
) -> Result<(), ExecutionError> {
    let value = read_operand(cpu, instruction, address)?;
    add_with_carry(cpu, !value);
    Ok(())
}

/// Executes the AND (Logical AND) instruction.
pub(crate) fn execute_and<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: OpcodeMetadata,
    address: Option<u16>,
) -> Result<(), ExecutionError> {
    let value = read_operand(cpu, instruction, address)?;
    cpu.a &= value;
    cpu.status.set_zn(cpu.a);
    Ok(())
}

/// Executes the ORA (Logical Inclusive OR) instruction.
pub(crate) fn execute_ora<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: OpcodeMetadata,
    address: Option<u16>,
) -> Result<(), ExecutionError> {
    let value = read_operand(cpu, instruction, address)?;
    cpu.a |= value;
    cpu.status.set_zn(cpu.a);
    Ok(())
}

/// Executes the EOR (Exclusive OR) instruction.
pub(crate) fn execute_eor<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: OpcodeMetadata,
    address: Option<u16>,
) -> Result<(), ExecutionError> {
    let value = read_operand(cpu, instruction, address)?;
    cpu.a ^= value;
    cpu.status.set_zn(cpu.a);
    Ok(())
}

/// Subtracts `value` from `register` without storing the result.
///
/// - C: set if register >= value (no borrow)
/// - Z: set if register == value
/// - N: bit 7 of the 8-bit difference
fn compare<M: MemoryBus>(cpu: &mut CPU<M>, register: u8, value: u8) {
    let result = register.wrapping_sub(value);
    cpu.status.carry = register >= value;
    cpu.status.set_zn(result);
}

/// Executes the CMP (Compare Accumulator) instruction.
pub(crate) fn execute_cmp<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: OpcodeMetadata,
    address: Option<u16>,
) -> Result<(), ExecutionError> {
    let value = read_operand(cpu, instruction, address)?;
    let register = cpu.a;
    compare(cpu, register, value);
    Ok(())
}

/// Executes the CPX (Compare X Register) instruction.
pub(crate) fn execute_cpx<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: OpcodeMetadata,
    address: Option<u16>,
) -> Result<(), ExecutionError> {
    let value = read_operand(cpu, instruction, address)?;
    let register = cpu.x;
    compare(cpu, register, value);
    Ok(())
}

/// Executes the CPY (Compare Y Register) instruction.
pub(crate) fn execute_cpy<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: OpcodeMetadata,
    address: Option<u16>,
) -> Result<(), ExecutionError> {
    let value = read_operand(cpu, instruction, address)?;
    let register = cpu.y;
    compare(cpu, register, value);
    Ok(())
}
