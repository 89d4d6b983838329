//! # Flag Instructions
//!
//! Direct set/clear of a single status flag. There is no SEV on the 6502.

use crate::{ExecutionError, MemoryBus, CPU};

/// Executes the CLC (Clear Carry Flag) instruction.
pub(crate) fn execute_clc<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.status.carry = false;
    Ok(())
}

/// Executes the SEC (Set Carry Flag) instruction.
pub(crate) fn execute_sec<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.status.carry = true;
    Ok(())
}

/// Executes the CLI (Clear Interrupt Disable) instruction.
pub(crate) fn execute_cli<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.status.interrupt_disable = false;
    Ok(())
}

/// Executes the SEI (Set Interrupt Disable) instruction.
pub(crate) fn execute_sei<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.status.interrupt_disable = true;
    Ok(())
}

/// Executes the CLD (Clear Decimal Mode) instruction.
pub(crate) fn execute_cld<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.status.decimal = false;
    Ok(())
}

/// Executes the SED (Set Decimal Mode) instruction.
pub(crate) fn execute_sed<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.status.decimal = true;
    Ok(())
}

/// Executes the CLV (Clear Overflow Flag) instruction.
pub(crate) fn execute_clv<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.status.overflow = false;
    Ok(())
}
