//! # Register Transfer Instructions
//!
//! TAX, TAY, TXA, TYA and TSX copy one register into another and update Z and N.
//! TXS copies X into the stack pointer and leaves the flags alone.

use crate::{ExecutionError, MemoryBus, CPU};

/// Executes the TAX (Transfer Accumulator to X) instruction.
pub(crate) fn execute_tax<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.x = cpu.a;
    cpu.status.set_zn(cpu.x);
    Ok(())
}

/// Executes the TAY (Transfer Accumulator to Y) instruction.
pub(crate) fn execute_tay<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.y = cpu.a;
    cpu.status.set_zn(cpu.y);
    Ok(())
}

/// Executes the TXA (Transfer X to Accumulator) instruction.
pub(crate) fn execute_txa<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.a = cpu.x;
    cpu.status.set_zn(cpu.a);
    Ok(())
}

/// Executes the TYA (Transfer Y to Accumulator) instruction.
pub(crate) fn execute_tya<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.a = cpu.y;
    cpu.status.set_zn(cpu.a);
    Ok(())
}

/// Executes the TSX (Transfer Stack Pointer to X) instruction.
pub(crate) fn execute_tsx<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.x = cpu.sp;
    cpu.status.set_zn(cpu.x);
    Ok(())
}

/// Executes the TXS (Transfer X to Stack Pointer) instruction.
pub(crate) fn execute_txs<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.sp = cpu.x;
    Ok(())
}
