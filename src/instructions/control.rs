//! # Control Flow Instructions
//!
//! This module implements control flow operations:
//! - JMP: Jump (absolute or indirect)
//! - JSR / RTS: Subroutine call and return
//! - BRK: Software interrupt
//! - RTI: Return from interrupt
//!
//! Every instruction here except BRK loads PC itself and suppresses the
//! automatic advance.

use super::require_address;
use crate::interrupts::Interrupt;
use crate::opcodes::OpcodeMetadata;
use crate::{ExecutionError, MemoryBus, CPU};

/// Executes the JMP (Jump) instruction.
///
/// The resolver already followed the pointer for indirect mode, so both forms
/// simply load the effective address into PC.
pub(crate) fn execute_jmp<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: OpcodeMetadata,
    address: Option<u16>,
) -> Result<(), ExecutionError> {
    let target = require_address(cpu, instruction, address)?;
    cpu.pc = target;
    cpu.stop_auto_increment();
    Ok(())
}

/// Executes the JSR (Jump to Subroutine) instruction.
///
/// Pushes the address of the last byte of the JSR (PC + 2), high byte first,
/// then jumps. RTS adds one to the popped value to resume after the call.
pub(crate) fn execute_jsr<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: OpcodeMetadata,
    address: Option<u16>,
) -> Result<(), ExecutionError> {
    let target = require_address(cpu, instruction, address)?;

    let return_address = cpu
        .pc
        .wrapping_add(instruction.size_bytes as u16)
        .wrapping_sub(1);
    cpu.push_word(return_address);

    cpu.pc = target;
    cpu.stop_auto_increment();
    Ok(())
}

/// Executes the RTS (Return from Subroutine) instruction.
pub(crate) fn execute_rts<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    let return_address = cpu.pop_word();
    cpu.pc = return_address.wrapping_add(1);
    cpu.stop_auto_increment();
    Ok(())
}

/// Executes the RTI (Return from Interrupt) instruction.
///
/// Pops the status byte (B and bit 5 discarded), then PC. Unlike RTS the
/// popped PC is used as is.
pub(crate) fn execute_rti<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    let status = cpu.pop_byte();
    cpu.status.load_byte(status);

    cpu.pc = cpu.pop_word();
    cpu.stop_auto_increment();
    Ok(())
}

/// Executes the BRK (Force Interrupt) instruction.
///
/// Only latches the request. PC advances past the opcode as usual, then the
/// engine services the interrupt: the pushed PC is the address after BRK and
/// the pushed status carries B = 1.
pub(crate) fn execute_brk<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.request_interrupt(Interrupt::Break);
    Ok(())
}
