//! # CPU State and Execution
//!
//! This module contains the CPU struct representing the 6502 processor state and
//! the fetch-decode-execute-interrupt loop.
//!
//! ## CPU State
//!
//! The CPU maintains:
//! - **Registers**: Accumulator (A), index registers (X, Y)
//! - **Program counter** (PC): 16-bit address of next instruction
//! - **Stack pointer** (SP): 8-bit offset into stack page (0x0100-0x01FF)
//! - **Status flags**: N, V, D, I, Z, C (see [`Status`])
//! - **Pending interrupt**: at most one latched request
//! - **Observers**: hooks notified after every instruction
//!
//! ## Execution Model
//!
//! Instructions are indivisible steps; there is no cycle timing. Each step:
//!
//! 1. Fetch the opcode at PC
//! 2. Decode it through [`OPCODE_TABLE`](crate::OPCODE_TABLE) (fatal if absent)
//! 3. Resolve the effective address, unless the mode is implied/accumulator
//! 4. Execute the handler (fatal on error)
//! 5. Advance PC by the instruction size, unless the handler took control of PC
//! 6. Notify observers in registration order
//! 7. Service the latched interrupt, if any
//!
//! Hosts drive the CPU through:
//! - `start_emulation()`: synthesize a reset, then loop until stopped
//! - `start_at_address()`: set PC directly, then loop until stopped
//! - `step()` / `run_for_instructions()`: bounded execution without the stop loop

use std::panic::{self, AssertUnwindSafe};

use crate::addressing;
use crate::instructions;
use crate::interrupts::Interrupt;
use crate::observer::{CpuView, Observer, RunControl};
use crate::opcodes::{decode, OpcodeMetadata};
use crate::{AddressingMode, ExecutionError, MemoryBus, Status};

/// Base address of the stack page.
const STACK_PAGE: u16 = 0x0100;

/// 6502 CPU state and execution context.
///
/// The CPU exclusively owns its memory, registers, status flags and observers.
/// It is generic over the memory implementation via the `MemoryBus` trait.
///
/// # Examples
///
/// ```
/// use step6502::{CPU, FlatMemory, MemoryBus};
///
/// let mut memory = FlatMemory::new();
/// memory.write(0x0200, 0xA9); // LDA #$05
/// memory.write(0x0201, 0x05);
/// memory.write(0x0202, 0x69); // ADC #$03
/// memory.write(0x0203, 0x03);
///
/// let mut cpu = CPU::new(memory);
/// cpu.set_pc(0x0200);
/// cpu.run_for_instructions(2).unwrap();
///
/// assert_eq!(cpu.a(), 0x08);
/// assert_eq!(cpu.pc(), 0x0204);
/// ```
pub struct CPU<M: MemoryBus> {
    /// Accumulator register
    pub(crate) a: u8,

    /// X index register
    pub(crate) x: u8,

    /// Y index register
    pub(crate) y: u8,

    /// Program counter (address of next instruction)
    pub(crate) pc: u16,

    /// Stack pointer (0x0100 | sp gives full stack address)
    pub(crate) sp: u8,

    /// Processor status flags
    pub(crate) status: Status,

    /// Memory bus implementation
    pub(crate) memory: M,

    /// Instruction being (or last) executed
    current_instruction: Option<OpcodeMetadata>,

    /// Opcode byte of the last fetch, kept for fault diagnostics
    last_opcode: u8,

    /// Latched interrupt request, serviced after the current instruction
    pending_interrupt: Option<Interrupt>,

    /// Set by handlers that load PC themselves (branches, jumps, returns)
    suppress_pc_increment: bool,

    /// Checked at the top of each emulation loop iteration
    stop_requested: bool,

    /// Total instructions completed
    instructions_executed: u64,

    observers: Vec<Box<dyn Observer<M>>>,
}

impl<M: MemoryBus> CPU<M> {
    /// Creates a new CPU that owns `memory`.
    ///
    /// Registers start zeroed, SP at 0xFD and all flags clear. PC is zero until
    /// a run entry point sets it: `start_emulation()` loads the reset vector,
    /// `start_at_address()` uses the given address.
    pub fn new(memory: M) -> Self {
        Self {
            a: 0x00,
            x: 0x00,
            y: 0x00,
            pc: 0x0000,
            sp: 0xFD,
            status: Status::default(),
            memory,
            current_instruction: None,
            last_opcode: 0x00,
            pending_interrupt: None,
            suppress_pc_increment: false,
            stop_requested: false,
            instructions_executed: 0,
            observers: Vec::new(),
        }
    }

    // ========== Observers ==========

    /// Registers observers, notified after every instruction in registration order.
    pub fn register_observers<I>(&mut self, observers: I)
    where
        I: IntoIterator<Item = Box<dyn Observer<M>>>,
    {
        self.observers.extend(observers);
    }

    /// Registers a single observer.
    pub fn register_observer(&mut self, observer: Box<dyn Observer<M>>) {
        self.observers.push(observer);
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn notify_observers(&mut self) {
        if self.observers.is_empty() {
            return;
        }

        let view = CpuView {
            a: self.a,
            x: self.x,
            y: self.y,
            sp: self.sp,
            pc: self.pc,
            status: self.status,
            instruction: self.current_instruction,
            instructions_executed: self.instructions_executed,
            memory: &self.memory,
        };
        let mut control = RunControl::default();

        for observer in self.observers.iter_mut() {
            observer.after_execution(&view, &mut control);
        }

        if control.stop_requested() {
            self.stop_requested = true;
        }
    }

    // ========== Run Control ==========

    /// Triggers a reset, then runs until stopped or until an error occurs.
    pub fn start_emulation(&mut self) -> Result<(), ExecutionError> {
        self.reset();

        self.emulation_loop()
    }

    /// Services a reset immediately: PC is loaded from 0xFFFC, I is set and
    /// any other pending request is discarded. Nothing is pushed.
    pub fn reset(&mut self) {
        self.pending_interrupt = Some(Interrupt::Reset);
        self.handle_interrupts();
    }

    /// Sets PC to `start_address` without a reset, then runs until stopped or
    /// until an error occurs.
    pub fn start_at_address(&mut self, start_address: u16) -> Result<(), ExecutionError> {
        self.pc = start_address;

        self.emulation_loop()
    }

    /// Requests the emulation loop to stop before the next fetch.
    pub fn stop_emulation(&mut self) {
        self.stop_requested = true;
    }

    /// Whether a stop has been requested and not yet consumed by a new run.
    pub fn is_stopped(&self) -> bool {
        self.stop_requested
    }

    /// Prevents the current instruction's size from being added to PC.
    ///
    /// Used by handlers that load PC themselves. Applies to the current
    /// instruction only.
    pub fn stop_auto_increment(&mut self) {
        self.suppress_pc_increment = true;
    }

    fn emulation_loop(&mut self) -> Result<(), ExecutionError> {
        self.suppress_pc_increment = false;
        self.stop_requested = false;

        log::debug!(
            "emulation started at 0x{:04X} with {} observer(s)",
            self.pc,
            self.observers.len()
        );

        while !self.stop_requested {
            if let Err(err) = self.guarded_step() {
                log::warn!("emulation stopped: {}", err);
                return Err(err);
            }
        }

        log::debug!(
            "emulation stopped at 0x{:04X} after {} instructions",
            self.pc,
            self.instructions_executed
        );
        Ok(())
    }

    /// Runs one step behind a fault barrier that turns panics into
    /// `ExecutionError::InternalFault`, leaving the CPU inspectable.
    fn guarded_step(&mut self) -> Result<(), ExecutionError> {
        let pc = self.pc;

        match panic::catch_unwind(AssertUnwindSafe(|| self.step())) {
            Ok(result) => result,
            Err(payload) => {
                let message = if let Some(text) = payload.downcast_ref::<&str>() {
                    (*text).to_string()
                } else if let Some(text) = payload.downcast_ref::<String>() {
                    text.clone()
                } else {
                    "unknown panic payload".to_string()
                };

                Err(ExecutionError::InternalFault {
                    opcode: self.last_opcode,
                    pc,
                    message,
                })
            }
        }
    }

    /// Executes one instruction and services any interrupt it latched.
    ///
    /// Returns an error without touching registers or memory if the opcode does
    /// not decode, and an error if the decoded instruction has no handler.
    ///
    /// # Examples
    ///
    /// ```
    /// use step6502::{CPU, FlatMemory, MemoryBus, ExecutionError};
    ///
    /// let mut mem = FlatMemory::new();
    /// mem.write(0x8000, 0x02); // undocumented opcode
    ///
    /// let mut cpu = CPU::new(mem);
    /// cpu.set_pc(0x8000);
    ///
    /// assert_eq!(
    ///     cpu.step(),
    ///     Err(ExecutionError::Decode { opcode: 0x02, pc: 0x8000 })
    /// );
    /// assert_eq!(cpu.pc(), 0x8000);
    /// ```
    pub fn step(&mut self) -> Result<(), ExecutionError> {
        // Fetch
        let pc = self.pc;
        let opcode = self.memory.read(pc);
        self.last_opcode = opcode;

        // Decode
        let instruction = decode(opcode).ok_or(ExecutionError::Decode { opcode, pc })?;
        self.current_instruction = Some(instruction);

        // Execute
        self.execute_instruction(instruction)?;
        self.instructions_executed += 1;

        log::trace!(
            "0x{:04X}: {} {:?} -> PC=0x{:04X} A=0x{:02X} X=0x{:02X} Y=0x{:02X} SP=0x{:02X} P=0x{:02X}",
            pc,
            instruction.mnemonic,
            instruction.addressing_mode,
            self.pc,
            self.a,
            self.x,
            self.y,
            self.sp,
            self.status.to_byte(false)
        );

        self.notify_observers();

        // Hardware IRQ line from the bus
        if self.memory.irq_active() {
            self.request_interrupt(Interrupt::Irq);
        }

        self.handle_interrupts();

        Ok(())
    }

    /// Executes up to `count` instructions, stopping early on error.
    ///
    /// Returns the number of instructions executed. Observers still run and may
    /// end the batch early by requesting a stop.
    pub fn run_for_instructions(&mut self, count: u64) -> Result<u64, ExecutionError> {
        self.stop_requested = false;

        let mut executed = 0;
        while executed < count && !self.stop_requested {
            self.guarded_step()?;
            executed += 1;
        }

        Ok(executed)
    }

    fn execute_instruction(&mut self, instruction: OpcodeMetadata) -> Result<(), ExecutionError> {
        let address = self.effective_address(instruction.addressing_mode);

        instructions::execute(self, instruction, address)?;

        if self.suppress_pc_increment {
            self.suppress_pc_increment = false;
        } else {
            self.pc = self.pc.wrapping_add(instruction.size_bytes as u16);
        }

        Ok(())
    }

    /// Computes the effective address of `mode` for the instruction at PC.
    ///
    /// Returns `None` for implied and accumulator modes.
    pub fn effective_address(&self, mode: AddressingMode) -> Option<u16> {
        addressing::resolve(mode, self.pc, self.x, self.y, &self.memory)
    }

    // ========== Interrupts ==========

    /// Latches an interrupt request to be serviced after the current instruction.
    ///
    /// Only one request is tracked; if another is already pending the new one
    /// is dropped and `false` is returned.
    pub fn request_interrupt(&mut self, interrupt: Interrupt) -> bool {
        if self.pending_interrupt.is_some() {
            log::debug!(
                "{:?} dropped, {:?} already pending",
                interrupt,
                self.pending_interrupt
            );
            return false;
        }

        self.pending_interrupt = Some(interrupt);
        true
    }

    /// The interrupt waiting to be serviced, if any.
    pub fn pending_interrupt(&self) -> Option<Interrupt> {
        self.pending_interrupt
    }

    /// Reads the handler address stored in the vector for `interrupt`.
    pub fn interrupt_vector(&self, interrupt: Interrupt) -> u16 {
        self.memory.read_word(interrupt.vector())
    }

    /// Services the pending interrupt, if there is one.
    ///
    /// Every interrupt but RST pushes PC and then the status byte (B set only
    /// for BRK). All of them set the I flag, load PC from their vector and
    /// clear the latch. An IRQ pending while the I flag is set is discarded.
    pub fn handle_interrupts(&mut self) {
        let Some(interrupt) = self.pending_interrupt.take() else {
            return;
        };

        if interrupt == Interrupt::Irq && self.status.interrupt_disable {
            log::trace!("IRQ masked at 0x{:04X}", self.pc);
            return;
        }

        if interrupt.saves_state() {
            self.push_word(self.pc);
            self.push_byte(self.status.to_byte(interrupt.break_flag()));
        }

        let vector = self.interrupt_vector(interrupt);
        log::debug!(
            "servicing {:?} at 0x{:04X}, jumping to 0x{:04X}",
            interrupt,
            self.pc,
            vector
        );

        self.status.interrupt_disable = true;
        self.pc = vector;
    }

    // ========== Stack ==========

    /// Pushes a byte: write to 0x0100 | SP, then decrement SP (wrapping).
    pub fn push_byte(&mut self, value: u8) {
        self.memory.write(STACK_PAGE | self.sp as u16, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    /// Pops a byte: increment SP (wrapping), then read 0x0100 | SP.
    pub fn pop_byte(&mut self) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        self.memory.read(STACK_PAGE | self.sp as u16)
    }

    /// Pushes a word, high byte first, so it sits little-endian in memory.
    pub fn push_word(&mut self, value: u16) {
        let [low, high] = value.to_le_bytes();
        self.push_byte(high);
        self.push_byte(low);
    }

    /// Pops a word pushed by `push_word`.
    pub fn pop_word(&mut self) -> u16 {
        let low = self.pop_byte();
        let high = self.pop_byte();
        u16::from_le_bytes([low, high])
    }

    // ========== Register Getters ==========

    /// Returns the accumulator register value.
    pub fn a(&self) -> u8 {
        self.a
    }

    /// Returns the X index register value.
    pub fn x(&self) -> u8 {
        self.x
    }

    /// Returns the Y index register value.
    pub fn y(&self) -> u8 {
        self.y
    }

    /// Returns the program counter value.
    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Returns the stack pointer value.
    ///
    /// Note: The full stack address is 0x0100 | SP. The stack grows downward from 0x01FF.
    pub fn sp(&self) -> u8 {
        self.sp
    }

    /// Returns the status flags.
    pub fn status(&self) -> Status {
        self.status
    }

    /// The instruction being executed, or the last one executed.
    pub fn current_instruction(&self) -> Option<OpcodeMetadata> {
        self.current_instruction
    }

    /// Total instructions completed since creation.
    pub fn instructions_executed(&self) -> u64 {
        self.instructions_executed
    }

    /// Shared access to memory.
    pub fn memory(&self) -> &M {
        &self.memory
    }

    /// Mutable access to memory, for hosts loading images or poking values.
    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    // ========== Status Flag Getters ==========

    /// Returns true if the Negative flag is set.
    pub fn flag_n(&self) -> bool {
        self.status.negative
    }

    /// Returns true if the Overflow flag is set.
    pub fn flag_v(&self) -> bool {
        self.status.overflow
    }

    /// Returns true if the Decimal mode flag is set.
    pub fn flag_d(&self) -> bool {
        self.status.decimal
    }

    /// Returns true if the Interrupt Disable flag is set.
    pub fn flag_i(&self) -> bool {
        self.status.interrupt_disable
    }

    /// Returns true if the Zero flag is set.
    pub fn flag_z(&self) -> bool {
        self.status.zero
    }

    /// Returns true if the Carry flag is set.
    pub fn flag_c(&self) -> bool {
        self.status.carry
    }

    // ========== Setters ==========

    /// Sets the accumulator.
    pub fn set_a(&mut self, value: u8) {
        self.a = value;
    }

    /// Sets the X index register.
    pub fn set_x(&mut self, value: u8) {
        self.x = value;
    }

    /// Sets the Y index register.
    pub fn set_y(&mut self, value: u8) {
        self.y = value;
    }

    /// Sets the program counter.
    pub fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    /// Sets the stack pointer (offset into page 1).
    pub fn set_sp(&mut self, value: u8) {
        self.sp = value;
    }

    /// Replaces all six status flags.
    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    /// Sets or clears the Negative flag.
    pub fn set_flag_n(&mut self, value: bool) {
        self.status.negative = value;
    }

    /// Sets or clears the Overflow flag.
    pub fn set_flag_v(&mut self, value: bool) {
        self.status.overflow = value;
    }

    /// Sets or clears the Decimal mode flag.
    pub fn set_flag_d(&mut self, value: bool) {
        self.status.decimal = value;
    }

    /// Sets or clears the Interrupt Disable flag.
    pub fn set_flag_i(&mut self, value: bool) {
        self.status.interrupt_disable = value;
    }

    /// Sets or clears the Zero flag.
    pub fn set_flag_z(&mut self, value: bool) {
        self.status.zero = value;
    }

    /// Sets or clears the Carry flag.
    pub fn set_flag_c(&mut self, value: bool) {
        self.status.carry = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FlatMemory;

    fn setup_cpu() -> CPU<FlatMemory> {
        let mut cpu = CPU::new(FlatMemory::new());
        cpu.set_pc(0x8000);
        cpu
    }

    #[test]
    fn test_cpu_initialization() {
        let cpu = CPU::new(FlatMemory::new());

        assert_eq!(cpu.pc(), 0x0000);
        assert_eq!(cpu.sp(), 0xFD);
        assert_eq!(cpu.a(), 0x00);
        assert_eq!(cpu.x(), 0x00);
        assert_eq!(cpu.y(), 0x00);
        assert_eq!(cpu.status(), Status::default());
        assert_eq!(cpu.pending_interrupt(), None);
        assert_eq!(cpu.current_instruction(), None);
    }

    #[test]
    fn test_push_pop_byte() {
        let mut cpu = setup_cpu();
        cpu.set_sp(0xFF);

        cpu.push_byte(0x42);
        assert_eq!(cpu.memory().read(0x01FF), 0x42);
        assert_eq!(cpu.sp(), 0xFE);

        assert_eq!(cpu.pop_byte(), 0x42);
        assert_eq!(cpu.sp(), 0xFF);
    }

    #[test]
    fn test_stack_pointer_wraps() {
        let mut cpu = setup_cpu();
        cpu.set_sp(0x00);

        cpu.push_byte(0x11);
        assert_eq!(cpu.memory().read(0x0100), 0x11);
        assert_eq!(cpu.sp(), 0xFF);

        assert_eq!(cpu.pop_byte(), 0x11);
        assert_eq!(cpu.sp(), 0x00);
    }

    #[test]
    fn test_push_word_is_little_endian_in_memory() {
        let mut cpu = setup_cpu();
        cpu.set_sp(0xFF);

        cpu.push_word(0x1234);
        assert_eq!(cpu.memory().read(0x01FF), 0x12);
        assert_eq!(cpu.memory().read(0x01FE), 0x34);
        assert_eq!(cpu.memory().read_word(0x01FE), 0x1234);

        assert_eq!(cpu.pop_word(), 0x1234);
        assert_eq!(cpu.sp(), 0xFF);
    }

    #[test]
    fn test_interrupt_vector_lookup() {
        for interrupt in [Interrupt::Nmi, Interrupt::Reset, Interrupt::Irq] {
            let mut cpu = setup_cpu();
            cpu.memory_mut().write_word(interrupt.vector(), 0x9559);
            assert_eq!(cpu.interrupt_vector(interrupt), 0x9559);
        }
    }

    #[test]
    fn test_second_interrupt_request_is_dropped() {
        let mut cpu = setup_cpu();

        assert!(cpu.request_interrupt(Interrupt::Nmi));
        assert!(!cpu.request_interrupt(Interrupt::Irq));
        assert_eq!(cpu.pending_interrupt(), Some(Interrupt::Nmi));
    }

    #[test]
    fn test_reset_skips_stack() {
        let mut cpu = setup_cpu();
        cpu.memory_mut().write_word(0xFFFC, 0xC000);

        cpu.request_interrupt(Interrupt::Reset);
        cpu.handle_interrupts();

        assert_eq!(cpu.pc(), 0xC000);
        assert_eq!(cpu.sp(), 0xFD);
        assert!(cpu.flag_i());
        assert_eq!(cpu.pending_interrupt(), None);
    }

    #[test]
    fn test_nmi_pushes_status_without_break_bit() {
        let mut cpu = setup_cpu();
        cpu.memory_mut().write_word(0xFFFA, 0xA000);
        cpu.set_flag_c(true);

        cpu.request_interrupt(Interrupt::Nmi);
        cpu.handle_interrupts();

        assert_eq!(cpu.pc(), 0xA000);
        assert_eq!(cpu.memory().read(0x01FB), 0x21);
        assert_eq!(cpu.memory().read_word(0x01FC), 0x8000);
    }

    #[test]
    fn test_masked_irq_is_discarded() {
        let mut cpu = setup_cpu();
        cpu.set_flag_i(true);

        cpu.request_interrupt(Interrupt::Irq);
        cpu.handle_interrupts();

        assert_eq!(cpu.pc(), 0x8000);
        assert_eq!(cpu.sp(), 0xFD);
        assert_eq!(cpu.pending_interrupt(), None);
    }

    #[test]
    fn test_stop_auto_increment_applies_once() {
        let mut cpu = setup_cpu();
        cpu.memory_mut().write(0x8000, 0xEA); // NOP
        cpu.memory_mut().write(0x8001, 0xEA); // NOP

        cpu.stop_auto_increment();
        cpu.step().unwrap();
        assert_eq!(cpu.pc(), 0x8000);

        cpu.step().unwrap();
        assert_eq!(cpu.pc(), 0x8001);
    }
}
