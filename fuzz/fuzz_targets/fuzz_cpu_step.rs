//! Fuzz target for CPU step execution.
//!
//! Builds an arbitrary register/flag state and memory contents, then runs a
//! short burst of instructions. Decode and not-implemented errors are expected
//! outcomes; a panic or an internal fault is a bug.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use step6502::{ExecutionError, FlatMemory, Interrupt, MemoryBus, CPU};

/// Arbitrary CPU initial state for fuzzing
#[derive(Debug, Arbitrary)]
struct FuzzCpuState {
    a: u8,
    x: u8,
    y: u8,
    sp: u8,
    /// Packed status byte, B and bit 5 ignored
    status: u8,
    /// Interrupt latched before the first step, if any
    interrupt: Option<FuzzInterrupt>,
}

#[derive(Debug, Clone, Copy, Arbitrary)]
enum FuzzInterrupt {
    Nmi,
    Irq,
    Reset,
}

/// Memory region for fuzzing
#[derive(Debug, Arbitrary)]
struct FuzzMemory {
    /// Bytes at the PC location (a few instructions worth)
    program: [u8; 16],
    /// Zero page contents
    zero_page: [u8; 256],
    /// Stack page contents
    stack_page: [u8; 256],
    /// Target of absolute and indirect operands
    main_memory: [u8; 256],
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    cpu_state: FuzzCpuState,
    memory: FuzzMemory,
    steps: u8,
}

fuzz_target!(|input: FuzzInput| {
    let mut memory = FlatMemory::new();

    // Vectors all point into the program
    memory.write_word(0xFFFA, 0x8000);
    memory.write_word(0xFFFC, 0x8000);
    memory.write_word(0xFFFE, 0x8000);

    memory
        .load_range(&input.memory.program, 0x8000, 0x800F)
        .unwrap();
    memory
        .load_range(&input.memory.zero_page, 0x0000, 0x00FF)
        .unwrap();
    memory
        .load_range(&input.memory.stack_page, 0x0100, 0x01FF)
        .unwrap();
    memory
        .load_range(&input.memory.main_memory, 0x4000, 0x40FF)
        .unwrap();

    let mut cpu = CPU::new(memory);
    cpu.set_pc(0x8000);
    cpu.set_a(input.cpu_state.a);
    cpu.set_x(input.cpu_state.x);
    cpu.set_y(input.cpu_state.y);
    cpu.set_sp(input.cpu_state.sp);
    cpu.set_status(step6502::Status::from_byte(input.cpu_state.status));

    if let Some(interrupt) = input.cpu_state.interrupt {
        cpu.request_interrupt(match interrupt {
            FuzzInterrupt::Nmi => Interrupt::Nmi,
            FuzzInterrupt::Irq => Interrupt::Irq,
            FuzzInterrupt::Reset => Interrupt::Reset,
        });
    }

    let steps = (input.steps % 32) as u64 + 1;
    match cpu.run_for_instructions(steps) {
        Ok(executed) => assert!(executed <= steps),
        Err(ExecutionError::InternalFault { message, .. }) => panic!("internal fault: {message}"),
        Err(_) => {}
    }

    // Register and flag state always survives a serialize round trip
    let status = cpu.status();
    assert_eq!(step6502::Status::from_byte(status.to_byte(false)), status);
});
