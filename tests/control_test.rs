//! Tests for JMP, JSR and RTS.

use step6502::{FlatMemory, MemoryBus, CPU};

/// Helper function to create a CPU with reset vector at 0x8000
fn setup_cpu() -> CPU<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    let mut cpu = CPU::new(memory);
    cpu.reset();
    cpu
}

// ========== JMP ==========

#[test]
fn test_jmp_absolute() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().write(0x8000, 0x4C); // JMP $1234
    cpu.memory_mut().write_word(0x8001, 0x1234);

    cpu.step().unwrap();

    assert_eq!(cpu.pc(), 0x1234);
}

#[test]
fn test_jmp_indirect() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().write(0x8000, 0x6C); // JMP ($0300)
    cpu.memory_mut().write_word(0x8001, 0x0300);
    cpu.memory_mut().write_word(0x0300, 0xC0DE);

    cpu.step().unwrap();

    assert_eq!(cpu.pc(), 0xC0DE);
}

#[test]
fn test_jmp_indirect_pointer_crosses_page() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().write(0x8000, 0x6C); // JMP ($02FF)
    cpu.memory_mut().write_word(0x8001, 0x02FF);
    cpu.memory_mut().write(0x02FF, 0x34);
    cpu.memory_mut().write(0x0300, 0x12);
    cpu.memory_mut().write(0x0200, 0x56);

    cpu.step().unwrap();

    // The high byte comes from 0x0300, not from the start of page 0x02
    assert_eq!(cpu.pc(), 0x1234);
}

#[test]
fn test_jmp_to_self() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().write(0x8000, 0x4C); // JMP $8000
    cpu.memory_mut().write_word(0x8001, 0x8000);

    cpu.run_for_instructions(3).unwrap();

    assert_eq!(cpu.pc(), 0x8000);
}

// ========== JSR / RTS ==========

#[test]
fn test_jsr_pushes_last_byte_of_call() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().write(0x8000, 0x20); // JSR $9000
    cpu.memory_mut().write_word(0x8001, 0x9000);

    cpu.step().unwrap();

    assert_eq!(cpu.pc(), 0x9000);
    assert_eq!(cpu.sp(), 0xFB);
    // 0x8002, high byte pushed first
    assert_eq!(cpu.memory().read(0x01FD), 0x80);
    assert_eq!(cpu.memory().read(0x01FC), 0x02);
}

#[test]
fn test_rts_resumes_after_jsr() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().write(0x8000, 0x20); // JSR $9000
    cpu.memory_mut().write_word(0x8001, 0x9000);
    cpu.memory_mut().write(0x8003, 0xE8); // INX
    cpu.memory_mut().write(0x9000, 0xA9); // LDA #$07
    cpu.memory_mut().write(0x9001, 0x07);
    cpu.memory_mut().write(0x9002, 0x60); // RTS

    cpu.run_for_instructions(4).unwrap();

    assert_eq!(cpu.a(), 0x07);
    assert_eq!(cpu.x(), 0x01);
    assert_eq!(cpu.sp(), 0xFD);
    assert_eq!(cpu.pc(), 0x8004);
}

#[test]
fn test_nested_subroutines() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().write(0x8000, 0x20); // JSR $9000
    cpu.memory_mut().write_word(0x8001, 0x9000);
    cpu.memory_mut().write(0x9000, 0x20); // JSR $A000
    cpu.memory_mut().write_word(0x9001, 0xA000);
    cpu.memory_mut().write(0x9003, 0x60); // RTS
    cpu.memory_mut().write(0xA000, 0x60); // RTS

    cpu.run_for_instructions(2).unwrap();
    assert_eq!(cpu.sp(), 0xF9);

    cpu.run_for_instructions(2).unwrap();
    assert_eq!(cpu.pc(), 0x8003);
    assert_eq!(cpu.sp(), 0xFD);
}
