//! Property-based tests for CPU invariants.
//!
//! These tests use proptest to verify that CPU operations maintain
//! fundamental invariants across all possible input combinations.

use proptest::prelude::*;
use step6502::{
    bytes_to_word, word_to_bytes, FlatMemory, MemoryBus, Mnemonic, Status, CPU, OPCODE_TABLE,
};

/// Helper function to create a CPU with reset vector at 0x8000
fn setup_cpu() -> CPU<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    let mut cpu = CPU::new(memory);
    cpu.reset();
    cpu
}

/// Implemented opcodes that don't load PC or raise interrupts themselves
fn straight_line_opcodes() -> Vec<u8> {
    OPCODE_TABLE
        .iter()
        .flatten()
        .filter(|m| {
            m.implemented()
                && !matches!(
                    m.mnemonic,
                    Mnemonic::BCC
                        | Mnemonic::BCS
                        | Mnemonic::BEQ
                        | Mnemonic::BMI
                        | Mnemonic::BNE
                        | Mnemonic::BPL
                        | Mnemonic::BVC
                        | Mnemonic::BVS
                        | Mnemonic::JMP
                        | Mnemonic::JSR
                        | Mnemonic::RTS
                        | Mnemonic::RTI
                        | Mnemonic::BRK
                )
        })
        .map(|m| m.opcode)
        .collect()
}

fn arb_status() -> impl Strategy<Value = Status> {
    any::<[bool; 6]>().prop_map(|[negative, overflow, decimal, interrupt_disable, zero, carry]| {
        Status {
            negative,
            overflow,
            decimal,
            interrupt_disable,
            zero,
            carry,
        }
    })
}

proptest! {
    /// Property: packing then unpacking the status register is lossless
    #[test]
    fn prop_status_round_trip(status in arb_status(), break_flag in any::<bool>()) {
        let byte = status.to_byte(break_flag);

        prop_assert_eq!(Status::from_byte(byte), status);
        prop_assert_eq!(byte & 0x20, 0x20);
        prop_assert_eq!(byte & 0x10 != 0, break_flag);
    }

    /// Property: unpacking ignores the break and unused bits
    #[test]
    fn prop_status_ignores_bits_4_and_5(byte in any::<u8>()) {
        prop_assert_eq!(Status::from_byte(byte), Status::from_byte(byte ^ 0x30));
        prop_assert_eq!(Status::from_byte(byte).to_byte(false), (byte & !0x10) | 0x20);
    }

    /// Property: word <-> bytes conversion is lossless
    #[test]
    fn prop_word_round_trip(word in any::<u16>()) {
        prop_assert_eq!(bytes_to_word(word_to_bytes(word)), word);
        prop_assert_eq!(word_to_bytes(word)[0], word as u8);
    }

    /// Property: memory word writes read back at any address, wrapping at 0xFFFF
    #[test]
    fn prop_memory_word_round_trip(addr in any::<u16>(), word in any::<u16>()) {
        let mut memory = FlatMemory::new();
        memory.write_word(addr, word);

        prop_assert_eq!(memory.read_word(addr), word);
        prop_assert_eq!(memory.read(addr.wrapping_add(1)), (word >> 8) as u8);
    }

    /// Property: N pushes followed by N pops return the bytes in reverse order
    #[test]
    fn prop_stack_is_lifo(sp in any::<u8>(), values in prop::collection::vec(any::<u8>(), 1..=256)) {
        let mut cpu = setup_cpu();
        cpu.set_sp(sp);

        for &value in &values {
            cpu.push_byte(value);
        }

        let popped: Vec<u8> = (0..values.len()).map(|_| cpu.pop_byte()).collect();
        let mut expected = values.clone();
        expected.reverse();

        prop_assert_eq!(popped, expected);
        prop_assert_eq!(cpu.sp(), sp);
    }

    /// Property: the stack never leaves page 1
    #[test]
    fn prop_stack_stays_in_page_one(sp in any::<u8>(), value in any::<u8>()) {
        let mut cpu = setup_cpu();
        cpu.set_sp(sp);

        cpu.push_byte(value);

        prop_assert_eq!(cpu.memory().read(0x0100 | sp as u16), value);
        prop_assert_eq!(cpu.sp(), sp.wrapping_sub(1));
    }

    /// Property: word push/pop round-trips for any SP
    #[test]
    fn prop_stack_word_round_trip(sp in any::<u8>(), word in any::<u16>()) {
        let mut cpu = setup_cpu();
        cpu.set_sp(sp);

        cpu.push_word(word);
        prop_assert_eq!(cpu.pop_word(), word);
        prop_assert_eq!(cpu.sp(), sp);
    }

    /// Property: ADC matches 9-bit arithmetic for every A, M and carry
    #[test]
    fn prop_adc_matches_reference(a in any::<u8>(), m in any::<u8>(), carry in any::<bool>()) {
        let mut cpu = setup_cpu();
        cpu.memory_mut().write(0x8000, 0x69);
        cpu.memory_mut().write(0x8001, m);
        cpu.set_a(a);
        cpu.set_flag_c(carry);

        cpu.step().unwrap();

        let sum = a as u16 + m as u16 + carry as u16;
        let signed = a as i8 as i16 + m as i8 as i16 + carry as i16;
        prop_assert_eq!(cpu.a(), sum as u8);
        prop_assert_eq!(cpu.flag_c(), sum > 0xFF);
        prop_assert_eq!(cpu.flag_v(), !(-128..=127).contains(&signed));
        prop_assert_eq!(cpu.flag_z(), sum as u8 == 0);
        prop_assert_eq!(cpu.flag_n(), sum & 0x80 != 0);
    }

    /// Property: SBC matches borrow arithmetic for every A, M and carry
    #[test]
    fn prop_sbc_matches_reference(a in any::<u8>(), m in any::<u8>(), carry in any::<bool>()) {
        let mut cpu = setup_cpu();
        cpu.memory_mut().write(0x8000, 0xE9);
        cpu.memory_mut().write(0x8001, m);
        cpu.set_a(a);
        cpu.set_flag_c(carry);

        cpu.step().unwrap();

        let borrow = !carry as i16;
        let diff = a as i16 - m as i16 - borrow;
        let signed = a as i8 as i16 - m as i8 as i16 - borrow;
        prop_assert_eq!(cpu.a(), diff as u8);
        prop_assert_eq!(cpu.flag_c(), diff >= 0);
        prop_assert_eq!(cpu.flag_v(), !(-128..=127).contains(&signed));
    }

    /// Property: CMP sets C iff A >= M and Z iff A == M
    #[test]
    fn prop_cmp_flags(a in any::<u8>(), m in any::<u8>()) {
        let mut cpu = setup_cpu();
        cpu.memory_mut().write(0x8000, 0xC9);
        cpu.memory_mut().write(0x8001, m);
        cpu.set_a(a);

        cpu.step().unwrap();

        prop_assert_eq!(cpu.flag_c(), a >= m);
        prop_assert_eq!(cpu.flag_z(), a == m);
        prop_assert_eq!(cpu.flag_n(), a.wrapping_sub(m) & 0x80 != 0);
        prop_assert_eq!(cpu.a(), a);
    }

    /// Property: straight-line instructions advance PC by exactly their size
    #[test]
    fn prop_pc_advances_by_size(
        index in 0usize..1000,
        operand in any::<[u8; 2]>(),
        a in any::<u8>(),
        x in any::<u8>(),
        y in any::<u8>(),
    ) {
        let opcodes = straight_line_opcodes();
        let opcode = opcodes[index % opcodes.len()];
        let metadata = OPCODE_TABLE[opcode as usize].unwrap();

        let mut cpu = setup_cpu();
        cpu.memory_mut().write(0x8000, opcode);
        cpu.memory_mut().write(0x8001, operand[0]);
        cpu.memory_mut().write(0x8002, operand[1]);
        cpu.set_a(a);
        cpu.set_x(x);
        cpu.set_y(y);

        cpu.step().unwrap();

        prop_assert_eq!(cpu.pc(), 0x8000 + metadata.size_bytes as u16);
    }
}
