//! # Addressing Modes
//!
//! This module defines the addressing modes supported by the 6502 processor and
//! the resolver that turns a mode into an effective address.
//!
//! Resolution returns the address an instruction operates on, never the value.
//! Immediate mode resolves to `PC + 1`, where the operand byte itself sits.

use crate::memory::MemoryBus;

/// 6502 addressing mode enumeration.
///
/// # Operand Sizes
///
/// - **0 bytes**: Implicit, Accumulator
/// - **1 byte**: Immediate, ZeroPage, ZeroPageX, ZeroPageY, Relative, IndirectX, IndirectY
/// - **2 bytes**: Absolute, AbsoluteX, AbsoluteY, Indirect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    /// No operand, operation implied by instruction.
    ///
    /// Examples: CLC, RTS, NOP
    Implicit,

    /// Operates directly on the accumulator register.
    ///
    /// Examples: LSR A, ROL A, ASL A
    Accumulator,

    /// 8-bit constant operand in instruction.
    ///
    /// Example: LDA #$10
    Immediate,

    /// 8-bit address in zero page (0x00-0xFF).
    ///
    /// Example: LDA $80
    ZeroPage,

    /// Zero page address indexed by X register, wraps within zero page.
    ///
    /// Example: LDA $80,X
    ZeroPageX,

    /// Zero page address indexed by Y register, wraps within zero page.
    ///
    /// Example: LDX $80,Y
    ZeroPageY,

    /// Signed 8-bit offset for branch instructions, relative to the next instruction.
    ///
    /// Example: BEQ label
    Relative,

    /// Full 16-bit address.
    ///
    /// Example: JMP $1234
    Absolute,

    /// 16-bit address indexed by X register, carry propagates into the high byte.
    ///
    /// Example: LDA $1234,X
    AbsoluteX,

    /// 16-bit address indexed by Y register, carry propagates into the high byte.
    ///
    /// Example: LDA $1234,Y
    AbsoluteY,

    /// Indirect jump through 16-bit pointer.
    ///
    /// Example: JMP ($FFFC)
    Indirect,

    /// Indexed indirect: (ZP + X) then dereference.
    ///
    /// Example: LDA ($40,X)
    IndirectX,

    /// Indirect indexed: ZP dereference then + Y.
    ///
    /// Example: LDA ($40),Y
    IndirectY,
}

impl AddressingMode {
    /// Total instruction size in bytes for this mode, opcode included.
    pub const fn instruction_size(self) -> u8 {
        match self {
            AddressingMode::Implicit | AddressingMode::Accumulator => 1,
            AddressingMode::Immediate
            | AddressingMode::ZeroPage
            | AddressingMode::ZeroPageX
            | AddressingMode::ZeroPageY
            | AddressingMode::Relative
            | AddressingMode::IndirectX
            | AddressingMode::IndirectY => 2,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 3,
        }
    }

    /// Returns false for the modes that have no operand address.
    pub const fn resolves_address(self) -> bool {
        !matches!(
            self,
            AddressingMode::Implicit | AddressingMode::Accumulator
        )
    }
}

/// Builds a zero page address from a single byte.
fn zero_page(addr: u8) -> u16 {
    addr as u16
}

/// Computes the effective address for `mode` with the instruction at `pc`.
///
/// Returns `None` for Implicit and Accumulator modes. Reads go through the
/// bus, so every resolution is total over the 16-bit address space.
///
/// # Examples
///
/// ```
/// use step6502::{AddressingMode, FlatMemory, MemoryBus};
/// use step6502::addressing::resolve;
///
/// let mut mem = FlatMemory::new();
/// mem.write(0x1001, 0xFE); // branch offset -2
///
/// let target = resolve(AddressingMode::Relative, 0x1000, 0, 0, &mem);
/// assert_eq!(target, Some(0x1000));
/// ```
pub fn resolve<M: MemoryBus>(mode: AddressingMode, pc: u16, x: u8, y: u8, memory: &M) -> Option<u16> {
    let operand = pc.wrapping_add(1);

    let addr = match mode {
        AddressingMode::Implicit | AddressingMode::Accumulator => return None,

        // Operand byte sits right after the opcode
        AddressingMode::Immediate => operand,

        AddressingMode::ZeroPage => zero_page(memory.read(operand)),

        // Index carry is discarded, the result never leaves page zero
        AddressingMode::ZeroPageX => zero_page(memory.read(operand).wrapping_add(x)),
        AddressingMode::ZeroPageY => zero_page(memory.read(operand).wrapping_add(y)),

        AddressingMode::Absolute => memory.read_word(operand),
        AddressingMode::AbsoluteX => memory.read_word(operand).wrapping_add(x as u16),
        AddressingMode::AbsoluteY => memory.read_word(operand).wrapping_add(y as u16),

        AddressingMode::Relative => {
            let offset = memory.read(operand) as i8;
            pc.wrapping_add(2).wrapping_add_signed(offset as i16)
        }

        AddressingMode::Indirect => {
            let pointer = memory.read_word(operand);
            memory.read_word(pointer)
        }

        AddressingMode::IndirectX => {
            let pointer = zero_page(memory.read(operand).wrapping_add(x));
            memory.read_word(pointer)
        }

        AddressingMode::IndirectY => {
            let pointer = zero_page(memory.read(operand));
            memory.read_word(pointer).wrapping_add(y as u16)
        }
    };

    Some(addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FlatMemory;

    fn memory_with(bytes: &[(u16, u8)]) -> FlatMemory {
        let mut mem = FlatMemory::new();
        for &(addr, value) in bytes {
            mem.write(addr, value);
        }
        mem
    }

    #[test]
    fn test_implied_modes_have_no_address() {
        let mem = FlatMemory::new();
        assert_eq!(resolve(AddressingMode::Implicit, 0x8000, 0, 0, &mem), None);
        assert_eq!(resolve(AddressingMode::Accumulator, 0x8000, 0, 0, &mem), None);
    }

    #[test]
    fn test_immediate_points_at_operand() {
        let mem = FlatMemory::new();
        assert_eq!(resolve(AddressingMode::Immediate, 0x8000, 0, 0, &mem), Some(0x8001));
    }

    #[test]
    fn test_zero_page_x_does_not_carry() {
        let mem = memory_with(&[(0x8001, 0xFF)]);
        assert_eq!(resolve(AddressingMode::ZeroPageX, 0x8000, 0x02, 0, &mem), Some(0x0001));
        assert_eq!(resolve(AddressingMode::ZeroPageY, 0x8000, 0, 0x02, &mem), Some(0x0001));
    }

    #[test]
    fn test_absolute_indexed_carries() {
        let mem = memory_with(&[(0x8001, 0xFF), (0x8002, 0x12)]);
        assert_eq!(resolve(AddressingMode::Absolute, 0x8000, 0, 0, &mem), Some(0x12FF));
        assert_eq!(resolve(AddressingMode::AbsoluteX, 0x8000, 0x01, 0, &mem), Some(0x1300));
        assert_eq!(resolve(AddressingMode::AbsoluteY, 0x8000, 0, 0x10, &mem), Some(0x130F));
    }

    #[test]
    fn test_absolute_indexed_wraps_address_space() {
        let mem = memory_with(&[(0x8001, 0xFF), (0x8002, 0xFF)]);
        assert_eq!(resolve(AddressingMode::AbsoluteX, 0x8000, 0x02, 0, &mem), Some(0x0001));
    }

    #[test]
    fn test_relative_offsets() {
        let back = memory_with(&[(0x1001, 0xFE)]);
        assert_eq!(resolve(AddressingMode::Relative, 0x1000, 0, 0, &back), Some(0x1000));

        let forward = memory_with(&[(0x1001, 0x7F)]);
        assert_eq!(resolve(AddressingMode::Relative, 0x1000, 0, 0, &forward), Some(0x1081));

        let min = memory_with(&[(0x1001, 0x80)]);
        assert_eq!(resolve(AddressingMode::Relative, 0x1000, 0, 0, &min), Some(0x0F82));
    }

    #[test]
    fn test_indirect_follows_pointer() {
        let mem = memory_with(&[
            (0x8001, 0x20),
            (0x8002, 0x30),
            (0x3020, 0x34),
            (0x3021, 0x12),
        ]);
        assert_eq!(resolve(AddressingMode::Indirect, 0x8000, 0, 0, &mem), Some(0x1234));
    }

    #[test]
    fn test_indirect_x_wraps_pointer_in_zero_page() {
        let mem = memory_with(&[(0x8001, 0xFE), (0x0001, 0x00), (0x0002, 0x40)]);
        // 0xFE + 3 = 0x01 in zero page
        assert_eq!(resolve(AddressingMode::IndirectX, 0x8000, 0x03, 0, &mem), Some(0x4000));
    }

    #[test]
    fn test_indirect_y_adds_after_dereference() {
        let mem = memory_with(&[(0x8001, 0x10), (0x0010, 0xF0), (0x0011, 0x20)]);
        assert_eq!(resolve(AddressingMode::IndirectY, 0x8000, 0, 0x20, &mem), Some(0x2110));
    }

    #[test]
    fn test_instruction_sizes() {
        assert_eq!(AddressingMode::Implicit.instruction_size(), 1);
        assert_eq!(AddressingMode::Accumulator.instruction_size(), 1);
        assert_eq!(AddressingMode::Relative.instruction_size(), 2);
        assert_eq!(AddressingMode::IndirectY.instruction_size(), 2);
        assert_eq!(AddressingMode::Indirect.instruction_size(), 3);
        assert_eq!(AddressingMode::AbsoluteX.instruction_size(), 3);
    }
}
