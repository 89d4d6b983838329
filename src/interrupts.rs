//! Interrupt requests and their vectors.
//!
//! The 6502 reads the handler address for each interrupt from a fixed
//! little-endian vector at the top of memory:
//!
//! | Interrupt | Vector          |
//! |-----------|-----------------|
//! | NMI       | 0xFFFA-0xFFFB   |
//! | RST       | 0xFFFC-0xFFFD   |
//! | IRQ / BRK | 0xFFFE-0xFFFF   |
//!
//! ## Interrupt Service Sequence
//!
//! After the current instruction completes and observers have run:
//!
//! 1. Push PC (high byte, then low byte) - skipped for RST
//! 2. Push status with the B bit set only for BRK - skipped for RST
//! 3. Set the I flag
//! 4. Load PC from the vector
//! 5. Clear the pending request
//!
//! Only one request is tracked at a time. A request raised while another is
//! still pending is dropped.

/// Address of the NMI vector.
pub const NMI_VECTOR: u16 = 0xFFFA;
/// Address of the reset vector.
pub const RESET_VECTOR: u16 = 0xFFFC;
/// Address of the IRQ/BRK vector.
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// The four interrupt sources of the 6502.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interrupt {
    /// Non-maskable interrupt.
    Nmi,
    /// Reset. Loads the reset vector without saving any state.
    Reset,
    /// Hardware interrupt request, masked by the I flag.
    Irq,
    /// Software interrupt raised by the BRK instruction.
    Break,
}

impl Interrupt {
    /// Address of the vector holding this interrupt's handler.
    pub const fn vector(self) -> u16 {
        match self {
            Interrupt::Nmi => NMI_VECTOR,
            Interrupt::Reset => RESET_VECTOR,
            Interrupt::Irq | Interrupt::Break => IRQ_VECTOR,
        }
    }

    /// Whether servicing pushes PC and status before jumping.
    pub const fn saves_state(self) -> bool {
        !matches!(self, Interrupt::Reset)
    }

    /// Value of the B bit in the pushed status byte.
    pub const fn break_flag(self) -> bool {
        matches!(self, Interrupt::Break)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vectors() {
        assert_eq!(Interrupt::Nmi.vector(), 0xFFFA);
        assert_eq!(Interrupt::Reset.vector(), 0xFFFC);
        assert_eq!(Interrupt::Irq.vector(), 0xFFFE);
        assert_eq!(Interrupt::Break.vector(), 0xFFFE);
    }

    #[test]
    fn test_only_break_sets_break_flag() {
        assert!(Interrupt::Break.break_flag());
        assert!(!Interrupt::Irq.break_flag());
        assert!(!Interrupt::Nmi.break_flag());
        assert!(!Interrupt::Reset.saves_state());
        assert!(Interrupt::Nmi.saves_state());
    }
}
