//! # Processor Status Register
//!
//! Six condition flags packed into the hardware byte layout (NV-BDIZC):
//!
//! - Bit 7: N (Negative)
//! - Bit 6: V (Overflow)
//! - Bit 5: (unused, always 1)
//! - Bit 4: B (Break)
//! - Bit 3: D (Decimal)
//! - Bit 2: I (Interrupt Disable)
//! - Bit 1: Z (Zero)
//! - Bit 0: C (Carry)
//!
//! ## The B flag
//!
//! No B flag exists inside the live register. It only appears in the status
//! byte pushed to the stack: software sources (BRK) push it as 1, hardware
//! interrupts (IRQ, NMI) push it as 0. When the byte is pulled back (RTI) the
//! bit is discarded, as is bit 5.

/// Bit 7: Negative.
pub const NEGATIVE: u8 = 0b1000_0000;
/// Bit 6: Overflow.
pub const OVERFLOW: u8 = 0b0100_0000;
/// Bit 5: always set in the serialized byte.
pub const UNUSED: u8 = 0b0010_0000;
/// Bit 4: Break, serialized byte only.
pub const BREAK: u8 = 0b0001_0000;
/// Bit 3: Decimal mode.
pub const DECIMAL: u8 = 0b0000_1000;
/// Bit 2: Interrupt disable.
pub const INTERRUPT_DISABLE: u8 = 0b0000_0100;
/// Bit 1: Zero.
pub const ZERO: u8 = 0b0000_0010;
/// Bit 0: Carry.
pub const CARRY: u8 = 0b0000_0001;

/// The persistent condition flags of the 6502.
///
/// # Examples
///
/// ```
/// use step6502::Status;
///
/// let status = Status { carry: true, ..Status::default() };
/// assert_eq!(status.to_byte(false), 0x21);
/// assert_eq!(status.to_byte(true), 0x31);
/// assert_eq!(Status::from_byte(0x21), status);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Status {
    /// Set if bit 7 of the last result is 1.
    pub negative: bool,
    /// Set on signed overflow.
    pub overflow: bool,
    /// Decimal mode. Tracked, but ignored by ADC/SBC.
    pub decimal: bool,
    /// Blocks IRQ servicing when set.
    pub interrupt_disable: bool,
    /// Set if the last result is zero.
    pub zero: bool,
    /// Carry out of bit 7 (or "no borrow" for subtraction).
    pub carry: bool,
}

impl Status {
    /// Packs the flags into a byte for pushing onto the stack.
    ///
    /// `break_flag` should be `true` when the byte is pushed by a software
    /// source and `false` for hardware interrupts. Bit 5 is always set.
    pub fn to_byte(&self, break_flag: bool) -> u8 {
        let mut byte = UNUSED;

        for (set, mask) in [
            (self.negative, NEGATIVE),
            (self.overflow, OVERFLOW),
            (break_flag, BREAK),
            (self.decimal, DECIMAL),
            (self.interrupt_disable, INTERRUPT_DISABLE),
            (self.zero, ZERO),
            (self.carry, CARRY),
        ] {
            if set {
                byte |= mask;
            }
        }

        byte
    }

    /// Unpacks a status byte, discarding bit 5 and the break bit.
    pub fn from_byte(byte: u8) -> Self {
        Self {
            negative: byte & NEGATIVE != 0,
            overflow: byte & OVERFLOW != 0,
            decimal: byte & DECIMAL != 0,
            interrupt_disable: byte & INTERRUPT_DISABLE != 0,
            zero: byte & ZERO != 0,
            carry: byte & CARRY != 0,
        }
    }

    /// Overwrites the flags in place from a status byte.
    pub fn load_byte(&mut self, byte: u8) {
        *self = Self::from_byte(byte);
    }

    /// Sets Z and N from an 8-bit result.
    pub(crate) fn set_zn(&mut self, value: u8) {
        self.zero = value == 0;
        self.negative = value & 0x80 != 0;
    }
}
