//! Sharp SM83 flag register, the contract between the CPU's ALU and everything that inspects
//! its results

pub mod alu;

use dmg_common::num::BitRegister;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Zero,
    Subtract,
    HalfCarry,
    Carry,
}

impl Flag {
    pub const ALL: [Self; 4] = [Self::Zero, Self::Subtract, Self::HalfCarry, Self::Carry];

    /// Bit position in the F register. Part of the register's external layout.
    #[must_use]
    pub const fn bit(self) -> u8 {
        match self {
            Self::Zero => 7,
            Self::Subtract => 6,
            Self::HalfCarry => 5,
            Self::Carry => 4,
        }
    }
}

/// The F register. Bits 3-0 always read 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlagRegister(u8);

const NAMED_BITS_MASK: u8 = 0xF0;

impl FlagRegister {
    #[must_use]
    pub fn new() -> Self {
        Self(0)
    }

    pub fn raise(&mut self, flag: Flag) {
        self.0.set_bit(flag.bit());
    }

    pub fn toggle(&mut self, flag: Flag) {
        self.0.toggle_bit(flag.bit());
    }

    pub fn clear(&mut self, flag: Flag) {
        self.0.clear_bit(flag.bit());
    }

    #[must_use]
    pub fn check(self, flag: Flag) -> bool {
        self.0.test_bit(flag.bit())
    }

    pub fn assign(&mut self, flag: Flag, value: bool) {
        self.0.assign_bit(flag.bit(), value);
    }

    // Assigns the whole byte rather than clearing the four flags one at a time
    pub fn clear_all(&mut self) {
        self.0.clear_all();
    }

    /// Replace all four flags at once, the way most ALU operations report their results.
    pub fn set_all(&mut self, zero: bool, subtract: bool, half_carry: bool, carry: bool) {
        self.clear_all();
        self.assign(Flag::Zero, zero);
        self.assign(Flag::Subtract, subtract);
        self.assign(Flag::HalfCarry, half_carry);
        self.assign(Flag::Carry, carry);
    }
}

impl From<u8> for FlagRegister {
    fn from(value: u8) -> Self {
        Self(value & NAMED_BITS_MASK)
    }
}

impl From<FlagRegister> for u8 {
    fn from(value: FlagRegister) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn raise_then_check_for_every_initial_value() {
        for flag in Flag::ALL {
            for initial in 0..=u8::MAX {
                let mut f = FlagRegister::from(initial);
                f.raise(flag);
                assert!(f.check(flag), "{flag:?} not raised from {initial:02X}");
            }
        }
    }

    #[test]
    fn clear_then_check_for_every_initial_value() {
        for flag in Flag::ALL {
            for initial in 0..=u8::MAX {
                let mut f = FlagRegister::from(initial);
                f.clear(flag);
                assert!(!f.check(flag), "{flag:?} not cleared from {initial:02X}");
            }
        }
    }

    #[test]
    fn double_toggle_is_identity() {
        for flag in Flag::ALL {
            for initial in 0..=u8::MAX {
                let mut f = FlagRegister::from(initial);
                let before = f;
                f.toggle(flag);
                assert_ne!(f, before);
                f.toggle(flag);
                assert_eq!(f, before);
            }
        }
    }

    #[test]
    fn flags_map_to_high_nibble() {
        let mut f = FlagRegister::new();
        f.raise(Flag::Zero);
        assert_eq!(u8::from(f), 0x80);
        f.raise(Flag::Carry);
        assert_eq!(u8::from(f), 0x90);
        f.raise(Flag::Subtract);
        f.raise(Flag::HalfCarry);
        assert_eq!(u8::from(f), 0xF0);

        f.clear_all();
        assert_eq!(u8::from(f), 0x00);
    }

    #[test]
    fn low_nibble_never_stored() {
        assert_eq!(u8::from(FlagRegister::from(0xFF)), 0xF0);
        assert_eq!(u8::from(FlagRegister::from(0x0F)), 0x00);
    }
}
