//! 8-bit ALU operations and their flag effects
//!
//! Every operation derives its flags purely from its operands and result. The only flags carried
//! over from the previous F value are the ones an instruction explicitly preserves (INC/DEC keep
//! C, CPL keeps Z and C, SCF/CCF keep Z).

use crate::sm83::{Flag, FlagRegister};

// ADD / ADC
pub fn add(accumulator: u8, operand: u8, carry_in: bool, flags: &mut FlagRegister) -> u8 {
    let carry_in: u8 = carry_in.into();

    let (partial_sum, carry1) = accumulator.overflowing_add(operand);
    let (sum, carry2) = partial_sum.overflowing_add(carry_in);
    let carry = carry1 || carry2;

    let half_carry = (accumulator & 0x0F) + (operand & 0x0F) + carry_in > 0x0F;

    flags.set_all(sum == 0, false, half_carry, carry);

    sum
}

// SUB / SBC
pub fn subtract(accumulator: u8, operand: u8, carry_in: bool, flags: &mut FlagRegister) -> u8 {
    let carry_in: u8 = carry_in.into();

    let (partial_diff, borrow1) = accumulator.overflowing_sub(operand);
    let (difference, borrow2) = partial_diff.overflowing_sub(carry_in);
    let borrow = borrow1 || borrow2;

    let half_borrow = accumulator & 0x0F < (operand & 0x0F) + carry_in;

    flags.set_all(difference == 0, true, half_borrow, borrow);

    difference
}

// CP: subtract with the result discarded
pub fn compare(accumulator: u8, operand: u8, flags: &mut FlagRegister) {
    subtract(accumulator, operand, false, flags);
}

pub fn and(accumulator: u8, operand: u8, flags: &mut FlagRegister) -> u8 {
    let value = accumulator & operand;
    flags.set_all(value == 0, false, true, false);
    value
}

pub fn or(accumulator: u8, operand: u8, flags: &mut FlagRegister) -> u8 {
    let value = accumulator | operand;
    flags.set_all(value == 0, false, false, false);
    value
}

pub fn xor(accumulator: u8, operand: u8, flags: &mut FlagRegister) -> u8 {
    let value = accumulator ^ operand;
    flags.set_all(value == 0, false, false, false);
    value
}

// INC r: C unaffected
pub fn increment(value: u8, flags: &mut FlagRegister) -> u8 {
    let result = value.wrapping_add(1);

    flags.assign(Flag::Zero, result == 0);
    flags.clear(Flag::Subtract);
    flags.assign(Flag::HalfCarry, result & 0x0F == 0);

    result
}

// DEC r: C unaffected
pub fn decrement(value: u8, flags: &mut FlagRegister) -> u8 {
    let result = value.wrapping_sub(1);

    flags.assign(Flag::Zero, result == 0);
    flags.raise(Flag::Subtract);
    flags.assign(Flag::HalfCarry, result & 0x0F == 0x0F);

    result
}

// CPL: Complement accumulator
pub fn complement(accumulator: u8, flags: &mut FlagRegister) -> u8 {
    flags.raise(Flag::Subtract);
    flags.raise(Flag::HalfCarry);
    !accumulator
}

// SCF: Set carry flag
pub fn set_carry(flags: &mut FlagRegister) {
    flags.clear(Flag::Subtract);
    flags.clear(Flag::HalfCarry);
    flags.raise(Flag::Carry);
}

// CCF: Complement carry flag
pub fn complement_carry(flags: &mut FlagRegister) {
    flags.clear(Flag::Subtract);
    flags.clear(Flag::HalfCarry);
    flags.toggle(Flag::Carry);
}

/// INC rr on a big-endian register pair (e.g. B/C). No flags are affected.
pub fn increment_pair(high: &mut u8, low: &mut u8) {
    let value = u16::from_be_bytes([*high, *low]).wrapping_add(1);
    [*high, *low] = value.to_be_bytes();
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn flags_of(f: FlagRegister) -> (bool, bool, bool, bool) {
        (f.check(Flag::Zero), f.check(Flag::Subtract), f.check(Flag::HalfCarry), f.check(Flag::Carry))
    }

    #[test]
    fn add_flags_independent_of_prior_state() {
        for prior in [0x00, 0xF0] {
            let mut f = FlagRegister::from(prior);
            assert_eq!(add(0x0F, 0x01, false, &mut f), 0x10);
            assert_eq!(flags_of(f), (false, false, true, false));

            let mut f = FlagRegister::from(prior);
            assert_eq!(add(0xFF, 0x01, false, &mut f), 0x00);
            assert_eq!(flags_of(f), (true, false, true, true));
        }
    }

    #[test]
    fn add_with_carry_in() {
        let mut f = FlagRegister::new();
        assert_eq!(add(0x0E, 0x01, true, &mut f), 0x10);
        assert_eq!(flags_of(f), (false, false, true, false));
    }

    #[test]
    fn subtract_sets_borrow_flags() {
        let mut f = FlagRegister::new();
        assert_eq!(subtract(0x10, 0x01, false, &mut f), 0x0F);
        assert_eq!(flags_of(f), (false, true, true, false));

        let mut f = FlagRegister::new();
        assert_eq!(subtract(0x00, 0x00, true, &mut f), 0xFF);
        assert_eq!(flags_of(f), (false, true, true, true));
    }

    #[test]
    fn compare_equal_sets_zero() {
        let mut f = FlagRegister::from(0x10);
        compare(0x42, 0x42, &mut f);
        assert_eq!(flags_of(f), (true, true, false, false));
    }

    #[test]
    fn logical_operations() {
        let mut f = FlagRegister::from(0xF0);
        assert_eq!(and(0xF0, 0x0F, &mut f), 0x00);
        assert_eq!(flags_of(f), (true, false, true, false));

        assert_eq!(or(0xF0, 0x0F, &mut f), 0xFF);
        assert_eq!(flags_of(f), (false, false, false, false));

        assert_eq!(xor(0xAA, 0xAA, &mut f), 0x00);
        assert_eq!(flags_of(f), (true, false, false, false));
    }

    #[test]
    fn increment_and_decrement_preserve_carry() {
        let mut f = FlagRegister::new();
        f.raise(Flag::Carry);
        assert_eq!(increment(0xFF, &mut f), 0x00);
        assert_eq!(flags_of(f), (true, false, true, true));

        assert_eq!(decrement(0x00, &mut f), 0xFF);
        assert_eq!(flags_of(f), (false, true, true, true));

        f.clear(Flag::Carry);
        assert_eq!(decrement(0x01, &mut f), 0x00);
        assert_eq!(flags_of(f), (true, true, false, false));
    }

    #[test]
    fn complement_preserves_zero_and_carry() {
        let mut f = FlagRegister::new();
        f.raise(Flag::Zero);
        assert_eq!(complement(0x35, &mut f), 0xCA);
        assert_eq!(flags_of(f), (true, true, true, false));
    }

    #[test]
    fn carry_flag_operations() {
        let mut f = FlagRegister::from(0xE0);
        set_carry(&mut f);
        assert_eq!(flags_of(f), (true, false, false, true));

        complement_carry(&mut f);
        assert_eq!(flags_of(f), (true, false, false, false));
        complement_carry(&mut f);
        assert!(f.check(Flag::Carry));
    }

    #[test]
    fn register_pair_increment_carries_into_high_byte() {
        let (mut b, mut c) = (0x12, 0xFF);
        increment_pair(&mut b, &mut c);
        assert_eq!((b, c), (0x13, 0x00));

        let (mut h, mut l) = (0xFF, 0xFF);
        increment_pair(&mut h, &mut l);
        assert_eq!((h, l), (0x00, 0x00));
    }
}
