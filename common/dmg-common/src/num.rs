use std::ops::RangeInclusive;

pub trait GetBit {
    #[must_use]
    fn bit(self, i: u8) -> bool;

    #[must_use]
    fn bits(self, range: RangeInclusive<u8>) -> Self;
}

macro_rules! impl_get_bit {
    ($t:ty) => {
        impl GetBit for $t {
            #[inline]
            fn bit(self, i: u8) -> bool {
                debug_assert!(i < (<$t>::BITS as u8));
                self & (1 << i) != 0
            }

            #[inline]
            fn bits(self, range: RangeInclusive<u8>) -> Self {
                let start = *range.start();
                let end = *range.end();
                debug_assert!(end < (<$t>::BITS as u8));

                (self >> start) & ((1 << (end - start + 1)) - 1)
            }
        }
    };
}

impl_get_bit!(u8);
impl_get_bit!(u16);

/// Single-bit mutation of a hardware register held in a plain integer.
///
/// Bit indices are trusted to be in range; out-of-range indices only trip a debug assertion.
pub trait BitRegister: GetBit {
    fn set_bit(&mut self, i: u8);

    fn clear_bit(&mut self, i: u8);

    fn toggle_bit(&mut self, i: u8);

    #[must_use]
    fn test_bit(self, i: u8) -> bool
    where
        Self: Sized,
    {
        self.bit(i)
    }

    /// Zero the entire register, including any bits that are not individually named.
    fn clear_all(&mut self);

    /// Set or clear bit `i` depending on `value`.
    fn assign_bit(&mut self, i: u8, value: bool) {
        if value {
            self.set_bit(i);
        } else {
            self.clear_bit(i);
        }
    }
}

macro_rules! impl_bit_register {
    ($t:ty) => {
        impl BitRegister for $t {
            #[inline]
            fn set_bit(&mut self, i: u8) {
                debug_assert!(i < (<$t>::BITS as u8));
                *self |= 1 << i;
            }

            #[inline]
            fn clear_bit(&mut self, i: u8) {
                debug_assert!(i < (<$t>::BITS as u8));
                *self &= !(1 << i);
            }

            #[inline]
            fn toggle_bit(&mut self, i: u8) {
                debug_assert!(i < (<$t>::BITS as u8));
                *self ^= 1 << i;
            }

            #[inline]
            fn clear_all(&mut self) {
                *self = 0;
            }
        }
    };
}

impl_bit_register!(u8);
impl_bit_register!(u16);
