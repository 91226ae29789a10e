//! Bit-field tools for packed hardware words

use num_traits::{PrimInt, Unsigned};

/// Check, extract and insert bit fields of an unsigned word.
///
/// Fields are addressed by the position of their least significant bit
/// (`shift`) and their width in bits, matching how the data format
/// documentation writes them as `hi:lo`.
pub trait BitField: PrimInt + Unsigned {
    fn check(self, b: usize) -> bool;
    fn any(self, mask: Self) -> bool;
    fn field(self, shift: usize, width: usize) -> Self;
    fn with_field(self, shift: usize, width: usize, value: Self) -> Self;
}

/// Mask of the `width` least significant bits
#[inline]
pub fn mask<T: PrimInt + Unsigned>(width: usize) -> T {
    let bits = T::zero().count_zeros() as usize;
    if width >= bits {
        return !T::zero();
    }
    return (T::one() << width) - T::one();
}

impl<T: PrimInt + Unsigned> BitField for T {
    #[inline]
    fn check(self, b: usize) -> bool {
        return (self >> b) & T::one() == T::one();
    }

    #[inline]
    fn any(self, m: Self) -> bool {
        return self & m != T::zero();
    }

    #[inline]
    fn field(self, shift: usize, width: usize) -> Self {
        return (self >> shift) & mask::<T>(width);
    }

    #[inline]
    fn with_field(self, shift: usize, width: usize, value: Self) -> Self {
        let m = mask::<T>(width) << shift;
        return (self & !m) | ((value << shift) & m);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks() {
        assert_eq!(0u64, mask::<u64>(0));
        assert_eq!(0xFFF_FFFFu64, mask::<u64>(28));
        assert_eq!(u64::MAX, mask::<u64>(64));
        assert_eq!(0xFFu8, mask::<u8>(8));
    }

    #[test]
    fn field_insert_extract() {
        // Exhaustively check all u8's against all in-range fields
        for i in u8::MIN..=u8::MAX {
            for shift in 0..8 {
                for width in 1..=(8 - shift) {
                    let f = i.field(shift, width);
                    assert_eq!(f, (i >> shift) & mask::<u8>(width));
                    let cleared = i.with_field(shift, width, 0);
                    assert_eq!(cleared.field(shift, width), 0);
                    assert_eq!(cleared.with_field(shift, width, f), i);
                }
            }
        }
    }

    #[test]
    fn oversize_values_are_truncated() {
        let w = 0u64.with_field(32, 16, 0x1_2345);
        assert_eq!(w, 0x2345 << 32);
    }

    #[test]
    fn check_bits() {
        let w: u64 = 1 << 60;
        assert!(w.check(60));
        assert!(!w.check(28));
        assert!(w.any(0xF000_0000_0000_0000));
        assert!(!w.any(0x0000_0000_F000_0000));
    }
}
