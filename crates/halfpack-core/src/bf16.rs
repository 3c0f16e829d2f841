//! bfloat16 value type: the upper half of a binary32 pattern.

use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::convert::{bf16_to_f32, f32_to_bf16, f32_to_bf16_nearest};

/// bfloat16 value: 1 sign bit, 8 exponent bits (bias 127, same as f32),
/// 7 mantissa bits.
///
/// Not a rounded IEEE format of its own — it is defined as the upper 16
/// bits of a binary32 pattern, so it covers the full f32 exponent range at
/// reduced precision. Construction from f32 truncates by default (the
/// canonical storage policy); [`Bf16::from_f32_nearest`] provides the
/// round-to-nearest-even policy of the hardware conversion instructions.
#[derive(Copy, Clone, Default)]
#[repr(transparent)]
pub struct Bf16(u16);

impl Bf16 {
    /// Positive zero.
    pub const ZERO: Self = Self(0x0000);
    /// Negative zero.
    pub const NEG_ZERO: Self = Self(0x8000);
    /// 1.0
    pub const ONE: Self = Self(0x3F80);
    /// -1.0
    pub const NEG_ONE: Self = Self(0xBF80);
    /// Smallest positive normal value, 2^-126.
    pub const MIN_POSITIVE: Self = Self(0x0080);
    /// Largest finite value, ~3.39e38.
    pub const MAX: Self = Self(0x7F7F);
    /// Smallest finite value.
    pub const MIN: Self = Self(0xFF7F);
    /// Difference between 1.0 and the next representable value, 2^-7.
    pub const EPSILON: Self = Self(0x3C00);
    /// Smallest positive subnormal value, 2^-133.
    pub const MIN_POSITIVE_SUBNORMAL: Self = Self(0x0001);
    /// Positive infinity.
    pub const INFINITY: Self = Self(0x7F80);
    /// Negative infinity.
    pub const NEG_INFINITY: Self = Self(0xFF80);
    /// Canonical quiet NaN.
    pub const NAN: Self = Self(0x7FC0);
    /// A signaling NaN pattern.
    pub const SNAN: Self = Self(0x7FA0);

    /// Number of mantissa digits, including the implicit leading bit.
    pub const MANTISSA_DIGITS: u32 = 8;

    #[inline(always)]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    #[inline(always)]
    pub const fn to_bits(self) -> u16 {
        self.0
    }

    /// Truncating conversion (canonical policy).
    #[inline]
    pub const fn from_f32(value: f32) -> Self {
        Self(f32_to_bf16(value))
    }

    /// Round-to-nearest-even conversion, matching the hardware BF16
    /// conversion instruction semantics. Not interchangeable with
    /// [`Bf16::from_f32`].
    #[inline]
    pub fn from_f32_nearest(value: f32) -> Self {
        Self(f32_to_bf16_nearest(value))
    }

    #[inline]
    pub const fn to_f32(self) -> f32 {
        bf16_to_f32(self.0)
    }

    #[inline]
    pub const fn from_f64(value: f64) -> Self {
        Self(f32_to_bf16(value as f32))
    }

    #[inline]
    pub fn to_f64(self) -> f64 {
        self.to_f32() as f64
    }

    #[inline]
    pub const fn from_i32(value: i32) -> Self {
        Self(f32_to_bf16(value as f32))
    }

    /// Truncating cast to i32; NaN maps to 0, out-of-range saturates.
    #[inline]
    pub fn to_i32(self) -> i32 {
        self.to_f32() as i32
    }

    #[inline]
    pub fn to_i64(self) -> i64 {
        self.to_f32() as i64
    }

    #[inline]
    pub const fn is_nan(self) -> bool {
        self.0 & 0x7FFF > 0x7F80
    }

    #[inline]
    pub const fn is_infinite(self) -> bool {
        self.0 & 0x7FFF == 0x7F80
    }

    #[inline]
    pub const fn is_finite(self) -> bool {
        self.0 & 0x7F80 != 0x7F80
    }

    #[inline]
    pub const fn is_subnormal(self) -> bool {
        self.0 & 0x7F80 == 0 && self.0 & 0x007F != 0
    }

    #[inline]
    pub const fn is_sign_negative(self) -> bool {
        self.0 & 0x8000 != 0
    }

    #[inline]
    pub const fn abs(self) -> Self {
        Self(self.0 & 0x7FFF)
    }

    #[inline]
    pub const fn to_le_bytes(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }

    #[inline]
    pub const fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }

    #[inline]
    pub const fn from_le_bytes(bytes: [u8; 2]) -> Self {
        Self(u16::from_le_bytes(bytes))
    }
}

impl From<f32> for Bf16 {
    #[inline]
    fn from(value: f32) -> Self {
        Self::from_f32(value)
    }
}

impl From<f64> for Bf16 {
    #[inline]
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl From<i8> for Bf16 {
    #[inline]
    fn from(value: i8) -> Self {
        Self::from_f32(value as f32)
    }
}

impl From<u8> for Bf16 {
    #[inline]
    fn from(value: u8) -> Self {
        Self::from_f32(value as f32)
    }
}

impl From<Bf16> for f32 {
    #[inline]
    fn from(value: Bf16) -> f32 {
        value.to_f32()
    }
}

impl From<Bf16> for f64 {
    #[inline]
    fn from(value: Bf16) -> f64 {
        value.to_f64()
    }
}

impl Add for Bf16 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::from_f32(self.to_f32() + rhs.to_f32())
    }
}

impl Sub for Bf16 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::from_f32(self.to_f32() - rhs.to_f32())
    }
}

impl Mul for Bf16 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::from_f32(self.to_f32() * rhs.to_f32())
    }
}

impl Div for Bf16 {
    type Output = Self;
    #[inline]
    fn div(self, rhs: Self) -> Self {
        Self::from_f32(self.to_f32() / rhs.to_f32())
    }
}

impl Neg for Bf16 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self(self.0 ^ 0x8000)
    }
}

impl AddAssign for Bf16 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Bf16 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Bf16 {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl DivAssign for Bf16 {
    #[inline]
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl PartialEq for Bf16 {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.to_f32() == other.to_f32()
    }
}

impl PartialOrd for Bf16 {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.to_f32().partial_cmp(&other.to_f32())
    }
}

impl fmt::Debug for Bf16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f32())
    }
}

impl fmt::Display for Bf16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_bit_patterns() {
        assert_eq!(Bf16::MIN_POSITIVE.to_bits(), 0x0080);
        assert_eq!(Bf16::MAX.to_bits(), 0x7F7F);
        assert_eq!(Bf16::MIN.to_bits(), 0xFF7F);
        assert_eq!(Bf16::EPSILON.to_bits(), 0x3C00);
        assert_eq!(Bf16::MIN_POSITIVE_SUBNORMAL.to_bits(), 0x0001);
        assert_eq!(Bf16::INFINITY.to_bits(), 0x7F80);
        assert_eq!(Bf16::NAN.to_bits(), 0x7FC0);
        assert_eq!(Bf16::SNAN.to_bits(), 0x7FA0);
    }

    #[test]
    fn constants_decode_to_expected_values() {
        assert_eq!(Bf16::ONE.to_f32(), 1.0);
        assert_eq!(Bf16::MIN_POSITIVE.to_f32(), f32::MIN_POSITIVE);
        assert_eq!(Bf16::EPSILON.to_f32(), 2.0f32.powi(-7));
        assert_eq!(Bf16::INFINITY.to_f32(), f32::INFINITY);
        assert!(Bf16::NAN.to_f32().is_nan());
        assert!(Bf16::SNAN.to_f32().is_nan());
        // MAX is the f32 pattern 0x7F7F_0000.
        assert_eq!(Bf16::MAX.to_f32().to_bits(), 0x7F7F_0000);
    }

    #[test]
    fn one_has_expected_bits() {
        assert_eq!(Bf16::from_f32(1.0).to_bits(), 0x3F80);
    }

    #[test]
    fn pi_preserves_exponent() {
        let pi = 3.14159265f32;
        let b = Bf16::from_f32(pi);
        let back = b.to_f32();
        assert_eq!(back.to_bits() >> 23, pi.to_bits() >> 23);
        assert!(((pi - back) / pi).abs() < 2.0f32.powi(-7));
    }

    #[test]
    fn arithmetic_truncates_results() {
        let a = Bf16::from_f32(1.0);
        let b = Bf16::from_f32(2.0);
        assert_eq!((a + b).to_f32(), 3.0);
        assert_eq!((a * b).to_f32(), 2.0);
        assert_eq!((-a).to_bits(), 0xBF80);
        let mut c = a;
        c *= b;
        assert_eq!(c.to_f32(), 2.0);
    }

    #[test]
    fn integral_conversions() {
        assert_eq!(Bf16::from(100u8).to_f32(), 100.0);
        assert_eq!(Bf16::from_i32(128).to_f32(), 128.0);
        assert_eq!(Bf16::from_f32(3.5).to_i32(), 3);
        assert_eq!(Bf16::from_f32(-3.5).to_i64(), -3);
        assert_eq!(Bf16::NAN.to_i32(), 0);
        assert_eq!(Bf16::NAN.to_i64(), 0);
    }

    #[test]
    fn comparison_semantics() {
        assert!(Bf16::ONE > Bf16::ZERO);
        assert_eq!(Bf16::ZERO, Bf16::NEG_ZERO);
        assert_ne!(Bf16::NAN, Bf16::NAN);
        assert!(Bf16::NEG_INFINITY < Bf16::MIN);
    }

    #[test]
    fn nearest_and_truncate_policies_differ() {
        // A value whose low 16 bits are just above the midpoint.
        let v = f32::from_bits(0x3F80_8001);
        assert_eq!(Bf16::from_f32(v).to_bits(), 0x3F80);
        assert_eq!(Bf16::from_f32_nearest(v).to_bits(), 0x3F81);
    }

    #[test]
    fn classification() {
        assert!(Bf16::NAN.is_nan());
        assert!(Bf16::INFINITY.is_infinite());
        assert!(Bf16::MAX.is_finite());
        assert!(Bf16::MIN_POSITIVE_SUBNORMAL.is_subnormal());
        assert!(!Bf16::MIN_POSITIVE.is_subnormal());
        assert!(Bf16::NEG_ZERO.is_sign_negative());
        assert_eq!((-Bf16::ONE).abs().to_bits(), Bf16::ONE.to_bits());
        assert_eq!(Bf16::NEG_INFINITY.abs().to_bits(), Bf16::INFINITY.to_bits());
    }
}
