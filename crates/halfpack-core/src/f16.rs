//! IEEE 754 binary16 value type.

use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::convert::{f16_to_f32, f32_to_f16};

/// IEEE 754 binary16 half-precision floating-point value.
///
/// Layout (MSB to LSB): 1 sign bit, 5 exponent bits (bias 15), 10 mantissa
/// bits. A 2-byte stack value with no interior mutability: arithmetic
/// decodes both operands to f32, computes, and encodes the result.
#[derive(Copy, Clone, Default)]
#[repr(transparent)]
pub struct F16(u16);

impl F16 {
    /// Positive zero.
    pub const ZERO: Self = Self(0x0000);
    /// Negative zero.
    pub const NEG_ZERO: Self = Self(0x8000);
    /// 1.0
    pub const ONE: Self = Self(0x3C00);
    /// -1.0
    pub const NEG_ONE: Self = Self(0xBC00);
    /// Smallest positive normal value, 2^-14.
    pub const MIN_POSITIVE: Self = Self(0x0400);
    /// Largest finite value, 65504.0.
    pub const MAX: Self = Self(0x7BFF);
    /// Smallest finite value, -65504.0.
    pub const MIN: Self = Self(0xFBFF);
    /// Difference between 1.0 and the next representable value, 2^-10.
    pub const EPSILON: Self = Self(0x1400);
    /// Smallest positive subnormal value, 2^-24.
    pub const MIN_POSITIVE_SUBNORMAL: Self = Self(0x0001);
    /// Positive infinity.
    pub const INFINITY: Self = Self(0x7C00);
    /// Negative infinity.
    pub const NEG_INFINITY: Self = Self(0xFC00);
    /// Canonical quiet NaN.
    pub const NAN: Self = Self(0x7E00);
    /// A signaling NaN pattern (quiet bit clear, payload nonzero).
    pub const SNAN: Self = Self(0x7D00);

    /// Number of mantissa digits, including the implicit leading bit.
    pub const MANTISSA_DIGITS: u32 = 11;

    #[inline(always)]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    #[inline(always)]
    pub const fn to_bits(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn from_f32(value: f32) -> Self {
        Self(f32_to_f16(value))
    }

    #[inline]
    pub fn to_f32(self) -> f32 {
        f16_to_f32(self.0)
    }

    /// Convert from f64 through f32. The intermediate rounding is harmless
    /// in practice but can differ from a direct f64 rounding on values that
    /// tie at the f32 step; the storage pipeline feeds f32 data.
    #[inline]
    pub const fn from_f64(value: f64) -> Self {
        Self(f32_to_f16(value as f32))
    }

    #[inline]
    pub fn to_f64(self) -> f64 {
        self.to_f32() as f64
    }

    #[inline]
    pub const fn from_i32(value: i32) -> Self {
        Self(f32_to_f16(value as f32))
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
        self.0 & 0x7FFF > 0x7C00
    }

    #[inline]
    pub const fn is_infinite(self) -> bool {
        self.0 & 0x7FFF == 0x7C00
    }

    #[inline]
    pub const fn is_finite(self) -> bool {
        self.0 & 0x7C00 != 0x7C00
    }

    /// True for subnormal values: biased exponent zero, mantissa nonzero.
    #[inline]
    pub const fn is_subnormal(self) -> bool {
        self.0 & 0x7C00 == 0 && self.0 & 0x03FF != 0
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

impl From<f32> for F16 {
    #[inline]
    fn from(value: f32) -> Self {
        Self::from_f32(value)
    }
}

impl From<f64> for F16 {
    #[inline]
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl From<i8> for F16 {
    #[inline]
    fn from(value: i8) -> Self {
        Self::from_f32(value as f32)
    }
}

impl From<u8> for F16 {
    #[inline]
    fn from(value: u8) -> Self {
        Self::from_f32(value as f32)
    }
}

impl From<F16> for f32 {
    #[inline]
    fn from(value: F16) -> f32 {
        value.to_f32()
    }
}

impl From<F16> for f64 {
    #[inline]
    fn from(value: F16) -> f64 {
        value.to_f64()
    }
}

impl Add for F16 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::from_f32(self.to_f32() + rhs.to_f32())
    }
}

impl Sub for F16 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::from_f32(self.to_f32() - rhs.to_f32())
    }
}

impl Mul for F16 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::from_f32(self.to_f32() * rhs.to_f32())
    }
}

impl Div for F16 {
    type Output = Self;
    #[inline]
    fn div(self, rhs: Self) -> Self {
        Self::from_f32(self.to_f32() / rhs.to_f32())
    }
}

impl Neg for F16 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        // Sign-bit flip; no decode needed, and it negates NaN payloads the
        // way hardware does.
        Self(self.0 ^ 0x8000)
    }
}

impl AddAssign for F16 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for F16 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for F16 {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl DivAssign for F16 {
    #[inline]
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl PartialEq for F16 {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        // IEEE equality: NaN != NaN, +0 == -0.
        self.to_f32() == other.to_f32()
    }
}

impl PartialOrd for F16 {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.to_f32().partial_cmp(&other.to_f32())
    }
}

impl fmt::Debug for F16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f32())
    }
}

impl fmt::Display for F16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f32())
    }
}
