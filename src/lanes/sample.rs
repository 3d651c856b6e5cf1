use core::fmt::Debug;

use bytemuck::Pod;

use crate::OverflowPolicy;

/// An unsigned integer that can live in one lane of a [`Vector`](super::Vector).
///
/// Implemented for `u8`, `u16`, `u32` and `u64`.
pub trait Lane: Pod + Ord + Default + Debug + Send + Sync + 'static {
    fn wrapping_add(self, rhs: Self) -> Self;
    fn saturating_add(self, rhs: Self) -> Self;
    fn wrapping_mul(self, rhs: Self) -> Self;
    fn abs_diff(self, rhs: Self) -> Self;
    fn shr(self, bits: u32) -> Self;
    /// Truncating conversion; callers keep `value` in range.
    fn from_u64(value: u64) -> Self;
    fn to_u64(self) -> u64;
    fn to_f64(self) -> f64;
}

/// A grayscale sample type: `u8`, `u16` or `u32`.
///
/// `Wide` is the type of one doubling that widening multiplies and
/// accumulations run in.
pub trait Sample: Lane {
    /// Sample width in bits, `W`.
    const BITS: u32;
    /// `2^W - 1`.
    const MAX: Self;

    type Wide: Lane;

    fn widen(self) -> Self::Wide;

    /// Clip (`Saturation`) or truncate (`Wrap`) a widened value to `W` bits.
    fn narrow(wide: Self::Wide, policy: OverflowPolicy) -> Self;

    /// Round `value` to the nearest integer (half away from zero), then
    /// clamp to `[0, MAX]` or reduce modulo `2^W`.
    fn from_f64(value: f64, policy: OverflowPolicy) -> Self;
}

macro_rules! impl_lane {
    ($($t:ty),*) => {$(
        impl Lane for $t {
            #[inline(always)]
            fn wrapping_add(self, rhs: Self) -> Self {
                <$t>::wrapping_add(self, rhs)
            }
            #[inline(always)]
            fn saturating_add(self, rhs: Self) -> Self {
                <$t>::saturating_add(self, rhs)
            }
            #[inline(always)]
            fn wrapping_mul(self, rhs: Self) -> Self {
                <$t>::wrapping_mul(self, rhs)
            }
            #[inline(always)]
            fn abs_diff(self, rhs: Self) -> Self {
                <$t>::abs_diff(self, rhs)
            }
            #[inline(always)]
            fn shr(self, bits: u32) -> Self {
                <$t>::checked_shr(self, bits).unwrap_or(0)
            }
            #[inline(always)]
            fn from_u64(value: u64) -> Self {
                value as $t
            }
            #[inline(always)]
            fn to_u64(self) -> u64 {
                self as u64
            }
            #[inline(always)]
            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    )*};
}

impl_lane!(u8, u16, u32, u64);

macro_rules! impl_sample {
    ($($t:ty => $wide:ty),*) => {$(
        impl Sample for $t {
            const BITS: u32 = <$t>::BITS;
            const MAX: Self = <$t>::MAX;

            type Wide = $wide;

            #[inline(always)]
            fn widen(self) -> $wide {
                <$wide>::from(self)
            }

            #[inline(always)]
            fn narrow(wide: $wide, policy: OverflowPolicy) -> Self {
                match policy {
                    OverflowPolicy::Saturation => wide.min(<$t>::MAX as $wide) as $t,
                    OverflowPolicy::Wrap => wide as $t,
                }
            }

            #[inline]
            fn from_f64(value: f64, policy: OverflowPolicy) -> Self {
                let rounded = value.round();
                match policy {
                    // `as` saturates float→int and maps NaN to 0.
                    OverflowPolicy::Saturation => rounded as $t,
                    OverflowPolicy::Wrap => {
                        (rounded as i64).rem_euclid(1i64 << <$t>::BITS) as $t
                    }
                }
            }
        }
    )*};
}

impl_sample!(u8 => u16, u16 => u32, u32 => u64);
