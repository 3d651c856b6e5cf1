use core::marker::PhantomData;

use super::{GROUP_BYTES, Lane, MAX_LANES, Sample, capacity};
use crate::OverflowPolicy;

const WORDS: usize = GROUP_BYTES / 8;

/// One register group: [`GROUP_BYTES`] bytes viewed as lanes of `T`, `len`
/// of them active.
///
/// The storage is the same size for every lane type, so a vector of `u64`
/// holds 32 lanes and a vector of `u8` holds 256. Lanes past `len` are never
/// read. Every operation acts on the active lanes only, so two vectors
/// combined by a binary operation must share the same length.
#[derive(Clone, Copy)]
pub struct Vector<T> {
    words: [u64; WORDS],
    len: usize,
    _lane: PhantomData<T>,
}

/// Per-lane predicate produced by a comparison.
#[derive(Clone, Copy)]
pub struct Mask {
    bits: [bool; MAX_LANES],
    len: usize,
}

impl Mask {
    pub fn as_slice(&self) -> &[bool] {
        &self.bits[..self.len]
    }

    pub fn any(&self) -> bool {
        self.as_slice().iter().any(|&b| b)
    }

    pub fn count(&self) -> usize {
        self.as_slice().iter().filter(|&&b| b).count()
    }
}

impl<T: Lane> Vector<T> {
    /// Lanes of `T` one vector can hold.
    pub const CAPACITY: usize = capacity::<T>();

    #[inline]
    fn with_len(len: usize) -> Self {
        debug_assert!(len > 0 && len <= Self::CAPACITY, "bad lane count {len}");
        Self {
            words: [0; WORDS],
            len,
            _lane: PhantomData,
        }
    }

    #[inline(always)]
    fn lanes(&self) -> &[T] {
        bytemuck::cast_slice::<u64, T>(&self.words)
    }

    #[inline(always)]
    fn lanes_mut(&mut self) -> &mut [T] {
        bytemuck::cast_slice_mut::<u64, T>(&mut self.words)
    }

    #[inline]
    pub fn splat(value: T, count: usize) -> Self {
        let mut v = Self::with_len(count);
        v.active_mut().fill(value);
        v
    }

    #[inline]
    pub fn zero(count: usize) -> Self {
        Self::with_len(count)
    }

    /// Load the first `count` elements of `src`.
    #[inline]
    pub fn load(src: &[T], count: usize) -> Self {
        let mut v = Self::with_len(count);
        v.active_mut().copy_from_slice(&src[..count]);
        v
    }

    /// Store the active lanes into the front of `dst`.
    #[inline]
    pub fn store(&self, dst: &mut [T]) {
        dst[..self.len].copy_from_slice(self.as_slice());
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.lanes()[..self.len]
    }

    #[inline(always)]
    fn active_mut(&mut self) -> &mut [T] {
        let len = self.len;
        &mut self.lanes_mut()[..len]
    }

    #[inline]
    fn zip_with(mut self, rhs: &Self, f: impl Fn(T, T) -> T) -> Self {
        debug_assert_eq!(self.len, rhs.len);
        for (a, &b) in self.active_mut().iter_mut().zip(rhs.as_slice()) {
            *a = f(*a, b);
        }
        self
    }

    #[inline]
    fn map(mut self, f: impl Fn(T) -> T) -> Self {
        for a in self.active_mut() {
            *a = f(*a);
        }
        self
    }

    /// Lane-wise add, modulo `2^bits(T)`.
    #[inline]
    pub fn add(self, rhs: &Self) -> Self {
        self.zip_with(rhs, T::wrapping_add)
    }

    #[inline]
    pub fn saturating_add(self, rhs: &Self) -> Self {
        self.zip_with(rhs, T::saturating_add)
    }

    #[inline]
    pub fn mul(self, rhs: &Self) -> Self {
        self.zip_with(rhs, T::wrapping_mul)
    }

    #[inline]
    pub fn mul_scalar(self, scalar: T) -> Self {
        self.map(|a| a.wrapping_mul(scalar))
    }

    #[inline]
    pub fn abs_diff(self, rhs: &Self) -> Self {
        self.zip_with(rhs, T::abs_diff)
    }

    /// Logical shift right by `bits`.
    #[inline]
    pub fn shr(self, bits: u32) -> Self {
        self.map(|a| a.shr(bits))
    }

    /// Reverse the order of the active lanes.
    #[inline]
    pub fn reverse(mut self) -> Self {
        self.active_mut().reverse();
        self
    }

    /// Lane-wise `self < rhs`.
    #[inline]
    pub fn lt(&self, rhs: &Self) -> Mask {
        debug_assert_eq!(self.len, rhs.len);
        let mut bits = [false; MAX_LANES];
        for ((bit, a), b) in bits.iter_mut().zip(self.as_slice()).zip(rhs.as_slice()) {
            *bit = a < b;
        }
        Mask {
            bits,
            len: self.len,
        }
    }

    /// Replace every lane whose mask bit is set with `value`.
    #[inline]
    pub fn select(mut self, mask: &Mask, value: T) -> Self {
        debug_assert_eq!(self.len, mask.len);
        for (a, &hit) in self.active_mut().iter_mut().zip(mask.as_slice()) {
            if hit {
                *a = value;
            }
        }
        self
    }
}

impl<S: Sample> Vector<S> {
    /// Zero-extend every lane to the sample's wide type.
    #[inline]
    pub fn widen(&self) -> Vector<S::Wide> {
        let mut wide = Vector::<S::Wide>::zero(self.len);
        for (w, &s) in wide.active_mut().iter_mut().zip(self.as_slice()) {
            *w = s.widen();
        }
        wide
    }

    /// Narrow a widened vector back to `S`, clipping or truncating per `policy`.
    #[inline]
    pub fn narrow(wide: &Vector<S::Wide>, policy: OverflowPolicy) -> Self {
        let mut out = Self::zero(wide.len);
        for (s, &w) in out.active_mut().iter_mut().zip(wide.as_slice()) {
            *s = S::narrow(w, policy);
        }
        out
    }

    /// Build a vector lane by lane from two same-length vectors.
    #[inline]
    pub fn combine<T: Lane>(a: &Vector<T>, b: &Vector<T>, f: impl Fn(T, T) -> S) -> Self {
        debug_assert_eq!(a.len, b.len);
        let mut out = Self::zero(a.len);
        for ((s, &x), &y) in out
            .active_mut()
            .iter_mut()
            .zip(a.as_slice())
            .zip(b.as_slice())
        {
            *s = f(x, y);
        }
        out
    }
}

impl<T: Lane> core::fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl core::fmt::Debug for Mask {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}
