// ---------------------------------------------------------------------------
// Lane-width resolution on a scalable register model.
//
// Kernels never assume a vector length. They ask a `Lanes` resolver how many
// samples the next step may cover, given the samples remaining in the row,
// the sample width and a grouping factor. The register width behind the
// answer comes from the `Tier` token the kernel was dispatched with, so a
// kernel running under AVX2 steps over 32-byte registers and one running
// under NEON, WASM SIMD128 or the scalar fallback over 16-byte ones.
// ---------------------------------------------------------------------------

use core::fmt;
use core::marker::PhantomData;
use core::mem::size_of;

use archmage::incant;
use archmage::prelude::*;

mod sample;
mod vector;

pub use sample::{Lane, Sample};
pub use vector::{Mask, Vector};


/// Largest grouping factor; widening steps are capped so the widened vector
/// fits a group this many registers wide.
const MAX_GROUP: usize = 8;

/// Bytes in the largest register group: eight 32-byte AVX2 registers.
pub const GROUP_BYTES: usize = 32 * MAX_GROUP;

/// Upper bound on the lanes a single [`Vector`] holds (`u8` lanes).
pub const MAX_LANES: usize = GROUP_BYTES;

/// Lanes of `T` that fit in one [`Vector`].
#[inline(always)]
pub const fn capacity<T>() -> usize {
    GROUP_BYTES / size_of::<T>()
}

// ===========================================================================
// CPU tiers
// ===========================================================================

/// An archmage token for a tier kernels are dispatched to, with the width of
/// that tier's vector registers.
pub trait Tier: SimdToken + Copy {
    const REGISTER_BYTES: usize;
}

impl Tier for X64V3Token {
    const REGISTER_BYTES: usize = 32;
}

impl Tier for Arm64V2Token {
    const REGISTER_BYTES: usize = 16;
}

impl Tier for Wasm128Token {
    const REGISTER_BYTES: usize = 16;
}

// Nominal register for the portable fallback.
impl Tier for ScalarToken {
    const REGISTER_BYTES: usize = 16;
}

// ===========================================================================
// Register width dispatch
// ===========================================================================

#[cfg(target_arch = "x86_64")]
#[arcane]
fn register_bytes_v3(_token: X64V3Token) -> usize {
    X64V3Token::REGISTER_BYTES
}

#[cfg(target_arch = "aarch64")]
#[arcane]
fn register_bytes_arm_v2(_token: Arm64V2Token) -> usize {
    Arm64V2Token::REGISTER_BYTES
}

#[cfg(target_arch = "wasm32")]
#[arcane]
fn register_bytes_wasm128(_token: Wasm128Token) -> usize {
    Wasm128Token::REGISTER_BYTES
}

fn register_bytes_scalar(_token: ScalarToken) -> usize {
    ScalarToken::REGISTER_BYTES
}

/// Register width in bytes of the best CPU tier available right now.
///
/// 32 on x86-64 with AVX2, 16 on NEON, WASM SIMD128 and the scalar fallback.
/// Not cached: disabling tokens at runtime is reflected immediately.
pub fn register_bytes() -> usize {
    incant!(register_bytes(), [v3, arm_v2, wasm128, scalar])
}

// ===========================================================================
// Grouping factor
// ===========================================================================

/// How many registers one step spans.
pub trait Grouping: Copy + Default + fmt::Debug + Send + Sync + 'static {
    const FACTOR: usize;
}

macro_rules! grouping {
    ($($(#[$doc:meta])* $name:ident = $factor:literal),*) => {$(
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name;

        impl Grouping for $name {
            const FACTOR: usize = $factor;
        }
    )*};
}

grouping!(
    /// One register per step.
    M1 = 1,
    /// Two registers per step.
    M2 = 2,
    /// Four registers per step.
    M4 = 4,
    /// Eight registers per step.
    M8 = 8
);

// ===========================================================================
// Resolver
// ===========================================================================

/// Lane-count resolver for sample type `S` at grouping `G`.
pub struct Lanes<S, G = M1> {
    register_bytes: usize,
    _marker: PhantomData<fn() -> (S, G)>,
}

impl<S, G> Clone for Lanes<S, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, G> Copy for Lanes<S, G> {}

impl<S, G> fmt::Debug for Lanes<S, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lanes")
            .field("register_bytes", &self.register_bytes)
            .field("sample", &core::any::type_name::<S>())
            .field("grouping", &core::any::type_name::<G>())
            .finish()
    }
}

impl<S: Sample, G: Grouping> Lanes<S, G> {
    /// Resolver for the register width of the current CPU tier.
    pub fn detect() -> Self {
        Self::with_register_bytes(register_bytes())
    }

    /// Resolver for the register width of tier `T`.
    pub fn for_tier<T: Tier>(_token: T) -> Self {
        Self::with_register_bytes(T::REGISTER_BYTES)
    }

    /// Resolver for a fixed register width. Zero is treated as one byte.
    pub fn with_register_bytes(register_bytes: usize) -> Self {
        Self {
            register_bytes: register_bytes.max(1),
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn register_bytes(&self) -> usize {
        self.register_bytes
    }

    /// Lanes in one full step.
    #[inline]
    pub fn max_lanes(&self) -> usize {
        (self.register_bytes * G::FACTOR / size_of::<S>()).clamp(1, capacity::<S>())
    }

    /// Lanes in one full step whose widened form must fit the largest group.
    #[inline]
    pub fn max_widening_lanes(&self) -> usize {
        let cap = (self.register_bytes * MAX_GROUP / size_of::<S::Wide>())
            .clamp(1, capacity::<S::Wide>());
        self.max_lanes().min(cap)
    }

    /// Lanes for the next step when `remaining` samples are left.
    ///
    /// Never exceeds `remaining`, and is never 0 while `remaining > 0`.
    #[inline]
    pub fn lanes_for(&self, remaining: usize) -> usize {
        remaining.min(self.max_lanes())
    }

    #[inline]
    pub fn widening_lanes_for(&self, remaining: usize) -> usize {
        remaining.min(self.max_widening_lanes())
    }

    /// `(position, count)` steps covering `0..len`.
    #[inline]
    pub fn steps(&self, len: usize) -> Steps {
        Steps::new(len, self.max_lanes())
    }

    #[inline]
    pub fn widening_steps(&self, len: usize) -> Steps {
        Steps::new(len, self.max_widening_lanes())
    }
}

/// Iterator over `(position, count)` chunks of a row.
#[derive(Debug, Clone)]
pub struct Steps {
    position: usize,
    len: usize,
    max: usize,
}

impl Steps {
    fn new(len: usize, max: usize) -> Self {
        Self {
            position: 0,
            len,
            max,
        }
    }
}

impl Iterator for Steps {
    type Item = (usize, usize);

    #[inline]
    fn next(&mut self) -> Option<(usize, usize)> {
        let remaining = self.len - self.position;
        if remaining == 0 {
            return None;
        }
        let count = remaining.min(self.max);
        let position = self.position;
        self.position += count;
        Some((position, count))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = (self.len - self.position).div_ceil(self.max);
        (n, Some(n))
    }
}

impl ExactSizeIterator for Steps {}
