// ---------------------------------------------------------------------------
// Whole-image kernels with SIMD dispatch.
//
// Architecture: the row loops live next to their operations as generic
// `#[inline(always)]` bodies taking a `Lanes` resolver. Per-tier #[arcane]
// entries build the resolver from their token and call the body, so it is
// compiled inside that tier's target-feature context. Each operation
// dispatches once via incant!; every row of the image runs on the chosen
// tier.
// ---------------------------------------------------------------------------

use archmage::incant;

use crate::arith::{Accumulation, Blend};
use crate::{BorderMode, Engine, FixedKernel, GrayImage, Grouping, OverflowPolicy, RangeLut, Sample};

mod scalar;
use scalar::*;

#[cfg(target_arch = "x86_64")]
mod avx2;
#[cfg(target_arch = "x86_64")]
use avx2::*;

#[cfg(target_arch = "aarch64")]
mod neon;
#[cfg(target_arch = "aarch64")]
use neon::*;

#[cfg(target_arch = "wasm32")]
mod wasm;
#[cfg(target_arch = "wasm32")]
use wasm::*;

#[cfg(test)]
mod tests;

// ===========================================================================
// Border
// ===========================================================================

pub(crate) fn pad<S: Sample, G: Grouping>(
    engine: Engine<G>,
    image: &GrayImage<S>,
    pad: usize,
    mode: BorderMode,
) -> GrayImage<S> {
    incant!(
        pad_impl(engine, image, pad, mode),
        [v3, arm_v2, wasm128, scalar]
    )
}

pub(crate) fn center<S: Sample, G: Grouping>(
    engine: Engine<G>,
    src: &GrayImage<S>,
    dst: &mut GrayImage<S>,
) {
    incant!(center_impl(engine, src, dst), [v3, arm_v2, wasm128, scalar])
}

// ===========================================================================
// Convolution
// ===========================================================================

pub(crate) fn separable<S: Sample, G: Grouping>(
    engine: Engine<G>,
    image: &GrayImage<S>,
    kernel: &FixedKernel<S::Wide>,
) -> GrayImage<S> {
    incant!(
        separable_impl(engine, image, kernel),
        [v3, arm_v2, wasm128, scalar]
    )
}

pub(crate) fn bilateral<S: Sample, G: Grouping>(
    engine: Engine<G>,
    image: &GrayImage<S>,
    spatial: &[f64],
    range: &RangeLut,
) -> GrayImage<S> {
    incant!(
        bilateral_impl(engine, image, spatial, range),
        [v3, arm_v2, wasm128, scalar]
    )
}

// ===========================================================================
// Arithmetic
// ===========================================================================

pub(crate) fn add<S: Sample, G: Grouping>(
    engine: Engine<G>,
    a: &GrayImage<S>,
    b: &GrayImage<S>,
    policy: OverflowPolicy,
) -> GrayImage<S> {
    incant!(add_impl(engine, a, b, policy), [v3, arm_v2, wasm128, scalar])
}

pub(crate) fn add_weighted<S: Sample, G: Grouping>(
    engine: Engine<G>,
    a: &GrayImage<S>,
    b: &GrayImage<S>,
    blend: Blend,
    policy: OverflowPolicy,
) -> GrayImage<S> {
    incant!(
        add_weighted_impl(engine, a, b, blend, policy),
        [v3, arm_v2, wasm128, scalar]
    )
}

pub(crate) fn accumulate<S: Sample, G: Grouping>(
    engine: Engine<G>,
    acc: &mut GrayImage<S>,
    image: &GrayImage<S>,
    op: Accumulation,
    policy: OverflowPolicy,
) {
    incant!(
        accumulate_impl(engine, acc, image, op, policy),
        [v3, arm_v2, wasm128, scalar]
    )
}
