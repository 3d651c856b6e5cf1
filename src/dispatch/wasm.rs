use archmage::prelude::*;

use crate::arith::{Accumulation, Blend, accumulate_rows, add_rows, add_weighted_rows};
use crate::bilateral::bilateral_rows;
use crate::border::{center_rows, pad_rows};
use crate::convolve::separable_rows;
use crate::{BorderMode, Engine, FixedKernel, GrayImage, Grouping, OverflowPolicy, RangeLut, Sample};

// ===========================================================================
// WASM SIMD128 arcane entries
// ===========================================================================

#[arcane]
pub(super) fn pad_impl_wasm128<S: Sample, G: Grouping>(
    t: Wasm128Token,
    engine: Engine<G>,
    image: &GrayImage<S>,
    pad: usize,
    mode: BorderMode,
) -> GrayImage<S> {
    pad_rows(engine.lanes_on(t), image, pad, mode)
}

#[arcane]
pub(super) fn center_impl_wasm128<S: Sample, G: Grouping>(
    t: Wasm128Token,
    engine: Engine<G>,
    src: &GrayImage<S>,
    dst: &mut GrayImage<S>,
) {
    center_rows(engine.lanes_on(t), src, dst);
}

#[arcane]
pub(super) fn separable_impl_wasm128<S: Sample, G: Grouping>(
    t: Wasm128Token,
    engine: Engine<G>,
    image: &GrayImage<S>,
    kernel: &FixedKernel<S::Wide>,
) -> GrayImage<S> {
    separable_rows(engine.lanes_on(t), image, kernel)
}

#[arcane]
pub(super) fn bilateral_impl_wasm128<S: Sample, G: Grouping>(
    t: Wasm128Token,
    engine: Engine<G>,
    image: &GrayImage<S>,
    spatial: &[f64],
    range: &RangeLut,
) -> GrayImage<S> {
    bilateral_rows(engine.lanes_on(t), image, spatial, range)
}

#[arcane]
pub(super) fn add_impl_wasm128<S: Sample, G: Grouping>(
    t: Wasm128Token,
    engine: Engine<G>,
    a: &GrayImage<S>,
    b: &GrayImage<S>,
    policy: OverflowPolicy,
) -> GrayImage<S> {
    add_rows(engine.lanes_on(t), a, b, policy)
}

#[arcane]
pub(super) fn add_weighted_impl_wasm128<S: Sample, G: Grouping>(
    t: Wasm128Token,
    engine: Engine<G>,
    a: &GrayImage<S>,
    b: &GrayImage<S>,
    blend: Blend,
    policy: OverflowPolicy,
) -> GrayImage<S> {
    add_weighted_rows(engine.lanes_on(t), a, b, blend, policy)
}

#[arcane]
pub(super) fn accumulate_impl_wasm128<S: Sample, G: Grouping>(
    t: Wasm128Token,
    engine: Engine<G>,
    acc: &mut GrayImage<S>,
    image: &GrayImage<S>,
    op: Accumulation,
    policy: OverflowPolicy,
) {
    accumulate_rows(engine.lanes_on(t), acc, image, op, policy);
}
