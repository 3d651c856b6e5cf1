// ---------------------------------------------------------------------------
// Pixel arithmetic on square images.
//
// Operands of different sizes are combined centered: the output takes the
// larger dimension and each operand is copied in at its centering offset.
// The accumulator operations grow and re-center the accumulator the same
// way before adding into it.
// ---------------------------------------------------------------------------

use std::borrow::Cow;

use crate::border::center_rows;
use crate::{
    Engine, FilterError, GrayImage, Grouping, Lanes, M1, OverflowPolicy, Sample, Vector,
    centering_offset, dispatch,
};

/// `a + b` per pixel.
///
/// Operands must be square. When their sizes differ, the output takes the
/// larger size and both operands are centered in it.
pub fn add<S: Sample>(
    a: &GrayImage<S>,
    b: &GrayImage<S>,
    policy: OverflowPolicy,
) -> Result<GrayImage<S>, FilterError> {
    Engine::<M1>::detect().add(a, b, policy)
}

/// `round(alpha·a + beta·b + gamma)` per pixel.
///
/// ```rust
/// use lanefilter::{GrayImage, OverflowPolicy, add_weighted};
///
/// let a = GrayImage::from_rows(&[[100u8, 150], [200, 50]]).unwrap();
/// let b = GrayImage::from_rows(&[[50u8, 100], [30, 200]]).unwrap();
/// let out = add_weighted(&a, 0.7, &b, 0.3, 10.0, OverflowPolicy::Saturation).unwrap();
/// assert_eq!(out.to_rows(), [[95, 145], [159, 105]]);
/// ```
pub fn add_weighted<S: Sample>(
    a: &GrayImage<S>,
    alpha: f64,
    b: &GrayImage<S>,
    beta: f64,
    gamma: f64,
    policy: OverflowPolicy,
) -> Result<GrayImage<S>, FilterError> {
    Engine::<M1>::detect().add_weighted(a, alpha, b, beta, gamma, policy)
}

/// `acc += image`, growing `acc` to fit.
///
/// An empty accumulator becomes a copy of `image`.
pub fn accumulate<S: Sample>(
    acc: &mut GrayImage<S>,
    image: &GrayImage<S>,
    policy: OverflowPolicy,
) -> Result<(), FilterError> {
    Engine::<M1>::detect().accumulate(acc, image, policy)
}

/// `acc = acc² + image²`, squares taken in the wide type.
///
/// An empty accumulator becomes `image²` narrowed with `policy`. Squares of
/// 8-bit samples above 15 exceed 255, so saturation dominates quickly on
/// full-range data.
pub fn accumulate_squared<S: Sample>(
    acc: &mut GrayImage<S>,
    image: &GrayImage<S>,
    policy: OverflowPolicy,
) -> Result<(), FilterError> {
    Engine::<M1>::detect().accumulate_squared(acc, image, policy)
}

#[inline]
fn check_operand<S: Sample>(image: &GrayImage<S>) -> Result<(), FilterError> {
    image.check_non_empty()?;
    image.check_square()
}

// ===========================================================================
// Lane kernels
// ===========================================================================

/// Saturation detects overflow as `wrapped sum < operand`.
#[inline(always)]
fn add_lanes<S: Sample>(a: Vector<S>, b: &Vector<S>, policy: OverflowPolicy) -> Vector<S> {
    let sum = a.add(b);
    match policy {
        OverflowPolicy::Wrap => sum,
        OverflowPolicy::Saturation => {
            let overflow = sum.lt(&a);
            sum.select(&overflow, S::MAX)
        }
    }
}

#[inline(always)]
fn square_sum_lanes<S: Sample>(a: Vector<S>, b: &Vector<S>, policy: OverflowPolicy) -> Vector<S> {
    let (a, b) = (a.widen(), b.widen());
    let (a, b) = (a.mul(&a), b.mul(&b));
    let sum = match policy {
        OverflowPolicy::Wrap => a.add(&b),
        OverflowPolicy::Saturation => a.saturating_add(&b),
    };
    Vector::narrow(&sum, policy)
}

#[inline(always)]
fn square_lanes<S: Sample>(v: Vector<S>, policy: OverflowPolicy) -> Vector<S> {
    let wide = v.widen();
    Vector::narrow(&wide.mul(&wide), policy)
}

// ===========================================================================
// Operations
// ===========================================================================

/// Coefficients of a weighted add.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Blend {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl Blend {
    #[inline(always)]
    fn apply<S: Sample>(self, x: S, y: S, policy: OverflowPolicy) -> S {
        S::from_f64(
            self.alpha * x.to_f64() + self.beta * y.to_f64() + self.gamma,
            policy,
        )
    }
}

/// What an accumulator update adds into the accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Accumulation {
    /// `acc + image`
    Sum,
    /// `acc² + image²`
    SquareSum,
}

impl<G: Grouping> Engine<G> {
    pub fn add<S: Sample>(
        &self,
        a: &GrayImage<S>,
        b: &GrayImage<S>,
        policy: OverflowPolicy,
    ) -> Result<GrayImage<S>, FilterError> {
        check_operand(a)?;
        check_operand(b)?;
        Ok(dispatch::add(*self, a, b, policy))
    }

    pub fn add_weighted<S: Sample>(
        &self,
        a: &GrayImage<S>,
        alpha: f64,
        b: &GrayImage<S>,
        beta: f64,
        gamma: f64,
        policy: OverflowPolicy,
    ) -> Result<GrayImage<S>, FilterError> {
        check_operand(a)?;
        check_operand(b)?;
        let blend = Blend { alpha, beta, gamma };
        Ok(dispatch::add_weighted(*self, a, b, blend, policy))
    }

    pub fn accumulate<S: Sample>(
        &self,
        acc: &mut GrayImage<S>,
        image: &GrayImage<S>,
        policy: OverflowPolicy,
    ) -> Result<(), FilterError> {
        self.accumulate_op(acc, image, Accumulation::Sum, policy)
    }

    pub fn accumulate_squared<S: Sample>(
        &self,
        acc: &mut GrayImage<S>,
        image: &GrayImage<S>,
        policy: OverflowPolicy,
    ) -> Result<(), FilterError> {
        self.accumulate_op(acc, image, Accumulation::SquareSum, policy)
    }

    fn accumulate_op<S: Sample>(
        &self,
        acc: &mut GrayImage<S>,
        image: &GrayImage<S>,
        op: Accumulation,
        policy: OverflowPolicy,
    ) -> Result<(), FilterError> {
        check_operand(image)?;
        if !acc.is_empty() {
            check_operand(acc)?;
        }
        dispatch::accumulate(*self, acc, image, op, policy);
        Ok(())
    }
}

// ===========================================================================
// Row kernels
// ===========================================================================

#[inline(always)]
pub(crate) fn add_rows<S: Sample, G: Grouping>(
    lanes: Lanes<S, G>,
    a: &GrayImage<S>,
    b: &GrayImage<S>,
    policy: OverflowPolicy,
) -> GrayImage<S> {
    if a.width() != b.width() {
        return add_centered(lanes, a, b, policy);
    }
    let mut out = a.like(a.width(), a.height());
    for ((ra, rb), dst) in a.rows().zip(b.rows()).zip(out.rows_mut()) {
        for (j, count) in lanes.steps(dst.len()) {
            let va = Vector::load(&ra[j..], count);
            let vb = Vector::load(&rb[j..], count);
            add_lanes(va, &vb, policy).store(&mut dst[j..]);
        }
    }
    out
}

#[inline(always)]
pub(crate) fn add_weighted_rows<S: Sample, G: Grouping>(
    lanes: Lanes<S, G>,
    a: &GrayImage<S>,
    b: &GrayImage<S>,
    blend: Blend,
    policy: OverflowPolicy,
) -> GrayImage<S> {
    let (a, b) = centered_pair(lanes, a, b);
    let mut out = a.like(a.width(), a.height());
    for ((ra, rb), dst) in a.rows().zip(b.rows()).zip(out.rows_mut()) {
        for (j, count) in lanes.steps(dst.len()) {
            let va = Vector::load(&ra[j..], count);
            let vb = Vector::load(&rb[j..], count);
            Vector::<S>::combine(&va, &vb, |x, y| blend.apply(x, y, policy))
                .store(&mut dst[j..]);
        }
    }
    out
}

/// An empty accumulator becomes `image`, or `image²` for a square sum.
#[inline(always)]
pub(crate) fn accumulate_rows<S: Sample, G: Grouping>(
    lanes: Lanes<S, G>,
    acc: &mut GrayImage<S>,
    image: &GrayImage<S>,
    op: Accumulation,
    policy: OverflowPolicy,
) {
    match op {
        Accumulation::Sum if acc.is_empty() => *acc = image.clone(),
        Accumulation::Sum => {
            accumulate_with(lanes, acc, image, false, |a, b| add_lanes(a, b, policy));
        }
        Accumulation::SquareSum if acc.is_empty() => {
            let mut squared = image.like(image.width(), image.height());
            for (src, dst) in image.rows().zip(squared.rows_mut()) {
                for (j, count) in lanes.widening_steps(dst.len()) {
                    square_lanes(Vector::load(&src[j..], count), policy).store(&mut dst[j..]);
                }
            }
            *acc = squared;
        }
        Accumulation::SquareSum => {
            accumulate_with(lanes, acc, image, true, |a, b| {
                square_sum_lanes(a, b, policy)
            });
        }
    }
}

/// Both operands centered in a square of the larger size. Borrowed as-is
/// when the sizes already match.
#[inline(always)]
fn centered_pair<'a, S: Sample, G: Grouping>(
    lanes: Lanes<S, G>,
    a: &'a GrayImage<S>,
    b: &'a GrayImage<S>,
) -> (Cow<'a, GrayImage<S>>, Cow<'a, GrayImage<S>>) {
    let dim = a.width().max(b.width());
    let fit = |image: &'a GrayImage<S>| {
        if image.width() == dim {
            Cow::Borrowed(image)
        } else {
            let mut grown = image.like(dim, dim);
            center_rows(lanes, image, &mut grown);
            Cow::Owned(grown)
        }
    };
    (fit(a), fit(b))
}

/// General path of [`add`]: both operands copied centered, then summed.
#[inline(always)]
fn add_centered<S: Sample, G: Grouping>(
    lanes: Lanes<S, G>,
    a: &GrayImage<S>,
    b: &GrayImage<S>,
    policy: OverflowPolicy,
) -> GrayImage<S> {
    let dim = a.width().max(b.width());
    let mut out = a.like(dim, dim);
    center_rows(lanes, a, &mut out);
    let mut other = a.like(dim, dim);
    center_rows(lanes, b, &mut other);
    for (dst, rhs) in out.rows_mut().zip(other.rows()) {
        for (j, count) in lanes.steps(dst.len()) {
            let va = Vector::load(&dst[j..], count);
            let vb = Vector::load(&rhs[j..], count);
            add_lanes(va, &vb, policy).store(&mut dst[j..]);
        }
    }
    out
}

/// Grow `acc` to at least `dim` × `dim`, old contents re-centered.
#[inline(always)]
fn grow<S: Sample, G: Grouping>(lanes: Lanes<S, G>, acc: &mut GrayImage<S>, dim: usize) {
    if acc.width() >= dim {
        return;
    }
    log::debug!("accumulator grows {0}x{0} -> {1}x{1}", acc.width(), dim);
    let mut grown = acc.like(dim, dim);
    center_rows(lanes, acc, &mut grown);
    *acc = grown;
}

/// Grow `acc`, then combine `image` into it at the centering offset.
#[inline(always)]
fn accumulate_with<S: Sample, G: Grouping>(
    lanes: Lanes<S, G>,
    acc: &mut GrayImage<S>,
    image: &GrayImage<S>,
    widening: bool,
    combine: impl Fn(Vector<S>, &Vector<S>) -> Vector<S>,
) {
    grow(lanes, acc, image.width());
    let offset = centering_offset(acc.width(), image.width());
    let width = image.width();
    for (y, src) in image.rows().enumerate() {
        let dst = &mut acc.row_mut(offset + y)[offset..offset + width];
        let steps = if widening {
            lanes.widening_steps(width)
        } else {
            lanes.steps(width)
        };
        for (j, count) in steps {
            let current = Vector::load(&dst[j..], count);
            let incoming = Vector::load(&src[j..], count);
            combine(current, &incoming).store(&mut dst[j..]);
        }
    }
}
