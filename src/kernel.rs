use crate::{FilterError, Lane, Sample};

/// Normalized 1D Gaussian of `size` taps (`size` odd).
///
/// `w[i] = exp(-(i - size/2)² / 2σ²)`, scaled so the taps sum to 1.
///
/// ```rust
/// let k = lanefilter::gaussian_kernel_1d(5, 1.0).unwrap();
/// assert!((k.iter().sum::<f64>() - 1.0).abs() < 1e-9);
/// assert_eq!(k[0], k[4]);
/// ```
pub fn gaussian_kernel_1d(size: usize, sigma: f64) -> Result<Vec<f64>, FilterError> {
    check_kernel_size(size)?;
    check_sigma(sigma)?;
    let center = (size / 2) as f64;
    let two_sigma_sq = 2.0 * sigma * sigma;
    let mut weights: Vec<f64> = (0..size)
        .map(|i| gaussian_weight(i as f64 - center, two_sigma_sq))
        .collect();
    let sum: f64 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    Ok(weights)
}

/// Unnormalized `exp(-x² / 2σ²)`.
///
/// A `2σ²` that underflows to 0 is the delta limit: 1 at `x == 0`, 0
/// elsewhere.
#[inline]
pub(crate) fn gaussian_weight(x: f64, two_sigma_sq: f64) -> f64 {
    if two_sigma_sq > 0.0 {
        (-(x * x) / two_sigma_sq).exp()
    } else if x == 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Uniform `1/size` kernel.
pub fn box_kernel_1d(size: usize) -> Result<Vec<f64>, FilterError> {
    check_kernel_size(size)?;
    Ok(vec![1.0 / size as f64; size])
}

/// Kernel size covering ±3σ: `ceil(6σ)`, rounded up to odd.
pub fn gaussian_kernel_size(sigma: f64) -> Result<usize, FilterError> {
    check_sigma(sigma)?;
    Ok(((6.0 * sigma).ceil() as usize) | 1)
}

pub(crate) fn check_kernel_size(size: usize) -> Result<(), FilterError> {
    if size == 0 || size.is_multiple_of(2) {
        Err(FilterError::InvalidKernel { size })
    } else {
        Ok(())
    }
}

pub(crate) fn check_sigma(sigma: f64) -> Result<(), FilterError> {
    if sigma.is_finite() && sigma > 0.0 {
        Ok(())
    } else {
        Err(FilterError::InvalidSigma { sigma })
    }
}

// ===========================================================================
// Fixed point
// ===========================================================================

/// Kernel quantized to integers that sum to exactly `2^shift`.
///
/// Taps are stored in the wide type of the sample they will multiply, with
/// `shift` equal to the sample width. A full-range sample times the tap sum
/// then stays below `2^(2W)`, so a one-doubling accumulator never overflows,
/// and a constant input comes back unchanged after `>> shift`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedKernel<W> {
    taps: Vec<W>,
    shift: u32,
}

impl<W: Lane> FixedKernel<W> {
    /// Quantize real weights (summing to 1) for samples of type `S`.
    ///
    /// Each tap starts at `round(w · 2^W)`. The remaining difference to
    /// `2^W` is then settled one unit at a time on the tap with the largest
    /// rounding error in the needed direction, ties going to the tap nearest
    /// the center. No tap goes negative.
    ///
    /// Every tap ends within one unit of `w · 2^W`, so each weight is off by
    /// less than `2^-W` (1/256 for `u8`). One pass over a `k`-tap kernel
    /// then differs from real-valued convolution by less than `k` sample
    /// levels, plus one from the flooring shift.
    pub fn quantize<S: Sample<Wide = W>>(weights: &[f64]) -> Self {
        let scale = 1u64 << S::BITS;
        let exact: Vec<f64> = weights.iter().map(|w| w * scale as f64).collect();
        let mut taps: Vec<i64> = exact.iter().map(|e| e.round().max(0.0) as i64).collect();
        let center = weights.len() / 2;

        let mut residual = scale as i64 - taps.iter().sum::<i64>();
        while residual != 0 {
            let step = residual.signum();
            let error = |i: usize| (exact[i] - taps[i] as f64) * step as f64;
            let pick = (0..taps.len())
                .filter(|&i| step > 0 || taps[i] > 0)
                .max_by(|&a, &b| {
                    error(a)
                        .total_cmp(&error(b))
                        .then_with(|| b.abs_diff(center).cmp(&a.abs_diff(center)))
                });
            let Some(i) = pick else { break };
            taps[i] += step;
            residual -= step;
        }

        Self {
            taps: taps.into_iter().map(|t| W::from_u64(t as u64)).collect(),
            shift: S::BITS,
        }
    }

    #[inline]
    pub fn taps(&self) -> &[W] {
        &self.taps
    }

    /// Right shift that divides an accumulated sum by the tap total.
    #[inline]
    pub fn shift(&self) -> u32 {
        self.shift
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.taps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }
}
