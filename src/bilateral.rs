use crate::border::pad_rows;
use crate::convolve::check_kernel;
use crate::kernel::{check_sigma, gaussian_weight};
use crate::{
    BorderMode, Engine, FilterError, GrayImage, Grouping, Lanes, M1, MAX_LANES, OverflowPolicy,
    Sample, Vector, dispatch, gaussian_kernel_1d,
};

/// Range weights `exp(-d² / 2σr²)` indexed by absolute intensity difference.
///
/// Tabulated for every `d` in `0..=MAX` when samples are 16 bits or
/// narrower; for 32-bit samples each weight is evaluated on demand.
#[derive(Debug, Clone)]
pub struct RangeLut {
    table: Vec<f64>,
    two_sigma_sq: f64,
}

impl RangeLut {
    pub fn new<S: Sample>(sigma_range: f64) -> Result<Self, FilterError> {
        check_sigma(sigma_range)?;
        let two_sigma_sq = 2.0 * sigma_range * sigma_range;
        let table = if S::BITS <= 16 {
            (0..=S::MAX.to_u64())
                .map(|d| gaussian_weight(d as f64, two_sigma_sq))
                .collect()
        } else {
            Vec::new()
        };
        Ok(Self {
            table,
            two_sigma_sq,
        })
    }

    #[inline]
    pub fn weight(&self, diff: u64) -> f64 {
        match self.table.get(diff as usize) {
            Some(&w) => w,
            None => gaussian_weight(diff as f64, self.two_sigma_sq),
        }
    }

    /// Number of tabulated entries; 0 when weights are computed on demand.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Edge-preserving smoothing.
///
/// Each output pixel is the average of its `kernel_size²` neighborhood,
/// weighted by a spatial Gaussian (`sigma_spatial`) times a range Gaussian
/// of the intensity difference to the center (`sigma_range`). Samples
/// outside the image are 0.
///
/// ```rust
/// use lanefilter::{GrayImage, bilateral_filter};
///
/// let step = GrayImage::from_rows(&[[10u8, 10, 200, 200]; 4]).unwrap();
/// let out = bilateral_filter(&step, 3, 1.0, 1.0).unwrap();
/// assert_eq!(out.row(1), &[10, 10, 200, 200]);
/// ```
pub fn bilateral_filter<S: Sample>(
    image: &GrayImage<S>,
    kernel_size: usize,
    sigma_spatial: f64,
    sigma_range: f64,
) -> Result<GrayImage<S>, FilterError> {
    Engine::<M1>::detect().bilateral_filter(image, kernel_size, sigma_spatial, sigma_range)
}

impl<G: Grouping> Engine<G> {
    pub fn bilateral_filter<S: Sample>(
        &self,
        image: &GrayImage<S>,
        kernel_size: usize,
        sigma_spatial: f64,
        sigma_range: f64,
    ) -> Result<GrayImage<S>, FilterError> {
        check_kernel(image, kernel_size)?;
        check_sigma(sigma_spatial)?;
        check_sigma(sigma_range)?;

        let spatial = gaussian_kernel_1d(kernel_size, sigma_spatial)?;
        let range = RangeLut::new::<S>(sigma_range)?;
        Ok(dispatch::bilateral(*self, image, &spatial, &range))
    }
}

#[inline(always)]
pub(crate) fn bilateral_rows<S: Sample, G: Grouping>(
    lanes: Lanes<S, G>,
    image: &GrayImage<S>,
    spatial: &[f64],
    range: &RangeLut,
) -> GrayImage<S> {
    let half = spatial.len() / 2;
    let (width, height) = (image.width(), image.height());
    log::debug!(
        "bilateral {width}x{height}, {} taps, {} lanes per step",
        spatial.len(),
        lanes.max_lanes()
    );

    let padded = pad_rows(lanes, image, half, BorderMode::Zero);
    let mut out = image.like(width, height);
    let mut norm = [0.0f64; MAX_LANES];
    let mut sum = [0.0f64; MAX_LANES];

    for (y, dst) in out.rows_mut().enumerate() {
        let center_row = &padded.row(y + half)[half..];
        for (j, count) in lanes.steps(width) {
            let center = Vector::load(&center_row[j..], count);
            let (norm, sum) = (&mut norm[..count], &mut sum[..count]);
            norm.fill(0.0);
            sum.fill(0.0);

            for (ki, &wy) in spatial.iter().enumerate() {
                let row = padded.row(y + ki);
                for (kj, &wx) in spatial.iter().enumerate() {
                    let pixels = Vector::load(&row[j + kj..], count);
                    let diffs = pixels.abs_diff(&center);
                    let ws = wy * wx;
                    for (lane, (&p, &d)) in
                        pixels.as_slice().iter().zip(diffs.as_slice()).enumerate()
                    {
                        let w = ws * range.weight(d.to_u64());
                        norm[lane] += w;
                        sum[lane] += w * p.to_f64();
                    }
                }
            }

            for ((d, &n), &s) in dst[j..j + count].iter_mut().zip(&*norm).zip(&*sum) {
                *d = S::from_f64(s / n, OverflowPolicy::Saturation);
            }
        }
    }
    out
}
