// ---------------------------------------------------------------------------
// Separable convolution.
//
// Both passes run the same row kernel: for output column j, tap k reads
// sources[k][j]. The horizontal pass points the sources at shifted slices
// of one padded row; the vertical pass points them at consecutive rows of
// the horizontal result.
// ---------------------------------------------------------------------------

use crate::border::pad_rows;
use crate::kernel::{box_kernel_1d, check_kernel_size, check_sigma, gaussian_kernel_1d};
use crate::{
    BorderMode, Engine, FilterError, FixedKernel, GrayImage, Grouping, Lanes, M1,
    OverflowPolicy, Sample, Vector, dispatch, gaussian_kernel_size,
};

/// Mean over a `kernel_size × kernel_size` window, edges replicated.
///
/// ```rust
/// use lanefilter::{GrayImage, box_filter};
///
/// let flat = GrayImage::filled(8, 8, 200u8);
/// assert_eq!(box_filter(&flat, 3).unwrap(), flat);
/// ```
pub fn box_filter<S: Sample>(
    image: &GrayImage<S>,
    kernel_size: usize,
) -> Result<GrayImage<S>, FilterError> {
    Engine::<M1>::detect().box_filter(image, kernel_size)
}

/// Gaussian blur with an explicit odd kernel size, edges replicated.
pub fn gaussian_filter<S: Sample>(
    image: &GrayImage<S>,
    kernel_size: usize,
    sigma: f64,
) -> Result<GrayImage<S>, FilterError> {
    Engine::<M1>::detect().gaussian_filter(image, kernel_size, sigma)
}

/// Gaussian blur sized from sigma by [`gaussian_kernel_size`].
pub fn gaussian_filter_auto<S: Sample>(
    image: &GrayImage<S>,
    sigma: f64,
) -> Result<GrayImage<S>, FilterError> {
    Engine::<M1>::detect().gaussian_filter_auto(image, sigma)
}

/// Image non-empty, kernel odd and no larger than either dimension.
pub(crate) fn check_kernel<S: Sample>(
    image: &GrayImage<S>,
    kernel_size: usize,
) -> Result<(), FilterError> {
    image.check_non_empty()?;
    check_kernel_size(kernel_size)?;
    if kernel_size > image.width().min(image.height()) {
        return Err(FilterError::InvalidKernel { size: kernel_size });
    }
    Ok(())
}

impl<G: Grouping> Engine<G> {
    pub fn box_filter<S: Sample>(
        &self,
        image: &GrayImage<S>,
        kernel_size: usize,
    ) -> Result<GrayImage<S>, FilterError> {
        check_kernel(image, kernel_size)?;
        let kernel = FixedKernel::quantize::<S>(&box_kernel_1d(kernel_size)?);
        Ok(dispatch::separable(*self, image, &kernel))
    }

    pub fn gaussian_filter<S: Sample>(
        &self,
        image: &GrayImage<S>,
        kernel_size: usize,
        sigma: f64,
    ) -> Result<GrayImage<S>, FilterError> {
        check_kernel(image, kernel_size)?;
        check_sigma(sigma)?;
        let kernel = FixedKernel::quantize::<S>(&gaussian_kernel_1d(kernel_size, sigma)?);
        Ok(dispatch::separable(*self, image, &kernel))
    }

    /// Fails with `InvalidKernel` when the derived size exceeds the image.
    pub fn gaussian_filter_auto<S: Sample>(
        &self,
        image: &GrayImage<S>,
        sigma: f64,
    ) -> Result<GrayImage<S>, FilterError> {
        let kernel_size = gaussian_kernel_size(sigma)?;
        self.gaussian_filter(image, kernel_size, sigma)
    }
}

#[inline(always)]
pub(crate) fn separable_rows<S: Sample, G: Grouping>(
    lanes: Lanes<S, G>,
    image: &GrayImage<S>,
    kernel: &FixedKernel<S::Wide>,
) -> GrayImage<S> {
    let (width, height) = (image.width(), image.height());
    let half = kernel.len() / 2;
    log::debug!(
        "separable {width}x{height}, {} taps, {} lanes per step",
        kernel.len(),
        lanes.max_widening_lanes()
    );

    let padded = pad_rows(lanes, image, half, BorderMode::Replicate);
    let mut sources: Vec<&[S]> = Vec::with_capacity(kernel.len());

    let mut temp = image.like(width, padded.height());
    for (y, dst) in temp.rows_mut().enumerate() {
        let row = padded.row(y);
        sources.clear();
        sources.extend((0..kernel.len()).map(|k| &row[k..k + width]));
        convolve_row(lanes, kernel, &sources, dst);
    }

    let mut out = image.like(width, height);
    let mut sources: Vec<&[S]> = Vec::with_capacity(kernel.len());
    for (y, dst) in out.rows_mut().enumerate() {
        sources.clear();
        sources.extend((0..kernel.len()).map(|k| temp.row(y + k)));
        convolve_row(lanes, kernel, &sources, dst);
    }
    out
}

#[inline(always)]
fn convolve_row<S: Sample, G: Grouping>(
    lanes: Lanes<S, G>,
    kernel: &FixedKernel<S::Wide>,
    sources: &[&[S]],
    dst: &mut [S],
) {
    for (j, count) in lanes.widening_steps(dst.len()) {
        let mut acc = Vector::<S::Wide>::zero(count);
        for (src, &tap) in sources.iter().zip(kernel.taps()) {
            acc = acc.add(&Vector::load(&src[j..], count).widen().mul_scalar(tap));
        }
        let acc = acc.shr(kernel.shift());
        Vector::<S>::narrow(&acc, OverflowPolicy::Saturation).store(&mut dst[j..]);
    }
}
