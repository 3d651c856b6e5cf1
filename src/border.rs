use crate::{Engine, FilterError, GrayImage, Grouping, Lanes, M1, Sample, Vector, dispatch};

/// How samples outside the image are synthesized when padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderMode {
    /// Outside samples are 0.
    #[default]
    Zero,
    /// Outside samples repeat the nearest edge sample.
    Replicate,
}

/// Offset that centers an extent of `inner` inside `outer`.
///
/// Floor of half the difference; 0 when `inner >= outer`.
#[inline]
pub fn centering_offset(outer: usize, inner: usize) -> usize {
    outer.saturating_sub(inner) / 2
}

/// Copy of `image` with a `pad`-sample border on every side.
pub fn pad<S: Sample>(
    image: &GrayImage<S>,
    pad: usize,
    mode: BorderMode,
) -> Result<GrayImage<S>, FilterError> {
    Engine::<M1>::detect().pad(image, pad, mode)
}

/// Copy `src` into `dst` at the centering offsets.
pub fn center_into<S: Sample>(
    src: &GrayImage<S>,
    dst: &mut GrayImage<S>,
) -> Result<(), FilterError> {
    Engine::<M1>::detect().center_into(src, dst)
}

impl<G: Grouping> Engine<G> {
    pub fn pad<S: Sample>(
        &self,
        image: &GrayImage<S>,
        pad: usize,
        mode: BorderMode,
    ) -> Result<GrayImage<S>, FilterError> {
        image.check_non_empty()?;
        Ok(dispatch::pad(*self, image, pad, mode))
    }

    /// `dst` must be at least as wide and as tall as `src`.
    pub fn center_into<S: Sample>(
        &self,
        src: &GrayImage<S>,
        dst: &mut GrayImage<S>,
    ) -> Result<(), FilterError> {
        if src.width() > dst.width() || src.height() > dst.height() {
            return Err(FilterError::ShapeViolation {
                width: src.width(),
                height: src.height(),
            });
        }
        dispatch::center(*self, src, dst);
        Ok(())
    }
}

// ===========================================================================
// Row kernels
// ===========================================================================

#[inline(always)]
pub(crate) fn copy_row<S: Sample, G: Grouping>(lanes: Lanes<S, G>, src: &[S], dst: &mut [S]) {
    for (j, count) in lanes.steps(src.len()) {
        Vector::load(&src[j..], count).store(&mut dst[j..]);
    }
}

#[inline(always)]
pub(crate) fn pad_rows<S: Sample, G: Grouping>(
    lanes: Lanes<S, G>,
    image: &GrayImage<S>,
    pad: usize,
    mode: BorderMode,
) -> GrayImage<S> {
    let (width, height) = (image.width(), image.height());
    let padded_width = width + 2 * pad;
    let padded_height = height + 2 * pad;
    let mut padded = image.like(padded_width, padded_height);

    for (y, src) in image.rows().enumerate() {
        let row = padded.row_mut(y + pad);
        copy_row(lanes, src, &mut row[pad..pad + width]);
        if mode == BorderMode::Replicate {
            let (first, last) = (src[0], src[width - 1]);
            row[..pad].fill(first);
            row[pad + width..].fill(last);
        }
    }

    if mode == BorderMode::Replicate && pad > 0 {
        let top = pad * padded_width;
        let bottom = (pad + height - 1) * padded_width;
        let pixels = padded.pixels_mut();
        for y in 0..pad {
            pixels.copy_within(top..top + padded_width, y * padded_width);
            pixels.copy_within(
                bottom..bottom + padded_width,
                (pad + height + y) * padded_width,
            );
        }
    }
    padded
}

#[inline(always)]
pub(crate) fn center_rows<S: Sample, G: Grouping>(
    lanes: Lanes<S, G>,
    src: &GrayImage<S>,
    dst: &mut GrayImage<S>,
) {
    let y0 = centering_offset(dst.height(), src.height());
    let x0 = centering_offset(dst.width(), src.width());
    for (y, row) in src.rows().enumerate() {
        copy_row(lanes, row, &mut dst.row_mut(y0 + y)[x0..x0 + src.width()]);
    }
}
