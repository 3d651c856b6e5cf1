//! Filters and arithmetic on [`imgref`] images.
//!
//! Sources may be strided; results come back as tightly packed `ImgVec`s.
//! [`GrayImage`] converts to and from the `imgref` types with `From`.
//!
//! ```rust
//! use ::imgref::ImgVec;
//! use lanefilter::imgref;
//!
//! let img = ImgVec::new(vec![120u8; 64], 8, 8);
//! let blurred = imgref::gaussian_filter(img.as_ref(), 5, 1.0).unwrap();
//! assert_eq!(blurred.buf(), img.buf());
//! ```

use imgref::{ImgRef, ImgVec};

use crate::{FilterError, GrayImage, OverflowPolicy, Sample};

impl<S: Sample> From<ImgRef<'_, S>> for GrayImage<S> {
    /// Copies the visible `width × height` region, dropping stride padding.
    fn from(src: ImgRef<'_, S>) -> Self {
        let mut image = GrayImage::new(src.width(), src.height());
        for (dst, row) in image.rows_mut().zip(src.rows()) {
            dst.copy_from_slice(row);
        }
        image
    }
}

impl<S: Sample> From<GrayImage<S>> for ImgVec<S> {
    fn from(image: GrayImage<S>) -> Self {
        let (width, height) = (image.width(), image.height());
        ImgVec::new(image.into_pixels(), width, height)
    }
}

pub fn box_filter<S: Sample>(
    src: ImgRef<'_, S>,
    kernel_size: usize,
) -> Result<ImgVec<S>, FilterError> {
    crate::box_filter(&GrayImage::from(src), kernel_size).map(ImgVec::from)
}

pub fn gaussian_filter<S: Sample>(
    src: ImgRef<'_, S>,
    kernel_size: usize,
    sigma: f64,
) -> Result<ImgVec<S>, FilterError> {
    crate::gaussian_filter(&GrayImage::from(src), kernel_size, sigma).map(ImgVec::from)
}

pub fn gaussian_filter_auto<S: Sample>(
    src: ImgRef<'_, S>,
    sigma: f64,
) -> Result<ImgVec<S>, FilterError> {
    crate::gaussian_filter_auto(&GrayImage::from(src), sigma).map(ImgVec::from)
}

pub fn bilateral_filter<S: Sample>(
    src: ImgRef<'_, S>,
    kernel_size: usize,
    sigma_spatial: f64,
    sigma_range: f64,
) -> Result<ImgVec<S>, FilterError> {
    crate::bilateral_filter(&GrayImage::from(src), kernel_size, sigma_spatial, sigma_range)
        .map(ImgVec::from)
}

pub fn add<S: Sample>(
    a: ImgRef<'_, S>,
    b: ImgRef<'_, S>,
    policy: OverflowPolicy,
) -> Result<ImgVec<S>, FilterError> {
    crate::add(&GrayImage::from(a), &GrayImage::from(b), policy).map(ImgVec::from)
}

pub fn add_weighted<S: Sample>(
    a: ImgRef<'_, S>,
    alpha: f64,
    b: ImgRef<'_, S>,
    beta: f64,
    gamma: f64,
    policy: OverflowPolicy,
) -> Result<ImgVec<S>, FilterError> {
    crate::add_weighted(
        &GrayImage::from(a),
        alpha,
        &GrayImage::from(b),
        beta,
        gamma,
        policy,
    )
    .map(ImgVec::from)
}

/// Accumulate a frame into a caller-owned accumulator.
pub fn accumulate<S: Sample>(
    acc: &mut GrayImage<S>,
    frame: ImgRef<'_, S>,
    policy: OverflowPolicy,
) -> Result<(), FilterError> {
    crate::accumulate(acc, &GrayImage::from(frame), policy)
}

pub fn accumulate_squared<S: Sample>(
    acc: &mut GrayImage<S>,
    frame: ImgRef<'_, S>,
    policy: OverflowPolicy,
) -> Result<(), FilterError> {
    crate::accumulate_squared(acc, &GrayImage::from(frame), policy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strided_source() {
        // 3 samples wide, stride 4; the 99s are padding.
        let buf = vec![1u8, 2, 3, 99, 4, 5, 6, 99];
        let src = ImgVec::new_stride(buf, 3, 2, 4);
        let image = GrayImage::from(src.as_ref());
        assert_eq!(image.to_rows(), [[1, 2, 3], [4, 5, 6]]);
    }

    #[test]
    fn round_trip_through_imgvec() {
        let image = GrayImage::from_rows(&[[7u16, 8], [9, 10]]).unwrap();
        let img: ImgVec<u16> = image.clone().into();
        assert_eq!((img.width(), img.height()), (2, 2));
        assert_eq!(img.buf().as_slice(), image.pixels());
    }

    #[test]
    fn add_matches_gray_image_path() {
        let a = ImgVec::new(vec![200u8; 16], 4, 4);
        let b = ImgVec::new(vec![100u8; 4], 2, 2);
        let out = add(a.as_ref(), b.as_ref(), OverflowPolicy::Saturation).unwrap();
        assert_eq!(out.buf()[0], 200);
        assert_eq!(out.buf()[5], 255);
    }

    #[test]
    fn accumulate_from_frames() {
        let mut acc = GrayImage::empty();
        let frame = ImgVec::new(vec![3u8; 9], 3, 3);
        accumulate(&mut acc, frame.as_ref(), OverflowPolicy::Wrap).unwrap();
        accumulate(&mut acc, frame.as_ref(), OverflowPolicy::Wrap).unwrap();
        assert!(acc.pixels().iter().all(|&p| p == 6));
    }

    #[test]
    fn errors_propagate() {
        let img = ImgVec::new(vec![0u8; 6], 3, 2);
        assert_eq!(
            box_filter(img.as_ref(), 3).err(),
            Some(FilterError::InvalidKernel { size: 3 })
        );
    }
}
