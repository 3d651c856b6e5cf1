//! # lanefilter
//!
//! Grayscale image kernels written against a scalable-width SIMD lane model.
//!
//! Every kernel walks its rows in variable-size steps: the number of samples
//! a step covers is asked of a [`Lanes`] resolver at runtime. The answer
//! depends on the sample width, on a grouping factor ([`M1`], [`M2`], [`M4`],
//! [`M8`] registers per step) and on the register width of the CPU tier
//! picked by runtime dispatch (x86-64 AVX2, ARM NEON, WASM SIMD128, or the
//! scalar fallback).
//!
//! Each operation dispatches once per call. Its row loops are then compiled
//! and run inside the chosen tier's target features, with steps sized from
//! that tier's [`Tier::REGISTER_BYTES`].
//!
//! ## Operations
//!
//! - Separable convolution: [`box_filter`], [`gaussian_filter`],
//!   [`gaussian_filter_auto`].
//! - Pixel arithmetic with an explicit [`OverflowPolicy`]: [`add`],
//!   [`add_weighted`], [`accumulate`], [`accumulate_squared`].
//! - Edge-preserving smoothing: [`bilateral_filter`].
//! - Building blocks: [`pad`], [`centering_offset`], [`center_into`],
//!   [`gaussian_kernel_1d`], [`FixedKernel`].
//!
//! The free functions use [`M1`] grouping and the detected register width.
//! [`Engine`] exposes the same operations for any grouping factor, or with a
//! pinned register width.
//!
//! All operations are generic over the sample type: `u8`, `u16` and `u32`.
//!
//! ```rust
//! use lanefilter::{GrayImage, OverflowPolicy, add};
//!
//! let a = GrayImage::from_rows(&[[100u8, 150], [200, 50]]).unwrap();
//! let b = GrayImage::from_rows(&[[50u8, 100], [30, 200]]).unwrap();
//! let sum = add(&a, &b, OverflowPolicy::Saturation).unwrap();
//! assert_eq!(sum.to_rows(), [[150, 250], [230, 250]]);
//! ```
//!
//! ## Feature flags
//!
//! - **`std`** (default) — runtime CPU detection in `archmage`.
//! - **`imgref`** — conversions between [`GrayImage`] and [`imgref`] types,
//!   plus whole-image wrappers taking `ImgRef` and returning `ImgVec`.

#![forbid(unsafe_code)]

use core::fmt;

mod arith;
mod bilateral;
mod border;
mod convolve;
mod dispatch;
mod engine;
mod image;
mod kernel;
mod lanes;
mod policy;

pub use arith::*;
pub use bilateral::*;
pub use border::*;
pub use convolve::*;
pub use engine::Engine;
pub use image::{GrayImage, ImageFormat};
pub use kernel::*;
pub use lanes::{
    GROUP_BYTES, Grouping, Lane, Lanes, M1, M2, M4, M8, MAX_LANES, Mask, Sample, Steps, Tier,
    Vector, capacity, register_bytes,
};
pub use policy::OverflowPolicy;

#[cfg(feature = "imgref")]
pub mod imgref;


/// Invalid arguments to a kernel.
///
/// Every operation validates its inputs before it allocates or mutates
/// anything, so an `Err` leaves caller-owned buffers untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum FilterError {
    /// An image or operand has zero rows or zero columns.
    EmptyInput,
    /// An arithmetic operand or accumulator is not square.
    ShapeViolation { width: usize, height: usize },
    /// Kernel size is zero, even, or larger than an image dimension.
    InvalidKernel { size: usize },
    /// An overflow policy value outside {saturation, wrap}.
    InvalidPolicy,
    /// A Gaussian sigma that is not finite and positive.
    InvalidSigma { sigma: f64 },
    /// Pixel buffer length does not match `width * height`.
    BufferLength { expected: usize, actual: usize },
    /// A row of a row-list image differs in length from the first row.
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::EmptyInput => f.write_str("image has zero rows or zero columns"),
            Self::ShapeViolation { width, height } => {
                write!(f, "operand must be square, got {width}x{height}")
            }
            Self::InvalidKernel { size } => write!(
                f,
                "kernel size {size} must be odd, non-zero and fit inside the image"
            ),
            Self::InvalidPolicy => f.write_str("overflow policy must be saturation or wrap"),
            Self::InvalidSigma { sigma } => {
                write!(f, "sigma must be finite and positive, got {sigma}")
            }
            Self::BufferLength { expected, actual } => {
                write!(f, "pixel buffer holds {actual} samples, expected {expected}")
            }
            Self::RaggedRows {
                row,
                expected,
                actual,
            } => write!(f, "row {row} has {actual} samples, expected {expected}"),
        }
    }
}

impl core::error::Error for FilterError {}
