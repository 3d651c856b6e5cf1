use crate::{FilterError, Sample};

/// Container format an image was decoded from. Metadata only; no codec
/// lives in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageFormat {
    #[default]
    Unknown,
    Pgm,
    Png,
    Jpeg,
    Bmp,
}

/// Row-major single-channel image.
///
/// Holds exactly `width * height` samples. A 0×0 image is valid and is
/// what an unused accumulator starts as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayImage<S> {
    pixels: Vec<S>,
    width: usize,
    height: usize,
    format: ImageFormat,
    max_value: S,
}

impl<S: Sample> Default for GrayImage<S> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<S: Sample> GrayImage<S> {
    /// Zero-filled image.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, S::zeroed())
    }

    pub fn filled(width: usize, height: usize, value: S) -> Self {
        Self {
            pixels: vec![value; width * height],
            width,
            height,
            format: ImageFormat::Unknown,
            max_value: S::MAX,
        }
    }

    /// The 0×0 image.
    pub fn empty() -> Self {
        Self::new(0, 0)
    }

    /// Wrap a row-major buffer of exactly `width * height` samples.
    pub fn from_vec(pixels: Vec<S>, width: usize, height: usize) -> Result<Self, FilterError> {
        let expected = width * height;
        if pixels.len() != expected {
            return Err(FilterError::BufferLength {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
            format: ImageFormat::Unknown,
            max_value: S::MAX,
        })
    }

    /// Build from a list of equally long rows.
    pub fn from_rows<R: AsRef<[S]>>(rows: &[R]) -> Result<Self, FilterError> {
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let mut pixels = Vec::with_capacity(width * rows.len());
        for (row, r) in rows.iter().enumerate() {
            let r = r.as_ref();
            if r.len() != width {
                return Err(FilterError::RaggedRows {
                    row,
                    expected: width,
                    actual: r.len(),
                });
            }
            pixels.extend_from_slice(r);
        }
        let height = if width == 0 { 0 } else { rows.len() };
        Self::from_vec(pixels, width, height)
    }

    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_max_value(mut self, max_value: S) -> Self {
        self.max_value = max_value;
        self
    }

    /// Zero-filled image of the given size carrying this image's metadata.
    pub(crate) fn like(&self, width: usize, height: usize) -> Self {
        Self {
            format: self.format,
            max_value: self.max_value,
            ..Self::new(width, height)
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Largest sample value the source format declared (e.g. a PGM maxval).
    #[inline]
    pub fn max_value(&self) -> S {
        self.max_value
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[S] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [S] {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> Vec<S> {
        self.pixels
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[S] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [S] {
        &mut self.pixels[y * self.width..(y + 1) * self.width]
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[S]> {
        self.pixels.chunks_exact(self.width.max(1))
    }

    pub fn rows_mut(&mut self) -> impl ExactSizeIterator<Item = &mut [S]> {
        self.pixels.chunks_exact_mut(self.width.max(1))
    }

    /// Sample at column `x`, row `y`. Panics when out of bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> S {
        self.row(y)[x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: S) {
        self.row_mut(y)[x] = value;
    }

    pub fn to_rows(&self) -> Vec<Vec<S>> {
        self.rows().map(<[S]>::to_vec).collect()
    }

    pub(crate) fn check_non_empty(&self) -> Result<(), FilterError> {
        if self.is_empty() {
            Err(FilterError::EmptyInput)
        } else {
            Ok(())
        }
    }

    pub(crate) fn check_square(&self) -> Result<(), FilterError> {
        if self.is_square() {
            Ok(())
        } else {
            Err(FilterError::ShapeViolation {
                width: self.width,
                height: self.height,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_layout() {
        let img = GrayImage::from_rows(&[[1u8, 2, 3], [4, 5, 6]]).unwrap();
        assert_eq!((img.width(), img.height()), (3, 2));
        assert_eq!(img.pixels(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(img.row(1), &[4, 5, 6]);
        assert_eq!(img.get(2, 0), 3);
        assert_eq!(img.to_rows(), [[1, 2, 3], [4, 5, 6]]);
    }

    #[test]
    fn ragged_rows_rejected() {
        let rows: [&[u16]; 2] = [&[1, 2], &[3]];
        assert_eq!(
            GrayImage::from_rows(&rows),
            Err(FilterError::RaggedRows {
                row: 1,
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn short_buffer_rejected() {
        assert_eq!(
            GrayImage::from_vec(vec![0u8; 5], 3, 2),
            Err(FilterError::BufferLength {
                expected: 6,
                actual: 5
            })
        );
    }

    #[test]
    fn empty_image() {
        let img = GrayImage::<u8>::empty();
        assert!(img.is_empty());
        assert_eq!(img.rows().count(), 0);
        assert_eq!(img.check_non_empty(), Err(FilterError::EmptyInput));
        let no_rows: [[u8; 0]; 0] = [];
        assert!(GrayImage::from_rows(&no_rows).unwrap().is_empty());
    }

    #[test]
    fn metadata_carried_by_like() {
        let img = GrayImage::<u16>::new(2, 2)
            .with_format(ImageFormat::Pgm)
            .with_max_value(1023);
        let other = img.like(5, 5);
        assert_eq!(other.format(), ImageFormat::Pgm);
        assert_eq!(other.max_value(), 1023);
        assert_eq!(other.pixels().len(), 25);
    }

    #[test]
    fn square_check() {
        let img = GrayImage::<u8>::new(3, 2);
        assert_eq!(
            img.check_square(),
            Err(FilterError::ShapeViolation {
                width: 3,
                height: 2
            })
        );
        assert!(GrayImage::<u8>::new(4, 4).check_square().is_ok());
    }
}
