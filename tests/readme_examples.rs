//! Validates the code examples from README.md compile and behave correctly.

#[test]
fn readme_core_api() {
    use lanefilter::{GrayImage, OverflowPolicy, add, box_filter};

    let a = GrayImage::from_rows(&[[100u8, 150], [200, 50]]).unwrap();
    let b = GrayImage::from_rows(&[[50u8, 100], [30, 200]]).unwrap();
    let sum = add(&a, &b, OverflowPolicy::Saturation).unwrap();
    assert_eq!(sum.to_rows(), [[150, 250], [230, 250]]);

    let flat = GrayImage::filled(32, 32, 77u16);
    assert_eq!(box_filter(&flat, 5).unwrap(), flat);
}

#[test]
fn readme_engine() {
    use lanefilter::{Engine, GrayImage, M4};

    let img = GrayImage::filled(64, 64, 10u8);
    let engine = Engine::<M4>::with_register_bytes(32);
    let out = engine.gaussian_filter(&img, 7, 1.5).unwrap();
    assert_eq!(out, img);
}

#[test]
fn readme_accumulate() {
    use lanefilter::{GrayImage, OverflowPolicy, accumulate};

    let mut acc = GrayImage::empty();
    accumulate(&mut acc, &GrayImage::filled(2, 2, 5u8), OverflowPolicy::Saturation).unwrap();
    accumulate(&mut acc, &GrayImage::filled(4, 4, 1u8), OverflowPolicy::Saturation).unwrap();
    assert_eq!(
        acc.to_rows(),
        [[1, 1, 1, 1], [1, 6, 6, 1], [1, 6, 6, 1], [1, 1, 1, 1]]
    );
}

#[cfg(feature = "imgref")]
#[test]
fn readme_imgref() {
    use ::imgref::ImgVec;
    use lanefilter::imgref;

    let img = ImgVec::new(vec![120u8; 640 * 480], 640, 480);
    let blurred = imgref::gaussian_filter(img.as_ref(), 5, 1.0).unwrap();
    assert_eq!(blurred.width(), 640);
    assert_eq!(blurred.height(), 480);
}
