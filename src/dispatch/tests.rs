use archmage::ScalarToken;

use super::scalar::*;
use super::*;
use crate::{M1, M2, M8, gaussian_kernel_1d};

fn ramp(width: usize, height: usize) -> GrayImage<u8> {
    let pixels = (0..width * height).map(|i| ((i * 29) % 256) as u8).collect();
    GrayImage::from_vec(pixels, width, height).unwrap()
}

fn square(dim: usize, mul: u16) -> GrayImage<u16> {
    let pixels = (0..dim * dim).map(|i| (i as u16).wrapping_mul(mul)).collect();
    GrayImage::from_vec(pixels, dim, dim).unwrap()
}

#[test]
fn scalar_entries_match_public_api() {
    let engine = Engine::<M2>::detect();
    let img = ramp(37, 11);
    let weights = gaussian_kernel_1d(5, 1.2).unwrap();
    let kernel = FixedKernel::quantize::<u8>(&weights);
    assert_eq!(
        separable_impl_scalar(ScalarToken, engine, &img, &kernel),
        engine.gaussian_filter(&img, 5, 1.2).unwrap()
    );

    let range = RangeLut::new::<u8>(25.0).unwrap();
    assert_eq!(
        bilateral_impl_scalar(ScalarToken, engine, &img, &weights, &range),
        engine.bilateral_filter(&img, 5, 1.2, 25.0).unwrap()
    );

    let (a, b) = (square(9, 7919), square(5, 104));
    for policy in [OverflowPolicy::Saturation, OverflowPolicy::Wrap] {
        assert_eq!(
            add_impl_scalar(ScalarToken, engine, &a, &b, policy),
            engine.add(&a, &b, policy).unwrap()
        );
        let op = Accumulation::SquareSum;
        let mut acc = b.clone();
        accumulate_impl_scalar(ScalarToken, engine, &mut acc, &a, op, policy);
        let mut expected = b.clone();
        engine.accumulate_squared(&mut expected, &a, policy).unwrap();
        assert_eq!(acc, expected);
    }
}

#[test]
fn empty_accumulator_takes_image() {
    let img = square(3, 300);
    let (engine, policy) = (Engine::<M1>::detect(), OverflowPolicy::Wrap);
    let mut acc = GrayImage::empty();
    accumulate_impl_scalar(ScalarToken, engine, &mut acc, &img, Accumulation::Sum, policy);
    assert_eq!(acc, img);

    let op = Accumulation::SquareSum;
    let mut acc = GrayImage::empty();
    accumulate_impl_scalar(ScalarToken, engine, &mut acc, &img, op, policy);
    let squared: Vec<u16> = img.pixels().iter().map(|&v| v.wrapping_mul(v)).collect();
    assert_eq!(acc.pixels(), &squared[..]);
}

#[cfg(target_arch = "x86_64")]
#[test]
fn v3_entries_match_scalar() {
    use archmage::{SimdToken, X64V3Token};

    let Some(t) = X64V3Token::summon() else {
        eprintln!("AVX2 not available, skipping");
        return;
    };
    let engine = Engine::<M8>::detect();
    let img = ramp(70, 23);

    for mode in [BorderMode::Zero, BorderMode::Replicate] {
        assert_eq!(
            pad_impl_v3(t, engine, &img, 3, mode),
            pad_impl_scalar(ScalarToken, engine, &img, 3, mode)
        );
    }

    let mut wide = GrayImage::new(80, 30);
    let mut wide_scalar = GrayImage::new(80, 30);
    center_impl_v3(t, engine, &img, &mut wide);
    center_impl_scalar(ScalarToken, engine, &img, &mut wide_scalar);
    assert_eq!(wide, wide_scalar);

    let weights = gaussian_kernel_1d(7, 2.0).unwrap();
    let kernel = FixedKernel::quantize::<u8>(&weights);
    assert_eq!(
        separable_impl_v3(t, engine, &img, &kernel),
        separable_impl_scalar(ScalarToken, engine, &img, &kernel)
    );

    let range = RangeLut::new::<u8>(30.0).unwrap();
    assert_eq!(
        bilateral_impl_v3(t, engine, &img, &weights, &range),
        bilateral_impl_scalar(ScalarToken, engine, &img, &weights, &range)
    );

    let (a, b) = (square(33, 4099), square(17, 65));
    let blend = Blend {
        alpha: 0.7,
        beta: 0.4,
        gamma: -12.0,
    };
    for policy in [OverflowPolicy::Saturation, OverflowPolicy::Wrap] {
        assert_eq!(
            add_impl_v3(t, engine, &a, &b, policy),
            add_impl_scalar(ScalarToken, engine, &a, &b, policy)
        );
        assert_eq!(
            add_weighted_impl_v3(t, engine, &a, &b, blend, policy),
            add_weighted_impl_scalar(ScalarToken, engine, &a, &b, blend, policy)
        );
        for op in [Accumulation::Sum, Accumulation::SquareSum] {
            let (mut acc, mut acc_scalar) = (b.clone(), b.clone());
            accumulate_impl_v3(t, engine, &mut acc, &a, op, policy);
            accumulate_impl_scalar(ScalarToken, engine, &mut acc_scalar, &a, op, policy);
            assert_eq!(acc, acc_scalar, "{op:?} {policy:?}");
        }
    }
}
