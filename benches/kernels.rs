use archmage::SimdToken;
use criterion::{BenchmarkGroup, Criterion, Throughput, measurement::WallTime};
use lanefilter::{Engine, FilterError, GrayImage, M1, M8, OverflowPolicy};

// === SIMD tier detection ===

fn tier_status<T: SimdToken>() -> &'static str {
    if T::summon().is_some() {
        "available"
    } else {
        "not available"
    }
}

fn print_simd_info() {
    eprintln!("=== SIMD Tier Detection ===");
    #[cfg(target_arch = "x86_64")]
    {
        eprintln!(
            "  AVX2+FMA (x86-64-v3):    {}",
            tier_status::<archmage::X64V3Token>()
        );
    }
    #[cfg(target_arch = "aarch64")]
    {
        eprintln!(
            "  Arm64-v2:                {}",
            tier_status::<archmage::Arm64V2Token>()
        );
    }
    #[cfg(target_arch = "wasm32")]
    {
        eprintln!(
            "  WASM SIMD128:            {}",
            tier_status::<archmage::Wasm128Token>()
        );
    }
    eprintln!("  Scalar:                  always available");
    eprintln!(
        "  Register width:          {} bytes",
        lanefilter::register_bytes()
    );
    eprintln!("===========================");
}

// === Scalar disable/enable via archmage ===

fn disable_all_simd() {
    let _ = archmage::dangerously_disable_tokens_except_wasm(true);
}

fn enable_all_simd() {
    let _ = archmage::dangerously_disable_tokens_except_wasm(false);
}

// === Naive baseline ===

fn naive_box_filter(img: &GrayImage<u8>, k: usize) -> GrayImage<u8> {
    let half = (k / 2) as isize;
    let (w, h) = (img.width() as isize, img.height() as isize);
    let mut out = GrayImage::new(img.width(), img.height());
    for y in 0..h {
        for x in 0..w {
            let mut sum = 0u32;
            for dy in -half..=half {
                for dx in -half..=half {
                    let sx = (x + dx).clamp(0, w - 1) as usize;
                    let sy = (y + dy).clamp(0, h - 1) as usize;
                    sum += img.get(sx, sy) as u32;
                }
            }
            out.set(x as usize, y as usize, (sum / (k * k) as u32) as u8);
        }
    }
    out
}

// === Benchmark helpers ===

const DIM: usize = 512;

fn test_image(dim: usize) -> GrayImage<u8> {
    let pixels = (0..dim * dim).map(|i| (i % 251) as u8).collect();
    GrayImage::from_vec(pixels, dim, dim).unwrap()
}

type Op = fn(&GrayImage<u8>) -> Result<GrayImage<u8>, FilterError>;

/// Benchmark an operation with 3 variants: detected width, forced scalar, and M8 grouping.
fn bench_variants(group: &mut BenchmarkGroup<WallTime>, m1: Op, m8: Op, img: &GrayImage<u8>) {
    group.bench_function("lanefilter", |b| b.iter(|| m1(img).unwrap()));

    disable_all_simd();
    group.bench_function("lanefilter_scalar", |b| b.iter(|| m1(img).unwrap()));
    enable_all_simd();

    group.bench_function("lanefilter_m8", |b| b.iter(|| m8(img).unwrap()));
}

// === Benchmark groups ===

fn bench_box_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("box_filter_5");
    group.throughput(Throughput::Bytes((DIM * DIM) as u64));
    let img = test_image(DIM);
    bench_variants(
        &mut group,
        |img| Engine::<M1>::detect().box_filter(img, 5),
        |img| Engine::<M8>::detect().box_filter(img, 5),
        &img,
    );
    group.bench_function("naive", |b| b.iter(|| naive_box_filter(&img, 5)));
    group.finish();
}

fn bench_gaussian_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("gaussian_filter_auto_2");
    group.throughput(Throughput::Bytes((DIM * DIM) as u64));
    let img = test_image(DIM);
    bench_variants(
        &mut group,
        |img| Engine::<M1>::detect().gaussian_filter_auto(img, 2.0),
        |img| Engine::<M8>::detect().gaussian_filter_auto(img, 2.0),
        &img,
    );
    group.finish();
}

fn bench_bilateral_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("bilateral_filter_5");
    let dim = DIM / 2;
    group.throughput(Throughput::Bytes((dim * dim) as u64));
    let img = test_image(dim);
    bench_variants(
        &mut group,
        |img| Engine::<M1>::detect().bilateral_filter(img, 5, 1.5, 30.0),
        |img| Engine::<M8>::detect().bilateral_filter(img, 5, 1.5, 30.0),
        &img,
    );
    group.finish();
}

fn bench_accumulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("accumulate");
    group.throughput(Throughput::Bytes((DIM * DIM) as u64));
    let img = test_image(DIM);
    group.bench_function("lanefilter", |b| {
        let mut acc = img.clone();
        b.iter(|| lanefilter::accumulate(&mut acc, &img, OverflowPolicy::Wrap).unwrap());
    });
    group.bench_function("lanefilter_squared", |b| {
        let mut acc = img.clone();
        b.iter(|| lanefilter::accumulate_squared(&mut acc, &img, OverflowPolicy::Wrap).unwrap());
    });
    group.finish();
}

// === Custom main for tier detection before criterion runs ===

fn main() {
    print_simd_info();

    let mut criterion = Criterion::default().configure_from_args();
    bench_box_filter(&mut criterion);
    bench_gaussian_filter(&mut criterion);
    bench_bilateral_filter(&mut criterion);
    bench_accumulate(&mut criterion);
    criterion.final_summary();
}
