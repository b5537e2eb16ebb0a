//! Real-world scenario tests for imageops-spectral
//!
//! Small synthetic images with hand-checked expectations, covering the
//! canonical use of each operation family.

use image::{Luma, Rgb};
use imageops_spectral::*;

/// 8x8 black plane with a 2x2 block of 255 at (3,3)-(4,4)
fn bright_block() -> Image<Luma<u8>> {
    Image::from_fn(8, 8, |x, y| {
        Luma([if (3..=4).contains(&x) && (3..=4).contains(&y) { 255 } else { 0 }])
    })
}

#[test]
fn low_pass_blurs_block_and_clips_ringing() {
    let image = bright_block();
    let spectrum = Spectrum::from_image(&image, TransformVariant::Fast).unwrap();
    let grid = spectrum.grid();
    let filtered = spectrum.apply_mask(&low_pass(&grid, grid.nyquist() / 2.0)).unwrap();
    let planes = filtered.inverse_planes().unwrap();

    // Before quantization the sum is the untouched DC term
    let total: f64 = planes[0].data().iter().sum();
    assert!((total - 1020.0).abs() < 1e-6, "total = {total}");

    // 中心の値は下がり、周囲へ広がる
    let center = planes[0].get(3, 3);
    assert!(center > 100.0 && center < 255.0, "center = {center}");
    assert!(planes[0].get(2, 3) > 0.0);
    assert!((planes[0].get(3, 3) - planes[0].get(4, 4)).abs() < 1e-9);

    let reconstructed: Image<Luma<u8>> = filtered.reconstruct().unwrap();
    assert_eq!(reconstructed.get_pixel(3, 3)[0], 149);

    // 負のリンギングは0にクリップされるため、8ビット画像の総和は増える
    assert_eq!(reconstructed.get_pixel(2, 0)[0], 0);
    assert_eq!(reconstructed.get_pixel(0, 0)[0], 40);
    let clipped_total: u32 = reconstructed.pixels().map(|p| u32::from(p[0])).sum();
    assert_eq!(clipped_total, 1520);
}

#[test]
fn erosion_with_zero_padding_keeps_only_center() {
    let plane: BinaryPlane = Plane::from_elem(3, 3, 1);
    let eroded = erosion_with_border(
        &plane,
        &StructuringElement::square(3).unwrap(),
        BorderValue::Background,
    );
    assert_eq!(eroded.data(), &[0, 0, 0, 0, 1, 0, 0, 0, 0]);

    // 既定の境界（前景）では何も削られない
    assert_eq!(erosion(&plane, &StructuringElement::square(3).unwrap()), plane);
}

#[test]
fn region_growing_splits_two_flat_regions() {
    let image: Image<Luma<u8>> = Image::from_fn(4, 4, |x, _| Luma([if x < 2 { 10 } else { 200 }]));
    let options = RegionGrowingOptions::new(5.0).with_connectivity(Connectivity::Four);
    let labels = image
        .region_growing(&[Seed { x: 0, y: 0 }, Seed { x: 3, y: 3 }], &options)
        .unwrap();

    assert_eq!(labels.region_count(), 2);
    for y in 0..4 {
        for x in 0..4 {
            assert_eq!(labels.get(x, y), if x < 2 { 1 } else { 2 });
        }
    }
}

#[test]
fn high_pass_removes_mean_level() {
    let image: Image<Luma<u8>> = Image::from_fn(16, 16, |x, _| Luma([if x < 8 { 40 } else { 200 }]));
    let output = image
        .frequency_filter(
            &FrequencyFilter::HighPass { cutoff: 1.0 },
            None,
            TransformVariant::Fast,
        )
        .unwrap();

    // DC だけが除去され、平均より暗い側は0にクリップされる
    assert_eq!(output.image.get_pixel(3, 5)[0], 0);
    assert_eq!(output.image.get_pixel(8, 5)[0], 80);
    assert_eq!(output.mask.unwrap().pass_count(), 255);
}

#[test]
fn directional_filter_keeps_horizontal_stripes() {
    // Stripes vary along y only, so their energy lies on the V axis (90°/270°)
    let image: Image<Luma<u8>> = Image::from_fn(8, 8, |_, y| Luma([if y % 2 == 0 { 200 } else { 50 }]));

    let vertical = image
        .frequency_filter(
            &FrequencyFilter::Directional(AngleRange::new(80.0, 100.0)),
            None,
            TransformVariant::Fast,
        )
        .unwrap();
    assert_eq!(vertical.image, image);

    let horizontal = image
        .frequency_filter(
            &FrequencyFilter::Directional(AngleRange::new(-10.0, 10.0)),
            None,
            TransformVariant::Fast,
        )
        .unwrap();
    // 縞が消えて平均値だけが残る
    assert!(horizontal.image.pixels().all(|p| p[0] == 125));
}

#[test]
fn hit_or_miss_detects_isolated_points() {
    let mut plane: BinaryPlane = Plane::from_elem(7, 7, 0);
    plane.set(3, 3, 1);
    plane.set(5, 1, 1);
    plane.set(5, 2, 1);

    let template = StructuringElement::parse("0,0,0;0,1,0;0,0,0").unwrap();
    let hits = hit_or_miss_template(&plane, &template);
    assert_eq!(hits.count_foreground(), 1);
    assert_eq!(hits.get(3, 3), 1);
}

#[test]
fn detail_mask_responds_to_horizontal_edge() {
    // 上が明るく下が暗い段差
    let image: Image<Luma<u8>> = Image::from_fn(5, 6, |_, y| Luma([if y < 3 { 100 } else { 0 }]));
    let output = image.convolve_3x3(&DetailMask::N.kernel()).unwrap();
    // 上の行 +300、中央行 0、下の行 0 で飽和
    assert_eq!(output.get_pixel(2, 2)[0], 255);
    // 平坦部は0
    assert_eq!(output.get_pixel(2, 1)[0], 0);
}

#[test]
fn salt_and_pepper_cleanup_on_rgb() {
    let mut image: Image<Rgb<u8>> = Image::from_pixel(6, 6, Rgb([90, 120, 150]));
    image.put_pixel(2, 2, Rgb([255, 255, 255]));
    image.put_pixel(4, 3, Rgb([0, 0, 0]));

    let cleaned = image.alpha_trimmed_mean(3, 1).unwrap();
    assert!(cleaned.pixels().all(|p| *p == Rgb([90, 120, 150])));

    let similarity = image.similarity(&cleaned).unwrap();
    assert_eq!(similarity.max_difference, 165);
}

#[test]
fn statistics_of_a_bimodal_image() {
    let image: Image<Luma<u8>> = Image::from_fn(10, 10, |x, _| Luma([if x < 5 { 20 } else { 220 }]));
    let stats = image.channel_statistics().unwrap()[0];
    assert!((stats.mean - 120.0).abs() < 1e-9);
    assert!((stats.standard_deviation - 100.0).abs() < 1e-9);
    assert!((stats.entropy - 1.0).abs() < 1e-9);
    assert!((stats.flattening_coefficient + 2.0).abs() < 1e-9);
}
