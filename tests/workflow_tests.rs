//! Integration tests for imageops-spectral workflows
//!
//! These tests chain several operations the way a command-line front end
//! would, checking that the pieces agree with each other.

use image::{Luma, Rgb};
use imageops_spectral::{
    band_cut, band_pass, high_pass, iterative_dilation, low_pass, opening, BinaryPlane,
    FrequencyFilter, FrequencyFilterExt, Image, ImageStatistics, Mask, NoiseRemoval, Operation,
    OperationOutput, PixelBuffer, SimilarityMeasures, Spectrum, StructuringElement,
    TransformVariant,
};
use std::collections::HashMap;

/// 8x8 grayscale test pattern with a bright square and a gradient
fn create_pattern() -> Image<Luma<u8>> {
    Image::from_fn(8, 8, |x, y| {
        if (2..=5).contains(&x) && (2..=5).contains(&y) {
            Luma([220])
        } else {
            Luma([(x * 10 + y * 5) as u8])
        }
    })
}

fn args(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

#[test]
fn low_and_high_pass_recompose_the_original() {
    let image = create_pattern();
    let spectrum = Spectrum::from_image(&image, TransformVariant::Fast).unwrap();
    let grid = spectrum.grid();

    // 2.5 is never an exact radial distance, so the masks do not overlap
    let low = spectrum.apply_mask(&low_pass(&grid, 2.5)).unwrap();
    let high = spectrum.apply_mask(&high_pass(&grid, 2.5)).unwrap();
    let low_planes = low.inverse_planes().unwrap();
    let high_planes = high.inverse_planes().unwrap();

    for (x, y, pixel) in image.enumerate_pixels() {
        let recomposed = low_planes[0].get(x, y) + high_planes[0].get(x, y);
        assert!((recomposed - f64::from(pixel[0])).abs() < 1e-6);
    }
}

#[test]
fn band_pass_and_band_cut_recompose_the_original() {
    let image = create_pattern();
    let spectrum = Spectrum::from_image(&image, TransformVariant::Naive).unwrap();
    let grid = spectrum.grid();

    let pass = spectrum.apply_mask(&band_pass(&grid, 1.0, 3.0)).unwrap();
    let cut = spectrum.apply_mask(&band_cut(&grid, 1.0, 3.0)).unwrap();
    let pass_planes = pass.inverse_planes().unwrap();
    let cut_planes = cut.inverse_planes().unwrap();

    for (x, y, pixel) in image.enumerate_pixels() {
        let recomposed = pass_planes[0].get(x, y) + cut_planes[0].get(x, y);
        assert!((recomposed - f64::from(pixel[0])).abs() < 1e-6);
    }
}

#[test]
fn phase_shift_translates_circularly() {
    let image = create_pattern();
    let output = image
        .frequency_filter(
            &FrequencyFilter::PhaseShift { k: 3.0, l: 1.0 },
            None,
            TransformVariant::Fast,
        )
        .unwrap();

    for (x, y, pixel) in output.image.enumerate_pixels() {
        let source = image.get_pixel((x + 8 - 3) % 8, (y + 8 - 1) % 8);
        assert_eq!(pixel, source, "mismatch at ({x}, {y})");
    }
}

#[test]
fn low_pass_output_stays_similar_to_input() {
    let image = create_pattern();
    let output = image
        .frequency_filter(
            &FrequencyFilter::LowPass { cutoff: 3.0 },
            None,
            TransformVariant::Fast,
        )
        .unwrap();

    let similarity = image.similarity(&output.image).unwrap();
    assert!(similarity.mse > 0.0);
    assert!(similarity.psnr.is_finite());
    assert!(similarity.psnr > 10.0);
}

#[test]
fn auxiliary_mask_narrows_the_filter() {
    let image = create_pattern();
    let block_everything = Mask::pass_all(8, 8).complement();
    let output = image
        .frequency_filter(
            &FrequencyFilter::HighPass { cutoff: 0.0 },
            Some(&block_everything),
            TransformVariant::Fast,
        )
        .unwrap();

    assert!(output.image.pixels().all(|p| p[0] == 0));
    assert_eq!(output.mask.unwrap().pass_count(), 0);
}

#[test]
fn rgb_frequency_operation_from_arguments() {
    let image: Image<Rgb<u8>> = Image::from_fn(16, 8, |x, y| Rgb([(x * 15) as u8, (y * 30) as u8, 128]));
    let operation = Operation::from_args(&args(&[
        ("operation", "directional"),
        ("min_angle", "-10"),
        ("max_angle", "10"),
    ]))
    .unwrap();

    let OperationOutput::Frequency {
        image: filtered,
        magnitude,
        mask,
    } = operation.apply(&PixelBuffer::Rgb(image), None).unwrap()
    else {
        panic!("expected a frequency output");
    };

    assert_eq!(filtered.dimensions(), (16, 8));
    assert_eq!(magnitude.dimensions(), (16, 8));
    let mask = mask.unwrap();
    // 中心（DC）と水平方向は通過、垂直方向は遮断
    assert_eq!(mask.get_pixel(8, 4)[0], 255);
    assert_eq!(mask.get_pixel(12, 4)[0], 255);
    assert_eq!(mask.get_pixel(8, 1)[0], 0);
}

#[test]
fn binarize_open_then_extract_component() {
    // Two squares joined by a one-pixel bridge
    let image: Image<Luma<u8>> = Image::from_fn(11, 5, |x, y| {
        let left = x <= 3 && (1..=3).contains(&y);
        let right = x >= 7 && (1..=3).contains(&y);
        let bridge = (4..=6).contains(&x) && y == 2;
        Luma([if left || right || bridge { 255 } else { 0 }])
    });
    let binary = BinaryPlane::from_luma(&image, 128);
    let square = StructuringElement::square(3).unwrap();

    let connected = iterative_dilation(&binary, (0, 2), &StructuringElement::cross()).unwrap();
    assert_eq!(connected.count_foreground(), binary.count_foreground());

    let opened = opening(&binary, &square);
    assert_eq!(opened.get(5, 2), 0);
    let left_only = iterative_dilation(&opened, (0, 2), &StructuringElement::cross()).unwrap();
    assert_eq!(left_only.get(10, 2), 0);
    assert_eq!(left_only.get(3, 3), 1);
}

#[test]
fn noise_removal_reduces_variance() {
    let mut noisy: Image<Luma<u8>> = Image::from_pixel(9, 9, Luma([120]));
    for (x, y) in [(1, 1), (4, 6), (7, 2), (2, 7)] {
        noisy.put_pixel(x, y, Luma([255]));
    }
    noisy.put_pixel(5, 3, Luma([0]));

    let before = noisy.channel_statistics().unwrap()[0];
    let cleaned = noisy.alpha_trimmed_mean(3, 2).unwrap();
    let after = cleaned.channel_statistics().unwrap()[0];

    assert!(after.variance < before.variance);
    assert!(cleaned.pixels().all(|p| p[0] == 120));
}

#[test]
fn region_growing_operation_renders_labels() {
    let image: Image<Luma<u8>> = Image::from_fn(6, 4, |x, _| Luma([if x < 3 { 30 } else { 180 }]));
    let operation = Operation::from_args(&args(&[
        ("operation", "region_growing"),
        ("seeds", "0,0;5,3"),
        ("threshold", "4"),
    ]))
    .unwrap();

    let output = operation.apply(&PixelBuffer::Luma(image), None).unwrap();
    let PixelBuffer::Luma(rendered) = output.primary_image() else {
        panic!("labels render as grayscale");
    };
    assert_eq!(rendered.get_pixel(0, 0)[0], 127);
    assert_eq!(rendered.get_pixel(5, 0)[0], 255);
}
