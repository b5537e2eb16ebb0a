use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use imageops_spectral::{
    load_mask_image, ImageStatistics, Operation, OperationOutput, PixelBuffer, SimilarityMeasures,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// `--key=value` または `key=value` 形式の引数を読み取る
fn parse_arguments(args: &[String]) -> Result<HashMap<String, String>, String> {
    args.iter()
        .map(|arg| {
            arg.trim_start_matches("--")
                .split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| format!("Expected key=value, got '{arg}'"))
        })
        .collect()
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
    let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("png");
    path.with_file_name(format!("{stem}_{suffix}.{extension}"))
}

fn print_statistics(label: &str, buffer: &PixelBuffer) -> Result<(), Box<dyn std::error::Error>> {
    let stats = match buffer {
        PixelBuffer::Luma(image) => image.channel_statistics()?,
        PixelBuffer::Rgb(image) => image.channel_statistics()?,
    };
    for (channel, s) in stats.iter().enumerate() {
        println!(
            "{label} channel {channel}: mean {:.2}, std {:.2}, entropy {:.3} bits",
            s.mean, s.standard_deviation, s.entropy
        );
    }
    Ok(())
}

fn print_similarity(original: &PixelBuffer, processed: &PixelBuffer) -> Result<(), Box<dyn std::error::Error>> {
    let similarity = match (original, processed) {
        (PixelBuffer::Luma(a), PixelBuffer::Luma(b)) => a.similarity(b)?,
        (PixelBuffer::Rgb(a), PixelBuffer::Rgb(b)) => a.similarity(b)?,
        _ => return Ok(()),
    };
    println!(
        "MSE {:.3}, PMSE {:.6}, SNR {:.2} dB, PSNR {:.2} dB, max difference {}",
        similarity.mse, similarity.pmse, similarity.snr, similarity.psnr, similarity.max_difference
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imageops_spectral=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!(
            "Usage: {} input=<image> output=<image> operation=<name> [key=value ...] [mask=<image>]",
            args[0]
        );
        eprintln!(
            "Example: {} input=lena.png output=out.png operation=lowpass cutoff=30",
            args[0]
        );
        std::process::exit(1);
    }

    let params = parse_arguments(&args[1..])?;
    let input = params.get("input").ok_or("Missing input=<image>")?;
    let output = PathBuf::from(params.get("output").ok_or("Missing output=<image>")?);

    // 入力画像を読み込み
    let buffer = PixelBuffer::from_dynamic(&image::open(input)?);
    let (width, height) = buffer.dimensions();
    println!("Processing {} image: {}x{}", buffer.mode().name(), width, height);

    let extra_mask = params
        .get("mask")
        .map(|path| load_mask_image(path, true))
        .transpose()?;

    let operation = Operation::from_args(&params)?;
    let result = operation.apply(&buffer, extra_mask.as_ref())?;

    if let OperationOutput::Frequency { magnitude, mask, .. } = &result {
        magnitude.clone().into_dynamic().save(sibling(&output, "magnitude"))?;
        if let Some(mask) = mask {
            mask.save(sibling(&output, "mask"))?;
        }
    }

    let processed = result.primary_image();
    print_statistics("input", &buffer)?;
    print_statistics("output", &processed)?;
    print_similarity(&buffer, &processed)?;

    processed.into_dynamic().save(&output)?;
    println!("Saved {}", output.display());
    Ok(())
}
