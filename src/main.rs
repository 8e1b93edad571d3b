mod cli;

use anyhow::Context;
use clap::Parser;
use uvsn_rs::image_pipeline::{
    AnalysisConfig, ImageAnalysis, ImageAnalyzer, LampCondition, SessionStore,
};
use uvsn_rs::logger;

use tracing::{error, info, warn};

use cli::{AnalyzeArgs, Cli, Command};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    match cli.command {
        Command::Analyze(args) => analyze(args),
        Command::Lamps => {
            for lamp in LampCondition::ALL {
                println!("{}", lamp);
            }
            Ok(())
        }
    }
}

fn analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let config = AnalysisConfig::builder()
        .validity_threshold(args.threshold)
        .compute_histogram(args.histogram_bins.is_some())
        .histogram_bins(args.histogram_bins.unwrap_or(100))
        .build();
    let analyzer = ImageAnalyzer::new(config).context("invalid analysis settings")?;
    let store = SessionStore::with_archive_suffix(analyzer.config().archive_suffix.clone());

    info!(
        "Analyzing {} image(s) under lamp condition {:?}",
        args.inputs.len(),
        args.lamp.label()
    );

    let mut failures = 0usize;
    for item in analyzer.analyze_batch(&args.inputs) {
        match item.outcome {
            Ok(analysis) => {
                print_summary(&analysis, args.show_tags);
                store.add_result(analysis.into_result(args.lamp));
            }
            Err(e) => {
                failures += 1;
                error!("{}: {}", item.path.display(), e);
            }
        }
    }

    info!("{} image(s) analyzed, {} failed", store.len(), failures);

    if let Some(output) = &args.output {
        if store.is_empty() {
            warn!("No results to export, skipping {}", output.display());
        } else {
            store.write_archive(output)?;
        }
    }

    Ok(())
}

fn format_optional(value: Option<f64>) -> String {
    value.map(|v| format!("{:.4}", v)).unwrap_or_else(|| "-".to_string())
}

fn print_summary(analysis: &ImageAnalysis, show_tags: bool) {
    let stats = &analysis.chromaticity;
    let exposure = &analysis.exposure.record;

    println!(
        "{} ({}x{}, {}-bit, {:?})",
        analysis.image_name,
        analysis.width,
        analysis.height,
        analysis.bit_depth,
        analysis.source_kind
    );
    println!(
        "  chromaticity  r={:.4} ±{:.4}  g={:.4} ±{:.4}  max rgb=({:.4}, {:.4}, {:.4})",
        stats.mean_r, stats.std_r, stats.mean_g, stats.std_g, stats.max_r, stats.max_g, stats.max_b
    );
    println!(
        "  exposure      ISO={} N={} t={}  Sv={} Av={} Tv={} Bv={}",
        format_optional(exposure.iso),
        format_optional(exposure.f_number),
        format_optional(exposure.exposure_time),
        format_optional(exposure.sv),
        format_optional(exposure.av),
        format_optional(exposure.tv),
        format_optional(exposure.bv),
    );

    if let Some((r_center, g_center, count)) = analysis.histogram.as_ref().and_then(|h| {
        h.peak().map(|(r, g, count)| (h.bin_center(r), h.bin_center(g), count))
    }) {
        println!("  histogram     peak at r={:.3} g={:.3} ({} px)", r_center, g_center, count);
    }

    for issue in &analysis.exposure.issues {
        println!("  metadata      {}", issue);
    }

    if show_tags {
        for line in analysis.exposure.describe().lines() {
            println!("    {}", line);
        }
    }
}
