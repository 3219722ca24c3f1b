//! Render SCC scores to WAV.
//!
//! Loads a JSON score, plays it through the SCC driver at the given tick rate,
//! downsamples the chip's native output and writes a mono 16-bit WAV file.
//! With `--log` the register writes are also exported as CSV.

mod render;
mod score;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use scc_common::{DEFAULT_SAMPLE_RATE, FRAME_RATE_NTSC};
use scc_core::ChipModel;
use scc_driver::{export_write_log, DriverConfig, SccDriver};

use crate::render::render;
use crate::score::Score;

#[derive(Parser)]
#[command(name = "scc-render")]
#[command(about = "Render an SCC score to WAV")]
struct Args {
    /// Score file (JSON)
    #[arg(short, long)]
    input: PathBuf,

    /// Output WAV file
    #[arg(short, long)]
    output: PathBuf,

    /// Chip variant: scc or scc-plus
    #[arg(short, long, default_value = "scc")]
    model: ChipModel,

    /// Also write every register write to this CSV file
    #[arg(short, long)]
    log: Option<PathBuf>,

    /// Song ticks per second
    #[arg(long, default_value_t = FRAME_RATE_NTSC)]
    tick_rate: u32,

    /// Output sample rate in Hz
    #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE)]
    sample_rate: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    anyhow::ensure!(args.tick_rate > 0, "--tick-rate must be positive");
    anyhow::ensure!(args.sample_rate > 0, "--sample-rate must be positive");

    let score = Score::load(&args.input)?;
    let ticks = score.length_ticks(args.tick_rate);

    let config = DriverConfig::default()
        .with_model(args.model)
        .with_dump_writes(args.log.is_some());
    let mut driver = SccDriver::init(Arc::new(score.song.clone()), config)
        .context("failed to start the SCC driver")?;
    anyhow::ensure!(
        args.sample_rate <= driver.rate(),
        "--sample-rate must not exceed the chip rate of {} Hz",
        driver.rate()
    );

    tracing::info!(
        "rendering {} ({} ticks at {} Hz, {})",
        args.input.display(),
        ticks,
        args.tick_rate,
        args.model
    );
    let samples = render(&mut driver, &score, ticks, args.tick_rate, args.sample_rate);

    write_wav(&args.output, &samples, args.sample_rate)?;
    tracing::info!("wrote {} samples to {}", samples.len(), args.output.display());

    if let Some(path) = &args.log {
        let writes = driver.take_write_log();
        export_write_log(&writes, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!("wrote {} register writes to {}", writes.len(), path.display());
    }

    driver.quit();
    Ok(())
}

fn write_wav(path: &Path, samples: &[i16], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}
