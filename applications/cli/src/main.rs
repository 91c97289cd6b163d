//! Crossfeed - headphone crossfeed for WAV files

use clap::{Parser, Subcommand};
use crossfeed_cli::{load_settings, process_file};
use crossfeed_core::{DspId, SampleRate};
use crossfeed_dsp::{Crossfeed, CrossfeedPreset, DspPipeline};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "crossfeed")]
#[command(about = "Fixed-point headphone crossfeed", long_about = None)]
struct Cli {
    /// Configuration file path (TOML, JSON, ...)
    #[arg(short, long, global = true, env = "CROSSFEED_CONFIG")]
    config: Option<PathBuf>,

    /// Preset to use (`custom` keeps the configured tone)
    #[arg(short, long, global = true)]
    preset: Option<CrossfeedPreset>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crossfeed a WAV file
    Process {
        /// Input WAV file
        input: PathBuf,
        /// Output WAV file
        output: PathBuf,
        /// Frames per processing block
        #[arg(long, default_value_t = 1024)]
        block_frames: usize,
        /// Copy the audio through without crossfeed
        #[arg(long)]
        bypass: bool,
    },
    /// Show the fixed-point gain and shelf coefficients
    Coefs {
        /// Native sample rate in Hz
        #[arg(short, long, default_value_t = 44_100)]
        rate: u32,
    },
    /// List the built-in presets
    Presets,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crossfeed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input,
            output,
            block_frames,
            bypass,
        } => {
            let mut settings = load_settings(cli.config.as_deref(), cli.preset)?;
            settings.enabled = !bypass;

            let report = process_file(&input, &output, &settings, block_frames)?;
            if !report.crossfed && !bypass {
                tracing::warn!(
                    channels = report.channels,
                    "Input is not stereo, copied without crossfeed"
                );
            }
            println!(
                "{} frames, {} channels at {} Hz -> {}",
                report.frames,
                report.channels,
                report.sample_rate.as_hz(),
                output.display()
            );
        }
        Commands::Coefs { rate } => {
            anyhow::ensure!(rate > 0, "sample rate must be positive");
            let settings = load_settings(cli.config.as_deref(), cli.preset)?;

            let mut crossfeed = Crossfeed::new();
            settings.configure(&mut crossfeed, SampleRate::new(rate));

            let [c0, c1, c2] = crossfeed.coefs();
            println!("preset:       {}", settings.preset);
            println!(
                "direct gain:  {:#010x} ({:.1} dB)",
                crossfeed.direct_gain(),
                f64::from(settings.direct_gain) / 10.0
            );
            println!(
                "cross gain:   {:.1} dB, hf attenuation {:.1} dB above {} Hz",
                f64::from(settings.cross_gain) / 10.0,
                f64::from(settings.hf_attenuation) / 10.0,
                settings.hf_cutoff
            );
            println!("coefs @ {} Hz: [{:#010x}, {:#010x}, {:#010x}]", rate, c0, c1, c2);
        }
        Commands::Presets => {
            let pipeline = DspPipeline::with_crossfeed(DspId::AUDIO, SampleRate::default());
            for info in pipeline.stage_infos() {
                println!("{}: {}", info.display_name, info.description);
            }
            for preset in CrossfeedPreset::ALL {
                println!(
                    "{:<8} cross {:>6.1} dB  cutoff {:>4} Hz",
                    preset.to_string(),
                    f64::from(preset.cross_gain()) / 10.0,
                    preset.hf_cutoff()
                );
            }
        }
    }

    Ok(())
}
