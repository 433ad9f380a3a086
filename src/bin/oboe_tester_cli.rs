use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use testoboe::audio::WavInfo;
use testoboe::logging::init_logging;
use testoboe::recorder::recording_path;
use testoboe::{InputPreset, PerformanceMode, PlatformRecorder, RecorderBridge, RecorderConfig};

#[derive(Parser, Debug)]
#[command(
    name = "oboe_tester_cli",
    about = "Desktop harness for the Oboe tester recorder bridge"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the identification string returned to the activity
    Identify,
    /// Record the default input device into a WAV file
    Record {
        /// Output file, or a directory to create a timestamped file in
        #[arg(long)]
        output: PathBuf,
        #[arg(long)]
        sample_rate: Option<i32>,
        #[arg(long, default_value_t = 5)]
        duration_secs: u64,
        #[arg(long)]
        input_preset: Option<InputPreset>,
        #[arg(long)]
        performance_mode: Option<PerformanceMode>,
        /// JSON recorder configuration (defaults to assets/recorder_config.json)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the header of a WAV file
    Inspect { wav: PathBuf },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging();

    match cli.command {
        Commands::Identify => {
            let bridge = RecorderBridge::new(
                Arc::new(PlatformRecorder::new(RecorderConfig::default())),
                RecorderConfig::default(),
            );
            println!("{}", bridge.identify());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Record {
            output,
            sample_rate,
            duration_secs,
            input_preset,
            performance_mode,
            config,
        } => {
            let mut config = config
                .map(RecorderConfig::load_from_file)
                .unwrap_or_else(RecorderConfig::load);
            if let Some(preset) = input_preset {
                config.input_preset = preset;
            }
            if let Some(mode) = performance_mode {
                config.performance_mode = mode;
            }
            let sample_rate = match sample_rate {
                Some(rate) => rate,
                None => i32::try_from(config.sample_rate)
                    .context("configured sample_rate does not fit a Java int")?,
            };
            run_record(config, &output, sample_rate, Duration::from_secs(duration_secs))
        }
        Commands::Inspect { wav } => run_inspect(&wav),
    }
}

fn run_record(
    config: RecorderConfig,
    output: &Path,
    sample_rate: i32,
    duration: Duration,
) -> Result<ExitCode> {
    let path = if output.is_dir() {
        recording_path(output, config.input_preset, config.performance_mode)
    } else {
        output.to_path_buf()
    };
    let path_str = path
        .to_str()
        .ok_or_else(|| anyhow!("output path is not valid UTF-8: {}", path.display()))?;

    let recorder = Arc::new(PlatformRecorder::new(config.clone()));
    let bridge = RecorderBridge::new(recorder, config);

    if let Err(err) = bridge.start_recording(path_str, sample_rate) {
        bail!("start failed: {}", err);
    }
    eprintln!(
        "Recording {} for {}s...",
        path.display(),
        duration.as_secs()
    );
    std::thread::sleep(duration);

    let summary = bridge
        .stop_recording()
        .map_err(|err| anyhow!("stop failed: {}", err))?;
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("serializing summary")?
    );
    Ok(ExitCode::SUCCESS)
}

fn run_inspect(wav: &Path) -> Result<ExitCode> {
    let info = WavInfo::read(wav).map_err(|err| anyhow!("{}: {}", wav.display(), err))?;
    println!("{}", info);
    Ok(ExitCode::SUCCESS)
}
