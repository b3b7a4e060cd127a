use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use horsepower_exhibit::analysis::{Emission, TrySummary};
use horsepower_exhibit::config::{ExhibitConfig, DEFAULT_CONFIG_PATH};
use horsepower_exhibit::engine::{ExhibitEngine, ManualTimeSource, TickReport};
use horsepower_exhibit::sensor::{
    available_ports, NullSource, ReplaySource, SampleSource, SyntheticLift,
};
use horsepower_exhibit::telemetry::TelemetrySnapshot;
use serde::Serialize;

/// Width of the text fill bar
const BAR_WIDTH: usize = 40;

#[derive(Parser, Debug)]
#[command(
    name = "horsepower",
    about = "Horsepower exhibit: lift tracking from a serial distance sensor"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the live exhibit loop against the serial sensor
    Run {
        /// Config file (defaults to horsepower.json in the working directory)
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        port: Option<String>,
        #[arg(long)]
        baud: Option<u32>,
        /// Mass of the lifted bar in kilograms
        #[arg(long)]
        mass: Option<f64>,
        /// Minimum smoothed movement per sample, in millimetres
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Feed a recorded session through the engine with a manual clock
    Replay {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Write a synthetic lift session in the replay format
    Simulate {
        #[arg(long, default_value_t = 7)]
        seed: u64,
        #[arg(long)]
        output: Option<PathBuf>,
        /// Lower the bar back to rest after the hold
        #[arg(long)]
        lower: bool,
        /// Insert a language switch at this time (seconds)
        #[arg(long)]
        switch_language_at: Option<f64>,
    },
    /// List serial ports visible to the system
    ListPorts,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

fn main() -> ExitCode {
    horsepower_exhibit::init_logging();
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

    match cli.command {
        Commands::Run {
            config,
            port,
            baud,
            mass,
            threshold,
        } => {
            let mut config = ExhibitConfig::load_from_file(
                config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH)),
            );
            if let Some(port) = port {
                config.sensor.port = port;
            }
            if let Some(baud) = baud {
                config.sensor.baud_rate = baud;
            }
            if let Some(mass) = mass {
                config.physics.mass_kg = mass;
            }
            if let Some(threshold) = threshold {
                config.physics.distance_threshold_mm = threshold;
            }
            config.validate().context("validating command line overrides")?;
            run_live(config)
        }
        Commands::Replay {
            input,
            config,
            format,
        } => run_replay(&input, config, format),
        Commands::Simulate {
            seed,
            output,
            lower,
            switch_language_at,
        } => run_simulate(seed, output, lower, switch_language_at),
        Commands::ListPorts => run_list_ports(),
    }
}

fn run_live(config: ExhibitConfig) -> Result<ExitCode> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    let engine = ExhibitEngine::with_serial(config);
    if engine.is_degraded() {
        eprintln!("Sensor unavailable, display will stay at zero until restart");
    }

    let snapshot = runtime.block_on(engine.run_until_shutdown(render_live));
    let counters = snapshot.counters;
    tracing::info!(
        "[Exhibit] Stopped after {} tries ({} samples, {} malformed lines)",
        counters.tries_completed,
        counters.samples_accepted,
        counters.malformed_lines
    );
    Ok(ExitCode::from(0))
}

fn render_live(report: &TickReport) {
    let mut stdout = std::io::stdout().lock();
    // Clear screen and home the cursor before each frame
    let _ = writeln!(stdout, "\x1b[2J\x1b[H{}", report.frame.render_text(BAR_WIDTH));
    let _ = stdout.flush();
}

#[derive(Serialize)]
struct ReplayEmission<'a> {
    timestamp_s: f64,
    emission: &'a Emission,
}

#[derive(Serialize)]
struct ReplayReport<'a> {
    telemetry: &'a TelemetrySnapshot,
}

fn run_replay(input: &Path, config_path: Option<PathBuf>, format: OutputFormat) -> Result<ExitCode> {
    let config = config_path
        .map(ExhibitConfig::load_from_file)
        .unwrap_or_default();
    let mut source = ReplaySource::from_path(input)
        .with_context(|| format!("loading session {}", input.display()))?;
    let records = source.poll(f64::INFINITY)?;

    let clock = ManualTimeSource::new(0.0);
    let mut engine = ExhibitEngine::new(config, Box::new(NullSource), Box::new(clock.clone()));

    for record in &records {
        clock.set(record.timestamp_s);
        let emission = engine.ingest_line(&record.line, record.timestamp_s);
        engine.refresh_display(record.timestamp_s);

        let Some(emission) = emission.filter(|emission| !emission.is_skipped()) else {
            continue;
        };
        match format {
            OutputFormat::Json => {
                let line = ReplayEmission {
                    timestamp_s: record.timestamp_s,
                    emission: &emission,
                };
                println!("{}", serde_json::to_string(&line)?);
            }
            OutputFormat::Text => {
                if let Emission::TryEnded(summary) = emission {
                    println!("{}", describe_try(&summary));
                }
            }
        }
    }

    let snapshot = engine.telemetry();
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&ReplayReport {
                    telemetry: &snapshot
                })?
            );
        }
        OutputFormat::Text => {
            println!("{}", engine.frame().render_text(BAR_WIDTH));
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }

    Ok(ExitCode::from(0))
}

fn describe_try(summary: &TrySummary) -> String {
    format!(
        "t={:.2}s try: {:.2} hp ({:.1} W) over {:.2}s, {:.0} mm",
        summary.ended_at_s,
        summary.peak_hp,
        summary.peak_watts,
        summary.duration_s,
        summary.distance_mm
    )
}

fn run_simulate(
    seed: u64,
    output: Option<PathBuf>,
    lower: bool,
    switch_language_at: Option<f64>,
) -> Result<ExitCode> {
    if switch_language_at.is_some_and(|t| !t.is_finite() || t < 0.0) {
        bail!("--switch-language-at must be a non-negative number of seconds");
    }

    let lift = SyntheticLift {
        seed,
        lower,
        language_switch_at_s: switch_language_at,
        ..SyntheticLift::default()
    };

    let mut contents = format!("# synthetic lift seed={} lower={}\n", seed, lower);
    for line in lift.generate() {
        contents.push_str(&line.to_record());
        contents.push('\n');
    }

    if let Some(path) = output {
        fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))?;
        println!("Wrote {:.1}s session to {}", lift.duration_s(), path.display());
    } else {
        print!("{contents}");
    }
    Ok(ExitCode::from(0))
}

fn run_list_ports() -> Result<ExitCode> {
    let ports = available_ports().context("enumerating serial ports")?;
    if ports.is_empty() {
        println!("No serial ports found");
        return Ok(ExitCode::from(0));
    }

    for port in ports {
        println!("{port}");
    }
    Ok(ExitCode::from(0))
}
