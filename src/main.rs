use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rusty_valley::config::Settings;
use rusty_valley::{LogProgress, SessionState};

#[derive(Parser)]
#[command(author, version, about = "Savitzky-Golay smoothing and valley logging for spectrum traces")]
struct Cli {
    /// Load default filter and log settings from a JSON file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct FilterArgs {
    /// Filter window (odd; even values are bumped by one)
    #[arg(long)]
    window: Option<i64>,
    /// Polynomial order
    #[arg(long)]
    order: Option<i64>,
    /// Valley search start in nm (default: first wavelength)
    #[arg(long)]
    start: Option<f64>,
    /// Valley search end in nm (default: last wavelength)
    #[arg(long)]
    end: Option<f64>,
    /// Shift each trace so its maximum is 0 dB before filtering
    #[arg(long, default_value_t = false)]
    normalize: bool,
    /// Sample name written to every log row
    #[arg(long)]
    sample: Option<String>,
    /// Valley log (.csv or .xlsx), appended to
    #[arg(long)]
    log: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Smooth one spectrum and report its valley
    Single {
        file: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
        /// Write wavelength, original and filtered intensity (.csv or .xlsx)
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Run every file through the same filter and collect the valleys
    Batch {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[command(flatten)]
        filter: FilterArgs,
        /// Print the outcome as JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn merge(mut settings: Settings, args: &FilterArgs) -> Settings {
    if let Some(w) = args.window {
        settings.window = w;
    }
    if let Some(o) = args.order {
        settings.order = o;
    }
    if args.start.is_some() {
        settings.range_start = args.start;
    }
    if args.end.is_some() {
        settings.range_end = args.end;
    }
    if args.normalize {
        settings.normalize = true;
    }
    if args.sample.is_some() {
        settings.sample_name = args.sample.clone();
    }
    if args.log.is_some() {
        settings.log_path = args.log.clone();
    }
    settings
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let base = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    let mut session = SessionState::new();

    match cli.command {
        Command::Single {
            file,
            filter,
            export,
        } => {
            let settings = merge(base, &filter);
            session
                .load_files(&[&file])
                .with_context(|| format!("loading {}", file.display()))?;
            let (params, _warnings) = session.filter_parameters(&settings.to_form())?;
            println!(
                "window {}, order {}, range {}..{} nm",
                params.window(),
                params.order(),
                params.range_start(),
                params.range_end()
            );

            let run = session.run_single(&params)?;
            match run.processed.valley {
                Some(v) => println!("Valley: {:.2} dB @ {:.2} nm", v.intensity, v.wavelength),
                None => println!("Valley: none inside the search range"),
            }

            if let Some(path) = export {
                session
                    .export_full_spectrum(&path)
                    .with_context(|| format!("exporting {}", path.display()))?;
            }

            if let Some(log_path) = settings.log_path {
                let sample = settings.sample_name.unwrap_or_default();
                session.set_log_path(log_path)?;
                let record = session.append_log(&sample).context("logging valley")?;
                println!("Logged at {}", record.timestamp);
            }
        }
        Command::Batch {
            files,
            filter,
            json,
        } => {
            let settings = merge(base, &filter);
            let Some(sample) = settings.sample_name.clone() else {
                bail!("a batch needs --sample (or sample_name in the config)");
            };

            session.load_files(&files).context("loading spectra")?;
            let (params, _warnings) = session.filter_parameters(&settings.to_form())?;
            let outcome = session.run_batch(&params, &sample, &mut LogProgress)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                for (point, record) in outcome.series.iter().zip(&outcome.records) {
                    println!(
                        "{:>4}  {:>10.3} nm  {:>9.3} dB  {}",
                        point.index, point.wavelength, point.intensity, record.source_file
                    );
                }
                println!(
                    "{} valley(s) from {} file(s)",
                    outcome.records.len(),
                    session.collection().len()
                );
            }

            if let Some(log_path) = settings.log_path {
                session.set_log_path(log_path)?;
                session
                    .append_batch_log(&outcome)
                    .context("appending batch to log")?;
            }
        }
    }

    Ok(())
}
