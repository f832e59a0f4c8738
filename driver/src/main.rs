use anyhow::Context;
use clap::{Parser, Subcommand};
use generator::profile::{write_capture, GeneratorConfig};
use std::io;
use std::path::PathBuf;
use workflow::config::{WorkflowConfig, DEFAULT_ADB, DEFAULT_TAG};
use workflow::runner::Runner;

mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Detection-log distance calibration driver")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Stream detections from the device log and print distance estimates
    Live {
        /// Load stream/clear commands from YAML
        #[arg(long)]
        workflow: Option<PathBuf>,
        #[arg(long, default_value = DEFAULT_ADB)]
        adb: String,
        /// logcat filter for the detection tag, e.g. `JNIpart:E`
        #[arg(long, default_value = DEFAULT_TAG)]
        tag: String,
    },
    /// Convert a captured log into `<LOG>.csv`
    Batch {
        log: PathBuf,
        /// Also write a JSON run summary
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Write a synthetic capture for dry runs
    Generate {
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 32)]
        detections: usize,
        #[arg(long, default_value_t = 16)]
        noise_lines: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Live { workflow, adb, tag } => {
            let config = if let Some(path) = workflow {
                WorkflowConfig::load(path)?
            } else {
                WorkflowConfig::from_args(&adb, &tag)
            };
            let stdout = io::stdout();
            let mut out = stdout.lock();
            let mut diag = io::stderr();
            Runner::new(config).run_live(&mut out, &mut diag)?;
        }
        Command::Batch { log, report } => {
            let summary = Runner::new(WorkflowConfig::default()).run_batch(&log)?;
            println!(
                "Batch run -> {} detections from {} lines written to {}",
                summary.detections,
                summary.lines_read,
                summary.output.display()
            );
            if let Some(path) = report {
                summary.write_report(&path)?;
            }
        }
        Command::Generate {
            out,
            detections,
            noise_lines,
            seed,
        } => {
            let config = GeneratorConfig {
                detections,
                noise_lines,
                seed,
                ..Default::default()
            };
            let written = write_capture(&config, &out)
                .with_context(|| format!("generating capture {}", out.display()))?;
            println!("Wrote {} lines to {}", written, out.display());
        }
    }

    Ok(())
}
