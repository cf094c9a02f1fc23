mod error;
mod parser;
mod processor;
mod serialiser;
mod srt;
mod timestamp;

use crate::error::StretchError;
use crate::processor::{StretchOpts, Summary};

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::ops::RangeInclusive;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const FPS_RANGE: RangeInclusive<f64> = 1.0..=120.0;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(_) => (),
        Err(err) => {
            eprintln!("An error occurred: {}", err);
            for cause in err.chain().skip(1) {
                eprintln!("    {}", cause);
            }
            std::process::exit(1);
        }
    }
}

#[derive(ClapParser)]
#[command(about = "Rescale SRT subtitle timestamps from one frame rate to another")]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "The file to read from. Use '-' to read from standard input."
    )]
    input: String,
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "The file to write to. Use '-' to write to standard output."
    )]
    output: String,
    #[arg(
        long,
        value_name = "FPS",
        help = "Frame rate the subtitles were timed against (1-120)."
    )]
    in_fps: f64,
    #[arg(
        long,
        value_name = "FPS",
        help = "Frame rate to retime the subtitles for (1-120)."
    )]
    out_fps: f64,
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Log more details to standard error. Repeat for debug output."
    )]
    verbose: u8,
}

impl Cli {
    fn stretch_opts(&self) -> Result<StretchOpts, StretchError> {
        Ok(StretchOpts {
            fps_in: check_fps("--in-fps", self.in_fps)?,
            fps_out: check_fps("--out-fps", self.out_fps)?,
        })
    }
}

fn check_fps(name: &str, fps: f64) -> Result<f64, StretchError> {
    if FPS_RANGE.contains(&fps) {
        Ok(fps)
    } else {
        Err(StretchError::Configuration(format!(
            "{} should be between {} and {}, got {}",
            name,
            FPS_RANGE.start(),
            FPS_RANGE.end(),
            fps
        )))
    }
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run(cli: &Cli) -> Result<Summary> {
    let opts = cli.stretch_opts()?;

    let input: Box<dyn Read> = if cli.input == "-" {
        Box::new(io::stdin())
    } else {
        let file = File::open(&cli.input)
            .context(format!("Failed to open input file: '{}'", cli.input))?;
        Box::new(file)
    };

    let output: Box<dyn Write> = if cli.output == "-" {
        Box::new(io::stdout())
    } else {
        let file = File::create(&cli.output)
            .context(format!("Failed to create output file: '{}'", cli.output))?;
        Box::new(file)
    };
    let mut output = BufWriter::new(output);

    let summary = processor::process(input, &mut output, &opts)
        .context(format!("Failed to stretch SRT file: '{}'", cli.input))?;
    output
        .flush()
        .context(format!("Failed to write to output file: '{}'", cli.output))?;

    Ok(summary)
}
