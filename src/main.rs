use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cistercian::config::{Config, DEFAULT_MAX_INPUT_BYTES};
use cistercian::codec::extract::DEFAULT_WORKING_LONG_SIDE;
use cistercian::error::HasRecoverySuggestion;
use cistercian::report::to_json;
use cistercian::{AppError, logging};

/// Write numbers as Cistercian numerals and read them back.
#[derive(Parser, Debug)]
#[command(name = "cistercian", version)]
#[command(about = "Encode numbers 0-9999 as Cistercian numeral images and decode them")]
#[command(long_about = "Encode numbers 0-9999 as Cistercian numeral images and decode them.
Reports are printed to stdout as JSON; logs go to stderr.")]
struct Args {
    /// Log level (RUST_LOG takes precedence)
    #[arg(long, global = true, default_value = "warn",
          help = "Log level: off, error, warn, info, debug, trace")]
    log_level: String,

    /// Largest accepted input in bytes
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_INPUT_BYTES)]
    max_input_bytes: u64,

    /// Longest side images are reduced to before recognition
    #[arg(long, global = true, default_value_t = DEFAULT_WORKING_LONG_SIDE)]
    working_size: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a number as a numeral image
    Encode {
        /// Number to encode, 0-9999
        #[arg(allow_negative_numbers = true)]
        number: i64,

        /// Write the PNG to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Leave the segment map out of the report
        #[arg(long)]
        no_segments: bool,

        /// Embed the image as a data URL even when writing a file
        #[arg(long)]
        data_url: bool,
    },
    /// Read the number from a numeral image
    Decode {
        /// PNG, JPEG or GIF file
        #[arg(required_unless_present = "data_url", conflicts_with = "data_url")]
        file: Option<PathBuf>,

        /// Image as a data URL (data:image/png;base64,...)
        #[arg(long)]
        data_url: Option<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::default()
        .with_log_level(args.log_level.clone())
        .with_max_input_bytes(args.max_input_bytes)
        .with_working_long_side(args.working_size);
    config.validate().map_err(describe)?;
    let _logger = logging::init_logging(&config.log_level).map_err(describe)?;

    match args.command {
        Command::Encode {
            number,
            output,
            no_segments,
            data_url,
        } => {
            let config = config.with_include_segments(!no_segments);
            let mut report = cistercian::render(number, &config).map_err(describe)?;
            if let Some(path) = &output {
                std::fs::write(path, &report.png)
                    .with_context(|| format!("writing {}", path.display()))?;
                if !data_url {
                    report.image = path.display().to_string();
                }
            }
            println!("{}", to_json(&report).map_err(describe)?);
        }
        Command::Decode { file, data_url } => {
            let report = match (file, data_url) {
                (_, Some(url)) => cistercian::recognize_data_url(&url, &config),
                (Some(path), None) => cistercian::recognize_file(&path, &config),
                (None, None) => anyhow::bail!("either <FILE> or --data-url is required"),
            }
            .map_err(describe)?;
            println!("{}", to_json(&report).map_err(describe)?);
        }
    }
    Ok(())
}

/// Append the recovery suggestion, if any, to the message shown to the user.
fn describe(err: AppError) -> anyhow::Error {
    match err.recovery_suggestion().map(str::to_owned) {
        Some(hint) => anyhow::anyhow!("{} (hint: {})", err, hint),
        None => anyhow::Error::new(err),
    }
}
