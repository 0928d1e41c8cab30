use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use specmangle::config::{EmitMode, MangleConfig, OutputFormat};
use specmangle::driver;

// Wrapper type for clap ValueEnum support
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormatArg {
    #[default]
    Human,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Parser)]
#[command(name = "specmangle")]
#[command(about = "Mangle names of specialized functions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode every specialization event in a file
    Encode {
        /// Event file (.toml or .json)
        file: PathBuf,

        /// Output format (human, json); overrides specmangle.toml
        #[arg(long, value_enum)]
        format: Option<OutputFormatArg>,

        /// Print only the specialization suffix, without prefix and base name
        #[arg(long)]
        suffix_only: bool,
    },
    /// Check that every event in a file can be encoded
    Check {
        /// Event file (.toml or .json)
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    // Logging is off unless SPECMANGLE_LOG is set, e.g. SPECMANGLE_LOG=specmangle=trace
    if let Ok(filter) = EnvFilter::try_from_env("SPECMANGLE_LOG") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::Encode {
            file,
            format,
            suffix_only,
        } => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            let mut config = match MangleConfig::load(&cwd) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("error: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            if let Some(format) = format {
                config.output.format = format.into();
            }
            if suffix_only {
                config.output.emit = EmitMode::Suffix;
            }

            let rendered = driver::encode_file(&file, config.output.emit)
                .and_then(|symbols| driver::render(&symbols, &config.output));
            match rendered {
                Ok(text) => print!("{}", text),
                Err(e) => {
                    eprintln!("error: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
        Commands::Check { file } => match driver::check_file(&file) {
            Ok(count) => {
                let noun = if count == 1 { "event" } else { "events" };
                println!("{} {} ok", count, noun);
            }
            Err(e) => {
                eprintln!("error: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }

    ExitCode::SUCCESS
}
