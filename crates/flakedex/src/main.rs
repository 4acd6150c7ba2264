use std::path::PathBuf;
use std::process::ExitCode;

use anstream::eprintln;
use anyhow::Result;
use clap::Parser;
use owo_colors::OwoColorize;

use crate::commands::ExitStatus;
use crate::printer::Printer;

mod commands;
mod logging;
mod printer;

/// Generate a static HTML index of the flake8 plugins installed in a Python environment.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Path to the virtual environment to inspect. Defaults to the active environment
    /// (`VIRTUAL_ENV`), then `.venv` in the working directory.
    #[arg(long, value_name = "PATH")]
    venv: Option<PathBuf>,

    /// Directory to write the report into.
    #[arg(long, value_name = "DIR", default_value = "public")]
    output: PathBuf,

    /// Do not print any output.
    #[arg(long, short, conflicts_with = "verbose")]
    quiet: bool,

    /// Use verbose output.
    #[arg(long, short, conflicts_with = "quiet")]
    verbose: bool,

    /// Control colors in output.
    #[arg(long, value_enum, default_value = "auto")]
    color: ColorChoice,
}

#[derive(Debug, Clone, clap::ValueEnum)]
enum ColorChoice {
    /// Enables colored output only when the output is going to a terminal or TTY with support.
    Auto,

    /// Enables colored output regardless of the detected environment.
    Always,

    /// Disables colored output.
    Never,
}

impl From<ColorChoice> for anstream::ColorChoice {
    fn from(value: ColorChoice) -> Self {
        match value {
            ColorChoice::Auto => Self::Auto,
            ColorChoice::Always => Self::Always,
            ColorChoice::Never => Self::Never,
        }
    }
}

fn run() -> Result<ExitStatus> {
    let cli = Cli::parse();

    // Configure the `Printer`, which controls user-facing output in the CLI.
    let printer = if cli.quiet {
        Printer::Quiet
    } else if cli.verbose {
        Printer::Verbose
    } else {
        Printer::Default
    };

    anstream::ColorChoice::from(cli.color).write_global();

    logging::setup_logging(if cli.verbose {
        logging::Level::Verbose
    } else {
        logging::Level::Default
    })?;

    commands::generate(cli.venv.as_deref(), &cli.output, printer)
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code.into(),
        Err(err) => {
            let mut causes = err.chain();
            eprintln!("{}: {}", "error".red().bold(), causes.next().unwrap());
            for err in causes {
                eprintln!("  {}: {}", "Caused by".red().bold(), err);
            }
            ExitStatus::Error.into()
        }
    }
}
