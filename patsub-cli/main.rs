mod commands;

use std::process::ExitCode;

use clap::Parser;
use owo_colors::OwoColorize as _;

#[derive(Debug, clap::Parser)]
#[clap(version, about = "Compile globs to regexes and expand `{field}` templates")]
pub struct Args {
    #[clap(subcommand)]
    pub command: Command,
    #[clap(long, default_value = "auto", global = true)]
    pub color: ColorChoice,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Compile a glob. Without paths, print the generated regex. With paths,
    /// print the ones matching the glob.
    Glob {
        pattern: String,
        /// Paths to match. `-` reads newline-separated paths from stdin.
        paths: Vec<String>,
    },
    /// Print a regex matching the text literally.
    Quote { text: String },
    /// Split text into literal and matched fragments.
    Scan { regex: String, text: String },
    /// Check that a template only references the given fields.
    Validate {
        template: String,
        /// An allowed field name. May be given multiple times.
        #[clap(long = "field", short)]
        fields: Vec<String>,
    },
    /// Expand a template. Unbound fields expand to nothing.
    Expand {
        template: String,
        /// Bind a field. This takes the form `name=value`.
        #[clap(long, short = 'D')]
        define: Vec<String>,
        /// Validate the template against `--field` before expanding.
        #[clap(long)]
        strict: bool,
        /// An allowed field name, used with `--strict`.
        #[clap(long = "field", short)]
        fields: Vec<String>,
    },
    /// Load a configuration file, validating every template and compiling
    /// every glob.
    Check { config: std::path::PathBuf },
}

/// Color mode.
#[derive(Clone, Copy, Default, Debug, clap::ValueEnum)]
pub enum ColorChoice {
    /// Probe the current terminal and environment variables for color support.
    /// Color is disabled if the `NO_COLOR` environment variable is set, or if
    /// the output is not a terminal.
    #[default]
    Auto,
    /// Force color output, even if the command is not running in a terminal.
    Always,
    /// Do not use color output, regardless of whether the command is running in
    /// a terminal.
    Never,
}

impl From<ColorChoice> for anstream::ColorChoice {
    fn from(choice: ColorChoice) -> Self {
        match choice {
            ColorChoice::Auto => anstream::ColorChoice::Auto,
            ColorChoice::Always => anstream::ColorChoice::Always,
            ColorChoice::Never => anstream::ColorChoice::Never,
        }
    }
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("PATSUB_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();
    anstream::ColorChoice::from(args.color).write_global();
    tracing::debug!("{:?}", args.command);

    match commands::run(args.command) {
        Ok(code) => code,
        Err(err) => {
            anstream::eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
