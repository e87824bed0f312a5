use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use log::debug;

use bruin_config::Configuration;
use bruin_core::logging::init_stream_logging;
use bruin_core::LogLevel;

/// Bruin configuration tool
///
/// Reads INI-style configuration files, processes their %include
/// directives and ${...} variable references, and prints the results.
#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Increase logging verbosity (repeat for more detail)
    #[clap(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a configuration with includes and variables expanded
    Expand {
        /// Configuration file to read
        file: PathBuf,

        /// Write to this file instead of standard output
        #[clap(short, long)]
        output: Option<PathBuf>,

        /// Fail on unresolvable variable references
        #[clap(long)]
        strict: bool,
    },

    /// Print the value of a single option
    Get {
        /// Configuration file to read
        file: PathBuf,

        /// Section holding the option
        section: String,

        /// Option to retrieve
        option: String,

        /// Convert the value before printing
        #[clap(long, value_enum, default_value_t = ValueKind::Str)]
        kind: ValueKind,
    },

    /// List section names, or dump every section as JSON
    Sections {
        /// Configuration file to read
        file: PathBuf,

        /// Emit sections with their expanded options as JSON
        #[clap(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ValueKind {
    /// The expanded string, verbatim
    Str,
    /// An integer
    Int,
    /// A floating-point number
    Float,
    /// A boolean (yes/no, true/false, on/off, 1/0)
    Bool,
    /// Whitespace-separated words, one per line
    List,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Expand {
            file,
            output,
            strict,
        } => expand(&file, output.as_deref(), strict),
        Commands::Get {
            file,
            section,
            option,
            kind,
        } => get(&file, &section, &option, kind),
        Commands::Sections { file, json } => sections(&file, json),
    }
}

fn init_logging(verbose: u8) -> anyhow::Result<()> {
    let level = match verbose {
        0 => LogLevel::Warning,
        1 => LogLevel::Info,
        2 => LogLevel::Debug,
        _ => LogLevel::Trace,
    };
    init_stream_logging(level)?;
    Ok(())
}

fn load(file: &Path, strict: bool) -> anyhow::Result<Configuration> {
    let mut config = Configuration::new().with_strict_substitution(strict);
    config
        .read_file(file)
        .with_context(|| format!("cannot read configuration file {}", file.display()))?;
    debug!(
        "loaded {} with {} sections",
        file.display(),
        config.sections().count()
    );
    Ok(config)
}

fn expand(file: &Path, output: Option<&Path>, strict: bool) -> anyhow::Result<()> {
    let config = load(file, strict)?;

    match output {
        Some(path) => {
            let out = File::create(path)
                .with_context(|| format!("cannot create output file {}", path.display()))?;
            let mut out = BufWriter::new(out);
            config.write(&mut out)?;
            out.flush()?;
        }
        None => {
            let stdout = io::stdout();
            config.write(stdout.lock())?;
        }
    }
    Ok(())
}

fn get(
    file: &Path,
    section: &str,
    option: &str,
    kind: ValueKind,
) -> anyhow::Result<()> {
    let config = load(file, false)?;

    match kind {
        ValueKind::Str => println!("{}", config.get(section, option)?),
        ValueKind::Int => println!("{}", config.get_int(section, option)?),
        ValueKind::Float => println!("{}", config.get_float(section, option)?),
        ValueKind::Bool => println!("{}", config.get_bool(section, option)?),
        ValueKind::List => {
            for word in config.get_list(section, option, None)? {
                println!("{word}");
            }
        }
    }
    Ok(())
}

fn sections(file: &Path, json: bool) -> anyhow::Result<()> {
    let config = load(file, false)?;

    if json {
        let mut root = serde_json::Map::new();
        for section in config.sections() {
            let mut options = serde_json::Map::new();
            for (option, value) in config.items(section)? {
                options.insert(option, serde_json::Value::String(value));
            }
            root.insert(section.to_string(), serde_json::Value::Object(options));
        }
        println!("{}", serde_json::to_string_pretty(&root)?);
    } else {
        for section in config.sections() {
            println!("{section}");
        }
    }
    Ok(())
}
