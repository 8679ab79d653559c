use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use segsift::dict::Dict;
use segsift::settings;
use segsift::split::split_delimited;

#[derive(Parser)]
#[command(name = "sifttool", about = "Segsift dictionary query tool")]
struct Cli {
    /// Custom settings TOML, applied before any command runs
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log ranked matches at debug level
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rank identifiers from a dictionary file against a query
    Query {
        /// Dictionary file: one identifier per line, optionally followed by
        /// an echelon and a select count
        file: PathBuf,
        /// Query fragments
        #[arg(required = true)]
        needle: Vec<String>,
        /// Segment delimiter
        #[arg(long, default_value_t = '.')]
        delimiter: char,
        /// Keep only the first N results
        #[arg(short, long)]
        keep: Option<usize>,
        /// Preferences file, loaded before the query and saved after --select
        #[arg(long)]
        prefs: Option<PathBuf>,
        /// Record a selection of the given result index
        #[arg(long)]
        select: Option<usize>,
    },
    /// Show identifier stats for a dictionary file
    Info {
        /// Dictionary file
        file: PathBuf,
        /// Segment delimiter
        #[arg(long, default_value_t = '.')]
        delimiter: char,
    },
    /// Export default settings as TOML
    SettingsExport,
    /// Validate a custom settings TOML file
    SettingsValidate {
        /// Path to the TOML file
        file: PathBuf,
    },
}

fn load_dict(path: &Path, delimiter: char) -> Result<Dict<String>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let dict = Dict::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_whitespace();
        let ident = fields.next().expect("non-empty line has a first field");
        let echelon: u32 = match fields.next() {
            Some(field) => field
                .parse()
                .with_context(|| format!("{}:{}: bad echelon", path.display(), lineno + 1))?,
            None => 0,
        };
        let select_count: u32 = match fields.next() {
            Some(field) => field
                .parse()
                .with_context(|| format!("{}:{}: bad select count", path.display(), lineno + 1))?,
            None => 0,
        };
        if !dict.add_delimited(ident, delimiter, ident.to_string(), echelon, select_count) {
            tracing::warn!(ident, "conflicting registration skipped");
        }
    }
    Ok(dict)
}

fn query(
    file: &Path,
    needle: &[String],
    delimiter: char,
    keep: Option<usize>,
    prefs: Option<&Path>,
    select: Option<usize>,
    verbose: bool,
) -> Result<()> {
    let dict = load_dict(file, delimiter)?;
    if let Some(prefs) = prefs {
        dict.load_prefs(prefs);
    }

    let Some(mut matches) = dict.search(needle) else {
        bail!("empty query");
    };
    if let Some(keep) = keep {
        matches.keep_first(keep);
    }
    if verbose {
        matches.dump();
    }

    for (index, m) in matches.iter().enumerate() {
        println!(
            "{index:>3}  echelon={} selects={} score={}/{}  {}",
            m.echelon(),
            m.select_count(),
            m.score().points,
            m.score().penalty,
            m.userdata()
        );
    }

    if let Some(select) = select {
        matches.select(select);
        if let Some(prefs) = prefs {
            dict.save_prefs(prefs);
        }
    }
    Ok(())
}

fn info(file: &Path, delimiter: char) -> Result<()> {
    let text =
        fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let mut identifiers = 0usize;
    let mut max_depth = 0usize;
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let ident = line.split_whitespace().next().unwrap_or_default();
        identifiers += 1;
        max_depth = max_depth.max(split_delimited(ident, delimiter).len());
    }
    println!("identifiers: {identifiers}");
    println!("max depth:   {max_depth}");
    Ok(())
}

fn settings_validate(file: &Path) -> Result<()> {
    let text =
        fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    settings::parse_settings_toml(&text)
        .with_context(|| format!("{}: invalid settings", file.display()))?;
    println!("{}: OK", file.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "segsift=debug"
    } else {
        "segsift=info"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    if let Some(config) = &cli.config {
        let content = fs::read_to_string(config)
            .with_context(|| format!("reading {}", config.display()))?;
        settings::init_custom(content)
            .with_context(|| format!("{}: invalid settings", config.display()))?;
    }

    match cli.command {
        Command::Query {
            file,
            needle,
            delimiter,
            keep,
            prefs,
            select,
        } => query(
            &file,
            &needle,
            delimiter,
            keep,
            prefs.as_deref(),
            select,
            cli.verbose,
        ),
        Command::Info { file, delimiter } => info(&file, delimiter),
        Command::SettingsExport => {
            print!("{}", settings::default_toml());
            Ok(())
        }
        Command::SettingsValidate { file } => settings_validate(&file),
    }
}
