// File: ./src/cli.rs
//! Shared command-line interface logic: argument parsing and help text.
use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use std::path::PathBuf;

#[derive(Debug, Default, PartialEq)]
pub struct CliArgs {
    pub config: Option<PathBuf>,
    pub root: Option<PathBuf>,
    pub snapshot: Option<PathBuf>,
    pub today: Option<NaiveDate>,
    pub check_links: bool,
    pub json: bool,
    pub verbose: bool,
    pub help: bool,
}

/// Parses the arguments after the binary name.
pub fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut parsed = CliArgs::default();
    let mut it = args.iter();
    while let Some(arg) = it.next() {
        let mut value = |flag: &str| {
            it.next()
                .cloned()
                .ok_or_else(|| anyhow!("missing value for {}", flag))
        };
        match arg.as_str() {
            "-c" | "--config" => parsed.config = Some(PathBuf::from(value(arg)?)),
            "-r" | "--root" => parsed.root = Some(PathBuf::from(value(arg)?)),
            "-s" | "--snapshot" => parsed.snapshot = Some(PathBuf::from(value(arg)?)),
            "--today" => {
                let v = value(arg)?;
                let d = NaiveDate::parse_from_str(&v, "%Y-%m-%d")
                    .with_context(|| format!("invalid date for --today: '{}'", v))?;
                parsed.today = Some(d);
            }
            "--checklinks" => parsed.check_links = true,
            "--json" => parsed.json = true,
            "-v" | "--verbose" => parsed.verbose = true,
            "-h" | "--help" | "help" => parsed.help = true,
            other => bail!("unknown argument '{}'", other),
        }
    }
    Ok(parsed)
}

pub fn print_help(binary_name: &str) {
    println!(
        "Runcal v{} - derives the event graph of a local running calendar",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [OPTIONS]", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <file>      Load this TOML config instead of the default one.");
    println!("    -r, --root <path>        Use a different directory for config and cache.");
    println!("    -s, --snapshot <file>    Read the record tables from this JSON snapshot.");
    println!("    --today <YYYY-MM-DD>     Reference date for old/current decisions.");
    println!("    --checklinks             Check all links of upcoming events.");
    println!("    --json                   Print the whole graph as JSON.");
    println!("    -v, --verbose            Log debug messages.");
    println!("    -h, --help               Show this help message.");
    println!();
    println!("Without --snapshot the cached records of the last run are used.");
}
