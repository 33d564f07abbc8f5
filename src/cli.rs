//! Command line argument handling, built with clap's builder API
//! (`Command::new(...).arg(...)` chains, no derive macro).
use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgGroup, Command};
use log::LevelFilter;

use crate::error::{Error, Result};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// What the run is computing: a single deduplicated/consolidated set, or
/// a diff between two sets.
#[derive(Debug, Clone)]
pub enum Mode {
    Dedup { inputs: Vec<PathBuf> },
    Diff { set_a: Vec<PathBuf>, set_b: Vec<PathBuf> },
}

/// How the consolidated intermediate sets are buffered before the final
/// write. Diff mode always needs both sides resident in memory to merge;
/// nothing is ever persisted to disk after the process exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferMode {
    InMemory,
    TempFile,
}

#[derive(Debug, Clone)]
pub struct CliOptions {
    pub mode: Mode,
    pub output: Option<PathBuf>,
    pub buffer_mode: BufferMode,
    pub max_line_len: Option<u16>,
    pub verbosity: LevelFilter,
    pub log_file: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub stats: bool,
}

fn build_command() -> Command {
    Command::new("pfdd dedupes and diffs Adblock-Plus domain blocklists")
        .version(VERSION)
        .bin_name("pfdd")
        .arg(
            Arg::new("dedup")
                .short('d')
                .long("dedup")
                .long_help("Consolidate one or more blocklists, dropping rules already dominated by a broader one.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("diff")
                .long("diff")
                .long_help("Diff two consolidated sets, annotating each rule as neutral, added, or dominated.")
                .action(ArgAction::SetTrue),
        )
        .group(ArgGroup::new("mode").args(["dedup", "diff"]).required(true))
        .arg(
            Arg::new("inputs")
                .long_help("Input files or directories for --dedup (a directory is listed non-recursively).")
                .action(ArgAction::Append)
                .num_args(0..)
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("set-a")
                .short('a')
                .long("set-a")
                .long_help("Input files or directories for the A side of --diff.")
                .action(ArgAction::Append)
                .num_args(1..)
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("set-b")
                .short('b')
                .long("set-b")
                .long_help("Input files or directories for the B side of --diff.")
                .action(ArgAction::Append)
                .num_args(1..)
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .long_help("Output path. Omitted or '-' means stdout.")
                .action(ArgAction::Set)
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("in-memory")
                .long("in-memory")
                .long_help("Buffer intermediate consolidated sets in memory (default).")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("temp-file")
                .long("temp-file")
                .long_help("Buffer intermediate consolidated sets in an anonymous temp file instead of memory.")
                .action(ArgAction::SetTrue)
                .conflicts_with("in-memory"),
        )
        .arg(
            Arg::new("max-line-len")
                .long("max-line-len")
                .long_help("Drop input lines longer than this many bytes, with a warning.")
                .action(ArgAction::Set)
                .value_name("BYTES")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .long_help("Increase log verbosity. Repeatable.")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .long_help("Silence all logging.")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose"),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .long_help("Append logs to this file in addition to stderr.")
                .action(ArgAction::Set)
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .long_help("Explicit YAML config path (default: ./pfdd.yml, then $HOME/.pfdd.yml).")
                .action(ArgAction::Set)
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("stats")
                .long("stats")
                .long_help("Print a colorized summary of the run (rule counts, or diff breakdown) to stderr.")
                .action(ArgAction::SetTrue),
        )
}

fn verbosity_from_flags(verbose_count: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Off;
    }
    match verbose_count {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

impl CliOptions {
    pub fn from_args(args: impl Iterator<Item = String>) -> Result<Self> {
        let matches = build_command().try_get_matches_from(args).map_err(Error::Args)?;

        let mode = if matches.get_flag("diff") {
            let set_a: Vec<PathBuf> = matches.get_many::<PathBuf>("set-a").unwrap_or_default().cloned().collect();
            let set_b: Vec<PathBuf> = matches.get_many::<PathBuf>("set-b").unwrap_or_default().cloned().collect();
            Mode::Diff { set_a, set_b }
        } else {
            let inputs: Vec<PathBuf> = matches.get_many::<PathBuf>("inputs").unwrap_or_default().cloned().collect();
            Mode::Dedup { inputs }
        };

        let buffer_mode = if matches.get_flag("temp-file") { BufferMode::TempFile } else { BufferMode::InMemory };

        let verbose_count = matches.get_count("verbose");
        let quiet = matches.get_flag("quiet");

        Ok(CliOptions {
            mode,
            output: matches.get_one::<PathBuf>("output").cloned(),
            buffer_mode,
            max_line_len: matches.get_one::<u16>("max-line-len").copied(),
            verbosity: verbosity_from_flags(verbose_count, quiet),
            log_file: matches.get_one::<PathBuf>("log-file").cloned(),
            config: matches.get_one::<PathBuf>("config").cloned(),
            stats: matches.get_flag("stats"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliOptions> {
        CliOptions::from_args(std::iter::once("pfdd".to_string()).chain(args.iter().map(|s| s.to_string())))
    }

    #[test]
    fn dedup_collects_positional_inputs() {
        let opts = parse(&["--dedup", "a.txt", "b.txt"]).unwrap();
        match opts.mode {
            Mode::Dedup { inputs } => assert_eq!(inputs, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]),
            other => panic!("expected Dedup, got {other:?}"),
        }
    }

    #[test]
    fn diff_requires_set_a_and_set_b() {
        let opts = parse(&["--diff", "-a", "a.txt", "-b", "b.txt"]).unwrap();
        match opts.mode {
            Mode::Diff { set_a, set_b } => {
                assert_eq!(set_a, vec![PathBuf::from("a.txt")]);
                assert_eq!(set_b, vec![PathBuf::from("b.txt")]);
            }
            other => panic!("expected Diff, got {other:?}"),
        }
    }

    #[test]
    fn dedup_and_diff_are_mutually_exclusive() {
        assert!(parse(&["--dedup", "--diff"]).is_err());
    }

    #[test]
    fn one_of_dedup_or_diff_is_required() {
        assert!(parse(&["a.txt"]).is_err());
    }

    #[test]
    fn verbosity_defaults_to_warn() {
        let opts = parse(&["--dedup"]).unwrap();
        assert_eq!(opts.verbosity, LevelFilter::Warn);
    }

    #[test]
    fn repeated_verbose_raises_level() {
        let opts = parse(&["--dedup", "-vv"]).unwrap();
        assert_eq!(opts.verbosity, LevelFilter::Debug);
    }

    #[test]
    fn quiet_overrides_verbosity() {
        let opts = parse(&["--dedup", "-q"]).unwrap();
        assert_eq!(opts.verbosity, LevelFilter::Off);
    }

    #[test]
    fn temp_file_and_in_memory_conflict() {
        assert!(parse(&["--dedup", "--in-memory", "--temp-file"]).is_err());
    }

    #[test]
    fn stats_defaults_to_off() {
        let opts = parse(&["--dedup"]).unwrap();
        assert!(!opts.stats);
        let opts = parse(&["--dedup", "--stats"]).unwrap();
        assert!(opts.stats);
    }
}
