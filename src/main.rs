//! pfdd: dedupe or diff Adblock-Plus domain blocklists.
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use colored::Colorize;
use log::info;

use pfddlib::cli::{BufferMode, CliOptions, Mode};
use pfddlib::config::{self, YamlConfig};
use pfddlib::core::consolidator::{apply_carry_over, consolidate_to_sink};
use pfddlib::core::diff_engine::{run_diff, DiffStats};
use pfddlib::core::output_sink::{BufferSink, FileSink, OutputSink};
use pfddlib::core::tld_index::HashTldIndex;
use pfddlib::io::load_input_set;
use pfddlib::logging::{init_combined_logger, init_term_logger};
use pfddlib::{Error, Result};

fn main() -> ExitCode {
    let res = run();

    if let Err(e) = res {
        eprintln!("{e}");
        e.into()
    } else {
        ExitCode::SUCCESS
    }
}

fn run() -> Result<()> {
    let now = Instant::now();

    let options = CliOptions::from_args(std::env::args())?;

    match &options.log_file {
        Some(path) => init_combined_logger(options.verbosity, path)?,
        None => init_term_logger(options.verbosity)?,
    }

    let config_path = options.config.clone().or_else(config::get_config);
    let yaml_config = match &config_path {
        Some(path) => config::read_yaml(path)?,
        None => YamlConfig::default(),
    };
    let max_line_len = options.max_line_len.unwrap_or(yaml_config.max_line_len) as usize;

    info!("{:?}", options.mode);

    let rule_count = match &options.mode {
        Mode::Dedup { inputs } => {
            let count = run_dedup(
                inputs,
                max_line_len,
                options.output.as_deref(),
                options.buffer_mode,
                &yaml_config.synthesized_header,
            )?;
            if options.stats {
                eprintln!("{} {} rule(s) kept", "dedup:".bold(), count.to_string().green());
            }
            count
        }
        Mode::Diff { set_a, set_b } => {
            let stats = run_diff_mode(set_a, set_b, max_line_len, options.output.as_deref())?;
            info!(
                "diff done: {} neutral, {} +a, {} b, {} -a, {} -b",
                stats.neutral, stats.winner_a, stats.winner_b, stats.loser_a, stats.loser_b
            );
            if options.stats {
                eprintln!(
                    "{} {} neutral, {} {}, {} {}, {} {}, {} {}",
                    "diff:".bold(),
                    stats.neutral.to_string().white(),
                    stats.winner_a.to_string().green(),
                    "+a".green(),
                    stats.winner_b.to_string().green(),
                    " b".green(),
                    stats.loser_a.to_string().red(),
                    "-a".red(),
                    stats.loser_b.to_string().red(),
                    "-b".red(),
                );
            }
            stats.neutral + stats.winner_a + stats.winner_b
        }
    };

    info!("wrote {} line(s) in {:?}", rule_count, now.elapsed());
    Ok(())
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(p) if p != Path::new("-") => {
            let file = File::create(p).map_err(|e| Error::io(e, p))?;
            Ok(Box::new(file))
        }
        _ => Ok(Box::new(io::stdout())),
    }
}

/// §4.5/§4.6, with `buffer_mode` choosing the final write path: `InMemory`
/// collects the consolidated set in a [`BufferSink`] first (so the whole
/// run can be inspected or retried before anything reaches disk), while
/// `TempFile` streams directly into the final [`FileSink`].
fn run_dedup(inputs: &[PathBuf], max_line_len: usize, output: Option<&Path>, buffer_mode: BufferMode, synthesized_header: &str) -> Result<usize> {
    let set = load_input_set::<HashTldIndex>(inputs, max_line_len)?;

    let path = output.filter(|p| *p != Path::new("-"));
    let mut final_sink = match path {
        Some(p) => FileSink::to_path(p).map_err(|e| Error::io(e, p))?,
        None => FileSink::to_stdout(),
    };

    match buffer_mode {
        BufferMode::TempFile => {
            apply_carry_over(&mut final_sink, &set.carry_overs, synthesized_header).map_err(|e| Error::io(e, output.unwrap_or(Path::new("-"))))?;
            let count = consolidate_to_sink(set.index, &mut final_sink).map_err(|e| Error::io(e, output.unwrap_or(Path::new("-"))))?;
            final_sink.flush().map_err(|e| Error::io(e, output.unwrap_or(Path::new("-"))))?;
            Ok(count)
        }
        BufferMode::InMemory => {
            let mut buf = BufferSink::new();
            apply_carry_over(&mut buf, &set.carry_overs, synthesized_header).expect("BufferSink writes are infallible");
            let rules = consolidate_to_sink(set.index, &mut buf).expect("BufferSink writes are infallible");

            let carry_count = buf.line_index().len() - buf.rule_count();
            for (i, entry) in buf.entries().enumerate() {
                let result = if i < carry_count { final_sink.write_carry_over(entry) } else { final_sink.write_rule(entry) };
                result.map_err(|e| Error::io(e, output.unwrap_or(Path::new("-"))))?;
            }
            final_sink.flush().map_err(|e| Error::io(e, output.unwrap_or(Path::new("-"))))?;
            Ok(rules)
        }
    }
}

/// §4.7: both sides are always consolidated into an in-memory
/// [`BufferSink`], since the two-pointer merge needs random access into
/// both already-sorted sequences; `buffer_mode` has no effect here.
fn run_diff_mode(set_a: &[PathBuf], set_b: &[PathBuf], max_line_len: usize, output: Option<&Path>) -> Result<DiffStats> {
    let a = load_input_set::<HashTldIndex>(set_a, max_line_len)?;
    let b = load_input_set::<HashTldIndex>(set_b, max_line_len)?;

    let mut buf_a = BufferSink::new();
    consolidate_to_sink(a.index, &mut buf_a).expect("BufferSink writes are infallible");
    let mut buf_b = BufferSink::new();
    consolidate_to_sink(b.index, &mut buf_b).expect("BufferSink writes are infallible");

    let mut writer = open_output(output)?;
    run_diff(&buf_a, &buf_b, &mut writer).map_err(|e| Error::io(e, output.unwrap_or(Path::new("-"))))
}
