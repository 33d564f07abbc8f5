//! Walk the pruned tree in TLD-sorted, then subtree-sorted order; write
//! each surviving rule to an output sink (§4.5). Also drives the
//! carry-over pass that preserves header/comment placement (§4.6).
use std::io;
use std::sync::Arc;

use super::domain_tree::consolidate as consolidate_tree;
use super::output_sink::{LineInfo, OutputSink};
use super::tld_index::TldBackend;

/// Header/comment lines to pass through verbatim, recorded in the order
/// they appeared in one input file.
#[derive(Debug, Default)]
pub struct CarryOver {
    pub source: Option<Arc<[u8]>>,
    pub lines: Vec<LineInfo>,
}

impl CarryOver {
    pub fn push(&mut self, source: Arc<[u8]>, line: LineInfo) {
        if self.source.is_none() {
            self.source = Some(source);
        }
        self.lines.push(line);
    }
}

/// §4.6: if the input set has exactly one file, copy its carry-over lines
/// verbatim, in order, ahead of the consolidated rules. For multi-file
/// input sets the per-file carry-over is discarded and replaced with a
/// single synthesized header line (an implementation-defined choice,
/// recorded in DESIGN.md; not exercised by the diff engine).
pub fn apply_carry_over(sink: &mut impl OutputSink, carry_overs: &[CarryOver], synthesized_header: &str) -> io::Result<()> {
    match carry_overs {
        [only] => {
            if let Some(source) = &only.source {
                for li in &only.lines {
                    sink.write_carry_over(&source[li.offset..li.offset + li.len])?;
                }
            }
        }
        rest if rest.len() > 1 => {
            sink.write_carry_over(synthesized_header.as_bytes())?;
        }
        _ => {}
    }
    Ok(())
}

/// Consolidate every TLD subtree in `index`, in sorted order, writing
/// each surviving rule to `sink`. Returns the number of rules emitted.
pub fn consolidate_to_sink<B: TldBackend>(index: B, sink: &mut impl OutputSink) -> io::Result<usize> {
    let mut count = 0usize;
    let mut io_err: Option<io::Error> = None;

    for (_, root) in index.into_sorted() {
        consolidate_tree(root, &mut |info| {
            if io_err.is_some() {
                return;
            }
            match sink.write_rule(info.rule_bytes()) {
                Ok(()) => count += 1,
                Err(e) => io_err = Some(e),
            }
        });
    }

    match io_err {
        Some(e) => Err(e),
        None => Ok(count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::output_sink::BufferSink;

    #[test]
    fn single_file_carry_over_is_copied_verbatim() {
        let source: Arc<[u8]> = Arc::from(&b"[Adblock Plus]\n! title\n"[..]);
        let mut co = CarryOver::default();
        co.push(source.clone(), LineInfo { offset: 0, len: 14 });
        co.push(source, LineInfo { offset: 15, len: 7 });

        let mut sink = BufferSink::new();
        apply_carry_over(&mut sink, &[co], "[Adblock Plus]").unwrap();

        let entries: Vec<&[u8]> = sink.entries().collect();
        assert_eq!(entries, vec![b"[Adblock Plus]".as_slice(), b"! title"]);
        assert_eq!(sink.rule_count(), 0);
    }

    #[test]
    fn multi_file_carry_over_is_synthesized() {
        let mut sink = BufferSink::new();
        let co_a = CarryOver::default();
        let co_b = CarryOver::default();
        apply_carry_over(&mut sink, &[co_a, co_b], "[Adblock Plus]").unwrap();

        let entries: Vec<&[u8]> = sink.entries().collect();
        assert_eq!(entries, vec![b"[Adblock Plus]".as_slice()]);
    }

    #[test]
    fn empty_carry_over_set_writes_nothing() {
        let mut sink = BufferSink::new();
        apply_carry_over(&mut sink, &[], "[Adblock Plus]").unwrap();
        assert_eq!(sink.line_index().len(), 0);
    }
}
