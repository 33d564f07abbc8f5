//! Two-pointer merge over two consolidated sequences, emitting per-line
//! classification markers (§4.7).
//!
//! The engine assumes both inputs are already pruned and sorted; a rule
//! that fails to reparse as a valid domain is a programming error, not a
//! runtime condition to recover from (§4.7 "Failure semantics").
use std::io::{self, Write};

use super::domain_view::{compare_domains, split_labels, DomainView, LabelOrder};
use super::line_parser::{LineClass, LineParser};
use super::output_sink::BufferSink;

const NEUTRAL: &[u8; 2] = b"  ";
const WINNER_A: &[u8; 2] = b"+a";
// B-side winners use a single space then 'b', not '+b' — an asymmetry in
// the upstream tool's fixtures that this format preserves for
// compatibility (see the Open Questions in the governing spec).
const WINNER_B: &[u8; 2] = b" b";
const LOSER_A: &[u8; 2] = b"-a";
const LOSER_B: &[u8; 2] = b"-b";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiffStats {
    pub neutral: usize,
    pub winner_a: usize,
    pub winner_b: usize,
    pub loser_a: usize,
    pub loser_b: usize,
}

struct ParsedRule<'a> {
    domain: &'a [u8],
    labels: Vec<(usize, usize)>,
}

impl<'a> ParsedRule<'a> {
    fn new(rule: &'a [u8]) -> Self {
        let domain = match LineParser::classify(rule) {
            LineClass::Block { domain, .. } => &rule[domain],
            other => panic!("consolidated rule failed to reparse as a block rule: {other:?}"),
        };
        let labels = split_labels(domain);
        ParsedRule { domain, labels }
    }

    fn view(&self) -> DomainView<'_> {
        DomainView::parse(self.domain, &self.labels).expect("pruned rule must be a valid domain")
    }
}

fn write_marker(out: &mut impl Write, marker: &[u8; 2], rule: &[u8]) -> io::Result<()> {
    out.write_all(marker)?;
    out.write_all(rule)?;
    out.write_all(b"\n")
}

/// Merge `a` and `b` (each a consolidated [`BufferSink`], in emission
/// order) and write the annotated diff to `out`.
pub fn run_diff(a: &BufferSink, b: &BufferSink, out: &mut impl Write) -> io::Result<DiffStats> {
    let entries_a: Vec<&[u8]> = a.entries().collect();
    let entries_b: Vec<&[u8]> = b.entries().collect();

    let mut stats = DiffStats::default();
    let mut ia = 0usize;
    let mut ib = 0usize;
    // suppress repeat WINNER writes for the side that stays fixed across
    // several "blk" steps against the other, advancing side (§4.7)
    let mut written_a = false;
    let mut written_b = false;

    while ia < entries_a.len() && ib < entries_b.len() {
        let ra = ParsedRule::new(entries_a[ia]);
        let rb = ParsedRule::new(entries_b[ib]);

        match compare_domains(&ra.view(), &rb.view()) {
            LabelOrder::Equal => {
                write_marker(out, NEUTRAL, entries_a[ia])?;
                stats.neutral += 1;
                ia += 1;
                ib += 1;
                written_a = false;
                written_b = false;
            }
            LabelOrder::Less => {
                // the A entry may already have been written as the fixed
                // winner of a preceding "blk" run against the B side
                if !written_a {
                    write_marker(out, WINNER_A, entries_a[ia])?;
                    stats.winner_a += 1;
                }
                ia += 1;
                written_a = false;
            }
            LabelOrder::Greater => {
                if !written_b {
                    write_marker(out, WINNER_B, entries_b[ib])?;
                    stats.winner_b += 1;
                }
                ib += 1;
                written_b = false;
            }
            LabelOrder::ASuffixOfB => {
                // a is shorter and may dominate several B entries in a row
                if !written_a {
                    write_marker(out, WINNER_A, entries_a[ia])?;
                    stats.winner_a += 1;
                    written_a = true;
                }
                write_marker(out, LOSER_B, entries_b[ib])?;
                stats.loser_b += 1;
                ib += 1;
                written_b = false;
            }
            LabelOrder::BSuffixOfA => {
                if !written_b {
                    write_marker(out, WINNER_B, entries_b[ib])?;
                    stats.winner_b += 1;
                    written_b = true;
                }
                write_marker(out, LOSER_A, entries_a[ia])?;
                stats.loser_a += 1;
                ia += 1;
                written_a = false;
            }
        }
    }

    // one side may still be sitting on an entry already emitted as the
    // fixed winner of a "blk" run; skip re-emitting it before draining
    if ia < entries_a.len() && written_a {
        ia += 1;
    }
    if ib < entries_b.len() && written_b {
        ib += 1;
    }

    while ia < entries_a.len() {
        write_marker(out, WINNER_A, entries_a[ia])?;
        stats.winner_a += 1;
        ia += 1;
    }
    while ib < entries_b.len() {
        write_marker(out, WINNER_B, entries_b[ib])?;
        stats.winner_b += 1;
        ib += 1;
    }

    Ok(stats)
}
