//! The domain pruning engine and sorted-merge diff: the hard part of pfdd.
//!
//! Pipeline (leaves first): [`line_parser`] → [`domain_view`] →
//! [`domain_tree`] (via [`tld_index`]) → [`consolidator`] →
//! [`output_sink`]. In diff mode the pipeline runs twice into temporary
//! buffer sinks, then [`diff_engine`] consumes both.
pub mod consolidator;
pub mod diff_engine;
pub mod domain_tree;
pub mod domain_view;
pub mod line_parser;
pub mod output_sink;
pub mod tld_index;

pub use domain_tree::{DomainInfo, DomainTree, MatchStrength};
pub use domain_view::DomainView;
pub use line_parser::{LineClass, LineParser};
pub use output_sink::{BufferSink, FileSink, LineInfo, OutputSink};
