//! I/O plumbing kept outside the core: CLI path expansion (files or
//! non-recursive directories), buffered reading, and
//! driving each line through [`LineParser`]/[`DomainView`] into a
//! [`DomainTree`] via its [`TldBackend`].
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::warn;

use crate::core::domain_tree::insert_rule;
use crate::core::domain_view::split_labels;
use crate::core::output_sink::LineInfo;
use crate::core::tld_index::{HashTldIndex, TldBackend};
use crate::core::{consolidator::CarryOver, DomainView, LineClass, LineParser};
use crate::error::{Error, Result};

/// One side's worth of input: the absorbed tree, and one [`CarryOver`]
/// list per source file, in the order the files were given.
pub struct InputSet<B: TldBackend = HashTldIndex> {
    pub index: B,
    pub carry_overs: Vec<CarryOver>,
}

/// Expand CLI-provided paths into a flat list of regular files. A
/// directory is listed non-recursively (§6).
pub fn expand_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        let meta = fs::metadata(path).map_err(|e| Error::io(e, path))?;
        if meta.is_dir() {
            for entry in fs::read_dir(path).map_err(|e| Error::io(e, path))? {
                let entry = entry.map_err(|e| Error::io(e, path))?;
                let file_type = entry.file_type().map_err(|e| Error::io(e, path))?;
                if file_type.is_file() {
                    files.push(entry.path());
                }
            }
        } else if meta.is_file() {
            files.push(path.clone());
        } else {
            return Err(Error::NotAFileOrDirectory(path.clone()));
        }
    }
    Ok(files)
}

/// Iterate `(offset, len)` line spans within `source`, stripping a
/// trailing `\r\n` or `\n`, accepting a final line with no terminator,
/// and dropping (with a warning) any line over `max_line_len` bytes (§7).
fn iter_lines(source: &[u8], max_line_len: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
    let mut offset = 0usize;
    std::iter::from_fn(move || loop {
        if offset >= source.len() {
            return None;
        }
        let rest = &source[offset..];
        let (line_len, consumed) = match rest.iter().position(|&b| b == b'\n') {
            Some(nl) => {
                let mut len = nl;
                if len > 0 && rest[len - 1] == b'\r' {
                    len -= 1;
                }
                (len, nl + 1)
            }
            None => (rest.len(), rest.len()),
        };
        let start = offset;
        offset += consumed;

        if line_len > max_line_len {
            warn!("dropping line of {line_len} bytes (max {max_line_len}) at offset {start}");
            continue;
        }
        return Some((start, line_len));
    })
}

/// Read one file, classify every line, and absorb block rules into
/// `index` while recording header/comment lines into `carry_over`.
fn process_file(path: &Path, index: &mut impl TldBackend, carry_over: &mut CarryOver, max_line_len: usize) -> Result<()> {
    let bytes = fs::read(path).map_err(|e| Error::io(e, path))?;
    let source: Arc<[u8]> = Arc::from(bytes);

    for (offset, len) in iter_lines(&source, max_line_len) {
        let line = &source[offset..offset + len];
        match LineParser::classify(line) {
            LineClass::Header | LineClass::Comment => {
                carry_over.push(source.clone(), LineInfo { offset, len });
            }
            LineClass::Block { domain, strength } => {
                let domain_bytes = &line[domain];
                let labels = split_labels(domain_bytes);
                match DomainView::parse(domain_bytes, &labels) {
                    Some(view) => {
                        let root = index.insert_or_get(view.tld());
                        insert_rule(root, &view, strength, LineInfo { offset, len }, source.clone());
                    }
                    None => warn!(
                        "rejecting domain with too few labels or an invalid label length in '{}' ({}:{})",
                        path.display(),
                        offset,
                        len
                    ),
                }
            }
            LineClass::Bogus => {
                if !line.is_empty() {
                    warn!("skipping malformed line in '{}' ({}:{})", path.display(), offset, len);
                }
            }
        }
    }

    Ok(())
}

/// Load one input set (all files for the dedup set, or one side of a
/// diff) and absorb every block rule into a fresh tree.
pub fn load_input_set<B: TldBackend>(paths: &[PathBuf], max_line_len: usize) -> Result<InputSet<B>> {
    if paths.is_empty() {
        return Err(Error::NoInputPaths);
    }

    let files = expand_paths(paths)?;
    let mut index = B::default();
    let mut carry_overs = Vec::with_capacity(files.len());

    for path in &files {
        let mut carry_over = CarryOver::default();
        process_file(path, &mut index, &mut carry_over, max_line_len)?;
        carry_overs.push(carry_over);
    }

    Ok(InputSet { index, carry_overs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_fixture(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn loads_block_rules_and_carry_over() {
        let f = write_fixture("[Adblock Plus]\n! title\n||b.com^\n||a.com^\n");
        let set: InputSet<HashTldIndex> = load_input_set(&[f.path().to_path_buf()], 2048).unwrap();
        assert_eq!(set.index.len(), 1); // one TLD: com
        assert_eq!(set.carry_overs.len(), 1);
        assert_eq!(set.carry_overs[0].lines.len(), 2);
    }

    #[test]
    fn empty_path_list_is_an_error() {
        let result: Result<InputSet<HashTldIndex>> = load_input_set(&[], 2048);
        assert!(matches!(result, Err(Error::NoInputPaths)));
    }

    #[test]
    fn empty_file_yields_empty_set() {
        let f = write_fixture("");
        let set: InputSet<HashTldIndex> = load_input_set(&[f.path().to_path_buf()], 2048).unwrap();
        assert_eq!(set.index.len(), 0);
    }

    #[test]
    fn overlong_lines_are_dropped() {
        let long_domain = "a".repeat(2100);
        let contents = format!("||{long_domain}.com^\n||ok.com^\n");
        let f = write_fixture(&contents);
        let set: InputSet<HashTldIndex> = load_input_set(&[f.path().to_path_buf()], 2048).unwrap();
        assert_eq!(set.index.len(), 1);
    }

    #[test]
    fn directory_is_listed_non_recursively() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("one.txt"), "||a.com^\n").unwrap();
        std::fs::write(dir.path().join("two.txt"), "||b.com^\n").unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("nested.txt"), "||c.com^\n").unwrap();

        let set: InputSet<HashTldIndex> = load_input_set(&[dir.path().to_path_buf()], 2048).unwrap();
        assert_eq!(set.carry_overs.len(), 2); // only the two top-level files
    }
}
