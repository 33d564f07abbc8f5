//! Abstract write target: file handle or in-memory buffer with an
//! attached line index (§4.5, §9).
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Locates one emitted line's bytes in an [`OutputSink`]'s backing store.
#[derive(Debug, Clone, Copy)]
pub struct LineInfo {
    pub offset: usize,
    pub len: usize,
}

/// The two sinks share a `write` contract and a `line_index` side-table;
/// a rule write is terminated differently per variant (`\n` for a file,
/// `\0` for a buffer) so a `BufferSink` can be reparsed in place later.
pub trait OutputSink {
    fn write_rule(&mut self, rule: &[u8]) -> io::Result<()>;
    fn write_carry_over(&mut self, line: &[u8]) -> io::Result<()>;
    /// Rules written, excluding carry-over header/comment lines.
    fn rule_count(&self) -> usize;
}

/// Writes to a file handle (or stdout), `\n`-terminated.
pub struct FileSink {
    writer: BufWriter<Box<dyn Write>>,
    line_index: Vec<LineInfo>,
    offset: usize,
    rule_count: usize,
}

impl FileSink {
    pub fn to_path(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(Box::new(file)))
    }

    pub fn to_stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    fn new(writer: Box<dyn Write>) -> Self {
        FileSink {
            writer: BufWriter::new(writer),
            line_index: Vec::new(),
            offset: 0,
            rule_count: 0,
        }
    }

    fn write_line(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.writer.write_all(bytes)?;
        self.writer.write_all(b"\n")?;
        self.line_index.push(LineInfo { offset: self.offset, len: bytes.len() });
        self.offset += bytes.len() + 1;
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl OutputSink for FileSink {
    fn write_rule(&mut self, rule: &[u8]) -> io::Result<()> {
        self.write_line(rule)?;
        self.rule_count += 1;
        Ok(())
    }

    fn write_carry_over(&mut self, line: &[u8]) -> io::Result<()> {
        self.write_line(line)
    }

    fn rule_count(&self) -> usize {
        self.rule_count
    }
}

/// An in-memory sink whose payloads are `\0`-separated so a downstream
/// consumer (the diff engine) can treat each `(offset, len)` pair as a
/// slice to reparse in place, without copying.
///
/// Grows its byte store by a 1.5x factor and its line index by
/// `10 + 0.5 * current` entries when either runs out of room (§5).
pub struct BufferSink {
    bytes: Vec<u8>,
    line_index: Vec<LineInfo>,
    rule_count: usize,
}

impl Default for BufferSink {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferSink {
    pub fn new() -> Self {
        BufferSink {
            bytes: Vec::new(),
            line_index: Vec::new(),
            rule_count: 0,
        }
    }

    fn reserve_bytes(&mut self, additional: usize) {
        if self.bytes.len() + additional > self.bytes.capacity() {
            let grown = (self.bytes.capacity() as f64 * 1.5) as usize;
            let needed = self.bytes.len() + additional;
            self.bytes.reserve(grown.max(needed) - self.bytes.len());
        }
    }

    fn reserve_line_index(&mut self) {
        if self.line_index.len() == self.line_index.capacity() {
            let additional = 10 + self.line_index.len() / 2;
            self.line_index.reserve(additional);
        }
    }

    fn write_line(&mut self, bytes: &[u8]) {
        self.reserve_bytes(bytes.len() + 1);
        self.reserve_line_index();
        let offset = self.bytes.len();
        self.bytes.extend_from_slice(bytes);
        self.bytes.push(0);
        self.line_index.push(LineInfo { offset, len: bytes.len() });
    }

    /// Rule bytes in emission order, each a slice into the backing store
    /// (no `\0` terminator included).
    pub fn entries(&self) -> impl Iterator<Item = &[u8]> {
        self.line_index.iter().map(move |li| &self.bytes[li.offset..li.offset + li.len])
    }

    pub fn line_index(&self) -> &[LineInfo] {
        &self.line_index
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl OutputSink for BufferSink {
    fn write_rule(&mut self, rule: &[u8]) -> io::Result<()> {
        self.write_line(rule);
        self.rule_count += 1;
        Ok(())
    }

    fn write_carry_over(&mut self, line: &[u8]) -> io::Result<()> {
        self.write_line(line);
        Ok(())
    }

    fn rule_count(&self) -> usize {
        self.rule_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_sink_entries_round_trip() {
        let mut sink = BufferSink::new();
        sink.write_rule(b"||example.com^").unwrap();
        sink.write_rule(b"||other.com^").unwrap();

        let entries: Vec<&[u8]> = sink.entries().collect();
        assert_eq!(entries, vec![b"||example.com^".as_slice(), b"||other.com^"]);
        assert_eq!(sink.rule_count(), 2);
    }

    #[test]
    fn buffer_sink_carry_over_not_counted_as_rule() {
        let mut sink = BufferSink::new();
        sink.write_carry_over(b"[Adblock Plus]").unwrap();
        sink.write_rule(b"||example.com^").unwrap();
        assert_eq!(sink.rule_count(), 1);
        assert_eq!(sink.line_index().len(), 2);
    }
}
