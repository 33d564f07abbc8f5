//! Classify one text line as HEADER, COMMENT, BLOCK-RULE, or BOGUS;
//! extract the fully-qualified domain on BLOCK-RULE (§4.1).
use super::domain_tree::MatchStrength;

/// The classification of a single input line. `domain` is a byte range
/// into the line buffer passed to [`LineParser::classify`], so callers
/// can slice without copying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    Header,
    Comment,
    Block {
        domain: std::ops::Range<usize>,
        strength: MatchStrength,
    },
    Bogus,
}

pub struct LineParser;

impl LineParser {
    /// Classify one line. `line` must already have any trailing `\n` /
    /// `\r\n` stripped.
    pub fn classify(line: &[u8]) -> LineClass {
        match line.first() {
            None => LineClass::Bogus,
            Some(b'!') => LineClass::Comment,
            Some(b'[') => LineClass::Header,
            Some(b'|') => Self::classify_block_candidate(line),
            Some(_) => LineClass::Bogus,
        }
    }

    fn classify_block_candidate(line: &[u8]) -> LineClass {
        if line.len() < 2 || line[1] != b'|' {
            return LineClass::Bogus;
        }
        // need at least one domain byte plus the trailing '^'
        if line.len() < 4 {
            return LineClass::Bogus;
        }
        if line[line.len() - 1] != b'^' {
            return LineClass::Bogus;
        }

        let domain = 2..line.len() - 1;
        if domain.is_empty() {
            return LineClass::Bogus;
        }

        LineClass::Block {
            domain,
            strength: MatchStrength::Full,
        }
    }
}
