//! Label-reversed trie under each TLDIndex entry. Absorbs rules, enforces
//! domination, emits a sorted sequence (§4.4, §4.5).
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use log::warn;

use super::domain_view::{compare_label, DomainView};
use super::output_sink::LineInfo;

/// Ordered match strength. Only `Full` block rules are produced by the
/// Adblock-Plus [`super::line_parser::LineParser`]; `Weak` and `Regex`
/// exist so the tree can support future raw-domain inputs without a
/// redesign (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchStrength {
    NotSet,
    Bogus,
    Weak,
    Regex,
    Full,
}

/// The original byte range of the rule that produced a [`DomainInfo`], so
/// the consolidator can copy the rule bytes verbatim without reparsing.
#[derive(Debug, Clone)]
pub struct DomainInfo {
    /// The whole input file this rule was read from, shared cheaply
    /// across every rule the file produced.
    pub source: Arc<[u8]>,
    pub strength: MatchStrength,
    pub line: LineInfo,
}

impl DomainInfo {
    /// The original rule bytes (e.g. `||example.com^`), read back from
    /// `source` without reparsing.
    pub fn rule_bytes(&self) -> &[u8] {
        &self.source[self.line.offset..self.line.offset + self.line.len]
    }
}

// A child-map key: label bytes ordered by `compare_label` (lexicographic,
// shorter-before-longer on a shared prefix), matching the order the
// consolidator must emit children in (§4.5). Wrapping in a newtype lets
// the BTreeMap give us that order "for free" on lookup and iteration,
// instead of a deferred sort per node.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LabelKey(Box<[u8]>);

impl From<&[u8]> for LabelKey {
    fn from(label: &[u8]) -> Self {
        LabelKey(label.into())
    }
}

impl PartialOrd for LabelKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LabelKey {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_label(&self.0, &other.0)
    }
}

impl std::borrow::Borrow<[u8]> for LabelKey {
    fn borrow(&self) -> &[u8] {
        &self.0
    }
}

/// A node of the label-reversed trie. Owned exclusively by its parent (or
/// by the TLDIndex entry, for a TLD root); dropping a node drops its
/// entire subtree.
#[derive(Debug, Default)]
pub struct DomainTree {
    info: Option<DomainInfo>,
    children: BTreeMap<LabelKey, DomainTree>,
}

impl DomainTree {
    pub fn empty() -> Self {
        DomainTree::default()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_terminal(&self) -> bool {
        self.info.is_some()
    }

    /// Insert a rule, walking `labels` (already past the TLD, right to
    /// left) and enforcing domination at every step (§4.4).
    pub fn insert<'a>(&mut self, mut labels: impl Iterator<Item = &'a [u8]>, info: DomainInfo) {
        match labels.next() {
            None => self.replace_if_stronger(info),
            Some(label) => {
                if let Some(existing) = self.children.get(label) {
                    if existing.is_leaf() && existing.info.as_ref().is_some_and(|i| i.strength == MatchStrength::Full) {
                        // the new rule is dominated by a broader Full rule already in place
                        return;
                    }
                }
                let child = self.children.entry(LabelKey::from(label)).or_insert_with(DomainTree::empty);
                child.insert(labels, info);
            }
        }
    }

    /// §4.4 `replace_if_stronger`: a stronger (or first) rule replaces
    /// what's here; installing `Full` prunes now-dominated descendants.
    fn replace_if_stronger(&mut self, info: DomainInfo) {
        let should_replace = match &self.info {
            None => true,
            Some(existing) => info.strength > existing.strength,
        };
        if should_replace {
            let strength = info.strength;
            self.info = Some(info);
            if strength == MatchStrength::Full {
                self.children.clear();
            }
        }
    }
}

/// Insert one rule into the forest rooted at `tld_root`, having already
/// validated `view` and rejected it if its strength doesn't belong in the
/// tree (§4.4, §7).
pub fn insert_rule(tld_root: &mut DomainTree, view: &DomainView, strength: MatchStrength, line: LineInfo, source: Arc<[u8]>) -> bool {
    if matches!(strength, MatchStrength::NotSet | MatchStrength::Bogus) {
        warn!("rejecting rule with strength {strength:?} reaching insert: '{}'", String::from_utf8_lossy(view.as_bytes()));
        return false;
    }
    let tail = view.without_tld();
    let info = DomainInfo { source, strength, line };
    tld_root.insert(tail.labels_back_to_front(), info);
    true
}

/// §4.5 `transfer_info`, expressed as a recursive post-order walk that
/// consumes the tree: each child's descendants are emitted before the
/// child's own rule, and every node is freed as the recursion unwinds.
pub fn consolidate(node: DomainTree, emit: &mut impl FnMut(DomainInfo)) {
    for (_, child) in node.children {
        consolidate(child, emit);
    }
    if let Some(info) = node.info {
        emit(info);
    }
}
