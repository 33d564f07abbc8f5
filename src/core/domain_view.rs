//! Split a domain into labels; iterate labels from the public suffix inward.
//!
//! Labels are indexed left-to-right as they appear in the source bytes
//! (`www.example.com` → `[www, example, com]`), but the canonical
//! iteration order used everywhere else in the core is right-to-left
//! (TLD first).
use std::cmp::Ordering;

const MAX_LABEL_LEN: usize = 63;
const MAX_DOMAIN_LEN: usize = 253;

/// A borrowed view over a domain byte slice, pre-split into labels.
///
/// Invariants (enforced by [`DomainView::parse`]): at least two labels,
/// each label length in `[1, 63]`, total length (bytes plus the `.`
/// separators) at most 253.
#[derive(Debug, Clone, Copy)]
pub struct DomainView<'a> {
    domain: &'a [u8],
    // (offset, length) pairs, left-to-right
    labels: &'a [(usize, usize)],
}

/// Owned label offsets for a [`DomainView`], since the view itself only
/// borrows a pre-computed slice. Build one with [`split_labels`] and hand
/// both the domain bytes and the offsets to [`DomainView::from_parts`].
pub fn split_labels(domain: &[u8]) -> Vec<(usize, usize)> {
    let mut labels = Vec::new();
    let mut start = 0;
    for (i, &b) in domain.iter().enumerate() {
        if b == b'.' {
            labels.push((start, i - start));
            start = i + 1;
        }
    }
    labels.push((start, domain.len() - start));
    labels
}

impl<'a> DomainView<'a> {
    /// Validate `domain` against the DomainView invariants and construct a
    /// view over it, or return `None` if the domain has fewer than two
    /// labels or violates a length invariant.
    pub fn parse(domain: &'a [u8], labels_scratch: &'a [(usize, usize)]) -> Option<Self> {
        if labels_scratch.len() < 2 {
            return None;
        }
        if domain.len() > MAX_DOMAIN_LEN {
            return None;
        }
        if labels_scratch
            .iter()
            .any(|&(_, len)| len == 0 || len > MAX_LABEL_LEN)
        {
            return None;
        }
        Some(DomainView {
            domain,
            labels: labels_scratch,
        })
    }

    fn label_at(&self, (offset, len): (usize, usize)) -> &'a [u8] {
        &self.domain[offset..offset + len]
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    /// Labels as written, left to right: `www.example.com` → `www,
    /// example, com`.
    pub fn labels_front_to_back(&self) -> impl DoubleEndedIterator<Item = &'a [u8]> + '_ {
        self.labels.iter().map(move |&pair| self.label_at(pair))
    }

    /// Labels in the canonical right-to-left (TLD-first) order used by
    /// insertion, consolidation, and the diff comparator.
    pub fn labels_back_to_front(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        self.labels.iter().rev().map(move |&pair| self.label_at(pair))
    }

    /// The top label (TLD), already validated to exist by `parse`.
    pub fn tld(&self) -> &'a [u8] {
        let &(offset, len) = self.labels.last().expect("DomainView always has >= 2 labels");
        &self.domain[offset..offset + len]
    }

    /// A view over the same domain with the TLD label dropped, for
    /// insertion past the TLDIndex's own lookup (§4.4 step 1).
    pub fn without_tld(&self) -> DomainViewTail<'a> {
        DomainViewTail {
            domain: self.domain,
            labels: &self.labels[..self.labels.len() - 1],
        }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.domain
    }
}

/// The labels of a [`DomainView`] with the TLD already consumed, iterated
/// right to left (i.e. from the label just below the TLD, inward).
pub struct DomainViewTail<'a> {
    domain: &'a [u8],
    labels: &'a [(usize, usize)],
}

impl<'a> DomainViewTail<'a> {
    pub fn labels_back_to_front(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        self.labels
            .iter()
            .rev()
            .map(move |&(offset, len)| &self.domain[offset..offset + len])
    }
}

/// Compare two label byte strings: `memcmp` over the shorter length; on
/// equality, the shorter label sorts before the longer one (§4.7 step 2).
pub fn compare_label(a: &[u8], b: &[u8]) -> Ordering {
    let n = a.len().min(b.len());
    match a[..n].cmp(&b[..n]) {
        Ordering::Equal => a.len().cmp(&b.len()),
        other => other,
    }
}

/// The outcome of comparing two domains in label-reversed order (§4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelOrder {
    /// Same domain.
    Equal,
    /// `a` sorts strictly before `b`, neither is a suffix of the other.
    Less,
    /// `a` sorts strictly after `b`, neither is a suffix of the other.
    Greater,
    /// `a` is a proper suffix of `b` at a label boundary.
    ASuffixOfB,
    /// `b` is a proper suffix of `a` at a label boundary.
    BSuffixOfA,
}

/// Compare two domains label-by-label from the TLD inward (§4.7).
pub fn compare_domains(a: &DomainView, b: &DomainView) -> LabelOrder {
    let mut ia = a.labels_back_to_front();
    let mut ib = b.labels_back_to_front();
    loop {
        match (ia.next(), ib.next()) {
            (Some(la), Some(lb)) => match compare_label(la, lb) {
                Ordering::Equal => continue,
                Ordering::Less => return LabelOrder::Less,
                Ordering::Greater => return LabelOrder::Greater,
            },
            (None, None) => return LabelOrder::Equal,
            (None, Some(_)) => return LabelOrder::ASuffixOfB,
            (Some(_), None) => return LabelOrder::BSuffixOfA,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view<'a>(domain: &'a [u8], labels: &'a Vec<(usize, usize)>) -> DomainView<'a> {
        DomainView::parse(domain, labels).unwrap()
    }

    #[test]
    fn splits_labels_left_to_right() {
        let labels = split_labels(b"www.example.com");
        assert_eq!(labels, vec![(0, 3), (4, 7), (12, 3)]);
    }

    #[test]
    fn rejects_single_label() {
        let labels = split_labels(b"com");
        assert!(DomainView::parse(b"com", &labels).is_none());
    }

    #[test]
    fn rejects_empty_label() {
        let labels = split_labels(b"www..com");
        assert!(DomainView::parse(b"www..com", &labels).is_none());
    }

    #[test]
    fn rejects_overlong_label() {
        let long = "a".repeat(64);
        let domain = format!("{long}.com");
        let labels = split_labels(domain.as_bytes());
        assert!(DomainView::parse(domain.as_bytes(), &labels).is_none());
    }

    #[test]
    fn back_to_front_is_tld_first() {
        let domain = b"www.example.com";
        let labels = split_labels(domain);
        let v = view(domain, &labels);
        let rev: Vec<&[u8]> = v.labels_back_to_front().collect();
        assert_eq!(rev, vec![b"com".as_slice(), b"example", b"www"]);
        assert_eq!(v.tld(), b"com");
    }

    #[test]
    fn compare_equal() {
        let d1 = split_labels(b"example.com");
        let d2 = split_labels(b"example.com");
        let a = view(b"example.com", &d1);
        let b = view(b"example.com", &d2);
        assert_eq!(compare_domains(&a, &b), LabelOrder::Equal);
    }

    #[test]
    fn compare_suffix_relation() {
        let d1 = split_labels(b"ads.example.com");
        let d2 = split_labels(b"example.com");
        let a = view(b"ads.example.com", &d1);
        let b = view(b"example.com", &d2);
        // b is a proper suffix of a
        assert_eq!(compare_domains(&a, &b), LabelOrder::BSuffixOfA);
        assert_eq!(compare_domains(&b, &a), LabelOrder::ASuffixOfB);
    }

    #[test]
    fn compare_lexicographic() {
        let d1 = split_labels(b"z.com");
        let d2 = split_labels(b"a.net");
        let a = view(b"z.com", &d1);
        let b = view(b"a.net", &d2);
        // "com" < "net" at the TLD label
        assert_eq!(compare_domains(&a, &b), LabelOrder::Less);
    }

    #[test]
    fn shorter_label_sorts_before_longer_on_common_prefix() {
        assert_eq!(compare_label(b"a", b"ab"), Ordering::Less);
        assert_eq!(compare_label(b"ab", b"a"), Ordering::Greater);
        assert_eq!(compare_label(b"com", b"com"), Ordering::Equal);
    }
}
