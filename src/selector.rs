//! Byte-range selectors over source text — the leaves of the grammar.
//!
//! A selector is a function from `(source, parent_range)` to zero or more
//! sub-ranges. All matching happens against `regex::bytes::Regex` so the
//! masked source view (real bytes with claimed regions overwritten by a
//! NUL sentinel, see [`crate::ast::tree`]) stays valid input regardless of
//! UTF-8 boundaries.

use regex::bytes::Regex;
use std::ops::Range;

/// How a start/end pair selector includes its boundary matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    /// Both `start` and `end` matches included (`StartEnd`).
    Both,
    /// Both excluded (`StartEndInner`).
    Inner,
    /// `start` included, `end` excluded (`StartEndLeftInner`).
    LeftInner,
}

/// A post-match filter predicate over the full (masked) source buffer.
///
/// Filters see absolute byte ranges into `source`, the same buffer the
/// selector they wrap was run against — never a parent-relative slice —
/// because several filters (heading column-0, block-call line isolation)
/// need to inspect bytes outside the matched range itself.
pub type FilterFn = fn(source: &[u8], ranges: &[Range<usize>]) -> Vec<Range<usize>>;

#[derive(Clone)]
pub enum Selector {
    /// Yields the parent range unchanged.
    All,
    /// All non-overlapping matches of a regex inside the parent range.
    Pattern(Regex),
    /// Start/end pair, tokenized left-to-right across the parent range.
    StartEnd(Regex, Regex, Bound),
    /// From the first match of `p` to the end of the parent range.
    SinceFirstMatchInner(Regex),
    /// Run `outer`, take the union span of all its matches, run `inner`
    /// restricted to that span.
    Bounds(Box<Selector>, Box<Selector>),
    /// Run `inner`, then post-filter the resulting ranges.
    Filter(Box<Selector>, FilterFn),
}

impl Selector {
    pub fn pattern(re: &str) -> Selector {
        Selector::Pattern(compile(re))
    }

    pub fn start_end(start: &str, end: &str) -> Selector {
        Selector::StartEnd(compile(start), compile(end), Bound::Both)
    }

    pub fn start_end_inner(start: &str, end: &str) -> Selector {
        Selector::StartEnd(compile(start), compile(end), Bound::Inner)
    }

    pub fn start_end_left_inner(start: &str, end: &str) -> Selector {
        Selector::StartEnd(compile(start), compile(end), Bound::LeftInner)
    }

    pub fn since_first_match_inner(p: &str) -> Selector {
        Selector::SinceFirstMatchInner(compile(p))
    }

    pub fn bounds(outer: Selector, inner: Selector) -> Selector {
        Selector::Bounds(Box::new(outer), Box::new(inner))
    }

    pub fn filter(inner: Selector, f: FilterFn) -> Selector {
        Selector::Filter(Box::new(inner), f)
    }

    /// Select sub-ranges of `parent` against `source` (the masked view).
    pub fn select(&self, source: &[u8], parent: Range<usize>) -> Vec<Range<usize>> {
        match self {
            Selector::All => {
                if parent.start < parent.end {
                    vec![parent]
                } else {
                    vec![]
                }
            }
            Selector::Pattern(re) => pattern_tokens(re, source, parent),
            Selector::StartEnd(s, e, bound) => start_end_tokens(s, e, *bound, source, parent),
            Selector::SinceFirstMatchInner(p) => since_first_match_inner(p, source, parent),
            Selector::Bounds(outer, inner) => {
                let spans = outer.select(source, parent);
                if spans.is_empty() {
                    return vec![];
                }
                let start = spans.iter().map(|r| r.start).min().unwrap();
                let end = spans.iter().map(|r| r.end).max().unwrap();
                inner.select(source, start..end)
            }
            Selector::Filter(inner, f) => {
                let ranges = inner.select(source, parent);
                f(source, &ranges)
            }
        }
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid selector regex {pattern:?}: {e}"))
}

fn pattern_tokens(re: &Regex, source: &[u8], parent: Range<usize>) -> Vec<Range<usize>> {
    if parent.start >= parent.end {
        return vec![];
    }
    let hay = &source[parent.clone()];
    re.find_iter(hay)
        .map(|m| (parent.start + m.start())..(parent.start + m.end()))
        .collect()
}

fn since_first_match_inner(p: &Regex, source: &[u8], parent: Range<usize>) -> Vec<Range<usize>> {
    if parent.start >= parent.end {
        return vec![];
    }
    let hay = &source[parent.clone()];
    match p.find(hay) {
        // The returned range begins at the match itself (trimming only the
        // untouched prefix before it), not after it — a wrapper rule's
        // single child re-tokenizes the same leading pattern, which would
        // otherwise never see the first occurrence.
        Some(m) => {
            let start = parent.start + m.start();
            if start < parent.end {
                vec![start..parent.end]
            } else {
                vec![]
            }
        }
        None => vec![],
    }
}

fn start_end_tokens(
    s: &Regex,
    e: &Regex,
    bound: Bound,
    source: &[u8],
    parent: Range<usize>,
) -> Vec<Range<usize>> {
    if parent.start >= parent.end {
        return vec![];
    }
    let hay = &source[parent.clone()];
    let mut out = Vec::new();
    let mut cursor = 0usize;
    while cursor <= hay.len() {
        let Some(sm) = s.find_at(hay, cursor) else {
            break;
        };
        let Some(em) = e.find_at(hay, sm.end()) else {
            break;
        };
        let (rel_start, rel_end) = match bound {
            Bound::Both => (sm.start(), em.end()),
            Bound::Inner => (sm.end(), em.start()),
            Bound::LeftInner => (sm.start(), em.start()),
        };
        out.push((parent.start + rel_start)..(parent.start + rel_end));
        // Resume scanning at the end of the *emitted* range, not at the end
        // of the raw `e` match: for `LeftInner`/`Inner` bounds the `e` match
        // itself is excluded from the token and commonly doubles as the
        // next token's `s` match (e.g. chained component headers, each
        // ending where the next one begins) — skipping past `em.end()`
        // would consume those bytes and silently drop the next token.
        let next = rel_end.max(sm.end() + 1);
        if next <= cursor {
            break;
        }
        cursor = next;
    }
    out
}

/// Merge a set of ranges into their single bounding span (min start, max
/// end). Used by selectors that tokenize a pattern only to locate the
/// overall extent a sibling rule should then re-scan.
pub fn bounding_box(ranges: &[Range<usize>]) -> Vec<Range<usize>> {
    if ranges.is_empty() {
        return vec![];
    }
    let start = ranges.iter().map(|r| r.start).min().unwrap();
    let end = ranges.iter().map(|r| r.end).max().unwrap();
    vec![start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_tokenizes_all_matches() {
        let sel = Selector::pattern(r"\d+");
        let src = b"a1 b22 c333";
        let ranges = sel.select(src, 0..src.len());
        assert_eq!(ranges, vec![1..2, 4..6, 9..11]);
    }

    #[test]
    fn start_end_both_includes_boundaries() {
        let sel = Selector::start_end(r"\*[^\s\*]", r"[^\s\*]\*");
        let src = b"a *bold* b";
        let ranges = sel.select(src, 0..src.len());
        assert_eq!(ranges, vec![2..8]);
        assert_eq!(&src[ranges[0].clone()], b"*bold*");
    }

    #[test]
    fn start_end_inner_excludes_boundaries() {
        let sel = Selector::start_end_inner(r"\*", r"\*");
        let src = b"*em*";
        let ranges = sel.select(src, 0..src.len());
        assert_eq!(ranges, vec![1..3]);
    }

    #[test]
    fn start_end_left_inner() {
        let sel = Selector::start_end_left_inner(r"\{\{", r"\}\}");
        let src = b"{{abc}}";
        let ranges = sel.select(src, 0..src.len());
        assert_eq!(ranges, vec![0..5]);
    }

    /// When `s` and `e` share a pattern (the common "runs until the next
    /// header or EOF" shape), the terminating `e` match must double as the
    /// next token's own `s` match — the cursor must resume at the token's
    /// emitted end, not past the raw `e` match, or every entry after the
    /// first is silently swallowed into it.
    #[test]
    fn start_end_left_inner_chains_on_a_shared_start_end_pattern() {
        let header = r"(?:\n|\A)~ [A-Z]+";
        let sel = Selector::start_end_left_inner(header, &format!("{header}|\\z"));
        let src = b"~ A\nbody-a\n~ B\nbody-b";
        let ranges = sel.select(src, 0..src.len());
        assert_eq!(ranges, vec![0..10, 10..src.len()]);
        assert_eq!(&src[ranges[0].clone()], b"~ A\nbody-a");
        assert_eq!(&src[ranges[1].clone()], b"\n~ B\nbody-b");
    }

    #[test]
    fn since_first_match_inner_starts_at_match() {
        let sel = Selector::since_first_match_inner(r"~\s+NAME");
        let src = b"prefix ~ NAME rest";
        let ranges = sel.select(src, 0..src.len());
        assert_eq!(ranges, vec![7..src.len()]);
    }

    #[test]
    fn bounds_restricts_inner_to_outer_union_span() {
        let outer = Selector::pattern(r".");
        let inner = Selector::pattern(r"[a-z]+");
        let sel = Selector::bounds(outer, inner);
        let src = b"\n  hello world  \n";
        let ranges = sel.select(src, 0..src.len());
        assert_eq!(ranges, vec![3..8, 9..14]);
    }

    #[test]
    fn filter_can_drop_and_merge() {
        let base = Selector::pattern(r"\d+");
        let sel = Selector::filter(base, |_source, ranges| bounding_box(ranges));
        let src = b"a1 b22 c333";
        let ranges = sel.select(src, 0..src.len());
        assert_eq!(ranges, vec![1..11]);
    }
}
