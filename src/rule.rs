//! The grammar graph: every named rule the tree builder walks.
//!
//! Each rule is produced by a constructor function, mirroring the
//! `newX() Rule` / `Name()` / `Selectors()` / `Rules()` shape of the
//! grammar this crate's tree builder is grounded on. A rule's selector and
//! child-rule lists are themselves thunks (`fn() -> Vec<_>`, not stored
//! `Vec`s) so the naturally cyclic grammar — paragraph content can contain
//! a component call whose definition's content is itself paragraphs — is
//! representable without eagerly building an infinite graph. Recursion
//! terminates because it is driven by shrinking byte ranges at build time,
//! never by rule identity.

use crate::selector::{bounding_box, Selector};
use std::ops::Range;

pub struct Rule {
    name: &'static str,
    selectors: fn() -> Vec<Selector>,
    children: fn() -> Vec<Rule>,
}

impl Rule {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn selectors(&self) -> Vec<Selector> {
        (self.selectors)()
    }

    pub fn children(&self) -> Vec<Rule> {
        (self.children)()
    }
}

// Shared grammar fragments
// ------------------------

const SCREAMING: &str = r"[A-Z0-9]+(?:_[A-Z0-9]+)*";
const PARAM_NAME: &str = r"[a-z][a-z0-9-]*";
const LITERAL: &str = r#"".*?"|\d+(?:\.\d+)?|true|false"#;

fn param_pattern() -> String {
    format!(r"({PARAM_NAME})(?:[\s\n\r]*=[\s\n\r]*({LITERAL}|{SCREAMING}))?")
}

fn call_arg_pattern() -> String {
    format!(r"({PARAM_NAME})[\s\n\r]*=[\s\n\r]*({LITERAL}|\$[a-z][a-z0-9-]*|{SCREAMING})")
}

fn global_head_pattern() -> String {
    format!(r"(?:\n|\A){PARAM_NAME}[ \t\r\n]*=[ \t\r\n]*(?:{LITERAL})")
}

fn local_head_start_pattern() -> String {
    format!(r"(?:\n|\A)~\s+{SCREAMING}")
}

fn local_head_any_pattern() -> String {
    format!(r"~\s+{SCREAMING}")
}

// Document / root
// ----------------

pub fn document() -> Rule {
    Rule {
        name: "document",
        selectors: || vec![Selector::All],
        children: || vec![root_content(), global_comp_def_wrapper(), local_comp_def_wrapper()],
    }
}

/// Content before the first global component header or top-level local
/// separator, or the whole document when it declares neither. A local
/// component normally lives inside a global component's scope, but the
/// root itself is also a valid scope for one (`find_local_component_def`
/// searches "the root or a global-comp-def ancestor") — so root-content
/// must stop where a bare, global-header-less `~ NAME` begins too.
pub fn root_content() -> Rule {
    Rule {
        name: "root-content",
        selectors: || {
            vec![Selector::start_end_left_inner(
                r"\A",
                &format!("{}|{}|\\z", global_head_pattern(), local_head_start_pattern()),
            )]
        },
        children: content_rules,
    }
}

pub fn global_comp_def_wrapper() -> Rule {
    Rule {
        name: "global-comp-def-wrapper",
        selectors: || vec![Selector::since_first_match_inner(&global_head_pattern())],
        children: || vec![global_comp_def()],
    }
}

pub fn global_comp_def() -> Rule {
    Rule {
        name: "global-comp-def",
        selectors: || {
            let p = global_head_pattern();
            vec![Selector::start_end_left_inner(&p, &format!("{p}|\\z"))]
        },
        children: || {
            vec![
                global_comp_def_head(),
                global_comp_name(),
                global_comp_def_content(),
                local_comp_def_wrapper(),
            ]
        },
    }
}

pub fn global_comp_def_head() -> Rule {
    Rule {
        name: "global-comp-def-head",
        selectors: || {
            // A second-or-later global def's own range starts at its
            // header's `(?:\n|\A)` match, so its leading byte is the `\n`
            // that terminated the previous def's content; the head pattern
            // must tolerate that same optional leading newline rather than
            // anchoring the name literally to byte 0.
            vec![Selector::start_end(&global_head_pattern(), r"\n|\z")]
        },
        children: || vec![comp_params()],
    }
}

/// The defined component's own name, found by rule (not derived textually
/// from the head), the same shape `local-comp-name` takes under
/// `local-comp-def-head`.
pub fn global_comp_name() -> Rule {
    Rule {
        name: "global-comp-name",
        selectors: || vec![Selector::start_end_inner(r"^", &format!("[ \t\r\n]*=|{SCREAMING}"))],
        children: || vec![],
    }
}

pub fn global_comp_def_content() -> Rule {
    Rule {
        name: "global-comp-def-content",
        selectors: || {
            vec![Selector::start_end_left_inner(
                r"^",
                &format!("\\n{}|\\z", local_head_any_pattern()),
            )]
        },
        children: content_rules,
    }
}

// Local component definitions
// ----------------------------

pub fn local_comp_def_wrapper() -> Rule {
    Rule {
        name: "local-comp-def-wrapper",
        selectors: || vec![Selector::since_first_match_inner(&local_head_any_pattern())],
        children: || vec![local_comp_def()],
    }
}

pub fn local_comp_def() -> Rule {
    Rule {
        name: "local-comp-def",
        selectors: || {
            let s = local_head_start_pattern();
            // The terminator only needs one literal `\n` before the next
            // header (supplied here), not the header pattern's own
            // `(?:\n|\A)` prefix again — doubling it would require two
            // consecutive newlines before `~ NAME` and swallow every
            // subsequent local definition into this one's content.
            vec![Selector::start_end_left_inner(
                &s,
                &format!("\\n{}|\\z", local_head_any_pattern()),
            )]
        },
        children: || vec![local_comp_def_head(), local_comp_def_content()],
    }
}

pub fn local_comp_def_head() -> Rule {
    Rule {
        name: "local-comp-def-head",
        selectors: || vec![Selector::start_end(r"(?:\n|\A)~\s+", r"\s*\n")],
        children: || vec![local_comp_name(), comp_params()],
    }
}

pub fn local_comp_name() -> Rule {
    Rule {
        name: "local-comp-name",
        selectors: || vec![Selector::start_end_inner(r"(?:\n|\A)~\s+", r" +|\n|\z")],
        children: || vec![],
    }
}

pub fn local_comp_def_content() -> Rule {
    Rule {
        name: "local-comp-def-content",
        selectors: || {
            vec![Selector::start_end_left_inner(
                r"^",
                &format!("\\n{}|\\z", local_head_any_pattern()),
            )]
        },
        children: content_rules,
    }
}

/// The block-level content rules shared by `root-content`,
/// `global-comp-def-content` and `local-comp-def-content`.
fn content_rules() -> Vec<Rule> {
    vec![
        code_block(),
        h6(),
        h5(),
        h4(),
        h3(),
        h2(),
        h1(),
        block_comp_call(),
        block_param_comp_call(),
        p(),
    ]
}

// Component parameters
// ---------------------

pub fn comp_params() -> Rule {
    Rule {
        name: "comp-params",
        selectors: || {
            vec![Selector::bounds(
                Selector::start_end(r".", r"."),
                Selector::pattern(&param_pattern()),
            )]
        },
        children: || vec![comp_param()],
    }
}

pub fn comp_param() -> Rule {
    Rule {
        name: "comp-param",
        selectors: || vec![Selector::pattern(&param_pattern())],
        children: || vec![comp_param_name(), comp_param_type()],
    }
}

pub fn comp_param_name() -> Rule {
    Rule {
        name: "comp-param-name",
        selectors: || {
            vec![
                Selector::start_end_left_inner(&format!("({PARAM_NAME})\\s*"), r"="),
                Selector::All,
            ]
        },
        children: || vec![],
    }
}

pub fn comp_param_type() -> Rule {
    Rule {
        name: "comp-param-type",
        selectors: || vec![Selector::pattern(&format!(r"[\s\n\r]*({LITERAL}|{SCREAMING})"))],
        children: || {
            vec![
                comp_string_param(),
                comp_number_param(),
                comp_bool_param(),
                comp_comp_param(),
            ]
        },
    }
}

pub fn comp_string_param() -> Rule {
    Rule {
        name: "comp-string-param",
        selectors: || vec![Selector::start_end_inner(r#"[\s\n\r]*""#, r#""[\s\n\r]*"#)],
        children: || vec![comp_param_defa_value()],
    }
}

pub fn comp_number_param() -> Rule {
    Rule {
        name: "comp-number-param",
        selectors: || vec![Selector::pattern(r"\d+(?:\.\d+)?")],
        children: || vec![comp_param_defa_value()],
    }
}

pub fn comp_bool_param() -> Rule {
    Rule {
        name: "comp-bool-param",
        selectors: || vec![Selector::pattern(r"true|false")],
        children: || vec![comp_param_defa_value()],
    }
}

pub fn comp_comp_param() -> Rule {
    Rule {
        name: "comp-comp-param",
        selectors: || vec![Selector::pattern(SCREAMING)],
        children: || vec![comp_param_defa_value()],
    }
}

pub fn comp_param_defa_value() -> Rule {
    Rule {
        name: "comp-param-defa-value",
        selectors: || vec![Selector::All],
        children: || vec![],
    }
}

// Component calls
// ----------------

fn comp_call_open() -> String {
    format!(r"\{{\{{\s*{SCREAMING}")
}

fn strip_braces_block_filter(source: &[u8], ranges: &[Range<usize>]) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    for r in ranges {
        let start = r.start;
        let end = r.end;

        let mut left_ok = true;
        let mut i = start;
        while i > 0 {
            i -= 1;
            if source[i] == b'\n' {
                break;
            }
            if source[i] != b' ' && source[i] != b'\t' {
                left_ok = false;
                break;
            }
        }

        let mut right_ok = true;
        let mut j = end;
        while j < source.len() && source[j] != b'\n' {
            if source[j] != b' ' && source[j] != b'\t' {
                right_ok = false;
                break;
            }
            j += 1;
        }

        let inner = &source[start..end];
        let closing_braces = inner.windows(2).filter(|w| *w == b"}}").count();
        let inside_ok = closing_braces <= 1;

        if left_ok && right_ok && inside_ok {
            out.push(r.clone());
        }
    }
    out
}

pub fn block_comp_call() -> Rule {
    Rule {
        name: "block-comp-call",
        selectors: || {
            let s = comp_call_open();
            vec![Selector::filter(
                Selector::start_end(&s, r"\s*\}\}"),
                strip_braces_block_filter,
            )]
        },
        children: comp_call_children,
    }
}

pub fn inline_comp_call() -> Rule {
    Rule {
        name: "inline-comp-call",
        selectors: || {
            let s = comp_call_open();
            vec![Selector::start_end(&s, r"\s*\}\}")]
        },
        children: comp_call_children,
    }
}

fn comp_call_children() -> Vec<Rule> {
    vec![comp_call_name(), comp_call_args()]
}

fn first_match_only(_source: &[u8], ranges: &[Range<usize>]) -> Vec<Range<usize>> {
    ranges.first().cloned().into_iter().collect()
}

pub fn comp_call_name() -> Rule {
    Rule {
        name: "comp-call-name",
        selectors: || {
            vec![Selector::filter(
                Selector::pattern(&format!(r"\s*{SCREAMING}\s*")),
                first_match_only,
            )]
        },
        children: || vec![],
    }
}

pub fn comp_call_args() -> Rule {
    Rule {
        name: "comp-call-args",
        selectors: || {
            vec![Selector::filter(
                Selector::pattern(&call_arg_pattern()),
                |_source, ranges| bounding_box(ranges),
            )]
        },
        children: || vec![comp_call_arg()],
    }
}

pub fn comp_call_arg() -> Rule {
    Rule {
        name: "comp-call-arg",
        selectors: || vec![Selector::pattern(&call_arg_pattern())],
        children: || vec![comp_call_arg_name(), comp_call_arg_type()],
    }
}

pub fn comp_call_arg_name() -> Rule {
    Rule {
        name: "comp-call-arg-name",
        selectors: || vec![Selector::start_end_left_inner(&format!("({PARAM_NAME})\\s*"), r"=")],
        children: || vec![],
    }
}

pub fn comp_call_arg_type() -> Rule {
    Rule {
        name: "comp-call-arg-type",
        selectors: || {
            vec![Selector::pattern(&format!(
                r"[\s\n\r]*({LITERAL}|\$[a-z][a-z0-9-]*|{SCREAMING})"
            ))]
        },
        children: || {
            vec![
                comp_call_string_arg(),
                comp_call_number_arg(),
                comp_call_bool_arg(),
                comp_call_param_arg(),
                comp_call_comp_arg(),
            ]
        },
    }
}

pub fn comp_call_string_arg() -> Rule {
    Rule {
        name: "comp-call-string-arg",
        selectors: || vec![Selector::start_end_inner(r#"[\s\n\r]*""#, r#""[\s\n\r]*"#)],
        children: || vec![comp_call_arg_value()],
    }
}

pub fn comp_call_number_arg() -> Rule {
    Rule {
        name: "comp-call-number-arg",
        selectors: || vec![Selector::pattern(r"\d+(?:\.\d+)?")],
        children: || vec![comp_call_arg_value()],
    }
}

pub fn comp_call_bool_arg() -> Rule {
    Rule {
        name: "comp-call-bool-arg",
        selectors: || vec![Selector::pattern(r"true|false")],
        children: || vec![comp_call_arg_value()],
    }
}

pub fn comp_call_param_arg() -> Rule {
    Rule {
        name: "comp-call-param-arg",
        selectors: || vec![Selector::start_end_inner(r"[\s\n\r]*\$", r"\z")],
        children: || vec![comp_call_arg_value()],
    }
}

pub fn comp_call_comp_arg() -> Rule {
    Rule {
        name: "comp-call-comp-arg",
        selectors: || vec![Selector::pattern(SCREAMING)],
        children: || vec![comp_call_arg_value()],
    }
}

pub fn comp_call_arg_value() -> Rule {
    Rule {
        name: "comp-call-arg-value",
        selectors: || vec![Selector::All],
        children: || vec![],
    }
}

// Parameter component calls
// --------------------------

fn param_comp_call_open() -> String {
    r"\{\{\s*\$[a-z][a-z0-9-]*".to_string()
}

pub fn block_param_comp_call() -> Rule {
    Rule {
        name: "block-param-comp-call",
        selectors: || {
            let s = param_comp_call_open();
            vec![Selector::filter(
                Selector::start_end(&s, r"\s*\}\}"),
                strip_braces_block_filter,
            )]
        },
        children: param_comp_call_children,
    }
}

pub fn inline_param_comp_call() -> Rule {
    Rule {
        name: "inline-param-comp-call",
        selectors: || {
            let s = param_comp_call_open();
            vec![Selector::start_end(&s, r"\s*\}\}")]
        },
        children: param_comp_call_children,
    }
}

fn param_comp_call_children() -> Vec<Rule> {
    vec![param_comp_call_name(), comp_call_args()]
}

pub fn param_comp_call_name() -> Rule {
    Rule {
        name: "param-comp-call-name",
        selectors: || vec![Selector::start_end_inner(r"\{\{\s*\$", r"\s+|\s*\}\}")],
        children: || vec![],
    }
}

// Parameter references
// ----------------------

pub fn param_ref() -> Rule {
    Rule {
        name: "param-ref",
        selectors: || vec![Selector::start_end(&format!(r"\{{\{{\s*{PARAM_NAME}"), r"\s*\}\}")],
        children: || vec![param_ref_name()],
    }
}

pub fn param_ref_name() -> Rule {
    Rule {
        name: "param-ref-name",
        selectors: || vec![Selector::start_end_inner(r"\{\{\s*", r"\s*\}\}")],
        children: || vec![],
    }
}

// Headings
// ---------

/// Heading markers must start at column 0: the backward scan to the
/// preceding newline must cross only whitespace.
fn heading_filter(source: &[u8], ranges: &[Range<usize>]) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    'outer: for r in ranges {
        let mut i = r.start;
        while i > 0 {
            i -= 1;
            if source[i] == b'\n' {
                break;
            }
            if source[i] != b' ' && source[i] != b'\t' {
                continue 'outer;
            }
        }
        out.push(r.clone());
    }
    out
}

// Headings are spelled out individually below, in the Go source's own
// flat style, since each level's inline-child ordering differs (h1 puts
// emphasis before strong; h2-h6 do the opposite, a quirk preserved as-is).

fn h1_inline_rules() -> Vec<Rule> {
    vec![
        link(),
        em(),
        strong(),
        inline_code(),
        inline_comp_call(),
        inline_param_comp_call(),
        param_ref(),
        plain(),
    ]
}

fn hn_inline_rules() -> Vec<Rule> {
    vec![
        link(),
        strong(),
        em(),
        inline_code(),
        inline_comp_call(),
        inline_param_comp_call(),
        param_ref(),
        plain(),
    ]
}

macro_rules! heading {
    ($rule_fn:ident, $content_fn:ident, $name:literal, $content_name:literal, $marker:literal, $inline:expr) => {
        pub fn $rule_fn() -> Rule {
            Rule {
                name: $name,
                selectors: || {
                    vec![Selector::filter(
                        Selector::start_end(concat!($marker, r" (\t| )*"), r"\n|\z"),
                        heading_filter,
                    )]
                },
                children: || vec![$content_fn()],
            }
        }

        pub fn $content_fn() -> Rule {
            Rule {
                name: $content_name,
                selectors: || {
                    vec![Selector::start_end_inner(
                        concat!($marker, r"\s+"),
                        r"\n|\z",
                    )]
                },
                children: $inline,
            }
        }
    };
}

heading!(h1, h1_content, "h1", "h1-content", "#", h1_inline_rules);
heading!(h2, h2_content, "h2", "h2-content", "##", hn_inline_rules);
heading!(h3, h3_content, "h3", "h3-content", "###", hn_inline_rules);
heading!(h4, h4_content, "h4", "h4-content", "####", hn_inline_rules);
heading!(h5, h5_content, "h5", "h5-content", "#####", hn_inline_rules);
heading!(h6, h6_content, "h6", "h6-content", "######", hn_inline_rules);

// Paragraphs
// -----------

pub fn p() -> Rule {
    Rule {
        name: "p",
        selectors: || vec![Selector::filter(Selector::All, split_paragraphs)],
        children: || vec![p_content()],
    }
}

/// Split the parent range on blank lines (`\n\n`), trimming surrounding
/// newlines and dropping whitespace-only segments.
fn split_paragraphs(source: &[u8], ranges: &[Range<usize>]) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    for r in ranges {
        let content = &source[r.clone()];
        let mut current = 0usize;
        loop {
            let sep = content[current..]
                .windows(2)
                .position(|w| w == b"\n\n")
                .map(|p| current + p);

            let (seg_end_limit, advance_to) = match sep {
                Some(sep_idx) => (sep_idx, sep_idx + 2),
                None => (content.len(), content.len() + 1),
            };

            if current < seg_end_limit {
                let mut seg_start = current;
                let mut seg_end = seg_end_limit;
                while seg_start < seg_end && content[seg_start] == b'\n' {
                    seg_start += 1;
                }
                while seg_end > seg_start && content[seg_end - 1] == b'\n' {
                    seg_end -= 1;
                }
                if seg_start < seg_end && !is_blank(&content[seg_start..seg_end]) {
                    out.push((r.start + seg_start)..(r.start + seg_end));
                }
            }

            if sep.is_none() {
                break;
            }
            current = advance_to;
            if current > content.len() {
                break;
            }
        }
    }
    out
}

fn is_blank(segment: &[u8]) -> bool {
    segment
        .iter()
        .all(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
}

pub fn p_content() -> Rule {
    Rule {
        name: "p-content",
        selectors: || vec![Selector::All],
        children: || {
            vec![
                link(),
                inline_code(),
                strong(),
                em(),
                inline_comp_call(),
                inline_param_comp_call(),
                param_ref(),
                soft_break(),
                raw(),
                plain(),
            ]
        },
    }
}

// Emphasis / strong
// -------------------

pub fn em() -> Rule {
    Rule {
        name: "em",
        selectors: || vec![Selector::start_end(r"\*[^\s\*]", r"[^\s\*]\*")],
        children: || vec![em_content()],
    }
}

pub fn em_content() -> Rule {
    Rule {
        name: "em-content",
        selectors: || vec![Selector::start_end_inner(r"\*", r"\*")],
        children: inline_call_and_plain,
    }
}

pub fn strong() -> Rule {
    Rule {
        name: "strong",
        selectors: || vec![Selector::start_end(r"\*\*[^\s]", r"[^\s]\*\*")],
        children: || vec![strong_content()],
    }
}

pub fn strong_content() -> Rule {
    Rule {
        name: "strong-content",
        selectors: || vec![Selector::start_end_inner(r"\*\*", r"\*\*")],
        children: inline_call_and_plain,
    }
}

fn inline_call_and_plain() -> Vec<Rule> {
    vec![
        inline_comp_call(),
        inline_param_comp_call(),
        param_ref(),
        plain(),
    ]
}

// Code
// -----

pub fn code_block() -> Rule {
    Rule {
        name: "code-block",
        selectors: || vec![Selector::start_end(r"```[^\n]*\n", r"```")],
        children: || vec![code_block_content()],
    }
}

pub fn code_block_content() -> Rule {
    Rule {
        name: "code-block-content",
        selectors: || vec![Selector::start_end_inner(r"```[^\n]*\n", r"```")],
        children: || vec![],
    }
}

pub fn inline_code() -> Rule {
    Rule {
        name: "inline-code",
        selectors: || vec![Selector::start_end(r"`", r"`")],
        children: || vec![inline_code_content()],
    }
}

pub fn inline_code_content() -> Rule {
    Rule {
        name: "inline-code-content",
        selectors: || vec![Selector::start_end_inner(r"`", r"`")],
        children: || vec![],
    }
}

// Links / soft-break / raw / plain
// ----------------------------------

pub fn link() -> Rule {
    Rule {
        name: "link",
        selectors: || vec![Selector::start_end(r"\[", r"\]\([^\)\n]*\)")],
        children: || vec![link_text(), link_url()],
    }
}

pub fn link_text() -> Rule {
    Rule {
        name: "link-text",
        selectors: || vec![Selector::start_end_inner(r"\[", r"\]")],
        children: || vec![],
    }
}

pub fn link_url() -> Rule {
    Rule {
        name: "link-url",
        selectors: || vec![Selector::start_end_inner(r"\]\(", r"\)")],
        children: || vec![],
    }
}

pub fn soft_break() -> Rule {
    Rule {
        name: "soft-break",
        selectors: || vec![Selector::pattern(r"\n")],
        children: || vec![],
    }
}

pub fn raw() -> Rule {
    Rule {
        name: "raw",
        selectors: || vec![Selector::pattern(r"<[^>\n]+>")],
        children: || vec![],
    }
}

pub fn plain() -> Rule {
    Rule {
        name: "plain",
        selectors: || vec![Selector::pattern(r"[^\x00]+")],
        children: || vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::document;
    use crate::ast;

    /// A scope with three chained local definitions (`A`, `B`, `C`) must
    /// produce three distinct `local-comp-def` siblings, each ending where
    /// the next one's own header begins — not one definition whose content
    /// swallows the rest of the scope.
    #[test]
    fn multiple_local_defs_in_one_scope_are_distinct_siblings() {
        let tree = ast::build("{{A}}\n\n~ A\nfirst\n~ B\nsecond\n~ C\nthird\n", &document());
        let defs = tree.descendants_where(tree.root(), |t, id| t.is_rule_name(id, "local-comp-def"));
        assert_eq!(defs.len(), 3, "expected 3 local-comp-def nodes, got {defs:?}");

        let names: Vec<String> = defs
            .iter()
            .map(|&d| {
                let head = tree.child_by_rule(d, "local-comp-def-head").unwrap();
                let name = tree.child_by_rule(head, "local-comp-name").unwrap();
                tree.raw_trimmed(name).to_string()
            })
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    /// Two top-level global headers chained one after another must also
    /// split into two distinct `global-comp-def` nodes.
    #[test]
    fn multiple_global_defs_in_one_document_are_distinct_siblings() {
        let tree = ast::build(
            "title = \"Hi\"\n# Hello\n\nauthor = \"Ada\"\n# World\n",
            &document(),
        );
        let defs = tree.descendants_where(tree.root(), |t, id| t.is_rule_name(id, "global-comp-def"));
        assert_eq!(defs.len(), 2, "expected 2 global-comp-def nodes, got {defs:?}");

        let names: Vec<String> = defs
            .iter()
            .map(|&d| {
                let name = tree.child_by_rule(d, "global-comp-name").unwrap();
                tree.raw_trimmed(name).to_string()
            })
            .collect();
        assert_eq!(names, vec!["title", "author"]);
    }
}
