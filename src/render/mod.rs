//! The renderer: walks the validated AST producing HTML.
//!
//! `renderer.go`'s design is a table of nineteen `renderableNode`
//! handlers, each a `Condition / New / Render` triad, tried in declared
//! order against `(invoker, node)`; the chosen handler is freshly
//! constructed per invocation because it carries the *invoker chain* as
//! mutable state. `spec.md`'s own design notes call a "tagged-variant per
//! node rule plus a table lookup" an equally valid reading of that triad
//! provided ordered precedence survives — that's what this module does:
//! [`render`] dispatches on `rule_name` (rule names are already mutually
//! exclusive across the nineteen handlers, `non-void-element` aside, which
//! a small tag table covers) and the invoker chain becomes an explicit
//! `&[NodeId]` threaded through the recursion, nearest-invoker-first,
//! rather than state living on a handler object.
//!
//! The chain only grows when rendering crosses a *call* boundary — a
//! component call's own content, or a parameter-component-call's resolved
//! target — is rendered with that call node prepended. Plain structural
//! recursion (paragraphs, headings, emphasis...) passes the same chain
//! through unchanged, which is equivalent to the Go source's "walk every
//! rendered ancestor, then filter for call-like ones": filtering away the
//! non-call frames this implementation never pushes in the first place.

mod builtins;
mod param_comp_call;
mod param_ref;

use crate::ast::{NodeId, Tree, BLOCK_ERROR, INLINE_ERROR};
use crate::escape;
use crate::validate;

/// Rule names that introduce a call-like dynamic frame: the four a
/// `param-ref` / `param-comp-call` resolution walks looking for bound
/// arguments (`spec.md` §4.4.2-3).
pub(crate) const CALL_LIKE: &[&str] = &[
    "block-comp-call",
    "inline-comp-call",
    "block-param-comp-call",
    "inline-param-comp-call",
];

/// A fresh renderer must be used per document (`spec.md` §5): it holds
/// the root node a `param-ref`'s global-component lookup needs to search
/// from, and nothing else is mutable across a render.
pub struct Renderer<'a> {
    tree: &'a Tree,
}

impl<'a> Renderer<'a> {
    pub fn new(tree: &'a Tree) -> Renderer<'a> {
        Renderer { tree }
    }

    pub fn render(&self) -> String {
        render_node(self.tree, self.tree.root(), &[])
    }
}

/// Convenience wrapper over [`Renderer`] for the common one-shot case.
pub fn render(tree: &Tree) -> String {
    Renderer::new(tree).render()
}

fn render_node(tree: &Tree, node: NodeId, calls: &[NodeId]) -> String {
    match tree.rule_name(node) {
        BLOCK_ERROR => render_error(tree, node, true),
        INLINE_ERROR => render_error(tree, node, false),
        "document" => render_root(tree, node, calls),
        "root-content" => render_children(tree, node, calls),
        "block-comp-call" | "inline-comp-call" => render_comp_call(tree, node, calls),
        "block-param-comp-call" | "inline-param-comp-call" => {
            param_comp_call::render(tree, node, calls)
        }
        "p" => wrap_non_void(tree, node, "p", "p-content", calls),
        "h1" => wrap_non_void(tree, node, "h1", "h1-content", calls),
        "h2" => wrap_non_void(tree, node, "h2", "h2-content", calls),
        "h3" => wrap_non_void(tree, node, "h3", "h3-content", calls),
        "h4" => wrap_non_void(tree, node, "h4", "h4-content", calls),
        "h5" => wrap_non_void(tree, node, "h5", "h5-content", calls),
        "h6" => wrap_non_void(tree, node, "h6", "h6-content", calls),
        "strong" => wrap_non_void(tree, node, "strong", "strong-content", calls),
        "em" => wrap_non_void(tree, node, "em", "em-content", calls),
        "param-ref" => param_ref::render(tree, node, calls),
        "plain" => escape::html(tree.raw(node)),
        "code-block" => render_code_block(tree, node),
        "code-block-content" => escape::html(tree.raw(node)),
        "inline-code" => render_inline_code(tree, node),
        "inline-code-content" => escape::html(tree.raw(node)),
        "raw" => tree.raw(node).to_string(),
        "link" => render_link(tree, node),
        "link-text" => escape::html(tree.raw_trimmed(node)),
        "link-url" => escape::href(tree.raw_trimmed(node)),
        "soft-break" => "<br>\n".to_string(),
        _ => String::new(),
    }
}

/// Render every child of `node` and concatenate, left to right
/// (`spec.md` §5: "concatenation is purely associative string building").
fn render_children(tree: &Tree, node: NodeId, calls: &[NodeId]) -> String {
    tree.children(node)
        .iter()
        .map(|&child| render_node(tree, child, calls))
        .collect()
}

/// The `root` handler renders `root-content` followed by every
/// `global-comp-def`'s own content, in document order. A global component
/// has no SCREAMING-cased call syntax that could ever address it (its head
/// name is lowercase, `spec.md` §6), so unlike a local component it is
/// never reached through a call — it is simply the next section of the
/// document (`spec.md` §8 scenario 2: a lone global header's content
/// renders with no call in sight).
fn render_root(tree: &Tree, node: NodeId, calls: &[NodeId]) -> String {
    let mut out = match tree.child_by_rule(node, "root-content") {
        Some(root_content) => render_node(tree, root_content, calls),
        None => String::new(),
    };

    if let Some(wrapper) = tree.child_by_rule(node, "global-comp-def-wrapper") {
        for &def in tree.children(wrapper) {
            if let Some(content) = validate::comp_def_content(tree, def) {
                out.push_str(&render_children(tree, content, calls));
            }
        }
    }

    out
}

/// Push `node` as the nearest invoker when descending into a call's own
/// expanded content — the one point where the dynamic chain actually
/// grows.
pub(crate) fn push_call(node: NodeId, calls: &[NodeId]) -> Vec<NodeId> {
    let mut next = Vec::with_capacity(calls.len() + 1);
    next.push(node);
    next.extend_from_slice(calls);
    next
}

const NON_VOID_TAGS: &[(&str, &str)] = &[
    ("p", "p"),
    ("h1", "h1"),
    ("h2", "h2"),
    ("h3", "h3"),
    ("h4", "h4"),
    ("h5", "h5"),
    ("h6", "h6"),
    ("strong", "strong"),
    ("em", "em"),
];

fn tag_for(rule_name: &str) -> &'static str {
    NON_VOID_TAGS
        .iter()
        .find(|&&(name, _)| name == rule_name)
        .map(|&(_, tag)| tag)
        .unwrap_or(rule_name)
}

fn wrap_non_void(tree: &Tree, node: NodeId, rule_name: &str, content_rule: &str, calls: &[NodeId]) -> String {
    let tag = tag_for(rule_name);
    let inner = match tree.child_by_rule(node, content_rule) {
        Some(content) => render_children(tree, content, calls),
        None => String::new(),
    };
    let block = matches!(rule_name, "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6");
    if block {
        format!("<{tag}>{inner}</{tag}>\n")
    } else {
        format!("<{tag}>{inner}</{tag}>")
    }
}

fn render_code_block(tree: &Tree, node: NodeId) -> String {
    let inner = match tree.child_by_rule(node, "code-block-content") {
        Some(content) => escape::html(tree.raw(content)),
        None => String::new(),
    };
    format!("<pre><code>{inner}</code></pre>\n")
}

fn render_inline_code(tree: &Tree, node: NodeId) -> String {
    let inner = match tree.child_by_rule(node, "inline-code-content") {
        Some(content) => escape::html(tree.raw(content)),
        None => String::new(),
    };
    format!("<code>{inner}</code>")
}

fn render_link(tree: &Tree, node: NodeId) -> String {
    let text = tree
        .child_by_rule(node, "link-text")
        .map(|n| escape::html(tree.raw_trimmed(n)))
        .unwrap_or_default();
    let url = tree
        .child_by_rule(node, "link-url")
        .map(|n| escape::href(tree.raw_trimmed(n)))
        .unwrap_or_default();
    format!("<a href=\"{url}\">{text}</a>")
}

/// `block-error` renders as a `<div>` widget, `inline-error` as a
/// `<span>` — the surrounding paragraph (for the block-param-comp-call
/// special case) is already supplied by `wrap_param_comp_call_error`
/// having nested it under a real `p`/`p-content`.
fn render_error(tree: &Tree, node: NodeId, block: bool) -> String {
    let title = tree
        .child_by_rule(node, "error-title")
        .map(|n| escape::html(tree.raw(n)))
        .unwrap_or_default();
    let message = tree
        .child_by_rule(node, "error-message")
        .map(|n| render_error_message(tree.raw(n)))
        .unwrap_or_default();

    let tag = if block { "div" } else { "span" };
    format!(
        "<{tag} class=\"component-error\"><strong>{title}</strong>: {message}</{tag}>"
    )
}

/// Error messages are plain text save for `**bold**` spans naming the
/// offending component/parameter (§4.3.5); the bolded text is always a
/// SCREAMING_CASE or kebab-case identifier, so it is safe to escape the
/// whole message first and then promote the surviving `**...**` markers.
fn render_error_message(message: &str) -> String {
    let escaped = escape::html(message);
    let mut out = String::with_capacity(escaped.len());
    let mut rest = escaped.as_str();
    while let Some(start) = rest.find("**") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("**") {
            Some(end) => {
                out.push_str("<strong>");
                out.push_str(&after[..end]);
                out.push_str("</strong>");
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("**");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// The `comp-call` handler (`spec.md` §4.4, §4.4.4): resolve the called
/// name through the built-in table first, then local/global component
/// defs; an inline call whose target is block-shaped has already been
/// wrapped into an `inline-error` by the validator, so by render time
/// every surviving `inline-comp-call` is safe to expand in place.
fn render_comp_call(tree: &Tree, node: NodeId, calls: &[NodeId]) -> String {
    let Some(name) = validate::comp_call_name(tree, node) else {
        return String::new();
    };

    if crate::builtin::is_builtin(&name) {
        return builtins::render(tree, &name, node, calls);
    }

    let Some(def) = validate::find_comp_def(tree, node, &name) else {
        return String::new();
    };
    let Some(content) = validate::comp_def_content(tree, def) else {
        return String::new();
    };

    let inline = tree.is_rule_name(node, "inline-comp-call");
    let next_calls = push_call(node, calls);

    if inline {
        render_inline_expansion(tree, content, &next_calls)
    } else {
        render_children(tree, content, &next_calls)
    }
}

/// Shared by `comp-call` and `param-comp-call`: an inline call's target
/// renders only its first paragraph's inline content
/// (`renderInlineParamCompCall` in `param_comp_call.go`, applied
/// uniformly to both call shapes per §4.3.4/§4.4.3's identical
/// single-paragraph requirement). A target with no children renders
/// empty, the Open Question `spec.md` §9 pins as silently valid.
pub(crate) fn render_inline_expansion(tree: &Tree, content: NodeId, calls: &[NodeId]) -> String {
    if tree.children(content).is_empty() {
        return String::new();
    }
    let Some(p) = tree.child_by_rule(content, "p") else {
        return String::new();
    };
    let Some(p_content) = tree.child_by_rule(p, "p-content") else {
        return String::new();
    };
    render_children(tree, p_content, calls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast;
    use crate::rule;
    use crate::validate as validate_mod;

    fn render_source(source: &str) -> String {
        let mut tree = ast::build(source, &rule::document());
        validate_mod::validate(&mut tree);
        render(&tree)
    }

    #[test]
    fn plain_text_escapes_and_wraps_paragraph() {
        let html = render_source("Hello **world**.");
        assert!(html.contains("<p>Hello <strong>world</strong>.</p>"), "{html}");
    }

    #[test]
    fn single_paragraph_renders_exactly() {
        let html = render_source("Hello **world**.");
        insta::assert_snapshot!(html, @"<p>Hello <strong>world</strong>.</p>\n");
    }

    #[test]
    fn unknown_component_renders_diagnostic_widget() {
        let html = render_source("{{MISSING}}");
        assert!(html.contains("Unknown component"), "{html}");
        assert!(html.contains("MISSING"), "{html}");
    }

    #[test]
    fn param_override_binds_call_argument() {
        let source = "{{ GREET name=\"Ada\" }}\n\n~ GREET name = \"World\"\n# Hello {{name}}\n";
        let html = render_source(source);
        assert!(html.contains("<h1>Hello Ada</h1>"), "{html}");
    }

    #[test]
    fn infinite_recursion_terminates_render() {
        let source = "{{A}}\n\n~ A\n{{B}}\n~ B\n{{A}}\n";
        let html = render_source(source);
        assert!(html.contains("Infinite component call"), "{html}");
    }

    #[test]
    fn identity_of_primitives_html_escapes_only() {
        let html = render_source("5 < 6 & 7 > 3");
        assert!(html.contains("5 &lt; 6 &amp; 7 &gt; 3"), "{html}");
    }
}
