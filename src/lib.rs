//! Parser-and-renderer pipeline for a Markdown-like document language
//! extended with user-defined, parameterized components.
//!
//! The pipeline is three sequential phases over one document: [`ast::build`]
//! turns source bytes into a named tree under the [`rule`] grammar;
//! [`validate::validate`] mutates offending subtrees into diagnostic nodes
//! in place; [`render::render`] walks the annotated, now-read-only tree
//! into an HTML string.

pub mod ast;
pub mod builtin;
pub mod render;
pub mod rule;
pub mod selector;
pub mod validate;

mod escape;

use ast::Tree;

/// Parse, validate and render `source` in one call — the whole pipeline
/// for a single document.
pub fn render_document(source: &str) -> String {
    let mut tree = ast::build(source, &rule::document());
    validate::validate(&mut tree);
    render::render(&tree)
}

/// Parse and validate `source`, returning the annotated tree without
/// rendering it — used by the `ast` CLI subcommand to dump the grammar.
pub fn parse_document(source: &str) -> Tree {
    let mut tree = ast::build(source, &rule::document());
    validate::validate(&mut tree);
    tree
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_renders_a_paragraph() {
        let html = render_document("Hello **world**.");
        assert!(html.contains("<p>Hello <strong>world</strong>.</p>"), "{html}");
    }

    #[test]
    fn global_param_reference_falls_back_to_its_declared_default() {
        let source = "title = \"Hi\", name = \"World\"\n# {{name}}\n";
        let html = render_document(source);
        assert!(html.contains("<h1>World</h1>"), "{html}");
    }

    #[test]
    fn local_param_call_overrides_the_default() {
        let source = "{{ GREET name=\"Ada\" }}\n\n~ GREET name = \"World\"\n# Hello {{name}}\n";
        let html = render_document(source);
        assert!(html.contains("<h1>Hello Ada</h1>"), "{html}");
    }

    #[test]
    fn unknown_component_becomes_a_diagnostic_widget() {
        let html = render_document("{{MISSING}}\n");
        assert!(html.contains("Unknown component"), "{html}");
    }
}
