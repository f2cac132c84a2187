//! End-to-end coverage of the parse -> validate -> render pipeline against
//! the concrete scenarios pinned as testable properties, plus additional
//! edge cases around ancestor-skip passthrough and block/inline isolation.

use compono::render_document;
use rstest::rstest;

#[test]
fn plain_text_escapes_and_wraps_a_paragraph() {
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
fn unknown_component_becomes_a_block_error_widget() {
    let html = render_document("{{MISSING}}\n");
    assert!(html.contains("Unknown component"), "{html}");
    assert!(html.contains("MISSING"), "{html}");
    assert!(html.contains("not defined or not registered"), "{html}");
}

#[test]
fn infinite_recursion_between_two_components_terminates() {
    let source = "{{A}}\n\n~ A\n{{B}}\n~ B\n{{A}}\n";
    let html = render_document(source);
    assert!(html.contains("Infinite component call"), "{html}");
}

/// `arg = $x` inside `OUTER`'s call to `INNER` must resolve `x` from
/// whoever called `OUTER`, never from `OUTER`'s own parameters — the
/// ancestor-skip rule pinned by `spec.md` §8 scenario 6.
#[test]
fn parameter_passthrough_skips_the_forwarding_frame() {
    let source = concat!(
        "{{ OUTER val=\"from-root\" }}\n",
        "\n",
        "~ INNER val\n",
        "# Inner says {{val}}\n",
        "~ OUTER val\n",
        "{{ INNER val=$val }}\n",
    );
    let html = render_document(source);
    assert!(html.contains("<h1>Inner says from-root</h1>"), "{html}");
}

/// Three invokers deep: the passthrough must keep walking outward past
/// more than one forwarding frame.
#[test]
fn parameter_passthrough_chains_three_deep() {
    let source = concat!(
        "{{ OUTER val=\"root-value\" }}\n",
        "\n",
        "~ LEAF val\n",
        "Leaf: {{val}}\n",
        "~ MIDDLE val\n",
        "{{ LEAF val=$val }}\n",
        "~ OUTER val\n",
        "{{ MIDDLE val=$val }}\n",
    );
    let html = render_document(source);
    assert!(html.contains("Leaf: root-value"), "{html}");
}

#[test]
fn heading_marker_not_at_column_zero_is_plain_text() {
    let html = render_document("  # Not a heading\n");
    assert!(!html.contains("<h1>"), "{html}");
}

#[test]
fn inline_call_whose_target_is_block_shaped_is_an_error() {
    let source = "See the {{ SECTION }} inline.\n\n~ SECTION\n# Block content\n";
    let html = render_document(source);
    assert!(html.contains("component-error"), "{html}");
}

#[rstest]
#[case("true")]
#[case("false")]
#[case("42")]
#[case("3.5")]
fn primitive_default_values_render_as_their_literal_text(#[case] literal: &str) {
    let source = format!("{{{{ SHOW }}}}\n\n~ SHOW n = {literal}\n# {{{{n}}}}\n");
    let html = render_document(&source);
    assert!(html.contains(&format!("<h1>{literal}</h1>")), "{html}");
}

#[test]
fn document_with_no_components_round_trips_html_escaping_only() {
    let html = render_document("5 < 6 & 7 > 3\n");
    assert!(html.contains("5 &lt; 6 &amp; 7 &gt; 3"), "{html}");
}
