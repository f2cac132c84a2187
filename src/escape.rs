//! HTML-escaping primitives for the renderer.
//!
//! Every byte of raw user text that reaches the output passes through one
//! of these two functions (`spec.md` §6/§8's "all user text is
//! HTML-escaped" invariant). Delegates to `pulldown-cmark-escape`, the same
//! crate the teacher's own HTML writer uses for this.

use pulldown_cmark_escape::{FmtWriter, escape_href, escape_html};

/// Escape `&`, `<`, `>`, `"`, `'` for safe inclusion in HTML text content.
///
/// `pulldown_cmark_escape::escape_html` covers the first four but leaves
/// `'` untouched; `spec.md` §6 names all five, matching
/// `html.EscapeString`'s set in the original source, so the apostrophe is
/// promoted to `&#39;` in a second pass. That pass is safe to run after
/// escaping rather than folding it into one regex/replace: none of
/// `escape_html`'s own output (`&amp;`, `&lt;`, `&gt;`, `&quot;`) contains a
/// literal `'`, so it can never be mistaken for user text.
pub fn html(text: &str) -> String {
    let mut out = String::new();
    escape_html(FmtWriter(&mut out), text).expect("writing to a String cannot fail");
    out.replace('\'', "&#39;")
}

/// Escape a URL for safe inclusion in an `href`/`src` attribute.
pub fn href(text: &str) -> String {
    let mut out = String::new();
    escape_href(FmtWriter(&mut out), text).expect("writing to a String cannot fail");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_html_special_characters() {
        assert_eq!(html(r#"<a> & "b" 'c'"#), "&lt;a&gt; &amp; &quot;b&quot; &#39;c&#39;");
    }

    #[test]
    fn href_escapes_spaces_but_keeps_structure() {
        assert_eq!(href("/a b"), "/a%20b");
    }
}
