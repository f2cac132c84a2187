//! Built-in component rendering (`spec.md` §4.4.4). Currently just `LINK`,
//! with parameters `text`, `url` — resolved from the call's own explicit
//! arguments (including `$x` passthrough, since a built-in call's
//! arguments are ordinary `comp-call-arg`s like any user component's).

use crate::ast::{NodeId, Tree};
use crate::escape;

pub(crate) fn render(tree: &Tree, name: &str, node: NodeId, calls: &[NodeId]) -> String {
    match name {
        "LINK" => render_link(tree, node, calls),
        _ => String::new(),
    }
}

fn render_link(tree: &Tree, node: NodeId, calls: &[NodeId]) -> String {
    let text = arg_value_escaped(tree, node, "text", calls).unwrap_or_default();
    let url = arg_value_href(tree, node, "url", calls).unwrap_or_default();
    format!("<a href=\"{url}\">{text}</a>")
}

fn find_arg(tree: &Tree, call: NodeId, name: &str) -> Option<NodeId> {
    let args = tree.child_by_rule(call, "comp-call-args")?;
    tree.children(args).iter().copied().find(|&a| {
        tree.child_by_rule(a, "comp-call-arg-name")
            .is_some_and(|n| tree.raw_trimmed(n) == name)
    })
}

fn arg_value_raw(tree: &Tree, call: NodeId, name: &str, calls: &[NodeId]) -> Option<String> {
    let arg = find_arg(tree, call, name)?;
    let arg_type = tree.child_by_rule(arg, "comp-call-arg-type")?;
    let typed = tree.children(arg_type).iter().copied().find(|&c| {
        tree.is_rule_name_one_of(
            c,
            &[
                "comp-call-string-arg",
                "comp-call-number-arg",
                "comp-call-bool-arg",
                "comp-call-param-arg",
                "comp-call-comp-arg",
            ],
        )
    })?;
    let value = tree.child_by_rule(typed, "comp-call-arg-value")?;

    if tree.is_rule_name(typed, "comp-call-param-arg") {
        // A built-in's `$x` argument forwards to the enclosing call's own
        // binding, same ancestor-skip rule as any user component's.
        let referenced = tree.raw_trimmed(value).to_string();
        let resolved = super::param_comp_call::resolve_param_from_calls_raw(tree, &referenced, calls);
        return if resolved.is_empty() { None } else { Some(resolved) };
    }

    Some(tree.raw_trimmed(value).to_string())
}

fn arg_value_escaped(tree: &Tree, call: NodeId, name: &str, calls: &[NodeId]) -> Option<String> {
    arg_value_raw(tree, call, name, calls).map(|v| escape::html(&v))
}

fn arg_value_href(tree: &Tree, call: NodeId, name: &str, calls: &[NodeId]) -> Option<String> {
    arg_value_raw(tree, call, name, calls).map(|v| escape::href(&v))
}
