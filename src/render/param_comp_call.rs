//! `{{$name}}` resolution and expansion (`spec.md` §4.4.3), ported from
//! `param_comp_call.go`. Resolving the bound component name needs the
//! *raw* (unescaped) identifier text, unlike `param_ref`'s HTML-escaped
//! literal output — the Go source keeps two near-identical argument
//! resolvers for exactly this reason (`resolveCompCallArgValue` vs.
//! `resolveCompCallArgValueRaw`); this module is the raw side.

use super::{push_call, render_children, render_inline_expansion, CALL_LIKE};
use crate::ast::{NodeId, Tree};
use crate::validate;

pub(crate) fn render(tree: &Tree, node: NodeId, calls: &[NodeId]) -> String {
    let Some(param_name_node) = tree.child_by_rule(node, "param-comp-call-name") else {
        return String::new();
    };
    let param_name = tree.raw_trimmed(param_name_node).to_string();

    let Some(comp_name) = resolve_comp_name(tree, &param_name, calls) else {
        return String::new();
    };
    if comp_name.is_empty() {
        return String::new();
    }

    if crate::builtin::is_builtin(&comp_name) {
        return super::builtins::render(tree, &comp_name, node, calls);
    }

    let Some(def) = validate::find_comp_def(tree, node, &comp_name) else {
        return String::new();
    };
    let Some(content) = validate::comp_def_content(tree, def) else {
        return String::new();
    };

    let inline = tree.is_rule_name(node, "inline-param-comp-call");
    let next_calls = push_call(node, calls);

    if inline {
        render_inline_expansion(tree, content, &next_calls)
    } else {
        render_children(tree, content, &next_calls)
    }
}

/// `resolveCompName`: walk the invoker chain nearest-first; the first
/// frame that either binds `paramName` explicitly or whose own component
/// declares a non-empty default for it wins.
fn resolve_comp_name(tree: &Tree, param_name: &str, calls: &[NodeId]) -> Option<String> {
    for (i, &call) in calls.iter().enumerate() {
        if !tree.is_rule_name_one_of(call, CALL_LIKE) {
            continue;
        }
        if let Some(args) = tree.child_by_rule(call, "comp-call-args") {
            let arg = tree.children(args).iter().copied().find(|&a| {
                tree.child_by_rule(a, "comp-call-arg-name")
                    .is_some_and(|n| tree.raw_trimmed(n) == param_name)
            });
            if let Some(arg) = arg {
                return Some(resolve_arg_value_raw(tree, arg, &calls[i + 1..]));
            }
        }

        if let Some(name) = validate::comp_call_name(tree, call) {
            if let Some(def) = validate::find_comp_def(tree, call, &name) {
                let value = comp_param_default_raw(tree, def, param_name);
                if !value.is_empty() {
                    return Some(value);
                }
            }
        }
    }
    None
}

fn resolve_arg_value_raw(tree: &Tree, arg: NodeId, remaining_calls: &[NodeId]) -> String {
    let Some(arg_type) = tree.child_by_rule(arg, "comp-call-arg-type") else {
        return String::new();
    };
    let Some(typed) = tree.children(arg_type).iter().copied().find(|&c| {
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
    }) else {
        return String::new();
    };
    let Some(value) = tree.child_by_rule(typed, "comp-call-arg-value") else {
        return String::new();
    };

    if tree.is_rule_name(typed, "comp-call-param-arg") {
        let referenced = tree.raw_trimmed(value).to_string();
        return resolve_param_from_calls_raw(tree, &referenced, remaining_calls);
    }

    tree.raw_trimmed(value).to_string()
}

/// General-purpose `$x` forwarding resolver: not just for a
/// param-comp-call's own bound name, but reused by `builtins` for a
/// built-in's `$x` argument, since both cases are "resolve this parameter
/// name against the remaining invoker chain" with no other distinction.
pub(crate) fn resolve_param_from_calls_raw(tree: &Tree, param_name: &str, calls: &[NodeId]) -> String {
    for (i, &call) in calls.iter().enumerate() {
        if !tree.is_rule_name_one_of(call, CALL_LIKE) {
            continue;
        }
        if let Some(args) = tree.child_by_rule(call, "comp-call-args") {
            let arg = tree.children(args).iter().copied().find(|&a| {
                tree.child_by_rule(a, "comp-call-arg-name")
                    .is_some_and(|n| tree.raw_trimmed(n) == param_name)
            });
            if let Some(arg) = arg {
                return resolve_arg_value_raw(tree, arg, &calls[i + 1..]);
            }
        }
        if let Some(name) = validate::comp_call_name(tree, call) {
            if let Some(def) = validate::find_comp_def(tree, call, &name) {
                let value = comp_param_default_raw(tree, def, param_name);
                if !value.is_empty() {
                    return value;
                }
            }
        }
    }
    String::new()
}

fn comp_param_default_raw(tree: &Tree, comp_def: NodeId, param_name: &str) -> String {
    let head = tree
        .child_by_rule(comp_def, "local-comp-def-head")
        .or_else(|| tree.child_by_rule(comp_def, "global-comp-def-head"));
    let Some(head) = head else {
        return String::new();
    };
    let Some(comp_params) = tree.child_by_rule(head, "comp-params") else {
        return String::new();
    };
    let Some(comp_param) = tree
        .children(comp_params)
        .iter()
        .copied()
        .find(|&cp| validate::param_name_matches(tree, cp, param_name))
    else {
        return String::new();
    };
    let Some(comp_param_type) = tree.child_by_rule(comp_param, "comp-param-type") else {
        return String::new();
    };
    let Some(typed) = tree.children(comp_param_type).iter().copied().find(|&c| {
        tree.is_rule_name_one_of(
            c,
            &["comp-string-param", "comp-number-param", "comp-bool-param", "comp-comp-param"],
        )
    }) else {
        return String::new();
    };
    match tree.child_by_rule(typed, "comp-param-defa-value") {
        Some(defa) => tree.raw_trimmed(defa).to_string(),
        None => String::new(),
    }
}
