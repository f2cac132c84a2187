//! `{{name}}` resolution (`spec.md` §4.4.2), ported from `param_ref.go`'s
//! `paramRefInLocalCompDef` / `paramRefInGlobalCompDef` — kept as two
//! lexical cases (a `param-ref` nested in a `local-comp-def` vs. directly
//! in a `global-comp-def`) sharing one resolution body, matching the Go
//! source's own two-dispatch-entries-one-algorithm shape noted in
//! `SPEC_FULL.md`.

use super::CALL_LIKE;
use crate::ast::{NodeId, Tree};
use crate::escape;
use crate::validate;

pub(crate) fn render(tree: &Tree, node: NodeId, calls: &[NodeId]) -> String {
    let Some(name_node) = tree.child_by_rule(node, "param-ref-name") else {
        return String::new();
    };
    let param_name = tree.raw_trimmed(name_node).to_string();

    let ancestors = tree.ancestors(node);
    let Some(comp_def) = tree.find_node(ancestors.iter(), |t, anc| {
        t.is_rule_name_one_of(anc, &["local-comp-def", "global-comp-def"])
    }) else {
        // Validated already: a param-ref outside any component def would
        // have been wrapped into an error node, never reaching render.
        return String::new();
    };

    if tree.is_rule_name(comp_def, "global-comp-def") {
        // `paramRefInGlobalCompDef.Render`: no enclosing local def at all,
        // only the nearest invoking call is consulted.
        let Some(comp_param) = find_comp_param(tree, comp_def, "global-comp-def-head", &param_name) else {
            return String::new();
        };
        return resolve_via_nearest_call(tree, &param_name, comp_param, calls);
    }

    // `paramRefInLocalCompDef.Render`: check this local def's own params
    // first, consulting only the nearest invoking call for an override.
    if let Some(comp_param) = find_comp_param(tree, comp_def, "local-comp-def-head", &param_name) {
        return resolve_via_nearest_call(tree, &param_name, comp_param, calls);
    }

    // Not declared on the local def: fall back to the enclosing global
    // component's own params (the global branch of
    // `paramRefInLocalCompDef.Render`). Unlike the local case, an explicit
    // argument binding at *any* invoking frame wins here, searched
    // nearest-to-farthest, before falling back to the global default.
    let Some(global_def) = tree.find_node(ancestors.iter(), |t, anc| t.is_rule_name(anc, "global-comp-def")) else {
        return String::new();
    };
    let Some(comp_param) = find_comp_param(tree, global_def, "global-comp-def-head", &param_name) else {
        return String::new();
    };

    if let Some((arg, remaining)) = find_explicit_arg_across_calls(tree, &param_name, calls) {
        return resolve_arg_value_escaped(tree, arg, remaining);
    }

    default_value_escaped(tree, comp_param)
}

fn find_comp_param(tree: &Tree, comp_def: NodeId, head_rule: &str, param_name: &str) -> Option<NodeId> {
    let head = tree.child_by_rule(comp_def, head_rule)?;
    let comp_params = tree.child_by_rule(head, "comp-params")?;
    tree.children(comp_params)
        .iter()
        .copied()
        .find(|&cp| validate::param_name_matches(tree, cp, param_name))
}

/// A param-ref names a parameter of *this* component, which only the call
/// that directly invoked it could have bound — so only the nearest
/// invoking call is ever consulted for an explicit argument here.
fn resolve_via_nearest_call(tree: &Tree, param_name: &str, comp_param: NodeId, calls: &[NodeId]) -> String {
    if let Some(&nearest) = calls.first() {
        if tree.is_rule_name_one_of(nearest, CALL_LIKE) {
            if let Some(args) = tree.child_by_rule(nearest, "comp-call-args") {
                let arg = tree.children(args).iter().copied().find(|&a| {
                    tree.child_by_rule(a, "comp-call-arg-name")
                        .is_some_and(|n| tree.raw_trimmed(n) == param_name)
                });
                if let Some(arg) = arg {
                    return resolve_arg_value_escaped(tree, arg, &calls[1..]);
                }
            }
        }
    }

    default_value_escaped(tree, comp_param)
}

/// Search every invoking call, nearest to farthest, for an explicit
/// argument bound to `param_name`; returns the matching arg plus the calls
/// strictly outer than the one that bound it (for `$x` passthrough
/// continuation), or `None` if no frame binds it explicitly.
fn find_explicit_arg_across_calls<'a>(
    tree: &Tree,
    param_name: &str,
    calls: &'a [NodeId],
) -> Option<(NodeId, &'a [NodeId])> {
    for (i, &call) in calls.iter().enumerate() {
        if !tree.is_rule_name_one_of(call, CALL_LIKE) {
            continue;
        }
        let Some(args) = tree.child_by_rule(call, "comp-call-args") else {
            continue;
        };
        let arg = tree.children(args).iter().copied().find(|&a| {
            tree.child_by_rule(a, "comp-call-arg-name")
                .is_some_and(|n| tree.raw_trimmed(n) == param_name)
        });
        if let Some(arg) = arg {
            return Some((arg, &calls[i + 1..]));
        }
    }
    None
}

fn default_value_escaped(tree: &Tree, comp_param: NodeId) -> String {
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
        Some(defa) => escape::html(tree.raw_trimmed(defa)),
        None => String::new(),
    }
}

/// `resolveCompCallArgValue` (escaped variant): `$x` passthrough recurses
/// against the *remaining* invokers, strictly outer than the frame that
/// supplied the argument — the ancestor-skip rule `spec.md` §8 scenario 6
/// pins as a law.
fn resolve_arg_value_escaped(tree: &Tree, arg: NodeId, remaining_calls: &[NodeId]) -> String {
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
        return resolve_param_from_calls_escaped(tree, &referenced, remaining_calls);
    }

    escape::html(tree.raw_trimmed(value))
}

/// `resolveParamFromAncestors` (escaped variant): walk outward through
/// `$x`'s remaining invokers until one binds it explicitly, or its
/// component's own default does; otherwise empty string with no
/// diagnostic, per `spec.md` §9's third Open Question.
fn resolve_param_from_calls_escaped(tree: &Tree, param_name: &str, calls: &[NodeId]) -> String {
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
                return resolve_arg_value_escaped(tree, arg, &calls[i + 1..]);
            }
        }
        // A param-comp-call frame has no statically known `comp-call-name`
        // of its own (its target is itself dynamically resolved), so —
        // matching `findCompDefFromCompCall`'s Go behavior exactly — only
        // plain `block-comp-call`/`inline-comp-call` frames can ever
        // contribute a *default* here; a param-comp-call frame can still
        // satisfy the lookup via an explicit argument above.
        if let Some(name) = validate::comp_call_name(tree, call) {
            if let Some(def) = validate::find_comp_def(tree, call, &name) {
                let value = default_for_param(tree, def, param_name);
                if !value.is_empty() {
                    return value;
                }
            }
        }
    }
    String::new()
}

fn default_for_param(tree: &Tree, comp_def: NodeId, param_name: &str) -> String {
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
    default_value_escaped(tree, comp_param)
}

#[cfg(test)]
mod tests {
    use crate::{ast, render, rule, validate};

    fn render_source(source: &str) -> String {
        let mut tree = ast::build(source, &rule::document());
        validate::validate(&mut tree);
        render::render(&tree)
    }

    /// A `{{heading}}` inside `~ BANNER`'s content, where `heading` is
    /// declared only on the enclosing global component, must fall back to
    /// that global def's own param rather than rendering empty.
    #[test]
    fn param_ref_falls_back_to_the_enclosing_global_component() {
        let source = "title = \"Site\", heading = \"Welcome\"\n{{BANNER}}\n~ BANNER\n# {{heading}}\n";
        let html = render_source(source);
        assert!(html.contains("<h1>Welcome</h1>"), "{html}");
    }

    /// An explicit call argument binding the global-declared parameter
    /// overrides the global default, searched across every invoking frame.
    #[test]
    fn param_ref_global_fallback_honors_an_explicit_call_argument() {
        let source = concat!(
            "title = \"Site\", heading = \"Welcome\"\n",
            "{{ BANNER heading=\"Overridden\" }}\n",
            "~ BANNER\n",
            "# {{heading}}\n",
        );
        let html = render_source(source);
        assert!(html.contains("<h1>Overridden</h1>"), "{html}");
    }
}
