//! The error wrapper: four passes over the AST that transmute offending
//! subtrees in place into `block-error` / `inline-error` nodes.
//!
//! Pass order follows `errwrap.go`'s `Wrap()`, which differs from the
//! narrative order of its own surrounding doc comments: invalid
//! parameter-component-call references first, then infinite-call
//! detection, then invalid parameter references, then invalid inline use
//! of block components.

use crate::ast::{NodeId, Tree};
use crate::builtin;

pub fn validate(tree: &mut Tree) {
    let root = tree.root();
    wrap_invalid_param_comp_call_ref(tree, root);
    wrap_infinite_comp_call(tree, root);
    wrap_invalid_param_ref(tree, root);
    wrap_invalid_comp_call(tree, root);
}

fn is_screaming_case(s: &str) -> bool {
    !s.is_empty()
        && s.split('_')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()))
}

// Pass 1: invalid parameter-component-call reference (§4.3.3)
// -------------------------------------------------------------

fn wrap_invalid_param_comp_call_ref(tree: &mut Tree, root: NodeId) {
    let calls = tree.descendants_where(root, |t, id| {
        t.is_rule_name_one_of(id, &["block-param-comp-call", "inline-param-comp-call"])
    });

    for pcc in calls {
        let block = tree.is_rule_name(pcc, "block-param-comp-call");

        let Some(param_name_node) = tree.child_by_rule(pcc, "param-comp-call-name") else {
            continue;
        };
        let param_name = tree.raw_trimmed(param_name_node).to_string();

        let ancestors = tree.ancestors(pcc);
        let Some(comp_def) = tree.find_node(ancestors.iter(), |t, anc| {
            t.is_rule_name_one_of(anc, &["local-comp-def", "global-comp-def"])
        }) else {
            continue;
        };

        let comp_def_head = tree
            .child_by_rule(comp_def, "local-comp-def-head")
            .or_else(|| tree.child_by_rule(comp_def, "global-comp-def-head"));

        let title = "Unknown parameter";
        let message = format!("The parameter **{param_name}** is not defined for this component.");

        let Some(head) = comp_def_head else {
            tree.wrap_param_comp_call_error(pcc, block, title, &message);
            continue;
        };

        let Some(comp_params) = tree.child_by_rule(head, "comp-params") else {
            tree.wrap_param_comp_call_error(pcc, block, title, &message);
            continue;
        };

        let comp_param = tree
            .children(comp_params)
            .to_vec()
            .into_iter()
            .find(|&cp| param_name_matches(tree, cp, &param_name));

        let Some(comp_param) = comp_param else {
            tree.wrap_param_comp_call_error(pcc, block, title, &message);
            continue;
        };

        let Some(comp_param_type) = tree.child_by_rule(comp_param, "comp-param-type") else {
            // bare param (no declared type) is treated as component-typed
            continue;
        };

        let type_raw = tree.raw_trimmed(comp_param_type).to_string();
        if !is_screaming_case(&type_raw) {
            tree.wrap_param_comp_call_error(
                pcc,
                block,
                "Not component parameter",
                &format!("The parameter **{param_name}** is not component parameter"),
            );
        }
    }
}

pub(crate) fn param_name_matches(tree: &Tree, comp_param: NodeId, name: &str) -> bool {
    tree.child_by_rule(comp_param, "comp-param-name")
        .is_some_and(|n| tree.raw_trimmed(n) == name)
}

// Pass 2: infinite component-call detection (§4.3.1)
// -----------------------------------------------------

fn wrap_infinite_comp_call(tree: &mut Tree, root: NodeId) {
    detect_infinite_comp_call(tree, root, &mut Vec::new(), None);
}

/// Mirrors `errwrap.go`'s `detectInfiniteCompCall` control flow exactly:
/// a call node that resolves to a definition recurses into that
/// definition's content *and then still falls through* to the generic
/// child loop at the end (so its own argument subtree is scanned too);
/// only the early-return cases (empty name, builtin, wrapped-as-error)
/// skip that final loop.
fn detect_infinite_comp_call(
    tree: &mut Tree,
    node: NodeId,
    call_stack: &mut Vec<String>,
    current_call: Option<NodeId>,
) {
    let rule_name = tree.rule_name(node);

    if rule_name == "block-comp-call" || rule_name == "inline-comp-call" {
        let block = rule_name == "block-comp-call";
        let Some(name) = comp_call_name(tree, node) else {
            return;
        };
        if call_stack.contains(&name) {
            tree.wrap_with_error(
                node,
                block,
                "Infinite component call",
                &format!("The call to component **{name}** creates an infinite loop and was skipped."),
            );
            return;
        }
        match find_comp_def(tree, node, &name) {
            None => {
                if builtin::is_builtin(&name) {
                    return;
                }
                tree.wrap_with_error(
                    node,
                    block,
                    "Unknown component",
                    &format!("The component **{name}** is not defined or not registered."),
                );
                return;
            }
            Some(def) => {
                if let Some(content) = comp_def_content(tree, def) {
                    call_stack.push(name);
                    detect_infinite_comp_call(tree, content, call_stack, Some(node));
                    call_stack.pop();
                }
            }
        }
    }

    if let Some(current_call) = current_call {
        if rule_name == "block-param-comp-call" || rule_name == "inline-param-comp-call" {
            let block = rule_name == "block-param-comp-call";
            let Some(name) = resolve_param_comp_call_name(tree, node, Some(current_call)) else {
                return;
            };
            if call_stack.contains(&name) {
                tree.wrap_with_error(
                    node,
                    block,
                    "Infinite component call",
                    &format!("The call to component **{name}** creates an infinite loop and was skipped."),
                );
                return;
            }
            match find_comp_def(tree, node, &name) {
                None => {
                    if builtin::is_builtin(&name) {
                        return;
                    }
                    tree.wrap_with_error(
                        node,
                        block,
                        "Unknown component",
                        &format!("The component **{name}** is not defined or not registered."),
                    );
                    return;
                }
                Some(def) => {
                    if let Some(content) = comp_def_content(tree, def) {
                        call_stack.push(name);
                        detect_infinite_comp_call(tree, content, call_stack, Some(current_call));
                        call_stack.pop();
                    }
                }
            }
        }
    }

    for child in tree.children(node).to_vec() {
        detect_infinite_comp_call(tree, child, call_stack, current_call);
    }
}

pub(crate) fn comp_call_name(tree: &Tree, node: NodeId) -> Option<String> {
    tree.child_by_rule(node, "comp-call-name")
        .map(|n| tree.raw_trimmed(n).to_string())
}

/// Resolve a `{{$name}}`'s bound component, consulting `current_call`'s
/// explicit arguments first, then the enclosing def's declared default.
fn resolve_param_comp_call_name(tree: &Tree, pcc: NodeId, current_call: Option<NodeId>) -> Option<String> {
    let param_name_node = tree.child_by_rule(pcc, "param-comp-call-name")?;
    let param_name = tree.raw_trimmed(param_name_node).to_string();

    if let Some(call) = current_call {
        if let Some(args) = tree.child_by_rule(call, "comp-call-args") {
            let arg = tree.children(args).iter().copied().find(|&a| {
                tree.child_by_rule(a, "comp-call-arg-name")
                    .is_some_and(|n| tree.raw_trimmed(n) == param_name)
            });
            if let Some(arg) = arg {
                if let Some(value) = comp_call_arg_comp_value(tree, arg) {
                    return Some(value);
                }
            }
        }
    }

    let ancestors = tree.ancestors(pcc);
    let comp_def = tree.find_node(ancestors.iter(), |t, anc| {
        t.is_rule_name_one_of(anc, &["local-comp-def", "global-comp-def"])
    })?;
    get_comp_param_default(tree, comp_def, &param_name)
}

fn comp_call_arg_comp_value(tree: &Tree, arg: NodeId) -> Option<String> {
    let arg_type = tree.child_by_rule(arg, "comp-call-arg-type")?;
    let comp_arg = tree.child_by_rule(arg_type, "comp-call-comp-arg")?;
    let value = tree.child_by_rule(comp_arg, "comp-call-arg-value")?;
    Some(tree.raw_trimmed(value).to_string())
}

fn get_comp_param_default(tree: &Tree, comp_def: NodeId, param_name: &str) -> Option<String> {
    let head = tree
        .child_by_rule(comp_def, "local-comp-def-head")
        .or_else(|| tree.child_by_rule(comp_def, "global-comp-def-head"))?;
    let comp_params = tree.child_by_rule(head, "comp-params")?;
    let comp_param = tree
        .children(comp_params)
        .iter()
        .copied()
        .find(|&cp| param_name_matches(tree, cp, param_name))?;
    let comp_param_type = tree.child_by_rule(comp_param, "comp-param-type")?;
    let comp_comp_param = tree.child_by_rule(comp_param_type, "comp-comp-param")?;
    let defa_value = tree.child_by_rule(comp_comp_param, "comp-param-defa-value")?;
    Some(tree.raw_trimmed(defa_value).to_string())
}

pub(crate) fn find_comp_def(tree: &Tree, call_node: NodeId, name: &str) -> Option<NodeId> {
    let ancestors = tree.ancestors(call_node);
    let global_anc = tree.find_node(ancestors.iter(), |t, anc| t.is_rule_name(anc, "global-comp-def"));
    let local_scope = global_anc.unwrap_or_else(|| tree.root());

    tree.find_local_component_def(local_scope, name)
        .or_else(|| tree.find_global_component_def(tree.root(), name))
}

pub(crate) fn comp_def_content(tree: &Tree, comp_def: NodeId) -> Option<NodeId> {
    tree.children(comp_def).iter().copied().find(|&child| {
        tree.is_rule_name_one_of(child, &["local-comp-def-content", "global-comp-def-content"])
    })
}

// Pass 3: invalid parameter reference (§4.3.2)
// -----------------------------------------------

fn wrap_invalid_param_ref(tree: &mut Tree, root: NodeId) {
    let param_refs = tree.descendants_where(root, |t, id| t.is_rule_name(id, "param-ref"));

    for pr in param_refs {
        let ancestors = tree.ancestors(pr);
        let comp_def_content = tree.find_node(ancestors.iter(), |t, anc| {
            t.is_rule_name_one_of(anc, &["local-comp-def-content", "global-comp-def-content"])
        });

        let Some(comp_def_content) = comp_def_content else {
            tree.wrap_with_error(
                pr,
                false,
                "Invalid parameter usage",
                "Parameters cannot be used in the root context.",
            );
            continue;
        };

        let Some(name_node) = tree.child_by_rule(pr, "param-ref-name") else {
            continue;
        };
        let name = tree.raw_trimmed(name_node).to_string();

        let title = "Unknown parameter";
        let message = format!("The parameter **{name}** is not defined for this component.");

        if tree.is_rule_name(comp_def_content, "local-comp-def-content") {
            let local_def = tree
                .find_node(ancestors.iter(), |t, anc| t.is_rule_name(anc, "local-comp-def"))
                .expect("param-ref under local-comp-def-content has a local-comp-def ancestor");
            let mut found = local_comp_def_has_param(tree, local_def, &name);

            if !found {
                if let Some(global_def) = tree.find_node(ancestors.iter(), |t, anc| t.is_rule_name(anc, "global-comp-def")) {
                    found = get_comp_params(tree, global_def, "global-comp-def-head")
                        .is_some_and(|params| comp_params_has(tree, params, &name));
                }
            }

            if !found {
                tree.wrap_with_error(pr, false, title, &message);
            }
        } else if tree.is_rule_name(comp_def_content, "global-comp-def-content") {
            let global_def = tree
                .find_node(ancestors.iter(), |t, anc| t.is_rule_name(anc, "global-comp-def"))
                .expect("param-ref under global-comp-def-content has a global-comp-def ancestor");
            let found = get_comp_params(tree, global_def, "global-comp-def-head")
                .is_some_and(|params| comp_params_has(tree, params, &name));
            if !found {
                tree.wrap_with_error(pr, false, title, &message);
            }
        }
    }
}

fn local_comp_def_has_param(tree: &Tree, local_def: NodeId, name: &str) -> bool {
    get_comp_params(tree, local_def, "local-comp-def-head").is_some_and(|params| comp_params_has(tree, params, name))
}

fn get_comp_params(tree: &Tree, comp_def: NodeId, head_rule: &str) -> Option<NodeId> {
    let head = tree.child_by_rule(comp_def, head_rule)?;
    tree.child_by_rule(head, "comp-params")
}

fn comp_params_has(tree: &Tree, comp_params: NodeId, name: &str) -> bool {
    tree.children(comp_params)
        .iter()
        .any(|&cp| param_name_matches(tree, cp, name))
}

// Pass 4: invalid inline use of a block component (§4.3.4)
// -----------------------------------------------------------

fn wrap_invalid_comp_call(tree: &mut Tree, root: NodeId) {
    let inline_calls = tree.descendants_where(root, |t, id| {
        t.is_rule_name_one_of(id, &["inline-comp-call", "inline-param-comp-call"])
    });

    for icc in inline_calls {
        let name = if tree.is_rule_name(icc, "inline-comp-call") {
            comp_call_name(tree, icc)
        } else {
            resolve_param_comp_call_name(tree, icc, None)
        };
        let Some(name) = name else { continue };

        let Some(def) = find_comp_def(tree, icc, &name) else {
            continue;
        };
        let Some(content) = comp_def_content(tree, def) else {
            continue;
        };

        let children = tree.children(content).to_vec();
        if children.is_empty() {
            continue;
        }

        let mut wrap = children.len() > 1;

        let mut p = None;
        if !wrap {
            p = tree.child_by_rule(content, "p");
            if p.is_none() {
                wrap = true;
            }
        }

        if !wrap {
            let p = p.expect("checked above");
            if let Some(p_content) = tree.child_by_rule(p, "p-content") {
                if tree.child_by_rule(p_content, "soft-break").is_some() {
                    wrap = true;
                }
            }
        }

        if wrap {
            tree.wrap_with_error(
                icc,
                false,
                "Invalid component usage",
                &format!("The component **{name}** is a block component and cannot be used inline."),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast;
    use crate::rule;

    fn parse_and_validate(source: &str) -> Tree {
        let mut tree = ast::build(source, &rule::document());
        validate(&mut tree);
        tree
    }

    #[test]
    fn unknown_component_wraps_block_error() {
        let tree = parse_and_validate("{{MISSING}}");
        let err = tree
            .descendants_where(tree.root(), |t, id| t.is_rule_name(id, ast::BLOCK_ERROR))
            .into_iter()
            .next()
            .expect("block-error node");
        let title = tree.child_by_rule(err, "error-title").unwrap();
        assert_eq!(tree.raw(title), "Unknown component");
    }

    #[test]
    fn infinite_recursion_is_broken() {
        let source = "a = \"x\"\n~ A\n{{B}}\nb = \"y\"\n~ B\n{{A}}\n";
        let tree = parse_and_validate(source);
        let errors = tree.descendants_where(tree.root(), |t, id| {
            t.is_rule_name_one_of(id, &[ast::BLOCK_ERROR, ast::INLINE_ERROR])
        });
        assert!(!errors.is_empty());
    }

    #[test]
    fn param_ref_outside_component_is_invalid() {
        let tree = parse_and_validate("{{name}}");
        let errors = tree.descendants_where(tree.root(), |t, id| t.is_rule_name(id, ast::INLINE_ERROR));
        assert!(!errors.is_empty());
    }
}
