//! The arena-backed AST and the masking tree builder.
//!
//! Back-pointers are `NodeId` indices into a flat arena rather than raw
//! self-referential pointers, per the grammar's own "implement with indices
//! into an arena... never duplicate ownership" guidance — this sidesteps
//! the `unsafe` self-referential pattern the rest of this crate's tree
//! (pulldown-cmark-backed) otherwise relies on, while keeping the same
//! conceptual API surface (`parent`, `children`, `ancestors`, an indented
//! `Display`).

use crate::rule::Rule;
use std::fmt;
use std::ops::Range;

pub type NodeId = usize;

/// Synthetic error-wrapper node rule names (§4.3.5).
pub const BLOCK_ERROR: &str = "block-error";
pub const INLINE_ERROR: &str = "inline-error";
const ERROR_TITLE: &str = "error-title";
const ERROR_MESSAGE: &str = "error-message";
const SELF_NODE: &str = "self";
const P: &str = "p";
const P_CONTENT: &str = "p-content";

/// A node's own text: either a span of the original source, or owned text
/// for nodes synthesized by the validator (error titles/messages have no
/// backing source range).
#[derive(Debug, Clone)]
pub enum Content {
    Span(Range<usize>),
    Owned(String),
}

impl Content {
    fn empty() -> Content {
        Content::Owned(String::new())
    }
}

#[derive(Debug, Clone)]
pub struct NodeData {
    pub(crate) rule_name: &'static str,
    pub(crate) content: Content,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

pub struct Tree {
    source: Vec<u8>,
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Tree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn source(&self) -> &[u8] {
        &self.source
    }

    pub fn rule_name(&self, id: NodeId) -> &'static str {
        self.nodes[id].rule_name
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    /// The node's own text, trimmed of nothing — callers trim when they
    /// need name-comparison semantics (every grammar name-lookup site in
    /// this crate trims whitespace itself, matching the Go sources' call
    /// sites rather than baking trimming into raw access).
    pub fn raw(&self, id: NodeId) -> &str {
        match &self.nodes[id].content {
            Content::Span(range) => {
                std::str::from_utf8(&self.source[range.clone()]).unwrap_or("")
            }
            Content::Owned(s) => s,
        }
    }

    pub fn raw_trimmed(&self, id: NodeId) -> &str {
        self.raw(id).trim()
    }

    pub fn is_rule_name(&self, id: NodeId, name: &str) -> bool {
        self.rule_name(id) == name
    }

    pub fn is_rule_name_one_of(&self, id: NodeId, names: &[&str]) -> bool {
        names.contains(&self.rule_name(id))
    }

    /// Walk `parent` links from `id` to the root, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = self.nodes[id].parent;
        while let Some(n) = cur {
            out.push(n);
            cur = self.nodes[n].parent;
        }
        out
    }

    /// Pre-order search over `id`'s subtree (`id` itself included).
    pub fn descendants_where(&self, id: NodeId, pred: impl Fn(&Tree, NodeId) -> bool) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.walk_descendants(id, &pred, &mut out);
        out
    }

    fn walk_descendants(&self, id: NodeId, pred: &impl Fn(&Tree, NodeId) -> bool, out: &mut Vec<NodeId>) {
        if pred(self, id) {
            out.push(id);
        }
        for &child in &self.nodes[id].children {
            self.walk_descendants(child, pred, out);
        }
    }

    pub fn child_by_rule(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.nodes[id]
            .children
            .iter()
            .copied()
            .find(|&c| self.rule_name(c) == name)
    }

    pub fn find_node<'a>(
        &self,
        candidates: impl IntoIterator<Item = &'a NodeId>,
        pred: impl Fn(&Tree, NodeId) -> bool,
    ) -> Option<NodeId>
    where
        NodeId: 'a,
    {
        candidates.into_iter().copied().find(|&c| pred(self, c))
    }

    /// The local-component wrapper directly under `scope` (the document
    /// root or a `global-comp-def`), matching whichever local definition's
    /// own name equals `name`.
    pub fn find_local_component_def(&self, scope: NodeId, name: &str) -> Option<NodeId> {
        let wrapper = self.child_by_rule(scope, "local-comp-def-wrapper")?;
        self.children(wrapper).iter().copied().find_map(|def_id| {
            if !self.is_rule_name(def_id, "local-comp-def") {
                return None;
            }
            let head = self.child_by_rule(def_id, "local-comp-def-head")?;
            let name_node = self.child_by_rule(head, "local-comp-name")?;
            if self.raw_trimmed(name_node) == name {
                Some(def_id)
            } else {
                None
            }
        })
    }

    /// Search every global component def under the document root for one
    /// whose own name equals `name`.
    pub fn find_global_component_def(&self, root: NodeId, name: &str) -> Option<NodeId> {
        let wrapper = self.child_by_rule(root, "global-comp-def-wrapper")?;
        self.children(wrapper).iter().copied().find_map(|def_id| {
            if !self.is_rule_name(def_id, "global-comp-def") {
                return None;
            }
            let name_node = self.child_by_rule(def_id, "global-comp-name")?;
            if self.raw_trimmed(name_node) == name {
                Some(def_id)
            } else {
                None
            }
        })
    }

    // Mutation: validator-only
    // -------------------------

    fn alloc(&mut self, rule_name: &'static str, content: Content, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(NodeData {
            rule_name,
            content,
            parent,
            children: vec![],
        });
        id
    }

    fn set_parent(&mut self, id: NodeId, parent: NodeId) {
        self.nodes[id].parent = Some(parent);
    }

    /// Transmute `id` in place into a `block-error`/`inline-error` node:
    /// children become `(error-title, error-message, self)`, where `self`
    /// takes over `id`'s original children (§4.3.5).
    pub(crate) fn wrap_with_error(&mut self, id: NodeId, block: bool, title: &str, message: &str) {
        let rule_name = if block { BLOCK_ERROR } else { INLINE_ERROR };
        let (title_id, message_id, self_id) = self.build_error_children(id, title, message);
        self.nodes[id].rule_name = rule_name;
        self.nodes[id].content = Content::empty();
        self.nodes[id].children = vec![title_id, message_id, self_id];
    }

    /// Build the `(error-title, error-message, self)` triple for `id`
    /// without mutating `id` itself yet — shared by `wrap_with_error` and
    /// the block-parameter-comp-call special case below.
    fn build_error_children(&mut self, id: NodeId, title: &str, message: &str) -> (NodeId, NodeId, NodeId) {
        let title_id = self.alloc(ERROR_TITLE, Content::Owned(title.to_string()), Some(id));
        let message_id = self.alloc(ERROR_MESSAGE, Content::Owned(message.to_string()), Some(id));
        let original_children = std::mem::take(&mut self.nodes[id].children);
        let self_id = self.alloc(SELF_NODE, Content::empty(), Some(id));
        for &child in &original_children {
            self.set_parent(child, self_id);
        }
        self.nodes[self_id].children = original_children;
        (title_id, message_id, self_id)
    }

    /// A block parameter-component-call error must still render inline
    /// (its surrounding paragraph is expected to exist): nest as
    /// `p` -> `p-content` -> `inline-error` instead of mutating `id`
    /// directly into an error node (§4.3.5 special case).
    pub(crate) fn wrap_param_comp_call_error(&mut self, id: NodeId, block: bool, title: &str, message: &str) {
        if !block {
            self.wrap_with_error(id, false, title, message);
            return;
        }

        let error_id = self.alloc(INLINE_ERROR, Content::empty(), None);
        let (title_id, message_id, self_id) = self.build_error_children(id, title, message);
        self.nodes[title_id].parent = Some(error_id);
        self.nodes[message_id].parent = Some(error_id);
        self.nodes[self_id].parent = Some(error_id);
        self.nodes[error_id].children = vec![title_id, message_id, self_id];

        let p_content_id = self.alloc(P_CONTENT, Content::empty(), Some(id));
        self.nodes[error_id].parent = Some(p_content_id);
        self.nodes[p_content_id].children = vec![error_id];

        self.nodes[id].rule_name = P;
        self.nodes[id].content = Content::empty();
        self.nodes[id].children = vec![p_content_id];
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, self.root, 0)
    }
}

impl Tree {
    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, depth: usize) -> fmt::Result {
        let raw = self.raw(id);
        let preview: String = raw.chars().take(40).collect();
        let preview = preview.replace('\n', "\\n");
        writeln!(
            f,
            "{:indent$}{} {:?}",
            "",
            self.rule_name(id),
            preview,
            indent = depth * 2
        )?;
        for &child in &self.nodes[id].children {
            self.fmt_node(f, child, depth + 1)?;
        }
        Ok(())
    }
}

// Tree builder
// -------------

/// Parse `source` under `root_rule`, producing the full AST in one pass.
pub fn build(source: &str, root_rule: &Rule) -> Tree {
    let bytes = source.as_bytes();
    let mut mask = bytes.to_vec();
    let mut tree = Tree {
        source: bytes.to_vec(),
        nodes: Vec::new(),
        root: 0,
    };

    let whole = 0..bytes.len();
    let root_ranges = select_first_matching(root_rule, &mask, whole.clone());
    let root_range = root_ranges.into_iter().next().unwrap_or(0..0);
    let root_id = tree.alloc(root_rule.name(), Content::Span(root_range.clone()), None);
    tree.root = root_id;

    build_children(&mut tree, root_id, root_range, &root_rule.children(), &mut mask);
    tree
}

/// Evaluate `rule`'s selectors in declared order against `mask`, restricted
/// to `parent`; the first selector yielding at least one range wins.
fn select_first_matching(
    rule: &Rule,
    mask: &[u8],
    parent: Range<usize>,
) -> Vec<Range<usize>> {
    for selector in rule.selectors() {
        let ranges = selector.select(mask, parent.clone());
        if !ranges.is_empty() {
            return ranges;
        }
    }
    vec![]
}

/// Apply `child_rules`, in declared order, inside `parent_range`. Each
/// rule's candidate ranges are claimed (and masked) immediately, before
/// the next rule in the list runs, so later rules never re-match
/// already-claimed bytes; the resulting children are then sorted by start
/// offset to restore document order for traversal/rendering.
fn build_children(
    tree: &mut Tree,
    parent_id: NodeId,
    parent_range: Range<usize>,
    child_rules: &[Rule],
    mask: &mut [u8],
) {
    let mut built: Vec<(usize, NodeId)> = Vec::new();

    for rule in child_rules {
        let ranges = select_first_matching(rule, mask, parent_range.clone());
        for range in ranges {
            let node_id = tree.alloc(rule.name(), Content::Span(range.clone()), Some(parent_id));

            let grandchildren = rule.children();
            if !grandchildren.is_empty() {
                build_children(tree, node_id, range.clone(), &grandchildren, mask);
            }

            mask_range(mask, &range);
            built.push((range.start, node_id));
        }
    }

    built.sort_by_key(|(start, _)| *start);
    tree.nodes[parent_id].children = built.into_iter().map(|(_, id)| id).collect();
}

fn mask_range(mask: &mut [u8], range: &Range<usize>) {
    for b in &mut mask[range.clone()] {
        *b = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule;

    #[test]
    fn builds_plain_paragraph() {
        let tree = build("Hello world.", &rule::document());
        let p_id = tree
            .descendants_where(tree.root(), |t, id| t.is_rule_name(id, "p"))
            .into_iter()
            .next()
            .expect("paragraph node");
        assert_eq!(tree.raw(p_id), "Hello world.");
    }

    #[test]
    fn masks_claimed_ranges_from_sibling_rules() {
        let tree = build("**bold** and *em*", &rule::document());
        let strong_nodes = tree.descendants_where(tree.root(), |t, id| t.is_rule_name(id, "strong"));
        let em_nodes = tree.descendants_where(tree.root(), |t, id| t.is_rule_name(id, "em"));
        assert_eq!(strong_nodes.len(), 1);
        assert_eq!(em_nodes.len(), 1);
        assert_eq!(tree.raw(strong_nodes[0]), "**bold**");
        assert_eq!(tree.raw(em_nodes[0]), "*em*");
    }

    #[test]
    fn sibling_ranges_are_disjoint_and_ordered() {
        let tree = build("# Title\n\nBody text.", &rule::document());
        let root_content = tree.child_by_rule(tree.root(), "root-content").unwrap();
        let children = tree.children(root_content).to_vec();
        assert!(children.len() >= 2);
        let mut last_end = 0;
        for &child in &children {
            let range = match &tree.nodes[child].content {
                Content::Span(r) => r.clone(),
                Content::Owned(_) => continue,
            };
            assert!(range.start >= last_end);
            last_end = range.end;
        }
    }

    #[test]
    fn wrap_with_error_preserves_original_children_under_self() {
        let mut tree = build("{{MISSING}}", &rule::document());
        let call_id = tree
            .descendants_where(tree.root(), |t, id| t.is_rule_name(id, "block-comp-call"))
            .into_iter()
            .next()
            .expect("call node");
        let original_children = tree.children(call_id).to_vec();
        tree.wrap_with_error(call_id, true, "Unknown component", "msg");
        assert!(tree.is_rule_name(call_id, BLOCK_ERROR));
        let children = tree.children(call_id).to_vec();
        assert_eq!(children.len(), 3);
        let self_id = children[2];
        assert!(tree.is_rule_name(self_id, "self"));
        assert_eq!(tree.children(self_id).to_vec(), original_children);
    }
}
