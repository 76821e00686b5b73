//! Append-only labeled ordered tree.
//!
//! Nodes live in a flat arena and are addressed by [`NodeId`]. Parent and
//! sibling relations are derived from the owning parent's child list, so a
//! [`Node`] handle is just a borrowed view into the arena.

use std::fmt;

use nova_core::SourceRange;
use serde::ser::{SerializeSeq, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::entity::{EntityType, SourceCodeEntity};

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn from_raw(raw: u32) -> Self {
        NodeId(raw)
    }

    #[must_use]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeData {
    entity: SourceCodeEntity,
    parent: Option<NodeId>,
    /// Position within the parent's child list.
    index: u32,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    nodes: Vec<NodeData>,
}

impl Tree {
    /// Creates a tree containing only `root`.
    pub fn new(root: SourceCodeEntity) -> Self {
        Tree {
            nodes: vec![NodeData {
                entity: root,
                parent: None,
                index: 0,
                children: Vec::new(),
            }],
        }
    }

    #[must_use]
    pub fn root_id(&self) -> NodeId {
        NodeId(0)
    }

    #[must_use]
    pub fn root(&self) -> Node<'_> {
        Node {
            tree: self,
            id: self.root_id(),
        }
    }

    /// Returns the node for `id`, or `None` if `id` does not belong to this tree.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<Node<'_>> {
        (id.idx() < self.nodes.len()).then_some(Node { tree: self, id })
    }

    /// # Panics
    ///
    /// Panics if `id` was not allocated by this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Node<'_> {
        assert!(id.idx() < self.nodes.len(), "{id:?} is not a node of this tree");
        Node { tree: self, id }
    }

    /// Appends a new last child under `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` was not allocated by this tree.
    pub fn create_child(&mut self, parent: NodeId, entity: SourceCodeEntity) -> NodeId {
        let id = NodeId::from_raw(self.nodes.len() as u32);
        let siblings = &mut self.nodes[parent.idx()].children;
        let index = siblings.len() as u32;
        siblings.push(id);
        self.nodes.push(NodeData {
            entity,
            parent: Some(parent),
            index,
            children: Vec::new(),
        });
        id
    }

    /// Number of nodes, root included.
    #[allow(clippy::len_without_is_empty)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Drops every node allocated at or after `len`.
    ///
    /// Nodes are appended in allocation order, so the removed ids are always a
    /// suffix of any surviving node's child list.
    pub(crate) fn truncate(&mut self, len: usize) {
        let len = len.max(1);
        if len >= self.nodes.len() {
            return;
        }
        self.nodes.truncate(len);
        for node in &mut self.nodes {
            while node.children.last().is_some_and(|child| child.idx() >= len) {
                node.children.pop();
            }
        }
    }

    /// Structural rendering of the whole tree; see [`Node::tree_string`].
    #[must_use]
    pub fn tree_string(&self) -> String {
        self.root().tree_string()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.idx()]
    }
}

impl Serialize for Tree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.root().serialize(serializer)
    }
}

/// Borrowed view of one node of a [`Tree`].
#[derive(Clone, Copy)]
pub struct Node<'a> {
    tree: &'a Tree,
    id: NodeId,
}

impl<'a> Node<'a> {
    #[must_use]
    pub fn id(self) -> NodeId {
        self.id
    }

    fn data(self) -> &'a NodeData {
        self.tree.data(self.id)
    }

    fn at(self, id: NodeId) -> Node<'a> {
        Node { tree: self.tree, id }
    }

    #[must_use]
    pub fn entity(self) -> &'a SourceCodeEntity {
        &self.data().entity
    }

    #[must_use]
    pub fn label(self) -> EntityType {
        self.entity().entity_type()
    }

    #[must_use]
    pub fn value(self) -> &'a str {
        self.entity().value()
    }

    #[must_use]
    pub fn source_range(self) -> SourceRange {
        self.entity().source_range()
    }

    #[must_use]
    pub fn parent(self) -> Option<Node<'a>> {
        self.data().parent.map(|id| self.at(id))
    }

    #[must_use]
    pub fn is_root(self) -> bool {
        self.data().parent.is_none()
    }

    pub fn children(self) -> impl ExactSizeIterator<Item = Node<'a>> + DoubleEndedIterator + 'a {
        let tree = self.tree;
        self.data()
            .children
            .iter()
            .map(move |&id| Node { tree, id })
    }

    #[must_use]
    pub fn child_count(self) -> usize {
        self.data().children.len()
    }

    #[must_use]
    pub fn first_child(self) -> Option<Node<'a>> {
        self.data().children.first().map(|&id| self.at(id))
    }

    #[must_use]
    pub fn last_child(self) -> Option<Node<'a>> {
        self.data().children.last().map(|&id| self.at(id))
    }

    #[must_use]
    pub fn next_sibling(self) -> Option<Node<'a>> {
        let parent = self.parent()?;
        let index = self.data().index as usize + 1;
        parent.data().children.get(index).map(|&id| self.at(id))
    }

    #[must_use]
    pub fn previous_sibling(self) -> Option<Node<'a>> {
        let parent = self.parent()?;
        let index = (self.data().index as usize).checked_sub(1)?;
        parent.data().children.get(index).map(|&id| self.at(id))
    }

    /// A node without children, whatever its entity type.
    #[must_use]
    pub fn is_leaf(self) -> bool {
        self.data().children.is_empty()
    }

    /// Follows first children down to a leaf; a leaf returns itself.
    #[must_use]
    pub fn first_leaf(self) -> Node<'a> {
        let mut node = self;
        while let Some(child) = node.first_child() {
            node = child;
        }
        node
    }

    /// Pre-order traversal starting with `self`.
    pub fn descendants(self) -> impl Iterator<Item = Node<'a>> + 'a {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children().rev());
            Some(node)
        })
    }

    /// Leaves of the subtree in source order.
    pub fn leaves(self) -> impl Iterator<Item = Node<'a>> + 'a {
        self.descendants().filter(|node| node.is_leaf())
    }

    /// Renders the subtree as `value` for leaves and
    /// `value { child1,child2,... }` otherwise.
    #[must_use]
    pub fn tree_string(self) -> String {
        let mut out = String::new();
        self.write_tree_string(&mut out);
        out
    }

    fn write_tree_string(self, out: &mut String) {
        out.push_str(self.value());
        if self.is_leaf() {
            return;
        }
        out.push_str(" { ");
        for (i, child) in self.children().enumerate() {
            if i > 0 {
                out.push(',');
            }
            child.write_tree_string(out);
        }
        out.push_str(" }");
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("type", &self.label())
            .field("value", &self.value())
            .field("range", &self.source_range())
            .finish()
    }
}

impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tree_string())
    }
}

impl Serialize for Node<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let range = self.source_range();
        let mut state = serializer.serialize_struct("Node", 5)?;
        state.serialize_field("type", &self.label())?;
        state.serialize_field("value", self.value())?;
        state.serialize_field("start", &range.start)?;
        state.serialize_field("end", &range.end)?;
        state.serialize_field("children", &Children(*self))?;
        state.end()
    }
}

struct Children<'a>(Node<'a>);

impl Serialize for Children<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.child_count()))?;
        for child in self.0.children() {
            seq.serialize_element(&child)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(value: &str, ty: EntityType) -> SourceCodeEntity {
        SourceCodeEntity::new(value, ty, SourceRange::default())
    }

    fn sample() -> (Tree, [NodeId; 4]) {
        let mut tree = Tree::new(entity("method", EntityType::Method));
        let root = tree.root_id();
        let a = tree.create_child(root, entity("a();", EntityType::MethodInvocation));
        let cond = tree.create_child(root, entity("x", EntityType::WhileStatement));
        let b = tree.create_child(cond, entity("b++;", EntityType::PostfixExpression));
        let c = tree.create_child(root, entity("", EntityType::ReturnStatement));
        (tree, [a, cond, b, c])
    }

    #[test]
    fn navigation_is_derived_from_child_lists() {
        let (tree, [a, cond, b, c]) = sample();
        let root = tree.root();

        assert_eq!(root.child_count(), 3);
        assert_eq!(root.first_child().map(Node::id), Some(a));
        assert_eq!(root.last_child().map(Node::id), Some(c));
        assert_eq!(tree.node(a).next_sibling().map(Node::id), Some(cond));
        assert_eq!(tree.node(cond).previous_sibling().map(Node::id), Some(a));
        assert_eq!(tree.node(a).previous_sibling(), None);
        assert_eq!(tree.node(c).next_sibling(), None);
        assert_eq!(tree.node(b).parent().map(Node::id), Some(cond));
        assert_eq!(root.parent(), None);
        assert_eq!(root.next_sibling(), None);
        assert_eq!(tree.node(b).first_child(), None);
    }

    #[test]
    fn tree_string_joins_children_without_spaces() {
        let (tree, _) = sample();
        assert_eq!(tree.tree_string(), "method { a();,x { b++; }, }");
        assert_eq!(tree.root().to_string(), tree.tree_string());
    }

    #[test]
    fn traversal_orders() {
        let (tree, [a, cond, b, c]) = sample();
        let pre: Vec<NodeId> = tree.root().descendants().map(Node::id).collect();
        assert_eq!(pre, vec![tree.root_id(), a, cond, b, c]);
        let leaves: Vec<NodeId> = tree.root().leaves().map(Node::id).collect();
        assert_eq!(leaves, vec![a, b, c]);
        assert_eq!(tree.root().first_leaf().id(), a);
        assert_eq!(tree.node(cond).first_leaf().id(), b);
    }

    #[test]
    fn truncate_drops_dangling_children() {
        let (mut tree, [a, cond, _, _]) = sample();
        tree.truncate(3);
        assert_eq!(tree.len(), 3);
        let children: Vec<NodeId> = tree.root().children().map(Node::id).collect();
        assert_eq!(children, vec![a, cond]);
        assert!(tree.node(cond).is_leaf());
        assert_eq!(tree.get(NodeId::from_raw(3)), None);
    }
}
