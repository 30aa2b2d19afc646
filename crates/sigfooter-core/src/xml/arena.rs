use super::node::XmlNodeData;
use super::xname::{XAttribute, XName};
use indextree::{Arena, NodeId};

/// Parsed XML part held as an arena tree. `NodeId`s act as element handles and
/// stay valid until their subtree is removed.
#[derive(Debug)]
pub struct XmlDocument {
    arena: Arena<XmlNodeData>,
    root: Option<NodeId>,
}

impl XmlDocument {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&XmlNodeData> {
        self.arena
            .get(id)
            .filter(|node| !node.is_removed())
            .map(|node| node.get())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut XmlNodeData> {
        self.arena
            .get_mut(id)
            .filter(|node| !node.is_removed())
            .map(|node| node.get_mut())
    }

    pub fn add_root(&mut self, data: XmlNodeData) -> NodeId {
        let id = self.arena.new_node(data);
        self.root = Some(id);
        id
    }

    pub fn add_child(&mut self, parent: NodeId, data: XmlNodeData) -> NodeId {
        let child = self.arena.new_node(data);
        parent.append(child, &mut self.arena);
        child
    }

    pub fn prepend_child(&mut self, parent: NodeId, data: XmlNodeData) -> NodeId {
        let child = self.arena.new_node(data);
        parent.prepend(child, &mut self.arena);
        child
    }

    pub fn add_before(&mut self, sibling: NodeId, data: XmlNodeData) -> NodeId {
        let new_node = self.arena.new_node(data);
        sibling.insert_before(new_node, &mut self.arena);
        new_node
    }

    pub fn add_after(&mut self, sibling: NodeId, data: XmlNodeData) -> NodeId {
        let new_node = self.arena.new_node(data);
        sibling.insert_after(new_node, &mut self.arena);
        new_node
    }

    /// Detach `node` and drop its whole subtree. Siblings keep their order.
    pub fn remove_subtree(&mut self, node: NodeId) {
        node.remove_subtree(&mut self.arena);
        if self.root == Some(node) {
            self.root = None;
        }
    }

    /// Unlink `node` from its parent. The subtree stays in the arena, but
    /// nothing under the root reaches it any more.
    pub fn detach(&mut self, node: NodeId) {
        node.detach(&mut self.arena);
        if self.root == Some(node) {
            self.root = None;
        }
    }

    /// Deep-copy `node` (and its descendants) from `src` into this arena. The
    /// copy has no parent until it is attached.
    pub fn import_subtree(&mut self, src: &XmlDocument, node: NodeId) -> Option<NodeId> {
        let data = src.get(node)?.clone();
        let copy = self.arena.new_node(data);
        for child in src.children(node) {
            if let Some(child_copy) = self.import_subtree(src, child) {
                copy.append(child_copy, &mut self.arena);
            }
        }
        Some(copy)
    }

    /// Deep-copy `node` from `src` as the last child of `parent`.
    pub fn append_imported(
        &mut self,
        parent: NodeId,
        src: &XmlDocument,
        node: NodeId,
    ) -> Option<NodeId> {
        let copy = self.import_subtree(src, node)?;
        parent.append(copy, &mut self.arena);
        Some(copy)
    }

    /// Deep-copy `node` from `src` as the preceding sibling of `anchor`.
    pub fn insert_subtree_before(
        &mut self,
        anchor: NodeId,
        src: &XmlDocument,
        node: NodeId,
    ) -> Option<NodeId> {
        let copy = self.import_subtree(src, node)?;
        anchor.insert_before(copy, &mut self.arena);
        Some(copy)
    }

    /// Deep-copy `node` from `src` as the following sibling of `anchor`.
    pub fn insert_subtree_after(
        &mut self,
        anchor: NodeId,
        src: &XmlDocument,
        node: NodeId,
    ) -> Option<NodeId> {
        let copy = self.import_subtree(src, node)?;
        anchor.insert_after(copy, &mut self.arena);
        Some(copy)
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &XName, value: &str) {
        if let Some(node_data) = self.get_mut(node) {
            if let Some(attrs) = node_data.attributes_mut() {
                if let Some(attr) = attrs.iter_mut().find(|a| &a.name == name) {
                    attr.value = value.to_string();
                } else {
                    attrs.push(XAttribute::new(name.clone(), value));
                }
            }
        }
    }

    pub fn attribute(&self, node: NodeId, name: &XName) -> Option<&str> {
        self.get(node)?.attribute(name)
    }

    pub fn is_named(&self, node: NodeId, namespace: &str, local_name: &str) -> bool {
        self.get(node)
            .is_some_and(|data| data.is_named(namespace, local_name))
    }

    pub fn children(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        parent.children(&self.arena)
    }

    /// Element children only, skipping text, comments and processing instructions.
    pub fn child_elements(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(parent)
            .filter(move |&id| self.get(id).is_some_and(|d| d.is_element()))
    }

    /// Includes `node` itself, then its descendants in document order.
    pub fn descendants(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        node.descendants(&self.arena)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node)?.parent()
    }

    /// Includes `node` itself, then its ancestors up to the root.
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        node.ancestors(&self.arena)
    }

    /// Lazily yields every node under `start` (inclusive) accepted by `predicate`,
    /// in document order. Calling it again restarts the walk.
    pub fn find_all<'a, P>(&'a self, start: NodeId, predicate: P) -> impl Iterator<Item = NodeId> + 'a
    where
        P: Fn(&XmlNodeData) -> bool + 'a,
    {
        self.descendants(start)
            .filter(move |&id| self.get(id).is_some_and(&predicate))
    }

    /// Every element under `start` (inclusive) with the given name.
    pub fn find_elements<'a>(
        &'a self,
        start: NodeId,
        namespace: &'a str,
        local_name: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.find_all(start, move |data| data.is_named(namespace, local_name))
    }

    pub fn elements_by_name<'a>(
        &'a self,
        parent: NodeId,
        name: &'a XName,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.children(parent).filter(move |&child_id| {
            self.get(child_id)
                .and_then(|data| data.name())
                .map(|n| n == name)
                .unwrap_or(false)
        })
    }

    /// Concatenated text of every text and CDATA node under `node`.
    pub fn text_content(&self, node: NodeId) -> String {
        self.descendants(node)
            .filter_map(|id| self.get(id).and_then(|d| d.text_content()))
            .collect()
    }
}

impl Default for XmlDocument {
    fn default() -> Self {
        Self::new()
    }
}
