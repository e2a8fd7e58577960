use super::{Element, NodeId, Selector};

#[derive(Clone, Debug)]
struct Node {
    element: Element,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// UI-agnostic element tree.
///
/// Nodes live in an arena and are addressed by [`NodeId`]. Detached nodes
/// keep their id but are no longer reachable from the root, so queries skip
/// them.
#[derive(Clone, Debug)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// Create an empty document holding only the root node.
    pub fn new() -> Self {
        Document {
            nodes: vec![Node {
                element: Element::new("#document"),
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append `element` as the last child of `parent`.
    ///
    /// Appending to an unknown parent attaches to the root instead.
    pub fn append(&mut self, parent: NodeId, element: Element) -> NodeId {
        let parent = if self.nodes.get(parent.0).is_some() {
            parent
        } else {
            self.root()
        };
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            element,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Remove `node` (and its subtree) from its parent.
    pub fn detach(&mut self, node: NodeId) {
        if node == self.root() {
            return;
        }
        let Some(parent) = self.nodes.get(node.0).and_then(|n| n.parent) else {
            return;
        };
        self.nodes[parent.0].children.retain(|&child| child != node);
        self.nodes[node.0].parent = None;
    }

    pub fn get(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node.0).map(|n| &n.element)
    }

    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(node.0).map(|n| &mut n.element)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Whether `node` is reachable from the root.
    pub fn contains(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.root() {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// All descendants of `node` in document order, excluding `node`.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    pub fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        selector.matches_in(self, node)
    }

    /// First descendant of `scope` matching `selector`.
    pub fn query(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|&id| self.matches(id, selector))
    }

    /// Every descendant of `scope` matching `selector`, in document order.
    pub fn query_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&id| self.matches(id, selector))
            .collect()
    }

    /// Live value of an input element.
    pub fn value(&self, node: NodeId) -> Option<&str> {
        self.get(node).and_then(|el| el.value.as_deref())
    }

    /// Set the live value of an element. Returns false for unknown nodes.
    pub fn set_value(&mut self, node: NodeId, value: &str) -> bool {
        match self.get_mut(node) {
            Some(el) => {
                el.value = Some(value.to_string());
                true
            }
            None => false,
        }
    }

    /// Own text followed by the text of every descendant.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut text = self.get(node).map(|el| el.text.clone()).unwrap_or_default();
        for id in self.descendants(node) {
            if let Some(el) = self.get(id) {
                text.push_str(&el.text);
            }
        }
        text
    }

    /// Replace the children of `node` with plain text.
    /// Returns false for unknown nodes.
    pub fn set_text_content(&mut self, node: NodeId, text: &str) -> bool {
        if self.get(node).is_none() {
            return false;
        }
        for child in std::mem::take(&mut self.nodes[node.0].children) {
            self.nodes[child.0].parent = None;
        }
        self.nodes[node.0].element.text = text.to_string();
        true
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(source: &str) -> Selector {
        Selector::parse(source).unwrap()
    }

    #[test]
    fn test_query_is_document_order_and_excludes_scope() {
        let mut doc = Document::new();
        let table = doc.append(doc.root(), Element::new("table").class("t"));
        let first = doc.append(table, Element::new("tr").class("r"));
        let nested = doc.append(first, Element::new("td").class("r"));
        let second = doc.append(table, Element::new("tr").class("r"));

        assert_eq!(doc.query_all(table, &sel(".r")), vec![first, nested, second]);
        assert_eq!(doc.query(first, &sel(".r")), Some(nested));
        assert_eq!(doc.query(doc.root(), &sel(".t")), Some(table));
        assert_eq!(doc.query(table, &sel(".t")), None);
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        let mut doc = Document::new();
        let cell = doc.append(doc.root(), Element::new("td").text("total: "));
        doc.append(cell, Element::new("div").text("3.5"));
        doc.append(cell, Element::new("div").text("h"));
        assert_eq!(doc.text_content(cell), "total: 3.5h");

        assert!(doc.set_text_content(cell, "4.00"));
        assert_eq!(doc.text_content(cell), "4.00");
        assert!(doc.children(cell).is_empty());
    }

    #[test]
    fn test_detach_removes_subtree_from_queries() {
        let mut doc = Document::new();
        let table = doc.append(doc.root(), Element::new("table").class("assign-table"));
        let row = doc.append(table, Element::new("tr").class("user-row"));

        doc.detach(table);
        assert!(!doc.contains(table));
        assert!(!doc.contains(row));
        assert_eq!(doc.query(doc.root(), &sel(".assign-table")), None);

        doc.detach(doc.root());
        assert!(doc.contains(doc.root()));
    }

    #[test]
    fn test_values() {
        let mut doc = Document::new();
        let input = doc.append(doc.root(), Element::input().class("log-input"));
        assert_eq!(doc.value(input), Some(""));
        assert!(doc.set_value(input, "2.5"));
        assert_eq!(doc.value(input), Some("2.5"));
        assert!(!doc.set_value(NodeId(99), "1"));
        assert_eq!(doc.value(NodeId(99)), None);
    }
}
