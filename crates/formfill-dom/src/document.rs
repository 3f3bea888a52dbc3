use crate::selector::{SelectorError, SelectorList};
use formfill_common::dom::{DocumentQuery, DomElement};
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Index of a node inside its [`Document`] arena.
pub type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),
    #[error("Node {0} cannot have children")]
    NotAContainer(NodeId),
    #[error("Appending node {child} under {parent} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },
}

#[derive(Debug, Clone)]
enum NodeData {
    Root,
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed document tree.
///
/// Node 0 is a synthetic root. Elements created with [`Document::create_element`]
/// stay detached until appended somewhere under the root; detached elements
/// have no owner document and are invisible to selector queries.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                data: NodeData::Root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    /// Create a detached element. Tag names are stored lowercase.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::Element {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
        })
    }

    /// Set or replace an attribute. Names are stored lowercase.
    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: &str,
        value: &str,
    ) -> Result<(), DocumentError> {
        let node = self.nodes.get_mut(id).ok_or(DocumentError::UnknownNode(id))?;
        let NodeData::Element { attributes, .. } = &mut node.data else {
            return Err(DocumentError::NotAContainer(id));
        };

        let name = name.to_ascii_lowercase();
        match attributes.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => attributes.push((name, value.to_string())),
        }
        Ok(())
    }

    /// Move `child` to the end of `parent`'s children.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DocumentError> {
        if parent >= self.nodes.len() {
            return Err(DocumentError::UnknownNode(parent));
        }
        if child >= self.nodes.len() || child == ROOT {
            return Err(DocumentError::UnknownNode(child));
        }
        if matches!(self.nodes[parent].data, NodeData::Text(_)) {
            return Err(DocumentError::NotAContainer(parent));
        }
        if self.ancestors_and_self(parent).any(|n| n == child) {
            return Err(DocumentError::Cycle { parent, child });
        }

        if let Some(old) = self.nodes[child].parent.take() {
            self.nodes[old].children.retain(|&c| c != child);
        }
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        Ok(())
    }

    /// Append a text node under `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Result<NodeId, DocumentError> {
        let id = self.push(NodeData::Text(text.to_string()));
        self.append_child(parent, id)?;
        Ok(id)
    }

    /// Handle to an element node; `None` for text, the root, or unknown ids.
    pub fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        match self.nodes.get(id)?.data {
            NodeData::Element { .. } => Some(ElementRef { doc: self, id }),
            _ => None,
        }
    }

    /// Connected elements in document order.
    pub fn elements(&self) -> Vec<ElementRef<'_>> {
        let mut out = Vec::new();
        self.collect_elements(ROOT, &mut out);
        out
    }

    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<ElementRef<'_>>, SelectorError> {
        let list = SelectorList::parse(selector)?;
        Ok(self
            .elements()
            .into_iter()
            .filter(|el| list.matches(*el))
            .collect())
    }

    pub fn query_selector(&self, selector: &str) -> Result<Option<ElementRef<'_>>, SelectorError> {
        let list = SelectorList::parse(selector)?;
        Ok(self.elements().into_iter().find(|el| list.matches(*el)))
    }

    pub fn is_connected(&self, id: NodeId) -> bool {
        self.ancestors_and_self(id).any(|n| n == ROOT)
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        self.nodes.len() - 1
    }

    fn ancestors_and_self(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |&n| self.nodes.get(n).and_then(|node| node.parent))
    }

    fn collect_elements<'a>(&'a self, id: NodeId, out: &mut Vec<ElementRef<'a>>) {
        for &child in &self.nodes[id].children {
            if matches!(self.nodes[child].data, NodeData::Element { .. }) {
                out.push(ElementRef { doc: self, id: child });
                self.collect_elements(child, out);
            }
        }
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id].data {
            NodeData::Text(t) => out.push_str(t),
            _ => {
                for &child in &self.nodes[id].children {
                    self.collect_text(child, out);
                }
            }
        }
    }
}

impl DocumentQuery for Document {
    fn count_matching(&self, selector: &str) -> Option<usize> {
        match self.query_selector_all(selector) {
            Ok(found) => Some(found.len()),
            Err(e) => {
                tracing::debug!(selector, error = %e, "selector query failed");
                None
            }
        }
    }
}

/// Borrowed handle to one element of a [`Document`].
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> ElementRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    pub fn tag(&self) -> &'a str {
        match &self.doc.nodes[self.id].data {
            NodeData::Element { tag, .. } => tag,
            _ => "",
        }
    }

    pub fn attributes(&self) -> &'a [(String, String)] {
        match &self.doc.nodes[self.id].data {
            NodeData::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.attributes()
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn parent_element(&self) -> Option<ElementRef<'a>> {
        let parent = self.doc.nodes[self.id].parent?;
        self.doc.element(parent)
    }

    pub fn child_elements(&self) -> Vec<ElementRef<'a>> {
        self.doc.nodes[self.id]
            .children
            .iter()
            .filter_map(|&c| self.doc.element(c))
            .collect()
    }

    pub fn text(&self) -> String {
        let mut out = String::new();
        self.doc.collect_text(self.id, &mut out);
        out
    }
}

impl PartialEq for ElementRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for ElementRef<'_> {}

impl Hash for ElementRef<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<'a> DomElement for ElementRef<'a> {
    type Document = Document;

    fn tag_name(&self) -> String {
        self.tag().to_string()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attr(name).map(str::to_string)
    }

    fn text_content(&self) -> Option<String> {
        Some(self.text())
    }

    fn parent(&self) -> Option<Self> {
        self.parent_element()
    }

    fn children(&self) -> Vec<Self> {
        self.child_elements()
    }

    fn owner_document(&self) -> Option<&Document> {
        self.doc.is_connected(self.id).then_some(self.doc)
    }
}
