//! Tree construction capability used by the parser.
//!
//! The parser never touches a concrete tree type. It drives a [`TreeSink`],
//! so the same grammar can build the owned [`Document`] (via
//! [`DocumentBuilder`]), a foreign DOM, or a recording test double.

use indexmap::IndexMap;

use super::ast::{Document, Element, Node};

/// The five tree-construction primitives the parser needs.
///
/// Handles are opaque to the parser. Elements are created detached and
/// attached to their parent with [`append_child`](TreeSink::append_child)
/// once their own attributes and children are complete.
pub trait TreeSink {
    /// Reference to a document, element, or text node.
    type Handle: Clone;

    /// Create the document that will hold the root element.
    fn new_document(&mut self) -> Self::Handle;

    /// Create a detached element.
    fn create_element(&mut self, name: &str) -> Self::Handle;

    /// Create a detached text node.
    fn create_text_node(&mut self, text: &str) -> Self::Handle;

    /// Set an attribute; a repeated name overwrites the earlier value.
    fn set_attribute(&mut self, element: &Self::Handle, name: &str, value: &str);

    /// Append `child` to `parent` (an element or the document).
    fn append_child(&mut self, parent: &Self::Handle, child: Self::Handle);
}

impl<T: TreeSink + ?Sized> TreeSink for &mut T {
    type Handle = T::Handle;

    fn new_document(&mut self) -> Self::Handle {
        (**self).new_document()
    }

    fn create_element(&mut self, name: &str) -> Self::Handle {
        (**self).create_element(name)
    }

    fn create_text_node(&mut self, text: &str) -> Self::Handle {
        (**self).create_text_node(text)
    }

    fn set_attribute(&mut self, element: &Self::Handle, name: &str, value: &str) {
        (**self).set_attribute(element, name, value);
    }

    fn append_child(&mut self, parent: &Self::Handle, child: Self::Handle) {
        (**self).append_child(parent, child);
    }
}

// ── DocumentBuilder ──────────────────────────────────────────────────────

/// Handle into a [`DocumentBuilder`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
enum Slot {
    Document {
        root: Option<NodeId>,
    },
    Element {
        name: String,
        attributes: IndexMap<String, String>,
        children: Vec<NodeId>,
    },
    Text(String),
}

/// Arena-backed [`TreeSink`] that assembles an owned [`Document`].
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    slots: Vec<Slot>,
}

impl DocumentBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, slot: Slot) -> NodeId {
        self.slots.push(slot);
        NodeId(self.slots.len() - 1)
    }

    /// Assemble the document identified by `document`.
    ///
    /// Returns `None` if `document` is not a document handle or no root
    /// element was ever appended to it.
    pub fn build(self, document: NodeId) -> Option<Document> {
        let mut slots: Vec<Option<Slot>> = self.slots.into_iter().map(Some).collect();
        let root = match slots.get_mut(document.0)?.take()? {
            Slot::Document { root } => root?,
            _ => return None,
        };
        match take_node(&mut slots, root)? {
            Node::Element(root) => Some(Document::new(root)),
            Node::Text { .. } => None,
        }
    }
}

fn take_node(slots: &mut [Option<Slot>], id: NodeId) -> Option<Node> {
    match slots.get_mut(id.0)?.take()? {
        Slot::Text(content) => Some(Node::Text { content }),
        Slot::Element {
            name,
            attributes,
            children,
        } => {
            let children = children
                .into_iter()
                .filter_map(|child| take_node(slots, child))
                .collect();
            Some(Node::Element(Element {
                name,
                attributes,
                children,
            }))
        }
        Slot::Document { .. } => None,
    }
}

impl TreeSink for DocumentBuilder {
    type Handle = NodeId;

    fn new_document(&mut self) -> NodeId {
        self.alloc(Slot::Document { root: None })
    }

    fn create_element(&mut self, name: &str) -> NodeId {
        self.alloc(Slot::Element {
            name: name.to_owned(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        })
    }

    fn create_text_node(&mut self, text: &str) -> NodeId {
        self.alloc(Slot::Text(text.to_owned()))
    }

    fn set_attribute(&mut self, element: &NodeId, name: &str, value: &str) {
        match self.slots.get_mut(element.0) {
            Some(Slot::Element { attributes, .. }) => {
                attributes.insert(name.to_owned(), value.to_owned());
            }
            _ => log::warn!("set_attribute on non-element handle {element:?} ignored"),
        }
    }

    fn append_child(&mut self, parent: &NodeId, child: NodeId) {
        match self.slots.get_mut(parent.0) {
            Some(Slot::Element { children, .. }) => children.push(child),
            Some(Slot::Document { root }) => {
                if root.replace(child).is_some() {
                    log::warn!("document root replaced by {child:?}");
                }
            }
            _ => log::warn!("append_child on leaf handle {parent:?} ignored"),
        }
    }
}
