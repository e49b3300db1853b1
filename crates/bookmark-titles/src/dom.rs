//! Live HTML document standing in for the host page.
//!
//! [`Page`] wraps a `scraper` document and keeps it mutable: the rewriter
//! writes title markup and marker attributes, and the host side appends new
//! feed content. Every mutation is reported to registered observers as a
//! [`MutationRecord`], queued per observer until drained with
//! [`Page::take_records`].
//!
//! `scraper` types are `!Send`, so a `Page` lives on the thread that created
//! it. Nothing here blocks.

use ego_tree::{NodeId, NodeRef, Tree};
use scraper::{ElementRef, Html, Node, Selector};

/// Handle to an observer registered with [`Page::observe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(usize);

/// Which kinds of change an observer wants to hear about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserveOptions {
    pub child_list: bool,
    pub attributes: bool,
    pub character_data: bool,
    /// Also report changes anywhere below the observed node.
    pub subtree: bool,
}

impl ObserveOptions {
    /// Every change kind, subtree-deep.
    pub fn all() -> Self {
        Self {
            child_list: true,
            attributes: true,
            character_data: true,
            subtree: true,
        }
    }
}

/// Kind of a single change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    ChildList {
        added: Vec<NodeId>,
        removed: Vec<NodeId>,
    },
    Attributes {
        name: String,
    },
    CharacterData,
}

/// One change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    /// Node whose children, attributes, or text changed.
    pub target: NodeId,
    pub kind: MutationKind,
}

impl MutationRecord {
    /// Whether this record inserted at least one node.
    pub fn is_insertion(&self) -> bool {
        matches!(&self.kind, MutationKind::ChildList { added, .. } if !added.is_empty())
    }
}

#[derive(Debug)]
struct Observation {
    root: NodeId,
    options: ObserveOptions,
    pending: Vec<MutationRecord>,
}

/// A parsed, mutable HTML document.
pub struct Page {
    html: Html,
    observers: Vec<Observation>,
}

impl Page {
    /// Parse a full HTML document.
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
            observers: Vec::new(),
        }
    }

    /// Serialize the current state of the document.
    pub fn html(&self) -> String {
        self.html.html()
    }

    /// Whether any element in the document matches `selector`.
    pub fn exists(&self, selector: &Selector) -> bool {
        self.html.select(selector).next().is_some()
    }

    /// First element in the document matching `selector`.
    pub fn query(&self, selector: &Selector) -> Option<NodeId> {
        self.html.select(selector).next().map(|el| el.id())
    }

    /// First descendant of `scope` matching `selector`, in document order.
    /// `scope` itself is never returned.
    pub fn query_within(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        let scope_el = self.element(scope)?;
        scope_el
            .select(selector)
            .map(|el| el.id())
            .find(|id| *id != scope)
    }

    /// Every descendant of `scope` matching `selector`, in document order.
    pub fn query_all_within(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        match self.element(scope) {
            Some(scope_el) => scope_el
                .select(selector)
                .map(|el| el.id())
                .filter(|id| *id != scope)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Whether the element `id` matches `selector`. Non-elements never match.
    pub fn matches(&self, id: NodeId, selector: &Selector) -> bool {
        self.element(id).is_some_and(|el| selector.matches(&el))
    }

    /// Element children of `id`.
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        match self.html.tree.get(id) {
            Some(node) => node
                .children()
                .filter(|child| child.value().is_element())
                .map(|child| child.id())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Whether `node` is `ancestor` or lies below it.
    pub fn is_inclusive_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        match self.html.tree.get(node) {
            Some(node_ref) => {
                node_ref.id() == ancestor || node_ref.ancestors().any(|a| a.id() == ancestor)
            }
            None => false,
        }
    }

    /// Serialized markup of the children of `id`.
    pub fn inner_html(&self, id: NodeId) -> Option<String> {
        self.element(id).map(|el| el.inner_html())
    }

    /// Concatenated text of `id` and its descendants.
    pub fn text(&self, id: NodeId) -> Option<String> {
        self.element(id).map(|el| el.text().collect())
    }

    /// Attribute value on the element `id`.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.value().attr(name)
    }

    /// Set an attribute on the element `id`. Returns `false` if `id` is not
    /// an element.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> bool {
        let Some(mut node) = self.html.tree.get_mut(id) else {
            return false;
        };
        let Node::Element(element) = node.value() else {
            return false;
        };

        if let Some((_, slot)) = element
            .attrs
            .iter_mut()
            .find(|(qual, _)| &*qual.local == name)
        {
            *slot = value.into();
        } else {
            let mut qual = element.name.clone();
            qual.prefix = None;
            qual.ns = "".into();
            qual.local = name.into();
            element.attrs.insert(qual, value.into());
        }

        self.record(MutationRecord {
            target: id,
            kind: MutationKind::Attributes {
                name: name.to_string(),
            },
        });
        true
    }

    /// Replace the children of `id` with `markup`, parsed as an HTML
    /// fragment. Returns `false` if `id` is not an element.
    pub fn set_inner_html(&mut self, id: NodeId, markup: &str) -> bool {
        if self.element(id).is_none() {
            return false;
        }

        let mut removed = Vec::new();
        while let Some(mut node) = self.html.tree.get_mut(id) {
            let Some(mut child) = node.first_child() else {
                break;
            };
            removed.push(child.id());
            child.detach();
        }

        let fragment = Html::parse_fragment(markup);
        let added = copy_children(&mut self.html.tree, id, *fragment.root_element());

        self.record(MutationRecord {
            target: id,
            kind: MutationKind::ChildList { added, removed },
        });
        true
    }

    /// Append `markup`, parsed as an HTML fragment, to the children of
    /// `parent`. Returns the ids of the inserted top-level nodes.
    pub fn append_html(&mut self, parent: NodeId, markup: &str) -> Vec<NodeId> {
        if self.element(parent).is_none() {
            return Vec::new();
        }

        let fragment = Html::parse_fragment(markup);
        let added = copy_children(&mut self.html.tree, parent, *fragment.root_element());
        if !added.is_empty() {
            self.record(MutationRecord {
                target: parent,
                kind: MutationKind::ChildList {
                    added: added.clone(),
                    removed: Vec::new(),
                },
            });
        }
        added
    }

    /// Replace the content of the text node `id`. Returns `false` if `id` is
    /// not a text node.
    pub fn set_text(&mut self, id: NodeId, value: &str) -> bool {
        let Some(mut node) = self.html.tree.get_mut(id) else {
            return false;
        };
        let Node::Text(text) = node.value() else {
            return false;
        };
        text.text = value.into();

        self.record(MutationRecord {
            target: id,
            kind: MutationKind::CharacterData,
        });
        true
    }

    /// First text node below the element `id`.
    pub fn first_text_node(&self, id: NodeId) -> Option<NodeId> {
        self.html
            .tree
            .get(id)?
            .descendants()
            .find(|node| node.value().is_text())
            .map(|node| node.id())
    }

    /// Start recording changes at and below `root`.
    pub fn observe(&mut self, root: NodeId, options: ObserveOptions) -> ObserverId {
        self.observers.push(Observation {
            root,
            options,
            pending: Vec::new(),
        });
        ObserverId(self.observers.len() - 1)
    }

    /// Drain the records queued for `observer`, oldest first.
    pub fn take_records(&mut self, observer: ObserverId) -> Vec<MutationRecord> {
        self.observers
            .get_mut(observer.0)
            .map(|o| std::mem::take(&mut o.pending))
            .unwrap_or_default()
    }

    /// Whether any records are queued for `observer`.
    pub fn has_records(&self, observer: ObserverId) -> bool {
        self.observers
            .get(observer.0)
            .is_some_and(|o| !o.pending.is_empty())
    }

    fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.html.tree.get(id).and_then(ElementRef::wrap)
    }

    fn record(&mut self, record: MutationRecord) {
        let mut interested = Vec::new();
        for (idx, obs) in self.observers.iter().enumerate() {
            let wanted = match record.kind {
                MutationKind::ChildList { .. } => obs.options.child_list,
                MutationKind::Attributes { .. } => obs.options.attributes,
                MutationKind::CharacterData => obs.options.character_data,
            };
            if !wanted {
                continue;
            }
            let in_scope = if obs.options.subtree {
                self.is_inclusive_descendant(record.target, obs.root)
            } else {
                record.target == obs.root
            };
            if in_scope {
                interested.push(idx);
            }
        }
        for idx in interested {
            self.observers[idx].pending.push(record.clone());
        }
    }
}

/// Deep-copy the children of `source` (from another tree) under `dest`.
/// Returns the ids of the copied top-level nodes.
fn copy_children(tree: &mut Tree<Node>, dest: NodeId, source: NodeRef<'_, Node>) -> Vec<NodeId> {
    let mut added = Vec::new();
    for child in source.children() {
        let Some(mut parent) = tree.get_mut(dest) else {
            break;
        };
        let id = parent.append(child.value().clone()).id();
        copy_children(tree, id, child);
        added.push(id);
    }
    added
}
