//! In-memory page document.
//!
//! A [`Document`] is a parsed [`scraper::Html`] that the controllers also
//! write to, the way page scripts do: query by selector, walk up with
//! `closest`, read and write text, inner HTML, attributes, classes and
//! inline styles, create elements, clone subtrees and remove nodes.
//! Mutation goes straight through the parsed tree; selectors are plain
//! [`scraper::Selector`]s, so anything `scraper` parses can be queried.
//!
//! Detached nodes (created, cloned or removed) stay in the tree's storage
//! and can be re-attached; queries from the document root only see
//! connected nodes.
//!
//! # Handles
//!
//! A [`NodeId`] is only meaningful for the document that issued it. Every
//! accessor treats a handle that does not name an element as "no such
//! element" (empty text, no attributes, no matches) instead of panicking.

use ego_tree::NodeRef;
use html5ever::{ns, Attribute, LocalName, QualName};
use once_cell::sync::Lazy;
use scraper::node::{Element, Text};
use scraper::{CaseSensitivity, ElementRef, Html, Node, Selector, StrTendril};
use serde::{Serialize, Serializer};
use std::error::Error;
use std::fmt;

static BODY: Lazy<Selector> = Lazy::new(|| selector("body"));

/// Handle to an element in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(ego_tree::NodeId);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Error returned by [`parse_selector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    selector: String,
    reason: String,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid selector `{}`: {}", self.selector, self.reason)
    }
}

impl Error for QueryError {}

/// Parse a selector supplied at runtime (scripts, the CLI).
///
/// # Arguments
/// * `css` - Any selector list `scraper` understands, e.g. `nav > a[href]`.
///
/// # Returns
/// The compiled selector, or a [`QueryError`] carrying the parser's reason.
pub fn parse_selector(css: &str) -> Result<Selector, QueryError> {
    Selector::parse(css).map_err(|e| QueryError {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

/// Compile a selector written into the source.
///
/// # Panics
/// If `css` is not a valid selector.
pub fn selector(css: &'static str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector `{css}`: {e}"))
}

/// `prop: value` pairs of an inline style, in source order.
fn declarations(css: &str) -> impl Iterator<Item = (&str, &str)> {
    css.split(';')
        .filter_map(|decl| decl.split_once(':'))
        .map(|(p, v)| (p.trim(), v.trim()))
        .filter(|(p, v)| !p.is_empty() && !v.is_empty())
}

fn normalize_css(css: &str) -> Vec<(String, String)> {
    let mut style: Vec<(String, String)> = Vec::new();
    for (p, v) in declarations(css) {
        let p = p.to_ascii_lowercase();
        match style.iter_mut().find(|(q, _)| *q == p) {
            Some((_, old)) => *old = v.to_string(),
            None => style.push((p, v.to_string())),
        }
    }
    style
}

fn text_node(text: &str) -> Node {
    Node::Text(Text {
        text: StrTendril::from_slice(text),
    })
}

/// A parsed page that can be changed in place.
#[derive(Debug, Clone)]
pub struct Document {
    html: Html,
}

impl Document {
    /// Parse a full HTML page. Missing `<html>`, `<head>` and `<body>` are
    /// synthesized by the HTML5 parser.
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    fn node(&self, node: NodeId) -> Option<NodeRef<'_, Node>> {
        self.html.tree.get(node.0)
    }

    fn element(&self, node: NodeId) -> Option<ElementRef<'_>> {
        self.node(node).and_then(ElementRef::wrap)
    }

    fn id_of(element: ElementRef<'_>) -> NodeId {
        NodeId(element.id())
    }

    /// The `<html>` element.
    pub fn root(&self) -> NodeId {
        Self::id_of(self.html.root_element())
    }

    /// The `<body>` element, if the page has one.
    pub fn body(&self) -> Option<NodeId> {
        self.query_first(&BODY)
    }

    /// Lower-case tag name; empty for an unknown handle.
    pub fn tag(&self, node: NodeId) -> &str {
        self.element(node)
            .map(|el| el.value().name())
            .unwrap_or_default()
    }

    /// Parent element. `None` for `<html>` and for detached nodes.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?
            .parent()
            .and_then(ElementRef::wrap)
            .map(Self::id_of)
    }

    /// Child elements in order (text is skipped).
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.element(node)
            .map(|el| el.child_elements().map(Self::id_of).collect())
            .unwrap_or_default()
    }

    /// Whether `node` is reachable from the document root.
    pub fn is_connected(&self, node: NodeId) -> bool {
        let root = self.html.tree.root().id();
        self.node(node)
            .is_some_and(|n| n.id() == root || n.ancestors().any(|a| a.id() == root))
    }

    /// Whether `ancestor` is `node` or one of its ancestors, like
    /// `Node.contains`.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        ancestor == node
            || self
                .node(node)
                .is_some_and(|n| n.ancestors().any(|a| a.id() == ancestor.0))
    }

    /// `element.matches(selector)`
    pub fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        self.element(node).is_some_and(|el| selector.matches(&el))
    }

    /// All connected elements matching `selector`, in document order.
    pub fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.html
            .tree
            .root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| selector.matches(el))
            .map(Self::id_of)
            .collect()
    }

    pub fn query_first(&self, selector: &Selector) -> Option<NodeId> {
        self.html
            .tree
            .root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| selector.matches(el))
            .map(Self::id_of)
    }

    /// Matching descendants of `scope` (not `scope` itself), document order.
    pub fn query_within(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.element(scope)
            .map(|el| {
                el.descendent_elements()
                    .skip(1)
                    .filter(|d| selector.matches(d))
                    .map(Self::id_of)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn query_first_within(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.element(scope)?
            .descendent_elements()
            .skip(1)
            .find(|d| selector.matches(d))
            .map(Self::id_of)
    }

    /// `document.getElementById`: first connected element with that `id`.
    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.html
            .tree
            .root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().id() == Some(id))
            .map(Self::id_of)
    }

    /// Nearest inclusive ancestor matching `selector`.
    pub fn closest(&self, node: NodeId, selector: &Selector) -> Option<NodeId> {
        let start = self.node(node)?;
        std::iter::once(start)
            .chain(start.ancestors())
            .filter_map(ElementRef::wrap)
            .find(|el| selector.matches(el))
            .map(Self::id_of)
    }

    /// Concatenated descendant text, like `textContent`.
    pub fn text_content(&self, node: NodeId) -> String {
        self.element(node)
            .map(|el| el.text().collect())
            .unwrap_or_default()
    }

    /// Serialize the children of `node`.
    pub fn inner_html(&self, node: NodeId) -> String {
        self.element(node)
            .map(|el| el.inner_html())
            .unwrap_or_default()
    }

    /// Serialize `node` including its own tag.
    pub fn outer_html(&self, node: NodeId) -> String {
        self.element(node).map(|el| el.html()).unwrap_or_default()
    }

    fn detach_children(&mut self, node: NodeId) {
        let children: Vec<ego_tree::NodeId> = match self.node(node) {
            Some(n) => n.children().map(|c| c.id()).collect(),
            None => return,
        };
        for child in children {
            if let Some(mut child) = self.html.tree.get_mut(child) {
                child.detach();
            }
        }
    }

    /// Replace all children with a single text node, like assigning
    /// `textContent`. An empty `text` leaves the element empty.
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        if self.element(node).is_none() {
            return;
        }
        self.detach_children(node);
        if !text.is_empty() {
            self.append_text(node, text);
        }
    }

    /// Append a text node after the existing children.
    pub fn append_text(&mut self, node: NodeId, text: &str) {
        if self.element(node).is_none() {
            return;
        }
        if let Some(mut el) = self.html.tree.get_mut(node.0) {
            el.append(text_node(text));
        }
    }

    /// Replace all children with `html` parsed as a fragment, like
    /// assigning `innerHTML`.
    ///
    /// # Arguments
    /// * `node` - Element whose children are replaced.
    /// * `html` - Markup to parse; the parser repairs anything malformed.
    pub fn set_inner_html(&mut self, node: NodeId, html: &str) {
        if self.element(node).is_none() {
            return;
        }
        self.detach_children(node);

        // The fragment parser wraps its output in an `<html>` element.
        let fragment = Html::parse_fragment(html);
        let merged = self.html.tree.extend_tree(fragment.tree).id();
        let parsed: Vec<ego_tree::NodeId> = self
            .html
            .tree
            .get(merged)
            .and_then(|root| root.children().find(|c| c.value().is_element()))
            .map(|wrapper| wrapper.children().map(|c| c.id()).collect())
            .unwrap_or_default();
        if let Some(mut target) = self.html.tree.get_mut(node.0) {
            for child in parsed {
                target.append_id(child);
            }
        }
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let name = QualName::new(None, ns!(html), LocalName::from(tag.to_ascii_lowercase()));
        let element = Node::Element(Element::new(name, Vec::new()));
        NodeId(self.html.tree.orphan(element).id())
    }

    /// Move `child` to the end of `parent`'s children, detaching it from
    /// wherever it was.
    ///
    /// # Returns
    /// `false`, leaving the tree unchanged, when either handle is unknown or
    /// when `child` is `parent` or one of its ancestors.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.element(parent).is_none()
            || self.element(child).is_none()
            || self.contains(child, parent)
        {
            return false;
        }
        match self.html.tree.get_mut(parent.0) {
            Some(mut parent) => {
                parent.append_id(child.0);
                true
            }
            None => false,
        }
    }

    /// Detach `node` from its parent. Removing a detached node is a no-op.
    pub fn remove(&mut self, node: NodeId) {
        if self.element(node).is_none() {
            return;
        }
        if let Some(mut n) = self.html.tree.get_mut(node.0) {
            n.detach();
        }
    }

    /// Deep copy of `node`, like `cloneNode(true)`. The copy starts
    /// detached. `None` for an unknown handle.
    pub fn clone_subtree(&mut self, node: NodeId) -> Option<NodeId> {
        let value = self.element(node)?.value().clone();
        let copy = self.html.tree.orphan(Node::Element(value)).id();
        self.copy_children(node.0, copy);
        Some(NodeId(copy))
    }

    fn copy_children(&mut self, from: ego_tree::NodeId, to: ego_tree::NodeId) {
        let children: Vec<(ego_tree::NodeId, Node)> = self
            .html
            .tree
            .get(from)
            .map(|n| n.children().map(|c| (c.id(), c.value().clone())).collect())
            .unwrap_or_default();
        for (source, value) in children {
            let Some(mut target) = self.html.tree.get_mut(to) else {
                return;
            };
            let copy = target.append(value).id();
            self.copy_children(source, copy);
        }
    }

    /// Attribute value, like `getAttribute`. Covers `class` and `style` too.
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?.value().attr(name)
    }

    /// Rewrite the attribute list of `node`. The element is rebuilt so its
    /// cached `id` and class list follow the new attributes.
    fn edit_attrs(&mut self, node: NodeId, edit: impl FnOnce(&mut Vec<(String, String)>)) {
        let Some(mut n) = self.html.tree.get_mut(node.0) else {
            return;
        };
        let Node::Element(element) = n.value() else {
            return;
        };
        let mut attrs: Vec<(String, String)> = element
            .attrs()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        edit(&mut attrs);
        let attrs = attrs
            .into_iter()
            .map(|(name, value)| Attribute {
                name: QualName::new(None, ns!(), LocalName::from(name)),
                value: StrTendril::from_slice(&value),
            })
            .collect();
        *element = Element::new(element.name.clone(), attrs);
    }

    /// `setAttribute`.
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        self.edit_attrs(node, |attrs| match attrs.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => attrs.push((name.to_string(), value.to_string())),
        });
    }

    /// `removeAttribute`.
    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        if self.attr(node, name).is_some() {
            self.edit_attrs(node, |attrs| attrs.retain(|(n, _)| n != name));
        }
    }

    /// Class list in attribute order.
    pub fn classes(&self, node: NodeId) -> Vec<&str> {
        self.element(node)
            .map(|el| el.value().classes().collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|el| el.value().has_class(class, CaseSensitivity::CaseSensitive))
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if self.element(node).is_none() || self.has_class(node, class) {
            return;
        }
        let mut classes = self.classes(node).join(" ");
        if !classes.is_empty() {
            classes.push(' ');
        }
        classes.push_str(class);
        self.set_attr(node, "class", &classes);
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if !self.has_class(node, class) {
            return;
        }
        let classes = self
            .classes(node)
            .into_iter()
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attr(node, "class", &classes);
    }

    /// Inline style property, e.g. `style(card, "transform")`. The last
    /// declaration of a property wins, as in CSS.
    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        declarations(self.attr(node, "style")?)
            .filter(|(p, _)| p.eq_ignore_ascii_case(property))
            .last()
            .map(|(_, v)| v)
    }

    /// Inline declarations, one per property, last one winning.
    fn style_list(&self, node: NodeId) -> Vec<(String, String)> {
        self.attr(node, "style").map(normalize_css).unwrap_or_default()
    }

    fn write_style(&mut self, node: NodeId, style: &[(String, String)]) {
        if style.is_empty() {
            self.remove_attr(node, "style");
        } else {
            let css = style.iter().map(|(p, v)| format!("{p}: {v};")).collect::<Vec<_>>();
            self.set_attr(node, "style", &css.join(" "));
        }
    }

    /// Set one inline style property, keeping the others in place.
    ///
    /// # Arguments
    /// * `node` - Element to style.
    /// * `property` - CSS property name, e.g. `animation-play-state`.
    /// * `value` - New value, written verbatim.
    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if self.element(node).is_none() {
            return;
        }
        let property = property.to_ascii_lowercase();
        let mut style = self.style_list(node);
        match style.iter_mut().find(|(p, _)| *p == property) {
            Some((_, v)) => *v = value.to_string(),
            None => style.push((property, value.to_string())),
        }
        self.write_style(node, &style);
    }

    /// Drop one inline style property. The `style` attribute goes away with
    /// the last property.
    pub fn remove_style(&mut self, node: NodeId, property: &str) {
        if self.style(node, property).is_none() {
            return;
        }
        let mut style = self.style_list(node);
        style.retain(|(p, _)| !p.eq_ignore_ascii_case(property));
        self.write_style(node, &style);
    }

    /// Replace the whole inline style from `prop: value;` text.
    pub fn set_css_text(&mut self, node: NodeId, css: &str) {
        if self.element(node).is_some() {
            self.write_style(node, &normalize_css(css));
        }
    }

    /// Inline style serialized as `prop: value; ...`.
    pub fn css_text(&self, node: NodeId) -> String {
        self.style_list(node)
            .iter()
            .map(|(p, v)| format!("{p}: {v};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
