//! Server-side HTML rendering.
//!
//! Pages are built as a tree of [`Node`]s and serialized through
//! [`maud::Render`]. Text and attribute values are escaped on the way out, so
//! handlers can put user content straight into the tree.

mod pages;
mod time;

pub use pages::{compose, feed, login, not_allowed, not_found};
pub use time::relative_time;

use maud::{DOCTYPE, Render, html};

/// Elements that never have children or a closing tag.
const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: &'static str,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Append a child only when there is one.
    pub fn child_opt(self, node: Option<impl Into<Node>>) -> Self {
        match node {
            Some(node) => self.child(node),
            None => self,
        }
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

/// Shorthand for [`Element::new`].
pub fn el(tag: &'static str) -> Element {
    Element::new(tag)
}

impl Node {
    pub fn to_html(&self) -> String {
        self.render().into_string()
    }
}

impl Render for Node {
    fn render_to(&self, buffer: &mut String) {
        match self {
            Node::Text(text) => text.as_str().render_to(buffer),
            Node::Element(element) => element.render_to(buffer),
        }
    }
}

impl Render for Element {
    fn render_to(&self, buffer: &mut String) {
        buffer.push('<');
        buffer.push_str(self.tag);
        for (name, value) in &self.attrs {
            buffer.push(' ');
            buffer.push_str(name);
            buffer.push_str("=\"");
            value.as_str().render_to(buffer);
            buffer.push('"');
        }
        buffer.push('>');

        if VOID_TAGS.contains(&self.tag) {
            return;
        }

        for child in &self.children {
            child.render_to(buffer);
        }
        buffer.push_str("</");
        buffer.push_str(self.tag);
        buffer.push('>');
    }
}

/// Render a full page: `content` inside the shared shell.
pub fn render(content: impl Into<Node>, signed_in: bool) -> String {
    let page = pages::shell(content.into(), signed_in);
    html! {
        (DOCTYPE)
        (page)
    }
    .into_string()
}
