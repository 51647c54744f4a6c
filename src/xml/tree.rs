use std::path::Path;

use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;

use crate::error::CheckError;

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Names
///////////////////////////////////////////////////////////////////////////////////////////////////

/// Namespace-qualified element or attribute name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    namespace_uri: Option<String>,
    local_name: String,
}

impl QName {
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace_uri: None,
            local_name: local_name.into(),
        }
    }

    pub fn namespaced(namespace_uri: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace_uri: Some(namespace_uri.into()),
            local_name: local_name.into(),
        }
    }

    pub fn namespace_uri(&self) -> Option<&str> {
        self.namespace_uri.as_deref()
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }
}

impl std::fmt::Display for QName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.namespace_uri {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Nodes
///////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// Immutable namespace-aware element node.
///
/// Attributes and children keep document order. Typed views borrow these
/// nodes and never copy subtrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: QName,
    attributes: Vec<(QName, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: QName) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn text_element(local_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(QName::local(local_name)).with_text(text)
    }

    pub fn with_attribute(mut self, local_name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((QName::local(local_name), value.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn name(&self) -> &QName {
        &self.name
    }

    pub fn attributes(&self) -> &[(QName, String)] {
        &self.attributes
    }

    /// Looks up an unprefixed attribute by local name.
    pub fn attribute(&self, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name.namespace_uri().is_none() && name.local_name() == local_name)
            .map(|(_, value)| value.as_str())
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Child elements matched by local name only, in document order.
    pub fn children_named<'a>(&'a self, local_name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.child_elements()
            .filter(move |e| e.name().local_name() == local_name)
    }

    /// Child elements matched by namespace URI and local name, in document order.
    pub fn children_named_ns<'a>(
        &'a self,
        namespace_uri: &'a str,
        local_name: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.child_elements().filter(move |e| {
            e.name().namespace_uri() == Some(namespace_uri) && e.name().local_name() == local_name
        })
    }

    pub fn first_child_named<'a>(&'a self, local_name: &'a str) -> Option<&'a Element> {
        self.children_named(local_name).next()
    }

    pub fn first_child_named_ns<'a>(
        &'a self,
        namespace_uri: &'a str,
        local_name: &'a str,
    ) -> Option<&'a Element> {
        self.children_named_ns(namespace_uri, local_name).next()
    }

    /// Concatenated direct text content.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(t) => Some(t.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Documents
///////////////////////////////////////////////////////////////////////////////////////////////////

/// A parsed XML document owning its element tree.
#[derive(Debug, Clone)]
pub struct Document {
    root: Element,
}

impl Document {
    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CheckError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(xml: &str) -> Result<Self, CheckError> {
        let mut reader = NsReader::from_str(xml);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_resolved_event()? {
                (ns, Event::Start(start)) => {
                    let namespace = namespace_of(ns)?;
                    let element = read_element(&reader, namespace, &start)?;
                    stack.push(element);
                }
                (ns, Event::Empty(start)) => {
                    let namespace = namespace_of(ns)?;
                    let element = read_element(&reader, namespace, &start)?;
                    attach(element, &mut stack, &mut root)?;
                }
                (_, Event::End(_)) => {
                    let element = stack.pop().ok_or_else(|| {
                        CheckError::MalformedDocument("unexpected closing tag".to_string())
                    })?;
                    attach(element, &mut stack, &mut root)?;
                }
                (_, Event::Text(text)) => {
                    let text = text.unescape()?;
                    if let Some(parent) = stack.last_mut() {
                        if !text.trim().is_empty() {
                            parent.children.push(Node::Text(text.into_owned()));
                        }
                    }
                }
                (_, Event::CData(cdata)) => {
                    let text = String::from_utf8_lossy(&cdata.into_inner()).into_owned();
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(Node::Text(text));
                    }
                }
                (_, Event::Eof) => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(CheckError::MalformedDocument(
                "unexpected end of document".to_string(),
            ));
        }
        root.map(|root| Document { root }).ok_or_else(|| {
            CheckError::MalformedDocument("document has no root element".to_string())
        })
    }
}

fn read_element(
    reader: &NsReader<&[u8]>,
    namespace: Option<String>,
    start: &quick_xml::events::BytesStart,
) -> Result<Element, CheckError> {
    let mut element = Element::new(name_of(namespace, start.local_name().as_ref()));
    for attribute in start.attributes() {
        let attribute = attribute?;
        if attribute.key.as_namespace_binding().is_some() {
            continue;
        }
        let (attr_ns, attr_local) = reader.resolve_attribute(attribute.key);
        let attr_name = name_of(namespace_of(attr_ns)?, attr_local.as_ref());
        let value = attribute.unescape_value()?.into_owned();
        element.attributes.push((attr_name, value));
    }
    Ok(element)
}

fn namespace_of(ns: ResolveResult) -> Result<Option<String>, CheckError> {
    match ns {
        ResolveResult::Bound(namespace) => {
            Ok(Some(String::from_utf8_lossy(namespace.as_ref()).into_owned()))
        }
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(CheckError::MalformedDocument(format!(
            "undeclared namespace prefix {:?}",
            String::from_utf8_lossy(&prefix)
        ))),
    }
}

fn name_of(namespace: Option<String>, local_name: &[u8]) -> QName {
    let local_name = String::from_utf8_lossy(local_name).into_owned();
    match namespace {
        Some(namespace) => QName::namespaced(namespace, local_name),
        None => QName::local(local_name),
    }
}

fn attach(
    element: Element,
    stack: &mut Vec<Element>,
    root: &mut Option<Element>,
) -> Result<(), CheckError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(Node::Element(element));
            Ok(())
        }
        None if root.is_none() => {
            let _ = root.insert(element);
            Ok(())
        }
        None => Err(CheckError::MalformedDocument(
            "document has more than one root element".to_string(),
        )),
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    const SERVER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
        <server description="test server">
            <featureManager>
                <feature>jndi-1.0</feature>
                <feature>servlet-6.0</feature>
            </featureManager>
            <jndiEntry jndiName="jdbc/myDS" value="ignored"/>
        </server>"#;

    #[test]
    fn parses_elements_attributes_and_text() {
        let doc = Document::parse(SERVER_XML).unwrap();
        let root = doc.root();
        assert_eq!(root.name().local_name(), "server");
        assert_eq!(root.name().namespace_uri(), None);
        assert_eq!(root.attribute("description"), Some("test server"));
        assert_eq!(root.attribute("nonexistent"), None);

        let features = root
            .first_child_named("featureManager")
            .unwrap()
            .children_named("feature")
            .map(|e| e.text())
            .collect::<Vec<_>>();
        assert_eq!(features, vec!["jndi-1.0", "servlet-6.0"]);

        let entry = root.first_child_named("jndiEntry").unwrap();
        assert_eq!(entry.attribute("jndiName"), Some("jdbc/myDS"));
    }

    #[test]
    fn resolves_default_namespaces() {
        let xml = r#"<ejb-jar xmlns="https://jakarta.ee/xml/ns/jakartaee">
            <enterprise-beans><session/></enterprise-beans>
        </ejb-jar>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root();
        assert_eq!(
            root.name().namespace_uri(),
            Some("https://jakarta.ee/xml/ns/jakartaee")
        );
        let beans = root
            .first_child_named_ns("https://jakarta.ee/xml/ns/jakartaee", "enterprise-beans")
            .unwrap();
        assert_eq!(beans.children_named("session").count(), 1);
    }

    #[test]
    fn resolves_prefixed_namespaces_on_elements() {
        let xml = r#"<j:root xmlns:j="urn:test"><j:child/><other/></j:root>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root();
        assert_eq!(root.name().namespace_uri(), Some("urn:test"));
        assert_eq!(root.children_named_ns("urn:test", "child").count(), 1);
        // Unprefixed children stay outside the prefixed namespace.
        assert_eq!(
            root.first_child_named("other").unwrap().name().namespace_uri(),
            None
        );
    }

    #[test]
    fn name_filtered_queries_ignore_namespace_when_asked() {
        let xml = r#"<root xmlns="urn:test"><child/></root>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(doc.root().children_named("child").count(), 1);
        assert_eq!(doc.root().children_named_ns("urn:other", "child").count(), 0);
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(matches!(
            Document::parse("<a><b></a>"),
            Err(CheckError::Xml(_)) | Err(CheckError::MalformedDocument(_))
        ));
        assert!(matches!(
            Document::parse("   "),
            Err(CheckError::MalformedDocument(_))
        ));
    }

    #[test]
    fn unescapes_attribute_values_and_text() {
        let xml = r#"<a name="x &amp; y">a &lt; b</a>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(doc.root().attribute("name"), Some("x & y"));
        assert_eq!(doc.root().text(), "a < b");
    }
}
