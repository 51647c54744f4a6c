use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::CheckError;
use crate::xml::tree::{Element, Node};

/// Serializes an element tree to indented XML text, with XML declaration.
pub fn print(element: &Element) -> Result<String, CheckError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut writer, element, None)?;
    let bytes = writer.into_inner();
    String::from_utf8(bytes)
        .map_err(|e| CheckError::MalformedDocument(format!("non-UTF-8 output: {}", e)))
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    element: &Element,
    inherited_ns: Option<&str>,
) -> Result<(), CheckError> {
    let tag = element.name().local_name().to_string();
    let mut start = BytesStart::new(tag.as_str());
    // Namespaced elements are emitted in default-namespace style.
    let ns = element.name().namespace_uri();
    if ns != inherited_ns {
        start.push_attribute(("xmlns", ns.unwrap_or("")));
    }
    for (name, value) in element.attributes() {
        start.push_attribute((name.local_name(), value.as_str()));
    }

    if element.children().is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in element.children() {
        match child {
            Node::Element(child) => write_element(writer, child, ns)?,
            Node::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
        }
    }
    writer.write_event(Event::End(BytesEnd::new(tag.as_str())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::tree::{Document, QName};

    #[test]
    fn prints_nested_elements_with_attributes() {
        let element = Element::new(QName::local("report"))
            .with_attribute("kind", "test")
            .with_child(Element::text_element("entry", "first"))
            .with_child(Element::new(QName::local("empty")));
        let printed = print(&element).unwrap();

        assert!(printed.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(printed.contains("<report kind=\"test\">"));
        assert!(printed.contains("<entry>first</entry>"));
        assert!(printed.contains("<empty/>"));
    }

    #[test]
    fn escapes_text_and_attribute_values() {
        let element = Element::new(QName::local("a"))
            .with_attribute("v", "x < y & z")
            .with_text("1 < 2");
        let printed = print(&element).unwrap();
        assert!(printed.contains("x &lt; y &amp; z"));
        assert!(printed.contains("1 &lt; 2"));
    }

    #[test]
    fn printed_output_parses_back_to_the_same_names() {
        let element = Element::new(QName::local("outer"))
            .with_child(Element::text_element("inner", "text"));
        let printed = print(&element).unwrap();
        let reparsed = Document::parse(&printed).unwrap();
        assert_eq!(reparsed.root().name().local_name(), "outer");
        assert_eq!(
            reparsed.root().first_child_named("inner").unwrap().text(),
            "text"
        );
    }
}
