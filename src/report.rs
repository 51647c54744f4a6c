use crate::correlate::{Correlation, CorrelationReport};
use crate::resources::{ElementId, ResourceDeclaration, ResourceOccurrence};
use crate::xml::tree::{Element, QName};

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Resource occurrence reports
///////////////////////////////////////////////////////////////////////////////////////////////////

/// Renders the flat declaration list as an element tree.
pub fn occurrences_to_xml(occurrences: &[ResourceOccurrence]) -> Element {
    occurrences.iter().fold(
        Element::new(QName::local("resourceAnnotationOccurrences")),
        |report, occurrence| report.with_child(occurrence_to_xml(occurrence)),
    )
}

fn occurrence_to_xml(occurrence: &ResourceOccurrence) -> Element {
    Element::new(QName::local("resourceAnnotationOccurrence"))
        .with_child(element_id_to_xml(&occurrence.element))
        .with_child(annotation_to_xml(&occurrence.declaration))
}

/// One rendering rule per identity variant. Variants without a structured
/// rendering of their own fall through to a generic text element, so identity
/// kinds the renderer does not specially know about still render.
pub fn element_id_to_xml(element: &ElementId) -> Element {
    match element {
        ElementId::Type { .. } => Element::text_element("class", element.to_string()),
        ElementId::Field { class, .. } => Element::new(QName::local("field"))
            .with_attribute("class", class)
            .with_text(element.to_string()),
        ElementId::Method { class, .. } => Element::new(QName::local("method"))
            .with_attribute("class", class)
            .with_text(element.to_string()),
        ElementId::Constructor { class, .. } => Element::new(QName::local("constructor"))
            .with_attribute("class", class)
            .with_text(element.to_string()),
        ElementId::Parameter { executable, .. } => Element::new(QName::local("parameter"))
            .with_attribute("executable", executable)
            .with_text(element.to_string()),
        other => Element::text_element(other.xml_tag(), other.to_string()),
    }
}

fn annotation_to_xml(declaration: &ResourceDeclaration) -> Element {
    Element::new(QName::local("annotation"))
        .with_attribute("annotationType", "jakarta.annotation.Resource")
        .with_child(Element::text_element("name", &declaration.name))
        .with_child(Element::text_element("description", &declaration.description))
        .with_child(Element::text_element("shareable", declaration.shareable.to_string()))
        .with_child(Element::text_element("lookup", &declaration.lookup))
        .with_child(Element::text_element("type", &declaration.type_name))
        .with_child(Element::text_element("mappedName", &declaration.mapped_name))
        .with_child(Element::text_element(
            "authenticationType",
            declaration.authentication_type.to_string(),
        ))
}

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Correlation reports
///////////////////////////////////////////////////////////////////////////////////////////////////

/// Renders a correlation run as an element tree.
pub fn correlation_report_to_xml(report: &CorrelationReport) -> Element {
    report.correlations.iter().fold(
        Element::new(QName::local("resourceCorrelationReport")),
        |tree, correlation| tree.with_child(correlation_to_xml(correlation)),
    )
}

fn correlation_to_xml(correlation: &Correlation) -> Element {
    let mut element = Element::new(QName::local("resourceCorrelation"))
        .with_attribute("status", correlation.status().to_string());
    if let Some(key) = &correlation.key {
        element = element
            .with_attribute("key", &key.value)
            .with_attribute("keySource", key.source.to_string());
    }
    let candidates = correlation.candidates.iter().fold(
        Element::new(QName::local("candidates")),
        |candidates, entry| {
            candidates.with_child(
                Element::new(QName::local("configurationEntry"))
                    .with_attribute("kind", &entry.kind)
                    .with_attribute("name", &entry.name),
            )
        },
    );
    element
        .with_child(element_id_to_xml(&correlation.occurrence.element))
        .with_child(annotation_to_xml(&correlation.occurrence.declaration))
        .with_child(candidates)
}

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////////////////////////////////
