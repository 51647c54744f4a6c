use itertools::Itertools;

use crate::java::model::{
    AnnotationUse, AnnotationValue, ClassIndex, JavaClass, JavaField, JavaMethod, Visibility,
};

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Annotated element identities
///////////////////////////////////////////////////////////////////////////////////////////////////

/// Identity of a program element that can carry resource declarations.
///
/// A closed set over the declaration-bearing element kinds; each variant
/// carries what its textual descriptor needs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize)]
#[serde(tag = "kind")]
pub enum ElementId {
    Type { class: String },
    Field { class: String, type_name: String, name: String },
    Method { class: String, signature: String },
    Constructor { class: String, signature: String },
    Module { name: String },
    Package { name: String },
    Parameter { executable: String, name: String },
    RecordComponent { class: String, name: String },
}

impl ElementId {
    pub fn xml_tag(&self) -> &'static str {
        match self {
            ElementId::Type { .. } => "class",
            ElementId::Field { .. } => "field",
            ElementId::Method { .. } => "method",
            ElementId::Constructor { .. } => "constructor",
            ElementId::Module { .. } => "module",
            ElementId::Package { .. } => "package",
            ElementId::Parameter { .. } => "parameter",
            ElementId::RecordComponent { .. } => "recordComponent",
        }
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementId::Type { class } => write!(f, "class {}", class),
            ElementId::Field { class, type_name, name } => {
                write!(f, "{} {}.{}", type_name, class, name)
            }
            ElementId::Method { class, signature } => write!(f, "{}.{}", class, signature),
            ElementId::Constructor { class, signature } => write!(f, "{}.{}", class, signature),
            ElementId::Module { name } => write!(f, "module {}", name),
            ElementId::Package { name } => write!(f, "package {}", name),
            ElementId::Parameter { executable, name } => {
                write!(f, "parameter {} of {}", name, executable)
            }
            ElementId::RecordComponent { class, name } => write!(f, "{}.{}", class, name),
        }
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Resource declarations
///////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[derive(serde::Serialize)]
pub enum AuthenticationType {
    Application,
    Container,
}

impl std::fmt::Display for AuthenticationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthenticationType::Application => write!(f, "APPLICATION"),
            AuthenticationType::Container => write!(f, "CONTAINER"),
        }
    }
}

/// One declaratively attached resource reference, with the defaults of the
/// `Resource` annotation applied for omitted arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize)]
pub struct ResourceDeclaration {
    pub name: String,
    pub description: String,
    pub shareable: bool,
    pub lookup: String,
    pub type_name: String,
    pub mapped_name: String,
    pub authentication_type: AuthenticationType,
}

impl ResourceDeclaration {
    pub fn from_annotation(annotation: &AnnotationUse) -> Self {
        let string_argument = |name: &str| {
            annotation
                .string_argument(name)
                .unwrap_or_default()
                .to_string()
        };
        Self {
            name: string_argument("name"),
            description: string_argument("description"),
            shareable: annotation.string_argument("shareable") != Some("false"),
            lookup: string_argument("lookup"),
            type_name: annotation
                .string_argument("type")
                .map(|t| t.strip_suffix(".class").unwrap_or(t).to_string())
                .unwrap_or_else(|| "java.lang.Object".to_string()),
            mapped_name: string_argument("mappedName"),
            authentication_type: match annotation
                .string_argument("authenticationType")
                .and_then(|v| v.rsplit('.').next())
            {
                Some("APPLICATION") => AuthenticationType::Application,
                _ => AuthenticationType::Container,
            },
        }
    }
}

/// One (declaring element, declaration) pair, the unit of reporting.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize)]
pub struct ResourceOccurrence {
    pub element: ElementId,
    pub declaration: ResourceDeclaration,
}

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Annotation recognition
///////////////////////////////////////////////////////////////////////////////////////////////////

fn is_annotation_named(annotation: &AnnotationUse, simple: &str, qualified: &[&str]) -> bool {
    if annotation.type_name.contains('.') {
        qualified.contains(&annotation.type_name.as_str())
    } else {
        annotation.type_name == simple
    }
}

pub fn is_resource_annotation(annotation: &AnnotationUse) -> bool {
    is_annotation_named(
        annotation,
        "Resource",
        &["jakarta.annotation.Resource", "javax.annotation.Resource"],
    )
}

pub fn is_resources_annotation(annotation: &AnnotationUse) -> bool {
    is_annotation_named(
        annotation,
        "Resources",
        &["jakarta.annotation.Resources", "javax.annotation.Resources"],
    )
}

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Extraction
///////////////////////////////////////////////////////////////////////////////////////////////////

/// Resource declarations per annotated element, over a whole loaded set.
///
/// Entries are ordered: classes in scan order, and per class the type entry
/// first, then annotated fields, then annotated methods. An element reachable
/// from several classes (an inherited public member) appears once.
pub fn find_resources_in_classes(classes: &[JavaClass]) -> Vec<(ElementId, Vec<ResourceDeclaration>)> {
    let index = ClassIndex::new(classes);
    classes
        .iter()
        .flat_map(|class| find_resources_in_class(class, &index))
        .unique_by(|(element, _)| element.clone())
        .collect()
}

/// Resource declarations attached to one class and its members.
///
/// The type entry is always present, even with an empty declaration list; a
/// type is a potential declaration site. Fields and methods appear only when
/// they actually carry a declaration.
pub fn find_resources_in_class(
    class: &JavaClass,
    index: &ClassIndex,
) -> Vec<(ElementId, Vec<ResourceDeclaration>)> {
    let mut result = Vec::new();

    let mut type_declarations = Vec::new();
    if let Some(single) = class.annotations.iter().find(|a| is_resource_annotation(a)) {
        type_declarations.push(ResourceDeclaration::from_annotation(single));
    }
    if let Some(bundle) = class.annotations.iter().find(|a| is_resources_annotation(a)) {
        type_declarations.extend(bundled_declarations(bundle));
    }
    result.push((
        ElementId::Type {
            class: class.fully_qualified_name(),
        },
        type_declarations,
    ));

    for (owner, field) in fields_of(class, index) {
        if let Some(annotation) = field.annotations.iter().find(|a| is_resource_annotation(a)) {
            result.push((
                ElementId::Field {
                    class: owner.fully_qualified_name(),
                    type_name: field.type_name.clone(),
                    name: field.name.clone(),
                },
                vec![ResourceDeclaration::from_annotation(annotation)],
            ));
        }
    }

    for (owner, method) in methods_of(class, index) {
        if let Some(annotation) = method.annotations.iter().find(|a| is_resource_annotation(a)) {
            result.push((
                ElementId::Method {
                    class: owner.fully_qualified_name(),
                    signature: method.signature(),
                },
                vec![ResourceDeclaration::from_annotation(annotation)],
            ));
        }
    }

    result
}

// Single declarations come before the bundle, and the bundle keeps its
// declared order.
fn bundled_declarations(bundle: &AnnotationUse) -> Vec<ResourceDeclaration> {
    match bundle.argument("value") {
        Some(AnnotationValue::Array(values)) => values
            .iter()
            .filter_map(|value| match value {
                AnnotationValue::Annotation(inner) if is_resource_annotation(inner) => {
                    Some(ResourceDeclaration::from_annotation(inner))
                }
                _ => None,
            })
            .collect(),
        Some(AnnotationValue::Annotation(inner)) if is_resource_annotation(inner) => {
            vec![ResourceDeclaration::from_annotation(inner)]
        }
        _ => Vec::new(),
    }
}

/// Declared fields plus inherited public fields, deduplicated by name so a
/// hidden field is not double-counted. Declared fields win.
fn fields_of<'a>(class: &'a JavaClass, index: &ClassIndex<'a>) -> Vec<(&'a JavaClass, &'a JavaField)> {
    let declared = class.fields.iter().map(|field| (class, field));
    let inherited = index
        .superclass_chain(class)
        .into_iter()
        .flat_map(|ancestor| {
            ancestor
                .fields
                .iter()
                .filter(|field| field.visibility == Visibility::Public)
                .map(move |field| (ancestor, field))
        });
    declared
        .chain(inherited)
        .unique_by(|(_, field)| field.name.clone())
        .collect()
}

/// Declared methods plus inherited public methods, deduplicated by signature
/// so an overridden method is not double-counted.
fn methods_of<'a>(
    class: &'a JavaClass,
    index: &ClassIndex<'a>,
) -> Vec<(&'a JavaClass, &'a JavaMethod)> {
    let declared = class.methods.iter().map(|method| (class, method));
    let inherited = index
        .superclass_chain(class)
        .into_iter()
        .flat_map(|ancestor| {
            ancestor
                .methods
                .iter()
                .filter(|method| method.visibility == Visibility::Public)
                .map(move |method| (ancestor, method))
        });
    declared
        .chain(inherited)
        .unique_by(|(_, method)| method.signature())
        .collect()
}

/// Flattens the extraction table into one occurrence per declaration.
pub fn flatten_occurrences(
    table: &[(ElementId, Vec<ResourceDeclaration>)],
) -> Vec<ResourceOccurrence> {
    table
        .iter()
        .flat_map(|(element, declarations)| {
            declarations.iter().map(|declaration| ResourceOccurrence {
                element: element.clone(),
                declaration: declaration.clone(),
            })
        })
        .collect()
}

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////////////////////////////////
