use std::collections::{HashMap, HashSet};

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Program element metadata
///////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[derive(serde::Serialize)]
pub enum Visibility {
    Public,
    Protected,
    Private,
    PackagePrivate,
}

impl Visibility {
    pub fn from_modifiers(modifiers: &str) -> Self {
        let mut words = modifiers.split_whitespace();
        match words.find(|w| matches!(*w, "public" | "protected" | "private")) {
            Some("public") => Visibility::Public,
            Some("protected") => Visibility::Protected,
            Some("private") => Visibility::Private,
            _ => Visibility::PackagePrivate,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[derive(serde::Serialize)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

/// One use of an annotation, as written in source.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationUse {
    pub type_name: String,
    pub arguments: Vec<(String, AnnotationValue)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    /// A scalar argument: quoted strings have their quotes stripped, other
    /// tokens (booleans, class literals, enum constants) are kept verbatim.
    Literal(String),
    Array(Vec<AnnotationValue>),
    Annotation(AnnotationUse),
}

impl AnnotationValue {
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            AnnotationValue::Literal(s) => Some(s),
            _ => None,
        }
    }
}

impl AnnotationUse {
    /// Last segment of the (possibly qualified) annotation type name.
    pub fn simple_name(&self) -> &str {
        self.type_name.rsplit('.').next().unwrap_or(&self.type_name)
    }

    pub fn argument(&self, name: &str) -> Option<&AnnotationValue> {
        self.arguments
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn string_argument(&self, name: &str) -> Option<&str> {
        self.argument(name).and_then(AnnotationValue::as_literal)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JavaField {
    pub name: String,
    pub type_name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub annotations: Vec<AnnotationUse>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JavaMethod {
    pub name: String,
    pub return_type: String,
    pub parameter_types: Vec<String>,
    pub visibility: Visibility,
    pub is_static: bool,
    pub annotations: Vec<AnnotationUse>,
}

impl JavaMethod {
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, self.parameter_types.join(", "))
    }
}

/// Metadata of one loadable program unit, built in a single load pass.
#[derive(Debug, Clone, PartialEq)]
pub struct JavaClass {
    pub package: Option<String>,
    /// Simple name; nested types use the `Outer$Inner` binary form.
    pub binary_name: String,
    pub kind: TypeKind,
    pub visibility: Visibility,
    pub super_class: Option<String>,
    pub imports: Vec<String>,
    pub annotations: Vec<AnnotationUse>,
    pub fields: Vec<JavaField>,
    pub methods: Vec<JavaMethod>,
}

impl JavaClass {
    pub fn fully_qualified_name(&self) -> String {
        match &self.package {
            Some(package) => format!("{}.{}", package, self.binary_name),
            None => self.binary_name.clone(),
        }
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Class index
///////////////////////////////////////////////////////////////////////////////////////////////////

/// Name index over a set of loaded classes, used to walk superclass chains.
#[derive(Debug)]
pub struct ClassIndex<'a> {
    by_name: HashMap<String, &'a JavaClass>,
}

impl<'a> ClassIndex<'a> {
    pub fn new(classes: &'a [JavaClass]) -> Self {
        let by_name = classes
            .iter()
            .map(|class| (class.fully_qualified_name(), class))
            .collect();
        Self { by_name }
    }

    pub fn get(&self, fully_qualified_name: &str) -> Option<&'a JavaClass> {
        self.by_name.get(fully_qualified_name).copied()
    }

    /// Resolves the superclass of `class` within the loaded set: by qualified
    /// name, through a matching import, or in the same package. An external
    /// superclass resolves to `None`.
    pub fn resolve_super(&self, class: &JavaClass) -> Option<&'a JavaClass> {
        let name = class.super_class.as_deref()?;
        if name.contains('.') {
            return self.get(name);
        }
        for import in &class.imports {
            if import
                .strip_suffix(name)
                .is_some_and(|prefix| prefix.ends_with('.'))
            {
                return self.get(import);
            }
        }
        let same_package = match &class.package {
            Some(package) => format!("{}.{}", package, name),
            None => name.to_string(),
        };
        self.get(&same_package)
    }

    /// Superclass chain of `class`, nearest ancestor first, bounded by the
    /// loaded set and guarded against cycles.
    pub fn superclass_chain(&self, class: &JavaClass) -> Vec<&'a JavaClass> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        seen.insert(class.fully_qualified_name());
        let mut current = self.resolve_super(class);
        while let Some(ancestor) = current {
            if !seen.insert(ancestor.fully_qualified_name()) {
                break;
            }
            chain.push(ancestor);
            current = self.resolve_super(ancestor);
        }
        chain
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    fn class(package: &str, name: &str, super_class: Option<&str>, imports: &[&str]) -> JavaClass {
        JavaClass {
            package: Some(package.to_string()),
            binary_name: name.to_string(),
            kind: TypeKind::Class,
            visibility: Visibility::Public,
            super_class: super_class.map(str::to_string),
            imports: imports.iter().map(|s| s.to_string()).collect(),
            annotations: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    #[test]
    fn visibility_from_modifiers() {
        assert_eq!(Visibility::from_modifiers("public static"), Visibility::Public);
        assert_eq!(Visibility::from_modifiers("final private"), Visibility::Private);
        assert_eq!(Visibility::from_modifiers("static"), Visibility::PackagePrivate);
    }

    #[test]
    fn resolves_superclasses_by_package_import_and_qualified_name() {
        let classes = vec![
            class("com.example.base", "Base", None, &[]),
            class("com.example", "SamePackage", None, &[]),
            class(
                "com.example",
                "ViaImport",
                Some("Base"),
                &["com.example.base.Base"],
            ),
            class("com.example", "ViaPackage", Some("SamePackage"), &[]),
            class("com.example", "Qualified", Some("com.example.base.Base"), &[]),
            class("com.example", "External", Some("HttpServlet"), &[]),
        ];
        let index = ClassIndex::new(&classes);

        let fq = |c: Option<&JavaClass>| c.map(JavaClass::fully_qualified_name);
        assert_eq!(
            fq(index.resolve_super(index.get("com.example.ViaImport").unwrap())),
            Some("com.example.base.Base".to_string())
        );
        assert_eq!(
            fq(index.resolve_super(index.get("com.example.ViaPackage").unwrap())),
            Some("com.example.SamePackage".to_string())
        );
        assert_eq!(
            fq(index.resolve_super(index.get("com.example.Qualified").unwrap())),
            Some("com.example.base.Base".to_string())
        );
        assert_eq!(fq(index.resolve_super(index.get("com.example.External").unwrap())), None);
    }

    #[test]
    fn superclass_chain_stops_on_cycles() {
        let mut a = class("p", "A", Some("B"), &[]);
        let b = class("p", "B", Some("A"), &[]);
        let classes = vec![a.clone(), b];
        let index = ClassIndex::new(&classes);
        a = index.get("p.A").unwrap().clone();
        let chain = index.superclass_chain(&a);
        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0].binary_name, "B");
    }

    #[test]
    fn annotation_argument_lookup() {
        let annotation = AnnotationUse {
            type_name: "jakarta.annotation.Resource".to_string(),
            arguments: vec![
                ("name".to_string(), AnnotationValue::Literal("jdbc/myDS".to_string())),
                ("shareable".to_string(), AnnotationValue::Literal("false".to_string())),
            ],
        };
        assert_eq!(annotation.simple_name(), "Resource");
        assert_eq!(annotation.string_argument("name"), Some("jdbc/myDS"));
        assert_eq!(annotation.string_argument("lookup"), None);
    }
}
