use std::path::PathBuf;

/// Error kinds shared across the whole checker.
///
/// `InvalidArgument` and XML-level failures on a named document are fatal;
/// `UnloadableUnit` is recovered per program unit during scanning.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("not an existing directory: {0}")]
    InvalidArgument(PathBuf),

    #[error("expected element {expected}, found element {found}")]
    SchemaMismatch { expected: String, found: String },

    #[error("element {element} has no attribute {attribute}")]
    MissingAttribute { element: String, attribute: String },

    #[error("element {element} has no child element {child}")]
    MissingElement { element: String, child: String },

    #[error("attribute {attribute} of element {element}: cannot parse {value:?} as {target}")]
    MalformedAttribute {
        element: String,
        attribute: String,
        value: String,
        target: &'static str,
    },

    #[error("element {element}: cannot interpret text {value:?}")]
    MalformedText { element: String, value: String },

    #[error("unloadable program unit: {reason}")]
    UnloadableUnit { reason: String },

    #[error("malformed document: {0}")]
    MalformedDocument(String),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    #[error("XML escape error: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CheckError {
    pub fn unloadable(reason: impl Into<String>) -> Self {
        CheckError::UnloadableUnit {
            reason: reason.into(),
        }
    }
}
