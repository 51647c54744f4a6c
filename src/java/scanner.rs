use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::CheckError;
use crate::java::model::{
    AnnotationUse, AnnotationValue, JavaClass, JavaField, JavaMethod, TypeKind, Visibility,
};

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Scan result
///////////////////////////////////////////////////////////////////////////////////////////////////

/// Outcome of scanning a directory of program units. Units that fail to load
/// end up in `failures`; the scan itself never aborts on a single unit.
#[derive(Debug, Default)]
pub struct ClassScan {
    pub classes: Vec<JavaClass>,
    pub failures: Vec<ScanFailure>,
}

#[derive(Debug)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub error: CheckError,
}

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Regex
///////////////////////////////////////////////////////////////////////////////////////////////////

static PACKAGE_PATTERN: OnceLock<regex::Regex> = OnceLock::new();
static IMPORT_PATTERN: OnceLock<regex::Regex> = OnceLock::new();
static TYPE_PATTERN: OnceLock<regex::Regex> = OnceLock::new();
static EXTENDS_PATTERN: OnceLock<regex::Regex> = OnceLock::new();
static METHOD_PATTERN: OnceLock<regex::Regex> = OnceLock::new();
static FIELD_PATTERN: OnceLock<regex::Regex> = OnceLock::new();

fn get_package_pattern() -> &'static regex::Regex {
    PACKAGE_PATTERN.get_or_init(|| {
        regex::Regex::new(r"^package\s+(?<package>[A-Za-z0-9_.]+)\s*;").unwrap()
    })
}

fn get_import_pattern() -> &'static regex::Regex {
    IMPORT_PATTERN.get_or_init(|| {
        regex::Regex::new(r"^import\s+(?:static\s+)?(?<import>[A-Za-z0-9_.]+)\s*;").unwrap()
    })
}

fn get_type_pattern() -> &'static regex::Regex {
    TYPE_PATTERN.get_or_init(|| {
        regex::Regex::new(
            r"(?x)^(?<modifiers>(?:(?:public|protected|private|static|final|abstract|sealed|non-sealed|strictfp)\s+)*)
            (?<kind>class|interface|enum|record|@interface)\s+
            (?<name>[A-Za-z_][A-Za-z0-9_]*)(?<rest>[^{]*)",
        )
        .unwrap()
    })
}

fn get_extends_pattern() -> &'static regex::Regex {
    EXTENDS_PATTERN.get_or_init(|| {
        regex::Regex::new(r"\bextends\s+(?<super>[A-Za-z_][A-Za-z0-9_.]*)").unwrap()
    })
}

fn get_method_pattern() -> &'static regex::Regex {
    METHOD_PATTERN.get_or_init(|| {
        regex::Regex::new(
            r"(?x)^(?<modifiers>(?:(?:public|protected|private|static|final|abstract|synchronized|native|strictfp|default)\s+)*)
            (?:<[^>]*>\s*)?
            (?<ret>[\w$.<>\[\],\s]+?)\s+
            (?<name>[A-Za-z_][A-Za-z0-9_]*)\s*
            \((?<params>[^)]*)\)\s*
            (?:throws\s+[\w.,\s]+)?\s*(?:\{|;)",
        )
        .unwrap()
    })
}

fn get_field_pattern() -> &'static regex::Regex {
    FIELD_PATTERN.get_or_init(|| {
        regex::Regex::new(
            r"(?x)^(?<modifiers>(?:(?:public|protected|private|static|final|transient|volatile)\s+)*)
            (?<type>[\w$.<>\[\],\s]+?)\s+
            (?<name>[\w$]+)\s*
            (?:=[^;]*)?;",
        )
        .unwrap()
    })
}

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Directory scanning
///////////////////////////////////////////////////////////////////////////////////////////////////

/// Finds all loadable program units under `root`.
///
/// Traversal failures are fatal; a unit that cannot be loaded is recorded and
/// skipped so one malformed unit never hides the rest of the archive.
pub fn scan_directory(root: impl AsRef<Path>) -> Result<ClassScan, CheckError> {
    log::info!("Scanning program units under {}", root.as_ref().display());
    let mut scan = ClassScan::default();
    scan_recursively(root.as_ref(), &mut scan)?;
    log::info!(
        "Loaded {} classes ({} units skipped)",
        scan.classes.len(),
        scan.failures.len()
    );
    Ok(scan)
}

fn scan_recursively(dir: &Path, scan: &mut ClassScan) -> Result<(), CheckError> {
    let mut entries = std::fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|entry| entry.path());
    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            scan_recursively(&path, scan)?;
        } else if path.extension().unwrap_or_default() == "java" {
            let stem = path.file_stem().unwrap_or_default();
            if stem == "package-info" || stem == "module-info" {
                log::debug!("Skipping descriptor unit {}", path.display());
                continue;
            }
            match load_unit(&path) {
                Ok(classes) => scan.classes.extend(classes),
                Err(error) => {
                    log::warn!("Skipping unloadable unit {}: {}", path.display(), error);
                    scan.failures.push(ScanFailure { path, error });
                }
            }
        }
    }
    Ok(())
}

fn load_unit(path: &Path) -> Result<Vec<JavaClass>, CheckError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CheckError::unloadable(format!("cannot read source: {}", e)))?;
    parse_java_source(&content)
}

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Source parsing
///////////////////////////////////////////////////////////////////////////////////////////////////

struct OpenType {
    class: JavaClass,
    decl_depth: i32,
}

/// Parses one Java source file into the program units it declares.
///
/// This is a line-oriented metadata scan, not a full parser: it recovers the
/// package, imports, type/field/method declarations and their annotations,
/// which is all the extractor needs.
pub fn parse_java_source(content: &str) -> Result<Vec<JavaClass>, CheckError> {
    let mut package: Option<String> = None;
    let mut imports: Vec<String> = Vec::new();
    let mut finished: Vec<JavaClass> = Vec::new();
    let mut open: Vec<OpenType> = Vec::new();
    let mut pending: Vec<AnnotationUse> = Vec::new();
    let mut carry = String::new();
    let mut in_comment = false;
    let mut depth: i32 = 0;

    for raw_line in content.lines() {
        let stripped = strip_comments(raw_line, &mut in_comment);
        let stripped = stripped.trim();
        let joined = if carry.is_empty() {
            stripped.to_string()
        } else {
            let joined = format!("{} {}", carry, stripped);
            carry.clear();
            joined
        };
        if joined.is_empty() {
            continue;
        }

        let line = match take_annotations(&joined, &mut pending)? {
            AnnotationTake::Incomplete => {
                carry = joined;
                continue;
            }
            AnnotationTake::Rest(rest) => rest,
        };
        if line.is_empty() {
            continue;
        }

        if let Some(capture) = get_package_pattern().captures(&line) {
            if package.is_none() {
                package = capture.name("package").map(|m| m.as_str().to_string());
            }
        } else if let Some(capture) = get_import_pattern().captures(&line) {
            if let Some(import) = capture.name("import") {
                imports.push(import.as_str().to_string());
            }
        } else if let Some(capture) = get_type_pattern().captures(&line) {
            let name = capture.name("name").map_or("", |m| m.as_str());
            let binary_name = match open.last() {
                Some(outer) => format!("{}${}", outer.class.binary_name, name),
                None => name.to_string(),
            };
            let modifiers = capture.name("modifiers").map_or("", |m| m.as_str());
            let rest = capture.name("rest").map_or("", |m| m.as_str());
            let super_class = get_extends_pattern()
                .captures(rest)
                .and_then(|c| c.name("super"))
                .map(|m| m.as_str().to_string());
            let class = JavaClass {
                package: package.clone(),
                binary_name,
                kind: type_kind(capture.name("kind").map_or("", |m| m.as_str())),
                visibility: Visibility::from_modifiers(modifiers),
                super_class,
                imports: imports.clone(),
                annotations: std::mem::take(&mut pending),
                fields: Vec::new(),
                methods: Vec::new(),
            };
            open.push(OpenType {
                class,
                decl_depth: depth,
            });
        } else if open.last().is_some_and(|o| depth == o.decl_depth + 1) {
            if let Some(capture) = get_method_pattern().captures(&line) {
                let modifiers = capture.name("modifiers").map_or("", |m| m.as_str());
                let method = JavaMethod {
                    name: capture.name("name").map_or("", |m| m.as_str()).to_string(),
                    return_type: capture.name("ret").map_or("", |m| m.as_str()).trim().to_string(),
                    parameter_types: split_parameter_types(
                        capture.name("params").map_or("", |m| m.as_str()),
                    ),
                    visibility: Visibility::from_modifiers(modifiers),
                    is_static: modifiers.split_whitespace().any(|w| w == "static"),
                    annotations: std::mem::take(&mut pending),
                };
                if let Some(current) = open.last_mut() {
                    current.class.methods.push(method);
                }
            } else if let Some(capture) = get_field_pattern().captures(&line) {
                let modifiers = capture.name("modifiers").map_or("", |m| m.as_str());
                let field = JavaField {
                    name: capture.name("name").map_or("", |m| m.as_str()).to_string(),
                    type_name: capture.name("type").map_or("", |m| m.as_str()).trim().to_string(),
                    visibility: Visibility::from_modifiers(modifiers),
                    is_static: modifiers.split_whitespace().any(|w| w == "static"),
                    annotations: std::mem::take(&mut pending),
                };
                if let Some(current) = open.last_mut() {
                    current.class.fields.push(field);
                }
            } else {
                pending.clear();
            }
        } else {
            pending.clear();
        }

        depth += brace_delta(&line);
        while open.last().is_some_and(|o| depth <= o.decl_depth) {
            if let Some(finished_type) = open.pop() {
                finished.push(finished_type.class);
            }
        }
    }

    if !carry.is_empty() {
        return Err(CheckError::unloadable("unterminated annotation"));
    }
    if depth != 0 || !open.is_empty() {
        return Err(CheckError::unloadable("unbalanced braces"));
    }
    if finished.is_empty() {
        return Err(CheckError::unloadable("no type declaration found"));
    }
    Ok(finished)
}

fn type_kind(kind: &str) -> TypeKind {
    match kind {
        "interface" => TypeKind::Interface,
        "enum" => TypeKind::Enum,
        "record" => TypeKind::Record,
        "@interface" => TypeKind::Annotation,
        _ => TypeKind::Class,
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Comment and brace handling
///////////////////////////////////////////////////////////////////////////////////////////////////

fn strip_comments(line: &str, in_block: &mut bool) -> String {
    let mut out = String::new();
    let mut chars = line.chars().peekable();
    let mut in_string = false;
    let mut in_char = false;
    while let Some(c) = chars.next() {
        if *in_block {
            if c == '*' && chars.peek() == Some(&'/') {
                chars.next();
                *in_block = false;
            }
            continue;
        }
        if in_string || in_char {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if (in_string && c == '"') || (in_char && c == '\'') {
                in_string = false;
                in_char = false;
            }
            continue;
        }
        match c {
            '/' if chars.peek() == Some(&'/') => break,
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                *in_block = true;
            }
            '"' => {
                in_string = true;
                out.push(c);
            }
            '\'' => {
                in_char = true;
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

// Brace depth outside string and character literals.
fn brace_delta(line: &str) -> i32 {
    let mut delta = 0;
    let mut chars = line.chars();
    let mut quote: Option<char> = None;
    while let Some(c) = chars.next() {
        match quote {
            Some(q) => {
                if c == '\\' {
                    chars.next();
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' => quote = Some(c),
                '{' => delta += 1,
                '}' => delta -= 1,
                _ => {}
            },
        }
    }
    delta
}

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Annotation parsing
///////////////////////////////////////////////////////////////////////////////////////////////////

enum AnnotationTake {
    /// The line ends inside an annotation; the caller buffers it and retries
    /// with the next line appended.
    Incomplete,
    Rest(String),
}

// Pulls leading annotation uses off a declaration line.
fn take_annotations(
    line: &str,
    pending: &mut Vec<AnnotationUse>,
) -> Result<AnnotationTake, CheckError> {
    let chars = line.chars().collect::<Vec<_>>();
    let mut pos = 0;
    let mut taken = Vec::new();
    loop {
        while pos < chars.len() && chars[pos].is_whitespace() {
            pos += 1;
        }
        if pos >= chars.len() || chars[pos] != '@' {
            break;
        }
        // An annotation type declaration, not an annotation use.
        if chars[pos..].iter().collect::<String>().starts_with("@interface") {
            break;
        }
        match parse_annotation(&chars, pos)? {
            Some((annotation, next)) => {
                taken.push(annotation);
                pos = next;
            }
            None => return Ok(AnnotationTake::Incomplete),
        }
    }
    pending.extend(taken);
    Ok(AnnotationTake::Rest(chars[pos..].iter().collect::<String>().trim().to_string()))
}

/// Parses one annotation use starting at `pos` (which must point at `@`).
/// Returns `None` if the text ends before the annotation is closed.
fn parse_annotation(
    chars: &[char],
    pos: usize,
) -> Result<Option<(AnnotationUse, usize)>, CheckError> {
    let mut pos = pos + 1;
    let start = pos;
    while pos < chars.len()
        && (chars[pos].is_alphanumeric() || chars[pos] == '_' || chars[pos] == '.' || chars[pos] == '$')
    {
        pos += 1;
    }
    if pos == start {
        return Err(CheckError::unloadable("annotation without a type name"));
    }
    let type_name = chars[start..pos].iter().collect::<String>();
    let mut lookahead = pos;
    while lookahead < chars.len() && chars[lookahead].is_whitespace() {
        lookahead += 1;
    }
    if lookahead >= chars.len() || chars[lookahead] != '(' {
        return Ok(Some((
            AnnotationUse {
                type_name,
                arguments: Vec::new(),
            },
            pos,
        )));
    }
    pos = lookahead + 1;
    let mut arguments = Vec::new();
    loop {
        pos = skip_whitespace(chars, pos);
        match chars.get(pos) {
            None => return Ok(None),
            Some(')') => {
                pos += 1;
                break;
            }
            Some(',') => {
                pos += 1;
                continue;
            }
            Some(_) => {
                let (name, value_pos) = match argument_name(chars, pos) {
                    Some((name, after)) => (name, after),
                    None => ("value".to_string(), pos),
                };
                match parse_value(chars, value_pos)? {
                    Some((value, next)) => {
                        arguments.push((name, value));
                        pos = next;
                    }
                    None => return Ok(None),
                }
            }
        }
    }
    Ok(Some((
        AnnotationUse {
            type_name,
            arguments,
        },
        pos,
    )))
}

// `name = ` prefix of an annotation argument, if present.
fn argument_name(chars: &[char], pos: usize) -> Option<(String, usize)> {
    let mut end = pos;
    while end < chars.len() && (chars[end].is_alphanumeric() || chars[end] == '_') {
        end += 1;
    }
    if end == pos {
        return None;
    }
    let after = skip_whitespace(chars, end);
    if chars.get(after) == Some(&'=') && chars.get(after + 1) != Some(&'=') {
        let name = chars[pos..end].iter().collect::<String>();
        Some((name, skip_whitespace(chars, after + 1)))
    } else {
        None
    }
}

fn parse_value(chars: &[char], pos: usize) -> Result<Option<(AnnotationValue, usize)>, CheckError> {
    let pos = skip_whitespace(chars, pos);
    match chars.get(pos) {
        None => Ok(None),
        Some('"') => {
            let mut out = String::new();
            let mut i = pos + 1;
            loop {
                match chars.get(i) {
                    None => return Ok(None),
                    Some('\\') => {
                        if let Some(escaped) = chars.get(i + 1) {
                            out.push(*escaped);
                            i += 2;
                        } else {
                            return Ok(None);
                        }
                    }
                    Some('"') => return Ok(Some((AnnotationValue::Literal(out), i + 1))),
                    Some(c) => {
                        out.push(*c);
                        i += 1;
                    }
                }
            }
        }
        Some('{') => {
            let mut values = Vec::new();
            let mut i = pos + 1;
            loop {
                i = skip_whitespace(chars, i);
                match chars.get(i) {
                    None => return Ok(None),
                    Some('}') => return Ok(Some((AnnotationValue::Array(values), i + 1))),
                    Some(',') => i += 1,
                    Some(_) => match parse_value(chars, i)? {
                        Some((value, next)) => {
                            values.push(value);
                            i = next;
                        }
                        None => return Ok(None),
                    },
                }
            }
        }
        Some('@') => match parse_annotation(chars, pos)? {
            Some((annotation, next)) => {
                Ok(Some((AnnotationValue::Annotation(annotation), next)))
            }
            None => Ok(None),
        },
        Some(_) => {
            let mut end = pos;
            while end < chars.len() && !matches!(chars[end], ',' | ')' | '}') {
                end += 1;
            }
            if end >= chars.len() {
                return Ok(None);
            }
            let token = chars[pos..end].iter().collect::<String>().trim().to_string();
            if token.is_empty() {
                return Err(CheckError::unloadable("empty annotation argument"));
            }
            Ok(Some((AnnotationValue::Literal(token), end)))
        }
    }
}

fn skip_whitespace(chars: &[char], mut pos: usize) -> usize {
    while pos < chars.len() && chars[pos].is_whitespace() {
        pos += 1;
    }
    pos
}

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Parameter lists
///////////////////////////////////////////////////////////////////////////////////////////////////

// Splits on top-level commas so generic arguments stay intact.
fn split_parameter_types(params: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut angle = 0;
    for c in params.chars() {
        match c {
            '<' => {
                angle += 1;
                piece.push(c);
            }
            '>' => {
                angle -= 1;
                piece.push(c);
            }
            ',' if angle == 0 => {
                pieces.push(std::mem::take(&mut piece));
            }
            _ => piece.push(c),
        }
    }
    pieces.push(piece);
    pieces
        .iter()
        .filter_map(|piece| parameter_type_of(piece))
        .collect()
}

fn parameter_type_of(piece: &str) -> Option<String> {
    let tokens = piece
        .split_whitespace()
        .filter(|t| !t.starts_with('@') && *t != "final")
        .collect::<Vec<_>>();
    if tokens.len() < 2 {
        return None;
    }
    Some(tokens[..tokens.len() - 1].join(" "))
}

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////////////////////////////////
