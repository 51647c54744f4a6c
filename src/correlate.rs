use crate::error::CheckError;
use crate::resources::{ResourceDeclaration, ResourceOccurrence};
use crate::xml::server::{recognize, Server};

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Configuration entries
///////////////////////////////////////////////////////////////////////////////////////////////////

/// A configuration entry that can satisfy a resource reference, reduced to
/// its element kind and identifying name.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize)]
pub struct ConfigEntry {
    pub kind: String,
    pub name: String,
}

/// Collects every recognized, named configuration entry of a server
/// configuration document, in document order.
pub fn named_entries(server: &Server) -> Result<Vec<ConfigEntry>, CheckError> {
    let mut entries = Vec::new();
    for child in server.element().child_elements() {
        if let Some(content) = recognize(child) {
            let content = content?;
            if let Some(name) = content.identifying_name() {
                entries.push(ConfigEntry {
                    kind: content.local_name().to_string(),
                    name: name.to_string(),
                });
            }
        }
    }
    Ok(entries)
}

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Correlation
///////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[derive(serde::Serialize)]
pub enum KeySource {
    Name,
    Lookup,
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySource::Name => write!(f, "name"),
            KeySource::Lookup => write!(f, "lookup"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize)]
pub struct CorrelationKey {
    pub value: String,
    pub source: KeySource,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[derive(serde::Serialize)]
pub enum MatchStatus {
    Matched,
    Unmatched,
    Ambiguous,
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStatus::Matched => write!(f, "matched"),
            MatchStatus::Unmatched => write!(f, "unmatched"),
            MatchStatus::Ambiguous => write!(f, "ambiguous"),
        }
    }
}

/// One declaration correlated against the configuration, with every
/// candidate entry whose identifying name equals the key.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize)]
pub struct Correlation {
    pub occurrence: ResourceOccurrence,
    pub key: Option<CorrelationKey>,
    pub candidates: Vec<ConfigEntry>,
}

impl Correlation {
    pub fn status(&self) -> MatchStatus {
        match self.candidates.len() {
            0 => MatchStatus::Unmatched,
            1 => MatchStatus::Matched,
            _ => MatchStatus::Ambiguous,
        }
    }
}

/// Snapshot of one correlation run.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize)]
pub struct CorrelationReport {
    pub correlations: Vec<Correlation>,
}

/// Correlates discovered declarations against a server configuration.
///
/// Matching is exact, case-sensitive string equality on the declaration's
/// logical name (or its lookup string when no name is declared). With several
/// equally named entries, all candidates are reported; the engine does not
/// guess a winner.
pub fn correlate(
    occurrences: &[ResourceOccurrence],
    server: &Server,
) -> Result<CorrelationReport, CheckError> {
    let entries = named_entries(server)?;
    let correlations = occurrences
        .iter()
        .map(|occurrence| {
            let key = correlation_key(&occurrence.declaration);
            let candidates = match &key {
                Some(key) => entries
                    .iter()
                    .filter(|entry| entry.name == key.value)
                    .cloned()
                    .collect(),
                None => Vec::new(),
            };
            Correlation {
                occurrence: occurrence.clone(),
                key,
                candidates,
            }
        })
        .collect();
    Ok(CorrelationReport { correlations })
}

fn correlation_key(declaration: &ResourceDeclaration) -> Option<CorrelationKey> {
    if !declaration.name.is_empty() {
        Some(CorrelationKey {
            value: declaration.name.clone(),
            source: KeySource::Name,
        })
    } else if !declaration.lookup.is_empty() {
        Some(CorrelationKey {
            value: declaration.lookup.clone(),
            source: KeySource::Lookup,
        })
    } else {
        None
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::java::scanner::parse_java_source;
    use crate::resources::{find_resources_in_classes, flatten_occurrences};
    use crate::xml::tree::Document;

    fn occurrences_for(name_argument: &str) -> Vec<ResourceOccurrence> {
        let source = format!(
            "package p;\nimport jakarta.annotation.Resource;\npublic class C {{\n    @Resource({})\n    private DataSource ds;\n}}\n",
            name_argument
        );
        let classes = parse_java_source(&source).unwrap();
        flatten_occurrences(&find_resources_in_classes(&classes))
    }

    fn run(server_xml: &str, occurrences: &[ResourceOccurrence]) -> CorrelationReport {
        let doc = Document::parse(server_xml).unwrap();
        let server = Server::new(doc.root()).unwrap();
        correlate(occurrences, &server).unwrap()
    }

    #[test]
    fn named_entries_cover_every_named_kind_in_document_order() {
        let doc = Document::parse(
            r#"<server>
                <jndiEntry jndiName="jdbc/a" value="v"/>
                <jmsQueue id="q" jndiName="jms/q"/>
                <connectionManager id="cm"/>
                <jndiEntry value="unnamed"/>
                <wasJmsEndpoint host="h"/>
            </server>"#,
        )
        .unwrap();
        let server = Server::new(doc.root()).unwrap();
        let entries = named_entries(&server).unwrap();
        assert_eq!(
            entries,
            vec![
                ConfigEntry { kind: "jndiEntry".to_string(), name: "jdbc/a".to_string() },
                ConfigEntry { kind: "jmsQueue".to_string(), name: "jms/q".to_string() },
                ConfigEntry { kind: "connectionManager".to_string(), name: "cm".to_string() },
            ]
        );
    }

    #[test]
    fn declaration_with_one_candidate_is_matched() {
        let occurrences = occurrences_for(r#"name = "jdbc/myDS""#);
        let report = run(
            r#"<server><jndiEntry jndiName="jdbc/myDS" value="v"/></server>"#,
            &occurrences,
        );
        assert_eq!(report.correlations.len(), 1);
        let correlation = &report.correlations[0];
        assert_eq!(correlation.status(), MatchStatus::Matched);
        assert_eq!(correlation.key.as_ref().unwrap().source, KeySource::Name);
        assert_eq!(correlation.candidates[0].kind, "jndiEntry");
    }

    #[test]
    fn declaration_without_candidates_is_unmatched() {
        let occurrences = occurrences_for(r#"name = "jdbc/myDS""#);
        let report = run(
            r#"<server><jndiEntry jndiName="jdbc/otherDS" value="v"/></server>"#,
            &occurrences,
        );
        assert_eq!(report.correlations[0].status(), MatchStatus::Unmatched);
        assert!(report.correlations[0].candidates.is_empty());
    }

    #[test]
    fn several_candidates_are_reported_as_ambiguous() {
        let occurrences = occurrences_for(r#"name = "jdbc/dup""#);
        let report = run(
            r#"<server>
                <jndiEntry jndiName="jdbc/dup" value="a"/>
                <jmsQueue id="q" jndiName="jdbc/dup"/>
            </server>"#,
            &occurrences,
        );
        let correlation = &report.correlations[0];
        assert_eq!(correlation.status(), MatchStatus::Ambiguous);
        assert_eq!(correlation.candidates.len(), 2);
        assert_eq!(correlation.candidates[0].kind, "jndiEntry");
        assert_eq!(correlation.candidates[1].kind, "jmsQueue");
    }

    #[test]
    fn lookup_is_the_key_when_no_name_is_declared() {
        let occurrences = occurrences_for(r#"lookup = "jms/orders""#);
        let report = run(
            r#"<server><jmsQueue id="q" jndiName="jms/orders"/></server>"#,
            &occurrences,
        );
        let correlation = &report.correlations[0];
        assert_eq!(correlation.status(), MatchStatus::Matched);
        assert_eq!(correlation.key.as_ref().unwrap().source, KeySource::Lookup);
    }

    #[test]
    fn unresolved_placeholders_match_only_verbatim() {
        let occurrences = occurrences_for(r#"name = "jdbc/myDS""#);
        let report = run(
            r#"<server><jndiEntry jndiName="${jndi.name}" value="v"/></server>"#,
            &occurrences,
        );
        assert_eq!(report.correlations[0].status(), MatchStatus::Unmatched);

        let occurrences = occurrences_for(r#"name = "${jndi.name}""#);
        let report = run(
            r#"<server><jndiEntry jndiName="${jndi.name}" value="v"/></server>"#,
            &occurrences,
        );
        assert_eq!(report.correlations[0].status(), MatchStatus::Matched);
    }

    #[test]
    fn correlation_is_deterministic() {
        let occurrences = occurrences_for(r#"name = "jdbc/dup""#);
        let xml = r#"<server>
            <jndiEntry jndiName="jdbc/dup" value="a"/>
            <jndiEntry jndiName="jdbc/dup" value="b"/>
        </server>"#;
        let first = run(xml, &occurrences);
        let second = run(xml, &occurrences);
        assert_eq!(first, second);
    }
}
