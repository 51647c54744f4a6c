use std::path::{Path, PathBuf};

use crate::commands::find_resources::find_resources_in_war;
use crate::correlate::{correlate, CorrelationReport, MatchStatus};
use crate::error::CheckError;
use crate::report;
use crate::resources::ResourceOccurrence;
use crate::xml::printer;
use crate::xml::server::Server;
use crate::xml::tree::Document;

pub fn correlate_resources(war_dir: PathBuf, server_xml: PathBuf) -> anyhow::Result<()> {
    let occurrences = find_resources_in_war(&war_dir, &[])?;
    let correlation_report = correlate_against_file(&occurrences, &server_xml)?;
    let tree = report::correlation_report_to_xml(&correlation_report);
    println!("{}", printer::print(&tree)?);
    Ok(())
}

/// Correlates discovered declarations against one server configuration file.
pub fn correlate_against_file(
    occurrences: &[ResourceOccurrence],
    server_xml: &Path,
) -> Result<CorrelationReport, CheckError> {
    let document = Document::load(server_xml)?;
    let server = Server::new(document.root())?;
    let correlation_report = correlate(occurrences, &server)?;

    let count = |status: MatchStatus| {
        correlation_report
            .correlations
            .iter()
            .filter(|c| c.status() == status)
            .count()
    };
    log::info!(
        "Correlated {} declarations against {}: {} matched, {} unmatched, {} ambiguous",
        correlation_report.correlations.len(),
        server_xml.display(),
        count(MatchStatus::Matched),
        count(MatchStatus::Unmatched),
        count(MatchStatus::Ambiguous)
    );
    Ok(correlation_report)
}
