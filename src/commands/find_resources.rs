use std::path::{Path, PathBuf};

use crate::commands::ensure_directory;
use crate::error::CheckError;
use crate::java::scanner::scan_directory;
use crate::report;
use crate::resources::{find_resources_in_classes, flatten_occurrences, ResourceOccurrence};
use crate::xml::printer;

pub fn find_resources(
    war_dir: PathBuf,
    config_dirs: Vec<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    let occurrences = find_resources_in_war(&war_dir, &config_dirs)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&occurrences)?);
    } else {
        let tree = report::occurrences_to_xml(&occurrences);
        println!("{}", printer::print(&tree)?);
    }
    Ok(())
}

/// Finds the resource declarations of an exploded web application archive.
///
/// The archive must contain a `WEB-INF/classes` subtree of program units.
pub fn find_resources_in_war(
    war_dir: &Path,
    config_dirs: &[PathBuf],
) -> Result<Vec<ResourceOccurrence>, CheckError> {
    ensure_directory(war_dir)?;
    for dir in config_dirs {
        ensure_directory(dir)?;
    }
    if !config_dirs.is_empty() {
        // TODO use the configuration directories in the correlation path
        log::warn!(
            "{} configuration directories given; they are not used yet",
            config_dirs.len()
        );
    }

    let classes_dir = war_dir.join("WEB-INF").join("classes");
    ensure_directory(&classes_dir)?;

    let scan = scan_directory(&classes_dir)?;
    let occurrences = flatten_occurrences(&find_resources_in_classes(&scan.classes));
    log::info!(
        "Found {} resource declarations in {}",
        occurrences.len(),
        war_dir.display()
    );
    Ok(occurrences)
}
