use std::path::PathBuf;

use crate::error::CheckError;
use crate::xml::ejb::{EnterpriseBeans, JAKARTAEE_NS};
use crate::xml::tree::{Document, Element};

pub fn list_enterprise_beans(ejb_jar: PathBuf) -> anyhow::Result<()> {
    let document = Document::load(&ejb_jar)?;
    let beans = enterprise_beans_of(document.root())?;

    for bean in beans.session_beans()? {
        println!("session         {}", bean.ejb_name()?);
    }
    for bean in beans.entity_beans()? {
        println!("entity          {}", bean.ejb_name()?);
    }
    for bean in beans.message_driven_beans()? {
        println!("message-driven  {}", bean.ejb_name()?);
    }
    Ok(())
}

/// Accepts either the `enterprise-beans` element itself as document root, or
/// a descriptor root that declares it as a direct child.
pub fn enterprise_beans_of(root: &Element) -> Result<EnterpriseBeans<'_>, CheckError> {
    if root.name().local_name() == "enterprise-beans" {
        return EnterpriseBeans::new(root);
    }
    match root.first_child_named_ns(JAKARTAEE_NS, "enterprise-beans") {
        Some(child) => EnterpriseBeans::new(child),
        None => EnterpriseBeans::new(root),
    }
}
