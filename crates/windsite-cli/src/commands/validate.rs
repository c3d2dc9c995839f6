use anyhow::{anyhow, Result};
use std::io::{self, Write};
use std::path::Path;
use tabwriter::TabWriter;

use crate::commands::util::load_site;

pub fn handle(site_path: &Path) -> Result<()> {
    let definition = load_site(site_path)?;
    let diag = definition.diagnose();

    if diag.issues.is_empty() {
        println!("Site file {} is valid", site_path.display());
        return Ok(());
    }

    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "SEVERITY\tCATEGORY\tENTITY\tMESSAGE")?;
    for issue in diag.errors().chain(diag.warnings()) {
        writeln!(
            writer,
            "{:?}\t{}\t{}\t{}",
            issue.severity,
            issue.category,
            issue.entity.as_deref().unwrap_or("-"),
            issue.message
        )?;
    }
    writer.flush()?;
    println!("{}", diag.summary());

    if diag.has_errors() {
        Err(anyhow!(
            "site file {} has {} error(s)",
            site_path.display(),
            diag.error_count()
        ))
    } else {
        Ok(())
    }
}
