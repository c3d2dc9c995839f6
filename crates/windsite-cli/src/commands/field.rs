use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;
use windsite_algo::SitingRun;

use crate::commands::util::{configure_threads, load_site, write_field_csv};

pub fn handle(site_path: &Path, out: &Path, threads: &str) -> Result<()> {
    configure_threads(threads);
    let site = load_site(site_path)?
        .resolve()
        .context("resolving site definition")?;

    let field = SitingRun::new(&site)
        .field()
        .context("computing wake field")?;
    let rows = write_field_csv(out, &site.grid, &field)?;
    info!(rows, path = %out.display(), "wrote wake field");

    let (ny, nx) = field.shape();
    println!("Wake field for {}:", site.name);
    println!("  Grid          : {nx} x {ny}");
    println!("  Sources       : {}", site.candidates.len());
    println!("  Scenarios     : {}", site.regime.len());
    println!("  Speed [min/max]: {:.4}/{:.4} m/s", field.min(), field.max());
    println!("Wrote {rows} rows to {}", out.display());
    Ok(())
}
