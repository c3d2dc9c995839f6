use anyhow::{Context, Result};
use rayon::ThreadPoolBuilder;
use serde::Serialize;
use std::path::Path;
use windsite_algo::WakeField;
use windsite_core::{load_site_from_path, Grid, SiteDefinition};

pub fn configure_threads(spec: &str) {
    let count = if spec.eq_ignore_ascii_case("auto") {
        num_cpus::get()
    } else {
        spec.parse().unwrap_or_else(|_| num_cpus::get())
    };
    let _ = ThreadPoolBuilder::new().num_threads(count).build_global();
}

pub fn load_site(path: &Path) -> Result<SiteDefinition> {
    load_site_from_path(path).with_context(|| format!("loading site file: {}", path.display()))
}

#[derive(Serialize)]
struct FieldRow {
    x: f64,
    y: f64,
    speed: f64,
}

/// Write one `x,y,speed` row per grid point, row-major from the south-west corner.
pub fn write_field_csv(path: &Path, grid: &Grid, field: &WakeField) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory: {}", parent.display()))?;
    }
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating field CSV: {}", path.display()))?;
    let mut rows = 0;
    for ((x, y), speed) in grid.x().iter().zip(grid.y().iter()).zip(field.speeds().iter()) {
        writer.serialize(FieldRow {
            x: *x,
            y: *y,
            speed: *speed,
        })?;
        rows += 1;
    }
    writer.flush().context("flushing field CSV")?;
    Ok(rows)
}
