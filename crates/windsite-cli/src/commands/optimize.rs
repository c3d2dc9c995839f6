//! Turbine siting CLI command

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tabwriter::TabWriter;
use windsite_algo::{LayoutEvaluation, LayoutOutcome, SitingReport, SitingRun};
use windsite_cli::BackendArg;
use windsite_core::{Position, ResolvedSite};

use crate::commands::util::{configure_threads, load_site, write_field_csv};

pub struct OptimizeArgs<'a> {
    pub site: &'a Path,
    pub out: Option<&'a PathBuf>,
    pub field_csv: Option<&'a PathBuf>,
    pub turbines: Option<usize>,
    pub backend: Option<BackendArg>,
    pub time_limit: Option<f64>,
    pub no_evaluate: bool,
    pub threads: &'a str,
}

/// Candidate pricing row in the JSON output
#[derive(Debug, Serialize)]
struct CandidateOutput {
    index: usize,
    position: Position,
    expected_speed: f64,
    interference: f64,
}

/// Solution output format
#[derive(Debug, Serialize)]
struct OptimizeOutput<'a> {
    site: &'a str,
    turbines: usize,
    min_separation_m: f64,
    backend: &'static str,
    reference_speed: f64,
    candidates: Vec<CandidateOutput>,
    outcome: &'a LayoutOutcome,
    evaluation: Option<&'a LayoutEvaluation>,
    elapsed_ms: u64,
}

pub fn handle(args: &OptimizeArgs<'_>) -> Result<()> {
    configure_threads(args.threads);

    let mut definition = load_site(args.site)?;
    if let Some(n) = args.turbines {
        definition.layout.turbines = n;
    }
    if let Some(backend) = args.backend {
        definition.layout.backend = backend.into();
    }
    if let Some(limit) = args.time_limit {
        definition.layout.time_limit_s = Some(limit);
    }
    let site = definition.resolve().context("resolving site definition")?;

    println!(
        "Site {}: {} candidates, {} scenarios, placing {} turbines (D_min {})",
        site.name,
        site.candidates.len(),
        site.regime.len(),
        site.layout.turbines,
        site.layout.min_separation
    );

    let mut run = SitingRun::new(&site);
    if args.no_evaluate {
        run = run.without_evaluation();
    }
    let report = run.run().context("running siting pipeline")?;

    if let Some(path) = args.field_csv {
        let rows = write_field_csv(path, &site.grid, &report.field)?;
        println!("Wrote {rows} field rows to {}", path.display());
    }

    print_candidates(&report)?;
    println!("\n{}", report.outcome.summary());
    if let Some(evaluation) = &report.evaluation {
        print_evaluation(evaluation)?;
    }

    if let Some(path) = args.out {
        write_output(path, &site, &report)?;
        println!("\nResults written to {}", path.display());
    }

    match &report.outcome {
        LayoutOutcome::Optimal(_) | LayoutOutcome::TimeLimited(_) => Ok(()),
        LayoutOutcome::Infeasible { reason } => Err(anyhow!("layout infeasible: {reason}")),
        LayoutOutcome::Unknown { raw_status } => Err(anyhow!("layout not solved: {raw_status}")),
    }
}

fn print_candidates(report: &SitingReport) -> Result<()> {
    let selected = report
        .outcome
        .incumbent()
        .map(|s| s.selected.clone())
        .unwrap_or_default();

    println!("\nInterference (U_max = {:.4} m/s):", report.coefficients.reference_speed());
    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "CANDIDATE\tSPEED\tW\tPLACED")?;
    for (idx, (w, u)) in report
        .coefficients
        .as_slice()
        .iter()
        .zip(report.coefficients.local_speeds())
        .enumerate()
    {
        let placed = selected.iter().any(|id| id.value() == idx);
        writeln!(
            writer,
            "{}\t{:.4}\t{:.4}\t{}",
            idx,
            u,
            w,
            if placed { "yes" } else { "" }
        )?;
    }
    writer.flush()?;
    Ok(())
}

fn print_evaluation(evaluation: &LayoutEvaluation) -> Result<()> {
    println!("Layout re-evaluation (selected turbines only):");
    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "CANDIDATE\tPOSITION\tSPEED\tPOWER")?;
    for t in &evaluation.turbines {
        writeln!(
            writer,
            "{}\t{}\t{:.4}\t{:.2}",
            t.id.value(),
            t.position,
            t.expected_speed,
            t.power
        )?;
    }
    writer.flush()?;
    println!(
        "  Total power: {:.2} ({:.2}% wake loss)",
        evaluation.total_power,
        evaluation.wake_loss_fraction() * 100.0
    );
    Ok(())
}

fn write_output(path: &Path, site: &ResolvedSite, report: &SitingReport) -> Result<()> {
    let candidates = site
        .candidates
        .iter()
        .zip(report.coefficients.as_slice())
        .zip(report.coefficients.local_speeds())
        .enumerate()
        .map(|(index, ((position, w), u))| CandidateOutput {
            index,
            position: *position,
            expected_speed: *u,
            interference: *w,
        })
        .collect();

    let output = OptimizeOutput {
        site: &site.name,
        turbines: site.layout.turbines,
        min_separation_m: site.layout.min_separation.value(),
        backend: site.layout.backend.as_str(),
        reference_speed: report.coefficients.reference_speed(),
        candidates,
        outcome: &report.outcome,
        evaluation: report.evaluation.as_ref(),
        elapsed_ms: report.elapsed.as_millis() as u64,
    };

    let json = serde_json::to_string_pretty(&output).context("serializing solution")?;
    let mut file = File::create(path)
        .with_context(|| format!("creating output file: {}", path.display()))?;
    file.write_all(json.as_bytes()).context("writing output")?;
    Ok(())
}
