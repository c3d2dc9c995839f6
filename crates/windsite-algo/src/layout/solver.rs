//! Layout MILP driver
//!
//! Runs a backend on a [`LayoutProblem`] and maps its raw result onto a
//! [`LayoutOutcome`].

use super::backend::{solver_for, MipOutcome, MipSolver, MipStatus};
use super::{LayoutOutcome, LayoutProblem, LayoutSolution};
use std::time::{Duration, Instant};
use tracing::{info, warn};
use windsite_core::{CandidateId, LayoutSettings, MipBackendKind, SiteError, SiteResult};

/// Layout solver configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSolverConfig {
    pub backend: MipBackendKind,
    /// Wall-clock limit passed to the backend, if it supports one
    pub time_limit: Option<Duration>,
    /// Relative MIP gap tolerance
    pub mip_gap: Option<f64>,
    /// Whether to enable verbose solver output
    pub verbose: bool,
    /// Also solve the continuous relaxation for an upper bound
    pub relaxation_bound: bool,
}

impl Default for LayoutSolverConfig {
    fn default() -> Self {
        Self {
            backend: MipBackendKind::default(),
            time_limit: None,
            mip_gap: None,
            verbose: false,
            relaxation_bound: false,
        }
    }
}

impl From<&LayoutSettings> for LayoutSolverConfig {
    fn from(settings: &LayoutSettings) -> Self {
        Self {
            backend: settings.backend,
            time_limit: settings.time_limit,
            mip_gap: settings.mip_gap,
            verbose: settings.verbose,
            relaxation_bound: settings.relaxation_bound,
        }
    }
}

/// Value above which a binary variable counts as selected
const SELECTION_THRESHOLD: f64 = 0.5;

/// Solve the layout problem.
///
/// Solver statuses are outcomes, not errors: an `Err` means the backend could
/// not be run or returned an assignment that breaks the constraints.
///
/// # Example
///
/// ```no_run
/// use windsite_algo::layout::{solve_layout, LayoutProblemBuilder, LayoutSolverConfig};
/// use windsite_algo::InterferenceCoefficients;
/// use windsite_core::{units::Meters, Position};
///
/// let candidates = vec![Position::new(0.0, 0.0), Position::new(500.0, 0.0)];
/// let problem = LayoutProblemBuilder::new(candidates)
///     .coefficients(InterferenceCoefficients::from_values(vec![0.0, 120.0])?)
///     .turbines(1)
///     .min_separation(Meters(400.0))
///     .build()?;
///
/// let outcome = solve_layout(&problem, &LayoutSolverConfig::default())?;
/// println!("{}", outcome.summary());
/// # Ok::<(), windsite_core::SiteError>(())
/// ```
pub fn solve_layout(
    problem: &LayoutProblem,
    config: &LayoutSolverConfig,
) -> SiteResult<LayoutOutcome> {
    if let Some(outcome) = too_many_turbines(problem) {
        return Ok(outcome);
    }
    let solver = solver_for(config.backend)?;
    solve_layout_with(solver.as_ref(), problem, config)
}

/// Solve the layout problem on a given backend.
///
/// `config.backend` is ignored; the solution reports `solver.kind()`.
pub fn solve_layout_with(
    solver: &dyn MipSolver,
    problem: &LayoutProblem,
    config: &LayoutSolverConfig,
) -> SiteResult<LayoutOutcome> {
    let start = Instant::now();

    if let Some(outcome) = too_many_turbines(problem) {
        return Ok(outcome);
    }

    let backend = solver.kind();
    if config.time_limit.is_some() && !solver.supports_time_limit() {
        warn!(
            backend = backend.as_str(),
            "time limit is not supported by this backend and will be ignored"
        );
    }

    info!(
        backend = backend.as_str(),
        candidates = problem.len(),
        turbines = problem.turbines(),
        exclusions = problem.conflicts().len(),
        "solving layout program"
    );

    let (status, values) = match solver.solve(problem, config)? {
        MipOutcome::Solved { status, values } => (status, values),
        MipOutcome::Infeasible => {
            info!("layout program is infeasible");
            return Ok(LayoutOutcome::Infeasible {
                reason: format!(
                    "no {} candidates can be chosen with pairwise separation of at least {}",
                    problem.turbines(),
                    problem.min_separation()
                ),
            });
        }
        MipOutcome::Unknown(status) => {
            warn!(%status, "layout solver returned no usable status");
            return Ok(LayoutOutcome::Unknown { raw_status: status });
        }
    };

    let selected: Vec<CandidateId> = values
        .iter()
        .enumerate()
        .filter(|(_, &v)| v > SELECTION_THRESHOLD)
        .map(|(i, _)| CandidateId::new(i))
        .collect();

    if !problem.is_feasible(&selected) {
        return Err(SiteError::Solver(format!(
            "{} returned a selection of {} candidates that violates the count or spacing constraints",
            backend.as_str(),
            selected.len()
        )));
    }

    let relaxation_bound = if config.relaxation_bound {
        compute_relaxation_bound(problem)?
    } else {
        None
    };

    let solution = LayoutSolution {
        positions: selected
            .iter()
            .map(|id| problem.candidates()[id.value()])
            .collect(),
        coefficients: selected
            .iter()
            .map(|id| problem.coefficients().as_slice()[id.value()])
            .collect(),
        objective: problem.objective_value(&selected),
        selected,
        relaxation_bound,
        solve_time: start.elapsed(),
        backend,
        status_message: match status {
            MipStatus::Optimal => "Optimal".to_string(),
            MipStatus::GapLimit => "Optimal (within MIP gap)".to_string(),
            MipStatus::TimeLimit => "Time limit reached".to_string(),
        },
    };

    info!(
        objective = solution.objective,
        elapsed = ?solution.solve_time,
        status = %solution.status_message,
        "layout solved"
    );

    Ok(match status {
        MipStatus::Optimal | MipStatus::GapLimit => LayoutOutcome::Optimal(solution),
        MipStatus::TimeLimit => {
            warn!("time limit reached; reporting incumbent layout");
            LayoutOutcome::TimeLimited(solution)
        }
    })
}

fn too_many_turbines(problem: &LayoutProblem) -> Option<LayoutOutcome> {
    (problem.turbines() > problem.len()).then(|| LayoutOutcome::Infeasible {
        reason: format!(
            "{} turbines requested but only {} candidates available",
            problem.turbines(),
            problem.len()
        ),
    })
}

#[cfg(feature = "solver-clarabel")]
fn compute_relaxation_bound(problem: &LayoutProblem) -> SiteResult<Option<f64>> {
    super::backend::relaxation_bound(problem)
}

#[cfg(not(feature = "solver-clarabel"))]
fn compute_relaxation_bound(_problem: &LayoutProblem) -> SiteResult<Option<f64>> {
    warn!("relaxation bound requested but the solver-clarabel feature is disabled");
    Ok(None)
}
