//! MIP backends behind a common trait
//!
//! Every backend receives the same formulation, built fresh per call, and
//! reports the raw result as a [`MipOutcome`]. Interpreting it as a layout
//! is left to [`super::solve_layout`].

use super::{LayoutProblem, LayoutSolverConfig};
#[cfg(any(feature = "solver-microlp", feature = "solver-highs"))]
use good_lp::solvers::SolutionStatus;
use good_lp::{
    constraint, variable, variables, Constraint, Expression, ProblemVariables, Variable,
};
#[cfg(any(feature = "solver-microlp", feature = "solver-highs"))]
use good_lp::{ResolutionError, Solution};
use windsite_core::{MipBackendKind, SiteError, SiteResult};

/// How far the backend got
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MipStatus {
    /// Proven optimal
    Optimal,
    /// Stopped inside the requested relative gap
    GapLimit,
    /// Stopped by the time limit with an incumbent
    TimeLimit,
}

/// Raw result of one backend call
#[derive(Debug, Clone, PartialEq)]
pub enum MipOutcome {
    /// Variable values in candidate order
    Solved { status: MipStatus, values: Vec<f64> },
    Infeasible,
    /// Anything else the backend reported, verbatim
    Unknown(String),
}

/// A MIP capability that can solve the layout program
pub trait MipSolver {
    fn kind(&self) -> MipBackendKind;

    /// Whether `time_limit` in the config is honored
    fn supports_time_limit(&self) -> bool;

    fn solve(&self, problem: &LayoutProblem, config: &LayoutSolverConfig) -> SiteResult<MipOutcome>;
}

/// Backend for a configured kind, if it was compiled in.
pub fn solver_for(kind: MipBackendKind) -> SiteResult<Box<dyn MipSolver>> {
    match kind {
        #[cfg(feature = "solver-microlp")]
        MipBackendKind::Microlp => Ok(Box::new(MicrolpSolver)),
        #[cfg(feature = "solver-highs")]
        MipBackendKind::Highs => Ok(Box::new(HighsSolver)),
        #[allow(unreachable_patterns)]
        other => Err(SiteError::Config(format!(
            "MIP backend '{}' is not available in this build (enable the solver-{} feature)",
            other.as_str(),
            other.as_str()
        ))),
    }
}

/// Decision variables, objective and constraints of the layout program
struct Formulation {
    vars: ProblemVariables,
    x: Vec<Variable>,
    objective: Expression,
    constraints: Vec<Constraint>,
}

fn formulate(problem: &LayoutProblem, relaxed: bool) -> Formulation {
    let mut vars = variables!();

    let x: Vec<Variable> = (0..problem.len())
        .map(|_| {
            if relaxed {
                vars.add(variable().min(0.0).max(1.0))
            } else {
                vars.add(variable().binary())
            }
        })
        .collect();

    let mut objective = Expression::from(0.0);
    for (i, x_i) in x.iter().enumerate() {
        objective += problem.weight(i) * *x_i;
    }

    let mut constraints = Vec::new();

    let count: Expression = x.iter().copied().sum();
    let n = problem.turbines() as f64;
    constraints.push(constraint!(count == n));

    for (i, j) in problem.conflicts() {
        let (x_i, x_j) = (x[i], x[j]);
        constraints.push(constraint!(x_i + x_j <= 1.0));
    }

    Formulation {
        vars,
        x,
        objective,
        constraints,
    }
}

#[cfg(any(feature = "solver-microlp", feature = "solver-highs"))]
fn interpret<S: Solution>(result: Result<S, ResolutionError>, x: &[Variable]) -> MipOutcome {
    match result {
        Ok(solution) => {
            let status = match solution.status() {
                SolutionStatus::Optimal => MipStatus::Optimal,
                SolutionStatus::GapLimit => MipStatus::GapLimit,
                SolutionStatus::TimeLimit => MipStatus::TimeLimit,
            };
            MipOutcome::Solved {
                status,
                values: x.iter().map(|v| solution.value(*v)).collect(),
            }
        }
        Err(ResolutionError::Infeasible) => MipOutcome::Infeasible,
        Err(other) => MipOutcome::Unknown(other.to_string()),
    }
}

/// Pure-Rust branch and bound
#[cfg(feature = "solver-microlp")]
#[derive(Debug, Clone, Copy, Default)]
pub struct MicrolpSolver;

#[cfg(feature = "solver-microlp")]
impl MipSolver for MicrolpSolver {
    fn kind(&self) -> MipBackendKind {
        MipBackendKind::Microlp
    }

    fn supports_time_limit(&self) -> bool {
        false
    }

    fn solve(&self, problem: &LayoutProblem, _config: &LayoutSolverConfig) -> SiteResult<MipOutcome> {
        use good_lp::solvers::microlp::microlp;
        use good_lp::SolverModel;

        let Formulation {
            vars,
            x,
            objective,
            constraints,
        } = formulate(problem, false);

        let mut model = vars.maximise(objective).using(microlp);
        for c in constraints {
            model = model.with(c);
        }
        Ok(interpret(model.solve(), &x))
    }
}

/// HiGHS MIP solver
#[cfg(feature = "solver-highs")]
#[derive(Debug, Clone, Copy, Default)]
pub struct HighsSolver;

#[cfg(feature = "solver-highs")]
impl MipSolver for HighsSolver {
    fn kind(&self) -> MipBackendKind {
        MipBackendKind::Highs
    }

    fn supports_time_limit(&self) -> bool {
        true
    }

    fn solve(&self, problem: &LayoutProblem, config: &LayoutSolverConfig) -> SiteResult<MipOutcome> {
        use good_lp::solvers::highs::highs;
        use good_lp::solvers::{WithMipGap, WithTimeLimit};
        use good_lp::SolverModel;

        let Formulation {
            vars,
            x,
            objective,
            constraints,
        } = formulate(problem, false);

        let mut model = vars
            .maximise(objective)
            .using(highs)
            .set_verbose(config.verbose);
        if let Some(limit) = config.time_limit {
            model = model.with_time_limit(limit.as_secs_f64());
        }
        if let Some(gap) = config.mip_gap {
            model = model
                .with_mip_gap(gap as f32)
                .map_err(|e| SiteError::Solver(format!("invalid MIP gap {gap}: {e}")))?;
        }
        for c in constraints {
            model = model.with(c);
        }
        Ok(interpret(model.solve(), &x))
    }
}

/// Upper bound from the continuous relaxation `x ∈ [0,1]`.
///
/// Returns `None` when the relaxation itself is infeasible, in which case the
/// binary program is too.
#[cfg(feature = "solver-clarabel")]
pub fn relaxation_bound(problem: &LayoutProblem) -> SiteResult<Option<f64>> {
    use good_lp::solvers::clarabel::clarabel;
    use good_lp::{ResolutionError, Solution, SolverModel};

    let Formulation {
        vars,
        objective,
        constraints,
        ..
    } = formulate(problem, true);

    let mut model = vars.maximise(objective.clone()).using(clarabel);
    for c in constraints {
        model = model.with(c);
    }
    match model.solve() {
        Ok(solution) => Ok(Some(solution.eval(&objective))),
        Err(ResolutionError::Infeasible) => Ok(None),
        Err(e) => Err(SiteError::Solver(format!("relaxation failed: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interference::InterferenceCoefficients;
    use crate::layout::LayoutProblemBuilder;
    use windsite_core::units::Meters;
    use windsite_core::Position;

    fn problem(weights: Vec<f64>, n: usize, d_min: f64) -> LayoutProblem {
        let candidates = (0..weights.len())
            .map(|i| Position::new(i as f64 * 100.0, 0.0))
            .collect();
        LayoutProblemBuilder::new(candidates)
            .coefficients(InterferenceCoefficients::from_values(weights).unwrap())
            .turbines(n)
            .min_separation(Meters(d_min))
            .build()
            .unwrap()
    }

    #[test]
    fn test_formulation_shape() {
        let f = formulate(&problem(vec![0.0; 4], 2, 150.0), false);
        assert_eq!(f.x.len(), 4);
        // count + three adjacent exclusions
        assert_eq!(f.constraints.len(), 4);
    }

    #[cfg(feature = "solver-microlp")]
    #[test]
    fn test_microlp_picks_best_separated_pair() {
        // w = [0.0, 0.5, 0.1, 0.9]: 0 and 2 are the cheapest non-adjacent pair
        let p = problem(vec![0.0, 0.5, 0.1, 0.9], 2, 150.0);
        let outcome = MicrolpSolver.solve(&p, &LayoutSolverConfig::default()).unwrap();
        match outcome {
            MipOutcome::Solved { status, values } => {
                assert_eq!(status, MipStatus::Optimal);
                let chosen: Vec<usize> = values
                    .iter()
                    .enumerate()
                    .filter(|(_, &v)| v > 0.5)
                    .map(|(i, _)| i)
                    .collect();
                assert_eq!(chosen, vec![0, 2]);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[cfg(feature = "solver-microlp")]
    #[test]
    fn test_microlp_reports_infeasible() {
        // all three within 150 m of each other pairwise along a 50 m line
        let candidates = vec![
            Position::new(0.0, 0.0),
            Position::new(50.0, 0.0),
            Position::new(100.0, 0.0),
        ];
        let p = LayoutProblemBuilder::new(candidates)
            .coefficients(InterferenceCoefficients::from_values(vec![0.0; 3]).unwrap())
            .turbines(2)
            .min_separation(Meters(150.0))
            .build()
            .unwrap();
        let outcome = MicrolpSolver.solve(&p, &LayoutSolverConfig::default()).unwrap();
        assert_eq!(outcome, MipOutcome::Infeasible);
    }

    #[cfg(feature = "solver-clarabel")]
    #[test]
    fn test_relaxation_bounds_integer_optimum() {
        let p = problem(vec![0.0, 0.5, 0.1, 0.9], 2, 150.0);
        let bound = relaxation_bound(&p).unwrap().unwrap();
        // integer optimum is (1 - 0.0) + (1 - 0.1) = 1.9
        assert!(bound >= 1.9 - 1e-6);
        assert!(bound <= 2.0 + 1e-6);
    }

    #[test]
    fn test_solver_for_default_backend() {
        let result = solver_for(MipBackendKind::Microlp);
        if cfg!(feature = "solver-microlp") {
            assert_eq!(result.unwrap().kind(), MipBackendKind::Microlp);
        } else {
            assert!(result.is_err());
        }
    }
}
