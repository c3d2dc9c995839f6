//! Layout solution data structures
//!
//! Defines the output from solving layout problems.

use serde::Serialize;
use std::time::Duration;
use windsite_core::{CandidateId, MipBackendKind, Position};

/// A concrete turbine layout returned by a backend
#[derive(Debug, Clone, Serialize)]
pub struct LayoutSolution {
    /// Selected candidates in candidate order
    pub selected: Vec<CandidateId>,
    /// Positions of the selected candidates
    pub positions: Vec<Position>,
    /// `Σ (1 − w_i)` over the selection
    pub objective: f64,
    /// Interference coefficients of the selection
    pub coefficients: Vec<f64>,
    /// Continuous relaxation bound, if computed
    pub relaxation_bound: Option<f64>,
    #[serde(with = "secs")]
    pub solve_time: Duration,
    pub backend: MipBackendKind,
    /// Solver status message
    pub status_message: String,
}

impl LayoutSolution {
    /// Number of turbines placed
    pub fn turbines(&self) -> usize {
        self.selected.len()
    }

    /// Relative gap between the relaxation bound and the objective
    pub fn relaxation_gap(&self) -> Option<f64> {
        self.relaxation_bound.map(|bound| {
            let denom = bound.abs().max(1e-12);
            ((bound - self.objective) / denom).max(0.0)
        })
    }

    /// Total interference loss `Σ w_i` of the selection
    pub fn total_interference(&self) -> f64 {
        self.coefficients.iter().sum()
    }

    /// Format a human-readable summary
    pub fn summary(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("Layout Solution Summary\n{}\n", "=".repeat(40)));
        s.push_str(&format!("Status: {}\n", self.status_message));
        s.push_str(&format!("Backend: {}\n", self.backend.as_str()));
        s.push_str(&format!("Objective: {:.4}\n", self.objective));
        s.push_str(&format!(
            "Interference Loss: {:.4}\n",
            self.total_interference()
        ));
        if let Some(bound) = self.relaxation_bound {
            s.push_str(&format!("Relaxation Bound: {:.4}\n", bound));
        }
        if let Some(gap) = self.relaxation_gap() {
            s.push_str(&format!("Relaxation Gap: {:.4}%\n", gap * 100.0));
        }
        s.push_str(&format!("Turbines Placed: {}\n", self.turbines()));
        s.push_str(&format!("Solve Time: {:.2?}\n", self.solve_time));

        if !self.selected.is_empty() {
            s.push_str("\nSelected Positions:\n");
            for ((id, pos), w) in self
                .selected
                .iter()
                .zip(&self.positions)
                .zip(&self.coefficients)
            {
                s.push_str(&format!("  [PLACE] {} at {} (w = {:.4})\n", id, pos, w));
            }
        }

        s
    }
}

/// Result of one layout optimization run
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LayoutOutcome {
    /// Proven optimal, or optimal within the requested MIP gap
    Optimal(LayoutSolution),
    /// Time limit hit; the incumbent carries no optimality guarantee
    TimeLimited(LayoutSolution),
    /// No assignment satisfies the count and spacing constraints
    Infeasible { reason: String },
    /// Any other backend status, surfaced verbatim
    Unknown { raw_status: String },
}

impl LayoutOutcome {
    /// Short machine-readable status
    pub fn label(&self) -> &'static str {
        match self {
            LayoutOutcome::Optimal(_) => "optimal",
            LayoutOutcome::TimeLimited(_) => "time_limit",
            LayoutOutcome::Infeasible { .. } => "infeasible",
            LayoutOutcome::Unknown { .. } => "unknown",
        }
    }

    pub fn is_optimal(&self) -> bool {
        matches!(self, LayoutOutcome::Optimal(_))
    }

    /// The layout, only when optimality is established
    pub fn layout(&self) -> Option<&LayoutSolution> {
        match self {
            LayoutOutcome::Optimal(solution) => Some(solution),
            _ => None,
        }
    }

    /// Best known layout: the optimum or a time-limited incumbent
    pub fn incumbent(&self) -> Option<&LayoutSolution> {
        match self {
            LayoutOutcome::Optimal(solution) | LayoutOutcome::TimeLimited(solution) => {
                Some(solution)
            }
            _ => None,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            LayoutOutcome::Optimal(solution) => solution.summary(),
            LayoutOutcome::TimeLimited(solution) => format!(
                "{}\nWARNING: time limit reached; layout is not proven optimal\n",
                solution.summary()
            ),
            LayoutOutcome::Infeasible { reason } => {
                format!("Layout Infeasible\n{}\n{}\n", "=".repeat(40), reason)
            }
            LayoutOutcome::Unknown { raw_status } => format!(
                "Layout Not Solved\n{}\nSolver status: {}\n",
                "=".repeat(40),
                raw_status
            ),
        }
    }
}

mod secs {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }
}
