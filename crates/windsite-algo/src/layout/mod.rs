//! Turbine Layout Selection
//!
//! Chooses exactly `N` of the candidate positions as a binary program.
//!
//! ## Problem Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  TURBINE LAYOUT SELECTION                                                │
//! │  ────────────────────────                                                │
//! │                                                                          │
//! │  Given:                                                                  │
//! │    • Candidate positions with interference coefficients w_i             │
//! │    • Turbine count N                                                     │
//! │    • Minimum separation D_min                                            │
//! │                                                                          │
//! │  Decide:                                                                 │
//! │    • Which candidates receive a turbine (binary decisions)              │
//! │                                                                          │
//! │  Maximize:                                                               │
//! │    Net-of-interference production proxy                                 │
//! │                                                                          │
//! │  Subject to:                                                             │
//! │    • Exactly N turbines                                                  │
//! │    • No two turbines closer than D_min                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## MILP Formulation
//!
//! ```text
//! maximize    Σ_i (1 − w_i) · x_i
//!
//! subject to:
//!   Σ_i x_i = N                                   Turbine count
//!   x_i + x_j ≤ 1   ∀ i < j : ‖p_i − p_j‖ < D_min  Pairwise exclusion
//!   x_i ∈ {0,1}
//! ```
//!
//! The coefficients are priced on the field of *all* candidates and held
//! fixed while a subset is chosen. [`evaluate_layout`] recomputes the field
//! from the chosen turbines alone for reporting; it never feeds back into
//! the selection.
//!
//! ## Outcomes
//!
//! | solver result      | [`LayoutOutcome`]                  |
//! |--------------------|------------------------------------|
//! | optimal / gap met  | `Optimal` with the layout          |
//! | time limit         | `TimeLimited` with the incumbent   |
//! | infeasible         | `Infeasible`, no layout            |
//! | anything else      | `Unknown` with the raw status      |
//!
//! ## Backends
//!
//! - `microlp` (default): pure-Rust branch and bound, no time limit support
//! - `highs` (`solver-highs`): time limit, MIP gap, verbose log
//! - Clarabel (`solver-clarabel`) solves the continuous relaxation
//!   `x ∈ [0,1]` to report an upper bound on the objective

mod backend;
mod evaluate;
mod problem;
mod solution;
mod solver;

pub use backend::{solver_for, MipOutcome, MipSolver, MipStatus};
#[cfg(feature = "solver-clarabel")]
pub use backend::relaxation_bound;
#[cfg(feature = "solver-highs")]
pub use backend::HighsSolver;
#[cfg(feature = "solver-microlp")]
pub use backend::MicrolpSolver;
pub use evaluate::{evaluate_layout, LayoutEvaluation, TurbineReport};
pub use problem::{LayoutProblem, LayoutProblemBuilder};
pub use solution::{LayoutOutcome, LayoutSolution};
pub use solver::{solve_layout, solve_layout_with, LayoutSolverConfig};
