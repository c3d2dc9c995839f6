//! # windsite-algo: Wake Interference and Turbine Siting
//!
//! The siting pipeline runs in one direction:
//!
//! ```text
//! candidates + wind regime ──► WakeModel ──► WakeField
//!                                              │
//!                      PowerCurve ──► InterferenceEvaluator ──► w_i per candidate
//!                                                                  │
//!                                  spacing + count ──► solve_layout ──► LayoutOutcome
//! ```
//!
//! ## Wake field
//!
//! [`wake::WakeModel`] applies the Jensen single-wake deficit law per turbine,
//! combines turbines by pointwise minimum and aggregates scenarios by
//! probability weight.
//!
//! ## Interference
//!
//! [`interference::InterferenceEvaluator`] samples the field bilinearly at each
//! candidate and prices the wake loss as `P(U_max) − P(U_i)`.
//!
//! ## Layout
//!
//! [`layout`] turns the coefficients into a binary program (exact count,
//! pairwise exclusion below the minimum separation) and hands it to a MIP
//! backend through `good_lp`.
//!
//! ## Example
//!
//! ```ignore
//! use windsite_algo::SitingRun;
//! use windsite_core::load_site_from_path;
//!
//! let site = load_site_from_path("site.toml".as_ref())?.resolve()?;
//! let report = SitingRun::new(&site).run()?;
//! println!("{}", report.outcome.summary());
//! ```

pub mod interference;
pub mod layout;
pub mod pipeline;
pub mod wake;

pub use interference::{FieldSampler, InterferenceCoefficients, InterferenceEvaluator};
pub use layout::{
    evaluate_layout, solve_layout, LayoutEvaluation, LayoutOutcome, LayoutProblem,
    LayoutProblemBuilder, LayoutSolution, LayoutSolverConfig,
};
pub use pipeline::{SitingReport, SitingRun};
pub use wake::{JensenWake, WakeField, WakeModel, WindFrame};
