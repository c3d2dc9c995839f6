//! # windsite-core: Wind Site Modeling Core
//!
//! Provides the data structures shared by the wake-field model and the
//! turbine siting optimizer.
//!
//! ## Design Philosophy
//!
//! A siting run is described entirely by immutable inputs:
//! - **Candidates**: an ordered list of [`Position`]s; a candidate's identity is
//!   its index ([`CandidateId`])
//! - **Grid**: the sample points of the wind-speed field ([`Grid`])
//! - **Wind regime**: weighted [`WindScenario`]s ([`WindRegime`])
//! - **Turbine**: rotor diameter, thrust coefficient and [`PowerCurve`]
//!   ([`TurbineSpec`]), shared by every candidate
//! - **Decay constant**: wake expansion rate of the site ([`DecayConstant`])
//!
//! Everything downstream (fields, interference coefficients, layouts) is
//! derived from these and recomputed per run.
//!
//! ## Quick Start
//!
//! ```rust
//! use windsite_core::*;
//!
//! let grid = Grid::from_axes(Grid::linspace(-500.0, 1500.0, 81), Grid::linspace(-400.0, 400.0, 33))?;
//! let candidates = vec![Position::new(0.0, 0.0), Position::new(600.0, 0.0)];
//! let regime = WindRegime::new(vec![WindScenario::new(10.0, 270.0, 1.0)])?;
//! let curve = PowerCurve::from_pairs(&[(3.0, 0.0), (12.0, 2000.0), (25.0, 2000.0)])?;
//! let turbine = TurbineSpec::new(80.0, 0.8, curve)?;
//! let decay = DecayConstant::from_exposure(SiteExposure::Offshore);
//!
//! assert!(grid.contains(candidates[1]));
//! assert_eq!(decay.value(), 0.05);
//! # let _ = (regime, turbine);
//! # Ok::<(), SiteError>(())
//! ```
//!
//! ## Modules
//!
//! - [`units`] - unit newtypes (m/s, m, kW, degrees, radians)
//! - [`grid`] - rectilinear sample grid in `meshgrid` layout
//! - [`wind`] - wind scenarios, regimes and probability policies
//! - [`turbine`] - turbine spec, power curve and decay constant
//! - [`site`] - site definition files (TOML / JSON)
//! - [`diagnostics`] - collected warnings and errors for site validation
//! - [`error`] - unified error type

use serde::{Deserialize, Serialize};

pub mod diagnostics;
pub mod error;
pub mod grid;
pub mod site;
pub mod turbine;
pub mod units;
pub mod wind;

pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity};
pub use error::{SiteError, SiteResult};
pub use grid::Grid;
pub use site::{
    load_site_from_path, AxisSpec, LayoutSettings, MipBackendKind, ResolvedSite, SiteDefinition,
};
pub use turbine::{DecayConstant, PowerCurve, SiteExposure, TurbineSpec};
pub use units::{Degrees, Kilowatts, Meters, MetersPerSecond, Radians};
pub use wind::{ProbabilityPolicy, WindRegime, WindScenario};

/// Index of a candidate position in the ordered candidate list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(usize);

impl CandidateId {
    #[inline]
    pub fn new(value: usize) -> Self {
        CandidateId(value)
    }

    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Candidate#{}", self.0)
    }
}

/// A site coordinate in meters (x = east, y = north)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position
    #[inline]
    pub fn distance_to(&self, other: &Position) -> Meters {
        Meters((self.x - other.x).hypot(self.y - other.y))
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Position::new(x, y)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Reject an empty or non-finite candidate list.
pub fn validate_candidates(candidates: &[Position]) -> SiteResult<()> {
    if candidates.is_empty() {
        return Err(SiteError::Precondition("candidate list is empty".into()));
    }
    if let Some((idx, pos)) = candidates.iter().enumerate().find(|(_, p)| !p.is_finite()) {
        return Err(SiteError::Precondition(format!(
            "{} has a non-finite coordinate {}",
            CandidateId::new(idx),
            pos
        )));
    }
    Ok(())
}
