//! Site definition files.
//!
//! A site file describes one siting run: turbine, wake decay, sample grid,
//! candidate positions, wind regime and layout settings. TOML is the default
//! format; JSON is accepted by extension.
//!
//! ```toml
//! [turbine]
//! rotor_diameter_m = 80.0
//! thrust_coefficient = 0.8
//! power_curve = [[3.0, 0.0], [12.0, 2000.0], [25.0, 2000.0]]
//!
//! [wake]
//! exposure = "offshore"
//!
//! [grid]
//! x = { start = -500.0, end = 2500.0, points = 151 }
//! y = { start = -1000.0, end = 1000.0, points = 101 }
//!
//! [candidates]
//! lattice = { x_start = 0.0, x_end = 2000.0, y_start = -800.0, y_end = 800.0, spacing = 400.0 }
//!
//! [wind]
//! normalization = "warn"
//! scenarios = [
//!     { speed = 10.0, direction = 270.0, probability = 0.6 },
//!     { speed = 8.0, direction = 225.0, probability = 0.4 },
//! ]
//!
//! [layout]
//! turbines = 6
//! min_separation_diameters = 5.0
//! ```

use crate::diagnostics::Diagnostics;
use crate::grid::Grid;
use crate::turbine::{DecayConstant, PowerCurve, SiteExposure, TurbineSpec};
use crate::units::Meters;
use crate::wind::{ProbabilityPolicy, WindRegime, WindScenario};
use crate::{validate_candidates, Position, SiteError, SiteResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteDefinition {
    #[serde(default)]
    pub name: Option<String>,
    pub turbine: TurbineSection,
    pub wake: WakeSection,
    pub grid: GridSection,
    pub candidates: CandidateSection,
    pub wind: WindSection,
    pub layout: LayoutSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurbineSection {
    pub rotor_diameter_m: f64,
    pub thrust_coefficient: f64,
    /// `[speed_mps, power_kw]` pairs
    pub power_curve: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WakeSection {
    pub decay_constant: Option<f64>,
    pub exposure: Option<SiteExposure>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub start: f64,
    pub end: f64,
    pub points: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSection {
    pub x: AxisSpec,
    pub y: AxisSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatticeSpec {
    pub x_start: f64,
    pub x_end: f64,
    pub y_start: f64,
    pub y_end: f64,
    pub spacing: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateSection {
    #[serde(default)]
    pub positions: Vec<[f64; 2]>,
    #[serde(default)]
    pub lattice: Option<LatticeSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindSection {
    #[serde(default)]
    pub normalization: ProbabilityPolicy,
    #[serde(default)]
    pub scenarios: Vec<ScenarioEntry>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScenarioEntry {
    pub speed: f64,
    pub direction: f64,
    #[serde(default = "default_probability")]
    pub probability: f64,
}

fn default_probability() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutSection {
    pub turbines: usize,
    pub min_separation_m: Option<f64>,
    pub min_separation_diameters: Option<f64>,
    #[serde(default)]
    pub backend: MipBackendKind,
    pub time_limit_s: Option<f64>,
    pub mip_gap: Option<f64>,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default = "default_relaxation_bound")]
    pub relaxation_bound: bool,
}

fn default_relaxation_bound() -> bool {
    true
}

/// MIP backend used for the layout problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MipBackendKind {
    /// Pure-Rust branch and bound
    #[default]
    Microlp,
    /// HiGHS (requires the `solver-highs` feature)
    Highs,
}

impl MipBackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MipBackendKind::Microlp => "microlp",
            MipBackendKind::Highs => "highs",
        }
    }
}

impl std::str::FromStr for MipBackendKind {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "microlp" => Ok(Self::Microlp),
            "highs" => Ok(Self::Highs),
            other => Err(SiteError::Config(format!("unknown MIP backend '{other}'"))),
        }
    }
}

/// Solver-facing layout settings after resolution
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSettings {
    /// Exact number of turbines to place (N)
    pub turbines: usize,
    /// Minimum pairwise separation (D_min)
    pub min_separation: Meters,
    pub backend: MipBackendKind,
    pub time_limit: Option<Duration>,
    pub mip_gap: Option<f64>,
    pub verbose: bool,
    pub relaxation_bound: bool,
}

/// Fully typed, precondition-checked site
#[derive(Debug, Clone)]
pub struct ResolvedSite {
    pub name: String,
    pub turbine: TurbineSpec,
    pub decay: DecayConstant,
    pub grid: Grid,
    pub candidates: Vec<Position>,
    pub regime: WindRegime,
    pub layout: LayoutSettings,
}

pub fn load_site_from_path(path: &Path) -> SiteResult<SiteDefinition> {
    let data = fs::read_to_string(path)?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(serde_json::from_str(&data)?),
        Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(toml::from_str(&data)?),
        _ => toml::from_str(&data)
            .or_else(|_| serde_json::from_str(&data))
            .map_err(|err| SiteError::Parse(format!("{}: {err}", path.display()))),
    }
}

impl SiteDefinition {
    pub fn from_toml_str(data: &str) -> SiteResult<Self> {
        Ok(toml::from_str(data)?)
    }

    /// Turn the raw definition into typed values, failing at the first violated precondition.
    pub fn resolve(&self) -> SiteResult<ResolvedSite> {
        let pairs: Vec<(f64, f64)> = self
            .turbine
            .power_curve
            .iter()
            .map(|[u, p]| (*u, *p))
            .collect();
        let curve = PowerCurve::from_pairs(&pairs)?;
        let turbine = TurbineSpec::new(
            self.turbine.rotor_diameter_m,
            self.turbine.thrust_coefficient,
            curve,
        )?;

        let decay = match (self.wake.decay_constant, self.wake.exposure) {
            (Some(k), _) => DecayConstant::new(k)?,
            (None, Some(exposure)) => DecayConstant::from_exposure(exposure),
            (None, None) => {
                return Err(SiteError::Config(
                    "[wake] needs either decay_constant or exposure".into(),
                ))
            }
        };

        let grid = Grid::from_axes(
            Grid::linspace(self.grid.x.start, self.grid.x.end, self.grid.x.points),
            Grid::linspace(self.grid.y.start, self.grid.y.end, self.grid.y.points),
        )?;

        let candidates = self.candidates.positions()?;
        validate_candidates(&candidates)?;

        let scenarios = self
            .wind
            .scenarios
            .iter()
            .map(|s| WindScenario::new(s.speed, s.direction, s.probability))
            .collect();
        let regime = WindRegime::with_policy(scenarios, self.wind.normalization)?;

        let layout = self.layout.resolve(turbine.rotor_diameter)?;

        Ok(ResolvedSite {
            name: self.name.clone().unwrap_or_else(|| "site".to_string()),
            turbine,
            decay,
            grid,
            candidates,
            regime,
            layout,
        })
    }

    /// Collect every problem with this definition instead of stopping at the first.
    pub fn diagnose(&self) -> Diagnostics {
        let mut diag = Diagnostics::new();
        let site = match self.resolve() {
            Ok(site) => site,
            Err(err) => {
                diag.add_error("resolve", &err.to_string());
                return diag;
            }
        };

        let total = site.regime.total_probability();
        if (total - 1.0).abs() > crate::wind::PROBABILITY_TOLERANCE {
            diag.add_warning(
                "wind",
                &format!("scenario probabilities sum to {total:.6}, not 1"),
            );
        }

        for (idx, pos) in site.candidates.iter().enumerate() {
            if !site.grid.contains(*pos) {
                diag.add_error_with_entity(
                    "grid",
                    "candidate lies outside the sample grid",
                    &format!("Candidate#{idx} {pos}"),
                );
            }
            if let Some(dup) = site.candidates[..idx].iter().position(|p| p == pos) {
                diag.add_warning_with_entity(
                    "candidates",
                    &format!("duplicates Candidate#{dup}"),
                    &format!("Candidate#{idx}"),
                );
            }
        }

        if site.layout.turbines > site.candidates.len() {
            diag.add_error(
                "layout",
                &format!(
                    "{} turbines requested but only {} candidates",
                    site.layout.turbines,
                    site.candidates.len()
                ),
            );
        }
        if site.layout.min_separation < site.turbine.rotor_diameter {
            diag.add_warning(
                "layout",
                &format!(
                    "minimum separation {} is below the rotor diameter {}",
                    site.layout.min_separation, site.turbine.rotor_diameter
                ),
            );
        }
        if site.layout.time_limit.is_some() && site.layout.backend == MipBackendKind::Microlp {
            diag.add_warning("layout", "time_limit_s is ignored by the microlp backend");
        }

        diag
    }
}

impl CandidateSection {
    /// Explicit positions first, then lattice points row by row (south to north, west to east).
    pub fn positions(&self) -> SiteResult<Vec<Position>> {
        let mut out: Vec<Position> = self
            .positions
            .iter()
            .map(|[x, y]| Position::new(*x, *y))
            .collect();
        if let Some(lattice) = &self.lattice {
            out.extend(lattice.points()?);
        }
        Ok(out)
    }
}

impl LatticeSpec {
    pub fn points(&self) -> SiteResult<Vec<Position>> {
        if !self.spacing.is_finite() || self.spacing <= 0.0 {
            return Err(SiteError::Config(format!(
                "lattice spacing must be positive, got {}",
                self.spacing
            )));
        }
        if self.x_end < self.x_start || self.y_end < self.y_start {
            return Err(SiteError::Config("lattice end lies before its start".into()));
        }
        // tolerate rounding so that an end landing on the lattice is included
        let steps = |start: f64, end: f64| ((end - start) / self.spacing + 1e-9).floor() as usize;
        let (nx, ny) = (
            steps(self.x_start, self.x_end),
            steps(self.y_start, self.y_end),
        );
        let mut points = Vec::with_capacity((nx + 1) * (ny + 1));
        for j in 0..=ny {
            for i in 0..=nx {
                points.push(Position::new(
                    self.x_start + i as f64 * self.spacing,
                    self.y_start + j as f64 * self.spacing,
                ));
            }
        }
        Ok(points)
    }
}

impl LayoutSection {
    fn resolve(&self, rotor_diameter: Meters) -> SiteResult<LayoutSettings> {
        if self.turbines == 0 {
            return Err(SiteError::Config("layout.turbines must be at least 1".into()));
        }
        let min_separation = match (self.min_separation_m, self.min_separation_diameters) {
            (Some(m), None) => Meters(m),
            (None, Some(d)) => rotor_diameter * d,
            (None, None) => Meters(0.0),
            (Some(_), Some(_)) => {
                return Err(SiteError::Config(
                    "set only one of min_separation_m and min_separation_diameters".into(),
                ))
            }
        };
        if !min_separation.is_finite() || min_separation.value() < 0.0 {
            return Err(SiteError::Config(format!(
                "minimum separation must be non-negative, got {min_separation}"
            )));
        }
        let time_limit = match self.time_limit_s {
            Some(secs) if secs.is_finite() && secs > 0.0 => Some(Duration::from_secs_f64(secs)),
            Some(secs) => {
                return Err(SiteError::Config(format!(
                    "time_limit_s must be positive, got {secs}"
                )))
            }
            None => None,
        };
        if let Some(gap) = self.mip_gap {
            if !(0.0..1.0).contains(&gap) {
                return Err(SiteError::Config(format!(
                    "mip_gap must lie in [0, 1), got {gap}"
                )));
            }
        }
        Ok(LayoutSettings {
            turbines: self.turbines,
            min_separation,
            backend: self.backend,
            time_limit,
            mip_gap: self.mip_gap,
            verbose: self.verbose,
            relaxation_bound: self.relaxation_bound,
        })
    }
}
