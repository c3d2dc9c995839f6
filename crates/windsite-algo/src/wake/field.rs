//! Wake-combined and probability-aggregated wind-speed fields

use super::jensen::{JensenWake, WindFrame};
use ndarray::{Array2, Zip};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};
use windsite_core::{
    validate_candidates, DecayConstant, Grid, Position, SiteResult, TurbineSpec, WindRegime,
    WindScenario,
};

/// Expected wind speed at every grid point, aligned with the grid it was computed on
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WakeField {
    speeds: Array2<f64>,
}

impl WakeField {
    /// Wrap an externally computed array, checking it against the grid shape.
    pub fn from_array(grid: &Grid, speeds: Array2<f64>) -> SiteResult<Self> {
        grid.ensure_aligned(&speeds)?;
        Ok(Self { speeds })
    }

    #[inline]
    pub fn speeds(&self) -> &Array2<f64> {
        &self.speeds
    }

    pub fn shape(&self) -> (usize, usize) {
        self.speeds.dim()
    }

    /// Largest speed in the field; NaN entries are skipped
    pub fn max(&self) -> f64 {
        self.speeds.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Smallest speed in the field; NaN entries are skipped
    pub fn min(&self) -> f64 {
        self.speeds.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Grid coordinates of the fastest sample point
    pub fn argmax(&self, grid: &Grid) -> Option<Position> {
        let mut best: Option<((usize, usize), f64)> = None;
        for (idx, &u) in self.speeds.indexed_iter() {
            if u.is_nan() {
                continue;
            }
            if best.map_or(true, |(_, b)| u > b) {
                best = Some((idx, u));
            }
        }
        best.map(|(idx, _)| Position::new(grid.x()[idx], grid.y()[idx]))
    }
}

/// Jensen wake model bound to one turbine type and decay constant
#[derive(Debug, Clone, Copy)]
pub struct WakeModel {
    jensen: JensenWake,
}

impl WakeModel {
    pub fn new(turbine: &TurbineSpec, decay: DecayConstant) -> Self {
        Self {
            jensen: JensenWake::new(turbine, decay),
        }
    }

    pub fn jensen(&self) -> &JensenWake {
        &self.jensen
    }

    /// Wake-combined speed field for one scenario, unweighted.
    ///
    /// Starts from the free-stream speed and lowers each point to the slowest
    /// wake speed of any turbine whose cone contains it.
    pub fn scenario_field(
        &self,
        grid: &Grid,
        turbines: &[Position],
        scenario: &WindScenario,
    ) -> SiteResult<Array2<f64>> {
        validate_candidates(turbines)?;
        let u = scenario.speed.value();
        let frame = WindFrame::for_direction(scenario.direction);
        let mut field = Array2::from_elem(grid.shape(), u);

        for turbine in turbines {
            Zip::from(&mut field)
                .and(grid.x())
                .and(grid.y())
                .for_each(|speed, &x, &y| {
                    let (downstream, lateral) = frame.project(x - turbine.x, y - turbine.y);
                    if self.jensen.in_wake(downstream, lateral) {
                        let wake_speed = u - self.jensen.axial_deficit(u, downstream);
                        *speed = speed.min(wake_speed);
                    }
                });
        }
        Ok(field)
    }

    /// Probability-weighted expectation of the scenario fields.
    pub fn field(
        &self,
        grid: &Grid,
        turbines: &[Position],
        regime: &WindRegime,
    ) -> SiteResult<WakeField> {
        validate_candidates(turbines)?;
        info!(
            turbines = turbines.len(),
            scenarios = regime.len(),
            grid = ?grid.shape(),
            "computing wake field"
        );

        let per_scenario = self.scenario_fields(grid, turbines, regime)?;

        let mut speeds = Array2::<f64>::zeros(grid.shape());
        for (scenario, field) in regime.iter().zip(per_scenario.iter()) {
            speeds.scaled_add(scenario.probability, field);
        }
        Ok(WakeField { speeds })
    }

    #[cfg(feature = "parallel")]
    fn scenario_fields(
        &self,
        grid: &Grid,
        turbines: &[Position],
        regime: &WindRegime,
    ) -> SiteResult<Vec<Array2<f64>>> {
        regime
            .scenarios()
            .par_iter()
            .enumerate()
            .map(|(idx, scenario)| {
                debug!(scenario = idx, speed = %scenario.speed, direction = %scenario.direction, "scenario field");
                self.scenario_field(grid, turbines, scenario)
            })
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn scenario_fields(
        &self,
        grid: &Grid,
        turbines: &[Position],
        regime: &WindRegime,
    ) -> SiteResult<Vec<Array2<f64>>> {
        regime
            .iter()
            .enumerate()
            .map(|(idx, scenario)| {
                debug!(scenario = idx, speed = %scenario.speed, direction = %scenario.direction, "scenario field");
                self.scenario_field(grid, turbines, scenario)
            })
            .collect()
    }
}
