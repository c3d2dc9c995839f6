//! Interference pricing
//!
//! Reduces a [`WakeField`] to one coefficient per candidate:
//!
//! ```text
//! U_i   = bilinear(field, x_i, y_i)
//! U_max = max(field)
//! w_i   = P(U_max) − P(U_i)
//! ```
//!
//! `w_i` is an absolute power loss in the power-curve unit, measured against
//! the fastest point of the field itself rather than the free stream.

use crate::wake::WakeField;
use ndarray::{Array2, ArrayView1};
use serde::Serialize;
use tracing::debug;
use windsite_core::units::MetersPerSecond;
use windsite_core::{
    validate_candidates, CandidateId, Grid, Position, PowerCurve, SiteError, SiteResult,
};

/// Bilinear sampler over a field aligned with a grid
#[derive(Debug, Clone, Copy)]
pub struct FieldSampler<'a> {
    grid: &'a Grid,
    field: &'a Array2<f64>,
}

impl<'a> FieldSampler<'a> {
    pub fn new(grid: &'a Grid, field: &'a Array2<f64>) -> SiteResult<Self> {
        grid.ensure_aligned(field)?;
        Ok(Self { grid, field })
    }

    /// Field value at `pos`; positions outside the grid extent are rejected.
    pub fn sample(&self, pos: Position) -> SiteResult<f64> {
        if !pos.is_finite() || !self.grid.contains(pos) {
            return Err(SiteError::Validation(format!(
                "position {pos} lies outside the field grid"
            )));
        }
        let (i, tx) = cell(self.grid.x_axis(), pos.x);
        let (j, ty) = cell(self.grid.y_axis(), pos.y);

        let f = self.field;
        Ok((1.0 - tx) * (1.0 - ty) * f[[j, i]]
            + tx * (1.0 - ty) * f[[j, i + 1]]
            + (1.0 - tx) * ty * f[[j + 1, i]]
            + tx * ty * f[[j + 1, i + 1]])
    }
}

/// Lower cell index and fractional offset of `v` on a strictly increasing axis
/// with at least two points. `v` must lie within the axis range.
fn cell(axis: ArrayView1<'_, f64>, v: f64) -> (usize, f64) {
    let above = axis.iter().position(|&a| a > v).unwrap_or(axis.len());
    let upper = above.clamp(1, axis.len() - 1);
    let lo = upper - 1;
    let t = (v - axis[lo]) / (axis[upper] - axis[lo]);
    (lo, t)
}

/// Validated interference coefficients, one per candidate, in candidate order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterferenceCoefficients {
    values: Vec<f64>,
    local_speeds: Vec<f64>,
    reference_speed: f64,
}

impl InterferenceCoefficients {
    /// Accept externally computed coefficients after checking each is finite.
    pub fn from_values(values: Vec<f64>) -> SiteResult<Self> {
        for (idx, &w) in values.iter().enumerate() {
            finite_coefficient(idx, w)?;
        }
        Ok(Self {
            local_speeds: vec![f64::NAN; values.len()],
            values,
            reference_speed: f64::NAN,
        })
    }

    #[inline]
    pub fn get(&self, id: CandidateId) -> Option<f64> {
        self.values.get(id.value()).copied()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sampled expected speed `U_i` per candidate (NaN when supplied externally)
    pub fn local_speeds(&self) -> &[f64] {
        &self.local_speeds
    }

    /// `U_max`, the fastest point of the field the coefficients were priced on
    pub fn reference_speed(&self) -> f64 {
        self.reference_speed
    }
}

/// Typed scalar extraction: a coefficient is usable only if it is finite.
fn finite_coefficient(index: usize, value: f64) -> SiteResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SiteError::Validation(format!(
            "interference coefficient w[{index}] is not a finite number ({value})"
        )))
    }
}

/// Prices wake shading at each candidate with a power curve
#[derive(Debug, Clone, Copy)]
pub struct InterferenceEvaluator<'a> {
    curve: &'a PowerCurve,
}

impl<'a> InterferenceEvaluator<'a> {
    pub fn new(curve: &'a PowerCurve) -> Self {
        Self { curve }
    }

    pub fn evaluate(
        &self,
        grid: &Grid,
        field: &WakeField,
        candidates: &[Position],
    ) -> SiteResult<InterferenceCoefficients> {
        validate_candidates(candidates)?;
        let sampler = FieldSampler::new(grid, field.speeds())?;

        let u_max = field.max();
        if !u_max.is_finite() {
            return Err(SiteError::Validation(
                "wake field has no finite maximum".into(),
            ));
        }
        let p_max = self.curve.power(MetersPerSecond(u_max)).value();

        let mut values = Vec::with_capacity(candidates.len());
        let mut local_speeds = Vec::with_capacity(candidates.len());
        for (idx, pos) in candidates.iter().enumerate() {
            let u_i = sampler.sample(*pos)?;
            let w = finite_coefficient(idx, p_max - self.curve.power(MetersPerSecond(u_i)).value())?;
            debug!(candidate = idx, x = pos.x, y = pos.y, speed = u_i, w, "interference coefficient");
            values.push(w);
            local_speeds.push(u_i);
        }

        Ok(InterferenceCoefficients {
            values,
            local_speeds,
            reference_speed: u_max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn grid() -> Grid {
        Grid::from_axes(vec![0.0, 10.0, 20.0], vec![0.0, 10.0]).unwrap()
    }

    #[test]
    fn test_bilinear_sampling() {
        let grid = grid();
        let field = array![[0.0, 10.0, 20.0], [10.0, 20.0, 30.0]];
        let sampler = FieldSampler::new(&grid, &field).unwrap();
        assert_eq!(sampler.sample(Position::new(0.0, 0.0)).unwrap(), 0.0);
        assert_eq!(sampler.sample(Position::new(20.0, 10.0)).unwrap(), 30.0);
        assert!((sampler.sample(Position::new(5.0, 5.0)).unwrap() - 10.0).abs() < 1e-12);
        assert!((sampler.sample(Position::new(15.0, 2.5)).unwrap() - 17.5).abs() < 1e-12);
    }

    #[test]
    fn test_sampling_outside_grid_fails() {
        let grid = grid();
        let field = Array2::zeros((2, 3));
        let sampler = FieldSampler::new(&grid, &field).unwrap();
        assert!(matches!(
            sampler.sample(Position::new(25.0, 5.0)),
            Err(SiteError::Validation(_))
        ));
    }

    #[test]
    fn test_sampler_rejects_misaligned_field() {
        let grid = grid();
        let field = Array2::zeros((3, 2));
        assert!(matches!(
            FieldSampler::new(&grid, &field),
            Err(SiteError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_coefficients_relative_to_field_max() {
        let grid = grid();
        let curve = PowerCurve::from_pairs(&[(0.0, 0.0), (10.0, 1000.0)]).unwrap();
        let field = WakeField::from_array(&grid, array![[6.0, 8.0, 10.0], [6.0, 8.0, 10.0]]).unwrap();
        let coeffs = InterferenceEvaluator::new(&curve)
            .evaluate(
                &grid,
                &field,
                &[Position::new(20.0, 0.0), Position::new(10.0, 5.0), Position::new(0.0, 10.0)],
            )
            .unwrap();
        assert_eq!(coeffs.as_slice(), &[0.0, 200.0, 400.0]);
        assert_eq!(coeffs.reference_speed(), 10.0);
        assert_eq!(coeffs.local_speeds(), &[10.0, 8.0, 6.0]);
    }

    #[test]
    fn test_non_finite_field_value_is_validation_error() {
        let grid = grid();
        let curve = PowerCurve::from_pairs(&[(0.0, 0.0), (10.0, 1000.0)]).unwrap();
        let field =
            WakeField::from_array(&grid, array![[f64::NAN, 8.0, 10.0], [6.0, 8.0, 10.0]]).unwrap();
        let err = InterferenceEvaluator::new(&curve)
            .evaluate(&grid, &field, &[Position::new(0.0, 0.0)])
            .unwrap_err();
        assert!(err.to_string().contains("w[0]"));
    }

    #[test]
    fn test_from_values_validates() {
        assert!(InterferenceCoefficients::from_values(vec![0.0, 1.5]).is_ok());
        assert!(InterferenceCoefficients::from_values(vec![0.0, f64::INFINITY]).is_err());
    }
}
