//! Layout problem data structures
//!
//! Defines the input of the turbine selection program.

use crate::interference::InterferenceCoefficients;
use windsite_core::units::Meters;
use windsite_core::{validate_candidates, CandidateId, Position, SiteError, SiteResult};

/// Selection problem over an ordered candidate list.
///
/// Coefficients are taken as already validated by
/// [`InterferenceCoefficients`]; they are not checked again here.
#[derive(Debug, Clone)]
pub struct LayoutProblem {
    candidates: Vec<Position>,
    coefficients: InterferenceCoefficients,
    turbines: usize,
    min_separation: Meters,
}

impl LayoutProblem {
    pub fn new(
        candidates: Vec<Position>,
        coefficients: InterferenceCoefficients,
        turbines: usize,
        min_separation: Meters,
    ) -> SiteResult<Self> {
        validate_candidates(&candidates)?;
        if coefficients.len() != candidates.len() {
            return Err(SiteError::DimensionMismatch {
                expected: (candidates.len(), 1),
                found: (coefficients.len(), 1),
            });
        }
        if turbines == 0 {
            return Err(SiteError::Precondition(
                "turbine count must be at least 1".into(),
            ));
        }
        if !min_separation.is_finite() || min_separation.value() < 0.0 {
            return Err(SiteError::Precondition(format!(
                "minimum separation must be a non-negative distance, got {min_separation}"
            )));
        }
        Ok(Self {
            candidates,
            coefficients,
            turbines,
            min_separation,
        })
    }

    pub fn candidates(&self) -> &[Position] {
        &self.candidates
    }

    pub fn coefficients(&self) -> &InterferenceCoefficients {
        &self.coefficients
    }

    /// Required turbine count N
    pub fn turbines(&self) -> usize {
        self.turbines
    }

    pub fn min_separation(&self) -> Meters {
        self.min_separation
    }

    /// Number of candidates
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Objective weight `1 − w_i` of candidate `i`
    #[inline]
    pub fn weight(&self, index: usize) -> f64 {
        1.0 - self.coefficients.as_slice()[index]
    }

    /// Unordered candidate pairs `(i, j)`, `i < j`, closer than the minimum separation
    pub fn conflicts(&self) -> Vec<(usize, usize)> {
        let d_min = self.min_separation.value();
        let mut pairs = Vec::new();
        for i in 0..self.candidates.len() {
            for j in (i + 1)..self.candidates.len() {
                if self.candidates[i].distance_to(&self.candidates[j]).value() < d_min {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }

    /// Objective `Σ (1 − w_i)` over a selection
    pub fn objective_value(&self, selected: &[CandidateId]) -> f64 {
        selected.iter().map(|id| self.weight(id.value())).sum()
    }

    /// Whether a selection has exactly N distinct, in-range, well-separated candidates
    pub fn is_feasible(&self, selected: &[CandidateId]) -> bool {
        if selected.len() != self.turbines {
            return false;
        }
        let mut seen = vec![false; self.candidates.len()];
        for id in selected {
            match seen.get_mut(id.value()) {
                Some(flag) if !*flag => *flag = true,
                _ => return false,
            }
        }
        let d_min = self.min_separation.value();
        selected.iter().enumerate().all(|(a, i)| {
            selected[a + 1..].iter().all(|j| {
                self.candidates[i.value()]
                    .distance_to(&self.candidates[j.value()])
                    .value()
                    >= d_min
            })
        })
    }
}

/// Builder for [`LayoutProblem`]
#[derive(Debug, Clone)]
pub struct LayoutProblemBuilder {
    candidates: Vec<Position>,
    coefficients: Option<InterferenceCoefficients>,
    turbines: usize,
    min_separation: Meters,
}

impl LayoutProblemBuilder {
    pub fn new(candidates: Vec<Position>) -> Self {
        Self {
            candidates,
            coefficients: None,
            turbines: 1,
            min_separation: Meters(0.0),
        }
    }

    pub fn coefficients(mut self, coefficients: InterferenceCoefficients) -> Self {
        self.coefficients = Some(coefficients);
        self
    }

    pub fn turbines(mut self, count: usize) -> Self {
        self.turbines = count;
        self
    }

    pub fn min_separation(mut self, distance: Meters) -> Self {
        self.min_separation = distance;
        self
    }

    pub fn build(self) -> SiteResult<LayoutProblem> {
        let coefficients = self.coefficients.ok_or_else(|| {
            SiteError::Precondition("layout problem needs interference coefficients".into())
        })?;
        LayoutProblem::new(
            self.candidates,
            coefficients,
            self.turbines,
            self.min_separation,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize, spacing: f64) -> Vec<Position> {
        (0..n).map(|i| Position::new(i as f64 * spacing, 0.0)).collect()
    }

    fn ids(v: &[usize]) -> Vec<CandidateId> {
        v.iter().copied().map(CandidateId::new).collect()
    }

    #[test]
    fn test_conflicts_below_separation() {
        let problem = LayoutProblemBuilder::new(line(4, 100.0))
            .coefficients(InterferenceCoefficients::from_values(vec![0.0; 4]).unwrap())
            .turbines(2)
            .min_separation(Meters(150.0))
            .build()
            .unwrap();
        assert_eq!(problem.conflicts(), vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn test_exact_separation_is_allowed() {
        let problem = LayoutProblemBuilder::new(line(3, 100.0))
            .coefficients(InterferenceCoefficients::from_values(vec![0.0; 3]).unwrap())
            .min_separation(Meters(100.0))
            .build()
            .unwrap();
        assert!(problem.conflicts().is_empty());
    }

    #[test]
    fn test_feasibility_and_objective() {
        let problem = LayoutProblemBuilder::new(line(4, 100.0))
            .coefficients(InterferenceCoefficients::from_values(vec![0.1, 0.2, 0.3, 0.4]).unwrap())
            .turbines(2)
            .min_separation(Meters(150.0))
            .build()
            .unwrap();
        assert!(problem.is_feasible(&ids(&[0, 2])));
        assert!(!problem.is_feasible(&ids(&[0, 1])));
        assert!(!problem.is_feasible(&ids(&[0])));
        assert!(!problem.is_feasible(&ids(&[2, 2])));
        assert!(!problem.is_feasible(&ids(&[0, 9])));
        assert!((problem.objective_value(&ids(&[0, 2])) - 1.6).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_mismatched_coefficients() {
        let err = LayoutProblemBuilder::new(line(3, 100.0))
            .coefficients(InterferenceCoefficients::from_values(vec![0.0; 2]).unwrap())
            .build()
            .unwrap_err();
        assert!(matches!(err, SiteError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_rejects_zero_turbines_and_missing_coefficients() {
        let coeffs = InterferenceCoefficients::from_values(vec![0.0; 3]).unwrap();
        assert!(LayoutProblemBuilder::new(line(3, 100.0))
            .coefficients(coeffs)
            .turbines(0)
            .build()
            .is_err());
        assert!(LayoutProblemBuilder::new(line(3, 100.0)).build().is_err());
    }
}
