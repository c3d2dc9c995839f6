//! Re-evaluation of a chosen layout
//!
//! Recomputes the expected field with only the selected turbines as wake
//! sources and reads off each turbine's speed and power. The result is a
//! report next to the priced objective; the selection is left untouched.

use crate::interference::FieldSampler;
use crate::wake::WakeModel;
use serde::Serialize;
use tracing::debug;
use windsite_core::units::MetersPerSecond;
use windsite_core::{CandidateId, Position, ResolvedSite, SiteError, SiteResult};

/// Expected conditions at one placed turbine
#[derive(Debug, Clone, Serialize)]
pub struct TurbineReport {
    pub id: CandidateId,
    pub position: Position,
    /// Expected speed with only the selected turbines as wake sources
    pub expected_speed: f64,
    /// Power-curve output at that speed
    pub power: f64,
}

/// Per-turbine and total production of a selection
#[derive(Debug, Clone, Serialize)]
pub struct LayoutEvaluation {
    pub turbines: Vec<TurbineReport>,
    pub total_power: f64,
    /// Power of the same turbines at the field maximum, without any shading
    pub unwaked_power: f64,
}

impl LayoutEvaluation {
    /// Share of unwaked output lost to wakes within the layout
    pub fn wake_loss_fraction(&self) -> f64 {
        if self.unwaked_power > 0.0 {
            1.0 - self.total_power / self.unwaked_power
        } else {
            0.0
        }
    }
}

/// Evaluate `selected` on `site` as if only those candidates were built.
pub fn evaluate_layout(site: &ResolvedSite, selected: &[CandidateId]) -> SiteResult<LayoutEvaluation> {
    let positions = selected
        .iter()
        .map(|id| {
            site.candidates.get(id.value()).copied().ok_or_else(|| {
                SiteError::Validation(format!(
                    "{id} is out of range for {} candidates",
                    site.candidates.len()
                ))
            })
        })
        .collect::<SiteResult<Vec<Position>>>()?;

    let model = WakeModel::new(&site.turbine, site.decay);
    let field = model.field(&site.grid, &positions, &site.regime)?;
    let sampler = FieldSampler::new(&site.grid, field.speeds())?;
    let curve = &site.turbine.power_curve;

    let mut turbines = Vec::with_capacity(positions.len());
    for (id, pos) in selected.iter().zip(&positions) {
        let expected_speed = sampler.sample(*pos)?;
        let power = curve.power(MetersPerSecond(expected_speed)).value();
        debug!(candidate = id.value(), expected_speed, power, "turbine re-evaluated");
        turbines.push(TurbineReport {
            id: *id,
            position: *pos,
            expected_speed,
            power,
        });
    }

    let total_power = turbines.iter().map(|t| t.power).sum();
    let unwaked_power = curve.power(MetersPerSecond(field.max())).value() * turbines.len() as f64;

    Ok(LayoutEvaluation {
        turbines,
        total_power,
        unwaked_power,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use windsite_core::SiteDefinition;

    const SITE: &str = r#"
[turbine]
rotor_diameter_m = 80.0
thrust_coefficient = 0.8
power_curve = [[0.0, 0.0], [20.0, 2000.0]]

[wake]
decay_constant = 0.05

[grid]
x = { start = -200.0, end = 1000.0, points = 61 }
y = { start = -200.0, end = 200.0, points = 21 }

[candidates]
positions = [[0.0, 0.0], [500.0, 0.0], [500.0, 200.0]]

[wind]
scenarios = [{ speed = 10.0, direction = 270.0, probability = 1.0 }]

[layout]
turbines = 2
min_separation_m = 100.0
"#;

    fn site() -> ResolvedSite {
        SiteDefinition::from_toml_str(SITE).unwrap().resolve().unwrap()
    }

    #[test]
    fn test_waked_pair_loses_power() {
        let site = site();
        let eval = evaluate_layout(&site, &[CandidateId::new(0), CandidateId::new(1)]).unwrap();
        assert_eq!(eval.turbines.len(), 2);
        // upstream turbine sees free stream, downstream one sits in its wake
        assert!((eval.turbines[0].expected_speed - 10.0).abs() < 1e-9);
        let expected = 10.0 - 10.0 * (1.0 - 0.2_f64.sqrt()) * (80.0_f64 / 130.0).powi(2);
        assert!((eval.turbines[1].expected_speed - expected).abs() < 1e-9);
        assert!(eval.wake_loss_fraction() > 0.0);
    }

    #[test]
    fn test_side_by_side_pair_is_unwaked() {
        let site = site();
        let eval = evaluate_layout(&site, &[CandidateId::new(1), CandidateId::new(2)]).unwrap();
        assert!((eval.total_power - 2000.0).abs() < 1e-9);
        assert_eq!(eval.wake_loss_fraction(), 0.0);
    }

    #[test]
    fn test_out_of_range_id() {
        let err = evaluate_layout(&site(), &[CandidateId::new(7)]).unwrap_err();
        assert!(matches!(err, SiteError::Validation(_)));
    }
}
