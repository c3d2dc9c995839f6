//! Turbine physical parameters, power curve and wake decay constant.
//!
//! A single turbine type is assumed: every candidate shares one
//! [`TurbineSpec`].

use crate::units::{Kilowatts, Meters, MetersPerSecond};
use crate::{SiteError, SiteResult};
use serde::{Deserialize, Serialize};

/// Piecewise-linear wind speed → power table.
///
/// Lookups outside the table clamp to the first/last power value; NaN speeds
/// yield NaN power. A repeated speed encodes a step (cut-out); at the step
/// the last entry for that speed applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PowerCurveTable")]
pub struct PowerCurve {
    speeds: Vec<f64>,
    powers: Vec<f64>,
}

#[derive(Deserialize)]
struct PowerCurveTable {
    speeds: Vec<f64>,
    powers: Vec<f64>,
}

impl TryFrom<PowerCurveTable> for PowerCurve {
    type Error = SiteError;

    fn try_from(table: PowerCurveTable) -> SiteResult<Self> {
        Self::new(table.speeds, table.powers)
    }
}

impl PowerCurve {
    /// Create a curve from parallel speed (m/s) and power (kW) columns.
    ///
    /// Speeds must be finite and non-decreasing.
    pub fn new(speeds: Vec<f64>, powers: Vec<f64>) -> SiteResult<Self> {
        if speeds.is_empty() {
            return Err(SiteError::Validation("power curve is empty".into()));
        }
        if speeds.len() != powers.len() {
            return Err(SiteError::Validation(format!(
                "power curve has {} speeds but {} power values",
                speeds.len(),
                powers.len()
            )));
        }
        if speeds.iter().chain(powers.iter()).any(|v| !v.is_finite()) {
            return Err(SiteError::Validation(
                "power curve contains non-finite values".into(),
            ));
        }
        if speeds.windows(2).any(|w| w[1] < w[0]) {
            return Err(SiteError::Validation(
                "power curve speeds must be non-decreasing".into(),
            ));
        }
        Ok(Self { speeds, powers })
    }

    pub fn from_pairs(pairs: &[(f64, f64)]) -> SiteResult<Self> {
        let (speeds, powers) = pairs.iter().copied().unzip();
        Self::new(speeds, powers)
    }

    /// Interpolated output at `speed`
    pub fn power(&self, speed: MetersPerSecond) -> Kilowatts {
        Kilowatts(self.power_at(speed.value()))
    }

    fn power_at(&self, u: f64) -> f64 {
        if u.is_nan() {
            return f64::NAN;
        }
        let last = self.speeds.len() - 1;
        if u < self.speeds[0] {
            return self.powers[0];
        }
        if u >= self.speeds[last] {
            return self.powers[last];
        }
        // first index with speed > u, in 1..=last; `lo` is the last entry at or below u
        let hi = self.speeds.partition_point(|&s| s <= u);
        let lo = hi - 1;
        let t = (u - self.speeds[lo]) / (self.speeds[hi] - self.speeds[lo]);
        self.powers[lo] + t * (self.powers[hi] - self.powers[lo])
    }

    pub fn speeds(&self) -> &[f64] {
        &self.speeds
    }

    pub fn powers(&self) -> &[f64] {
        &self.powers
    }
}

/// Rotor and thrust parameters shared by all candidate positions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TurbineParams")]
pub struct TurbineSpec {
    pub rotor_diameter: Meters,
    /// Thrust coefficient C_t in (0, 1]
    pub thrust_coefficient: f64,
    pub power_curve: PowerCurve,
}

#[derive(Deserialize)]
struct TurbineParams {
    rotor_diameter: Meters,
    thrust_coefficient: f64,
    power_curve: PowerCurve,
}

impl TryFrom<TurbineParams> for TurbineSpec {
    type Error = SiteError;

    fn try_from(params: TurbineParams) -> SiteResult<Self> {
        Self::new(
            params.rotor_diameter.value(),
            params.thrust_coefficient,
            params.power_curve,
        )
    }
}

impl TurbineSpec {
    pub fn new(rotor_diameter_m: f64, thrust_coefficient: f64, power_curve: PowerCurve) -> SiteResult<Self> {
        if !rotor_diameter_m.is_finite() || rotor_diameter_m <= 0.0 {
            return Err(SiteError::Precondition(format!(
                "rotor diameter must be positive, got {rotor_diameter_m}"
            )));
        }
        if !thrust_coefficient.is_finite() || thrust_coefficient <= 0.0 || thrust_coefficient > 1.0 {
            return Err(SiteError::Precondition(format!(
                "thrust coefficient must lie in (0, 1], got {thrust_coefficient}"
            )));
        }
        Ok(Self {
            rotor_diameter: Meters(rotor_diameter_m),
            thrust_coefficient,
            power_curve,
        })
    }

    /// Jensen induction factor `1 − sqrt(1 − C_t)`
    #[inline]
    pub fn induction(&self) -> f64 {
        1.0 - (1.0 - self.thrust_coefficient).sqrt()
    }
}

/// Site exposure class with its customary wake decay constant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteExposure {
    Offshore,
    Onshore,
}

impl SiteExposure {
    pub fn decay_constant(self) -> f64 {
        match self {
            SiteExposure::Offshore => 0.05,
            SiteExposure::Onshore => 0.075,
        }
    }
}

/// Wake expansion rate `k`, fixed per run
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct DecayConstant(f64);

impl TryFrom<f64> for DecayConstant {
    type Error = SiteError;

    fn try_from(k: f64) -> SiteResult<Self> {
        Self::new(k)
    }
}

impl From<DecayConstant> for f64 {
    fn from(k: DecayConstant) -> f64 {
        k.0
    }
}

impl DecayConstant {
    pub fn new(k: f64) -> SiteResult<Self> {
        if !k.is_finite() || k <= 0.0 {
            return Err(SiteError::Precondition(format!(
                "decay constant must be positive, got {k}"
            )));
        }
        Ok(Self(k))
    }

    pub fn from_exposure(exposure: SiteExposure) -> Self {
        Self(exposure.decay_constant())
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve() -> PowerCurve {
        PowerCurve::from_pairs(&[(3.0, 0.0), (5.0, 200.0), (13.0, 2000.0), (25.0, 2000.0)]).unwrap()
    }

    #[test]
    fn test_interpolation() {
        let c = curve();
        assert_eq!(c.power(MetersPerSecond(4.0)), Kilowatts(100.0));
        assert_eq!(c.power(MetersPerSecond(9.0)), Kilowatts(1100.0));
        assert_eq!(c.power(MetersPerSecond(13.0)), Kilowatts(2000.0));
    }

    #[test]
    fn test_clamps_outside_table() {
        let c = curve();
        assert_eq!(c.power(MetersPerSecond(0.0)), Kilowatts(0.0));
        assert_eq!(c.power(MetersPerSecond(40.0)), Kilowatts(2000.0));
    }

    #[test]
    fn test_nan_propagates() {
        assert!(curve().power(MetersPerSecond(f64::NAN)).value().is_nan());
    }

    #[test]
    fn test_cut_out_step() {
        let c = PowerCurve::from_pairs(&[(3.0, 0.0), (12.0, 2000.0), (25.0, 2000.0), (25.0, 0.0)])
            .unwrap();
        assert_eq!(c.power(MetersPerSecond(24.0)), Kilowatts(2000.0));
        assert_eq!(c.power(MetersPerSecond(25.0)), Kilowatts(0.0));
        assert_eq!(c.power(MetersPerSecond(30.0)), Kilowatts(0.0));
    }

    #[test]
    fn test_interior_step_takes_later_entry() {
        let c = PowerCurve::from_pairs(&[(0.0, 0.0), (10.0, 100.0), (10.0, 500.0), (20.0, 1500.0)])
            .unwrap();
        assert_eq!(c.power(MetersPerSecond(5.0)), Kilowatts(50.0));
        assert_eq!(c.power(MetersPerSecond(10.0)), Kilowatts(500.0));
        assert_eq!(c.power(MetersPerSecond(15.0)), Kilowatts(1000.0));
    }

    #[test]
    fn test_leading_step_applies_at_first_speed() {
        let c = PowerCurve::from_pairs(&[(3.0, 0.0), (3.0, 100.0), (13.0, 1100.0)]).unwrap();
        assert_eq!(c.power(MetersPerSecond(2.0)), Kilowatts(0.0));
        assert_eq!(c.power(MetersPerSecond(3.0)), Kilowatts(100.0));
    }

    #[test]
    fn test_single_point_curve_is_constant() {
        let c = PowerCurve::new(vec![10.0], vec![500.0]).unwrap();
        assert_eq!(c.power(MetersPerSecond(2.0)), Kilowatts(500.0));
        assert_eq!(c.power(MetersPerSecond(20.0)), Kilowatts(500.0));
    }

    #[test]
    fn test_curve_validation() {
        assert!(PowerCurve::new(vec![], vec![]).is_err());
        assert!(PowerCurve::new(vec![1.0, 2.0], vec![0.0]).is_err());
        assert!(PowerCurve::new(vec![2.0, 1.0], vec![0.0, 1.0]).is_err());
    }

    #[test]
    fn test_deserialize_validates_curve() {
        let err = serde_json::from_str::<PowerCurve>(r#"{"speeds":[],"powers":[]}"#).unwrap_err();
        assert!(err.to_string().contains("power curve is empty"));
        let c: PowerCurve =
            serde_json::from_str(r#"{"speeds":[0.0,10.0],"powers":[0.0,1000.0]}"#).unwrap();
        assert_eq!(c.power(MetersPerSecond(5.0)), Kilowatts(500.0));
    }

    #[test]
    fn test_deserialize_validates_turbine() {
        let bad_diameter = r#"{"rotor_diameter":-80.0,"thrust_coefficient":0.8,
            "power_curve":{"speeds":[0.0,10.0],"powers":[0.0,1000.0]}}"#;
        assert!(serde_json::from_str::<TurbineSpec>(bad_diameter).is_err());
        let bad_thrust = r#"{"rotor_diameter":80.0,"thrust_coefficient":1.5,
            "power_curve":{"speeds":[0.0,10.0],"powers":[0.0,1000.0]}}"#;
        assert!(serde_json::from_str::<TurbineSpec>(bad_thrust).is_err());

        let spec = TurbineSpec::new(80.0, 0.75, curve()).unwrap();
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(serde_json::from_str::<TurbineSpec>(&json).unwrap(), spec);
    }

    #[test]
    fn test_turbine_preconditions() {
        assert!(TurbineSpec::new(0.0, 0.8, curve()).is_err());
        assert!(TurbineSpec::new(80.0, 1.2, curve()).is_err());
        let t = TurbineSpec::new(80.0, 0.75, curve()).unwrap();
        assert!((t.induction() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_decay_constant() {
        assert!(DecayConstant::new(0.0).is_err());
        assert_eq!(DecayConstant::from_exposure(SiteExposure::Onshore).value(), 0.075);
        assert!(serde_json::from_str::<DecayConstant>("-0.05").is_err());
        let k: DecayConstant = serde_json::from_str("0.05").unwrap();
        assert_eq!(serde_json::to_string(&k).unwrap(), "0.05");
    }
}
