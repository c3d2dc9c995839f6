//! Jensen single-wake deficit law and wind-frame rotation

use windsite_core::units::{Degrees, Meters};
use windsite_core::{DecayConstant, TurbineSpec};

/// Rotation from site coordinates into the wind frame of one scenario
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindFrame {
    cos: f64,
    sin: f64,
}

impl WindFrame {
    /// Frame whose downstream axis follows a wind blowing from `direction`
    pub fn for_direction(direction: Degrees) -> Self {
        let (sin, cos) = direction.wake_axis_angle().sin_cos();
        Self { cos, sin }
    }

    /// Split an offset `(dx, dy)` from a turbine into `(downstream, lateral)`
    #[inline]
    pub fn project(&self, dx: f64, dy: f64) -> (f64, f64) {
        (
            dx * self.cos + dy * self.sin,
            -dx * self.sin + dy * self.cos,
        )
    }
}

/// Deficit law for one turbine type on one site
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JensenWake {
    rotor_diameter: f64,
    decay: f64,
    /// `1 − sqrt(1 − C_t)`
    induction: f64,
}

impl JensenWake {
    pub fn new(turbine: &TurbineSpec, decay: DecayConstant) -> Self {
        Self {
            rotor_diameter: turbine.rotor_diameter.value(),
            decay: decay.value(),
            induction: turbine.induction(),
        }
    }

    /// Wake diameter `D + 2kX` at `downstream` meters behind the rotor
    #[inline]
    pub fn wake_width(&self, downstream: f64) -> Meters {
        Meters(self.rotor_diameter + 2.0 * self.decay * downstream)
    }

    /// Whether the point lies strictly downstream and inside the wake cone
    #[inline]
    pub fn in_wake(&self, downstream: f64, lateral: f64) -> bool {
        downstream > 0.0 && lateral.abs() <= self.wake_width(downstream).value() / 2.0
    }

    /// Speed deficit on the wake axis, without the cone test
    #[inline]
    pub fn axial_deficit(&self, free_stream: f64, downstream: f64) -> f64 {
        let ratio = self.rotor_diameter / self.wake_width(downstream).value();
        free_stream * self.induction * ratio * ratio
    }

    /// Speed deficit at a point given in the wind frame; zero outside the cone
    #[inline]
    pub fn deficit(&self, free_stream: f64, downstream: f64, lateral: f64) -> f64 {
        if self.in_wake(downstream, lateral) {
            self.axial_deficit(free_stream, downstream)
        } else {
            0.0
        }
    }
}
