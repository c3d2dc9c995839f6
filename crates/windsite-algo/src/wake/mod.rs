//! Jensen wake model
//!
//! ## Single-turbine deficit
//!
//! A turbine with rotor diameter `D` and thrust coefficient `C_t` slows the
//! free-stream speed `U` inside a linearly expanding cone:
//!
//! ```text
//! ΔV(X) = U · (1 − √(1 − C_t)) · (D / (D + 2kX))²
//!
//!   in wake  ⇔  X > 0  and  |lateral| ≤ (D + 2kX) / 2
//! ```
//!
//! `X` and `lateral` are measured in the wind frame of the scenario: the
//! compass direction `wd` maps to the mathematical angle `θ = radians(270 − wd)`
//! and `X` points along the direction of travel.
//!
//! ## Combination rule
//!
//! At every grid point the speed is the **minimum** of the free-stream speed
//! and each turbine's wake-reduced speed. This is the adopted worst-case rule,
//! not a physically complete superposition (no sum of squares, no linear
//! summation). Being a minimum it does not depend on turbine order.
//!
//! ## Scenario aggregation
//!
//! ```text
//! field = Σ_s p_s · field_s
//! ```
//!
//! Per-scenario fields are independent; with the `parallel` feature they are
//! computed on the rayon pool and summed in scenario order.

mod field;
mod jensen;

pub use field::{WakeField, WakeModel};
pub use jensen::{JensenWake, WindFrame};
