//! Rectilinear sample grid for wind-speed fields.
//!
//! Arrays follow the `meshgrid` "xy" layout: shape `(ny, nx)` with
//! `X[[j, i]] = x_axis[i]` and `Y[[j, i]] = y_axis[j]`. Every field computed
//! over a grid has the same shape.

use crate::{Position, SiteError, SiteResult};
use ndarray::{Array1, Array2, ArrayView1};

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    x_axis: Array1<f64>,
    y_axis: Array1<f64>,
    x: Array2<f64>,
    y: Array2<f64>,
}

impl Grid {
    /// Build a grid from strictly increasing coordinate axes.
    pub fn from_axes(x_axis: Vec<f64>, y_axis: Vec<f64>) -> SiteResult<Self> {
        check_axis("x", &x_axis)?;
        check_axis("y", &y_axis)?;
        let (nx, ny) = (x_axis.len(), y_axis.len());
        let x = Array2::from_shape_fn((ny, nx), |(_, i)| x_axis[i]);
        let y = Array2::from_shape_fn((ny, nx), |(j, _)| y_axis[j]);
        Ok(Self {
            x_axis: Array1::from(x_axis),
            y_axis: Array1::from(y_axis),
            x,
            y,
        })
    }

    /// Build a grid from precomputed coordinate arrays.
    ///
    /// The arrays must share a shape and be rectilinear (constant x down each
    /// column, constant y along each row).
    pub fn from_mesh(x: Array2<f64>, y: Array2<f64>) -> SiteResult<Self> {
        if x.dim() != y.dim() {
            return Err(SiteError::DimensionMismatch {
                expected: x.dim(),
                found: y.dim(),
            });
        }
        if x.is_empty() {
            return Err(SiteError::Precondition("grid arrays are empty".into()));
        }
        let x_axis: Vec<f64> = x.row(0).to_vec();
        let y_axis: Vec<f64> = y.column(0).to_vec();
        check_axis("x", &x_axis)?;
        check_axis("y", &y_axis)?;

        let rectilinear = x
            .indexed_iter()
            .all(|((_, i), &v)| v == x_axis[i])
            && y.indexed_iter().all(|((j, _), &v)| v == y_axis[j]);
        if !rectilinear {
            return Err(SiteError::Precondition(
                "grid coordinate arrays are not rectilinear".into(),
            ));
        }

        Ok(Self {
            x_axis: Array1::from(x_axis),
            y_axis: Array1::from(y_axis),
            x,
            y,
        })
    }

    /// `points` evenly spaced values from `start` to `end` inclusive.
    pub fn linspace(start: f64, end: f64, points: usize) -> Vec<f64> {
        match points {
            0 => Vec::new(),
            1 => vec![start],
            n => {
                let step = (end - start) / (n - 1) as f64;
                (0..n)
                    .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                    .collect()
            }
        }
    }

    /// Shape of every array on this grid, `(ny, nx)`
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.x.dim()
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    #[inline]
    pub fn x(&self) -> &Array2<f64> {
        &self.x
    }

    #[inline]
    pub fn y(&self) -> &Array2<f64> {
        &self.y
    }

    #[inline]
    pub fn x_axis(&self) -> ArrayView1<'_, f64> {
        self.x_axis.view()
    }

    #[inline]
    pub fn y_axis(&self) -> ArrayView1<'_, f64> {
        self.y_axis.view()
    }

    /// Whether the position lies inside the grid extent (boundary included)
    pub fn contains(&self, pos: Position) -> bool {
        let (x0, x1) = (self.x_axis[0], self.x_axis[self.x_axis.len() - 1]);
        let (y0, y1) = (self.y_axis[0], self.y_axis[self.y_axis.len() - 1]);
        pos.x >= x0 && pos.x <= x1 && pos.y >= y0 && pos.y <= y1
    }

    /// Fail with [`SiteError::DimensionMismatch`] unless `field` is aligned with this grid.
    pub fn ensure_aligned(&self, field: &Array2<f64>) -> SiteResult<()> {
        if field.dim() != self.shape() {
            return Err(SiteError::DimensionMismatch {
                expected: self.shape(),
                found: field.dim(),
            });
        }
        Ok(())
    }
}

fn check_axis(name: &str, axis: &[f64]) -> SiteResult<()> {
    if axis.len() < 2 {
        return Err(SiteError::Precondition(format!(
            "{name} axis needs at least 2 points, got {}",
            axis.len()
        )));
    }
    if axis.iter().any(|v| !v.is_finite()) {
        return Err(SiteError::Precondition(format!(
            "{name} axis contains non-finite values"
        )));
    }
    if axis.windows(2).any(|w| w[1] <= w[0]) {
        return Err(SiteError::Precondition(format!(
            "{name} axis must be strictly increasing"
        )));
    }
    Ok(())
}
