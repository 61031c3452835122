use nalgebra::Vector3;

use crate::error::Error;

/// Gridded (2D) interpolation strategy.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub enum GridInterpolation {
    /// Bilinear blend of the four surrounding grid nodes
    #[default]
    Bilinear,
    /// Closest grid node
    Nearest,
}

impl std::fmt::Display for GridInterpolation {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Bilinear => write!(fmt, "bilinear"),
            Self::Nearest => write!(fmt, "nearest"),
        }
    }
}

/// Regular (rectilinear) grid of scalar samples, for example one band
/// of a velocity raster. Axes must be strictly increasing; values are
/// stored row-major, one row per y node.
#[derive(Debug, Clone, PartialEq)]
pub struct RegularGrid {
    x: Vec<f64>,
    y: Vec<f64>,
    values: Vec<f64>,
    extrapolate: bool,
}

impl RegularGrid {
    /// Builds a [RegularGrid] from its axes and row-major values
    /// (`values[iy * x.len() + ix]`). Queries outside the axes fail
    /// with [Error::OutOfDomain] unless extrapolation is requested
    /// with [Self::with_extrapolation].
    pub fn new(x: Vec<f64>, y: Vec<f64>, values: Vec<f64>) -> Result<Self, Error> {
        if x.is_empty() || y.is_empty() || values.len() != x.len() * y.len() {
            return Err(Error::DimensionMismatch);
        }

        let finite = x.iter().chain(y.iter()).chain(values.iter()).all(|v| v.is_finite());

        if !finite {
            return Err(Error::NonFiniteInput);
        }

        let sorted = x.windows(2).all(|pair| pair[0] < pair[1])
            && y.windows(2).all(|pair| pair[0] < pair[1]);

        if !sorted {
            return Err(Error::UnsortedAbscissas);
        }

        Ok(Self {
            x,
            y,
            values,
            extrapolate: false,
        })
    }

    /// Copies and returns [RegularGrid] with desired extrapolation
    /// behavior: when enabled, outside queries extend the edge cells
    /// (bilinear) or clamp to the edge node (nearest).
    pub fn with_extrapolation(&self, extrapolate: bool) -> Self {
        let mut grid = self.clone();
        grid.extrapolate = extrapolate;
        grid
    }

    /// Grid dimensions, (x nodes, y nodes)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.x.len(), self.y.len())
    }

    /// Sample stored at node (ix, iy)
    pub fn node(&self, ix: usize, iy: usize) -> f64 {
        self.values[iy * self.x.len() + ix]
    }

    fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x[0]
            && x <= self.x[self.x.len() - 1]
            && y >= self.y[0]
            && y <= self.y[self.y.len() - 1]
    }

    /// Interpolates the grid at (x, y) with the requested
    /// [GridInterpolation] strategy.
    pub fn interpolate(
        &self,
        x: f64,
        y: f64,
        method: GridInterpolation,
    ) -> Result<f64, Error> {
        if !x.is_finite() || !y.is_finite() {
            return Err(Error::NonFiniteInput);
        }

        if !self.extrapolate && !self.contains(x, y) {
            return Err(Error::OutOfDomain);
        }

        match method {
            GridInterpolation::Nearest => Ok(self.nearest(x, y)),
            GridInterpolation::Bilinear => self.bilinear(x, y),
        }
    }

    fn nearest(&self, x: f64, y: f64) -> f64 {
        self.node(nearest_index(&self.x, x), nearest_index(&self.y, y))
    }

    fn bilinear(&self, x: f64, y: f64) -> Result<f64, Error> {
        if self.x.len() < 2 || self.y.len() < 2 {
            return Err(Error::InsufficientPoints(2));
        }

        let ix = cell_index(&self.x, x);
        let iy = cell_index(&self.y, y);

        let tx = (x - self.x[ix]) / (self.x[ix + 1] - self.x[ix]);
        let ty = (y - self.y[iy]) / (self.y[iy + 1] - self.y[iy]);

        let bottom = self.node(ix, iy) + tx * (self.node(ix + 1, iy) - self.node(ix, iy));
        let top = self.node(ix, iy + 1) + tx * (self.node(ix + 1, iy + 1) - self.node(ix, iy + 1));

        Ok(bottom + ty * (top - bottom))
    }
}

/// Index of the closest axis node, clamping outside the axis.
fn nearest_index(axis: &[f64], query: f64) -> usize {
    let right = axis.partition_point(|&node| node < query);

    if right == 0 {
        return 0;
    }

    if right == axis.len() {
        return axis.len() - 1;
    }

    if (query - axis[right - 1]) <= (axis[right] - query) {
        right - 1
    } else {
        right
    }
}

/// Index of the cell [i, i+1] bracketing the query, clamped to the
/// edge cells (which carries linear extrapolation outside the axis).
fn cell_index(axis: &[f64], query: f64) -> usize {
    axis.partition_point(|&node| node < query)
        .max(1)
        .min(axis.len() - 1)
        - 1
}

/// Three band (east, north, up) velocity raster over a regular
/// longitude/latitude grid, as decoded from a GeoTIFF velocity product.
/// Band decoding is the caller's concern: this type consumes the
/// `(grid x, grid y, band values)` triple.
#[derive(Debug, Clone, PartialEq)]
pub struct VelocityGrid {
    east: RegularGrid,
    north: RegularGrid,
    up: RegularGrid,
}

impl VelocityGrid {
    /// Builds a [VelocityGrid] from shared axes and the three band
    /// rasters (east, north, up), each row-major like [RegularGrid].
    pub fn from_bands(
        x: Vec<f64>,
        y: Vec<f64>,
        east: Vec<f64>,
        north: Vec<f64>,
        up: Vec<f64>,
    ) -> Result<Self, Error> {
        Ok(Self {
            east: RegularGrid::new(x.clone(), y.clone(), east)?,
            north: RegularGrid::new(x.clone(), y.clone(), north)?,
            up: RegularGrid::new(x, y, up)?,
        })
    }

    /// Copies and returns [VelocityGrid] with desired extrapolation
    /// behavior on all three bands.
    pub fn with_extrapolation(&self, extrapolate: bool) -> Self {
        Self {
            east: self.east.with_extrapolation(extrapolate),
            north: self.north.with_extrapolation(extrapolate),
            up: self.up.with_extrapolation(extrapolate),
        }
    }

    /// Interpolates the three bands at (x, y), returned as an
    /// (east, north, up) vector.
    pub fn velocity_at(
        &self,
        x: f64,
        y: f64,
        method: GridInterpolation,
    ) -> Result<Vector3<f64>, Error> {
        Ok(Vector3::new(
            self.east.interpolate(x, y, method)?,
            self.north.interpolate(x, y, method)?,
            self.up.interpolate(x, y, method)?,
        ))
    }
}
