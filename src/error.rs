use thiserror::Error;

/// Errors that the computations of this crate may surface.
/// All of them are synchronous and typed: nothing is swallowed or retried,
/// presentation is left to the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// NaN or infinite component in a coordinate, velocity or abscissa.
    #[error("invalid input: non finite component")]
    NonFiniteInput,

    /// Geodetic coordinates are not defined at the geocenter (x=y=z=0).
    #[error("undefined geodetic position at geocenter")]
    GeocenterSingularity,

    /// The geocentric to geodetic iteration did not reach sub-millimeter
    /// height accuracy within the iteration budget. Only reachable with
    /// pathological inputs, the nominal case converges in 2 or 3 rounds.
    #[error("non-convergent geodetic height ({0} iterations)")]
    NonConvergentGeodetic(usize),

    /// Kepler's equation solver exceeded its iteration budget.
    #[error("non-convergent anomaly ({0} iterations)")]
    NonConvergentAnomaly(usize),

    /// Orbital state with (near) zero radius or angular momentum:
    /// no orbital plane can be defined.
    #[error("degenerate orbital state")]
    DegenerateOrbit,

    /// Requested reference ellipsoid is not part of the catalog.
    #[error("unknown ellipsoid \"{0}\"")]
    UnknownEllipsoid(String),

    /// Requested plate is not described by this plate motion model.
    #[error("unknown plate \"{0}\"")]
    UnknownPlate(String),

    /// Requested plate motion model is not part of the catalog.
    #[error("unknown plate motion model \"{0}\"")]
    UnknownModel(String),

    /// Unit name or alias that the registry has never been taught.
    #[error("unknown unit \"{0}\"")]
    UnknownUnit(String),

    /// Malformed line in a unit definition table.
    #[error("invalid unit definition: {0}")]
    InvalidUnitDefinition(String),

    /// Conversion between units of different dimensionality.
    #[error("incompatible dimensions: cannot convert \"{from}\" to \"{to}\"")]
    IncompatibleDimensions { from: String, to: String },

    /// Failed to parse an interpolation strategy name.
    #[error("unknown interpolation method \"{0}\"")]
    UnknownInterpolation(String),

    /// Fewer knots than the interpolation strategy's minimal order.
    #[error("insufficient points (need at least {0})")]
    InsufficientPoints(usize),

    /// Interpolation abscissas must be strictly increasing.
    #[error("unsorted or duplicate abscissas")]
    UnsortedAbscissas,

    /// Knot and value arrays of mismatched length, or grid values that do
    /// not match the grid dimensions.
    #[error("dimension mismatch between knots and values")]
    DimensionMismatch,

    /// Query point outside the supported range of a non-extrapolating
    /// interpolation strategy.
    #[error("interpolation query out of domain")]
    OutOfDomain,

    /// Two same-kind records of one station claim the same instant.
    #[error("overlapping validity intervals for station {0}")]
    OverlappingData(String),

    /// Record fed into the history of a different station.
    #[error("station mismatch: expected {expected}, found {found}")]
    StationMismatch { expected: String, found: String },

    /// Validity interval with end prior to (or equal to) start.
    #[error("empty validity interval")]
    EmptyInterval,
}
