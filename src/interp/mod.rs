//! 1D and gridded interpolation over a fixed set of named strategies.
mod grid;

pub use grid::{GridInterpolation, RegularGrid, VelocityGrid};

use num_traits::Float;

use crate::error::Error;

/// 1D interpolation strategy.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub enum Interpolation {
    /// Piecewise linear between the two bracketing knots.
    /// Queries outside the knot range fail with [Error::OutOfDomain].
    #[default]
    Linear,
    /// Natural cubic spline (zero curvature at both ends).
    /// Queries outside the knot range fail with [Error::OutOfDomain].
    CubicSpline,
    /// Closest knot. Queries outside the knot range clamp to the first
    /// or last knot: this strategy never goes out of domain.
    Nearest,
    /// Polynomial through all knots, evaluated in barycentric Lagrange
    /// form. Extrapolates by construction: any finite abscissa is
    /// accepted.
    Lagrange,
}

impl Interpolation {
    /// Minimal number of knots the strategy requires
    pub fn min_points(&self) -> usize {
        match self {
            Self::Nearest => 1,
            Self::Linear | Self::Lagrange => 2,
            Self::CubicSpline => 3,
        }
    }
}

impl std::fmt::Display for Interpolation {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Linear => write!(fmt, "linear"),
            Self::CubicSpline => write!(fmt, "cubic-spline"),
            Self::Nearest => write!(fmt, "nearest"),
            Self::Lagrange => write!(fmt, "lagrange"),
        }
    }
}

impl std::str::FromStr for Interpolation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "cubic-spline" | "cubic" | "spline" => Ok(Self::CubicSpline),
            "nearest" => Ok(Self::Nearest),
            "lagrange" | "polynomial" => Ok(Self::Lagrange),
            _ => Err(Error::UnknownInterpolation(s.to_string())),
        }
    }
}

/// Interpolates `(x_known, y_known)` at abscissa `x_query` with the
/// requested [Interpolation] strategy. Knots must be strictly
/// increasing in x; out-of-domain behavior is strategy specific, see
/// each [Interpolation] variant.
pub fn interp1d(
    x_known: &[f64],
    y_known: &[f64],
    x_query: f64,
    method: Interpolation,
) -> Result<f64, Error> {
    if x_known.len() != y_known.len() {
        return Err(Error::DimensionMismatch);
    }

    if x_known.len() < method.min_points() {
        return Err(Error::InsufficientPoints(method.min_points()));
    }

    if !x_query.is_finite()
        || !x_known.iter().all(|x| x.is_finite())
        || !y_known.iter().all(|y| y.is_finite())
    {
        return Err(Error::NonFiniteInput);
    }

    if !strictly_increasing(x_known) {
        return Err(Error::UnsortedAbscissas);
    }

    match method {
        Interpolation::Linear => linear(x_known, y_known, x_query),
        Interpolation::Nearest => Ok(nearest(x_known, y_known, x_query)),
        Interpolation::Lagrange => Ok(lagrange(x_known, y_known, x_query)),
        Interpolation::CubicSpline => cubic_spline(x_known, y_known, x_query),
    }
}

fn strictly_increasing<T: Float>(x: &[T]) -> bool {
    x.windows(2).all(|pair| pair[0] < pair[1])
}

/// Piecewise linear interpolation kernel.
fn linear<T: Float>(x: &[T], y: &[T], query: T) -> Result<T, Error> {
    let n = x.len();

    if query < x[0] || query > x[n - 1] {
        return Err(Error::OutOfDomain);
    }

    let right = x.partition_point(|&knot| knot < query).max(1).min(n - 1);
    let left = right - 1;

    let fraction = (query - x[left]) / (x[right] - x[left]);
    Ok(y[left] + fraction * (y[right] - y[left]))
}

/// Closest knot kernel, clamping outside the knot range.
fn nearest<T: Float>(x: &[T], y: &[T], query: T) -> T {
    let right = x.partition_point(|&knot| knot < query);

    if right == 0 {
        return y[0];
    }

    if right == x.len() {
        return y[x.len() - 1];
    }

    if (query - x[right - 1]) <= (x[right] - query) {
        y[right - 1]
    } else {
        y[right]
    }
}

/// Barycentric Lagrange kernel: the interpolating polynomial through
/// all knots. Exact at the knots, extrapolates beyond them.
fn lagrange<T: Float>(x: &[T], y: &[T], query: T) -> T {
    let n = x.len();

    // exactly on a knot
    for i in 0..n {
        if query == x[i] {
            return y[i];
        }
    }

    let mut weights = vec![T::one(); n];

    for j in 0..n {
        for m in 0..n {
            if m != j {
                weights[j] = weights[j] / (x[j] - x[m]);
            }
        }
    }

    let mut numerator = T::zero();
    let mut denominator = T::zero();

    for j in 0..n {
        let term = weights[j] / (query - x[j]);
        numerator = numerator + term * y[j];
        denominator = denominator + term;
    }

    numerator / denominator
}

/// Natural cubic spline kernel: second derivatives from the tridiagonal
/// system (Thomas algorithm), zero curvature at both ends.
fn cubic_spline(x: &[f64], y: &[f64], query: f64) -> Result<f64, Error> {
    let n = x.len();

    if query < x[0] || query > x[n - 1] {
        return Err(Error::OutOfDomain);
    }

    // solve for interior second derivatives
    let mut diag = vec![0.0; n];
    let mut rhs = vec![0.0; n];

    for i in 1..n - 1 {
        let h_prev = x[i] - x[i - 1];
        let h_next = x[i + 1] - x[i];

        diag[i] = 2.0 * (h_prev + h_next);
        rhs[i] = 6.0 * ((y[i + 1] - y[i]) / h_next - (y[i] - y[i - 1]) / h_prev);
    }

    // forward sweep
    for i in 2..n - 1 {
        let h = x[i] - x[i - 1];
        let factor = h / diag[i - 1];
        diag[i] -= factor * h;
        rhs[i] -= factor * rhs[i - 1];
    }

    // back substitution, natural ends stay zero
    let mut second = vec![0.0; n];

    for i in (1..n - 1).rev() {
        let h = x[i + 1] - x[i];
        second[i] = (rhs[i] - h * second[i + 1]) / diag[i];
    }

    let right = x.partition_point(|&knot| knot < query).max(1).min(n - 1);
    let left = right - 1;

    let h = x[right] - x[left];
    let a = (x[right] - query) / h;
    let b = (query - x[left]) / h;

    Ok(a * y[left]
        + b * y[right]
        + ((a.powi(3) - a) * second[left] + (b.powi(3) - b) * second[right]) * h.powi(2) / 6.0)
}

#[cfg(test)]
mod test {
    use super::{interp1d, Interpolation};
    use crate::error::Error;
    use std::str::FromStr;

    const METHODS: [Interpolation; 4] = [
        Interpolation::Linear,
        Interpolation::CubicSpline,
        Interpolation::Nearest,
        Interpolation::Lagrange,
    ];

    #[test]
    fn strategy_names() {
        for method in METHODS {
            let parsed = Interpolation::from_str(&method.to_string()).unwrap();
            assert_eq!(parsed, method);
        }

        assert_eq!(Interpolation::from_str("SPLINE"), Ok(Interpolation::CubicSpline));

        assert!(matches!(
            Interpolation::from_str("akima"),
            Err(Error::UnknownInterpolation(_)),
        ));
    }

    #[test]
    fn exact_at_knots() {
        let x = [0.0, 1.0, 2.5, 4.0, 7.0];
        let y = [1.0, -2.0, 0.5, 3.0, -1.5];

        for method in METHODS {
            for (xi, yi) in x.iter().zip(y.iter()) {
                let value = interp1d(&x, &y, *xi, method).unwrap();
                assert_eq!(value, *yi, "{} not exact at knot {}", method, xi);
            }
        }
    }

    #[test]
    fn linear_two_points() {
        // linear interpolation of two knots is exact anywhere between
        let x = [0.0, 10.0];
        let y = [2.0, 32.0];

        for (query, expected) in [(2.5, 9.5), (5.0, 17.0), (7.5, 24.5)] {
            let value = interp1d(&x, &y, query, Interpolation::Linear).unwrap();
            assert!((value - expected).abs() < f64::EPSILON * expected.abs());
        }
    }

    #[test]
    fn spline_reproduces_affine_data() {
        // natural splines are exact on affine data
        let x = [0.0, 1.0, 2.0, 3.5, 5.0];
        let y: Vec<f64> = x.iter().map(|x| 3.0 * x - 1.0).collect();

        for query in [0.25, 1.7, 3.0, 4.9] {
            let spline = interp1d(&x, &y, query, Interpolation::CubicSpline).unwrap();
            let linear = interp1d(&x, &y, query, Interpolation::Linear).unwrap();
            assert!((spline - linear).abs() < 1.0E-12);
        }
    }

    #[test]
    fn lagrange_reproduces_polynomial() {
        // cubic through 4 knots: interpolation and extrapolation exact
        let poly = |x: f64| x.powi(3) - 2.0 * x + 1.0;

        let x = [-1.0, 0.0, 1.0, 2.0];
        let y: Vec<f64> = x.iter().map(|x| poly(*x)).collect();

        for query in [-0.5, 0.3, 1.5, 3.0, -2.0] {
            let value = interp1d(&x, &y, query, Interpolation::Lagrange).unwrap();
            assert!(
                (value - poly(query)).abs() < 1.0E-9,
                "lagrange {} vs {} at {}",
                value,
                poly(query),
                query,
            );
        }
    }

    #[test]
    fn nearest_clamps() {
        let x = [0.0, 1.0, 2.0];
        let y = [10.0, 20.0, 30.0];

        assert_eq!(interp1d(&x, &y, 0.4, Interpolation::Nearest).unwrap(), 10.0);
        assert_eq!(interp1d(&x, &y, 0.6, Interpolation::Nearest).unwrap(), 20.0);

        // clamped outside the domain
        assert_eq!(interp1d(&x, &y, -5.0, Interpolation::Nearest).unwrap(), 10.0);
        assert_eq!(interp1d(&x, &y, 9.0, Interpolation::Nearest).unwrap(), 30.0);
    }

    #[test]
    fn out_of_domain() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.0, 1.0, 4.0, 9.0];

        for method in [Interpolation::Linear, Interpolation::CubicSpline] {
            assert_eq!(
                interp1d(&x, &y, -0.1, method),
                Err(Error::OutOfDomain),
                "{} should not extrapolate",
                method,
            );
            assert_eq!(interp1d(&x, &y, 3.1, method), Err(Error::OutOfDomain));
        }

        // lagrange extrapolates by construction
        assert!(interp1d(&x, &y, 5.0, Interpolation::Lagrange).is_ok());
    }

    #[test]
    fn input_validation() {
        assert_eq!(
            interp1d(&[0.0, 1.0], &[0.0], 0.5, Interpolation::Linear),
            Err(Error::DimensionMismatch),
        );

        assert_eq!(
            interp1d(&[0.0, 1.0], &[0.0, 1.0], 0.5, Interpolation::CubicSpline),
            Err(Error::InsufficientPoints(3)),
        );

        assert_eq!(
            interp1d(&[1.0, 0.0], &[0.0, 1.0], 0.5, Interpolation::Linear),
            Err(Error::UnsortedAbscissas),
        );

        assert_eq!(
            interp1d(&[0.0, f64::NAN], &[0.0, 1.0], 0.5, Interpolation::Linear),
            Err(Error::NonFiniteInput),
        );
    }
}
