//! Shared numerical machinery: convergence constants, auxiliary latitude
//! conversions, meridian arc series. Everything here is a pure function over
//! double precision scalars.

pub mod ancillary;
pub mod series;

/// Default convergence tolerance for the iterative helpers, in radians
pub const EPSLN: f64 = 1.0e-10;

/// Default iteration cap for Newton-style inversions
pub const MAX_ITER: usize = 20;

/// Arc seconds to radians (pi / 180 / 3600)
pub const SEC_TO_RAD: f64 = 4.848_136_811_095_36e-6;

/// cos(67.5 degrees), the Toms region boundary in geocentric conversion
pub const COS_67P5: f64 = 0.382_683_432_365_089_77;

/// Toms region 1 constant
pub const AD_C: f64 = 1.0026;

// Authalic sphere series, pj_set_ell.c
pub const SIXTH: f64 = 1. / 6.;
pub const RA4: f64 = 17. / 360.;
pub const RA6: f64 = 67. / 3024.;

/// Adjust longitude to (-pi, pi). A single correction, not a modulo: the
/// input must be within one period of the range, which holds at every call
/// site in the pipeline.
#[must_use]
pub fn adjust_lon(x: f64) -> f64 {
    if x.abs() < std::f64::consts::PI {
        x
    } else {
        x - x.signum() * std::f64::consts::TAU
    }
}

/// Adjust latitude to (-pi/2, pi/2); single correction, like [`adjust_lon`]
#[must_use]
pub fn adjust_lat(x: f64) -> f64 {
    if x.abs() < std::f64::consts::FRAC_PI_2 {
        x
    } else {
        x - x.signum() * std::f64::consts::PI
    }
}
