//! Auxiliary latitude conversions shared by the conformal and equal-area
//! projections. Failure to converge is signalled with NaN; callers check
//! with `is_nan()` and decide whether that is a reportable condition.

use super::{EPSLN, MAX_ITER};
use std::f64::consts::FRAC_PI_2;

/// The constant small m: the radius of the parallel of latitude phi,
/// divided by the semimajor axis. Snyder (1987) eq. 14-15.
#[must_use]
pub fn msfnz(eccent: f64, sinphi: f64, cosphi: f64) -> f64 {
    let con = eccent * sinphi;
    cosphi / (1. - con * con).sqrt()
}

/// The constant small t for the forward computations of the Lambert
/// Conformal Conic and the Polar Stereographic projections. Snyder eq. 15-9.
#[must_use]
pub fn tsfnz(eccent: f64, phi: f64, sinphi: f64) -> f64 {
    let con = eccent * sinphi;
    let com = 0.5 * eccent;
    let con = ((1. - con) / (1. + con)).powf(com);
    (0.5 * (FRAC_PI_2 - phi)).tan() / con
}

/// The latitude angle phi2, inverting [`tsfnz`] by fixed point iteration.
/// NaN when 15 iterations do not reach 1e-10.
#[must_use]
pub fn phi2z(eccent: f64, ts: f64) -> f64 {
    let eccnth = 0.5 * eccent;
    let mut phi = FRAC_PI_2 - 2. * ts.atan();
    for _ in 0..=15 {
        let con = eccent * phi.sin();
        let dphi = FRAC_PI_2 - 2. * (ts * ((1. - con) / (1. + con)).powf(eccnth)).atan() - phi;
        phi += dphi;
        if dphi.abs() <= EPSLN {
            return phi;
        }
    }
    f64::NAN
}

/// The constant small q: twice the authalic latitude sine scale.
/// Snyder eq. 3-12.
#[must_use]
pub fn qsfnz(eccent: f64, sinphi: f64) -> f64 {
    if eccent > 1.0e-7 {
        let con = eccent * sinphi;
        (1. - eccent * eccent)
            * (sinphi / (1. - con * con) - (0.5 / eccent) * ((1. - con) / (1. + con)).ln())
    } else {
        2. * sinphi
    }
}

/// Inverse of [`qsfnz`]: Newton iteration, 30 steps, 1e-10. Values of q
/// within 1e-6 of the polar limit snap to the pole; non-convergence is NaN.
#[must_use]
pub fn iqsfnz(eccent: f64, q: f64) -> f64 {
    let temp = 1. - (1. - eccent * eccent) / (2. * eccent) * ((1. - eccent) / (1. + eccent)).ln();
    if (q.abs() - temp).abs() < 1.0e-6 {
        return if q < 0. { -FRAC_PI_2 } else { FRAC_PI_2 };
    }
    let mut phi = (0.5 * q).asin();
    for _ in 0..30 {
        let sin_phi = phi.sin();
        let cos_phi = phi.cos();
        let con = eccent * sin_phi;
        let dphi = (1. - con * con).powi(2) / (2. * cos_phi)
            * (q / (1. - eccent * eccent) - sin_phi / (1. - con * con)
                + 0.5 / eccent * ((1. - con) / (1. + con)).ln());
        phi += dphi;
        if dphi.abs() <= EPSLN {
            return phi;
        }
    }
    f64::NAN
}

/// asin with the argument clamped to [-1, 1], eliminating roundoff spill
#[must_use]
pub fn asinz(x: f64) -> f64 {
    x.clamp(-1., 1.).asin()
}

// Meridian arc coefficients, gctpc cproj.c
#[must_use]
pub fn e0fn(x: f64) -> f64 {
    1. - 0.25 * x * (1. + x / 16. * (3. + 1.25 * x))
}

#[must_use]
pub fn e1fn(x: f64) -> f64 {
    0.375 * x * (1. + 0.25 * x * (1. + 0.46875 * x))
}

#[must_use]
pub fn e2fn(x: f64) -> f64 {
    0.05859375 * x * x * (1. + 0.75 * x)
}

#[must_use]
pub fn e3fn(x: f64) -> f64 {
    x * x * x * (35. / 3072.)
}

/// Meridian arc length from the equator to latitude phi
#[must_use]
pub fn mlfn(e0: f64, e1: f64, e2: f64, e3: f64, phi: f64) -> f64 {
    e0 * phi - e1 * (2. * phi).sin() + e2 * (4. * phi).sin() - e3 * (6. * phi).sin()
}

/// Latitude from meridian arc length, by Newton iteration on [`mlfn`].
/// NaN when 15 iterations do not reach 1e-10.
#[must_use]
pub fn imlfn(ml: f64, e0: f64, e1: f64, e2: f64, e3: f64) -> f64 {
    let mut phi = ml / e0;
    for _ in 0..15 {
        let dphi = (ml - mlfn(e0, e1, e2, e3, phi))
            / (e0 - 2. * e1 * (2. * phi).cos() + 4. * e2 * (4. * phi).cos()
                - 6. * e3 * (6. * phi).cos());
        phi += dphi;
        if dphi.abs() <= EPSLN {
            return phi;
        }
    }
    f64::NAN
}

/// ((1 - e sin phi)/(1 + e sin phi))^exp, the Gauss conformal sphere ratio
#[must_use]
pub fn srat(esinp: f64, exp: f64) -> f64 {
    ((1. - esinp) / (1. + esinp)).powf(exp)
}

/// The prime vertical radius of curvature ("grande normale")
#[must_use]
pub fn gn(a: f64, e: f64, sinphi: f64) -> f64 {
    let temp = e * sinphi;
    a / (1. - temp * temp).sqrt()
}

// Meridian arc by Clenshaw-style series, PROJ pj_mlfn.c. Accurate to
// below 1e-5 m with typical semimajor axes; the inverse resolves phi
// to about 1e-11 rad.
const C00: f64 = 1.;
const C02: f64 = 0.25;
const C04: f64 = 0.046875;
const C06: f64 = 0.01953125;
const C08: f64 = 0.01068115234375;
const C22: f64 = 0.75;
const C44: f64 = 0.46875;
const C46: f64 = 0.013_020_833_333_333_334;
const C48: f64 = 0.007_120_768_229_166_667;
const C66: f64 = 0.364_583_333_333_333_3;
const C68: f64 = 0.005_696_614_583_333_333;
const C88: f64 = 0.3076171875;

/// Series coefficients for [`pj_mlfn`], from the eccentricity squared
#[must_use]
pub fn pj_enfn(es: f64) -> [f64; 5] {
    let t = es * es;
    [
        C00 - es * (C02 + es * (C04 + es * (C06 + es * C08))),
        es * (C22 - es * (C04 + es * (C06 + es * C08))),
        t * (C44 - es * (C46 + es * C48)),
        t * es * (C66 - es * C68),
        t * es * es * C88,
    ]
}

/// Meridian arc length using the [`pj_enfn`] coefficients
#[must_use]
pub fn pj_mlfn(phi: f64, sphi: f64, cphi: f64, en: &[f64; 5]) -> f64 {
    let cphi = cphi * sphi;
    let sphi = sphi * sphi;
    en[0] * phi - cphi * (en[1] + sphi * (en[2] + sphi * (en[3] + sphi * en[4])))
}

/// Inverse of [`pj_mlfn`]. Rarely needs more than 2 iterations; if the cap
/// of 20 is hit, reports and returns the best estimate reached.
#[must_use]
pub fn pj_inv_mlfn(arg: f64, es: f64, en: &[f64; 5]) -> f64 {
    let k = 1. / (1. - es);
    let mut phi = arg;
    for _ in 0..MAX_ITER {
        let s = phi.sin();
        let mut t = 1. - es * s * s;
        t = (pj_mlfn(phi, s, phi.cos(), en) - arg) * (t * t.sqrt()) * k;
        phi -= t;
        if t.abs() < EPSLN {
            return phi;
        }
    }
    log::warn!("inverse meridian arc iteration did not converge");
    phi
}

#[cfg(test)]
mod tests {
    use super::*;

    // GRS80 eccentricity
    const E: f64 = 0.081_819_191_042_832_58;
    const ES: f64 = E * E;

    #[test]
    fn conformal_pair() {
        let phi: f64 = 0.9;
        let ts = tsfnz(E, phi, phi.sin());
        assert!((phi2z(E, ts) - phi).abs() < 1e-11);

        // At the equator ts is exactly tan(pi/4) = 1
        assert!((tsfnz(E, 0., 0.) - 1.).abs() < 1e-15);
    }

    #[test]
    fn authalic_pair() {
        let phi: f64 = -0.7;
        let q = qsfnz(E, phi.sin());
        assert!((iqsfnz(E, q) - phi).abs() < 1e-9);

        // Spherical shortcut
        assert_eq!(qsfnz(0., 0.5), 1.0);
    }

    #[test]
    fn meridian_arc_roundtrip() {
        let e0 = e0fn(ES);
        let e1 = e1fn(ES);
        let e2 = e2fn(ES);
        let e3 = e3fn(ES);
        let phi: f64 = 0.8;
        let ml = mlfn(e0, e1, e2, e3, phi);
        assert!((imlfn(ml, e0, e1, e2, e3) - phi).abs() < 1e-11);
    }

    #[test]
    fn meridian_arc_series_roundtrip() {
        let en = pj_enfn(ES);
        let phi: f64 = 1.1;
        let ml = pj_mlfn(phi, phi.sin(), phi.cos(), &en);
        assert!((pj_inv_mlfn(ml, ES, &en) - phi).abs() < 1e-11);

        // Scaled by the semimajor axis, the arc from equator to pole is the
        // meridian quadrant: 10001965.7293 m on GRS80
        let quadrant = 6378137. * pj_mlfn(std::f64::consts::FRAC_PI_2, 1., 0., &en);
        assert!((quadrant - 10_001_965.7293).abs() < 0.1);
    }

    #[test]
    fn clamped_asin() {
        assert_eq!(asinz(2.), std::f64::consts::FRAC_PI_2);
        assert_eq!(asinz(-2.), -std::f64::consts::FRAC_PI_2);
        assert_eq!(asinz(0.), 0.);
    }
}
