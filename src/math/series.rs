//! Authalic latitude series, PROJ pj_auth.c. Used by the equal-area
//! azimuthal projection to go from the authalic sphere back to the
//! ellipsoid.

const P00: f64 = 0.333_333_333_333_333_33;
const P01: f64 = 0.172_222_222_222_222_22;
const P02: f64 = 0.102_579_365_079_365_08;
const P10: f64 = 0.063_888_888_888_888_888;
const P11: f64 = 0.066_402_116_402_116_402;
const P20: f64 = 0.016_415_012_942_191_544;

/// Coefficients for [`authlat`], from the eccentricity squared
#[must_use]
pub fn authset(es: f64) -> [f64; 3] {
    let t = es * es;
    [
        es * P00 + t * P01 + t * es * P02,
        t * P10 + t * es * P11,
        t * es * P20,
    ]
}

/// Geodetic latitude from authalic latitude beta
#[must_use]
pub fn authlat(beta: f64, apa: &[f64; 3]) -> f64 {
    let t = beta + beta;
    beta + apa[0] * t.sin() + apa[1] * (t + t).sin() + apa[2] * (3. * t).sin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::ancillary::qsfnz;

    #[test]
    fn authalic_latitude() {
        // GRS80
        let es: f64 = 0.006_694_380_022_903_416;
        let e = es.sqrt();
        let apa = authset(es);
        let qp = qsfnz(e, 1.);

        for phi in [-1.2, -0.5, 0., 0.3, 1.0, 1.4] {
            let beta = (qsfnz(e, f64::sin(phi)) / qp).asin();
            assert!((authlat(beta, &apa) - phi).abs() < 1e-9);
        }
    }
}
