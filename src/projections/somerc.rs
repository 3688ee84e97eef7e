//! Swiss Oblique Mercator, the CH1903 projection.

use super::Projection;
use crate::proj::Parameters;
use crate::Error;
use crate::Point;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

#[derive(Debug)]
pub struct Somerc {
    x0: f64,
    y0: f64,
    long0: f64,
    e: f64,
    r: f64,
    alpha: f64,
    b0: f64,
    k: f64,
}

pub fn new(p: &Parameters) -> Result<Box<dyn Projection>, Error> {
    let phy0 = p.lat0;
    let a = p.a();
    let b = p.b();
    // First eccentricity squared from the flattening
    let f = 1. - b / a;
    let e2 = 2. * f - f * f;
    let e = e2.sqrt();

    let cp = phy0.cos();
    let r = p.k0 * a * (1. - e2).sqrt() / (1. - e2 * phy0.sin() * phy0.sin());
    let alpha = (1. + e2 / (1. - e2) * cp.powi(4)).sqrt();
    let b0 = (phy0.sin() / alpha).asin();

    let k1 = (FRAC_PI_4 + b0 / 2.).tan().ln();
    let k2 = (FRAC_PI_4 + phy0 / 2.).tan().ln();
    let k3 = ((1. + e * phy0.sin()) / (1. - e * phy0.sin())).ln();
    let k = k1 - alpha * k2 + alpha * e / 2. * k3;

    Ok(Box::new(Somerc {
        x0: p.x0,
        y0: p.y0,
        long0: p.long0,
        e,
        r,
        alpha,
        b0,
        k,
    }))
}

impl Projection for Somerc {
    // ----- F O R W A R D -----------------------------------------------
    fn forward(&self, p: &mut Point) {
        let sa1 = (FRAC_PI_4 - p.y / 2.).tan().ln();
        let sa2 = self.e / 2. * ((1. + self.e * p.y.sin()) / (1. - self.e * p.y.sin())).ln();
        let s = -self.alpha * (sa1 + sa2) + self.k;

        // Latitude on the conformal sphere
        let b = 2. * (s.exp().atan() - FRAC_PI_4);
        let i = self.alpha * (p.x - self.long0);
        let rot_i = i.sin().atan2(self.b0.sin() * b.tan() + self.b0.cos() * i.cos());
        let rot_b = (self.b0.cos() * b.sin() - self.b0.sin() * b.cos() * i.cos()).asin();

        p.y = self.r / 2. * ((1. + rot_b.sin()) / (1. - rot_b.sin())).ln() + self.y0;
        p.x = self.r * rot_i + self.x0;
    }

    // ----- I N V E R S E -----------------------------------------------
    fn inverse(&self, p: &mut Point) {
        let yy = p.x - self.x0;
        let xx = p.y - self.y0;

        let rot_i = yy / self.r;
        let rot_b = 2. * ((xx / self.r).exp().atan() - FRAC_PI_4);

        let b = (self.b0.cos() * rot_b.sin() + self.b0.sin() * rot_b.cos() * rot_i.cos()).asin();
        let i = rot_i
            .sin()
            .atan2(self.b0.cos() * rot_i.cos() - self.b0.sin() * rot_b.tan());

        p.x = self.long0 + i / self.alpha;

        let mut lat = b;
        let mut prev = -1000.;
        let mut iters = 0;
        while (lat - prev).abs() > 1e-7 {
            if iters > 20 {
                log::warn!("swiss oblique mercator: inverse latitude did not converge");
                *p = Point { z: p.z, ..Point::nan() };
                return;
            }
            prev = lat;
            let s = 1. / self.alpha * ((FRAC_PI_4 + b / 2.).tan().ln() - self.k)
                + self.e * ((FRAC_PI_4 + (self.e * lat.sin()).asin() / 2.).tan()).ln();
            lat = 2. * s.exp().atan() - FRAC_PI_2;
            iters += 1;
        }
        p.y = lat;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projections::testutil::params;
    use crate::proj::ProjDef;

    fn ch1903() -> Box<dyn Projection> {
        new(&params(ProjDef {
            proj: Some("somerc".into()),
            ellps: Some("bessel".into()),
            lat0: Some(46.952_405_555_555_56),
            long0: Some(7.439_583_333_333_33),
            k0: Some(1.),
            x0: Some(600_000.),
            y0: Some(200_000.),
            ..Default::default()
        }))
        .unwrap()
    }

    #[test]
    fn bern_is_the_false_origin() {
        let proj = ch1903();
        let mut p = Point::new(
            7.439_583_333_333_33_f64.to_radians(),
            46.952_405_555_555_56_f64.to_radians(),
        );
        proj.forward(&mut p);
        assert!((p.x - 600_000.).abs() < 1e-6);
        assert!((p.y - 200_000.).abs() < 1e-6);
    }

    #[test]
    fn swiss_roundtrip() {
        let proj = ch1903();
        for (lon, lat) in [(7.44, 46.95), (8.54, 47.38), (6.14, 46.2), (9.84, 46.5)] {
            let orig = Point::new(f64::to_radians(lon), f64::to_radians(lat));
            let mut p = orig;
            proj.forward(&mut p);
            proj.inverse(&mut p);
            assert!((p.x - orig.x).abs() < 1e-8, "lon {lon}");
            assert!((p.y - orig.y).abs() < 1e-8, "lat {lat}");
        }
    }
}
