//! Cassini-Soldner.

use super::Projection;
use crate::math::ancillary::{e0fn, e1fn, e2fn, e3fn, gn, imlfn, mlfn};
use crate::math::{adjust_lat, adjust_lon, EPSLN};
use crate::proj::Parameters;
use crate::Error;
use crate::Point;
use std::f64::consts::FRAC_PI_2;

#[derive(Debug)]
pub struct Cass {
    a: f64,
    e: f64,
    es: f64,
    x0: f64,
    y0: f64,
    lat0: f64,
    long0: f64,
    sphere: bool,
    e0: f64,
    e1: f64,
    e2: f64,
    e3: f64,
    ml0: f64,
}

pub fn new(p: &Parameters) -> Result<Box<dyn Projection>, Error> {
    let e0 = e0fn(p.es());
    let e1 = e1fn(p.es());
    let e2 = e2fn(p.es());
    let e3 = e3fn(p.es());
    Ok(Box::new(Cass {
        a: p.a(),
        e: p.e(),
        es: p.es(),
        x0: p.x0,
        y0: p.y0,
        lat0: p.lat0,
        long0: p.long0,
        sphere: p.sphere(),
        e0,
        e1,
        e2,
        e3,
        ml0: p.a() * mlfn(e0, e1, e2, e3, p.lat0),
    }))
}

impl Projection for Cass {
    // ----- F O R W A R D -----------------------------------------------
    fn forward(&self, p: &mut Point) {
        let lat = p.y;
        let lam = adjust_lon(p.x - self.long0);

        if self.sphere {
            p.x = self.x0 + self.a * (lat.cos() * lam.sin()).asin();
            p.y = self.y0 + self.a * (lat.tan().atan2(lam.cos()) - self.lat0);
            return;
        }

        let sinphi = lat.sin();
        let cosphi = lat.cos();
        let nl = gn(self.a, self.e, sinphi);
        let tl = lat.tan() * lat.tan();
        let al = lam * cosphi;
        let asq = al * al;
        let cl = self.es * cosphi * cosphi / (1. - self.es);
        let ml = self.a * mlfn(self.e0, self.e1, self.e2, self.e3, lat);

        p.x = self.x0 + nl * al * (1. - asq * tl * (1. / 6. - (8. - tl + 8. * cl) * asq / 120.));
        p.y = self.y0 + ml - self.ml0
            + nl * sinphi / cosphi * asq * (0.5 + (5. - tl + 6. * cl) * asq / 24.);
    }

    // ----- I N V E R S E -----------------------------------------------
    fn inverse(&self, p: &mut Point) {
        let x = p.x - self.x0;
        let y = p.y - self.y0;

        if self.sphere {
            let dd = y / self.a + self.lat0;
            let phi = (dd.sin() * (x / self.a).cos()).asin();
            let lam = (x / self.a).tan().atan2(dd.cos());
            p.x = adjust_lon(lam + self.long0);
            p.y = adjust_lat(phi);
            return;
        }

        let ml1 = self.ml0 / self.a + y / self.a;
        let phi1 = imlfn(ml1, self.e0, self.e1, self.e2, self.e3);
        if phi1.is_nan() {
            *p = Point { z: p.z, ..Point::nan() };
            return;
        }
        if (phi1.abs() - FRAC_PI_2).abs() <= EPSLN {
            p.x = self.long0;
            p.y = FRAC_PI_2.copysign(y);
            return;
        }

        let nl1 = gn(self.a, self.e, phi1.sin());
        let rl1 = nl1 * nl1 * nl1 / (self.a * self.a) * (1. - self.es);
        let tl1 = phi1.tan() * phi1.tan();
        let dl = x / nl1;
        let dsq = dl * dl;
        let phi = phi1
            - nl1 * phi1.tan() / rl1 * dsq * (0.5 - (1. + 3. * tl1) * dsq / 24.);
        let lam = dl * (1. - dsq * (tl1 / 3. + (1. + 3. * tl1) * tl1 * dsq / 15.)) / phi1.cos();

        p.x = adjust_lon(lam + self.long0);
        p.y = adjust_lat(phi);
    }
}
