//! Gauss conformal sphere mapping. Not a projection on its own here;
//! the oblique stereographic owns one of these and composes it with a
//! stereographic step on the conformal sphere.

use crate::math::ancillary::srat;
use crate::math::MAX_ITER;
use crate::Point;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

const DEL_TOL: f64 = 1e-14;

#[derive(Debug)]
pub struct Gauss {
    e: f64,
    c: f64,
    k: f64,
    ratexp: f64,
    /// Radius of the conformal sphere
    pub rc: f64,
    /// Latitude of the origin on the conformal sphere
    pub phic0: f64,
}

impl Gauss {
    pub fn new(lat0: f64, e: f64, es: f64) -> Gauss {
        let sphi = lat0.sin();
        let cphi2 = {
            let c = lat0.cos();
            c * c
        };
        let rc = (1. - es).sqrt() / (1. - es * sphi * sphi);
        let c = (1. + es * cphi2 * cphi2 / (1. - es)).sqrt();
        let phic0 = (sphi / c).asin();
        let ratexp = 0.5 * c * e;
        let k = (0.5 * phic0 + FRAC_PI_4).tan()
            / ((0.5 * lat0 + FRAC_PI_4).tan().powf(c) * srat(e * sphi, ratexp));
        Gauss { e, c, k, ratexp, rc, phic0 }
    }

    pub fn forward(&self, p: &mut Point) {
        let lon = p.x;
        let lat = p.y;
        p.y = 2.
            * (self.k
                * (0.5 * lat + FRAC_PI_4).tan().powf(self.c)
                * srat(self.e * lat.sin(), self.ratexp))
            .atan()
            - FRAC_PI_2;
        p.x = self.c * lon;
    }

    pub fn inverse(&self, p: &mut Point) {
        let lon = p.x / self.c;
        let lat = p.y;
        let num = ((0.5 * lat + FRAC_PI_4).tan() / self.k).powf(1. / self.c);

        let mut phi = lat;
        let mut converged = false;
        for _ in 0..MAX_ITER {
            let next = 2. * (num * srat(self.e * phi.sin(), -0.5 * self.e)).atan() - FRAC_PI_2;
            if (next - phi).abs() < DEL_TOL {
                phi = next;
                converged = true;
                break;
            }
            phi = next;
        }
        if !converged {
            log::warn!("gauss sphere: inverse latitude did not converge");
            *p = Point { z: p.z, ..Point::nan() };
            return;
        }
        p.x = lon;
        p.y = phi;
    }
}
