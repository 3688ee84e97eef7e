//! Transverse Mercator, Snyder's series form. Exact on the sphere, and
//! good to well below a millimeter within a few degrees of the central
//! meridian on the ellipsoid.

use super::Projection;
use crate::math::ancillary::{asinz, e0fn, e1fn, e2fn, e3fn, mlfn};
use crate::math::{adjust_lon, EPSLN};
use crate::proj::Parameters;
use crate::Error;
use crate::Point;
use std::f64::consts::FRAC_PI_2;

#[derive(Debug)]
pub struct Tmerc {
    a: f64,
    es: f64,
    ep2: f64,
    k0: f64,
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
    Ok(Box::new(Tmerc::from_params(p)))
}

impl Tmerc {
    /// Shared with the UTM wrapper, which overrides the natural origin
    pub(super) fn from_params(p: &Parameters) -> Tmerc {
        let e0 = e0fn(p.es());
        let e1 = e1fn(p.es());
        let e2 = e2fn(p.es());
        let e3 = e3fn(p.es());
        Tmerc {
            a: p.a(),
            es: p.es(),
            ep2: p.ep2(),
            k0: p.k0,
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
        }
    }

    pub(super) fn with_origin(mut self, lat0: f64, long0: f64, x0: f64, y0: f64, k0: f64) -> Tmerc {
        self.lat0 = lat0;
        self.long0 = long0;
        self.x0 = x0;
        self.y0 = y0;
        self.k0 = k0;
        self.ml0 = self.a * mlfn(self.e0, self.e1, self.e2, self.e3, lat0);
        self
    }
}

impl Projection for Tmerc {
    // ----- F O R W A R D -----------------------------------------------
    fn forward(&self, p: &mut Point) {
        let lat = p.y;
        let delta_lon = adjust_lon(p.x - self.long0);
        let sin_phi = lat.sin();
        let cos_phi = lat.cos();

        if self.sphere {
            let b = cos_phi * delta_lon.sin();
            if (b.abs() - 1.).abs() < 1e-10 {
                log::warn!("transverse mercator: point projects into infinity");
                *p = Point { z: p.z, ..Point::nan() };
                return;
            }
            p.x = 0.5 * self.a * self.k0 * ((1. + b) / (1. - b)).ln();
            let mut con = (cos_phi * delta_lon.cos() / (1. - b * b).sqrt()).acos();
            if lat < 0. {
                con = -con;
            }
            p.y = self.a * self.k0 * (con - self.lat0);
            return;
        }

        let al = cos_phi * delta_lon;
        let als = al * al;
        let c = self.ep2 * cos_phi * cos_phi;
        let tq = lat.tan();
        let t = tq * tq;
        let con = 1. - self.es * sin_phi * sin_phi;
        let n = self.a / con.sqrt();
        let ml = self.a * mlfn(self.e0, self.e1, self.e2, self.e3, lat);

        p.x = self.k0
            * n
            * al
            * (1. + als / 6. * (1. - t + c + als / 20. * (5. - 18. * t + t * t + 72. * c - 58. * self.ep2)))
            + self.x0;
        p.y = self.k0
            * (ml - self.ml0
                + n * tq
                    * (als
                        * (0.5
                            + als / 24.
                                * (5. - t + 9. * c + 4. * c * c
                                    + als / 30. * (61. - 58. * t + t * t + 600. * c - 330. * self.ep2)))))
            + self.y0;
    }

    // ----- I N V E R S E -----------------------------------------------
    fn inverse(&self, p: &mut Point) {
        if self.sphere {
            let f = (p.x / (self.a * self.k0)).exp();
            let g = 0.5 * (f - 1. / f);
            let temp = self.lat0 + p.y / (self.a * self.k0);
            let h = temp.cos();
            let con = ((1. - h * h) / (1. + g * g)).sqrt();
            let mut lat = asinz(con);
            if temp < 0. {
                lat = -lat;
            }
            p.x = if g == 0. && h == 0. {
                self.long0
            } else {
                adjust_lon(g.atan2(h) + self.long0)
            };
            p.y = lat;
            return;
        }

        let x = p.x - self.x0;
        let y = p.y - self.y0;

        let con = (self.ml0 + y / self.k0) / self.a;
        let mut phi = con;
        let max_iter = 6;
        let mut converged = false;
        for _ in 0..=max_iter {
            let delta_phi = (con + self.e1 * (2. * phi).sin() - self.e2 * (4. * phi).sin()
                + self.e3 * (6. * phi).sin())
                / self.e0
                - phi;
            phi += delta_phi;
            if delta_phi.abs() <= EPSLN {
                converged = true;
                break;
            }
        }
        if !converged {
            log::warn!("transverse mercator: inverse latitude failed to converge");
            *p = Point { z: p.z, ..Point::nan() };
            return;
        }

        if phi.abs() < FRAC_PI_2 {
            let sin_phi = phi.sin();
            let cos_phi = phi.cos();
            let tan_phi = phi.tan();
            let c = self.ep2 * cos_phi * cos_phi;
            let cs = c * c;
            let t = tan_phi * tan_phi;
            let ts = t * t;
            let con = 1. - self.es * sin_phi * sin_phi;
            let n = self.a / con.sqrt();
            let r = n * (1. - self.es) / con;
            let d = x / (n * self.k0);
            let ds = d * d;
            p.y = phi
                - (n * tan_phi * ds / r)
                    * (0.5
                        - ds / 24.
                            * (5. + 3. * t + 10. * c - 4. * cs - 9. * self.ep2
                                - ds / 30.
                                    * (61. + 90. * t + 298. * c + 45. * ts - 252. * self.ep2 - 3. * cs)));
            p.x = adjust_lon(
                self.long0
                    + d * (1.
                        - ds / 6.
                            * (1. + 2. * t + c
                                - ds / 20. * (5. - 2. * c + 28. * t - 3. * cs + 8. * self.ep2 + 24. * ts)))
                        / cos_phi,
            );
        } else {
            p.y = FRAC_PI_2.copysign(y);
            p.x = self.long0;
        }
    }
}
