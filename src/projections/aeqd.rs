//! Azimuthal Equidistant.

use super::Projection;
use crate::math::ancillary::{e0fn, e1fn, e2fn, e3fn, gn, imlfn, mlfn};
use crate::math::{adjust_lon, EPSLN};
use crate::proj::Parameters;
use crate::Error;
use crate::Point;
use std::f64::consts::{FRAC_PI_2, PI};

#[derive(Debug)]
pub struct Aeqd {
    a: f64,
    e: f64,
    es: f64,
    x0: f64,
    y0: f64,
    lat0: f64,
    long0: f64,
    sphere: bool,
    sin_p12: f64,
    cos_p12: f64,
    e0: f64,
    e1: f64,
    e2: f64,
    e3: f64,
}

pub fn new(p: &Parameters) -> Result<Box<dyn Projection>, Error> {
    Ok(Box::new(Aeqd {
        a: p.a(),
        e: p.e(),
        es: p.es(),
        x0: p.x0,
        y0: p.y0,
        lat0: p.lat0,
        long0: p.long0,
        sphere: p.sphere(),
        sin_p12: p.lat0.sin(),
        cos_p12: p.lat0.cos(),
        e0: e0fn(p.es()),
        e1: e1fn(p.es()),
        e2: e2fn(p.es()),
        e3: e3fn(p.es()),
    }))
}

impl Projection for Aeqd {
    // ----- F O R W A R D -----------------------------------------------
    fn forward(&self, p: &mut Point) {
        let lon = p.x;
        let lat = p.y;
        let sinphi = lat.sin();
        let cosphi = lat.cos();
        let dlon = adjust_lon(lon - self.long0);

        if self.sphere {
            if (self.sin_p12 - 1.).abs() <= EPSLN {
                // North pole
                p.x = self.x0 + self.a * (FRAC_PI_2 - lat) * dlon.sin();
                p.y = self.y0 - self.a * (FRAC_PI_2 - lat) * dlon.cos();
            } else if (self.sin_p12 + 1.).abs() <= EPSLN {
                // South pole
                p.x = self.x0 + self.a * (FRAC_PI_2 + lat) * dlon.sin();
                p.y = self.y0 + self.a * (FRAC_PI_2 + lat) * dlon.cos();
            } else {
                let cos_c = self.sin_p12 * sinphi + self.cos_p12 * cosphi * dlon.cos();
                let c = cos_c.acos();
                let kp = if c != 0. { c / c.sin() } else { 1. };
                p.x = self.x0 + self.a * kp * cosphi * dlon.sin();
                p.y = self.y0
                    + self.a * kp * (self.cos_p12 * sinphi - self.sin_p12 * cosphi * dlon.cos());
            }
            return;
        }

        if (self.sin_p12 - 1.).abs() <= EPSLN {
            let mlp = self.a * mlfn(self.e0, self.e1, self.e2, self.e3, FRAC_PI_2);
            let ml = self.a * mlfn(self.e0, self.e1, self.e2, self.e3, lat);
            p.x = self.x0 + (mlp - ml) * dlon.sin();
            p.y = self.y0 - (mlp - ml) * dlon.cos();
        } else if (self.sin_p12 + 1.).abs() <= EPSLN {
            let mlp = self.a * mlfn(self.e0, self.e1, self.e2, self.e3, FRAC_PI_2);
            let ml = self.a * mlfn(self.e0, self.e1, self.e2, self.e3, lat);
            p.x = self.x0 + (mlp + ml) * dlon.sin();
            p.y = self.y0 + (mlp + ml) * dlon.cos();
        } else {
            let nl1 = gn(self.a, self.e, self.sin_p12);
            let nl = gn(self.a, self.e, sinphi);
            let psi = ((1. - self.es) * lat.tan()
                + self.es * nl1 * self.sin_p12 / (nl * cosphi))
                .atan();
            let az = if psi != 0. {
                dlon.sin()
                    .atan2(self.cos_p12 * psi.tan() - self.sin_p12 * dlon.cos())
            } else {
                dlon.sin().atan2(-self.sin_p12 * dlon.cos())
            };
            let s = if az == 0. {
                (self.cos_p12 * psi.sin() - self.sin_p12 * psi.cos()).asin()
            } else if (az.abs() - PI).abs() <= EPSLN {
                -(self.cos_p12 * psi.sin() - self.sin_p12 * psi.cos()).asin()
            } else {
                (dlon.sin() * psi.cos() / az.sin()).asin()
            };
            let g = self.e * self.sin_p12 / (1. - self.es).sqrt();
            let h = self.e * self.cos_p12 * az.cos() / (1. - self.es).sqrt();
            let gh = g * h;
            let hs = h * h;
            let s2 = s * s;
            let s3 = s2 * s;
            let s4 = s3 * s;
            let s5 = s4 * s;
            let c = nl1
                * s
                * (1. - s2 * hs * (1. - hs) / 6.
                    + s3 / 8. * gh * (1. - 2. * hs)
                    + s4 / 120. * (hs * (4. - 7. * hs) - 3. * g * g * (1. - 7. * hs))
                    - s5 / 48. * gh);
            p.x = self.x0 + c * az.sin();
            p.y = self.y0 + c * az.cos();
        }
    }

    // ----- I N V E R S E -----------------------------------------------
    fn inverse(&self, p: &mut Point) {
        let x = p.x - self.x0;
        let y = p.y - self.y0;

        if self.sphere {
            let rh = x.hypot(y);
            if rh > 2. * FRAC_PI_2 * self.a {
                log::warn!("azimuthal equidistant: point beyond the antipode");
                *p = Point { z: p.z, ..Point::nan() };
                return;
            }
            let z = rh / self.a;
            let cos_z = z.cos();
            let sin_z = z.sin();
            let mut lon = self.long0;
            let lat;
            if rh.abs() <= EPSLN {
                lat = self.lat0;
            } else {
                lat = (cos_z * self.sin_p12 + y * sin_z * self.cos_p12 / rh).asin();
                let con = self.lat0.abs() - FRAC_PI_2;
                if con.abs() <= EPSLN {
                    lon = if self.lat0 >= 0. {
                        adjust_lon(self.long0 + x.atan2(-y))
                    } else {
                        adjust_lon(self.long0 - (-x).atan2(y))
                    };
                } else {
                    lon = adjust_lon(
                        self.long0
                            + (x * sin_z)
                                .atan2(rh * self.cos_p12 * cos_z - y * self.sin_p12 * sin_z),
                    );
                }
            }
            p.x = lon;
            p.y = lat;
            return;
        }

        if (self.sin_p12 - 1.).abs() <= EPSLN {
            let mlp = self.a * mlfn(self.e0, self.e1, self.e2, self.e3, FRAC_PI_2);
            let rh = x.hypot(y);
            let ml = mlp - rh;
            let lat = imlfn(ml / self.a, self.e0, self.e1, self.e2, self.e3);
            if lat.is_nan() {
                *p = Point { z: p.z, ..Point::nan() };
                return;
            }
            p.y = lat;
            p.x = adjust_lon(self.long0 + x.atan2(-y));
        } else if (self.sin_p12 + 1.).abs() <= EPSLN {
            let mlp = self.a * mlfn(self.e0, self.e1, self.e2, self.e3, FRAC_PI_2);
            let rh = x.hypot(y);
            let ml = rh - mlp;
            let lat = imlfn(ml / self.a, self.e0, self.e1, self.e2, self.e3);
            if lat.is_nan() {
                *p = Point { z: p.z, ..Point::nan() };
                return;
            }
            p.y = lat;
            p.x = adjust_lon(self.long0 + x.atan2(y));
        } else {
            let rh = x.hypot(y);
            let az = x.atan2(y);
            let n1 = gn(self.a, self.e, self.sin_p12);
            let cos_az = az.cos();
            let tmp = self.e * self.cos_p12 * cos_az;
            let a1 = -tmp * tmp / (1. - self.es);
            let b1 = 3. * self.es * (1. - a1) * self.sin_p12 * self.cos_p12 * cos_az
                / (1. - self.es);
            let d1 = rh / n1;
            let ee = d1 - a1 * (1. + a1) * d1.powi(3) / 6.
                - b1 * (1. + 3. * a1) * d1.powi(4) / 24.;
            let f1 = 1. - a1 * ee * ee / 2. - d1 * ee.powi(3) / 6.;
            let psi = (self.sin_p12 * ee.cos() + self.cos_p12 * ee.sin() * cos_az).asin();
            p.x = adjust_lon(self.long0 + (az.sin() * ee.sin() / psi.cos()).asin());
            p.y = ((1. - self.es * f1 * self.sin_p12 / psi.sin()) * psi.tan()
                / (1. - self.es))
                .atan();
        }
    }
}
