//! Albers Conical Equal Area.

use super::Projection;
use crate::math::ancillary::{asinz, msfnz, qsfnz};
use crate::math::{adjust_lon, EPSLN};
use crate::proj::Parameters;
use crate::Error;
use crate::Point;

#[derive(Debug)]
pub struct Aea {
    a: f64,
    e3: f64,
    x0: f64,
    y0: f64,
    long0: f64,
    ns0: f64,
    c: f64,
    rh: f64,
    sphere: bool,
}

pub fn new(p: &Parameters) -> Result<Box<dyn Projection>, Error> {
    let lat1 = p.lat1.unwrap_or(p.lat0);
    let lat2 = p.lat2.unwrap_or(lat1);
    if (lat1 + lat2).abs() < EPSLN {
        return Err(Error::General("aea: standard parallels are opposite"));
    }

    let e3 = p.e();
    let sin1 = lat1.sin();
    let ms1 = msfnz(e3, sin1, lat1.cos());
    let qs1 = qsfnz(e3, sin1);
    let sin2 = lat2.sin();
    let ms2 = msfnz(e3, sin2, lat2.cos());
    let qs2 = qsfnz(e3, sin2);
    let qs0 = qsfnz(e3, p.lat0.sin());

    let ns0 = if (lat1 - lat2).abs() > EPSLN {
        (ms1 * ms1 - ms2 * ms2) / (qs2 - qs1)
    } else {
        sin1
    };
    let c = ms1 * ms1 + ns0 * qs1;

    Ok(Box::new(Aea {
        a: p.a(),
        e3,
        x0: p.x0,
        y0: p.y0,
        long0: p.long0,
        ns0,
        c,
        rh: p.a() * (c - ns0 * qs0).sqrt() / ns0,
        sphere: p.sphere(),
    }))
}

impl Aea {
    /// Latitude from the equal-area constant q, by Newton iteration
    fn phi1z(&self, qs: f64) -> f64 {
        let phi = asinz(0.5 * qs);
        if self.e3 < EPSLN {
            return phi;
        }

        let eccnts = self.e3 * self.e3;
        let mut phi = phi;
        for _ in 1..=25 {
            let sinphi = phi.sin();
            let cosphi = phi.cos();
            let con = self.e3 * sinphi;
            let com = 1. - con * con;
            let dphi = 0.5 * com * com / cosphi
                * (qs / (1. - eccnts) - sinphi / com
                    + 0.5 / self.e3 * ((1. - con) / (1. + con)).ln());
            phi += dphi;
            if dphi.abs() <= 1e-7 {
                return phi;
            }
        }
        log::warn!("albers: inverse latitude did not converge");
        f64::NAN
    }
}

impl Projection for Aea {
    // ----- F O R W A R D -----------------------------------------------
    fn forward(&self, p: &mut Point) {
        let lon = p.x;
        let lat = p.y;

        let qs = qsfnz(self.e3, lat.sin());
        let rh1 = self.a * (self.c - self.ns0 * qs).sqrt() / self.ns0;
        let theta = self.ns0 * adjust_lon(lon - self.long0);
        p.x = rh1 * theta.sin() + self.x0;
        p.y = self.rh - rh1 * theta.cos() + self.y0;
    }

    // ----- I N V E R S E -----------------------------------------------
    fn inverse(&self, p: &mut Point) {
        let x = p.x - self.x0;
        let y = self.rh - p.y + self.y0;

        let (rh1, con) = if self.ns0 >= 0. {
            (x.hypot(y), 1.)
        } else {
            (-x.hypot(y), -1.)
        };
        let theta = if rh1 != 0. {
            (con * x).atan2(con * y)
        } else {
            0.
        };

        let con = rh1 * self.ns0 / self.a;
        let lat = if self.sphere {
            asinz((self.c - con * con) / (2. * self.ns0))
        } else {
            let qs = (self.c - con * con) / self.ns0;
            let lat = self.phi1z(qs);
            if lat.is_nan() {
                *p = Point { z: p.z, ..Point::nan() };
                return;
            }
            lat
        };

        p.x = adjust_lon(theta / self.ns0 + self.long0);
        p.y = lat;
    }
}
