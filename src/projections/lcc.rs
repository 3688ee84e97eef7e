//! Lambert Conformal Conic, one or two standard parallels.

use super::Projection;
use crate::math::ancillary::{msfnz, phi2z, tsfnz};
use crate::math::{adjust_lon, EPSLN};
use crate::proj::Parameters;
use crate::Error;
use crate::Point;
use std::f64::consts::{FRAC_PI_2, PI};

#[derive(Debug)]
pub struct Lcc {
    a: f64,
    e: f64,
    k0: f64,
    x0: f64,
    y0: f64,
    long0: f64,
    ns: f64,
    f0: f64,
    rh: f64,
}

pub fn new(p: &Parameters) -> Result<Box<dyn Projection>, Error> {
    // A single standard parallel means the tangent cone at lat0
    let lat1 = p.lat1.unwrap_or(p.lat0);
    let lat2 = p.lat2.unwrap_or(lat1);

    // Parallels mirrored across the equator leave the cone undefined
    if (lat1 + lat2).abs() < EPSLN {
        return Err(Error::General("lcc: standard parallels are opposite"));
    }

    let e = p.e();
    let sin1 = lat1.sin();
    let ms1 = msfnz(e, sin1, lat1.cos());
    let ts1 = tsfnz(e, lat1, sin1);

    let sin2 = lat2.sin();
    let ms2 = msfnz(e, sin2, lat2.cos());
    let ts2 = tsfnz(e, lat2, sin2);

    let ts0 = tsfnz(e, p.lat0, p.lat0.sin());

    let ns = if (lat1 - lat2).abs() > EPSLN {
        (ms1 / ms2).ln() / (ts1 / ts2).ln()
    } else {
        sin1
    };
    let f0 = ms1 / (ns * ts1.powf(ns));

    Ok(Box::new(Lcc {
        a: p.a(),
        e,
        k0: p.k0,
        x0: p.x0,
        y0: p.y0,
        long0: p.long0,
        ns,
        f0,
        rh: p.a() * f0 * ts0.powf(ns),
    }))
}

impl Projection for Lcc {
    // ----- F O R W A R D -----------------------------------------------
    fn forward(&self, p: &mut Point) {
        let lon = p.x;
        let mut lat = p.y;

        // Nudge the poles inside the domain
        if (2. * lat.abs() - PI).abs() <= EPSLN {
            lat = (FRAC_PI_2 - 2. * EPSLN).copysign(lat);
        }

        let con = (lat.abs() - FRAC_PI_2).abs();
        let rh1 = if con > EPSLN {
            let ts = tsfnz(self.e, lat, lat.sin());
            self.a * self.f0 * ts.powf(self.ns)
        } else {
            if lat * self.ns <= 0. {
                log::warn!("lambert conformal conic: point at the far pole");
                *p = Point { z: p.z, ..Point::nan() };
                return;
            }
            0.
        };

        let theta = self.ns * adjust_lon(lon - self.long0);
        p.x = self.k0 * (rh1 * theta.sin()) + self.x0;
        p.y = self.k0 * (self.rh - rh1 * theta.cos()) + self.y0;
    }

    // ----- I N V E R S E -----------------------------------------------
    fn inverse(&self, p: &mut Point) {
        let x = (p.x - self.x0) / self.k0;
        let y = self.rh - (p.y - self.y0) / self.k0;

        let (rh1, con) = if self.ns > 0. {
            (x.hypot(y), 1.)
        } else {
            (-x.hypot(y), -1.)
        };
        let theta = if rh1 != 0. {
            (con * x).atan2(con * y)
        } else {
            0.
        };

        let lat = if rh1 != 0. || self.ns > 0. {
            let ts = (rh1 / (self.a * self.f0)).powf(1. / self.ns);
            let lat = phi2z(self.e, ts);
            if lat.is_nan() {
                log::warn!("lambert conformal conic: inverse latitude did not converge");
                *p = Point { z: p.z, ..Point::nan() };
                return;
            }
            lat
        } else {
            -FRAC_PI_2
        };

        p.x = adjust_lon(theta / self.ns + self.long0);
        p.y = lat;
    }
}
