//! Mercator, spherical and ellipsoidal forms. A `lat_ts` parameter turns
//! into the scale factor at the equator; otherwise `k0` is used directly.

use super::Projection;
use crate::math::ancillary::{msfnz, phi2z, tsfnz};
use crate::math::{adjust_lon, EPSLN};
use crate::proj::Parameters;
use crate::Error;
use crate::Point;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

#[derive(Debug)]
pub struct Merc {
    a: f64,
    e: f64,
    k0: f64,
    x0: f64,
    y0: f64,
    long0: f64,
    sphere: bool,
}

pub fn new(p: &Parameters) -> Result<Box<dyn Projection>, Error> {
    let k0 = match p.lat_ts {
        Some(lat_ts) if p.sphere() => lat_ts.cos(),
        Some(lat_ts) => msfnz(p.e(), lat_ts.sin(), lat_ts.cos()),
        None => p.k0,
    };
    Ok(Box::new(Merc {
        a: p.a(),
        e: p.e(),
        k0,
        x0: p.x0,
        y0: p.y0,
        long0: p.long0,
        sphere: p.sphere(),
    }))
}

impl Projection for Merc {
    // ----- F O R W A R D -----------------------------------------------
    fn forward(&self, p: &mut Point) {
        let lon = p.x;
        let lat = p.y;

        // The poles map to infinity
        if (lat.abs() - FRAC_PI_2).abs() <= EPSLN {
            log::warn!("mercator: latitude at a pole");
            *p = Point { z: p.z, ..Point::nan() };
            return;
        }

        p.x = self.x0 + self.a * self.k0 * adjust_lon(lon - self.long0);
        p.y = if self.sphere {
            self.y0 + self.a * self.k0 * (FRAC_PI_4 + 0.5 * lat).tan().ln()
        } else {
            let ts = tsfnz(self.e, lat, lat.sin());
            self.y0 - self.a * self.k0 * ts.ln()
        };
    }

    // ----- I N V E R S E -----------------------------------------------
    fn inverse(&self, p: &mut Point) {
        let x = p.x - self.x0;
        let y = p.y - self.y0;

        let lat = if self.sphere {
            FRAC_PI_2 - 2. * (-y / (self.a * self.k0)).exp().atan()
        } else {
            let ts = (-y / (self.a * self.k0)).exp();
            let lat = phi2z(self.e, ts);
            if lat.is_nan() {
                log::warn!("mercator: inverse latitude iteration did not converge");
                *p = Point { z: p.z, ..Point::nan() };
                return;
            }
            lat
        };

        p.x = adjust_lon(self.long0 + x / (self.a * self.k0));
        p.y = lat;
    }
}
