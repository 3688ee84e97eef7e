//! Cylindrical Equal Area (Lambert, Behrmann and friends via lat_ts).

use super::Projection;
use crate::math::ancillary::{iqsfnz, msfnz, qsfnz};
use crate::math::adjust_lon;
use crate::proj::Parameters;
use crate::Error;
use crate::Point;

#[derive(Debug)]
pub struct Cea {
    a: f64,
    e: f64,
    x0: f64,
    y0: f64,
    long0: f64,
    lat_ts: f64,
    k0: f64,
    sphere: bool,
}

pub fn new(p: &Parameters) -> Result<Box<dyn Projection>, Error> {
    let lat_ts = p.lat_ts.unwrap_or(0.);
    let k0 = if p.sphere() {
        p.k0
    } else {
        msfnz(p.e(), lat_ts.sin(), lat_ts.cos())
    };
    Ok(Box::new(Cea {
        a: p.a(),
        e: p.e(),
        x0: p.x0,
        y0: p.y0,
        long0: p.long0,
        lat_ts,
        k0,
        sphere: p.sphere(),
    }))
}

impl Projection for Cea {
    // ----- F O R W A R D -----------------------------------------------
    fn forward(&self, p: &mut Point) {
        let lat = p.y;
        let dlon = adjust_lon(p.x - self.long0);

        if self.sphere {
            p.x = self.x0 + self.a * dlon * self.lat_ts.cos();
            p.y = self.y0 + self.a * lat.sin() / self.lat_ts.cos();
        } else {
            let qs = qsfnz(self.e, lat.sin());
            p.x = self.x0 + self.a * self.k0 * dlon;
            p.y = self.y0 + self.a * qs * 0.5 / self.k0;
        }
    }

    // ----- I N V E R S E -----------------------------------------------
    fn inverse(&self, p: &mut Point) {
        let x = p.x - self.x0;
        let y = p.y - self.y0;

        if self.sphere {
            p.x = adjust_lon(self.long0 + x / self.a / self.lat_ts.cos());
            p.y = (y / self.a * self.lat_ts.cos()).asin();
        } else {
            let lat = iqsfnz(self.e, 2. * y * self.k0 / self.a);
            if lat.is_nan() {
                log::warn!("cylindrical equal area: inverse latitude did not converge");
                *p = Point { z: p.z, ..Point::nan() };
                return;
            }
            p.y = lat;
            p.x = adjust_lon(self.long0 + x / (self.a * self.k0));
        }
    }
}
