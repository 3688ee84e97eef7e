//! Gnomonic, on the auxiliary sphere. Great circles map to straight
//! lines; the far hemisphere has no finite image.

use super::Projection;
use crate::math::ancillary::asinz;
use crate::math::{adjust_lon, EPSLN};
use crate::proj::Parameters;
use crate::Error;
use crate::Point;

#[derive(Debug)]
pub struct Gnom {
    a: f64,
    x0: f64,
    y0: f64,
    lat0: f64,
    long0: f64,
    sin_p14: f64,
    cos_p14: f64,
    infinity_dist: f64,
}

pub fn new(p: &Parameters) -> Result<Box<dyn Projection>, Error> {
    Ok(Box::new(Gnom {
        a: p.a(),
        x0: p.x0,
        y0: p.y0,
        lat0: p.lat0,
        long0: p.long0,
        sin_p14: p.lat0.sin(),
        cos_p14: p.lat0.cos(),
        infinity_dist: 1000. * p.a(),
    }))
}

impl Projection for Gnom {
    // ----- F O R W A R D -----------------------------------------------
    fn forward(&self, p: &mut Point) {
        let lat = p.y;
        let sinphi = lat.sin();
        let cosphi = lat.cos();
        let dlon = adjust_lon(p.x - self.long0);

        let g = self.sin_p14 * sinphi + self.cos_p14 * cosphi * dlon.cos();
        if g > 0. || g.abs() <= EPSLN {
            p.x = self.x0 + self.a * cosphi * dlon.sin() / g;
            p.y = self.y0
                + self.a * (self.cos_p14 * sinphi - self.sin_p14 * cosphi * dlon.cos()) / g;
        } else {
            // Far hemisphere: clamp onto a huge circle instead of failing
            log::warn!("gnomonic: point is on the far hemisphere");
            p.x = self.x0 + self.infinity_dist * cosphi * dlon.sin();
            p.y = self.y0
                + self.infinity_dist * (self.cos_p14 * sinphi - self.sin_p14 * cosphi * dlon.cos());
        }
    }

    // ----- I N V E R S E -----------------------------------------------
    fn inverse(&self, p: &mut Point) {
        let x = (p.x - self.x0) / self.a;
        let y = (p.y - self.y0) / self.a;
        let rh = x.hypot(y);

        if rh != 0. {
            let z = rh.atan2(1.);
            let sin_z = z.sin();
            let cos_z = z.cos();
            p.y = asinz(cos_z * self.sin_p14 + y * sin_z * self.cos_p14 / rh);
            p.x = adjust_lon(
                self.long0
                    + (x * sin_z).atan2(rh * self.cos_p14 * cos_z - y * self.sin_p14 * sin_z),
            );
        } else {
            p.y = self.lat0;
            p.x = self.long0;
        }
    }
}
