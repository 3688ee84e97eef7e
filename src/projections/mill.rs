//! Miller Cylindrical, spherical only.

use super::Projection;
use crate::math::adjust_lon;
use crate::proj::Parameters;
use crate::Error;
use crate::Point;
use std::f64::consts::FRAC_PI_4;

#[derive(Debug)]
pub struct Mill {
    a: f64,
    x0: f64,
    y0: f64,
    long0: f64,
}

pub fn new(p: &Parameters) -> Result<Box<dyn Projection>, Error> {
    Ok(Box::new(Mill {
        a: p.a(),
        x0: p.x0,
        y0: p.y0,
        long0: p.long0,
    }))
}

impl Projection for Mill {
    // ----- F O R W A R D -----------------------------------------------
    fn forward(&self, p: &mut Point) {
        let dlon = adjust_lon(p.x - self.long0);
        p.x = self.x0 + self.a * dlon;
        p.y = self.y0 + self.a * (FRAC_PI_4 + p.y / 2.5).tan().ln() * 1.25;
    }

    // ----- I N V E R S E -----------------------------------------------
    fn inverse(&self, p: &mut Point) {
        let x = p.x - self.x0;
        let y = p.y - self.y0;
        p.x = adjust_lon(self.long0 + x / self.a);
        p.y = 2.5 * ((y / self.a / 1.25).exp().atan() - FRAC_PI_4);
    }
}
