//! Mollweide, on the auxiliary sphere.

use super::Projection;
use crate::math::{adjust_lon, EPSLN};
use crate::proj::Parameters;
use crate::Error;
use crate::Point;
use std::f64::consts::{FRAC_PI_2, PI};

#[derive(Debug)]
pub struct Moll {
    a: f64,
    x0: f64,
    y0: f64,
    long0: f64,
}

pub fn new(p: &Parameters) -> Result<Box<dyn Projection>, Error> {
    Ok(Box::new(Moll {
        a: p.a(),
        x0: p.x0,
        y0: p.y0,
        long0: p.long0,
    }))
}

impl Projection for Moll {
    // ----- F O R W A R D -----------------------------------------------
    fn forward(&self, p: &mut Point) {
        let lon = p.x;
        let lat = p.y;
        let mut delta_lon = adjust_lon(lon - self.long0);

        let con = PI * lat.sin();
        let mut theta = lat;
        for i in 0.. {
            let delta = -(theta + theta.sin() - con) / (1. + theta.cos());
            theta += delta;
            if delta.abs() < EPSLN {
                break;
            }
            if i >= 50 {
                log::warn!("mollweide: theta iteration did not converge");
                break;
            }
        }
        theta /= 2.;

        // Both poles collapse to a point, avoid a spurious x there
        if FRAC_PI_2 - lat.abs() < EPSLN {
            delta_lon = 0.;
        }
        p.x = 0.900_316_316_158 * self.a * delta_lon * theta.cos() + self.x0;
        p.y = 1.414_213_562_373_1 * self.a * theta.sin() + self.y0;
    }

    // ----- I N V E R S E -----------------------------------------------
    fn inverse(&self, p: &mut Point) {
        let x = p.x - self.x0;
        let y = p.y - self.y0;

        let arg = (y / (1.414_213_562_373_1 * self.a)).clamp(-0.999_999_999_999, 0.999_999_999_999);
        let theta = arg.asin();
        let mut lon = adjust_lon(self.long0 + x / (0.900_316_316_158 * self.a * theta.cos()));
        lon = lon.clamp(-PI, PI);
        let arg = ((2. * theta + (2. * theta).sin()) / PI).clamp(-1., 1.);
        p.x = lon;
        p.y = arg.asin();
    }
}
