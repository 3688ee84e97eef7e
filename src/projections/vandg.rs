//! Van der Grinten I, spherical only. The world in a circle.

use super::Projection;
use crate::math::ancillary::asinz;
use crate::math::{adjust_lon, EPSLN};
use crate::proj::Parameters;
use crate::Error;
use crate::Point;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, PI};

#[derive(Debug)]
pub struct Vandg {
    r: f64,
    x0: f64,
    y0: f64,
    long0: f64,
}

pub fn new(p: &Parameters) -> Result<Box<dyn Projection>, Error> {
    Ok(Box::new(Vandg {
        r: p.a(),
        x0: p.x0,
        y0: p.y0,
        long0: p.long0,
    }))
}

impl Projection for Vandg {
    // ----- F O R W A R D -----------------------------------------------
    fn forward(&self, p: &mut Point) {
        let lat = p.y;
        let dlon = adjust_lon(p.x - self.long0);

        if lat.abs() <= EPSLN {
            p.x = self.x0 + self.r * dlon;
            p.y = self.y0;
            return;
        }

        let theta = asinz(2. * (lat / PI).abs());
        if dlon.abs() <= EPSLN || (lat.abs() - FRAC_PI_2).abs() <= EPSLN {
            p.x = self.x0;
            p.y = self.y0 + (PI * self.r * (0.5 * theta).tan()).copysign(lat);
            return;
        }

        let al = 0.5 * (PI / dlon - dlon / PI).abs();
        let asq = al * al;
        let sinth = theta.sin();
        let costh = theta.cos();

        let g = costh / (sinth + costh - 1.);
        let gsq = g * g;
        let m = g * (2. / sinth - 1.);
        let msq = m * m;

        let mut con = PI
            * self.r
            * (al * (g - msq) + (asq * (g - msq).powi(2) - (msq + asq) * (gsq - msq)).sqrt())
            / (msq + asq);
        if dlon < 0. {
            con = -con;
        }
        p.x = self.x0 + con;

        let q = asq + g;
        con = PI * self.r * (m * q - al * ((msq + asq) * (asq + 1.) - q * q).sqrt()) / (msq + asq);
        p.y = self.y0 + con.copysign(lat);
    }

    // ----- I N V E R S E -----------------------------------------------
    fn inverse(&self, p: &mut Point) {
        let con = PI * self.r;
        let xx = (p.x - self.x0) / con;
        let yy = (p.y - self.y0) / con;
        let xys = xx * xx + yy * yy;

        let c1 = -yy.abs() * (1. + xys);
        let c2 = c1 - 2. * yy * yy + xx * xx;
        let c3 = -2. * c1 + 1. + 2. * yy * yy + xys * xys;
        let d = yy * yy / c3
            + (2. * c2.powi(3) / c3.powi(3) - 9. * c1 * c2 / (c3 * c3)) / 27.;
        let a1 = (c1 - c2 * c2 / (3. * c3)) / c3;
        let m1 = 2. * (-a1 / 3.).sqrt();
        let con = ((3. * d) / a1 / m1).clamp(-1., 1.);
        let th1 = con.acos() / 3.;

        p.y = (PI * (-m1 * (th1 + FRAC_PI_3).cos() - c2 / (3. * c3))).copysign(p.y - self.y0);
        p.x = if xx.abs() < EPSLN {
            self.long0
        } else {
            adjust_lon(
                self.long0
                    + PI * (xys - 1. + (1. + 2. * (xx * xx - yy * yy) + xys * xys).sqrt())
                        / (2. * xx),
            )
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projections::testutil::params;
    use crate::proj::ProjDef;

    fn world() -> Box<dyn Projection> {
        new(&params(ProjDef {
            proj: Some("vandg".into()),
            a: Some(6_370_997.),
            b: Some(6_370_997.),
            ..Default::default()
        }))
        .unwrap()
    }

    #[test]
    fn roundtrip() {
        let proj = world();
        for (lon, lat) in [(60., 45.), (-120., -30.), (10., 70.), (-45., 15.)] {
            let orig = Point::new(f64::to_radians(lon), f64::to_radians(lat));
            let mut p = orig;
            proj.forward(&mut p);
            proj.inverse(&mut p);
            assert!((p.x - orig.x).abs() < 1e-6, "lon {lon}");
            assert!((p.y - orig.y).abs() < 1e-6, "lat {lat}");
        }
    }

    #[test]
    fn equator_is_a_straight_line() {
        let proj = world();
        let mut p = Point::new(0.8, 0.);
        proj.forward(&mut p);
        assert!((p.x - 6_370_997. * 0.8).abs() < 1e-6);
        assert!(p.y.abs() < 1e-9);
    }
}
