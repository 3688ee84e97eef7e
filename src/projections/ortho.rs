//! Orthographic, on the auxiliary sphere. The view from infinity; only
//! one hemisphere is visible.

use super::Projection;
use crate::math::ancillary::asinz;
use crate::math::{adjust_lon, EPSLN};
use crate::proj::Parameters;
use crate::Error;
use crate::Point;
use std::f64::consts::FRAC_PI_2;

#[derive(Debug)]
pub struct Ortho {
    a: f64,
    x0: f64,
    y0: f64,
    lat0: f64,
    long0: f64,
    sin_p14: f64,
    cos_p14: f64,
}

pub fn new(p: &Parameters) -> Result<Box<dyn Projection>, Error> {
    Ok(Box::new(Ortho {
        a: p.a(),
        x0: p.x0,
        y0: p.y0,
        lat0: p.lat0,
        long0: p.long0,
        sin_p14: p.lat0.sin(),
        cos_p14: p.lat0.cos(),
    }))
}

impl Projection for Ortho {
    // ----- F O R W A R D -----------------------------------------------
    fn forward(&self, p: &mut Point) {
        let lat = p.y;
        let sinphi = lat.sin();
        let cosphi = lat.cos();
        let dlon = adjust_lon(p.x - self.long0);

        let g = self.sin_p14 * sinphi + self.cos_p14 * cosphi * dlon.cos();
        if g > 0. || g.abs() <= EPSLN {
            p.x = self.x0 + self.a * cosphi * dlon.sin();
            p.y = self.y0 + self.a * (self.cos_p14 * sinphi - self.sin_p14 * cosphi * dlon.cos());
        } else {
            log::warn!("orthographic: point is on the far hemisphere");
            *p = Point { z: p.z, ..Point::nan() };
        }
    }

    // ----- I N V E R S E -----------------------------------------------
    fn inverse(&self, p: &mut Point) {
        let x = p.x - self.x0;
        let y = p.y - self.y0;
        let rh = x.hypot(y);
        if rh > self.a + 1e-7 {
            // Off the disc: report, then land on the horizon circle
            log::warn!("orthographic: point outside the disc");
        }
        let z = asinz(rh / self.a);
        let sin_z = z.sin();
        let cos_z = z.cos();

        if rh <= EPSLN {
            p.x = self.long0;
            p.y = self.lat0;
            return;
        }
        p.y = asinz(cos_z * self.sin_p14 + y * sin_z * self.cos_p14 / rh);
        let con = self.lat0.abs() - FRAC_PI_2;
        if con.abs() <= EPSLN {
            p.x = if self.lat0 >= 0. {
                adjust_lon(self.long0 + x.atan2(-y))
            } else {
                adjust_lon(self.long0 - (-x).atan2(y))
            };
        } else {
            p.x = adjust_lon(
                self.long0
                    + (x * sin_z).atan2(rh * self.cos_p14 * cos_z - y * self.sin_p14 * sin_z),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projections::testutil::params;
    use crate::proj::ProjDef;

    fn oblique() -> Box<dyn Projection> {
        new(&params(ProjDef {
            proj: Some("ortho".into()),
            a: Some(6_370_997.),
            b: Some(6_370_997.),
            lat0: Some(40.),
            long0: Some(-100.),
            ..Default::default()
        }))
        .unwrap()
    }

    #[test]
    fn near_hemisphere_roundtrip() {
        let proj = oblique();
        for (lon, lat) in [(-100., 40.), (-90., 30.), (-120., 55.)] {
            let orig = Point::new(f64::to_radians(lon), f64::to_radians(lat));
            let mut p = orig;
            proj.forward(&mut p);
            proj.inverse(&mut p);
            assert!((p.x - orig.x).abs() < 1e-9, "lon {lon}");
            assert!((p.y - orig.y).abs() < 1e-9, "lat {lat}");
        }
    }

    #[test]
    fn far_hemisphere_is_degraded() {
        let proj = oblique();
        let mut p = Point::new(80.0_f64.to_radians(), -40.0_f64.to_radians());
        proj.forward(&mut p);
        assert!(p.is_nan());
    }

    #[test]
    fn outside_the_disc_lands_on_the_horizon() {
        let proj = oblique();
        let mut p = Point::new(6_380_997., 0.);
        proj.inverse(&mut p);
        assert!(!p.is_nan());
        // The result sits 90 degrees from the projection center
        let (lat0, long0) = (40.0_f64.to_radians(), -100.0_f64.to_radians());
        let cos_c = lat0.sin() * p.y.sin() + lat0.cos() * p.y.cos() * (p.x - long0).cos();
        assert!(cos_c.abs() < 1e-9);
    }
}
