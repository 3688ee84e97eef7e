//! Sinusoidal, equal area with straight parallels.

use super::Projection;
use crate::math::ancillary::{pj_enfn, pj_inv_mlfn, pj_mlfn};
use crate::math::adjust_lon;
use crate::proj::Parameters;
use crate::Error;
use crate::Point;
use std::f64::consts::FRAC_PI_2;

#[derive(Debug)]
pub struct Sinu {
    a: f64,
    es: f64,
    x0: f64,
    y0: f64,
    long0: f64,
    sphere: bool,
    en: [f64; 5],
}

pub fn new(p: &Parameters) -> Result<Box<dyn Projection>, Error> {
    Ok(Box::new(Sinu {
        a: p.a(),
        es: p.es(),
        x0: p.x0,
        y0: p.y0,
        long0: p.long0,
        sphere: p.sphere(),
        en: pj_enfn(p.es()),
    }))
}

impl Projection for Sinu {
    // ----- F O R W A R D -----------------------------------------------
    fn forward(&self, p: &mut Point) {
        let lat = p.y;
        let lon = adjust_lon(p.x - self.long0);

        if self.sphere {
            p.x = self.x0 + self.a * lon * lat.cos();
            p.y = self.y0 + self.a * lat;
        } else {
            let s = lat.sin();
            let c = lat.cos();
            p.y = self.y0 + self.a * pj_mlfn(lat, s, c, &self.en);
            p.x = self.x0 + self.a * lon * c / (1. - self.es * s * s).sqrt();
        }
    }

    // ----- I N V E R S E -----------------------------------------------
    fn inverse(&self, p: &mut Point) {
        let x = p.x - self.x0;
        let y = p.y - self.y0;

        if self.sphere {
            let lat = y / self.a;
            p.y = lat;
            p.x = adjust_lon(self.long0 + x / (self.a * lat.cos()));
            return;
        }

        let lat = pj_inv_mlfn(y / self.a, self.es, &self.en);
        let s = lat.abs();
        if s < FRAC_PI_2 {
            let sin_lat = lat.sin();
            p.x = adjust_lon(
                self.long0 + x * (1. - self.es * sin_lat * sin_lat).sqrt() / (self.a * lat.cos()),
            );
        } else {
            p.x = self.long0;
        }
        p.y = lat;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projections::testutil::params;
    use crate::proj::ProjDef;

    #[test]
    fn ellipsoidal_roundtrip() {
        let proj = new(&params(ProjDef {
            proj: Some("sinu".into()),
            ellps: Some("WGS84".into()),
            ..Default::default()
        }))
        .unwrap();
        for (lon, lat) in [(0., 0.), (60., 45.), (-120., -30.)] {
            let orig = Point::new(f64::to_radians(lon), f64::to_radians(lat));
            let mut p = orig;
            proj.forward(&mut p);
            proj.inverse(&mut p);
            assert!((p.x - orig.x).abs() < 1e-9, "lon {lon}");
            assert!((p.y - orig.y).abs() < 1e-9, "lat {lat}");
        }
    }

    #[test]
    fn central_meridian_is_the_meridian_arc() {
        let proj = new(&params(ProjDef {
            proj: Some("sinu".into()),
            a: Some(6_370_997.),
            b: Some(6_370_997.),
            ..Default::default()
        }))
        .unwrap();
        let mut p = Point::new(0., 0.5);
        proj.forward(&mut p);
        assert!(p.x.abs() < 1e-9);
        assert!((p.y - 6_370_997. * 0.5).abs() < 1e-6);
    }
}
