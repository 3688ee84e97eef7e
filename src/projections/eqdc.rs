//! Equidistant Conic.

use super::Projection;
use crate::math::ancillary::{e0fn, e1fn, e2fn, e3fn, imlfn, mlfn, msfnz};
use crate::math::{adjust_lat, adjust_lon, EPSLN};
use crate::proj::Parameters;
use crate::Error;
use crate::Point;

#[derive(Debug)]
pub struct Eqdc {
    a: f64,
    x0: f64,
    y0: f64,
    long0: f64,
    sphere: bool,
    e0: f64,
    e1: f64,
    e2: f64,
    e3: f64,
    ns: f64,
    g: f64,
    rh: f64,
}

pub fn new(p: &Parameters) -> Result<Box<dyn Projection>, Error> {
    let lat1 = p.lat1.unwrap_or(p.lat0);
    let lat2 = p.lat2.unwrap_or(lat1);
    if (lat1 + lat2).abs() < EPSLN {
        return Err(Error::General("eqdc: standard parallels are opposite"));
    }

    let e = p.e();
    let e0 = e0fn(p.es());
    let e1 = e1fn(p.es());
    let e2 = e2fn(p.es());
    let e3 = e3fn(p.es());

    let sinphi = lat1.sin();
    let ms1 = msfnz(e, sinphi, lat1.cos());
    let ml1 = mlfn(e0, e1, e2, e3, lat1);

    let ns = if (lat1 - lat2).abs() < EPSLN {
        sinphi
    } else {
        let sinphi = lat2.sin();
        let ms2 = msfnz(e, sinphi, lat2.cos());
        let ml2 = mlfn(e0, e1, e2, e3, lat2);
        (ms1 - ms2) / (ml2 - ml1)
    };
    let g = ml1 + ms1 / ns;
    let ml0 = mlfn(e0, e1, e2, e3, p.lat0);

    Ok(Box::new(Eqdc {
        a: p.a(),
        x0: p.x0,
        y0: p.y0,
        long0: p.long0,
        sphere: p.sphere(),
        e0,
        e1,
        e2,
        e3,
        ns,
        g,
        rh: p.a() * (g - ml0),
    }))
}

impl Projection for Eqdc {
    // ----- F O R W A R D -----------------------------------------------
    fn forward(&self, p: &mut Point) {
        let lon = p.x;
        let lat = p.y;

        let rh1 = if self.sphere {
            self.a * (self.g - lat)
        } else {
            let ml = mlfn(self.e0, self.e1, self.e2, self.e3, lat);
            self.a * (self.g - ml)
        };
        let theta = self.ns * adjust_lon(lon - self.long0);
        p.x = self.x0 + rh1 * theta.sin();
        p.y = self.y0 + self.rh - rh1 * theta.cos();
    }

    // ----- I N V E R S E -----------------------------------------------
    fn inverse(&self, p: &mut Point) {
        let x = p.x - self.x0;
        let y = self.rh - p.y + self.y0;

        let (rh1, con) = if self.ns >= 0. {
            (x.hypot(y), 1.)
        } else {
            (-x.hypot(y), -1.)
        };
        let theta = if rh1 != 0. {
            (con * x).atan2(con * y)
        } else {
            0.
        };

        let lat = if self.sphere {
            adjust_lat(self.g - rh1 / self.a)
        } else {
            let lat = imlfn(self.g - rh1 / self.a, self.e0, self.e1, self.e2, self.e3);
            if lat.is_nan() {
                *p = Point { z: p.z, ..Point::nan() };
                return;
            }
            adjust_lat(lat)
        };

        p.x = adjust_lon(self.long0 + theta / self.ns);
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
            proj: Some("eqdc".into()),
            ellps: Some("GRS80".into()),
            lat1: Some(35.),
            lat2: Some(60.),
            lat0: Some(40.),
            long0: Some(20.),
            ..Default::default()
        }))
        .unwrap();
        for (lon, lat) in [(20., 40.), (10., 50.), (35., 65.), (25., 30.)] {
            let orig = Point::new(f64::to_radians(lon), f64::to_radians(lat));
            let mut p = orig;
            proj.forward(&mut p);
            proj.inverse(&mut p);
            assert!((p.x - orig.x).abs() < 1e-9, "lon {lon}");
            assert!((p.y - orig.y).abs() < 1e-9, "lat {lat}");
        }
    }

    #[test]
    fn single_parallel_roundtrip() {
        let proj = new(&params(ProjDef {
            proj: Some("eqdc".into()),
            ellps: Some("GRS80".into()),
            lat1: Some(45.),
            ..Default::default()
        }))
        .unwrap();
        let orig = Point::new(0.2, 0.8);
        let mut p = orig;
        proj.forward(&mut p);
        proj.inverse(&mut p);
        assert!((p.x - orig.x).abs() < 1e-9);
        assert!((p.y - orig.y).abs() < 1e-9);
    }

    #[test]
    fn opposite_parallels_rejected() {
        let p = params(ProjDef {
            proj: Some("eqdc".into()),
            ellps: Some("GRS80".into()),
            lat1: Some(20.),
            lat2: Some(-20.),
            ..Default::default()
        });
        assert!(new(&p).is_err());
    }
}
