//! American Polyconic.

use super::Projection;
use crate::math::ancillary::{e0fn, e1fn, e2fn, e3fn, gn, mlfn};
use crate::math::{adjust_lat, adjust_lon, EPSLN, MAX_ITER};
use crate::proj::Parameters;
use crate::Error;
use crate::Point;

#[derive(Debug)]
pub struct Poly {
    a: f64,
    e: f64,
    es: f64,
    x0: f64,
    y0: f64,
    lat0: f64,
    long0: f64,
    sphere: bool,
    e0: f64,
    e1: f64,
    e2: f64,
    e3: f64,
    ml0: f64,
}

pub fn new(p: &Parameters) -> Result<Box<dyn Projection>, Error> {
    let e0 = e0fn(p.es());
    let e1 = e1fn(p.es());
    let e2 = e2fn(p.es());
    let e3 = e3fn(p.es());
    let ml0 = if p.sphere() {
        0.
    } else {
        p.a() * mlfn(e0, e1, e2, e3, p.lat0)
    };
    Ok(Box::new(Poly {
        a: p.a(),
        e: p.e(),
        es: p.es(),
        x0: p.x0,
        y0: p.y0,
        lat0: p.lat0,
        long0: p.long0,
        sphere: p.sphere(),
        e0,
        e1,
        e2,
        e3,
        ml0,
    }))
}

impl Projection for Poly {
    // ----- F O R W A R D -----------------------------------------------
    fn forward(&self, p: &mut Point) {
        let lat = p.y;
        let dlon = adjust_lon(p.x - self.long0);
        let el = dlon * lat.sin();

        if self.sphere {
            if lat.abs() <= EPSLN {
                p.x = self.x0 + self.a * dlon;
                p.y = self.y0 - self.a * self.lat0;
            } else {
                p.x = self.x0 + self.a * el.sin() / lat.tan();
                p.y = self.y0
                    + self.a * (adjust_lat(lat - self.lat0) + (1. - el.cos()) / lat.tan());
            }
        } else if lat.abs() <= EPSLN {
            p.x = self.x0 + self.a * dlon;
            p.y = self.y0 - self.ml0;
        } else {
            let nl = gn(self.a, self.e, lat.sin()) / lat.tan();
            p.x = self.x0 + nl * el.sin();
            p.y = self.y0
                + self.a * mlfn(self.e0, self.e1, self.e2, self.e3, lat) - self.ml0
                + nl * (1. - el.cos());
        }
    }

    // ----- I N V E R S E -----------------------------------------------
    fn inverse(&self, p: &mut Point) {
        let x = p.x - self.x0;
        let y = p.y - self.y0;

        if self.sphere {
            if (y + self.a * self.lat0).abs() <= EPSLN {
                p.x = adjust_lon(x / self.a + self.long0);
                p.y = 0.;
                return;
            }
            let al = self.lat0 + y / self.a;
            let bl = x * x / (self.a * self.a) + al * al;
            let mut phi = al;
            let mut converged = false;
            for _ in 0..MAX_ITER {
                let tanphi = phi.tan();
                let dphi = -(al * (phi * tanphi + 1.) - phi - 0.5 * (phi * phi + bl) * tanphi)
                    / ((phi - al) / tanphi - 1.);
                phi += dphi;
                if dphi.abs() <= EPSLN {
                    converged = true;
                    break;
                }
            }
            if !converged {
                log::warn!("polyconic: inverse latitude did not converge");
                *p = Point { z: p.z, ..Point::nan() };
                return;
            }
            p.x = adjust_lon(self.long0 + (x * phi.tan() / self.a).asin() / phi.sin());
            p.y = phi;
            return;
        }

        if (y + self.ml0).abs() <= EPSLN {
            p.y = 0.;
            p.x = adjust_lon(self.long0 + x / self.a);
            return;
        }

        let al = (self.ml0 + y) / self.a;
        let bl = x * x / (self.a * self.a) + al * al;
        let mut phi = al;
        let mut converged = false;
        for _ in 0..MAX_ITER {
            let con = self.e * phi.sin();
            let cl = (1. - con * con).sqrt() * phi.tan();
            let mln = self.a * mlfn(self.e0, self.e1, self.e2, self.e3, phi);
            let mlnp = self.e0 - 2. * self.e1 * (2. * phi).cos() + 4. * self.e2 * (4. * phi).cos()
                - 6. * self.e3 * (6. * phi).cos();
            let ma = mln / self.a;
            let dphi = (al * (cl * ma + 1.) - ma - 0.5 * cl * (ma * ma + bl))
                / (self.es * (2. * phi).sin() * (ma * ma + bl - 2. * al * ma) / (4. * cl)
                    + (al - ma) * (cl * mlnp - 2. / (2. * phi).sin())
                    - mlnp);
            phi -= dphi;
            if dphi.abs() <= EPSLN {
                converged = true;
                break;
            }
        }
        if !converged {
            log::warn!("polyconic: inverse latitude did not converge");
            *p = Point { z: p.z, ..Point::nan() };
            return;
        }

        let cl = (1. - self.es * phi.sin().powi(2)).sqrt() * phi.tan();
        p.x = adjust_lon(self.long0 + (x * cl / self.a).asin() / phi.sin());
        p.y = phi;
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
            proj: Some("poly".into()),
            ellps: Some("clrk66".into()),
            lat0: Some(30.),
            long0: Some(-96.),
            ..Default::default()
        }))
        .unwrap();
        for (lon, lat) in [(-96., 30.), (-90., 40.), (-105., 25.)] {
            let orig = Point::new(f64::to_radians(lon), f64::to_radians(lat));
            let mut p = orig;
            proj.forward(&mut p);
            proj.inverse(&mut p);
            assert!((p.x - orig.x).abs() < 1e-9, "lon {lon}");
            assert!((p.y - orig.y).abs() < 1e-9, "lat {lat}");
        }
    }

    #[test]
    fn equator_line_is_linear() {
        let proj = new(&params(ProjDef {
            proj: Some("poly".into()),
            ellps: Some("clrk66".into()),
            long0: Some(0.),
            ..Default::default()
        }))
        .unwrap();
        let mut p = Point::new(0.25, 0.);
        proj.forward(&mut p);
        assert!((p.x - 6_378_206.4 * 0.25).abs() < 1e-6);
        assert!(p.y.abs() < 1e-6);
        proj.inverse(&mut p);
        assert!((p.x - 0.25).abs() < 1e-12);
        assert!(p.y.abs() < 1e-12);
    }

    #[test]
    fn spherical_roundtrip() {
        let proj = new(&params(ProjDef {
            proj: Some("poly".into()),
            a: Some(6_370_997.),
            b: Some(6_370_997.),
            lat0: Some(20.),
            ..Default::default()
        }))
        .unwrap();
        let orig = Point::new(0.1, 0.5);
        let mut p = orig;
        proj.forward(&mut p);
        proj.inverse(&mut p);
        assert!((p.x - orig.x).abs() < 1e-9);
        assert!((p.y - orig.y).abs() < 1e-9);
    }
}
