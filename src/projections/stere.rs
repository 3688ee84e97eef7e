//! Stereographic: polar, equatorial and oblique aspects, spherical and
//! ellipsoidal forms. The polar ellipsoidal aspect takes its scale from
//! `lat_ts` when one is given.

use super::Projection;
use crate::math::ancillary::{msfnz, phi2z, tsfnz};
use crate::math::{adjust_lon, EPSLN};
use crate::proj::Parameters;
use crate::Error;
use crate::Point;
use std::f64::consts::{FRAC_PI_2, PI};

#[derive(Debug)]
pub struct Stere {
    a: f64,
    e: f64,
    k0: f64,
    x0: f64,
    y0: f64,
    lat0: f64,
    long0: f64,
    sphere: bool,
    sinlat0: f64,
    coslat0: f64,
    // Polar aspect sign, ellipsoidal form only
    con: f64,
    cons: f64,
    ms1: f64,
    // Conformal latitude of the origin and its sine/cosine
    x0_chi: f64,
    sin_x0: f64,
    cos_x0: f64,
}

fn ssfn(phit: f64, sinphi: f64, eccen: f64) -> f64 {
    let sinphi = sinphi * eccen;
    (0.5 * (FRAC_PI_2 + phit)).tan() * ((1. - sinphi) / (1. + sinphi)).powf(0.5 * eccen)
}

pub fn new(p: &Parameters) -> Result<Box<dyn Projection>, Error> {
    let coslat0 = p.lat0.cos();
    let sinlat0 = p.lat0.sin();
    let polar = coslat0.abs() <= EPSLN;
    let e = p.e();

    let mut k0 = p.k0;
    let con = if p.lat0 > 0. { 1. } else { -1. };
    let mut cons = 0.;
    let mut ms1 = 0.;
    let mut x0_chi = 0.0_f64;
    let mut sin_x0 = 0.;
    let mut cos_x0 = 1.;

    if p.sphere() {
        if k0 == 1. && polar {
            if let Some(lat_ts) = p.lat_ts {
                k0 = 0.5 * (1. + con * lat_ts.sin());
            }
        }
    } else {
        cons = ((1. + e).powf(1. + e) * (1. - e).powf(1. - e)).sqrt();
        if k0 == 1. && polar {
            if let Some(lat_ts) = p.lat_ts {
                k0 = 0.5 * cons * msfnz(e, lat_ts.sin(), lat_ts.cos())
                    / tsfnz(e, con * lat_ts, con * lat_ts.sin());
            }
        }
        ms1 = msfnz(e, sinlat0, coslat0);
        x0_chi = 2. * ssfn(p.lat0, sinlat0, e).atan() - FRAC_PI_2;
        sin_x0 = x0_chi.sin();
        cos_x0 = x0_chi.cos();
    }

    Ok(Box::new(Stere {
        a: p.a(),
        e,
        k0,
        x0: p.x0,
        y0: p.y0,
        lat0: p.lat0,
        long0: p.long0,
        sphere: p.sphere(),
        sinlat0,
        coslat0,
        con,
        cons,
        ms1,
        x0_chi,
        sin_x0,
        cos_x0,
    }))
}

impl Stere {
    fn polar(&self) -> bool {
        self.coslat0.abs() <= EPSLN
    }
}

impl Projection for Stere {
    // ----- F O R W A R D -----------------------------------------------
    fn forward(&self, p: &mut Point) {
        let lon = p.x;
        let lat = p.y;
        let sinlat = lat.sin();
        let coslat = lat.cos();
        let dlon = adjust_lon(lon - self.long0);

        // The antipode of the origin has no image
        if ((lon - self.long0).abs() - PI).abs() <= EPSLN && (lat + self.lat0).abs() <= EPSLN {
            log::warn!("stereographic: point is the antipode of the origin");
            *p = Point { z: p.z, ..Point::nan() };
            return;
        }

        if self.sphere {
            let a = 2. * self.k0 / (1. + self.sinlat0 * sinlat + self.coslat0 * coslat * dlon.cos());
            p.x = self.a * a * coslat * dlon.sin() + self.x0;
            p.y = self.a * a * (self.coslat0 * sinlat - self.sinlat0 * coslat * dlon.cos()) + self.y0;
            return;
        }

        let chi = 2. * ssfn(lat, sinlat, self.e).atan() - FRAC_PI_2;
        let cos_chi = chi.cos();
        let sin_chi = chi.sin();

        if self.polar() {
            let ts = tsfnz(self.e, lat * self.con, self.con * sinlat);
            let rh = 2. * self.a * self.k0 * ts / self.cons;
            p.x = self.x0 + rh * (lon - self.long0).sin();
            p.y = self.y0 - self.con * rh * (lon - self.long0).cos();
            return;
        }

        let a = if self.sinlat0.abs() < EPSLN {
            // Equatorial aspect
            2. * self.a * self.k0 / (1. + cos_chi * dlon.cos())
        } else {
            2. * self.a * self.k0 * self.ms1
                / (self.cos_x0 * (1. + self.sin_x0 * sin_chi + self.cos_x0 * cos_chi * dlon.cos()))
        };
        p.y = a * (self.cos_x0 * sin_chi - self.sin_x0 * cos_chi * dlon.cos()) + self.y0;
        p.x = a * cos_chi * dlon.sin() + self.x0;
    }

    // ----- I N V E R S E -----------------------------------------------
    fn inverse(&self, p: &mut Point) {
        let mut x = p.x - self.x0;
        let mut y = p.y - self.y0;
        let rh = x.hypot(y);

        if self.sphere {
            // Forward radius is 2 a k0 tan(c/2)
            let c = 2. * (rh / (2. * self.a * self.k0)).atan();
            if rh <= EPSLN {
                p.x = self.long0;
                p.y = self.lat0;
                return;
            }
            let lat = (c.cos() * self.sinlat0 + y * c.sin() * self.coslat0 / rh).asin();
            let lon = if self.coslat0.abs() < EPSLN {
                if self.lat0 > 0. {
                    adjust_lon(self.long0 + x.atan2(-y))
                } else {
                    adjust_lon(self.long0 + x.atan2(y))
                }
            } else {
                adjust_lon(
                    self.long0
                        + (x * c.sin()).atan2(rh * self.coslat0 * c.cos() - y * self.sinlat0 * c.sin()),
                )
            };
            p.x = lon;
            p.y = lat;
            return;
        }

        if self.polar() {
            if rh <= EPSLN {
                p.x = self.long0;
                p.y = self.lat0;
                return;
            }
            x *= self.con;
            y *= self.con;
            let ts = rh * self.cons / (2. * self.a * self.k0);
            let lat = phi2z(self.e, ts);
            if lat.is_nan() {
                log::warn!("stereographic: inverse latitude did not converge");
                *p = Point { z: p.z, ..Point::nan() };
                return;
            }
            p.y = self.con * lat;
            p.x = self.con * adjust_lon(self.con * self.long0 + x.atan2(-y));
            return;
        }

        let ce = 2. * (rh * self.cos_x0 / (2. * self.a * self.k0 * self.ms1)).atan();
        let mut lon = self.long0;
        let chi = if rh <= EPSLN {
            self.x0_chi
        } else {
            let chi = (ce.cos() * self.sin_x0 + y * ce.sin() * self.cos_x0 / rh).asin();
            lon = adjust_lon(
                self.long0
                    + (x * ce.sin()).atan2(rh * self.cos_x0 * ce.cos() - y * self.sin_x0 * ce.sin()),
            );
            chi
        };
        let lat = -phi2z(self.e, (0.5 * (FRAC_PI_2 + chi)).tan());
        if lat.is_nan() {
            log::warn!("stereographic: inverse latitude did not converge");
            *p = Point { z: p.z, ..Point::nan() };
            return;
        }
        p.x = lon;
        p.y = lat;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projections::testutil::params;
    use crate::proj::ProjDef;

    #[test]
    fn polar_roundtrip() {
        // Universal Polar Stereographic, north
        let proj = new(&params(ProjDef {
            proj: Some("stere".into()),
            ellps: Some("WGS84".into()),
            lat0: Some(90.),
            lat_ts: Some(70.),
            long0: Some(-45.),
            x0: Some(2_000_000.),
            y0: Some(2_000_000.),
            ..Default::default()
        }))
        .unwrap();

        for (lon, lat) in [(-45., 90.), (-30., 75.), (120., 82.), (0., 65.)] {
            let orig = Point::new(f64::to_radians(lon), f64::to_radians(lat));
            let mut p = orig;
            proj.forward(&mut p);
            proj.inverse(&mut p);
            // At the pole itself the longitude is indeterminate
            if lat < 90. {
                assert!((p.x - orig.x).abs() < 1e-9, "lon {lon}");
            }
            assert!((p.y - orig.y).abs() < 1e-9, "lat {lat}");
        }
    }

    #[test]
    fn oblique_roundtrip() {
        let proj = new(&params(ProjDef {
            proj: Some("stere".into()),
            ellps: Some("GRS80".into()),
            lat0: Some(52.),
            long0: Some(5.),
            k0: Some(0.9999),
            ..Default::default()
        }))
        .unwrap();
        let orig = Point::new(0.12, 0.93);
        let mut p = orig;
        proj.forward(&mut p);
        proj.inverse(&mut p);
        assert!((p.x - orig.x).abs() < 1e-9);
        assert!((p.y - orig.y).abs() < 1e-9);
    }

    #[test]
    fn spherical_equatorial_roundtrip() {
        let proj = new(&params(ProjDef {
            proj: Some("stere".into()),
            a: Some(6_370_997.),
            b: Some(6_370_997.),
            ..Default::default()
        }))
        .unwrap();
        let orig = Point::new(-0.5, 0.3);
        let mut p = orig;
        proj.forward(&mut p);
        proj.inverse(&mut p);
        assert!((p.x - orig.x).abs() < 1e-9);
        assert!((p.y - orig.y).abs() < 1e-9);
    }

    #[test]
    fn antipode_is_degraded() {
        let proj = new(&params(ProjDef {
            proj: Some("stere".into()),
            a: Some(6_370_997.),
            b: Some(6_370_997.),
            lat0: Some(40.),
            ..Default::default()
        }))
        .unwrap();
        let mut p = Point::new(PI, -40.0_f64.to_radians());
        proj.forward(&mut p);
        assert!(p.is_nan());
    }
}
