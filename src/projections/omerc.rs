//! Oblique Mercator (Hotine). Either form is accepted: a central point
//! with an azimuth, or two points on the central line.

use super::Projection;
use crate::math::ancillary::{phi2z, tsfnz};
use crate::math::{adjust_lon, EPSLN};
use crate::proj::Parameters;
use crate::Error;
use crate::Point;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

#[derive(Debug)]
pub struct Omerc {
    e: f64,
    x0: f64,
    y0: f64,
    long0: f64,
    al: f64,
    bl: f64,
    el: f64,
    gamma0: f64,
    alpha: f64,
    uc: f64,
    no_rot: bool,
}

pub fn new(p: &Parameters) -> Result<Box<dyn Projection>, Error> {
    let central = p.longc.is_some() && p.alpha.is_some();
    let two_point =
        p.lat1.is_some() && p.lat2.is_some() && p.long1.is_some() && p.long2.is_some();
    if !central && !two_point {
        return Err(Error::General(
            "omerc: needs either longc and alpha, or lat_1/lon_1 and lat_2/lon_2",
        ));
    }

    let e = p.e();
    let es = p.es();
    let lat0 = p.lat0;
    let sinlat = lat0.sin();
    let coslat = lat0.cos();
    let con = e * sinlat;

    let bl = (1. + es / (1. - es) * coslat.powi(4)).sqrt();
    let al = p.a() * bl * p.k0 * (1. - es).sqrt() / (1. - con * con);
    let t0 = tsfnz(e, lat0, sinlat);
    let mut dl = bl / coslat * ((1. - es) / (1. - con * con)).sqrt();
    if dl * dl < 1. {
        dl = 1.;
    }
    let fl = if lat0 >= 0. {
        dl + (dl * dl - 1.).sqrt()
    } else {
        dl - (dl * dl - 1.).sqrt()
    };
    let el = fl * t0.powf(bl);

    let (long0, gamma0, alpha) = if central {
        let longc = p.longc.unwrap_or(0.);
        let alpha = p.alpha.unwrap_or(0.);
        let gl = 0.5 * (fl - 1. / fl);
        let gamma0 = (alpha.sin() / dl).asin();
        let long0 = longc - (gl * gamma0.tan()).asin() / bl;
        (long0, gamma0, alpha)
    } else {
        let (lat1, lat2) = (p.lat1.unwrap_or(0.), p.lat2.unwrap_or(0.));
        let (long1, long2) = (p.long1.unwrap_or(0.), p.long2.unwrap_or(0.));
        let t1 = tsfnz(e, lat1, lat1.sin());
        let t2 = tsfnz(e, lat2, lat2.sin());
        let hl = t1.powf(bl);
        let ll = t2.powf(bl);
        let fl = el / hl;
        let gl = 0.5 * (fl - 1. / fl);
        let jl = (el * el - ll * hl) / (el * el + ll * hl);
        let pl = (ll - hl) / (ll + hl);
        let dlon12 = adjust_lon(long1 - long2);
        let long0 = adjust_lon(
            0.5 * (long1 + long2) - (jl * (0.5 * bl * dlon12).tan() / pl).atan() / bl,
        );
        let gamma0 = ((bl * adjust_lon(long1 - long0)).sin() / gl).atan();
        let alpha = (dl * gamma0.sin()).asin();
        (long0, gamma0, alpha)
    };

    let uc = if p.no_off {
        0.
    } else {
        let u = al / bl * ((dl * dl - 1.).sqrt()).atan2(alpha.cos());
        if lat0 >= 0. {
            u
        } else {
            -u
        }
    };

    Ok(Box::new(Omerc {
        e,
        x0: p.x0,
        y0: p.y0,
        long0,
        al,
        bl,
        el,
        gamma0,
        alpha,
        uc,
        no_rot: p.no_rot,
    }))
}

impl Projection for Omerc {
    // ----- F O R W A R D -----------------------------------------------
    fn forward(&self, p: &mut Point) {
        let lon = p.x;
        let lat = p.y;
        let dlon = adjust_lon(lon - self.long0);

        let (us, vs);
        if (lat.abs() - FRAC_PI_2).abs() <= EPSLN {
            let con = if lat > 0. { -1. } else { 1. };
            vs = self.al / self.bl * (FRAC_PI_4 + con * self.gamma0 * 0.5).tan().ln();
            us = -con * FRAC_PI_2 * self.al / self.bl;
        } else {
            let t = tsfnz(self.e, lat, lat.sin());
            let ql = self.el / t.powf(self.bl);
            let sl = 0.5 * (ql - 1. / ql);
            let tl = 0.5 * (ql + 1. / ql);
            let vl = (self.bl * dlon).sin();
            let ul = (sl * self.gamma0.sin() - vl * self.gamma0.cos()) / tl;
            vs = if (ul.abs() - 1.).abs() <= EPSLN {
                f64::INFINITY
            } else {
                0.5 * self.al * ((1. - ul) / (1. + ul)).ln() / self.bl
            };
            us = if (self.bl * dlon).cos().abs() <= EPSLN {
                self.al * self.bl * dlon
            } else {
                self.al
                    * (sl * self.gamma0.cos() + vl * self.gamma0.sin())
                        .atan2((self.bl * dlon).cos())
                    / self.bl
            };
        }

        if self.no_rot {
            p.x = self.x0 + us;
            p.y = self.y0 + vs;
        } else {
            let us = us - self.uc;
            p.x = self.x0 + vs * self.alpha.cos() + us * self.alpha.sin();
            p.y = self.y0 + us * self.alpha.cos() - vs * self.alpha.sin();
        }
    }

    // ----- I N V E R S E -----------------------------------------------
    fn inverse(&self, p: &mut Point) {
        let (us, vs);
        if self.no_rot {
            vs = p.y - self.y0;
            us = p.x - self.x0;
        } else {
            vs = (p.x - self.x0) * self.alpha.cos() - (p.y - self.y0) * self.alpha.sin();
            us = (p.y - self.y0) * self.alpha.cos() + (p.x - self.x0) * self.alpha.sin()
                + self.uc;
        }

        let qp = (-self.bl * vs / self.al).exp();
        let sp = 0.5 * (qp - 1. / qp);
        let tp = 0.5 * (qp + 1. / qp);
        let vp = (self.bl * us / self.al).sin();
        let up = (vp * self.gamma0.cos() + sp * self.gamma0.sin()) / tp;

        if (up.abs() - 1.).abs() <= EPSLN {
            p.x = self.long0;
            p.y = FRAC_PI_2.copysign(up);
            return;
        }

        let ts = (self.el / ((1. + up) / (1. - up)).sqrt()).powf(1. / self.bl);
        let lat = phi2z(self.e, ts);
        if lat.is_nan() {
            log::warn!("oblique mercator: inverse latitude did not converge");
            *p = Point { z: p.z, ..Point::nan() };
            return;
        }
        p.y = lat;
        p.x = adjust_lon(
            self.long0
                - (sp * self.gamma0.cos() - vp * self.gamma0.sin())
                    .atan2((self.bl * us / self.al).cos())
                    / self.bl,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projections::testutil::params;
    use crate::proj::ProjDef;

    fn rso_like() -> Box<dyn Projection> {
        // Alaska zone 1 style setup: central point and azimuth
        new(&params(ProjDef {
            proj: Some("omerc".into()),
            ellps: Some("GRS80".into()),
            lat0: Some(57.),
            longc: Some(-133.666_666_666_666_7),
            alpha: Some(-36.869_897_645_844_02),
            k0: Some(0.9999),
            x0: Some(5_000_000.),
            y0: Some(-5_000_000.),
            ..Default::default()
        }))
        .unwrap()
    }

    #[test]
    fn central_point_roundtrip() {
        let proj = rso_like();
        for (lon, lat) in [(-134., 57.), (-131.5, 55.3), (-136.2, 58.9)] {
            let orig = Point::new(f64::to_radians(lon), f64::to_radians(lat));
            let mut p = orig;
            proj.forward(&mut p);
            proj.inverse(&mut p);
            assert!((p.x - orig.x).abs() < 1e-9, "lon {lon}");
            assert!((p.y - orig.y).abs() < 1e-9, "lat {lat}");
        }
    }

    #[test]
    fn two_point_roundtrip() {
        let proj = new(&params(ProjDef {
            proj: Some("omerc".into()),
            ellps: Some("GRS80".into()),
            lat0: Some(40.),
            lat1: Some(36.),
            long1: Some(-80.),
            lat2: Some(44.),
            long2: Some(-70.),
            ..Default::default()
        }))
        .unwrap();
        let orig = Point::new(-75.0_f64.to_radians(), 40.0_f64.to_radians());
        let mut p = orig;
        proj.forward(&mut p);
        proj.inverse(&mut p);
        assert!((p.x - orig.x).abs() < 1e-9);
        assert!((p.y - orig.y).abs() < 1e-9);
    }

    #[test]
    fn underspecified_setup_is_rejected() {
        let p = params(ProjDef {
            proj: Some("omerc".into()),
            ellps: Some("GRS80".into()),
            lat0: Some(40.),
            ..Default::default()
        });
        assert!(new(&p).is_err());
    }
}
