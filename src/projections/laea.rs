//! Lambert Azimuthal Equal Area, all four aspects.

use super::Projection;
use crate::math::series::{authlat, authset};
use crate::math::ancillary::qsfnz;
use crate::math::{adjust_lon, EPSLN};
use crate::proj::Parameters;
use crate::Error;
use crate::Point;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    NPole,
    SPole,
    Equit,
    Obliq,
}

#[derive(Debug)]
pub struct Laea {
    a: f64,
    e: f64,
    x0: f64,
    y0: f64,
    lat0: f64,
    long0: f64,
    sphere: bool,
    mode: Mode,
    qp: f64,
    rq: f64,
    dd: f64,
    xmf: f64,
    ymf: f64,
    sinb1: f64,
    cosb1: f64,
    sinph0: f64,
    cosph0: f64,
    apa: [f64; 3],
}

pub fn new(p: &Parameters) -> Result<Box<dyn Projection>, Error> {
    let t = p.lat0.abs();
    let mode = if (t - FRAC_PI_2).abs() < EPSLN {
        if p.lat0 < 0. {
            Mode::SPole
        } else {
            Mode::NPole
        }
    } else if t.abs() < EPSLN {
        Mode::Equit
    } else {
        Mode::Obliq
    };

    let e = p.e();
    let es = p.es();
    let mut qp = 0.;
    let mut rq = 0.;
    let mut dd = 1.;
    let mut xmf = 0.;
    let mut ymf = 0.;
    let mut sinb1 = 0.;
    let mut cosb1 = 0.;
    let mut sinph0 = 0.;
    let mut cosph0 = 0.;
    let mut apa = [0.; 3];

    if es > 0. {
        qp = qsfnz(e, 1.);
        apa = authset(es);
        match mode {
            Mode::NPole | Mode::SPole => {
                dd = 1.;
            }
            Mode::Equit => {
                rq = (0.5 * qp).sqrt();
                dd = 1. / rq;
                xmf = 1.;
                ymf = 0.5 * qp;
            }
            Mode::Obliq => {
                rq = (0.5 * qp).sqrt();
                sinb1 = qsfnz(e, p.lat0.sin()) / qp;
                cosb1 = (1. - sinb1 * sinb1).sqrt();
                dd = p.lat0.cos() / ((1. - es * p.lat0.sin().powi(2)).sqrt() * rq * cosb1);
                xmf = rq * dd;
                ymf = rq / dd;
            }
        }
    } else if mode == Mode::Obliq {
        sinph0 = p.lat0.sin();
        cosph0 = p.lat0.cos();
    }

    Ok(Box::new(Laea {
        a: p.a(),
        e,
        x0: p.x0,
        y0: p.y0,
        lat0: p.lat0,
        long0: p.long0,
        sphere: p.sphere(),
        mode,
        qp,
        rq,
        dd,
        xmf,
        ymf,
        sinb1,
        cosb1,
        sinph0,
        cosph0,
        apa,
    }))
}

impl Projection for Laea {
    // ----- F O R W A R D -----------------------------------------------
    fn forward(&self, p: &mut Point) {
        let lam = adjust_lon(p.x - self.long0);
        let phi = p.y;
        let (x, y);

        if self.sphere {
            let sinphi = phi.sin();
            let cosphi = phi.cos();
            let mut coslam = lam.cos();
            match self.mode {
                Mode::Equit | Mode::Obliq => {
                    let mut yy = if self.mode == Mode::Equit {
                        1. + cosphi * coslam
                    } else {
                        1. + self.sinph0 * sinphi + self.cosph0 * cosphi * coslam
                    };
                    if yy <= EPSLN {
                        log::warn!("lambert azimuthal: point is the antipode of the origin");
                        *p = Point { z: p.z, ..Point::nan() };
                        return;
                    }
                    yy = (2. / yy).sqrt();
                    x = yy * cosphi * lam.sin();
                    y = yy * if self.mode == Mode::Equit {
                        sinphi
                    } else {
                        self.cosph0 * sinphi - self.sinph0 * cosphi * coslam
                    };
                }
                Mode::NPole | Mode::SPole => {
                    if self.mode == Mode::NPole {
                        coslam = -coslam;
                    }
                    if (phi + self.lat0).abs() < EPSLN {
                        log::warn!("lambert azimuthal: point is the antipode of the origin");
                        *p = Point { z: p.z, ..Point::nan() };
                        return;
                    }
                    let mut yy = FRAC_PI_4 - phi * 0.5;
                    yy = 2. * if self.mode == Mode::SPole { yy.cos() } else { yy.sin() };
                    x = yy * lam.sin();
                    y = yy * coslam;
                }
            }
        } else {
            let coslam = lam.cos();
            let sinlam = lam.sin();
            let sinphi = phi.sin();
            let q = qsfnz(self.e, sinphi);
            match self.mode {
                Mode::Obliq | Mode::Equit => {
                    let sinb = q / self.qp;
                    let cosb = (1. - sinb * sinb).sqrt();
                    let b = match self.mode {
                        Mode::Obliq => 1. + self.sinb1 * sinb + self.cosb1 * cosb * coslam,
                        _ => 1. + cosb * coslam,
                    };
                    if b.abs() < EPSLN {
                        log::warn!("lambert azimuthal: point is the antipode of the origin");
                        *p = Point { z: p.z, ..Point::nan() };
                        return;
                    }
                    let b = (2. / b).sqrt();
                    y = if self.mode == Mode::Obliq {
                        self.ymf * b * (self.cosb1 * sinb - self.sinb1 * cosb * coslam)
                    } else {
                        (2. / (1. + cosb * coslam)).sqrt() * sinb * self.ymf
                    };
                    x = self.xmf * b * cosb * sinlam;
                }
                Mode::NPole | Mode::SPole => {
                    let q = if self.mode == Mode::NPole { self.qp - q } else { self.qp + q };
                    if q >= 0. {
                        let b = q.sqrt();
                        x = b * sinlam;
                        y = coslam * if self.mode == Mode::SPole { b } else { -b };
                    } else {
                        x = 0.;
                        y = 0.;
                    }
                }
            }
        }

        p.x = self.a * x + self.x0;
        p.y = self.a * y + self.y0;
    }

    // ----- I N V E R S E -----------------------------------------------
    fn inverse(&self, p: &mut Point) {
        let mut x = (p.x - self.x0) / self.a;
        let mut y = (p.y - self.y0) / self.a;

        if self.sphere {
            let rh = x.hypot(y);
            let mut phi = rh * 0.5;
            if phi > 1. {
                log::warn!("lambert azimuthal: point outside the disc");
                *p = Point { z: p.z, ..Point::nan() };
                return;
            }
            phi = 2. * phi.asin();
            let (sinz, cosz) = match self.mode {
                Mode::Obliq | Mode::Equit => (phi.sin(), phi.cos()),
                _ => (0., 0.),
            };
            let lam;
            match self.mode {
                Mode::Equit => {
                    phi = if rh.abs() <= EPSLN { 0. } else { (y * sinz / rh).asin() };
                    x *= sinz;
                    y = cosz * rh;
                    lam = if y == 0. && x == 0. { 0. } else { x.atan2(y) };
                }
                Mode::Obliq => {
                    phi = if rh.abs() <= EPSLN {
                        self.lat0
                    } else {
                        (cosz * self.sinph0 + y * sinz * self.cosph0 / rh).asin()
                    };
                    x *= sinz * self.cosph0;
                    y = (cosz - phi.sin() * self.sinph0) * rh;
                    lam = if y == 0. && x == 0. { 0. } else { x.atan2(y) };
                }
                Mode::NPole => {
                    y = -y;
                    phi = FRAC_PI_2 - phi;
                    lam = x.atan2(y);
                }
                Mode::SPole => {
                    phi -= FRAC_PI_2;
                    lam = x.atan2(y);
                }
            }
            p.x = adjust_lon(lam + self.long0);
            p.y = phi;
            return;
        }

        let mut ab;
        match self.mode {
            Mode::Equit | Mode::Obliq => {
                x /= self.dd;
                y *= self.dd;
                let rho = x.hypot(y);
                if rho < EPSLN {
                    p.x = self.long0;
                    p.y = self.lat0;
                    return;
                }
                let s_ce = 2. * (0.5 * rho / self.rq).asin();
                let c_ce = s_ce.cos();
                x *= s_ce.sin();
                if self.mode == Mode::Obliq {
                    ab = c_ce * self.sinb1 + y * s_ce.sin() * self.cosb1 / rho;
                    y = rho * self.cosb1 * c_ce - y * self.sinb1 * s_ce.sin();
                } else {
                    ab = y * s_ce.sin() / rho;
                    y = rho * c_ce;
                }
            }
            Mode::NPole | Mode::SPole => {
                if self.mode == Mode::NPole {
                    y = -y;
                }
                let q = x * x + y * y;
                if q == 0. {
                    p.x = self.long0;
                    p.y = self.lat0;
                    return;
                }
                ab = 1. - q / self.qp;
                if self.mode == Mode::SPole {
                    ab = -ab;
                }
            }
        }
        let lam = x.atan2(y);
        p.x = adjust_lon(lam + self.long0);
        p.y = authlat(ab.asin(), &self.apa);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projections::testutil::params;
    use crate::proj::ProjDef;

    #[test]
    fn europe_grid_roundtrip() {
        // ETRS89-LAEA style setup
        let proj = new(&params(ProjDef {
            proj: Some("laea".into()),
            ellps: Some("GRS80".into()),
            lat0: Some(52.),
            long0: Some(10.),
            x0: Some(4_321_000.),
            y0: Some(3_210_000.),
            ..Default::default()
        }))
        .unwrap();
        for (lon, lat) in [(10., 52.), (2., 48.8), (25., 60.2), (-8., 39.)] {
            let orig = Point::new(f64::to_radians(lon), f64::to_radians(lat));
            let mut p = orig;
            proj.forward(&mut p);
            proj.inverse(&mut p);
            assert!((p.x - orig.x).abs() < 1e-9, "lon {lon}");
            assert!((p.y - orig.y).abs() < 1e-9, "lat {lat}");
        }
    }

    #[test]
    fn polar_roundtrip() {
        let proj = new(&params(ProjDef {
            proj: Some("laea".into()),
            ellps: Some("WGS84".into()),
            lat0: Some(90.),
            ..Default::default()
        }))
        .unwrap();
        let orig = Point::new(0.7, 1.1);
        let mut p = orig;
        proj.forward(&mut p);
        proj.inverse(&mut p);
        assert!((p.x - orig.x).abs() < 1e-9);
        assert!((p.y - orig.y).abs() < 1e-9);
    }

    #[test]
    fn equatorial_spherical_roundtrip() {
        let proj = new(&params(ProjDef {
            proj: Some("laea".into()),
            a: Some(6_370_997.),
            b: Some(6_370_997.),
            ..Default::default()
        }))
        .unwrap();
        let orig = Point::new(0.3, -0.4);
        let mut p = orig;
        proj.forward(&mut p);
        proj.inverse(&mut p);
        assert!((p.x - orig.x).abs() < 1e-9);
        assert!((p.y - orig.y).abs() < 1e-9);
    }

    #[test]
    fn antipode_is_degraded() {
        let proj = new(&params(ProjDef {
            proj: Some("laea".into()),
            a: Some(6_370_997.),
            b: Some(6_370_997.),
            lat0: Some(40.),
            long0: Some(0.),
            ..Default::default()
        }))
        .unwrap();
        let mut p = Point::new(std::f64::consts::PI, -40.0_f64.to_radians());
        proj.forward(&mut p);
        assert!(p.is_nan());
    }
}
