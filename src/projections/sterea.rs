//! Oblique Stereographic Alternative (double stereographic): a Gauss
//! conformal sphere step followed by a stereographic step on that
//! sphere. The Dutch RD grid is the classic use.

use super::gauss::Gauss;
use super::Projection;
use crate::math::adjust_lon;
use crate::proj::Parameters;
use crate::Error;
use crate::Point;

#[derive(Debug)]
pub struct Sterea {
    a: f64,
    k0: f64,
    x0: f64,
    y0: f64,
    long0: f64,
    gauss: Gauss,
    sinc0: f64,
    cosc0: f64,
    r2: f64,
}

pub fn new(p: &Parameters) -> Result<Box<dyn Projection>, Error> {
    let gauss = Gauss::new(p.lat0, p.e(), p.es());
    let sinc0 = gauss.phic0.sin();
    let cosc0 = gauss.phic0.cos();
    let r2 = 2. * gauss.rc;
    Ok(Box::new(Sterea {
        a: p.a(),
        k0: p.k0,
        x0: p.x0,
        y0: p.y0,
        long0: p.long0,
        gauss,
        sinc0,
        cosc0,
        r2,
    }))
}

impl Projection for Sterea {
    // ----- F O R W A R D -----------------------------------------------
    fn forward(&self, p: &mut Point) {
        p.x = adjust_lon(p.x - self.long0);
        self.gauss.forward(p);
        if p.is_nan() {
            return;
        }
        let sinc = p.y.sin();
        let cosc = p.y.cos();
        let cosl = p.x.cos();
        let k = self.k0 * self.r2 / (1. + self.sinc0 * sinc + self.cosc0 * cosc * cosl);
        p.x = k * cosc * p.x.sin();
        p.y = k * (self.cosc0 * sinc - self.sinc0 * cosc * cosl);
        p.x = self.a * p.x + self.x0;
        p.y = self.a * p.y + self.y0;
    }

    // ----- I N V E R S E -----------------------------------------------
    fn inverse(&self, p: &mut Point) {
        let x = (p.x - self.x0) / self.a / self.k0;
        let y = (p.y - self.y0) / self.a / self.k0;
        let rho = x.hypot(y);
        if rho != 0. {
            let c = 2. * rho.atan2(self.r2);
            let sinc = c.sin();
            let cosc = c.cos();
            p.y = (cosc * self.sinc0 + y * sinc * self.cosc0 / rho).asin();
            p.x = (x * sinc).atan2(rho * self.cosc0 * cosc - y * self.sinc0 * sinc);
        } else {
            p.y = self.gauss.phic0;
            p.x = 0.;
        }
        self.gauss.inverse(p);
        if p.is_nan() {
            return;
        }
        p.x = adjust_lon(p.x + self.long0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projections::testutil::params;
    use crate::proj::ProjDef;

    fn rd() -> Box<dyn Projection> {
        // Dutch RD / Amersfoort
        new(&params(ProjDef {
            proj: Some("sterea".into()),
            ellps: Some("bessel".into()),
            lat0: Some(52.156_160_555_555_55),
            long0: Some(5.387_638_888_888_89),
            k0: Some(0.9999079),
            x0: Some(155_000.),
            y0: Some(463_000.),
            ..Default::default()
        }))
        .unwrap()
    }

    #[test]
    fn origin_is_the_false_origin() {
        let proj = rd();
        let mut p = Point::new(
            5.387_638_888_888_89_f64.to_radians(),
            52.156_160_555_555_55_f64.to_radians(),
        );
        proj.forward(&mut p);
        assert!((p.x - 155_000.).abs() < 1e-6);
        assert!((p.y - 463_000.).abs() < 1e-6);
    }

    #[test]
    fn rd_roundtrip() {
        let proj = rd();
        for (lon, lat) in [(4.9, 52.37), (6.57, 53.22), (5.12, 52.09), (3.61, 51.5)] {
            let orig = Point::new(f64::to_radians(lon), f64::to_radians(lat));
            let mut p = orig;
            proj.forward(&mut p);
            proj.inverse(&mut p);
            assert!((p.x - orig.x).abs() < 1e-10, "lon {lon}");
            assert!((p.y - orig.y).abs() < 1e-10, "lat {lat}");
        }
    }
}
