//! Equidistant Cylindrical (Plate Carree when lat_ts is zero).

use super::Projection;
use crate::math::{adjust_lat, adjust_lon};
use crate::proj::Parameters;
use crate::Error;
use crate::Point;

#[derive(Debug)]
pub struct Eqc {
    a: f64,
    x0: f64,
    y0: f64,
    lat0: f64,
    long0: f64,
    rc: f64,
}

pub fn new(p: &Parameters) -> Result<Box<dyn Projection>, Error> {
    Ok(Box::new(Eqc {
        a: p.a(),
        x0: p.x0,
        y0: p.y0,
        lat0: p.lat0,
        long0: p.long0,
        rc: p.lat_ts.unwrap_or(0.).cos(),
    }))
}

impl Projection for Eqc {
    // ----- F O R W A R D -----------------------------------------------
    fn forward(&self, p: &mut Point) {
        let dlon = adjust_lon(p.x - self.long0);
        let dlat = adjust_lat(p.y - self.lat0);
        p.x = self.x0 + self.a * dlon * self.rc;
        p.y = self.y0 + self.a * dlat;
    }

    // ----- I N V E R S E -----------------------------------------------
    fn inverse(&self, p: &mut Point) {
        let x = p.x - self.x0;
        let y = p.y - self.y0;
        p.x = adjust_lon(self.long0 + x / (self.a * self.rc));
        p.y = adjust_lat(self.lat0 + y / self.a);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projections::testutil::params;
    use crate::proj::ProjDef;

    #[test]
    fn plate_carree_is_linear() {
        let proj = new(&params(ProjDef {
            proj: Some("eqc".into()),
            ellps: Some("WGS84".into()),
            ..Default::default()
        }))
        .unwrap();
        let mut p = Point::new(0.5, 0.25);
        proj.forward(&mut p);
        assert!((p.x - 6_378_137. * 0.5).abs() < 1e-6);
        assert!((p.y - 6_378_137. * 0.25).abs() < 1e-6);
        proj.inverse(&mut p);
        assert!((p.x - 0.5).abs() < 1e-12);
        assert!((p.y - 0.25).abs() < 1e-12);
    }

    #[test]
    fn standard_parallel_shrinks_the_x_axis() {
        let proj = new(&params(ProjDef {
            proj: Some("eqc".into()),
            ellps: Some("WGS84".into()),
            lat_ts: Some(60.),
            ..Default::default()
        }))
        .unwrap();
        let mut p = Point::new(1., 0.);
        proj.forward(&mut p);
        assert!((p.x - 6_378_137. * 60.0_f64.to_radians().cos()).abs() < 1e-6);
    }
}
