//! Universal Transverse Mercator: a zone number and hemisphere flag
//! expanded into a Transverse Mercator with the standard origin.

use super::tmerc::Tmerc;
use super::Projection;
use crate::proj::Parameters;
use crate::Error;

pub fn new(p: &Parameters) -> Result<Box<dyn Projection>, Error> {
    let Some(zone) = p.zone else {
        return Err(Error::General("utm: zone must be specified"));
    };
    if !(1..=60).contains(&zone) {
        return Err(Error::BadParam("zone".to_string(), zone.to_string()));
    }

    let long0 = f64::from(6 * zone - 183).to_radians();
    let y0 = if p.utm_south { 10_000_000. } else { 0. };
    Ok(Box::new(Tmerc::from_params(p).with_origin(0., long0, 500_000., y0, 0.9996)))
}
