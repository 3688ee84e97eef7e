//! Geographic "projection": the identity. The degree/radian scaling for
//! geographic CRSs happens in the transform pipeline, not here.

use super::Projection;
use crate::proj::Parameters;
use crate::Error;
use crate::Point;

#[derive(Debug)]
pub struct LongLat;

pub fn new(_: &Parameters) -> Result<Box<dyn Projection>, Error> {
    Ok(Box::new(LongLat))
}

impl Projection for LongLat {
    fn forward(&self, _: &mut Point) {}
    fn inverse(&self, _: &mut Point) {}
}
