//! The projection roster. Each projection is a struct holding its derived
//! constants, built once by a fallible constructor from the resolved CRS
//! parameters and dispatched through the [`Projection`] trait.
//!
//! Per-point failure policy: forward/inverse never panic and never return
//! `Err`. A point outside the projection's domain, or an iteration that
//! fails to converge, is reported on the `log` facade and the offending
//! components are set to NaN, so a stream of points keeps flowing.

use crate::proj::Parameters;
use crate::Error;
use crate::Point;

pub mod aea;
pub mod aeqd;
pub mod cass;
pub mod cea;
pub mod eqc;
pub mod eqdc;
pub mod gauss;
pub mod gnom;
pub mod krovak;
pub mod laea;
pub mod lcc;
pub mod longlat;
pub mod merc;
pub mod mill;
pub mod moll;
pub mod nzmg;
pub mod omerc;
pub mod ortho;
pub mod poly;
pub mod sinu;
pub mod somerc;
pub mod stere;
pub mod sterea;
pub mod tmerc;
pub mod utm;
pub mod vandg;

/// Forward maps geodetic (longitude, latitude, radians) to projected
/// (easting, northing, meters); inverse maps back. Both mutate the point
/// in place and leave the height untouched.
pub trait Projection: std::fmt::Debug + Send + Sync {
    fn forward(&self, p: &mut Point);
    fn inverse(&self, p: &mut Point);
}

/// A fallible projection constructor
pub type ProjConstructor = fn(&Parameters) -> Result<Box<dyn Projection>, Error>;

#[rustfmt::skip]
const BUILTIN_PROJECTIONS: [(&str, ProjConstructor); 27] = [
    ("longlat",  longlat::new),
    ("identity", longlat::new),
    ("merc",     merc::new),
    ("tmerc",    tmerc::new),
    ("utm",      utm::new),
    ("lcc",      lcc::new),
    ("aea",      aea::new),
    ("laea",     laea::new),
    ("stere",    stere::new),
    ("sterea",   sterea::new),
    ("omerc",    omerc::new),
    ("somerc",   somerc::new),
    ("krovak",   krovak::new),
    ("cass",     cass::new),
    ("poly",     poly::new),
    ("aeqd",     aeqd::new),
    ("eqdc",     eqdc::new),
    ("eqc",      eqc::new),
    ("equi",     eqc::new),
    ("cea",      cea::new),
    ("mill",     mill::new),
    ("moll",     moll::new),
    ("sinu",     sinu::new),
    ("gnom",     gnom::new),
    ("ortho",    ortho::new),
    ("vandg",    vandg::new),
    ("nzmg",     nzmg::new),
];

/// Build the projection named in the parameter record
pub fn instantiate(params: &Parameters) -> Result<Box<dyn Projection>, Error> {
    let name = params.name.trim();
    for (code, ctor) in BUILTIN_PROJECTIONS {
        if code == name {
            return ctor(params);
        }
    }
    Err(Error::UnknownProjection(name.to_string()))
}

#[cfg(test)]
pub(crate) mod testutil {
    use crate::grid::GridRegistry;
    use crate::proj::{Parameters, ProjDef};

    /// Resolve a definition for projection unit tests
    pub fn params(def: ProjDef) -> Parameters {
        Parameters::resolve(def, &GridRegistry::new()).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proj::ProjDef;

    #[test]
    fn roster_dispatch() {
        let p = testutil::params(ProjDef {
            proj: Some("mill".into()),
            ellps: Some("WGS84".into()),
            ..Default::default()
        });
        assert!(instantiate(&p).is_ok());

        let p = testutil::params(ProjDef {
            proj: Some("winkel".into()),
            ..Default::default()
        });
        assert!(matches!(
            instantiate(&p),
            Err(Error::UnknownProjection(_))
        ));
    }
}
