//! CRS resolution: from a raw parameter record to a finalized, immutable
//! [`Proj`] with its ellipsoid, datum and bound projection.

use crate::axis::parse_axis;
use crate::datum::{named_datum, prime_meridian, Datum};
use crate::ellps::Ellipsoid;
use crate::grid::GridRegistry;
use crate::projections;
use crate::projections::Projection;
use crate::Error;
use crate::Point;

/// A resolved CRS parameter record, as a definition-string parser would
/// hand it over. Angles are in degrees, shift parameters in their written
/// units (meters, arc seconds, ppm). Construct with struct update syntax:
///
/// ```
/// # use reproj::ProjDef;
/// let def = ProjDef {
///     proj: Some("lcc".into()),
///     lat1: Some(33.),
///     lat2: Some(45.),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProjDef {
    pub proj: Option<String>,
    pub a: Option<f64>,
    pub b: Option<f64>,
    pub rf: Option<f64>,
    pub es: Option<f64>,
    pub ellps: Option<String>,
    /// Authalic sphere approximation flag
    pub r_a: bool,
    pub datum: Option<String>,
    pub towgs84: Option<Vec<f64>>,
    pub nadgrids: Option<String>,
    pub x0: Option<f64>,
    pub y0: Option<f64>,
    pub k0: Option<f64>,
    pub lat0: Option<f64>,
    pub lat1: Option<f64>,
    pub lat2: Option<f64>,
    pub lat_ts: Option<f64>,
    pub long0: Option<f64>,
    pub long1: Option<f64>,
    pub long2: Option<f64>,
    pub longc: Option<f64>,
    pub alpha: Option<f64>,
    pub zone: Option<i32>,
    pub south: bool,
    pub units: Option<String>,
    pub to_meter: Option<f64>,
    /// Prime meridian offset in degrees east of Greenwich
    pub from_greenwich: Option<f64>,
    /// Named prime meridian; `from_greenwich` wins if both are given
    pub pm: Option<String>,
    pub axis: Option<String>,
    pub czech: bool,
    pub no_off: bool,
    pub no_rot: bool,
}

impl ProjDef {
    /// A geographic (longitude/latitude) definition on a named datum
    #[must_use]
    pub fn geographic(datum: &str) -> ProjDef {
        ProjDef {
            proj: Some("longlat".to_string()),
            datum: Some(datum.to_string()),
            units: Some("degrees".to_string()),
            ..Default::default()
        }
    }
}

/// The resolved constants of a CRS: what projection constructors and the
/// transform pipeline actually read. Angles in radians, defaults applied.
#[derive(Debug, Clone)]
pub struct Parameters {
    pub name: String,
    pub ellps: Ellipsoid,
    pub datum: Datum,
    pub datum_code: Option<String>,
    pub x0: f64,
    pub y0: f64,
    pub k0: f64,
    pub lat0: f64,
    pub long0: f64,
    pub lat1: Option<f64>,
    pub lat2: Option<f64>,
    pub lat_ts: Option<f64>,
    pub long1: Option<f64>,
    pub long2: Option<f64>,
    pub longc: Option<f64>,
    pub alpha: Option<f64>,
    pub zone: Option<i32>,
    pub utm_south: bool,
    pub units: Option<String>,
    pub to_meter: Option<f64>,
    pub from_greenwich: f64,
    pub axis: [u8; 3],
    pub czech: bool,
    pub no_off: bool,
    pub no_rot: bool,
}

impl Parameters {
    // The ellipsoid constants are needed constantly; forward them
    pub fn a(&self) -> f64 {
        self.ellps.a
    }
    pub fn b(&self) -> f64 {
        self.ellps.b
    }
    pub fn e(&self) -> f64 {
        self.ellps.e
    }
    pub fn es(&self) -> f64 {
        self.ellps.es
    }
    pub fn ep2(&self) -> f64 {
        self.ellps.ep2
    }
    pub fn sphere(&self) -> bool {
        self.ellps.sphere
    }

    /// Resolve a raw record: named datum substitution, ellipsoid
    /// derivation, grid lookup, shift parameter normalization, angular
    /// conversion and defaults.
    pub fn resolve(def: ProjDef, grids: &GridRegistry) -> Result<Parameters, Error> {
        let Some(name) = def.proj.clone() else {
            return Err(Error::General("no projection name in definition"));
        };

        // A named datum contributes shift parameters and the reference
        // ellipsoid; explicit fields in the record win.
        let mut towgs84 = def.towgs84.clone();
        let mut nadgrids = def.nadgrids.clone();
        let mut ellps_name = def.ellps.clone();
        if let Some(code) = def.datum.as_deref() {
            if code != "none" {
                if let Some(dd) = named_datum(code) {
                    if towgs84.is_none() && !dd.towgs84.is_empty() {
                        towgs84 = Some(dd.towgs84.to_vec());
                    }
                    if nadgrids.is_none() && !dd.nadgrids.is_empty() {
                        nadgrids = Some(dd.nadgrids.to_string());
                    }
                    ellps_name = Some(dd.ellps.to_string());
                }
            }
        }

        let ellps = Ellipsoid::resolve(
            def.a,
            def.b,
            def.rf,
            def.es,
            ellps_name.as_deref(),
            def.r_a,
        )?;

        let grid_refs = match nadgrids.as_deref() {
            Some(spec) => grids.resolve(spec),
            None => Vec::new(),
        };
        let datum = Datum::new(
            def.datum.as_deref(),
            towgs84.as_deref(),
            grid_refs,
            nadgrids.clone(),
            &ellps,
        );

        let from_greenwich = match (def.from_greenwich, def.pm.as_deref()) {
            (Some(deg), _) => deg.to_radians(),
            (None, Some(pm)) => prime_meridian(pm)
                .ok_or_else(|| Error::BadParam("pm".to_string(), pm.to_string()))?
                .to_radians(),
            (None, None) => 0.,
        };

        let axis = parse_axis(def.axis.as_deref().unwrap_or("enu"))?;

        Ok(Parameters {
            name,
            ellps,
            datum,
            datum_code: def.datum,
            x0: def.x0.unwrap_or(0.),
            y0: def.y0.unwrap_or(0.),
            k0: def.k0.unwrap_or(1.),
            lat0: def.lat0.unwrap_or(0.).to_radians(),
            long0: def.long0.unwrap_or(0.).to_radians(),
            lat1: def.lat1.map(f64::to_radians),
            lat2: def.lat2.map(f64::to_radians),
            lat_ts: def.lat_ts.map(f64::to_radians),
            long1: def.long1.map(f64::to_radians),
            long2: def.long2.map(f64::to_radians),
            longc: def.longc.map(f64::to_radians),
            alpha: def.alpha.map(f64::to_radians),
            zone: def.zone,
            utm_south: def.south,
            units: def.units,
            to_meter: def.to_meter,
            from_greenwich,
            axis,
            czech: def.czech,
            no_off: def.no_off,
            no_rot: def.no_rot,
        })
    }
}

/// A finalized coordinate reference system. Construction resolves the
/// parameter record and binds the projection; a failed projection setup
/// means no `Proj` value exists, so forward/inverse cannot be reached in
/// a bad state. Immutable afterwards, and safe to share between threads.
#[derive(Debug)]
pub struct Proj {
    pub params: Parameters,
    projection: Box<dyn Projection>,
}

impl Proj {
    pub fn try_new(def: ProjDef, grids: &GridRegistry) -> Result<Proj, Error> {
        let params = Parameters::resolve(def, grids)?;
        let projection = projections::instantiate(&params)?;
        Ok(Proj { params, projection })
    }

    /// Geodetic (radians) to projected, in place
    pub fn forward(&self, p: &mut Point) {
        self.projection.forward(p);
    }

    /// Projected to geodetic (radians), in place
    pub fn inverse(&self, p: &mut Point) {
        self.projection.inverse(p);
    }

    /// True for longitude/latitude CRSs, where the pipeline only needs a
    /// degree/radian scaling instead of a projection
    #[must_use]
    pub fn is_geographic(&self) -> bool {
        matches!(self.params.name.as_str(), "longlat" | "identity")
    }
}
