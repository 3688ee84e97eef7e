//! *Coordinate transformations between map projections and geodetic datums*.
//!
//! The pipeline is the classical one: normalize axes, invert the source
//! projection to geodetic coordinates, shift datums (3/7 parameter or grid
//! based, through a geocentric detour when the ellipsoids differ), then run
//! the destination projection forward and denormalize.
//!
//! A coordinate reference system is a [`Proj`], built once from a resolved
//! parameter record ([`ProjDef`]) and a caller-owned [`GridRegistry`], and
//! reused for any number of [`transform`] calls. Points are plain
//! [`Point`] values, mutated in place.
//!
//! ```
//! use reproj::{GridRegistry, Point, Proj, ProjDef};
//!
//! let grids = GridRegistry::new();
//! let wgs84 = Proj::try_new(ProjDef::geographic("WGS84"), &grids)?;
//! let utm32 = Proj::try_new(
//!     ProjDef {
//!         proj: Some("utm".into()),
//!         zone: Some(32),
//!         ellps: Some("GRS80".into()),
//!         ..Default::default()
//!     },
//!     &grids,
//! )?;
//!
//! // Degrees in, meters out
//! let mut p = Point::new(12.0, 55.0);
//! reproj::transform(&wgs84, &utm32, &mut p)?;
//! # Ok::<(), reproj::Error>(())
//! ```

pub mod axis;
pub mod datum;
pub mod ellps;
pub mod geocent;
pub mod grid;
pub mod math;
pub mod proj;
pub mod projections;
pub mod transform;

pub use crate::datum::Datum;
pub use crate::datum::DatumType;
pub use crate::ellps::Ellipsoid;
pub use crate::grid::Grid;
pub use crate::grid::GridRef;
pub use crate::grid::GridRegistry;
pub use crate::proj::Proj;
pub use crate::proj::ProjDef;
pub use crate::projections::Projection;
pub use crate::transform::datum_transform;
pub use crate::transform::transform;

use thiserror::Error;

/// The catalogue of failure modes. Configuration problems surface as `Err`
/// values from constructors; per-point domain and convergence problems are
/// reported on the `log` facade and leave NaN sentinels in the point instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("General error: '{0}'")]
    General(&'static str),

    #[error("Invalid value for {0}: {1}")]
    BadParam(String, String),

    #[error("Unknown projection '{0}'")]
    UnknownProjection(String),

    #[error("Unknown ellipsoid '{0}'")]
    UnknownEllipsoid(String),

    #[error("Malformed axis specification '{0}'")]
    BadAxis(String),

    #[error("Unable to find grid '{0}'")]
    MissingGrid(String),

    #[error("No grid shift table covers ({0}, {1})")]
    GridCoverage(f64, f64),

    #[error("Latitude out of range: {0}")]
    LatitudeOutOfRange(f64),
}

/// A 2- or 3-component coordinate. The interpretation of the components
/// depends on the pipeline stage: (longitude, latitude, height) on the
/// geodetic side, (easting, northing, height) on the projected side.
/// The height is lazily optional; stages that do not touch it leave its
/// presence unchanged.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

impl Point {
    /// A 2D point
    #[must_use]
    pub fn new(x: f64, y: f64) -> Point {
        Point { x, y, z: None }
    }

    /// A 3D point
    #[must_use]
    pub fn xyz(x: f64, y: f64, z: f64) -> Point {
        Point { x, y, z: Some(z) }
    }

    /// The sentinel value written by per-point failures
    #[must_use]
    pub fn nan() -> Point {
        Point::new(f64::NAN, f64::NAN)
    }

    /// True if any present component is NaN. Callers of the pipeline must
    /// check this after a transform: domain errors do not return `Err`.
    #[must_use]
    pub fn is_nan(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.map_or(false, f64::is_nan)
    }

    /// Height if present, otherwise zero
    #[must_use]
    pub fn h(&self) -> f64 {
        self.z.unwrap_or(0.)
    }

    /// 2D euclidean distance to `other`
    #[must_use]
    pub fn hypot2(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Preamble for projection authors: everything needed to add another
/// projection family by the same pattern as the built-in ones.
pub mod authoring {
    pub use crate::axis::*;
    pub use crate::datum::*;
    pub use crate::ellps::*;
    pub use crate::geocent::*;
    pub use crate::grid::*;
    pub use crate::math::ancillary::*;
    pub use crate::math::series::*;
    pub use crate::math::*;
    pub use crate::proj::*;
    pub use crate::projections::*;
    pub use crate::transform::*;
    pub use crate::Error;
    pub use crate::Point;

    // Externals
    pub use log::error;
    pub use log::trace;
    pub use log::warn;
    pub use std::f64::consts::FRAC_PI_2;
    pub use std::f64::consts::FRAC_PI_4;
    pub use std::f64::consts::PI;
    pub use std::f64::consts::TAU;
}
