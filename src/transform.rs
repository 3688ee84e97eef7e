//! The transform pipeline: axis normalization, inverse projection, datum
//! shift, forward projection, denormalization. CRS values stay immutable
//! throughout; anything the datum step needs to vary (the WGS84 ellipsoid
//! substitution for grid shifted datums) lives in locals.

use crate::axis::adjust_axis;
use crate::datum::{Datum, DatumType};
use crate::geocent::{
    geocentric_from_wgs84, geocentric_to_geodetic, geocentric_to_wgs84, geodetic_to_geocentric,
};
use crate::grid::{apply_gridshift, GridRegistry};
use crate::proj::{Proj, ProjDef};
use crate::Error;
use crate::Point;
use once_cell::sync::Lazy;

// Grid shift tables are corrections onto WGS84, whatever the datum's own
// ellipsoid says
const SRS_WGS84_SEMIMAJOR: f64 = 6_378_137.0;
const SRS_WGS84_ESQUARED: f64 = 0.006_694_379_990_141_316;

// The hub CRS for transformations where neither end is WGS84
static WGS84: Lazy<Proj> = Lazy::new(|| {
    Proj::try_new(ProjDef::geographic("WGS84"), &GridRegistry::new())
        .expect("the built-in WGS84 definition resolves")
});

fn helmert_shifted(p: &Proj) -> bool {
    matches!(
        p.params.datum.datum_type,
        DatumType::ThreeParam | DatumType::SevenParam
    )
}

/// Transform a point from `source` to `dest`, in place. Geographic CRSs
/// speak degrees on the outside; projected CRSs speak their own units
/// (meters unless `to_meter` says otherwise).
///
/// Configuration and grid availability problems return `Err`. Per-point
/// domain failures inside a projection do not: they leave NaN components
/// in the point, so streams of points keep flowing. Check [`Point::is_nan`]
/// on results.
pub fn transform(source: &Proj, dest: &Proj, p: &mut Point) -> Result<(), Error> {
    // Parameter shifts are relative to WGS84, so when either end carries
    // one and the other end is some third datum, route through WGS84.
    let source_shifted = helmert_shifted(source) && dest.params.datum_code.as_deref() != Some("WGS84");
    let dest_shifted = helmert_shifted(dest) && source.params.datum_code.as_deref() != Some("WGS84");
    if source_shifted || dest_shifted {
        transform_step(source, &WGS84, p)?;
        return transform_step(&WGS84, dest, p);
    }
    transform_step(source, dest, p)
}

fn transform_step(source: &Proj, dest: &Proj, p: &mut Point) -> Result<(), Error> {
    if source.params.axis != *b"enu" {
        adjust_axis(&source.params.axis, false, p)?;
    }

    if source.is_geographic() {
        p.x = p.x.to_radians();
        p.y = p.y.to_radians();
    } else {
        if let Some(to_meter) = source.params.to_meter {
            p.x *= to_meter;
            p.y *= to_meter;
        }
        source.inverse(p);
        if p.is_nan() {
            // Degraded output from the projection; pass the sentinel on
            return Ok(());
        }
    }

    if source.params.from_greenwich != 0. {
        p.x += source.params.from_greenwich;
    }

    datum_transform(&source.params.datum, &dest.params.datum, p)?;

    if dest.params.from_greenwich != 0. {
        p.x -= dest.params.from_greenwich;
    }

    if dest.is_geographic() {
        p.x = p.x.to_degrees();
        p.y = p.y.to_degrees();
    } else {
        dest.forward(p);
        if let Some(to_meter) = dest.params.to_meter {
            p.x /= to_meter;
            p.y /= to_meter;
        }
    }

    if dest.params.axis != *b"enu" {
        adjust_axis(&dest.params.axis, true, p)?;
    }
    Ok(())
}

/// Shift a geodetic point (radians) between two datums. Identical datums
/// and `datum=none` short-circuit. Grid shifted datums apply their tables
/// on the WGS84 side of the geocentric detour; the detour itself runs
/// whenever the ellipsoids differ or either end has parameter shifts.
pub fn datum_transform(source: &Datum, dest: &Datum, p: &mut Point) -> Result<(), Error> {
    if source.compare(dest) {
        return Ok(());
    }
    if source.datum_type == DatumType::NoDatum || dest.datum_type == DatumType::NoDatum {
        return Ok(());
    }

    // Local ellipsoid constants, so the substitution never leaks into the
    // datum values themselves
    let mut src_kind = source.datum_type;
    let (src_a, src_es) = if src_kind == DatumType::GridShift {
        match apply_gridshift(source, false, p) {
            Ok(()) => (SRS_WGS84_SEMIMAJOR, SRS_WGS84_ESQUARED),
            Err(err) => match &source.params {
                // No table serves the point, but the datum also carries
                // shift parameters: fall back to the parameter shift
                Some(params) => {
                    log::warn!("grid shift failed ({err}), using the parameter shift");
                    src_kind = if params.len() >= 7
                        && (params[3] != 0. || params[4] != 0. || params[5] != 0. || params[6] != 0.)
                    {
                        DatumType::SevenParam
                    } else {
                        DatumType::ThreeParam
                    };
                    (source.a, source.es)
                }
                None => return Err(err),
            },
        }
    } else {
        (source.a, source.es)
    };
    let (dst_a, dst_es) = if dest.datum_type == DatumType::GridShift {
        (SRS_WGS84_SEMIMAJOR, SRS_WGS84_ESQUARED)
    } else {
        (dest.a, dest.es)
    };

    let src_params = matches!(src_kind, DatumType::ThreeParam | DatumType::SevenParam);
    let dst_params = matches!(
        dest.datum_type,
        DatumType::ThreeParam | DatumType::SevenParam
    );

    if src_es != dst_es || src_a != dst_a || src_params || dst_params {
        geodetic_to_geocentric(p, src_a, src_es)?;
        if src_params {
            if let Some(params) = &source.params {
                geocentric_to_wgs84(p, src_kind, params);
            }
        }
        if dst_params {
            if let Some(params) = &dest.params {
                geocentric_from_wgs84(p, dest.datum_type, params);
            }
        }
        let dst_b = dst_a * (1. - dst_es).sqrt();
        geocentric_to_geodetic(p, dst_a, dst_b, dst_es);
    }

    if dest.datum_type == DatumType::GridShift {
        apply_gridshift(dest, true, p)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geographic(datum: &str) -> Proj {
        Proj::try_new(ProjDef::geographic(datum), &GridRegistry::new()).unwrap()
    }

    #[test]
    fn identity_roundtrip() -> Result<(), Error> {
        let wgs84 = geographic("WGS84");
        let mut p = Point::new(12.0, 55.0);
        transform(&wgs84, &wgs84, &mut p)?;
        // The degree/radian/degree excursion may cost an ulp
        assert!((p.x - 12.0).abs() < 1e-12);
        assert!((p.y - 55.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn wgs84_and_nad83_are_equivalent() -> Result<(), Error> {
        // Zero shifts and near-identical ellipsoids short-circuit
        let wgs84 = geographic("WGS84");
        let nad83 = geographic("NAD83");
        let mut p = Point::new(-100.0, 40.0);
        transform(&wgs84, &nad83, &mut p)?;
        assert!((p.x - -100.0).abs() < 1e-12);
        assert!((p.y - 40.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn helmert_shift_roundtrip() -> Result<(), Error> {
        let wgs84 = geographic("WGS84");
        let osgb36 = geographic("OSGB36");

        let mut p = Point::xyz(-2.0, 53.0, 0.);
        transform(&wgs84, &osgb36, &mut p)?;
        // The shift between the frames is on the order of 100 m
        assert!(p.hypot2(&Point::new(-2.0, 53.0)) > 1e-4);
        assert!(p.hypot2(&Point::new(-2.0, 53.0)) < 1e-2);

        transform(&osgb36, &wgs84, &mut p)?;
        assert!((p.x - -2.0).abs() < 1e-9);
        assert!((p.y - 53.0).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn third_datum_routes_through_wgs84() -> Result<(), Error> {
        // potsdam (3 parameter) to OSGB36 (7 parameter): neither end is
        // WGS84, so the pipeline takes the two hop route
        let potsdam = geographic("potsdam");
        let osgb36 = geographic("OSGB36");

        let orig = Point::xyz(7.0, 51.0, 0.);
        let mut p = orig;
        transform(&potsdam, &osgb36, &mut p)?;
        assert!(p.hypot2(&orig) > 1e-4);
        transform(&osgb36, &potsdam, &mut p)?;
        assert!((p.x - orig.x).abs() < 1e-8);
        assert!((p.y - orig.y).abs() < 1e-8);
        Ok(())
    }

    #[test]
    fn prime_meridian_offset() -> Result<(), Error> {
        let grids = GridRegistry::new();
        let paris = Proj::try_new(
            ProjDef {
                pm: Some("paris".into()),
                ..ProjDef::geographic("WGS84")
            },
            &grids,
        )?;
        let greenwich = geographic("WGS84");

        let mut p = Point::new(0.0, 48.0);
        transform(&paris, &greenwich, &mut p)?;
        assert!((p.x - 2.337229166667).abs() < 1e-9);
        assert!((p.y - 48.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn grid_miss_falls_back_to_the_parameter_shift() -> Result<(), Error> {
        // A datum carrying both a grid list and towgs84 parameters uses
        // the parameters when no table serves the point
        let grids = GridRegistry::new();
        let both = Proj::try_new(
            ProjDef {
                proj: Some("longlat".into()),
                ellps: Some("bessel".into()),
                nadgrids: Some("nosuchgrid".into()),
                towgs84: Some(vec![606., 23., 413.]),
                ..Default::default()
            },
            &grids,
        )?;
        let params_only = Proj::try_new(
            ProjDef {
                proj: Some("longlat".into()),
                ellps: Some("bessel".into()),
                towgs84: Some(vec![606., 23., 413.]),
                ..Default::default()
            },
            &grids,
        )?;
        let wgs84 = geographic("WGS84");

        let orig = Point::xyz(13.4, 52.5, 0.);
        let mut p = orig;
        let mut q = orig;
        transform(&both, &wgs84, &mut p)?;
        transform(&params_only, &wgs84, &mut q)?;
        assert!((p.x - q.x).abs() < 1e-12);
        assert!((p.y - q.y).abs() < 1e-12);
        // The ~600 m shift actually applied
        assert!(p.hypot2(&orig) > 1e-4);
        Ok(())
    }

    #[test]
    fn datum_none_skips_the_shift() -> Result<(), Error> {
        let grids = GridRegistry::new();
        let raw = Proj::try_new(
            ProjDef {
                proj: Some("longlat".into()),
                datum: Some("none".into()),
                ellps: Some("airy".into()),
                ..Default::default()
            },
            &grids,
        )?;
        let wgs84 = geographic("WGS84");
        let mut p = Point::new(-2.0, 53.0);
        transform(&raw, &wgs84, &mut p)?;
        assert_eq!(p, Point::new(-2.0, 53.0));
        Ok(())
    }
}
