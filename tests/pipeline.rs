//! End to end runs through the full transform pipeline: projections,
//! datum shifts, grids, axes and units together.

use float_eq::assert_float_eq;
use reproj::{transform, Grid, GridRegistry, Point, Proj, ProjDef};

fn geographic(datum: &str) -> Proj {
    Proj::try_new(ProjDef::geographic(datum), &GridRegistry::new()).unwrap()
}

fn projected(def: ProjDef) -> Proj {
    Proj::try_new(def, &GridRegistry::new()).unwrap()
}

#[test]
fn utm_degrees_in_meters_out() {
    let wgs84 = geographic("WGS84");
    let utm32 = projected(ProjDef {
        proj: Some("utm".into()),
        zone: Some(32),
        ellps: Some("GRS80".into()),
        datum: Some("WGS84".into()),
        ..Default::default()
    });

    let mut p = Point::new(12.0, 55.0);
    transform(&wgs84, &utm32, &mut p).unwrap();
    assert_float_eq!(p.x, 691_875.6321, abs <= 1e-2);
    assert_float_eq!(p.y, 6_098_907.8256, abs <= 1e-2);

    transform(&utm32, &wgs84, &mut p).unwrap();
    assert_float_eq!(p.x, 12.0, abs <= 1e-9);
    assert_float_eq!(p.y, 55.0, abs <= 1e-9);
}

#[test]
fn web_mercator_roundtrip() {
    let wgs84 = geographic("WGS84");
    // The null grid keeps the WGS84 latitude as-is on the sphere, which
    // is what makes web mercator web mercator
    let webmerc = projected(ProjDef {
        proj: Some("merc".into()),
        a: Some(6_378_137.),
        b: Some(6_378_137.),
        nadgrids: Some("null".into()),
        ..Default::default()
    });

    let mut p = Point::new(12.0, 55.0);
    transform(&wgs84, &webmerc, &mut p).unwrap();
    assert_float_eq!(p.x, 1_335_833.8895, abs <= 1e-2);
    assert_float_eq!(p.y, 7_361_866.1131, abs <= 1e-2);

    transform(&webmerc, &wgs84, &mut p).unwrap();
    assert_float_eq!(p.x, 12.0, abs <= 1e-9);
    assert_float_eq!(p.y, 55.0, abs <= 1e-9);
}

#[test]
fn projected_to_projected() {
    // Both ends on the same datum: no shift, just reproject
    let utm32 = projected(ProjDef {
        proj: Some("utm".into()),
        zone: Some(32),
        ellps: Some("GRS80".into()),
        datum: Some("WGS84".into()),
        ..Default::default()
    });
    let lcc = projected(ProjDef {
        proj: Some("lcc".into()),
        ellps: Some("GRS80".into()),
        datum: Some("WGS84".into()),
        lat1: Some(50.),
        lat2: Some(60.),
        lat0: Some(55.),
        long0: Some(10.),
        ..Default::default()
    });

    let orig = Point::new(691_875.6321, 6_098_907.8256);
    let mut p = orig;
    transform(&utm32, &lcc, &mut p).unwrap();
    transform(&lcc, &utm32, &mut p).unwrap();
    assert_float_eq!(p.x, orig.x, abs <= 1e-2);
    assert_float_eq!(p.y, orig.y, abs <= 1e-2);
}

#[test]
fn helmert_datum_shift_between_projected_systems() {
    // British National Grid vs WGS84 geographic: 7 parameter shift plus
    // a Transverse Mercator on Airy 1830
    let wgs84 = geographic("WGS84");
    let bng = projected(ProjDef {
        proj: Some("tmerc".into()),
        datum: Some("OSGB36".into()),
        lat0: Some(49.),
        long0: Some(-2.),
        k0: Some(0.9996012717),
        x0: Some(400_000.),
        y0: Some(-100_000.),
        ..Default::default()
    });

    let orig = Point::xyz(-2.0, 53.0, 0.);
    let mut p = orig;
    transform(&wgs84, &bng, &mut p).unwrap();
    // Near the central meridian at 53 N: easting close to the false
    // easting, northing in the 400 km band
    assert_float_eq!(p.x, 400_000., abs <= 200.);
    assert!(p.y > 340_000. && p.y < 460_000.);

    transform(&bng, &wgs84, &mut p).unwrap();
    assert_float_eq!(p.x, orig.x, abs <= 1e-8);
    assert_float_eq!(p.y, orig.y, abs <= 1e-8);
}

#[test]
fn grid_shift_applies_and_inverts() {
    // A synthetic table over roughly [0, 11.4] degrees in each axis with
    // a constant (1e-5, 2e-5) radian shift, west positive longitude
    let mut grids = GridRegistry::new();
    grids.insert(
        "local",
        Grid {
            ll: [0., 0.],
            del: [0.1, 0.1],
            lim: [3, 3],
            cvs: vec![[1e-5, 2e-5]; 9],
        },
    );

    let shifted = Proj::try_new(
        ProjDef {
            proj: Some("longlat".into()),
            ellps: Some("WGS84".into()),
            nadgrids: Some("local".into()),
            ..Default::default()
        },
        &grids,
    )
    .unwrap();
    let wgs84 = geographic("WGS84");

    let mut p = Point::new(5.0, 3.0);
    transform(&shifted, &wgs84, &mut p).unwrap();
    assert_float_eq!(p.x, 5.0 - 1e-5_f64.to_degrees(), abs <= 1e-7);
    assert_float_eq!(p.y, 3.0 + 2e-5_f64.to_degrees(), abs <= 1e-7);

    transform(&wgs84, &shifted, &mut p).unwrap();
    assert_float_eq!(p.x, 5.0, abs <= 1e-7);
    assert_float_eq!(p.y, 3.0, abs <= 1e-7);
}

#[test]
fn grid_shift_outside_mandatory_coverage_is_an_error() {
    let mut grids = GridRegistry::new();
    grids.insert(
        "local",
        Grid {
            ll: [0., 0.],
            del: [0.1, 0.1],
            lim: [3, 3],
            cvs: vec![[1e-5, 2e-5]; 9],
        },
    );
    let shifted = Proj::try_new(
        ProjDef {
            proj: Some("longlat".into()),
            ellps: Some("WGS84".into()),
            nadgrids: Some("local".into()),
            ..Default::default()
        },
        &grids,
    )
    .unwrap();
    let wgs84 = geographic("WGS84");

    let mut p = Point::new(100.0, 40.0);
    assert!(transform(&shifted, &wgs84, &mut p).is_err());
}

#[test]
fn axis_order_is_normalized() {
    let grids = GridRegistry::new();
    let latlon = Proj::try_new(
        ProjDef {
            axis: Some("neu".into()),
            ..ProjDef::geographic("WGS84")
        },
        &grids,
    )
    .unwrap();
    let lonlat = geographic("WGS84");

    // Input in latitude, longitude order
    let mut p = Point::new(55.0, 12.0);
    transform(&latlon, &lonlat, &mut p).unwrap();
    assert_float_eq!(p.x, 12.0, abs <= 1e-12);
    assert_float_eq!(p.y, 55.0, abs <= 1e-12);

    // And back again
    transform(&lonlat, &latlon, &mut p).unwrap();
    assert_float_eq!(p.x, 55.0, abs <= 1e-12);
    assert_float_eq!(p.y, 12.0, abs <= 1e-12);
}

#[test]
fn to_meter_scales_projected_output() {
    let wgs84 = geographic("WGS84");
    let us_ft = 0.304_800_609_601_219_2;
    let feet = projected(ProjDef {
        proj: Some("merc".into()),
        a: Some(6_378_137.),
        b: Some(6_378_137.),
        datum: Some("WGS84".into()),
        to_meter: Some(us_ft),
        ..Default::default()
    });
    let meters = projected(ProjDef {
        proj: Some("merc".into()),
        a: Some(6_378_137.),
        b: Some(6_378_137.),
        datum: Some("WGS84".into()),
        ..Default::default()
    });

    let mut in_ft = Point::new(12.0, 55.0);
    let mut in_m = in_ft;
    transform(&wgs84, &feet, &mut in_ft).unwrap();
    transform(&wgs84, &meters, &mut in_m).unwrap();
    assert_float_eq!(in_ft.x * us_ft, in_m.x, abs <= 1e-6);
    assert_float_eq!(in_ft.y * us_ft, in_m.y, abs <= 1e-6);
}

#[test]
fn degraded_points_flow_through_as_nan() {
    // The far hemisphere of an orthographic view has no image; the
    // pipeline reports NaN rather than failing the whole stream
    let wgs84 = geographic("WGS84");
    let ortho = projected(ProjDef {
        proj: Some("ortho".into()),
        a: Some(6_370_997.),
        b: Some(6_370_997.),
        datum: Some("WGS84".into()),
        lat0: Some(40.),
        long0: Some(-100.),
        ..Default::default()
    });

    let mut p = Point::new(80.0, -40.0);
    transform(&wgs84, &ortho, &mut p).unwrap();
    assert!(p.is_nan());

    // And an inverse starting from a NaN sentinel stays a sentinel
    transform(&ortho, &wgs84, &mut p).unwrap();
    assert!(p.is_nan());
}

#[test]
fn configuration_errors_are_loud() {
    let grids = GridRegistry::new();

    let unknown = Proj::try_new(
        ProjDef {
            proj: Some("imaginary".into()),
            ..Default::default()
        },
        &grids,
    );
    assert!(unknown.is_err());

    let missing_zone = Proj::try_new(
        ProjDef {
            proj: Some("utm".into()),
            ellps: Some("GRS80".into()),
            ..Default::default()
        },
        &grids,
    );
    assert!(missing_zone.is_err());
}

#[test]
fn heights_survive_the_pipeline() {
    let wgs84 = geographic("WGS84");
    let utm32 = projected(ProjDef {
        proj: Some("utm".into()),
        zone: Some(32),
        ellps: Some("GRS80".into()),
        datum: Some("WGS84".into()),
        ..Default::default()
    });

    let mut p = Point::xyz(12.0, 55.0, 123.456);
    transform(&wgs84, &utm32, &mut p).unwrap();
    transform(&utm32, &wgs84, &mut p).unwrap();
    assert_float_eq!(p.h(), 123.456, abs <= 1e-6);
}
