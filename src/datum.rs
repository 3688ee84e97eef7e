//! Datum values: shift parameter normalization, named datum and prime
//! meridian tables, and the equivalence short-circuit used by the
//! transform pipeline.

use crate::ellps::Ellipsoid;
use crate::grid::GridRef;
use crate::math::SEC_TO_RAD;

/// The five datum shift strategies
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DatumType {
    /// WGS84 or equivalent: no shift needed
    #[default]
    Wgs84,
    /// Datum shifts explicitly opted out (`datum=none`)
    NoDatum,
    /// Geocentric translation
    ThreeParam,
    /// Bursa-Wolf: translation, rotation and scale
    SevenParam,
    /// Tabulated shift, bilinearly interpolated
    GridShift,
}

/// A datum, owned by a CRS. Carries copies of the ellipsoid constants
/// needed for the geocentric conversions, so the datum step never has to
/// reach back into the CRS.
#[derive(Debug, Default, Clone)]
pub struct Datum {
    pub datum_type: DatumType,
    pub a: f64,
    pub b: f64,
    pub es: f64,
    pub ep2: f64,
    /// 3 or 7 shift parameters. Rotations in radians, scale as a plain
    /// ratio: the arcsec/ppm conversion happened at construction.
    pub params: Option<Vec<f64>>,
    /// Ordered candidate grids, resolved from the registry
    pub grids: Vec<GridRef>,
    /// The grid list as specified, kept verbatim for datum comparison
    pub nadgrids: Option<String>,
}

impl Datum {
    /// Build a datum from raw shift parameters. `params` is the towgs84
    /// tuple as written: meters, arc seconds, ppm. An all-zero tuple stays
    /// [`DatumType::Wgs84`]; a resolved grid list takes precedence over
    /// parameter shifts.
    #[must_use]
    pub fn new(
        datum_code: Option<&str>,
        params: Option<&[f64]>,
        grids: Vec<GridRef>,
        nadgrids: Option<String>,
        ellps: &Ellipsoid,
    ) -> Datum {
        let mut datum_type = DatumType::Wgs84;
        if datum_code == Some("none") {
            datum_type = DatumType::NoDatum;
        }

        let params = params.map(|raw| {
            let mut p = raw.to_vec();
            if p[0] != 0. || p[1] != 0. || p[2] != 0. {
                datum_type = DatumType::ThreeParam;
            }
            if p.len() >= 7 && (p[3] != 0. || p[4] != 0. || p[5] != 0. || p[6] != 0.) {
                datum_type = DatumType::SevenParam;
                p[3] *= SEC_TO_RAD;
                p[4] *= SEC_TO_RAD;
                p[5] *= SEC_TO_RAD;
                p[6] = p[6] / 1_000_000.0 + 1.0;
            }
            p
        });

        if !grids.is_empty() {
            datum_type = DatumType::GridShift;
        }

        Datum {
            datum_type,
            a: ellps.a,
            b: ellps.b,
            es: ellps.es,
            ep2: ellps.ep2,
            params,
            grids,
            nadgrids,
        }
    }

    /// True iff the two datums are the same definition, so the transform
    /// can be skipped. Exact equality on the parameters, with a small
    /// eccentricity tolerance so GRS80 and WGS84 count as identical. This
    /// is not a geodetic equivalence test.
    #[must_use]
    pub fn compare(&self, dest: &Datum) -> bool {
        if self.datum_type != dest.datum_type {
            return false;
        }
        if self.a != dest.a || (self.es - dest.es).abs() > 5e-11 {
            return false;
        }
        match self.datum_type {
            DatumType::ThreeParam => match (&self.params, &dest.params) {
                (Some(p), Some(q)) => p[..3] == q[..3],
                _ => false,
            },
            DatumType::SevenParam => match (&self.params, &dest.params) {
                (Some(p), Some(q)) => p[..7] == q[..7],
                _ => false,
            },
            DatumType::GridShift => self.nadgrids == dest.nadgrids,
            _ => true,
        }
    }
}

/// A named datum definition: either a towgs84 tuple or a grid list, plus
/// the reference ellipsoid.
#[derive(Debug, Clone, Copy)]
pub struct DatumDef {
    pub name: &'static str,
    pub towgs84: &'static [f64],
    pub nadgrids: &'static str,
    pub ellps: &'static str,
}

#[rustfmt::skip]
pub const DATUMS: [DatumDef; 10] = [
    DatumDef { name: "WGS84",         towgs84: &[0., 0., 0.], nadgrids: "", ellps: "WGS84" },
    DatumDef { name: "GGRS87",        towgs84: &[-199.87, 74.79, 246.62], nadgrids: "", ellps: "GRS80" },
    DatumDef { name: "NAD83",         towgs84: &[0., 0., 0.], nadgrids: "", ellps: "GRS80" },
    DatumDef { name: "NAD27",         towgs84: &[], nadgrids: "@conus,@alaska,@ntv2_0.gsb,@ntv1_can.dat", ellps: "clrk66" },
    DatumDef { name: "potsdam",       towgs84: &[606.0, 23.0, 413.0], nadgrids: "", ellps: "bessel" },
    DatumDef { name: "carthage",      towgs84: &[-263.0, 6.0, 431.0], nadgrids: "", ellps: "clrk80" },
    DatumDef { name: "hermannskogel", towgs84: &[653.0, -212.0, 449.0], nadgrids: "", ellps: "bessel" },
    DatumDef { name: "ire65",         towgs84: &[482.530, -130.596, 564.557, -1.042, -0.214, -0.631, 8.15], nadgrids: "", ellps: "mod_airy" },
    DatumDef { name: "nzgd49",        towgs84: &[59.47, -5.04, 187.44, 0.47, -0.1, 1.024, -4.5993], nadgrids: "", ellps: "intl" },
    DatumDef { name: "OSGB36",        towgs84: &[446.448, -125.157, 542.060, 0.1502, 0.2470, 0.8421, -20.4894], nadgrids: "", ellps: "airy" },
];

/// Look up a named datum definition
#[must_use]
pub fn named_datum(code: &str) -> Option<&'static DatumDef> {
    // spatialreference.org spells OSGB36 without the G
    let code = if code == "OSB36" { "OSGB36" } else { code };
    DATUMS.iter().find(|d| d.name == code)
}

// Named prime meridians, offsets from Greenwich in degrees
#[rustfmt::skip]
const PRIME_MERIDIANS: [(&str, f64); 13] = [
    ("greenwich",   0.0),
    ("lisbon",     -9.131906111111),
    ("paris",       2.337229166667),
    ("bogota",    -74.080916666667),
    ("madrid",     -3.687938888889),
    ("rome",       12.452333333333),
    ("bern",        7.439583333333),
    ("jakarta",   106.807719444444),
    ("ferro",     -17.666666666667),
    ("brussels",    4.367975),
    ("stockholm",  18.058277777778),
    ("athens",     23.7163375),
    ("oslo",       10.722916666667),
];

/// Offset of a named prime meridian, in degrees east of Greenwich
#[must_use]
pub fn prime_meridian(name: &str) -> Option<f64> {
    PRIME_MERIDIANS
        .iter()
        .find(|pm| pm.0 == name)
        .map(|pm| pm.1)
}
