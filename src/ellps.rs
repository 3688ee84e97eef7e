//! Ellipsoid resolution: from raw axis parameters or a named definition to
//! the derived constants the rest of the engine consumes.

use crate::math::{EPSLN, RA4, RA6, SIXTH};
use crate::Error;

/// An ellipsoid with its derived constants. Immutable once resolved.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semimajor axis, meters
    pub a: f64,
    /// Semiminor axis, meters
    pub b: f64,
    /// First eccentricity squared
    pub es: f64,
    /// First eccentricity
    pub e: f64,
    /// Second eccentricity squared
    pub ep2: f64,
    /// True if the two axes are (close enough to) equal
    pub sphere: bool,
}

// (name, a, rf, b): rf = 0 means the minor axis is given directly
#[rustfmt::skip]
const ELLIPSOIDS: [(&str, f64, f64, f64); 41] = [
    ("MERIT",    6378137.0,   298.257,        0.),
    ("SGS85",    6378136.0,   298.257,        0.),
    ("GRS80",    6378137.0,   298.257222101,  0.),
    ("IAU76",    6378140.0,   298.257,        0.),
    ("airy",     6377563.396, 0.,             6356256.910),
    ("APL4.",    6378137.0,   298.25,         0.),
    ("NWL9D",    6378145.0,   298.25,         0.),
    ("mod_airy", 6377340.189, 0.,             6356034.446),
    ("andrae",   6377104.43,  300.0,          0.),
    ("aust_SA",  6378160.0,   298.25,         0.),
    ("GRS67",    6378160.0,   298.2471674270, 0.),
    ("bessel",   6377397.155, 299.1528128,    0.),
    ("bess_nam", 6377483.865, 299.1528128,    0.),
    ("clrk66",   6378206.4,   0.,             6356583.8),
    ("clrk80",   6378249.145, 293.4663,       0.),
    ("CPM",      6375738.7,   334.29,         0.),
    ("delmbr",   6376428.0,   311.5,          0.),
    ("engelis",  6378136.05,  298.2566,       0.),
    ("evrst30",  6377276.345, 300.8017,       0.),
    ("evrst48",  6377304.063, 300.8017,       0.),
    ("evrst56",  6377301.243, 300.8017,       0.),
    ("evrst69",  6377295.664, 300.8017,       0.),
    ("evrstSS",  6377298.556, 300.8017,       0.),
    ("fschr60",  6378166.0,   298.3,          0.),
    ("fschr60m", 6378155.0,   298.3,          0.),
    ("fschr68",  6378150.0,   298.3,          0.),
    ("helmert",  6378200.0,   298.3,          0.),
    ("hough",    6378270.0,   297.0,          0.),
    ("intl",     6378388.0,   297.0,          0.),
    ("kaula",    6378163.0,   298.24,         0.),
    ("lerch",    6378139.0,   298.257,        0.),
    ("mprts",    6397300.0,   191.0,          0.),
    ("new_intl", 6378157.5,   0.,             6356772.2),
    ("plessis",  6376523.0,   0.,             6355863.0),
    ("krass",    6378245.0,   298.3,          0.),
    ("SEasia",   6378155.0,   0.,             6356773.3205),
    ("walbeck",  6376896.0,   0.,             6355834.8467),
    ("WGS60",    6378165.0,   298.3,          0.),
    ("WGS66",    6378145.0,   298.25,         0.),
    ("WGS72",    6378135.0,   298.26,         0.),
    ("WGS84",    6378137.0,   298.257223563,  0.),
];

impl Ellipsoid {
    /// Resolve an ellipsoid from raw parameters. Explicit axes win over a
    /// named definition; an absent name defaults to WGS84. The `r_a` flag
    /// rescales to the authalic sphere approximation, after which the
    /// eccentricity is zero by construction.
    pub fn resolve(
        a: Option<f64>,
        b: Option<f64>,
        rf: Option<f64>,
        es: Option<f64>,
        ellps: Option<&str>,
        r_a: bool,
    ) -> Result<Ellipsoid, Error> {
        let (mut a, mut b, rf) = match a {
            Some(a) => (a, b.unwrap_or(0.), rf),
            None => {
                let name = ellps.unwrap_or("WGS84");
                if name == "sphere" {
                    (6370997.0, 6370997.0, None)
                } else {
                    let Some(def) = ELLIPSOIDS.iter().find(|d| d.0 == name) else {
                        return Err(Error::UnknownEllipsoid(name.to_string()));
                    };
                    (def.1, def.3, if def.2 != 0. { Some(def.2) } else { None })
                }
            }
        };

        if let Some(rf) = rf {
            if b == 0. {
                b = (1. - 1. / rf) * a;
            }
        }
        let mut sphere = false;
        // A bare semimajor axis, or rf = 0, means a sphere
        if rf == Some(0.) || b == 0. || (a - b).abs() < EPSLN {
            sphere = true;
            b = a;
        }

        let mut a2 = a * a;
        let b2 = b * b;
        let mut esq = es.unwrap_or((a2 - b2) / a2);
        if r_a {
            a *= 1. - esq * (SIXTH + esq * (RA4 + esq * RA6));
            a2 = a * a;
            esq = 0.;
        }

        Ok(Ellipsoid {
            a,
            b,
            es: esq,
            e: esq.sqrt(),
            ep2: (a2 - b2) / b2,
            sphere,
        })
    }

    /// The WGS84 reference ellipsoid
    #[must_use]
    pub fn wgs84() -> Ellipsoid {
        Ellipsoid::resolve(None, None, None, None, Some("WGS84"), false)
            .expect("WGS84 is in the builtin table")
    }
}
