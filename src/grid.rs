//! Grid shift tables and their application: registry lookup, bounding box
//! tests, bilinear interpolation, and the fixed-point inversion of the
//! forward shift. Grid loading and file format decoding happen elsewhere;
//! this module consumes already-loaded tables.

use crate::datum::Datum;
use crate::math::adjust_lon;
use crate::Error;
use crate::Point;
use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::sync::Arc;

/// A loaded correction table. Everything is in radians: the lower-left
/// origin, the cell size, and the (longitude, latitude) shift vectors.
/// Longitude shifts are west positive, NTv2 style. `cvs` is row major,
/// `lim[0]` nodes per latitude row.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    pub ll: [f64; 2],
    pub del: [f64; 2],
    pub lim: [usize; 2],
    pub cvs: Vec<[f64; 2]>,
}

impl Grid {
    /// The identity grid: a 3x3 table of zero shifts covering the world
    #[must_use]
    pub fn null() -> Grid {
        Grid {
            ll: [-3.14159265, -1.57079633],
            del: [3.14159265, 1.57079633],
            lim: [3, 3],
            cvs: vec![[0., 0.]; 9],
        }
    }
}

/// One entry of a datum's ordered grid list. `grid` is `None` when the
/// registry had no table under this name.
#[derive(Debug, Clone)]
pub struct GridRef {
    pub name: String,
    pub mandatory: bool,
    pub grid: Option<Arc<Grid>>,
}

/// A caller-owned table of loaded grids, keyed by name. No global state:
/// the registry is handed to the CRS resolver explicitly. A fresh registry
/// already knows the `null` identity grid.
#[derive(Debug, Clone)]
pub struct GridRegistry {
    table: BTreeMap<String, Arc<Grid>>,
}

impl Default for GridRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GridRegistry {
    #[must_use]
    pub fn new() -> GridRegistry {
        let mut table = BTreeMap::new();
        table.insert("null".to_string(), Arc::new(Grid::null()));
        GridRegistry { table }
    }

    pub fn insert(&mut self, name: &str, grid: Grid) {
        self.table.insert(name.to_string(), Arc::new(grid));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<Grid>> {
        self.table.get(name).cloned()
    }

    /// Resolve a comma separated `nadgrids` specification against the
    /// registry. An `@` prefix marks a grid optional. A missing mandatory
    /// grid is reported here but only fails when a point actually needs
    /// shifting.
    #[must_use]
    pub fn resolve(&self, nadgrids: &str) -> Vec<GridRef> {
        let mut refs = Vec::new();
        for spec in nadgrids.split(',') {
            let (mandatory, name) = match spec.strip_prefix('@') {
                Some(rest) => (false, rest),
                None => (true, spec),
            };
            if name.is_empty() {
                log::error!("nadgrids syntax error '{nadgrids}': empty grid found");
                continue;
            }
            let grid = self.get(name);
            if mandatory && grid.is_none() {
                log::error!("missing grid '{name}'");
            }
            refs.push(GridRef {
                name: name.to_string(),
                mandatory,
                grid,
            });
        }
        refs
    }
}

/// Run a point through the first grid of the datum's list that covers it.
/// Optional grids that cover nothing are a documented lossy fallback: the
/// point passes through unshifted. A mandatory grid that is absent, or a
/// mandatory list with no coverage, is an error.
pub fn apply_gridshift(datum: &Datum, inverse: bool, p: &mut Point) -> Result<(), Error> {
    if datum.grids.is_empty() {
        return Err(Error::General("grid shift requested with no grid list"));
    }

    let input = (p.x, p.y);
    let mut output = None;
    let mut any_mandatory = false;

    for gref in &datum.grids {
        any_mandatory |= gref.mandatory;
        let Some(ct) = gref.grid.as_deref() else {
            if gref.mandatory {
                log::error!("unable to find '{}' grid", gref.name);
                return Err(Error::MissingGrid(gref.name.clone()));
            }
            continue;
        };

        // Skip tables that cannot contain the point. The margin absorbs
        // roundoff at the outermost cell edges.
        let epsilon = (ct.del[1].abs() + ct.del[0].abs()) / 10000.;
        if ct.ll[1] - epsilon > input.1
            || ct.ll[0] - epsilon > input.0
            || ct.ll[1] + (ct.lim[1] - 1) as f64 * ct.del[1] + epsilon < input.1
            || ct.ll[0] + (ct.lim[0] - 1) as f64 * ct.del[0] + epsilon < input.0
        {
            continue;
        }

        // The identity grid shifts nothing, and skipping the interpolation
        // avoids feeding it numerical noise
        output = if gref.name == "null" {
            Some(input)
        } else {
            nad_cvt(input, inverse, ct)
        };
        if output.is_some() {
            break;
        }
    }

    match output {
        Some((x, y)) => {
            p.x = x;
            p.y = y;
            Ok(())
        }
        None if any_mandatory => {
            log::error!(
                "failed to find a grid shift table for location ({}, {})",
                input.0.to_degrees(),
                input.1.to_degrees()
            );
            Err(Error::GridCoverage(input.0, input.1))
        }
        None => {
            log::warn!(
                "no optional grid covers ({}, {}); point passed through unshifted",
                input.0.to_degrees(),
                input.1.to_degrees()
            );
            Ok(())
        }
    }
}

/// Apply (or invert) the correction table to an absolute coordinate.
/// The inverse runs a fixed point iteration on the forward shift: at most
/// 10 rounds, converged when the correction drops below 1e-12.
#[must_use]
pub fn nad_cvt(pin: (f64, f64), inverse: bool, ct: &Grid) -> Option<(f64, f64)> {
    if pin.0.is_nan() {
        return None;
    }
    // Grid-relative coordinates, with the longitude folded into range
    let mut tb = (pin.0 - ct.ll[0], pin.1 - ct.ll[1]);
    tb.0 = adjust_lon(tb.0 - PI) + PI;

    let t = nad_intr(tb, ct)?;
    if !inverse {
        return Some((pin.0 - t.0, pin.1 + t.1));
    }

    let mut t = (tb.0 + t.0, tb.1 - t.1);
    let tol = 1e-12;
    let mut i = 9_i32;
    loop {
        let Some(del) = nad_intr(t, ct) else {
            log::warn!(
                "inverse grid shift iteration failed, presumably at grid edge; using first approximation"
            );
            break;
        };
        let dif = (t.0 - del.0 - tb.0, t.1 + del.1 - tb.1);
        t.0 -= dif.0;
        t.1 -= dif.1;
        let keep_going = i != 0;
        i -= 1;
        if !(keep_going && dif.0.abs() > tol && dif.1.abs() > tol) {
            break;
        }
    }
    if i < 0 {
        log::warn!("inverse grid shift iterator failed to converge");
        return None;
    }
    Some((adjust_lon(t.0 + ct.ll[0]), t.1 + ct.ll[1]))
}

/// Bilinear interpolation of the four shift vectors around a grid-relative
/// coordinate. `None` outside the usable area of the table; cell-edge
/// stragglers within tight tolerances are snapped onto the edge.
#[must_use]
pub fn nad_intr(pin: (f64, f64), ct: &Grid) -> Option<(f64, f64)> {
    // The small downward nudge reproduces the rounding of the reference
    // C implementation at exact node coordinates
    let t = ((pin.0 - 1e-7) / ct.del[0], (pin.1 - 1e-7) / ct.del[1]);
    let mut indx = (t.0.floor() as i64, t.1.floor() as i64);
    let mut frct = (t.0 - indx.0 as f64, t.1 - indx.1 as f64);

    if indx.0 < 0 {
        if !(indx.0 == -1 && frct.0 > 0.99999999999) {
            return None;
        }
        indx.0 += 1;
        frct.0 = 0.;
    } else {
        let inx = indx.0 + 1;
        if inx >= ct.lim[0] as i64 {
            if !(inx == ct.lim[0] as i64 && frct.0 < 1e-11) {
                return None;
            }
            indx.0 -= 1;
            frct.0 = 1.;
        }
    }
    if indx.1 < 0 {
        if !(indx.1 == -1 && frct.1 > 0.99999999999) {
            return None;
        }
        indx.1 += 1;
        frct.1 = 0.;
    } else {
        let inx = indx.1 + 1;
        if inx >= ct.lim[1] as i64 {
            if !(inx == ct.lim[1] as i64 && frct.1 < 1e-11) {
                return None;
            }
            indx.1 -= 1;
            frct.1 = 1.;
        }
    }

    let inx = indx.1 as usize * ct.lim[0] + indx.0 as usize;
    let f00 = ct.cvs[inx];
    let f10 = ct.cvs[inx + 1];
    let f11 = ct.cvs[inx + 1 + ct.lim[0]];
    let f01 = ct.cvs[inx + ct.lim[0]];

    let m11 = frct.0 * frct.1;
    let m10 = frct.0 * (1. - frct.1);
    let m00 = (1. - frct.0) * (1. - frct.1);
    let m01 = (1. - frct.0) * frct.1;
    Some((
        m00 * f00[0] + m10 * f10[0] + m01 * f01[0] + m11 * f11[0],
        m00 * f00[1] + m10 * f10[1] + m01 * f01[1] + m11 * f11[1],
    ))
}
