//! Axis order and sign normalization. The internal convention is "enu"
//! (easting, northing, up); a CRS may present its components in any order
//! and direction over the alphabet {e, w, n, s, u, d}.

use crate::Error;
use crate::Point;

/// Validate a 3 letter axis code
pub fn parse_axis(axis: &str) -> Result<[u8; 3], Error> {
    let bytes = axis.as_bytes();
    if bytes.len() != 3 || !bytes.iter().all(|b| b"ewnsud".contains(b)) {
        return Err(Error::BadAxis(axis.to_string()));
    }
    Ok([bytes[0], bytes[1], bytes[2]])
}

/// Remap a point between a CRS's own component order/signs and the internal
/// "enu" convention. With `denorm` false the point is in CRS order and is
/// normalized; with `denorm` true the point is in "enu" order and is put
/// back into CRS order. The two directions are exact inverses: letters only
/// permute slots and flip signs, so no precision is lost.
///
/// A missing height is left missing; a `u`/`d` axis letter with no height
/// to route is skipped.
pub fn adjust_axis(axis: &[u8; 3], denorm: bool, p: &mut Point) -> Result<(), Error> {
    let inp = [p.x, p.y, p.h()];
    let mut out = [p.x, p.y, p.h()];

    for (i, letter) in axis.iter().enumerate() {
        if i == 2 && p.z.is_none() {
            continue;
        }
        // Slot the letter names, and the sign of its direction
        let (slot, sgn) = match letter {
            b'e' => (0, 1.),
            b'w' => (0, -1.),
            b'n' => (1, 1.),
            b's' => (1, -1.),
            b'u' => (2, 1.),
            b'd' => (2, -1.),
            _ => return Err(Error::BadAxis((*letter as char).to_string())),
        };
        if denorm {
            out[i] = sgn * inp[slot];
        } else {
            out[slot] = sgn * inp[i];
        }
    }

    p.x = out[0];
    p.y = out[1];
    if p.z.is_some() {
        p.z = Some(out[2]);
    }
    Ok(())
}
