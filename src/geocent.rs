//! Geodetic/geocentric conversions and the 3/7 parameter frame shifts.
//! All functions take ellipsoid constants as plain arguments, so a datum
//! transform can substitute WGS84 values without touching any CRS state.

use crate::datum::DatumType;
use crate::math::AD_C;
use crate::math::COS_67P5;
use crate::Error;
use crate::Point;
use std::f64::consts::{FRAC_PI_2, PI};

/// Geodetic (longitude, latitude, height) to geocentric (X, Y, Z), meters.
/// A latitude within 0.1% beyond a pole is clamped to the pole; further out
/// is a hard domain error.
pub fn geodetic_to_geocentric(p: &mut Point, a: f64, es: f64) -> Result<(), Error> {
    let mut longitude = p.x;
    let latitude = p.y;
    let height = p.h();

    let latitude = if latitude < -FRAC_PI_2 && latitude > -1.001 * FRAC_PI_2 {
        -FRAC_PI_2
    } else if latitude > FRAC_PI_2 && latitude < 1.001 * FRAC_PI_2 {
        FRAC_PI_2
    } else if !(-FRAC_PI_2..=FRAC_PI_2).contains(&latitude) {
        return Err(Error::LatitudeOutOfRange(latitude));
    } else {
        latitude
    };

    if longitude > PI {
        longitude -= 2. * PI;
    }
    let sin_lat = latitude.sin();
    let cos_lat = latitude.cos();
    let rn = a / (1. - es * sin_lat * sin_lat).sqrt();

    p.x = (rn + height) * cos_lat * longitude.cos();
    p.y = (rn + height) * cos_lat * longitude.sin();
    p.z = Some((rn * (1. - es) + height) * sin_lat);
    Ok(())
}

/// Geocentric to geodetic by the iterative method of the Institut fuer
/// Erdmessung, University of Hannover: refine (sin, cos) of the latitude
/// until sin(delta phi) squared drops below 1e-24, at most 30 rounds.
pub fn geocentric_to_geodetic(p: &mut Point, a: f64, b: f64, es: f64) {
    // end criterium, accuracy of sin(latitude)
    let genau = 1e-12;
    let genau2 = genau * genau;
    let maxiter = 30;

    let x = p.x;
    let y = p.y;
    let z = p.h();

    let pdist = x.hypot(y);
    let rr = (x * x + y * y + z * z).sqrt();

    let longitude = if pdist / a < genau {
        // On the rotation axis
        if rr / a < genau {
            // Center of mass: latitude and height degenerate
            *p = Point::xyz(0., FRAC_PI_2, -b);
            return;
        }
        0.
    } else {
        y.atan2(x)
    };

    let ct = z / rr;
    let st = pdist / rr;
    let mut rx = 1. / (1. - es * (2. - es) * st * st).sqrt();
    let mut cphi0 = st * (1. - es) * rx;
    let mut sphi0 = ct * rx;

    let mut sphi = sphi0;
    let mut cphi = cphi0;
    let mut height = 0.;
    for _ in 0..maxiter {
        let rn = a / (1. - es * sphi0 * sphi0).sqrt();
        height = pdist * cphi0 + z * sphi0 - rn * (1. - es * sphi0 * sphi0);

        let rk = es * rn / (rn + height);
        rx = 1. / (1. - rk * (2. - rk) * st * st).sqrt();
        cphi = st * (1. - rk) * rx;
        sphi = ct * rx;
        let sdphi = sphi * cphi0 - cphi * sphi0;
        cphi0 = cphi;
        sphi0 = sphi;
        if sdphi * sdphi <= genau2 {
            break;
        }
    }

    p.x = longitude;
    p.y = (sphi / cphi.abs()).atan();
    p.z = Some(height);
}

/// Geocentric to geodetic without iteration, after Ralph Toms (1996).
/// Matches the iterative method to better than 1e-9 rad for terrestrial
/// points; kept as a cross-check.
pub fn geocentric_to_geodetic_noniter(p: &mut Point, a: f64, b: f64, es: f64, ep2: f64) {
    let x = p.x;
    let y = p.y;
    let z = p.h();

    let longitude = if x != 0.0 {
        y.atan2(x)
    } else if y > 0. {
        FRAC_PI_2
    } else if y < 0. {
        -FRAC_PI_2
    } else {
        // On the rotation axis
        if z == 0. {
            *p = Point::xyz(0., FRAC_PI_2, -b);
            return;
        }
        0.
    };
    let at_pole = x == 0.0 && y == 0.0;

    let w2 = x * x + y * y;
    let w = w2.sqrt();
    let t0 = z * AD_C;
    let s0 = (t0 * t0 + w2).sqrt();
    let sin_b0 = t0 / s0;
    let cos_b0 = w / s0;
    let sin3_b0 = sin_b0 * sin_b0 * sin_b0;
    let t1 = z + b * ep2 * sin3_b0;
    let sum = w - a * es * cos_b0 * cos_b0 * cos_b0;
    let s1 = (t1 * t1 + sum * sum).sqrt();
    let sin_p1 = t1 / s1;
    let cos_p1 = sum / s1;
    let rn = a / (1. - es * sin_p1 * sin_p1).sqrt();

    let height = if cos_p1 >= COS_67P5 {
        w / cos_p1 - rn
    } else if cos_p1 <= -COS_67P5 {
        w / -cos_p1 - rn
    } else {
        z / sin_p1 + rn * (es - 1.)
    };

    p.x = longitude;
    p.y = if at_pole {
        FRAC_PI_2.copysign(z)
    } else {
        (sin_p1 / cos_p1).atan()
    };
    p.z = Some(height);
}

/// Shift a geocentric point from the datum frame to WGS84. The 7 parameter
/// form is the small-angle Bursa-Wolf model.
pub fn geocentric_to_wgs84(p: &mut Point, datum_type: DatumType, params: &[f64]) {
    match datum_type {
        DatumType::ThreeParam => {
            p.x += params[0];
            p.y += params[1];
            p.z = Some(p.h() + params[2]);
        }
        DatumType::SevenParam => {
            let &[dx, dy, dz, rx, ry, rz, m] = params else {
                return;
            };
            let z = p.h();
            let x_out = m * (p.x - rz * p.y + ry * z) + dx;
            let y_out = m * (rz * p.x + p.y - rx * z) + dy;
            let z_out = m * (-ry * p.x + rx * p.y + z) + dz;
            p.x = x_out;
            p.y = y_out;
            p.z = Some(z_out);
        }
        _ => (),
    }
}

/// The algebraic inverse of [`geocentric_to_wgs84`]
pub fn geocentric_from_wgs84(p: &mut Point, datum_type: DatumType, params: &[f64]) {
    match datum_type {
        DatumType::ThreeParam => {
            p.x -= params[0];
            p.y -= params[1];
            p.z = Some(p.h() - params[2]);
        }
        DatumType::SevenParam => {
            let &[dx, dy, dz, rx, ry, rz, m] = params else {
                return;
            };
            let x_tmp = (p.x - dx) / m;
            let y_tmp = (p.y - dy) / m;
            let z_tmp = (p.h() - dz) / m;
            p.x = x_tmp + rz * y_tmp - ry * z_tmp;
            p.y = -rz * x_tmp + y_tmp + rx * z_tmp;
            p.z = Some(ry * x_tmp - rx * y_tmp + z_tmp);
        }
        _ => (),
    }
}
