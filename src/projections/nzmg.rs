//! New Zealand Map Grid. A sixth-order complex polynomial fitted to the
//! whole country, defined on the International 1924 ellipsoid.

use crate::math::SEC_TO_RAD;
use super::Projection;
use crate::proj::Parameters;
use crate::Error;
use crate::Point;

// Series coefficients from the LINZ definition
const A: [f64; 10] = [
    0.639_917_507_3,
    -0.135_879_761_3,
    0.063_294_409,
    -0.025_268_53,
    0.011_787_9,
    -0.005_516_1,
    0.002_690_6,
    -0.001_333,
    0.000_67,
    -0.000_34,
];
const B_RE: [f64; 6] = [
    0.755_785_322_8,
    0.249_204_646,
    -0.001_541_739,
    -0.101_629_07,
    -0.266_234_89,
    -0.687_098_3,
];
const B_IM: [f64; 6] = [
    0.,
    0.003_371_507,
    0.041_058_560,
    0.017_276_09,
    -0.362_492_18,
    -1.165_196_7,
];
const C_RE: [f64; 6] = [
    1.323_127_043_9,
    -0.577_245_789,
    0.508_307_513,
    -0.150_947_62,
    1.014_181_79,
    1.966_054_9,
];
const C_IM: [f64; 6] = [
    0.,
    -0.007_809_598,
    -0.112_208_952,
    0.182_006_02,
    1.644_976_96,
    2.512_764_5,
];
const D: [f64; 9] = [
    1.562_701_424_3,
    0.518_540_639_8,
    -0.033_330_98,
    -0.105_290_6,
    -0.036_859_4,
    0.007_317,
    0.012_20,
    0.003_94,
    -0.001_3,
];

#[derive(Debug, Clone, Copy)]
struct Cplx {
    re: f64,
    im: f64,
}

impl Cplx {
    fn mul(self, o: Cplx) -> Cplx {
        Cplx {
            re: self.re * o.re - self.im * o.im,
            im: self.re * o.im + self.im * o.re,
        }
    }

    fn div(self, o: Cplx) -> Cplx {
        let d = o.re * o.re + o.im * o.im;
        Cplx {
            re: (self.re * o.re + self.im * o.im) / d,
            im: (self.im * o.re - self.re * o.im) / d,
        }
    }

    fn add(self, o: Cplx) -> Cplx {
        Cplx { re: self.re + o.re, im: self.im + o.im }
    }

    fn scale(self, s: f64) -> Cplx {
        Cplx { re: self.re * s, im: self.im * s }
    }
}

#[derive(Debug)]
pub struct Nzmg {
    a: f64,
    x0: f64,
    y0: f64,
    lat0: f64,
    long0: f64,
}

pub fn new(p: &Parameters) -> Result<Box<dyn Projection>, Error> {
    Ok(Box::new(Nzmg {
        a: p.a(),
        x0: p.x0,
        y0: p.y0,
        lat0: p.lat0,
        long0: p.long0,
    }))
}

impl Projection for Nzmg {
    // ----- F O R W A R D -----------------------------------------------
    fn forward(&self, p: &mut Point) {
        let lat = p.y;
        let lon = p.x;

        // Latitude offset in units of 1e-5 arc seconds
        let delta_phi = (lat - self.lat0) / SEC_TO_RAD * 1e-5;
        let mut d_psi = 0.;
        let mut pw = 1.;
        for an in A {
            pw *= delta_phi;
            d_psi += an * pw;
        }

        let theta = Cplx { re: d_psi, im: lon - self.long0 };
        let mut z = Cplx { re: 0., im: 0. };
        let mut th_n = Cplx { re: 1., im: 0. };
        for n in 0..6 {
            th_n = th_n.mul(theta);
            z = z.add(th_n.mul(Cplx { re: B_RE[n], im: B_IM[n] }));
        }

        p.x = z.im * self.a + self.x0;
        p.y = z.re * self.a + self.y0;
    }

    // ----- I N V E R S E -----------------------------------------------
    fn inverse(&self, p: &mut Point) {
        let x = p.x - self.x0;
        let y = p.y - self.y0;

        let z = Cplx { re: y / self.a, im: x / self.a };
        let mut theta = Cplx { re: 0., im: 0. };
        let mut z_n = Cplx { re: 1., im: 0. };
        for n in 0..6 {
            z_n = z_n.mul(z);
            theta = theta.add(z_n.mul(Cplx { re: C_RE[n], im: C_IM[n] }));
        }

        // One Newton step sharpens the series inversion
        let mut num = z;
        let mut th_n = theta;
        for n in 1..6 {
            th_n = th_n.mul(theta);
            num = num.add(th_n.mul(Cplx { re: B_RE[n], im: B_IM[n] }).scale(n as f64));
        }
        let mut den = Cplx { re: B_RE[0], im: B_IM[0] };
        th_n = Cplx { re: 1., im: 0. };
        for n in 1..6 {
            th_n = th_n.mul(theta);
            den = den.add(th_n.mul(Cplx { re: B_RE[n], im: B_IM[n] }).scale((n + 1) as f64));
        }
        theta = num.div(den);

        let d_psi = theta.re;
        let mut d_phi = 0.;
        let mut pw = 1.;
        for dn in D {
            pw *= d_psi;
            d_phi += dn * pw;
        }

        p.y = self.lat0 + d_phi * SEC_TO_RAD * 1e5;
        p.x = self.long0 + theta.im;
    }
}
