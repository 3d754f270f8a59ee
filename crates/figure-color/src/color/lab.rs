//! CIE L*a*b* color space
//!
//! Derived from XYZ with the D65 reference white. Euclidean distance here is
//! the CIE76 delta-E used for every "which color is closer" decision.

use super::srgb::Rgb;
use super::xyz::{Xyz, D65_WHITE};

const DELTA: f64 = 6.0 / 29.0;

/// A color in CIE LAB.
///
/// - `l`: lightness, 0 (black) to 100 (white)
/// - `a`: green (negative) to red (positive)
/// - `b`: blue (negative) to yellow (positive)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Lab {
    #[inline]
    pub fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Colorfulness: distance from the neutral axis, `sqrt(a² + b²)`.
    #[inline]
    pub fn chroma(self) -> f64 {
        self.a.hypot(self.b)
    }

    /// CIE76 color difference.
    ///
    /// ```
    /// use figure_color::Lab;
    /// let gray = Lab::new(50.0, 0.0, 0.0);
    /// assert_eq!(gray.delta_e(Lab::new(50.0, 3.0, 4.0)), 5.0);
    /// ```
    #[inline]
    pub fn delta_e(self, other: Lab) -> f64 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        (dl * dl + da * da + db * db).sqrt()
    }
}

/// CIE f(t): cube root above (6/29)³, linear below.
#[inline]
fn lab_f(t: f64) -> f64 {
    if t > DELTA * DELTA * DELTA {
        t.cbrt()
    } else {
        t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
    }
}

impl From<Xyz> for Lab {
    fn from(xyz: Xyz) -> Self {
        let fx = lab_f(xyz.x / D65_WHITE.x);
        let fy = lab_f(xyz.y / D65_WHITE.y);
        let fz = lab_f(xyz.z / D65_WHITE.z);

        Self {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }
}

impl From<Rgb> for Lab {
    fn from(rgb: Rgb) -> Self {
        Self::from(Xyz::from(rgb))
    }
}
