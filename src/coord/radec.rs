// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Handle (right ascension, declination) coordinates.
 */

use serde::{Deserialize, Serialize};

/// A struct containing a Right Ascension and Declination. All units are in
/// radians.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RADec {
    /// Right ascension [radians]
    pub ra: f64,
    /// Declination [radians]
    pub dec: f64,
}

impl RADec {
    /// Make a new `RADec` struct from values in radians.
    pub fn new(ra: f64, dec: f64) -> Self {
        Self { ra, dec }
    }

    /// Make a new `RADec` struct from values in degrees.
    pub fn from_degrees(ra: f64, dec: f64) -> Self {
        Self::new(ra.to_radians(), dec.to_radians())
    }

    /// Calculate the great-circle distance between two sets of coordinates
    /// [radians].
    pub fn separation(&self, b: &Self) -> f64 {
        unsafe { erfa_sys::eraSeps(self.ra, self.dec, b.ra, b.dec) }
    }

    /// The position angle of `b` as seen from these coordinates, measured from
    /// north through east [radians, in (-pi, pi]].
    pub fn position_angle(&self, b: &Self) -> f64 {
        unsafe { erfa_sys::eraPas(self.ra, self.dec, b.ra, b.dec) }
    }

    /// Project `b` onto the plane tangent to these coordinates (gnomonic
    /// projection). The returned (xi, eta) offsets are in degrees, with xi
    /// increasing to the east. `None` is returned if `b` is too far from the
    /// tangent point to be projected.
    pub fn tangent_plane_offset(&self, b: &Self) -> Option<(f64, f64)> {
        let mut xi = 0.0;
        let mut eta = 0.0;
        let status =
            unsafe { erfa_sys::eraTpxes(b.ra, b.dec, self.ra, self.dec, &mut xi, &mut eta) };
        match status {
            0 => Some((xi.to_degrees(), eta.to_degrees())),
            _ => None,
        }
    }
}

impl std::fmt::Display for RADec {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({}°, {}°)", self.ra.to_degrees(), self.dec.to_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::*;

    #[test]
    fn test_separation_along_meridian() {
        let a = RADec::from_degrees(100.0, 50.0);
        let b = RADec::from_degrees(100.0, 50.01);
        assert_abs_diff_eq!(a.separation(&b).to_degrees(), 0.01, epsilon = 1e-10);

        let b = RADec::from_degrees(100.0, 51.01);
        assert_abs_diff_eq!(a.separation(&b).to_degrees(), 1.01, epsilon = 1e-10);
    }

    #[test]
    fn test_separation_shrinks_with_declination() {
        // At a declination of 60 degrees, one degree of RA is roughly half a
        // degree on the sky.
        let a = RADec::from_degrees(10.0, 60.0);
        let b = RADec::from_degrees(11.0, 60.0);
        assert_abs_diff_eq!(a.separation(&b).to_degrees(), 0.5, epsilon = 1e-4);
    }

    #[test]
    fn test_separation_wraps_ra() {
        let a = RADec::from_degrees(359.5, 0.0);
        let b = RADec::from_degrees(0.5, 0.0);
        assert_abs_diff_eq!(a.separation(&b).to_degrees(), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_separation_extremes() {
        let a = RADec::from_degrees(42.0, -30.0);
        assert_abs_diff_eq!(a.separation(&a), 0.0);

        let b = RADec::from_degrees(222.0, 30.0);
        assert_abs_diff_eq!(a.separation(&b).to_degrees(), 180.0, epsilon = 1e-8);
    }

    #[test]
    fn test_position_angle() {
        let a = RADec::from_degrees(100.0, 50.0);
        let north = RADec::from_degrees(100.0, 50.5);
        let east = RADec::from_degrees(100.5, 50.0);
        assert_abs_diff_eq!(a.position_angle(&north), 0.0, epsilon = 1e-10);
        assert_abs_diff_eq!(a.position_angle(&east).to_degrees(), 90.0, epsilon = 0.5);
        let west = RADec::from_degrees(99.5, 50.0);
        assert_abs_diff_eq!(a.position_angle(&west).to_degrees(), -90.0, epsilon = 0.5);
    }

    #[test]
    fn test_tangent_plane_offset() {
        let a = RADec::from_degrees(200.0, 50.0);
        let (xi, eta) = a.tangent_plane_offset(&a).unwrap();
        assert_abs_diff_eq!(xi, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(eta, 0.0, epsilon = 1e-12);

        let (xi, eta) = a
            .tangent_plane_offset(&RADec::from_degrees(200.0, 50.2))
            .unwrap();
        assert_abs_diff_eq!(xi, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(eta, 0.2, epsilon = 1e-5);

        assert!(a
            .tangent_plane_offset(&RADec::from_degrees(20.0, -50.0))
            .is_none());
    }
}
