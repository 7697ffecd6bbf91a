//! Closed tags describing what a CRS is and how its axes point.

use std::ffi::c_int;
use std::fmt;

use crate::sys;

/// The kind of coordinate reference system wrapped by a [`Crs`](crate::Crs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrsKind {
    /// Longitude/latitude on an ellipsoid, in degrees.
    Geographic,
    /// Earth-centred cartesian X/Y/Z.
    Geocentric,
    /// Easting/northing on a map projection.
    Projected,
}

impl CrsKind {
    pub(crate) fn from_raw(raw: c_int) -> Option<Self> {
        match raw {
            sys::PJ_CRS_KIND_GEOGRAPHIC => Some(Self::Geographic),
            sys::PJ_CRS_KIND_GEOCENTRIC => Some(Self::Geocentric),
            sys::PJ_CRS_KIND_PROJECTED => Some(Self::Projected),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Geographic => "GEOGRAPHIC",
            Self::Geocentric => "GEOCENTRIC",
            Self::Projected => "PROJECTED",
        }
    }
}

impl fmt::Display for CrsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a single coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisDirection {
    East,
    West,
    North,
    South,
    Up,
    Down,
    GeocentricX,
    GeocentricY,
    GeocentricZ,
    /// A direction PROJ reports that has no single-letter code here.
    Other,
}

impl AxisDirection {
    /// Parse the single-letter code used by [`Crs::axis_direction_codes`](crate::Crs::axis_direction_codes).
    pub fn from_code(code: char) -> Self {
        match code {
            'e' => Self::East,
            'w' => Self::West,
            'n' => Self::North,
            's' => Self::South,
            'u' => Self::Up,
            'd' => Self::Down,
            'x' => Self::GeocentricX,
            'y' => Self::GeocentricY,
            'z' => Self::GeocentricZ,
            _ => Self::Other,
        }
    }

    pub fn code(self) -> char {
        match self {
            Self::East => 'e',
            Self::West => 'w',
            Self::North => 'n',
            Self::South => 's',
            Self::Up => 'u',
            Self::Down => 'd',
            Self::GeocentricX => 'x',
            Self::GeocentricY => 'y',
            Self::GeocentricZ => 'z',
            Self::Other => '?',
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_maps_native_tags() {
        assert_eq!(CrsKind::from_raw(0), Some(CrsKind::Geographic));
        assert_eq!(CrsKind::from_raw(1), Some(CrsKind::Geocentric));
        assert_eq!(CrsKind::from_raw(2), Some(CrsKind::Projected));
        assert_eq!(CrsKind::from_raw(-1), None);
        assert_eq!(CrsKind::from_raw(7), None);
    }

    #[test]
    fn kind_displays_upper_case_tag() {
        assert_eq!(CrsKind::Projected.to_string(), "PROJECTED");
        assert_eq!(CrsKind::Geographic.to_string(), "GEOGRAPHIC");
    }

    #[test]
    fn axis_codes_are_stable() {
        for code in ['e', 'w', 'n', 's', 'u', 'd', 'x', 'y', 'z'] {
            assert_eq!(AxisDirection::from_code(code).code(), code);
        }
        assert_eq!(AxisDirection::from_code('?'), AxisDirection::Other);
        assert_eq!(AxisDirection::from_code('q').code(), '?');
    }

    #[test]
    fn only_up_and_down_are_vertical() {
        assert!(AxisDirection::Up.is_vertical());
        assert!(AxisDirection::Down.is_vertical());
        assert!(!AxisDirection::North.is_vertical());
        assert!(!AxisDirection::GeocentricZ.is_vertical());
    }
}
