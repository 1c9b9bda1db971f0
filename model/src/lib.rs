#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod bearing;
mod catalog;
mod classify;
mod tween;

use geom::{GPSBounds, LonLat};
use serde::{Deserialize, Serialize};

pub use self::bearing::bearing;
pub use self::catalog::Catalog;
pub use self::classify::{classify, StopStatus};
pub use self::tween::Animator;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RouteID(pub String);

/// A named, timed stop along a route. The position is `None` when the source
/// data is missing or non-finite; such a waypoint is skipped for drawing, but
/// still occupies its index, so step indices stay stable.
#[derive(Clone, Serialize, Deserialize)]
pub struct Waypoint {
    pub name: String,
    pub position: Option<LonLat>,
    /// A display label, not used for timing anything
    pub time: String,
    pub is_destination: bool,
}

impl Waypoint {
    pub fn new(
        name: String,
        lon: Option<f64>,
        lat: Option<f64>,
        time: String,
        is_destination: bool,
    ) -> Self {
        let position = match (lon, lat) {
            (Some(lon), Some(lat)) if lon.is_finite() && lat.is_finite() => {
                Some(LonLat::new(lon, lat))
            }
            _ => None,
        };
        Self {
            name,
            position,
            time,
            is_destination,
        }
    }
}

/// One route's waypoints, replaced wholesale when the selection changes --
/// never patched waypoint-by-waypoint.
pub struct RouteView {
    pub id: RouteID,
    pub waypoints: Vec<Waypoint>,
    /// Covers only waypoints with a valid position
    pub gps_bounds: GPSBounds,
}

impl RouteView {
    pub fn new(id: RouteID, waypoints: Vec<Waypoint>) -> Self {
        let mut gps_bounds = GPSBounds::new();
        for wp in &waypoints {
            if let Some(pos) = wp.position {
                gps_bounds.update(pos);
            }
        }
        Self {
            id,
            waypoints,
            gps_bounds,
        }
    }

    pub fn has_valid_position(&self) -> bool {
        self.waypoints.iter().any(|wp| wp.position.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_coordinates_are_malformed() {
        let nan_lon = Waypoint::new(
            "X".to_string(),
            Some(f64::NAN),
            Some(10.0),
            "07:00".to_string(),
            false,
        );
        assert!(nan_lon.position.is_none());

        let inf_lat = Waypoint::new(
            "Y".to_string(),
            Some(10.0),
            Some(f64::INFINITY),
            "07:05".to_string(),
            false,
        );
        assert!(inf_lat.position.is_none());

        let ok = Waypoint::new(
            "Z".to_string(),
            Some(10.0),
            Some(10.0),
            "07:10".to_string(),
            false,
        );
        assert!(ok.position.is_some());
    }

    #[test]
    fn bounds_exclude_malformed_waypoints() {
        let valid = vec![
            Waypoint::new(
                "A".to_string(),
                Some(10.0),
                Some(10.0),
                "07:00".to_string(),
                false,
            ),
            Waypoint::new(
                "B".to_string(),
                Some(20.0),
                Some(15.0),
                "07:10".to_string(),
                true,
            ),
        ];
        let mut with_bad = valid.clone();
        with_bad.insert(
            1,
            Waypoint::new(
                "Broken".to_string(),
                Some(f64::NAN),
                Some(10.0),
                "07:05".to_string(),
                false,
            ),
        );

        let clean = RouteView::new(RouteID("clean".to_string()), valid);
        let route = RouteView::new(RouteID("broken".to_string()), with_bad);

        // The malformed waypoint doesn't stretch the bounds...
        assert_eq!(
            clean.gps_bounds.to_bounds(),
            route.gps_bounds.to_bounds()
        );
        // ...but it still holds its index
        assert_eq!(route.waypoints.len(), 3);
        assert!(route.waypoints[1].position.is_none());
        assert!(route.has_valid_position());
    }
}
