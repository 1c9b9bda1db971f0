use geom::LonLat;

/// Initial great-circle bearing from `from` to `to`, in degrees. North is 0,
/// east is 90, always in [0, 360). Identical points yield 0.
///
/// Exposed for orienting the vehicle marker; the UI currently shows it as a
/// heading readout without rotating the icon.
pub fn bearing(from: LonLat, to: LonLat) -> f64 {
    let lat1 = from.y().to_radians();
    let lat2 = to.y().to_radians();
    let dlon = (to.x() - from.x()).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    (y.atan2(x).to_degrees() + 360.0) % 360.0
}
