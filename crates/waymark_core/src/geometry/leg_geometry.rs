use geo_types::LineString;

/// Precision of encoded polylines returned by the trip planner.
pub const POLYLINE_PRECISION: u32 = 5;

pub fn decode_leg_geometry(encoded: &str) -> Result<LineString<f64>, String> {
    polyline::decode_polyline(encoded, POLYLINE_PRECISION).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_leg_geometry() {
        // Reference polyline from the encoding format documentation.
        let line = decode_leg_geometry("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();

        let coords: Vec<(f64, f64)> = line.coords().map(|c| (c.x, c.y)).collect();
        assert_eq!(coords.len(), 3);
        assert!((coords[0].0 - -120.2).abs() < 1e-9);
        assert!((coords[0].1 - 38.5).abs() < 1e-9);
        assert!((coords[2].0 - -126.453).abs() < 1e-9);
        assert!((coords[2].1 - 43.252).abs() < 1e-9);
    }
}
