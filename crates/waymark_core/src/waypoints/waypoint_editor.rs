use serde::{Deserialize, Serialize};

use crate::{
    error::EditError,
    geometry::{LatLon, nearest::two_nearest},
};

/// Fixed origin and destination of the itinerary being edited.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteEndpoints {
    pub origin: LatLon,
    pub destination: LatLon,
}

/// Where a point dragged off the route line belongs in `waypoints`.
///
/// The origin and destination bracket the waypoints as candidates. The new point goes
/// after the earlier of the two candidates nearest to `drag_start`, unless those two
/// are not neighbours in the sequence and the later one is strictly closer, in which
/// case it goes immediately before the later one. That keeps routes which loop back
/// near themselves from splicing the point between two far apart parts of the trip.
pub fn compute_insertion_index(
    endpoints: &RouteEndpoints,
    waypoints: &[LatLon],
    drag_start: &LatLon,
) -> usize {
    if waypoints.is_empty() {
        return 0;
    }

    let mut candidates = Vec::with_capacity(waypoints.len() + 2);
    candidates.push(endpoints.origin);
    candidates.extend_from_slice(waypoints);
    candidates.push(endpoints.destination);

    let Some((nearest, next_nearest)) = two_nearest(drag_start, &candidates) else {
        return 0;
    };

    // Candidate positions are one ahead of waypoint indices because of the origin.
    let smaller = nearest.position.min(next_nearest.position);
    let larger = nearest.position.max(next_nearest.position);

    let index = if larger - smaller > 1
        && nearest.position == larger
        && nearest.distance < next_nearest.distance
    {
        larger - 1
    } else {
        smaller
    };

    index.min(waypoints.len())
}

pub fn insert_waypoint(
    waypoints: &[LatLon],
    point: LatLon,
    index: usize,
) -> Result<Vec<LatLon>, EditError> {
    if index > waypoints.len() {
        return Err(EditError::IndexOutOfRange {
            index,
            len: waypoints.len(),
        });
    }

    let mut updated = waypoints.to_vec();
    updated.insert(index, point);
    Ok(updated)
}

pub fn move_waypoint(
    waypoints: &[LatLon],
    index: usize,
    point: LatLon,
) -> Result<Vec<LatLon>, EditError> {
    let mut updated = waypoints.to_vec();
    let len = updated.len();
    let slot = updated
        .get_mut(index)
        .ok_or(EditError::IndexOutOfRange { index, len })?;
    *slot = point;
    Ok(updated)
}

pub fn remove_waypoint(waypoints: &[LatLon], index: usize) -> Result<Vec<LatLon>, EditError> {
    if index >= waypoints.len() {
        return Err(EditError::IndexOutOfRange {
            index,
            len: waypoints.len(),
        });
    }

    let mut updated = waypoints.to_vec();
    updated.remove(index);
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints() -> RouteEndpoints {
        RouteEndpoints {
            origin: LatLon::new(0.0, 0.0),
            destination: LatLon::new(0.0, 10.0),
        }
    }

    #[test]
    fn no_waypoints_inserts_first() {
        let index = compute_insertion_index(&endpoints(), &[], &LatLon::new(0.0, 5.0));
        assert_eq!(index, 0);
    }

    #[test]
    fn inserts_between_surrounding_waypoints() {
        let waypoints = vec![LatLon::new(0.0, 3.0), LatLon::new(0.0, 7.0)];

        let index = compute_insertion_index(&endpoints(), &waypoints, &LatLon::new(0.0, 5.0));

        assert_eq!(index, 1);
    }

    #[test]
    fn inserts_next_to_endpoints() {
        let waypoints = vec![LatLon::new(0.0, 3.0), LatLon::new(0.0, 7.0)];

        assert_eq!(
            compute_insertion_index(&endpoints(), &waypoints, &LatLon::new(0.0, 1.0)),
            0
        );
        assert_eq!(
            compute_insertion_index(&endpoints(), &waypoints, &LatLon::new(0.0, 9.0)),
            2
        );
    }

    #[test]
    fn looping_route_inserts_before_nearer_later_point() {
        // The route heads north, east, then comes back down close to the origin.
        let endpoints = RouteEndpoints {
            origin: LatLon::new(0.0, 0.0),
            destination: LatLon::new(0.0, 10.0),
        };
        let waypoints = vec![
            LatLon::new(5.0, 0.0),
            LatLon::new(5.0, 5.0),
            LatLon::new(1.0, 0.0),
        ];

        let near_last_waypoint =
            compute_insertion_index(&endpoints, &waypoints, &LatLon::new(0.6, 0.0));
        assert_eq!(near_last_waypoint, 2);

        let near_origin = compute_insertion_index(&endpoints, &waypoints, &LatLon::new(0.4, 0.0));
        assert_eq!(near_origin, 0);
    }

    #[test]
    fn index_is_always_within_bounds() {
        let waypoints = vec![
            LatLon::new(1.0, 2.0),
            LatLon::new(-1.0, 4.0),
            LatLon::new(2.0, 6.0),
            LatLon::new(0.5, 8.0),
        ];

        for lat in -3..=3 {
            for lon in -2..=12 {
                let drag = LatLon::new(lat as f64, lon as f64);
                for len in 1..=waypoints.len() {
                    let index = compute_insertion_index(&endpoints(), &waypoints[..len], &drag);
                    assert!(index <= len, "index {index} for {len} waypoints at {drag}");
                }
            }
        }
    }

    #[test]
    fn insert_then_remove_round_trips() {
        let waypoints = vec![LatLon::new(0.0, 3.0), LatLon::new(0.0, 7.0)];
        let point = LatLon::new(0.0, 5.0);

        for index in 0..=waypoints.len() {
            let inserted = insert_waypoint(&waypoints, point, index).unwrap();
            assert_eq!(inserted[index], point);
            assert_eq!(remove_waypoint(&inserted, index).unwrap(), waypoints);
        }
    }

    #[test]
    fn test_move_waypoint() {
        let waypoints = vec![LatLon::new(0.0, 3.0), LatLon::new(0.0, 7.0)];

        let moved = move_waypoint(&waypoints, 1, LatLon::new(1.0, 7.0)).unwrap();

        assert_eq!(moved, vec![LatLon::new(0.0, 3.0), LatLon::new(1.0, 7.0)]);
        assert_eq!(waypoints[1], LatLon::new(0.0, 7.0));
    }

    #[test]
    fn out_of_range_edits_fail() {
        let waypoints = vec![LatLon::new(0.0, 3.0)];

        assert_eq!(
            insert_waypoint(&waypoints, LatLon::new(0.0, 1.0), 2),
            Err(EditError::IndexOutOfRange { index: 2, len: 1 })
        );
        assert_eq!(
            move_waypoint(&waypoints, 1, LatLon::new(0.0, 1.0)),
            Err(EditError::IndexOutOfRange { index: 1, len: 1 })
        );
        assert_eq!(
            remove_waypoint(&[], 0),
            Err(EditError::IndexOutOfRange { index: 0, len: 0 })
        );
    }
}
