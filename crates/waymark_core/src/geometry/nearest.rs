use super::LatLon;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked {
    /// Position of the candidate in the slice that was searched.
    pub position: usize,
    pub distance: f64,
}

/// Finds the nearest and next-nearest candidates to `target` by great-circle distance.
///
/// Candidates are scanned in order and only a strictly smaller distance replaces the
/// current best, so on a tie the candidate that comes first wins. Returns `None` when
/// fewer than two candidates are given.
pub fn two_nearest(target: &LatLon, candidates: &[LatLon]) -> Option<(Ranked, Ranked)> {
    if candidates.len() < 2 {
        return None;
    }

    let mut nearest: Option<Ranked> = None;
    let mut next_nearest: Option<Ranked> = None;

    for (position, candidate) in candidates.iter().enumerate() {
        let ranked = Ranked {
            position,
            distance: target.haversine_distance(candidate),
        };

        match nearest {
            Some(best) if ranked.distance >= best.distance => {
                if next_nearest.is_none_or(|second| ranked.distance < second.distance) {
                    next_nearest = Some(ranked);
                }
            }
            _ => {
                next_nearest = nearest;
                nearest = Some(ranked);
            }
        }
    }

    nearest.zip(next_nearest)
}
