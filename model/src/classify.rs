use crate::Waypoint;

/// How a stop should look, given tracking progress. `None` for the step means
/// tracking hasn't started yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopStatus {
    Upcoming,
    Current,
    Completed,
    /// The terminal stop always shows as the destination, even before the
    /// vehicle reaches it
    Destination,
}

impl StopStatus {
    pub fn describe(self) -> &'static str {
        match self {
            StopStatus::Upcoming => "upcoming",
            StopStatus::Current => "vehicle is here",
            StopStatus::Completed => "passed",
            StopStatus::Destination => "destination",
        }
    }
}

/// Pure function of (index, current step, destination flag). A step beyond
/// the last index just marks everything before it as completed.
pub fn classify(waypoints: &[Waypoint], current_step: Option<usize>) -> Vec<StopStatus> {
    waypoints
        .iter()
        .enumerate()
        .map(|(idx, wp)| {
            if wp.is_destination {
                StopStatus::Destination
            } else {
                match current_step {
                    Some(step) if idx == step => StopStatus::Current,
                    Some(step) if idx < step => StopStatus::Completed,
                    _ => StopStatus::Upcoming,
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn waypoints() -> Vec<Waypoint> {
        vec![
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
                Some(10.0),
                "07:10".to_string(),
                false,
            ),
            Waypoint::new(
                "C".to_string(),
                Some(30.0),
                Some(10.0),
                "07:20".to_string(),
                true,
            ),
        ]
    }

    #[test]
    fn not_started() {
        let statuses = classify(&waypoints(), None);
        assert_eq!(
            statuses,
            vec![
                StopStatus::Upcoming,
                StopStatus::Upcoming,
                StopStatus::Destination
            ]
        );
    }

    #[test]
    fn mid_route() {
        let statuses = classify(&waypoints(), Some(1));
        assert_eq!(
            statuses,
            vec![
                StopStatus::Completed,
                StopStatus::Current,
                StopStatus::Destination
            ]
        );
    }

    #[test]
    fn destination_wins_over_current() {
        let statuses = classify(&waypoints(), Some(2));
        assert_eq!(statuses[2], StopStatus::Destination);
    }

    #[test]
    fn step_out_of_range_doesnt_panic() {
        let statuses = classify(&waypoints(), Some(10));
        assert_eq!(
            statuses,
            vec![
                StopStatus::Completed,
                StopStatus::Completed,
                StopStatus::Destination
            ]
        );
    }

    #[test]
    fn malformed_position_keeps_its_index() {
        let mut wps = waypoints();
        wps[1].position = None;
        let statuses = classify(&wps, Some(2));
        // B is skipped for drawing, but classification still sees 3 stops
        assert_eq!(statuses.len(), 3);
        assert_eq!(statuses[1], StopStatus::Completed);
    }
}
