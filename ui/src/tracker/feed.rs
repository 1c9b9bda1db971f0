use geom::Duration;

/// Stands in for the external mechanism that reports tracking progress
/// (polling, push, whatever). Advances the step on a fixed wall-clock cadence
/// while playing, and pauses itself once the route runs out.
pub struct StepFeed {
    playing: bool,
    interval: Duration,
    since_last: Duration,
}

impl StepFeed {
    pub fn new(interval: Duration) -> Self {
        Self {
            playing: false,
            interval,
            since_last: Duration::ZERO,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
        self.since_last = Duration::ZERO;
    }

    /// Returns the new step index when the cadence fires.
    pub fn tick(
        &mut self,
        dt: Duration,
        current: Option<usize>,
        num_waypoints: usize,
    ) -> Option<usize> {
        if !self.playing || num_waypoints == 0 {
            return None;
        }
        self.since_last += dt;
        if self.since_last < self.interval {
            return None;
        }
        self.since_last = Duration::ZERO;
        match next_step(current, num_waypoints) {
            Some(next) => Some(next),
            None => {
                self.pause();
                None
            }
        }
    }
}

pub fn next_step(current: Option<usize>, num_waypoints: usize) -> Option<usize> {
    let next = current.map_or(0, |idx| idx + 1);
    if next < num_waypoints {
        Some(next)
    } else {
        None
    }
}
