use geom::{Duration, LonLat};

use crate::{bearing, Waypoint};

/// Intentionally a bit under the expected 4s step cadence, so a tween
/// normally finishes before the next step arrives.
const TWEEN_SECONDS: f64 = 3.8;

/// One time-boxed transition of the vehicle marker between two waypoints.
struct Tween {
    start: LonLat,
    end: LonLat,
    end_step: usize,
    elapsed: Duration,
}

impl Tween {
    /// Lerps longitude and latitude independently. This is planar, not
    /// great-circle; stops are city-scale, where the difference is invisible.
    fn position_at(&self, progress: f64) -> LonLat {
        if progress >= 1.0 {
            // Snap to the stored endpoint, avoiding float drift
            return self.end;
        }
        LonLat::new(
            self.start.x() + (self.end.x() - self.start.x()) * progress,
            self.start.y() + (self.end.y() - self.start.y()) * progress,
        )
    }
}

/// Drives the vehicle marker between waypoints as the externally-supplied
/// step index changes. At most one tween is ever in flight; a new step
/// cancels the old tween before the new one exists, so position writes can't
/// race.
pub struct Animator {
    /// The step the marker last settled on
    baseline: Option<usize>,
    tween: Option<Tween>,
    /// The last position handed to the renderer
    marker: Option<LonLat>,
}

impl Animator {
    pub fn new() -> Self {
        Self {
            baseline: None,
            tween: None,
            marker: None,
        }
    }

    /// Call when the step index changes. Any in-flight tween is cancelled and
    /// its end step becomes the committed baseline, so a preempting
    /// transition runs old-target -> new-target, never a blend of three
    /// points.
    pub fn on_step_change(&mut self, current_step: Option<usize>, waypoints: &[Waypoint]) {
        if let Some(cancelled) = self.tween.take() {
            self.baseline = Some(cancelled.end_step);
            self.marker = Some(cancelled.end);
        }

        let step = match current_step {
            Some(step) => step,
            None => {
                return;
            }
        };
        let end = match waypoints.get(step).and_then(|wp| wp.position) {
            Some(pos) => pos,
            None => {
                // Can't tween to nowhere; the marker stays put
                return;
            }
        };

        let start = self
            .baseline
            .and_then(|idx| waypoints.get(idx).and_then(|wp| wp.position));
        match start {
            Some(start) if self.baseline != Some(step) => {
                self.tween = Some(Tween {
                    start,
                    end,
                    end_step: step,
                    elapsed: Duration::ZERO,
                });
            }
            _ => {
                // No valid starting waypoint (first step, or the previous
                // position was malformed), so just place the marker
                self.baseline = Some(step);
                self.marker = Some(end);
            }
        }
    }

    /// Advances wall-clock time and returns the current marker position.
    /// Elapsed time only grows, so positions for one transition are monotonic
    /// in progress. Completion snaps exactly to the end waypoint.
    pub fn advance(&mut self, dt: Duration) -> Option<LonLat> {
        if let Some(mut tween) = self.tween.take() {
            tween.elapsed += dt;
            let progress = tween.elapsed / Duration::seconds(TWEEN_SECONDS);
            if progress >= 1.0 {
                self.baseline = Some(tween.end_step);
                self.marker = Some(tween.end);
            } else {
                self.marker = Some(tween.position_at(progress));
                self.tween = Some(tween);
            }
        }
        self.marker
    }

    pub fn is_tweening(&self) -> bool {
        self.tween.is_some()
    }

    pub fn marker(&self) -> Option<LonLat> {
        self.marker
    }

    /// Compass heading of the in-flight transition, if any
    pub fn heading(&self) -> Option<f64> {
        self.tween.as_ref().map(|t| bearing(t.start, t.end))
    }

    /// Forget all progress, e.g. when the route changes wholesale
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Three stops on one parallel, the last one the terminus.
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

    fn pos(wps: &[Waypoint], idx: usize) -> LonLat {
        wps[idx].position.unwrap()
    }

    #[test]
    fn not_started_is_a_noop() {
        let mut animator = Animator::new();
        animator.on_step_change(None, &waypoints());
        assert!(!animator.is_tweening());
        assert_eq!(animator.advance(Duration::seconds(1.0)), None);
    }

    #[test]
    fn first_step_snaps_without_tweening() {
        let wps = waypoints();
        let mut animator = Animator::new();
        animator.on_step_change(Some(0), &wps);
        assert!(!animator.is_tweening());
        assert_eq!(animator.marker(), Some(pos(&wps, 0)));
    }

    #[test]
    fn tween_starts_at_start_and_ends_exactly_at_end() {
        let wps = waypoints();
        let mut animator = Animator::new();
        animator.on_step_change(Some(0), &wps);
        animator.on_step_change(Some(1), &wps);
        assert!(animator.is_tweening());

        // progress 0
        let at_start = animator.advance(Duration::ZERO).unwrap();
        assert_eq!(at_start, pos(&wps, 0));

        // halfway, roughly between A and B
        let halfway = animator.advance(Duration::seconds(1.9)).unwrap();
        assert!((halfway.x() - 15.0).abs() < 1e-9);
        assert!((halfway.y() - 10.0).abs() < 1e-9);

        // completion snaps to B's stored position, bit-for-bit
        let done = animator.advance(Duration::seconds(10.0)).unwrap();
        assert_eq!(done, pos(&wps, 1));
        assert!(!animator.is_tweening());
    }

    #[test]
    fn marker_sits_at_start_until_time_passes() {
        let wps = waypoints();
        let mut animator = Animator::new();
        animator.on_step_change(Some(0), &wps);
        animator.on_step_change(Some(1), &wps);
        // Before any time is charged to the tween, the renderable position
        // is exactly the start waypoint
        assert!(animator.is_tweening());
        assert_eq!(animator.marker(), Some(pos(&wps, 0)));
    }

    #[test]
    fn positions_are_monotonic_in_progress() {
        let wps = waypoints();
        let mut animator = Animator::new();
        animator.on_step_change(Some(0), &wps);
        animator.on_step_change(Some(1), &wps);

        let mut last_lon = f64::MIN;
        for _ in 0..100 {
            if let Some(pos) = animator.advance(Duration::seconds(0.05)) {
                assert!(pos.x() >= last_lon);
                last_lon = pos.x();
            }
        }
        assert_eq!(animator.marker(), Some(pos(&wps, 1)));
    }

    #[test]
    fn preemption_keeps_a_single_tween() {
        let wps = waypoints();
        let mut animator = Animator::new();
        animator.on_step_change(Some(0), &wps);
        animator.on_step_change(Some(1), &wps);
        // Partway through A -> B, the next step arrives early
        animator.advance(Duration::seconds(1.0));
        animator.on_step_change(Some(2), &wps);
        assert!(animator.is_tweening());

        // The new tween starts from B (the cancelled tween's target), not
        // from mid-air
        let at_start = animator.advance(Duration::ZERO).unwrap();
        assert_eq!(at_start, pos(&wps, 1));

        // And finishes exactly at C, never a blend of three points
        let done = animator.advance(Duration::seconds(4.0)).unwrap();
        assert_eq!(done, pos(&wps, 2));
        assert!(!animator.is_tweening());
    }

    #[test]
    fn skipping_steps_tweens_directly() {
        let wps = waypoints();
        let mut animator = Animator::new();
        animator.on_step_change(Some(0), &wps);
        // The feed jumped from 0 straight to 2
        animator.on_step_change(Some(2), &wps);
        let halfway = animator.advance(Duration::seconds(1.9)).unwrap();
        assert!((halfway.x() - 20.0).abs() < 1e-9);
        let done = animator.advance(Duration::seconds(4.0)).unwrap();
        assert_eq!(done, pos(&wps, 2));
    }

    #[test]
    fn malformed_end_skips_the_tween() {
        let mut wps = waypoints();
        wps[1].position = None;
        let mut animator = Animator::new();
        animator.on_step_change(Some(0), &wps);
        animator.on_step_change(Some(1), &wps);
        assert!(!animator.is_tweening());
        // Marker stays at the last known position
        assert_eq!(animator.marker(), Some(pos(&wps, 0)));

        // The next valid step tweens from A, the last committed baseline
        animator.on_step_change(Some(2), &wps);
        assert!(animator.is_tweening());
        assert_eq!(animator.advance(Duration::ZERO), Some(pos(&wps, 0)));
    }

    #[test]
    fn full_journey() {
        use crate::{classify, StopStatus};

        let wps = waypoints();
        let mut animator = Animator::new();

        animator.on_step_change(None, &wps);
        assert_eq!(animator.marker(), None);

        animator.on_step_change(Some(0), &wps);
        assert_eq!(animator.marker(), Some(pos(&wps, 0)));

        animator.on_step_change(Some(1), &wps);
        animator.advance(Duration::seconds(5.0));
        assert_eq!(animator.marker(), Some(pos(&wps, 1)));
        assert_eq!(
            classify(&wps, Some(1)),
            vec![
                StopStatus::Completed,
                StopStatus::Current,
                StopStatus::Destination
            ]
        );

        animator.on_step_change(Some(2), &wps);
        animator.advance(Duration::seconds(5.0));
        assert_eq!(animator.marker(), Some(pos(&wps, 2)));
    }

    #[test]
    fn heading_points_along_the_transition() {
        let wps = waypoints();
        let mut animator = Animator::new();
        assert_eq!(animator.heading(), None);
        animator.on_step_change(Some(0), &wps);
        animator.on_step_change(Some(1), &wps);
        // Eastbound along a parallel at lat 10; the initial great-circle
        // bearing is close to, but not exactly, 90
        let heading = animator.heading().unwrap();
        assert!((heading - 90.0).abs() < 2.0);
    }
}
