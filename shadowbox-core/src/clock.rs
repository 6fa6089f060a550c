/// Frame timing with bounded, smoothed deltas
use std::time::Instant;

/// Delta reported on the very first tick, before any sample exists.
pub const NOMINAL_DELTA: f32 = 1.0 / 60.0;
/// Longest raw frame time accepted (stalls, breakpoints).
pub const MAX_DELTA: f32 = 0.033;
/// Shortest raw frame time accepted.
pub const MIN_DELTA: f32 = 0.001;

const PREVIOUS_WEIGHT: f32 = 0.7;
const SAMPLE_WEIGHT: f32 = 0.3;

/// Produces one smoothed time step per rendered frame.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    delta: f32,
    frame_count: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: None,
            delta: NOMINAL_DELTA,
            frame_count: 0,
        }
    }

    /// Sample the wall clock and return this frame's delta in seconds.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// Advance the clock using an explicit timestamp.
    ///
    /// Timestamps earlier than the previous sample count as a zero-length
    /// frame and are clamped up to [`MIN_DELTA`].
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        self.delta = match self.last {
            None => NOMINAL_DELTA,
            Some(last) => {
                let raw = now
                    .saturating_duration_since(last)
                    .as_secs_f32()
                    .clamp(MIN_DELTA, MAX_DELTA);
                // Re-clamp so rounding in the blend cannot leave the range.
                (self.delta * PREVIOUS_WEIGHT + raw * SAMPLE_WEIGHT).clamp(MIN_DELTA, MAX_DELTA)
            }
        };
        self.last = Some(now);
        self.frame_count += 1;
        self.delta
    }

    /// Delta returned by the most recent tick.
    pub fn delta(&self) -> f32 {
        self.delta
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_first_tick_is_nominal() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick_at(Instant::now()), 1.0 / 60.0);
        assert_eq!(clock.frame_count(), 1);
    }

    #[test]
    fn test_deltas_stay_bounded() {
        let mut clock = FrameClock::new();
        let mut now = Instant::now();
        clock.tick_at(now);

        let gaps_ms = [0u64, 0, 1, 5, 16, 250, 5000, 0, 33, 2, 100, 0, 0, 0, 0, 0, 0];
        for gap in gaps_ms {
            now += Duration::from_millis(gap);
            let dt = clock.tick_at(now);
            assert!((MIN_DELTA..=MAX_DELTA).contains(&dt), "dt {} out of range", dt);
        }
    }

    #[test]
    fn test_blends_toward_raw_sample() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.tick_at(start);

        let dt = clock.tick_at(start + Duration::from_millis(30));
        let expected = NOMINAL_DELTA * 0.7 + 0.030 * 0.3;
        assert!((dt - expected).abs() < 1e-5);
    }

    #[test]
    fn test_stall_is_clamped_before_blending() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.tick_at(start);

        let dt = clock.tick_at(start + Duration::from_secs(3));
        let expected = NOMINAL_DELTA * 0.7 + MAX_DELTA * 0.3;
        assert!((dt - expected).abs() < 1e-5);
    }

    #[test]
    fn test_backwards_timestamp_counts_as_min_delta() {
        let mut clock = FrameClock::new();
        let start = Instant::now() + Duration::from_secs(1);
        clock.tick_at(start);

        let dt = clock.tick_at(start - Duration::from_millis(500));
        let expected = NOMINAL_DELTA * 0.7 + MIN_DELTA * 0.3;
        assert!((dt - expected).abs() < 1e-5);
    }
}
