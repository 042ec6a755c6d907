use std::time::Duration;

/// Converts variable frame times into a whole number of fixed simulation ticks.
#[derive(Debug)]
pub(crate) struct FrameClock {
    tick: Duration,
    accumulator: Duration,
    max_ticks_per_frame: u32,
}

impl FrameClock {
    /// Creates a clock running `ticks_per_second` fixed ticks.
    ///
    /// A single frame never yields more than `max_ticks_per_frame` ticks; time
    /// beyond that is dropped so a stalled window does not fast-forward.
    pub(crate) fn new(ticks_per_second: u32, max_ticks_per_frame: u32) -> Self {
        Self {
            tick: Duration::from_secs(1) / ticks_per_second.max(1),
            accumulator: Duration::ZERO,
            max_ticks_per_frame,
        }
    }

    /// Accumulates `frame` and returns how many ticks are due.
    pub(crate) fn advance(&mut self, frame: Duration) -> u32 {
        self.accumulator += frame;

        let mut due = 0;
        while self.accumulator >= self.tick && due < self.max_ticks_per_frame {
            self.accumulator -= self.tick;
            due += 1;
        }

        if due == self.max_ticks_per_frame {
            self.accumulator = self.accumulator.min(self.tick);
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixty_hz_clock_yields_one_tick_per_vsync_frame() {
        let mut clock = FrameClock::new(60, 8);
        let frame = Duration::from_secs(1) / 60;

        let ticks: u32 = (0..60).map(|_| clock.advance(frame)).sum();

        assert_eq!(ticks, 60);
    }

    #[test]
    fn short_frames_accumulate_until_a_tick_is_due() {
        let mut clock = FrameClock::new(50, 8);
        let frame = Duration::from_millis(5);

        let ticks: Vec<u32> = (0..8).map(|_| clock.advance(frame)).collect();

        assert_eq!(ticks, vec![0, 0, 0, 1, 0, 0, 0, 1]);
    }

    #[test]
    fn long_stalls_are_capped() {
        let mut clock = FrameClock::new(60, 8);

        assert_eq!(clock.advance(Duration::from_secs(2)), 8);
        assert_eq!(clock.advance(Duration::ZERO), 1);
        assert_eq!(clock.advance(Duration::ZERO), 0);
    }
}
