/// Free-running baud rate generator.
///
/// Counts `0..period` and pulses on the tick where the counter sits at
/// `period - 1`; the counter wraps to zero on the following tick. It is
/// never restarted by traffic, only by a global reset, so consecutive
/// pulses are always exactly `period` ticks apart.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BaudTimer {
    period: u32,
    counter: u32,
}

impl BaudTimer {
    /// `period` is clamped to at least one tick.
    pub fn new(period: u32) -> Self {
        Self {
            period: period.max(1),
            counter: 0,
        }
    }

    #[inline]
    pub fn period(&self) -> u32 {
        self.period
    }

    #[inline]
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Combinational pulse output for the current tick.
    #[inline]
    pub fn pulse(&self) -> bool {
        self.counter == self.period - 1
    }

    /// Next-state function.
    #[must_use]
    pub fn step(self) -> Self {
        let counter = if self.pulse() { 0 } else { self.counter + 1 };
        Self { counter, ..self }
    }

    pub fn reset(&mut self) {
        self.counter = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::BaudTimer;

    fn pulse_ticks(timer: BaudTimer, ticks: u64) -> Vec<u64> {
        let mut timer = timer;
        let mut pulses = Vec::new();
        for tick in 0..ticks {
            if timer.pulse() {
                pulses.push(tick);
            }
            timer = timer.step();
        }
        pulses
    }

    #[test]
    fn first_pulse_lands_on_period_minus_one() {
        let pulses = pulse_ticks(BaudTimer::new(8), 9);
        assert_eq!(pulses, vec![7]);
    }

    #[test]
    fn pulses_are_exactly_one_period_apart() {
        for period in [1u32, 2, 3, 7, 16, 435] {
            let pulses = pulse_ticks(BaudTimer::new(period), u64::from(period) * 50);
            assert_eq!(pulses.len(), 50, "period {period}");
            for pair in pulses.windows(2) {
                assert_eq!(pair[1] - pair[0], u64::from(period));
            }
        }
    }

    #[test]
    fn period_one_pulses_every_tick() {
        let pulses = pulse_ticks(BaudTimer::new(1), 5);
        assert_eq!(pulses, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn zero_period_is_clamped() {
        assert_eq!(BaudTimer::new(0).period(), 1);
    }

    #[test]
    fn reset_restarts_the_count() {
        let mut timer = BaudTimer::new(4).step().step();
        assert_eq!(timer.counter(), 2);
        timer.reset();
        assert_eq!(timer.counter(), 0);
        assert!(!timer.pulse());
    }
}
