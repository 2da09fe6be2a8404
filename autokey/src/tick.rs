use embassy_time::{Duration, Instant};

/// Periodic timer flag.
pub trait TickSource {
    /// Returns true once per elapsed period and clears the flag.
    fn take_elapsed(&mut self) -> bool;
}

/// A closure polling a hardware flag, e.g. a timer overflow bit cleared on read.
impl<F: FnMut() -> bool> TickSource for F {
    fn take_elapsed(&mut self) -> bool {
        self()
    }
}

/// Tick source driven by the embassy-time clock.
///
/// Deadlines advance by exactly one period per reported edge, so a loop that falls behind gets
/// one edge per call until it has caught up and no tick is lost.
pub struct TimerTick {
    period: Duration,
    deadline: Instant,
}

impl TimerTick {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            deadline: Instant::now() + period,
        }
    }
}

impl TickSource for TimerTick {
    fn take_elapsed(&mut self) -> bool {
        if Instant::now() < self.deadline {
            return false;
        }
        self.deadline += self.period;
        true
    }
}

/// Down-samples timer edges: fires once every `divider` edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickDivider {
    divider: u8,
    count: u8,
}

impl TickDivider {
    /// A divider of 0 is treated as 1.
    pub fn new(divider: u8) -> Self {
        Self {
            divider: divider.max(1),
            count: 0,
        }
    }

    /// Count one edge, true when this edge completes a period.
    pub fn on_edge(&mut self) -> bool {
        self.count += 1;
        if self.count >= self.divider {
            self.count = 0;
            true
        } else {
            false
        }
    }
}
