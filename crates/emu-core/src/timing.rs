//! Master clock and the tickable component trait.

/// Crystal frequency of a machine, with the dividers derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasterClock {
    /// Crystal frequency in Hz (`21_477_272` for an NTSC console).
    pub frequency_hz: u64,
}

impl MasterClock {
    #[must_use]
    pub const fn new(frequency_hz: u64) -> Self {
        Self { frequency_hz }
    }

    /// Rate of a component clocked at `frequency_hz / divider`.
    #[must_use]
    pub const fn divided(&self, divider: u64) -> u64 {
        self.frequency_hz / divider
    }
}

/// A component advanced one step of its own clock at a time.
pub trait Tickable {
    /// Advance by one step.
    fn tick(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ntsc_cpu_rate_divides_crystal_by_twelve() {
        let clock = MasterClock::new(21_477_272);
        assert_eq!(clock.divided(12), 1_789_772);
        assert_eq!(clock.divided(4), 5_369_318);
    }
}
