/// When the delay and sound timers count down
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TimerMode {
    /// Only when the host calls `VirtualMachine::tick_timers`, normally at 60Hz
    Host,
    /// Once every `n` executed steps; 0 is treated as 1
    PerStep(u32),
}

impl Default for TimerMode {
    fn default() -> Self {
        TimerMode::Host
    }
}

/// Knobs the host can turn when building a `VirtualMachine`
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    pub timer_mode: TimerMode,
    /// Seed for CXNN; drawn from the OS when absent
    pub seed: Option<u64>,
}

impl Config {
    /// Steps between timer ticks, if the core drives the timers itself
    pub fn steps_per_tick(&self) -> Option<u32> {
        match self.timer_mode {
            TimerMode::Host => None,
            TimerMode::PerStep(n) => Some(n.max(1)),
        }
    }
}

#[cfg(test)]
mod test_config {
    use super::*;

    #[test]
    fn test_default_is_host_driven() {
        let config = Config::default();
        assert_eq!(config.timer_mode, TimerMode::Host);
        assert_eq!(config.steps_per_tick(), None);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_per_step_never_zero() {
        let config = Config {
            timer_mode: TimerMode::PerStep(0),
            seed: None,
        };
        assert_eq!(config.steps_per_tick(), Some(1));
    }
}
