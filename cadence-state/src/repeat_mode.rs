use serde::{Deserialize, Serialize};

/// What happens when the end of the current track or queue is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RepeatMode {
    /// Stops at the end of the queue.
    #[default]
    Off,
    /// Loops the current track.
    One,
    /// Loops the whole queue.
    All,
}

impl RepeatMode {
    /// Returns a human-readable name for the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            RepeatMode::Off => "Off",
            RepeatMode::One => "Repeat One",
            RepeatMode::All => "Repeat All",
        }
    }

    /// The mode after this one when cycling with a single button: Off → All → One → Off.
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }
}

impl std::fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_visits_every_mode() {
        let mut mode = RepeatMode::default();
        let mut seen = vec![mode];
        for _ in 0..3 {
            mode = mode.cycle();
            seen.push(mode);
        }
        assert_eq!(
            seen,
            [
                RepeatMode::Off,
                RepeatMode::All,
                RepeatMode::One,
                RepeatMode::Off
            ]
        );
    }
}
