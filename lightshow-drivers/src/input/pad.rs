//! Debounced touch pad
//!
//! A pad reports a press only after the raw level has held steady for
//! `debounce_samples` consecutive samples. A pad that reads pressed for
//! `stuck_samples` in a row is treated as drifted and asks for a resync,
//! which forgets the debounced state and re-learns it from scratch.

use embedded_hal::digital::InputPin;

use super::InputError;

/// Pad configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PadConfig {
    /// If true, a pressed pad pulls the pin low
    pub active_low: bool,
    /// Consecutive equal samples before a level is accepted
    pub debounce_samples: u8,
    /// Consecutive pressed samples before the pad counts as stuck
    pub stuck_samples: u16,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            active_low: true,
            debounce_samples: 5,
            stuck_samples: 3000,
        }
    }
}

/// Debounced touch pad
pub struct Pad<P> {
    pin: P,
    config: PadConfig,
    /// Debounced state
    pressed: bool,
    /// Raw level being counted
    candidate: bool,
    /// Consecutive samples at `candidate`
    stable_count: u8,
    /// Debounced state has been established since the last resync
    settled: bool,
    /// Consecutive samples with the debounced state pressed
    held_samples: u16,
}

impl<P: InputPin> Pad<P> {
    /// Create a new pad
    pub fn new(pin: P, config: PadConfig) -> Self {
        Self {
            pin,
            config,
            pressed: false,
            candidate: false,
            stable_count: 0,
            settled: false,
            held_samples: 0,
        }
    }

    /// Sample the pin once
    ///
    /// Returns true if the debounced state changed.
    pub fn sample(&mut self) -> Result<bool, InputError> {
        let high = self.pin.is_high().map_err(|_| InputError::Pin)?;
        let raw = high != self.config.active_low;

        if raw == self.candidate {
            self.stable_count = self.stable_count.saturating_add(1);
        } else {
            self.candidate = raw;
            self.stable_count = 1;
        }

        let mut changed = false;
        if self.stable_count >= self.config.debounce_samples {
            changed = self.settled && self.pressed != self.candidate;
            self.pressed = self.candidate;
            self.settled = true;
        }

        if self.settled && self.pressed {
            self.held_samples = self.held_samples.saturating_add(1);
        } else {
            self.held_samples = 0;
        }

        Ok(changed)
    }

    /// Check if the pad is pressed (debounced)
    pub fn is_pressed(&self) -> bool {
        self.settled && self.pressed
    }

    /// Check if a debounced state has been established
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Check if the pad has read pressed for too long
    pub fn is_stuck(&self) -> bool {
        self.held_samples >= self.config.stuck_samples
    }

    /// Forget the debounced state and re-learn it
    pub fn resync(&mut self) {
        self.pressed = false;
        self.candidate = false;
        self.stable_count = 0;
        self.settled = false;
        self.held_samples = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    /// Mock input pin
    struct MockPin {
        high: bool,
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl InputPin for MockPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.high)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.high)
        }
    }

    fn config() -> PadConfig {
        PadConfig {
            active_low: true,
            debounce_samples: 3,
            stuck_samples: 10,
        }
    }

    /// Pad with the pin idle (high, active-low)
    fn idle_pad() -> Pad<MockPin> {
        Pad::new(MockPin { high: true }, config())
    }

    fn sample_n(pad: &mut Pad<MockPin>, n: usize) {
        for _ in 0..n {
            pad.sample().unwrap();
        }
    }

    #[test]
    fn test_settles_after_debounce() {
        let mut pad = idle_pad();
        sample_n(&mut pad, 2);
        assert!(!pad.is_settled());
        sample_n(&mut pad, 1);
        assert!(pad.is_settled());
        assert!(!pad.is_pressed());
    }

    #[test]
    fn test_press_and_release() {
        let mut pad = idle_pad();
        sample_n(&mut pad, 3);

        pad.pin.high = false;
        assert!(!pad.sample().unwrap());
        assert!(!pad.sample().unwrap());
        assert!(pad.sample().unwrap());
        assert!(pad.is_pressed());

        pad.pin.high = true;
        sample_n(&mut pad, 3);
        assert!(!pad.is_pressed());
    }

    #[test]
    fn test_bounce_is_ignored() {
        let mut pad = idle_pad();
        sample_n(&mut pad, 3);

        for _ in 0..10 {
            pad.pin.high = !pad.pin.high;
            pad.sample().unwrap();
        }
        assert!(!pad.is_pressed());
    }

    #[test]
    fn test_active_high_pad() {
        let mut pad = Pad::new(
            MockPin { high: true },
            PadConfig {
                active_low: false,
                ..config()
            },
        );
        sample_n(&mut pad, 3);
        assert!(pad.is_pressed());
    }

    #[test]
    fn test_stuck_and_resync() {
        let mut pad = idle_pad();
        pad.pin.high = false;
        sample_n(&mut pad, 12);
        assert!(pad.is_stuck());

        pad.resync();
        assert!(!pad.is_settled());
        assert!(!pad.is_pressed());
        assert!(!pad.is_stuck());
    }
}
