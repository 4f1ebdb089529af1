//! Food machine state from position sensors
//!
//! The dispenser has a tray home switch (closed while the tray is fully
//! retracted) and a carousel motion sensor (active while the food carousel
//! turns). The hub firmware drives the motors; this driver only watches
//! the sensors and derives the machine state from them.

use embedded_hal::digital::InputPin;
use lightshow_core::traits::FoodmachineState;

use super::InputError;

/// Food machine sensor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FoodmachineConfig {
    /// If true, the tray switch reads low when the tray is home
    pub tray_home_active_low: bool,
    /// If true, the carousel sensor reads low while turning
    pub carousel_active_low: bool,
    /// Samples the tray takes to travel fully in or out
    pub travel_samples: u8,
}

impl Default for FoodmachineConfig {
    fn default() -> Self {
        Self {
            tray_home_active_low: true,
            carousel_active_low: true,
            travel_samples: 20,
        }
    }
}

/// Food machine state tracker
pub struct Foodmachine<T, C> {
    tray_home: T,
    carousel: C,
    config: FoodmachineConfig,
    state: FoodmachineState,
    /// Samples spent in the current travel state
    travel_count: u8,
    /// At least one sample has been taken
    sampled: bool,
}

impl<T: InputPin, C: InputPin> Foodmachine<T, C> {
    /// Create a new tracker
    pub fn new(tray_home: T, carousel: C, config: FoodmachineConfig) -> Self {
        Self {
            tray_home,
            carousel,
            config,
            state: FoodmachineState::Idle,
            travel_count: 0,
            sampled: false,
        }
    }

    /// Sample both sensors once and update the state
    pub fn sample(&mut self) -> Result<FoodmachineState, InputError> {
        let home_high = self.tray_home.is_high().map_err(|_| InputError::Pin)?;
        let turning_high = self.carousel.is_high().map_err(|_| InputError::Pin)?;
        let tray_home = home_high != self.config.tray_home_active_low;
        let turning = turning_high != self.config.carousel_active_low;

        self.state = self.next_state(tray_home, turning);
        self.sampled = true;
        Ok(self.state)
    }

    fn next_state(&mut self, tray_home: bool, turning: bool) -> FoodmachineState {
        use FoodmachineState::*;

        let next = match (self.state, tray_home) {
            // Tray home: idle unless the carousel turns, or still settling in
            (Retracting, true) if self.travel_count < self.config.travel_samples => Retracting,
            (Dispensing | TrayExtended | Retracting, true) if !turning => {
                if matches!(self.state, Retracting) {
                    Idle
                } else {
                    Retracting
                }
            }
            (_, true) if turning => Spinning,
            (_, true) => Idle,

            // Tray out: moving out first, then extended
            (Idle | Spinning, false) => Dispensing,
            (Dispensing, false) if self.travel_count < self.config.travel_samples => Dispensing,
            (_, false) => TrayExtended,
        };

        if next == self.state {
            self.travel_count = self.travel_count.saturating_add(1);
        } else {
            self.travel_count = 1;
        }

        next
    }

    /// Get the current state
    pub fn state(&self) -> FoodmachineState {
        self.state
    }

    /// Check if the sensors have been read at least once
    pub fn is_settled(&self) -> bool {
        self.sampled
    }
}
