//! PWM RGB pad light
//!
//! Each pad has one RGB LED driven by three PWM channels. Hub intensities
//! run 0-99 and are mapped onto the full 0-100% duty range, so 99 is fully
//! on. Common-anode LEDs sink current and need the duty inverted.

use embedded_hal::pwm::SetDutyCycle;
use lightshow_core::traits::{LightColor, MAX_INTENSITY};

/// Errors from the light outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LightError {
    /// A PWM channel rejected the duty cycle
    Pwm,
}

/// Map a hub intensity (0-99) to a duty percentage (0-100)
pub fn intensity_to_percent(intensity: u8) -> u8 {
    let intensity = intensity.min(MAX_INTENSITY) as u16;
    let max = MAX_INTENSITY as u16;
    ((intensity * 100 + max / 2) / max) as u8
}

/// RGB pad light on three PWM channels
pub struct PwmLight<R, G, B> {
    red: R,
    green: G,
    blue: B,
    /// If true, 100% duty = LED off (common anode)
    inverted: bool,
    /// Last color applied successfully
    color: LightColor,
}

impl<R: SetDutyCycle, G: SetDutyCycle, B: SetDutyCycle> PwmLight<R, G, B> {
    /// Create a new light
    ///
    /// # Arguments
    /// - `red`, `green`, `blue`: PWM channels for each color
    /// - `inverted`: If true, the LED lights at low duty (common anode)
    pub fn new(red: R, green: G, blue: B, inverted: bool) -> Self {
        let mut light = Self {
            red,
            green,
            blue,
            inverted,
            color: LightColor::OFF,
        };
        // Ensure light starts dark
        let _ = light.apply(LightColor::OFF);
        light
    }

    /// Create a light for a common-cathode LED
    pub fn new_common_cathode(red: R, green: G, blue: B) -> Self {
        Self::new(red, green, blue, false)
    }

    /// Create a light for a common-anode LED
    pub fn new_common_anode(red: R, green: G, blue: B) -> Self {
        Self::new(red, green, blue, true)
    }

    /// Set the light color
    pub fn set(&mut self, color: LightColor) -> Result<(), LightError> {
        self.apply(color)?;
        self.color = color;
        Ok(())
    }

    /// Turn all channels off
    pub fn off(&mut self) -> Result<(), LightError> {
        self.set(LightColor::OFF)
    }

    /// Get the last color applied
    pub fn color(&self) -> LightColor {
        self.color
    }

    fn apply(&mut self, color: LightColor) -> Result<(), LightError> {
        let inverted = self.inverted;
        set_channel(&mut self.red, color.red, inverted)?;
        set_channel(&mut self.green, color.green, inverted)?;
        set_channel(&mut self.blue, color.blue, inverted)
    }
}

fn set_channel<P: SetDutyCycle>(
    channel: &mut P,
    intensity: u8,
    inverted: bool,
) -> Result<(), LightError> {
    let percent = intensity_to_percent(intensity);
    let percent = if inverted { 100 - percent } else { percent };
    channel
        .set_duty_cycle_percent(percent)
        .map_err(|_| LightError::Pwm)
}
