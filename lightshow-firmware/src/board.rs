//! Board wiring
//!
//! Pin assignment for the RP2040 hub board:
//!
//! | Function             | GPIO  | PWM      |
//! |----------------------|-------|----------|
//! | Left pad LED R/G/B   | 0-2   | 0A 0B 1A |
//! | Middle pad LED R/G/B | 3-5   | 1B 2A 2B |
//! | Right pad LED R/G/B  | 6-8   | 3A 3B 4A |
//! | Left/Middle/Right pad| 10-12 | -        |
//! | Tray home switch     | 13    | -        |
//! | Carousel sensor      | 14    | -        |
//!
//! The pad LEDs are common cathode. Pads and the tray switch pull the
//! pin low when active, so all inputs use the internal pull-up.

use embassy_rp::gpio::{Input, Pull};
use embassy_rp::pwm::{self, Pwm, PwmOutput};
use embassy_rp::Peripherals;
use lightshow_drivers::hub::GpioHub;
use lightshow_drivers::input::{Foodmachine, FoodmachineConfig, Pad, PadConfig};
use lightshow_drivers::light::PwmLight;

/// PWM frequency for the pad LEDs (Hz)
const LED_PWM_FREQ_HZ: u32 = 1_000;

/// One PWM channel of a pad LED
pub type LedChannel = PwmOutput<'static>;

/// Pad light as wired on this board
pub type BoardLight = PwmLight<LedChannel, LedChannel, LedChannel>;

/// Hub as wired on this board
pub type BoardHub =
    GpioHub<LedChannel, LedChannel, LedChannel, Input<'static>, Input<'static>, Input<'static>>;

/// Board bring-up error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoardError {
    /// A PWM slice did not hand out a configured channel
    MissingPwmChannel,
}

/// PWM config for LED dimming
fn led_pwm_config() -> pwm::Config {
    let clock_freq_hz = embassy_rp::clocks::clk_sys_freq();

    // Smallest divider that keeps the period within 16 bits
    let divider = ((clock_freq_hz / LED_PWM_FREQ_HZ) / 65535 + 1) as u8;
    let period = (clock_freq_hz / (LED_PWM_FREQ_HZ * divider as u32)) as u16 - 1;

    let mut config = pwm::Config::default();
    config.divider = divider.into();
    config.top = period;
    config
}

/// Split a slice driving both channels
fn channels_ab(pwm: Pwm<'static>) -> Result<(LedChannel, LedChannel), BoardError> {
    match pwm.split() {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(BoardError::MissingPwmChannel),
    }
}

/// Split a slice driving channel A only
fn channel_a(pwm: Pwm<'static>) -> Result<LedChannel, BoardError> {
    pwm.split().0.ok_or(BoardError::MissingPwmChannel)
}

/// Build the hub from the board peripherals
pub fn build_hub(p: Peripherals) -> Result<BoardHub, BoardError> {
    let cfg = led_pwm_config();

    let (left_r, left_g) = channels_ab(Pwm::new_output_ab(p.PWM_SLICE0, p.PIN_0, p.PIN_1, cfg.clone()))?;
    let (left_b, middle_r) = channels_ab(Pwm::new_output_ab(p.PWM_SLICE1, p.PIN_2, p.PIN_3, cfg.clone()))?;
    let (middle_g, middle_b) = channels_ab(Pwm::new_output_ab(p.PWM_SLICE2, p.PIN_4, p.PIN_5, cfg.clone()))?;
    let (right_r, right_g) = channels_ab(Pwm::new_output_ab(p.PWM_SLICE3, p.PIN_6, p.PIN_7, cfg.clone()))?;
    let right_b = channel_a(Pwm::new_output_a(p.PWM_SLICE4, p.PIN_8, cfg))?;

    let lights: [BoardLight; 3] = [
        PwmLight::new_common_cathode(left_r, left_g, left_b),
        PwmLight::new_common_cathode(middle_r, middle_g, middle_b),
        PwmLight::new_common_cathode(right_r, right_g, right_b),
    ];

    let pad_config = PadConfig::default();
    let pads = [
        Pad::new(Input::new(p.PIN_10, Pull::Up), pad_config),
        Pad::new(Input::new(p.PIN_11, Pull::Up), pad_config),
        Pad::new(Input::new(p.PIN_12, Pull::Up), pad_config),
    ];

    // Carousel sensor is open-drain, active low like the tray switch
    let foodmachine = Foodmachine::new(
        Input::new(p.PIN_13, Pull::Up),
        Input::new(p.PIN_14, Pull::Up),
        FoodmachineConfig::default(),
    );

    Ok(GpioHub::new(lights, pads, foodmachine))
}
