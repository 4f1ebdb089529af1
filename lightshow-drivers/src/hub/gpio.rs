//! GPIO/PWM hub driver
//!
//! A [`HubDriver`] built from plain board peripherals: three PWM RGB pad
//! lights, three touch pads on input pins and the food machine sensors.
//!
//! The hub is ready once it has been initialized, every pad has a
//! debounced state and the food machine sensors have been read. A pad
//! that reads pressed for too long is resynced on the next run, unless
//! the recalibration lock is held; a resync makes the hub briefly not
//! ready while the pad settles again.
//!
//! There is no speaker on this board, so audio requests are dropped.

use embedded_hal::digital::InputPin;
use embedded_hal::pwm::SetDutyCycle;
use heapless::String;
use lightshow_core::config::MAX_LABEL_LEN;
use lightshow_core::traits::{
    AudioClip, FoodmachineState, HubDriver, LightColor, LightPosition,
};

use crate::input::{Foodmachine, InputError, Pad};
use crate::light::{LightError, PwmLight};

/// Hardware fault seen by the hub
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HubFault {
    /// Pad light output failed
    Light(LightPosition, LightError),
    /// Pad pin read failed
    Pad(LightPosition, InputError),
    /// Food machine sensor read failed
    Foodmachine(InputError),
}

/// Hub built from GPIO and PWM peripherals
pub struct GpioHub<R, G, B, P, T, C> {
    lights: [PwmLight<R, G, B>; 3],
    pads: [Pad<P>; 3],
    foodmachine: Foodmachine<T, C>,
    /// Application name given at initialization
    app_name: String<MAX_LABEL_LEN>,
    initialized: bool,
    recalibration_locked: bool,
    /// Pad resyncs performed
    resyncs: u32,
    /// Most recent fault, cleared by [`GpioHub::take_fault`]
    fault: Option<HubFault>,
}

impl<R, G, B, P, T, C> GpioHub<R, G, B, P, T, C>
where
    R: SetDutyCycle,
    G: SetDutyCycle,
    B: SetDutyCycle,
    P: InputPin,
    T: InputPin,
    C: InputPin,
{
    /// Create a new hub
    ///
    /// Lights and pads are ordered left, middle, right.
    pub fn new(
        lights: [PwmLight<R, G, B>; 3],
        pads: [Pad<P>; 3],
        foodmachine: Foodmachine<T, C>,
    ) -> Self {
        Self {
            lights,
            pads,
            foodmachine,
            app_name: String::new(),
            initialized: false,
            recalibration_locked: false,
            resyncs: 0,
            fault: None,
        }
    }

    /// Application name given at initialization
    pub fn app_name(&self) -> &str {
        self.app_name.as_str()
    }

    /// Check if the recalibration lock is held
    pub fn is_recalibration_locked(&self) -> bool {
        self.recalibration_locked
    }

    /// Number of pad resyncs performed
    pub fn resyncs(&self) -> u32 {
        self.resyncs
    }

    /// Current color of a pad light
    pub fn light(&self, position: LightPosition) -> LightColor {
        self.lights[position.index()].color()
    }

    /// Take the most recent fault, if any
    pub fn take_fault(&mut self) -> Option<HubFault> {
        self.fault.take()
    }

    fn sample_inputs(&mut self) {
        for (pad, position) in self.pads.iter_mut().zip(LightPosition::ALL) {
            if let Err(e) = pad.sample() {
                self.fault = Some(HubFault::Pad(position, e));
            }
        }

        if let Err(e) = self.foodmachine.sample() {
            self.fault = Some(HubFault::Foodmachine(e));
        }
    }

    fn resync_stuck_pads(&mut self) {
        if self.recalibration_locked {
            return;
        }

        for pad in self.pads.iter_mut().filter(|p| p.is_stuck()) {
            pad.resync();
            self.resyncs = self.resyncs.wrapping_add(1);
        }
    }
}

impl<R, G, B, P, T, C> HubDriver for GpioHub<R, G, B, P, T, C>
where
    R: SetDutyCycle,
    G: SetDutyCycle,
    B: SetDutyCycle,
    P: InputPin,
    T: InputPin,
    C: InputPin,
{
    fn initialize(&mut self, app_name: &str) {
        self.app_name.clear();
        for c in app_name.chars() {
            if self.app_name.push(c).is_err() {
                break;
            }
        }

        for (light, position) in self.lights.iter_mut().zip(LightPosition::ALL) {
            if let Err(e) = light.off() {
                self.fault = Some(HubFault::Light(position, e));
            }
        }
        for pad in self.pads.iter_mut() {
            pad.resync();
        }

        self.recalibration_locked = false;
        self.initialized = true;
    }

    fn is_ready(&self) -> bool {
        self.initialized
            && self.pads.iter().all(|p| p.is_settled())
            && self.foodmachine.is_settled()
    }

    fn foodmachine_state(&self) -> FoodmachineState {
        self.foodmachine.state()
    }

    fn any_button_pressed(&self) -> bool {
        self.pads.iter().any(|p| p.is_pressed())
    }

    fn set_recalibration_lock(&mut self, locked: bool) {
        self.recalibration_locked = locked;
    }

    fn set_light(&mut self, position: LightPosition, color: LightColor) {
        if let Err(e) = self.lights[position.index()].set(color) {
            self.fault = Some(HubFault::Light(position, e));
        }
    }

    fn play_audio(&mut self, _clip: AudioClip, _volume: u8) {}

    fn run(&mut self, _budget_ms: u32) {
        // One sample of each input is far below any useful budget
        if !self.initialized {
            return;
        }

        self.sample_inputs();
        self.resync_stuck_pads();
    }
}
