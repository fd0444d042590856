//! # Hardware
//!
//! Everything the core touches outside of its own state goes through the `Hardware` trait: the output pin, the two
//! indicators, the enable switch, both timers and the pulse emitter.
//!
//! `Board` implements `Hardware` for any collection of `embedded-hal` pins plus timer and emitter implementations, so
//! a target only has to provide the register level timer code. The host simulation in `sim` is a `Board` as well.

use embedded_hal::digital::{InputPin, OutputPin};

use crate::{
    config::PulseWidth,
    pulse::PulseEmitter,
    timer::{FrequencyTimer, SafetyTimer, TimerProgram},
};

/// The hardware driven by the interrupter core is represented here
pub trait Hardware {
    /// `hw.set_output(h)` drives the pulse output high if `h` is true, otherwise low
    fn set_output(&mut self, high: bool);

    /// `hw.set_active_indicator(on)` turns the "note active" indicator on or off
    fn set_active_indicator(&mut self, on: bool);

    /// `hw.set_power_indicator(on)` turns the "power/ready" indicator on or off
    fn set_power_indicator(&mut self, on: bool);

    /// `hw.enable_switch_on()` is true if the enable switch allows output
    fn enable_switch_on(&mut self) -> bool;

    /// `hw.start_frequency_timer(p)` programs and starts the frequency timer with program `p`
    fn start_frequency_timer(&mut self, program: &TimerProgram);

    /// `hw.stop_frequency_timer()` stops the frequency timer and clears anything pending
    fn stop_frequency_timer(&mut self);

    /// `hw.arm_safety_timer()` restarts the on-time ceiling countdown
    fn arm_safety_timer(&mut self);

    /// `hw.disarm_safety_timer()` stops the on-time ceiling countdown and resets it
    fn disarm_safety_timer(&mut self);

    /// `hw.emit_pulse(w, d)` fires one pulse of width `w` on the output followed by post delay `d`
    fn emit_pulse(&mut self, width: PulseWidth, post_delay: PulseWidth);
}

/// A board made of individual peripherals is represented here
///
/// The enable switch reads high when output is allowed. A switch that fails to read counts as off.
pub struct Board<Out, Act, Pwr, Sw, Ft, St, Em> {
    pub output: Out,
    pub active_indicator: Act,
    pub power_indicator: Pwr,
    pub enable_switch: Sw,
    pub frequency_timer: Ft,
    pub safety_timer: St,
    pub emitter: Em,
}

impl<Out, Act, Pwr, Sw, Ft, St, Em> Hardware for Board<Out, Act, Pwr, Sw, Ft, St, Em>
where
    Out: OutputPin,
    Act: OutputPin,
    Pwr: OutputPin,
    Sw: InputPin,
    Ft: FrequencyTimer,
    St: SafetyTimer,
    Em: PulseEmitter,
{
    fn set_output(&mut self, high: bool) {
        set_pin(&mut self.output, high);
    }

    fn set_active_indicator(&mut self, on: bool) {
        set_pin(&mut self.active_indicator, on);
    }

    fn set_power_indicator(&mut self, on: bool) {
        set_pin(&mut self.power_indicator, on);
    }

    fn enable_switch_on(&mut self) -> bool {
        self.enable_switch.is_high().unwrap_or(false)
    }

    fn start_frequency_timer(&mut self, program: &TimerProgram) {
        self.frequency_timer.start(program);
    }

    fn stop_frequency_timer(&mut self) {
        self.frequency_timer.stop();
    }

    fn arm_safety_timer(&mut self) {
        self.safety_timer.arm();
    }

    fn disarm_safety_timer(&mut self) {
        self.safety_timer.disarm();
    }

    fn emit_pulse(&mut self, width: PulseWidth, post_delay: PulseWidth) {
        self.emitter.emit_pulse(&mut self.output, width, post_delay);
    }
}

/// `set_pin(p, h)` drives pin `p` high if `h` is true, otherwise low
///
/// Pin errors are dropped, there is nothing the core could do about them.
fn set_pin<P: OutputPin>(pin: &mut P, high: bool) {
    if high {
        pin.set_high().ok();
    } else {
        pin.set_low().ok();
    }
}
