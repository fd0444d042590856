//! # Pulse and duty generation
//!
//! The frequency timer interrupts twice per period:
//!
//! - Compare A, at the start of each period, sets the output and arms the safety timer. In pulse-width mode it fires one
//!   capped pulse through the pulse emitter, which also takes care of dropping the output again. The safety timer is
//!   left armed after the pulse so that an emitter which fails to drop the output still gets cut off. In duty-cycle
//!   mode it raises the output.
//!
//! - Compare B, at the duty point, clears the output in duty-cycle mode. In pulse-width mode it still fires but does
//!   nothing.
//!
//! The safety timer is the last line of defence against an output stuck high. When it expires the output is dropped,
//! whatever mode the interrupter is in and whatever the note state says.

use log::trace;

use crate::{
    config::{OutputMode, PulseWidth},
    hardware::Hardware,
    interrupter::Interrupter,
    lookup::TimingLookup,
};

impl<L: TimingLookup, H: Hardware> Interrupter<L, H> {
    /// `i.on_frequency_compare()` starts the on-time of a new period
    ///
    /// Call from the frequency timer compare A interrupt.
    pub fn on_frequency_compare(&mut self) {
        critical_section::with(|_| match self.config.mode() {
            OutputMode::PulseWidth => {
                let width = self.capped_pulse_width();
                self.hardware.arm_safety_timer();
                self.hardware.emit_pulse(width, width);
            }
            OutputMode::DutyCycle => {
                self.hardware.set_output(true);
                self.hardware.arm_safety_timer();
            }
        });
    }

    /// `i.on_duty_compare()` ends the on-time of the current period in duty-cycle mode
    ///
    /// Call from the frequency timer compare B interrupt.
    pub fn on_duty_compare(&mut self) {
        critical_section::with(|_| {
            if self.config.mode() == OutputMode::DutyCycle {
                self.hardware.set_output(false);
                self.hardware.disarm_safety_timer();
            }
        });
    }

    /// `i.on_safety_compare()` forces the output low and stops the safety timer
    ///
    /// Call from the safety timer compare interrupt.
    pub fn on_safety_compare(&mut self) {
        critical_section::with(|_| {
            self.hardware.disarm_safety_timer();
            self.hardware.set_output(false);
        });
        trace!("safety ceiling hit");
    }

    /// `i.capped_pulse_width()` is the configured pulse width, limited to the maximum allowed for the current note
    pub fn capped_pulse_width(&self) -> PulseWidth {
        let max = PulseWidth::from(self.lookup.max_pulse_width_for(self.note));
        self.config.pulse_width().min(max)
    }
}
