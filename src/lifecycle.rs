//! # Note lifecycle
//!
//! Note-on and note-off as seen by the hardware. Only channel 0 is wired to the frequency timer, calls for channel 1
//! change nothing here.
//!
//! Both operations reprogram several registers that the compare interrupts depend on, so both run inside a critical
//! section. Critical sections nest, when called from the UART handler the outer one is already held and the previous
//! interrupt state is restored on the way out either way.

use log::debug;

use crate::{
    hardware::Hardware, interrupter::Interrupter, lookup::TimingLookup,
    note_state::TrackedChannel, timer::TimerProgram,
};

impl<L: TimingLookup, H: Hardware> Interrupter<L, H> {
    /// `i.note_on(ch)` starts the frequency timer for the current note, if `ch` is channel 0
    ///
    /// Does nothing while the enable switch has the output disabled. A note already sounding is retuned, there is no
    /// need for a note-off first.
    ///
    /// Returns the program loaded into the timer, if one was.
    pub fn note_on(&mut self, channel: TrackedChannel) -> Option<TimerProgram> {
        if self.notes.is_disabled() || channel != TrackedChannel::Zero {
            return None;
        }

        critical_section::with(|_| {
            let program = TimerProgram::new(
                self.lookup.compare_value_for(self.note),
                self.lookup.prescaler_for(self.note),
                self.config.effective_duty(),
            );
            self.hardware.start_frequency_timer(&program);

            debug!("note on {} -> {:?}", u8::from(self.note), program);

            Some(program)
        })
    }

    /// `i.note_off(ch)` stops the frequency timer and drops the output, if `ch` is channel 0
    ///
    /// The safety timer is disarmed too, with the output low there is nothing left for it to guard.
    pub fn note_off(&mut self, channel: TrackedChannel) {
        if channel != TrackedChannel::Zero {
            return;
        }

        critical_section::with(|_| {
            self.hardware.stop_frequency_timer();
            self.hardware.disarm_safety_timer();
            self.notes.clear_active(TrackedChannel::Zero);
            self.hardware.set_active_indicator(false);
            self.hardware.set_output(false);
        });

        debug!("note off");
    }
}
