//! # Enable supervisor
//!
//! The main loop does one thing: watch the enable switch. While the switch is off it keeps forcing the output off,
//! every single pass, so anything that manages to re-arm the output while disabled is undone straight away. When the
//! switch comes back on the disable flag is dropped and the interrupt handlers take over again.

use log::info;

use crate::{
    hardware::Hardware, interrupter::Interrupter, lookup::TimingLookup,
    note_state::TrackedChannel, shared::Shared,
};

impl<L: TimingLookup, H: Hardware> Interrupter<L, H> {
    /// `i.poll_enable_switch()` samples the enable switch once and applies it, and is true if output is enabled
    pub fn poll_enable_switch(&mut self) -> bool {
        critical_section::with(|_| {
            let enabled = self.hardware.enable_switch_on();
            let was_disabled = self.notes.is_disabled();

            if enabled {
                self.notes.set_disabled(false);
                if was_disabled {
                    info!("output enabled");
                }
            } else {
                self.note_off(TrackedChannel::Zero);
                self.notes.set_disabled(true);
                if !was_disabled {
                    info!("output disabled by enable switch");
                }
            }

            enabled
        })
    }
}

/// `run(s)` polls the enable switch of the interrupter in slot `s` forever
///
/// This is the firmware main loop, everything else happens in interrupt handlers.
pub fn run<L: TimingLookup, H: Hardware>(shared: &Shared<Interrupter<L, H>>) -> ! {
    loop {
        shared.with(|intr| intr.poll_enable_switch());
    }
}
