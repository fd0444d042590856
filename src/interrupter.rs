//! # Interrupter
//!
//! The interrupter context owns every piece of mutable state in the core: the MIDI receiver, the note bookkeeping, the
//! current note, the pulse configuration, the timing lookup and the hardware.
//!
//! The hardware's interrupts map one-to-one onto handler methods:
//!
//! | interrupt                  | handler                 | module         |
//! |----------------------------|-------------------------|----------------|
//! | UART byte received         | `on_byte_received`      | here           |
//! | frequency timer compare A  | `on_frequency_compare`  | `generator`    |
//! | frequency timer compare B  | `on_duty_compare`       | `generator`    |
//! | safety timer compare       | `on_safety_compare`     | `generator`    |
//!
//! and the main loop calls `poll_enable_switch` from `supervisor` forever.
//!
//! Handlers must not block and must not be re-entered. Each runs inside a critical section so that nothing else can
//! observe the state half updated, on the target this holds off every other interrupt until the handler returns.

use log::trace;
use midi_convert::midi_types::Note;

use crate::{
    config::PulseConfig,
    hardware::Hardware,
    lookup::TimingLookup,
    midi_receiver::{MidiReceiver, NoteEvent, ReceiveStatus},
    note_state::NoteState,
};

/// An interrupter is represented here
pub struct Interrupter<L, H> {
    pub(crate) receiver: MidiReceiver,
    pub(crate) notes: NoteState,

    // the most recent note-on note number, shared by both tracked channels
    pub(crate) note: Note,

    pub(crate) note_changed: bool,

    pub(crate) config: PulseConfig,
    pub(crate) lookup: L,
    pub(crate) hardware: H,
}

impl<L: TimingLookup, H: Hardware> Interrupter<L, H> {
    /// `Interrupter::new(l, h, c)` is a new idle interrupter using timing lookup `l`, hardware `h`, and configuration `c`
    ///
    /// Call `init()` before enabling interrupts.
    pub fn new(lookup: L, hardware: H, config: PulseConfig) -> Self {
        Self {
            receiver: MidiReceiver::new(),
            notes: NoteState::new(),
            note: Note::from(0),
            // start out "changed" so that whatever displays the note draws it once at power up
            note_changed: true,
            config,
            lookup,
            hardware,
        }
    }

    /// `i.init()` puts the hardware into its power-on state
    ///
    /// The output and the active indicator go low, both timers stop, and the power indicator comes on.
    pub fn init(&mut self) {
        critical_section::with(|_| {
            self.hardware.stop_frequency_timer();
            self.hardware.disarm_safety_timer();
            self.hardware.set_output(false);
            self.hardware.set_active_indicator(false);
            self.hardware.set_power_indicator(true);
        });
    }

    /// `i.on_byte_received(b)` handles byte `b` from the UART, and is the note event it acted on, if any
    ///
    /// Call from the UART receive interrupt, once per byte.
    pub fn on_byte_received(&mut self, byte: u8) -> Option<NoteEvent> {
        critical_section::with(|_| {
            let event = self.receiver.parse(byte, self.notes.is_disabled())?;
            trace!("midi {:?}", event);

            match event {
                NoteEvent::NoteOff(channel, note) => {
                    // a note-off for some other note leaves the output running, only the bookkeeping is cleared
                    if u8::from(note) == u8::from(self.note) {
                        self.note_off(channel);
                    }
                    self.notes.clear_active(channel);
                }
                NoteEvent::NoteOn(channel, note) => {
                    self.note = note;
                    self.note_on(channel);
                    self.notes.set_active(channel);
                    self.hardware.set_active_indicator(true);
                }
            }
            self.note_changed = true;

            Some(event)
        })
    }

    /// `i.note()` is the note number of the most recent note-on
    pub fn note(&self) -> Note {
        self.note
    }

    /// `i.note_state()` is the current note bookkeeping
    pub fn note_state(&self) -> &NoteState {
        &self.notes
    }

    /// `i.receive_status()` is where the MIDI receiver is in the current message
    pub fn receive_status(&self) -> ReceiveStatus {
        self.receiver.status()
    }

    /// `i.note_changed()` is true if a note event has been handled since the last check. Self clearing.
    pub fn note_changed(&mut self) -> bool {
        critical_section::with(|_| {
            if self.note_changed {
                self.note_changed = false;
                true
            } else {
                false
            }
        })
    }

    /// `i.config()` is the current pulse configuration
    pub fn config(&self) -> &PulseConfig {
        &self.config
    }

    /// `i.set_config(c)` replaces the pulse configuration with `c`
    ///
    /// Mode and pulse width apply from the next timer period, duty applies from the next note-on.
    pub fn set_config(&mut self, config: PulseConfig) {
        critical_section::with(|_| self.config = config);
    }

    /// `i.lookup()` is the timing lookup in use
    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// `i.hardware()` is the hardware being driven
    pub fn hardware(&self) -> &H {
        &self.hardware
    }

    /// `i.hardware_mut()` is the hardware being driven, mutably
    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hardware
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        lookup::CalibrationTable,
        note_state::TrackedChannel,
        sim::{self, SimBoard, SimClock},
    };

    fn interrupter(clock: &SimClock) -> Interrupter<CalibrationTable<'static>, SimBoard<'_>> {
        let mut intr = Interrupter::new(
            CalibrationTable::default(),
            sim::board(clock),
            PulseConfig::default(),
        );
        intr.init();
        intr
    }

    fn feed<L: TimingLookup, H: Hardware>(intr: &mut Interrupter<L, H>, bytes: &[u8]) {
        for b in bytes {
            intr.on_byte_received(*b);
        }
    }

    #[test]
    fn init_lights_power_indicator_only() {
        let clock = SimClock::new();
        let intr = interrupter(&clock);
        let hw = intr.hardware();
        assert!(hw.power_indicator.is_set_high());
        assert!(!hw.active_indicator.is_set_high());
        assert!(!hw.output.is_set_high());
        assert!(!hw.frequency_timer.is_running());
    }

    #[test]
    fn note_on_then_matching_note_off() {
        let clock = SimClock::new();
        let mut intr = interrupter(&clock);

        feed(&mut intr, &[0x90, 60, 100]);
        assert_eq!(u8::from(intr.note()), 60);
        assert!(intr.note_state().is_active(TrackedChannel::Zero));
        assert!(intr.hardware().active_indicator.is_set_high());
        assert!(intr.hardware().frequency_timer.is_running());

        feed(&mut intr, &[0x80, 60, 0]);
        assert!(!intr.note_state().is_active(TrackedChannel::Zero));
        assert!(!intr.hardware().active_indicator.is_set_high());
        assert!(!intr.hardware().frequency_timer.is_running());
        assert!(!intr.hardware().output.is_set_high());
    }

    #[test]
    fn note_off_for_another_note_keeps_sounding() {
        let clock = SimClock::new();
        let mut intr = interrupter(&clock);

        feed(&mut intr, &[0x90, 60, 100, 0x80, 61, 0]);

        // bookkeeping says silent but the timer keeps running the stale note
        assert!(!intr.note_state().is_active(TrackedChannel::Zero));
        assert!(intr.hardware().frequency_timer.is_running());
    }

    #[test]
    fn new_note_retunes_without_note_off() {
        let clock = SimClock::new();
        let mut intr = interrupter(&clock);

        feed(&mut intr, &[0x90, 60, 100]);
        let first = intr.hardware().frequency_timer.program();

        feed(&mut intr, &[0x90, 72, 100]);
        let second = intr.hardware().frequency_timer.program();

        assert_ne!(first, second);
        assert_eq!(intr.hardware().frequency_timer.starts(), 2);
        assert_eq!(u8::from(intr.note()), 72);
    }

    #[test]
    fn channel_one_tracks_state_without_driving_the_timer() {
        let clock = SimClock::new();
        let mut intr = interrupter(&clock);

        feed(&mut intr, &[0x91, 50, 100]);
        assert!(intr.note_state().is_active(TrackedChannel::One));
        assert!(!intr.hardware().frequency_timer.is_running());
        // the note number is shared between channels
        assert_eq!(u8::from(intr.note()), 50);
    }

    #[test]
    fn untracked_channel_changes_nothing() {
        let clock = SimClock::new();
        let mut intr = interrupter(&clock);
        intr.note_changed();

        feed(&mut intr, &[0x92, 60, 100]);

        assert_eq!(intr.receive_status(), ReceiveStatus::AwaitingStatus);
        assert!(!intr.note_state().any_active());
        assert!(!intr.note_changed());
        assert_eq!(u8::from(intr.note()), 0);
        assert!(!intr.hardware().frequency_timer.is_running());
        assert_eq!(intr.hardware().output.edges().count(), 0);
        assert_eq!(intr.hardware().active_indicator.edges().count(), 0);
    }

    #[test]
    fn note_changed_is_self_clearing() {
        let clock = SimClock::new();
        let mut intr = interrupter(&clock);

        // set at power up
        assert!(intr.note_changed());
        assert!(!intr.note_changed());

        feed(&mut intr, &[0x90, 60]);
        assert!(intr.note_changed());
        assert!(!intr.note_changed());
    }

    #[test]
    fn abandoned_message_data_is_never_a_note() {
        let clock = SimClock::new();
        let mut intr = interrupter(&clock);

        // note-on interrupted by a status byte for an untracked channel, then a stray data byte
        feed(&mut intr, &[0x90, 0x93, 64]);
        assert!(!intr.note_state().any_active());
        assert!(!intr.hardware().frequency_timer.is_running());
    }

    #[test]
    fn set_config_applies_duty_on_next_note() {
        let clock = SimClock::new();
        let mut intr = interrupter(&clock);

        let mut config = PulseConfig::default();
        config.set_duty(16.into());
        intr.set_config(config);

        feed(&mut intr, &[0x90, 69]);
        let program = intr.hardware().frequency_timer.program();
        assert_eq!(program.map(|p| p.duty_compare), Some((36_363 / 32) * 16 - 1));
    }
}
