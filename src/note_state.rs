//! Per-channel note bookkeeping
//!
//! Two MIDI channels are tracked. Each has an "active" flag, and there is one global "disabled" flag set by the enable
//! switch. While disabled the per-channel flags carry no meaning, the output is held low no matter what they say.

/// The MIDI channels the interrupter listens to are represented here
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackedChannel {
    /// MIDI channel 1 on most gear, the channel that drives the output
    Zero,
    /// MIDI channel 2 on most gear, tracked but not connected to an output
    One,
}

impl TrackedChannel {
    /// `TrackedChannel::from_nibble(n)` is the tracked channel for zero-based channel nibble `n`, if there is one
    pub fn from_nibble(nibble: u8) -> Option<Self> {
        match nibble {
            0 => Some(TrackedChannel::Zero),
            1 => Some(TrackedChannel::One),
            _ => None,
        }
    }

    /// `ch.index()` is the zero-based MIDI channel number
    pub fn index(self) -> usize {
        match self {
            TrackedChannel::Zero => 0,
            TrackedChannel::One => 1,
        }
    }
}

/// Note state is represented here
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoteState {
    active: [bool; NUM_TRACKED_CHANNELS],
    disabled: bool,
}

impl NoteState {
    /// `NoteState::new()` is a new note state with nothing active and output enabled
    pub fn new() -> Self {
        Self::default()
    }

    /// `ns.is_active(ch)` is true if a note is sounding on channel `ch`
    pub fn is_active(&self, channel: TrackedChannel) -> bool {
        self.active[channel.index()]
    }

    /// `ns.any_active()` is true if a note is sounding on any tracked channel
    pub fn any_active(&self) -> bool {
        self.active.iter().any(|a| *a)
    }

    /// `ns.set_active(ch)` marks channel `ch` as sounding
    pub fn set_active(&mut self, channel: TrackedChannel) {
        self.active[channel.index()] = true;
    }

    /// `ns.clear_active(ch)` marks channel `ch` as silent
    pub fn clear_active(&mut self, channel: TrackedChannel) {
        self.active[channel.index()] = false;
    }

    /// `ns.is_disabled()` is true if the enable switch is holding the output off
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// `ns.set_disabled(d)` sets the global disable flag
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }
}

/// The number of MIDI channels with note tracking
pub const NUM_TRACKED_CHANNELS: usize = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_first_two_channels_are_tracked() {
        assert_eq!(TrackedChannel::from_nibble(0), Some(TrackedChannel::Zero));
        assert_eq!(TrackedChannel::from_nibble(1), Some(TrackedChannel::One));
        for n in 2..16 {
            assert_eq!(TrackedChannel::from_nibble(n), None);
        }
    }

    #[test]
    fn channels_are_independent() {
        let mut ns = NoteState::new();
        ns.set_active(TrackedChannel::One);
        assert!(!ns.is_active(TrackedChannel::Zero));
        assert!(ns.is_active(TrackedChannel::One));
        assert!(ns.any_active());

        ns.clear_active(TrackedChannel::One);
        assert!(!ns.any_active());
    }

    #[test]
    fn disable_flag_does_not_touch_channels() {
        let mut ns = NoteState::new();
        ns.set_active(TrackedChannel::Zero);
        ns.set_disabled(true);
        assert!(ns.is_disabled());
        assert!(ns.is_active(TrackedChannel::Zero));

        ns.set_disabled(false);
        assert!(!ns.is_disabled());
    }
}
