//! # MIDI Receiver
//!
//! A byte-at-a-time receiver for the MIDI note messages that drive the interrupter.
//!
//! The receiver is fed one byte every time the UART receives one, from inside the receive interrupt. It keeps just
//! enough state to recognize Note-On and Note-Off messages on MIDI channels 0 and 1 and reports the note event as soon
//! as the note number byte arrives, the velocity byte is not waited for.
//!
//! Not every part of the MIDI protocol is handled:
//!
//! - Only Note-On and Note-Off are acted on, every other message is consumed and ignored.
//!
//! - Only zero-based channels 0 and 1 are recognized, messages on any other channel are ignored.
//!
//! - Velocity is ignored. In particular a Note-On with velocity zero is still a Note-On and sounds the note, it is not
//!   turned into a Note-Off the way most MIDI gear does.
//!
//! - Any status byte, including system real-time bytes, abandons a message in progress. Partial messages are dropped
//!   silently and the receiver resynchronizes on the next status byte.
//!
//! - Once the note number of a message has been handled every further data byte is ignored until the next status byte.

use log::trace;
use midi_convert::midi_types::Note;

use crate::note_state::TrackedChannel;

/// A MIDI receiver is represented here
#[derive(Clone, Copy, Debug, Default)]
pub struct MidiReceiver {
    status: ReceiveStatus,
    pending: PendingCommand,
}

impl MidiReceiver {
    /// `MidiReceiver::new()` is a new idle MIDI receiver
    pub fn new() -> Self {
        Self::default()
    }

    /// `mr.parse(b, d)` parses the next received byte `b` and is the note event it completes, if any
    ///
    /// # Arguments
    ///
    /// * `byte` - the byte just received from the UART
    ///
    /// * `disabled` - true if the enable switch is holding the output off, data bytes are not acted on while disabled
    ///
    /// # Examples
    ///
    /// ```
    /// use midi_interrupter::midi_receiver::{MidiReceiver, NoteEvent};
    /// use midi_interrupter::note_state::TrackedChannel;
    ///
    /// let mut mr = MidiReceiver::new();
    /// assert_eq!(mr.parse(0x90, false), None); // note-on on channel 0
    /// assert_eq!(mr.parse(60, false), Some(NoteEvent::NoteOn(TrackedChannel::Zero, 60.into())));
    /// assert_eq!(mr.parse(127, false), None); // velocity is not used
    /// ```
    pub fn parse(&mut self, byte: u8, disabled: bool) -> Option<NoteEvent> {
        if is_status_byte(byte) {
            self.pending = PendingCommand::latch(byte);
            self.status = match self.pending.channel() {
                Some(_) => ReceiveStatus::AwaitingData,
                None => {
                    trace!("ignoring status {:#04x}, channel not tracked", byte);
                    ReceiveStatus::AwaitingStatus
                }
            };
            return None;
        }

        // the message stays pending while disabled, it is picked up again once the switch is back on
        if self.status != ReceiveStatus::AwaitingData || disabled {
            return None;
        }

        self.status = ReceiveStatus::Complete;

        let channel = self.pending.channel()?;
        let note = Note::from(byte);

        match self.pending.command() {
            Command::NoteOff => Some(NoteEvent::NoteOff(channel, note)),
            Command::NoteOn => Some(NoteEvent::NoteOn(channel, note)),
            Command::Other(_) => None,
        }
    }

    /// `mr.status()` is where the receiver is in the current message
    pub fn status(&self) -> ReceiveStatus {
        self.status
    }

    /// `mr.pending()` is the most recently latched command and channel
    ///
    /// Only meaningful while the status is `AwaitingData`.
    pub fn pending(&self) -> PendingCommand {
        self.pending
    }
}

/// Receive status is represented here
///
/// - `AwaitingStatus`: idle, data bytes are ignored until a status byte for a tracked channel arrives
///
/// - `AwaitingData`: a status byte for a tracked channel has been latched, the next data byte is the note number
///
/// - `Complete`: the note number has been handled, the rest of the message is ignored
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReceiveStatus {
    #[default]
    AwaitingStatus,
    AwaitingData,
    Complete,
}

/// The command and channel nibbles of the most recent status byte are represented here
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PendingCommand {
    command: u8,
    channel: u8,
}

impl PendingCommand {
    /// `PendingCommand::latch(s)` splits status byte `s` into its command and channel nibbles
    pub fn latch(status: u8) -> Self {
        Self {
            command: status & COMMAND_MASK,
            channel: status & CHANNEL_MASK,
        }
    }

    /// `pc.command()` is the latched command
    pub fn command(&self) -> Command {
        match self.command {
            NOTE_OFF => Command::NoteOff,
            NOTE_ON => Command::NoteOn,
            other => Command::Other(other),
        }
    }

    /// `pc.channel()` is the latched channel, if it is one of the tracked channels
    pub fn channel(&self) -> Option<TrackedChannel> {
        TrackedChannel::from_nibble(self.channel)
    }
}

/// MIDI commands, as far as the receiver cares, are represented here
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    NoteOff,
    NoteOn,
    /// Any other command nibble, kept as the raw upper nibble
    Other(u8),
}

/// Note events produced by the receiver are represented here
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteEvent {
    NoteOn(TrackedChannel, Note),
    NoteOff(TrackedChannel, Note),
}

/// `is_status_byte(b)` is true iff `b` has its high bit set
fn is_status_byte(byte: u8) -> bool {
    byte & STATUS_BIT != 0
}

const STATUS_BIT: u8 = 0b1000_0000;
const COMMAND_MASK: u8 = 0b1111_0000;
const CHANNEL_MASK: u8 = 0b0000_1111;

const NOTE_OFF: u8 = 0x80;
const NOTE_ON: u8 = 0x90;
