//! # Pulse emitter
//!
//! In pulse-width mode every period starts with one pulse of a fixed, capped width. The pulse is timed by the emitter,
//! not by the frequency timer, so it stays the same width no matter how long the period of the note is.
//!
//! Emitting a pulse is blocking. It runs inside the frequency compare interrupt and holds everything else off for the
//! width of the pulse plus the post delay, both of which are at most 255 microseconds.
//!
//! `DelayEmitter` busy-waits inside a critical section, so in the worst case interrupts stay off for 510 microseconds.
//! At 38400 baud a byte arrives about every 260 microseconds, so a UART with a single byte of buffering can overrun
//! during the widest pulses and a MIDI byte gets lost. The built-in calibration caps pulses at 250 microseconds, and
//! the interrupter passes the capped width as the post delay too. Boards that cannot afford the blocking can supply
//! their own `PulseEmitter`, for instance one that hands the pulse to a one-shot hardware timer.

use embedded_hal::{delay::DelayNs, digital::OutputPin};

use crate::config::PulseWidth;

/// Something that can fire a single pulse on an output pin is represented here
pub trait PulseEmitter {
    /// `pe.emit_pulse(p, w, d)` raises pin `p`, lowers it again after width `w`, then waits for post delay `d`
    ///
    /// The pin must be low when this returns.
    fn emit_pulse<P: OutputPin>(&mut self, pin: &mut P, width: PulseWidth, post_delay: PulseWidth);
}

/// A pulse emitter built on a blocking delay is represented here
pub struct DelayEmitter<D> {
    delay: D,
}

impl<D: DelayNs> DelayEmitter<D> {
    /// `DelayEmitter::new(d)` is a new pulse emitter timed by delay provider `d`
    pub fn new(delay: D) -> Self {
        Self { delay }
    }

    /// `de.release()` gives back the delay provider
    pub fn release(self) -> D {
        self.delay
    }
}

impl<D: DelayNs> PulseEmitter for DelayEmitter<D> {
    fn emit_pulse<P: OutputPin>(&mut self, pin: &mut P, width: PulseWidth, post_delay: PulseWidth) {
        pin.set_high().ok();
        self.delay.delay_us(u32::from(width.micros()));
        pin.set_low().ok();
        self.delay.delay_us(u32::from(post_delay.micros()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{SimClock, SimDelay, SimPin};

    #[test]
    fn pulse_is_as_wide_as_asked() {
        let clock = SimClock::new();
        let mut pin = SimPin::new(&clock);
        let mut emitter = DelayEmitter::new(SimDelay::new(&clock));

        emitter.emit_pulse(&mut pin, 100.into(), 0.into());

        assert!(!pin.is_set_high());
        assert_eq!(pin.last_high_time_ns(), Some(100_000));
    }

    #[test]
    fn post_delay_follows_the_pulse() {
        let clock = SimClock::new();
        let mut pin = SimPin::new(&clock);
        let mut emitter = DelayEmitter::new(SimDelay::new(&clock));

        emitter.emit_pulse(&mut pin, 40.into(), 60.into());

        assert_eq!(pin.last_high_time_ns(), Some(40_000));
        assert_eq!(clock.now_ns(), 100_000);
    }

    #[test]
    fn widest_pulse_blocks_for_510_microseconds() {
        let clock = SimClock::new();
        let mut pin = SimPin::new(&clock);
        let mut emitter = DelayEmitter::new(SimDelay::new(&clock));

        emitter.emit_pulse(&mut pin, 255.into(), 255.into());

        assert_eq!(pin.last_high_time_ns(), Some(255_000));
        assert_eq!(clock.now_ns(), 510_000);
    }
}
