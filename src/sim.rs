//! # Host simulation
//!
//! Simulated peripherals for running the interrupter core off-target.
//!
//! Nothing here is tied to real time. A `SimClock` is shared by every simulated part, delays advance it and pins stamp
//! their edges with it. Interrupts are simulated by calling the interrupter's handler methods directly, in whatever
//! order the test or demo wants, which keeps every run deterministic.

use core::{cell::Cell, convert::Infallible};

use embedded_hal::{
    delay::DelayNs,
    digital::{ErrorType, InputPin, OutputPin},
};
use heapless::HistoryBuffer;

use crate::{
    hardware::Board,
    pulse::DelayEmitter,
    timer::{FrequencyTimer, SafetyTimer, TimerProgram},
};

/// A simulated clock counting nanoseconds is represented here
#[derive(Debug, Default)]
pub struct SimClock {
    now_ns: Cell<u64>,
}

impl SimClock {
    /// `SimClock::new()` is a new clock at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// `c.now_ns()` is the current simulated time in nanoseconds
    pub fn now_ns(&self) -> u64 {
        self.now_ns.get()
    }

    /// `c.advance_ns(ns)` moves the simulated time forward by `ns` nanoseconds
    pub fn advance_ns(&self, ns: u64) {
        self.now_ns.set(self.now_ns.get() + ns);
    }
}

/// A level change on a simulated pin is represented here
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    /// The simulated time of the change in nanoseconds
    pub at_ns: u64,
    /// The new level, true for high
    pub high: bool,
}

/// A simulated output pin is represented here
///
/// Only real level changes are recorded, setting a pin to the level it already has leaves no edge.
pub struct SimPin<'a> {
    clock: &'a SimClock,
    high: bool,
    edges: HistoryBuffer<Edge, EDGE_HISTORY_LEN>,
}

impl<'a> SimPin<'a> {
    /// `SimPin::new(c)` is a new low pin stamping its edges with clock `c`
    pub fn new(clock: &'a SimClock) -> Self {
        Self {
            clock,
            high: false,
            edges: HistoryBuffer::new(),
        }
    }

    /// `p.is_set_high()` is true if the pin is currently driven high
    pub fn is_set_high(&self) -> bool {
        self.high
    }

    /// `p.edges()` is the recorded edges, oldest first
    ///
    /// Only the most recent `EDGE_HISTORY_LEN` edges are kept.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.oldest_ordered()
    }

    /// `p.rising_edges()` is the number of recorded rising edges
    pub fn rising_edges(&self) -> usize {
        self.edges().filter(|e| e.high).count()
    }

    /// `p.last_high_time_ns()` is how long the most recent completed high pulse lasted, if there was one
    pub fn last_high_time_ns(&self) -> Option<u64> {
        let mut rise = None;
        let mut last = None;
        for edge in self.edges() {
            match (edge.high, rise) {
                (true, _) => rise = Some(edge.at_ns),
                (false, Some(r)) => {
                    last = Some(edge.at_ns - r);
                    rise = None;
                }
                (false, None) => (),
            }
        }
        last
    }

    fn drive(&mut self, high: bool) {
        if self.high != high {
            self.high = high;
            self.edges.write(Edge {
                at_ns: self.clock.now_ns(),
                high,
            });
        }
    }
}

impl<'a> ErrorType for SimPin<'a> {
    type Error = Infallible;
}

impl<'a> OutputPin for SimPin<'a> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true);
        Ok(())
    }
}

/// A simulated enable switch is represented here, it reads high while closed
pub struct SimSwitch {
    closed: bool,
}

impl SimSwitch {
    /// `SimSwitch::new(c)` is a new switch, closed if `c` is true
    pub fn new(closed: bool) -> Self {
        Self { closed }
    }

    /// `s.set_closed(c)` flips the switch
    pub fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }
}

impl ErrorType for SimSwitch {
    type Error = Infallible;
}

impl InputPin for SimSwitch {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.closed)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.closed)
    }
}

/// A delay provider that advances the simulated clock instead of waiting
pub struct SimDelay<'a> {
    clock: &'a SimClock,
}

impl<'a> SimDelay<'a> {
    /// `SimDelay::new(c)` is a new delay provider advancing clock `c`
    pub fn new(clock: &'a SimClock) -> Self {
        Self { clock }
    }
}

impl<'a> DelayNs for SimDelay<'a> {
    fn delay_ns(&mut self, ns: u32) {
        self.clock.advance_ns(u64::from(ns));
    }
}

/// A simulated frequency timer is represented here
///
/// The timer does not count, it only remembers how it was programmed. Compare interrupts are delivered by the caller.
#[derive(Debug, Default)]
pub struct SimFrequencyTimer {
    program: Option<TimerProgram>,
    starts: u32,
}

impl SimFrequencyTimer {
    /// `SimFrequencyTimer::new()` is a new stopped timer
    pub fn new() -> Self {
        Self::default()
    }

    /// `t.program()` is the program the timer is running, `None` when stopped
    pub fn program(&self) -> Option<TimerProgram> {
        self.program
    }

    /// `t.is_running()` is true if the clock is running and the compare interrupts are enabled
    pub fn is_running(&self) -> bool {
        self.program.is_some()
    }

    /// `t.starts()` is the number of times the timer has been started
    pub fn starts(&self) -> u32 {
        self.starts
    }
}

impl FrequencyTimer for SimFrequencyTimer {
    fn start(&mut self, program: &TimerProgram) {
        self.program = Some(*program);
        self.starts += 1;
    }

    fn stop(&mut self) {
        self.program = None;
    }
}

/// A simulated safety timer is represented here
#[derive(Debug, Default)]
pub struct SimSafetyTimer {
    armed: bool,
    arms: u32,
}

impl SimSafetyTimer {
    /// `SimSafetyTimer::new()` is a new disarmed safety timer
    pub fn new() -> Self {
        Self::default()
    }

    /// `t.is_armed()` is true while the ceiling countdown is running
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// `t.arms()` is the number of times the timer has been armed
    pub fn arms(&self) -> u32 {
        self.arms
    }
}

impl SafetyTimer for SimSafetyTimer {
    fn arm(&mut self) {
        self.armed = true;
        self.arms += 1;
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

/// A fully simulated board
pub type SimBoard<'a> = Board<
    SimPin<'a>,
    SimPin<'a>,
    SimPin<'a>,
    SimSwitch,
    SimFrequencyTimer,
    SimSafetyTimer,
    DelayEmitter<SimDelay<'a>>,
>;

/// `board(c)` is a new simulated board on clock `c` with every output low, both timers stopped, and the enable switch
/// closed
pub fn board(clock: &SimClock) -> SimBoard<'_> {
    Board {
        output: SimPin::new(clock),
        active_indicator: SimPin::new(clock),
        power_indicator: SimPin::new(clock),
        enable_switch: SimSwitch::new(true),
        frequency_timer: SimFrequencyTimer::new(),
        safety_timer: SimSafetyTimer::new(),
        emitter: DelayEmitter::new(SimDelay::new(clock)),
    }
}

/// The number of edges each simulated pin remembers
pub const EDGE_HISTORY_LEN: usize = 64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_records_only_changes() {
        let clock = SimClock::new();
        let mut pin = SimPin::new(&clock);

        pin.set_low().ok();
        assert_eq!(pin.edges().count(), 0);

        pin.set_high().ok();
        pin.set_high().ok();
        clock.advance_ns(500);
        pin.set_low().ok();

        assert_eq!(pin.edges().count(), 2);
        assert_eq!(pin.rising_edges(), 1);
        assert_eq!(pin.last_high_time_ns(), Some(500));
    }

    #[test]
    fn pin_still_high_has_no_completed_pulse() {
        let clock = SimClock::new();
        let mut pin = SimPin::new(&clock);
        pin.set_high().ok();
        assert_eq!(pin.last_high_time_ns(), None);
    }

    #[test]
    fn delay_advances_the_clock() {
        let clock = SimClock::new();
        let mut delay = SimDelay::new(&clock);
        delay.delay_us(3);
        delay.delay_ns(20);
        assert_eq!(clock.now_ns(), 3_020);
    }
}
