//! # Timers
//!
//! Two hardware timers are used:
//!
//! - The frequency timer runs in "clear timer on compare" mode. Compare point A marks the start of every period of the
//!   note being played, compare point B marks the end of the on-time when running in duty-cycle mode.
//!
//! - The safety timer is a one-shot backstop. It is armed whenever the output is raised in duty-cycle mode and, if it
//!   ever expires, forces the output low no matter what the rest of the system believes.
//!
//! This module only describes what the core needs from the timers, the register level work is left to the target.

use crate::config::DutySteps;

/// The values loaded into the frequency timer for one note
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerProgram {
    /// Compare point A, the counter clears and the output is set when it gets here
    pub frequency_compare: u16,
    /// Compare point B, the output is cleared here in duty-cycle mode
    pub duty_compare: u16,
    /// The timer input clock divider
    pub prescaler: Prescaler,
}

impl TimerProgram {
    /// `TimerProgram::new(c, p, d)` is the program for a note with table compare value `c`, prescaler `p`, and duty `d`
    ///
    /// The counter counts from zero up to and including the compare value, so the table value is reduced by one. The
    /// duty compare point splits the period into 32 equal steps and takes `d` of them, less one tick to land the
    /// interrupt on the last tick of the on-time. Neither subtraction is allowed to wrap.
    pub fn new(compare_value: u16, prescaler: Prescaler, duty: DutySteps) -> Self {
        let frequency_compare = compare_value.saturating_sub(1);
        let step = frequency_compare / DUTY_STEPS_PER_PERIOD;
        let duty_compare = step
            .saturating_mul(u16::from(duty.steps()))
            .saturating_sub(1);

        Self {
            frequency_compare,
            duty_compare,
            prescaler,
        }
    }

    /// `tp.period_ns(f)` is the length of one timer period in nanoseconds when the CPU clock is `f` hertz
    pub fn period_ns(&self, f_cpu_hz: u32) -> u64 {
        ticks_to_ns(u64::from(self.frequency_compare) + 1, self.prescaler, f_cpu_hz)
    }

    /// `tp.duty_ns(f)` is the time from the start of a period until compare point B, in nanoseconds
    pub fn duty_ns(&self, f_cpu_hz: u32) -> u64 {
        ticks_to_ns(u64::from(self.duty_compare) + 1, self.prescaler, f_cpu_hz)
    }
}

/// `ticks_to_ns(t, p, f)` is the duration of `t` timer ticks with prescaler `p` and CPU clock `f` in nanoseconds
fn ticks_to_ns(ticks: u64, prescaler: Prescaler, f_cpu_hz: u32) -> u64 {
    (ticks * u64::from(prescaler.divisor()) * 1_000_000_000) / u64::from(f_cpu_hz.max(1))
}

/// Timer prescaler selections are represented here
///
/// The discriminants are the clock-select bits for a 16 bit AVR style timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prescaler {
    Div1 = 1,
    Div8 = 2,
    Div64 = 3,
    Div256 = 4,
    Div1024 = 5,
}

impl Prescaler {
    /// `p.divisor()` is the number of CPU clocks per timer tick
    pub fn divisor(self) -> u32 {
        match self {
            Prescaler::Div1 => 1,
            Prescaler::Div8 => 8,
            Prescaler::Div64 => 64,
            Prescaler::Div256 => 256,
            Prescaler::Div1024 => 1024,
        }
    }

    /// `p.clock_select()` is the value to write to the timer clock-select bits to run with this prescaler
    pub fn clock_select(self) -> u8 {
        self as u8
    }
}

/// The frequency timer, as seen by the note lifecycle
pub trait FrequencyTimer {
    /// `t.start(p)` resets the counter, loads both compare points from `p`, starts the clock in clear-on-compare mode
    /// with the program's prescaler, and enables both compare interrupts
    fn start(&mut self, program: &TimerProgram);

    /// `t.stop()` stops the clock, masks and clears both compare interrupts, and resets the counter
    fn stop(&mut self);
}

/// The safety timer, a one-shot ceiling on how long the output may stay high
pub trait SafetyTimer {
    /// `t.arm()` restarts the ceiling countdown from zero
    fn arm(&mut self);

    /// `t.disarm()` stops the clock and resets the counter
    fn disarm(&mut self);
}

/// The number of equal steps a period is split into when calculating the duty compare point
pub const DUTY_STEPS_PER_PERIOD: u16 = 32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_compare_is_one_less_than_table_value() {
        let tp = TimerProgram::new(1_000, Prescaler::Div8, 1.into());
        assert_eq!(tp.frequency_compare, 999);
        assert_eq!(tp.prescaler, Prescaler::Div8);
    }

    #[test]
    fn duty_compare_uses_32_steps_less_one() {
        // 3199 / 32 = 99 ticks per step
        let tp = TimerProgram::new(3_200, Prescaler::Div1, 4.into());
        assert_eq!(tp.duty_compare, 99 * 4 - 1);
    }

    #[test]
    fn tiny_compare_values_do_not_wrap() {
        let tp = TimerProgram::new(0, Prescaler::Div1, 1.into());
        assert_eq!(tp.frequency_compare, 0);
        assert_eq!(tp.duty_compare, 0);

        // one step of zero ticks, less one, stays at zero instead of wrapping to the top
        let tp = TimerProgram::new(20, Prescaler::Div1, 31.into());
        assert_eq!(tp.duty_compare, 0);
    }

    #[test]
    fn period_accounts_for_prescaler() {
        // 16 MHz, divide by 8, 2000 ticks = 1 millisecond
        let tp = TimerProgram::new(2_000, Prescaler::Div8, 1.into());
        assert_eq!(tp.period_ns(16_000_000), 1_000_000);
    }

    #[test]
    fn duty_point_lands_inside_the_period() {
        let tp = TimerProgram::new(2_000, Prescaler::Div8, 16.into());
        assert!(tp.duty_ns(16_000_000) < tp.period_ns(16_000_000));
        assert_eq!(tp.duty_ns(16_000_000), 62 * 16 * 500);
    }

    #[test]
    fn clock_select_bits_match_avr_encoding() {
        assert_eq!(Prescaler::Div1.clock_select(), 0b001);
        assert_eq!(Prescaler::Div64.clock_select(), 0b011);
        assert_eq!(Prescaler::Div1024.clock_select(), 0b101);
    }
}
