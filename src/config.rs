//! # Pulse configuration
//!
//! Operator tunable parameters. These are not protocol state, they are written by whatever settings logic the product
//! has (front panel, serial console, fixed at build time) and read by the core on every note-on and every timer period.
//!
//! Nothing here is persisted across power cycles, the defaults below are what the interrupter wakes up with.

/// The pulse configuration is represented here
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PulseConfig {
    mode: OutputMode,
    duty: DutySteps,
    min_duty: DutySteps,
    pulse_width: PulseWidth,
    dual_output: bool,
    mixed_channels: bool,
    channel_2_sync: bool,
    baud_rate: BaudRate,
}

impl Default for PulseConfig {
    /// `PulseConfig::default()` is pulse-width mode with 125 microsecond pulses and the narrowest duty
    fn default() -> Self {
        Self {
            mode: OutputMode::PulseWidth,
            duty: DutySteps::MIN,
            min_duty: DutySteps::MIN,
            pulse_width: PulseWidth(125),
            dual_output: false,
            mixed_channels: true,
            channel_2_sync: true,
            baud_rate: BaudRate::Serial38400,
        }
    }
}

impl PulseConfig {
    /// `PulseConfig::new()` is a new pulse configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// `pc.mode()` is the current output mode
    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// `pc.set_mode(m)` sets the output mode to `m`
    pub fn set_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }

    /// `pc.duty()` is the configured duty in 1/32 period steps
    pub fn duty(&self) -> DutySteps {
        self.duty
    }

    /// `pc.set_duty(d)` sets the duty to `d`
    pub fn set_duty(&mut self, duty: DutySteps) {
        self.duty = duty;
    }

    /// `pc.min_duty()` is the minimum duty limiter, the configured duty is never used below this
    ///
    /// Defaults to the lowest duty, so out of the box the limiter never raises the configured duty.
    pub fn min_duty(&self) -> DutySteps {
        self.min_duty
    }

    /// `pc.set_min_duty(d)` sets the minimum duty limiter to `d`
    pub fn set_min_duty(&mut self, min_duty: DutySteps) {
        self.min_duty = min_duty;
    }

    /// `pc.effective_duty()` is the duty actually programmed into the timer, the configured duty raised to the limiter
    pub fn effective_duty(&self) -> DutySteps {
        self.duty.max(self.min_duty)
    }

    /// `pc.pulse_width()` is the fixed pulse width used in pulse-width mode, before the per-note cap
    pub fn pulse_width(&self) -> PulseWidth {
        self.pulse_width
    }

    /// `pc.set_pulse_width(w)` sets the fixed pulse width to `w`
    pub fn set_pulse_width(&mut self, width: PulseWidth) {
        self.pulse_width = width;
    }

    /// `pc.dual_output()` is true if the product's second output stage should follow the first
    pub fn dual_output(&self) -> bool {
        self.dual_output
    }

    /// `pc.set_dual_output(d)` enables or disables dual output
    pub fn set_dual_output(&mut self, dual: bool) {
        self.dual_output = dual;
    }

    /// `pc.mixed_channels()` is true if both tracked MIDI channels are meant to share one output
    pub fn mixed_channels(&self) -> bool {
        self.mixed_channels
    }

    /// `pc.set_mixed_channels(m)` sets the mixed channel flag
    pub fn set_mixed_channels(&mut self, mixed: bool) {
        self.mixed_channels = mixed;
    }

    /// `pc.channel_2_sync()` is true if the second channel is meant to run in sync with the first
    pub fn channel_2_sync(&self) -> bool {
        self.channel_2_sync
    }

    /// `pc.set_channel_2_sync(s)` sets the channel-2 sync flag
    pub fn set_channel_2_sync(&mut self, sync: bool) {
        self.channel_2_sync = sync;
    }

    /// `pc.baud_rate()` is the serial baud rate the receiver should be set up for
    pub fn baud_rate(&self) -> BaudRate {
        self.baud_rate
    }

    /// `pc.set_baud_rate(b)` sets the serial baud rate to `b`, takes effect the next time the UART is set up
    pub fn set_baud_rate(&mut self, baud_rate: BaudRate) {
        self.baud_rate = baud_rate;
    }
}

/// Output modes are represented here
///
/// - `DutyCycle` raises the output at the start of every period and drops it at the duty compare point, so the on-time
///   scales with the period of the note.
///
/// - `PulseWidth` fires one fixed width pulse at the start of every period, regardless of the period length. The width
///   is capped per note.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputMode {
    DutyCycle,
    PulseWidth,
}

/// A duty in 1/32 period steps is represented here, clamped to `[1..31]`
///
/// Zero and full duty are not allowed, the duty compare point always lands strictly inside the period.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct DutySteps(u8);

impl DutySteps {
    /// The narrowest allowed duty
    pub const MIN: DutySteps = DutySteps(1);

    /// The widest allowed duty
    pub const MAX: DutySteps = DutySteps(31);

    /// `d.steps()` is the number of 1/32 period steps
    pub fn steps(&self) -> u8 {
        self.0
    }
}

impl From<u8> for DutySteps {
    fn from(steps: u8) -> Self {
        Self(steps.max(Self::MIN.0).min(Self::MAX.0))
    }
}

/// A pulse width in microseconds is represented here
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct PulseWidth(u8);

impl PulseWidth {
    /// `pw.micros()` is the width in microseconds
    pub fn micros(&self) -> u8 {
        self.0
    }
}

impl From<u8> for PulseWidth {
    fn from(us: u8) -> Self {
        Self(us)
    }
}

/// Serial baud rates the MIDI input can run at are represented here
///
/// `Midi31250` is the MIDI DIN rate. `Serial38400` is the common rate for serial-to-MIDI bridge software on a PC.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BaudRate {
    Serial38400,
    Midi31250,
}

impl BaudRate {
    /// `b.bps()` is the baud rate in bits per second
    pub fn bps(self) -> u32 {
        match self {
            BaudRate::Serial38400 => 38_400,
            BaudRate::Midi31250 => 31_250,
        }
    }

    /// `b.divisor(f)` is the UART baud divisor register value for CPU clock `f` hertz in normal (16x) speed mode
    pub fn divisor(self, f_cpu_hz: u32) -> u16 {
        ((f_cpu_hz / (16 * self.bps())).saturating_sub(1)) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duty_clamps_to_valid_range() {
        assert_eq!(DutySteps::from(0), DutySteps::MIN);
        assert_eq!(DutySteps::from(32), DutySteps::MAX);
        assert_eq!(DutySteps::from(200).steps(), 31);
        assert_eq!(DutySteps::from(7).steps(), 7);
    }

    #[test]
    fn defaults_match_power_on_state() {
        let pc = PulseConfig::default();
        assert_eq!(pc.mode(), OutputMode::PulseWidth);
        assert_eq!(pc.duty().steps(), 1);
        assert_eq!(pc.pulse_width().micros(), 125);
        assert!(!pc.dual_output());
        assert!(pc.mixed_channels());
        assert!(pc.channel_2_sync());
        assert_eq!(pc.baud_rate(), BaudRate::Serial38400);
    }

    #[test]
    fn min_duty_raises_effective_duty() {
        let mut pc = PulseConfig::new();
        pc.set_duty(2.into());
        pc.set_min_duty(5.into());
        assert_eq!(pc.effective_duty().steps(), 5);

        pc.set_duty(9.into());
        assert_eq!(pc.effective_duty().steps(), 9);
    }

    #[test]
    fn default_min_duty_leaves_every_duty_alone() {
        let mut pc = PulseConfig::default();
        assert_eq!(pc.min_duty(), DutySteps::MIN);
        for d in 1..=31_u8 {
            pc.set_duty(d.into());
            assert_eq!(pc.effective_duty(), pc.duty());
        }
    }

    #[test]
    fn baud_divisors_for_16mhz() {
        assert_eq!(BaudRate::Serial38400.divisor(16_000_000), 25);
        assert_eq!(BaudRate::Midi31250.divisor(16_000_000), 31);
    }
}
