//! # Timing lookup
//!
//! Maps a MIDI note to the values needed to play it: the frequency timer compare value, the timer prescaler, and the
//! widest pulse that may safely be fired at that note's repetition rate.
//!
//! The lookups are total over every MIDI note. Tables shorter than 128 entries clamp, notes past the end of a table
//! use the table's last entry.

use midi_convert::midi_types::Note;

use crate::{lookup_tables, timer::Prescaler};

/// A source of per-note timing values is represented here
pub trait TimingLookup {
    /// `tl.compare_value_for(n)` is the number of timer ticks in one period of note `n`
    fn compare_value_for(&self, note: Note) -> u16;

    /// `tl.prescaler_for(n)` is the timer prescaler to use for note `n`
    fn prescaler_for(&self, note: Note) -> Prescaler;

    /// `tl.max_pulse_width_for(n)` is the widest pulse in microseconds allowed for note `n`
    fn max_pulse_width_for(&self, note: Note) -> u8;
}

/// A calibration made of three borrowed tables is represented here
#[derive(Clone, Copy, Debug)]
pub struct CalibrationTable<'a> {
    compare_values: &'a [u16],
    prescalers: &'a [Prescaler],
    max_pulse_widths: &'a [u8],
}

impl<'a> CalibrationTable<'a> {
    /// `CalibrationTable::new(c, p, w)` is a new calibration with compare values `c`, prescalers `p`, and max pulse
    /// widths `w`, each indexed by MIDI note number
    ///
    /// # Panics
    ///
    /// If any of the tables is empty, there would be nothing to clamp to.
    pub const fn new(
        compare_values: &'a [u16],
        prescalers: &'a [Prescaler],
        max_pulse_widths: &'a [u8],
    ) -> Self {
        assert!(!compare_values.is_empty());
        assert!(!prescalers.is_empty());
        assert!(!max_pulse_widths.is_empty());

        Self {
            compare_values,
            prescalers,
            max_pulse_widths,
        }
    }
}

impl Default for CalibrationTable<'static> {
    /// `CalibrationTable::default()` is the built in calibration for a 16 MHz clock
    fn default() -> Self {
        Self::new(
            &lookup_tables::NOTE_COMPARE_VALUES,
            &lookup_tables::NOTE_PRESCALERS,
            &lookup_tables::MAX_PULSE_WIDTHS_US,
        )
    }
}

impl<'a> TimingLookup for CalibrationTable<'a> {
    fn compare_value_for(&self, note: Note) -> u16 {
        clamped(self.compare_values, note)
    }

    fn prescaler_for(&self, note: Note) -> Prescaler {
        clamped(self.prescalers, note)
    }

    fn max_pulse_width_for(&self, note: Note) -> u8 {
        clamped(self.max_pulse_widths, note)
    }
}

/// `clamped(t, n)` is the entry of table `t` for note `n`, or the last entry if `n` is past the end
fn clamped<T: Copy>(table: &[T], note: Note) -> T {
    let idx = usize::from(u8::from(note)).min(table.len() - 1);
    table[idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_covers_every_note() {
        let table = CalibrationTable::default();
        for n in 0..=127_u8 {
            assert!(0 < table.compare_value_for(n.into()));
        }
    }

    #[test]
    fn lower_notes_need_larger_prescalers() {
        let table = CalibrationTable::default();
        assert_eq!(table.prescaler_for(0.into()), Prescaler::Div64);
        assert_eq!(table.prescaler_for(60.into()), Prescaler::Div1);
        assert_eq!(table.prescaler_for(127.into()), Prescaler::Div1);
    }

    #[test]
    fn a440_is_close_to_440_hertz() {
        let table = CalibrationTable::default();
        let note = Note::from(69);
        let ticks = table.compare_value_for(note) as u32 * table.prescaler_for(note).divisor();
        // round to the nearest hertz, 16 MHz / 36364 is 439.99
        let freq = (lookup_tables::F_CPU_HZ + ticks / 2) / ticks;
        assert_eq!(freq, 440);
    }

    #[test]
    fn max_pulse_width_clamps_above_table() {
        let table = CalibrationTable::default();
        let last = table.max_pulse_width_for(95.into());
        assert_eq!(table.max_pulse_width_for(96.into()), last);
        assert_eq!(table.max_pulse_width_for(127.into()), last);
    }

    #[test]
    fn short_synthetic_tables_clamp() {
        static COMPARE: [u16; 2] = [100, 200];
        static PRESCALE: [Prescaler; 1] = [Prescaler::Div256];
        static WIDTH: [u8; 3] = [10, 20, 30];
        let table = CalibrationTable::new(&COMPARE, &PRESCALE, &WIDTH);

        assert_eq!(table.compare_value_for(0.into()), 100);
        assert_eq!(table.compare_value_for(1.into()), 200);
        assert_eq!(table.compare_value_for(77.into()), 200);
        assert_eq!(table.prescaler_for(50.into()), Prescaler::Div256);
        assert_eq!(table.max_pulse_width_for(2.into()), 30);
        assert_eq!(table.max_pulse_width_for(3.into()), 30);
    }
}
