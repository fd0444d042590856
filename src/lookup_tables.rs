//! Calibration tables for a 16 MHz timer clock
//!
//! Generated offline. Compare values are the number of timer ticks in one period of the note's fundamental, using the
//! smallest prescaler that keeps the count within 16 bits. Maximum pulse widths cap the on-time to roughly a tenth of
//! the period, within `[10, 250]` microseconds, and stop at note 95; higher notes share the last entry.

use crate::timer::Prescaler;

/// The CPU clock the tables were calculated for
pub const F_CPU_HZ: u32 = 16_000_000;

/// The number of entries in the compare value and prescaler tables, one for every MIDI note
pub const NOTE_TABLE_LEN: usize = 128;

/// The number of entries in the maximum pulse width table
pub const MAX_PULSE_WIDTH_TABLE_LEN: usize = 96;

/// Timer ticks per period for each MIDI note
#[rustfmt::skip]
pub static NOTE_COMPARE_VALUES: [u16; NOTE_TABLE_LEN] = [
    30578, 28862, 27242, 25713, 24270, 22908, 21622, 20408,
    19263, 18182, 17161, 16198, 15289, 14431, 13621, 12856,
    12135, 11454, 10811, 10204, 9631, 9091, 8581, 64793,
    61156, 57724, 54484, 51426, 48540, 45815, 43244, 40817,
    38526, 36364, 34323, 32396, 30578, 28862, 27242, 25713,
    24270, 22908, 21622, 20408, 19263, 18182, 17161, 16198,
    15289, 14431, 13621, 12856, 12135, 11454, 10811, 10204,
    9631, 9091, 8581, 64793, 61156, 57724, 54484, 51426,
    48540, 45815, 43244, 40817, 38526, 36364, 34323, 32396,
    30578, 28862, 27242, 25713, 24270, 22908, 21622, 20408,
    19263, 18182, 17161, 16198, 15289, 14431, 13621, 12856,
    12135, 11454, 10811, 10204, 9631, 9091, 8581, 8099,
    7645, 7215, 6810, 6428, 6067, 5727, 5405, 5102,
    4816, 4545, 4290, 4050, 3822, 3608, 3405, 3214,
    3034, 2863, 2703, 2551, 2408, 2273, 2145, 2025,
    1911, 1804, 1703, 1607, 1517, 1432, 1351, 1276,
];

/// Timer prescaler for each MIDI note
#[rustfmt::skip]
pub static NOTE_PRESCALERS: [Prescaler; NOTE_TABLE_LEN] = [
    Prescaler::Div64, Prescaler::Div64, Prescaler::Div64, Prescaler::Div64, Prescaler::Div64, Prescaler::Div64, Prescaler::Div64, Prescaler::Div64,
    Prescaler::Div64, Prescaler::Div64, Prescaler::Div64, Prescaler::Div64, Prescaler::Div64, Prescaler::Div64, Prescaler::Div64, Prescaler::Div64,
    Prescaler::Div64, Prescaler::Div64, Prescaler::Div64, Prescaler::Div64, Prescaler::Div64, Prescaler::Div64, Prescaler::Div64, Prescaler::Div8,
    Prescaler::Div8, Prescaler::Div8, Prescaler::Div8, Prescaler::Div8, Prescaler::Div8, Prescaler::Div8, Prescaler::Div8, Prescaler::Div8,
    Prescaler::Div8, Prescaler::Div8, Prescaler::Div8, Prescaler::Div8, Prescaler::Div8, Prescaler::Div8, Prescaler::Div8, Prescaler::Div8,
    Prescaler::Div8, Prescaler::Div8, Prescaler::Div8, Prescaler::Div8, Prescaler::Div8, Prescaler::Div8, Prescaler::Div8, Prescaler::Div8,
    Prescaler::Div8, Prescaler::Div8, Prescaler::Div8, Prescaler::Div8, Prescaler::Div8, Prescaler::Div8, Prescaler::Div8, Prescaler::Div8,
    Prescaler::Div8, Prescaler::Div8, Prescaler::Div8, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1,
    Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1,
    Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1,
    Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1,
    Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1,
    Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1,
    Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1,
    Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1,
    Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1, Prescaler::Div1,
];

/// Maximum pulse width in microseconds for each MIDI note up to note 95
#[rustfmt::skip]
pub static MAX_PULSE_WIDTHS_US: [u8; MAX_PULSE_WIDTH_TABLE_LEN] = [
    250, 250, 250, 250, 250, 250, 250, 250, 250, 250, 250, 250,
    250, 250, 250, 250, 250, 250, 250, 250, 250, 250, 250, 250,
    250, 250, 250, 250, 250, 250, 250, 250, 250, 250, 250, 250,
    250, 250, 250, 250, 250, 250, 250, 250, 250, 250, 250, 250,
    250, 250, 250, 250, 250, 250, 250, 250, 250, 250, 250, 250,
    250, 250, 250, 250, 250, 250, 250, 250, 240, 227, 214, 202,
    191, 180, 170, 160, 151, 143, 135, 127, 120, 113, 107, 101,
    95, 90, 85, 80, 75, 71, 67, 63, 60, 56, 53, 50,
];
