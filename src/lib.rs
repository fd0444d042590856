#![no_std]
#![doc = include_str!("../README.md")]

pub mod config;
pub mod generator;
pub mod hardware;
pub mod interrupter;
pub mod lifecycle;
pub mod lookup;
pub mod lookup_tables;
pub mod midi_receiver;
pub mod note_state;
pub mod pulse;
pub mod shared;
#[cfg(any(test, feature = "sim"))]
pub mod sim;
pub mod supervisor;
pub mod timer;
