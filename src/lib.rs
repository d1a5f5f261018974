//! This crate provides an interface for communicating and controlling the Agilent (Keysight) E3600 series of
//! programmable DC power supplies.
//!
//! It supports `no-std` environments by use of the `no_std` feature flag.
//!
//! Supported PSU models, each with its own marker type in [model]:
//! * E3631A - triple output, +6V/5A, +25V/1A, -25V/1A
//! * E3632A, E3633A, E3634A - single output, dual range
//! * E3640A - E3645A - single output, dual range
//! * E3646A - E3649A - dual output, dual range
//!
//! It speaks SCPI over any transport implementing [embedded_io::Read] & [embedded_io::Write], see
//! [interface::Interface]. Capabilities are split into traits:
//! [coupling::Coupled], [memory::MemorySlotted], [output::OutputRanged], [output::Measurable],
//! [trigger::Triggerable] and [trigger::SoftwareTriggerable].
//!
//! The serial port used for PSU comms should be configured like so:
//! * Baud rate: 9600 (as selected on the front panel)
//! * Data bits: 8
//! * Stop bits: 2 (1 start bit is implied)
//! * Parity: None
//! * DTR/DSR handshaking

#![cfg_attr(feature = "no_std", no_std)]

pub mod cache;
pub mod coupling;
pub mod error;
pub mod interface;
pub mod memory;
pub mod model;
pub mod output;
pub mod psu;
pub mod trigger;
pub mod types;

#[cfg(test)]
mod mock_serial;

pub type AgilentE3600A<S> = psu::E3600Psu<S, model::E3600A>;
pub type AgilentE3631A<S> = psu::E3600Psu<S, model::E3631A>;
pub type AgilentE3632A<S> = psu::E3600Psu<S, model::E3632A>;
pub type AgilentE3633A<S> = psu::E3600Psu<S, model::E3633A>;
pub type AgilentE3634A<S> = psu::E3600Psu<S, model::E3634A>;
pub type AgilentE3640A<S> = psu::E3600Psu<S, model::E3640A>;
pub type AgilentE3641A<S> = psu::E3600Psu<S, model::E3641A>;
pub type AgilentE3642A<S> = psu::E3600Psu<S, model::E3642A>;
pub type AgilentE3643A<S> = psu::E3600Psu<S, model::E3643A>;
pub type AgilentE3644A<S> = psu::E3600Psu<S, model::E3644A>;
pub type AgilentE3645A<S> = psu::E3600Psu<S, model::E3645A>;
pub type AgilentE3646A<S> = psu::E3600Psu<S, model::E3646A>;
pub type AgilentE3647A<S> = psu::E3600Psu<S, model::E3647A>;
pub type AgilentE3648A<S> = psu::E3600Psu<S, model::E3648A>;
pub type AgilentE3649A<S> = psu::E3600Psu<S, model::E3649A>;
