//! This module contains types used on the E3600 SCPI command surface.

use modular_bitfield::prelude::*;
use strum_macros::{AsRefStr, EnumIter, EnumString};

/// Instrument identity strings (manufacturer, model, ...).
pub type IdString = heapless::String<32>;

/// Text of an entry in the instrument error queue.
pub type ErrorMessage = heapless::String<64>;

/// Name of a non-volatile memory slot.
pub type MemoryName = heapless::String<32>;

/// Used to be less ambiguous and whether something is on or off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum State {
    /// Disabled.
    #[default]
    Off,
    /// Enabled.
    On,
}

impl State {
    /// SCPI keyword for this state.
    pub fn keyword(self) -> &'static str {
        match self {
            State::Off => "off",
            State::On => "on",
        }
    }

    /// Parse a boolean query response. Anything other than `on` / `1` is off.
    pub fn from_response(response: &str) -> Self {
        let response = response.trim();
        State::from(response.eq_ignore_ascii_case("on") || response == "1")
    }
}

impl From<State> for bool {
    fn from(value: State) -> Self {
        match value {
            State::Off => false,
            State::On => true,
        }
    }
}

impl From<bool> for State {
    fn from(value: bool) -> Self {
        match value {
            true => State::On,
            false => State::Off,
        }
    }
}

/// Supported output tracking types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, EnumString, AsRefStr)]
pub enum TrackingType {
    /// Outputs track each other while floating with respect to ground.
    #[default]
    #[strum(serialize = "floating")]
    Floating,
}

/// Where the trigger subsystem takes its trigger from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, EnumString, AsRefStr)]
pub enum TriggerSource {
    /// Trigger as soon as the system is initiated.
    #[default]
    #[strum(serialize = "immediate")]
    Immediate,
    /// Wait for `*trg` or a bus trigger.
    #[strum(serialize = "bus")]
    Bus,
}

impl TriggerSource {
    /// Keyword used for this source on the wire.
    pub fn command(self) -> &'static str {
        match self {
            TriggerSource::Immediate => "imm",
            TriggerSource::Bus => "bus",
        }
    }

    /// Interpret a `trigger:source?` response.
    pub fn from_command(response: &str) -> Option<Self> {
        let response = response.trim();
        if response.eq_ignore_ascii_case("imm") || response.eq_ignore_ascii_case("immediate") {
            Some(TriggerSource::Immediate)
        } else if response.eq_ignore_ascii_case("bus") {
            Some(TriggerSource::Bus)
        } else {
            None
        }
    }
}

/// Quantity returned by a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, AsRefStr)]
pub enum MeasurementType {
    #[strum(serialize = "voltage")]
    Voltage,
    #[strum(serialize = "current")]
    Current,
}

/// IEEE 488.2 standard event status register, as returned by `*esr?`.
#[bitfield(bytes = 1)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardEventStatus {
    /// All commands prior to `*opc` have completed.
    pub operation_complete: bool,
    #[skip]
    __: B1,
    /// Output buffer was read while empty, or overwritten.
    pub query_error: bool,
    /// Self-test or calibration error.
    pub device_error: bool,
    /// Command could not be executed, e.g. parameter out of range.
    pub execution_error: bool,
    /// Syntax error in a received command.
    pub command_error: bool,
    #[skip]
    __: B1,
    /// Power has been cycled since the register was last read.
    pub power_on: bool,
}

/// Identity reported by the instrument in response to `*idn?`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Identity {
    pub manufacturer: IdString,
    pub model: IdString,
    pub serial_number: IdString,
    pub firmware_revision: IdString,
}

impl Identity {
    /// Parse `MANUFACTURER,MODEL,SERIAL,FIRMWARE`.
    ///
    /// Returns `None` if the response does not have four fields or a field is too long.
    pub fn parse(response: &str) -> Option<Self> {
        let mut fields = response.trim().split(',').map(str::trim);
        let identity = Identity {
            manufacturer: IdString::try_from(fields.next()?).ok()?,
            model: IdString::try_from(fields.next()?).ok()?,
            serial_number: IdString::try_from(fields.next()?).ok()?,
            firmware_revision: IdString::try_from(fields.next()?).ok()?,
        };
        if fields.next().is_some() {
            return None;
        }
        Some(identity)
    }
}

/// Parse a `CODE,"MESSAGE"` response as returned by `system:error?` and `*tst?`.
pub(crate) fn parse_code_message(response: &str) -> Option<(i16, ErrorMessage)> {
    let response = response.trim();
    let (code, message) = match response.split_once(',') {
        Some((code, message)) => (code, message),
        None => (response, ""),
    };
    let code = code.trim().parse::<i16>().ok()?;
    let message = ErrorMessage::try_from(message.trim_matches(|c: char| c == ' ' || c == '"')).ok()?;
    Some((code, message))
}
