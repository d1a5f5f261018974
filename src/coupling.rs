//! Output tracking and trigger coupling.

use core::str::FromStr;

use crate::{
    error::{Error, Result},
    interface::Interface,
    model::Model,
    psu::E3600Psu,
    types::{State, TrackingType},
};

/// Instrument-wide options that tie the outputs together.
pub trait Coupled {
    type Error: embedded_io::Error;

    /// Whether the outputs track each other's voltage.
    fn get_tracking_enabled(&mut self) -> Result<bool, Self::Error>;
    fn set_tracking_enabled(&mut self, enabled: bool) -> Result<(), Self::Error>;

    fn get_tracking_type(&self) -> TrackingType;
    /// Select the tracking type by name. Only `floating` is accepted.
    fn set_tracking_type(&mut self, name: &str) -> Result<(), Self::Error>;

    /// Whether a trigger on one output triggers all outputs.
    fn get_trigger_coupling(&mut self) -> Result<bool, Self::Error>;
    fn set_trigger_coupling(&mut self, enabled: bool) -> Result<(), Self::Error>;
}

impl<S: Interface, M: Model, const L: usize> Coupled for E3600Psu<S, M, L> {
    type Error = S::Error;

    fn get_tracking_enabled(&mut self) -> Result<bool, S::Error> {
        if self.needs_query(&self.couple_tracking_enabled) {
            let response = self.ask(format_args!(":output:track:state?"))?;
            self.couple_tracking_enabled
                .set(State::from_response(&response).into());
        }
        Ok(self.couple_tracking_enabled.value())
    }

    fn set_tracking_enabled(&mut self, enabled: bool) -> Result<(), S::Error> {
        self.write(format_args!(
            ":output:track:state {}",
            State::from(enabled).keyword()
        ))?;
        self.couple_tracking_enabled.set(enabled);
        Ok(())
    }

    fn get_tracking_type(&self) -> TrackingType {
        self.couple_tracking_type
    }

    fn set_tracking_type(&mut self, name: &str) -> Result<(), S::Error> {
        let tracking = TrackingType::from_str(name).map_err(|_| Error::ValueNotSupported)?;
        self.couple_tracking_type = tracking;
        Ok(())
    }

    fn get_trigger_coupling(&mut self) -> Result<bool, S::Error> {
        if self.needs_query(&self.couple_trigger) {
            let response = self.ask(format_args!(":instrument:couple:trigger?"))?;
            self.couple_trigger
                .set(State::from_response(&response).into());
        }
        Ok(self.couple_trigger.value())
    }

    fn set_trigger_coupling(&mut self, enabled: bool) -> Result<(), S::Error> {
        self.write(format_args!(
            ":instrument:couple:trigger {}",
            State::from(enabled).keyword()
        ))?;
        self.couple_trigger.set(enabled);
        Ok(())
    }
}
