//! Trigger subsystem.

use fugit::MillisDurationU32;

use crate::{
    error::{Error, Result},
    interface::Interface,
    model::Model,
    psu::E3600Psu,
    types::TriggerSource,
};

/// Longest trigger delay the instrument accepts.
pub const TRIGGER_DELAY_MAX: MillisDurationU32 = MillisDurationU32::secs(3600);

pub trait Triggerable {
    type Error: embedded_io::Error;

    fn get_trigger_source(&mut self) -> Result<TriggerSource, Self::Error>;
    fn set_trigger_source(&mut self, source: TriggerSource) -> Result<(), Self::Error>;

    /// Delay between the trigger and the new settings being applied.
    fn get_trigger_delay(&mut self) -> Result<MillisDurationU32, Self::Error>;
    /// Set the trigger delay, 0 - [TRIGGER_DELAY_MAX], resolution of 1ms.
    fn set_trigger_delay(&mut self, delay: MillisDurationU32) -> Result<(), Self::Error>;

    /// Arm the trigger system for one trigger.
    fn initiate(&mut self) -> Result<(), Self::Error>;
}

pub trait SoftwareTriggerable {
    type Error: embedded_io::Error;

    /// Issue a bus trigger. Only acted on when the trigger source is [TriggerSource::Bus].
    fn send_software_trigger(&mut self) -> Result<(), Self::Error>;
}

impl<S: Interface, M: Model, const L: usize> Triggerable for E3600Psu<S, M, L> {
    type Error = S::Error;

    fn get_trigger_source(&mut self) -> Result<TriggerSource, S::Error> {
        if self.needs_query(&self.trigger_source) {
            let response = self.ask(format_args!("trigger:source?"))?;
            let source = TriggerSource::from_command(&response).ok_or(Error::InvalidResponse)?;
            self.trigger_source.set(source);
        }
        Ok(self.trigger_source.value())
    }

    fn set_trigger_source(&mut self, source: TriggerSource) -> Result<(), S::Error> {
        self.write(format_args!("trigger:source {}", source.command()))?;
        self.trigger_source.set(source);
        Ok(())
    }

    fn get_trigger_delay(&mut self) -> Result<MillisDurationU32, S::Error> {
        if self.needs_query(&self.trigger_delay) {
            let response = self.ask(format_args!("trigger:delay?"))?;
            let seconds = response
                .trim()
                .parse::<f32>()
                .map_err(|_| Error::InvalidResponse)?;
            if !(0.0..=TRIGGER_DELAY_MAX.to_secs() as f32).contains(&seconds) {
                return Err(Error::InvalidResponse);
            }
            let millis = (seconds * 1000.0 + 0.5) as u32;
            self.trigger_delay.set(MillisDurationU32::millis(millis));
        }
        Ok(self.trigger_delay.value())
    }

    fn set_trigger_delay(&mut self, delay: MillisDurationU32) -> Result<(), S::Error> {
        if delay > TRIGGER_DELAY_MAX {
            return Err(Error::OutOfRange);
        }
        let millis = delay.to_millis();
        self.write(format_args!(
            "trigger:delay {}.{:03}",
            millis / 1000,
            millis % 1000
        ))?;
        self.trigger_delay.set(delay);
        Ok(())
    }

    fn initiate(&mut self) -> Result<(), S::Error> {
        self.write(format_args!("initiate"))
    }
}

impl<S: Interface, M: Model, const L: usize> SoftwareTriggerable for E3600Psu<S, M, L> {
    type Error = S::Error;

    fn send_software_trigger(&mut self) -> Result<(), S::Error> {
        self.write(format_args!("*trg"))
    }
}
