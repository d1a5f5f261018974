//! Output programming and measurement.
//!
//! Outputs are numbered from 1. On multi-output models each per-output command is preceded by
//! `instrument:nselect N`.

use crate::{
    error::{Error, Result},
    interface::Interface,
    model::{Model, OutputDescriptor},
    psu::E3600Psu,
    types::{MeasurementType, State},
};

/// Program voltage and current limits of the outputs, within their ranges.
pub trait OutputRanged {
    type Error: embedded_io::Error;

    fn output_count(&self) -> usize;
    /// Static limits of output `index`.
    fn output(&self, index: u8) -> Result<OutputDescriptor, Self::Error>;

    fn set_voltage_level(&mut self, index: u8, volts: f32) -> Result<(), Self::Error>;
    fn get_voltage_level(&mut self, index: u8) -> Result<f32, Self::Error>;
    fn set_current_limit(&mut self, index: u8, amps: f32) -> Result<(), Self::Error>;
    fn get_current_limit(&mut self, index: u8) -> Result<f32, Self::Error>;
    /// Select a named voltage range, e.g. `P15V`.
    fn configure_range(&mut self, index: u8, name: &str) -> Result<(), Self::Error>;

    /// Highest current limit output `index` supports at `volts`.
    fn current_limit_max(&self, index: u8, volts: f32) -> Result<f32, Self::Error>;
    /// Highest voltage output `index` supports with a current limit of `amps`.
    fn voltage_level_max(&self, index: u8, amps: f32) -> Result<f32, Self::Error>;

    /// Whether the outputs are switched on. All outputs switch together.
    fn get_outputs_enabled(&mut self) -> Result<bool, Self::Error>;
    fn set_outputs_enabled(&mut self, enabled: bool) -> Result<(), Self::Error>;

    /// Arm over-voltage protection of output `index` at `limit` volts, or disarm it.
    ///
    /// Outputs without OVP fail with [Error::OutOfRange].
    fn configure_ovp(&mut self, index: u8, enabled: bool, limit: f32) -> Result<(), Self::Error>;
    fn get_ovp_enabled(&mut self, index: u8) -> Result<bool, Self::Error>;
    fn get_ovp_limit(&mut self, index: u8) -> Result<f32, Self::Error>;
    fn get_ovp_tripped(&mut self, index: u8) -> Result<bool, Self::Error>;
    /// Clear a tripped over-voltage protection.
    fn reset_output_protection(&mut self, index: u8) -> Result<(), Self::Error>;
}

pub trait Measurable {
    type Error: embedded_io::Error;

    /// Measure voltage or current at output `index`.
    fn measure(&mut self, index: u8, measurement: MeasurementType) -> Result<f32, Self::Error>;
}

impl<S: Interface, M: Model, const L: usize> E3600Psu<S, M, L> {
    /// Validate `index` and make it the target of following output commands.
    fn select_output(&mut self, index: u8) -> Result<OutputDescriptor, S::Error> {
        let descriptor = M::DESCRIPTOR;
        let output = *descriptor.output(index).ok_or(Error::OutOfRange)?;
        if descriptor.output_count() > 1 {
            self.write(format_args!("instrument:nselect {}", index))?;
        }
        Ok(output)
    }

    /// As [Self::select_output], for outputs with over-voltage protection only.
    fn select_ovp_output(&mut self, index: u8) -> Result<(), S::Error> {
        if self.output(index)?.ovp_max.is_none() {
            return Err(Error::OutOfRange);
        }
        self.select_output(index)?;
        Ok(())
    }

    fn ask_state(&mut self, query: core::fmt::Arguments) -> Result<bool, S::Error> {
        if self.options.simulate {
            return Ok(false);
        }
        let response = self.ask(query)?;
        Ok(State::from_response(&response).into())
    }

    fn ask_f32(&mut self, query: core::fmt::Arguments) -> Result<f32, S::Error> {
        if self.options.simulate {
            return Ok(0.0);
        }
        let response = self.ask(query)?;
        response
            .trim()
            .parse::<f32>()
            .map_err(|_| Error::InvalidResponse)
    }
}

impl<S: Interface, M: Model, const L: usize> OutputRanged for E3600Psu<S, M, L> {
    type Error = S::Error;

    fn output_count(&self) -> usize {
        M::DESCRIPTOR.output_count()
    }

    fn output(&self, index: u8) -> Result<OutputDescriptor, S::Error> {
        M::DESCRIPTOR.output(index).copied().ok_or(Error::OutOfRange)
    }

    fn set_voltage_level(&mut self, index: u8, volts: f32) -> Result<(), S::Error> {
        if !self.output(index)?.accepts_voltage(volts) {
            return Err(Error::OutOfRange);
        }
        self.select_output(index)?;
        self.write(format_args!("source:voltage:level {:.3}", volts))
    }

    fn get_voltage_level(&mut self, index: u8) -> Result<f32, S::Error> {
        self.select_output(index)?;
        self.ask_f32(format_args!("source:voltage:level?"))
    }

    fn set_current_limit(&mut self, index: u8, amps: f32) -> Result<(), S::Error> {
        if !self.output(index)?.accepts_current(amps) {
            return Err(Error::OutOfRange);
        }
        self.select_output(index)?;
        self.write(format_args!("source:current:level {:.3}", amps))
    }

    fn get_current_limit(&mut self, index: u8) -> Result<f32, S::Error> {
        self.select_output(index)?;
        self.ask_f32(format_args!("source:current:level?"))
    }

    fn configure_range(&mut self, index: u8, name: &str) -> Result<(), S::Error> {
        let output = self.output(index)?;
        let range = *output.range(name).ok_or(Error::ValueNotSupported)?;
        // Single range outputs have nothing to switch.
        if output.ranges.len() > 1 {
            self.select_output(index)?;
            self.write(format_args!("source:voltage:range {}", range.name))?;
        }
        Ok(())
    }

    fn current_limit_max(&self, index: u8, volts: f32) -> Result<f32, S::Error> {
        self.output(index)?
            .current_limit_max(volts)
            .ok_or(Error::OutOfRange)
    }

    fn voltage_level_max(&self, index: u8, amps: f32) -> Result<f32, S::Error> {
        self.output(index)?
            .voltage_level_max(amps)
            .ok_or(Error::OutOfRange)
    }

    fn get_outputs_enabled(&mut self) -> Result<bool, S::Error> {
        if self.needs_query(&self.outputs_enabled) {
            let response = self.ask(format_args!("output:state?"))?;
            self.outputs_enabled
                .set(State::from_response(&response).into());
        }
        Ok(self.outputs_enabled.value())
    }

    fn set_outputs_enabled(&mut self, enabled: bool) -> Result<(), S::Error> {
        self.write(format_args!(
            "output:state {}",
            State::from(enabled).keyword()
        ))?;
        self.outputs_enabled.set(enabled);
        Ok(())
    }

    fn configure_ovp(&mut self, index: u8, enabled: bool, limit: f32) -> Result<(), S::Error> {
        let output = self.output(index)?;
        if output.ovp_max.is_none() || (enabled && !output.accepts_ovp_limit(limit)) {
            return Err(Error::OutOfRange);
        }
        self.select_output(index)?;
        if enabled {
            self.write(format_args!("source:voltage:protection:level {:.3}", limit))?;
        }
        self.write(format_args!(
            "source:voltage:protection:state {}",
            State::from(enabled).keyword()
        ))
    }

    fn get_ovp_enabled(&mut self, index: u8) -> Result<bool, S::Error> {
        self.select_ovp_output(index)?;
        self.ask_state(format_args!("source:voltage:protection:state?"))
    }

    fn get_ovp_limit(&mut self, index: u8) -> Result<f32, S::Error> {
        self.select_ovp_output(index)?;
        self.ask_f32(format_args!("source:voltage:protection:level?"))
    }

    fn get_ovp_tripped(&mut self, index: u8) -> Result<bool, S::Error> {
        self.select_ovp_output(index)?;
        self.ask_state(format_args!("source:voltage:protection:tripped?"))
    }

    fn reset_output_protection(&mut self, index: u8) -> Result<(), S::Error> {
        self.select_ovp_output(index)?;
        self.write(format_args!("source:voltage:protection:clear"))
    }
}

impl<S: Interface, M: Model, const L: usize> Measurable for E3600Psu<S, M, L> {
    type Error = S::Error;

    fn measure(&mut self, index: u8, measurement: MeasurementType) -> Result<f32, S::Error> {
        self.select_output(index)?;
        self.ask_f32(format_args!("measure:{}?", measurement.as_ref()))
    }
}
