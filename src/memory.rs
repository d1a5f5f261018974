//! Non-volatile memory slots holding output settings snapshots.
//!
//! The instrument owns the slot contents, we only ever address them by index (1 - memory size).

use crate::{
    error::{Error, Result},
    interface::Interface,
    model::Model,
    psu::E3600Psu,
    types::MemoryName,
};

/// Save, recall and name the instrument's stored states.
pub trait MemorySlotted {
    type Error: embedded_io::Error;

    /// Number of slots, the highest valid index.
    fn memory_size(&self) -> u8;

    /// Store the current output settings in slot `index`.
    fn save(&mut self, index: u8) -> Result<(), Self::Error>;
    /// Restore the output settings from slot `index`.
    fn recall(&mut self, index: u8) -> Result<(), Self::Error>;
    fn get_name(&mut self, index: u8) -> Result<MemoryName, Self::Error>;
    fn set_name(&mut self, index: u8, name: &str) -> Result<(), Self::Error>;
}

impl<S: Interface, M: Model, const L: usize> E3600Psu<S, M, L> {
    fn check_memory_index(&self, index: u8) -> Result<(), S::Error> {
        if !(1..=M::DESCRIPTOR.memory_size).contains(&index) {
            return Err(Error::OutOfRange);
        }
        Ok(())
    }
}

impl<S: Interface, M: Model, const L: usize> MemorySlotted for E3600Psu<S, M, L> {
    type Error = S::Error;

    fn memory_size(&self) -> u8 {
        M::DESCRIPTOR.memory_size
    }

    fn save(&mut self, index: u8) -> Result<(), S::Error> {
        self.check_memory_index(index)?;
        self.write(format_args!("*sav {}", index))
    }

    fn recall(&mut self, index: u8) -> Result<(), S::Error> {
        self.check_memory_index(index)?;
        self.write(format_args!("*rcl {}", index))?;
        // Recalled settings may differ from anything we have cached.
        self.invalidate_all();
        Ok(())
    }

    /// Simulated drivers have no names stored and return an empty name.
    fn get_name(&mut self, index: u8) -> Result<MemoryName, S::Error> {
        self.check_memory_index(index)?;
        if self.options.simulate {
            return Ok(MemoryName::new());
        }
        let response = self.ask(format_args!("memory:state:name? {}", index))?;
        MemoryName::try_from(response.trim_matches(|c: char| c == ' ' || c == '"'))
            .map_err(|_| Error::BufferError)
    }

    fn set_name(&mut self, index: u8, name: &str) -> Result<(), S::Error> {
        self.check_memory_index(index)?;
        // The name goes out quoted on a single command line.
        if name.chars().any(|c| c == '"' || c.is_control()) {
            return Err(Error::ValueNotSupported);
        }
        self.write(format_args!("memory:state:name {}, \"{}\"", index, name))
    }
}
