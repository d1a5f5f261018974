use core::{fmt, marker::PhantomData};

use fugit::MillisDurationU32;

use crate::{
    cache::Cached,
    error::{Error, Result},
    interface::Interface,
    model::{self, Model, ModelDescriptor},
    types::{
        ErrorMessage, IdString, Identity, StandardEventStatus, TrackingType, TriggerSource,
        parse_code_message,
    },
};

/// Behaviour switches for a driver instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverOptions {
    /// Skip every transport call while updating local state as if it succeeded.
    pub simulate: bool,
    /// Serve getters from the local cache when it is known to be valid.
    pub cache: bool,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            simulate: false,
            cache: true,
        }
    }
}

impl DriverOptions {
    pub fn with_simulate(mut self, simulate: bool) -> Self {
        self.simulate = simulate;
        self
    }

    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }
}

/// You can create an E3600Psu using any interface which implements [Interface].
///
/// The model marker `M` selects the output limits, memory size and expected instrument ID.
/// `L` is the capacity of the command and response buffers.
///
/// For it's methods, we generally use the nomenclature that "set" meant to write a configuration and "get" means to read
/// back a configuration value. Where as "measure" means to get a measured value.
pub struct E3600Psu<S: Interface, M: Model, const L: usize = 128> {
    pub(crate) interface: S,
    pub(crate) options: DriverOptions,
    identity: Option<Identity>,
    pub(crate) couple_tracking_enabled: Cached<bool>,
    pub(crate) couple_tracking_type: TrackingType,
    pub(crate) couple_trigger: Cached<bool>,
    pub(crate) trigger_source: Cached<TriggerSource>,
    pub(crate) trigger_delay: Cached<MillisDurationU32>,
    pub(crate) outputs_enabled: Cached<bool>,
    _model: PhantomData<M>,
}

impl<S: Interface, M: Model, const L: usize> E3600Psu<S, M, L> {
    /// Create a new driver on an already opened interface.
    ///
    /// Nothing is sent until [Self::initialize] or another method is called.
    pub fn new(interface: S, options: DriverOptions) -> Self {
        Self {
            interface,
            options,
            identity: None,
            couple_tracking_enabled: Cached::new(false),
            couple_tracking_type: TrackingType::default(),
            couple_trigger: Cached::new(false),
            trigger_source: Cached::new(TriggerSource::default()),
            trigger_delay: Cached::new(MillisDurationU32::millis(0)),
            outputs_enabled: Cached::new(false),
            _model: PhantomData,
        }
    }

    /// Bring the instrument into a known state.
    ///
    /// Enables flow control, clears the interface, optionally checks the instrument model
    /// against [ModelDescriptor::instrument_id] and optionally resets the instrument.
    pub fn initialize(&mut self, id_query: bool, reset: bool) -> Result<(), S::Error> {
        // The instrument on the other end may have been swapped since the last call.
        self.identity = None;

        self.interface
            .enable_flow_control()
            .map_err(Error::SerialError)?;

        if !self.options.simulate {
            self.interface
                .interface_clear()
                .map_err(Error::SerialError)?;
        }

        if id_query && !self.options.simulate {
            let expected = M::DESCRIPTOR.instrument_id;
            let actual = self.identity()?.model;
            if !actual.starts_with(expected) {
                log::warn!("instrument ID mismatch, expecting {}, got {}", expected, actual);
                let expected = IdString::try_from(expected).map_err(|_| Error::BufferError)?;
                return Err(Error::IdMismatch { expected, actual });
            }
            log::info!("identified {}", actual);
        }

        if reset {
            self.utility_reset()?;
        }
        Ok(())
    }

    /// Static configuration of the model this driver talks to.
    pub fn descriptor(&self) -> ModelDescriptor {
        M::DESCRIPTOR
    }

    pub fn description(&self) -> &'static str {
        M::DESCRIPTOR.description
    }

    pub fn supported_models(&self) -> &'static [&'static str] {
        model::SUPPORTED_MODELS
    }

    pub fn options(&self) -> DriverOptions {
        self.options
    }

    pub fn is_simulated(&self) -> bool {
        self.options.simulate
    }

    /// Give back the interface, consuming the driver.
    pub fn release(self) -> S {
        self.interface
    }

    /// Return the identity reported by `*idn?`. Queried once per driver instance.
    pub fn identity(&mut self) -> Result<Identity, S::Error> {
        if let Some(identity) = &self.identity {
            return Ok(identity.clone());
        }

        let identity = if self.options.simulate {
            Identity {
                manufacturer: IdString::try_from(model::MANUFACTURER)
                    .map_err(|_| Error::BufferError)?,
                model: IdString::try_from(M::DESCRIPTOR.instrument_id)
                    .map_err(|_| Error::BufferError)?,
                ..Default::default()
            }
        } else {
            let response = self.ask(format_args!("*idn?"))?;
            Identity::parse(&response).ok_or(Error::InvalidResponse)?
        };

        self.identity = Some(identity.clone());
        Ok(identity)
    }

    /// Reset the instrument to its power-on state and forget all cached settings.
    pub fn utility_reset(&mut self) -> Result<(), S::Error> {
        self.write(format_args!("*rst"))?;
        self.invalidate_all();
        self.couple_tracking_type = TrackingType::default();
        Ok(())
    }

    /// Pop the oldest entry off the instrument error queue. Code `0` means no error.
    pub fn utility_error_query(&mut self) -> Result<(i16, ErrorMessage), S::Error> {
        if self.options.simulate {
            return Ok((0, ErrorMessage::try_from("No error").map_err(|_| Error::BufferError)?));
        }
        let response = self.ask(format_args!("system:error?"))?;
        parse_code_message(&response).ok_or(Error::InvalidResponse)
    }

    /// Run the instrument self test. Code `0` means pass.
    pub fn utility_self_test(&mut self) -> Result<(i16, ErrorMessage), S::Error> {
        if self.options.simulate {
            return Ok((0, ErrorMessage::new()));
        }
        let response = self.ask(format_args!("*tst?"))?;
        parse_code_message(&response).ok_or(Error::InvalidResponse)
    }

    /// Read and clear the standard event status register.
    pub fn event_status(&mut self) -> Result<StandardEventStatus, S::Error> {
        if self.options.simulate {
            return Ok(StandardEventStatus::new());
        }
        let response = self.ask(format_args!("*esr?"))?;
        let value = response
            .trim()
            .parse::<u8>()
            .map_err(|_| Error::InvalidResponse)?;
        Ok(StandardEventStatus::from_bytes([value]))
    }

    /// Return the error at the head of the instrument error queue as an [Error::Instrument].
    pub fn check_errors(&mut self) -> Result<(), S::Error> {
        let (code, message) = self.utility_error_query()?;
        if code != 0 {
            return Err(Error::Instrument { code, message });
        }
        Ok(())
    }

    /// Mark every cached setting stale.
    pub fn invalidate_all(&mut self) {
        log::debug!("invalidating cached settings");
        self.couple_tracking_enabled.invalidate();
        self.couple_trigger.invalidate();
        self.trigger_source.invalidate();
        self.trigger_delay.invalidate();
        self.outputs_enabled.invalidate();
    }

    /// Send a raw SCPI command. Cached settings are not updated, see [Self::invalidate_all].
    pub fn send_command(&mut self, command: &str) -> Result<(), S::Error> {
        self.write(format_args!("{}", command))
    }

    /// Send a raw SCPI query and return the response line. Empty when simulated.
    pub fn query(&mut self, query: &str) -> Result<heapless::String<L>, S::Error> {
        if self.options.simulate {
            return Ok(heapless::String::new());
        }
        self.ask(format_args!("{}", query))
    }

    /// Whether a getter must go to the instrument rather than the cache.
    pub(crate) fn needs_query<T: Copy>(&self, entry: &Cached<T>) -> bool {
        !self.options.simulate && !(self.options.cache && entry.is_valid())
    }

    /// Send a single command line. Skipped in simulation mode.
    pub(crate) fn write(&mut self, command: fmt::Arguments) -> Result<(), S::Error> {
        if self.options.simulate {
            log::trace!("simulated -> {}", command);
            return Ok(());
        }
        self.send(command)
    }

    /// Send a query and return the response line with its terminator removed.
    pub(crate) fn ask(&mut self, query: fmt::Arguments) -> Result<heapless::String<L>, S::Error> {
        self.send(query)?;
        self.read_line()
    }

    fn send(&mut self, command: fmt::Arguments) -> Result<(), S::Error> {
        let mut line: heapless::String<L> = heapless::String::new();
        fmt::Write::write_fmt(&mut line, command)?;
        log::debug!("-> {}", line);
        line.push('\n').map_err(|_| Error::BufferError)?;

        self.interface
            .write_all(line.as_bytes())
            .map_err(Error::SerialError)?;
        self.interface.flush().map_err(Error::SerialError)
    }

    fn read_line(&mut self) -> Result<heapless::String<L>, S::Error> {
        let mut buff: heapless::Vec<u8, L> = heapless::Vec::new();

        // Read one byte at a time so nothing past the terminator is consumed.
        let mut byte = [0u8; 1];
        loop {
            let bytes_read = self.interface.read(&mut byte).map_err(Error::SerialError)?;
            if bytes_read == 0 {
                return Err(Error::Timeout);
            }
            if byte[0] == b'\n' {
                break;
            }
            buff.push(byte[0]).map_err(|_| Error::BufferError)?;
        }
        if buff.last() == Some(&b'\r') {
            buff.pop();
        }

        let response = heapless::String::from_utf8(buff).map_err(|_| Error::InvalidResponse)?;
        log::trace!("<- {}", response);
        Ok(response)
    }
}
