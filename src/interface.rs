//! The transport seam between the driver and whatever carries its bytes.

/// Any [embedded_io::Read] + [embedded_io::Write] transport can talk to an E3600 PSU.
///
/// The hooks default to doing nothing so a plain serial port only needs the marker impl.
pub trait Interface: embedded_io::Read + embedded_io::Write {
    /// Force hardware flow control on, if the transport has such a setting.
    ///
    /// The E3600 series requires DSR/DTR handshaking over RS-232.
    fn enable_flow_control(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Out-of-band clear of the command/response synchronisation, e.g. GPIB device clear.
    ///
    /// This does not reset the instrument settings.
    fn interface_clear(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
