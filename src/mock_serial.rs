//! We use this mocking module in unit tests to emulate a serial connection to the PSU.

use crate::interface::Interface;

/// Our mock type used to emulate a serial port.
pub struct MockSerial {
    /// Buffer to store data written to the mock serial port
    write_buffer: heapless::Vec<u8, 512>,
    /// Buffer containing queued response lines to be read
    read_buffer: heapless::Vec<u8, 512>,
    /// Current position in the read buffer
    read_position: usize,
    /// Flag to simulate write errors
    should_error_on_write: bool,
    /// Flag to simulate read errors
    should_error_on_read: bool,
    /// Number of interface clears requested
    clears: usize,
    /// Whether flow control has been switched on
    flow_control: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum MockSerialError {
    /// Simulated buffer overflow
    #[error("buffer overflow")]
    BufferOverflow,
    /// Generic simulated error for testing
    #[error("simulated error")]
    SimulatedError,
    /// Would block - no data available
    #[error("would block")]
    WouldBlock,
}

impl embedded_io::Error for MockSerialError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            MockSerialError::BufferOverflow => embedded_io::ErrorKind::OutOfMemory,
            MockSerialError::SimulatedError => embedded_io::ErrorKind::Other,
            MockSerialError::WouldBlock => embedded_io::ErrorKind::TimedOut,
        }
    }
}

impl embedded_io::ErrorType for MockSerial {
    type Error = MockSerialError;
}

impl embedded_io::Write for MockSerial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if self.should_error_on_write {
            return Err(MockSerialError::SimulatedError);
        }

        self.write_buffer
            .extend_from_slice(buf)
            .map_err(|_| MockSerialError::BufferOverflow)?;

        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        if self.should_error_on_write {
            return Err(MockSerialError::SimulatedError);
        }
        Ok(())
    }
}

impl embedded_io::Read for MockSerial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.should_error_on_read {
            return Err(MockSerialError::SimulatedError);
        }

        if self.read_position >= self.read_buffer.len() {
            return Err(MockSerialError::WouldBlock);
        }

        let available_bytes = self.read_buffer.len() - self.read_position;
        let bytes_to_read = core::cmp::min(buf.len(), available_bytes);

        buf[..bytes_to_read]
            .copy_from_slice(&self.read_buffer[self.read_position..self.read_position + bytes_to_read]);

        self.read_position += bytes_to_read;
        Ok(bytes_to_read)
    }
}

impl Interface for MockSerial {
    fn enable_flow_control(&mut self) -> Result<(), Self::Error> {
        self.flow_control = true;
        Ok(())
    }

    fn interface_clear(&mut self) -> Result<(), Self::Error> {
        self.clears += 1;
        Ok(())
    }
}

impl MockSerial {
    /// Create a new MockSerial instance with empty buffers
    pub fn new() -> Self {
        Self {
            write_buffer: heapless::Vec::new(),
            read_buffer: heapless::Vec::new(),
            read_position: 0,
            should_error_on_write: false,
            should_error_on_read: false,
            clears: 0,
            flow_control: false,
        }
    }

    /// Append a response line. The `\n` terminator is added for you.
    pub fn queue_response(&mut self, line: &str) -> Result<(), MockSerialError> {
        self.read_buffer
            .extend_from_slice(line.as_bytes())
            .map_err(|_| MockSerialError::BufferOverflow)?;
        self.read_buffer
            .push(b'\n')
            .map_err(|_| MockSerialError::BufferOverflow)
    }

    /// Get a reference to the data that was written to this mock serial port
    pub fn written_data(&self) -> &[u8] {
        &self.write_buffer
    }

    /// Clear the write buffer
    pub fn clear_written_data(&mut self) {
        self.write_buffer.clear();
    }

    /// Whether every queued response byte has been read.
    pub fn responses_consumed(&self) -> bool {
        self.read_position >= self.read_buffer.len()
    }

    /// Configure whether write operations should fail with an error
    pub fn set_write_error(&mut self, should_error: bool) {
        self.should_error_on_write = should_error;
    }

    /// Configure whether read operations should fail with an error
    pub fn set_read_error(&mut self, should_error: bool) {
        self.should_error_on_read = should_error;
    }

    pub fn cleared(&self) -> usize {
        self.clears
    }

    pub fn flow_control_enabled(&self) -> bool {
        self.flow_control
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_io::{Read, Write};

    #[test]
    fn test_new_mock_serial() {
        let mock = MockSerial::new();
        assert_eq!(mock.written_data().len(), 0);
        assert!(mock.responses_consumed());
        assert_eq!(mock.cleared(), 0);
        assert!(!mock.flow_control_enabled());
    }

    #[test]
    fn test_write_multiple_times() {
        let mut mock = MockSerial::new();
        mock.write_all(b"*sav ").unwrap();
        mock.write_all(b"1\n").unwrap();
        assert_eq!(mock.written_data(), b"*sav 1\n");
    }

    #[test]
    fn test_write_buffer_overflow() {
        let mut mock = MockSerial::new();
        let large_data = [0u8; 600];

        let result = mock.write(&large_data);
        assert!(matches!(result, Err(MockSerialError::BufferOverflow)));
    }

    #[test]
    fn test_queued_responses_read_in_order() {
        let mut mock = MockSerial::new();
        mock.queue_response("ON").unwrap();
        mock.queue_response("OFF").unwrap();

        let mut buffer = [0u8; 16];
        let read = mock.read(&mut buffer).unwrap();
        assert_eq!(&buffer[..read], b"ON\nOFF\n");
        assert!(mock.responses_consumed());
    }

    #[test]
    fn test_read_partial_data() {
        let mut mock = MockSerial::new();
        mock.queue_response("Long response data").unwrap();

        let mut buffer = [0u8; 5];
        assert_eq!(mock.read(&mut buffer).unwrap(), 5);
        assert_eq!(&buffer, b"Long ");
        assert!(!mock.responses_consumed());
    }

    #[test]
    fn test_read_timeout_when_no_data() {
        let mut mock = MockSerial::new();
        let mut buffer = [0u8; 10];

        let result = mock.read(&mut buffer);
        assert!(matches!(result, Err(MockSerialError::WouldBlock)));
    }

    #[test]
    fn test_error_simulation() {
        let mut mock = MockSerial::new();
        mock.set_write_error(true);
        assert!(matches!(mock.write(b"test"), Err(MockSerialError::SimulatedError)));
        assert!(mock.flush().is_err());
        assert!(mock.written_data().is_empty());

        mock.set_write_error(false);
        assert!(mock.write(b"test").is_ok());

        mock.queue_response("data").unwrap();
        mock.set_read_error(true);
        let mut buffer = [0u8; 10];
        assert!(mock.read(&mut buffer).is_err());
        mock.set_read_error(false);
        assert!(mock.read(&mut buffer).is_ok());
    }

    #[test]
    fn test_interface_hooks() {
        let mut mock = MockSerial::new();
        mock.enable_flow_control().unwrap();
        mock.interface_clear().unwrap();
        mock.interface_clear().unwrap();
        assert!(mock.flow_control_enabled());
        assert_eq!(mock.cleared(), 2);
    }
}
