use std::env;

use agilent_e3600_psu::{
    AgilentE3631A,
    coupling::Coupled,
    interface::Interface,
    memory::MemorySlotted,
    output::{Measurable, OutputRanged},
    psu::DriverOptions,
    types::MeasurementType,
};
use inquire::Select;
use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};

// Configuration constants - adjust these for your setup
const BAUD_RATE: u32 = 9600;
// Measurements take a while, a reasonably large time out is required.
const SERIAL_TIMEOUT_MS: u64 = 2000;
const OUTPUT: u8 = 1;
const OUTPUT_VOLTAGE_V: f32 = 5.0;
const CURRENT_LIMIT_A: f32 = 0.1;
const MEMORY_SLOT: u8 = 1;
const STABILIZATION_DELAY_MS: u64 = 1000;

pub struct PortWrapper(Box<dyn SerialPort>);

#[derive(Debug)]
pub struct IoError(std::io::Error);

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl embedded_io::Error for IoError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self.0.kind() {
            std::io::ErrorKind::NotFound => embedded_io::ErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => embedded_io::ErrorKind::PermissionDenied,
            std::io::ErrorKind::BrokenPipe => embedded_io::ErrorKind::BrokenPipe,
            std::io::ErrorKind::InvalidInput => embedded_io::ErrorKind::InvalidInput,
            std::io::ErrorKind::InvalidData => embedded_io::ErrorKind::InvalidData,
            std::io::ErrorKind::TimedOut => embedded_io::ErrorKind::TimedOut,
            std::io::ErrorKind::Interrupted => embedded_io::ErrorKind::Interrupted,
            std::io::ErrorKind::Unsupported => embedded_io::ErrorKind::Unsupported,
            std::io::ErrorKind::OutOfMemory => embedded_io::ErrorKind::OutOfMemory,
            _ => embedded_io::ErrorKind::Other,
        }
    }
}

impl embedded_io::ErrorType for PortWrapper {
    type Error = IoError;
}

impl embedded_io::Read for PortWrapper {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        std::io::Read::read(&mut self.0, buf).map_err(IoError)
    }
}

impl embedded_io::Write for PortWrapper {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        std::io::Write::write(&mut self.0, buf).map_err(IoError)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        std::io::Write::flush(&mut self.0).map_err(IoError)
    }
}

impl Interface for PortWrapper {
    fn enable_flow_control(&mut self) -> Result<(), Self::Error> {
        // The PSU only transmits while DTR is asserted.
        self.0
            .write_data_terminal_ready(true)
            .map_err(|e| IoError(e.into()))
    }

    fn interface_clear(&mut self) -> Result<(), Self::Error> {
        self.0
            .clear(ClearBuffer::All)
            .map_err(|e| IoError(e.into()))
    }
}

fn main() {
    env_logger::init();

    // Get serial port from command line arg or interactive selection
    let port_name = env::args().nth(1).unwrap_or_else(|| {
        // List available serial ports
        let ports = serialport::available_ports().expect("Failed to enumerate serial ports");

        if ports.is_empty() {
            eprintln!("No serial ports found!");
            std::process::exit(1);
        }

        let port_names: Vec<String> = ports.iter().map(|p| p.port_name.clone()).collect();

        // Interactive selection
        Select::new("Select a serial port:", port_names)
            .prompt()
            .expect("Failed to select port")
    });

    println!("Using port: {}", port_name);

    // Open serial port
    let port = serialport::new(&port_name, BAUD_RATE)
        .data_bits(DataBits::Eight)
        .stop_bits(StopBits::Two)
        .parity(Parity::None)
        .flow_control(FlowControl::None)
        .timeout(std::time::Duration::from_millis(SERIAL_TIMEOUT_MS))
        .open()
        .expect("Failed to open serial port");

    let port = PortWrapper(port);

    // Create a PSU object
    let mut psu: AgilentE3631A<PortWrapper> = AgilentE3631A::new(port, DriverOptions::default());

    // RS-232 requires remote mode before any other command is accepted.
    psu.send_command("system:remote").unwrap();
    psu.initialize(true, true).expect("Failed to initialize PSU");

    let identity = psu.identity().unwrap();
    println!("Identity: {:#?}", identity);

    // Set output voltage and current limit
    psu.set_voltage_level(OUTPUT, OUTPUT_VOLTAGE_V).unwrap();
    println!("Set output {} voltage to {}V", OUTPUT, OUTPUT_VOLTAGE_V);
    psu.set_current_limit(OUTPUT, CURRENT_LIMIT_A).unwrap();
    println!("Set output {} current limit to {}A", OUTPUT, CURRENT_LIMIT_A);

    // Enable the outputs
    psu.set_outputs_enabled(true).unwrap();
    println!("Outputs enabled");

    // Wait for output to stabilize
    std::thread::sleep(std::time::Duration::from_millis(STABILIZATION_DELAY_MS));

    let measured_voltage = psu.measure(OUTPUT, MeasurementType::Voltage).unwrap();
    println!("Measured output voltage: {:.3}V", measured_voltage);

    println!("\n--- Coupling ---");
    println!("Tracking enabled: {}", psu.get_tracking_enabled().unwrap());
    println!("Tracking type: {}", psu.get_tracking_type().as_ref());
    println!("Trigger coupling: {}", psu.get_trigger_coupling().unwrap());

    println!("\n--- Memory ---");
    psu.save(MEMORY_SLOT).unwrap();
    psu.set_name(MEMORY_SLOT, "DEMO").unwrap();
    println!(
        "Saved settings to slot {} as {:?}",
        MEMORY_SLOT,
        psu.get_name(MEMORY_SLOT).unwrap()
    );

    psu.set_outputs_enabled(false).unwrap();
    psu.check_errors().unwrap();
    println!("Outputs disabled");
}
