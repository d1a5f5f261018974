//! Static configuration for each supported E3600 series model.
//!
//! Voltage and current ceilings are the datasheet programming ranges, which run slightly past
//! the nominal rating (6.18 V on a 6 V output). Negative ceilings belong to negative outputs
//! (E3631A `N25V`).

/// A named voltage range of an output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoltageRange {
    /// Range name as used by `source:voltage:range`, e.g. `P15V`.
    pub name: &'static str,
    /// Maximum voltage of this range in volts.
    pub voltage_max: f32,
    /// Maximum current available in this range in amps.
    pub current_max: f32,
}

/// Describes a single physical output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputDescriptor {
    pub ranges: &'static [VoltageRange],
    /// Over-voltage protection ceiling in volts, where the output has OVP.
    pub ovp_max: Option<f32>,
}

impl OutputDescriptor {
    /// Maximum voltage across all ranges, signed.
    pub fn voltage_max(&self) -> f32 {
        self.ranges
            .iter()
            .map(|r| r.voltage_max)
            .fold(0.0, |acc, v| if v.abs() > acc.abs() { v } else { acc })
    }

    /// Maximum current across all ranges.
    pub fn current_max(&self) -> f32 {
        self.ranges
            .iter()
            .map(|r| r.current_max)
            .fold(0.0, f32::max)
    }

    /// Look up a range by name, ignoring case.
    pub fn range(&self, name: &str) -> Option<&VoltageRange> {
        self.ranges.iter().find(|r| r.name.eq_ignore_ascii_case(name))
    }

    /// Whether `volts` can be programmed on this output.
    pub fn accepts_voltage(&self, volts: f32) -> bool {
        let max = self.voltage_max();
        if max < 0.0 {
            (max..=0.0).contains(&volts)
        } else {
            (0.0..=max).contains(&volts)
        }
    }

    /// Whether `amps` can be programmed on this output.
    pub fn accepts_current(&self, amps: f32) -> bool {
        (0.0..=self.current_max()).contains(&amps)
    }

    /// Whether `volts` is a valid over-voltage trip level. Outputs without OVP accept nothing.
    pub fn accepts_ovp_limit(&self, volts: f32) -> bool {
        self.ovp_max
            .is_some_and(|max| (0.0..=max).contains(&volts))
    }

    /// Highest current limit available while programmed to `volts`.
    ///
    /// `None` if no range reaches `volts`.
    pub fn current_limit_max(&self, volts: f32) -> Option<f32> {
        self.ranges
            .iter()
            .filter(|r| volts.abs() <= r.voltage_max.abs())
            .map(|r| r.current_max)
            .reduce(f32::max)
    }

    /// Highest voltage available while limited to `amps`, signed.
    ///
    /// `None` if no range supplies `amps`.
    pub fn voltage_level_max(&self, amps: f32) -> Option<f32> {
        self.ranges
            .iter()
            .filter(|r| amps <= r.current_max)
            .map(|r| r.voltage_max)
            .reduce(|acc, v| if v.abs() > acc.abs() { v } else { acc })
    }
}

/// Everything that differs between members of the family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelDescriptor {
    /// Expected prefix of the model reported by `*idn?`.
    pub instrument_id: &'static str,
    pub description: &'static str,
    pub outputs: &'static [OutputDescriptor],
    /// Number of non-volatile memory slots, numbered from 1.
    pub memory_size: u8,
}

impl ModelDescriptor {
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Output descriptor by 1-based index.
    pub fn output(&self, index: u8) -> Option<&OutputDescriptor> {
        (index as usize).checked_sub(1).and_then(|i| self.outputs.get(i))
    }
}

/// Implemented by a marker type per supported model.
pub trait Model {
    const DESCRIPTOR: ModelDescriptor;
}

pub const MANUFACTURER: &str = "Agilent Technologies";
pub const VENDOR: &str = "Agilent Technologies";
pub const SPECIFICATION_MAJOR_VERSION: u8 = 3;
pub const SPECIFICATION_MINOR_VERSION: u8 = 0;

/// Every instrument model this driver family supports.
pub const SUPPORTED_MODELS: &[&str] = &[
    "E3631A", "E3632A", "E3633A", "E3634A", "E3640A", "E3641A", "E3642A", "E3643A", "E3644A",
    "E3645A", "E3646A", "E3647A", "E3648A", "E3649A",
];

const fn range(name: &'static str, voltage_max: f32, current_max: f32) -> VoltageRange {
    VoltageRange {
        name,
        voltage_max,
        current_max,
    }
}

const E3631_OUTPUTS: &[OutputDescriptor] = &[
    OutputDescriptor {
        ranges: &[range("P6V", 6.18, 5.15)],
        ovp_max: Some(27.0),
    },
    OutputDescriptor {
        ranges: &[range("P25V", 25.75, 1.03)],
        ovp_max: Some(27.0),
    },
    OutputDescriptor {
        ranges: &[range("N25V", -25.75, 1.03)],
        ovp_max: None,
    },
];

const E3632_RANGES: &[VoltageRange] = &[range("P15V", 15.45, 7.21), range("P30V", 30.9, 4.12)];
const E3633_RANGES: &[VoltageRange] = &[range("P8V", 8.24, 20.6), range("P20V", 20.6, 10.3)];
const E3634_RANGES: &[VoltageRange] = &[range("P25V", 25.75, 7.21), range("P50V", 51.5, 4.12)];
const E3640_RANGES: &[VoltageRange] = &[range("P8V", 8.24, 3.09), range("P20V", 20.6, 1.545)];
const E3641_RANGES: &[VoltageRange] = &[range("P35V", 36.05, 0.824), range("P60V", 61.8, 0.515)];
const E3642_RANGES: &[VoltageRange] = &[range("P8V", 8.24, 5.15), range("P20V", 20.6, 2.575)];
const E3643_RANGES: &[VoltageRange] = &[range("P35V", 36.05, 1.442), range("P60V", 61.8, 0.824)];
const E3644_RANGES: &[VoltageRange] = &[range("P8V", 8.24, 8.24), range("P20V", 20.6, 4.12)];
const E3645_RANGES: &[VoltageRange] = &[range("P35V", 36.05, 2.266), range("P60V", 61.8, 1.339)];

const fn single(ranges: &'static [VoltageRange], ovp_max: f32) -> [OutputDescriptor; 1] {
    [OutputDescriptor {
        ranges,
        ovp_max: Some(ovp_max),
    }]
}

const fn dual(ranges: &'static [VoltageRange], ovp_max: f32) -> [OutputDescriptor; 2] {
    let output = OutputDescriptor {
        ranges,
        ovp_max: Some(ovp_max),
    };
    [output, output]
}

const E3632_OUTPUTS: [OutputDescriptor; 1] = single(E3632_RANGES, 32.0);
const E3633_OUTPUTS: [OutputDescriptor; 1] = single(E3633_RANGES, 22.0);
const E3634_OUTPUTS: [OutputDescriptor; 1] = single(E3634_RANGES, 55.0);
const E3640_OUTPUTS: [OutputDescriptor; 1] = single(E3640_RANGES, 22.0);
const E3641_OUTPUTS: [OutputDescriptor; 1] = single(E3641_RANGES, 66.0);
const E3642_OUTPUTS: [OutputDescriptor; 1] = single(E3642_RANGES, 22.0);
const E3643_OUTPUTS: [OutputDescriptor; 1] = single(E3643_RANGES, 66.0);
const E3644_OUTPUTS: [OutputDescriptor; 1] = single(E3644_RANGES, 22.0);
const E3645_OUTPUTS: [OutputDescriptor; 1] = single(E3645_RANGES, 66.0);
const E3646_OUTPUTS: [OutputDescriptor; 2] = dual(E3640_RANGES, 22.0);
const E3647_OUTPUTS: [OutputDescriptor; 2] = dual(E3641_RANGES, 66.0);
const E3648_OUTPUTS: [OutputDescriptor; 2] = dual(E3642_RANGES, 22.0);
const E3649_OUTPUTS: [OutputDescriptor; 2] = dual(E3643_RANGES, 66.0);

macro_rules! model {
    ($(#[$meta:meta])* $name:ident, $id:literal, $description:literal, $outputs:expr, $memory:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl Model for $name {
            const DESCRIPTOR: ModelDescriptor = ModelDescriptor {
                instrument_id: $id,
                description: $description,
                outputs: $outputs,
                memory_size: $memory,
            };
        }
    };
}

model!(
    /// Family descriptor. Matches no real instrument ID, use a concrete model for ID checks.
    E3600A,
    "E3600A",
    "Agilent E3600A series DC power supply driver",
    E3631_OUTPUTS,
    5
);
model!(
    /// Triple output, +6V/5A, +25V/1A, -25V/1A.
    E3631A,
    "E3631A",
    "Agilent E3631A DC power supply driver",
    E3631_OUTPUTS,
    3
);
model!(E3632A, "E3632A", "Agilent E3632A DC power supply driver", &E3632_OUTPUTS, 3);
model!(E3633A, "E3633A", "Agilent E3633A DC power supply driver", &E3633_OUTPUTS, 3);
model!(E3634A, "E3634A", "Agilent E3634A DC power supply driver", &E3634_OUTPUTS, 3);
model!(E3640A, "E3640A", "Agilent E3640A DC power supply driver", &E3640_OUTPUTS, 5);
model!(E3641A, "E3641A", "Agilent E3641A DC power supply driver", &E3641_OUTPUTS, 5);
model!(E3642A, "E3642A", "Agilent E3642A DC power supply driver", &E3642_OUTPUTS, 5);
model!(E3643A, "E3643A", "Agilent E3643A DC power supply driver", &E3643_OUTPUTS, 5);
model!(E3644A, "E3644A", "Agilent E3644A DC power supply driver", &E3644_OUTPUTS, 5);
model!(E3645A, "E3645A", "Agilent E3645A DC power supply driver", &E3645_OUTPUTS, 5);
model!(E3646A, "E3646A", "Agilent E3646A DC power supply driver", &E3646_OUTPUTS, 5);
model!(E3647A, "E3647A", "Agilent E3647A DC power supply driver", &E3647_OUTPUTS, 5);
model!(E3648A, "E3648A", "Agilent E3648A DC power supply driver", &E3648_OUTPUTS, 5);
model!(E3649A, "E3649A", "Agilent E3649A DC power supply driver", &E3649_OUTPUTS, 5);

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptors() -> [ModelDescriptor; 14] {
        [
            E3631A::DESCRIPTOR,
            E3632A::DESCRIPTOR,
            E3633A::DESCRIPTOR,
            E3634A::DESCRIPTOR,
            E3640A::DESCRIPTOR,
            E3641A::DESCRIPTOR,
            E3642A::DESCRIPTOR,
            E3643A::DESCRIPTOR,
            E3644A::DESCRIPTOR,
            E3645A::DESCRIPTOR,
            E3646A::DESCRIPTOR,
            E3647A::DESCRIPTOR,
            E3648A::DESCRIPTOR,
            E3649A::DESCRIPTOR,
        ]
    }

    #[test]
    fn every_supported_model_has_a_descriptor() {
        // E3631A to E3634A store 3 states, the E364xA models 5.
        let memory_sizes = [3, 3, 3, 3, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5];
        let descriptors = descriptors();
        assert_eq!(descriptors.len(), SUPPORTED_MODELS.len());
        for ((descriptor, model), memory_size) in
            descriptors.iter().zip(SUPPORTED_MODELS).zip(memory_sizes)
        {
            assert_eq!(descriptor.instrument_id, *model);
            assert_eq!(descriptor.memory_size, memory_size, "{}", model);
            assert!(descriptor.output_count() >= 1);
        }
    }

    #[test]
    fn e3631a_outputs() {
        let descriptor = E3631A::DESCRIPTOR;
        assert_eq!(descriptor.output_count(), 3);
        assert_eq!(descriptor.memory_size, 3);

        let p6v = descriptor.output(1).unwrap();
        assert_eq!(p6v.voltage_max(), 6.18);
        assert_eq!(p6v.current_max(), 5.15);
        assert_eq!(p6v.ranges[0].name, "P6V");

        let n25v = descriptor.output(3).unwrap();
        assert_eq!(n25v.voltage_max(), -25.75);
        assert_eq!(n25v.current_max(), 1.03);
        assert_eq!(n25v.ovp_max, None);

        assert!(descriptor.output(0).is_none());
        assert!(descriptor.output(4).is_none());
    }

    #[test]
    fn family_matches_e3631a_limits() {
        assert_eq!(E3600A::DESCRIPTOR.outputs, E3631A::DESCRIPTOR.outputs);
        assert_eq!(E3600A::DESCRIPTOR.memory_size, 5);
    }

    #[test]
    fn voltage_limits_are_sign_aware() {
        let outputs = E3631A::DESCRIPTOR.outputs;
        assert!(outputs[0].accepts_voltage(5.0));
        assert!(!outputs[0].accepts_voltage(-1.0));
        assert!(!outputs[0].accepts_voltage(7.5));
        assert!(outputs[2].accepts_voltage(-20.0));
        assert!(outputs[2].accepts_voltage(0.0));
        assert!(!outputs[2].accepts_voltage(5.0));
        assert!(!outputs[2].accepts_voltage(-27.0));
    }

    #[test]
    fn dual_range_lookup() {
        let output = E3632A::DESCRIPTOR.output(1).unwrap();
        assert_eq!(output.voltage_max(), 30.9);
        assert_eq!(output.current_max(), 7.21);
        assert_eq!(output.range("p15v").unwrap().current_max, 7.21);
        assert!(output.range("P6V").is_none());
    }

    #[test]
    fn range_dependent_maxima() {
        let output = E3632A::DESCRIPTOR.output(1).unwrap();
        assert_eq!(output.current_limit_max(12.0), Some(7.21));
        assert_eq!(output.current_limit_max(20.0), Some(4.12));
        assert_eq!(output.current_limit_max(31.0), None);
        assert_eq!(output.voltage_level_max(3.0), Some(30.9));
        assert_eq!(output.voltage_level_max(5.0), Some(15.45));
        assert_eq!(output.voltage_level_max(8.0), None);

        let n25v = E3631A::DESCRIPTOR.output(3).unwrap();
        assert_eq!(n25v.current_limit_max(-20.0), Some(1.03));
        assert_eq!(n25v.voltage_level_max(0.5), Some(-25.75));
    }

    #[test]
    fn ovp_limits() {
        let outputs = E3631A::DESCRIPTOR.outputs;
        assert!(outputs[0].accepts_ovp_limit(27.0));
        assert!(!outputs[0].accepts_ovp_limit(27.5));
        assert!(!outputs[0].accepts_ovp_limit(-1.0));
        assert!(!outputs[2].accepts_ovp_limit(5.0));
        assert!(E3634A::DESCRIPTOR.outputs[0].accepts_ovp_limit(55.0));
    }

    #[test]
    fn dual_output_models() {
        for descriptor in [E3646A::DESCRIPTOR, E3647A::DESCRIPTOR, E3648A::DESCRIPTOR, E3649A::DESCRIPTOR] {
            assert_eq!(descriptor.output_count(), 2);
            assert_eq!(descriptor.outputs[0], descriptor.outputs[1]);
        }
    }
}
