//! Instrument family classification.
//!
//! Used by driver factories to declare what they build, by configuration files
//! to request an instrument kind, and by the catalog to group drivers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The instrument families known to the HAL.
///
/// The serde representation is the snake_case name used in configuration
/// files (`family = "polarization_controller"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentFamily {
    /// Analog to digital converter
    Adc,
    /// Digital to analog converter
    Dac,
    /// Synchronised DAC and ADC sharing one device
    DacAdc,
    /// Current meter
    Ammeter,
    /// Voltage meter
    Voltmeter,
    /// Optical power meter
    PowerMeter,
    /// Programmable power supply
    PowerSupply,
    /// Laser source
    Laser,
    /// Modulator bias controller
    BiasController,
    /// Polarization controller
    PolarizationController,
    /// Optical switch
    OpticalSwitch,
    /// Variable optical attenuator
    Voa,
}

impl InstrumentFamily {
    /// Every family, in catalog order.
    pub const ALL: [InstrumentFamily; 12] = [
        Self::Adc,
        Self::Dac,
        Self::DacAdc,
        Self::Ammeter,
        Self::Voltmeter,
        Self::PowerMeter,
        Self::PowerSupply,
        Self::Laser,
        Self::BiasController,
        Self::PolarizationController,
        Self::OpticalSwitch,
        Self::Voa,
    ];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Adc => "ADC",
            Self::Dac => "DAC",
            Self::DacAdc => "DAC+ADC",
            Self::Ammeter => "Amperemeter",
            Self::Voltmeter => "Voltmeter",
            Self::PowerMeter => "Powermeter",
            Self::PowerSupply => "Power supply",
            Self::Laser => "Laser",
            Self::BiasController => "Modulator bias controller",
            Self::PolarizationController => "Polarization controller",
            Self::OpticalSwitch => "Optical switch",
            Self::Voa => "VOA",
        }
    }

    /// Name used in configuration files.
    pub fn config_name(&self) -> &'static str {
        match self {
            Self::Adc => "adc",
            Self::Dac => "dac",
            Self::DacAdc => "dac_adc",
            Self::Ammeter => "ammeter",
            Self::Voltmeter => "voltmeter",
            Self::PowerMeter => "power_meter",
            Self::PowerSupply => "power_supply",
            Self::Laser => "laser",
            Self::BiasController => "bias_controller",
            Self::PolarizationController => "polarization_controller",
            Self::OpticalSwitch => "optical_switch",
            Self::Voa => "voa",
        }
    }
}

impl fmt::Display for InstrumentFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_name_matches_serde() {
        for family in InstrumentFamily::ALL {
            let json = serde_json::to_string(&family).unwrap();
            assert_eq!(json, format!("\"{}\"", family.config_name()));
        }
    }

    #[test]
    fn test_family_serde() {
        let family: InstrumentFamily =
            serde_json::from_str("\"polarization_controller\"").unwrap();
        assert_eq!(family, InstrumentFamily::PolarizationController);
        assert!(serde_json::from_str::<InstrumentFamily>("\"oscilloscope\"").is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(InstrumentFamily::DacAdc.label(), "DAC+ADC");
        assert_eq!(InstrumentFamily::Voa.to_string(), "VOA");
    }
}
