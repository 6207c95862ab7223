//! Laser sources.

use serde::{Deserialize, Serialize};

use super::Instrument;
use crate::error::{HalError, HalResult};
use crate::options::DriverOptions;

/// Settings handed to [`Laser::set_parameters`].
///
/// Unset fields leave the corresponding device setting untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaserParameters {
    /// Output power, in mW.
    #[serde(default)]
    pub power_mw: Option<f64>,

    /// Optical frequency, in GHz.
    #[serde(default)]
    pub frequency_ghz: Option<f64>,

    /// Wavelength, in nm.
    #[serde(default)]
    pub wavelength_nm: Option<f64>,

    /// Driver-specific settings (fine tuning, dither, ...).
    #[serde(default)]
    pub options: DriverOptions,
}

impl LaserParameters {
    /// Reject negative power and non-positive frequency or wavelength.
    pub fn validate(&self) -> HalResult<()> {
        if let Some(power) = self.power_mw {
            if !power.is_finite() || power < 0.0 {
                return Err(HalError::Configuration(format!(
                    "laser power must be non-negative, got {} mW",
                    power
                )));
            }
        }
        for (name, value) in [
            ("frequency_ghz", self.frequency_ghz),
            ("wavelength_nm", self.wavelength_nm),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return Err(HalError::Configuration(format!(
                        "{} must be positive, got {}",
                        name, v
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Capability: laser emission
///
/// # Contract
/// - `set_parameters` stores the settings used by the next `enable`
/// - `enable` starts the emission, returning once the laser runs with the
///   requested settings (noise-reduction loops included)
/// - `disable` stops the emission
pub trait Laser: Instrument {
    /// Set the laser parameters.
    fn set_parameters(&mut self, params: &LaserParameters) -> HalResult<()>;

    /// Start the emission.
    fn enable(&mut self) -> HalResult<()>;

    /// Stop the emission.
    fn disable(&mut self) -> HalResult<()>;
}
