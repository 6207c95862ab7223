//! Variable optical attenuators.

use super::Instrument;
use crate::error::HalResult;

/// Capability: variable optical attenuation
pub trait Voa: Instrument {
    /// Set the attenuation value, in driver-defined units (usually dB).
    fn set_value(&mut self, value: f64) -> HalResult<()>;
}
