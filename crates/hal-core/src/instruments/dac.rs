//! Digital to analog converters.

use serde::{Deserialize, Serialize};

use super::{ChannelData, Instrument};
use crate::error::HalResult;
use crate::options::DriverOptions;

/// Emission settings handed to [`Dac::set_emission_parameters`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmissionParameters {
    /// Output sample rate in Hz, if the driver supports setting it.
    #[serde(default)]
    pub sample_rate: Option<f64>,

    /// Repeat the loaded sequence until `stop_emission`.
    #[serde(default)]
    pub repeat: bool,

    /// Driver-specific settings.
    #[serde(default)]
    pub options: DriverOptions,
}

/// Capability: waveform emission
///
/// # Contract
/// - `load_data` receives one sequence per channel, in configuration order
/// - `start_emission` emits the loaded data with the configured parameters
/// - `stop_emission` stops the output
pub trait Dac: Instrument {
    /// Set the emission parameters.
    fn set_emission_parameters(&mut self, params: &EmissionParameters) -> HalResult<()>;

    /// Load the sequences to emit.
    fn load_data(&mut self, data: Vec<ChannelData>) -> HalResult<()>;

    /// Start the emission.
    fn start_emission(&mut self) -> HalResult<()>;

    /// Stop the emission.
    fn stop_emission(&mut self) -> HalResult<()>;
}
