//! Synchronised DAC and ADC on a single device.

use serde::{Deserialize, Serialize};

use super::{ChannelData, Instrument};
use crate::error::HalResult;
use crate::options::DriverOptions;

/// Shared settings of a combined DAC+ADC.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DacAdcParameters {
    /// DAC output rate in Hz.
    #[serde(default)]
    pub dac_rate: Option<f64>,

    /// ADC sampling rate in Hz.
    #[serde(default)]
    pub adc_rate: Option<f64>,

    /// ADC acquisition duration in seconds.
    #[serde(default)]
    pub acquisition_time: Option<f64>,

    /// Driver-specific settings.
    #[serde(default)]
    pub options: DriverOptions,
}

/// Capability: synchronised emission and acquisition
///
/// `start` and `stop` drive both halves together.
pub trait DacAdc: Instrument {
    /// Set the shared parameters.
    fn set_parameters(&mut self, params: &DacAdcParameters) -> HalResult<()>;

    /// Retrieve the ADC samples, one sequence per channel.
    fn get_adc_data(&mut self) -> HalResult<Vec<ChannelData>>;

    /// Load the DAC sequences, one per channel.
    fn load_dac_data(&mut self, data: Vec<ChannelData>) -> HalResult<()>;

    /// Start emission and acquisition.
    fn start(&mut self) -> HalResult<()>;

    /// Stop emission and acquisition.
    fn stop(&mut self) -> HalResult<()>;
}
