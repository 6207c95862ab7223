//! Analog to digital converters.

use serde::{Deserialize, Serialize};

use super::{ChannelData, Instrument};
use crate::error::{HalError, HalResult};
use crate::options::DriverOptions;

/// Upper bound on `floor(acquisition_time * target_rate)`, 80 MB of `f64`
/// per channel.
pub const MAX_SAMPLES_PER_CHANNEL: usize = 10_000_000;

/// Acquisition settings handed to [`Adc::set_acquisition_parameters`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionParameters {
    /// Duration of the acquisition, in seconds.
    #[serde(default)]
    pub acquisition_time: f64,

    /// Target sampling rate, in Hz.
    #[serde(default)]
    pub target_rate: f64,

    /// Driver-specific settings (channel ranges, coupling, file paths, ...).
    #[serde(default)]
    pub options: DriverOptions,
}

impl AcquisitionParameters {
    /// Parameters for an acquisition of `acquisition_time` seconds at `target_rate` Hz.
    pub fn new(acquisition_time: f64, target_rate: f64) -> Self {
        Self {
            acquisition_time,
            target_rate,
            options: DriverOptions::default(),
        }
    }

    /// Attach driver-specific options.
    pub fn with_options(mut self, options: DriverOptions) -> Self {
        self.options = options;
        self
    }

    /// Number of samples per channel the acquisition should produce,
    /// `floor(acquisition_time * target_rate)`.
    ///
    /// Negative durations or rates yield 0. A product that is not finite or
    /// exceeds [`MAX_SAMPLES_PER_CHANNEL`] is a configuration error.
    pub fn samples_per_channel(&self) -> HalResult<usize> {
        let product = self.acquisition_time * self.target_rate;
        if product.is_nan() {
            return Err(HalError::Configuration(format!(
                "acquisition_time {} and target_rate {} do not give a sample count",
                self.acquisition_time, self.target_rate
            )));
        }
        let samples = product.floor();
        if samples <= 0.0 {
            return Ok(0);
        }
        if !samples.is_finite() || samples > MAX_SAMPLES_PER_CHANNEL as f64 {
            return Err(HalError::Configuration(format!(
                "acquisition of {} s at {} Hz exceeds {} samples per channel",
                self.acquisition_time, self.target_rate, MAX_SAMPLES_PER_CHANNEL
            )));
        }
        // Bounded above, so the cast is exact
        Ok(samples as usize)
    }

    /// Reject negative or non-finite durations and rates, and acquisitions
    /// longer than [`MAX_SAMPLES_PER_CHANNEL`] samples.
    pub fn validate(&self) -> HalResult<()> {
        if !self.acquisition_time.is_finite() || self.acquisition_time < 0.0 {
            return Err(HalError::Configuration(format!(
                "acquisition_time must be a non-negative number of seconds, got {}",
                self.acquisition_time
            )));
        }
        if !self.target_rate.is_finite() || self.target_rate < 0.0 {
            return Err(HalError::Configuration(format!(
                "target_rate must be a non-negative rate in Hz, got {}",
                self.target_rate
            )));
        }
        self.samples_per_channel().map(|_| ())
    }
}

/// Capability: analog acquisition
///
/// # Contract
/// - `set_acquisition_parameters` configures the next acquisition
/// - After `arm_acquisition`, the acquisition is one `trigger` away from starting
/// - `stop_acquisition` between arm and trigger cancels the arm
/// - `get_data` returns one sequence per configured channel, in configuration
///   order, converted to volts
pub trait Adc: Instrument {
    /// Set the acquisition parameters.
    fn set_acquisition_parameters(&mut self, params: &AcquisitionParameters) -> HalResult<()>;

    /// Arm the acquisition.
    fn arm_acquisition(&mut self) -> HalResult<()>;

    /// Trigger the armed acquisition.
    fn trigger(&mut self) -> HalResult<()>;

    /// Stop the acquisition (or cancel the arm).
    fn stop_acquisition(&mut self) -> HalResult<()>;

    /// Retrieve the acquired samples, one sequence per channel.
    fn get_data(&mut self) -> HalResult<Vec<ChannelData>>;
}
