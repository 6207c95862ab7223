//! Fake ADC returning synthetic per-channel data.
//!
//! The acquisition cycle (configure, arm, trigger, stop) only updates
//! bookkeeping. `get_data` returns one sequence per configured channel, of
//! length `floor(acquisition_time * target_rate)`, filled according to the
//! configured [`AdcSignal`].
//!
//! # Example
//!
//! ```rust
//! use hal_core::{Adc, AcquisitionParameters, Instrument};
//! use hal_driver_fake::FakeAdc;
//!
//! let mut adc = FakeAdc::new(vec!["I".into(), "Q".into()]);
//! adc.open().unwrap();
//! adc.set_acquisition_parameters(&AcquisitionParameters::new(0.001, 1e6)).unwrap();
//! adc.arm_acquisition().unwrap();
//! adc.trigger().unwrap();
//! adc.stop_acquisition().unwrap();
//!
//! let data = adc.get_data().unwrap();
//! assert_eq!(data.len(), 2);
//! assert_eq!(data[0].len(), 1000);
//! ```

use crate::common::{parse_config, FakeRng};
use hal_core::{
    AcquisitionParameters, Adc, ChannelData, DriverFactory, HalError, HalResult, Instrument,
    InstrumentFamily, InstrumentHandle, Session,
};
use serde::Deserialize;
use std::fmt;
use tracing::debug;

// =============================================================================
// FakeAdcFactory - DriverFactory implementation
// =============================================================================

/// Content of the synthetic sequences.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdcSignal {
    /// Every sample is 0.0
    #[default]
    Zeros,
    /// Normal noise with mean 0
    Gaussian {
        /// Variance of the noise, in V²
        #[serde(default = "default_variance")]
        variance: f64,
        /// Seed for reproducible sequences
        #[serde(default)]
        seed: Option<u64>,
    },
}

fn default_variance() -> f64 {
    1.0
}

/// Configuration for FakeAdc driver
#[derive(Debug, Clone, Deserialize)]
pub struct FakeAdcConfig {
    /// Channel names (only their count matters)
    #[serde(default = "default_channels")]
    pub channels: Vec<String>,

    /// Signal returned by `get_data` (default: zeros)
    #[serde(default)]
    pub signal: AdcSignal,
}

fn default_channels() -> Vec<String> {
    vec!["ch0".to_string()]
}

impl Default for FakeAdcConfig {
    fn default() -> Self {
        Self {
            channels: default_channels(),
            signal: AdcSignal::default(),
        }
    }
}

/// Factory for creating FakeAdc instances.
pub struct FakeAdcFactory;

impl DriverFactory for FakeAdcFactory {
    fn driver_type(&self) -> &'static str {
        "fake_adc"
    }

    fn name(&self) -> &'static str {
        "Fake ADC"
    }

    fn family(&self) -> InstrumentFamily {
        InstrumentFamily::Adc
    }

    fn validate(&self, config: &toml::Value) -> HalResult<()> {
        let _: FakeAdcConfig = parse_config(config)?;
        Ok(())
    }

    fn build(&self, config: toml::Value) -> HalResult<InstrumentHandle> {
        let cfg: FakeAdcConfig = parse_config(&config)?;
        Ok(InstrumentHandle::Adc(Box::new(FakeAdc::with_signal(
            cfg.channels,
            cfg.signal,
        ))))
    }
}

// =============================================================================
// FakeAdc
// =============================================================================

/// Where the fake is in the acquisition cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcquisitionState {
    /// Nothing armed
    #[default]
    Idle,
    /// Armed, waiting for a trigger
    Armed,
    /// Triggered and not yet stopped
    Running,
}

/// Fake ADC producing zero-filled or Gaussian sequences.
#[derive(Debug)]
pub struct FakeAdc {
    session: Session,
    channels: Vec<String>,
    params: AcquisitionParameters,
    state: AcquisitionState,
    signal: AdcSignal,
    rng: FakeRng,
}

impl FakeAdc {
    /// Fake ADC returning zero-filled data for `channels`.
    pub fn new(channels: Vec<String>) -> Self {
        Self::with_signal(channels, AdcSignal::Zeros)
    }

    /// Fake ADC returning `signal` for `channels`.
    pub fn with_signal(channels: Vec<String>, signal: AdcSignal) -> Self {
        let seed = match &signal {
            AdcSignal::Gaussian { seed, .. } => *seed,
            AdcSignal::Zeros => None,
        };
        Self {
            session: Session::new(),
            channels,
            params: AcquisitionParameters::default(),
            state: AcquisitionState::Idle,
            signal,
            rng: FakeRng::new(seed),
        }
    }

    /// Configured channel names.
    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    /// Current acquisition parameters.
    pub fn parameters(&self) -> &AcquisitionParameters {
        &self.params
    }

    /// Current position in the acquisition cycle.
    pub fn state(&self) -> AcquisitionState {
        self.state
    }

    /// True while the session is open.
    pub fn is_open(&self) -> bool {
        self.session.is_open()
    }
}

impl fmt::Display for FakeAdc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fake ADC ({} channels)", self.channels.len())
    }
}

impl Instrument for FakeAdc {
    fn open(&mut self) -> HalResult<()> {
        self.session.open("fake_adc")
    }

    fn close(&mut self) -> HalResult<()> {
        self.state = AcquisitionState::Idle;
        self.session.close("fake_adc");
        Ok(())
    }
}

impl Adc for FakeAdc {
    fn set_acquisition_parameters(&mut self, params: &AcquisitionParameters) -> HalResult<()> {
        params.validate()?;
        debug!(
            acquisition_time = params.acquisition_time,
            target_rate = params.target_rate,
            "fake ADC configured"
        );
        self.params = params.clone();
        Ok(())
    }

    fn arm_acquisition(&mut self) -> HalResult<()> {
        self.state = AcquisitionState::Armed;
        Ok(())
    }

    fn trigger(&mut self) -> HalResult<()> {
        self.state = AcquisitionState::Running;
        Ok(())
    }

    fn stop_acquisition(&mut self) -> HalResult<()> {
        self.state = AcquisitionState::Idle;
        Ok(())
    }

    fn get_data(&mut self) -> HalResult<Vec<ChannelData>> {
        let samples = self.params.samples_per_channel()?;
        let mut data = Vec::with_capacity(self.channels.len());
        for _ in &self.channels {
            let mut sequence = reserve_samples(samples)?;
            match self.signal {
                AdcSignal::Zeros => sequence.resize(samples, 0.0),
                AdcSignal::Gaussian { variance, .. } => {
                    self.rng.extend_gaussian(&mut sequence, variance, samples)
                }
            }
            data.push(sequence);
        }
        Ok(data)
    }
}

/// Empty sequence with room for `samples` values.
fn reserve_samples(samples: usize) -> HalResult<ChannelData> {
    let mut sequence = ChannelData::new();
    sequence.try_reserve_exact(samples).map_err(|e| {
        HalError::Configuration(format!(
            "cannot allocate {} samples per channel: {}",
            samples, e
        ))
    })?;
    Ok(sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_cycle(adc: &mut dyn Adc, time: f64, rate: f64) -> Vec<ChannelData> {
        adc.set_acquisition_parameters(&AcquisitionParameters::new(time, rate))
            .unwrap();
        adc.arm_acquisition().unwrap();
        adc.trigger().unwrap();
        adc.stop_acquisition().unwrap();
        adc.get_data().unwrap()
    }

    #[test]
    fn test_zero_filled_cycle() {
        let mut adc = FakeAdc::new(vec!["a".into(), "b".into(), "c".into()]);
        adc.open().unwrap();
        let data = run_cycle(&mut adc, 0.002, 500_000.0);

        assert_eq!(data.len(), 3);
        for channel in &data {
            assert_eq!(channel.len(), 1000);
            assert!(channel.iter().all(|&v| v == 0.0));
        }
        adc.close().unwrap();
    }

    #[test]
    fn test_length_is_floored() {
        let mut adc = FakeAdc::new(vec!["a".into()]);
        let data = run_cycle(&mut adc, 0.5, 3.0);
        assert_eq!(data[0].len(), 1);
    }

    #[test]
    fn test_unconfigured_returns_empty_sequences() {
        let mut adc = FakeAdc::new(vec!["a".into(), "b".into()]);
        let data = adc.get_data().unwrap();
        assert_eq!(data, vec![Vec::<f64>::new(), Vec::new()]);
    }

    #[test]
    fn test_state_tracking() {
        let mut adc = FakeAdc::new(vec!["a".into()]);
        assert_eq!(adc.state(), AcquisitionState::Idle);
        adc.arm_acquisition().unwrap();
        assert_eq!(adc.state(), AcquisitionState::Armed);
        adc.trigger().unwrap();
        assert_eq!(adc.state(), AcquisitionState::Running);
        adc.stop_acquisition().unwrap();
        assert_eq!(adc.state(), AcquisitionState::Idle);
    }

    #[test]
    fn test_gaussian_signal_is_seeded() {
        let signal = AdcSignal::Gaussian {
            variance: 2.0,
            seed: Some(99),
        };
        let mut first = FakeAdc::with_signal(vec!["a".into()], signal.clone());
        let mut second = FakeAdc::with_signal(vec!["a".into()], signal);

        let a = run_cycle(&mut first, 0.01, 10_000.0);
        let b = run_cycle(&mut second, 0.01, 10_000.0);
        assert_eq!(a, b);
        assert_eq!(a[0].len(), 100);
        assert!(a[0].iter().any(|&v| v != 0.0));
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let mut adc = FakeAdc::new(vec!["a".into()]);
        let params = AcquisitionParameters::new(-1.0, 10.0);
        assert!(adc.set_acquisition_parameters(&params).is_err());
    }

    #[test]
    fn test_oversized_acquisition_rejected() {
        let mut adc = FakeAdc::new(vec!["a".into(), "b".into()]);
        for (time, rate) in [(1e10, 1e10), (1e200, 1e200)] {
            let params = AcquisitionParameters::new(time, rate);
            assert!(matches!(
                adc.set_acquisition_parameters(&params),
                Err(HalError::Configuration(_))
            ));
        }
        // Rejected parameters leave the previous configuration in place
        assert_eq!(adc.get_data().unwrap(), vec![Vec::<f64>::new(); 2]);
    }

    #[test]
    fn test_unvalidated_parameters_fail_in_get_data() {
        let mut adc = FakeAdc::with_signal(
            vec!["a".into()],
            AdcSignal::Gaussian {
                variance: 1.0,
                seed: Some(1),
            },
        );
        adc.params = AcquisitionParameters::new(1e200, 1e200);
        assert!(matches!(adc.get_data(), Err(HalError::Configuration(_))));
    }

    #[test]
    fn test_reserve_samples() {
        assert!(reserve_samples(1000).unwrap().capacity() >= 1000);
        assert!(matches!(
            reserve_samples(usize::MAX),
            Err(HalError::Configuration(_))
        ));
    }

    #[test]
    fn test_double_open_rejected() {
        let mut adc = FakeAdc::new(vec![]);
        adc.open().unwrap();
        assert!(adc.open().is_err());
        adc.close().unwrap();
        adc.close().unwrap();
        assert!(!adc.is_open());
    }

    #[test]
    fn test_factory_config() {
        let config: toml::Value = toml::from_str(
            r#"
            channels = ["I", "Q"]
            [signal]
            kind = "gaussian"
            variance = 0.5
            seed = 3
            "#,
        )
        .unwrap();
        FakeAdcFactory.validate(&config).unwrap();

        let mut handle = FakeAdcFactory.build(config).unwrap();
        assert_eq!(handle.family(), InstrumentFamily::Adc);
        assert_eq!(handle.to_string(), "Fake ADC (2 channels)");

        let adc = handle.as_adc_mut().unwrap();
        let data = run_cycle(adc, 0.001, 1000.0);
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn test_factory_defaults() {
        let config = toml::Value::Table(toml::Table::new());
        let cfg: FakeAdcConfig = parse_config(&config).unwrap();
        assert_eq!(cfg.channels, vec!["ch0".to_string()]);
        assert_eq!(cfg.signal, AdcSignal::Zeros);
    }
}
