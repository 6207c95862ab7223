//! Fake DAC remembering what it was asked to emit.

use crate::common::parse_config;
use hal_core::{
    ChannelData, Dac, DriverFactory, EmissionParameters, HalResult, Instrument, InstrumentFamily,
    InstrumentHandle, Session,
};
use serde::Deserialize;
use std::fmt;
use tracing::debug;

/// Configuration for FakeDac driver
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FakeDacConfig {
    /// Channel names, informational
    #[serde(default)]
    pub channels: Vec<String>,
}

/// Factory for creating FakeDac instances.
pub struct FakeDacFactory;

impl DriverFactory for FakeDacFactory {
    fn driver_type(&self) -> &'static str {
        "fake_dac"
    }

    fn name(&self) -> &'static str {
        "Fake DAC"
    }

    fn family(&self) -> InstrumentFamily {
        InstrumentFamily::Dac
    }

    fn validate(&self, config: &toml::Value) -> HalResult<()> {
        let _: FakeDacConfig = parse_config(config)?;
        Ok(())
    }

    fn build(&self, config: toml::Value) -> HalResult<InstrumentHandle> {
        let cfg: FakeDacConfig = parse_config(&config)?;
        Ok(InstrumentHandle::Dac(Box::new(FakeDac::new(cfg.channels))))
    }
}

/// Fake DAC. Starts with no data and emission off.
#[derive(Debug, Default)]
pub struct FakeDac {
    session: Session,
    channels: Vec<String>,
    params: EmissionParameters,
    data: Option<Vec<ChannelData>>,
    emitting: bool,
}

impl FakeDac {
    /// Create a fake DAC for `channels`.
    pub fn new(channels: Vec<String>) -> Self {
        Self {
            channels,
            ..Default::default()
        }
    }

    /// True between `start_emission` and `stop_emission`.
    pub fn is_emitting(&self) -> bool {
        self.emitting
    }

    /// Last loaded data, if any.
    pub fn data(&self) -> Option<&[ChannelData]> {
        self.data.as_deref()
    }

    /// Last emission parameters.
    pub fn parameters(&self) -> &EmissionParameters {
        &self.params
    }

    /// Configured channel names.
    pub fn channels(&self) -> &[String] {
        &self.channels
    }
}

impl fmt::Display for FakeDac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fake DAC")
    }
}

impl Instrument for FakeDac {
    fn open(&mut self) -> HalResult<()> {
        self.session.open("fake_dac")
    }

    fn close(&mut self) -> HalResult<()> {
        self.session.close("fake_dac");
        Ok(())
    }
}

impl Dac for FakeDac {
    fn set_emission_parameters(&mut self, params: &EmissionParameters) -> HalResult<()> {
        self.params = params.clone();
        Ok(())
    }

    fn load_data(&mut self, data: Vec<ChannelData>) -> HalResult<()> {
        debug!(channels = data.len(), "fake DAC data loaded");
        self.data = Some(data);
        Ok(())
    }

    fn start_emission(&mut self) -> HalResult<()> {
        self.emitting = true;
        Ok(())
    }

    fn stop_emission(&mut self) -> HalResult<()> {
        self.emitting = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emission_state() {
        let mut dac = FakeDac::new(vec!["I".into(), "Q".into()]);
        assert!(!dac.is_emitting());
        assert!(dac.data().is_none());

        dac.open().unwrap();
        dac.set_emission_parameters(&EmissionParameters {
            repeat: true,
            ..Default::default()
        })
        .unwrap();
        dac.load_data(vec![vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        dac.start_emission().unwrap();
        assert!(dac.is_emitting());
        assert!(dac.parameters().repeat);
        assert_eq!(dac.data().unwrap().len(), 2);

        dac.stop_emission().unwrap();
        assert!(!dac.is_emitting());
        dac.close().unwrap();
    }

    #[test]
    fn test_factory_builds_dac() {
        let config: toml::Value = toml::from_str(r#"channels = ["I"]"#).unwrap();
        let handle = FakeDacFactory.build(config).unwrap();
        assert_eq!(handle.family(), InstrumentFamily::Dac);
        assert_eq!(handle.to_string(), "Fake DAC");
    }
}
