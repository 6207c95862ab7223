//! ADC replaying previously recorded acquisitions from disk.
//!
//! Each channel is one JSON file holding an array of floats (volts). The
//! files are named per acquisition through `options.paths` and read when the
//! acquisition is triggered.

use crate::common::parse_config;
use hal_core::{
    AcquisitionParameters, Adc, ChannelData, DriverFactory, HalError, HalResult, Instrument,
    InstrumentFamily, InstrumentHandle, Session,
};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Configuration for ReplayAdc driver
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplayAdcConfig {
    /// Channel names, informational
    #[serde(default)]
    pub channels: Vec<String>,
}

/// Factory for creating ReplayAdc instances.
pub struct ReplayAdcFactory;

impl DriverFactory for ReplayAdcFactory {
    fn driver_type(&self) -> &'static str {
        "replay_adc"
    }

    fn name(&self) -> &'static str {
        "Replay ADC (JSON files)"
    }

    fn family(&self) -> InstrumentFamily {
        InstrumentFamily::Adc
    }

    fn validate(&self, config: &toml::Value) -> HalResult<()> {
        let _: ReplayAdcConfig = parse_config(config)?;
        Ok(())
    }

    fn build(&self, config: toml::Value) -> HalResult<InstrumentHandle> {
        let cfg: ReplayAdcConfig = parse_config(&config)?;
        Ok(InstrumentHandle::Adc(Box::new(ReplayAdc::new(cfg.channels))))
    }
}

/// ADC whose data comes from JSON files, one per channel.
#[derive(Debug, Default)]
pub struct ReplayAdc {
    session: Session,
    channels: Vec<String>,
    paths: Vec<PathBuf>,
    data: Vec<ChannelData>,
}

impl ReplayAdc {
    /// Create a replaying ADC. `channels` is informational.
    pub fn new(channels: Vec<String>) -> Self {
        Self {
            channels,
            ..Default::default()
        }
    }

    /// Files read on the next trigger.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    fn load(path: &Path) -> HalResult<ChannelData> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HalError::driver("replay_adc", format!("cannot read {}: {}", path.display(), e))
        })?;
        let samples: ChannelData = serde_json::from_str(&content)?;
        debug!(path = %path.display(), samples = samples.len(), "replay channel loaded");
        Ok(samples)
    }
}

impl fmt::Display for ReplayAdc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Replay ADC ({} files)", self.paths.len())
    }
}

impl Instrument for ReplayAdc {
    fn open(&mut self) -> HalResult<()> {
        self.session.open("replay_adc")
    }

    fn close(&mut self) -> HalResult<()> {
        self.session.close("replay_adc");
        Ok(())
    }
}

impl Adc for ReplayAdc {
    /// Reads `options.paths` (one file per channel); other fields are ignored.
    fn set_acquisition_parameters(&mut self, params: &AcquisitionParameters) -> HalResult<()> {
        let paths: Vec<PathBuf> = params.options.get("paths")?.unwrap_or_default();
        if !self.channels.is_empty() && !paths.is_empty() && paths.len() != self.channels.len() {
            return Err(HalError::Configuration(format!(
                "replay ADC has {} channels but {} paths were given",
                self.channels.len(),
                paths.len()
            )));
        }
        self.paths = paths;
        Ok(())
    }

    fn arm_acquisition(&mut self) -> HalResult<()> {
        Ok(())
    }

    fn trigger(&mut self) -> HalResult<()> {
        let data = self
            .paths
            .iter()
            .map(|path| Self::load(path))
            .collect::<HalResult<Vec<_>>>()?;
        info!(channels = data.len(), "replayed acquisition loaded");
        self.data = data;
        Ok(())
    }

    fn stop_acquisition(&mut self) -> HalResult<()> {
        Ok(())
    }

    fn get_data(&mut self) -> HalResult<Vec<ChannelData>> {
        Ok(self.data.clone())
    }
}
