//! Fake combined DAC/ADC whose acquisitions come back empty.

use crate::common::parse_config;
use hal_core::{
    ChannelData, DacAdc, DacAdcParameters, DriverFactory, HalResult, Instrument,
    InstrumentFamily, InstrumentHandle, Session,
};
use serde::Deserialize;
use std::fmt;

/// Configuration for FakeDacAdc driver (no settings)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FakeDacAdcConfig {}

/// Factory for creating FakeDacAdc instances.
pub struct FakeDacAdcFactory;

impl DriverFactory for FakeDacAdcFactory {
    fn driver_type(&self) -> &'static str {
        "fake_dac_adc"
    }

    fn name(&self) -> &'static str {
        "Fake DAC+ADC"
    }

    fn family(&self) -> InstrumentFamily {
        InstrumentFamily::DacAdc
    }

    fn validate(&self, config: &toml::Value) -> HalResult<()> {
        let _: FakeDacAdcConfig = parse_config(config)?;
        Ok(())
    }

    fn build(&self, _config: toml::Value) -> HalResult<InstrumentHandle> {
        Ok(InstrumentHandle::DacAdc(Box::<FakeDacAdc>::default()))
    }
}

/// Fake synchronised DAC+ADC. Acquires nothing.
#[derive(Debug, Default)]
pub struct FakeDacAdc {
    session: Session,
    running: bool,
}

impl FakeDacAdc {
    /// Create a fake DAC+ADC.
    pub fn new() -> Self {
        Self::default()
    }

    /// True between `start` and `stop`.
    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl fmt::Display for FakeDacAdc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fake DAC+ADC")
    }
}

impl Instrument for FakeDacAdc {
    fn open(&mut self) -> HalResult<()> {
        self.session.open("fake_dac_adc")
    }

    fn close(&mut self) -> HalResult<()> {
        self.session.close("fake_dac_adc");
        Ok(())
    }
}

impl DacAdc for FakeDacAdc {
    fn set_parameters(&mut self, _params: &DacAdcParameters) -> HalResult<()> {
        Ok(())
    }

    fn get_adc_data(&mut self) -> HalResult<Vec<ChannelData>> {
        Ok(Vec::new())
    }

    fn load_dac_data(&mut self, _data: Vec<ChannelData>) -> HalResult<()> {
        Ok(())
    }

    fn start(&mut self) -> HalResult<()> {
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) -> HalResult<()> {
        self.running = false;
        Ok(())
    }
}
