//! Fake laser remembering its enabled state and last parameters.

use hal_core::{
    DriverFactory, HalResult, Instrument, InstrumentFamily, InstrumentHandle, Laser,
    LaserParameters, Session,
};
use std::fmt;
use tracing::debug;

/// Factory for creating FakeLaser instances.
pub struct FakeLaserFactory;

impl DriverFactory for FakeLaserFactory {
    fn driver_type(&self) -> &'static str {
        "fake_laser"
    }

    fn name(&self) -> &'static str {
        "Fake Laser"
    }

    fn family(&self) -> InstrumentFamily {
        InstrumentFamily::Laser
    }

    fn validate(&self, _config: &toml::Value) -> HalResult<()> {
        Ok(())
    }

    fn build(&self, _config: toml::Value) -> HalResult<InstrumentHandle> {
        Ok(InstrumentHandle::Laser(Box::<FakeLaser>::default()))
    }
}

/// Fake laser. Remembers its parameters and whether it is enabled.
#[derive(Debug, Default)]
pub struct FakeLaser {
    session: Session,
    params: LaserParameters,
    enabled: bool,
}

impl FakeLaser {
    /// True between `enable` and `disable`.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Last parameters set.
    pub fn parameters(&self) -> &LaserParameters {
        &self.params
    }
}

impl fmt::Display for FakeLaser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fake laser")
    }
}

impl Instrument for FakeLaser {
    fn open(&mut self) -> HalResult<()> {
        self.session.open("fake_laser")
    }

    fn close(&mut self) -> HalResult<()> {
        self.session.close("fake_laser");
        Ok(())
    }
}

impl Laser for FakeLaser {
    fn set_parameters(&mut self, params: &LaserParameters) -> HalResult<()> {
        params.validate()?;
        self.params = params.clone();
        Ok(())
    }

    fn enable(&mut self) -> HalResult<()> {
        debug!("fake laser enabled");
        self.enabled = true;
        Ok(())
    }

    fn disable(&mut self) -> HalResult<()> {
        self.enabled = false;
        Ok(())
    }
}
