//! Fake modulator bias controller counting lock requests.

use hal_core::{
    DriverFactory, HalResult, Instrument, InstrumentFamily, InstrumentHandle,
    ModulatorBiasController, Session,
};
use std::fmt;

/// Factory for creating FakeBiasController instances.
pub struct FakeBiasControllerFactory;

impl DriverFactory for FakeBiasControllerFactory {
    fn driver_type(&self) -> &'static str {
        "fake_bias_controller"
    }

    fn name(&self) -> &'static str {
        "Fake Modulator Bias Controller"
    }

    fn family(&self) -> InstrumentFamily {
        InstrumentFamily::BiasController
    }

    fn validate(&self, _config: &toml::Value) -> HalResult<()> {
        Ok(())
    }

    fn build(&self, _config: toml::Value) -> HalResult<InstrumentHandle> {
        Ok(InstrumentHandle::BiasController(
            Box::<FakeBiasController>::default(),
        ))
    }
}

/// Fake modulator bias controller; `lock` returns immediately.
#[derive(Debug, Default)]
pub struct FakeBiasController {
    session: Session,
    locks: usize,
}

impl FakeBiasController {
    /// Number of `lock` calls so far.
    pub fn lock_count(&self) -> usize {
        self.locks
    }
}

impl fmt::Display for FakeBiasController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fake Modulator Bias Controller")
    }
}

impl Instrument for FakeBiasController {
    fn open(&mut self) -> HalResult<()> {
        self.session.open("fake_bias_controller")
    }

    fn close(&mut self) -> HalResult<()> {
        self.session.close("fake_bias_controller");
        Ok(())
    }
}

impl ModulatorBiasController for FakeBiasController {
    fn lock(&mut self) -> HalResult<()> {
        self.locks += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_returns_immediately() {
        let mut controller = FakeBiasController::default();
        controller.lock().unwrap();
        controller.lock().unwrap();
        assert_eq!(controller.lock_count(), 2);
    }
}
