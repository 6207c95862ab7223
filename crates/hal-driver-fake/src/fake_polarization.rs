//! Fake polarization controller whose channels always report position zero.

use hal_core::{
    DriverFactory, HalResult, Instrument, InstrumentFamily, InstrumentHandle,
    PolarizationChannel, PolarizationController, Session,
};
use std::fmt;

/// Factory for creating FakePolarizationController instances.
pub struct FakePolarizationControllerFactory;

impl DriverFactory for FakePolarizationControllerFactory {
    fn driver_type(&self) -> &'static str {
        "fake_polarization_controller"
    }

    fn name(&self) -> &'static str {
        "Fake Polarisation Controller"
    }

    fn family(&self) -> InstrumentFamily {
        InstrumentFamily::PolarizationController
    }

    fn validate(&self, _config: &toml::Value) -> HalResult<()> {
        Ok(())
    }

    fn build(&self, _config: toml::Value) -> HalResult<InstrumentHandle> {
        Ok(InstrumentHandle::PolarizationController(Box::<
            FakePolarizationController,
        >::default()))
    }
}

/// Fake polarization controller. Moves are ignored and every channel reads 0.
#[derive(Debug, Default)]
pub struct FakePolarizationController {
    session: Session,
}

impl fmt::Display for FakePolarizationController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fake Polarisation Controller")
    }
}

impl Instrument for FakePolarizationController {
    fn open(&mut self) -> HalResult<()> {
        self.session.open("fake_polarization_controller")
    }

    fn close(&mut self) -> HalResult<()> {
        self.session.close("fake_polarization_controller");
        Ok(())
    }
}

impl PolarizationController for FakePolarizationController {
    fn home(&mut self) -> HalResult<()> {
        Ok(())
    }

    fn position(&mut self, _channel: PolarizationChannel) -> HalResult<f64> {
        Ok(0.0)
    }

    fn move_by(&mut self, _increment: f64, _channel: PolarizationChannel) -> HalResult<()> {
        Ok(())
    }

    fn move_to(&mut self, _position: f64, _channel: PolarizationChannel) -> HalResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_always_zero() {
        let mut controller = FakePolarizationController::default();
        controller.home().unwrap();
        controller
            .move_to(42.0, PolarizationChannel::QuarterWavePlate1)
            .unwrap();
        controller
            .move_by(-3.0, PolarizationChannel::HalfWavePlate)
            .unwrap();
        for channel in PolarizationChannel::ALL {
            assert_eq!(controller.position(channel).unwrap(), 0.0);
        }
    }
}
