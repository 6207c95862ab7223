//! Fake scalar meters.
//!
//! The amperemeter and voltmeter always read 0.0. The power meter reads a
//! constant power, 1 µW unless configured otherwise.

use crate::common::parse_config;
use hal_core::{
    Ammeter, DriverFactory, HalResult, Instrument, InstrumentFamily, InstrumentHandle, PowerMeter,
    Session, Voltmeter,
};
use serde::Deserialize;
use std::fmt;

// =============================================================================
// Amperemeter
// =============================================================================

/// Factory for creating FakeAmmeter instances.
pub struct FakeAmmeterFactory;

impl DriverFactory for FakeAmmeterFactory {
    fn driver_type(&self) -> &'static str {
        "fake_ammeter"
    }

    fn name(&self) -> &'static str {
        "Fake Amperemeter"
    }

    fn family(&self) -> InstrumentFamily {
        InstrumentFamily::Ammeter
    }

    fn validate(&self, _config: &toml::Value) -> HalResult<()> {
        Ok(())
    }

    fn build(&self, _config: toml::Value) -> HalResult<InstrumentHandle> {
        Ok(InstrumentHandle::Ammeter(Box::<FakeAmmeter>::default()))
    }
}

/// Fake amperemeter, always reading 0 A.
#[derive(Debug, Default)]
pub struct FakeAmmeter {
    session: Session,
}

impl fmt::Display for FakeAmmeter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fake Amperemeter")
    }
}

impl Instrument for FakeAmmeter {
    fn open(&mut self) -> HalResult<()> {
        self.session.open("fake_ammeter")
    }

    fn close(&mut self) -> HalResult<()> {
        self.session.close("fake_ammeter");
        Ok(())
    }
}

impl Ammeter for FakeAmmeter {
    fn get_current(&mut self) -> HalResult<f64> {
        Ok(0.0)
    }
}

// =============================================================================
// Voltmeter
// =============================================================================

/// Factory for creating FakeVoltmeter instances.
pub struct FakeVoltmeterFactory;

impl DriverFactory for FakeVoltmeterFactory {
    fn driver_type(&self) -> &'static str {
        "fake_voltmeter"
    }

    fn name(&self) -> &'static str {
        "Fake Voltmeter"
    }

    fn family(&self) -> InstrumentFamily {
        InstrumentFamily::Voltmeter
    }

    fn validate(&self, _config: &toml::Value) -> HalResult<()> {
        Ok(())
    }

    fn build(&self, _config: toml::Value) -> HalResult<InstrumentHandle> {
        Ok(InstrumentHandle::Voltmeter(Box::<FakeVoltmeter>::default()))
    }
}

/// Fake voltmeter, always reading 0 V.
#[derive(Debug, Default)]
pub struct FakeVoltmeter {
    session: Session,
}

impl fmt::Display for FakeVoltmeter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fake Voltmeter")
    }
}

impl Instrument for FakeVoltmeter {
    fn open(&mut self) -> HalResult<()> {
        self.session.open("fake_voltmeter")
    }

    fn close(&mut self) -> HalResult<()> {
        self.session.close("fake_voltmeter");
        Ok(())
    }
}

impl Voltmeter for FakeVoltmeter {
    fn get_voltage(&mut self) -> HalResult<f64> {
        Ok(0.0)
    }
}

// =============================================================================
// Power meter
// =============================================================================

/// Configuration for FakePowerMeter driver
#[derive(Debug, Clone, Deserialize)]
pub struct FakePowerMeterConfig {
    /// Constant reading in Watts (default: 1e-6)
    #[serde(default = "default_power")]
    pub power: f64,
}

fn default_power() -> f64 {
    1e-6
}

impl Default for FakePowerMeterConfig {
    fn default() -> Self {
        Self {
            power: default_power(),
        }
    }
}

/// Factory for creating FakePowerMeter instances.
pub struct FakePowerMeterFactory;

impl DriverFactory for FakePowerMeterFactory {
    fn driver_type(&self) -> &'static str {
        "fake_power_meter"
    }

    fn name(&self) -> &'static str {
        "Fake Power Meter"
    }

    fn family(&self) -> InstrumentFamily {
        InstrumentFamily::PowerMeter
    }

    fn validate(&self, config: &toml::Value) -> HalResult<()> {
        let _: FakePowerMeterConfig = parse_config(config)?;
        Ok(())
    }

    fn build(&self, config: toml::Value) -> HalResult<InstrumentHandle> {
        let cfg: FakePowerMeterConfig = parse_config(&config)?;
        Ok(InstrumentHandle::PowerMeter(Box::new(
            FakePowerMeter::with_power(cfg.power),
        )))
    }
}

/// Fake power meter returning a constant reading.
#[derive(Debug)]
pub struct FakePowerMeter {
    session: Session,
    power: f64,
}

impl FakePowerMeter {
    /// Power meter reading 1 µW.
    pub fn new() -> Self {
        Self::with_power(default_power())
    }

    /// Power meter reading `power` Watts.
    pub fn with_power(power: f64) -> Self {
        Self {
            session: Session::new(),
            power,
        }
    }
}

impl Default for FakePowerMeter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FakePowerMeter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fake Power Meter")
    }
}

impl Instrument for FakePowerMeter {
    fn open(&mut self) -> HalResult<()> {
        self.session.open("fake_power_meter")
    }

    fn close(&mut self) -> HalResult<()> {
        self.session.close("fake_power_meter");
        Ok(())
    }
}

impl PowerMeter for FakePowerMeter {
    fn read(&mut self) -> HalResult<f64> {
        Ok(self.power)
    }
}
