//! Fake instrument drivers for qkd-hal
//!
//! This crate provides one no-I/O stand-in for every instrument family, so a
//! protocol stack can run end to end without hardware. Every fake satisfies
//! exactly the same family trait as a real driver and applies the same session
//! policy (a second `open` without `close` fails).
//!
//! # Available Fake Drivers
//!
//! | Driver type | Family | Behavior |
//! |---|---|---|
//! | `fake_adc` | ADC | zero-filled (or seeded Gaussian) data, one sequence per channel |
//! | `replay_adc` | ADC | replays JSON recordings, one file per channel |
//! | `fake_dac` | DAC | remembers loaded data and emission state |
//! | `fake_dac_adc` | DAC+ADC | acquires nothing |
//! | `fake_ammeter` | Amperemeter | reads 0 A |
//! | `fake_voltmeter` | Voltmeter | reads 0 V |
//! | `fake_power_meter` | Powermeter | reads 1 µW |
//! | `fake_power_supply` | Power supply | records channel settings |
//! | `fake_laser` | Laser | remembers enabled state |
//! | `fake_bias_controller` | Modulator bias controller | locks immediately |
//! | `fake_polarization_controller` | Polarization controller | every position reads 0 |
//! | `fake_optical_switch` | Optical switch | reports the last state set |
//! | `fake_voa` | VOA | remembers its value |
//!
//! # Driver Factory Pattern
//!
//! ```rust,ignore
//! use hal_hardware::DriverRegistry;
//!
//! let registry = DriverRegistry::new();
//! hal_driver_fake::register_all(&registry);
//! ```

pub mod common;
mod fake_adc;
mod fake_bias_controller;
mod fake_dac;
mod fake_dac_adc;
mod fake_laser;
mod fake_polarization;
mod fake_power_supply;
mod fake_switch;
mod fake_voa;
mod meters;
mod replay_adc;

use hal_core::{DriverFactory, InstrumentFamily};

pub use common::FakeRng;

pub use fake_adc::{AcquisitionState, AdcSignal, FakeAdc, FakeAdcConfig, FakeAdcFactory};
pub use fake_bias_controller::{FakeBiasController, FakeBiasControllerFactory};
pub use fake_dac::{FakeDac, FakeDacConfig, FakeDacFactory};
pub use fake_dac_adc::{FakeDacAdc, FakeDacAdcFactory};
pub use fake_laser::{FakeLaser, FakeLaserFactory};
pub use fake_polarization::{FakePolarizationController, FakePolarizationControllerFactory};
pub use fake_power_supply::{ChannelSettings, FakePowerSupply, FakePowerSupplyFactory};
pub use fake_switch::{FakeOpticalSwitch, FakeOpticalSwitchFactory};
pub use fake_voa::{FakeVoa, FakeVoaFactory};
pub use meters::{
    FakeAmmeter, FakeAmmeterFactory, FakePowerMeter, FakePowerMeterConfig, FakePowerMeterFactory,
    FakeVoltmeter, FakeVoltmeterFactory,
};
pub use replay_adc::{ReplayAdc, ReplayAdcConfig, ReplayAdcFactory};

/// Register every fake factory and designate the fake of each family.
///
/// ```rust,ignore
/// let registry = DriverRegistry::new();
/// hal_driver_fake::register_all(&registry);
/// // `driver = "fake"` now resolves for all 12 families
/// ```
pub fn register_all(registry: &impl FactoryRegistry) {
    for factory in designated_fakes() {
        let family = factory.family();
        let driver_type = factory.driver_type();
        registry.register_factory(factory);
        registry.designate_fake(family, driver_type);
    }
    registry.register_factory(Box::new(ReplayAdcFactory));
}

/// One factory per family, in family order.
fn designated_fakes() -> [Box<dyn DriverFactory>; 12] {
    [
        Box::new(FakeAdcFactory),
        Box::new(FakeDacFactory),
        Box::new(FakeDacAdcFactory),
        Box::new(FakeAmmeterFactory),
        Box::new(FakeVoltmeterFactory),
        Box::new(FakePowerMeterFactory),
        Box::new(FakePowerSupplyFactory),
        Box::new(FakeLaserFactory),
        Box::new(FakeBiasControllerFactory),
        Box::new(FakePolarizationControllerFactory),
        Box::new(FakeOpticalSwitchFactory),
        Box::new(FakeVoaFactory),
    ]
}

/// Trait for registries that can accept driver factories.
///
/// This allows the fake driver crate to work with any registry implementation
/// without depending on hal-hardware directly.
pub trait FactoryRegistry {
    /// Register a driver factory.
    fn register_factory(&self, factory: Box<dyn DriverFactory>);

    /// Make `driver_type` the driver used for `driver = "fake"` in `family`.
    fn designate_fake(&self, family: InstrumentFamily, driver_type: &'static str);
}
