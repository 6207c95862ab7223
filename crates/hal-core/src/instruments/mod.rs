//! Instrument interface families.
//!
//! Every family is a flat trait extending [`Instrument`], which fixes the
//! lifecycle shared by all hardware:
//!
//! - `open` establishes communication with the device.
//! - `close` releases it; it must be safe to call after `open`.
//!
//! Calling code depends on the family traits only (usually through
//! `Box<dyn Adc>`, `Box<dyn Laser>`, ...), so a fake can replace a real driver
//! without any change on the caller side.
//!
//! # Design Philosophy
//!
//! Each family trait:
//! - Is synchronous and takes `&mut self` (the HAL imposes no concurrency)
//! - Returns [`HalResult`] for every operation
//! - Fixes signatures and intent only; semantics belong to the driver
//!
//! # Example
//!
//! ```rust,ignore
//! fn measure_shot_noise(adc: &mut dyn Adc) -> HalResult<Vec<ChannelData>> {
//!     adc.set_acquisition_parameters(&AcquisitionParameters::new(0.001, 2.5e9))?;
//!     adc.arm_acquisition()?;
//!     adc.trigger()?;
//!     adc.stop_acquisition()?;
//!     adc.get_data()
//! }
//! ```

use std::fmt;

use crate::error::HalResult;

mod adc;
mod bias_controller;
mod dac;
mod dac_adc;
mod laser;
mod meters;
mod optical_switch;
mod polarization;
mod power_supply;
mod voa;

pub use adc::{AcquisitionParameters, Adc};
pub use bias_controller::ModulatorBiasController;
pub use dac::{Dac, EmissionParameters};
pub use dac_adc::{DacAdc, DacAdcParameters};
pub use laser::{Laser, LaserParameters};
pub use meters::{Ammeter, PowerMeter, Voltmeter};
pub use optical_switch::OpticalSwitch;
pub use polarization::{PolarizationChannel, PolarizationController};
pub use power_supply::{PowerSupply, SupplyChannel};
pub use voa::Voa;

/// Samples of one channel, in acquisition order.
pub type ChannelData = Vec<f64>;

/// Lifecycle contract shared by every instrument family.
///
/// The `Display` implementation is a short human description of the device,
/// used in logs and in the CLI.
pub trait Instrument: fmt::Display {
    /// Establish communication with the device.
    ///
    /// Calling `open` twice without an intervening `close` is a contract
    /// violation; drivers report it as
    /// [`HalError::AlreadyOpen`](crate::error::HalError::AlreadyOpen).
    fn open(&mut self) -> HalResult<()>;

    /// Terminate communication with the device.
    ///
    /// Safe to call after `open`, and a no-op on a closed instrument.
    fn close(&mut self) -> HalResult<()>;
}
