//! `hal-core`
//!
//! Core trait definitions and types for the qkd-hal instrument abstraction.
//!
//! This crate defines the contract every laboratory instrument driver of the
//! QKD stack satisfies, and the mechanism that lets a driver with optional
//! vendor dependencies be declared on any machine while refusing construction
//! where those dependencies are absent.
//!
//! ## Key Types
//!
//! - [`Instrument`]: lifecycle (`open` / `close`) shared by every family
//! - Family traits: [`Adc`], [`Dac`], [`DacAdc`], [`Ammeter`], [`Voltmeter`],
//!   [`PowerMeter`], [`PowerSupply`], [`Laser`], [`ModulatorBiasController`],
//!   [`PolarizationController`], [`OpticalSwitch`], [`Voa`]
//! - [`CapabilityGate`]: one-time optional dependency check for a driver type
//! - [`DriverFactory`] / [`InstrumentHandle`]: construction from configuration
//! - [`HalError`]: the error type of every fallible operation
//!
//! ## Example
//!
//! ```rust
//! use hal_core::{Instrument, HalResult, Session, Voa};
//! use std::fmt;
//!
//! #[derive(Default)]
//! struct BenchVoa {
//!     session: Session,
//!     attenuation_db: f64,
//! }
//!
//! impl fmt::Display for BenchVoa {
//!     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
//!         write!(f, "Bench VOA ({} dB)", self.attenuation_db)
//!     }
//! }
//!
//! impl Instrument for BenchVoa {
//!     fn open(&mut self) -> HalResult<()> { self.session.open("bench_voa") }
//!     fn close(&mut self) -> HalResult<()> { self.session.close("bench_voa"); Ok(()) }
//! }
//!
//! impl Voa for BenchVoa {
//!     fn set_value(&mut self, value: f64) -> HalResult<()> {
//!         self.attenuation_db = value;
//!         Ok(())
//!     }
//! }
//!
//! let mut voa: Box<dyn Voa> = Box::<BenchVoa>::default();
//! voa.open().unwrap();
//! voa.set_value(12.0).unwrap();
//! assert_eq!(voa.to_string(), "Bench VOA (12 dB)");
//! ```

pub mod driver;
pub mod error;
pub mod family;
pub mod gate;
pub mod instruments;
pub mod options;
pub mod session;

pub use driver::{DriverFactory, GatedFactory, InstrumentHandle};
pub use error::{HalError, HalResult};
pub use family::InstrumentFamily;
pub use gate::{
    install_resolver, process_resolver, AnyOf, CapabilityGate, CompiledFeatures,
    DependencyResolver, GateOutcome, Gated, SharedLibraries, StaticResolver,
};
pub use instruments::*;
pub use options::DriverOptions;
pub use session::{Session, SessionState};
