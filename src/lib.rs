//! qkd-hal: hardware abstraction layer for the laboratory instruments of a
//! QKD experimental stack.
//!
//! - [`hal_core`]: instrument family traits, errors, capability gating
//! - [`hal_driver_fake`]: one no-I/O fake per family
//! - [`hal_hardware`]: driver registry, bench configuration, benches
//!
//! Protocol code depends on the family traits only and receives its
//! instruments from a [`Bench`] built from configuration, so the
//! same code runs against real drivers or fakes.

pub mod check;
pub mod logging;

pub use hal_core;
pub use hal_driver_fake;
pub use hal_hardware;

pub use hal_core::{HalError, HalResult, InstrumentFamily, InstrumentHandle};
pub use hal_hardware::{Bench, DriverRegistry, HalConfig};
