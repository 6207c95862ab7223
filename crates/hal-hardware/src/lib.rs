//! Driver registry, bench configuration and instrument benches.
//!
//! ```rust,no_run
//! use hal_hardware::{Bench, DriverRegistry, HalConfig};
//! use std::path::Path;
//!
//! # fn main() -> hal_core::HalResult<()> {
//! let config = HalConfig::load(Path::new("bench.toml"))?;
//! hal_core::install_resolver(config.resolver());
//!
//! let registry = DriverRegistry::with_fakes();
//! let mut bench = Bench::from_config(&registry, &config)?;
//! bench.open_all()?;
//! bench.voa_mut("bob_voa")?.set_value(3.0)?;
//! bench.close_all()?;
//! # Ok(())
//! # }
//! ```

pub mod bench;
pub mod config;
pub mod registry;

pub use bench::Bench;
pub use config::{DependenciesConfig, HalConfig, InstrumentConfig, ENV_PREFIX, FAKE_DRIVER};
pub use registry::{DriverInfo, DriverRegistry, DriverStatus};
