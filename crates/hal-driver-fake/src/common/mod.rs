//! Helpers shared by the fake drivers.

mod rng;

pub use rng::FakeRng;

use hal_core::HalResult;
use serde::de::DeserializeOwned;

/// Deserialize a factory configuration table.
pub(crate) fn parse_config<T: DeserializeOwned>(config: &toml::Value) -> HalResult<T> {
    Ok(config.clone().try_into()?)
}
