//! Programmable power supplies.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Instrument;
use crate::error::HalResult;

/// Output channel of a power supply, numbered from 1 like front panels are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupplyChannel(pub u8);

impl Default for SupplyChannel {
    fn default() -> Self {
        SupplyChannel(1)
    }
}

impl fmt::Display for SupplyChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CH{}", self.0)
    }
}

/// Capability: per-channel voltage source
///
/// # Contract
/// - `set_voltage` sets the target voltage of a channel, in volts
/// - `set_current_limit` sets the current limit of a channel, in amperes
/// - `set_output` enables or disables the output of a channel
pub trait PowerSupply: Instrument {
    /// Set the target voltage of `channel`.
    fn set_voltage(&mut self, voltage: f64, channel: SupplyChannel) -> HalResult<()>;

    /// Set the current limit of `channel`.
    fn set_current_limit(&mut self, current: f64, channel: SupplyChannel) -> HalResult<()>;

    /// Enable or disable the output of `channel`.
    fn set_output(&mut self, enabled: bool, channel: SupplyChannel) -> HalResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_channel_is_one() {
        assert_eq!(SupplyChannel::default(), SupplyChannel(1));
        assert_eq!(SupplyChannel(2).to_string(), "CH2");
    }
}
