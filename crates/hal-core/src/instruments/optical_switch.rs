//! Optical switches.

use super::Instrument;
use crate::error::HalResult;

/// Capability: optical switching
///
/// States are device-native port indices.
pub trait OpticalSwitch: Instrument {
    /// Route the switch to `state`.
    fn set_state(&mut self, state: u32) -> HalResult<()>;

    /// Current state of the switch.
    fn read_state(&mut self) -> HalResult<u32>;
}
