//! Polarization controllers.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Instrument;
use crate::error::HalResult;

/// Axis of a quarter-half-quarter wave plate polarization controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolarizationChannel {
    /// First quarter wave plate
    QuarterWavePlate1,
    /// Half wave plate
    #[default]
    HalfWavePlate,
    /// Second quarter wave plate
    QuarterWavePlate2,
}

impl PolarizationChannel {
    /// Every channel, in optical order.
    pub const ALL: [PolarizationChannel; 3] = [
        Self::QuarterWavePlate1,
        Self::HalfWavePlate,
        Self::QuarterWavePlate2,
    ];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::QuarterWavePlate1 => "Quarter Wave Plate 1",
            Self::HalfWavePlate => "Half Wave Plate",
            Self::QuarterWavePlate2 => "Quarter Wave Plate 2",
        }
    }
}

impl fmt::Display for PolarizationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Capability: polarization control
///
/// # Contract
/// - Positions and increments are in device-native units
/// - `home` moves every channel to its home position
/// - `move_by` is relative to the current position of the channel,
///   `move_to` is absolute
pub trait PolarizationController: Instrument {
    /// Move every channel to its home position.
    fn home(&mut self) -> HalResult<()>;

    /// Current position of `channel`.
    fn position(&mut self, channel: PolarizationChannel) -> HalResult<f64>;

    /// Move `channel` by `increment`.
    fn move_by(&mut self, increment: f64, channel: PolarizationChannel) -> HalResult<()>;

    /// Move `channel` to `position`.
    fn move_to(&mut self, position: f64, channel: PolarizationChannel) -> HalResult<()>;
}
