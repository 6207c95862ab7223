//! Modulator bias controllers.

use super::Instrument;
use crate::error::HalResult;

/// Capability: modulator bias control
///
/// `lock` brings the modulator to its working point and into low-noise mode,
/// and only returns once the controller is ready.
pub trait ModulatorBiasController: Instrument {
    /// Lock the modulator to its operating point.
    fn lock(&mut self) -> HalResult<()>;
}
