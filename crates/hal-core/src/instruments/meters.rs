//! Scalar meters: amperemeters, voltmeters and optical power meters.

use super::Instrument;
use crate::error::HalResult;

/// Capability: current measurement
pub trait Ammeter: Instrument {
    /// Current reading, in amperes.
    fn get_current(&mut self) -> HalResult<f64>;
}

/// Capability: voltage measurement
pub trait Voltmeter: Instrument {
    /// Voltage reading, in volts.
    fn get_voltage(&mut self) -> HalResult<f64>;
}

/// Capability: optical power measurement
///
/// Readings are in watts unless the driver documents another unit.
pub trait PowerMeter: Instrument {
    /// Current power reading.
    fn read(&mut self) -> HalResult<f64>;
}
