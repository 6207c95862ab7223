//! Fake variable optical attenuator remembering the last value set.

use hal_core::{
    DriverFactory, HalResult, Instrument, InstrumentFamily, InstrumentHandle, Session, Voa,
};
use std::fmt;

/// Factory for creating FakeVoa instances.
pub struct FakeVoaFactory;

impl DriverFactory for FakeVoaFactory {
    fn driver_type(&self) -> &'static str {
        "fake_voa"
    }

    fn name(&self) -> &'static str {
        "Fake VOA"
    }

    fn family(&self) -> InstrumentFamily {
        InstrumentFamily::Voa
    }

    fn validate(&self, _config: &toml::Value) -> HalResult<()> {
        Ok(())
    }

    fn build(&self, _config: toml::Value) -> HalResult<InstrumentHandle> {
        Ok(InstrumentHandle::Voa(Box::<FakeVoa>::default()))
    }
}

/// Fake variable optical attenuator remembering its value (initially 0.0).
#[derive(Debug, Default)]
pub struct FakeVoa {
    session: Session,
    value: f64,
}

impl FakeVoa {
    /// Last value set.
    pub fn value(&self) -> f64 {
        self.value
    }
}

impl fmt::Display for FakeVoa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fake VOA (value : {:?})", self.value)
    }
}

impl Instrument for FakeVoa {
    fn open(&mut self) -> HalResult<()> {
        self.session.open("fake_voa")
    }

    fn close(&mut self) -> HalResult<()> {
        self.session.close("fake_voa");
        Ok(())
    }
}

impl Voa for FakeVoa {
    fn set_value(&mut self, value: f64) -> HalResult<()> {
        self.value = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_tracks_value() {
        let mut voa = FakeVoa::default();
        assert_eq!(voa.to_string(), "Fake VOA (value : 0.0)");
        voa.set_value(0.5).unwrap();
        assert_eq!(voa.value(), 0.5);
        assert_eq!(voa.to_string(), "Fake VOA (value : 0.5)");
    }
}
