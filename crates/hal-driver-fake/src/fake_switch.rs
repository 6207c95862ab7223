//! Fake optical switch reporting the last state set.

use hal_core::{
    DriverFactory, HalResult, Instrument, InstrumentFamily, InstrumentHandle, OpticalSwitch,
    Session,
};
use std::fmt;

/// Factory for creating FakeOpticalSwitch instances.
pub struct FakeOpticalSwitchFactory;

impl DriverFactory for FakeOpticalSwitchFactory {
    fn driver_type(&self) -> &'static str {
        "fake_optical_switch"
    }

    fn name(&self) -> &'static str {
        "Fake Switch"
    }

    fn family(&self) -> InstrumentFamily {
        InstrumentFamily::OpticalSwitch
    }

    fn validate(&self, _config: &toml::Value) -> HalResult<()> {
        Ok(())
    }

    fn build(&self, _config: toml::Value) -> HalResult<InstrumentHandle> {
        Ok(InstrumentHandle::OpticalSwitch(
            Box::<FakeOpticalSwitch>::default(),
        ))
    }
}

/// Fake optical switch reporting the last state set (initially 0).
#[derive(Debug, Default)]
pub struct FakeOpticalSwitch {
    session: Session,
    state: u32,
}

impl fmt::Display for FakeOpticalSwitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fake Switch")
    }
}

impl Instrument for FakeOpticalSwitch {
    fn open(&mut self) -> HalResult<()> {
        self.session.open("fake_optical_switch")
    }

    fn close(&mut self) -> HalResult<()> {
        self.session.close("fake_optical_switch");
        Ok(())
    }
}

impl OpticalSwitch for FakeOpticalSwitch {
    fn set_state(&mut self, state: u32) -> HalResult<()> {
        self.state = state;
        Ok(())
    }

    fn read_state(&mut self) -> HalResult<u32> {
        Ok(self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_last_state() {
        let mut switch = FakeOpticalSwitch::default();
        assert_eq!(switch.read_state().unwrap(), 0);
        switch.set_state(3).unwrap();
        assert_eq!(switch.read_state().unwrap(), 3);
    }
}
