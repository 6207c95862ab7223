//! Fake power supply keeping a record of per-channel settings.

use hal_core::{
    DriverFactory, HalResult, Instrument, InstrumentFamily, InstrumentHandle, PowerSupply,
    Session, SupplyChannel,
};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Factory for creating FakePowerSupply instances.
pub struct FakePowerSupplyFactory;

impl DriverFactory for FakePowerSupplyFactory {
    fn driver_type(&self) -> &'static str {
        "fake_power_supply"
    }

    fn name(&self) -> &'static str {
        "Fake Power Supply"
    }

    fn family(&self) -> InstrumentFamily {
        InstrumentFamily::PowerSupply
    }

    fn validate(&self, _config: &toml::Value) -> HalResult<()> {
        Ok(())
    }

    fn build(&self, _config: toml::Value) -> HalResult<InstrumentHandle> {
        Ok(InstrumentHandle::PowerSupply(
            Box::<FakePowerSupply>::default(),
        ))
    }
}

/// Last settings applied to one channel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChannelSettings {
    /// Target voltage, in V
    pub voltage: f64,
    /// Current limit, in A
    pub current_limit: f64,
    /// Output enabled
    pub output: bool,
}

/// Fake power supply recording the settings of each channel.
#[derive(Debug, Default)]
pub struct FakePowerSupply {
    session: Session,
    channels: BTreeMap<SupplyChannel, ChannelSettings>,
}

impl FakePowerSupply {
    /// Settings of `channel`; untouched channels read as default.
    pub fn channel(&self, channel: SupplyChannel) -> ChannelSettings {
        self.channels.get(&channel).copied().unwrap_or_default()
    }

    fn settings_mut(&mut self, channel: SupplyChannel) -> &mut ChannelSettings {
        self.channels.entry(channel).or_default()
    }
}

impl fmt::Display for FakePowerSupply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fake Power Supply")
    }
}

impl Instrument for FakePowerSupply {
    fn open(&mut self) -> HalResult<()> {
        self.session.open("fake_power_supply")
    }

    fn close(&mut self) -> HalResult<()> {
        self.session.close("fake_power_supply");
        Ok(())
    }
}

impl PowerSupply for FakePowerSupply {
    fn set_voltage(&mut self, voltage: f64, channel: SupplyChannel) -> HalResult<()> {
        debug!(%channel, voltage, "fake supply voltage set");
        self.settings_mut(channel).voltage = voltage;
        Ok(())
    }

    fn set_current_limit(&mut self, current: f64, channel: SupplyChannel) -> HalResult<()> {
        self.settings_mut(channel).current_limit = current;
        Ok(())
    }

    fn set_output(&mut self, enabled: bool, channel: SupplyChannel) -> HalResult<()> {
        debug!(%channel, enabled, "fake supply output switched");
        self.settings_mut(channel).output = enabled;
        Ok(())
    }
}
