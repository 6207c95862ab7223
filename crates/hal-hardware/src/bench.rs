//! The set of instruments built for one experiment.

use hal_core::{
    Adc, Ammeter, Dac, DacAdc, HalError, HalResult, InstrumentFamily, InstrumentHandle, Laser,
    ModulatorBiasController, OpticalSwitch, PolarizationController, PowerMeter, PowerSupply, Voa,
    Voltmeter,
};
use tracing::{info, warn};

use crate::config::HalConfig;
use crate::registry::DriverRegistry;

/// Instruments built from a [`HalConfig`], keyed by id, kept in
/// configuration order.
#[derive(Debug, Default)]
pub struct Bench {
    instruments: Vec<(String, InstrumentHandle)>,
}

macro_rules! typed_lookup {
    ($($name:ident => $as_mut:ident, $tr:ident, $family:ident;)+) => {
        $(
            #[doc = concat!("Instrument `id` as `", stringify!($tr), "`.")]
            pub fn $name(&mut self, id: &str) -> HalResult<&mut dyn $tr> {
                let handle = self.lookup(id)?;
                let family = handle.family();
                match handle.$as_mut() {
                    Some(instrument) => Ok(instrument),
                    None => Err(HalError::Configuration(format!(
                        "instrument '{}' is a {}, not a {}",
                        id,
                        family,
                        InstrumentFamily::$family
                    ))),
                }
            }
        )+
    };
}

impl Bench {
    /// Build every configured instrument, stopping at the first failure.
    pub fn from_config(registry: &DriverRegistry, config: &HalConfig) -> HalResult<Self> {
        let mut bench = Self::default();
        for instrument in &config.instruments {
            let handle = registry.build(instrument)?;
            bench.insert(instrument.id.clone(), handle)?;
        }
        info!(instruments = bench.len(), "bench built");
        Ok(bench)
    }

    /// Add an already built instrument.
    pub fn insert(&mut self, id: impl Into<String>, handle: InstrumentHandle) -> HalResult<()> {
        let id = id.into();
        if self.contains(&id) {
            return Err(HalError::Configuration(format!(
                "duplicate instrument id '{}'",
                id
            )));
        }
        self.instruments.push((id, handle));
        Ok(())
    }

    /// Check if an instrument is present.
    pub fn contains(&self, id: &str) -> bool {
        self.instruments.iter().any(|(i, _)| i == id)
    }

    /// Instrument ids, in configuration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.instruments.iter().map(|(id, _)| id.as_str())
    }

    /// Number of instruments.
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    /// True if the bench holds no instrument.
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Handle of instrument `id`.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut InstrumentHandle> {
        self.instruments
            .iter_mut()
            .find(|(i, _)| i == id)
            .map(|(_, handle)| handle)
    }

    fn lookup(&mut self, id: &str) -> HalResult<&mut InstrumentHandle> {
        self.get_mut(id)
            .ok_or_else(|| HalError::Configuration(format!("no instrument '{}' on the bench", id)))
    }

    /// Open every instrument in configuration order.
    ///
    /// If one fails, the instruments opened so far are closed again (in
    /// reverse order) and the error is returned.
    pub fn open_all(&mut self) -> HalResult<()> {
        for index in 0..self.instruments.len() {
            let (id, handle) = &mut self.instruments[index];
            if let Err(e) = handle.open() {
                warn!(id = %id, error = %e, "open failed, closing opened instruments");
                for (opened_id, opened) in self.instruments[..index].iter_mut().rev() {
                    if let Err(close_err) = opened.close() {
                        warn!(id = %opened_id, error = %close_err, "close failed");
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }

    /// Close every instrument in reverse configuration order.
    ///
    /// Every instrument is attempted; the first error is returned.
    pub fn close_all(&mut self) -> HalResult<()> {
        let mut first_error = None;
        for (id, handle) in self.instruments.iter_mut().rev() {
            if let Err(e) = handle.close() {
                warn!(id = %id, error = %e, "close failed");
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    typed_lookup! {
        adc_mut => as_adc_mut, Adc, Adc;
        dac_mut => as_dac_mut, Dac, Dac;
        dac_adc_mut => as_dac_adc_mut, DacAdc, DacAdc;
        ammeter_mut => as_ammeter_mut, Ammeter, Ammeter;
        voltmeter_mut => as_voltmeter_mut, Voltmeter, Voltmeter;
        power_meter_mut => as_power_meter_mut, PowerMeter, PowerMeter;
        power_supply_mut => as_power_supply_mut, PowerSupply, PowerSupply;
        laser_mut => as_laser_mut, Laser, Laser;
        bias_controller_mut => as_bias_controller_mut, ModulatorBiasController, BiasController;
        polarization_controller_mut => as_polarization_controller_mut, PolarizationController, PolarizationController;
        optical_switch_mut => as_optical_switch_mut, OpticalSwitch, OpticalSwitch;
        voa_mut => as_voa_mut, Voa, Voa;
    }
}
