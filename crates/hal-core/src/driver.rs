//! Driver factories and instrument handles.
//!
//! Every driver crate exposes one [`DriverFactory`] per driver type. The
//! registry in `hal-hardware` maps the `driver` field of an instrument
//! configuration to a factory and calls [`DriverFactory::build`], which returns
//! an [`InstrumentHandle`] wrapping the family trait object.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                 Composition Root (main.rs)                   │
//! │  hal_driver_fake::register_all(&registry);                   │
//! │  registry.register_factory(GatedFactory::new(.., &GATE));    │
//! └──────────────────────────────────────────────────────────────┘
//!                                │
//!                                ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       DriverRegistry                         │
//! │  factories: DashMap<driver_type, Box<dyn DriverFactory>>     │
//! │  fakes:     DashMap<InstrumentFamily, driver_type>           │
//! └──────────────────────────────────────────────────────────────┘
//!                                │
//!                                ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                   DriverFactory::build()                     │
//! │  Parses the TOML options, returns an InstrumentHandle        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example: Implementing a Driver Factory
//!
//! ```rust,ignore
//! pub struct Ell14VoaFactory;
//!
//! impl DriverFactory for Ell14VoaFactory {
//!     fn driver_type(&self) -> &'static str { "ell14_voa" }
//!     fn name(&self) -> &'static str { "Thorlabs ELL14 rotating VOA" }
//!     fn family(&self) -> InstrumentFamily { InstrumentFamily::Voa }
//!
//!     fn validate(&self, config: &toml::Value) -> HalResult<()> {
//!         let _: Ell14Config = config.clone().try_into()?;
//!         Ok(())
//!     }
//!
//!     fn build(&self, config: toml::Value) -> HalResult<InstrumentHandle> {
//!         let cfg: Ell14Config = config.try_into()?;
//!         Ok(InstrumentHandle::Voa(Box::new(Ell14Voa::new(&cfg.port)?)))
//!     }
//! }
//! ```

use std::fmt;

use crate::error::{HalError, HalResult};
use crate::family::InstrumentFamily;
use crate::gate::CapabilityGate;
use crate::instruments::{
    Adc, Ammeter, Dac, DacAdc, Laser, ModulatorBiasController, OpticalSwitch,
    PolarizationController, PowerMeter, PowerSupply, Voa, Voltmeter,
};

// =============================================================================
// Driver Factory Trait
// =============================================================================

/// Trait for driver factories that create instrument instances.
///
/// The factory is responsible for:
///
/// 1. Declaring the driver type it handles (matching the `driver` config field)
/// 2. Declaring the family of the instruments it builds
/// 3. Validating the driver options before instantiation
/// 4. Creating the driver
///
/// Factories are registered once at startup and live for the program's
/// lifetime. They hold no mutable state across builds.
pub trait DriverFactory: Send + Sync + 'static {
    /// Driver type name used in the `driver` field of an instrument.
    ///
    /// ```toml
    /// [[instruments]]
    /// driver = "fake_voa"  # matches driver_type() returning "fake_voa"
    /// ```
    fn driver_type(&self) -> &'static str;

    /// Human-readable name for the catalog and error messages.
    fn name(&self) -> &'static str;

    /// Family of every instrument this factory builds.
    fn family(&self) -> InstrumentFamily;

    /// Capability gate guarding construction, if the driver has optional
    /// dependencies.
    fn gate(&self) -> Option<&'static CapabilityGate> {
        None
    }

    /// Validate the driver options without instantiating.
    ///
    /// * `config` - the `[instruments.options]` table, with `location` merged
    ///   in when the instrument declares one
    fn validate(&self, config: &toml::Value) -> HalResult<()>;

    /// Instantiate the driver. Called after `validate` passes.
    fn build(&self, config: toml::Value) -> HalResult<InstrumentHandle>;
}

/// Wraps a factory with a [`CapabilityGate`].
///
/// Metadata (type, name, family) stays readable whatever the gate outcome;
/// `build` fails with [`HalError::MissingDependencies`] while the gate is
/// disabled and never reaches the inner factory.
pub struct GatedFactory<F> {
    inner: F,
    gate: &'static CapabilityGate,
}

impl<F: DriverFactory> GatedFactory<F> {
    /// Guard `inner` with `gate`.
    pub fn new(inner: F, gate: &'static CapabilityGate) -> Self {
        Self { inner, gate }
    }

    /// The wrapped factory.
    pub fn inner(&self) -> &F {
        &self.inner
    }
}

impl<F: DriverFactory> DriverFactory for GatedFactory<F> {
    fn driver_type(&self) -> &'static str {
        self.inner.driver_type()
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn family(&self) -> InstrumentFamily {
        self.inner.family()
    }

    fn gate(&self) -> Option<&'static CapabilityGate> {
        Some(self.gate)
    }

    fn validate(&self, config: &toml::Value) -> HalResult<()> {
        self.inner.validate(config)
    }

    fn build(&self, config: toml::Value) -> HalResult<InstrumentHandle> {
        self.gate.construct(|| self.inner.build(config))
    }
}

// =============================================================================
// Instrument Handle
// =============================================================================

/// A built instrument, tagged with its family.
pub enum InstrumentHandle {
    /// Analog to digital converter
    Adc(Box<dyn Adc>),
    /// Digital to analog converter
    Dac(Box<dyn Dac>),
    /// Combined DAC and ADC
    DacAdc(Box<dyn DacAdc>),
    /// Current meter
    Ammeter(Box<dyn Ammeter>),
    /// Voltage meter
    Voltmeter(Box<dyn Voltmeter>),
    /// Optical power meter
    PowerMeter(Box<dyn PowerMeter>),
    /// Power supply
    PowerSupply(Box<dyn PowerSupply>),
    /// Laser source
    Laser(Box<dyn Laser>),
    /// Modulator bias controller
    BiasController(Box<dyn ModulatorBiasController>),
    /// Polarization controller
    PolarizationController(Box<dyn PolarizationController>),
    /// Optical switch
    OpticalSwitch(Box<dyn OpticalSwitch>),
    /// Variable optical attenuator
    Voa(Box<dyn Voa>),
}

/// Run `$body` with `$inner` bound to the boxed trait object, whatever the
/// variant. Only `Instrument` methods are usable in `$body`.
macro_rules! dispatch {
    ($handle:expr, $inner:ident => $body:expr) => {
        match $handle {
            InstrumentHandle::Adc($inner) => $body,
            InstrumentHandle::Dac($inner) => $body,
            InstrumentHandle::DacAdc($inner) => $body,
            InstrumentHandle::Ammeter($inner) => $body,
            InstrumentHandle::Voltmeter($inner) => $body,
            InstrumentHandle::PowerMeter($inner) => $body,
            InstrumentHandle::PowerSupply($inner) => $body,
            InstrumentHandle::Laser($inner) => $body,
            InstrumentHandle::BiasController($inner) => $body,
            InstrumentHandle::PolarizationController($inner) => $body,
            InstrumentHandle::OpticalSwitch($inner) => $body,
            InstrumentHandle::Voa($inner) => $body,
        }
    };
}

macro_rules! accessors {
    ($($variant:ident => $as_mut:ident, $into:ident, $tr:ident;)+) => {
        $(
            #[doc = concat!("Borrow as `", stringify!($tr), "` if this is a `", stringify!($variant), "` handle.")]
            pub fn $as_mut(&mut self) -> Option<&mut dyn $tr> {
                match self {
                    InstrumentHandle::$variant(inner) => Some(&mut **inner),
                    _ => None,
                }
            }

            #[doc = concat!("Unwrap the boxed `", stringify!($tr), "`, or give the handle back.")]
            pub fn $into(self) -> Result<Box<dyn $tr>, Self> {
                match self {
                    InstrumentHandle::$variant(inner) => Ok(inner),
                    other => Err(other),
                }
            }
        )+
    };
}

impl InstrumentHandle {
    /// Family of the wrapped instrument.
    pub fn family(&self) -> InstrumentFamily {
        match self {
            Self::Adc(_) => InstrumentFamily::Adc,
            Self::Dac(_) => InstrumentFamily::Dac,
            Self::DacAdc(_) => InstrumentFamily::DacAdc,
            Self::Ammeter(_) => InstrumentFamily::Ammeter,
            Self::Voltmeter(_) => InstrumentFamily::Voltmeter,
            Self::PowerMeter(_) => InstrumentFamily::PowerMeter,
            Self::PowerSupply(_) => InstrumentFamily::PowerSupply,
            Self::Laser(_) => InstrumentFamily::Laser,
            Self::BiasController(_) => InstrumentFamily::BiasController,
            Self::PolarizationController(_) => InstrumentFamily::PolarizationController,
            Self::OpticalSwitch(_) => InstrumentFamily::OpticalSwitch,
            Self::Voa(_) => InstrumentFamily::Voa,
        }
    }

    /// Open the wrapped instrument.
    pub fn open(&mut self) -> HalResult<()> {
        dispatch!(self, inner => crate::instruments::Instrument::open(&mut **inner))
    }

    /// Close the wrapped instrument.
    pub fn close(&mut self) -> HalResult<()> {
        dispatch!(self, inner => crate::instruments::Instrument::close(&mut **inner))
    }

    /// Fail with [`HalError::FamilyMismatch`] unless the handle is of `expected`.
    pub fn expect_family(&self, driver: &str, expected: InstrumentFamily) -> HalResult<()> {
        let actual = self.family();
        if actual == expected {
            Ok(())
        } else {
            Err(HalError::FamilyMismatch {
                driver: driver.to_string(),
                expected,
                actual,
            })
        }
    }

    accessors! {
        Adc => as_adc_mut, into_adc, Adc;
        Dac => as_dac_mut, into_dac, Dac;
        DacAdc => as_dac_adc_mut, into_dac_adc, DacAdc;
        Ammeter => as_ammeter_mut, into_ammeter, Ammeter;
        Voltmeter => as_voltmeter_mut, into_voltmeter, Voltmeter;
        PowerMeter => as_power_meter_mut, into_power_meter, PowerMeter;
        PowerSupply => as_power_supply_mut, into_power_supply, PowerSupply;
        Laser => as_laser_mut, into_laser, Laser;
        BiasController => as_bias_controller_mut, into_bias_controller, ModulatorBiasController;
        PolarizationController => as_polarization_controller_mut, into_polarization_controller, PolarizationController;
        OpticalSwitch => as_optical_switch_mut, into_optical_switch, OpticalSwitch;
        Voa => as_voa_mut, into_voa, Voa;
    }
}

impl fmt::Display for InstrumentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, inner => fmt::Display::fmt(inner, f))
    }
}

impl fmt::Debug for InstrumentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstrumentHandle")
            .field("family", &self.family())
            .field("instrument", &self.to_string())
            .finish()
    }
}
