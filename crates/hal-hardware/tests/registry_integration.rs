use std::fmt;
use std::sync::{Arc, Mutex};

use hal_core::{
    CapabilityGate, DriverFactory, GateOutcome, GatedFactory, HalError, HalResult, Instrument,
    InstrumentFamily, InstrumentHandle, StaticResolver, Voa,
};
use hal_driver_fake::FakeVoa;
use hal_hardware::{Bench, DriverRegistry, DriverStatus, HalConfig, InstrumentConfig};
use tracing_test::traced_test;

// -----------------------------------------------------------------------------
// Gated vendor driver
// -----------------------------------------------------------------------------

static VENDOR_GATE: CapabilityGate =
    CapabilityGate::new("VendorVoa", &["qkd_hal_test_vendor_sdk_not_installed"]);

static LAB_GATE: CapabilityGate = CapabilityGate::new("LabVoa", &["lab_sdk"]);

static LOGGED_GATE: CapabilityGate =
    CapabilityGate::new("LoggedVoa", &["qkd_hal_test_logged_sdk_missing"]);

struct VendorVoaFactory(&'static str);

impl DriverFactory for VendorVoaFactory {
    fn driver_type(&self) -> &'static str {
        self.0
    }

    fn name(&self) -> &'static str {
        "Vendor VOA"
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

#[test]
fn gated_driver_is_listed_but_not_constructible() {
    let registry = DriverRegistry::with_fakes();
    registry.register_factory(Box::new(GatedFactory::new(
        VendorVoaFactory("vendor_voa"),
        &VENDOR_GATE,
    )));

    let info = registry
        .catalog()
        .into_iter()
        .find(|info| info.driver_type == "vendor_voa")
        .unwrap();
    assert_eq!(info.family, InstrumentFamily::Voa);
    assert_eq!(info.requires, vec!["qkd_hal_test_vendor_sdk_not_installed"]);
    assert_eq!(
        info.status,
        DriverStatus::Disabled {
            missing: vec!["qkd_hal_test_vendor_sdk_not_installed".to_string()]
        }
    );
    assert!(registry
        .catalog_report()
        .contains("DISABLED (missing: qkd_hal_test_vendor_sdk_not_installed)"));

    let config = InstrumentConfig::fake("voa", InstrumentFamily::Voa).with_driver("vendor_voa");
    let err = registry.build(&config).unwrap_err();
    assert!(matches!(err, HalError::MissingDependencies { ref missing, .. } if missing.len() == 1));

    // The designated fake of the same family still works
    let fake = InstrumentConfig::fake("voa", InstrumentFamily::Voa);
    assert!(registry.build(&fake).is_ok());
}

#[test]
fn gate_enabled_by_resolver_builds() {
    let resolver = StaticResolver::new(["lab_sdk"]);
    assert_eq!(LAB_GATE.evaluate_with(&resolver), &GateOutcome::Enabled);

    let registry = DriverRegistry::new();
    registry.register_factory(Box::new(GatedFactory::new(
        VendorVoaFactory("lab_voa"),
        &LAB_GATE,
    )));
    let config = InstrumentConfig::fake("voa", InstrumentFamily::Voa).with_driver("lab_voa");
    let mut handle = registry.build(&config).unwrap();
    handle.open().unwrap();
    handle.as_voa_mut().unwrap().set_value(0.5).unwrap();
    assert!(registry.catalog()[0].status.is_enabled());
}

#[test]
#[traced_test]
fn disabled_gate_is_logged_once() {
    let resolver = StaticResolver::default();
    assert!(matches!(
        LOGGED_GATE.evaluate_with(&resolver),
        GateOutcome::Disabled { .. }
    ));
    LOGGED_GATE.evaluate_with(&resolver);
    // The first outcome stays frozen, even for a resolver that would enable it
    assert!(matches!(
        LOGGED_GATE.evaluate_with(&StaticResolver::new(["qkd_hal_test_logged_sdk_missing"])),
        GateOutcome::Disabled { .. }
    ));
    assert!(logs_contain("qkd_hal_test_logged_sdk_missing"));
    logs_assert(|lines: &[&str]| {
        match lines
            .iter()
            .filter(|line| line.contains("construction disabled"))
            .count()
        {
            1 => Ok(()),
            n => Err(format!("expected one disablement warning, got {}", n)),
        }
    });
}

// -----------------------------------------------------------------------------
// Bench lifecycle
// -----------------------------------------------------------------------------

struct RecordingVoa {
    id: &'static str,
    fail_open: bool,
    events: Arc<Mutex<Vec<String>>>,
}

impl fmt::Display for RecordingVoa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Recording VOA {}", self.id)
    }
}

impl Instrument for RecordingVoa {
    fn open(&mut self) -> HalResult<()> {
        self.events.lock().unwrap().push(format!("open {}", self.id));
        if self.fail_open {
            return Err(HalError::driver(self.id, "unreachable"));
        }
        Ok(())
    }

    fn close(&mut self) -> HalResult<()> {
        self.events.lock().unwrap().push(format!("close {}", self.id));
        Ok(())
    }
}

impl Voa for RecordingVoa {
    fn set_value(&mut self, _value: f64) -> HalResult<()> {
        Ok(())
    }
}

fn recording(
    id: &'static str,
    fail_open: bool,
    events: &Arc<Mutex<Vec<String>>>,
) -> InstrumentHandle {
    InstrumentHandle::Voa(Box::new(RecordingVoa {
        id,
        fail_open,
        events: events.clone(),
    }))
}

#[test]
fn failed_open_closes_opened_instruments_in_reverse() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut bench = Bench::default();
    bench.insert("a", recording("a", false, &events)).unwrap();
    bench.insert("b", recording("b", false, &events)).unwrap();
    bench.insert("c", recording("c", true, &events)).unwrap();
    bench.insert("d", recording("d", false, &events)).unwrap();

    assert!(matches!(bench.open_all(), Err(HalError::Driver { .. })));
    assert_eq!(
        *events.lock().unwrap(),
        vec!["open a", "open b", "open c", "close b", "close a"]
    );
}

#[test]
fn close_all_runs_in_reverse_order() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut bench = Bench::default();
    bench.insert("a", recording("a", false, &events)).unwrap();
    bench.insert("b", recording("b", false, &events)).unwrap();

    bench.open_all().unwrap();
    bench.close_all().unwrap();
    assert_eq!(
        *events.lock().unwrap(),
        vec!["open a", "open b", "close b", "close a"]
    );
}

#[test]
fn bench_from_file_runs_on_fakes_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bench.toml");
    std::fs::write(
        &path,
        r#"
        [[instruments]]
        id = "alice_laser"
        family = "laser"

        [[instruments]]
        id = "alice_supply"
        family = "power_supply"

        [[instruments]]
        id = "bob_switch"
        family = "optical_switch"

        [[instruments]]
        id = "bob_pm"
        family = "power_meter"
        [instruments.options]
        power = 2.5e-6

        [[instruments]]
        id = "bob_adc"
        family = "adc"
        driver = "fake_adc"
        [instruments.options]
        channels = ["I", "Q"]
        signal = { kind = "gaussian", variance = 1.0, seed = 7 }
        "#,
    )
    .unwrap();

    let config = HalConfig::load(&path).unwrap();
    let registry = DriverRegistry::with_fakes();
    let mut bench = Bench::from_config(&registry, &config).unwrap();
    assert_eq!(bench.len(), 5);

    bench.open_all().unwrap();
    bench.laser_mut("alice_laser").unwrap().enable().unwrap();
    bench
        .power_supply_mut("alice_supply")
        .unwrap()
        .set_output(true, Default::default())
        .unwrap();
    bench.optical_switch_mut("bob_switch").unwrap().set_state(2).unwrap();
    assert_eq!(
        bench.optical_switch_mut("bob_switch").unwrap().read_state().unwrap(),
        2
    );
    assert_eq!(bench.power_meter_mut("bob_pm").unwrap().read().unwrap(), 2.5e-6);

    let adc = bench.adc_mut("bob_adc").unwrap();
    adc.set_acquisition_parameters(&hal_core::AcquisitionParameters::new(0.001, 10_000.0))
        .unwrap();
    adc.arm_acquisition().unwrap();
    adc.trigger().unwrap();
    let data = adc.get_data().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0].len(), 10);

    bench.close_all().unwrap();
}
