//! End-to-end: bench file on disk, process resolver from its
//! `[dependencies]` section, check of every instrument.

use qkd_hal::check::check_bench;
use qkd_hal::hal_core::{self, requires_dependencies, Gated, HalError, HalResult};
use qkd_hal::{DriverRegistry, HalConfig};

struct VendorSdkClient;

requires_dependencies!(VendorSdkClient, "qkd_vendor_sdk");

struct UnlistedSdkClient;

requires_dependencies!(UnlistedSdkClient, "qkd_unlisted_sdk");

const BENCH: &str = r#"
[dependencies]
available = ["qkd_vendor_sdk"]

[[instruments]]
id = "alice_laser"
family = "laser"

[[instruments]]
id = "alice_bias"
family = "bias_controller"

[[instruments]]
id = "alice_dac"
family = "dac"
[instruments.options]
channels = ["phase", "amplitude"]

[[instruments]]
id = "bob_polarization"
family = "polarization_controller"

[[instruments]]
id = "bob_voa"
family = "voa"

[[instruments]]
id = "bob_replay"
family = "adc"
driver = "replay_adc"
[instruments.options]
channels = ["I", "Q"]
"#;

#[test]
fn test_bench_file_check_with_declared_dependencies() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bench.toml");
    std::fs::write(&path, BENCH).unwrap();

    let config = HalConfig::load(&path).unwrap();
    hal_core::install_resolver(config.resolver()).unwrap();

    // Declared in the bench file
    assert!(VendorSdkClient::ensure_available().is_ok());
    let err: HalResult<()> = UnlistedSdkClient::ensure_available();
    match err {
        Err(HalError::MissingDependencies { class, missing, .. }) => {
            assert_eq!(class, "UnlistedSdkClient");
            assert_eq!(missing, vec!["qkd_unlisted_sdk".to_string()]);
        }
        other => panic!("expected MissingDependencies, got {:?}", other),
    }

    let registry = DriverRegistry::with_fakes();
    let report = check_bench(&registry, &config);
    for result in &report.results {
        assert!(result.passed(), "{}", result);
    }
    assert_eq!(report.results.len(), 6);
}
