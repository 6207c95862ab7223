//! Bench check: build, open and close every configured instrument.

use std::fmt;

use hal_core::HalResult;
use hal_hardware::{DriverRegistry, HalConfig, InstrumentConfig};
use tracing::{debug, warn};

/// Outcome for one instrument.
#[derive(Debug)]
pub struct CheckResult {
    /// Instrument id
    pub id: String,
    /// Instrument description on success, error on failure
    pub outcome: HalResult<String>,
}

impl CheckResult {
    /// True if the instrument was built, opened and closed.
    pub fn passed(&self) -> bool {
        self.outcome.is_ok()
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Ok(description) => write!(f, "ok      {:<24} {}", self.id, description),
            Err(e) => write!(f, "FAILED  {:<24} {}", self.id, e),
        }
    }
}

/// Results for a whole bench, in configuration order.
#[derive(Debug, Default)]
pub struct CheckReport {
    /// One entry per configured instrument
    pub results: Vec<CheckResult>,
}

impl CheckReport {
    /// Number of failed instruments.
    pub fn failures(&self) -> usize {
        self.results.iter().filter(|r| !r.passed()).count()
    }

    /// True if every instrument passed.
    pub fn all_passed(&self) -> bool {
        self.failures() == 0
    }
}

/// Check every instrument of `config` independently.
///
/// A failing instrument does not stop the check of the following ones.
pub fn check_bench(registry: &DriverRegistry, config: &HalConfig) -> CheckReport {
    let results = config
        .instruments
        .iter()
        .map(|instrument| {
            let outcome = check_instrument(registry, instrument);
            if let Err(e) = &outcome {
                warn!(id = %instrument.id, error = %e, "instrument check failed");
            }
            CheckResult {
                id: instrument.id.clone(),
                outcome,
            }
        })
        .collect();
    CheckReport { results }
}

fn check_instrument(registry: &DriverRegistry, config: &InstrumentConfig) -> HalResult<String> {
    let mut handle = registry.build(config)?;
    let description = handle.to_string();
    handle.open()?;
    debug!(id = %config.id, "instrument opened");
    handle.close()?;
    Ok(description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hal_core::InstrumentFamily;

    #[test]
    fn test_check_reports_each_instrument() {
        let registry = DriverRegistry::with_fakes();
        let mut config = HalConfig::default();
        config
            .instruments
            .push(InstrumentConfig::fake("voa", InstrumentFamily::Voa));
        config.instruments.push(
            InstrumentConfig::fake("laser", InstrumentFamily::Laser).with_driver("no_such_driver"),
        );
        config
            .instruments
            .push(InstrumentConfig::fake("switch", InstrumentFamily::OpticalSwitch));

        let report = check_bench(&registry, &config);
        assert_eq!(report.results.len(), 3);
        assert_eq!(report.failures(), 1);
        assert!(!report.all_passed());

        assert_eq!(
            report.results[0].to_string(),
            format!("ok      {:<24} Fake VOA (value : 0.0)", "voa")
        );
        assert!(report.results[1].to_string().starts_with("FAILED  laser"));
        assert!(report.results[2].passed());
    }

    #[test]
    fn test_empty_bench_passes() {
        let registry = DriverRegistry::with_fakes();
        assert!(check_bench(&registry, &HalConfig::default()).all_passed());
    }
}
