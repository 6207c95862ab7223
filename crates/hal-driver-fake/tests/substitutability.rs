//! Fakes used strictly through the family traits, the way protocol code
//! uses real drivers.

use hal_core::{
    AcquisitionParameters, Adc, Ammeter, ChannelData, Dac, DacAdc, DacAdcParameters,
    EmissionParameters, HalError, HalResult, Instrument, Laser, LaserParameters,
    ModulatorBiasController, OpticalSwitch, PolarizationChannel, PolarizationController,
    PowerMeter, PowerSupply, SupplyChannel, Voa, Voltmeter,
};
use hal_driver_fake::{
    AdcSignal, FakeAdc, FakeAmmeter, FakeBiasController, FakeDac, FakeDacAdc, FakeLaser,
    FakeOpticalSwitch, FakePolarizationController, FakePowerMeter, FakePowerSupply, FakeVoa,
    FakeVoltmeter,
};

/// Shot-noise style acquisition written against the trait only.
fn acquire(adc: &mut dyn Adc, time: f64, rate: f64) -> HalResult<Vec<ChannelData>> {
    adc.set_acquisition_parameters(&AcquisitionParameters::new(time, rate))?;
    adc.arm_acquisition()?;
    adc.trigger()?;
    adc.stop_acquisition()?;
    adc.get_data()
}

#[test]
fn test_adc_cycle_through_trait_object() {
    let mut adc: Box<dyn Adc> = Box::new(FakeAdc::new(vec!["I".into(), "Q".into()]));
    adc.open().unwrap();

    let data = acquire(adc.as_mut(), 0.01, 100_000.0).unwrap();
    assert_eq!(data.len(), 2);
    assert!(data.iter().all(|ch| ch.len() == 1000));
    assert!(data.iter().flatten().all(|&v| v == 0.0));

    adc.close().unwrap();
}

#[test]
fn test_gaussian_adc_is_a_drop_in_replacement() {
    let signal = AdcSignal::Gaussian {
        variance: 1.0,
        seed: Some(5),
    };
    let mut adc: Box<dyn Adc> = Box::new(FakeAdc::with_signal(vec!["I".into()], signal));
    let data = acquire(adc.as_mut(), 0.001, 50_000.0).unwrap();
    assert_eq!(data[0].len(), 50);
}

#[test]
fn test_emitters_through_trait_objects() {
    let mut dac: Box<dyn Dac> = Box::<FakeDac>::default();
    dac.open().unwrap();
    dac.set_emission_parameters(&EmissionParameters::default())
        .unwrap();
    dac.load_data(vec![vec![0.0; 8]]).unwrap();
    dac.start_emission().unwrap();
    dac.stop_emission().unwrap();
    dac.close().unwrap();

    let mut dac_adc: Box<dyn DacAdc> = Box::<FakeDacAdc>::default();
    dac_adc.set_parameters(&DacAdcParameters::default()).unwrap();
    dac_adc.start().unwrap();
    dac_adc.stop().unwrap();
    assert!(dac_adc.get_adc_data().unwrap().is_empty());
}

#[test]
fn test_meters_through_trait_objects() {
    let mut ammeter: Box<dyn Ammeter> = Box::<FakeAmmeter>::default();
    let mut voltmeter: Box<dyn Voltmeter> = Box::<FakeVoltmeter>::default();
    let mut power_meter: Box<dyn PowerMeter> = Box::<FakePowerMeter>::default();

    assert_eq!(ammeter.get_current().unwrap(), 0.0);
    assert_eq!(voltmeter.get_voltage().unwrap(), 0.0);
    assert_eq!(power_meter.read().unwrap(), 1e-6);
}

#[test]
fn test_optical_chain_through_trait_objects() {
    let mut laser: Box<dyn Laser> = Box::<FakeLaser>::default();
    let mut bias: Box<dyn ModulatorBiasController> = Box::<FakeBiasController>::default();
    let mut polarization: Box<dyn PolarizationController> =
        Box::<FakePolarizationController>::default();
    let mut switch: Box<dyn OpticalSwitch> = Box::<FakeOpticalSwitch>::default();
    let mut voa: Box<dyn Voa> = Box::<FakeVoa>::default();
    let mut supply: Box<dyn PowerSupply> = Box::<FakePowerSupply>::default();

    laser
        .set_parameters(&LaserParameters {
            wavelength_nm: Some(1550.0),
            ..Default::default()
        })
        .unwrap();
    laser.enable().unwrap();
    bias.lock().unwrap();
    polarization.home().unwrap();
    polarization
        .move_by(1.5, PolarizationChannel::default())
        .unwrap();
    assert_eq!(
        polarization
            .position(PolarizationChannel::QuarterWavePlate2)
            .unwrap(),
        0.0
    );
    switch.set_state(1).unwrap();
    assert_eq!(switch.read_state().unwrap(), 1);
    voa.set_value(3.0).unwrap();
    assert_eq!(voa.to_string(), "Fake VOA (value : 3.0)");
    supply.set_voltage(1.2, SupplyChannel(1)).unwrap();
    supply.set_output(true, SupplyChannel(1)).unwrap();
    laser.disable().unwrap();
}

#[test]
fn test_every_fake_applies_session_policy() {
    let instruments: Vec<Box<dyn Instrument>> = vec![
        Box::new(FakeAdc::new(vec![])),
        Box::<FakeDac>::default(),
        Box::<FakeDacAdc>::default(),
        Box::<FakeAmmeter>::default(),
        Box::<FakeVoltmeter>::default(),
        Box::<FakePowerMeter>::default(),
        Box::<FakePowerSupply>::default(),
        Box::<FakeLaser>::default(),
        Box::<FakeBiasController>::default(),
        Box::<FakePolarizationController>::default(),
        Box::<FakeOpticalSwitch>::default(),
        Box::<FakeVoa>::default(),
    ];

    for mut instrument in instruments {
        instrument.open().unwrap();
        assert!(
            matches!(instrument.open(), Err(HalError::AlreadyOpen(_))),
            "{} accepted a second open",
            instrument
        );
        instrument.close().unwrap();
        instrument.close().unwrap();
        instrument.open().unwrap();
    }
}
