#![no_main]
use bar30::test_utils::NopDelay;
use bar30::{depth, Ms5837, OverSamplingRatio, Variant, DEFAULT_ADDRESS};
use embedded_hal_fuzz::{i2c::I2cFuzz, shared_data::FuzzData};
use libfuzzer_sys::fuzz_target;

type Error = ();

fuzz_target!(|data: &[u8]| {
    let data = FuzzData::new(data);
    let i2c: I2cFuzz<'_, Error> = I2cFuzz::new(data);
    let mut sensor = Ms5837::new(i2c, DEFAULT_ADDRESS, Variant::V30Ba26);
    if sensor.load_calibration().is_ok() {
        // The samples are likely garbage. We don't care about the result,
        // just whether anything crashes on the way to it.
        let _ = sensor.read(OverSamplingRatio::R8192, &mut NopDelay);
        let _ = sensor.depth();
        let _ = sensor.altitude(depth::SEA_LEVEL_PRESSURE_PA);
    }
});
