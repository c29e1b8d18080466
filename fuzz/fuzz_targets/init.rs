#![no_main]
use bar30::{Ms5837, Variant, DEFAULT_ADDRESS};
use embedded_hal_fuzz::{i2c::I2cFuzz, shared_data::FuzzData};
use libfuzzer_sys::fuzz_target;

type Error = ();

fuzz_target!(|data: &[u8]| {
    let data = FuzzData::new(data);
    let i2c: I2cFuzz<'_, Error> = I2cFuzz::new(data);
    let mut sensor = Ms5837::new(i2c, DEFAULT_ADDRESS, Variant::V30Ba26);
    // We ignore the results as we only care about potential crashes.
    let _ = sensor.reset();
    let _ = sensor.load_calibration();
});
