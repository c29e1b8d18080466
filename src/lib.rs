//! # Getting started
//!
//! A platform agnostic driver for the [MS5837](https://www.te.com/usa-en/product-CAT-BLPS0017.html)
//! family of piezoresistive pressure/temperature sensors from TE Connectivity,
//! as found on the Blue Robotics Bar30 and Bar02. On top of the calibrated
//! readings the driver derives water depth (for a selectable water density)
//! and barometric altitude.
//!
//! The conversion protocol is two-phase: [`Ms5837::start_conversion`] triggers
//! the ADC and returns the worst-case conversion time for the chosen
//! oversampling ratio, the caller sleeps at least that long however its host
//! prefers, then [`Ms5837::read_conversion`] fetches the raw sample. Once both
//! quantities have been sampled, [`Ms5837::calculate`] runs the second-order
//! temperature compensation from the factory calibration. The convenience
//! [`Ms5837::read`] drives the whole cycle with an `embedded-hal` delay.
//!
//! ## Example
//! ```rust
//! # // NOTE: Use a real i2c instance for your app.
//! # use embedded_hal_mock::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
//! # let i2c = I2cMock::new(&[
//! #     I2cTransaction::write(0x76, vec![0x1E]),
//! #     I2cTransaction::write_read(0x76, vec![0xA0], vec![0x93, 0x40]),
//! #     I2cTransaction::write_read(0x76, vec![0xA2], vec![0x88, 0xA6]),
//! #     I2cTransaction::write_read(0x76, vec![0xA4], vec![0x8E, 0x00]),
//! #     I2cTransaction::write_read(0x76, vec![0xA6], vec![0x4F, 0x68]),
//! #     I2cTransaction::write_read(0x76, vec![0xA8], vec![0x57, 0x52]),
//! #     I2cTransaction::write_read(0x76, vec![0xAA], vec![0x68, 0x16]),
//! #     I2cTransaction::write_read(0x76, vec![0xAC], vec![0x66, 0x22]),
//! #     I2cTransaction::write(0x76, vec![0b0100_1000]),
//! #     I2cTransaction::write_read(0x76, vec![0x00], vec![0x4B, 0xA7, 0xE3]),
//! #     I2cTransaction::write(0x76, vec![0b0101_1000]),
//! #     I2cTransaction::write_read(0x76, vec![0x00], vec![0x67, 0xFE, 0xB6]),
//! # ]);
//! use bar30::test_utils::NopDelay;
//! use bar30::{
//!     Ms5837, OverSamplingRatio, PressureUnit, TemperatureUnit, Variant, WaterType,
//!     DEFAULT_ADDRESS,
//! };
//!
//! let mut sensor = Ms5837::new(i2c, DEFAULT_ADDRESS, Variant::V30Ba26);
//! sensor.reset().unwrap();
//! sensor.load_calibration().unwrap();
//! // NOTE: Use a real delay for your app.
//! sensor.read(OverSamplingRatio::R4096, &mut NopDelay).unwrap();
//!
//! sensor.set_water_type(WaterType::Salt);
//! println!(
//!     "{:?} degC, {:?} mbar, {:?} m deep",
//!     sensor.temperature(TemperatureUnit::Celsius).unwrap(),
//!     sensor.pressure(PressureUnit::Millibar).unwrap(),
//!     sensor.depth().unwrap(),
//! );
//! ```

#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

use embedded_hal::blocking::{
    delay::DelayUs,
    i2c::{Write, WriteRead},
};

mod calibration;
mod command;
mod error;
pub mod depth;
pub mod test_utils;
pub mod units;

pub use calibration::{Calibration, Variant};
pub use command::{OverSamplingRatio, Quantity};
pub use depth::WaterType;
pub use error::Error;
pub use units::{PressureUnit, TemperatureUnit};

use calibration::{crc4, Compensation};
use command::Command;

/// The family's fixed 7-bit bus address.
pub const DEFAULT_ADDRESS: u8 = 0x76;

/// Buses the driver can run on: anything that can write a command byte and
/// perform a command-then-read transaction with a single error type. Real
/// buses, mocks and fuzzed buses all substitute here.
pub trait Transport: WriteRead + Write
where
    Self: Write<Error = <Self as WriteRead>::Error>,
{
}
impl<T: WriteRead + Write> Transport for T where Self: Write<Error = <Self as WriteRead>::Error> {}

/// A compensated measurement pair in the driver's fixed-point representation:
/// centidegrees Celsius and variant-scaled pressure counts. The two are kept
/// together because the temperature compensation feeds the pressure
/// compensation.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
struct Reading {
    temperature: i32,
    pressure: i32,
}

/// Driver for one MS5837 on one bus address.
///
/// All protocol steps take `&mut self`: a trigger/read/calculate cycle mutates
/// the sample slots in place, so exclusive access holds for the whole cycle.
/// Independent sensors on separate addresses are fully independent.
pub struct Ms5837<I2C: Transport> {
    i2c: I2C,
    address: u8,
    variant: Variant,
    calibration: Option<Calibration>,
    last_conversion: Option<Quantity>,
    raw_pressure: Option<u32>,
    raw_temperature: Option<u32>,
    reading: Option<Reading>,
    water_type: WaterType,
}

impl<I2C: Transport> Ms5837<I2C> {
    /// Create a driver over `i2c` for the sensor at `address`.
    ///
    /// The variant selects the compensation constants; it is corrected from
    /// the PROM version field by [`Ms5837::load_calibration`] when the device
    /// reports a revision this driver knows.
    pub fn new(i2c: I2C, address: u8, variant: Variant) -> Self {
        Ms5837 {
            i2c,
            address,
            variant,
            calibration: None,
            last_conversion: None,
            raw_pressure: None,
            raw_temperature: None,
            reading: None,
            water_type: WaterType::Fresh,
        }
    }

    /// Release the bus handle, consuming the driver.
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Reset the sensor's internal state machine.
    ///
    /// The device sends no response; success only means the command byte was
    /// accepted by the bus. Safe to issue at any time to re-synchronize after
    /// a brownout, and required once before loading calibration.
    pub fn reset(&mut self) -> Result<(), Error<<I2C as WriteRead>::Error>> {
        self.i2c
            .write(self.address, &[Command::Reset.into()])
            .map_err(Error::I2c)
    }

    /// Read the seven factory calibration words from the PROM.
    ///
    /// All-or-nothing: on any transport failure or CRC mismatch the driver is
    /// left uncalibrated, a partial image is never kept. On success the
    /// variant tag is updated from the PROM version field when it names a
    /// known revision.
    pub fn load_calibration(&mut self) -> Result<(), Error<<I2C as WriteRead>::Error>> {
        self.calibration = None;

        let mut words = [0u16; 7];
        for (slot, word) in words.iter_mut().enumerate() {
            let mut buffer = [0u8; 2];
            self.i2c
                .write_read(
                    self.address,
                    &[Command::PromRead(slot as u8).into()],
                    &mut buffer,
                )
                .map_err(Error::I2c)?;
            *word = u16::from_be_bytes(buffer);
        }

        let expected = (words[0] >> 12) as u8;
        words[0] &= 0x0FFF;
        let got = crc4(&words);
        if got != expected {
            return Err(Error::Crc { expected, got });
        }

        if let Some(variant) = Variant::from_version_word(words[0]) {
            self.variant = variant;
        }
        self.calibration = Some(Calibration::from_words(&words));
        Ok(())
    }

    /// The calibration currently loaded, if any.
    pub fn calibration(&self) -> Option<&Calibration> {
        self.calibration.as_ref()
    }

    /// The hardware revision the compensation constants are selected for.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Trigger an ADC conversion of `quantity` at the given oversampling
    /// ratio and return the minimum time in microseconds the caller must
    /// wait before [`Ms5837::read_conversion`].
    ///
    /// The driver never sleeps itself; how to suspend for the returned delay
    /// is host-specific.
    pub fn start_conversion(
        &mut self,
        quantity: Quantity,
        osr: OverSamplingRatio,
    ) -> Result<u32, Error<<I2C as WriteRead>::Error>> {
        self.i2c
            .write(self.address, &[Command::convert(quantity, osr).into()])
            .map_err(Error::I2c)?;
        self.last_conversion = Some(quantity);
        Ok(osr.conversion_time_us())
    }

    /// Fetch the 24-bit result of the last triggered conversion and store it
    /// in that quantity's sample slot.
    ///
    /// An all-zero word means the conversion is still in flight or the bus
    /// produced no data; that fails with [`Error::NotReady`] and the
    /// previously stored sample survives, so the caller can retrigger and
    /// retry.
    pub fn read_conversion(&mut self) -> Result<u32, Error<<I2C as WriteRead>::Error>> {
        let quantity = self.last_conversion.ok_or(Error::NoData)?;

        let mut buffer = [0u8; 4];
        self.i2c
            .write_read(
                self.address,
                &[Command::AdcRead.into()],
                // ADC is 24 bit but we are storing in u32.
                &mut buffer[1..],
            )
            .map_err(Error::I2c)?;
        let sample = u32::from_be_bytes(buffer);
        if sample == 0 {
            return Err(Error::NotReady);
        }

        match quantity {
            Quantity::Pressure => self.raw_pressure = Some(sample),
            Quantity::Temperature => self.raw_temperature = Some(sample),
        }
        Ok(sample)
    }

    /// Run the second-order temperature compensation over the stored raw
    /// samples, overwriting the stored reading.
    ///
    /// Requires loaded calibration and one raw sample of each quantity; no
    /// history is kept beyond the latest result.
    pub fn calculate(&mut self) -> Result<(), Error<<I2C as WriteRead>::Error>> {
        let calibration = self.calibration.as_ref().ok_or(Error::NotCalibrated)?;
        let (raw_pressure, raw_temperature) = match (self.raw_pressure, self.raw_temperature) {
            (Some(pressure), Some(temperature)) => (pressure, temperature),
            _ => return Err(Error::NoData),
        };

        self.reading = Some(compensate(
            self.variant.constants(),
            calibration,
            raw_pressure,
            raw_temperature,
        ));
        Ok(())
    }

    /// The latest compensated temperature, projected into `unit`.
    pub fn temperature(
        &self,
        unit: TemperatureUnit,
    ) -> Result<f32, Error<<I2C as WriteRead>::Error>> {
        let reading = self.reading.ok_or(Error::NoData)?;
        Ok(unit.from_celsius(reading.temperature as f32 / 100.0))
    }

    /// The latest compensated pressure, projected into `unit`.
    pub fn pressure(&self, unit: PressureUnit) -> Result<f32, Error<<I2C as WriteRead>::Error>> {
        let reading = self.reading.ok_or(Error::NoData)?;
        let mbar = reading.pressure as f32 / self.variant.constants().counts_per_mbar;
        Ok(mbar * unit.factor_from_mbar())
    }

    /// Select the water density used by [`Ms5837::depth`].
    pub fn set_water_type(&mut self, water_type: WaterType) {
        self.water_type = water_type;
    }

    pub fn water_type(&self) -> WaterType {
        self.water_type
    }

    /// Depth below the surface in meters for the latest reading and the
    /// selected water type. Does not trigger a new conversion.
    pub fn depth(&self) -> Result<f32, Error<<I2C as WriteRead>::Error>> {
        let pascal = self.pressure(PressureUnit::Pascal)?;
        Ok(depth::depth_meters(pascal, self.water_type))
    }

    /// Altitude in meters above the `reference_pa` pressure level for the
    /// latest reading, by the barometric formula. Does not trigger a new
    /// conversion.
    pub fn altitude(&self, reference_pa: f32) -> Result<f32, Error<<I2C as WriteRead>::Error>> {
        let pascal = self.pressure(PressureUnit::Pascal)?;
        Ok(depth::altitude_meters(pascal, reference_pa))
    }

    /// Run a full measurement cycle: trigger, wait and read both quantities,
    /// then calculate.
    ///
    /// `delay` suspends the caller for each conversion wait; the per-step API
    /// is there for hosts that schedule the waits themselves.
    pub fn read<D: DelayUs<u32>>(
        &mut self,
        osr: OverSamplingRatio,
        delay: &mut D,
    ) -> Result<(), Error<<I2C as WriteRead>::Error>> {
        let wait = self.start_conversion(Quantity::Pressure, osr)?;
        delay.delay_us(wait);
        self.read_conversion()?;

        let wait = self.start_conversion(Quantity::Temperature, osr)?;
        delay.delay_us(wait);
        self.read_conversion()?;

        self.calculate()
    }
}

/// Second-order temperature compensated conversion of a raw sample pair, per
/// the device family's published fixed-point model. Every shift and scale
/// comes from the variant's constant record; all division is i64 truncating
/// division, matching the reference arithmetic.
fn compensate(
    constants: &Compensation,
    calibration: &Calibration,
    raw_pressure: u32,
    raw_temperature: u32,
) -> Reading {
    let d1 = raw_pressure as i64;
    let d2 = raw_temperature as i64;

    let dt = d2 - ((calibration.reference_temperature as i64) << 8);
    let mut temperature =
        2000 + dt * calibration.temperature_coefficient_of_temperature as i64 / (1i64 << 23);

    let mut offset = ((calibration.pressure_offset as i64) << constants.off_shift)
        + dt * calibration.temperature_coefficient_of_pressure_offset as i64
            / (1i64 << constants.off_tc_shift);
    let mut sensitivity = ((calibration.pressure_sensitivity as i64) << constants.sens_shift)
        + dt * calibration.temperature_coefficient_of_pressure_sensitivity as i64
            / (1i64 << constants.sens_tc_shift);

    // Nonlinearity correction below 20 degC; identically zero at and above.
    if temperature < 2000 {
        let centered = (temperature - 2000) * (temperature - 2000);
        let mut off2 = constants.off2_numerator * centered / constants.off2_denominator;
        let mut sens2 = constants.sens2_numerator * centered / constants.sens2_denominator;
        if temperature < -1500 {
            let cold = (temperature + 1500) * (temperature + 1500);
            off2 += constants.off2_cold * cold;
            sens2 += constants.sens2_cold * cold;
        }
        temperature -= constants.t2_numerator * dt * dt / (1i64 << constants.t2_shift);
        offset -= off2;
        sensitivity -= sens2;
    }

    let pressure = (d1 * sensitivity / (1i64 << 21) - offset) / (1i64 << constants.pressure_shift);

    Reading {
        temperature: temperature as i32,
        pressure: pressure as i32,
    }
}
