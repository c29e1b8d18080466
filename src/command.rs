/// The physical quantity an ADC conversion digitizes.
///
/// The sensor holds one conversion result at a time, so the driver keys its
/// sample slots by the quantity that was last triggered.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Quantity {
    Pressure,
    Temperature,
}

/// The oversampling ratio used internal to the ADC. Each step doubles the
/// resolution and roughly doubles the conversion latency.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OverSamplingRatio {
    R256 = 0x0,
    R512 = 0x2,
    R1024 = 0x4,
    R2048 = 0x6,
    R4096 = 0x8,
    R8192 = 0xA,
}

impl OverSamplingRatio {
    /// Worst-case ADC conversion time for this ratio, in microseconds.
    ///
    /// The caller must wait at least this long between triggering a conversion
    /// and reading the result; reading earlier yields an all-zero word.
    pub fn conversion_time_us(&self) -> u32 {
        use OverSamplingRatio::*;
        match *self {
            R256 => 600,
            R512 => 1170,
            R1024 => 2280,
            R2048 => 4540,
            R4096 => 9040,
            R8192 => 18080,
        }
    }
}

/// An I2C command understood by the sensor.
pub(crate) enum Command {
    Reset,
    /// Read calibration word `0..=6` out of the factory PROM.
    PromRead(u8),
    /// Start a pressure (D1) conversion.
    ConvertD1(OverSamplingRatio),
    /// Start a temperature (D2) conversion.
    ConvertD2(OverSamplingRatio),
    AdcRead,
}

impl Command {
    pub(crate) fn convert(quantity: Quantity, osr: OverSamplingRatio) -> Command {
        match quantity {
            Quantity::Pressure => Command::ConvertD1(osr),
            Quantity::Temperature => Command::ConvertD2(osr),
        }
    }
}

/// Encode the command as the single byte sent over the bus.
impl From<Command> for u8 {
    fn from(val: Command) -> u8 {
        use Command::*;
        match val {
            Reset => 0x1E,
            PromRead(slot) => 0xA0 | (slot << 1),
            ConvertD1(osr) => 0x40 | osr as u8,
            ConvertD2(osr) => 0x50 | osr as u8,
            AdcRead => 0x00,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_and_adc_read_opcodes() {
        assert_eq!(u8::from(Command::Reset), 0x1E);
        assert_eq!(u8::from(Command::AdcRead), 0x00);
    }

    #[test]
    fn prom_read_opcodes_follow_base_plus_stride() {
        for slot in 0..7u8 {
            assert_eq!(u8::from(Command::PromRead(slot)), 0xA0 + 2 * slot);
        }
    }

    #[test]
    fn conversion_opcodes_cover_both_quantities() {
        use OverSamplingRatio::*;
        assert_eq!(u8::from(Command::ConvertD1(R256)), 0x40);
        assert_eq!(u8::from(Command::ConvertD1(R8192)), 0x4A);
        assert_eq!(u8::from(Command::ConvertD2(R256)), 0x50);
        assert_eq!(u8::from(Command::ConvertD2(R2048)), 0x56);
        assert_eq!(
            u8::from(Command::convert(Quantity::Pressure, R4096)),
            0b0100_1000
        );
        assert_eq!(
            u8::from(Command::convert(Quantity::Temperature, R4096)),
            0b0101_1000
        );
    }

    #[test]
    fn conversion_time_covers_datasheet_maximum() {
        use OverSamplingRatio::*;
        // Maximum conversion times from the datasheet, in microseconds.
        let floor = [
            (R256, 560),
            (R512, 1100),
            (R1024, 2170),
            (R2048, 4320),
            (R4096, 8610),
            (R8192, 17200),
        ];
        let mut previous = 0;
        for (osr, minimum) in floor {
            let delay = osr.conversion_time_us();
            assert!(delay >= minimum);
            assert!(delay >= previous);
            previous = delay;
        }
    }
}
