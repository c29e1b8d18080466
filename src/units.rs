//! Unit projections for the driver's native fixed-point representation.
//!
//! The sensor's native pressure unit is the millibar and its native
//! temperature unit the degree Celsius; everything else is a fixed factor or
//! affine transform applied on the way out. Nothing here touches the bus.

/// A pressure unit the calibrated reading can be projected into.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressureUnit {
    Pascal,
    Hectopascal,
    Kilopascal,
    Millibar,
    Bar,
    Atmosphere,
    Torr,
    Psi,
}

impl PressureUnit {
    /// Conversion factor from the native millibar.
    pub fn factor_from_mbar(&self) -> f32 {
        use PressureUnit::*;
        match *self {
            Pascal => 100.0,
            Hectopascal => 1.0,
            Kilopascal => 0.1,
            Millibar => 1.0,
            Bar => 0.001,
            Atmosphere => 0.000_986_923,
            Torr => 0.750_062,
            Psi => 0.014_503_773_773_022,
        }
    }
}

/// A temperature unit the calibrated reading can be projected into.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub(crate) fn from_celsius(&self, celsius: f32) -> f32 {
        match *self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millibar_is_the_identity() {
        assert_eq!(PressureUnit::Millibar.factor_from_mbar(), 1.0);
        assert_eq!(PressureUnit::Hectopascal.factor_from_mbar(), 1.0);
    }

    #[test]
    fn one_atmosphere_round_trips_through_pascal() {
        // 1 atm = 1013.25 mbar = 101325 Pa.
        let mbar = 1013.25;
        assert!((mbar * PressureUnit::Pascal.factor_from_mbar() - 101_325.0).abs() < 1e-2);
        assert!((mbar * PressureUnit::Atmosphere.factor_from_mbar() - 1.0).abs() < 1e-4);
        assert!((mbar * PressureUnit::Psi.factor_from_mbar() - 14.6959).abs() < 1e-3);
        assert!((mbar * PressureUnit::Torr.factor_from_mbar() - 760.0).abs() < 0.1);
    }

    #[test]
    fn fahrenheit_affine() {
        assert_eq!(TemperatureUnit::Celsius.from_celsius(20.0), 20.0);
        assert_eq!(TemperatureUnit::Fahrenheit.from_celsius(0.0), 32.0);
        assert_eq!(TemperatureUnit::Fahrenheit.from_celsius(100.0), 212.0);
    }
}
