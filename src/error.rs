/// Failures reported by the driver.
///
/// `E` is the transport's own error type; everything else is a protocol or
/// precondition failure. No operation retries internally and none of these are
/// fatal: a failed step leaves previously loaded calibration and previously
/// computed readings intact so the caller can re-issue the sequence.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error<E> {
    /// The I2C transaction itself failed.
    I2c(E),
    /// The PROM contents did not match their CRC-4 nibble. Calibration is
    /// discarded when this is returned.
    Crc { expected: u8, got: u8 },
    /// A calculation was requested before calibration was successfully loaded.
    NotCalibrated,
    /// The ADC returned an all-zero word: the conversion is still in flight,
    /// no conversion was started, or the bus returned nothing. The previously
    /// stored sample is left untouched.
    NotReady,
    /// A result was requested before the conversions feeding it had been
    /// triggered and read.
    NoData,
}
