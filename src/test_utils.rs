//! Helpers for testing and documentation. Nothing in this module belongs in a
//! release binary.

use embedded_hal::blocking::delay::DelayUs;

/// A delay implementation that returns immediately. Useful against mocked or
/// fuzzed buses where the conversion wait has nothing to wait for.
pub struct NopDelay;

impl DelayUs<u32> for NopDelay {
    fn delay_us(&mut self, _us: u32) {}
}
