#![no_std]

use defmt_rtt as _; // global logger
use panic_probe as _;

#[defmt::panic_handler]
fn panic() -> ! {
    cortex_m::asm::udf()
}
