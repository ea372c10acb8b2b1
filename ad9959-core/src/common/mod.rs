mod freq;

use std::time::Duration;

pub use freq::*;

/// The frequency of the reference oscillator.
pub const REFERENCE_CLOCK: Freq<u32> = Freq { freq: 20_000_000 };

/// The PLL multiplier applied to [`REFERENCE_CLOCK`].
pub const PLL_MULTIPLIER: u32 = 20;

/// The number of system clock cycles required to load a frequency tuning word.
pub const LOAD_CYCLES: u32 = 4;

/// The period of one ramp clock increment in seconds.
///
/// 20 MHz × 20 = 400 MHz system clock, divided by [`LOAD_CYCLES`], gives 10 ns.
pub const SYS_CLK_PERIOD: f64 =
    LOAD_CYCLES as f64 / (REFERENCE_CLOCK.freq as f64 * PLL_MULTIPLIER as f64);

/// The ratio of the external frequency divider.
pub const DIVIDER_RATIO: u32 = 32;

/// The lowest frequency the DDS outputs.
pub const LOWER_FREQ_LIMIT: Freq<f64> = Freq { freq: 0.01e6 };

/// The highest frequency the DDS outputs.
pub const UPPER_FREQ_LIMIT: Freq<f64> = Freq { freq: 400e6 };

/// The resolution of the phase offset register (14 bit).
pub const PHASE_RESOLUTION: u16 = 1 << 14;

/// The full scale of the amplitude scale factor register (10 bit).
pub const AMPLITUDE_FULL_SCALE: u16 = 1023;

/// The maximum number of frequencies in one frequency list.
pub const FREQ_LIST_LEN_MAX: usize = u8::MAX as usize;

/// The time the bridge needs to apply one frame before it accepts the next one.
pub const SETTLE_DELAY: Duration = Duration::from_micros(100);

/// The time the bridge needs to boot after the port is opened.
pub const BOOT_DELAY: Duration = Duration::from_millis(300);

/// The default baud rate of the bridge.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;
