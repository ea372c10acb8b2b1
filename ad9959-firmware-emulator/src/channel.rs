use ad9959_driver::{ramp::RampRegisters, AMPLITUDE_FULL_SCALE, PHASE_RESOLUTION};

/// The register state of one DDS channel as held by the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelEmulator {
    pub(crate) freq_list: Vec<u32>,
    pub(crate) counter: usize,
    pub(crate) phase_word: u16,
    pub(crate) amplitude_word: u16,
    pub(crate) ramp: Option<RampRegisters>,
}

impl Default for ChannelEmulator {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelEmulator {
    /// Creates a channel in its power-on state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            freq_list: Vec::new(),
            counter: 0,
            phase_word: 0,
            amplitude_word: AMPLITUDE_FULL_SCALE,
            ramp: None,
        }
    }

    /// Returns the programmed frequency list.
    #[must_use]
    pub fn freq_list(&self) -> &[u32] {
        &self.freq_list
    }

    /// Returns the index of the frequency currently output.
    #[must_use]
    pub const fn counter(&self) -> usize {
        self.counter
    }

    /// Returns the frequency word currently output.
    #[must_use]
    pub fn frequency_word(&self) -> Option<u32> {
        self.freq_list.get(self.counter).copied()
    }

    /// Returns the phase offset word.
    #[must_use]
    pub const fn phase_word(&self) -> u16 {
        self.phase_word
    }

    /// Returns the phase offset in degrees.
    #[must_use]
    pub fn phase(&self) -> f64 {
        self.phase_word as f64 / PHASE_RESOLUTION as f64 * 360.
    }

    /// Returns the amplitude scale factor word.
    #[must_use]
    pub const fn amplitude_word(&self) -> u16 {
        self.amplitude_word
    }

    /// Returns the amplitude as a fraction of full scale.
    #[must_use]
    pub fn amplitude(&self) -> f64 {
        self.amplitude_word as f64 / AMPLITUDE_FULL_SCALE as f64
    }

    /// Returns the last programmed ramp.
    #[must_use]
    pub const fn ramp(&self) -> Option<&RampRegisters> {
        self.ramp.as_ref()
    }

    pub(crate) fn set_freq_list(&mut self, words: Vec<u32>) {
        self.freq_list = words;
        self.counter = 0;
    }

    /// Advances to the next frequency. The last frequency is held.
    pub fn step(&mut self) {
        if self.counter + 1 < self.freq_list.len() {
            self.counter += 1;
        }
    }

    /// Returns to the first frequency.
    pub fn reset(&mut self) {
        self.counter = 0;
    }
}
