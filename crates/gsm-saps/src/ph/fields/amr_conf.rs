/// Maximum number of codec modes in an AMR active codec set
pub const AMR_MAX_MODES: usize = 4;

/// One entry of the active codec set. Threshold and hysteresis are in 0.5 dB units and
/// describe the switching point towards the next less robust mode. They are unused on the
/// last entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AmrModeCfg {
    /// AMR codec mode (0 = 4.75k .. 7 = 12.2k)
    pub mode: u8,
    pub threshold: u8,
    pub hysteresis: u8,
}

/// MultiRate configuration (TS 44.018, 10.5.2.21aa)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AmrMultirateConf {
    /// Active codec set, most robust mode first
    pub modes: Vec<AmrModeCfg>,
    /// Initial codec mode indicator. When set, `smod` selects the start mode.
    pub icmi: bool,
    /// Start mode, as index into `modes`
    pub smod: u8,
}

impl AmrMultirateConf {
    pub fn num_modes(&self) -> usize {
        self.modes.len()
    }

    /// Index of the codec mode used at the start of a call. Without an explicit start mode,
    /// the implicit rule of TS 45.009, 3.4.3 applies.
    pub fn initial_mode(&self) -> u8 {
        if self.icmi {
            return self.smod;
        }
        match self.modes.len() {
            0..=3 => 0,
            _ => 1,
        }
    }

    pub fn thresholds(&self) -> [u8; AMR_MAX_MODES] {
        let mut thr = [0u8; AMR_MAX_MODES];
        for (i, m) in self.modes.iter().take(AMR_MAX_MODES).enumerate() {
            thr[i] = m.threshold;
        }
        thr
    }

    pub fn hystereses(&self) -> [u8; AMR_MAX_MODES] {
        let mut hyst = [0u8; AMR_MAX_MODES];
        for (i, m) in self.modes.iter().take(AMR_MAX_MODES).enumerate() {
            hyst[i] = m.hysteresis;
        }
        hyst
    }
}
