use gsm_saps::ph::fields::amr_conf::{AMR_MAX_MODES, AmrMultirateConf};

/// Number of accumulated sample units after which the link quality is evaluated
const AMR_LOOP_WINDOW: u32 = 48;

/// Downlink codec mode adaptation of one AMR speech channel. Averages the uplink C/I over a
/// fixed window and moves the requested codec mode (CMR) by at most one step per window.
#[derive(Debug, Clone, Default)]
pub struct AmrLoop {
    enabled: bool,
    /// Codec mode requested from the mobile, index into the active codec set
    dl_cmr: u8,
    /// Codec mode last used by the mobile in the uplink
    ul_ft: u8,
    codecs: u8,
    /// Thresholds and hystereses in 0.5 dB units
    thresholds: [u8; AMR_MAX_MODES],
    hystereses: [u8; AMR_MAX_MODES],
    lqual_cb_sum: i32,
    lqual_cb_num: u32,
}

impl AmrLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt a new active codec set. The requested mode restarts at the initial mode.
    pub fn configure(&mut self, conf: &AmrMultirateConf) {
        self.codecs = conf.num_modes().min(AMR_MAX_MODES) as u8;
        self.thresholds = conf.thresholds();
        self.hystereses = conf.hystereses();
        self.dl_cmr = conf.initial_mode().min(self.codecs.saturating_sub(1));
    }

    /// Enabling a disabled loop discards any partial window
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        if !self.enabled {
            self.lqual_cb_num = 0;
            self.lqual_cb_sum = 0;
        }
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn dl_cmr(&self) -> u8 {
        self.dl_cmr
    }

    /// Running sum and count of the current window
    pub fn accumulators(&self) -> (i32, u32) {
        (self.lqual_cb_sum, self.lqual_cb_num)
    }

    /// Feed one uplink measurement. Half rate channels report half as often, so each of
    /// their samples counts twice. Returns the new requested mode if it changed.
    pub fn input(&mut self, ul_ft: u8, ci_cb: i16, half_rate: bool) -> Option<u8> {
        if !self.enabled {
            return None;
        }

        // Measurements only count once the mobile follows the requested mode
        self.ul_ft = ul_ft;
        if self.ul_ft != self.dl_cmr {
            return None;
        }

        // A full window of extreme 16 bit samples stays well within i32
        let ci_cb = ci_cb as i32;
        if half_rate {
            self.lqual_cb_num += 2;
            self.lqual_cb_sum += 2 * ci_cb;
        } else {
            self.lqual_cb_num += 1;
            self.lqual_cb_sum += ci_cb;
        }

        if self.lqual_cb_num < AMR_LOOP_WINDOW {
            return None;
        }

        let lqual_cb = self.lqual_cb_sum / self.lqual_cb_num as i32;
        tracing::debug!("AMR link quality (C/I) is {} cB, codec mode={}", lqual_cb, self.ul_ft);
        self.lqual_cb_num = 0;
        self.lqual_cb_sum = 0;

        // Degrading is checked from any mode above the most robust one, upgrading only from
        // the most robust one
        let cmr = self.dl_cmr as usize;
        if cmr > 0 {
            let thresh_lower_cb = self.thresholds[cmr - 1] as i32 * 5;
            if lqual_cb < thresh_lower_cb {
                tracing::info!("Degrading AMR codec mode: {} -> {} due to link quality {} cB < THR_MX_Dn={} cB",
                    cmr, cmr - 1, lqual_cb, thresh_lower_cb);
                self.dl_cmr -= 1;
                return Some(self.dl_cmr);
            }
        } else if cmr + 1 < self.codecs as usize {
            let thresh_upper_cb = (self.thresholds[cmr] as i32 + self.hystereses[cmr] as i32) * 5;
            if lqual_cb > thresh_upper_cb {
                tracing::info!("Upgrading AMR codec mode: {} -> {} due to link quality {} cB > THR_MX_Up={} cB",
                    cmr, cmr + 1, lqual_cb, thresh_upper_cb);
                self.dl_cmr += 1;
                return Some(self.dl_cmr);
            }
        }

        None
    }
}
