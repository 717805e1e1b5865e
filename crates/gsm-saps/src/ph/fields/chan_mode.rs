/// Speech or data indicator of the RSL channel mode (TS 48.058, 9.3.6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RslCmode {
    #[default]
    Signalling,
    Speech,
    Data,
}

/// Channel rate and type / speech coding algorithm of a traffic channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TchMode {
    #[default]
    Signalling,
    /// GSM FR or HR, depending on the channel rate
    SpeechV1,
    SpeechEfr,
    SpeechAmr,
    /// Transparent or non-transparent circuit data
    Data,
}

impl TchMode {
    #[inline]
    pub fn is_amr(&self) -> bool {
        *self == TchMode::SpeechAmr
    }
}

impl core::fmt::Display for TchMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TchMode::Signalling => write!(f, "SIGN"),
            TchMode::SpeechV1 => write!(f, "SPEECH_V1"),
            TchMode::SpeechEfr => write!(f, "SPEECH_EFR"),
            TchMode::SpeechAmr => write!(f, "SPEECH_AMR"),
            TchMode::Data => write!(f, "DATA"),
        }
    }
}

/// Mode parameters as received with a channel activation or mode modify request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChanModeParams {
    pub rsl_cmode: RslCmode,
    pub tch_mode: TchMode,
    /// Only meaningful when `tch_mode` is `SpeechAmr`
    pub amr: super::amr_conf::AmrMultirateConf,
}
