#[derive(Debug, Clone, PartialEq, Copy)]
pub enum Direction {
    None,
    /// Uplink
    Ul,
    /// Downlink
    Dl,
    Both
}

impl Direction {
    #[inline]
    pub fn includes_ul(&self) -> bool {
        matches!(self, Direction::Ul | Direction::Both)
    }

    #[inline]
    pub fn includes_dl(&self) -> bool {
        matches!(self, Direction::Dl | Direction::Both)
    }

    /// Builds a direction from separate uplink/downlink request flags
    pub fn from_flags(ul: bool, dl: bool) -> Self {
        match (ul, dl) {
            (false, false) => Direction::None,
            (true, false) => Direction::Ul,
            (false, true) => Direction::Dl,
            (true, true) => Direction::Both,
        }
    }
}
