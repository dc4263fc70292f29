/// The host operating system families the firmware distinguishes between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostOs {
    MacOs,
    Ios,
    Other,
}

impl HostOs {
    /// Apple hosts use the command (GUI) key where everyone else uses control.
    pub fn is_apple(&self) -> bool {
        matches!(self, Self::MacOs | Self::Ios)
    }
}
