//! Detection status shown on the detection screen.

/// Single authoritative status of a detection screen visit.
///
/// `DetectSucceeded` is absorbing: nothing transitions out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectionStatus {
    /// No successful classification yet.
    #[default]
    Detecting,
    /// Last attempt said "not a box", errored, or nothing was found in time.
    DetectFailed,
    /// Box confirmed; weight and size are frozen.
    DetectSucceeded,
}

impl DetectionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DetectionStatus::Detecting => "detecting",
            DetectionStatus::DetectFailed => "detect_failed",
            DetectionStatus::DetectSucceeded => "detect_succeeded",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, DetectionStatus::DetectSucceeded)
    }
}

impl std::fmt::Display for DetectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
