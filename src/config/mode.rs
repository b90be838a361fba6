use crate::error::PipelineError;
use std::fmt;
use std::str::FromStr;

/// Optimization level selected by the `optimizeCss` build option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptimizationMode {
    Standard,
    StandardKeepLines,
    StandardKeepComments,
    StandardKeepCommentsKeepLines,
    None,
}

impl OptimizationMode {
    pub const ALL: [OptimizationMode; 5] = [
        Self::Standard,
        Self::StandardKeepLines,
        Self::StandardKeepComments,
        Self::StandardKeepCommentsKeepLines,
        Self::None,
    ];

    /// Build-file spelling of the mode
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::StandardKeepLines => "standard.keepLines",
            Self::StandardKeepComments => "standard.keepComments",
            Self::StandardKeepCommentsKeepLines => "standard.keepComments.keepLines",
            Self::None => "none",
        }
    }

    pub fn inlines_imports(&self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn strips_comments(&self) -> bool {
        matches!(self, Self::Standard | Self::StandardKeepLines)
    }

    pub fn strips_line_breaks(&self) -> bool {
        matches!(self, Self::Standard | Self::StandardKeepComments)
    }

    /// Optimizing modes that keep line returns still squeeze blank lines
    pub fn squeezes_blank_lines(&self) -> bool {
        matches!(
            self,
            Self::StandardKeepLines | Self::StandardKeepCommentsKeepLines
        )
    }
}

impl FromStr for OptimizationMode {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s.trim())
            .ok_or_else(|| PipelineError::InvalidMode(s.to_string()))
    }
}

impl fmt::Display for OptimizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
