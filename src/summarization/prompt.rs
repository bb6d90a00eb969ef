//! Summary styles, length classes, and prompt assembly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Presentation style requested for a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryStyle {
    /// Main topics, key points, and important details.
    #[default]
    Comprehensive,
    /// Short bullet points capturing the main ideas.
    BulletPoints,
    /// Insights, conclusions, and actionable information.
    Executive,
    /// A single paragraph.
    Brief,
}

impl SummaryStyle {
    /// Wire name of the style.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Comprehensive => "comprehensive",
            Self::BulletPoints => "bullet-points",
            Self::Executive => "executive",
            Self::Brief => "brief",
        }
    }

    fn instruction(self) -> &'static str {
        match self {
            Self::Comprehensive => {
                "Create a comprehensive summary of the following text. Include main topics, key points, and important details."
            }
            Self::BulletPoints => {
                "Create a bullet-point summary of the following text. Use clear, concise bullet points to capture the main ideas."
            }
            Self::Executive => {
                "Create an executive summary of the following text. Focus on key insights, conclusions, and actionable information."
            }
            Self::Brief => "Create a brief, one-paragraph summary of the following text.",
        }
    }
}

impl fmt::Display for SummaryStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a style name is not one of the supported values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown summary type '{0}' (expected comprehensive, bullet-points, executive, or brief)")]
pub struct UnknownStyle(pub String);

impl SummaryStyle {
    /// Parse a style, treating anything unrecognized as [`SummaryStyle::Comprehensive`].
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_else(|UnknownStyle(other)| {
            tracing::debug!(style = %other, "Unrecognized summary type; using comprehensive");
            Self::Comprehensive
        })
    }
}

impl FromStr for SummaryStyle {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "comprehensive" => Ok(Self::Comprehensive),
            "bullet-points" => Ok(Self::BulletPoints),
            "executive" => Ok(Self::Executive),
            "brief" => Ok(Self::Brief),
            _ => Err(UnknownStyle(s.to_string())),
        }
    }
}

/// Target length of a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthClass {
    /// At most 100 words.
    Short,
    /// At most 300 words.
    #[default]
    Medium,
    /// At most 500 words.
    Long,
}

impl LengthClass {
    /// Parse a length class, treating anything unrecognized as [`LengthClass::Medium`].
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "short" => Self::Short,
            "long" => Self::Long,
            "medium" => Self::Medium,
            other => {
                tracing::debug!(length = other, "Unrecognized length class; using medium");
                Self::Medium
            }
        }
    }

    /// Word ceiling communicated to the model.
    pub const fn max_words(self) -> usize {
        match self {
            Self::Short => 100,
            Self::Medium => 300,
            Self::Long => 500,
        }
    }

    /// Wire name of the length class.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }

    fn instruction(self) -> String {
        let lead = match self {
            Self::Short => "Keep it concise",
            Self::Medium => "Keep it moderately detailed",
            Self::Long => "Provide detailed coverage",
        };
        format!(" {lead} - maximum {} words.", self.max_words())
    }
}

impl fmt::Display for LengthClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the generation prompt: style instruction, length ceiling, then the source text verbatim.
pub fn build_prompt(text: &str, style: SummaryStyle, length: LengthClass) -> String {
    let mut prompt = String::with_capacity(text.len() + 256);
    prompt.push_str(style.instruction());
    prompt.push_str(&length.instruction());
    prompt.push_str("\n\nText to summarize:\n");
    prompt.push_str(text);
    prompt
}

/// Count words by splitting on runs of whitespace.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
