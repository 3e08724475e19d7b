use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Image generation provider variants.
///
/// Defined in core because it is selected by configuration and reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    /// REST image-generation endpoint (Nano-GPT `/v1/images/generations`).
    NanoGpt,
    /// OpenAI-compatible chat-completions endpoint of a multimodal model with image output.
    Multimodal,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::NanoGpt => "nano-gpt",
            ProviderKind::Multimodal => "multimodal",
        }
    }

    /// Human-readable name used in result messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::NanoGpt => "Nano-GPT",
            ProviderKind::Multimodal => "multimodal chat model",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nano-gpt" | "nanogpt" | "nano_gpt" => Ok(ProviderKind::NanoGpt),
            "multimodal" => Ok(ProviderKind::Multimodal),
            _ => Err(anyhow::anyhow!("Invalid image provider: {}", s)),
        }
    }
}

impl Display for ProviderKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}
