//! Generative tool detection

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    ImageGeneration,
    TextGeneration,
    VideoGeneration,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub kind: ToolKind,
    pub name: Option<String>,
}

impl ToolInfo {
    pub fn unknown() -> Self {
        Self {
            kind: ToolKind::Unknown,
            name: None,
        }
    }

    pub fn is_known(&self) -> bool {
        self.kind != ToolKind::Unknown
    }
}

const TOOLS: &[(&str, ToolKind)] = &[
    ("midjourney", ToolKind::ImageGeneration),
    ("dall-e", ToolKind::ImageGeneration),
    ("stable-diffusion", ToolKind::ImageGeneration),
    ("chatgpt", ToolKind::TextGeneration),
    ("claude", ToolKind::TextGeneration),
    ("bard", ToolKind::TextGeneration),
    ("runway", ToolKind::VideoGeneration),
    ("pika", ToolKind::VideoGeneration),
    ("synthesia", ToolKind::VideoGeneration),
];

/// Tools whose output carries elevated brand and IP risk
pub const HIGH_RISK_TOOLS: [&str; 4] = ["midjourney", "dall-e", "stable-diffusion", "runway"];

/// First known tool mentioned in the text
pub fn detect_tool(text: &str) -> ToolInfo {
    let lower = text.to_lowercase().replace("stable diffusion", "stable-diffusion");
    TOOLS
        .iter()
        .find(|(name, _)| lower.contains(name))
        .map(|(name, kind)| ToolInfo {
            kind: *kind,
            name: Some(name.to_string()),
        })
        .unwrap_or_else(ToolInfo::unknown)
}

pub fn mentions_high_risk_tool(text: &str) -> bool {
    let lower = text.to_lowercase().replace("stable diffusion", "stable-diffusion");
    HIGH_RISK_TOOLS.iter().any(|tool| lower.contains(tool))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_tool() {
        let tool = detect_tool("Using Midjourney for campaign images");
        assert_eq!(tool.kind, ToolKind::ImageGeneration);
        assert_eq!(tool.name.as_deref(), Some("midjourney"));
        assert_eq!(detect_tool("Runway clips").kind, ToolKind::VideoGeneration);
        assert!(!detect_tool("a spreadsheet").is_known());
    }

    #[test]
    fn test_high_risk_tools() {
        assert!(mentions_high_risk_tool("trying Stable Diffusion"));
        assert!(!mentions_high_risk_tool("drafting with ChatGPT"));
    }
}
