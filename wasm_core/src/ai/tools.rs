use serde::{Deserialize, Serialize};

use super::{CompletionRequest, InlineImage, PropertyKind, ResponseSchema};

/// Generative tools in the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AiTool {
    GrammarFixer,
    Humanizer,
    Paraphraser,
    Summarizer,
    SeoOptimizer,
    AiDetector,
    HeadlineGenerator,
    HashtagGenerator,
    EmailWriter,
    ProductDescription,
    ImageCaption,
    ImageToText,
}

/// Optional style, mode, angle or tone selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolMode {
    Standard,
    Fluent,
    Formal,
    Casual,
    Creative,
    Short,
    Detailed,
    BulletPoints,
    Curiosity,
    Benefit,
    HowTo,
    Listicle,
    Friendly,
    Persuasive,
}

impl ToolMode {
    pub fn parse(input: &str) -> Result<Self, String> {
        let normalized = input.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "standard" => Ok(Self::Standard),
            "fluent" => Ok(Self::Fluent),
            "formal" => Ok(Self::Formal),
            "casual" => Ok(Self::Casual),
            "creative" => Ok(Self::Creative),
            "short" => Ok(Self::Short),
            "detailed" => Ok(Self::Detailed),
            "bullet-points" | "bullets" => Ok(Self::BulletPoints),
            "curiosity" => Ok(Self::Curiosity),
            "benefit" => Ok(Self::Benefit),
            "how-to" => Ok(Self::HowTo),
            "listicle" => Ok(Self::Listicle),
            "friendly" => Ok(Self::Friendly),
            "persuasive" => Ok(Self::Persuasive),
            other => Err(format!("unsupported mode: {other}")),
        }
    }

    fn phrase(self) -> &'static str {
        match self {
            Self::Standard => "in a neutral, clear style",
            Self::Fluent => "so it reads smoothly and naturally",
            Self::Formal => "in a formal, professional tone",
            Self::Casual => "in a relaxed, conversational tone",
            Self::Creative => "with creative, vivid wording",
            Self::Short => "in at most three sentences",
            Self::Detailed => "in a thorough paragraph",
            Self::BulletPoints => "as a bulleted list of key points",
            Self::Curiosity => "using a curiosity-gap angle",
            Self::Benefit => "leading with the reader's benefit",
            Self::HowTo => "as a how-to promise",
            Self::Listicle => "as a numbered-list title",
            Self::Friendly => "in a warm, friendly tone",
            Self::Persuasive => "in a persuasive tone",
        }
    }
}

impl AiTool {
    pub const ALL: [AiTool; 12] = [
        Self::GrammarFixer,
        Self::Humanizer,
        Self::Paraphraser,
        Self::Summarizer,
        Self::SeoOptimizer,
        Self::AiDetector,
        Self::HeadlineGenerator,
        Self::HashtagGenerator,
        Self::EmailWriter,
        Self::ProductDescription,
        Self::ImageCaption,
        Self::ImageToText,
    ];

    pub fn modes(self) -> &'static [ToolMode] {
        use ToolMode::*;
        match self {
            Self::Paraphraser => &[Standard, Fluent, Formal, Casual, Creative],
            Self::Humanizer => &[Standard, Casual, Formal],
            Self::Summarizer => &[Short, Detailed, BulletPoints],
            Self::HeadlineGenerator => &[Curiosity, Benefit, HowTo, Listicle],
            Self::EmailWriter => &[Formal, Friendly, Persuasive],
            Self::ProductDescription => &[Persuasive, Casual, Formal],
            Self::ImageCaption => &[Short, Detailed, Creative],
            _ => &[],
        }
    }

    pub fn default_mode(self) -> Option<ToolMode> {
        self.modes().first().copied()
    }

    pub fn accepts_image(self) -> bool {
        matches!(self, Self::ImageCaption | Self::ImageToText)
    }

    /// Whether the tool can run on an image alone, without text input.
    pub fn image_only(self) -> bool {
        self.accepts_image()
    }

    pub fn schema(self) -> Option<ResponseSchema> {
        match self {
            Self::SeoOptimizer => Some(ResponseSchema::new(vec![
                ("title", PropertyKind::String),
                ("description", PropertyKind::String),
            ])),
            Self::AiDetector => Some(ResponseSchema::new(vec![
                ("probability", PropertyKind::Number),
                ("rationale", PropertyKind::String),
            ])),
            Self::HashtagGenerator => Some(ResponseSchema::new(vec![(
                "hashtags",
                PropertyKind::StringList,
            )])),
            _ => None,
        }
    }

    fn base_instruction(self) -> &'static str {
        match self {
            Self::GrammarFixer => {
                "Correct the grammar, spelling and punctuation of the following text. Return only the corrected text."
            }
            Self::Humanizer => {
                "Rewrite the following text so it sounds like it was written by a person. Keep the meaning and return only the rewritten text."
            }
            Self::Paraphraser => "Paraphrase the following text. Return only the paraphrase.",
            Self::Summarizer => "Summarize the following text.",
            Self::SeoOptimizer => {
                "Write an SEO title (under 60 characters) and meta description (under 160 characters) for the following content."
            }
            Self::AiDetector => {
                "Estimate the probability (0 to 1) that the following text was machine generated and explain why in one or two sentences."
            }
            Self::HeadlineGenerator => {
                "Write five alternative headlines for the following topic, one per line."
            }
            Self::HashtagGenerator => {
                "Suggest ten relevant hashtags for the following post. Each hashtag starts with #."
            }
            Self::EmailWriter => "Write an email based on the following notes.",
            Self::ProductDescription => {
                "Write a product description for the following product details."
            }
            Self::ImageCaption => "Write a caption for the attached image.",
            Self::ImageToText => {
                "Transcribe all text visible in the attached image. Preserve line breaks and return only the text."
            }
        }
    }

    pub fn instruction(self, mode: Option<ToolMode>) -> String {
        let base = self.base_instruction();
        match mode.filter(|m| self.modes().contains(m)) {
            Some(mode) => format!("{base} Write it {}.", mode.phrase()),
            None => base.to_string(),
        }
    }

    /// Validates tool input and builds the outbound request.
    pub fn build_request(
        self,
        input: &str,
        mode: Option<ToolMode>,
        image: Option<InlineImage>,
        model: &str,
    ) -> Result<CompletionRequest, String> {
        let input = input.trim();
        if image.is_some() && !self.accepts_image() {
            return Err("this tool does not accept images".into());
        }
        if self.image_only() {
            if image.is_none() {
                return Err("an image is required".into());
            }
        } else if input.is_empty() {
            return Err("input is empty".into());
        }
        Ok(CompletionRequest {
            model: model.to_string(),
            instruction: self.instruction(mode.or(self.default_mode())),
            input: input.to_string(),
            image,
            schema: self.schema(),
        })
    }
}
