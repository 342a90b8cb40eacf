//! Raw SerpAPI payload shapes.
//!
//! Every field is optional: SerpAPI omits keys freely (no `snippet` on
//! sitelinks-only results, no `date` on most organic hits). Missing list keys
//! deserialize as empty lists, which is how an exhausted query looks.
//!
//! ### Dates
//! Organic results carry `date` on some hits; others only expose it under
//! `rich_snippet.top.detected_extensions.date`. News results always use
//! `date`, either absolute (`"Mar 4, 2025"`) or relative (`"3 days ago"`).
//!
//! ### News `source`
//! The `tbm=nws` results return `source` as a plain string, while the
//! dedicated news engine nests it as `{ "name": ... }`. Both are accepted.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serpwatch_core::Source;

use crate::error::ProviderError;

#[derive(Debug, Default, Deserialize)]
pub struct OrganicPage {
    #[serde(default)]
    pub organic_results: Vec<OrganicItem>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OrganicItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub snippet: Option<String>,
    pub date: Option<String>,
    pub rich_snippet: Option<RichSnippet>,
}

impl OrganicItem {
    /// Primary `date`, falling back to the rich-snippet extension.
    #[must_use]
    pub fn raw_date(&self) -> Option<&str> {
        self.date.as_deref().or_else(|| {
            self.rich_snippet
                .as_ref()?
                .top
                .as_ref()?
                .detected_extensions
                .as_ref()?
                .date
                .as_deref()
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RichSnippet {
    pub top: Option<RichSnippetSection>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RichSnippetSection {
    pub detected_extensions: Option<DetectedExtensions>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DetectedExtensions {
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewsPage {
    #[serde(default)]
    pub news_results: Vec<NewsItem>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewsItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub snippet: Option<String>,
    pub date: Option<String>,
    pub source: Option<NewsOutlet>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum NewsOutlet {
    Name(String),
    Detailed { name: Option<String> },
}

impl NewsOutlet {
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            NewsOutlet::Name(name) => Some(name.as_str()),
            NewsOutlet::Detailed { name } => name.as_deref(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ImagesPage {
    #[serde(default)]
    pub images_results: Vec<ImageItem>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ImageItem {
    pub title: Option<String>,
    /// Page hosting the image.
    pub link: Option<String>,
    /// Full-size image URL.
    pub original: Option<String>,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AiAnswerPage {
    #[serde(default)]
    pub text_blocks: Vec<TextBlock>,
    #[serde(default)]
    pub references: Vec<Reference>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TextBlock {
    pub snippet: Option<String>,
    /// List blocks carry their entries here instead of in `snippet`.
    #[serde(default)]
    pub list: Vec<TextBlock>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Reference {
    pub title: Option<String>,
    pub link: Option<String>,
    pub source: Option<String>,
}

/// One provider response, decoded according to the source it came from.
#[derive(Debug)]
pub enum RawPage {
    Organic(OrganicPage),
    News(NewsPage),
    Images(ImagesPage),
    AiAnswer(AiAnswerPage),
}

impl RawPage {
    /// Decodes `value` with the shape `source` returns.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Deserialize`] when a present field has the
    /// wrong type.
    pub fn decode(source: Source, value: serde_json::Value) -> Result<Self, ProviderError> {
        Ok(match source {
            Source::GoogleOrganic | Source::BingOrganic => {
                RawPage::Organic(decode_as(source, value)?)
            }
            Source::GoogleNews => RawPage::News(decode_as(source, value)?),
            Source::GoogleImages => RawPage::Images(decode_as(source, value)?),
            Source::GoogleAiAnswer => RawPage::AiAnswer(decode_as(source, value)?),
        })
    }

    /// Number of items on the page; an AI answer counts its text blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            RawPage::Organic(page) => page.organic_results.len(),
            RawPage::News(page) => page.news_results.len(),
            RawPage::Images(page) => page.images_results.len(),
            RawPage::AiAnswer(page) => page.text_blocks.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn decode_as<T: DeserializeOwned>(
    source: Source,
    value: serde_json::Value,
) -> Result<T, ProviderError> {
    serde_json::from_value(value).map_err(|e| ProviderError::Deserialize {
        context: format!("{source} response"),
        source: e,
    })
}
