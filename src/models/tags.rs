use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Tag categories a trade can be labelled with.
///
/// `Strategy`, `Trigger`, `Session` and `Confidence` are exclusive (a trade
/// carries at most one value); `Mistakes`, `Emotions` and `Custom` are
/// multi-select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagCategory {
    Strategy,
    Trigger,
    Session,
    Confidence,
    Mistakes,
    Emotions,
    Custom,
}

impl TagCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagCategory::Strategy => "strategy",
            TagCategory::Trigger => "trigger",
            TagCategory::Session => "session",
            TagCategory::Confidence => "confidence",
            TagCategory::Mistakes => "mistakes",
            TagCategory::Emotions => "emotions",
            TagCategory::Custom => "custom",
        }
    }

    pub fn is_exclusive(&self) -> bool {
        matches!(
            self,
            TagCategory::Strategy
                | TagCategory::Trigger
                | TagCategory::Session
                | TagCategory::Confidence
        )
    }
}

impl FromStr for TagCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strategy" => Ok(TagCategory::Strategy),
            "trigger" => Ok(TagCategory::Trigger),
            "session" => Ok(TagCategory::Session),
            "confidence" => Ok(TagCategory::Confidence),
            "mistakes" => Ok(TagCategory::Mistakes),
            "emotions" => Ok(TagCategory::Emotions),
            "custom" => Ok(TagCategory::Custom),
            other => Err(format!("Unknown tag category: {}", other)),
        }
    }
}

/// A category-qualified tag value.
///
/// Serialized at the interchange boundary as `"category:Value"`
/// (e.g. `"strategy:Breakout"`); kept as a typed pair everywhere inside
/// the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagKey {
    pub category: TagCategory,
    pub value: String,
}

impl TagKey {
    pub fn new(category: TagCategory, value: impl Into<String>) -> Self {
        Self {
            category,
            value: value.into(),
        }
    }
}

impl fmt::Display for TagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category.as_str(), self.value)
    }
}

impl FromStr for TagKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (category, value) = s
            .split_once(':')
            .ok_or_else(|| format!("Tag missing category prefix: {}", s))?;
        let value = value.trim();
        if value.is_empty() {
            return Err(format!("Tag missing value: {}", s));
        }
        Ok(TagKey {
            category: category.parse()?,
            value: value.to_string(),
        })
    }
}

/// All tags attached to one trade, one field per category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeTags {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mistakes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emotions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom: Vec<String>,
}

impl TradeTags {
    /// Every tag carried by this trade, across all categories.
    pub fn flatten(&self) -> Vec<TagKey> {
        let mut keys = Vec::new();

        let exclusive = [
            (TagCategory::Strategy, &self.strategy),
            (TagCategory::Trigger, &self.trigger),
            (TagCategory::Session, &self.session),
            (TagCategory::Confidence, &self.confidence),
        ];
        for (category, value) in exclusive {
            if let Some(v) = value {
                if !v.is_empty() {
                    keys.push(TagKey::new(category, v.clone()));
                }
            }
        }

        let multi = [
            (TagCategory::Mistakes, &self.mistakes),
            (TagCategory::Emotions, &self.emotions),
            (TagCategory::Custom, &self.custom),
        ];
        for (category, values) in multi {
            for v in values {
                if !v.is_empty() {
                    keys.push(TagKey::new(category, v.clone()));
                }
            }
        }

        keys
    }

    pub fn is_empty(&self) -> bool {
        self.flatten().is_empty()
    }

    /// Insert a tag into the matching category field. Exclusive categories
    /// are overwritten; multi-select categories are appended (no duplicates).
    pub fn insert(&mut self, key: TagKey) {
        match key.category {
            TagCategory::Strategy => self.strategy = Some(key.value),
            TagCategory::Trigger => self.trigger = Some(key.value),
            TagCategory::Session => self.session = Some(key.value),
            TagCategory::Confidence => self.confidence = Some(key.value),
            TagCategory::Mistakes => push_unique(&mut self.mistakes, key.value),
            TagCategory::Emotions => push_unique(&mut self.emotions, key.value),
            TagCategory::Custom => push_unique(&mut self.custom, key.value),
        }
    }

    /// Rebuild from the legacy prefixed-string encoding
    /// (`"strategy:Breakout"`). Unparseable entries are dropped.
    pub fn from_prefixed(tags: &[String]) -> Self {
        let mut out = TradeTags::default();
        for raw in tags {
            match raw.parse::<TagKey>() {
                Ok(key) => out.insert(key),
                Err(e) => log::warn!("Skipping malformed tag '{}': {}", raw, e),
            }
        }
        out
    }

    /// Render to the prefixed-string encoding used at the storage boundary.
    pub fn to_prefixed(&self) -> Vec<String> {
        self.flatten().iter().map(|k| k.to_string()).collect()
    }
}

fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}
