use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Error, Result};

/// Fixed set of topic tags a conversation can touch on.
///
/// Declaration order is the order categories are asked about and listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    // Aliases accept files written by the Korean-language edition.
    #[serde(alias = "일")]
    Work,
    #[serde(alias = "학업")]
    Study,
    #[serde(alias = "취미")]
    Hobby,
    #[serde(alias = "친목")]
    Socializing,
    #[serde(alias = "연애")]
    Romance,
    #[serde(alias = "건강")]
    Health,
    #[serde(alias = "기타")]
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Work,
        Category::Study,
        Category::Hobby,
        Category::Socializing,
        Category::Romance,
        Category::Health,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Study => "Study",
            Self::Hobby => "Hobby",
            Self::Socializing => "Socializing",
            Self::Romance => "Romance",
            Self::Health => "Health",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much a topic mattered, 1 (small talk) to 5 (life event).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Importance(u8);

impl Importance {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::validation(format!(
                "Importance must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                value
            )))
        }
    }

    /// Parse typed input such as `" 4 "`.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let value: u8 = trimmed.parse().map_err(|_| {
            Error::validation(format!(
                "Importance must be a number from {} to {}, got \"{}\"",
                Self::MIN,
                Self::MAX,
                trimmed
            ))
        })?;
        Self::new(value)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Importance {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Importance> for u8 {
    fn from(importance: Importance) -> u8 {
        importance.0
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicNote {
    pub importance: Importance,
    pub details: String,
}

impl TopicNote {
    pub fn new(importance: Importance, details: impl Into<String>) -> Self {
        Self {
            importance,
            details: details.into(),
        }
    }
}

/// One recorded conversation.
///
/// `date` is the label the user typed and is kept verbatim; it is not parsed
/// and is unrelated to the contact's `last_contact_date`. A category appears
/// in `topics` only if it was discussed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub date: String,
    #[serde(default, deserialize_with = "unique_topics")]
    pub topics: BTreeMap<Category, TopicNote>,
}

/// Reject a topics object naming one category twice, e.g. under both its
/// English and Korean label.
fn unique_topics<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<Category, TopicNote>, D::Error>
where
    D: Deserializer<'de>,
{
    struct TopicsVisitor;

    impl<'de> Visitor<'de> for TopicsVisitor {
        type Value = BTreeMap<Category, TopicNote>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of category to topic note")
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut topics = BTreeMap::new();
            while let Some((category, note)) = map.next_entry::<Category, TopicNote>()? {
                if topics.insert(category, note).is_some() {
                    return Err(de::Error::custom(format!("duplicate category {}", category)));
                }
            }
            Ok(topics)
        }
    }

    deserializer.deserialize_map(TopicsVisitor)
}

impl ConversationEntry {
    pub fn new(date: impl Into<String>, topics: BTreeMap<Category, TopicNote>) -> Self {
        Self {
            date: date.into(),
            topics,
        }
    }

    /// "Work: 4, Hobby: 2"
    pub fn importance_summary(&self) -> String {
        self.topics
            .iter()
            .map(|(category, note)| format!("{}: {}", category, note.importance))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Replacement values for one category of an existing entry.
#[derive(Debug, Clone, Default)]
pub struct TopicEdit {
    pub importance: Option<Importance>,
    pub details: Option<String>,
}

/// Changes to apply to a recorded entry. Categories cannot be added or
/// removed; only those already present may be edited.
#[derive(Debug, Clone, Default)]
pub struct EntryEdit {
    pub date: Option<String>,
    pub topics: BTreeMap<Category, TopicEdit>,
}
