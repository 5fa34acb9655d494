//! Data models for study items

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Canonical options of a true/false item
pub const TRUE_FALSE_OPTIONS: [&str; 2] = ["True", "False"];

/// Reasons an item shape is refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemError {
    #[error("Unknown item kind: {0}")]
    UnknownKind(String),

    #[error("Question is empty")]
    EmptyQuestion,

    #[error("Answer is empty")]
    EmptyAnswer,

    #[error("Options are required for {0}")]
    MissingOptions(&'static str),

    #[error("Options must be a list of strings: {0}")]
    InvalidOptions(String),

    #[error("True/false options must be exactly True and False")]
    InvalidTrueFalseOptions,

    #[error("Answer '{0}' is not one of the options")]
    AnswerNotInOptions(String),

    #[error("Duplicate item id: {0}")]
    DuplicateId(ItemId),
}

/// Opaque item identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Generate a fresh unique id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Kind of study item, carrying the payload that only some kinds have
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    /// Front/back card, no grading
    Flashcard,
    /// Pick one of several options
    MultipleChoice { options: Vec<String> },
    /// Pick True or False
    TrueFalse,
    /// Free text, self-assessed against the reference answer
    Essay,
}

impl ItemKind {
    /// Wire name of the kind
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Flashcard => "flashcard",
            Self::MultipleChoice { .. } => "multipleChoice",
            Self::TrueFalse => "trueFalse",
            Self::Essay => "essay",
        }
    }

    /// Selectable options, if this kind has any
    pub fn options(&self) -> Option<Vec<&str>> {
        match self {
            Self::MultipleChoice { options } => Some(options.iter().map(String::as_str).collect()),
            Self::TrueFalse => Some(TRUE_FALSE_OPTIONS.to_vec()),
            Self::Flashcard | Self::Essay => None,
        }
    }

    /// Build a kind from its wire name and an optional options list.
    ///
    /// Options are trimmed. For true/false they must be exactly the two
    /// canonical values (any order, any case). Options given for a kind that
    /// has none are ignored.
    pub fn from_parts(tag: &str, options: Option<Vec<String>>) -> Result<Self, ItemError> {
        match tag {
            "flashcard" => Ok(Self::Flashcard),
            "essay" => Ok(Self::Essay),
            "multipleChoice" => {
                let options: Vec<String> = options
                    .unwrap_or_default()
                    .into_iter()
                    .map(|o| o.trim().to_string())
                    .collect();
                if options.is_empty() {
                    return Err(ItemError::MissingOptions("multipleChoice"));
                }
                Ok(Self::MultipleChoice { options })
            }
            "trueFalse" => {
                let options = options.ok_or(ItemError::MissingOptions("trueFalse"))?;
                let mut seen: Vec<&'static str> = Vec::with_capacity(2);
                for option in &options {
                    let canonical = canonical_true_false(option)
                        .ok_or(ItemError::InvalidTrueFalseOptions)?;
                    if seen.contains(&canonical) {
                        return Err(ItemError::InvalidTrueFalseOptions);
                    }
                    seen.push(canonical);
                }
                if seen.len() != 2 {
                    return Err(ItemError::InvalidTrueFalseOptions);
                }
                Ok(Self::TrueFalse)
            }
            other => Err(ItemError::UnknownKind(other.to_string())),
        }
    }
}

fn canonical_true_false(value: &str) -> Option<&'static str> {
    let value = value.trim();
    TRUE_FALSE_OPTIONS
        .into_iter()
        .find(|canonical| canonical.eq_ignore_ascii_case(value))
}

/// An authoring draft: everything but the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub kind: ItemKind,
    pub question: String,
    pub answer: String,
    pub is_favorite: bool,
}

impl NewItem {
    pub fn new(kind: ItemKind, question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            kind,
            question: question.into(),
            answer: answer.into(),
            is_favorite: false,
        }
    }

    pub fn favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = is_favorite;
        self
    }

    /// Trim text and check the answer against the kind.
    pub(crate) fn normalize(self) -> Result<Self, ItemError> {
        let question = self.question.trim().to_string();
        if question.is_empty() {
            return Err(ItemError::EmptyQuestion);
        }
        let mut answer = self.answer.trim().to_string();
        if answer.is_empty() {
            return Err(ItemError::EmptyAnswer);
        }

        let kind = match self.kind {
            ItemKind::MultipleChoice { options } => {
                let options: Vec<String> = options.into_iter().map(|o| o.trim().to_string()).collect();
                if options.is_empty() {
                    return Err(ItemError::MissingOptions("multipleChoice"));
                }
                if !options.iter().any(|o| *o == answer) {
                    return Err(ItemError::AnswerNotInOptions(answer));
                }
                ItemKind::MultipleChoice { options }
            }
            ItemKind::TrueFalse => {
                answer = canonical_true_false(&answer)
                    .ok_or(ItemError::AnswerNotInOptions(answer))?
                    .to_string();
                ItemKind::TrueFalse
            }
            kind => kind,
        };

        Ok(Self {
            kind,
            question,
            answer,
            is_favorite: self.is_favorite,
        })
    }
}

/// A single quiz/flashcard record.
///
/// Fields are read-only outside the crate; the favorite flag changes only
/// through the item store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredItem", into = "StoredItem")]
pub struct StudyItem {
    id: ItemId,
    kind: ItemKind,
    question: String,
    answer: String,
    is_favorite: bool,
}

impl StudyItem {
    /// Validate a draft and give it an id.
    pub fn create(id: ItemId, draft: NewItem) -> Result<Self, ItemError> {
        let draft = draft.normalize()?;
        Ok(Self {
            id,
            kind: draft.kind,
            question: draft.question,
            answer: draft.answer,
            is_favorite: draft.is_favorite,
        })
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn options(&self) -> Option<Vec<&str>> {
        self.kind.options()
    }

    pub fn is_favorite(&self) -> bool {
        self.is_favorite
    }

    pub(crate) fn toggle_favorite(&mut self) {
        self.is_favorite = !self.is_favorite;
    }
}

/// On-disk record shape
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredItem {
    pub id: String,
    #[serde(alias = "type")]
    pub kind: String,
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub is_favorite: bool,
}

impl TryFrom<StoredItem> for StudyItem {
    type Error = ItemError;

    fn try_from(stored: StoredItem) -> Result<Self, Self::Error> {
        let kind = ItemKind::from_parts(&stored.kind, stored.options)?;
        let draft = NewItem::new(kind, stored.question, stored.answer).favorite(stored.is_favorite);
        Self::create(ItemId(stored.id), draft)
    }
}

impl From<StudyItem> for StoredItem {
    fn from(item: StudyItem) -> Self {
        let options = item
            .kind
            .options()
            .map(|opts| opts.into_iter().map(str::to_string).collect());
        Self {
            id: item.id.0,
            kind: item.kind.tag().to_string(),
            question: item.question,
            answer: item.answer,
            options,
            is_favorite: item.is_favorite,
        }
    }
}

/// Check that no id appears twice
pub(crate) fn ensure_unique_ids(items: &[StudyItem]) -> Result<(), ItemError> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.id()) {
            return Err(ItemError::DuplicateId(item.id().clone()));
        }
    }
    Ok(())
}

/// Collection used when nothing usable is persisted
pub fn seed_items() -> Vec<StudyItem> {
    vec![
        StudyItem {
            id: ItemId::from("1"),
            kind: ItemKind::Flashcard,
            question: "Innovation".to_string(),
            answer: "Sự đổi mới, sáng tạo".to_string(),
            is_favorite: true,
        },
        StudyItem {
            id: ItemId::from("2"),
            kind: ItemKind::MultipleChoice {
                options: vec![
                    "Hà Nội".to_string(),
                    "TP. HCM".to_string(),
                    "Đà Nẵng".to_string(),
                    "Huế".to_string(),
                ],
            },
            question: "Thủ đô của Việt Nam là gì?".to_string(),
            answer: "Hà Nội".to_string(),
            is_favorite: false,
        },
        StudyItem {
            id: ItemId::from("3"),
            kind: ItemKind::TrueFalse,
            question: "React là một Framework?".to_string(),
            answer: "False".to_string(),
            is_favorite: false,
        },
    ]
}
