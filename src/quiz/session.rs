//! Study session state machine
//!
//! A session is either browsing (no snapshot) or active over a snapshot of
//! the filtered items taken at entry. Store changes made while a session is
//! active never reach the snapshot. Each item has its own small progress
//! machine which is reset whenever the cursor moves.
//!
//! Invalid transitions are ignored; every method returns whether anything
//! changed so a UI can decide to redraw.

use super::models::{ItemKind, StudyItem};

/// Top-level session mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Browsing,
    Active,
}

/// Progress on the item under the cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemProgress {
    /// Flashcard face shown
    Flashcard { flipped: bool },
    /// Multiple choice or true/false; `selected` is terminal once set
    Choice { selected: Option<String> },
    /// Essay; `response` is set once the reference answer is revealed
    Essay { response: Option<String> },
}

impl ItemProgress {
    fn fresh(kind: &ItemKind) -> Self {
        match kind {
            ItemKind::Flashcard => Self::Flashcard { flipped: false },
            ItemKind::MultipleChoice { .. } | ItemKind::TrueFalse => Self::Choice { selected: None },
            ItemKind::Essay => Self::Essay { response: None },
        }
    }
}

/// Result shown once an item has been answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect { expected: String },
    /// No automatic judgment; the learner compares against the reference
    SelfAssess { response: String, reference: String },
}

#[derive(Debug, Clone)]
struct ActiveSession {
    snapshot: Vec<StudyItem>,
    cursor: usize,
    progress: ItemProgress,
}

impl ActiveSession {
    fn current(&self) -> &StudyItem {
        &self.snapshot[self.cursor]
    }

    fn move_to(&mut self, cursor: usize) {
        self.cursor = cursor;
        self.progress = ItemProgress::fresh(self.snapshot[cursor].kind());
    }
}

#[derive(Debug, Clone, Default)]
pub struct StudySession {
    active: Option<ActiveSession>,
}

impl StudySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> SessionMode {
        if self.active.is_some() {
            SessionMode::Active
        } else {
            SessionMode::Browsing
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Enter study mode over the given view.
    ///
    /// Refused when the view is empty or a session is already running.
    pub fn start(&mut self, view: &[&StudyItem]) -> bool {
        if self.active.is_some() {
            log::debug!("Study session already active, ignoring start");
            return false;
        }
        let Some(first) = view.first() else {
            log::debug!("Nothing to study in the current view");
            return false;
        };

        let progress = ItemProgress::fresh(first.kind());
        let snapshot: Vec<StudyItem> = view.iter().map(|item| (*item).clone()).collect();
        log::debug!("Study session started over {} items", snapshot.len());

        self.active = Some(ActiveSession {
            snapshot,
            cursor: 0,
            progress,
        });
        true
    }

    /// Leave study mode, discarding the snapshot and all progress.
    pub fn exit(&mut self) {
        self.active = None;
    }

    /// The items being studied, empty while browsing
    pub fn snapshot(&self) -> &[StudyItem] {
        self.active
            .as_ref()
            .map(|s| s.snapshot.as_slice())
            .unwrap_or(&[])
    }

    pub fn current(&self) -> Option<&StudyItem> {
        self.active.as_ref().map(ActiveSession::current)
    }

    pub fn cursor(&self) -> Option<usize> {
        self.active.as_ref().map(|s| s.cursor)
    }

    /// 1-based position and snapshot length
    pub fn position(&self) -> Option<(usize, usize)> {
        self.active.as_ref().map(|s| (s.cursor + 1, s.snapshot.len()))
    }

    pub fn progress(&self) -> Option<&ItemProgress> {
        self.active.as_ref().map(|s| &s.progress)
    }

    /// Advance one item, wrapping to the start
    pub fn next(&mut self) -> bool {
        let Some(session) = self.active.as_mut() else {
            return false;
        };
        let cursor = (session.cursor + 1) % session.snapshot.len();
        session.move_to(cursor);
        true
    }

    /// Go back one item, wrapping to the end
    pub fn prev(&mut self) -> bool {
        let Some(session) = self.active.as_mut() else {
            return false;
        };
        let len = session.snapshot.len();
        let cursor = (session.cursor + len - 1) % len;
        session.move_to(cursor);
        true
    }

    /// Turn the current flashcard over
    pub fn flip(&mut self) -> bool {
        match self.active.as_mut().map(|s| &mut s.progress) {
            Some(ItemProgress::Flashcard { flipped }) => {
                *flipped = !*flipped;
                true
            }
            _ => false,
        }
    }

    /// Answer the current choice item with one of its options
    pub fn choose(&mut self, option: &str) -> bool {
        let Some(session) = self.active.as_mut() else {
            return false;
        };
        let is_option = session
            .current()
            .options()
            .is_some_and(|options| options.contains(&option));
        match &mut session.progress {
            ItemProgress::Choice { selected } if selected.is_none() && is_option => {
                *selected = Some(option.to_string());
                true
            }
            _ => false,
        }
    }

    /// Answer the current choice item by zero-based option index
    pub fn choose_index(&mut self, index: usize) -> bool {
        let option = self
            .current()
            .and_then(|item| item.options())
            .and_then(|options| options.get(index).map(|o| o.to_string()));
        match option {
            Some(option) => self.choose(&option),
            None => false,
        }
    }

    /// Submit free text for the current essay and reveal the reference.
    ///
    /// Blank text is refused.
    pub fn submit_essay(&mut self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        match self.active.as_mut().map(|s| &mut s.progress) {
            Some(ItemProgress::Essay { response }) if response.is_none() => {
                *response = Some(text.to_string());
                true
            }
            _ => false,
        }
    }

    /// Grading result for the current item, once it has one
    pub fn outcome(&self) -> Option<Outcome> {
        let session = self.active.as_ref()?;
        let item = session.current();
        match &session.progress {
            ItemProgress::Choice { selected: Some(selected) } => {
                if selected == item.answer() {
                    Some(Outcome::Correct)
                } else {
                    Some(Outcome::Incorrect {
                        expected: item.answer().to_string(),
                    })
                }
            }
            ItemProgress::Essay { response: Some(response) } => Some(Outcome::SelfAssess {
                response: response.clone(),
                reference: item.answer().to_string(),
            }),
            _ => None,
        }
    }
}
