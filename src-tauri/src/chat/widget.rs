use super::references::{self, ReferenceStyle, ReferencesView};
use super::session::{ChatSession, ChatTurn, Exchange, Rejection, Role};
use crate::api::{ApiError, AskResponse};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Keys the input box reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Key {
    Enter,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnView {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub references: Option<ReferencesView>,
}

/// What the open widget shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatView {
    pub turns: Vec<TurnView>,
    pub loading: bool,
    pub submit_enabled: bool,
    pub draft: String,
}

/// Floating chat widget: visibility, the input box and the conversation.
#[derive(Debug, Clone)]
pub struct ChatWidget {
    session_id: i64,
    style: ReferenceStyle,
    session: ChatSession,
    open: bool,
    draft: String,
    expanded: HashSet<Uuid>,
    scroll_pending: bool,
}

impl ChatWidget {
    pub fn new(session_id: i64, style: ReferenceStyle) -> Self {
        Self {
            session_id,
            style,
            session: ChatSession::new(),
            open: false,
            draft: String::new(),
            expanded: HashSet::new(),
            scroll_pending: false,
        }
    }

    pub fn session_id(&self) -> i64 {
        self.session_id
    }

    pub fn turns(&self) -> &[ChatTurn] {
        self.session.turns()
    }

    pub fn is_loading(&self) -> bool {
        self.session.is_loading()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        if !self.open {
            self.open = true;
            self.scroll_pending = true;
        }
    }

    pub fn close(&mut self) {
        self.open = false;
        self.scroll_pending = false;
    }

    pub fn toggle_open(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Enter submits the draft exactly like the submit button. Other keys do
    /// nothing and yield `None`.
    pub(crate) fn press_key(&mut self, key: Key) -> Option<Result<Exchange, Rejection>> {
        match key {
            Key::Enter => Some(self.click_submit()),
            Key::Other => None,
        }
    }

    pub(crate) fn click_submit(&mut self) -> Result<Exchange, Rejection> {
        let draft = self.draft.clone();
        self.submit(&draft)
    }

    /// Submit a question. The draft is cleared once the question is taken.
    pub(crate) fn submit(&mut self, question: &str) -> Result<Exchange, Rejection> {
        if !self.open {
            return Err(Rejection::Closed);
        }
        let exchange = self.session.begin(question)?;
        self.draft.clear();
        self.scroll_pending = true;
        Ok(exchange)
    }

    pub(crate) fn settle(&mut self, ticket: u64, result: Result<AskResponse, ApiError>) -> bool {
        let applied = self.session.settle(ticket, result);
        if applied {
            self.scroll_pending = true;
        }
        applied
    }

    /// Flip the expand state of one turn's references. Only local display
    /// state changes.
    pub fn toggle_references(&mut self, turn_id: Uuid) -> bool {
        if !self.turns().iter().any(|t| t.id == turn_id) {
            return false;
        }
        if !self.expanded.remove(&turn_id) {
            self.expanded.insert(turn_id);
        }
        true
    }

    /// Index of the turn to bring into view, raised by any change to the log
    /// or the loading flag while the widget is open.
    pub fn take_scroll_request(&mut self) -> Option<usize> {
        if !self.open || !self.scroll_pending {
            return None;
        }
        self.scroll_pending = false;
        self.turns().len().checked_sub(1)
    }

    /// `None` while closed.
    pub fn render(&self) -> Option<ChatView> {
        if !self.open {
            return None;
        }
        let turns = self
            .turns()
            .iter()
            .map(|turn| TurnView {
                id: turn.id,
                role: turn.role,
                content: turn.content.clone(),
                references: turn.references.as_deref().and_then(|refs| {
                    references::render(self.style, refs, self.expanded.contains(&turn.id))
                }),
            })
            .collect();
        let loading = self.is_loading();
        Some(ChatView {
            turns,
            loading,
            submit_enabled: !loading,
            draft: self.draft.clone(),
        })
    }
}
