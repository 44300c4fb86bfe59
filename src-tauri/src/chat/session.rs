use crate::api::{ApiError, AskResponse, Reference};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const GREETING: &str = "안녕하세요! 집 점검이나 계약 전 확인 사항에 대해 무엇이든 물어보세요.";
pub const EMPTY_ANSWER: &str = "답변을 생성하지 못했습니다.";
pub const FAILURE_MESSAGE: &str = "⚠️ 서버와 통신 중 오류가 발생했습니다. 잠시 후 다시 시도해 주세요.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Ai,
}

/// One entry of the conversation log. Never changed once appended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurn {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    /// Only answered ai turns carry references, possibly an empty list. The
    /// greeting and failure turns carry none.
    pub references: Option<Vec<Reference>>,
}

impl ChatTurn {
    fn user(content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::User,
            content,
            references: None,
        }
    }

    fn ai(content: String, references: Option<Vec<Reference>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::Ai,
            content,
            references,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Idle,
    AwaitingResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Rejection {
    Blank,
    Busy,
    Closed,
}

/// A question that has been logged and now waits for the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub ticket: u64,
    pub question: String,
}

/// Append-only conversation log with at most one exchange in flight.
#[derive(Debug, Clone)]
pub struct ChatSession {
    turns: Vec<ChatTurn>,
    pending: Option<u64>,
    next_ticket: u64,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            turns: vec![ChatTurn::ai(GREETING.to_string(), None)],
            pending: None,
            next_ticket: 1,
        }
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn phase(&self) -> Phase {
        if self.is_loading() {
            Phase::AwaitingResponse
        } else {
            Phase::Idle
        }
    }

    /// Log a question and open an exchange for it.
    pub fn begin(&mut self, question: &str) -> Result<Exchange, Rejection> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Rejection::Blank);
        }
        if self.is_loading() {
            return Err(Rejection::Busy);
        }

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.pending = Some(ticket);
        self.turns.push(ChatTurn::user(question.to_string()));

        Ok(Exchange {
            ticket,
            question: question.to_string(),
        })
    }

    /// Close the exchange identified by `ticket`. Results for any other
    /// ticket are ignored and `false` is returned.
    pub fn settle(&mut self, ticket: u64, result: Result<AskResponse, ApiError>) -> bool {
        if self.pending != Some(ticket) {
            return false;
        }
        self.pending = None;

        let turn = match result {
            Ok(resp) => {
                let content = resp
                    .answer
                    .filter(|a| !a.trim().is_empty())
                    .unwrap_or_else(|| EMPTY_ANSWER.to_string());
                ChatTurn::ai(content, Some(resp.references))
            }
            Err(e) => {
                log::warn!("[chat] ask failed: {}", e);
                ChatTurn::ai(FAILURE_MESSAGE.to_string(), None)
            }
        };
        self.turns.push(turn);
        true
    }
}
