//! Pre-contract checklist: the active template, a done/not-done mark per
//! item and the completion ratio derived from them.

pub mod hub;

pub use hub::ChecklistHub;

use crate::api::{ApiError, ChecklistTemplate, ResourceId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_CHECK_AREA: &str = "공통";
pub const HOME_ROUTE: &str = "/";
pub const SAVE_NOTICE: &str = "체크리스트 저장 기능은 아직 준비 중입니다.";
const TRANSPORT_ERROR: &str = "체크리스트 서버에 연결할 수 없습니다.";
const PARSE_ERROR: &str = "체크리스트 응답 형식이 올바르지 않습니다.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    Done,
    #[default]
    NotDone,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Ready(ChecklistTemplate),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
    pub percent: u32,
}

impl Progress {
    /// Percent rounded half up; an empty checklist is 0%.
    pub fn new(done: usize, total: usize) -> Self {
        let percent = if total == 0 {
            0
        } else {
            ((done * 100 + total / 2) / total) as u32
        };
        Self {
            done,
            total,
            percent,
        }
    }
}

/// Result of the save button. There is no write path to the checklist
/// service yet, so this never reports success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SaveOutcome {
    NotImplemented { notice: &'static str },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    pub item_id: ResourceId,
    pub title: String,
    pub description: Option<String>,
    pub check_area: String,
    pub status: ItemStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ChecklistView {
    Loading,
    #[serde(rename_all = "camelCase")]
    Failed {
        message: String,
        escape_route: &'static str,
    },
    #[serde(rename_all = "camelCase")]
    Ready {
        template_name: String,
        items: Vec<ItemView>,
        progress: Progress,
    },
}

/// Message shown in the error panel for a failed template fetch.
pub fn load_error_message(err: &ApiError) -> String {
    match err {
        ApiError::Status { status, body } if body.trim().is_empty() => {
            format!("체크리스트를 불러오지 못했습니다. (HTTP {})", status)
        }
        ApiError::Status { body, .. } => body.trim().to_string(),
        ApiError::Http(_) => TRANSPORT_ERROR.to_string(),
        ApiError::Parse(_) => PARSE_ERROR.to_string(),
    }
}

/// One mounted checklist screen.
#[derive(Debug, Clone)]
pub struct ChecklistBoard {
    state: LoadState,
    statuses: HashMap<ResourceId, ItemStatus>,
}

impl Default for ChecklistBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl ChecklistBoard {
    pub fn new() -> Self {
        Self {
            state: LoadState::Loading,
            statuses: HashMap::new(),
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn template(&self) -> Option<&ChecklistTemplate> {
        match &self.state {
            LoadState::Ready(template) => Some(template),
            _ => None,
        }
    }

    pub fn apply(&mut self, result: Result<ChecklistTemplate, ApiError>) {
        match result {
            Ok(template) => self.load_template(template),
            Err(e) => {
                log::warn!("[checklist] template fetch failed: {}", e);
                self.state = LoadState::Failed(load_error_message(&e));
            }
        }
    }

    /// Store the template with every item marked not done.
    pub fn load_template(&mut self, template: ChecklistTemplate) {
        self.state = LoadState::Ready(template);
        self.reset_all();
    }

    pub fn status(&self, item_id: &ResourceId) -> ItemStatus {
        self.statuses.get(item_id).copied().unwrap_or_default()
    }

    /// Local only. The id is not checked against the template.
    pub fn set_done(&mut self, item_id: ResourceId) {
        self.statuses.insert(item_id, ItemStatus::Done);
    }

    pub fn set_not_done(&mut self, item_id: ResourceId) {
        self.statuses.insert(item_id, ItemStatus::NotDone);
    }

    /// Mark every loaded item not done. Nothing happens before a template
    /// is loaded.
    pub fn reset_all(&mut self) {
        let Some(template) = self.template() else {
            return;
        };
        let statuses = template
            .items
            .iter()
            .map(|item| (item.item_id.clone(), ItemStatus::NotDone))
            .collect();
        self.statuses = statuses;
    }

    /// Counts done marks among the loaded items only.
    pub fn progress(&self) -> Progress {
        let Some(template) = self.template() else {
            return Progress::new(0, 0);
        };
        let done = template
            .items
            .iter()
            .filter(|item| self.status(&item.item_id) == ItemStatus::Done)
            .count();
        Progress::new(done, template.items.len())
    }

    pub fn save(&self) -> SaveOutcome {
        log::info!("[checklist] save requested; no write path exists yet");
        SaveOutcome::NotImplemented {
            notice: SAVE_NOTICE,
        }
    }

    pub fn render(&self) -> ChecklistView {
        match &self.state {
            LoadState::Loading => ChecklistView::Loading,
            LoadState::Failed(message) => ChecklistView::Failed {
                message: message.clone(),
                escape_route: HOME_ROUTE,
            },
            LoadState::Ready(template) => ChecklistView::Ready {
                template_name: template.template_name.clone(),
                items: template
                    .items
                    .iter()
                    .map(|item| ItemView {
                        item_id: item.item_id.clone(),
                        title: item.title.clone(),
                        description: item.description.clone(),
                        check_area: item
                            .check_area
                            .clone()
                            .filter(|a| !a.trim().is_empty())
                            .unwrap_or_else(|| DEFAULT_CHECK_AREA.to_string()),
                        status: self.status(&item.item_id),
                    })
                    .collect(),
                progress: self.progress(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ChecklistItem;
    use pretty_assertions::assert_eq;

    fn template(n: i64) -> ChecklistTemplate {
        ChecklistTemplate {
            template_name: "계약 전 점검".into(),
            items: (1..=n)
                .map(|i| ChecklistItem {
                    item_id: ResourceId::Number(i),
                    title: format!("항목 {}", i),
                    description: None,
                    check_area: None,
                })
                .collect(),
        }
    }

    fn loaded(n: i64) -> ChecklistBoard {
        let mut board = ChecklistBoard::new();
        board.apply(Ok(template(n)));
        board
    }

    #[test]
    fn test_progress_after_one_done() {
        let mut board = loaded(4);
        assert_eq!(board.progress(), Progress::new(0, 4));

        board.set_done(ResourceId::Number(2));
        assert_eq!(
            board.progress(),
            Progress {
                done: 1,
                total: 4,
                percent: 25
            }
        );

        board.set_not_done(ResourceId::Number(2));
        assert_eq!(board.progress().done, 0);
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(Progress::new(0, 0).percent, 0);
        assert_eq!(Progress::new(1, 3).percent, 33);
        assert_eq!(Progress::new(2, 3).percent, 67);
        assert_eq!(Progress::new(1, 8).percent, 13);
        assert_eq!(Progress::new(3, 3).percent, 100);
    }

    #[test]
    fn test_reset_restores_not_done() {
        let mut board = loaded(3);
        board.set_done(ResourceId::Number(1));
        board.set_done(ResourceId::Number(3));
        board.set_not_done(ResourceId::Number(1));
        board.set_done(ResourceId::Number(99));

        board.reset_all();
        for i in 1..=3 {
            assert_eq!(board.status(&ResourceId::Number(i)), ItemStatus::NotDone);
        }
        assert_eq!(board.progress().percent, 0);
        assert_eq!(board.status(&ResourceId::Number(99)), ItemStatus::NotDone);
    }

    #[test]
    fn test_reset_without_template_is_noop() {
        let mut board = ChecklistBoard::new();
        board.set_done(ResourceId::from("a"));
        board.reset_all();
        assert_eq!(board.state(), &LoadState::Loading);
        assert_eq!(board.status(&ResourceId::from("a")), ItemStatus::Done);
        assert_eq!(board.progress(), Progress::new(0, 0));
    }

    #[test]
    fn test_unknown_ids_are_stored_but_not_counted() {
        let mut board = loaded(2);
        board.set_done(ResourceId::from("ghost"));
        assert_eq!(board.status(&ResourceId::from("ghost")), ItemStatus::Done);
        assert_eq!(board.progress().done, 0);
    }

    #[test]
    fn test_error_messages() {
        let mut board = ChecklistBoard::new();
        board.apply(Err(ApiError::Status {
            status: 500,
            body: "template missing".into(),
        }));
        assert_eq!(
            board.render(),
            ChecklistView::Failed {
                message: "template missing".into(),
                escape_route: HOME_ROUTE,
            }
        );

        let generic = load_error_message(&ApiError::Status {
            status: 404,
            body: "  ".into(),
        });
        assert!(generic.contains("404"));
        assert_eq!(
            load_error_message(&ApiError::Parse("eof".into())),
            PARSE_ERROR
        );
    }

    #[test]
    fn test_render_defaults_check_area() {
        let mut t = template(2);
        t.items[1].check_area = Some("욕실".into());
        let mut board = ChecklistBoard::new();
        board.load_template(t);
        board.set_done(ResourceId::Number(2));

        let ChecklistView::Ready {
            items, progress, ..
        } = board.render()
        else {
            panic!("expected ready view");
        };
        assert_eq!(items[0].check_area, DEFAULT_CHECK_AREA);
        assert_eq!(items[1].check_area, "욕실");
        assert_eq!(items[1].status, ItemStatus::Done);
        assert_eq!(progress.percent, 50);
    }

    #[test]
    fn test_save_is_not_implemented() {
        let board = loaded(1);
        assert_eq!(
            board.save(),
            SaveOutcome::NotImplemented {
                notice: SAVE_NOTICE
            }
        );
    }
}
