use super::{ChecklistBoard, ChecklistView};
use crate::api::checklist::ChecklistClient;
use crate::instances::{InstanceError, InstanceId, Instances};
use futures::future::{AbortHandle, Abortable};

struct BoardSlot {
    board: ChecklistBoard,
    fetch: Option<AbortHandle>,
}

/// Mounted checklist screens. Each mount fetches the active template on its
/// own; nothing is shared or de-duplicated between mounts.
pub struct ChecklistHub {
    client: ChecklistClient,
    boards: Instances<BoardSlot>,
}

impl ChecklistHub {
    pub fn new(client: ChecklistClient) -> Self {
        Self {
            client,
            boards: Instances::default(),
        }
    }

    /// Mount a board in the loading state. Call [`ChecklistHub::load`] next.
    pub fn mount(&self) -> InstanceId {
        let id = self.boards.mount(BoardSlot {
            board: ChecklistBoard::new(),
            fetch: None,
        });
        log::info!("[checklist] mounted board {}", id);
        id
    }

    pub fn unmount(&self, id: &InstanceId) -> bool {
        match self.boards.unmount(id) {
            Some(slot) => {
                if let Some(handle) = slot.fetch {
                    handle.abort();
                }
                log::info!("[checklist] unmounted board {}", id);
                true
            }
            None => false,
        }
    }

    pub fn mounted(&self) -> usize {
        self.boards.len()
    }

    /// Fetch the active template for a mounted board. Returns the view once
    /// the outcome is applied, or `None` when the board was unmounted first.
    pub async fn load(&self, id: &InstanceId) -> Result<Option<ChecklistView>, InstanceError> {
        let registration = self
            .boards
            .with(id, |slot| {
                let (handle, registration) = AbortHandle::new_pair();
                if let Some(previous) = slot.fetch.replace(handle) {
                    previous.abort();
                }
                registration
            })
            .ok_or(InstanceError::NotMounted(*id))?;

        let fetch = self.client.fetch_active_template();
        let Ok(result) = Abortable::new(fetch, registration).await else {
            log::debug!("[checklist] fetch for board {} aborted", id);
            return Ok(None);
        };

        let view = self.boards.with(id, |slot| {
            slot.fetch = None;
            slot.board.apply(result);
            slot.board.render()
        });
        if view.is_none() {
            log::debug!("[checklist] dropping template for unmounted board {}", id);
        }
        Ok(view)
    }

    pub fn update<R>(
        &self,
        id: &InstanceId,
        f: impl FnOnce(&mut ChecklistBoard) -> R,
    ) -> Result<R, InstanceError> {
        self.boards
            .with(id, |slot| f(&mut slot.board))
            .ok_or(InstanceError::NotMounted(*id))
    }

    pub fn view(&self, id: &InstanceId) -> Result<ChecklistView, InstanceError> {
        self.update(id, |board| board.render())
    }
}
