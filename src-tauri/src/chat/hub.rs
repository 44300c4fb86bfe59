use super::references::ReferenceStyle;
use super::session::{Exchange, Rejection};
use super::widget::{ChatView, ChatWidget, Key};
use crate::api::rag::RagClient;
use crate::instances::{InstanceError, InstanceId, Instances};
use futures::future::{AbortHandle, Abortable};
use serde::Serialize;
use uuid::Uuid;

struct ChatSlot {
    widget: ChatWidget,
    inflight: Option<AbortHandle>,
}

/// Snapshot pushed to the view after every state change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatEvent {
    pub widget_id: InstanceId,
    pub view: Option<ChatView>,
    pub scroll_to: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "reason", rename_all = "camelCase")]
pub enum SubmitOutcome {
    /// The key pressed does not submit.
    Ignored,
    Rejected(Rejection),
    Settled,
    /// The widget went away before the answer arrived.
    Discarded,
}

/// Local edits to a widget. None of them reach the backend; questions go
/// through `submit`, `click_submit` and `press_key` only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetAction {
    Open,
    Close,
    ToggleOpen,
    SetDraft(String),
    ToggleReferences(Uuid),
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error(transparent)]
    Instance(#[from] InstanceError),
    #[error("turn {0} not found")]
    UnknownTurn(Uuid),
}

/// Every mounted chat widget plus the client their questions go through.
pub struct ChatHub {
    client: RagClient,
    widgets: Instances<ChatSlot>,
}

impl ChatHub {
    pub fn new(client: RagClient) -> Self {
        Self {
            client,
            widgets: Instances::default(),
        }
    }

    pub fn mount(&self, session_id: i64, style: ReferenceStyle) -> InstanceId {
        let id = self.widgets.mount(ChatSlot {
            widget: ChatWidget::new(session_id, style),
            inflight: None,
        });
        log::info!("[chat] mounted widget {} for session {}", id, session_id);
        id
    }

    /// Drop the widget and cancel its in-flight question, if any.
    pub fn unmount(&self, id: &InstanceId) -> bool {
        match self.widgets.unmount(id) {
            Some(slot) => {
                if let Some(handle) = slot.inflight {
                    handle.abort();
                }
                log::info!("[chat] unmounted widget {}", id);
                true
            }
            None => false,
        }
    }

    pub fn mounted(&self) -> usize {
        self.widgets.len()
    }

    /// Apply a local edit and return the resulting event.
    pub fn update(&self, id: &InstanceId, action: WidgetAction) -> Result<ChatEvent, ChatError> {
        self.widgets
            .with(id, |slot| {
                let widget = &mut slot.widget;
                match action {
                    WidgetAction::Open => widget.open(),
                    WidgetAction::Close => widget.close(),
                    WidgetAction::ToggleOpen => widget.toggle_open(),
                    WidgetAction::SetDraft(text) => widget.set_draft(text),
                    WidgetAction::ToggleReferences(turn_id) => {
                        if !widget.toggle_references(turn_id) {
                            return Err(ChatError::UnknownTurn(turn_id));
                        }
                    }
                }
                Ok(snapshot(*id, widget))
            })
            .ok_or(InstanceError::NotMounted(*id))?
    }

    pub fn view(&self, id: &InstanceId) -> Result<Option<ChatView>, InstanceError> {
        self.widgets
            .with(id, |slot| slot.widget.render())
            .ok_or(InstanceError::NotMounted(*id))
    }

    pub async fn submit(
        &self,
        id: &InstanceId,
        question: &str,
        on_change: impl Fn(ChatEvent) + Send,
    ) -> Result<SubmitOutcome, InstanceError> {
        self.drive(id, |w| Some(w.submit(question)), on_change).await
    }

    pub async fn click_submit(
        &self,
        id: &InstanceId,
        on_change: impl Fn(ChatEvent) + Send,
    ) -> Result<SubmitOutcome, InstanceError> {
        self.drive(id, |w| Some(w.click_submit()), on_change).await
    }

    pub async fn press_key(
        &self,
        id: &InstanceId,
        key: Key,
        on_change: impl Fn(ChatEvent) + Send,
    ) -> Result<SubmitOutcome, InstanceError> {
        self.drive(id, |w| w.press_key(key), on_change).await
    }

    async fn drive(
        &self,
        id: &InstanceId,
        start: impl FnOnce(&mut ChatWidget) -> Option<Result<Exchange, Rejection>>,
        on_change: impl Fn(ChatEvent) + Send,
    ) -> Result<SubmitOutcome, InstanceError> {
        let started = self
            .widgets
            .with(id, |slot| match start(&mut slot.widget) {
                None => Err(SubmitOutcome::Ignored),
                Some(Err(rejection)) => Err(SubmitOutcome::Rejected(rejection)),
                Some(Ok(exchange)) => {
                    let (handle, registration) = AbortHandle::new_pair();
                    slot.inflight = Some(handle);
                    let event = snapshot(*id, &mut slot.widget);
                    Ok((exchange, slot.widget.session_id(), registration, event))
                }
            })
            .ok_or(InstanceError::NotMounted(*id))?;

        let (exchange, session_id, registration, event) = match started {
            Ok(started) => started,
            Err(outcome) => {
                log::debug!("[chat] widget {} submission not sent: {:?}", id, outcome);
                return Ok(outcome);
            }
        };
        on_change(event);

        let ask = self.client.ask(session_id, &exchange.question);
        let Ok(result) = Abortable::new(ask, registration).await else {
            log::debug!("[chat] widget {} exchange {} aborted", id, exchange.ticket);
            return Ok(SubmitOutcome::Discarded);
        };

        let settled = self.widgets.with(id, |slot| {
            slot.inflight = None;
            slot.widget
                .settle(exchange.ticket, result)
                .then(|| snapshot(*id, &mut slot.widget))
        });

        match settled.flatten() {
            Some(event) => {
                log::info!("[chat] widget {} exchange {} settled", id, exchange.ticket);
                on_change(event);
                Ok(SubmitOutcome::Settled)
            }
            None => {
                log::debug!(
                    "[chat] dropping late answer for widget {} exchange {}",
                    id,
                    exchange.ticket
                );
                Ok(SubmitOutcome::Discarded)
            }
        }
    }
}

fn snapshot(id: InstanceId, widget: &mut ChatWidget) -> ChatEvent {
    ChatEvent {
        widget_id: id,
        view: widget.render(),
        scroll_to: widget.take_scroll_request(),
    }
}
