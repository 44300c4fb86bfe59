use crate::chat::{ChatEvent, ChatHub, ChatView, Key, ReferenceStyle, SubmitOutcome, WidgetAction};
use crate::instances::InstanceId;
use tauri::{AppHandle, Emitter, State};
use uuid::Uuid;

const CHAT_EVENT: &str = "chat-updated";

fn emitter(app: &AppHandle) -> impl Fn(ChatEvent) + Send + '_ {
    move |event| {
        let _ = app.emit(CHAT_EVENT, event);
    }
}

/// The session id comes from the caller; the widget never invents one.
#[tauri::command]
pub fn chat_mount(
    hub: State<'_, ChatHub>,
    session_id: i64,
    style: Option<ReferenceStyle>,
) -> InstanceId {
    hub.mount(session_id, style.unwrap_or_default())
}

#[tauri::command]
pub fn chat_unmount(hub: State<'_, ChatHub>, widget_id: InstanceId) -> bool {
    hub.unmount(&widget_id)
}

#[tauri::command]
pub fn chat_view(
    hub: State<'_, ChatHub>,
    widget_id: InstanceId,
) -> Result<Option<ChatView>, String> {
    hub.view(&widget_id).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn chat_toggle_open(
    app: AppHandle,
    hub: State<'_, ChatHub>,
    widget_id: InstanceId,
) -> Result<ChatEvent, String> {
    let event = hub
        .update(&widget_id, WidgetAction::ToggleOpen)
        .map_err(|e| e.to_string())?;
    emitter(&app)(event.clone());
    Ok(event)
}

#[tauri::command]
pub fn chat_set_draft(
    hub: State<'_, ChatHub>,
    widget_id: InstanceId,
    text: String,
) -> Result<(), String> {
    hub.update(&widget_id, WidgetAction::SetDraft(text))
        .map(|_| ())
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn chat_key(
    app: AppHandle,
    hub: State<'_, ChatHub>,
    widget_id: InstanceId,
    key: Key,
) -> Result<SubmitOutcome, String> {
    hub.press_key(&widget_id, key, emitter(&app))
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn chat_submit(
    app: AppHandle,
    hub: State<'_, ChatHub>,
    widget_id: InstanceId,
) -> Result<SubmitOutcome, String> {
    hub.click_submit(&widget_id, emitter(&app))
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn chat_toggle_references(
    app: AppHandle,
    hub: State<'_, ChatHub>,
    widget_id: InstanceId,
    turn_id: Uuid,
) -> Result<ChatEvent, String> {
    let event = hub
        .update(&widget_id, WidgetAction::ToggleReferences(turn_id))
        .map_err(|e| e.to_string())?;
    emitter(&app)(event.clone());
    Ok(event)
}
