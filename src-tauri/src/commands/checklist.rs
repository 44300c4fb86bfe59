use crate::api::ResourceId;
use crate::checklist::{ChecklistHub, ChecklistView, SaveOutcome};
use crate::instances::InstanceId;
use serde::Serialize;
use tauri::{AppHandle, Emitter, Manager, State};
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};

const CHECKLIST_EVENT: &str = "checklist-updated";

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChecklistEvent {
    board_id: InstanceId,
    view: ChecklistView,
}

/// Mount a board and start its template fetch. The view arrives through a
/// `checklist-updated` event.
#[tauri::command]
pub fn checklist_mount(app: AppHandle, hub: State<'_, ChecklistHub>) -> InstanceId {
    let board_id = hub.mount();
    tauri::async_runtime::spawn(async move {
        let hub = app.state::<ChecklistHub>();
        match hub.load(&board_id).await {
            Ok(Some(view)) => {
                let _ = app.emit(CHECKLIST_EVENT, ChecklistEvent { board_id, view });
            }
            Ok(None) => {}
            Err(e) => log::debug!("[checklist] load skipped: {}", e),
        }
    });
    board_id
}

#[tauri::command]
pub fn checklist_unmount(hub: State<'_, ChecklistHub>, board_id: InstanceId) -> bool {
    hub.unmount(&board_id)
}

#[tauri::command]
pub fn checklist_view(
    hub: State<'_, ChecklistHub>,
    board_id: InstanceId,
) -> Result<ChecklistView, String> {
    hub.view(&board_id).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn checklist_set_done(
    hub: State<'_, ChecklistHub>,
    board_id: InstanceId,
    item_id: ResourceId,
) -> Result<ChecklistView, String> {
    hub.update(&board_id, |board| {
        board.set_done(item_id);
        board.render()
    })
    .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn checklist_set_not_done(
    hub: State<'_, ChecklistHub>,
    board_id: InstanceId,
    item_id: ResourceId,
) -> Result<ChecklistView, String> {
    hub.update(&board_id, |board| {
        board.set_not_done(item_id);
        board.render()
    })
    .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn checklist_reset(
    hub: State<'_, ChecklistHub>,
    board_id: InstanceId,
) -> Result<ChecklistView, String> {
    hub.update(&board_id, |board| {
        board.reset_all();
        board.render()
    })
    .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn checklist_save(
    app: AppHandle,
    hub: State<'_, ChecklistHub>,
    board_id: InstanceId,
) -> Result<SaveOutcome, String> {
    let outcome = hub
        .update(&board_id, |board| board.save())
        .map_err(|e| e.to_string())?;
    let SaveOutcome::NotImplemented { notice } = &outcome;
    app.dialog()
        .message(*notice)
        .title("체크리스트 저장")
        .kind(MessageDialogKind::Info)
        .show(|_| {});
    Ok(outcome)
}
