use tauri::State;
use uuid::Uuid;

use crate::{
    dashboard::DashboardView,
    models::HourlyField,
    session::{SessionController, SessionSnapshot},
    AppState,
};

fn controller_from_state(state: &State<'_, AppState>) -> SessionController {
    state.session.clone()
}

#[tauri::command]
pub async fn get_dashboard(state: State<'_, AppState>) -> Result<DashboardView, String> {
    let controller = controller_from_state(&state);
    Ok(controller.dashboard().await)
}

#[tauri::command]
pub async fn request_edit(state: State<'_, AppState>) -> Result<SessionSnapshot, String> {
    let controller = controller_from_state(&state);
    controller.request_edit().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn submit_email(
    state: State<'_, AppState>,
    email: String,
) -> Result<SessionSnapshot, String> {
    let controller = controller_from_state(&state);
    controller
        .submit_email(&email)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn cancel_email_capture(state: State<'_, AppState>) -> Result<SessionSnapshot, String> {
    let controller = controller_from_state(&state);
    controller
        .cancel_email_capture()
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn edit_field(
    state: State<'_, AppState>,
    index: usize,
    field: HourlyField,
    value: String,
) -> Result<SessionSnapshot, String> {
    let controller = controller_from_state(&state);
    controller
        .edit_field(index, field, &value)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn cancel_edit(state: State<'_, AppState>) -> Result<SessionSnapshot, String> {
    let controller = controller_from_state(&state);
    controller.cancel_edit().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn request_save(state: State<'_, AppState>) -> Result<SessionSnapshot, String> {
    let controller = controller_from_state(&state);
    controller.request_save().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn confirm_overwrite(state: State<'_, AppState>) -> Result<SessionSnapshot, String> {
    let controller = controller_from_state(&state);
    controller
        .confirm_overwrite()
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn cancel_overwrite(state: State<'_, AppState>) -> Result<SessionSnapshot, String> {
    let controller = controller_from_state(&state);
    controller
        .cancel_overwrite()
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn dismiss_notification(
    state: State<'_, AppState>,
    id: Uuid,
) -> Result<SessionSnapshot, String> {
    let controller = controller_from_state(&state);
    Ok(controller.dismiss_notification(id).await)
}
