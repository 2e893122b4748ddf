//! Handlers for shotlist items: `/shotlists/{shotlist_id}/items` and
//! `/shotlist-items/{id}`.

use std::io::ErrorKind;
use std::path::Path as FsPath;

use axum::body::Bytes;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use callsheet_core::error::CoreError;
use callsheet_core::reference_image::inspect_reference_image;
use callsheet_core::types::DbId;
use callsheet_core::validation::{
    validate_custom_properties, validate_fps, validate_optional_required_text,
    validate_optional_text, validate_required_text, validate_shot_duration, validate_shot_type,
    validate_time_of_day, MAX_ASPECT_RATIO_LENGTH, MAX_CAMERA_ANGLE_LENGTH, MAX_SHORT_TEXT_LENGTH,
    MAX_SHOT_NAME_LENGTH,
};
use callsheet_db::models::shotlist_item::{
    CreateShotlistItem, ReorderRequest, ShotlistItem, UpdateShotlistItem,
};
use callsheet_db::repositories::{ReorderOutcome, ShotlistItemRepo};
use chrono::Utc;

use crate::error::{AppError, AppResult};
use crate::handlers::access::{ensure_item_owner, ensure_shotlist_owner};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Sub-directory of the upload root holding reference images.
pub const REFERENCE_IMAGE_DIR: &str = "shotlist_items";

/// File name of a reference image stored by the upload endpoint, or `None`
/// when `relative_path` points anywhere else.
fn stored_image_file_name(relative_path: &str) -> Option<&str> {
    let file_name = relative_path
        .strip_prefix(REFERENCE_IMAGE_DIR)?
        .strip_prefix('/')?;
    if file_name.is_empty() || file_name.starts_with('.') || file_name.contains(['/', '\\']) {
        return None;
    }
    Some(file_name)
}

/// Remove a previously stored reference image. Failures are logged, not
/// returned.
async fn remove_stored_image(upload_dir: &FsPath, relative_path: &str) {
    let Some(file_name) = stored_image_file_name(relative_path) else {
        return;
    };
    let path = upload_dir.join(REFERENCE_IMAGE_DIR).join(file_name);
    match tokio::fs::remove_file(&path).await {
        Ok(()) => tracing::debug!(path = %path.display(), "Reference image removed"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "Failed to remove reference image"),
    }
}

/// Field checks shared by create and update.
struct ItemFields<'a> {
    shot_type: Option<&'a str>,
    time_of_day: Option<&'a str>,
    shot_duration: Option<i32>,
    fps: Option<i32>,
    camera_angle: Option<&'a str>,
    aspect_ratio: Option<&'a str>,
    shot_reference_image: Option<&'a str>,
    custom_properties: Option<&'a serde_json::Value>,
}

impl ItemFields<'_> {
    fn validate(&self) -> Result<(), CoreError> {
        if let Some(shot_type) = self.shot_type {
            validate_shot_type(shot_type)?;
        }
        if let Some(time_of_day) = self.time_of_day {
            validate_time_of_day(time_of_day)?;
        }
        if let Some(minutes) = self.shot_duration {
            validate_shot_duration(minutes)?;
        }
        if let Some(fps) = self.fps {
            validate_fps(fps)?;
        }
        validate_optional_text("camera_angle", self.camera_angle, MAX_CAMERA_ANGLE_LENGTH)?;
        validate_optional_text("aspect_ratio", self.aspect_ratio, MAX_ASPECT_RATIO_LENGTH)?;
        validate_optional_text(
            "shot_reference_image",
            self.shot_reference_image,
            MAX_SHORT_TEXT_LENGTH,
        )?;
        if let Some(props) = self.custom_properties {
            validate_custom_properties(props)?;
        }
        Ok(())
    }
}

fn validate_create(input: &CreateShotlistItem) -> Result<(), CoreError> {
    validate_required_text("shot_name", &input.shot_name, MAX_SHOT_NAME_LENGTH)?;
    ItemFields {
        shot_type: input.shot_type.as_deref(),
        time_of_day: input.time_of_day.as_deref(),
        shot_duration: input.shot_duration,
        fps: input.fps,
        camera_angle: input.camera_angle.as_deref(),
        aspect_ratio: input.aspect_ratio.as_deref(),
        shot_reference_image: None,
        custom_properties: input.custom_properties.as_ref(),
    }
    .validate()
}

fn validate_update(input: &UpdateShotlistItem) -> Result<(), CoreError> {
    validate_optional_required_text("shot_name", input.shot_name.as_deref(), MAX_SHOT_NAME_LENGTH)?;
    ItemFields {
        shot_type: input.shot_type.as_deref(),
        time_of_day: input.time_of_day.as_deref(),
        shot_duration: input.shot_duration,
        fps: input.fps,
        camera_angle: input.camera_angle.as_deref(),
        aspect_ratio: input.aspect_ratio.as_deref(),
        shot_reference_image: input.shot_reference_image.as_deref(),
        custom_properties: input.custom_properties.as_ref(),
    }
    .validate()
}

/// GET /api/v1/shotlists/{shotlist_id}/items
pub async fn list_by_shotlist(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(shotlist_id): Path<DbId>,
) -> AppResult<Json<Vec<ShotlistItem>>> {
    ensure_shotlist_owner(&state.pool, shotlist_id, auth_user.user_id).await?;
    let items = ShotlistItemRepo::list_by_shotlist(&state.pool, shotlist_id).await?;
    Ok(Json(items))
}

/// POST /api/v1/shotlists/{shotlist_id}/items
///
/// The new item is appended after the current last item.
pub async fn create(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(shotlist_id): Path<DbId>,
    Json(input): Json<CreateShotlistItem>,
) -> AppResult<(StatusCode, Json<ShotlistItem>)> {
    ensure_shotlist_owner(&state.pool, shotlist_id, auth_user.user_id).await?;
    validate_create(&input)?;

    let item = ShotlistItemRepo::create(&state.pool, shotlist_id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Shotlist", shotlist_id))?;
    tracing::info!(
        item_id = item.id,
        shotlist_id,
        order_index = item.order_index,
        "Shotlist item created"
    );
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/v1/shotlists/{shotlist_id}/items/reorder
///
/// Applies `(item_id, new_index)` moves and recomputes start times from the
/// shotlist's call time. Returns every item in its new order.
pub async fn reorder(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(shotlist_id): Path<DbId>,
    Json(input): Json<ReorderRequest>,
) -> AppResult<Json<Vec<ShotlistItem>>> {
    ensure_shotlist_owner(&state.pool, shotlist_id, auth_user.user_id).await?;

    match ShotlistItemRepo::reorder(&state.pool, shotlist_id, &input.items).await? {
        ReorderOutcome::Applied {
            items,
            next_free_slot,
        } => {
            tracing::info!(
                shotlist_id,
                user_id = auth_user.user_id,
                moves = input.items.len(),
                next_free_slot = ?next_free_slot,
                "Shotlist items reordered"
            );
            Ok(Json(items))
        }
        ReorderOutcome::ShotlistNotFound => Err(AppError::not_found("Shotlist", shotlist_id)),
        ReorderOutcome::Rejected(err) => {
            tracing::info!(shotlist_id, error = %err, "Shotlist reorder rejected");
            Err(AppError::Core(err))
        }
    }
}

/// GET /api/v1/shotlist-items/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ShotlistItem>> {
    ensure_item_owner(&state.pool, id, auth_user.user_id).await?;
    let item = ShotlistItemRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("ShotlistItem", id))?;
    Ok(Json(item))
}

/// PUT /api/v1/shotlist-items/{id}
///
/// Partial update. Position is not writable here; use the reorder endpoint.
pub async fn update(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateShotlistItem>,
) -> AppResult<Json<ShotlistItem>> {
    ensure_item_owner(&state.pool, id, auth_user.user_id).await?;
    validate_update(&input)?;
    let item = ShotlistItemRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("ShotlistItem", id))?;
    Ok(Json(item))
}

/// DELETE /api/v1/shotlist-items/{id}
///
/// Later items in the same shotlist move up one position. The item's stored
/// reference image is removed with it.
pub async fn delete(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_item_owner(&state.pool, id, auth_user.user_id).await?;
    let image = ShotlistItemRepo::find_by_id(&state.pool, id)
        .await?
        .and_then(|item| item.shot_reference_image);
    if ShotlistItemRepo::delete(&state.pool, id).await? {
        tracing::info!(item_id = id, user_id = auth_user.user_id, "Shotlist item deleted");
        if let Some(image) = image {
            remove_stored_image(&state.config.upload_dir, &image).await;
        }
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("ShotlistItem", id))
    }
}

/// POST /api/v1/shotlist-items/{id}/toggle-complete
pub async fn toggle_complete(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ShotlistItem>> {
    ensure_item_owner(&state.pool, id, auth_user.user_id).await?;
    let item = ShotlistItemRepo::toggle_completed(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("ShotlistItem", id))?;
    Ok(Json(item))
}

/// POST /api/v1/shotlist-items/{id}/reference-image
///
/// Multipart upload with a single `file` field. The image is stored as-is
/// under `{UPLOAD_DIR}/shotlist_items/` and its relative path is saved on
/// the item. A previously uploaded image is removed once the new path is
/// saved; the new file is removed again if saving fails.
pub async fn upload_reference_image(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<Json<ShotlistItem>> {
    ensure_item_owner(&state.pool, id, auth_user.user_id).await?;
    let previous = ShotlistItemRepo::find_by_id(&state.pool, id)
        .await?
        .and_then(|item| item.shot_reference_image);

    let mut upload: Option<(Option<String>, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() == Some("file") {
            let content_type = field.content_type().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            upload = Some((content_type, data));
            break;
        }
    }
    let (content_type, data) = upload
        .ok_or_else(|| AppError::BadRequest("Missing multipart field 'file'".into()))?;

    let info = inspect_reference_image(content_type.as_deref(), &data, state.config.max_upload_bytes)?;

    let relative_path = format!(
        "{REFERENCE_IMAGE_DIR}/{id}_{}.{}",
        Utc::now().timestamp_millis(),
        info.extension()
    );
    let dir = state.config.upload_dir.join(REFERENCE_IMAGE_DIR);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to create upload dir: {e}")))?;
    tokio::fs::write(state.config.upload_dir.join(&relative_path), &data)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store upload: {e}")))?;

    let item = match ShotlistItemRepo::set_reference_image(&state.pool, id, &relative_path).await {
        Ok(Some(item)) => item,
        Ok(None) => {
            remove_stored_image(&state.config.upload_dir, &relative_path).await;
            return Err(AppError::not_found("ShotlistItem", id));
        }
        Err(e) => {
            remove_stored_image(&state.config.upload_dir, &relative_path).await;
            return Err(e.into());
        }
    };
    if let Some(previous) = previous.filter(|p| *p != relative_path) {
        remove_stored_image(&state.config.upload_dir, &previous).await;
    }

    tracing::info!(
        item_id = id,
        path = %relative_path,
        width = info.width,
        height = info.height,
        bytes = data.len(),
        "Reference image stored"
    );
    Ok(Json(item))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_image_file_name_accepts_upload_paths() {
        assert_eq!(
            stored_image_file_name("shotlist_items/7_1700000000000.png"),
            Some("7_1700000000000.png")
        );
    }

    #[test]
    fn stored_image_file_name_rejects_foreign_paths() {
        for path in [
            "keep.png",
            "shotlist_items/",
            "shotlist_items/../secrets.txt",
            "shotlist_items/nested/a.png",
            "shotlist_itemsX/a.png",
            "/etc/passwd",
        ] {
            assert_eq!(stored_image_file_name(path), None, "path: {path}");
        }
    }
}
