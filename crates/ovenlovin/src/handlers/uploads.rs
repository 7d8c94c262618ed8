//! Image upload handlers.
//!
//! Uploads arrive as multipart form data. The file is validated against the
//! size limit and format allow-list, re-encoded as WebP, written to the blob
//! store, and recorded in the image metadata table.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Response,
    Json,
};
use uuid::Uuid;

use ovenlovin_auth::CurrentUser;
use ovenlovin_core::media::UploadedImage;

use crate::{
    blob::processing::{process_image, MAX_FILE_SIZE},
    handlers::error::{error_response, not_found, storage_error},
    state::AppState,
};

/// Upload an image (POST /api/upload).
///
/// Expects a multipart `file` field. The stored blob lands under
/// `recipes/<id>.webp` and is served from `/uploads/`.
pub async fn upload_image(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadedImage>), Response> {
    let mut data = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error_response(StatusCode::BAD_REQUEST, format!("Invalid multipart body: {e}"))
    })? {
        if field.name() == Some("file") {
            let bytes = field.bytes().await.map_err(|e| {
                error_response(StatusCode::BAD_REQUEST, format!("Failed to read file: {e}"))
            })?;
            data = Some(bytes);
            break;
        }
    }

    let data = data.ok_or_else(|| {
        error_response(StatusCode::BAD_REQUEST, "A file field is required")
    })?;

    if data.len() > MAX_FILE_SIZE {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            format!("File exceeds the {} MiB limit", MAX_FILE_SIZE / (1024 * 1024)),
        ));
    }

    // Format sniffing and validation happen on the bytes; the content-type
    // header is not trusted.
    let webp = process_image(&data)
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, e))?;

    let id = Uuid::new_v4();
    let pathname = format!("recipes/{id}.webp");
    let url = state.blobs.put(&pathname, &webp).await.map_err(|e| {
        tracing::error!(pathname = %pathname, error = %e, "Failed to store image blob");
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to store image")
    })?;

    let mut image = UploadedImage::new(url, pathname, webp.len() as u64, &user.email);
    image.id = id;
    state
        .images
        .create_image(&image)
        .await
        .map_err(storage_error)?;

    tracing::info!(image_id = %image.id, owner = %image.owner, size = image.size, "Uploaded image");

    Ok((StatusCode::CREATED, Json(image)))
}

/// Delete an uploaded image (DELETE /api/upload/{id}). Owner only.
pub async fn delete_image(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, Response> {
    let image = state
        .images
        .get_image(id)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| not_found("UploadedImage", id))?;

    if image.owner != user.email {
        return Err(error_response(
            StatusCode::FORBIDDEN,
            "No access to this image",
        ));
    }

    state.blobs.delete(&image.pathname).await.map_err(|e| {
        tracing::error!(image_id = %id, error = %e, "Failed to delete image blob");
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete image")
    })?;
    state.images.delete_image(id).await.map_err(storage_error)?;

    tracing::info!(image_id = %id, "Deleted image");

    Ok(StatusCode::NO_CONTENT)
}

/// List the caller's uploads, newest first (GET /api/uploads).
pub async fn list_images(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<UploadedImage>>, Response> {
    let images = state
        .images
        .list_images_by_owner(&user.email)
        .await
        .map_err(storage_error)?;
    Ok(Json(images))
}
