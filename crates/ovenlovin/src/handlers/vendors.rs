//! Vendor handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use ovenlovin_auth::CurrentUser;
use ovenlovin_core::pantry::{Ingredient, Vendor};
use ovenlovin_core::storage::RepositoryError;

use crate::{
    handlers::{
        authz::{require_admin, require_owner_or_admin, require_vendor},
        error::{not_found, storage_error},
    },
    models::UpdateVendor,
    state::AppState,
};

/// Vendor home page data: the profile and its listings.
#[derive(Debug, Serialize)]
pub struct VendorHome {
    #[serde(flatten)]
    pub vendor: Vendor,
    pub ingredients: Vec<Ingredient>,
}

/// List all vendors (GET /api/vendors).
pub async fn list_vendors(State(state): State<AppState>) -> Result<Json<Vec<Vendor>>, Response> {
    let vendors = state.vendors.list_vendors().await.map_err(storage_error)?;
    Ok(Json(vendors))
}

/// Get the caller's vendor profile with its listings (GET /api/vendors/me).
///
/// Requires the VENDOR role; a vendor-role account without a vendor row
/// is a 404.
pub async fn vendor_home(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<VendorHome>, Response> {
    require_vendor(&user).map_err(IntoResponse::into_response)?;

    let vendor = state
        .vendors
        .get_vendor_by_owner(&user.email)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| not_found("Vendor", &user.email))?;

    let ingredients = state
        .ingredients
        .list_ingredients_for_vendor(vendor.id)
        .await
        .map_err(storage_error)?;

    Ok(Json(VendorHome {
        vendor,
        ingredients,
    }))
}

/// Update a vendor profile (PATCH /api/vendors/{id}). Owner or admin only.
///
/// Renaming to a name another vendor holds is a conflict.
pub async fn update_vendor(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVendor>,
) -> Result<Json<Vendor>, Response> {
    let mut vendor = state
        .vendors
        .get_vendor(id)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| not_found("Vendor", id))?;

    require_owner_or_admin(&user, &vendor.owner, "vendor", id)
        .map_err(IntoResponse::into_response)?;

    if let Some(new_name) = &payload.name {
        let existing = state
            .vendors
            .get_vendor_by_name(new_name)
            .await
            .map_err(storage_error)?;
        if existing.is_some_and(|other| other.id != id) {
            return Err(storage_error(RepositoryError::AlreadyExists {
                entity_type: "Vendor",
                id: new_name.clone(),
            }));
        }
    }

    payload.apply_to(&mut vendor);
    state
        .vendors
        .update_vendor(&vendor)
        .await
        .map_err(storage_error)?;

    tracing::info!(vendor_id = %id, "Updated vendor");

    Ok(Json(vendor))
}

/// Delete a vendor and its listings (DELETE /api/vendors/{id}). Admin only.
pub async fn delete_vendor(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, Response> {
    require_admin(&user).map_err(IntoResponse::into_response)?;

    state.vendors.delete_vendor(id).await.map_err(storage_error)?;

    tracing::info!(vendor_id = %id, "Deleted vendor");

    Ok(StatusCode::NO_CONTENT)
}
