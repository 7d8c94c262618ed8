//! Authorization helpers for API handlers.
//!
//! Role and ownership checks shared by the mutation handlers. Failures map
//! to HTTP 403 Forbidden and are logged with `tracing::warn!`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use ovenlovin_core::user::{Role, User};

/// Authorization error that maps to HTTP 403 Forbidden.
#[derive(Debug)]
pub enum AuthzError {
    /// Caller is neither the owner of the resource nor an admin.
    NotOwner { entity: &'static str, id: String },
    /// Caller's role does not grant access to this surface.
    RoleRequired { required: Role },
}

impl IntoResponse for AuthzError {
    fn into_response(self) -> Response {
        match self {
            Self::NotOwner { entity, id } => {
                tracing::warn!(entity = %entity, id = %id, "Authorization denied: not owner");
                (StatusCode::FORBIDDEN, format!("No access to this {entity}")).into_response()
            }
            Self::RoleRequired { required } => {
                tracing::warn!(required = %required, "Authorization denied: role required");
                (StatusCode::FORBIDDEN, format!("Requires {required} role")).into_response()
            }
        }
    }
}

/// Requires the caller to own the resource (by email) or be an admin.
pub fn require_owner_or_admin(
    user: &User,
    owner: &str,
    entity: &'static str,
    id: impl ToString,
) -> Result<(), AuthzError> {
    if user.role.is_admin() || user.email == owner {
        Ok(())
    } else {
        Err(AuthzError::NotOwner {
            entity,
            id: id.to_string(),
        })
    }
}

/// Requires the ADMIN role.
pub fn require_admin(user: &User) -> Result<(), AuthzError> {
    if user.role.is_admin() {
        Ok(())
    } else {
        Err(AuthzError::RoleRequired {
            required: Role::Admin,
        })
    }
}

/// Requires the VENDOR role. Admins do not pass: the vendor surfaces
/// operate on the caller's own vendor row, which admins do not have.
pub fn require_vendor(user: &User) -> Result<(), AuthzError> {
    if user.role.is_vendor() {
        Ok(())
    } else {
        Err(AuthzError::RoleRequired {
            required: Role::Vendor,
        })
    }
}
