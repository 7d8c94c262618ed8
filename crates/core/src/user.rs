use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Site-wide role attached to a user account.
///
/// Stored and serialized as the uppercase strings `USER`, `VENDOR`, `ADMIN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Vendor,
    Admin,
}

impl Role {
    /// Returns true if this role grants access to admin-only surfaces.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Returns true if this role grants access to the vendor dashboard.
    pub fn is_vendor(&self) -> bool {
        matches!(self, Role::Vendor)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "USER"),
            Self::Vendor => write!(f, "VENDOR"),
            Self::Admin => write!(f, "ADMIN"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USER" => Ok(Role::User),
            "VENDOR" => Ok(Role::Vendor),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(format!("Unknown role: {s}")),
        }
    }
}

/// A registered account.
///
/// The password hash is a PHC-format argon2 string and is never serialized.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub name: String,
    pub image: Option<String>,
    pub dietary_restrictions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with the USER role and a name derived from the email.
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        let email = email.into();
        let name = crate::auth::email_to_name(&email);
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash: password_hash.into(),
            role: Role::User,
            name,
            image: None,
            dietary_restrictions: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the role for this user.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Sets the display name for this user.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the profile image URL for this user.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Sets the dietary restrictions for this user.
    pub fn with_dietary_restrictions(mut self, restrictions: Vec<String>) -> Self {
        self.dietary_restrictions = restrictions;
        self
    }
}
