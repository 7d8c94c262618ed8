use chrono::Utc;
use serde::Deserialize;

use ovenlovin_core::serde::deserialize_optional_string;
use ovenlovin_core::user::User;

/// Request payload for updating the caller's profile. Absent fields keep
/// their current values.
#[derive(Debug, Deserialize)]
pub struct UpdateProfile {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub image: Option<String>,
    #[serde(default)]
    pub dietary_restrictions: Option<Vec<String>>,
}

impl UpdateProfile {
    /// The normalized new email, when the payload asks to change it.
    pub fn new_email(&self) -> Option<String> {
        self.email.as_ref().map(|e| e.trim().to_lowercase())
    }

    pub fn apply_to(self, user: &mut User) {
        if let Some(email) = self.new_email() {
            user.email = email;
        }
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(image) = self.image {
            user.image = Some(image);
        }
        if let Some(dietary) = self.dietary_restrictions {
            user.dietary_restrictions = dietary;
        }
        user.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_normalized() {
        let payload: UpdateProfile =
            serde_json::from_str(r#"{"email": " John@Foo.COM "}"#).unwrap();
        assert_eq!(payload.new_email().as_deref(), Some("john@foo.com"));
    }

    #[test]
    fn absent_fields_are_kept() {
        let mut user = User::new("john@foo.com", "hash").with_name("John");
        user.dietary_restrictions = vec!["Vegan".to_string()];

        let payload: UpdateProfile = serde_json::from_str(r#"{"name": "Johnny"}"#).unwrap();
        payload.apply_to(&mut user);

        assert_eq!(user.name, "Johnny");
        assert_eq!(user.email, "john@foo.com");
        assert_eq!(user.dietary_restrictions, vec!["Vegan"]);
    }
}
