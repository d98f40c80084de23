//! User records as served by the remote directory.

use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// A single user entry of the directory.
///
/// The local copy is a cache of the server's record; it is only mutated to
/// mirror an acknowledged update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: String,
}

impl UserRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Case-insensitive substring match against email, first and last name.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        [&self.email, &self.first_name, &self.last_name]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }

    /// Splice the present fields of `patch` into this record.
    pub fn apply(&mut self, patch: &UserPatch) {
        if let Some(first_name) = &patch.first_name {
            self.first_name.clone_from(first_name);
        }
        if let Some(last_name) = &patch.last_name {
            self.last_name.clone_from(last_name);
        }
        if let Some(email) = &patch.email {
            self.email.clone_from(email);
        }
    }
}

/// Partial update of the editable fields of a [`UserRecord`].
///
/// Absent fields are left out of the wire body and untouched locally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserPatch {
    pub fn first_name(mut self, value: impl Into<String>) -> Self {
        self.first_name = Some(value.into());
        self
    }

    pub fn last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name = Some(value.into());
        self
    }

    pub fn email(mut self, value: impl Into<String>) -> Self {
        self.email = Some(value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> UserRecord {
        UserRecord {
            id: UserId::new(2),
            email: "janet.weaver@reqres.in".to_string(),
            first_name: "Janet".to_string(),
            last_name: "Weaver".to_string(),
            avatar: "https://reqres.in/img/faces/2-image.jpg".to_string(),
        }
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let mut user = sample();
        user.apply(&UserPatch::default().first_name("Jane"));

        assert_eq!(user.first_name, "Jane");
        assert_eq!(user.last_name, "Weaver");
        assert_eq!(user.email, "janet.weaver@reqres.in");
        assert_eq!(user.id, UserId::new(2));
    }

    #[test]
    fn matching_is_case_insensitive_on_any_field() {
        let user = sample();
        assert!(user.matches_lowercase("janet"));
        assert!(user.matches_lowercase("weav"));
        assert!(user.matches_lowercase("@reqres"));
        assert!(!user.matches_lowercase("emma"));
    }

    #[test]
    fn patch_serializes_only_present_fields() {
        let patch = UserPatch::default().last_name("Doe");
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "last_name": "Doe" }));
        assert!(!patch.is_empty());
        assert!(UserPatch::default().is_empty());
    }

    #[test]
    fn record_deserializes_from_directory_shape() {
        let user: UserRecord = serde_json::from_value(serde_json::json!({
            "id": 7,
            "email": "michael.lawson@reqres.in",
            "first_name": "Michael",
            "last_name": "Lawson",
            "avatar": "https://reqres.in/img/faces/7-image.jpg"
        }))
        .unwrap();
        assert_eq!(user.id, UserId::new(7));
        assert_eq!(user.full_name(), "Michael Lawson");
    }
}
