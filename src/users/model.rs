use std::fmt;

use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
///
/// `password_hash` is only ever written through [`User::set_password`] or
/// given verbatim to [`User::new`] when loading/bootstrapping a record. It is
/// never serialized.
#[derive(Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl User {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        username: impl Into<String>,
        password_hash: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            username: username.into(),
            password_hash,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("username", &self.username)
            .field(
                "password_hash",
                &self.password_hash.as_ref().map(|_| "[REDACTED]"),
            )
            .field("created_at", &self.created_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(hash: Option<&str>) -> User {
        User::new("A", "B", "a@example.com", "user1", hash.map(String::from))
    }

    #[test]
    fn bootstrap_hash_is_kept_verbatim() {
        let user = sample(Some("initial"));
        assert_eq!(user.password_hash.as_deref(), Some("initial"));
        assert_eq!(user.first_name, "A");
        assert_eq!(user.username, "user1");
    }

    #[test]
    fn each_user_gets_its_own_id() {
        assert_ne!(sample(None).id, sample(None).id);
    }

    #[test]
    fn serialization_never_includes_the_hash() {
        let user = sample(Some("$argon2id$v=19$secret"));
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "a@example.com");
        assert!(!json.to_string().contains("secret"));
    }

    #[test]
    fn debug_output_redacts_the_hash() {
        let user = sample(Some("$argon2id$v=19$secret"));
        let dbg = format!("{user:?}");
        assert!(dbg.contains("[REDACTED]"));
        assert!(!dbg.contains("secret"));
    }
}
