use serde::{Deserialize, Serialize};
use std::fmt;

/// The authenticated user's profile, as issued by the login flow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: String,
}

impl Identity {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        avatar: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            avatar: avatar.into(),
        }
    }

    /// The fixed profile handed out by the mocked Google sign-in.
    pub fn mock() -> Self {
        Self::new(
            "google-oauth2|1029384756",
            "Nova User",
            "nova.user@gmail.com",
            "https://api.dicebear.com/7.x/avataaars/svg?seed=Nova",
        )
    }

    /// The subset of the profile that is sent along with every exchange.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_drops_avatar() {
        let identity = Identity::mock();
        let json = serde_json::to_value(identity.profile()).unwrap();

        assert_eq!(json["id"], identity.id);
        assert_eq!(json["email"], identity.email);
        assert!(json.get("avatar").is_none());
    }
}
