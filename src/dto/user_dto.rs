use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::model::user::{Role, User};

/// Identity embedded wherever a response references a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Option<Role>,
}

impl UserSummary {
    /// Placeholder for references to accounts that no longer resolve.
    pub fn unknown(id: &ObjectId) -> Self {
        UserSummary {
            id: id.to_hex(),
            name: "Unknown user".to_string(),
            email: String::new(),
            role: None,
        }
    }
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        UserSummary {
            id: user.id.to_hex(),
            name: user.full_name(),
            email: user.email.clone(),
            role: Some(user.role),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AssignableUsersQuery {
    pub role: Role,
}
