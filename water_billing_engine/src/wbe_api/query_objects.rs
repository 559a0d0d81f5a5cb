use serde::{Deserialize, Serialize};

use crate::db_types::Role;

/// Filter for user searches. All fields are optional; an empty filter matches everyone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserQueryFilter {
    pub role: Option<Role>,
    pub purok: Option<String>,
    /// Substring match on the full name.
    pub name: Option<String>,
}

impl UserQueryFilter {
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_purok<S: Into<String>>(mut self, purok: S) -> Self {
        self.purok = Some(purok.into());
        self
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.role.is_none() && self.purok.is_none() && self.name.is_none()
    }
}

impl std::fmt::Display for UserQueryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "all users");
        }
        let mut terms = vec![];
        if let Some(role) = &self.role {
            terms.push(format!("role={role}"));
        }
        if let Some(purok) = &self.purok {
            terms.push(format!("purok={purok}"));
        }
        if let Some(name) = &self.name {
            terms.push(format!("name~{name}"));
        }
        write!(f, "{}", terms.join(","))
    }
}
