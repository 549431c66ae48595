use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AppError;

/// Closed set of caller roles. Roles carry no hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// Operators allowed to maintain stock data.
    Admin,
    /// Regular staff; usually read-only.
    #[serde(alias = "Users")]
    User,
}

impl Role {
    /// Returns a stable storage value for the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::User => "User",
        }
    }

    /// Returns all known roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[Role::Admin, Role::User]
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Admin" => Ok(Self::Admin),
            "User" | "Users" => Ok(Self::User),
            _ => Err(AppError::Validation(format!("unknown role '{value}'"))),
        }
    }
}

/// Acting identity handed to every gateway operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Caller {
    subject: String,
    roles: Vec<Role>,
    is_superuser: bool,
}

impl Caller {
    /// Creates a caller from its subject, role set and superuser flag.
    #[must_use]
    pub fn new(subject: impl Into<String>, roles: Vec<Role>, is_superuser: bool) -> Self {
        let mut deduplicated = Vec::with_capacity(roles.len());
        for role in roles {
            if !deduplicated.contains(&role) {
                deduplicated.push(role);
            }
        }

        Self {
            subject: subject.into(),
            roles: deduplicated,
            is_superuser,
        }
    }

    /// Creates a superuser caller without any role membership.
    #[must_use]
    pub fn superuser(subject: impl Into<String>) -> Self {
        Self::new(subject, Vec::new(), true)
    }

    /// Creates a caller holding exactly one role.
    #[must_use]
    pub fn with_role(subject: impl Into<String>, role: Role) -> Self {
        Self::new(subject, vec![role], false)
    }

    /// Returns the stable subject (username).
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the caller's roles in membership order.
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Returns whether the caller holds a role.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Returns the superuser override flag.
    #[must_use]
    pub fn is_superuser(&self) -> bool {
        self.is_superuser
    }

    /// Returns the first role, used for display only.
    #[must_use]
    pub fn primary_role(&self) -> Option<Role> {
        self.roles.first().copied()
    }
}
