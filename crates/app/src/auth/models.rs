//! Auth data models.

use jiff::Timestamp;
use uuid::Uuid;

use crate::uuids::TypedUuid;

pub type UserUuid = TypedUuid<User>;
pub type AdminUuid = TypedUuid<Admin>;

/// Who is making a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Identity {
    /// No bearer token, or one that did not resolve.
    #[default]
    Anonymous,

    /// A registered storefront customer.
    User(UserUuid),

    /// An active back-office administrator.
    Admin(AdminUuid),
}

impl Identity {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin(_))
    }

    #[must_use]
    pub fn user(&self) -> Option<UserUuid> {
        match self {
            Self::User(user) => Some(*user),
            Self::Anonymous | Self::Admin(_) => None,
        }
    }
}

/// Storefront customer account.
#[derive(Debug, Clone)]
pub struct User {
    pub uuid: UserUuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub uuid: UserUuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
}

/// Back-office account.
#[derive(Debug, Clone)]
pub struct Admin {
    pub uuid: AdminUuid,
    pub email: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub uuid: AdminUuid,
    pub email: String,
    pub name: String,
}

/// API token issuance result with the one-time raw token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub uuid: Uuid,
    pub token: String,
}

/// Account an API token belongs to.
#[derive(Debug, Clone, Copy)]
pub(crate) enum TokenOwner {
    User(UserUuid),
    Admin(AdminUuid),
}
