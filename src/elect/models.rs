// ********* Core entity shapes ***********

use serde::Serialize;

/// Maximum accepted length for usernames and passwords.
pub const USERNAME_MAX: usize = 31;
/// Maximum accepted length for a manifesto text.
pub const MANIFESTO_MAX: usize = 511;

// The reserved bootstrap identity. This exact record must sit first in the
// users file at all times (see the `admin` module).
pub const DEFAULT_ADMIN_USERNAME: &str = "SCDS";
pub const DEFAULT_ADMIN_PASSWORD: &str = "202504";

/// On-disk placeholder for a representative who has not submitted a manifesto yet.
pub const PENDING_MANIFESTO: &str = "Not yet submitted";

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Role {
    Admin,
    Representative,
    Student,
}

impl Role {
    /// The integer stored in the users file for this role.
    pub fn as_wire(&self) -> u8 {
        match self {
            Role::Admin => 0,
            Role::Representative => 1,
            Role::Student => 2,
        }
    }

    pub fn from_wire(x: u8) -> Option<Role> {
        match x {
            0 => Some(Role::Admin),
            1 => Some(Role::Representative),
            2 => Some(Role::Student),
            _ => None,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Account {
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl Account {
    /// True iff this is exactly the reserved bootstrap identity.
    pub fn is_default_admin(&self) -> bool {
        self.role == Role::Admin
            && self.username == DEFAULT_ADMIN_USERNAME
            && self.password == DEFAULT_ADMIN_PASSWORD
    }
}

pub fn default_admin() -> Account {
    Account {
        username: DEFAULT_ADMIN_USERNAME.to_string(),
        password: DEFAULT_ADMIN_PASSWORD.to_string(),
        role: Role::Admin,
    }
}

/// The body of a manifesto record.
///
/// The manifestos file has no notion of an empty manifesto: a representative
/// without one gets a row carrying the `PENDING_MANIFESTO` sentinel instead.
/// In memory the two cases are kept apart; the sentinel only exists at the
/// codec boundary.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ManifestoText {
    Pending,
    Submitted(String),
}

impl ManifestoText {
    pub fn from_raw(s: &str) -> ManifestoText {
        if s == PENDING_MANIFESTO {
            ManifestoText::Pending
        } else {
            ManifestoText::Submitted(s.to_string())
        }
    }

    /// The exact string stored in the manifestos file.
    pub fn as_raw(&self) -> &str {
        match self {
            ManifestoText::Pending => PENDING_MANIFESTO,
            ManifestoText::Submitted(s) => s.as_str(),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ManifestoText::Pending)
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Manifesto {
    pub rep_username: String,
    pub text: ManifestoText,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Vote {
    pub student_username: String,
    pub rep_username: String,
}

/// One row of the published results snapshot.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct ResultEntry {
    pub rep_username: String,
    pub vote_count: u32,
}
