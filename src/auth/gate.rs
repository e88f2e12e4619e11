use crate::auth::guard::{AuthRejection, Authenticated};
use crate::auth::user::Role;

/// Role check that runs after the access guard
#[derive(Debug, Clone, Copy)]
pub struct RoleGate {
    required: Role,
}

impl RoleGate {
    pub fn require(required: Role) -> Self {
        Self { required }
    }

    pub fn required(&self) -> Role {
        self.required
    }

    /// Compares the role claim against the required role.
    /// No identity means the guard did not run; that never passes.
    pub fn check(&self, auth: Option<&Authenticated>) -> Result<(), AuthRejection> {
        let auth = auth.ok_or_else(|| {
            log::error!("Role gate evaluated without an authenticated identity");
            AuthRejection::MissingIdentity
        })?;

        if auth.claims.role == self.required {
            Ok(())
        } else {
            Err(AuthRejection::RoleMismatch)
        }
    }
}
