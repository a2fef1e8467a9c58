//! Authenticated session state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Profile of the logged-in user as returned at login.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: u64,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl UserProfile {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TenantInfo {
    pub id: u64,
    pub tenant_code: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub client_code: Option<String>,
}

/// Body of the login and refresh responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub user_profile: Option<UserProfile>,
    #[serde(default)]
    pub tenant_info: Option<TenantInfo>,
}

/// Everything persisted locally between runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<UserProfile>,
    pub tenant: Option<TenantInfo>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.user, &self.tenant) {
            (Some(user), tenant) => {
                let name = user.full_name.as_deref().unwrap_or(&user.email);
                writeln!(f, "# {name}")?;
                writeln!(f)?;
                writeln!(f, "**Email:** {}", user.email)?;
                if let Some(tenant) = tenant {
                    writeln!(
                        f,
                        "**Tenant:** {} ({})",
                        tenant.name.as_deref().unwrap_or("-"),
                        tenant.tenant_code
                    )?;
                }
                if !user.roles.is_empty() {
                    writeln!(f, "**Roles:** {}", user.roles.join(", "))?;
                }
                Ok(())
            }
            (None, _) => writeln!(f, "Not logged in."),
        }
    }
}
