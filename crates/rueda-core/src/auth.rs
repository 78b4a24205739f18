//! # Roles and Permissions
//!
//! Who may do what at the counter. Credentials are checked by the backend's
//! `/auth` endpoint; this module only maps the returned role to a fixed
//! permission set.
//!
//! ```text
//!                 Manage    Manage   Adjust            View     Manage
//!                 Inventory Clients  Balances  Sell    Reports  Settings
//!  admin             ✓         ✓        ✓       ✓        ✓         ✓
//!  manager           ✓         ✓        ✓       ✓        ✓
//!  cashier                     ✓                ✓
//!  technician        ✓
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::flexible_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    Cashier,
    Technician,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ManageInventory,
    ManageClients,
    AdjustBalances,
    Sell,
    ViewReports,
    ManageSettings,
}

impl Permission {
    /// Verb phrase used in "cashier users cannot ..." messages.
    pub fn action(&self) -> &'static str {
        match self {
            Permission::ManageInventory => "manage inventory",
            Permission::ManageClients => "manage clients",
            Permission::AdjustBalances => "adjust client balances",
            Permission::Sell => "register sales",
            Permission::ViewReports => "view reports",
            Permission::ManageSettings => "change settings",
        }
    }
}

impl Role {
    pub fn permissions(&self) -> &'static [Permission] {
        use Permission::*;
        match self {
            Role::Admin => &[
                ManageInventory,
                ManageClients,
                AdjustBalances,
                Sell,
                ViewReports,
                ManageSettings,
            ],
            Role::Manager => &[ManageInventory, ManageClients, AdjustBalances, Sell, ViewReports],
            Role::Cashier => &[ManageClients, Sell],
            Role::Technician => &[ManageInventory],
        }
    }

    pub fn can(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Cashier => "cashier",
            Role::Technician => "technician",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The logged-in user as returned by `/auth`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    #[serde(deserialize_with = "flexible_id::deserialize")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub role: Role,
}

impl User {
    /// Name for receipts and greetings.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }

    /// Fails with `PermissionDenied` unless the user's role grants `permission`.
    pub fn require(&self, permission: Permission) -> CoreResult<()> {
        if self.role.can(permission) {
            Ok(())
        } else {
            Err(CoreError::PermissionDenied {
                role: self.role.to_string(),
                action: permission.action().to_string(),
            })
        }
    }
}
