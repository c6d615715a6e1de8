//! Screen state
//!
//! One variant per screen, each carrying exactly the data it needs.

use serde::{Deserialize, Serialize};
use shared::models::{User, UserRole};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "screen", rename_all = "kebab-case")]
pub enum Screen {
    #[default]
    Home,
    Shop,
    Category {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sub_category: Option<String>,
    },
    Product {
        id: i64,
    },
    Search {
        query: String,
    },
    Cart,
    Checkout,
    OrderConfirmation {
        reference: String,
    },
    SavedItems,
    Account,
    Login {
        /// Screen to return to after logging in
        #[serde(default, skip_serializing_if = "Option::is_none")]
        redirect: Option<Box<Screen>>,
    },
    Signup,
    AdminDashboard,
    AddProduct,
    Blog,
    BlogPost {
        slug: String,
    },
    Portfolio,
    Services,
    About,
    Contact,
}

impl Screen {
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Screen::Checkout
                | Screen::OrderConfirmation { .. }
                | Screen::Account
                | Screen::AdminDashboard
                | Screen::AddProduct
        )
    }

    /// Minimum role beyond being logged in
    pub fn required_role(&self) -> Option<UserRole> {
        match self {
            Screen::AddProduct => Some(UserRole::Staff),
            Screen::AdminDashboard => Some(UserRole::SuperAdmin),
            _ => None,
        }
    }

    pub fn allows(&self, role: UserRole) -> bool {
        match self.required_role() {
            None => true,
            Some(UserRole::Staff) => role.can_manage_catalog(),
            Some(required) => role == required,
        }
    }

    /// The screen to actually show for this session
    ///
    /// Missing session redirects to login, insufficient role falls back home.
    pub fn resolve(self, user: Option<&User>) -> Screen {
        if !self.requires_auth() {
            return self;
        }
        match user {
            None => Screen::Login {
                redirect: Some(Box::new(self)),
            },
            Some(user) if !self.allows(user.role) => {
                tracing::debug!(screen = ?self, role = %user.role, "Screen not permitted for role");
                Screen::Home
            }
            Some(_) => self,
        }
    }

    /// After login, continue to the redirect target if there is one
    pub fn after_login(self) -> Screen {
        match self {
            Screen::Login {
                redirect: Some(target),
            } => *target,
            Screen::Login { redirect: None } | Screen::Signup => Screen::Account,
            other => other,
        }
    }
}
