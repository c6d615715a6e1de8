//! Session and user directory
//!
//! Authentication is simulated: the directory is a local list and the OTP
//! check compares against fixed codes. The persisted session is only a hint;
//! on load it is re-resolved against the directory and dropped if stale.

use serde_json::Value;
use shared::models::{ProfileUpdate, SignupDetails, User, UserRole};
use thiserror::Error;

use crate::storage::{self, SharedStorage, keys};

/// Phone number reserved for the seeded super-admin
pub const SUPER_ADMIN_PHONE: &str = "+254700000001";
/// OTP accepted for [`SUPER_ADMIN_PHONE`]
pub const SUPER_ADMIN_OTP: &str = "900900";
/// OTP accepted for every other phone
pub const DEFAULT_OTP: &str = "123456";

const DEFAULT_BIO: &str = "Home enthusiast";
const AVATAR_SERVICE: &str = "https://ui-avatars.com/api/";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("No account is registered for {0}")]
    UnknownPhone(String),

    #[error("The code you entered is incorrect")]
    InvalidOtp,

    #[error("An account already exists for {0}")]
    PhoneTaken(String),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("You need to be logged in")]
    NotLoggedIn,
}

impl From<AuthFailure> for shared::AppError {
    fn from(err: AuthFailure) -> Self {
        use shared::ErrorCode;
        let code = match &err {
            AuthFailure::UnknownPhone(_) => ErrorCode::NotFound,
            AuthFailure::InvalidOtp => ErrorCode::InvalidCredentials,
            AuthFailure::PhoneTaken(_) => ErrorCode::PhoneTaken,
            AuthFailure::MissingField(_) => ErrorCode::ValidationFailed,
            AuthFailure::NotLoggedIn => ErrorCode::NotAuthenticated,
        };
        shared::AppError::with_message(code, err.to_string())
    }
}

pub struct SessionStore {
    current: Option<User>,
    users: Vec<User>,
    storage: SharedStorage,
}

impl SessionStore {
    pub fn load(storage: SharedStorage) -> Self {
        let users = match storage::load_json::<Vec<User>>(storage.as_ref(), keys::USERS) {
            Some(users) => users,
            None => {
                let users = seed_directory();
                tracing::info!(users = users.len(), "Seeded user directory");
                storage::persist_json(storage.as_ref(), keys::USERS, &users);
                users
            }
        };

        let mut store = Self {
            current: None,
            users,
            storage,
        };
        store.rehydrate();
        store
    }

    /// Re-resolve the persisted session against the directory
    fn rehydrate(&mut self) {
        let Some(snapshot) = storage::load_json::<Value>(self.storage.as_ref(), keys::CURRENT_USER)
        else {
            return;
        };

        let Some(phone) = snapshot.get("phone").and_then(Value::as_str) else {
            tracing::info!("Persisted session has no phone, clearing");
            storage::forget(self.storage.as_ref(), keys::CURRENT_USER);
            return;
        };

        let Some(user) = self.find(phone).cloned() else {
            tracing::info!(phone, "Persisted session user no longer exists, clearing");
            storage::forget(self.storage.as_ref(), keys::CURRENT_USER);
            return;
        };

        let in_sync = serde_json::from_value::<User>(snapshot).is_ok_and(|u| u == user);
        if !in_sync {
            tracing::debug!(phone = %user.phone, "Resyncing persisted session with directory");
            storage::persist_json(self.storage.as_ref(), keys::CURRENT_USER, &user);
        }
        self.current = Some(user);
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn login(&mut self, phone: &str, otp: &str) -> Result<User, AuthFailure> {
        let phone = phone.trim();
        let user = self
            .find(phone)
            .cloned()
            .ok_or_else(|| AuthFailure::UnknownPhone(phone.to_string()))?;

        let expected = if phone == SUPER_ADMIN_PHONE {
            SUPER_ADMIN_OTP
        } else {
            DEFAULT_OTP
        };
        if otp.trim() != expected {
            tracing::info!(phone, "Login rejected: wrong code");
            return Err(AuthFailure::InvalidOtp);
        }

        tracing::info!(phone, role = %user.role, "User logged in");
        self.start_session(user.clone());
        Ok(user)
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.current.take() {
            tracing::info!(phone = %user.phone, "User logged out");
        }
        storage::forget(self.storage.as_ref(), keys::CURRENT_USER);
    }

    /// Register a customer and log them in
    pub fn signup(&mut self, details: SignupDetails) -> Result<User, AuthFailure> {
        let name = required(&details.name, "Name")?;
        let phone = required(&details.phone, "Phone")?;
        let email = required(&details.email, "Email")?;

        if self.find(phone).is_some() {
            return Err(AuthFailure::PhoneTaken(phone.to_string()));
        }

        let user = User {
            phone: phone.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            address: details.address.trim().to_string(),
            role: UserRole::Customer,
            bio: DEFAULT_BIO.to_string(),
            avatar_url: avatar_url(name),
        };

        self.users.push(user.clone());
        self.persist_directory();
        tracing::info!(phone = %user.phone, "User signed up");
        self.start_session(user.clone());
        Ok(user)
    }

    /// Change a directory entry's role. Returns whether the phone was found.
    ///
    /// Callers check that the acting user may do this.
    pub fn update_user_role(&mut self, phone: &str, role: UserRole) -> bool {
        let Some(user) = self.users.iter_mut().find(|u| u.phone == phone) else {
            return false;
        };
        user.role = role;
        self.persist_directory();
        tracing::info!(phone, %role, "User role updated");
        true
    }

    /// Edit the logged-in user's profile in both session and directory
    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<User, AuthFailure> {
        let name = update.name.as_deref().map(|n| required(n, "Name")).transpose()?;
        let email = update.email.as_deref().map(|e| required(e, "Email")).transpose()?;
        let current = self.current.as_mut().ok_or(AuthFailure::NotLoggedIn)?;

        if let Some(name) = name {
            current.name = name.to_string();
        }
        if let Some(email) = email {
            current.email = email.to_string();
        }
        if let Some(address) = &update.address {
            current.address = address.trim().to_string();
        }
        if let Some(bio) = update.bio {
            current.bio = bio;
        }

        let user = current.clone();
        if let Some(entry) = self.users.iter_mut().find(|u| u.phone == user.phone) {
            *entry = user.clone();
        }
        self.persist_directory();
        storage::persist_json(self.storage.as_ref(), keys::CURRENT_USER, &user);
        Ok(user)
    }

    fn find(&self, phone: &str) -> Option<&User> {
        self.users.iter().find(|u| u.phone == phone)
    }

    fn start_session(&mut self, user: User) {
        storage::persist_json(self.storage.as_ref(), keys::CURRENT_USER, &user);
        self.current = Some(user);
    }

    fn persist_directory(&self) {
        storage::persist_json(self.storage.as_ref(), keys::USERS, &self.users);
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, AuthFailure> {
    let value = value.trim();
    if value.is_empty() {
        Err(AuthFailure::MissingField(field))
    } else {
        Ok(value)
    }
}

fn avatar_url(name: &str) -> String {
    match reqwest::Url::parse_with_params(
        AVATAR_SERVICE,
        &[("name", name), ("background", "random")],
    ) {
        Ok(url) => url.to_string(),
        Err(_) => AVATAR_SERVICE.to_string(),
    }
}

fn seed_directory() -> Vec<User> {
    let user = |phone: &str, name: &str, email: &str, address: &str, role, bio: &str| User {
        phone: phone.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        address: address.to_string(),
        role,
        bio: bio.to_string(),
        avatar_url: avatar_url(name),
    };

    vec![
        user(
            SUPER_ADMIN_PHONE,
            "Amani Otieno",
            "amani@nyumba.co.ke",
            "Westlands, Nairobi",
            UserRole::SuperAdmin,
            "Store owner",
        ),
        user(
            "+254700000002",
            "Baraka Mwangi",
            "baraka@nyumba.co.ke",
            "Kilimani, Nairobi",
            UserRole::Staff,
            "Catalog manager",
        ),
        user(
            "+254712345678",
            "Zawadi Njeri",
            "zawadi@example.com",
            "Nyali, Mombasa",
            UserRole::Customer,
            DEFAULT_BIO,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{LocalStorage, MemoryStorage};
    use std::sync::Arc;

    const CUSTOMER_PHONE: &str = "+254712345678";

    fn store() -> (SessionStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        (SessionStore::load(storage.clone()), storage)
    }

    fn details(phone: &str) -> SignupDetails {
        SignupDetails {
            name: "Wanjiru Kamau".to_string(),
            phone: phone.to_string(),
            email: "wanjiru@example.com".to_string(),
            address: "Karen, Nairobi".to_string(),
        }
    }

    #[test]
    fn test_directory_is_seeded() {
        let (session, storage) = store();
        assert_eq!(session.users().len(), 3);
        assert!(storage.get(keys::USERS).unwrap().is_some());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_login_checks_otp_per_phone() {
        let (mut session, _) = store();

        assert_eq!(
            session.login("+254799999999", DEFAULT_OTP),
            Err(AuthFailure::UnknownPhone("+254799999999".to_string()))
        );
        assert_eq!(
            session.login(SUPER_ADMIN_PHONE, DEFAULT_OTP),
            Err(AuthFailure::InvalidOtp)
        );
        assert_eq!(
            session.login(CUSTOMER_PHONE, SUPER_ADMIN_OTP),
            Err(AuthFailure::InvalidOtp)
        );
        assert!(!session.is_authenticated());

        let admin = session.login(SUPER_ADMIN_PHONE, SUPER_ADMIN_OTP).unwrap();
        assert_eq!(admin.role, UserRole::SuperAdmin);
        assert_eq!(session.current_user(), Some(&admin));
    }

    #[test]
    fn test_session_survives_reload() {
        let (mut session, storage) = store();
        session.login(CUSTOMER_PHONE, DEFAULT_OTP).unwrap();

        let reloaded = SessionStore::load(storage.clone());
        assert_eq!(
            reloaded.current_user().map(|u| u.phone.as_str()),
            Some(CUSTOMER_PHONE)
        );

        session.logout();
        assert!(storage.get(keys::CURRENT_USER).unwrap().is_none());
        assert!(!SessionStore::load(storage).is_authenticated());
    }

    #[test]
    fn test_stale_session_is_dropped() {
        let (_, storage) = store();
        storage
            .set(
                keys::CURRENT_USER,
                r#"{"phone":"+254700999999","name":"Ghost","email":"g@x.co"}"#,
            )
            .unwrap();

        let session = SessionStore::load(storage.clone());
        assert!(!session.is_authenticated());
        assert!(storage.get(keys::CURRENT_USER).unwrap().is_none());
    }

    #[test]
    fn test_session_without_phone_is_dropped() {
        let (_, storage) = store();
        storage.set(keys::CURRENT_USER, r#"{"phone":42}"#).unwrap();
        assert!(!SessionStore::load(storage.clone()).is_authenticated());

        storage.set(keys::CURRENT_USER, "not json").unwrap();
        assert!(!SessionStore::load(storage).is_authenticated());
    }

    #[test]
    fn test_session_resyncs_with_directory() {
        let (mut session, storage) = store();
        session.login(CUSTOMER_PHONE, DEFAULT_OTP).unwrap();
        assert!(session.update_user_role(CUSTOMER_PHONE, UserRole::Staff));

        let reloaded = SessionStore::load(storage.clone());
        assert_eq!(reloaded.current_user().unwrap().role, UserRole::Staff);

        let persisted: User =
            serde_json::from_str(&storage.get(keys::CURRENT_USER).unwrap().unwrap()).unwrap();
        assert_eq!(persisted.role, UserRole::Staff);
    }

    #[test]
    fn test_signup_round_trip() {
        let (mut session, storage) = store();
        let user = session.signup(details("+254722000111")).unwrap();

        assert_eq!(user.role, UserRole::Customer);
        assert_eq!(user.bio, DEFAULT_BIO);
        assert!(user.avatar_url.starts_with(AVATAR_SERVICE));
        assert!(user.avatar_url.contains("Wanjiru"));
        assert_eq!(session.current_user(), Some(&user));

        session.logout();
        let mut reloaded = SessionStore::load(storage);
        assert_eq!(reloaded.users().len(), 4);
        assert_eq!(reloaded.login("+254722000111", DEFAULT_OTP), Ok(user));
    }

    #[test]
    fn test_signup_rejects_duplicate_phone() {
        let (mut session, _) = store();
        assert_eq!(
            session.signup(details(CUSTOMER_PHONE)),
            Err(AuthFailure::PhoneTaken(CUSTOMER_PHONE.to_string()))
        );
        assert_eq!(session.users().len(), 3);
        assert!(!session.is_authenticated());

        let mut blank = details("+254722000222");
        blank.name = "  ".to_string();
        assert_eq!(session.signup(blank), Err(AuthFailure::MissingField("Name")));
    }

    #[test]
    fn test_update_role_unknown_phone() {
        let (mut session, _) = store();
        assert!(!session.update_user_role("+254700000404", UserRole::Staff));
    }

    #[test]
    fn test_update_profile() {
        let (mut session, storage) = store();
        assert_eq!(
            session.update_profile(ProfileUpdate::default()),
            Err(AuthFailure::NotLoggedIn)
        );

        session.login(CUSTOMER_PHONE, DEFAULT_OTP).unwrap();
        let user = session
            .update_profile(ProfileUpdate {
                bio: Some("Loves teak".to_string()),
                address: Some(" Diani ".to_string()),
                ..ProfileUpdate::default()
            })
            .unwrap();
        assert_eq!(user.address, "Diani");

        let reloaded = SessionStore::load(storage);
        assert_eq!(reloaded.current_user().unwrap().bio, "Loves teak");
    }
}
