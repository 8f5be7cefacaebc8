//! Account domain entity, profile and address book.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::catalog::MediaAsset;
use crate::config::{ROLE_ADMIN, ROLE_USER};
use crate::errors::{AppError, AppResult};

/// Account roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => Role::Admin,
            _ => Role::User,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "{}", ROLE_ADMIN),
            Role::User => write!(f, "{}", ROLE_USER),
        }
    }
}

/// Authenticated caller of a protected operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
    pub id: Uuid,
    pub role: Role,
}

impl Requester {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Fails with `Forbidden` unless the requester is an admin.
    pub fn require_admin(&self) -> AppResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    /// Fails with `Forbidden` unless the requester owns the resource or is an admin.
    pub fn require_owner_or_admin(&self, owner_id: Uuid) -> AppResult<()> {
        if self.id == owner_id || self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Profile sub-record of an account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub age: Option<u32>,
    pub date_of_birth: Option<NaiveDate>,
    pub avatar: Option<MediaAsset>,
}

/// Profile fields a caller may change; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub age: Option<u32>,
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AddressKind {
    #[default]
    Home,
    Work,
    Other,
}

/// Shipping address owned by exactly one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: AddressKind,
    pub address: String,
    pub city: String,
    pub landmark: Option<String>,
    pub district: Option<String>,
    pub division: Option<String>,
    pub zip_code: Option<String>,
    pub is_default: bool,
}

/// Data for a new address
#[derive(Debug, Clone, Default)]
pub struct AddressInput {
    pub kind: AddressKind,
    pub address: String,
    pub city: String,
    pub landmark: Option<String>,
    pub district: Option<String>,
    pub division: Option<String>,
    pub zip_code: Option<String>,
    pub is_default: bool,
}

/// Partial address update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct AddressPatch {
    pub kind: Option<AddressKind>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub landmark: Option<String>,
    pub district: Option<String>,
    pub division: Option<String>,
    pub zip_code: Option<String>,
    pub is_default: Option<bool>,
}

impl Address {
    /// Build a validated address from caller input.
    pub fn new(input: AddressInput) -> AppResult<Self> {
        let address = Self {
            id: Uuid::new_v4(),
            kind: input.kind,
            address: input.address.trim().to_string(),
            city: input.city.trim().to_string(),
            landmark: input.landmark,
            district: input.district,
            division: input.division,
            zip_code: input.zip_code,
            is_default: input.is_default,
        };
        address.validate()?;
        Ok(address)
    }

    fn validate(&self) -> AppResult<()> {
        if self.address.is_empty() {
            return Err(AppError::validation("Address is required"));
        }
        if self.city.is_empty() {
            return Err(AppError::validation("City is required"));
        }
        Ok(())
    }
}

/// Account domain entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_approved: bool,
    pub profile: Profile,
    pub addresses: Vec<Address>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with the default role
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            role: Role::User,
            is_approved: false,
            profile: Profile::default(),
            addresses: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn update_profile(&mut self, update: ProfileUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if update.phone.is_some() {
            self.profile.phone = update.phone;
        }
        if update.gender.is_some() {
            self.profile.gender = update.gender;
        }
        if update.age.is_some() {
            self.profile.age = update.age;
        }
        if update.date_of_birth.is_some() {
            self.profile.date_of_birth = update.date_of_birth;
        }
        self.touch();
    }

    /// Replace the avatar, returning the previous one for cleanup.
    pub fn replace_avatar(&mut self, avatar: MediaAsset) -> Option<MediaAsset> {
        let previous = self.profile.avatar.replace(avatar);
        self.touch();
        previous
    }

    pub fn approve(&mut self) {
        self.is_approved = true;
        self.touch();
    }

    // =========================================================================
    // Address book
    // =========================================================================

    /// Currently flagged default address, if any
    pub fn default_address(&self) -> Option<&Address> {
        self.addresses.iter().find(|a| a.is_default)
    }

    /// Append an address. A default address takes the flag from every other one.
    pub fn add_address(&mut self, input: AddressInput) -> AppResult<Uuid> {
        let address = Address::new(input)?;
        let id = address.id;
        if address.is_default {
            self.clear_default_except(id);
        }
        self.addresses.push(address);
        self.touch();
        Ok(id)
    }

    pub fn update_address(&mut self, id: Uuid, patch: AddressPatch) -> AppResult<()> {
        let make_default = patch.is_default == Some(true);
        let address = self
            .addresses
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AppError::not_found("Address"))?;

        let mut updated = address.clone();
        if let Some(kind) = patch.kind {
            updated.kind = kind;
        }
        if let Some(text) = patch.address {
            updated.address = text.trim().to_string();
        }
        if let Some(city) = patch.city {
            updated.city = city.trim().to_string();
        }
        if patch.landmark.is_some() {
            updated.landmark = patch.landmark;
        }
        if patch.district.is_some() {
            updated.district = patch.district;
        }
        if patch.division.is_some() {
            updated.division = patch.division;
        }
        if patch.zip_code.is_some() {
            updated.zip_code = patch.zip_code;
        }
        if let Some(is_default) = patch.is_default {
            updated.is_default = is_default;
        }
        updated.validate()?;
        *address = updated;

        if make_default {
            self.clear_default_except(id);
        }
        self.touch();
        Ok(())
    }

    pub fn set_default_address(&mut self, id: Uuid) -> AppResult<()> {
        self.update_address(
            id,
            AddressPatch {
                is_default: Some(true),
                ..AddressPatch::default()
            },
        )
    }

    pub fn remove_address(&mut self, id: Uuid) -> AppResult<()> {
        let before = self.addresses.len();
        self.addresses.retain(|a| a.id != id);
        if self.addresses.len() == before {
            return Err(AppError::not_found("Address"));
        }
        self.touch();
        Ok(())
    }

    fn clear_default_except(&mut self, keep: Uuid) {
        for address in self.addresses.iter_mut().filter(|a| a.id != keep) {
            address.is_default = false;
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Account response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
    pub role: Role,
    pub is_approved: bool,
    pub profile: Profile,
    pub addresses: Vec<Address>,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            email: account.email,
            role: account.role,
            is_approved: account.is_approved,
            profile: account.profile,
            addresses: account.addresses,
            created_at: account.created_at,
        }
    }
}
