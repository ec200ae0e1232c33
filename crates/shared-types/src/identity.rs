use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "validation")]
use validator::Validate;

use crate::dispute::DisputeCategory;
use crate::principal::Role;

/// Practice area declared by a lawyer at registration.
///
/// Mirrors the dispute categories plus `other`, which makes a lawyer a
/// candidate for every category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "kebab-case")]
pub enum Specialization {
    Civil,
    Criminal,
    Corporate,
    Family,
    Property,
    Contract,
    Employment,
    IntellectualProperty,
    Other,
}

impl Specialization {
    /// True if a lawyer with this specialization is a candidate for `category`.
    pub fn covers(&self, category: DisputeCategory) -> bool {
        *self == Specialization::Other || *self == Specialization::from(category)
    }
}

impl From<DisputeCategory> for Specialization {
    fn from(c: DisputeCategory) -> Self {
        match c {
            DisputeCategory::Civil => Specialization::Civil,
            DisputeCategory::Criminal => Specialization::Criminal,
            DisputeCategory::Corporate => Specialization::Corporate,
            DisputeCategory::Family => Specialization::Family,
            DisputeCategory::Property => Specialization::Property,
            DisputeCategory::Contract => Specialization::Contract,
            DisputeCategory::Employment => Specialization::Employment,
            DisputeCategory::IntellectualProperty => Specialization::IntellectualProperty,
        }
    }
}

// ── Identity records ────────────────────────────────────────────────

/// Stored citizen account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citizen {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Stored lawyer account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lawyer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub specialization: Specialization,
    pub license_number: String,
    #[serde(default)]
    pub years_of_experience: Option<u32>,
    pub created_at: DateTime<Utc>,
}

// ── Registration / login ────────────────────────────────────────────

/// Fields required of every account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
#[serde(rename_all = "camelCase")]
pub struct CitizenRegistration {
    #[cfg_attr(feature = "validation", validate(length(min = 1, message = "Name is required")))]
    #[serde(default)]
    pub name: String,
    #[cfg_attr(feature = "validation", validate(email(message = "A valid email is required")))]
    #[serde(default)]
    pub email: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 6, message = "Password must be at least 6 characters"))
    )]
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Lawyer registration. Specialization and license number are mandatory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
#[serde(rename_all = "camelCase")]
pub struct LawyerRegistration {
    #[cfg_attr(feature = "validation", validate(length(min = 1, message = "Name is required")))]
    #[serde(default)]
    pub name: String,
    #[cfg_attr(feature = "validation", validate(email(message = "A valid email is required")))]
    #[serde(default)]
    pub email: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 6, message = "Password must be at least 6 characters"))
    )]
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[cfg_attr(feature = "validation", validate(required(message = "Specialization is required")))]
    #[serde(default)]
    pub specialization: Option<Specialization>,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "License number is required"))
    )]
    #[serde(default)]
    pub license_number: String,
    #[serde(default)]
    pub years_of_experience: Option<u32>,
}

/// Registration payload, discriminated by `role`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum RegistrationRequest {
    Citizen(CitizenRegistration),
    Lawyer(LawyerRegistration),
}

impl RegistrationRequest {
    pub fn role(&self) -> Role {
        match self {
            RegistrationRequest::Citizen(_) => Role::Citizen,
            RegistrationRequest::Lawyer(_) => Role::Lawyer,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct LoginRequest {
    #[cfg_attr(feature = "validation", validate(email(message = "A valid email is required")))]
    pub email: String,
    #[cfg_attr(feature = "validation", validate(length(min = 1, message = "Password is required")))]
    pub password: String,
    pub role: Role,
}

/// Public view of an account; never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub role: Role,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<Specialization>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years_of_experience: Option<u32>,
    /// Number of cases currently assigned (lawyers only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_case_count: Option<usize>,
    pub created_at: DateTime<Utc>,
}

impl From<&Citizen> for UserProfile {
    fn from(c: &Citizen) -> Self {
        Self {
            id: c.id,
            role: Role::Citizen,
            name: c.name.clone(),
            email: c.email.clone(),
            phone: c.phone.clone(),
            address: c.address.clone(),
            specialization: None,
            license_number: None,
            years_of_experience: None,
            assigned_case_count: None,
            created_at: c.created_at,
        }
    }
}

impl From<&Lawyer> for UserProfile {
    fn from(l: &Lawyer) -> Self {
        Self {
            id: l.id,
            role: Role::Lawyer,
            name: l.name.clone(),
            email: l.email.clone(),
            phone: l.phone.clone(),
            address: None,
            specialization: Some(l.specialization),
            license_number: Some(l.license_number.clone()),
            years_of_experience: l.years_of_experience,
            assigned_case_count: None,
            created_at: l.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Profile update. Email and license number are not editable here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[cfg_attr(feature = "validation", validate(length(min = 1, message = "Name cannot be empty")))]
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub specialization: Option<Specialization>,
    pub years_of_experience: Option<u32>,
}

/// Directory entry shown to citizens picking a preferred lawyer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct LawyerSummary {
    pub id: Uuid,
    pub name: String,
    pub specialization: Specialization,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years_of_experience: Option<u32>,
}

impl From<&Lawyer> for LawyerSummary {
    fn from(l: &Lawyer) -> Self {
        Self {
            id: l.id,
            name: l.name.clone(),
            specialization: l.specialization,
            years_of_experience: l.years_of_experience,
        }
    }
}
