//! Accounts: registration, login, principal resolution and profiles.

use chrono::Utc;
use shared_types::{
    ActorRef, AppError, AuthResponse, Case, Citizen, CitizenRegistration, Lawyer, LawyerRegistration,
    LawyerSummary, LoginRequest, Principal, RegistrationRequest, Role, UpdateProfileRequest,
    UserProfile,
};
use uuid::Uuid;

use crate::auth::jwt::{Claims, JwtConfig};
use crate::auth::password::{hash_password, verify_missing_account, verify_password};
use crate::error_convert::ValidateRequest;
use crate::repo::records::email_key;
use crate::repo::{Step, Store};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

fn user_not_found() -> AppError {
    AppError::user_not_found("User not found")
}

/// Turn verified token claims into a live principal.
///
/// The role in the token is only trusted once a record of that role with
/// the token's subject id is found.
pub async fn resolve_principal(store: &Store, claims: &Claims) -> Result<Principal, AppError> {
    let claimed = claims.claimed_principal();
    let exists = match claimed.role {
        Role::Citizen => store.get::<Citizen>(claimed.id).await?.is_some(),
        Role::Lawyer => store.get::<Lawyer>(claimed.id).await?.is_some(),
    };
    if !exists {
        tracing::warn!(principal_id = %claimed.id, role = %claimed.role, "Token subject has no live record");
        return Err(user_not_found());
    }
    Ok(claimed)
}

/// Create an account. Duplicate email (per role) or license number is a `Conflict`.
#[tracing::instrument(skip(store, request), fields(role = %request.role()))]
pub async fn register(store: &Store, request: RegistrationRequest) -> Result<UserProfile, AppError> {
    let profile = match request {
        RegistrationRequest::Citizen(req) => register_citizen(store, req).await?,
        RegistrationRequest::Lawyer(req) => register_lawyer(store, req).await?,
    };
    tracing::info!(user_id = %profile.id, "Account registered");
    Ok(profile)
}

async fn register_citizen(store: &Store, req: CitizenRegistration) -> Result<UserProfile, AppError> {
    req.validate_request()?;
    let citizen = Citizen {
        id: Uuid::new_v4(),
        name: req.name.trim().to_string(),
        email: email_key(&req.email),
        password_hash: hash_password(&req.password)?,
        phone: req.phone,
        address: req.address,
        created_at: Utc::now(),
    };
    store.insert(&citizen).await?;
    Ok(UserProfile::from(&citizen))
}

async fn register_lawyer(store: &Store, req: LawyerRegistration) -> Result<UserProfile, AppError> {
    req.validate_request()?;
    let specialization = req
        .specialization
        .ok_or_else(|| AppError::invalid_field("specialization", "Specialization is required"))?;
    let lawyer = Lawyer {
        id: Uuid::new_v4(),
        name: req.name.trim().to_string(),
        email: email_key(&req.email),
        password_hash: hash_password(&req.password)?,
        phone: req.phone,
        specialization,
        license_number: req.license_number.trim().to_string(),
        years_of_experience: req.years_of_experience,
        created_at: Utc::now(),
    };
    store.insert(&lawyer).await?;
    Ok(UserProfile::from(&lawyer))
}

/// Check credentials for the requested role and issue an access token.
///
/// Unknown email and wrong password fail identically, and both pay for an
/// argon2 verification.
pub async fn login(store: &Store, jwt: &JwtConfig, req: LoginRequest) -> Result<AuthResponse, AppError> {
    req.validate_request()?;
    let email = email_key(&req.email);

    let account = match req.role {
        Role::Citizen => store.find_by_key::<Citizen>("email", &email).await?.map(|found| {
            let c = found.record;
            (Principal::citizen(c.id), c.password_hash.clone(), UserProfile::from(&c))
        }),
        Role::Lawyer => store.find_by_key::<Lawyer>("email", &email).await?.map(|found| {
            let l = found.record;
            (Principal::lawyer(l.id), l.password_hash.clone(), UserProfile::from(&l))
        }),
    };

    let Some((principal, digest, user)) = account else {
        verify_missing_account(&req.password);
        tracing::info!(role = %req.role, "Login rejected");
        return Err(AppError::bad_request(INVALID_CREDENTIALS));
    };
    if !verify_password(&req.password, &digest) {
        tracing::info!(role = %req.role, "Login rejected");
        return Err(AppError::bad_request(INVALID_CREDENTIALS));
    }

    let token = jwt.create_access_token(&principal)?;
    tracing::info!(user_id = %principal.id, role = %principal.role, "Login succeeded");
    Ok(AuthResponse { token, user })
}

/// Number of cases whose accepted lawyer is `lawyer_id`.
pub async fn assigned_case_count(store: &Store, lawyer_id: Uuid) -> Result<usize, AppError> {
    Ok(store
        .list_records::<Case>()
        .await?
        .iter()
        .filter(|c| c.lawyer == Some(lawyer_id))
        .count())
}

pub async fn profile(store: &Store, principal: &Principal) -> Result<UserProfile, AppError> {
    match principal.role {
        Role::Citizen => {
            let c = store.get::<Citizen>(principal.id).await?.ok_or_else(user_not_found)?;
            Ok(UserProfile::from(&c.record))
        }
        Role::Lawyer => {
            let l = store.get::<Lawyer>(principal.id).await?.ok_or_else(user_not_found)?;
            let mut profile = UserProfile::from(&l.record);
            profile.assigned_case_count = Some(assigned_case_count(store, principal.id).await?);
            Ok(profile)
        }
    }
}

/// Apply a profile edit. Fields that do not exist for the caller's role are
/// rejected rather than ignored.
pub async fn update_profile(
    store: &Store,
    principal: &Principal,
    req: UpdateProfileRequest,
) -> Result<UserProfile, AppError> {
    req.validate_request()?;
    match principal.role {
        Role::Citizen => {
            if req.specialization.is_some() || req.years_of_experience.is_some() {
                return Err(AppError::bad_request("Citizens have no practice details to update"));
            }
            store
                .modify::<Citizen, _, _>(principal.id, user_not_found, |current| {
                    let mut next = current.clone();
                    if let Some(name) = &req.name {
                        next.name = name.trim().to_string();
                    }
                    if req.phone.is_some() {
                        next.phone = req.phone.clone();
                    }
                    if req.address.is_some() {
                        next.address = req.address.clone();
                    }
                    Ok(Step::Write(next, ()))
                })
                .await?;
        }
        Role::Lawyer => {
            if req.address.is_some() {
                return Err(AppError::bad_request("Lawyer profiles have no address field"));
            }
            store
                .modify::<Lawyer, _, _>(principal.id, user_not_found, |current| {
                    let mut next = current.clone();
                    if let Some(name) = &req.name {
                        next.name = name.trim().to_string();
                    }
                    if req.phone.is_some() {
                        next.phone = req.phone.clone();
                    }
                    if let Some(spec) = req.specialization {
                        next.specialization = spec;
                    }
                    if req.years_of_experience.is_some() {
                        next.years_of_experience = req.years_of_experience;
                    }
                    Ok(Step::Write(next, ()))
                })
                .await?;
        }
    }
    profile(store, principal).await
}

/// Public lawyer directory, in registration order.
pub async fn lawyer_directory(store: &Store) -> Result<Vec<LawyerSummary>, AppError> {
    Ok(store
        .list_records::<Lawyer>()
        .await?
        .iter()
        .map(LawyerSummary::from)
        .collect())
}

/// Fail with `NotFound` unless `id` is a registered lawyer.
pub async fn require_lawyer(store: &Store, id: Uuid) -> Result<Lawyer, AppError> {
    store
        .get::<Lawyer>(id)
        .await?
        .map(|s| s.record)
        .ok_or_else(|| AppError::not_found("Lawyer not found"))
}

/// Name and email on record for `principal`.
pub async fn contact_of(store: &Store, principal: &Principal) -> Result<(String, String), AppError> {
    match principal.role {
        Role::Citizen => {
            let c = store.get::<Citizen>(principal.id).await?.ok_or_else(user_not_found)?;
            Ok((c.record.name, c.record.email))
        }
        Role::Lawyer => {
            let l = store.get::<Lawyer>(principal.id).await?.ok_or_else(user_not_found)?;
            Ok((l.record.name, l.record.email))
        }
    }
}

/// Fail with `NotFound` unless `actor` names a live account.
pub async fn require_actor(store: &Store, actor: ActorRef) -> Result<(), AppError> {
    let exists = match actor {
        ActorRef::Citizen(id) => store.get::<Citizen>(id).await?.is_some(),
        ActorRef::Lawyer(id) => store.get::<Lawyer>(id).await?.is_some(),
    };
    if exists {
        Ok(())
    } else {
        Err(AppError::not_found(format!("No {} account with id {}", actor.role(), actor.id())))
    }
}
