use crate::error::IdentityError;
use crate::model::UserRecord;
use crate::password;
use cmt_database::Database;
use cmt_domain::constants::USER;
use cmt_domain::model::Role;
use cmt_kernel::safe_nanoid;
use cmt_kernel::security::resource::ResourceGuard;
use tracing::info;

/// Registration input before any normalization.
#[derive(Debug)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub affiliation: Option<String>,
}

/// Creates a new account with the default Author role.
///
/// Email is lowercased and trimmed before storage.
///
/// # Errors
/// Fails on invalid payloads, a taken email, or query errors.
pub async fn register(
    db: &Database,
    salt: &str,
    new: NewUser,
) -> Result<UserRecord, IdentityError> {
    let email = new.email.trim().to_lowercase();
    if !email.contains('@') {
        return Err(IdentityError::Validation {
            message: "A valid email address is required".into(),
            context: None,
        });
    }
    if new.full_name.trim().is_empty() {
        return Err(IdentityError::Validation {
            message: "Full name is required".into(),
            context: None,
        });
    }
    if !password::acceptable_length(&new.password) {
        return Err(IdentityError::Validation {
            message: "Password must be at least 8 characters".into(),
            context: None,
        });
    }

    let id = format!("{USER}:{}", safe_nanoid!());
    let digest = password::digest(salt, &new.password);

    let mut response = db
        .query(
            "CREATE type::record($id) CONTENT {
                email: $email,
                password_digest: $digest,
                full_name: $full_name,
                affiliation: $affiliation,
                role: $role,
                created_at: time::now(),
            }",
        )
        .bind(("id", id))
        .bind(("email", email.clone()))
        .bind(("digest", digest))
        .bind(("full_name", new.full_name.trim().to_owned()))
        .bind(("affiliation", new.affiliation))
        .bind(("role", Role::Author.as_str()))
        .await
        .map_err(db_error)?
        .check()
        .map_err(surrealdb::Error::from)
        .map_err(|e| duplicate_email_or(db_error(e), &email))?;

    let created =
        response.take::<Option<UserRecord>>(0).map_err(db_error)?.ok_or_else(|| {
            IdentityError::Internal {
                message: "CREATE returned no user row".into(),
                context: None,
            }
        })?;

    info!(user = %created.id, "account registered");
    Ok(created)
}

/// Looks up the account by email and checks the password.
///
/// # Errors
/// Returns `InvalidCredentials` for both an unknown email and a wrong
/// password, so callers cannot probe which emails are registered.
pub async fn login(
    db: &Database,
    salt: &str,
    email: &str,
    password: &str,
) -> Result<UserRecord, IdentityError> {
    let email = email.trim().to_lowercase();

    let mut response = db
        .query("SELECT * FROM user WHERE email = $email LIMIT 1")
        .bind(("email", email))
        .await
        .map_err(db_error)?;
    let user = response.take::<Option<UserRecord>>(0).map_err(db_error)?;

    let Some(user) = user else {
        return Err(invalid_credentials());
    };
    if !password::verify(salt, password, &user.password_digest) {
        return Err(invalid_credentials());
    }

    Ok(user)
}

/// Fetches an account by record id, `None` when it does not exist.
///
/// # Errors
/// Fails when the id belongs to a different table or the query errors.
pub async fn find_by_id(
    db: &Database,
    id: &str,
) -> Result<Option<UserRecord>, IdentityError> {
    let id = ResourceGuard::verify(id, USER).map_err(|e| IdentityError::NotFound {
        message: e.to_string().into(),
        context: None,
    })?;

    let mut response = db
        .query("SELECT * FROM type::record($id)")
        .bind(("id", id))
        .await
        .map_err(db_error)?;
    response.take::<Option<UserRecord>>(0).map_err(db_error)
}

/// Lists every account ordered by email.
///
/// # Errors
/// Fails when the query errors.
pub async fn list_users(db: &Database) -> Result<Vec<UserRecord>, IdentityError> {
    let mut response =
        db.query("SELECT * FROM user ORDER BY email").await.map_err(db_error)?;
    response.take::<Vec<UserRecord>>(0).map_err(db_error)
}

/// Updates the role on an existing account.
///
/// # Errors
/// Fails when the account does not exist or the query errors.
pub async fn change_role(
    db: &Database,
    id: &str,
    role: Role,
) -> Result<UserRecord, IdentityError> {
    let id = ResourceGuard::verify(id, USER).map_err(|e| IdentityError::NotFound {
        message: e.to_string().into(),
        context: None,
    })?;

    let mut response = db
        .query("UPDATE type::record($id) SET role = $role")
        .bind(("id", id.clone()))
        .bind(("role", role.as_str()))
        .await
        .map_err(db_error)?;
    let updated = response.take::<Option<UserRecord>>(0).map_err(db_error)?;

    updated.ok_or(IdentityError::NotFound { message: id.into(), context: None })
}

fn invalid_credentials() -> IdentityError {
    IdentityError::InvalidCredentials {
        message: "Unknown email or wrong password".into(),
        context: None,
    }
}

fn db_error(err: impl std::fmt::Display) -> IdentityError {
    IdentityError::Database { message: err.to_string().into(), context: None }
}

// Unique index violations on user.email read as conflicts, not server faults.
fn duplicate_email_or(fallback: IdentityError, email: &str) -> IdentityError {
    if let IdentityError::Database { message, .. } = &fallback
        && message.contains("index")
    {
        return IdentityError::EmailTaken { message: email.to_owned().into(), context: None };
    }
    fallback
}
