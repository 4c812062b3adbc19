use crate::config::Settings;
use crate::error::{AppError, Result};
use crate::models::{Account, AccountSummary, AuthResponse, LoginCredentials, RegisterCredentials, Role};
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: i64, // account id
    exp: i64, // expiration timestamp
}

/// Records that belong to a single account.
pub trait Owned {
    fn owner_id(&self) -> i64;
}

/// Passes when `requester` owns `record` or holds `role`.
pub fn assert_owner_or_role<T: Owned + ?Sized>(record: &T, requester: &Account, role: Role) -> Result<()> {
    if record.owner_id() == requester.id || requester.role == role {
        Ok(())
    } else {
        warn!(
            "Account {} denied access to a record owned by {}",
            requester.id,
            record.owner_id()
        );
        Err(AppError::forbidden("Not authorized"))
    }
}

/// Passes only for the record's owner.
pub fn assert_owner<T: Owned + ?Sized>(record: &T, requester: &Account) -> Result<()> {
    if record.owner_id() == requester.id {
        Ok(())
    } else {
        warn!(
            "Account {} denied access to a record owned by {}",
            requester.id,
            record.owner_id()
        );
        Err(AppError::forbidden("Not authorized"))
    }
}

/// Exact role match; there is no hierarchy between roles.
pub fn require_role(account: &Account, role: Role) -> Result<()> {
    if account.role == role {
        Ok(())
    } else {
        warn!("Account {} lacks role {:?}", account.id, role);
        Err(AppError::forbidden(match role {
            Role::Admin => "Access denied. Admin only.",
            Role::Trainer => "Access denied. Trainers only.",
            Role::Client => "Access denied. Clients only.",
        }))
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// `local@domain.tld` with no whitespace anywhere.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

pub struct AuthService {
    pool: SqlitePool,
    settings: Settings,
}

impl AuthService {
    pub fn new(pool: SqlitePool, settings: Settings) -> Self {
        Self { pool, settings }
    }

    pub async fn register(&self, creds: RegisterCredentials) -> Result<AuthResponse> {
        let name = creds.name.trim();
        let email = normalize_email(&creds.email);

        if name.is_empty() || email.is_empty() || creds.password.is_empty() {
            return Err(AppError::validation(
                "Please provide all required fields (name, email, password)",
            ));
        }
        if !is_valid_email(&email) {
            return Err(AppError::validation("Please provide a valid email address"));
        }
        if creds.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::validation(
                "Password must be at least 6 characters long",
            ));
        }

        let role = creds.role.unwrap_or_default();
        if role == Role::Admin {
            return Err(AppError::validation("Admin accounts cannot be self-registered"));
        }

        info!("Received registration request for: {}", email);
        let account = self.create_account(name, &email, &creds.password, role).await?;

        let token = self.create_token(&account)?;
        info!("Account registered successfully: {}", account.email);
        Ok(AuthResponse {
            token,
            user: AccountSummary::from(&account),
        })
    }

    pub async fn login(&self, creds: LoginCredentials) -> Result<AuthResponse> {
        let email = normalize_email(&creds.email);
        if email.is_empty() || creds.password.is_empty() {
            return Err(AppError::validation("Please provide both email and password"));
        }

        info!("Attempting login for account: {}", email);
        let account = self.find_by_email(&email).await?.ok_or_else(|| {
            warn!("Account not found: {}", email);
            AppError::Unauthenticated("Invalid email or password".into())
        })?;

        if !verify(creds.password.as_bytes(), &account.password)? {
            warn!("Invalid password for account: {}", email);
            return Err(AppError::Unauthenticated("Invalid email or password".into()));
        }

        let token = self.create_token(&account)?;
        info!("Account logged in successfully: {}", account.email);
        Ok(AuthResponse {
            token,
            user: AccountSummary::from(&account),
        })
    }

    /// Resolve a bearer token to the account it was issued for.
    pub async fn validate_token(&self, token: &str) -> Result<Account> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.settings.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| {
            warn!("Rejected token: {}", e);
            AppError::Unauthenticated("Token is not valid".into())
        })?
        .claims;

        self.fetch_account(claims.sub)
            .await?
            .ok_or_else(|| AppError::Unauthenticated("Token is not valid".into()))
    }

    pub fn create_token(&self, account: &Account) -> Result<String> {
        let expiration = (Utc::now() + Duration::days(self.settings.token_ttl_days)).timestamp();

        let claims = Claims {
            sub: account.id,
            exp: expiration,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.settings.jwt_secret.as_bytes()),
        )
        .map_err(|e| {
            error!("JWT error: {}", e);
            AppError::Internal(e.into())
        })
    }

    pub fn hash_password(&self, password: &str) -> Result<String> {
        Ok(hash(password.as_bytes(), self.settings.bcrypt_cost)?)
    }

    /// Insert a new account after checking the email is free. `email` must already be normalized.
    pub async fn create_account(&self, name: &str, email: &str, password: &str, role: Role) -> Result<Account> {
        if self.find_by_email(email).await?.is_some() {
            warn!("Account with email {} already exists", email);
            return Err(AppError::Conflict("User with this email already exists".into()));
        }

        let hashed_password = self.hash_password(password)?;
        let now = Utc::now();

        info!("Creating new account with email: {}", email);
        sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO users (name, email, password, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(hashed_password)
        .bind(role)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("User with this email already exists".into())
            }
            _ => AppError::from(e),
        })
    }

    pub async fn fetch_account(&self, id: i64) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }
}
