//! Authentication service for business registration, login, and token management

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use shared::models::{BusinessType, UserRole};
use shared::validation::{validate_business_code, validate_email, validate_password};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
}

/// Input for registering a new business with owner account
#[derive(Debug, Deserialize)]
pub struct RegisterBusinessInput {
    pub business_name: String,
    pub business_type: BusinessType,
    /// Short code used as prefix in generated document numbers (e.g., "ACME")
    pub business_code: String,
    pub owner_name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Response after successful registration
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub business_id: Uuid,
    pub user_id: Uuid,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Input for logging in
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Input for refreshing tokens
#[derive(Debug, Deserialize)]
pub struct RefreshInput {
    pub refresh_token: String,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub business_id: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication tokens
#[derive(Debug, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// User info from database
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    business_id: Uuid,
    email: String,
    password_hash: String,
    role: String,
    is_active: bool,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
            refresh_token_expiry: config.jwt.refresh_token_expiry,
        }
    }

    /// Register a new business with an admin owner account
    pub async fn register_business(
        &self,
        input: RegisterBusinessInput,
    ) -> AppResult<RegisterResponse> {
        validate_business_code(&input.business_code).map_err(|msg| AppError::Validation {
            field: "business_code".to_string(),
            message: msg.to_string(),
        })?;
        validate_email(&input.email).map_err(|msg| AppError::Validation {
            field: "email".to_string(),
            message: msg.to_string(),
        })?;
        validate_password(&input.password).map_err(|msg| AppError::Validation {
            field: "password".to_string(),
            message: msg.to_string(),
        })?;
        if input.business_name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "business_name".to_string(),
                message: "Business name is required".to_string(),
            });
        }

        let code_taken = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM businesses WHERE business_code = $1",
        )
        .bind(&input.business_code)
        .fetch_one(&self.db)
        .await?;

        if code_taken > 0 {
            return Err(AppError::Conflict {
                resource: "business".to_string(),
                message: "Business code already exists".to_string(),
            });
        }

        let email_taken =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = $1")
                .bind(&input.email)
                .fetch_one(&self.db)
                .await?;

        if email_taken > 0 {
            return Err(AppError::DuplicateEntry("email".to_string()));
        }

        let password_hash =
            hash(&input.password, DEFAULT_COST).map_err(|e| AppError::Internal(e.to_string()))?;

        let mut tx = self.db.begin().await?;

        let business_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO businesses (name, business_type, business_code, address, phone, email)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&input.business_name)
        .bind(input.business_type.as_str())
        .bind(&input.business_code)
        .bind(&input.address)
        .bind(&input.phone)
        .bind(&input.email)
        .fetch_one(&mut *tx)
        .await?;

        let user_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO users (business_id, email, password_hash, name, phone, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(business_id)
        .bind(&input.email)
        .bind(&password_hash)
        .bind(&input.owner_name)
        .bind(&input.phone)
        .bind(UserRole::Admin.as_str())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        let tokens = self.generate_tokens(user_id, business_id, UserRole::Admin.as_str())?;

        Ok(RegisterResponse {
            business_id,
            user_id,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: tokens.token_type,
            expires_in: tokens.expires_in,
        })
    }

    /// Log in with email and password
    pub async fn login(&self, input: LoginInput) -> AppResult<AuthTokens> {
        let user = sqlx::query_as::<_, UserRow>(
            "SELECT id, business_id, email, password_hash, role, is_active FROM users WHERE email = $1",
        )
        .bind(&input.email)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AppError::Unauthorized("Account is disabled".to_string()));
        }

        let valid = verify(&input.password, &user.password_hash)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        self.generate_tokens(user.id, user.business_id, &user.role)
    }

    /// Exchange a refresh token for a fresh token pair
    pub async fn refresh(&self, input: RefreshInput) -> AppResult<AuthTokens> {
        let claims = decode::<Claims>(
            &input.refresh_token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?
        .claims;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)?;

        // Re-check the account; a disabled user keeps their old tokens
        // only until they expire
        let user = sqlx::query_as::<_, UserRow>(
            "SELECT id, business_id, email, password_hash, role, is_active FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidToken)?;

        if !user.is_active {
            return Err(AppError::Unauthorized("Account is disabled".to_string()));
        }

        self.generate_tokens(user.id, user.business_id, &user.role)
    }

    /// Issue an access/refresh token pair
    fn generate_tokens(
        &self,
        user_id: Uuid,
        business_id: Uuid,
        role: &str,
    ) -> AppResult<AuthTokens> {
        let now = Utc::now();

        let access_claims = Claims {
            sub: user_id.to_string(),
            business_id: business_id.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.access_token_expiry)).timestamp(),
        };
        let refresh_claims = Claims {
            sub: user_id.to_string(),
            business_id: business_id.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.refresh_token_expiry)).timestamp(),
        };

        let key = EncodingKey::from_secret(self.jwt_secret.as_bytes());
        let access_token = encode(&Header::default(), &access_claims, &key)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let refresh_token = encode(&Header::default(), &refresh_claims, &key)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(AuthTokens {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }
}
