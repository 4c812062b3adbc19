use crate::error::{AppError, Result};
use crate::models::{Account, ProfileUpdate, Role};
use chrono::Utc;
use log::{info, warn};
use sqlx::types::Json;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};

pub const MAX_PICTURE_BYTES: usize = 5 * 1024 * 1024;

/// File extension for an accepted picture content type.
pub fn picture_extension(content_type: &str) -> Option<&'static str> {
    let mime = content_type.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    match mime.as_str() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

pub fn content_type_for(filename: &str) -> &'static str {
    match Path::new(filename).extension().and_then(|e| e.to_str()) {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Stored file names are flat: no separators, no parent references.
pub fn is_safe_filename(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.contains("..")
        && filename
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

pub(crate) async fn fetch_account(pool: &SqlitePool, id: i64) -> Result<Account> {
    sqlx::query_as::<_, Account>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))
}

/// Write every mutable column of `account` back to the `users` row.
pub(crate) async fn save_account(pool: &SqlitePool, account: &Account) -> Result<Account> {
    let saved = sqlx::query_as::<_, Account>(
        r#"
        UPDATE users
        SET name = ?, email = ?, role = ?, profile_picture = ?, bio = ?, phone = ?,
            date_of_birth = ?, height = ?, weight = ?, goal_weight = ?, body_type = ?,
            fitness_goals = ?, activity_level = ?, trainer_info = ?, client_info = ?,
            is_profile_public = ?, show_contact_info = ?, updated_at = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&account.name)
    .bind(&account.email)
    .bind(account.role)
    .bind(&account.profile_picture)
    .bind(&account.bio)
    .bind(&account.phone)
    .bind(account.date_of_birth)
    .bind(account.height)
    .bind(account.weight)
    .bind(account.goal_weight)
    .bind(account.body_type)
    .bind(&account.fitness_goals)
    .bind(account.activity_level)
    .bind(&account.trainer_info)
    .bind(&account.client_info)
    .bind(account.is_profile_public)
    .bind(account.show_contact_info)
    .bind(Utc::now())
    .bind(account.id)
    .fetch_one(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict("Email already in use".into())
        }
        _ => AppError::from(e),
    })?;
    Ok(saved)
}

pub(crate) fn apply_profile_update(account: &mut Account, update: ProfileUpdate) -> Result<()> {
    if let Some(name) = update.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Name must not be empty"));
        }
        account.name = name.to_string();
    }
    if let Some(bio) = update.bio {
        account.bio = bio;
    }
    if let Some(phone) = update.phone {
        account.phone = phone;
    }
    if update.date_of_birth.is_some() {
        account.date_of_birth = update.date_of_birth;
    }
    if update.height.is_some() {
        account.height = update.height;
    }
    if update.weight.is_some() {
        account.weight = update.weight;
    }
    if update.goal_weight.is_some() {
        account.goal_weight = update.goal_weight;
    }
    if let Some(body_type) = update.body_type {
        account.body_type = body_type;
    }
    if let Some(goals) = update.fitness_goals {
        account.fitness_goals = Json(goals);
    }
    if let Some(level) = update.activity_level {
        account.activity_level = level;
    }
    if let Some(info) = update.trainer_info {
        account.trainer_info = Some(Json(info));
    }
    if let Some(info) = update.client_info {
        account.client_info = Some(Json(info));
    }
    if let Some(public) = update.is_profile_public {
        account.is_profile_public = public;
    }
    if let Some(show) = update.show_contact_info {
        account.show_contact_info = show;
    }
    Ok(())
}

pub struct ProfileService {
    pool: SqlitePool,
    upload_dir: PathBuf,
}

impl ProfileService {
    pub fn new(pool: SqlitePool, upload_dir: PathBuf) -> Self {
        Self { pool, upload_dir }
    }

    pub async fn get_profile(&self, account_id: i64) -> Result<Account> {
        fetch_account(&self.pool, account_id).await
    }

    pub async fn update_profile(&self, account_id: i64, update: ProfileUpdate) -> Result<Account> {
        let mut account = fetch_account(&self.pool, account_id).await?;
        apply_profile_update(&mut account, update)?;
        info!("Updating profile for account {}", account_id);
        save_account(&self.pool, &account).await
    }

    /// Store a new picture and return its public path; the previous file is removed.
    pub async fn set_profile_picture(&self, account_id: i64, content_type: &str, bytes: &[u8]) -> Result<String> {
        if bytes.is_empty() {
            return Err(AppError::validation("No file uploaded"));
        }
        if bytes.len() > MAX_PICTURE_BYTES {
            return Err(AppError::validation("File too large (max 5MB)"));
        }
        let ext = picture_extension(content_type)
            .ok_or_else(|| AppError::validation("Only image files are allowed"))?;

        let mut account = fetch_account(&self.pool, account_id).await?;

        tokio::fs::create_dir_all(&self.upload_dir).await?;
        let filename = format!(
            "profile-{}-{}.{}",
            account_id,
            Utc::now().timestamp_millis(),
            ext
        );
        let new_path = self.upload_dir.join(&filename);
        tokio::fs::write(&new_path, bytes).await?;

        let previous = std::mem::replace(&mut account.profile_picture, format!("/uploads/{}", filename));
        let saved = match save_account(&self.pool, &account).await {
            Ok(saved) => saved,
            Err(e) => {
                if let Err(rm) = tokio::fs::remove_file(&new_path).await {
                    warn!("Could not remove unsaved picture {}: {}", filename, rm);
                }
                return Err(e);
            }
        };
        info!("Stored profile picture {} for account {}", filename, account_id);

        // the row no longer references the old file
        if let Some(old) = previous.strip_prefix("/uploads/") {
            if is_safe_filename(old) && old != filename {
                if let Err(e) = tokio::fs::remove_file(self.upload_dir.join(old)).await {
                    warn!("Could not remove old picture {}: {}", old, e);
                }
            }
        }
        Ok(saved.profile_picture)
    }

    pub async fn read_upload(&self, filename: &str) -> Result<(Vec<u8>, &'static str)> {
        if !is_safe_filename(filename) {
            return Err(AppError::not_found("File not found"));
        }
        match tokio::fs::read(self.upload_dir.join(filename)).await {
            Ok(bytes) => Ok((bytes, content_type_for(filename))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::not_found("File not found"))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Public trainer profiles, most experienced first.
    pub async fn list_trainers(&self) -> Result<Vec<Account>> {
        let mut trainers = sqlx::query_as::<_, Account>(
            "SELECT * FROM users WHERE role = ? AND is_profile_public = 1 ORDER BY id ASC",
        )
        .bind(Role::Trainer)
        .fetch_all(&self.pool)
        .await?;

        let experience = |a: &Account| a.trainer_info.as_ref().map(|t| t.experience).unwrap_or(0);
        trainers.sort_by(|a, b| experience(b).cmp(&experience(a)));
        Ok(trainers)
    }

    pub async fn get_trainer(&self, requester: &Account, id: i64) -> Result<Account> {
        let trainer = sqlx::query_as::<_, Account>("SELECT * FROM users WHERE id = ? AND role = ?")
            .bind(id)
            .bind(Role::Trainer)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found("Trainer not found"))?;

        if !trainer.is_profile_public && trainer.id != requester.id {
            return Err(AppError::forbidden("Profile is private"));
        }
        Ok(trainer)
    }
}
