use crate::auth::{assert_owner, Owned};
use crate::error::{AppError, Result};
use crate::models::{coerce_macro, day_bounds, parse_datetime, require_text, Account, DietEntry, NewDietEntry};
use crate::records::{DailySummary, MacroGoal};
use chrono::{NaiveDate, Utc};
use log::info;
use sqlx::SqlitePool;

impl Owned for DietEntry {
    fn owner_id(&self) -> i64 {
        self.user_id
    }
}

/// `YYYY-MM-DD` or any timestamp accepted by [`parse_datetime`]; absent means today (UTC).
pub fn parse_day(raw: Option<&str>) -> Result<NaiveDate> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(Utc::now().date_naive()),
        Some(s) => parse_datetime(s)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| AppError::validation(format!("Invalid date: {}", s))),
    }
}

pub struct DietService {
    pool: SqlitePool,
}

impl DietService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_entry(&self, owner_id: i64, new: NewDietEntry) -> Result<DietEntry> {
        let name = require_text(new.name, "Meal name is required")?;
        let now = Utc::now();

        info!("Recording meal '{}' for account {}", name, owner_id);
        let entry = sqlx::query_as::<_, DietEntry>(
            r#"
            INSERT INTO diet_entries (user_id, name, calories, protein, carbs, fats, date, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(name)
        .bind(coerce_macro(new.calories.as_ref()))
        .bind(coerce_macro(new.protein.as_ref()))
        .bind(coerce_macro(new.carbs.as_ref()))
        .bind(coerce_macro(new.fats.as_ref()))
        .bind(new.date.unwrap_or(now))
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(entry)
    }

    /// Entries dated within `[day, day + 1)`, oldest recorded first.
    pub async fn list_entries_for_date(&self, owner_id: i64, day: NaiveDate) -> Result<Vec<DietEntry>> {
        let (start, end) = day_bounds(day);
        let entries = sqlx::query_as::<_, DietEntry>(
            r#"
            SELECT * FROM diet_entries
            WHERE user_id = ? AND date >= ? AND date < ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(owner_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    pub async fn daily_summary(&self, owner_id: i64, day: NaiveDate, goal: MacroGoal) -> Result<DailySummary> {
        let entries = self.list_entries_for_date(owner_id, day).await?;
        Ok(DailySummary::new(entries, goal))
    }

    pub async fn delete_entry(&self, requester: &Account, id: i64) -> Result<()> {
        let entry = sqlx::query_as::<_, DietEntry>("SELECT * FROM diet_entries WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found("Diet entry not found"))?;
        assert_owner(&entry, requester)?;

        info!("Deleting diet entry {} for account {}", id, requester.id);
        sqlx::query("DELETE FROM diet_entries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
