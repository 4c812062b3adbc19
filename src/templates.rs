use crate::error::{AppError, Result};
use crate::models::{
    require_text, CreatorSummary, NewTemplate, TemplateQuery, TemplateUse, TemplateView, WorkoutTemplate,
};
use crate::workouts::{check_counts, insert_exercise, insert_workout};
use chrono::Utc;
use log::info;
use sqlx::types::Json;
use sqlx::SqlitePool;
use std::collections::HashMap;

pub struct TemplateService {
    pool: SqlitePool,
}

impl TemplateService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Public templates, most used first, then newest.
    pub async fn list_templates(&self, query: &TemplateQuery) -> Result<Vec<TemplateView>> {
        let mut sql = String::from("SELECT * FROM workout_templates WHERE is_public = 1");
        if query.category.is_some() {
            sql.push_str(" AND category = ?");
        }
        if query.difficulty.is_some() {
            sql.push_str(" AND difficulty = ?");
        }
        sql.push_str(" ORDER BY times_used DESC, created_at DESC, id DESC");

        let mut q = sqlx::query_as::<_, WorkoutTemplate>(&sql);
        if let Some(category) = query.category {
            q = q.bind(category);
        }
        if let Some(difficulty) = query.difficulty {
            q = q.bind(difficulty);
        }
        let templates = q.fetch_all(&self.pool).await?;

        let creators: HashMap<i64, CreatorSummary> = sqlx::query_as::<_, CreatorSummary>(
            r#"
            SELECT id, name, profile_picture FROM users
            WHERE id IN (SELECT created_by FROM workout_templates WHERE is_public = 1)
            "#,
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

        Ok(templates
            .into_iter()
            .map(|template| TemplateView {
                created_by: template.created_by.and_then(|id| creators.get(&id).cloned()),
                template,
            })
            .collect())
    }

    pub async fn get_template(&self, id: i64) -> Result<TemplateView> {
        let template = sqlx::query_as::<_, WorkoutTemplate>("SELECT * FROM workout_templates WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found("Template not found"))?;
        self.with_creator(template).await
    }

    async fn with_creator(&self, template: WorkoutTemplate) -> Result<TemplateView> {
        let created_by = match template.created_by {
            Some(id) => {
                sqlx::query_as::<_, CreatorSummary>(
                    "SELECT id, name, profile_picture FROM users WHERE id = ?",
                )
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
            }
            None => None,
        };
        Ok(TemplateView { template, created_by })
    }

    pub async fn create_template(&self, creator_id: i64, new: NewTemplate) -> Result<TemplateView> {
        let name = require_text(new.name, "Template name is required")?;
        let category = new
            .category
            .ok_or_else(|| AppError::validation("Template category is required"))?;
        for ex in &new.exercises {
            if ex.name.trim().is_empty() {
                return Err(AppError::validation("Exercise name is required"));
            }
            check_counts(ex.sets, ex.reps, ex.weight.unwrap_or(0.0))?;
        }

        info!("Creating template '{}' for account {}", name, creator_id);
        let now = Utc::now();
        let template = sqlx::query_as::<_, WorkoutTemplate>(
            r#"
            INSERT INTO workout_templates
            (name, description, category, difficulty, duration, days_per_week, exercises,
             created_by, is_public, times_used, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(new.description)
        .bind(category)
        .bind(new.difficulty.unwrap_or_default())
        .bind(new.duration)
        .bind(new.days_per_week.unwrap_or(3))
        .bind(Json(new.exercises))
        .bind(creator_id)
        .bind(new.is_public.unwrap_or(true))
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        self.with_creator(template).await
    }

    /// Bump the usage counter and copy the template into a new workout owned by
    /// `requester_id`, all in one transaction.
    pub async fn use_template(&self, requester_id: i64, id: i64) -> Result<TemplateUse> {
        let mut tx = self.pool.begin().await?;

        let template = sqlx::query_as::<_, WorkoutTemplate>(
            r#"
            UPDATE workout_templates
            SET times_used = times_used + 1, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found("Template not found"))?;

        let notes = format!(
            "Created from template: {}",
            template.description.as_deref().unwrap_or("")
        );
        let workout = insert_workout(
            &mut *tx,
            requester_id,
            &template.name,
            template.duration,
            Some(notes.as_str()),
            None,
        )
        .await?;

        let mut exercises = Vec::with_capacity(template.exercises.len());
        for spec in template.exercises.iter() {
            let exercise = insert_exercise(
                &mut *tx,
                workout.id,
                &spec.name,
                spec.sets,
                spec.reps,
                spec.weight.unwrap_or(0.0),
            )
            .await?;
            exercises.push(exercise);
        }

        tx.commit().await?;

        info!(
            "Template {} used by account {}: workout {} with {} exercises",
            template.id,
            requester_id,
            workout.id,
            exercises.len()
        );
        Ok(TemplateUse {
            message: "Template marked as used".to_string(),
            template: self.with_creator(template).await?,
            workout,
            exercises,
        })
    }
}
