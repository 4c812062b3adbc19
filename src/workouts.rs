use crate::auth::{assert_owner_or_role, Owned};
use crate::error::{AppError, Result};
use crate::models::{
    require_text, Account, Exercise, ExerciseUpdate, NewExercise, NewWorkout, Role, Workout,
    WorkoutPage, WorkoutQuery, WorkoutUpdate,
};
use crate::records::{self, PersonalRecord};
use chrono::{DateTime, Utc};
use log::info;
use sqlx::{Sqlite, SqlitePool};

impl Owned for Workout {
    fn owner_id(&self) -> i64 {
        self.user_id
    }
}

/// Map a `sort` parameter (`field` or `-field`) to an ORDER BY clause.
pub fn sort_clause(sort: &str) -> Result<String> {
    let sort = sort.trim();
    let (field, direction) = match sort.strip_prefix('-') {
        Some(field) => (field, "DESC"),
        None => (sort, "ASC"),
    };
    let column = match field {
        "date" => "date",
        "title" => "title",
        "duration" => "duration",
        "createdAt" | "created_at" => "created_at",
        other => {
            return Err(AppError::validation(format!("Cannot sort by '{}'", other)));
        }
    };
    Ok(format!("{} {}, id {}", column, direction, direction))
}

/// Lower-cased LIKE pattern matching `search` literally anywhere in the text.
pub fn contains_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// `ceil(count / limit)` for `limit >= 1`, without overflowing on huge limits.
pub fn page_count(count: i64, limit: i64) -> i64 {
    count / limit + i64::from(count % limit != 0)
}

pub(crate) fn check_counts(sets: i64, reps: i64, weight: f64) -> Result<()> {
    if sets < 0 || reps < 0 {
        return Err(AppError::validation("Sets and reps must not be negative"));
    }
    if !weight.is_finite() || weight < 0.0 {
        return Err(AppError::validation("Weight must not be negative"));
    }
    Ok(())
}

pub(crate) async fn insert_workout<'e, E>(
    executor: E,
    owner_id: i64,
    title: &str,
    duration: Option<i64>,
    notes: Option<&str>,
    date: Option<DateTime<Utc>>,
) -> Result<Workout>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let now = Utc::now();
    let workout = sqlx::query_as::<_, Workout>(
        r#"
        INSERT INTO workouts (user_id, title, date, duration, notes, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(owner_id)
    .bind(title.to_string())
    .bind(date.unwrap_or(now))
    .bind(duration)
    .bind(notes.map(str::to_string))
    .bind(now)
    .bind(now)
    .fetch_one(executor)
    .await?;
    Ok(workout)
}

pub(crate) async fn insert_exercise<'e, E>(
    executor: E,
    workout_id: i64,
    name: &str,
    sets: i64,
    reps: i64,
    weight: f64,
) -> Result<Exercise>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let now = Utc::now();
    let exercise = sqlx::query_as::<_, Exercise>(
        r#"
        INSERT INTO exercises (workout_id, name, sets, reps, weight, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(workout_id)
    .bind(name.to_string())
    .bind(sets)
    .bind(reps)
    .bind(weight)
    .bind(now)
    .bind(now)
    .fetch_one(executor)
    .await?;
    Ok(exercise)
}

pub(crate) async fn fetch_workout(pool: &SqlitePool, id: i64) -> Result<Option<Workout>> {
    let workout = sqlx::query_as::<_, Workout>("SELECT * FROM workouts WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(workout)
}

pub(crate) async fn fetch_exercise(pool: &SqlitePool, id: i64) -> Result<Option<Exercise>> {
    let exercise = sqlx::query_as::<_, Exercise>("SELECT * FROM exercises WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(exercise)
}

pub(crate) async fn save_workout(pool: &SqlitePool, workout: &Workout) -> Result<Workout> {
    let saved = sqlx::query_as::<_, Workout>(
        r#"
        UPDATE workouts
        SET user_id = ?, title = ?, date = ?, duration = ?, notes = ?, updated_at = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(workout.user_id)
    .bind(&workout.title)
    .bind(workout.date)
    .bind(workout.duration)
    .bind(&workout.notes)
    .bind(Utc::now())
    .bind(workout.id)
    .fetch_one(pool)
    .await?;
    Ok(saved)
}

pub(crate) async fn save_exercise(pool: &SqlitePool, exercise: &Exercise) -> Result<Exercise> {
    let saved = sqlx::query_as::<_, Exercise>(
        r#"
        UPDATE exercises
        SET workout_id = ?, name = ?, sets = ?, reps = ?, weight = ?, updated_at = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(exercise.workout_id)
    .bind(&exercise.name)
    .bind(exercise.sets)
    .bind(exercise.reps)
    .bind(exercise.weight)
    .bind(Utc::now())
    .bind(exercise.id)
    .fetch_one(pool)
    .await?;
    Ok(saved)
}

pub(crate) fn apply_workout_update(workout: &mut Workout, update: WorkoutUpdate) -> Result<()> {
    if let Some(title) = update.title {
        workout.title = require_text(Some(title), "Workout title is required")?;
    }
    if let Some(duration) = update.duration {
        workout.duration = Some(duration);
    }
    if let Some(notes) = update.notes {
        workout.notes = Some(notes);
    }
    if let Some(date) = update.date {
        workout.date = date;
    }
    Ok(())
}

pub(crate) fn apply_exercise_update(exercise: &mut Exercise, update: ExerciseUpdate) -> Result<()> {
    if let Some(name) = update.name {
        exercise.name = require_text(Some(name), "Exercise name is required")?;
    }
    if let Some(sets) = update.sets {
        exercise.sets = sets;
    }
    if let Some(reps) = update.reps {
        exercise.reps = reps;
    }
    if let Some(weight) = update.weight {
        exercise.weight = weight;
    }
    check_counts(exercise.sets, exercise.reps, exercise.weight)
}

/// Workouts and their exercises, scoped to the owning account.
pub struct WorkoutService {
    pool: SqlitePool,
}

impl WorkoutService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_workout(&self, owner_id: i64, new: NewWorkout) -> Result<Workout> {
        let title = require_text(new.title, "Workout title is required")?;
        info!("Creating workout '{}' for account {}", title, owner_id);
        insert_workout(
            &self.pool,
            owner_id,
            &title,
            new.duration,
            new.notes.as_deref(),
            new.date,
        )
        .await
    }

    pub async fn list_workouts(&self, owner_id: i64, query: &WorkoutQuery) -> Result<WorkoutPage> {
        if query.page < 1 || query.limit < 1 {
            return Err(AppError::validation("page and limit must be at least 1"));
        }
        let order_by = sort_clause(&query.sort)?;
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let mut filter = String::from("WHERE user_id = ?");
        if search.is_some() {
            filter.push_str(r" AND LOWER(title) LIKE ? ESCAPE '\'");
        }

        let count_sql = format!("SELECT COUNT(*) FROM workouts {}", filter);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(owner_id);
        if let Some(s) = search {
            count_query = count_query.bind(contains_pattern(s));
        }
        let count = count_query.fetch_one(&self.pool).await?;

        let list_sql = format!(
            "SELECT * FROM workouts {} ORDER BY {} LIMIT ? OFFSET ?",
            filter, order_by
        );
        let mut list_query = sqlx::query_as::<_, Workout>(&list_sql).bind(owner_id);
        if let Some(s) = search {
            list_query = list_query.bind(contains_pattern(s));
        }
        let workouts = list_query
            .bind(query.limit)
            .bind((query.page - 1).saturating_mul(query.limit))
            .fetch_all(&self.pool)
            .await?;

        Ok(WorkoutPage {
            workouts,
            total_pages: page_count(count, query.limit),
            current_page: query.page,
        })
    }

    pub async fn get_workout(&self, requester: &Account, id: i64) -> Result<Workout> {
        let workout = fetch_workout(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("Workout not found"))?;
        assert_owner_or_role(&workout, requester, Role::Admin)?;
        Ok(workout)
    }

    pub async fn update_workout(&self, requester: &Account, id: i64, update: WorkoutUpdate) -> Result<Workout> {
        let mut workout = self.get_workout(requester, id).await?;
        apply_workout_update(&mut workout, update)?;
        info!("Updating workout {} for account {}", id, requester.id);
        save_workout(&self.pool, &workout).await
    }

    pub async fn delete_workout(&self, requester: &Account, id: i64) -> Result<()> {
        let workout = self.get_workout(requester, id).await?;
        info!("Deleting workout {} for account {}", workout.id, requester.id);
        sqlx::query("DELETE FROM workouts WHERE id = ?")
            .bind(workout.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn create_exercise(&self, requester: &Account, new: NewExercise) -> Result<Exercise> {
        let workout_id = new
            .workout_id
            .ok_or_else(|| AppError::validation("workoutId is required"))?;
        let workout = self.get_workout(requester, workout_id).await?;

        let name = require_text(new.name, "Exercise name is required")?;
        let (sets, reps) = match (new.sets, new.reps) {
            (Some(sets), Some(reps)) => (sets, reps),
            _ => return Err(AppError::validation("Sets and reps are required")),
        };
        let weight = new.weight.unwrap_or(0.0);
        check_counts(sets, reps, weight)?;

        info!("Adding exercise '{}' to workout {}", name, workout.id);
        insert_exercise(&self.pool, workout.id, &name, sets, reps, weight).await
    }

    pub async fn list_exercises(&self, requester: &Account, workout_id: i64) -> Result<Vec<Exercise>> {
        let workout = self.get_workout(requester, workout_id).await?;
        self.exercises_for(workout.id).await
    }

    pub async fn update_exercise(&self, requester: &Account, id: i64, update: ExerciseUpdate) -> Result<Exercise> {
        let mut exercise = self.owned_exercise(requester, id).await?;
        apply_exercise_update(&mut exercise, update)?;
        info!("Updating exercise {} for account {}", id, requester.id);
        save_exercise(&self.pool, &exercise).await
    }

    pub async fn delete_exercise(&self, requester: &Account, id: i64) -> Result<()> {
        let exercise = self.owned_exercise(requester, id).await?;
        info!("Deleting exercise {} for account {}", exercise.id, requester.id);
        sqlx::query("DELETE FROM exercises WHERE id = ?")
            .bind(exercise.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Personal records across the requester's lifting sessions.
    pub async fn personal_records(&self, requester: &Account) -> Result<Vec<PersonalRecord>> {
        let workouts = sqlx::query_as::<_, Workout>(
            "SELECT * FROM workouts WHERE user_id = ? ORDER BY date DESC, id DESC",
        )
        .bind(requester.id)
        .fetch_all(&self.pool)
        .await?;

        let mut sessions = Vec::new();
        for workout in workouts {
            if !records::is_strength_workout(&workout.title) {
                continue;
            }
            let exercises = self.exercises_for(workout.id).await?;
            sessions.push((workout, exercises));
        }

        Ok(records::personal_records(&sessions))
    }

    async fn exercises_for(&self, workout_id: i64) -> Result<Vec<Exercise>> {
        let exercises = sqlx::query_as::<_, Exercise>(
            "SELECT * FROM exercises WHERE workout_id = ? ORDER BY id ASC",
        )
        .bind(workout_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(exercises)
    }

    /// Load an exercise and check the requester owns its parent workout.
    async fn owned_exercise(&self, requester: &Account, id: i64) -> Result<Exercise> {
        let exercise = fetch_exercise(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("Exercise not found"))?;
        let parent = fetch_workout(&self.pool, exercise.workout_id)
            .await?
            .ok_or_else(|| AppError::not_found("Workout not found"))?;
        assert_owner_or_role(&parent, requester, Role::Admin)?;
        Ok(exercise)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_parameters() {
        assert_eq!(sort_clause("-date").unwrap(), "date DESC, id DESC");
        assert_eq!(sort_clause("title").unwrap(), "title ASC, id ASC");
        assert_eq!(sort_clause("-createdAt").unwrap(), "created_at DESC, id DESC");
        assert!(matches!(
            sort_clause("password; DROP TABLE users"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn page_counts_round_up() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(2, i64::MAX), 1);
        assert_eq!(page_count(i64::MAX, 1), i64::MAX);
    }

    #[test]
    fn search_pattern_is_literal() {
        assert_eq!(contains_pattern("Leg"), "%leg%");
        assert_eq!(contains_pattern("100%_"), r"%100\%\_%");
    }

    #[test]
    fn partial_update_leaves_other_fields() {
        let now = Utc::now();
        let mut workout = Workout {
            id: 1,
            user_id: 1,
            title: "Leg Day".into(),
            date: now,
            duration: Some(60),
            notes: Some("heavy".into()),
            created_at: now,
            updated_at: now,
        };
        apply_workout_update(
            &mut workout,
            WorkoutUpdate {
                duration: Some(75),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(workout.title, "Leg Day");
        assert_eq!(workout.duration, Some(75));
        assert_eq!(workout.notes.as_deref(), Some("heavy"));

        let blank = apply_workout_update(
            &mut workout,
            WorkoutUpdate {
                title: Some("  ".into()),
                ..Default::default()
            },
        );
        assert!(matches!(blank, Err(AppError::Validation(_))));
    }
}
