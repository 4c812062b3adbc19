use crate::auth::{is_valid_email, normalize_email, require_role, AuthService};
use crate::config::Settings;
use crate::error::{AppError, Result};
use crate::models::{require_text, Account, Exercise, ExerciseUpdate, NewExercise, Role, Workout, WorkoutUpdate};
use crate::profile::{fetch_account, save_account};
use crate::workouts::{
    apply_exercise_update, apply_workout_update, check_counts, fetch_exercise, fetch_workout,
    insert_exercise, insert_workout, save_exercise, save_workout,
};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use std::collections::HashMap;

const DEFAULT_PASSWORD: &str = "password123";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewUserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserUpdateInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewWorkoutInput {
    pub user_id: Option<i64>,
    pub title: Option<String>,
    pub duration: Option<i64>,
    pub notes: Option<String>,
    #[serde(deserialize_with = "crate::models::flexible_date::option")]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkoutUpdateInput {
    pub user_id: Option<i64>,
    #[serde(flatten)]
    pub fields: WorkoutUpdate,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExerciseUpdateInput {
    pub workout_id: Option<i64>,
    #[serde(flatten)]
    pub fields: ExerciseUpdate,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OwnerSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentSummary {
    pub id: i64,
    pub title: String,
    pub user_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminWorkout {
    #[serde(flatten)]
    pub workout: Workout,
    pub user: Option<OwnerSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminExercise {
    #[serde(flatten)]
    pub exercise: Exercise,
    pub workout: Option<ParentSummary>,
}

/// Cross-account maintenance; every call requires the admin role.
pub struct AdminService {
    pool: SqlitePool,
    auth: AuthService,
}

impl AdminService {
    pub fn new(pool: SqlitePool, settings: Settings) -> Self {
        let auth = AuthService::new(pool.clone(), settings);
        Self { pool, auth }
    }

    pub async fn list_users(&self, admin: &Account) -> Result<Vec<Account>> {
        require_role(admin, Role::Admin)?;
        let users = sqlx::query_as::<_, Account>("SELECT * FROM users ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    pub async fn create_user(&self, admin: &Account, input: NewUserInput) -> Result<Account> {
        require_role(admin, Role::Admin)?;
        let name = require_text(input.name, "Name is required")?;
        let email = normalize_email(&input.email.unwrap_or_default());
        if !is_valid_email(&email) {
            return Err(AppError::validation("Please provide a valid email address"));
        }
        let password = input
            .password
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_PASSWORD.to_string());

        info!("Admin {} creating account {}", admin.id, email);
        self.auth
            .create_account(&name, &email, &password, input.role.unwrap_or_default())
            .await
    }

    pub async fn update_user(&self, admin: &Account, id: i64, input: UserUpdateInput) -> Result<Account> {
        require_role(admin, Role::Admin)?;
        let mut account = fetch_account(&self.pool, id).await?;

        if let Some(email) = input.email {
            let email = normalize_email(&email);
            if email != account.email {
                if !is_valid_email(&email) {
                    return Err(AppError::validation("Please provide a valid email address"));
                }
                if self.auth.find_by_email(&email).await?.is_some() {
                    return Err(AppError::Conflict("Email already in use".into()));
                }
                account.email = email;
            }
        }
        if let Some(name) = input.name {
            account.name = require_text(Some(name), "Name is required")?;
        }
        if let Some(role) = input.role {
            account.role = role;
        }

        info!("Admin {} updating account {}", admin.id, id);
        save_account(&self.pool, &account).await
    }

    /// Removes the account row only; its workouts, exercises and diet entries stay behind.
    pub async fn delete_user(&self, admin: &Account, id: i64) -> Result<()> {
        require_role(admin, Role::Admin)?;
        let account = fetch_account(&self.pool, id).await?;
        info!("Admin {} deleting account {}", admin.id, account.id);
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(account.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn list_workouts(&self, admin: &Account) -> Result<Vec<AdminWorkout>> {
        require_role(admin, Role::Admin)?;
        let workouts = sqlx::query_as::<_, Workout>(
            "SELECT * FROM workouts ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        let owners = self.owner_summaries().await?;

        Ok(workouts
            .into_iter()
            .map(|workout| AdminWorkout {
                user: owners.get(&workout.user_id).cloned(),
                workout,
            })
            .collect())
    }

    pub async fn create_workout(&self, admin: &Account, input: NewWorkoutInput) -> Result<AdminWorkout> {
        require_role(admin, Role::Admin)?;
        let title = require_text(input.title, "Workout title is required")?;
        let owner = fetch_account(&self.pool, input.user_id.unwrap_or(admin.id)).await?;

        info!("Admin {} creating workout for account {}", admin.id, owner.id);
        let workout = insert_workout(
            &self.pool,
            owner.id,
            &title,
            input.duration,
            input.notes.as_deref(),
            input.date,
        )
        .await?;
        Ok(AdminWorkout {
            workout,
            user: Some(OwnerSummary {
                id: owner.id,
                name: owner.name,
                email: owner.email,
            }),
        })
    }

    pub async fn update_workout(&self, admin: &Account, id: i64, input: WorkoutUpdateInput) -> Result<AdminWorkout> {
        require_role(admin, Role::Admin)?;
        let mut workout = fetch_workout(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("Workout not found"))?;

        apply_workout_update(&mut workout, input.fields)?;
        if let Some(user_id) = input.user_id {
            workout.user_id = fetch_account(&self.pool, user_id).await?.id;
        }

        info!("Admin {} updating workout {}", admin.id, id);
        let workout = save_workout(&self.pool, &workout).await?;
        let user = sqlx::query_as::<_, OwnerSummary>("SELECT id, name, email FROM users WHERE id = ?")
            .bind(workout.user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(AdminWorkout { workout, user })
    }

    pub async fn delete_workout(&self, admin: &Account, id: i64) -> Result<()> {
        require_role(admin, Role::Admin)?;
        let workout = fetch_workout(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("Workout not found"))?;
        info!("Admin {} deleting workout {}", admin.id, workout.id);
        sqlx::query("DELETE FROM workouts WHERE id = ?")
            .bind(workout.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn list_exercises(&self, admin: &Account) -> Result<Vec<AdminExercise>> {
        require_role(admin, Role::Admin)?;
        let exercises = sqlx::query_as::<_, Exercise>(
            "SELECT * FROM exercises ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        let parents: HashMap<i64, ParentSummary> = sqlx::query_as::<_, Workout>("SELECT * FROM workouts")
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(|w| (w.id, parent_summary(&w)))
            .collect();

        Ok(exercises
            .into_iter()
            .map(|exercise| AdminExercise {
                workout: parents.get(&exercise.workout_id).cloned(),
                exercise,
            })
            .collect())
    }

    pub async fn create_exercise(&self, admin: &Account, input: NewExercise) -> Result<AdminExercise> {
        require_role(admin, Role::Admin)?;
        let workout_id = input
            .workout_id
            .ok_or_else(|| AppError::validation("workoutId is required"))?;
        let workout = fetch_workout(&self.pool, workout_id)
            .await?
            .ok_or_else(|| AppError::not_found("Workout not found"))?;

        let name = require_text(input.name, "Exercise name is required")?;
        let (sets, reps) = match (input.sets, input.reps) {
            (Some(sets), Some(reps)) => (sets, reps),
            _ => return Err(AppError::validation("Sets and reps are required")),
        };
        let weight = input.weight.unwrap_or(0.0);
        check_counts(sets, reps, weight)?;

        info!("Admin {} adding exercise to workout {}", admin.id, workout.id);
        let exercise = insert_exercise(&self.pool, workout.id, &name, sets, reps, weight).await?;
        Ok(AdminExercise {
            exercise,
            workout: Some(parent_summary(&workout)),
        })
    }

    pub async fn update_exercise(&self, admin: &Account, id: i64, input: ExerciseUpdateInput) -> Result<AdminExercise> {
        require_role(admin, Role::Admin)?;
        let mut exercise = fetch_exercise(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("Exercise not found"))?;

        apply_exercise_update(&mut exercise, input.fields)?;
        if let Some(workout_id) = input.workout_id {
            let parent = fetch_workout(&self.pool, workout_id)
                .await?
                .ok_or_else(|| AppError::not_found("Workout not found"))?;
            exercise.workout_id = parent.id;
        }

        info!("Admin {} updating exercise {}", admin.id, id);
        let exercise = save_exercise(&self.pool, &exercise).await?;
        let workout = fetch_workout(&self.pool, exercise.workout_id)
            .await?
            .map(|w| parent_summary(&w));
        Ok(AdminExercise { exercise, workout })
    }

    pub async fn delete_exercise(&self, admin: &Account, id: i64) -> Result<()> {
        require_role(admin, Role::Admin)?;
        let exercise = fetch_exercise(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("Exercise not found"))?;
        info!("Admin {} deleting exercise {}", admin.id, exercise.id);
        sqlx::query("DELETE FROM exercises WHERE id = ?")
            .bind(exercise.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn owner_summaries(&self) -> Result<HashMap<i64, OwnerSummary>> {
        let owners = sqlx::query_as::<_, OwnerSummary>("SELECT id, name, email FROM users")
            .fetch_all(&self.pool)
            .await?;
        Ok(owners.into_iter().map(|o| (o.id, o)).collect())
    }
}

fn parent_summary(workout: &Workout) -> ParentSummary {
    ParentSummary {
        id: workout.id,
        title: workout.title.clone(),
        user_id: workout.user_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn setup() -> (AdminService, Account, Account) {
        let pool = db::connect_in_memory().await.unwrap();
        let mut settings = Settings::new("test-secret");
        settings.bcrypt_cost = 4;
        let auth = AuthService::new(pool.clone(), settings.clone());
        let admin = auth
            .create_account("Admin", "admin@example.com", "admin123", Role::Admin)
            .await
            .unwrap();
        let client = auth
            .create_account("Client", "client@example.com", "client123", Role::Client)
            .await
            .unwrap();
        (AdminService::new(pool, settings), admin, client)
    }

    #[actix_web::test]
    async fn non_admins_are_refused() {
        let (admin_service, _admin, client) = setup().await;
        assert!(matches!(
            admin_service.list_users(&client).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            admin_service.delete_workout(&client, 1).await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[actix_web::test]
    async fn user_lifecycle() {
        let (admin_service, admin, client) = setup().await;

        let created = admin_service
            .create_user(
                &admin,
                NewUserInput {
                    name: Some("Trainer Tom".into()),
                    email: Some("Tom@Example.com".into()),
                    role: Some(Role::Trainer),
                    password: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(created.email, "tom@example.com");
        assert!(bcrypt::verify(DEFAULT_PASSWORD, &created.password).unwrap());

        let taken = admin_service
            .update_user(
                &admin,
                created.id,
                UserUpdateInput {
                    email: Some(client.email.clone()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(taken, Err(AppError::Conflict(_))));

        let promoted = admin_service
            .update_user(
                &admin,
                client.id,
                UserUpdateInput {
                    role: Some(Role::Trainer),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(promoted.role, Role::Trainer);

        assert_eq!(admin_service.list_users(&admin).await.unwrap().len(), 3);
    }

    #[actix_web::test]
    async fn deleting_an_account_leaves_its_workouts() {
        let (admin_service, admin, client) = setup().await;
        let workout = admin_service
            .create_workout(
                &admin,
                NewWorkoutInput {
                    user_id: Some(client.id),
                    title: Some("Leg Day".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(workout.workout.user_id, client.id);
        assert_eq!(workout.user.as_ref().unwrap().email, "client@example.com");

        admin_service.delete_user(&admin, client.id).await.unwrap();

        let workouts = admin_service.list_workouts(&admin).await.unwrap();
        assert_eq!(workouts.len(), 1);
        assert!(workouts[0].user.is_none());
    }

    #[actix_web::test]
    async fn exercise_requires_existing_workout() {
        let (admin_service, admin, _client) = setup().await;
        let missing_id = admin_service
            .create_exercise(&admin, NewExercise::default())
            .await;
        assert!(matches!(missing_id, Err(AppError::Validation(_))));

        let missing_workout = admin_service
            .create_exercise(
                &admin,
                NewExercise {
                    workout_id: Some(99),
                    name: Some("Squat".into()),
                    sets: Some(5),
                    reps: Some(5),
                    weight: None,
                },
            )
            .await;
        assert!(matches!(missing_workout, Err(AppError::NotFound(_))));
    }
}
