use anyhow::Result;
use chrono::{Duration, Utc};
use fitfusion_backend::auth::AuthService;
use fitfusion_backend::config::Settings;
use fitfusion_backend::db;
use fitfusion_backend::models::{Account, NewExercise, NewTemplate, NewWorkout, ProfileUpdate, Role, TrainerInfo};
use fitfusion_backend::profile::ProfileService;
use fitfusion_backend::templates::TemplateService;
use fitfusion_backend::workouts::WorkoutService;
use log::info;
use serde_json::json;

/// (title, days ago, minutes, notes, [(exercise, sets, reps, kg)])
type SampleWorkout = (&'static str, i64, i64, &'static str, &'static [(&'static str, i64, i64, f64)]);

const SAMPLE_WORKOUTS: &[SampleWorkout] = &[
    ("Morning Cardio Blast", 2, 45, "Increased pace by 2km/h.", &[("Treadmill Run", 1, 1, 0.0), ("Jump Rope", 3, 100, 0.0)]),
    ("Upper Body Strength", 1, 60, "New bench PR.", &[("Bench Press", 4, 8, 80.0), ("Pull Ups", 4, 10, 0.0), ("Overhead Press", 3, 10, 45.0)]),
    ("Leg Day", 0, 55, "Squats felt heavy.", &[("Squat", 5, 5, 100.0), ("Romanian Deadlift", 3, 10, 80.0)]),
];

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let settings = Settings::from_env()?;
    let pool = db::connect(&settings.database_url).await?;

    for table in ["exercises", "workouts", "diet_entries", "workout_templates", "users"] {
        sqlx::query(&format!("DELETE FROM {}", table)).execute(&pool).await?;
    }
    info!("Cleared existing data");

    let auth = AuthService::new(pool.clone(), settings.clone());
    let profiles = ProfileService::new(pool.clone(), settings.upload_dir.clone());
    let workouts = WorkoutService::new(pool.clone());
    let templates = TemplateService::new(pool.clone());

    let admin = auth.create_account("Admin User", "admin@fitfusion.com", "admin123", Role::Admin).await?;
    info!("Admin created: {} / admin123", admin.email);
    let client = auth.create_account("John Doe", "user@fitfusion.com", "user123", Role::Client).await?;
    info!("Client created: {} / user123", client.email);
    let sarah = auth.create_account("Sarah Wilson", "sarah@fitfusion.com", "user123", Role::Client).await?;
    info!("Client created: {} / user123", sarah.email);
    let trainer = auth.create_account("Mike Johnson", "trainer@fitfusion.com", "trainer123", Role::Trainer).await?;

    profiles
        .update_profile(
            trainer.id,
            ProfileUpdate {
                bio: Some("Strength coach focused on compound lifts.".into()),
                trainer_info: Some(TrainerInfo {
                    specialization: vec!["Strength Training".into(), "Powerlifting".into()],
                    certifications: vec!["NSCA-CSCS".into()],
                    experience: 8,
                    hourly_rate: Some(60.0),
                    location: Some("Downtown Gym".into()),
                    ..Default::default()
                }),
                is_profile_public: Some(true),
                ..Default::default()
            },
        )
        .await?;
    info!("Trainer created: {} / trainer123", trainer.email);

    for owner in [&client, &sarah] {
        seed_workouts(&workouts, owner).await?;
    }

    for template in sample_templates()? {
        let created = templates.create_template(admin.id, template).await?;
        info!("Template created: {}", created.template.name);
    }

    info!("Seeding complete");
    Ok(())
}

async fn seed_workouts(service: &WorkoutService, owner: &Account) -> Result<()> {
    for (title, days_ago, minutes, notes, exercises) in SAMPLE_WORKOUTS {
        let workout = service
            .create_workout(
                owner.id,
                NewWorkout {
                    title: Some(title.to_string()),
                    duration: Some(*minutes),
                    notes: Some(notes.to_string()),
                    date: Some(Utc::now() - Duration::days(*days_ago)),
                },
            )
            .await?;

        for (name, sets, reps, weight) in exercises.iter() {
            service
                .create_exercise(
                    owner,
                    NewExercise {
                        workout_id: Some(workout.id),
                        name: Some(name.to_string()),
                        sets: Some(*sets),
                        reps: Some(*reps),
                        weight: Some(*weight),
                    },
                )
                .await?;
        }
    }
    info!("Workouts created for {}", owner.email);
    Ok(())
}

fn sample_templates() -> Result<Vec<NewTemplate>> {
    let raw = json!([
        {
            "name": "Push Day",
            "description": "Chest, shoulders and triceps",
            "category": "push",
            "difficulty": "intermediate",
            "duration": 60,
            "daysPerWeek": 2,
            "exercises": [
                { "name": "Bench Press", "sets": 4, "reps": 8, "weight": 60, "restTime": 120 },
                { "name": "Overhead Press", "sets": 3, "reps": 10, "weight": 40, "restTime": 90 },
                { "name": "Tricep Dips", "sets": 3, "reps": 12, "restTime": 60, "notes": "bodyweight" }
            ]
        },
        {
            "name": "Pull Day",
            "description": "Back and biceps",
            "category": "pull",
            "difficulty": "intermediate",
            "duration": 60,
            "daysPerWeek": 2,
            "exercises": [
                { "name": "Deadlift", "sets": 4, "reps": 5, "weight": 100, "restTime": 180 },
                { "name": "Barbell Row", "sets": 4, "reps": 8, "weight": 60, "restTime": 90 },
                { "name": "Bicep Curl", "sets": 3, "reps": 12, "weight": 12, "restTime": 60 }
            ]
        },
        {
            "name": "Leg Day",
            "description": "Quads, hamstrings and calves",
            "category": "legs",
            "difficulty": "advanced",
            "duration": 75,
            "daysPerWeek": 2,
            "exercises": [
                { "name": "Squat", "sets": 5, "reps": 5, "weight": 100, "restTime": 180 },
                { "name": "Leg Press", "sets": 4, "reps": 10, "weight": 150, "restTime": 120 },
                { "name": "Calf Raise", "sets": 4, "reps": 15, "weight": 40, "restTime": 60 }
            ]
        },
        {
            "name": "Full Body Starter",
            "description": "Three full-body sessions a week for new lifters",
            "category": "full_body",
            "difficulty": "beginner",
            "duration": 45,
            "daysPerWeek": 3,
            "exercises": [
                { "name": "Goblet Squat", "sets": 3, "reps": 10, "weight": 16, "restTime": 90 },
                { "name": "Push Up", "sets": 3, "reps": 10, "restTime": 60 },
                { "name": "Dumbbell Row", "sets": 3, "reps": 10, "weight": 14, "restTime": 60 }
            ]
        },
        {
            "name": "Upper Body Hypertrophy",
            "description": "Higher volume upper body work",
            "category": "upper",
            "difficulty": "intermediate",
            "duration": 65,
            "daysPerWeek": 2,
            "exercises": [
                { "name": "Incline Dumbbell Press", "sets": 4, "reps": 10, "weight": 24, "restTime": 90 },
                { "name": "Lat Pulldown", "sets": 4, "reps": 12, "weight": 55, "restTime": 90 },
                { "name": "Lateral Raise", "sets": 3, "reps": 15, "weight": 8, "restTime": 45 }
            ]
        }
    ]);
    Ok(serde_json::from_value(raw)?)
}
