use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Client,
    Trainer,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum BodyType {
    Ectomorph,
    #[default]
    Mesomorph,
    Endomorph,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    #[default]
    ModeratelyActive,
    VeryActive,
    ExtraActive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutPreference {
    Home,
    #[default]
    Gym,
    Both,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialMedia {
    pub instagram: Option<String>,
    pub youtube: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrainerInfo {
    pub specialization: Vec<String>,
    pub certifications: Vec<String>,
    pub experience: i64,
    pub hourly_rate: Option<f64>,
    pub availability: Option<String>,
    pub location: Option<String>,
    pub social_media: SocialMedia,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientInfo {
    pub current_trainer: Option<i64>,
    pub workout_preference: WorkoutPreference,
    pub dietary_restrictions: Vec<String>,
}

/// account representation matching the `users` table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub role: Role,
    pub profile_picture: String,
    pub bio: String,
    pub phone: String,
    pub date_of_birth: Option<DateTime<Utc>>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub goal_weight: Option<f64>,
    pub body_type: BodyType,
    pub fitness_goals: Json<Vec<String>>,
    pub activity_level: ActivityLevel,
    pub trainer_info: Option<Json<TrainerInfo>>,
    pub client_info: Option<Json<ClientInfo>>,
    pub is_profile_public: bool,
    pub show_contact_info: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// the slice of an account returned alongside a token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
            role: account.role,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginCredentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterCredentials {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: AccountSummary,
}

/// self-service profile changes; credential, email and role are not part of it
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub phone: Option<String>,
    #[serde(deserialize_with = "flexible_date::option")]
    pub date_of_birth: Option<DateTime<Utc>>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub goal_weight: Option<f64>,
    pub body_type: Option<BodyType>,
    pub fitness_goals: Option<Vec<String>>,
    pub activity_level: Option<ActivityLevel>,
    pub trainer_info: Option<TrainerInfo>,
    pub client_info: Option<ClientInfo>,
    pub is_profile_public: Option<bool>,
    pub show_contact_info: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub date: DateTime<Utc>,
    pub duration: Option<i64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewWorkout {
    pub title: Option<String>,
    pub duration: Option<i64>,
    pub notes: Option<String>,
    #[serde(deserialize_with = "flexible_date::option")]
    pub date: Option<DateTime<Utc>>,
}

/// partial update: only provided fields change
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkoutUpdate {
    pub title: Option<String>,
    pub duration: Option<i64>,
    pub notes: Option<String>,
    #[serde(deserialize_with = "flexible_date::option")]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkoutQuery {
    pub page: i64,
    pub limit: i64,
    pub search: Option<String>,
    pub sort: String,
}

impl Default for WorkoutQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            search: None,
            sort: "-date".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPage {
    pub workouts: Vec<Workout>,
    pub total_pages: i64,
    pub current_page: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: i64,
    pub workout_id: i64,
    pub name: String,
    pub sets: i64,
    pub reps: i64,
    pub weight: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewExercise {
    pub workout_id: Option<i64>,
    pub name: Option<String>,
    pub sets: Option<i64>,
    pub reps: Option<i64>,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExerciseUpdate {
    pub name: Option<String>,
    pub sets: Option<i64>,
    pub reps: Option<i64>,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DietEntry {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// macros arrive loosely typed and are coerced with [`coerce_macro`]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewDietEntry {
    pub name: Option<String>,
    pub calories: Option<Value>,
    pub protein: Option<Value>,
    pub carbs: Option<Value>,
    pub fats: Option<Value>,
    #[serde(deserialize_with = "flexible_date::option")]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DietQuery {
    pub date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Category {
    Push,
    Pull,
    Legs,
    Upper,
    Lower,
    FullBody,
    Cardio,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateExercise {
    pub name: String,
    pub sets: i64,
    pub reps: i64,
    #[serde(default)]
    pub weight: Option<f64>,
    /// seconds
    #[serde(default)]
    pub rest_time: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutTemplate {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category: Category,
    pub difficulty: Difficulty,
    pub duration: Option<i64>,
    pub days_per_week: i64,
    pub exercises: Json<Vec<TemplateExercise>>,
    /// replaced by a [`CreatorSummary`] in [`TemplateView`]
    #[serde(skip_serializing, default)]
    pub created_by: Option<i64>,
    pub is_public: bool,
    pub times_used: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewTemplate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub difficulty: Option<Difficulty>,
    pub duration: Option<i64>,
    pub days_per_week: Option<i64>,
    pub exercises: Vec<TemplateExercise>,
    pub is_public: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateQuery {
    pub category: Option<Category>,
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CreatorSummary {
    pub id: i64,
    pub name: String,
    pub profile_picture: String,
}

/// a template with its creator resolved; `createdBy` is null once the creator is gone
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateView {
    #[serde(flatten)]
    pub template: WorkoutTemplate,
    pub created_by: Option<CreatorSummary>,
}

/// result of instantiating a template
#[derive(Debug, Clone, Serialize)]
pub struct TemplateUse {
    pub message: String,
    pub template: TemplateView,
    pub workout: Workout,
    pub exercises: Vec<Exercise>,
}

/// Trimmed, non-empty text or a validation error carrying `msg`.
pub fn require_text(value: Option<String>, msg: &str) -> crate::error::Result<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(crate::error::AppError::validation(msg)),
    }
}

/// Absent or non-numeric macro values become 0; negatives are clamped to 0.
pub fn coerce_macro(value: Option<&Value>) -> f64 {
    let n = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() && n > 0.0 {
        n
    } else {
        0.0
    }
}

/// Parse RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS` (taken as UTC) or a bare `YYYY-MM-DD`.
pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|day| Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN)))
}

/// Half-open UTC window `[day 00:00, day+1 00:00)`.
pub fn day_bounds(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN));
    (start, start + chrono::Duration::days(1))
}

pub mod flexible_date {
    use super::*;
    use serde::de::Error;

    pub fn option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => parse_datetime(&s)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid date: {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn macros_are_coerced() {
        assert_eq!(coerce_macro(None), 0.0);
        assert_eq!(coerce_macro(Some(&json!(null))), 0.0);
        assert_eq!(coerce_macro(Some(&json!("abc"))), 0.0);
        assert_eq!(coerce_macro(Some(&json!("12.5"))), 12.5);
        assert_eq!(coerce_macro(Some(&json!(-3))), 0.0);
        assert_eq!(coerce_macro(Some(&json!(450))), 450.0);
    }

    #[test]
    fn parses_date_shapes() {
        let naive = parse_datetime("2024-01-15T23:59:00").unwrap();
        assert_eq!(naive.to_rfc3339(), "2024-01-15T23:59:00+00:00");

        let offset = parse_datetime("2024-01-15T23:59:00+02:00").unwrap();
        assert_eq!(offset.to_rfc3339(), "2024-01-15T21:59:00+00:00");

        let day = parse_datetime("2024-01-15").unwrap();
        assert_eq!(day.to_rfc3339(), "2024-01-15T00:00:00+00:00");

        assert!(parse_datetime("yesterday").is_none());
    }

    #[test]
    fn day_window_is_half_open() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let (start, end) = day_bounds(day);
        let late = parse_datetime("2024-01-15T23:59:00").unwrap();
        let midnight = parse_datetime("2024-01-16T00:00:00").unwrap();
        assert!(late >= start && late < end);
        assert!(!(midnight < end));
    }

    #[test]
    fn new_workout_accepts_loose_dates() {
        let w: NewWorkout = serde_json::from_value(json!({
            "title": "Leg Day",
            "duration": 60,
            "date": "2024-03-01"
        }))
        .unwrap();
        assert_eq!(w.title.as_deref(), Some("Leg Day"));
        assert_eq!(w.date.unwrap().to_rfc3339(), "2024-03-01T00:00:00+00:00");

        let bad = serde_json::from_value::<NewWorkout>(json!({ "date": "soon" }));
        assert!(bad.is_err());
    }

    #[test]
    fn account_serialization_hides_password() {
        let now = Utc::now();
        let account = Account {
            id: 1,
            name: "A".into(),
            email: "a@example.com".into(),
            password: "hash".into(),
            role: Role::Client,
            profile_picture: String::new(),
            bio: String::new(),
            phone: String::new(),
            date_of_birth: None,
            height: None,
            weight: None,
            goal_weight: None,
            body_type: BodyType::default(),
            fitness_goals: Json(vec![]),
            activity_level: ActivityLevel::default(),
            trainer_info: None,
            client_info: None,
            is_profile_public: true,
            show_contact_info: true,
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(&account).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["role"], "client");
        assert_eq!(value["activityLevel"], "moderately_active");
    }

    #[test]
    fn template_enums_use_snake_case() {
        let c: Category = serde_json::from_value(json!("full_body")).unwrap();
        assert_eq!(c, Category::FullBody);
        assert!(serde_json::from_value::<Difficulty>(json!("expert")).is_err());
    }
}
