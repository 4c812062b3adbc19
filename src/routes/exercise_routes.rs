use crate::auth::AuthService;
use crate::error::AppError;
use crate::models::{ExerciseUpdate, NewExercise};
use crate::routes::{extract_user, removed};
use crate::workouts::WorkoutService;
use actix_web::{web, HttpRequest, HttpResponse};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/exercises")
            .route("", web::post().to(create_exercise))
            .route("/{workout_id}", web::get().to(list_exercises))
            .route("/{id}", web::put().to(update_exercise))
            .route("/{id}", web::delete().to(delete_exercise)),
    );
}

async fn create_exercise(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    workouts: web::Data<WorkoutService>,
    body: web::Json<NewExercise>,
) -> Result<HttpResponse, AppError> {
    let user = extract_user(&req, &auth_service).await?;
    let exercise = workouts.create_exercise(&user, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(exercise))
}

// path segment is the parent workout id
async fn list_exercises(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    workouts: web::Data<WorkoutService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user = extract_user(&req, &auth_service).await?;
    let exercises = workouts.list_exercises(&user, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(exercises))
}

async fn update_exercise(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    workouts: web::Data<WorkoutService>,
    path: web::Path<i64>,
    body: web::Json<ExerciseUpdate>,
) -> Result<HttpResponse, AppError> {
    let user = extract_user(&req, &auth_service).await?;
    let exercise = workouts
        .update_exercise(&user, path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(exercise))
}

async fn delete_exercise(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    workouts: web::Data<WorkoutService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user = extract_user(&req, &auth_service).await?;
    workouts.delete_exercise(&user, path.into_inner()).await?;
    Ok(removed("Exercise removed"))
}
