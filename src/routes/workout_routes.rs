use crate::auth::AuthService;
use crate::error::AppError;
use crate::models::{NewWorkout, WorkoutQuery, WorkoutUpdate};
use crate::routes::{extract_user, removed};
use crate::workouts::WorkoutService;
use actix_web::{web, HttpRequest, HttpResponse};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/workouts")
            .route("", web::get().to(list_workouts))
            .route("", web::post().to(create_workout))
            .route("/records", web::get().to(personal_records))
            .route("/{id}", web::get().to(get_workout))
            .route("/{id}", web::put().to(update_workout))
            .route("/{id}", web::delete().to(delete_workout)),
    );
}

async fn list_workouts(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    workouts: web::Data<WorkoutService>,
    query: web::Query<WorkoutQuery>,
) -> Result<HttpResponse, AppError> {
    let user = extract_user(&req, &auth_service).await?;
    let page = workouts.list_workouts(user.id, &query).await?;
    Ok(HttpResponse::Ok().json(page))
}

async fn create_workout(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    workouts: web::Data<WorkoutService>,
    body: web::Json<NewWorkout>,
) -> Result<HttpResponse, AppError> {
    let user = extract_user(&req, &auth_service).await?;
    let workout = workouts.create_workout(user.id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(workout))
}

async fn personal_records(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    workouts: web::Data<WorkoutService>,
) -> Result<HttpResponse, AppError> {
    let user = extract_user(&req, &auth_service).await?;
    let records = workouts.personal_records(&user).await?;
    Ok(HttpResponse::Ok().json(records))
}

async fn get_workout(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    workouts: web::Data<WorkoutService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user = extract_user(&req, &auth_service).await?;
    let workout = workouts.get_workout(&user, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(workout))
}

async fn update_workout(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    workouts: web::Data<WorkoutService>,
    path: web::Path<i64>,
    body: web::Json<WorkoutUpdate>,
) -> Result<HttpResponse, AppError> {
    let user = extract_user(&req, &auth_service).await?;
    let workout = workouts
        .update_workout(&user, path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(workout))
}

async fn delete_workout(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    workouts: web::Data<WorkoutService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user = extract_user(&req, &auth_service).await?;
    workouts.delete_workout(&user, path.into_inner()).await?;
    Ok(removed("Workout removed"))
}
