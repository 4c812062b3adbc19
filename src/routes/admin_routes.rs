use crate::admin::{AdminService, ExerciseUpdateInput, NewUserInput, NewWorkoutInput, UserUpdateInput, WorkoutUpdateInput};
use crate::auth::AuthService;
use crate::error::AppError;
use crate::models::NewExercise;
use crate::routes::{extract_user, removed};
use actix_web::{web, HttpRequest, HttpResponse};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/users", web::get().to(list_users))
            .route("/users", web::post().to(create_user))
            .route("/users/{id}", web::put().to(update_user))
            .route("/users/{id}", web::delete().to(delete_user))
            .route("/workouts", web::get().to(list_workouts))
            .route("/workouts", web::post().to(create_workout))
            .route("/workouts/{id}", web::put().to(update_workout))
            .route("/workouts/{id}", web::delete().to(delete_workout))
            .route("/exercises", web::get().to(list_exercises))
            .route("/exercises", web::post().to(create_exercise))
            .route("/exercises/{id}", web::put().to(update_exercise))
            .route("/exercises/{id}", web::delete().to(delete_exercise)),
    );
}

async fn list_users(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    admin: web::Data<AdminService>,
) -> Result<HttpResponse, AppError> {
    let user = extract_user(&req, &auth_service).await?;
    Ok(HttpResponse::Ok().json(admin.list_users(&user).await?))
}

async fn create_user(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    admin: web::Data<AdminService>,
    body: web::Json<NewUserInput>,
) -> Result<HttpResponse, AppError> {
    let user = extract_user(&req, &auth_service).await?;
    let created = admin.create_user(&user, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(created))
}

async fn update_user(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    admin: web::Data<AdminService>,
    path: web::Path<i64>,
    body: web::Json<UserUpdateInput>,
) -> Result<HttpResponse, AppError> {
    let user = extract_user(&req, &auth_service).await?;
    let updated = admin
        .update_user(&user, path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}

async fn delete_user(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    admin: web::Data<AdminService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user = extract_user(&req, &auth_service).await?;
    admin.delete_user(&user, path.into_inner()).await?;
    Ok(removed("User removed"))
}

async fn list_workouts(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    admin: web::Data<AdminService>,
) -> Result<HttpResponse, AppError> {
    let user = extract_user(&req, &auth_service).await?;
    Ok(HttpResponse::Ok().json(admin.list_workouts(&user).await?))
}

async fn create_workout(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    admin: web::Data<AdminService>,
    body: web::Json<NewWorkoutInput>,
) -> Result<HttpResponse, AppError> {
    let user = extract_user(&req, &auth_service).await?;
    let created = admin.create_workout(&user, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(created))
}

async fn update_workout(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    admin: web::Data<AdminService>,
    path: web::Path<i64>,
    body: web::Json<WorkoutUpdateInput>,
) -> Result<HttpResponse, AppError> {
    let user = extract_user(&req, &auth_service).await?;
    let updated = admin
        .update_workout(&user, path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}

async fn delete_workout(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    admin: web::Data<AdminService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user = extract_user(&req, &auth_service).await?;
    admin.delete_workout(&user, path.into_inner()).await?;
    Ok(removed("Workout removed"))
}

async fn list_exercises(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    admin: web::Data<AdminService>,
) -> Result<HttpResponse, AppError> {
    let user = extract_user(&req, &auth_service).await?;
    Ok(HttpResponse::Ok().json(admin.list_exercises(&user).await?))
}

async fn create_exercise(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    admin: web::Data<AdminService>,
    body: web::Json<NewExercise>,
) -> Result<HttpResponse, AppError> {
    let user = extract_user(&req, &auth_service).await?;
    let created = admin.create_exercise(&user, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(created))
}

async fn update_exercise(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    admin: web::Data<AdminService>,
    path: web::Path<i64>,
    body: web::Json<ExerciseUpdateInput>,
) -> Result<HttpResponse, AppError> {
    let user = extract_user(&req, &auth_service).await?;
    let updated = admin
        .update_exercise(&user, path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}

async fn delete_exercise(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    admin: web::Data<AdminService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user = extract_user(&req, &auth_service).await?;
    admin.delete_exercise(&user, path.into_inner()).await?;
    Ok(removed("Exercise removed"))
}
