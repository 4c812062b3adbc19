use crate::auth::AuthService;
use crate::error::AppError;
use crate::models::ProfileUpdate;
use crate::profile::{ProfileService, MAX_PICTURE_BYTES};
use crate::routes::extract_user;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/profile")
            .route("/me", web::get().to(get_profile))
            .route("/me", web::put().to(update_profile))
            .service(
                web::resource("/me/picture")
                    .app_data(web::PayloadConfig::new(MAX_PICTURE_BYTES))
                    .route(web::post().to(upload_picture)),
            )
            .route("/trainers", web::get().to(list_trainers))
            .route("/trainers/{id}", web::get().to(get_trainer)),
    );
}

async fn get_profile(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    profiles: web::Data<ProfileService>,
) -> Result<HttpResponse, AppError> {
    let user = extract_user(&req, &auth_service).await?;
    let profile = profiles.get_profile(user.id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

async fn update_profile(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    profiles: web::Data<ProfileService>,
    body: web::Json<ProfileUpdate>,
) -> Result<HttpResponse, AppError> {
    let user = extract_user(&req, &auth_service).await?;
    let profile = profiles.update_profile(user.id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Raw image body; the content type picks the stored extension.
async fn upload_picture(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    profiles: web::Data<ProfileService>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let user = extract_user(&req, &auth_service).await?;
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("");

    let path = profiles
        .set_profile_picture(user.id, content_type, &body)
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "profilePicture": path,
        "message": "Profile picture updated successfully"
    })))
}

async fn list_trainers(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    profiles: web::Data<ProfileService>,
) -> Result<HttpResponse, AppError> {
    extract_user(&req, &auth_service).await?;
    let trainers = profiles.list_trainers().await?;
    Ok(HttpResponse::Ok().json(trainers))
}

async fn get_trainer(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    profiles: web::Data<ProfileService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user = extract_user(&req, &auth_service).await?;
    let trainer = profiles.get_trainer(&user, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(trainer))
}

pub async fn serve_upload(
    profiles: web::Data<ProfileService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let (bytes, content_type) = profiles.read_upload(&path).await?;
    Ok(HttpResponse::Ok().content_type(content_type).body(bytes))
}
