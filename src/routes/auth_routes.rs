use crate::auth::AuthService;
use crate::error::AppError;
use crate::models::{LoginCredentials, RegisterCredentials};
use crate::routes::extract_user;
use actix_web::{web, HttpRequest, HttpResponse};
use log::info;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("", web::get().to(get_current_user))
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login)),
    );
}

async fn register(
    auth_service: web::Data<AuthService>,
    credentials: web::Json<RegisterCredentials>,
) -> Result<HttpResponse, AppError> {
    let response = auth_service.register(credentials.into_inner()).await?;
    info!("Registration successful for: {}", response.user.email);
    Ok(HttpResponse::Ok().json(response))
}

async fn login(
    auth_service: web::Data<AuthService>,
    credentials: web::Json<LoginCredentials>,
) -> Result<HttpResponse, AppError> {
    let response = auth_service.login(credentials.into_inner()).await?;
    info!("Login successful for: {}", response.user.email);
    Ok(HttpResponse::Ok().json(response))
}

async fn get_current_user(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    let user = extract_user(&req, &auth_service).await?;
    Ok(HttpResponse::Ok().json(user))
}
