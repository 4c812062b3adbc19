use crate::auth::AuthService;
use crate::error::AppError;
use crate::models::Account;
use actix_web::{web, HttpRequest, HttpResponse};

pub mod admin_routes;
pub mod auth_routes;
pub mod diet_routes;
pub mod exercise_routes;
pub mod profile_routes;
pub mod template_routes;
pub mod workout_routes;

/// Header carrying the session token; `Authorization: Bearer` is accepted too.
pub const TOKEN_HEADER: &str = "x-auth-token";

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(banner))
        .route("/uploads/{file}", web::get().to(profile_routes::serve_upload))
        .service(
            web::scope("/api")
                .configure(auth_routes::config)
                .configure(profile_routes::config)
                .configure(workout_routes::config)
                .configure(exercise_routes::config)
                .configure(diet_routes::config)
                .configure(template_routes::config)
                .configure(admin_routes::config),
        );
}

async fn banner() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain").body("FitFusion API Running")
}

pub fn request_token(req: &HttpRequest) -> Option<&str> {
    let custom = req
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty());

    custom.or_else(|| {
        req.headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
    })
}

pub async fn extract_user(req: &HttpRequest, auth_service: &AuthService) -> Result<Account, AppError> {
    let token = request_token(req)
        .ok_or_else(|| AppError::Unauthenticated("No token, authorization denied".into()))?;
    auth_service.validate_token(token).await
}

pub fn removed(msg: &str) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "msg": msg }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn token_from_either_header() {
        let req = TestRequest::default()
            .insert_header((TOKEN_HEADER, "abc"))
            .to_http_request();
        assert_eq!(request_token(&req), Some("abc"));

        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer xyz"))
            .to_http_request();
        assert_eq!(request_token(&req), Some("xyz"));

        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic xyz"))
            .to_http_request();
        assert_eq!(request_token(&req), None);
    }
}
