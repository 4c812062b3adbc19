use crate::auth::AuthService;
use crate::error::AppError;
use crate::models::{NewTemplate, TemplateQuery};
use crate::routes::extract_user;
use crate::templates::TemplateService;
use actix_web::{web, HttpRequest, HttpResponse};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/templates")
            .route("", web::get().to(list_templates))
            .route("", web::post().to(create_template))
            .route("/{id}", web::get().to(get_template))
            .route("/{id}/use", web::post().to(use_template)),
    );
}

async fn list_templates(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    templates: web::Data<TemplateService>,
    query: web::Query<TemplateQuery>,
) -> Result<HttpResponse, AppError> {
    extract_user(&req, &auth_service).await?;
    let list = templates.list_templates(&query).await?;
    Ok(HttpResponse::Ok().json(list))
}

async fn get_template(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    templates: web::Data<TemplateService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    extract_user(&req, &auth_service).await?;
    let template = templates.get_template(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(template))
}

async fn create_template(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    templates: web::Data<TemplateService>,
    body: web::Json<NewTemplate>,
) -> Result<HttpResponse, AppError> {
    let user = extract_user(&req, &auth_service).await?;
    let template = templates.create_template(user.id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(template))
}

async fn use_template(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    templates: web::Data<TemplateService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user = extract_user(&req, &auth_service).await?;
    let used = templates.use_template(user.id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(used))
}
