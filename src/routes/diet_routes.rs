use crate::auth::AuthService;
use crate::diet::{parse_day, DietService};
use crate::error::AppError;
use crate::models::{DietQuery, NewDietEntry};
use crate::records::MacroGoal;
use crate::routes::{extract_user, removed};
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/diet")
            .route("", web::get().to(list_entries))
            .route("", web::post().to(create_entry))
            .route("/summary", web::get().to(daily_summary))
            .route("/{id}", web::delete().to(delete_entry)),
    );
}

/// Day plus optional goal overrides; missing goals fall back to [`MacroGoal::default`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SummaryQuery {
    date: Option<String>,
    calories: Option<f64>,
    protein: Option<f64>,
    carbs: Option<f64>,
    fats: Option<f64>,
}

impl SummaryQuery {
    fn goal(&self) -> MacroGoal {
        let defaults = MacroGoal::default();
        MacroGoal {
            calories: self.calories.unwrap_or(defaults.calories),
            protein: self.protein.unwrap_or(defaults.protein),
            carbs: self.carbs.unwrap_or(defaults.carbs),
            fats: self.fats.unwrap_or(defaults.fats),
        }
    }
}

async fn list_entries(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    diet: web::Data<DietService>,
    query: web::Query<DietQuery>,
) -> Result<HttpResponse, AppError> {
    let user = extract_user(&req, &auth_service).await?;
    let day = parse_day(query.date.as_deref())?;
    let entries = diet.list_entries_for_date(user.id, day).await?;
    Ok(HttpResponse::Ok().json(entries))
}

async fn create_entry(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    diet: web::Data<DietService>,
    body: web::Json<NewDietEntry>,
) -> Result<HttpResponse, AppError> {
    let user = extract_user(&req, &auth_service).await?;
    let entry = diet.create_entry(user.id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(entry))
}

async fn daily_summary(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    diet: web::Data<DietService>,
    query: web::Query<SummaryQuery>,
) -> Result<HttpResponse, AppError> {
    let user = extract_user(&req, &auth_service).await?;
    let day = parse_day(query.date.as_deref())?;
    let summary = diet.daily_summary(user.id, day, query.goal()).await?;
    Ok(HttpResponse::Ok().json(summary))
}

async fn delete_entry(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    diet: web::Data<DietService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user = extract_user(&req, &auth_service).await?;
    diet.delete_entry(&user, path.into_inner()).await?;
    Ok(removed("Diet entry removed"))
}
