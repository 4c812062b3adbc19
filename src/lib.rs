pub mod admin;
pub mod auth;
pub mod config;
pub mod db;
pub mod diet;
pub mod error;
pub mod models;
pub mod profile;
pub mod records;
pub mod routes;
pub mod templates;
pub mod workouts;

use actix_web::web;
use config::Settings;
use error::AppError;
use sqlx::SqlitePool;

/// Every service the HTTP layer needs, built once and cloned into each worker.
#[derive(Clone)]
pub struct AppServices {
    pub auth: web::Data<auth::AuthService>,
    pub workouts: web::Data<workouts::WorkoutService>,
    pub templates: web::Data<templates::TemplateService>,
    pub diet: web::Data<diet::DietService>,
    pub profiles: web::Data<profile::ProfileService>,
    pub admin: web::Data<admin::AdminService>,
}

impl AppServices {
    pub fn new(pool: SqlitePool, settings: &Settings) -> Self {
        Self {
            auth: web::Data::new(auth::AuthService::new(pool.clone(), settings.clone())),
            workouts: web::Data::new(workouts::WorkoutService::new(pool.clone())),
            templates: web::Data::new(templates::TemplateService::new(pool.clone())),
            diet: web::Data::new(diet::DietService::new(pool.clone())),
            profiles: web::Data::new(profile::ProfileService::new(
                pool.clone(),
                settings.upload_dir.clone(),
            )),
            admin: web::Data::new(admin::AdminService::new(pool, settings.clone())),
        }
    }

    /// Register shared state, body/query error handling and all routes.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.auth.clone())
            .app_data(self.workouts.clone())
            .app_data(self.templates.clone())
            .app_data(self.diet.clone())
            .app_data(self.profiles.clone())
            .app_data(self.admin.clone())
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                AppError::validation(format!("Invalid request body: {}", err)).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                AppError::validation(format!("Invalid query: {}", err)).into()
            }))
            .configure(routes::config);
    }
}
