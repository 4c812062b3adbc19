//! Shared setup for the HTTP integration tests.
#![allow(dead_code)]

use fitfusion_backend::config::Settings;
use fitfusion_backend::models::{Account, RegisterCredentials, Role};
use fitfusion_backend::{db, AppServices};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();
static UPLOAD_DIRS: AtomicUsize = AtomicUsize::new(0);

pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

pub fn test_settings() -> Settings {
    let mut settings = Settings::new("integration-test-secret");
    settings.bcrypt_cost = 4;
    settings.upload_dir = scratch_upload_dir();
    settings
}

fn scratch_upload_dir() -> PathBuf {
    let n = UPLOAD_DIRS.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!("fitfusion-uploads-{}-{}", std::process::id(), n))
}

pub async fn services() -> AppServices {
    init_test_logging();
    let pool = db::connect_in_memory().await.unwrap();
    AppServices::new(pool, &test_settings())
}

/// Register through the service layer and return the token with the stored account.
pub async fn register(services: &AppServices, name: &str, email: &str, role: Role) -> (String, Account) {
    let resp = services
        .auth
        .register(RegisterCredentials {
            name: name.into(),
            email: email.into(),
            password: "secret123".into(),
            role: Some(role),
        })
        .await
        .unwrap();
    let account = services.auth.fetch_account(resp.user.id).await.unwrap().unwrap();
    (resp.token, account)
}

/// Admins cannot self-register, so they are inserted directly.
pub async fn admin(services: &AppServices) -> (String, Account) {
    let account = services
        .auth
        .create_account("Root", "root@fitfusion.com", "admin123", Role::Admin)
        .await
        .unwrap();
    let token = services.auth.create_token(&account).unwrap();
    (token, account)
}
