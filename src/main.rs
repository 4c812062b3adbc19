use actix_cors::Cors;
use actix_web::{App, HttpServer};
use fitfusion_backend::config::Settings;
use fitfusion_backend::{db, AppServices};
use log::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let settings = Settings::from_env()?;
    let pool = db::connect(&settings.database_url).await?;

    let services = AppServices::new(pool, &settings);
    info!("Starting server at http://{}", settings.bind_address);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        let services = services.clone();
        App::new()
            .wrap(cors)
            .configure(move |cfg| services.configure(cfg))
    })
    .bind(settings.bind_address.as_str())?
    .run()
    .await?;

    Ok(())
}
