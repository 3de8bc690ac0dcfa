use warp::Filter;

mod routes;
mod settings;

use routes::ConfigStore;
use settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let settings = Settings::from_env()?;
    let store = ConfigStore::new(settings.config_path());
    log::info!(
        "serving {} on http://{} (config at {})",
        settings.public_dir.display(),
        settings.bind,
        store.path().display()
    );

    let api = routes::routes(settings.public_dir.clone(), store).with(warp::log("config_server"));
    warp::serve(api).run(settings.bind).await;
    Ok(())
}
