use anyhow::Context;
use docchat_app::bootstrap;
use docchat_kernel::Settings;

/// Container entrypoint: no flags, configuration comes from the environment.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load docchat settings")?;
    docchat_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.database,
        "docchat-init bootstrap starting"
    );

    bootstrap::run(&settings).await?;

    println!("{}", bootstrap::COMPLETION_MESSAGE);
    Ok(())
}
