//! MongoDB client factory.

use std::time::Duration;

use docchat_kernel::settings::DatabaseSettings;
use mongodb::bson::doc;
use mongodb::options::{ClientOptions, Credential};
use mongodb::{Client, Database};

use crate::error::DbError;

/// Connect to MongoDB and select the configured database.
///
/// The server is pinged before returning, so an unreachable endpoint fails here
/// and no collection or index is ever touched.
pub async fn connect(settings: &DatabaseSettings) -> Result<Database, DbError> {
    let mut options = ClientOptions::parse(settings.connection_uri())
        .await
        .map_err(|err| DbError::InvalidUri(err.into()))?;

    options.app_name = Some(settings.app_name.clone());
    options.server_selection_timeout =
        Some(Duration::from_millis(settings.server_selection_timeout_ms));
    options.connect_timeout = Some(Duration::from_millis(settings.connect_timeout_ms));

    if let (Some(username), Some(password)) = (&settings.username, &settings.password) {
        options.credential = Some(
            Credential::builder()
                .username(username.clone())
                .password(password.clone())
                .build(),
        );
    }

    let endpoint = options
        .hosts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");

    tracing::info!(
        target: "docchat-db",
        endpoint = %endpoint,
        database = %settings.database,
        "connecting to MongoDB"
    );

    let client =
        Client::with_options(options).map_err(|err| DbError::connection(endpoint.clone(), err))?;
    let database = client.database(&settings.database);

    database
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|err| DbError::connection(endpoint.clone(), err))?;

    tracing::info!(target: "docchat-db", endpoint = %endpoint, "connected to MongoDB");
    Ok(database)
}
