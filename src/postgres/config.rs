use tokio_postgres::{Client, NoTls};
use tracing::{debug, warn};

use crate::error::DeserializingConnectionError;

/// Connection settings for a single PostgreSQL client.
#[derive(Debug, Clone, Default)]
pub struct PostgresOptions {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub dbname: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl PostgresOptions {
    fn to_config(&self) -> Result<tokio_postgres::Config, DeserializingConnectionError> {
        let dbname = required(self.dbname.as_deref(), "dbname")?;
        let host = required(self.host.as_deref(), "host")?;
        let user = required(self.user.as_deref(), "user")?;

        let mut cfg = tokio_postgres::Config::new();
        cfg.dbname(dbname).host(host).user(user);
        if let Some(port) = self.port {
            cfg.port(port);
        }
        if let Some(password) = &self.password {
            cfg.password(password);
        }
        Ok(cfg)
    }

    /// Connect and drive the connection on a background task.
    ///
    /// # Errors
    /// Returns `ConfigError` if `dbname`, `host` or `user` is missing, or
    /// `ConnectionError` if the server can not be reached.
    pub async fn connect(&self) -> Result<Client, DeserializingConnectionError> {
        let cfg = self.to_config()?;
        debug!(host = ?self.host, dbname = ?self.dbname, "connecting to postgres");
        let (client, connection) = cfg.connect(NoTls).await.map_err(|e| {
            DeserializingConnectionError::ConnectionError(format!("postgres connect error: {e}"))
        })?;
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                warn!(error = %e, "postgres connection closed with error");
            }
        });
        Ok(client)
    }
}

fn required<'a>(
    value: Option<&'a str>,
    field: &str,
) -> Result<&'a str, DeserializingConnectionError> {
    value.ok_or_else(|| DeserializingConnectionError::ConfigError(format!("{field} is required")))
}
