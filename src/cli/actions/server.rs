use crate::cli::actions::Action;
use crate::kredo;
use anyhow::{Context, Result};
use url::Url;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            users_table,
        } => {
            // Fail fast on a malformed DSN before touching the pool
            let dsn = Url::parse(&dsn)
                .with_context(|| "invalid credential store DSN".to_string())?
                .to_string();

            kredo::new(port, dsn, users_table).await?;
        }
    }

    Ok(())
}
