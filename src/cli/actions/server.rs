use crate::{
    api,
    store::{CredentialStore, StaticCredentialStore},
};
use anyhow::{Context, Result};
use std::{path::PathBuf, sync::Arc};
use tracing::{info, warn};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub credentials: Option<PathBuf>,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the credential directory cannot be loaded or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let store = load_store(args.credentials.as_deref())?;

    api::new(args.port, store).await
}

fn load_store(path: Option<&std::path::Path>) -> Result<Arc<dyn CredentialStore>> {
    let store = if let Some(path) = path {
        StaticCredentialStore::from_json(path).context("Could not load credential directory")?
    } else {
        warn!("No credentials file configured, using the built-in demo directory");
        StaticCredentialStore::builtin()
    };

    if store.is_empty() {
        warn!("Credential directory is empty, every login will be rejected");
    } else {
        info!("Loaded {} credential entries", store.len());
    }

    Ok(Arc::new(store))
}
