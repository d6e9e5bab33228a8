//! CLI command implementations.

pub mod pull;
pub mod push;

use i18nsync_engine::{AirtableStore, ReqwestClient, SyncConfig, SyncResult};
use i18nsync_store::MessageFiles;

/// Opens the remote table named in `config`.
fn connect(config: &SyncConfig) -> SyncResult<AirtableStore<ReqwestClient>> {
    let client = ReqwestClient::new(config.timeout)?;
    let store = AirtableStore::new(config, client)?;
    tracing::debug!("using table {}", store.table_url());
    Ok(store)
}

fn message_files(config: &SyncConfig) -> MessageFiles {
    MessageFiles::new(&config.messages_dir)
}
