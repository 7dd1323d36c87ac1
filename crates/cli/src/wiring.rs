//! Builds the collaborators `rcr-engine` needs from CLI flags.

use anyhow::{Context, Result};
use rcr_exec::TokioResourceManager;
use rcr_notify::{NoopNotifySink, NotificationSink, WebhookNotifySink};
use rcr_security::SecurityPolicy;
use rcr_verify::IntegrityStore;
use std::path::Path;
use std::sync::Arc;

pub fn integrity_store(manifest_dir: Option<&Path>) -> Result<IntegrityStore> {
    match manifest_dir {
        Some(dir) => IntegrityStore::scan_dir(dir)
            .with_context(|| format!("failed to scan manifest directory {}", dir.display())),
        None => Ok(IntegrityStore::empty()),
    }
}

pub fn notifier(webhook: Option<String>) -> Arc<dyn NotificationSink> {
    match webhook {
        Some(url) => Arc::new(WebhookNotifySink::new(Some(url))),
        None => Arc::new(NoopNotifySink::new()),
    }
}

pub fn resource_manager() -> Arc<TokioResourceManager> {
    Arc::new(TokioResourceManager::new())
}

pub fn security_policy() -> Arc<SecurityPolicy> {
    Arc::new(SecurityPolicy::default())
}

pub fn search_path() -> String {
    std::env::var("PATH").unwrap_or_default()
}
