use crate::config::{DirectoryConfig, ThemeColor};
use crate::error::Result;
use crate::projection::ProjectedView;
use crate::session::DirectorySession;
use crate::source::RecordSource;
use log::debug;
use roster_async_utils::Debouncer;
use tokio::sync::mpsc::UnboundedReceiver;

/// Drives a [`DirectorySession`] from raw user events.
///
/// Keystrokes go through a debouncer; only settled values reach the
/// session. Group selection, highlight and theme apply immediately.
pub struct DirectoryController {
    session: DirectorySession,
    search_input: Debouncer<String>,
    settled_rx: UnboundedReceiver<String>,
}

impl DirectoryController {
    pub fn new(config: DirectoryConfig) -> Result<Self> {
        let (search_input, settled_rx) = Debouncer::new(config.debounce());
        let session = DirectorySession::new(config)?;
        Ok(Self {
            session,
            search_input,
            settled_rx,
        })
    }

    /// Run ingestion and install its outcome. Never fails: errors are absorbed
    /// by the session.
    pub async fn load(&mut self, source: &dyn RecordSource) {
        let outcome = source.fetch().await;
        self.session.finish_ingestion(outcome);
    }

    /// Raw value of the search box after a keystroke.
    ///
    /// Returns `false` when the value was dropped because the controller is
    /// shut down or no tokio runtime is running.
    pub fn handle_keystroke(&mut self, raw: impl Into<String>) -> bool {
        self.search_input.push(raw.into())
    }

    /// Wait for the next settled search value and apply it.
    ///
    /// Returns `None` once the controller has been shut down.
    pub async fn next_settled(&mut self) -> Option<String> {
        if self.search_input.is_disposed() {
            return None;
        }
        let settled = self.settled_rx.recv().await?;
        debug!("Search settled on {settled:?}");
        self.session.apply_settled_name(settled.clone());
        Some(settled)
    }

    /// Apply every settled value already delivered, without waiting.
    /// Returns how many were applied.
    pub fn apply_settled(&mut self) -> usize {
        if self.search_input.is_disposed() {
            return 0;
        }
        let mut applied = 0;
        while let Ok(settled) = self.settled_rx.try_recv() {
            self.session.apply_settled_name(settled);
            applied += 1;
        }
        applied
    }

    pub fn select_group(&mut self, group_key: impl Into<String>) {
        self.session.select_group(group_key);
    }

    pub fn set_highlight_oldest(&mut self, enabled: bool) {
        self.session.set_highlight_oldest(enabled);
    }

    pub fn set_theme(&mut self, theme: ThemeColor) {
        self.session.set_theme(theme);
    }

    pub fn view(&mut self) -> ProjectedView {
        self.session.view()
    }

    pub fn session(&self) -> &DirectorySession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut DirectorySession {
        &mut self.session
    }

    /// Whether a typed value is still waiting for its quiet period
    pub fn search_pending(&self) -> bool {
        self.search_input.is_pending()
    }

    /// Release the debounce timer. Values typed earlier are never applied.
    pub fn shutdown(&mut self) {
        self.search_input.dispose();
        self.settled_rx.close();
        while self.settled_rx.try_recv().is_ok() {}
    }
}
