use crate::config::AppConfig;
use crate::directory::identity::IdentityProvider;
use crate::directory::RoleDirectory;
use crate::realtime::ChangeFeed;
use crate::shared::utils::DbPool;
use crate::tickets::store::TicketStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub conn: DbPool,
    pub config: Option<AppConfig>,
    pub store: Arc<dyn TicketStore>,
    pub directory: Arc<dyn RoleDirectory>,
    pub identity: Arc<dyn IdentityProvider>,
    pub change_feed: ChangeFeed,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("conn", &"DbPool")
            .field("store", &"Arc<dyn TicketStore>")
            .field("directory", &"Arc<dyn RoleDirectory>")
            .field("identity", &"Arc<dyn IdentityProvider>")
            .field("subscribers", &self.change_feed.subscriber_count())
            .finish()
    }
}
