use crate::db::{DbPool, OrmConn};
use crate::notify::ReceiptNotifier;

/// Shared application services, constructed once at startup and handed to
/// every handler through the router state.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub notifier: ReceiptNotifier,
    pub admin_email: String,
}
