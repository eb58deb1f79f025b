pub mod app;
pub mod app_state;
pub mod cart_handlers;
pub mod config;
pub mod extract;
pub mod role_directory;
pub mod show_handlers;
pub mod store;
pub mod token_handlers;
pub mod user_handlers;

pub use app::build_router;
pub use app_state::AppState;
pub use common_http_errors::{ApiError, ApiResult};
