mod response;
pub mod webhook;

pub use response::ApiResponse;
pub use webhook::{handle_change_owner, WebhookError, WebhookServer, CHANGE_OWNER_PATH, UNASSIGNED_OWNER_ID};
