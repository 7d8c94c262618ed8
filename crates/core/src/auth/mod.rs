mod error;
mod functions;
mod traits;
mod types;
mod validation;

pub use error::AuthError;
pub use functions::{calculate_expiry, email_to_name, generate_session_id, is_session_expired};
pub use traits::{Result, SessionRepository};
pub use types::{Session, SessionId};
pub use validation::validate_callback_url;
