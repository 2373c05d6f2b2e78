mod account;
mod health_check;
mod members;
mod session;

pub use account::me;
pub use health_check::health_check;
pub use members::sign_up;
pub use session::{login, refresh_token};
