pub mod check;
pub mod init;
pub mod templates;
pub mod config;

pub use check::{handle_check, CheckArgs};
pub use init::handle_init;
pub use templates::handle_templates;
pub use config::handle_config;
