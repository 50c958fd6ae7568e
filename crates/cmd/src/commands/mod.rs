pub mod cd;
pub mod config;
pub mod download;
pub mod info;
pub mod ls;
pub mod mkdir;
pub mod pwd;
pub mod reset;
pub mod rm;
pub mod upload;

pub use cd::cd_command;
pub use config::{ConfigUpdate, config_command};
pub use download::download_command;
pub use info::info_command;
pub use ls::ls_command;
pub use mkdir::mkdir_command;
pub use pwd::pwd_command;
pub use reset::reset_command;
pub use rm::rm_command;
pub use upload::upload_command;
