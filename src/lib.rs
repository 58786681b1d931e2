pub mod auth;
pub mod check;
pub mod cli;
pub mod drive;
pub mod help;
pub mod resolve;
pub mod settings;
pub mod sync;
pub mod upload;
pub mod util;
pub mod watch;
