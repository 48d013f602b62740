pub mod client;
pub mod commands;
pub mod format;
pub mod handler;
pub mod types;

pub use client::TelegramClient;
pub use handler::handle_update;
pub use types::Update;
