mod ask;
mod chat;
mod clear;
mod config;
mod index;
mod stats;

pub use ask::AskArgs;
pub use chat::ChatArgs;
pub use clear::ClearArgs;
pub use config::ConfigCommand;
pub use index::IndexArgs;

pub use ask::handle_ask;
pub use chat::{handle_chat, handle_interactive};
pub use clear::handle_clear;
pub use config::handle_config;
pub use index::{handle_index, index_with_progress};
pub use stats::handle_stats;
