//! Telegram adapter - delivers alerts through the Bot API `sendMessage`.
//!
//! The bot token and chat id are read from the secret store on every send,
//! so rotated secrets take effect without a restart.

mod sender;

pub use sender::TelegramAlertSender;
