pub mod log_message;

pub use log_message::LogMessage;
