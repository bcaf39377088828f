pub mod address;
pub mod bundler;
mod config;
mod config_option;
pub mod dispatch;
pub mod message;
pub mod sender;
pub mod stats;
pub mod suppress_log;

pub use {
  self::address::*, self::bundler::*, self::config::*, self::config_option::*, self::dispatch::*, self::message::*,
  self::sender::*, self::stats::*, self::suppress_log::*,
};
