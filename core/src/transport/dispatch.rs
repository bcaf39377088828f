pub mod dispatcher;

pub use self::dispatcher::*;
