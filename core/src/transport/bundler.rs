mod batch;
mod destination_bundler;

pub use self::destination_bundler::*;
