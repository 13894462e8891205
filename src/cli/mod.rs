pub mod args;

pub use args::{Arguments, Platform};
use clap::Parser;

pub fn parse() -> Arguments {
    Arguments::parse()
}
