mod client;
mod escape;
mod select;

pub use client::*;
pub use escape::*;
pub use select::*;
