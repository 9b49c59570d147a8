pub use {client::*, error::*, response::*};

mod client;
mod error;
mod response;
