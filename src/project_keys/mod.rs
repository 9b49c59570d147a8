pub use {service::*, types::*};

mod service;
mod types;
