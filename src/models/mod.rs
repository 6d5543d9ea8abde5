//! Data models

mod department;
mod resource;
mod user;

pub use department::*;
pub use resource::*;
pub use user::*;
