pub mod user;
pub mod record;

pub use user::*;
pub use record::*;
