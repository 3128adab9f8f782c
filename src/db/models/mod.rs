mod audit;
mod product;
mod user;

pub use audit::*;
pub use product::*;
pub use user::*;
