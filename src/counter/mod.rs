mod name;
mod store;
pub use name::*;
pub use store::*;
