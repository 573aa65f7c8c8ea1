mod category;
mod record;

pub use category::*;
pub use record::*;
