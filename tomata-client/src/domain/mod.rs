mod phase;
mod sequence;
mod session;
mod settings;

pub use phase::*;
pub use sequence::*;
pub use session::*;
pub use settings::*;
