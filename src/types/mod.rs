mod browser;
mod platform;
mod pointer;
mod value;
mod version;

pub use browser::*;
pub use platform::*;
pub use pointer::*;
pub use value::*;
pub use version::*;
