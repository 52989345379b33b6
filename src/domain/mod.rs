mod details;
mod expense;
mod income;
mod money;
mod month;

pub use details::*;
pub use expense::*;
pub use income::*;
pub use money::*;
pub use month::*;
