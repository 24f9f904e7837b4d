mod budget;
mod expense;
mod income;
mod money;
mod savings_goal;

pub use budget::*;
pub use expense::*;
pub use income::*;
pub use money::*;
pub use savings_goal::*;
