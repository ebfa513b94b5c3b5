//! Defines the messages accepted by the interchain swap application.
mod deposit;
mod make_pool;
mod swap;
mod take_pool;
mod withdraw;

pub use deposit::*;
pub use make_pool::*;
pub use swap::*;
pub use take_pool::*;
pub use withdraw::*;
