pub mod account;
pub mod chart;
pub mod price;
pub mod quote;
pub mod trading;
pub mod ws;

pub use account::*;
pub use chart::*;
pub use price::*;
pub use quote::*;
pub use trading::*;
pub use ws::*;
