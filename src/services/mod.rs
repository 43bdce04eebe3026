pub mod account;
pub mod candles;
pub mod orders;
pub mod positions;
pub mod quotes;
pub mod selection;
pub mod task;
pub mod terminal;

pub use account::{AccountService, LoginError};
pub use candles::{CandleGenerator, CandleSeries};
pub use orders::{OrderDesk, OrderError};
pub use positions::PositionBook;
pub use quotes::QuoteSimulator;
pub use selection::Selection;
pub use task::ScopedTask;
pub use terminal::{Terminal, TerminalTasks};
