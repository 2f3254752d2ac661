pub mod export;
pub mod hierarchy;
pub mod pnl;
pub mod schema;
pub mod search;
pub mod seed;
