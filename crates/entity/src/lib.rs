pub mod employee;
pub mod pnl_record;
