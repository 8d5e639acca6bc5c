//! Expense item records returned by the remote service.

pub mod types;

pub use types::ExpenseItem;
