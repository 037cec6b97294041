pub mod dto;
pub mod services;

pub use dto::{Bill, BillStatus, DateDisplay, DisplayBill};
pub use services::{sort_antichrono, BillsController, ReceiptModal};
