pub mod dto;
pub mod services;

pub use dto::{BillDraft, BillForm, FileSelection, SubmitOutcome, UploadOutcome};
pub use services::NewBillController;
