pub mod bills;
pub mod config;
pub mod error;
pub mod format;
pub mod navigation;
pub mod newbill;
pub mod session;
pub mod state;
pub mod store;

pub use bills::{sort_antichrono, Bill, BillStatus, BillsController, DateDisplay, DisplayBill, ReceiptModal};
pub use error::{FormatError, StoreError};
pub use format::{Formatter, LocaleFormatter};
pub use navigation::{Navigator, Route};
pub use newbill::{BillDraft, BillForm, FileSelection, NewBillController, SubmitOutcome, UploadOutcome};
pub use session::{MemorySession, SessionStore, SessionUser};
pub use state::AppContext;
pub use store::{BillPatch, BillsStore, HttpStore, ReceiptHandle, ReceiptUpload};

/// Install the global tracing subscriber. Filter comes from `RUST_LOG`,
/// JSON output from `LOG_FORMAT=json`.
pub fn init_logging() {
    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "billmind=debug,reqwest=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}
