use std::sync::Arc;

use anyhow::Context;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, error, warn};

use super::dto::{BillDraft, BillForm, FileSelection, SubmitOutcome, UploadOutcome};
use crate::bills::dto::BillStatus;
use crate::error::StoreError;
use crate::navigation::{Navigator, Route};
use crate::session::{current_user, SessionStore};
use crate::state::AppContext;
use crate::store::{BillPatch, BillsStore, ReceiptUpload};

pub(crate) fn is_accepted_receipt(file_name: &str) -> bool {
    lazy_static! {
        static ref ACCEPTED_RECEIPT: Regex = Regex::new(r"(?i)\.(jpe?g|png)$").unwrap();
    }
    ACCEPTED_RECEIPT.is_match(file_name)
}

/// Integer coercion applied to the free-text `amount` and `pct` fields:
/// optional sign then leading digits, fraction truncated at the first
/// non-digit. No digits means no value, which serializes as JSON null.
fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'+') => (1, &s[1..]),
        Some(b'-') => (-1, &s[1..]),
        _ => (1, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|v| sign * v)
}

/// Drives the new-bill form across its two phases: receipt upload on file
/// selection, then full record submission. One instance per form session.
pub struct NewBillController {
    store: Arc<dyn BillsStore>,
    session: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    file_url: Option<String>,
    file_name: Option<String>,
    bill_id: Option<String>,
}

impl std::fmt::Debug for NewBillController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewBillController")
            .field("file_url", &self.file_url)
            .field("file_name", &self.file_name)
            .field("bill_id", &self.bill_id)
            .finish()
    }
}

impl NewBillController {
    pub fn new(ctx: &AppContext) -> anyhow::Result<Self> {
        let store = ctx
            .store
            .clone()
            .context("new bill page needs a configured store")?;
        Ok(Self::from_parts(
            store,
            ctx.session.clone(),
            ctx.navigator.clone(),
        ))
    }

    pub fn from_parts(
        store: Arc<dyn BillsStore>,
        session: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            store,
            session,
            navigator,
            file_url: None,
            file_name: None,
            bill_id: None,
        }
    }

    pub fn file_url(&self) -> Option<&str> {
        self.file_url.as_deref()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn bill_id(&self) -> Option<&str> {
        self.bill_id.as_deref()
    }

    /// Validate the selected receipt and upload it. Invalid files never
    /// reach the store; on upload failure the field state stays unset so
    /// the form remains submittable.
    pub async fn handle_change_file(&mut self, selection: FileSelection) -> UploadOutcome {
        if !is_accepted_receipt(&selection.file_name) {
            warn!(
                file_name = %selection.file_name,
                "refused receipt: only jpg, jpeg and png are accepted"
            );
            return UploadOutcome::Rejected {
                file_name: selection.file_name,
            };
        }

        let email = current_user(self.session.as_ref())
            .and_then(|user| user.email)
            .unwrap_or_default();

        let upload = ReceiptUpload {
            file_name: selection.file_name.clone(),
            content: selection.content,
            email,
        };

        match self.store.create(upload).await {
            Ok(handle) => {
                self.file_url = Some(handle.file_url.clone());
                self.file_name = Some(selection.file_name);
                self.bill_id = Some(handle.key.clone());
                debug!(bill_id = %handle.key, "receipt stored");
                UploadOutcome::Stored {
                    file_url: handle.file_url,
                    key: handle.key,
                }
            }
            Err(e) => {
                error!(error = %e, "receipt upload failed");
                UploadOutcome::Failed(e)
            }
        }
    }

    /// Assemble the bill from the form fields and the phase-1 upload state,
    /// send it, then navigate back to the bills list regardless of outcome.
    pub async fn handle_submit(&mut self, form: BillForm) -> SubmitOutcome {
        let email = current_user(self.session.as_ref()).and_then(|user| user.email);
        let draft = BillDraft {
            email,
            expense_type: form.expense_type,
            name: form.name,
            amount: parse_int_prefix(&form.amount),
            date: form.date,
            vat: form.vat,
            pct: parse_int_prefix(&form.pct),
            commentary: form.commentary,
            file_url: self.file_url.clone(),
            file_name: self.file_name.clone(),
            status: BillStatus::Pending,
        };

        let result = self.send(&draft).await;
        self.navigator.navigate(Route::Bills);

        match result {
            Ok(()) => SubmitOutcome::Saved,
            Err(e) => {
                warn!(error = %e, "bill submission failed");
                SubmitOutcome::FailedButNavigated(e)
            }
        }
    }

    async fn send(&self, draft: &BillDraft) -> Result<(), StoreError> {
        let data = serde_json::to_string(draft)?;
        self.store
            .update(BillPatch {
                data,
                selector: self.bill_id.clone(),
            })
            .await
    }
}

#[cfg(test)]
mod newbill_tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use bytes::Bytes;
    use serde_json::{json, Value};

    use super::*;
    use crate::bills::dto::Bill;
    use crate::session::{MemorySession, SessionUser};
    use crate::store::ReceiptHandle;

    #[derive(Default)]
    struct RecordingStore {
        creates: Mutex<Vec<ReceiptUpload>>,
        updates: Mutex<Vec<BillPatch>>,
        fail_create: bool,
        fail_update: bool,
    }

    #[async_trait]
    impl BillsStore for RecordingStore {
        async fn list(&self) -> Result<Vec<Bill>, StoreError> {
            Ok(Vec::new())
        }

        async fn create(&self, upload: ReceiptUpload) -> Result<ReceiptHandle, StoreError> {
            self.creates.lock().unwrap().push(upload);
            if self.fail_create {
                return Err(StoreError::Transport("receipt upload refused".into()));
            }
            Ok(ReceiptHandle {
                file_url: "https://store.tld/receipt.png".into(),
                key: "key".into(),
            })
        }

        async fn update(&self, patch: BillPatch) -> Result<(), StoreError> {
            self.updates.lock().unwrap().push(patch);
            if self.fail_update {
                return Err(StoreError::Transport("update refused".into()));
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingNavigator {
        routes: Mutex<Vec<Route>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, route: Route) {
            self.routes.lock().unwrap().push(route);
        }
    }

    fn seeded_session() -> Arc<MemorySession> {
        let session = MemorySession::new();
        session.log_in(&SessionUser {
            email: Some("user@email.com".into()),
            role: Some("Employee".into()),
        });
        Arc::new(session)
    }

    fn controller_with(
        store: Arc<RecordingStore>,
        navigator: Arc<RecordingNavigator>,
    ) -> NewBillController {
        NewBillController::from_parts(store, seeded_session(), navigator)
    }

    fn filled_form() -> BillForm {
        BillForm {
            expense_type: "type".into(),
            name: "name".into(),
            amount: "3000".into(),
            date: "date".into(),
            vat: "vat".into(),
            pct: "25".into(),
            commentary: "commentary".into(),
        }
    }

    #[tokio::test]
    async fn valid_file_uploads_once_with_session_email() {
        let store = Arc::new(RecordingStore::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let mut controller = controller_with(Arc::clone(&store), navigator);

        let outcome = controller
            .handle_change_file(FileSelection::new("image.png", Bytes::from_static(b"img")))
            .await;

        assert!(matches!(outcome, UploadOutcome::Stored { .. }));
        let creates = store.creates.lock().unwrap();
        assert_eq!(creates.len(), 1);
        assert_eq!(creates[0].email, "user@email.com");
        assert_eq!(creates[0].file_name, "image.png");

        assert_eq!(controller.file_url(), Some("https://store.tld/receipt.png"));
        assert_eq!(controller.file_name(), Some("image.png"));
        assert_eq!(controller.bill_id(), Some("key"));
    }

    #[tokio::test]
    async fn disallowed_extension_never_reaches_store() {
        let store = Arc::new(RecordingStore::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let mut controller = controller_with(Arc::clone(&store), navigator);

        let outcome = controller
            .handle_change_file(FileSelection::new("document.pdf", Bytes::from_static(b"%PDF")))
            .await;

        match outcome {
            UploadOutcome::Rejected { file_name } => assert_eq!(file_name, "document.pdf"),
            other => panic!("expected rejection, got {other:?}"),
        }
        assert!(store.creates.lock().unwrap().is_empty());
        assert_eq!(controller.file_url(), None);
        assert_eq!(controller.bill_id(), None);
    }

    #[tokio::test]
    async fn extension_check_is_case_insensitive() {
        let store = Arc::new(RecordingStore::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let mut controller = controller_with(Arc::clone(&store), navigator);

        let outcome = controller
            .handle_change_file(FileSelection::new("SCAN.PNG", Bytes::from_static(b"img")))
            .await;

        assert!(matches!(outcome, UploadOutcome::Stored { .. }));
        assert_eq!(store.creates.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn submit_without_upload_sends_null_file_fields() {
        let store = Arc::new(RecordingStore::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let mut controller = controller_with(Arc::clone(&store), Arc::clone(&navigator));

        let outcome = controller.handle_submit(filled_form()).await;
        assert!(matches!(outcome, SubmitOutcome::Saved));

        let updates = store.updates.lock().unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].selector, None);

        let sent: Value = serde_json::from_str(&updates[0].data).expect("payload is JSON");
        assert_eq!(
            sent,
            json!({
                "email": "user@email.com",
                "type": "type",
                "name": "name",
                "amount": 3000,
                "date": "date",
                "vat": "vat",
                "pct": 25,
                "commentary": "commentary",
                "fileUrl": null,
                "fileName": null,
                "status": "pending",
            })
        );

        assert_eq!(*navigator.routes.lock().unwrap(), vec![Route::Bills]);
    }

    #[tokio::test]
    async fn submit_after_upload_carries_file_state_and_selector() {
        let store = Arc::new(RecordingStore::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let mut controller = controller_with(Arc::clone(&store), Arc::clone(&navigator));

        controller
            .handle_change_file(FileSelection::new("image.png", Bytes::from_static(b"img")))
            .await;
        controller.handle_submit(filled_form()).await;

        let updates = store.updates.lock().unwrap();
        assert_eq!(updates[0].selector.as_deref(), Some("key"));

        let sent: Value = serde_json::from_str(&updates[0].data).unwrap();
        assert_eq!(sent["fileUrl"], "https://store.tld/receipt.png");
        assert_eq!(sent["fileName"], "image.png");
        assert_eq!(sent["status"], "pending");
    }

    #[tokio::test]
    async fn submit_navigates_even_when_update_fails() {
        let store = Arc::new(RecordingStore {
            fail_update: true,
            ..RecordingStore::default()
        });
        let navigator = Arc::new(RecordingNavigator::default());
        let mut controller = controller_with(Arc::clone(&store), Arc::clone(&navigator));

        let outcome = controller.handle_submit(filled_form()).await;

        assert!(matches!(outcome, SubmitOutcome::FailedButNavigated(_)));
        assert_eq!(*navigator.routes.lock().unwrap(), vec![Route::Bills]);
    }

    #[tokio::test]
    async fn upload_failure_leaves_form_usable_with_null_file_fields() {
        let store = Arc::new(RecordingStore {
            fail_create: true,
            ..RecordingStore::default()
        });
        let navigator = Arc::new(RecordingNavigator::default());
        let mut controller = controller_with(Arc::clone(&store), Arc::clone(&navigator));

        let outcome = controller
            .handle_change_file(FileSelection::new("image.png", Bytes::from_static(b"img")))
            .await;
        assert!(matches!(outcome, UploadOutcome::Failed(_)));
        assert_eq!(controller.file_url(), None);
        assert_eq!(controller.file_name(), None);
        assert_eq!(controller.bill_id(), None);

        let outcome = controller.handle_submit(filled_form()).await;
        assert!(matches!(outcome, SubmitOutcome::Saved));

        let updates = store.updates.lock().unwrap();
        let sent: Value = serde_json::from_str(&updates[0].data).unwrap();
        assert_eq!(sent["fileUrl"], Value::Null);
        assert_eq!(sent["fileName"], Value::Null);
    }

    #[test]
    fn accepted_receipt_extensions() {
        assert!(is_accepted_receipt("image.png"));
        assert!(is_accepted_receipt("image.jpg"));
        assert!(is_accepted_receipt("image.jpeg"));
        assert!(is_accepted_receipt("IMAGE.JPEG"));
        assert!(!is_accepted_receipt("document.pdf"));
        assert!(!is_accepted_receipt("archive.png.zip"));
        assert!(!is_accepted_receipt("png"));
    }

    #[test]
    fn integer_prefix_parsing_matches_form_coercion() {
        assert_eq!(parse_int_prefix("3000"), Some(3000));
        assert_eq!(parse_int_prefix("25"), Some(25));
        assert_eq!(parse_int_prefix("30.5"), Some(30));
        assert_eq!(parse_int_prefix(" 42"), Some(42));
        assert_eq!(parse_int_prefix("-7"), Some(-7));
        assert_eq!(parse_int_prefix("+8"), Some(8));
        assert_eq!(parse_int_prefix("12abc"), Some(12));
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("."), None);
    }
}
