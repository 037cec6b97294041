use crate::config::{AppConfig, StoreConfig};
use crate::navigation::{Navigator, Route};
use crate::session::{MemorySession, SessionStore, SessionUser};
use crate::store::{BillsStore, HttpStore};
use std::sync::Arc;

/// Collaborators handed to the page controllers.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    /// Absent when no backend is configured; the bills page still renders.
    pub store: Option<Arc<dyn BillsStore>>,
    pub session: Arc<dyn SessionStore>,
    pub navigator: Arc<dyn Navigator>,
}

impl AppContext {
    pub fn init(navigator: Arc<dyn Navigator>) -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let store = Arc::new(HttpStore::new(&config.store)?) as Arc<dyn BillsStore>;
        let session = Arc::new(MemorySession::new()) as Arc<dyn SessionStore>;

        Ok(Self {
            config,
            store: Some(store),
            session,
            navigator,
        })
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        store: Option<Arc<dyn BillsStore>>,
        session: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            config,
            store,
            session,
            navigator,
        }
    }

    pub fn fake() -> Self {
        use crate::bills::dto::Bill;
        use crate::error::StoreError;
        use crate::store::{BillPatch, ReceiptHandle, ReceiptUpload};
        use async_trait::async_trait;

        struct FakeStore;
        #[async_trait]
        impl BillsStore for FakeStore {
            async fn list(&self) -> Result<Vec<Bill>, StoreError> {
                Ok(vec![
                    sparse_bill("1", "2024-03-26", "paid"),
                    sparse_bill("2", "2024-03-25", "unpaid"),
                ])
            }
            async fn create(&self, _upload: ReceiptUpload) -> Result<ReceiptHandle, StoreError> {
                Ok(ReceiptHandle {
                    file_url: "https://fake.local/receipt.png".into(),
                    key: "key".into(),
                })
            }
            async fn update(&self, _patch: BillPatch) -> Result<(), StoreError> {
                Ok(())
            }
        }

        struct NoopNavigator;
        impl Navigator for NoopNavigator {
            fn navigate(&self, _route: Route) {}
        }

        fn sparse_bill(id: &str, date: &str, status: &str) -> Bill {
            Bill {
                id: id.into(),
                date: date.into(),
                status: status.into(),
                email: None,
                expense_type: None,
                name: None,
                amount: None,
                vat: None,
                pct: None,
                commentary: None,
                file_url: None,
                file_name: None,
            }
        }

        let config = Arc::new(AppConfig {
            store: StoreConfig {
                base_url: "http://localhost:5678".into(),
                token: None,
                timeout_seconds: 5,
            },
        });

        let session = MemorySession::new();
        session.log_in(&SessionUser {
            email: Some("user@email.com".into()),
            role: Some("Employee".into()),
        });

        Self {
            config,
            store: Some(Arc::new(FakeStore)),
            session: Arc::new(session),
            navigator: Arc::new(NoopNavigator),
        }
    }
}
