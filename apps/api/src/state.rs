use std::sync::Arc;

use crate::auth::session::SessionProvider;
use crate::config::Config;
use crate::leads::crm::CrmSink;
use crate::leads::email::EmailSender;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Auth provider used by the session gate.
    pub auth: Arc<dyn SessionProvider>,
    /// Email provider for lead notifications. Default: Resend.
    pub mailer: Arc<dyn EmailSender>,
    /// CRM provider. Default: HubSpot.
    pub crm: Arc<dyn CrmSink>,
    pub llm: LlmClient,
}

#[cfg(test)]
pub(crate) mod testing {
    //! Fake providers for handler and middleware tests.

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use serde_json::{json, Value};
    use uuid::Uuid;

    use super::*;
    use crate::auth::session::{AuthError, AuthUser, Session};
    use crate::config::tests::config_with;
    use crate::leads::email::OutboundEmail;
    use crate::leads::models::CrmLeadProperties;
    use crate::leads::provider::ProviderError;

    #[derive(Clone, Copy)]
    enum SessionMode {
        SignedIn,
        SignedOut,
        Expired,
        Failing,
    }

    /// Session provider with a fixed answer for any token.
    #[derive(Clone)]
    pub struct StaticSessions {
        mode: SessionMode,
        calls: Arc<AtomicUsize>,
    }

    impl StaticSessions {
        fn new(mode: SessionMode) -> Self {
            Self {
                mode,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub fn signed_in() -> Self {
            Self::new(SessionMode::SignedIn)
        }

        pub fn signed_out() -> Self {
            Self::new(SessionMode::SignedOut)
        }

        pub fn expired() -> Self {
            Self::new(SessionMode::Expired)
        }

        pub fn failing() -> Self {
            Self::new(SessionMode::Failing)
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SessionProvider for StaticSessions {
        async fn get_session(&self, access_token: &str) -> Result<Option<Session>, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let session = |expires_at| Session {
                access_token: access_token.to_string(),
                user: AuthUser {
                    id: Uuid::nil(),
                    email: Some("user@example.com".to_string()),
                },
                expires_at,
            };
            match self.mode {
                SessionMode::SignedIn => Ok(Some(session(Some(Utc::now() + Duration::hours(1))))),
                SessionMode::SignedOut => Ok(None),
                SessionMode::Expired => Ok(Some(session(Some(Utc::now() - Duration::hours(1))))),
                SessionMode::Failing => Err(AuthError::Provider {
                    status: 503,
                    message: "auth unavailable".to_string(),
                }),
            }
        }
    }

    /// Records every email; optionally rejects them all.
    #[derive(Clone)]
    pub struct RecordingMailer {
        reject: bool,
        sent: Arc<Mutex<Vec<OutboundEmail>>>,
    }

    impl RecordingMailer {
        pub fn accepting() -> Self {
            Self {
                reject: false,
                sent: Arc::default(),
            }
        }

        pub fn rejecting() -> Self {
            Self {
                reject: true,
                sent: Arc::default(),
            }
        }

        pub fn sent(&self) -> Vec<OutboundEmail> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EmailSender for RecordingMailer {
        async fn send(&self, email: &OutboundEmail) -> Result<(), ProviderError> {
            if self.reject {
                return Err(ProviderError::Rejected {
                    status: 422,
                    details: json!({"message": "Invalid `to` field"}),
                });
            }
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }
    }

    #[derive(Clone)]
    enum CrmFailure {
        Rejected(u16, Value),
        Unreachable(String),
    }

    /// Records created leads, or fails every call the same way.
    #[derive(Clone)]
    pub struct FakeCrm {
        failure: Option<CrmFailure>,
        created: Arc<Mutex<Vec<CrmLeadProperties>>>,
    }

    impl FakeCrm {
        fn new(failure: Option<CrmFailure>) -> Self {
            Self {
                failure,
                created: Arc::default(),
            }
        }

        pub fn accepting() -> Self {
            Self::new(None)
        }

        pub fn rejecting(status: u16, details: Value) -> Self {
            Self::new(Some(CrmFailure::Rejected(status, details)))
        }

        pub fn unreachable(message: &str) -> Self {
            Self::new(Some(CrmFailure::Unreachable(message.to_string())))
        }

        pub fn created(&self) -> Vec<CrmLeadProperties> {
            self.created.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CrmSink for FakeCrm {
        async fn create_lead(
            &self,
            properties: &CrmLeadProperties,
        ) -> Result<Value, ProviderError> {
            match &self.failure {
                Some(CrmFailure::Rejected(status, details)) => {
                    return Err(ProviderError::Rejected {
                        status: *status,
                        details: details.clone(),
                    })
                }
                Some(CrmFailure::Unreachable(message)) => {
                    return Err(ProviderError::Transport(message.clone()))
                }
                None => {}
            }
            self.created.lock().unwrap().push(properties.clone());
            Ok(json!({"id": "lead-1", "properties": properties}))
        }
    }

    pub fn test_state(sessions: StaticSessions) -> AppState {
        test_state_with(sessions, RecordingMailer::accepting(), FakeCrm::accepting())
    }

    pub fn test_state_with(
        sessions: StaticSessions,
        mailer: RecordingMailer,
        crm: FakeCrm,
    ) -> AppState {
        AppState {
            config: Arc::new(config_with(&[])),
            auth: Arc::new(sessions),
            mailer: Arc::new(mailer),
            crm: Arc::new(crm),
            // never reached in tests
            llm: LlmClient::new(reqwest::Client::new(), "sk-test".to_string()),
        }
    }
}
