use crate::config::Settings;
use crate::decision_client::{DecisionApi, DecisionApiError, HttpDecisionApi};
use crate::spi::accounts::AccountsError;
use crate::spi::{NullServiceProvider, ServiceProvider, StaticAccounts};
use log::warn;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InitError {
    #[error("Failed to create decision service client: {0}")]
    DecisionApi(#[from] DecisionApiError),
    #[error(transparent)]
    Accounts(#[from] AccountsError),
}

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub decision_api: Arc<dyn DecisionApi>,
    pub provider: Arc<dyn ServiceProvider>,
}

impl AppState {
    pub fn new(settings: Settings) -> Result<Self, InitError> {
        if !settings.decision_api.has_credentials() {
            warn!("Decision service credentials are not configured, every call will be rejected");
        }

        let provider: Arc<dyn ServiceProvider> = match &settings.accounts_file {
            Some(path) => Arc::new(StaticAccounts::load(path)?),
            None => {
                warn!("No accounts file configured, end-users cannot log in");
                Arc::new(NullServiceProvider::new())
            }
        };

        Ok(Self {
            decision_api: Arc::new(HttpDecisionApi::new(&settings.decision_api)?),
            settings: Arc::new(settings),
            provider,
        })
    }

    #[cfg(test)]
    pub fn for_testing(settings: &Settings, provider: Arc<dyn ServiceProvider>) -> Self {
        Self {
            settings: Arc::new(settings.clone()),
            decision_api: Arc::new(
                HttpDecisionApi::new(&settings.decision_api)
                    .expect("Failed to create decision service client"),
            ),
            provider,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::MockServer;

    #[tokio::test]
    async fn test_app_state_new_without_accounts() {
        let mock = MockServer::start().await;
        let mut settings = Settings::for_test_with_mocks(&mock);
        settings.accounts_file = None;

        let state = AppState::new(settings).unwrap();
        assert_eq!(
            state.provider.authenticate_user("john", "john").await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_app_state_new_with_missing_accounts_file() {
        let mock = MockServer::start().await;
        let mut settings = Settings::for_test_with_mocks(&mock);
        settings.accounts_file = Some("/nonexistent/accounts.json".to_string());

        assert!(matches!(
            AppState::new(settings),
            Err(InitError::Accounts(AccountsError::Io(_)))
        ));
    }

    #[tokio::test]
    async fn test_app_state_clone() {
        let mock = MockServer::start().await;
        let settings = Settings::for_test_with_mocks(&mock);
        let state = AppState::for_testing(&settings, Arc::new(NullServiceProvider::new()));
        let state2 = state.clone();

        // After cloning, both instances should point to the same data
        assert!(Arc::ptr_eq(&state.settings, &state2.settings));
        assert!(Arc::ptr_eq(&state.provider, &state2.provider));
    }
}
