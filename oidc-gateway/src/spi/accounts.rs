use super::{AuthorizationPage, ServiceProvider};
use crate::decision_client::AuthorizationResponse;
use async_trait::async_trait;
use log::{debug, info};
use oidc_core::{ClaimProvider, Claims, ProviderError, LANGUAGE_TAG_SEPARATOR};
use serde::Deserialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccountsError {
    #[error("Failed to read accounts file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse accounts file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Duplicate username in accounts file: {0}")]
    DuplicateUsername(String),
}

/// One end-user as stored in the accounts file
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub subject: String,
    pub username: String,
    /// Hex-encoded SHA-256 of the password
    pub password_sha256: String,
    /// Claim values keyed by `name` or `name#language-tag`
    #[serde(default)]
    pub claims: Claims,
}

#[derive(Debug, Deserialize)]
struct AccountsFile {
    accounts: Vec<Account>,
}

/// Fixed set of end-users loaded from a JSON file
#[derive(Debug, Clone, Default)]
pub struct StaticAccounts {
    by_subject: HashMap<String, Account>,
    subject_by_username: HashMap<String, String>,
}

impl StaticAccounts {
    pub fn new(accounts: Vec<Account>) -> Result<Self, AccountsError> {
        let mut by_subject = HashMap::with_capacity(accounts.len());
        let mut subject_by_username = HashMap::with_capacity(accounts.len());
        for account in accounts {
            if subject_by_username
                .insert(account.username.clone(), account.subject.clone())
                .is_some()
            {
                return Err(AccountsError::DuplicateUsername(account.username));
            }
            by_subject.insert(account.subject.clone(), account);
        }
        Ok(Self {
            by_subject,
            subject_by_username,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, AccountsError> {
        let file: AccountsFile = serde_json::from_str(json)?;
        Self::new(file.accounts)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AccountsError> {
        let path = path.as_ref();
        let accounts = Self::from_json(&std::fs::read_to_string(path)?)?;
        info!("Loaded {} accounts from {}", accounts.len(), path.display());
        Ok(accounts)
    }

    pub fn len(&self) -> usize {
        self.by_subject.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_subject.is_empty()
    }
}

/// Hex-encoded SHA-256 digest of `password`
pub fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

#[async_trait]
impl ClaimProvider for StaticAccounts {
    async fn claim_value(
        &self,
        subject: &str,
        claim_name: &str,
        language_tag: Option<&str>,
    ) -> Result<Option<Value>, ProviderError> {
        let Some(account) = self.by_subject.get(subject) else {
            return Ok(None);
        };
        let value = match language_tag {
            Some(tag) => account
                .claims
                .get(&format!("{claim_name}{LANGUAGE_TAG_SEPARATOR}{tag}")),
            None => account.claims.get(claim_name),
        };
        Ok(value.cloned())
    }
}

#[async_trait]
impl ServiceProvider for StaticAccounts {
    async fn authenticate_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<String>, ProviderError> {
        let Some(subject) = self.subject_by_username.get(username) else {
            debug!("Unknown username '{}'", username);
            return Ok(None);
        };
        let digest = hash_password(password);
        let matches = self
            .by_subject
            .get(subject)
            .is_some_and(|account| account.password_sha256.eq_ignore_ascii_case(&digest));
        if !matches {
            debug!("Wrong password for username '{}'", username);
        }
        Ok(matches.then(|| subject.clone()))
    }

    async fn authorization_page(
        &self,
        response: &AuthorizationResponse,
    ) -> Result<AuthorizationPage, ProviderError> {
        Ok(AuthorizationPage::Html(render_authorization_page(response)))
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn render_authorization_page(response: &AuthorizationResponse) -> String {
    let client_name = response.client_name().unwrap_or("An application");
    let scopes = response
        .scopes
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|scope| {
            format!(
                "<li><strong>{}</strong> {}</li>",
                escape_html(&scope.name),
                escape_html(scope.description.as_deref().unwrap_or(""))
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let claims = response.claims.as_deref().unwrap_or_default().join(" ");
    let claims_locales = response
        .claims_locales
        .as_deref()
        .unwrap_or_default()
        .join(" ");
    let login_hint = response
        .login_hint
        .as_deref()
        .or(response.subject.as_deref())
        .unwrap_or("");

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Authorization</title>
    <style>
        body {{ font-family: Arial, sans-serif; max-width: 400px; margin: 50px auto; padding: 20px; }}
        .form-group {{ margin-bottom: 15px; }}
        label {{ display: block; margin-bottom: 5px; }}
        input {{ width: 100%; padding: 8px; border: 1px solid #ddd; border-radius: 4px; }}
        button {{ background: #007bff; color: white; padding: 10px 20px; border: none; border-radius: 4px; cursor: pointer; }}
        button:hover {{ background: #0056b3; }}
        .scope-list {{ background: #f8f9fa; padding: 10px; border-radius: 4px; margin: 10px 0; }}
    </style>
</head>
<body>
    <h2>Authorization Required</h2>
    <p><strong>{client_name}</strong> is requesting access to your account.</p>

    <div class="scope-list">
        <strong>Requested permissions:</strong>
        <ul>
{scopes}
        </ul>
    </div>

    <form method="post" action="/api/authorization/decision">
        <input type="hidden" name="ticket" value="{ticket}">
        <input type="hidden" name="claims" value="{claims}">
        <input type="hidden" name="claims_locales" value="{claims_locales}">

        <div class="form-group">
            <label for="username">Username:</label>
            <input type="text" id="username" name="username" value="{login_hint}">
        </div>

        <div class="form-group">
            <label for="password">Password:</label>
            <input type="password" id="password" name="password">
        </div>

        <button type="submit" name="authorized" value="true">Authorize</button>
        <button type="submit" name="authorized" value="false">Deny</button>
    </form>
</body>
</html>
"#,
        client_name = escape_html(client_name),
        scopes = scopes,
        ticket = escape_html(&response.ticket),
        claims = escape_html(&claims),
        claims_locales = escape_html(&claims_locales),
        login_hint = escape_html(login_hint),
    )
}
