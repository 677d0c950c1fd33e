use keyring::Entry;
use shared_types::CredentialType;

#[derive(Debug)]
pub enum KeyringError {
    NotFound {
        service: String,
        account: String,
    },
    ServiceUnavailable(String),
    OperationFailed(String),
}

impl std::fmt::Display for KeyringError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyringError::NotFound { service, account } => write!(
                f,
                "No secret for {} in keychain service {} (store one with `maintcal store-secret`)",
                account, service
            ),
            KeyringError::ServiceUnavailable(msg) => {
                write!(f, "Keychain service unavailable: {}", msg)
            }
            KeyringError::OperationFailed(msg) => write!(f, "Keychain operation failed: {}", msg),
        }
    }
}

impl std::error::Error for KeyringError {}

pub struct KeyringService;

impl KeyringService {
    /// Keychain account name: the server or calendar the secret belongs to,
    /// plus the user it authenticates.
    fn keychain_username(identifier: &str, username: &str) -> String {
        format!("{}:{}", identifier, username)
    }

    fn entry(service: &str, account: &str) -> Result<Entry, KeyringError> {
        Entry::new(service, account).map_err(|e| {
            KeyringError::ServiceUnavailable(format!("Failed to create keychain entry: {}", e))
        })
    }

    pub fn set_password(
        credential_type: &CredentialType,
        identifier: &str,
        username: &str,
        password: &str,
    ) -> Result<(), KeyringError> {
        let service = credential_type.service_name();
        let keychain_user = Self::keychain_username(identifier, username);

        Self::entry(&service, &keychain_user)?
            .set_password(password)
            .map_err(|e| KeyringError::OperationFailed(format!("Failed to store secret: {}", e)))?;

        tracing::info!("Stored secret for {} in {}", keychain_user, service);
        Ok(())
    }

    pub fn get_password(
        credential_type: &CredentialType,
        identifier: &str,
        username: &str,
    ) -> Result<String, KeyringError> {
        let service = credential_type.service_name();
        let keychain_user = Self::keychain_username(identifier, username);

        Self::entry(&service, &keychain_user)?
            .get_password()
            .map_err(|e| match e {
                keyring::Error::NoEntry => KeyringError::NotFound {
                    service: service.clone(),
                    account: keychain_user.clone(),
                },
                other => {
                    KeyringError::OperationFailed(format!("Failed to retrieve secret: {}", other))
                }
            })
    }
}
