use std::fmt;

use crate::ApifyError;

/// Environment variable holding the Apify bearer token
pub static API_KEY_VAR: &str = "APIFY_API_KEY";

/// Secret used to authenticate against the Apify API
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Result<Self, ApifyError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ApifyError::Configuration("API key is empty".to_owned()));
        }
        Ok(Self(key))
    }

    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

pub trait CredentialProvider {
    fn api_key(&self) -> Result<ApiKey, ApifyError>;
}

/// Reads the API key from a process environment variable
#[derive(Clone, Debug)]
pub struct EnvCredentials {
    var: String,
}

impl EnvCredentials {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new(API_KEY_VAR)
    }
}

impl CredentialProvider for EnvCredentials {
    fn api_key(&self) -> Result<ApiKey, ApifyError> {
        let missing = || {
            ApifyError::Configuration(format!(
                "{} is not set in the environment variables",
                self.var
            ))
        };
        let key = std::env::var(&self.var).map_err(|_| missing())?;
        ApiKey::new(key).map_err(|_| missing())
    }
}

#[derive(Clone, Debug)]
pub struct StaticCredentials(ApiKey);

impl StaticCredentials {
    pub fn new(key: ApiKey) -> Self {
        Self(key)
    }
}

impl CredentialProvider for StaticCredentials {
    fn api_key(&self) -> Result<ApiKey, ApifyError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn env_key_present() {
        std::env::set_var("APIFY_ARCHIVE_TEST_KEY_PRESENT", "secret");
        let key = EnvCredentials::new("APIFY_ARCHIVE_TEST_KEY_PRESENT")
            .api_key()
            .unwrap();
        assert_eq!("Bearer secret", key.bearer());
    }

    #[test]
    fn env_key_missing() {
        let err = EnvCredentials::new("APIFY_ARCHIVE_TEST_KEY_MISSING")
            .api_key()
            .unwrap_err();
        assert!(matches!(err, ApifyError::Configuration(_)));
        assert!(err.to_string().contains("APIFY_ARCHIVE_TEST_KEY_MISSING"));
    }

    #[test]
    fn env_key_blank() {
        std::env::set_var("APIFY_ARCHIVE_TEST_KEY_BLANK", "  ");
        let err = EnvCredentials::new("APIFY_ARCHIVE_TEST_KEY_BLANK")
            .api_key()
            .unwrap_err();
        assert!(matches!(err, ApifyError::Configuration(_)));
    }

    #[test]
    fn debug_is_redacted() {
        let key = ApiKey::new("hunter2").unwrap();
        assert!(!format!("{:?}", key).contains("hunter2"));
    }
}
