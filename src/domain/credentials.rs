use std::fmt;

/// Token for the text-generation service.
#[derive(Clone)]
pub struct ModelCredentials {
    pub api_key: String,
}

impl ModelCredentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

impl fmt::Debug for ModelCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelCredentials")
            .field("api_key", &mask_secret(&self.api_key))
            .finish()
    }
}

/// Token plus `owner/name` repository identifier for the issue tracker.
#[derive(Clone)]
pub struct TrackerCredentials {
    pub token: String,
    pub repository: String,
}

impl TrackerCredentials {
    pub fn new(token: impl Into<String>, repository: &str) -> Result<Self, String> {
        let repository = repository.trim().trim_matches('/');
        match repository.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self {
                    token: token.into(),
                    repository: repository.to_string(),
                })
            }
            _ => Err(format!(
                "repository must look like owner/name, got '{repository}'"
            )),
        }
    }
}

impl fmt::Debug for TrackerCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackerCredentials")
            .field("token", &mask_secret(&self.token))
            .field("repository", &self.repository)
            .finish()
    }
}

pub fn mask_secret(value: &str) -> String {
    match value {
        token if token.chars().count() > 6 => {
            let chars: Vec<char> = token.chars().collect();
            let prefix: String = chars[..3].iter().collect();
            let suffix: String = chars[chars.len() - 3..].iter().collect();
            format!("{prefix}***{suffix}")
        }
        token if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}
