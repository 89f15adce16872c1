use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid host: {0}")]
    InvalidHost(String),

    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("Invalid endpoint path: {0}. Must start with '/'")]
    InvalidPath(String),

    #[error("API listing has no endpoints")]
    NoEndpoints,
}

const ALLOWED_METHODS: [&str; 7] = ["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS"];

/// Hosts come straight from operator-controlled listings. A bare domain
/// defaults to https when the probe URL is built; an explicit scheme is
/// accepted so local and plain-http targets can be probed.
pub fn validate_host(host: &str) -> Result<(), ValidationError> {
    if host.trim().is_empty() {
        return Err(ValidationError::MissingParameter("host".to_string()));
    }

    let rest = host
        .strip_prefix("https://")
        .or_else(|| host.strip_prefix("http://"))
        .unwrap_or(host);

    if rest.is_empty() || rest.contains(char::is_whitespace) || rest.contains('/') {
        return Err(ValidationError::InvalidHost(host.to_string()));
    }

    Ok(())
}

pub fn validate_method(method: &str) -> Result<(), ValidationError> {
    if method.trim().is_empty() {
        return Err(ValidationError::MissingParameter("method".to_string()));
    }

    let upper = method.to_uppercase();
    if ALLOWED_METHODS.contains(&upper.as_str()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidMethod(method.to_string()))
    }
}

pub fn validate_path(path: &str) -> Result<(), ValidationError> {
    if path.trim().is_empty() {
        return Err(ValidationError::MissingParameter("path".to_string()));
    }

    if !path.starts_with('/') || path.contains(char::is_whitespace) {
        return Err(ValidationError::InvalidPath(path.to_string()));
    }

    Ok(())
}

pub fn validate_endpoint(host: &str, method: &str, path: &str) -> Result<(), ValidationError> {
    validate_host(host)?;
    validate_method(method)?;
    validate_path(path)?;
    Ok(())
}
