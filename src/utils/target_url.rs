//! Validation of URLs submitted for shortening.
//!
//! The URL is stored and echoed back exactly as submitted; this module only
//! decides whether it is acceptable.

use url::Url;

/// Reasons a target URL is rejected.
#[derive(Debug, thiserror::Error)]
pub enum TargetUrlError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must contain a host")]
    MissingHost,
}

/// Checks that `input` is an absolute HTTP(S) URL with a host.
///
/// Rejects `javascript:`, `data:`, `file:` and every other non-web scheme so a
/// short link can never redirect into one.
///
/// # Errors
///
/// Returns [`TargetUrlError`] describing the first problem found.
pub fn validate_target_url(input: &str) -> Result<(), TargetUrlError> {
    let url = Url::parse(input.trim()).map_err(|e| TargetUrlError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(TargetUrlError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(TargetUrlError::MissingHost);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(validate_target_url("http://example.com").is_ok());
        assert!(validate_target_url("https://example.com/path?q=1#frag").is_ok());
        assert!(validate_target_url("https://EXAMPLE.COM:8443/Path").is_ok());
    }

    #[test]
    fn test_rejects_relative_and_garbage() {
        assert!(matches!(
            validate_target_url("not-a-url"),
            Err(TargetUrlError::InvalidFormat(_))
        ));
        assert!(matches!(
            validate_target_url(""),
            Err(TargetUrlError::InvalidFormat(_))
        ));
        assert!(matches!(
            validate_target_url("/relative/path"),
            Err(TargetUrlError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_dangerous_schemes() {
        for input in [
            "javascript:alert(1)",
            "data:text/html,hi",
            "file:///etc/passwd",
            "ftp://example.com/file",
        ] {
            assert!(
                matches!(
                    validate_target_url(input),
                    Err(TargetUrlError::UnsupportedProtocol)
                ),
                "{input} should be rejected"
            );
        }
    }
}
