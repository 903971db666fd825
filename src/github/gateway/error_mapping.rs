//! Error mapping helpers for the Octocrab gateway.

use http::StatusCode;

use crate::github::error::ForgeError;

const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

fn is_rate_limit_message(status: StatusCode, message: &str) -> bool {
    matches!(status, StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS)
        && message.to_lowercase().contains("rate limit")
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> ForgeError {
    if let octocrab::Error::GitHub { source, .. } = error {
        let rate_limited = is_rate_limit_message(source.status_code, &source.message)
            || source
                .documentation_url
                .as_deref()
                .is_some_and(|url| url.contains("rate-limit"));
        return map_status(
            operation,
            source.status_code,
            &source.message,
            rate_limited,
        );
    }

    if is_network_error(error) {
        return ForgeError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    ForgeError::Api {
        message: format!("{operation} failed: {error}"),
    }
}

pub(super) fn map_http_error(
    operation: &str,
    status: StatusCode,
    maybe_message: Option<String>,
) -> ForgeError {
    let message = maybe_message.unwrap_or_else(|| "unknown error".to_owned());
    let rate_limited = is_rate_limit_message(status, &message);
    map_status(operation, status, &message, rate_limited)
}

fn map_status(
    operation: &str,
    status: StatusCode,
    message: &str,
    rate_limited: bool,
) -> ForgeError {
    if rate_limited {
        ForgeError::RateLimitExceeded {
            message: format!("{operation} failed: {message}"),
        }
    } else if is_auth_failure(status) {
        ForgeError::Authentication {
            message: format!("{operation} failed: GitHub returned {status} {message}"),
        }
    } else {
        ForgeError::Api {
            message: format!("{operation} failed with status {status}: {message}"),
        }
    }
}

pub(super) fn extract_github_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return None;
    };
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
}
