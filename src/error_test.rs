use super::*;

// =============================================================================
// ProviderError classification
// =============================================================================

#[test]
fn from_status_splits_client_and_server_failures() {
    assert!(matches!(
        ProviderError::from_status(400, "bad".into()),
        ProviderError::Rejected { status: 400, .. }
    ));
    assert!(matches!(
        ProviderError::from_status(503, "down".into()),
        ProviderError::Unavailable { status: 503, .. }
    ));
}

#[test]
fn rejected_request_is_a_credential_error() {
    let err = ProviderError::from_status(400, "invalid_grant".into());
    assert_eq!(err.kind(), ErrorKind::Credential);
    assert!(!err.is_retryable());
}

#[test]
fn rate_limited_request_is_retryable() {
    let err = ProviderError::from_status(429, String::new());
    assert_eq!(err.kind(), ErrorKind::Connectivity);
    assert!(err.is_retryable());
}

#[test]
fn transport_failure_is_connectivity() {
    let err = ProviderError::Transport("connection refused".into());
    assert_eq!(err.kind(), ErrorKind::Connectivity);
    assert!(err.is_retryable());
}

#[test]
fn server_failure_is_retryable_service_error() {
    let err = ProviderError::from_status(500, String::new());
    assert_eq!(err.kind(), ErrorKind::Service);
    assert!(err.is_retryable());
}

#[test]
fn missing_configuration_is_never_retried() {
    let err = ProviderError::NotConfigured("service role key");
    assert_eq!(err.kind(), ErrorKind::Service);
    assert!(!err.is_retryable());
}

// =============================================================================
// AuthError
// =============================================================================

#[test]
fn auth_error_hides_provider_detail() {
    let source = ProviderError::from_status(400, "Invalid login credentials for alice@example.com".into());
    let err = AuthError::sign_in(&source);
    assert_eq!(err.kind(), ErrorKind::Credential);
    assert_eq!(err.to_string(), SIGN_IN_FAILED);
    assert!(!format!("{err:?}").contains("alice"));
}

#[test]
fn auth_error_keeps_connectivity_kind() {
    let err = AuthError::sign_out(&ProviderError::Transport("dns".into()));
    assert_eq!(err.kind(), ErrorKind::Connectivity);
    assert_eq!(err.message(), SIGN_OUT_FAILED);
}
