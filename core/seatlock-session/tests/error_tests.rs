use pretty_assertions::assert_eq;
use seatlock_license::LicenseError;
use seatlock_session::AuthError;
use seatlock_store::StoreError;

#[test]
fn kinds_are_stable() {
    let cases = [
        (AuthError::Validation("x".into()), "invalid_request"),
        (AuthError::Unauthenticated("x".into()), "unauthenticated"),
        (AuthError::Superseded, "session_superseded"),
        (AuthError::LicenseExpired, "license_expired"),
        (AuthError::NotFound("x".into()), "not_found"),
        (AuthError::Conflict("x".into()), "conflict"),
        (AuthError::Store(StoreError::Backend("x".into())), "store_unavailable"),
        (AuthError::Internal("x".into()), "internal"),
    ];
    for (err, kind) in cases {
        assert_eq!(err.kind(), kind);
    }
}

#[test]
fn store_errors_keep_their_meaning() {
    assert!(matches!(
        AuthError::from(StoreError::NotFound("ana".into())),
        AuthError::NotFound(id) if id == "ana"
    ));
    assert!(matches!(
        AuthError::from(StoreError::AlreadyExists("ana".into())),
        AuthError::Conflict(_)
    ));
    assert!(matches!(
        AuthError::from(StoreError::Backend("down".into())),
        AuthError::Store(_)
    ));
    assert!(matches!(
        AuthError::from(StoreError::InvalidData("bad row".into())),
        AuthError::Store(_)
    ));
}

#[test]
fn token_rejections_are_unauthenticated() {
    for err in [
        LicenseError::InvalidSignature,
        LicenseError::InvalidTokenFormat("x".into()),
        LicenseError::InvalidPayload("x".into()),
        LicenseError::TokenExpired("x".into()),
        LicenseError::IssuedInFuture(120),
    ] {
        assert_eq!(AuthError::from(err).kind(), "unauthenticated");
    }
}

#[test]
fn other_license_errors_map_by_cause() {
    assert_eq!(
        AuthError::from(LicenseError::InvalidDeviceId("empty".into())).kind(),
        "invalid_request"
    );
    assert_eq!(AuthError::from(LicenseError::ZeroLifetime).kind(), "license_expired");
    assert_eq!(
        AuthError::from(LicenseError::InvalidKey("x".into())).kind(),
        "internal"
    );
}
