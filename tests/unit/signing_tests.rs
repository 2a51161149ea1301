// Signed URL issuance tests
//
// These exercise the public signing API the way the HTTP layer does:
// raw, untrusted `path` and `options` strings in, a URL or an IssueError out.

use rstest::rstest;
use utsushi::error::IssueError;
use utsushi::signing::{
    compute_signature, signing_payload, AssetPath, Credentials, SigningSecret, TransformSpec,
    UrlSigner,
};

const SECRET: &str = "test-api-secret";
const TS: u64 = 1_700_000_000;

fn signer() -> UrlSigner {
    UrlSigner::new(Credentials::resolve(
        Some("demo"),
        Some("123456"),
        Some(SECRET),
    ))
}

/// Split a signed URL into its path and query parts
fn split_url(url: &str) -> (&str, &str) {
    url.split_once('?').expect("signed URL must carry a query")
}

#[test]
fn test_reference_payload_and_url() {
    let payload = signing_payload(
        "f_auto,q_auto,dpr_auto",
        "grid/IMG_1915.jpg",
        TS,
        &SigningSecret::new(SECRET),
    );
    assert_eq!(
        payload,
        "f_auto,q_auto,dpr_auto/grid/IMG_1915.jpg1700000000test-api-secret"
    );

    let url = signer()
        .issue_signed_url_at(Some("grid/IMG_1915.jpg"), None, TS)
        .unwrap();
    let (path, query) = split_url(url.as_str());

    assert!(path.ends_with("/authenticated/f_auto,q_auto,dpr_auto/grid/IMG_1915.jpg"));
    assert_eq!(
        query,
        format!(
            "timestamp=1700000000&signature={}",
            compute_signature(payload.as_bytes())
        )
    );
}

#[test]
fn test_url_carries_exactly_one_timestamp_and_signature() {
    let url = signer()
        .issue_signed_url(Some("grid/IMG_1915.jpg"), Some("w:800"))
        .unwrap();
    let (_, query) = split_url(url.as_str());

    let keys: Vec<&str> = query
        .split('&')
        .filter_map(|pair| pair.split_once('=').map(|(k, _)| k))
        .collect();
    assert_eq!(keys, vec!["timestamp", "signature"]);
    assert_eq!(url.signature().len(), 64);
    assert!(url.signature().chars().all(|c| c.is_ascii_hexdigit()));
}

#[rstest]
#[case("/grid/x.jpg")]
#[case("grid/x.jpg")]
#[case("v123/grid/x.jpg")]
#[case("  /v1712345678/grid/x.jpg  ")]
fn test_equivalent_paths_sign_identically(#[case] raw: &str) {
    let s = signer();
    let reference = s.issue_signed_url_at(Some("grid/x.jpg"), None, TS).unwrap();
    let url = s.issue_signed_url_at(Some(raw), None, TS).unwrap();
    assert_eq!(url, reference);
}

#[rstest]
#[case(None)]
#[case(Some(""))]
#[case(Some("   "))]
fn test_missing_path_is_rejected(#[case] raw: Option<&str>) {
    let err = signer().issue_signed_url(raw, None).unwrap_err();
    assert_eq!(err, IssueError::input("Image path is required"));
    assert_eq!(err.status_code(), 400);
}

#[rstest]
#[case("grid/../secret.jpg")]
#[case("grid/%2e%2e/secret.jpg")]
#[case("grid/x.jpg?download=1")]
#[case("grid/x.jpg#frag")]
#[case("grid\\x.jpg")]
#[case("grid//x.jpg")]
#[case("grid/x y.jpg")]
#[case("grid/ümlaut.jpg")]
#[case("/")]
fn test_unsafe_paths_are_input_errors(#[case] raw: &str) {
    let err = signer().issue_signed_url(Some(raw), None).unwrap_err();
    assert_eq!(err.status_code(), 400, "path {:?} should be rejected", raw);
}

#[test]
fn test_overlong_path_is_rejected() {
    let raw = format!("grid/{}.jpg", "a".repeat(2048));
    assert!(AssetPath::parse(&raw).is_err());
}

#[rstest]
#[case(Some("demo"), None, None)]
#[case(None, Some("key"), Some(SECRET))]
#[case(Some("demo"), None, Some(SECRET))]
#[case(Some("demo"), Some("key"), None)]
#[case(Some("demo"), Some("key"), Some(""))]
fn test_any_missing_credential_fails_regardless_of_path(
    #[case] cloud: Option<&str>,
    #[case] key: Option<&str>,
    #[case] secret: Option<&str>,
) {
    let s = UrlSigner::new(Credentials::resolve(cloud, key, secret));
    assert!(!s.is_configured());

    for path in [None, Some("grid/x.jpg"), Some("grid/../x.jpg")] {
        let err = s.issue_signed_url(path, None).unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.kind(), "configuration");
    }
}

#[rstest]
#[case(None, "f_auto,q_auto,dpr_auto")]
#[case(Some(""), "f_auto,q_auto,dpr_auto")]
#[case(Some("w:800"), "w_800")]
#[case(Some("thumb,q_auto"), "w_800,q_auto")]
#[case(Some("width=1200,height=800,crop:fill"), "w_1200,h_800,c_fill")]
#[case(Some("e_sharpen,f_auto"), "e_sharpen,f_auto")]
fn test_options_become_the_transformation_segment(
    #[case] options: Option<&str>,
    #[case] segment: &str,
) {
    let url = signer()
        .issue_signed_url_at(Some("grid/x.jpg"), options, TS)
        .unwrap();
    let (path, _) = split_url(url.as_str());
    assert!(
        path.ends_with(&format!("/authenticated/{}/grid/x.jpg", segment)),
        "unexpected URL {}",
        url
    );
}

#[rstest]
#[case("w_800/e_blur")]
#[case("w_800?x=1")]
#[case("w:")]
#[case(",,,")]
fn test_malformed_options_are_input_errors(#[case] options: &str) {
    let err = signer()
        .issue_signed_url(Some("grid/x.jpg"), Some(options))
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
}

#[test]
fn test_too_many_directives_rejected() {
    let options = vec!["q_auto"; 40].join(",");
    assert!(TransformSpec::parse(&options).is_err());
}

#[test]
fn test_signature_sensitivity() {
    let s = signer();
    let base = s.issue_signed_url_at(Some("grid/x.jpg"), None, TS).unwrap();

    let variants = [
        s.issue_signed_url_at(Some("grid/y.jpg"), None, TS).unwrap(),
        s.issue_signed_url_at(Some("grid/x.jpg"), Some("w_800"), TS)
            .unwrap(),
        s.issue_signed_url_at(Some("grid/x.jpg"), None, TS + 1).unwrap(),
    ];
    for variant in variants {
        assert_ne!(variant.signature(), base.signature());
    }

    let other_secret = UrlSigner::new(Credentials::resolve(
        Some("demo"),
        Some("123456"),
        Some("another-secret"),
    ));
    let url = other_secret
        .issue_signed_url_at(Some("grid/x.jpg"), None, TS)
        .unwrap();
    assert_ne!(url.signature(), base.signature());
}

#[test]
fn test_url_never_contains_secret() {
    let url = signer()
        .issue_signed_url(Some("grid/x.jpg"), Some("w:800"))
        .unwrap();
    assert!(!url.as_str().contains(SECRET));
    assert!(!format!("{:?}", signer()).contains(SECRET));
}

#[test]
fn test_verify_accepts_issued_and_rejects_tampered() {
    let s = signer();
    let url = s
        .issue_signed_url_at(Some("grid/x.jpg"), Some("w:800"), TS)
        .unwrap();
    let path = AssetPath::parse("grid/x.jpg").unwrap();
    let transform = TransformSpec::parse("w_800").unwrap();

    assert!(s.verify(&transform, &path, TS, url.signature(), TS + 60, Some(300)));

    let other = TransformSpec::parse("w_801").unwrap();
    assert!(!s.verify(&other, &path, TS, url.signature(), TS, None));
    assert!(!s.verify(&transform, &path, TS, url.signature(), TS + 301, Some(300)));
}
