use cmt_kernel::security::resource::ResourceGuard;

#[test]
fn resource_guard_validates_and_prefixes() {
    assert_eq!(ResourceGuard::verify("submission:123", "submission").unwrap(), "submission:123");

    assert_eq!(ResourceGuard::verify("123", "submission").unwrap(), "submission:123");

    assert!(ResourceGuard::verify("user:123", "submission").is_err());
}
