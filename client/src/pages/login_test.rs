use super::*;

#[test]
fn validate_login_input_requires_both_fields() {
    assert_eq!(validate_login_input("", "secret"), Err(MISSING_FIELDS));
    assert_eq!(validate_login_input("   ", "secret"), Err(MISSING_FIELDS));
    assert_eq!(validate_login_input("a@b.com", ""), Err(MISSING_FIELDS));
}

#[test]
fn validate_login_input_passes_values_through() {
    assert_eq!(
        validate_login_input(" a@b.com", " pw "),
        Ok((" a@b.com".to_owned(), " pw ".to_owned()))
    );
}
