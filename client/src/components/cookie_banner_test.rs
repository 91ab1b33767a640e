use super::*;

#[test]
fn every_category_has_label_and_description() {
    for category in CookieCategory::ALL {
        assert!(!category_label(category).is_empty());
        assert!(!category_description(category).is_empty());
    }
}

#[test]
fn necessary_description_says_always_on() {
    assert!(category_description(CookieCategory::Necessary).contains("Always on"));
    assert_eq!(category_label(CookieCategory::Analytics), "Analytics");
}
