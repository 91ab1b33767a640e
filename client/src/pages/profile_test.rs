use super::*;

#[test]
fn avatar_accept_lists_allowed_extensions() {
    assert_eq!(avatar_accept(), ".jpg,.jpeg,.png,.gif");
}

#[test]
fn normalized_trims_and_drops_blank_fields() {
    let raw = Profile {
        id: "u1".into(),
        username: "  alice ".into(),
        full_name: Some("   ".into()),
        avatar_url: Some("https://cdn.test/a.png".into()),
        bio: Some(" hi there ".into()),
    };
    let clean = normalized(&raw);
    assert_eq!(clean.id, "u1");
    assert_eq!(clean.username, "alice");
    assert_eq!(clean.full_name, None);
    assert_eq!(clean.bio.as_deref(), Some("hi there"));
    assert_eq!(clean.avatar_url, raw.avatar_url);
}

#[test]
fn optional_field_handles_absent_values() {
    assert_eq!(optional_field(None), None);
    assert_eq!(optional_field(Some("")), None);
    assert_eq!(optional_field(Some(" x ")).as_deref(), Some("x"));
}
