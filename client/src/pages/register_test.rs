use time::macros::date;

use super::*;

#[test]
fn latest_eligible_birthdate_is_eighteen_years_back() {
    assert_eq!(latest_eligible_birthdate(date!(2024 - 06 - 15)), "2006-06-15");
}

#[test]
fn latest_eligible_birthdate_handles_leap_day() {
    assert_eq!(latest_eligible_birthdate(date!(2024 - 02 - 29)), "2006-02-28");
}

#[test]
fn latest_eligible_birthdate_is_old_enough() {
    let today = date!(2024 - 06 - 15);
    let latest = Date::parse(
        &latest_eligible_birthdate(today),
        time::macros::format_description!("[year]-[month]-[day]"),
    )
    .unwrap();
    assert_eq!(mayfly::registration::age_on(latest, today), MINIMUM_AGE);
}
