use cmt_domain::constants::{CONFERENCE, DECISION, REVIEW, REVIEW_ASSIGNMENT, SUBMISSION, USER};

#[test]
fn constants_match_entity_strings() {
    assert_eq!(CONFERENCE, "conference");
    assert_eq!(SUBMISSION, "submission");
    assert_eq!(REVIEW_ASSIGNMENT, "review_assignment");
    assert_eq!(REVIEW, "review");
    assert_eq!(DECISION, "decision");
    assert_eq!(USER, "user");
}
