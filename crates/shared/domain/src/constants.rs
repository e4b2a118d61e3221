//! Canonical table names shared between migrations, queries, and id guards.

pub const CONFERENCE: &str = "conference";
pub const TRACK: &str = "track";
pub const SUBMISSION: &str = "submission";
pub const SUBMISSION_AUTHOR: &str = "submission_author";
pub const REVIEW_ASSIGNMENT: &str = "review_assignment";
pub const REVIEW: &str = "review";
pub const DECISION: &str = "decision";
pub const USER: &str = "user";
pub const HERO_CONTENT: &str = "hero_content";
pub const ABOUT_PAGE: &str = "about_page";
pub const NAVIGATION_ITEM: &str = "navigation_item";
pub const PAGE_BLOCK: &str = "page_block";
pub const COMMITTEE_MEMBER: &str = "committee_member";

// OpenAPI tags, one per router group.
pub const SYSTEM_TAG: &str = "System";
pub const IDENTITY_TAG: &str = "Identity";
pub const CONFERENCE_TAG: &str = "Conferences";
pub const SUBMISSION_TAG: &str = "Submissions";
pub const REVIEW_TAG: &str = "Reviews";
pub const CONTENT_TAG: &str = "Content";
