pub mod actor;
pub mod author;
pub mod document;
pub mod equipment;
pub mod film;
pub mod institutional_info;
pub mod location;
pub mod production_detail;
pub mod production_team_member;
pub mod screening;
pub mod user;

pub(crate) fn now_sec() -> i64 {
    jiff::Timestamp::now().as_second()
}
