use crate::db::Database;
use crate::settings::{self, SettingKey};
use serde::Serialize;

pub const LOGIN_ROUTE: &str = "/login";

/// Outcome of the member-id check done before showing member pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LoginGate {
    Member {
        #[serde(rename = "memberId")]
        member_id: i64,
    },
    RedirectToLogin {
        route: &'static str,
    },
}

/// A stored `member_id` that is missing, non-numeric or zero means nobody
/// is logged in.
pub fn check_login(db: &Database) -> LoginGate {
    let member_id = settings::read(db, SettingKey::MemberId)
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|id| *id != 0);

    match member_id {
        Some(member_id) => LoginGate::Member { member_id },
        None => LoginGate::RedirectToLogin { route: LOGIN_ROUTE },
    }
}
