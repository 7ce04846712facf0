//! Request and reply DTOs for the fleet JSON API.
//!
//! Requests borrow from the caller and serialise with the server's camelCase
//! field names. Replies decode into [`ReplyDto`] first, then split into the
//! port's [`Reply`] envelope.

use serde::{Deserialize, Serialize};

use crate::domain::ports::Reply;
use crate::domain::{AdminId, CarId, PassableId, PassablePoint, Position, SubRoute, UserId};

#[derive(Debug, Deserialize)]
pub(super) struct ReplyDto<T> {
    pub(super) succeeded: bool,
    #[serde(default)]
    pub(super) reason: Option<String>,
    #[serde(flatten)]
    pub(super) body: T,
}

impl<T> ReplyDto<T> {
    pub(super) fn into_reply(self) -> Reply<T> {
        Reply {
            succeeded: self.succeeded,
            reason: self.reason,
            body: self.body,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UserQuery<'a> {
    pub(super) user_id: &'a UserId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RouteNameQuery<'a> {
    pub(super) user_id: &'a UserId,
    pub(super) route_name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PlanLegQuery<'a> {
    pub(super) user_id: &'a UserId,
    pub(super) data: &'a [Position],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RouteQuery<'a> {
    pub(super) user_id: &'a UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) route_name: Option<&'a str>,
    pub(super) data: &'a [SubRoute],
    pub(super) junkai: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LoginAdminQuery<'a> {
    pub(super) admin_name: &'a str,
    pub(super) admin_pass: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AdminQuery<'a> {
    pub(super) admin_id: &'a AdminId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ChangePasswordQuery<'a> {
    pub(super) admin_id: &'a AdminId,
    pub(super) current_passwd: &'a str,
    pub(super) new_passwd: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DeletePassableQuery<'a> {
    pub(super) admin_id: &'a AdminId,
    pub(super) pass_id: &'a [PassableId],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AddPassableQuery<'a> {
    pub(super) admin_id: &'a AdminId,
    pub(super) pass_points: &'a [PassablePoint],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ManageCarQuery<'a> {
    pub(super) admin_id: &'a AdminId,
    pub(super) car_id: &'a CarId,
}
