//! Reqwest-backed fleet API adapter.
//!
//! This adapter owns transport details only: endpoint resolution, request
//! serialisation, HTTP error mapping and envelope decoding. It never looks at
//! `succeeded` or `reason`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::dto::{
    AddPassableQuery, AdminQuery, ChangePasswordQuery, DeletePassableQuery, LoginAdminQuery,
    ManageCarQuery, PlanLegQuery, ReplyDto, RouteNameQuery, RouteQuery, UserQuery,
};
use crate::domain::ports::{
    CarInfoBody, CreateUserBody, FleetApi, FleetApiError, FleetApiResult, LoginAdminBody,
    MonitorCarBody, NoPayload, PassableBody, PlanLegBody, RouteNamesBody, SaveRouteBody,
    SavedRouteBody,
};
use crate::domain::{
    AdminId, CarId, Operation, PassableId, PassablePoint, Position, SubRoute, UserId,
};

const DEFAULT_USER_AGENT: &str = concat!("fleet-console/", env!("CARGO_PKG_VERSION"));

/// Outbound identity settings for fleet API requests.
pub struct FleetHttpIdentity {
    /// HTTP user-agent sent with every request.
    pub user_agent: String,
}

impl Default for FleetHttpIdentity {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

/// Fleet API adapter issuing one HTTP request per operation.
pub struct FleetHttpClient {
    client: Client,
    base_url: Url,
}

impl FleetHttpClient {
    /// Build an adapter for the server at `base_url`.
    ///
    /// Without `timeout` the client waits indefinitely; callers wanting a
    /// deadline impose one here or around the returned futures.
    /// ```rust,ignore
    /// let client = FleetHttpClient::new(base_url, Some(Duration::from_secs(10)));
    /// assert!(client.is_ok() || client.is_err());
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        Self::with_identity(base_url, timeout, FleetHttpIdentity::default())
    }

    /// Build an adapter with an explicit outbound identity.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_identity(
        base_url: Url,
        timeout: Option<Duration>,
        identity: FleetHttpIdentity,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder().user_agent(identity.user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: with_trailing_slash(base_url),
        })
    }

    /// Base URL every endpoint is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, operation: Operation) -> Result<Url, FleetApiError> {
        self.base_url.join(operation.endpoint()).map_err(|error| {
            FleetApiError::transport(format!("invalid endpoint for {operation}: {error}"))
        })
    }

    async fn get<T>(&self, operation: Operation) -> FleetApiResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self
            .client
            .get(self.endpoint(operation)?)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;
        read_reply(operation, response).await
    }

    async fn post<Q, T>(&self, operation: Operation, query: &Q) -> FleetApiResult<T>
    where
        Q: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.endpoint(operation)?)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(query)
            .send()
            .await
            .map_err(map_transport_error)?;
        read_reply(operation, response).await
    }
}

#[async_trait]
impl FleetApi for FleetHttpClient {
    async fn create_user(&self) -> FleetApiResult<CreateUserBody> {
        self.get(Operation::CreateUser).await
    }

    async fn terminate(&self, user: &UserId) -> FleetApiResult<NoPayload> {
        self.post(Operation::Terminate, &UserQuery { user_id: user })
            .await
    }

    async fn end_route(&self, user: &UserId) -> FleetApiResult<NoPayload> {
        self.post(Operation::EndRoute, &UserQuery { user_id: user })
            .await
    }

    async fn proceed_route(&self, user: &UserId) -> FleetApiResult<NoPayload> {
        self.post(Operation::ProceedRoute, &UserQuery { user_id: user })
            .await
    }

    async fn is_acceptable(&self, user: &UserId) -> FleetApiResult<NoPayload> {
        self.post(Operation::IsAcceptable, &UserQuery { user_id: user })
            .await
    }

    async fn route_names(&self, user: &UserId) -> FleetApiResult<RouteNamesBody> {
        self.post(Operation::RouteNames, &UserQuery { user_id: user })
            .await
    }

    async fn fetch_route(
        &self,
        user: &UserId,
        route_name: &str,
    ) -> FleetApiResult<SavedRouteBody> {
        let query = RouteNameQuery {
            user_id: user,
            route_name,
        };
        self.post(Operation::FetchRoute, &query).await
    }

    async fn fetch_passable(&self, user: &UserId) -> FleetApiResult<PassableBody> {
        self.post(Operation::FetchPassable, &UserQuery { user_id: user })
            .await
    }

    async fn plan_leg(
        &self,
        user: &UserId,
        waypoints: &[Position],
    ) -> FleetApiResult<PlanLegBody> {
        let query = PlanLegQuery {
            user_id: user,
            data: waypoints,
        };
        self.post(Operation::PlanLeg, &query).await
    }

    async fn execute_route(
        &self,
        user: &UserId,
        route: &[SubRoute],
        cyclic: bool,
    ) -> FleetApiResult<NoPayload> {
        let query = RouteQuery {
            user_id: user,
            route_name: None,
            data: route,
            junkai: cyclic,
        };
        self.post(Operation::ExecuteRoute, &query).await
    }

    async fn save_route(
        &self,
        user: &UserId,
        route_name: &str,
        route: &[SubRoute],
        cyclic: bool,
    ) -> FleetApiResult<SaveRouteBody> {
        let query = RouteQuery {
            user_id: user,
            route_name: Some(route_name),
            data: route,
            junkai: cyclic,
        };
        self.post(Operation::SaveRoute, &query).await
    }

    async fn monitor_car(&self, user: &UserId) -> FleetApiResult<MonitorCarBody> {
        self.post(Operation::MonitorCar, &UserQuery { user_id: user })
            .await
    }

    async fn login_admin(&self, name: &str, password: &str) -> FleetApiResult<LoginAdminBody> {
        let query = LoginAdminQuery {
            admin_name: name,
            admin_pass: password,
        };
        self.post(Operation::LoginAdmin, &query).await
    }

    async fn terminate_admin(&self, admin: &AdminId) -> FleetApiResult<NoPayload> {
        self.post(Operation::TerminateAdmin, &AdminQuery { admin_id: admin })
            .await
    }

    async fn change_password(
        &self,
        admin: &AdminId,
        current_password: &str,
        new_password: &str,
    ) -> FleetApiResult<NoPayload> {
        let query = ChangePasswordQuery {
            admin_id: admin,
            current_passwd: current_password,
            new_passwd: new_password,
        };
        self.post(Operation::ChangePassword, &query).await
    }

    async fn fetch_passable_admin(&self, admin: &AdminId) -> FleetApiResult<PassableBody> {
        self.post(Operation::FetchPassableAdmin, &AdminQuery { admin_id: admin })
            .await
    }

    async fn delete_passable(
        &self,
        admin: &AdminId,
        ids: &[PassableId],
    ) -> FleetApiResult<NoPayload> {
        let query = DeletePassableQuery {
            admin_id: admin,
            pass_id: ids,
        };
        self.post(Operation::DeletePassable, &query).await
    }

    async fn add_passable(
        &self,
        admin: &AdminId,
        points: &[PassablePoint],
    ) -> FleetApiResult<NoPayload> {
        let query = AddPassableQuery {
            admin_id: admin,
            pass_points: points,
        };
        self.post(Operation::AddPassable, &query).await
    }

    async fn manage_car(&self, admin: &AdminId, car: &CarId) -> FleetApiResult<NoPayload> {
        let query = ManageCarQuery {
            admin_id: admin,
            car_id: car,
        };
        self.post(Operation::ManageCar, &query).await
    }

    async fn car_info(&self, admin: &AdminId) -> FleetApiResult<CarInfoBody> {
        self.post(Operation::CarInfo, &AdminQuery { admin_id: admin })
            .await
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

async fn read_reply<T>(operation: Operation, response: Response) -> FleetApiResult<T>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let body = response.bytes().await.map_err(map_transport_error)?;
    debug!(%operation, status = status.as_u16(), bytes = body.len(), "fleet api replied");
    if !status.is_success() {
        return Err(map_status_error(status, body.as_ref()));
    }
    decode_reply(body.as_ref())
}

fn decode_reply<T>(body: &[u8]) -> FleetApiResult<T>
where
    T: DeserializeOwned,
{
    serde_json::from_slice::<ReplyDto<T>>(body)
        .map(ReplyDto::into_reply)
        .map_err(|error| {
            FleetApiError::decode(format!(
                "invalid reply envelope: {error}; body: {}",
                body_preview(body)
            ))
        })
}

fn map_transport_error(error: reqwest::Error) -> FleetApiError {
    if error.is_timeout() {
        FleetApiError::timeout(error.to_string())
    } else {
        FleetApiError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> FleetApiError {
    let message = body_preview(body);
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            FleetApiError::timeout(format!("status {}: {message}", status.as_u16()))
        }
        _ => FleetApiError::status(status.as_u16(), message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network fleet API helpers.

    use super::*;
    use rstest::rstest;

    fn url(raw: &str) -> Url {
        Url::parse(raw).expect("valid url")
    }

    #[rstest]
    #[case::bare_host("http://fleet.local", "http://fleet.local/astar")]
    #[case::nested_path("http://fleet.local/api", "http://fleet.local/api/astar")]
    #[case::already_slashed("http://fleet.local/api/", "http://fleet.local/api/astar")]
    fn endpoints_resolve_below_the_base_path(#[case] base: &str, #[case] expected: &str) {
        let client = FleetHttpClient::new(url(base), None).expect("client builds");
        let endpoint = client.endpoint(Operation::PlanLeg).expect("endpoint");
        assert_eq!(endpoint.as_str(), expected);
    }

    #[rstest]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, false)]
    #[case::not_found(StatusCode::NOT_FOUND, false)]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, true)]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, true)]
    fn maps_http_statuses(#[case] status: StatusCode, #[case] is_timeout: bool) {
        let error = map_status_error(status, b"  upstream\n  unavailable ");
        if is_timeout {
            assert!(
                matches!(error, FleetApiError::Timeout { .. }),
                "timeout statuses should map to Timeout",
            );
        } else {
            assert_eq!(
                error,
                FleetApiError::status(status.as_u16(), "upstream unavailable")
            );
        }
    }

    #[rstest]
    fn long_bodies_are_truncated_in_previews() {
        let body = "x".repeat(400);
        let preview = body_preview(body.as_bytes());
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 163);
    }

    #[rstest]
    fn undecodable_bodies_map_to_decode_errors() {
        let error = decode_reply::<NoPayload>(b"<html>busy</html>").expect_err("not json");
        assert!(
            matches!(error, FleetApiError::Decode { .. }),
            "non-JSON bodies should map to Decode",
        );
    }

    #[rstest]
    fn decoded_replies_keep_the_envelope() {
        let reply = decode_reply::<CreateUserBody>(br#"{"succeeded":true,"userId":"u-5"}"#)
            .expect("decodes");
        assert!(reply.succeeded);
        assert_eq!(reply.body.user_id, Some(UserId::new("u-5")));
    }
}
