//! Multi-leg route composition.
//!
//! Each waypoint group is planned by its own call. All calls are dispatched
//! together and awaited jointly; results are then read back in leg order.
//! The first failing leg decides the error and no partial route is ever
//! returned.

use futures_util::future::join_all;
use tracing::debug;

use super::error::DomainError;
use super::geometry::{Position, Route};
use super::identifiers::UserId;
use super::ports::FleetApi;
use super::reason_table::{Operation, ReasonTranslator};

/// Plan every leg and assemble the route, preserving leg order.
///
/// `Route[i]` is built only from the reply to `legs[i]`.
///
/// # Errors
///
/// Returns the [`DomainError`] of the first leg, in input order, whose call
/// failed or whose reply lacks the planned path.
pub async fn compose_route<A>(
    api: &A,
    translator: &ReasonTranslator,
    user: &UserId,
    legs: &[Vec<Position>],
) -> Result<Route, DomainError>
where
    A: FleetApi + ?Sized,
{
    let replies = join_all(legs.iter().map(|leg| api.plan_leg(user, leg))).await;

    let mut route = Route::with_capacity(replies.len());
    for outcome in replies {
        let body = translator.interpret(Operation::PlanLeg, outcome)?;
        route.push(translator.require(Operation::PlanLeg, "route", body.route)?);
    }

    debug!(legs = route.len(), "composed multi-leg route");
    Ok(route)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::Locale;
    use crate::domain::ports::{FleetApiError, MockFleetApi, PlanLegBody, Reply};
    use rstest::{fixture, rstest};

    #[fixture]
    fn translator() -> ReasonTranslator {
        ReasonTranslator::new(Locale::En).expect("table validates")
    }

    fn leg(seed: f64) -> Vec<Position> {
        vec![Position::new(seed, seed), Position::new(seed + 1.0, seed)]
    }

    /// Echo the first waypoint back so each leg is traceable in the output.
    fn echo_first_waypoint(waypoints: &[Position]) -> Reply<PlanLegBody> {
        Reply::ok(PlanLegBody {
            route: Some(waypoints.iter().take(1).copied().collect()),
        })
    }

    #[rstest]
    #[tokio::test]
    async fn legs_keep_their_input_order(translator: ReasonTranslator) {
        let mut api = MockFleetApi::new();
        api.expect_plan_leg()
            .times(3)
            .returning(|_, waypoints| Ok(echo_first_waypoint(waypoints)));

        let legs = vec![leg(1.0), leg(2.0), leg(3.0)];
        let route = compose_route(&api, &translator, &UserId::new("u"), &legs)
            .await
            .expect("all legs succeed");

        assert_eq!(
            route,
            vec![
                vec![Position::new(1.0, 1.0)],
                vec![Position::new(2.0, 2.0)],
                vec![Position::new(3.0, 3.0)],
            ]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn failing_second_leg_yields_its_error(translator: ReasonTranslator) {
        let mut api = MockFleetApi::new();
        api.expect_plan_leg().times(2).returning(|_, waypoints| {
            if waypoints.first() == Some(&Position::new(2.0, 2.0)) {
                Ok(Reply::failed("Destination 7 is outside the passable area."))
            } else {
                Ok(echo_first_waypoint(waypoints))
            }
        });

        let error = compose_route(&api, &translator, &UserId::new("u"), &[leg(1.0), leg(2.0)])
            .await
            .expect_err("second leg fails");

        assert_eq!(error.code(), ErrorCode::UnreachableDestination);
    }

    #[rstest]
    #[tokio::test]
    async fn first_failure_in_leg_order_wins(translator: ReasonTranslator) {
        let mut api = MockFleetApi::new();
        api.expect_plan_leg().times(3).returning(|_, waypoints| {
            match waypoints.first().map(|point| point.lat) {
                Some(lat) if lat == 1.0 => Ok(echo_first_waypoint(waypoints)),
                Some(lat) if lat == 2.0 => Err(FleetApiError::timeout("deadline exceeded")),
                _ => Ok(Reply::failed("Illegal user.")),
            }
        });

        let error = compose_route(
            &api,
            &translator,
            &UserId::new("u"),
            &[leg(1.0), leg(2.0), leg(3.0)],
        )
        .await
        .expect_err("legs fail");

        assert_eq!(error.code(), ErrorCode::CommunicationFailure);
    }

    #[rstest]
    #[tokio::test]
    async fn success_without_path_is_a_generic_failure(translator: ReasonTranslator) {
        let mut api = MockFleetApi::new();
        api.expect_plan_leg()
            .times(1)
            .returning(|_, _| Ok(Reply::ok(PlanLegBody::default())));

        let error = compose_route(&api, &translator, &UserId::new("u"), &[leg(1.0)])
            .await
            .expect_err("missing path");

        assert_eq!(error.code(), ErrorCode::GenericFailure);
    }

    #[rstest]
    #[tokio::test]
    async fn no_legs_means_no_calls(translator: ReasonTranslator) {
        let api = MockFleetApi::new();
        let route = compose_route(&api, &translator, &UserId::new("u"), &[])
            .await
            .expect("empty input");
        assert!(route.is_empty());
    }
}
