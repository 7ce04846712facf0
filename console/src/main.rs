//! Operator console for the fleet management API.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io::{self, BufRead, Read};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use fleet_console::config::FleetConsoleSettings;
use fleet_console::domain::{
    AdminConsoleService, AdminId, AdminSession, CarId, PassableArea, Position, ReasonTranslator,
    UserConsoleService, UserId, UserSession,
};
use fleet_console::outbound::fleet_http::{FleetHttpClient, FleetHttpIdentity};
use fleet_console::telemetry::init_tracing;
use ortho_config::OrthoConfig;
use serde::Serialize;
use tokio::runtime::Builder;
use zeroize::Zeroizing;

/// `fleet-console` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "fleet-console",
    about = "Operate guided vehicles and passable areas through the fleet API",
    version
)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Obtain a new user identifier.
    CreateUser,
    /// End a user session.
    Terminate {
        #[arg(long, value_name = "id")]
        user: String,
    },
    /// Show route progress and vehicle state.
    Status {
        #[arg(long, value_name = "id")]
        user: String,
    },
    /// List saved routes.
    Routes {
        #[arg(long, value_name = "id")]
        user: String,
    },
    /// Plan a multi-leg route and optionally execute or save it.
    Plan {
        #[arg(long, value_name = "id")]
        user: String,
        /// One leg as `lat,lng;lat,lng[;...]`; repeat for each leg in order.
        #[arg(long = "leg", value_name = "waypoints", required = true, value_parser = parse_leg)]
        legs: Vec<Leg>,
        /// Loop back to the first stop.
        #[arg(long)]
        cyclic: bool,
        /// Execute the planned route once it is accepted.
        #[arg(long)]
        execute: bool,
        /// Save the planned route under this name.
        #[arg(long, value_name = "name")]
        save: Option<String>,
    },
    /// Let the vehicle continue from its current stop.
    Proceed {
        #[arg(long, value_name = "id")]
        user: String,
    },
    /// Cancel the running route.
    EndRoute {
        #[arg(long, value_name = "id")]
        user: String,
    },
    /// Log in as administrator; the password is read from stdin.
    AdminLogin {
        #[arg(long, value_name = "name")]
        name: String,
    },
    /// End an administrator session.
    AdminLogout {
        #[arg(long, value_name = "id")]
        admin: String,
    },
    /// Change the administrator password; reads current and new from stdin.
    ChangePassword {
        #[arg(long, value_name = "id")]
        admin: String,
    },
    /// List stored passable areas.
    Areas {
        #[arg(long, value_name = "id")]
        admin: String,
    },
    /// Replace stored passable areas with a JSON array read from stdin.
    SyncAreas {
        #[arg(long, value_name = "id")]
        admin: String,
    },
    /// List vehicles.
    Cars {
        #[arg(long, value_name = "id")]
        admin: String,
    },
    /// Reset a vehicle in an abnormal state.
    ManageCar {
        #[arg(long, value_name = "id")]
        admin: String,
        #[arg(long, value_name = "id")]
        car: String,
    },
}

/// Waypoints of one leg, in travel order.
#[derive(Debug, Clone)]
struct Leg(Vec<Position>);

struct Console {
    users: UserConsoleService<FleetHttpClient>,
    admins: AdminConsoleService<FleetHttpClient>,
}

fn main() -> io::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let settings = FleetConsoleSettings::load_from_iter([OsString::from("fleet-console")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    init_tracing(settings.log_json);

    let console = build_console(&settings)?;
    run(&console, args.command).await
}

fn build_console(settings: &FleetConsoleSettings) -> io::Result<Console> {
    let base_url = settings.api_base_url().map_err(io::Error::other)?;
    let timeout = settings.request_timeout().map_err(io::Error::other)?;
    let locale = settings.locale().map_err(io::Error::other)?;

    let identity = match settings.user_agent() {
        Some(user_agent) => FleetHttpIdentity {
            user_agent: user_agent.to_owned(),
        },
        None => FleetHttpIdentity::default(),
    };
    let client = FleetHttpClient::with_identity(base_url, timeout, identity)
        .map_err(|error| io::Error::other(format!("create http client: {error}")))?;
    let translator = ReasonTranslator::new(locale)
        .map_err(|error| io::Error::other(format!("reason table invalid: {error}")))?;

    let api = Arc::new(client);
    Ok(Console {
        users: UserConsoleService::new(Arc::clone(&api), translator),
        admins: AdminConsoleService::new(api, translator),
    })
}

async fn run(console: &Console, command: Command) -> io::Result<()> {
    match command {
        Command::CreateUser => {
            let session = console.users.create_user().await.map_err(io::Error::other)?;
            emit(session.id())
        }
        Command::Terminate { user } => {
            let session = UserSession::resume(UserId::new(user));
            console.users.terminate(session).await.map_err(io::Error::other)?;
            emit(&"terminated")
        }
        Command::Status { user } => {
            let session = UserSession::resume(UserId::new(user));
            let snapshot = console.users.car_status(&session).await.map_err(io::Error::other)?;
            emit(&snapshot)
        }
        Command::Routes { user } => {
            let session = UserSession::resume(UserId::new(user));
            let names = console.users.route_names(&session).await.map_err(io::Error::other)?;
            emit(&names)
        }
        Command::Plan {
            user,
            legs,
            cyclic,
            execute,
            save,
        } => {
            let session = UserSession::resume(UserId::new(user));
            let legs: Vec<Vec<Position>> = legs.into_iter().map(|Leg(waypoints)| waypoints).collect();
            plan(console, &session, &legs, cyclic, execute, save.as_deref()).await
        }
        Command::Proceed { user } => {
            let session = UserSession::resume(UserId::new(user));
            console.users.proceed_route(&session).await.map_err(io::Error::other)?;
            emit(&"proceeding")
        }
        Command::EndRoute { user } => {
            let session = UserSession::resume(UserId::new(user));
            console.users.end_route(&session).await.map_err(io::Error::other)?;
            emit(&"route ended")
        }
        Command::AdminLogin { name } => {
            let password = read_secret_line(&mut io::stdin().lock())?;
            let session = console
                .admins
                .login_admin(&name, &password)
                .await
                .map_err(io::Error::other)?;
            emit(session.id())
        }
        Command::AdminLogout { admin } => {
            let session = AdminSession::resume(AdminId::new(admin));
            console
                .admins
                .terminate_admin(session)
                .await
                .map_err(io::Error::other)?;
            emit(&"terminated")
        }
        Command::ChangePassword { admin } => {
            let session = AdminSession::resume(AdminId::new(admin));
            let (current, new) = {
                let mut stdin = io::stdin().lock();
                (read_secret_line(&mut stdin)?, read_secret_line(&mut stdin)?)
            };
            console
                .admins
                .change_password(&session, &current, &new)
                .await
                .map_err(io::Error::other)?;
            emit(&"password changed")
        }
        Command::Areas { admin } => {
            let session = AdminSession::resume(AdminId::new(admin));
            let areas = console
                .admins
                .passable_areas(&session)
                .await
                .map_err(io::Error::other)?;
            emit(&areas)
        }
        Command::SyncAreas { admin } => {
            let session = AdminSession::resume(AdminId::new(admin));
            let desired = read_areas(io::stdin().lock())?;
            let report = console
                .admins
                .synchronize_areas(&session, &desired)
                .await
                .map_err(io::Error::other)?;
            emit(&report)
        }
        Command::Cars { admin } => {
            let session = AdminSession::resume(AdminId::new(admin));
            let cars = console.admins.car_info(&session).await.map_err(io::Error::other)?;
            emit(&cars)
        }
        Command::ManageCar { admin, car } => {
            let session = AdminSession::resume(AdminId::new(admin));
            console
                .admins
                .manage_car(&session, &CarId::new(car))
                .await
                .map_err(io::Error::other)?;
            emit(&"reset requested")
        }
    }
}

async fn plan(
    console: &Console,
    session: &UserSession,
    legs: &[Vec<Position>],
    cyclic: bool,
    execute: bool,
    save: Option<&str>,
) -> io::Result<()> {
    let route = console
        .users
        .compose_route(session, legs)
        .await
        .map_err(io::Error::other)?;
    if let Some(name) = save {
        console
            .users
            .save_route(session, name, &route, cyclic)
            .await
            .map_err(io::Error::other)?;
    }
    if execute {
        console
            .users
            .is_acceptable(session)
            .await
            .map_err(io::Error::other)?;
        console
            .users
            .execute_route(session, &route, cyclic)
            .await
            .map_err(io::Error::other)?;
    }
    emit(&route)
}

fn emit<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|error| io::Error::other(format!("render output: {error}")))?;
    println!("{rendered}");
    Ok(())
}

fn read_secret_line(input: &mut impl BufRead) -> io::Result<Zeroizing<String>> {
    let mut line = Zeroizing::new(String::new());
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "expected a password on stdin",
        ));
    }
    Ok(Zeroizing::new(
        line.trim_end_matches(['\r', '\n']).to_owned(),
    ))
}

fn read_areas(mut input: impl Read) -> io::Result<Vec<PassableArea>> {
    let mut raw = String::new();
    input.read_to_string(&mut raw)?;
    serde_json::from_str(&raw)
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, format!("areas: {error}")))
}

fn parse_leg(raw: &str) -> Result<Leg, String> {
    let waypoints = raw
        .split(';')
        .map(|pair| {
            let (lat, lng) = pair
                .split_once(',')
                .ok_or_else(|| format!("waypoint '{pair}' must be 'lat,lng'"))?;
            let parse = |value: &str| {
                value
                    .trim()
                    .parse::<f64>()
                    .map_err(|error| format!("failed to parse waypoint '{pair}': {error}"))
            };
            Ok(Position::new(parse(lat)?, parse(lng)?))
        })
        .collect::<Result<Vec<_>, String>>()?;
    if waypoints.len() < 2 {
        return Err("a leg needs at least two waypoints".to_owned());
    }
    Ok(Leg(waypoints))
}

#[cfg(test)]
mod tests {
    //! Unit tests for CLI parsing helpers.

    use rstest::rstest;

    use super::{parse_leg, read_areas, read_secret_line};
    use fleet_console::domain::{PassableId, Position};

    #[rstest]
    fn leg_parser_accepts_waypoint_lists() {
        let leg = parse_leg("35.1,136.9; 35.2,137.0").expect("leg should parse");
        assert_eq!(
            leg.0,
            vec![Position::new(35.1, 136.9), Position::new(35.2, 137.0)]
        );
    }

    #[rstest]
    #[case::single_point("35.1,136.9", "at least two")]
    #[case::missing_comma("35.1;35.2,137.0", "must be 'lat,lng'")]
    #[case::not_numeric("35.1,abc;35.2,137.0", "failed to parse")]
    fn leg_parser_rejects_bad_input(#[case] raw: &str, #[case] expected: &str) {
        let error = parse_leg(raw).expect_err("leg should fail");
        assert!(error.contains(expected), "unexpected error: {error}");
    }

    #[rstest]
    fn secrets_are_read_without_line_endings() {
        let mut input = "hunter2\r\nnext\n".as_bytes();
        let first = read_secret_line(&mut input).expect("first line");
        let second = read_secret_line(&mut input).expect("second line");
        assert_eq!(first.as_str(), "hunter2");
        assert_eq!(second.as_str(), "next");
        assert!(read_secret_line(&mut input).is_err());
    }

    #[rstest]
    fn areas_are_read_in_wire_shape() {
        let raw = r#"[{"passableId": -1, "position": {"lat": 1.0, "lng": 2.0}, "radius": 5}]"#;
        let areas = read_areas(raw.as_bytes()).expect("areas parse");
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].id, PassableId::new(-1));
    }
}
