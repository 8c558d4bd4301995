//! Route-editing commands for the advisory annotations.
//!
//! Commands arrive as a name plus string arguments (the console / scenario
//! surface), get validated into a typed `Command`, and only then touch the
//! route. A failure at any point leaves the route untouched.

use thiserror::Error;

use super::types::{AfmsMode, PreferredSpeed};
use crate::clock::parse_time_of_day;
use crate::traffic::Traffic;
use chrono::NaiveTime;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("aircraft {0} not found")]
    UnknownAircraft(String),
    #[error("waypoint {name} not found in route of {acid}")]
    UnknownWaypoint { acid: String, name: String },
    #[error("{token} is not an AFMS mode")]
    UnknownMode { token: String },
    #[error("bad time '{0}', expected HH:MM:SS")]
    BadTime(String),
    #[error("bad number '{0}'")]
    BadNumber(String),
    #[error("{cmd} takes {expected} arguments, got {got}")]
    BadArity { cmd: &'static str, expected: &'static str, got: usize },
    #[error("unknown command {0}")]
    UnknownCommand(String),
}

/// A validated route-editing command.
#[derive(Clone, Debug)]
pub enum Command {
    /// Set the advisory mode from a waypoint onward.
    SetModeFrom { acid: String, wpname: String, mode: AfmsMode },
    /// Set a required time of arrival at a waypoint.
    SetRtaAt { acid: String, wpname: String, time: NaiveTime },
    /// Set the time-window size (s) at a waypoint.
    SetWindowAt { acid: String, wpname: String, window_s: f64 },
    /// Set RTA and optionally the window size in one go.
    SetRtaWindowAt { acid: String, wpname: String, time: NaiveTime, window_s: Option<f64> },
    /// Set the preferred speed from a waypoint onward; no value means "use
    /// the aircraft's reference Mach".
    SetOwnSpeedFrom { acid: String, wpname: String, value: Option<f64> },
}

impl Command {
    /// Parse a command by name. Arity and token validation happen here, so a
    /// `Command` value is always internally consistent.
    pub fn parse(name: &str, acid: &str, args: &[&str]) -> Result<Command, CommandError> {
        let acid = acid.to_string();
        match name.to_ascii_uppercase().as_str() {
            "SET_MODE_FROM" => {
                let [wpname, token] = expect_args::<2>("SET_MODE_FROM", "2 (wpname, mode)", args)?;
                let mode = AfmsMode::parse(token)
                    .ok_or_else(|| CommandError::UnknownMode { token: token.to_string() })?;
                Ok(Command::SetModeFrom { acid, wpname: wpname.to_string(), mode })
            }
            "SET_RTA_AT" => {
                let [wpname, time] = expect_args::<2>("SET_RTA_AT", "2 (wpname, HH:MM:SS)", args)?;
                let time = parse_time_of_day(time)
                    .map_err(|_| CommandError::BadTime(time.to_string()))?;
                Ok(Command::SetRtaAt { acid, wpname: wpname.to_string(), time })
            }
            "SET_WINDOW_AT" => {
                let [wpname, secs] = expect_args::<2>("SET_WINDOW_AT", "2 (wpname, seconds)", args)?;
                let window_s = parse_number(secs)?;
                Ok(Command::SetWindowAt { acid, wpname: wpname.to_string(), window_s })
            }
            "SET_RTA_WINDOW_AT" => {
                if args.len() < 2 || args.len() > 3 {
                    return Err(CommandError::BadArity {
                        cmd: "SET_RTA_WINDOW_AT",
                        expected: "2 or 3 (wpname, HH:MM:SS, [seconds])",
                        got: args.len(),
                    });
                }
                let time = parse_time_of_day(args[1])
                    .map_err(|_| CommandError::BadTime(args[1].to_string()))?;
                let window_s = args.get(2).map(|s| parse_number(s)).transpose()?;
                Ok(Command::SetRtaWindowAt {
                    acid,
                    wpname: args[0].to_string(),
                    time,
                    window_s,
                })
            }
            "SET_OWN_SPEED_FROM" => {
                if args.is_empty() || args.len() > 2 {
                    return Err(CommandError::BadArity {
                        cmd: "SET_OWN_SPEED_FROM",
                        expected: "1 or 2 (wpname, [speed])",
                        got: args.len(),
                    });
                }
                let value = args.get(1).map(|s| parse_number(s)).transpose()?;
                Ok(Command::SetOwnSpeedFrom { acid, wpname: args[0].to_string(), value })
            }
            other => Err(CommandError::UnknownCommand(other.to_string())),
        }
    }

    /// Apply the command to the target aircraft's route.
    pub fn apply(&self, traffic: &mut Traffic) -> Result<(), CommandError> {
        match self {
            Command::SetModeFrom { acid, wpname, mode } => {
                edit_waypoint(traffic, acid, wpname, |wp, _| wp.mode = *mode)
            }
            Command::SetRtaAt { acid, wpname, time } => {
                edit_waypoint(traffic, acid, wpname, |wp, _| wp.rta = Some(*time))
            }
            Command::SetWindowAt { acid, wpname, window_s } => {
                edit_waypoint(traffic, acid, wpname, |wp, _| wp.window_s = *window_s)
            }
            Command::SetRtaWindowAt { acid, wpname, time, window_s } => {
                edit_waypoint(traffic, acid, wpname, |wp, _| {
                    wp.rta = Some(*time);
                    if let Some(w) = window_s {
                        wp.window_s = *w;
                    }
                })
            }
            Command::SetOwnSpeedFrom { acid, wpname, value } => {
                edit_waypoint(traffic, acid, wpname, |wp, reference_mach| {
                    wp.preferred = match value {
                        Some(v) => PreferredSpeed::from_value(*v),
                        None => Some(PreferredSpeed::Mach(reference_mach)),
                    };
                })
            }
        }
    }
}

/// Parse and apply in one step.
pub fn dispatch(
    traffic: &mut Traffic,
    name: &str,
    acid: &str,
    args: &[&str],
) -> Result<(), CommandError> {
    let cmd = Command::parse(name, acid, args)?;
    cmd.apply(traffic)
}

fn expect_args<'a, const N: usize>(
    cmd: &'static str,
    expected: &'static str,
    args: &[&'a str],
) -> Result<[&'a str; N], CommandError> {
    <[&str; N]>::try_from(args)
        .map_err(|_| CommandError::BadArity { cmd, expected, got: args.len() })
}

fn parse_number(s: &str) -> Result<f64, CommandError> {
    s.parse::<f64>().map_err(|_| CommandError::BadNumber(s.to_string()))
}

fn edit_waypoint(
    traffic: &mut Traffic,
    acid: &str,
    wpname: &str,
    edit: impl FnOnce(&mut crate::route::Waypoint, f64),
) -> Result<(), CommandError> {
    let ac = traffic
        .by_id_mut(acid)
        .ok_or_else(|| CommandError::UnknownAircraft(acid.to_string()))?;
    let reference_mach = ac.reference_mach;
    let idx = ac.route.index_of(wpname).ok_or_else(|| CommandError::UnknownWaypoint {
        acid: acid.to_string(),
        name: wpname.to_string(),
    })?;
    if let Some(wp) = ac.route.get_mut(idx) {
        edit(wp, reference_mach);
    }
    Ok(())
}
