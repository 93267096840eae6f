//! Interactive line-oriented shell for editing waypoints and the robot,
//! then computing and inspecting a velocity profile. Reads commands from
//! any `BufRead` so it can be driven by a real terminal or a scripted
//! transcript in tests.

use std::io::{BufRead, Write};

use anyhow::Result;
use motion::{Vector2, Waypoint};
use tracing::info;

use crate::output;
use crate::session::{parse_vector2, Session};

/// Runs the REPL, reading commands from `input` and writing responses to
/// `output`, until `quit` or end of input.
pub fn run<R: BufRead, W: Write>(session: &mut Session, mut input: R, mut output: W) -> Result<()> {
    writeln!(output, "planner-host REPL. Type `quit` to exit.")?;
    let mut line = String::new();
    loop {
        write!(output, "> ")?;
        output.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match dispatch(session, line) {
            Ok(Response::Continue(text)) => writeln!(output, "{text}")?,
            Ok(Response::Quit) => break,
            Err(e) => writeln!(output, "error: {e}")?,
        }
    }
    Ok(())
}

enum Response {
    Continue(String),
    Quit,
}

fn dispatch(session: &mut Session, line: &str) -> Result<Response> {
    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or("");
    let rest: Vec<&str> = parts.collect();

    match command {
        "quit" | "exit" => Ok(Response::Quit),
        "waypoint" => handle_waypoint(session, &rest),
        "robot" => handle_robot(session, &rest),
        "compute" => handle_compute(session, &rest),
        "show" => handle_show(session),
        "save" => handle_save(session, &rest),
        other => anyhow::bail!("unrecognized command: {other}"),
    }
}

fn handle_waypoint(session: &mut Session, args: &[&str]) -> Result<Response> {
    match args {
        ["list"] | [] => {
            let mut text = String::new();
            for (i, w) in session.waypoints.iter().enumerate() {
                text.push_str(&format!(
                    "{i}: pos=({:.3},{:.3}) vel=({:.3},{:.3}) acc=({:.3},{:.3})\n",
                    w.position.x, w.position.y, w.velocity.x, w.velocity.y, w.acceleration.x, w.acceleration.y
                ));
            }
            Ok(Response::Continue(text.trim_end().to_string()))
        }
        ["add", pos, vel, acc] => {
            session.add_waypoint(Waypoint::new(
                parse_vector2(pos)?,
                parse_vector2(vel)?,
                parse_vector2(acc)?,
            ));
            Ok(Response::Continue(format!(
                "added waypoint {}",
                session.waypoints.len() - 1
            )))
        }
        ["add", pos] => {
            session.add_waypoint(Waypoint::new(parse_vector2(pos)?, Vector2::ZERO, Vector2::ZERO));
            Ok(Response::Continue(format!(
                "added waypoint {}",
                session.waypoints.len() - 1
            )))
        }
        ["remove", index] => {
            let index: usize = index.parse()?;
            session.remove_waypoint(index)?;
            Ok(Response::Continue(format!("removed waypoint {index}")))
        }
        ["clear"] => {
            session.clear_waypoints();
            Ok(Response::Continue("cleared all waypoints".to_string()))
        }
        other => anyhow::bail!("usage: waypoint list|add <pos> [vel] [acc]|remove <index>|clear, got {other:?}"),
    }
}

fn handle_robot(session: &mut Session, args: &[&str]) -> Result<Response> {
    match args {
        [] => Ok(Response::Continue(format!(
            "width={:.3} max_velocity={:.3} max_acceleration={:.3}",
            session.robot.width, session.robot.max_velocity, session.robot.max_acceleration
        ))),
        [attribute] => {
            let value = match *attribute {
                "width" => session.robot.width,
                "max_velocity" => session.robot.max_velocity,
                "max_acceleration" => session.robot.max_acceleration,
                other => anyhow::bail!("unknown robot attribute: {other}"),
            };
            Ok(Response::Continue(format!("{attribute}={value:.3}")))
        }
        [attribute, value] => {
            let value: f64 = value.parse()?;
            session.set_robot_attribute(attribute, value)?;
            Ok(Response::Continue(format!("{attribute} set to {value:.3}")))
        }
        other => anyhow::bail!("usage: robot [attribute] [value], got {other:?}"),
    }
}

fn handle_compute(session: &mut Session, args: &[&str]) -> Result<Response> {
    let ds: f64 = match args {
        [ds] => ds.parse()?,
        [] => anyhow::bail!("usage: compute <ds>"),
        other => anyhow::bail!("usage: compute <ds>, got {other:?}"),
    };
    session.compute(ds)?;
    info!(ds, "profile computed from REPL");
    let profile = session.last_profile.as_ref().unwrap();
    Ok(Response::Continue(format!(
        "computed {} points, total_time={:.3}, converged_max_acceleration={:.3}",
        profile.points.len(),
        profile.total_time,
        profile.converged_max_acceleration
    )))
}

fn handle_show(session: &Session) -> Result<Response> {
    match &session.last_profile {
        None => Ok(Response::Continue("no profile computed yet; run `compute <ds>`".to_string())),
        Some(profile) => Ok(Response::Continue(output::to_json(&profile.points)?)),
    }
}

fn handle_save(session: &Session, args: &[&str]) -> Result<Response> {
    let name = args.first().copied().unwrap_or("profile.json");
    let profile = session
        .last_profile
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("no profile computed yet; run `compute <ds>`"))?;
    let json = output::to_json(&profile.points)?;
    std::fs::write(name, json)?;
    Ok(Response::Continue(format!("saved profile to {name}")))
}
