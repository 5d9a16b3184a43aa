use colored::Colorize;
use double_pendulum::{PendulumState, Profile, SimulationConfig, Trajectory, projection::frames};

pub fn profiles() {
    for profile in Profile::ALL {
        println!("{:<20} {}", profile.name().bold(), profile.description());
    }
}

pub fn summary(config: &SimulationConfig, trajectory: &Trajectory) {
    let stats = trajectory.stats();
    let energies: Vec<f64> = frames(trajectory, &config.parameters)
        .iter()
        .map(|frame| frame.energy)
        .collect();
    let (low, high) = energies
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), &e| {
            (low.min(e), high.max(e))
        });

    println!(
        "{} {} / {}  (accepted {}, rejected {}, evaluations {})",
        "method".bold(),
        config.options.method,
        config.derivation,
        stats.accepted,
        stats.rejected,
        stats.evaluations
    );
    println!("{} {}", "initial".bold(), state_line(&config.initial_state));
    if let Some(state) = trajectory.final_state() {
        println!("{} {}", "final  ".bold(), state_line(state));
    }
    if let (Some(first), Some(last)) = (energies.first(), energies.last()) {
        println!(
            "{} first {first:.6}  last {last:.6}  range [{low:.6}, {high:.6}]",
            "energy ".bold()
        );
    }
}

/// Every `every`-th frame of the trajectory as a table, always ending on the last sample.
pub fn table(config: &SimulationConfig, trajectory: &Trajectory, every: usize) {
    println!(
        "{}",
        format!(
            "{:>9} {:>10} {:>10} {:>10} {:>10} {:>9} {:>9} {:>11}",
            "t", "theta1", "theta2", "omega1", "omega2", "x2", "y2", "energy"
        )
        .bold()
    );
    let projected = frames(trajectory, &config.parameters);
    let last = trajectory.len().saturating_sub(1);
    for (i, ((t, state), frame)) in trajectory.iter().zip(&projected).enumerate() {
        if i % every != 0 && i != last {
            continue;
        }
        println!(
            "{t:>9.3} {:>10.5} {:>10.5} {:>10.5} {:>10.5} {:>9.4} {:>9.4} {:>11.6}",
            state.theta1, state.theta2, state.omega1, state.omega2, frame.x2, frame.y2, frame.energy
        );
    }
}

fn state_line(state: &PendulumState) -> String {
    format!(
        "theta = ({:.6}, {:.6})  omega = ({:.6}, {:.6})",
        state.theta1, state.theta2, state.omega1, state.omega2
    )
}
