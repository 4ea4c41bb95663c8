use weighted_grid_pathing::{Command, GridError, Heuristic, Planner, PlannerConfig, Point};

// Drives a planner the way a render loop would, without a window: a random session is created,
// every heuristic is compared on it, and the agent then walks while a wall is drawn in front of
// it. Run with RUST_LOG=debug to see every replan.
fn main() -> Result<(), GridError> {
    env_logger::init();
    let mut planner = Planner::random(PlannerConfig {
        seed: Some(2024),
        ..PlannerConfig::default()
    })?;
    println!("{}", planner.grid());
    for heuristic in Heuristic::ALL {
        planner.apply(Command::SelectHeuristic(heuristic))?;
        println!(
            "{heuristic}: {} cells, total cost {}, {:?}, {} expansions",
            planner.path().len(),
            planner.path_cost(),
            planner.elapsed(),
            planner.solver().expansions()
        );
    }

    planner.apply(Command::SetMoving(true))?;
    let (_, rows) = planner.dimensions();
    for step in 0..2000 {
        if step == 500 {
            let column = (planner.agent().x + 3).min(planner.dimensions().0 as i32 - 1);
            for row in 0..rows as i32 - 1 {
                planner.apply(Command::EditObstacle(Point::new(column, row), true))?;
            }
        }
        planner.tick()?;
        if step % 250 == 0 {
            println!(
                "tick {step}: agent at {}, remaining cost {}",
                planner.agent(),
                planner.remaining_cost()
            );
        }
        if planner.path().len() <= 1 {
            break;
        }
    }
    println!("Agent stopped at {}, goal {}", planner.agent(), planner.end());
    Ok(())
}
