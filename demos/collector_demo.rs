// Demonstration: drive the collection environment with a baseline policy.
//
// Build/run from this repo root:
//   cargo run --example collector_demo -- --policy seek --episodes 20 --steps 1500

use std::env;

use glam::DVec3;
use robocollect::{
    AgentEnvironment, EnvConfig, EvaluationMetrics, PointMassPhysics, Policy, RandomPolicy,
    Region, SeekTargetPolicy,
};

fn main() {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let policy_name = arg_value(&args, "--policy").unwrap_or("seek");
    let episodes: usize = arg_value(&args, "--episodes")
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);
    let steps: u64 = arg_value(&args, "--steps")
        .and_then(|s| s.parse().ok())
        .unwrap_or(1000);
    let seed: u64 = arg_value(&args, "--seed")
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    let config = EnvConfig {
        pool_capacity: 20,
        move_force: 4.0,
        rotation_force: 4.0,
        ..EnvConfig::default()
    };
    let mut env = match AgentEnvironment::new(config, seed) {
        Ok(env) => env,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    let arena = Region {
        min: DVec3::new(-12.0, 0.0, -12.0),
        max: DVec3::new(12.0, 2.0, 12.0),
    };
    let mut physics = PointMassPhysics::new(arena);

    let mut policy: Box<dyn Policy> = match policy_name {
        "random" => Box::new(RandomPolicy::new(seed)),
        "seek" => Box::new(SeekTargetPolicy::new()),
        other => {
            eprintln!("Unknown --policy '{}'; expected 'seek' or 'random'.", other);
            std::process::exit(2);
        }
    };

    match EvaluationMetrics::evaluate(&mut env, policy.as_mut(), &mut physics, episodes, steps) {
        Ok(metrics) => {
            println!("Policy: {}", policy.name());
            println!("{}", metrics);
        }
        Err(e) => {
            eprintln!("Evaluation failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn arg_value<'a>(args: &'a [String], key: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}
