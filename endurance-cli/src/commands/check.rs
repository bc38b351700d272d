//! Summarize a configuration.

use endurance_core::{Cadence, Config, ControlKind};

fn every(cadence: Cadence) -> String {
    if cadence == Cadence::NEVER {
        "never".to_string()
    } else {
        format!("1/{} per cycle", cadence.cycles())
    }
}

/// Run the check command. The config has already been validated.
pub fn run(config: &Config) {
    println!("=== endurance check ===");
    println!();

    println!("WebDriver:");
    println!("  Hub:     {}", config.webdriver.hub_url);
    println!("  Browser: {}", config.webdriver.browser_name);
    println!("  App:     {}", config.app.base_url);
    match &config.account.email {
        Some(email) => println!("  Account: {} (login)", email),
        None => println!("  Account: generated at start"),
    }
    println!();

    println!("Backend:");
    match config.backend.control {
        ControlKind::Docker => println!("  Control: docker container {}", config.backend.container),
        ControlKind::Compose => println!("  Control: compose service {}", config.backend.service),
    }
    println!("  Stop:    {}", every(config.backend.stop_every_cycles));
    println!("  Start:   {}", every(config.backend.start_every_cycles));
    println!("  Verify:  {}", config.backend.verify_transitions);
    println!("  Grace:   {}s", config.backend.stop_grace_secs);
    println!();

    println!("Observers: {}", config.observers.len());
    for observer in &config.observers {
        println!(
            "  {:<20} connect {}, disconnect {}",
            observer.name,
            every(observer.connect_every_cycles),
            every(observer.disconnect_every_cycles)
        );
    }
    println!();

    println!("Run:");
    println!("  Tick:    {} ms", config.run.tick_ms);
    match config.run.max_cycles {
        Some(max) => println!("  Budget:  {} cycles", max),
        None => println!("  Budget:  until failure"),
    }
    match config.run.seed {
        Some(seed) => println!("  Seed:    {}", seed),
        None => println!("  Seed:    random"),
    }
}
