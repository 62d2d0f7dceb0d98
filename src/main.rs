use schema::ActionKind;
use skirmish::classes::{ultimate_description, ultimate_name};
use skirmish::{BattleConfig, BattleRunner, BattleSnapshot, ExecutionResult, PlannedAction};
use std::io::{self, BufRead, Write};
use strum::IntoEnumIterator;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let dump_json = std::env::args().any(|arg| arg == "--json");

    let config = match BattleConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    };
    let mut runner = match BattleRunner::from_config(&config) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("Error setting up battle: {}", e);
            std::process::exit(1);
        }
    };

    println!("2v2 BATTLE GAME");
    println!("{}", "=".repeat(50));
    print_ultimates(&runner.snapshot());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while !runner.is_battle_ended() && !runner.turn_limit_reached() {
        print_status(&runner.snapshot(), dump_json);

        let result = match runner.humans_needing_actions().first() {
            Some(&index) => {
                let Some(action) = prompt_action(&runner, index, &mut lines) else {
                    println!("\nInput closed, abandoning the battle.");
                    return;
                };
                match runner.submit_action(index, action) {
                    Ok(result) => result,
                    Err(e) => {
                        println!("{}", e);
                        None
                    }
                }
            }
            None => runner.execute_if_ready(),
        };

        if let Some(result) = result {
            print_turn(&runner, &result);
        }
    }

    println!("\nGAME OVER!");
    println!("{}", "=".repeat(50));
    match runner.winner() {
        Some(winner) => println!("TEAM {} WINS!", winner + 1),
        None => println!("No winner after {} turns.", runner.turn_number()),
    }
    println!("\nFinal Stats:");
    print_status(&runner.snapshot(), dump_json);
}

fn print_ultimates(snapshot: &BattleSnapshot) {
    println!("\nULTIMATE ABILITIES:");
    for c in &snapshot.combatants {
        println!(
            "{} ({}): {}",
            c.name,
            c.character_class,
            ultimate_description(c.character_class)
        );
    }
}

fn print_status(snapshot: &BattleSnapshot, dump_json: bool) {
    if dump_json {
        match serde_json::to_string_pretty(snapshot) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Could not serialize snapshot: {}", e),
        }
        return;
    }

    println!("\n{}", "=".repeat(60));
    println!("TURN {}", snapshot.turn_count);
    println!("{}", "=".repeat(60));
    for team in 0..2u8 {
        println!("\nTEAM {}:", team + 1);
        println!("{}", "-".repeat(30));
        for c in snapshot.combatants.iter().filter(|c| c.team == team) {
            let status = if c.is_defeated { "DEFEATED" } else { "ALIVE" };
            let ultimate = if c.ultimate_cooldown > 0 {
                format!("Ult: {}", c.ultimate_cooldown)
            } else {
                "Ult: Ready".to_string()
            };
            println!(
                "{} ({}) - HP: {}/{} | Stamina: {}/{} | {} ({})",
                c.name, c.character_class, c.health, c.max_health, c.stamina, c.max_stamina, status, ultimate
            );
        }
    }
}

fn print_turn(runner: &BattleRunner, result: &ExecutionResult) {
    for event in &result.events {
        if let Some(line) = event.format(runner.state()) {
            println!("  {}", line);
        }
    }
}

fn read_choice<B: BufRead>(lines: &mut io::Lines<B>, prompt: &str, max: usize) -> Option<usize> {
    loop {
        print!("{}", prompt);
        let _ = io::stdout().flush();
        let line = lines.next()?.ok()?;
        match line.trim().parse::<usize>() {
            Ok(choice) if (1..=max).contains(&choice) => return Some(choice - 1),
            Ok(_) => println!("Invalid choice! Enter 1-{}.", max),
            Err(_) => println!("Invalid input! Enter a number."),
        }
    }
}

/// Ask a human for an action and, for attacks, a target among living enemies.
/// Returns None when input runs out.
fn prompt_action<B: BufRead>(
    runner: &BattleRunner,
    index: usize,
    lines: &mut io::Lines<B>,
) -> Option<PlannedAction> {
    let snapshot = runner.snapshot();
    let me = snapshot.combatant(index)?;
    println!("\n{} ({}) - Choose your action:", me.name, me.character_class);

    let kinds: Vec<ActionKind> = ActionKind::iter().collect();
    for (i, kind) in kinds.iter().enumerate() {
        let label = match kind {
            ActionKind::Ultimate => format!("{} - {}", kind.display_name(), ultimate_name(me.character_class)),
            _ => kind.display_name().to_string(),
        };
        println!("{}. {} ({} stamina)", i + 1, label, kind.stamina_cost());
    }
    let kind = kinds[read_choice(lines, "Enter choice (1-6): ", kinds.len())?];

    if !kind.needs_enemy_target() {
        return Some(PlannedAction::untargeted(kind));
    }

    let enemies = runner.living_enemies_of(index);
    if enemies.is_empty() {
        return Some(PlannedAction::untargeted(kind));
    }
    println!("\nChoose target for {}:", kind.display_name());
    for (i, &enemy) in enemies.iter().enumerate() {
        if let Some(e) = snapshot.combatant(enemy) {
            println!("{}. {} ({}) - HP: {}", i + 1, e.name, e.character_class, e.health);
        }
    }
    let prompt = format!("Enter target (1-{}): ", enemies.len());
    let target = enemies[read_choice(lines, &prompt, enemies.len())?];
    Some(PlannedAction::new(kind, Some(target)))
}
