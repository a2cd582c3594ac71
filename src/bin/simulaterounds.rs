//! Simulates rounds.
//!
//! Draws each round from a roster file, makes up a result for every debate
//! and records it, so that later rounds are drawn from a realistic history.

use std::{collections::HashMap, path::PathBuf};

use abacus_draw::{
    config::load_roster,
    drafts::{DraftStore, JsonFileDraftStore},
    generate_pairings,
    tournaments::{
        config::PairingMethod,
        rounds::{
            draws::{Pairing, Severity, manage::RoundDraw},
            results::{DebateResult, record_round},
            side_names::Side,
        },
        standings::rank_by_results,
        teams::Team,
    },
};
use clap::{ArgAction, Parser};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::Level;

#[derive(Parser)]
pub struct Args {
    /// Roster to draw from (`.toml` or `.json`).
    roster: PathBuf,
    /// Number of rounds to simulate. Defaults to the number of preliminary
    /// rounds in the roster's configuration.
    #[clap(long, short)]
    rounds: Option<u32>,
    #[clap(long, default_value_t = PairingMethod::Auto)]
    method: PairingMethod,
    #[clap(long, default_value_t = 0)]
    seed: u64,
    /// Save each generated draw as a draft in this directory.
    #[clap(long)]
    drafts: Option<PathBuf>,
    #[clap(long, short, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(match args.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        })
        .with_writer(std::io::stderr)
        .init();

    let mut roster = load_roster(&args.roster)?;
    let store = args.drafts.map(JsonFileDraftStore::new).transpose()?;
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let rounds = args.rounds.unwrap_or(roster.config.prelim_rounds);

    println!(
        "Simulating {rounds} rounds with {} teams and {} judges",
        roster.teams.len(),
        roster.judges.len()
    );

    for round in 1..=rounds {
        let draw = generate_pairings(
            &roster.teams,
            &roster.judges,
            &roster.config,
            round,
            args.method,
        )?;

        let names = roster
            .teams
            .iter()
            .map(|team| (team.id.clone(), team.name.clone()))
            .collect::<HashMap<_, _>>();
        print_draw(&draw, &names);

        if let Some(store) = &store {
            let draft = store.save_draft(round, &draw.pairings)?;
            tracing::info!("Saved round {round} as draft {}", draft.id);
        }

        let results = draw
            .pairings
            .iter()
            .filter(|pairing| !pairing.is_bye_round)
            .map(|pairing| simulate_result(pairing, &roster.teams, &mut rng))
            .collect::<Vec<_>>();

        record_round(
            &mut roster.teams,
            &mut roster.judges,
            round,
            &draw.pairings,
            &results,
        )?;
    }

    println!();
    println!("Standings after {rounds} rounds");
    for (pos, team) in rank_by_results(&roster.teams).iter().enumerate() {
        println!(
            "{:>3}. {:<30} {:>2} wins {:>8.1} points",
            pos + 1,
            team.name,
            team.wins,
            team.total_points
        );
    }

    Ok(())
}

fn team_name<'a>(
    names: &'a HashMap<String, String>,
    id: Option<&'a str>,
) -> &'a str {
    id.map(|id| names.get(id).map_or(id, String::as_str))
        .unwrap_or("-")
}

fn print_draw(draw: &RoundDraw, names: &HashMap<String, String>) {
    println!();
    println!("Round {} ({})", draw.round, draw.method);
    for pairing in &draw.pairings {
        if pairing.is_bye_round {
            println!(
                "  {:<12} {} has a bye",
                pairing.room_name,
                team_name(names, pairing.team_of_side(Side::Proposition))
            );
            continue;
        }

        println!(
            "  {:<12} {} ({}) vs {} ({})  judges: {}  quality {:.1}",
            pairing.room_name,
            team_name(names, pairing.team_of_side(Side::Proposition)),
            Side::Proposition.name(true),
            team_name(names, pairing.team_of_side(Side::Opposition)),
            Side::Opposition.name(true),
            pairing.judges.join(", "),
            pairing.quality_score
        );
        for conflict in &pairing.conflicts {
            println!("      {conflict}");
        }
    }

    println!(
        "  {} debates, {} byes, {} errors, {} warnings, average quality {}",
        draw.debates(),
        draw.byes(),
        draw.conflicts_of_severity(Severity::Error),
        draw.conflicts_of_severity(Severity::Warning),
        draw.average_quality()
            .map_or_else(|| "n/a".to_string(), |q| format!("{q:.1}"))
    );
}

/// Makes up a result, favouring the stronger team.
fn simulate_result(
    pairing: &Pairing,
    teams: &[Team],
    rng: &mut impl Rng,
) -> DebateResult {
    let strength = |side: Side| {
        pairing
            .team_of_side(side)
            .and_then(|id| teams.iter().find(|team| team.id == id))
            .map_or(0.0, Team::strength)
    };

    let mut points = |side: Side| {
        let skill = strength(side).clamp(50.0, 90.0);
        rng.random_range(skill - 15.0..skill + 10.0)
    };
    let proposition_points = points(Side::Proposition);
    let opposition_points = points(Side::Opposition);

    DebateResult {
        winner: if proposition_points >= opposition_points {
            Side::Proposition
        } else {
            Side::Opposition
        },
        proposition_points,
        opposition_points,
    }
}
