//! Generates a random (but reproducible) roster for trying out the draw.

use std::{collections::HashSet, path::PathBuf};

use abacus_draw::{
    config::{Roster, save_roster},
    tournaments::{
        config::TournamentConfig,
        participants::{Judge, JudgeHistory},
        teams::{CrossTournamentPerformance, Team},
    },
};
use clap::Parser;
use rand::{Rng, SeedableRng, seq::IndexedRandom};
use rand_chacha::ChaCha8Rng;

const SCHOOLS: &[&str] = &[
    "Ashford", "Brightwater", "Carrow", "Dunmore", "Eastleigh", "Fairhaven",
    "Glenrock", "Harrowgate", "Ironbridge", "Kingsmere", "Larkfield",
    "Millbrook",
];

#[derive(Parser)]
pub struct Args {
    /// Where to write the roster (`.toml` or `.json`).
    output: PathBuf,
    #[clap(long, default_value_t = 24)]
    teams: usize,
    #[clap(long, default_value_t = 30)]
    judges: usize,
    #[clap(long, default_value_t = 8)]
    schools: usize,
    /// Chance that a judge declares a conflict with any particular team.
    #[clap(long, default_value_t = 0.02)]
    conflict_rate: f64,
    #[clap(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if args.schools == 0 {
        return Err("there must be at least one school".into());
    }
    let conflict_rate = args.conflict_rate.clamp(0.0, 1.0);

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let schools = (0..args.schools)
        .map(|i| {
            let base = SCHOOLS[i % SCHOOLS.len()];
            match i / SCHOOLS.len() {
                0 => base.to_string(),
                n => format!("{base} {}", n + 1),
            }
        })
        .collect::<Vec<_>>();

    let mut per_school = vec![0; schools.len()];
    let teams = (0..args.teams)
        .map(|i| {
            let school = rng.random_range(0..schools.len());
            per_school[school] += 1;

            let mut team = Team::new(
                format!("team-{i:03}"),
                format!("{} {}", schools[school], per_school[school]),
            );
            team.institution_id = Some(school_id(&schools[school]));

            if rng.random_bool(0.6) {
                let debates = rng.random_range(4..30);
                team.cross_tournament_performance =
                    CrossTournamentPerformance {
                        tournaments_participated: rng.random_range(1..6),
                        total_wins: rng.random_range(0..=debates),
                        total_debates: debates,
                        avg_performance: rng.random_range(50.0..80.0),
                    };
            }
            team
        })
        .collect::<Vec<_>>();

    let judges = (0..args.judges)
        .map(|i| {
            let mut judge =
                Judge::new(format!("judge-{i:03}"), format!("Judge {}", i + 1));
            if rng.random_bool(0.8)
                && let Some(school) = schools.choose(&mut rng)
            {
                judge.institution_id = Some(school_id(school));
            }

            judge.total_debates_judged = rng.random_range(0..200);
            judge.elimination_debates_judged =
                rng.random_range(0..=judge.total_debates_judged / 5);
            judge.avg_feedback_score = rng.random_range(2.0..5.0);
            judge.cross_tournament_stats = JudgeHistory {
                tournaments_judged: rng.random_range(0..15),
                total_debates: judge.total_debates_judged,
                elimination_debates: judge.elimination_debates_judged,
                feedback_consistency: rng.random_range(0.0..1.5),
            };
            judge.conflicts = teams
                .iter()
                .filter(|_| rng.random_bool(conflict_rate))
                .map(|team| team.id.clone())
                .collect::<HashSet<_>>();
            judge
        })
        .collect::<Vec<_>>();

    let roster = Roster {
        config: TournamentConfig::default(),
        teams,
        judges,
    };
    save_roster(&roster, &args.output)?;

    println!(
        "Wrote {} teams and {} judges from {} schools to {}",
        roster.teams.len(),
        roster.judges.len(),
        schools.len(),
        args.output.display()
    );

    Ok(())
}

fn school_id(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}
