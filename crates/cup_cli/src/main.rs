//! Operator CLI for the tournament core.
//!
//! Each subcommand loads the snapshot, performs one operation, and
//! saves. All algorithmic work lives in `cup_core`; this binary only
//! parses arguments and prints tables.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use cup_core::{
    advance_knockout, dedup_team_names, fixture_rows, matchday_rows, seed_round_of_16,
    select_entrants, standings_rows, AdvanceOutcome, CardTally, GroupAssigner, Phase,
    PlayerStatLine, SnapshotStore, TeamId, Tournament,
};
use rand::rngs::OsRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cup")]
#[command(about = "Manage a groups-plus-knockout tournament", long_about = None)]
struct Cli {
    /// Snapshot file path
    #[arg(long, global = true, default_value = "tournament.json")]
    data: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a fresh tournament snapshot
    Init {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        host: Option<String>,
    },

    /// Assign teams to groups from an ordered name list and finalize
    Draw {
        /// Text file with one team per line, in assignment order:
        /// "Name" or "Name,Confederation"
        #[arg(long)]
        teams: PathBuf,
    },

    /// Record a match result
    Record {
        match_id: String,
        home_goals: u32,
        away_goals: u32,

        /// Yellow cards as HOME,AWAY
        #[arg(long)]
        yellow: Option<String>,

        /// Red cards as HOME,AWAY
        #[arg(long)]
        red: Option<String>,

        /// Seed for the tie-break simulation (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Attach per-player stat lines to a played match (replaces any
    /// previously entered lines)
    Players {
        match_id: String,

        /// Stat line as "Name,goals[,yellow[,red]]"; repeatable
        #[arg(long = "line", required = true)]
        lines: Vec<String>,
    },

    /// Print standings for one group or all groups
    Standings {
        #[arg(long)]
        group: Option<String>,
    },

    /// Print the fixture/result table for a phase
    Fixtures {
        /// Phase: groups, r16, quarters, semis, final
        #[arg(long, default_value = "groups")]
        phase: String,

        /// Restrict group-stage output to one matchday (1-3)
        #[arg(long)]
        matchday: Option<u8>,
    },

    /// Select the 16 knockout entrants and seed the round of 16
    Qualify,

    /// Advance the knockout to the next phase (asks for confirmation)
    Advance {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let store = SnapshotStore::new(&cli.data);

    match cli.command {
        Commands::Init { name, host } => init(&store, name, host),
        Commands::Draw { teams } => draw(&store, &teams),
        Commands::Record { match_id, home_goals, away_goals, yellow, red, seed } => {
            record(&store, &match_id, home_goals, away_goals, yellow, red, seed)
        }
        Commands::Players { match_id, lines } => players(&store, &match_id, lines),
        Commands::Standings { group } => standings(&store, group),
        Commands::Fixtures { phase, matchday } => fixtures(&store, &phase, matchday),
        Commands::Qualify => qualify(&store),
        Commands::Advance { yes } => advance(&store, yes),
    }
}

fn init(store: &SnapshotStore, name: Option<String>, host: Option<String>) -> Result<()> {
    if store.exists() {
        bail!("snapshot {:?} already exists", store.path());
    }
    let mut tournament = Tournament::default();
    if let Some(name) = name {
        tournament.name = name;
    }
    if let Some(host) = host {
        tournament.host = host;
    }
    store.save(&tournament)?;
    println!("Created {} ({}) at {:?}", tournament.name, tournament.host, store.path());
    Ok(())
}

fn draw(store: &SnapshotStore, teams_file: &PathBuf) -> Result<()> {
    let mut tournament = store.load_or_default()?;
    if tournament.is_configuration_closed() {
        bail!("groups are already drawn; configuration is closed");
    }

    let content = std::fs::read_to_string(teams_file)
        .with_context(|| format!("reading team list {teams_file:?}"))?;
    let entries = parse_team_list(&content);
    let names = dedup_team_names(entries.iter().map(|(name, _)| name));

    let mut assigner = GroupAssigner::new(names.clone());
    for name in &names {
        assigner.assign(name)?;
    }
    assigner.finalize(&mut tournament)?;
    apply_confederations(&mut tournament, &entries);
    store.save(&tournament)?;

    println!("Assigned {} teams into {} groups; group stage scheduled.",
        tournament.team_count(),
        tournament.group_labels().len());
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn record(
    store: &SnapshotStore,
    match_id: &str,
    home_goals: u32,
    away_goals: u32,
    yellow: Option<String>,
    red: Option<String>,
    seed: Option<u64>,
) -> Result<()> {
    let mut tournament = store.load_or_default()?;

    let cards = parse_cards(yellow.as_deref(), red.as_deref())?;
    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::seed_from_u64(OsRng.gen()),
    };

    let outcome = tournament.record_result(match_id, home_goals, away_goals, cards, &mut rng)?;
    store.save(&tournament)?;

    let fixture = tournament.fixture(match_id).expect("just recorded");
    println!("{match_id}: {}", fixture.result_text());
    if let Some(tb) = outcome.tie_break {
        println!("  extra time {}", tb.extra_time);
        if let Some(pens) = tb.shootout {
            println!("  penalties  {pens}");
        }
    }
    if let Some(winner) = outcome.winner {
        let name = tournament.team(&winner).map(|t| t.name.clone()).unwrap_or(winner);
        println!("  advancing: {name}");
    }
    Ok(())
}

fn players(store: &SnapshotStore, match_id: &str, lines: Vec<String>) -> Result<()> {
    let mut tournament = store.load_or_default()?;
    let parsed = lines
        .iter()
        .map(|line| parse_player_line(line))
        .collect::<Result<Vec<PlayerStatLine>>>()?;
    let count = parsed.len();
    tournament.set_player_stats(match_id, parsed)?;
    store.save(&tournament)?;

    println!("{match_id}: {count} player line(s) recorded.");
    Ok(())
}

fn standings(store: &SnapshotStore, group: Option<String>) -> Result<()> {
    let tournament = store.load_or_default()?;
    let groups: Vec<String> = match group {
        Some(g) => vec![g],
        None => tournament.group_labels().into_iter().collect(),
    };
    for group in groups {
        println!("Group {group}");
        println!("  #  Team                      P  W  D  L  GF GA GD Pts");
        for row in standings_rows(&tournament, &group) {
            println!(
                "  {:<2} {:<24} {:>2} {:>2} {:>2} {:>2} {:>3} {:>2} {:>3} {:>3}",
                row.rank,
                row.name,
                row.played,
                row.won,
                row.drawn,
                row.lost,
                row.goals_for,
                row.goals_against,
                row.goal_difference,
                row.points
            );
        }
    }
    Ok(())
}

fn fixtures(store: &SnapshotStore, phase: &str, matchday: Option<u8>) -> Result<()> {
    let tournament = store.load_or_default()?;
    let phase = parse_phase(phase)?;
    let rows = match (phase, matchday) {
        (Phase::GroupStage, Some(day)) => matchday_rows(&tournament, day),
        _ => fixture_rows(&tournament, phase),
    };
    if rows.is_empty() {
        println!("No fixtures for {phase}.");
        return Ok(());
    }
    for row in rows {
        let day = row.matchday.map(|d| format!(" (day {d})")).unwrap_or_default();
        println!("{}  {:<20} vs {:<20} {}{day}", row.match_id, row.home, row.away, row.result);
    }
    Ok(())
}

fn qualify(store: &SnapshotStore) -> Result<()> {
    let mut tournament = store.load_or_default()?;
    let qualifiers = select_entrants(&tournament)?;
    let match_ids = seed_round_of_16(&mut tournament, &qualifiers)?;
    store.save(&tournament)?;

    println!("Round of 16 seeded ({} matches):", match_ids.len());
    for id in match_ids {
        let fx = tournament.fixture(&id).expect("just created");
        let name = |team: &str| {
            tournament.team(team).map(|t| t.name.clone()).unwrap_or_else(|| team.to_string())
        };
        println!("{id}  {} vs {}", name(&fx.home), name(&fx.away));
    }
    Ok(())
}

fn advance(store: &SnapshotStore, yes: bool) -> Result<()> {
    let mut tournament = store.load_or_default()?;
    let current = tournament
        .current_knockout_phase()
        .ok_or_else(|| anyhow::anyhow!("knockout stage has not been seeded yet"))?;

    if !yes && !confirm(&format!("Advance past {current}?"))? {
        println!("Aborted.");
        return Ok(());
    }

    match advance_knockout(&mut tournament)? {
        AdvanceOutcome::Scheduled { phase, match_ids } => {
            store.save(&tournament)?;
            println!("{phase} scheduled ({} matches).", match_ids.len());
        }
        AdvanceOutcome::Champion(id) => {
            let name = tournament.team(&id).map(|t| t.name.clone()).unwrap_or(id);
            println!("Tournament complete. Champion: {name}");
        }
    }
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

fn parse_phase(input: &str) -> Result<Phase> {
    match input.to_lowercase().as_str() {
        "groups" | "group" | "group-stage" => Ok(Phase::GroupStage),
        "r16" | "round-of-16" => Ok(Phase::RoundOf16),
        "quarters" | "quarterfinals" | "qf" => Ok(Phase::Quarterfinals),
        "semis" | "semifinals" | "sf" => Ok(Phase::Semifinals),
        "final" => Ok(Phase::Final),
        other => bail!("unknown phase {other:?} (use groups, r16, quarters, semis, final)"),
    }
}

/// Splits each non-empty line into a name and an optional confederation.
/// An empty confederation field is treated as absent.
fn parse_team_list(content: &str) -> Vec<(String, Option<String>)> {
    content
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            Some(match line.split_once(',') {
                Some((name, confed)) if !confed.trim().is_empty() => {
                    (name.trim().to_string(), Some(confed.trim().to_string()))
                }
                Some((name, _)) => (name.trim().to_string(), None),
                None => (line.to_string(), None),
            })
        })
        .collect()
}

/// Copies confederations from the parsed team list onto the assigned
/// teams, matching by name. First entry wins for duplicate names, the
/// same rule the assignment pool uses.
fn apply_confederations(tournament: &mut Tournament, entries: &[(String, Option<String>)]) {
    let mut by_name: BTreeMap<&str, &str> = BTreeMap::new();
    for (name, confed) in entries {
        if let Some(confed) = confed {
            by_name.entry(name.as_str()).or_insert(confed.as_str());
        }
    }
    let assigned: Vec<(TeamId, String)> = tournament
        .teams()
        .map(|team| (team.id.clone(), team.name.clone()))
        .collect();
    for (id, name) in assigned {
        if let Some(confed) = by_name.get(name.as_str()) {
            if let Some(team) = tournament.team_mut(&id) {
                team.confederation = (*confed).to_string();
            }
        }
    }
}

fn parse_player_line(input: &str) -> Result<PlayerStatLine> {
    let mut parts = input.split(',').map(str::trim);
    let player = parts
        .next()
        .filter(|name| !name.is_empty())
        .with_context(|| format!("expected NAME,GOALS[,YELLOW[,RED]], got {input:?}"))?
        .to_string();
    let mut field = |label: &str| -> Result<u8> {
        match parts.next() {
            Some(value) => value
                .parse()
                .with_context(|| format!("bad {label} count in {input:?}")),
            None => Ok(0),
        }
    };
    let goals = field("goal")?;
    let yellow_cards = field("yellow card")?;
    let red_cards = field("red card")?;
    Ok(PlayerStatLine { player, goals, yellow_cards, red_cards })
}

fn parse_cards(
    yellow: Option<&str>,
    red: Option<&str>,
) -> Result<Option<(CardTally, CardTally)>> {
    if yellow.is_none() && red.is_none() {
        return Ok(None);
    }
    let (yellow_home, yellow_away) = parse_pair(yellow.unwrap_or("0,0"))?;
    let (red_home, red_away) = parse_pair(red.unwrap_or("0,0"))?;
    Ok(Some((
        CardTally { yellow: yellow_home, red: red_home },
        CardTally { yellow: yellow_away, red: red_away },
    )))
}

fn parse_pair(input: &str) -> Result<(u8, u8)> {
    let (home, away) = input
        .split_once(',')
        .with_context(|| format!("expected HOME,AWAY, got {input:?}"))?;
    Ok((home.trim().parse()?, away.trim().parse()?))
}
