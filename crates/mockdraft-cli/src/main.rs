// Mock draft entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, the terminal is for the draft)
// 2. Load config (copying defaults on first run)
// 3. Load the ADP table
// 4. Start the draft with the configured or a fresh seed
// 5. Alternate bot runs and human prompts until the draft ends or you quit
// 6. Print the board and write the configured exports

mod input;
mod report;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use mockdraft_core::config::{self, Config};
use mockdraft_core::dataset;
use mockdraft_core::draft::player::{Player, Position};
use mockdraft_core::draft::state::{Advance, DraftState};
use mockdraft_core::draft::{self, DraftError};
use rand::Rng;
use tracing::{info, warn};

use input::{parse_command, Command, HELP};

/// Players listed at each prompt unless changed with `s <n>`.
const DEFAULT_LIST_LEN: usize = 15;

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("Mock draft starting up");

    // 2. Load config. An optional first argument names the project directory.
    let base_dir = match std::env::args().nth(1) {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir().context("failed to read current directory")?,
    };
    let config = config::load_config(&base_dir).context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, {} teams, {} rounds, human slots {:?}",
        config.league.name,
        config.league.num_teams,
        config.league.num_rounds,
        config.league.human_slots
    );

    // 3. Load the ADP table
    let adp_path = config.adp_path();
    let players = dataset::load_players(&adp_path)
        .with_context(|| format!("failed to load ADP table {}", adp_path.display()))?;

    // 4. Start the draft
    let seed = config.league.seed.unwrap_or_else(|| rand::rng().random());
    info!("Draft seed: {seed}");
    let draft_config = config.draft_config().context("invalid draft settings")?;
    let mut state = draft::start(draft_config, players, config.team_specs(), seed)
        .context("failed to start draft")?;

    println!(
        "{}: {} teams, {} rounds, seed {} (set `seed = {}` in league.toml to replay)",
        config.league.name,
        config.league.num_teams,
        config.league.num_rounds,
        seed,
        seed
    );
    println!("Type ? at the prompt for commands.\n");

    // 5. Run the draft
    let completed = run(&mut state)?;
    if !completed {
        warn!("Draft abandoned at pick {}", state.current_pick());
        println!("\nDraft stopped at pick {}.", state.current_pick());
    }

    // 6. Results
    print_summary(&state);
    write_exports(&config, &state)?;

    info!("Mock draft finished");
    Ok(())
}

/// Drive the draft. Returns false if the person quit before the end.
fn run(state: &mut DraftState) -> anyhow::Result<bool> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut filter: Option<Position> = None;
    let mut list_len = DEFAULT_LIST_LEN;
    let mut redraw = true;

    loop {
        for pick in state.auto_draft().context("bot pick failed")? {
            println!("{}", report::pick_line(&pick));
        }
        if state.is_complete() {
            println!("\nDraft complete.");
            return Ok(true);
        }

        let shown: Vec<Player> = state
            .available(filter)
            .into_iter()
            .take(list_len)
            .cloned()
            .collect();
        if redraw {
            print_turn(state, &shown, filter);
        }
        redraw = true;

        print!("> ");
        io::stdout().flush().context("failed to flush stdout")?;
        let Some(line) = lines.next() else {
            // EOF
            return Ok(false);
        };
        let line = line.context("failed to read input")?;

        let selection = match parse_command(&line) {
            Command::Pick(n) => match shown.get(n - 1) {
                Some(player) => player.id,
                None => {
                    println!("No player #{n} in the list.");
                    redraw = false;
                    continue;
                }
            },
            Command::PickByName(name) => match state.pool().find_by_name(&name) {
                Some(player) => player.id,
                None => {
                    println!("No available player named `{name}`.");
                    redraw = false;
                    continue;
                }
            },
            Command::Filter(pos) => {
                filter = pos;
                continue;
            }
            Command::Show(n) => {
                list_len = n;
                continue;
            }
            Command::Refresh => continue,
            Command::Help => {
                println!("{HELP}");
                redraw = false;
                continue;
            }
            Command::Quit => return Ok(false),
            Command::Unknown(msg) => {
                println!("{msg} (? for help)");
                redraw = false;
                continue;
            }
        };

        match state.advance_one(Some(selection)) {
            Ok(Advance::Picked(pick)) => {
                println!("{}", report::pick_line(&pick));
                filter = None;
            }
            Ok(Advance::AwaitingHuman { .. }) => {}
            Err(DraftError::InvalidSelection(msg)) => {
                println!("Can't take that player: {msg}");
                redraw = false;
            }
            Err(e) => return Err(e).context("human pick failed"),
        }
    }
}

fn print_turn(state: &DraftState, shown: &[Player], filter: Option<Position>) {
    let Some(team) = state.on_the_clock() else {
        return;
    };
    println!(
        "\nRound {}, pick {} of {}: {} is on the clock",
        state.current_round(),
        state.current_pick(),
        state.total_picks(),
        team.team_name
    );
    println!("{}", report::needs_line(&team.roster.needs()));
    match filter {
        Some(pos) => println!(
            "Best available {pos} ({} left):",
            state.pool().count_at(pos)
        ),
        None => println!("Best available:"),
    }
    for (i, player) in shown.iter().enumerate() {
        println!("{}", report::player_line(i + 1, player));
    }
}

fn print_summary(state: &DraftState) {
    println!("\n{}", report::board_table(&state.board()));

    for team in state.teams().iter().filter(|t| t.human) {
        println!("{} roster:", team.team_name);
        for line in report::roster_lines(team) {
            println!("{line}");
        }
        println!();
    }

    println!("Remaining needs:");
    for team in state.teams() {
        println!("  {:<16} {}", team.team_name, report::needs_line(&team.roster.needs()));
    }
}

fn write_exports(config: &Config, state: &DraftState) -> anyhow::Result<()> {
    if let Some(path) = &config.output.board_csv {
        let path = config.resolve(path);
        report::write_board_csv(&path, &state.board())?;
        info!("Board written to {}", path.display());
        println!("Board written to {}", path.display());
    }
    if let Some(path) = &config.output.summary_json {
        let path = config.resolve(path);
        report::write_summary_json(&path, &state.snapshot())?;
        info!("Summary written to {}", path.display());
        println!("Summary written to {}", path.display());
    }
    Ok(())
}

/// Initialize tracing to log to a file (the terminal carries the draft itself).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("mockdraft.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mockdraft=info,mockdraft_core=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
