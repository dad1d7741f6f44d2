//! c4: operator console for the Connect Four engine.
//!
//! Subcommands:
//! - analyze: interactive position analysis
//! - selfplay: stochastic self-play games with tunable parameters

use std::env;
use std::io::{self, BufRead};
use std::process;

use c4_core::{Config, Position};
use c4_logging::NdjsonWriter;
use c4_mcts::{SearchEngine, UniformEvaluator};
use c4_selfplay::{play_game, SelfplayParams};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("analyze") => cmd_analyze(&args[1..]),
        Some("selfplay") => cmd_selfplay(&args[1..]),
        Some("--help") | Some("-h") | None => print_usage(),
        Some(other) => {
            eprintln!("Unknown subcommand: {other}");
            eprintln!("Run `c4 --help` for usage.");
            process::exit(1);
        }
    }
}

fn print_usage() {
    println!(
        r#"c4

USAGE:
    c4 analyze [--config PATH]
    c4 selfplay [--config PATH]

Both subcommands read commands from stdin; type `exit` to leave.
"#
    );
}

fn load_config(args: &[String]) -> Config {
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                if i + 1 >= args.len() {
                    eprintln!("Missing value for --config");
                    process::exit(1);
                }
                match Config::load(&args[i + 1]) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Failed to load {}: {e}", args[i + 1]);
                        process::exit(1);
                    }
                }
            }
            other => {
                eprintln!("Unknown option: {other}");
                process::exit(1);
            }
        }
    }
    Config::default()
}

fn cmd_analyze(args: &[String]) {
    let cfg = load_config(args);
    let eval = UniformEvaluator;
    let mut game = Position::new();

    println!("Welcome to analysis mode.");
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix("mv ") {
            if let Ok(col) = rest.trim().parse::<usize>() {
                // illegal operator moves are ignored
                if col < 7 && game.legal_moves()[col] {
                    game.play(col);
                }
            }
        } else if line == "d" {
            print!("{}", game.render());
        } else if line == "undo" {
            game.undo();
        } else if line == "isready" {
            println!("readyok");
        } else if let Some(rest) = line.strip_prefix("position set ") {
            game = Position::from_diagram(rest);
        } else if let Some(rest) = line.strip_prefix("getbest n ") {
            let playouts = rest.trim().parse::<u64>().unwrap_or(0).max(10);
            let mut engine = SearchEngine::new(game, cfg.engine.c_puct, playouts);
            if let Err(e) = engine.run_playouts(&eval, false) {
                eprintln!("search failed: {e}");
                continue;
            }
            let pv = engine.principal_variation();
            match pv.first() {
                None => println!("end of game"),
                Some(&best) => {
                    let q = engine
                        .root_child(best as usize)
                        .map(|n| n.q())
                        .unwrap_or(0.0);
                    println!("{q} {best}");
                }
            }
        } else if line == "exit" {
            return;
        }
    }
}

fn cmd_selfplay(args: &[String]) {
    let cfg = load_config(args);
    let mut params = SelfplayParams::from_config(&cfg);
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut writer: Option<NdjsonWriter> = None;
    let mut game_id: u64 = 0;

    println!("Welcome to selfplay mode.");
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "isready" {
            println!("readyok");
        } else if let Some(rest) = line.strip_prefix("seed ") {
            if let Ok(seed) = rest.trim().parse::<u64>() {
                rng = ChaCha8Rng::seed_from_u64(seed);
                println!("seed set to {seed}");
            }
        } else if let Some(rest) = line.strip_prefix("c_puct set ") {
            if let Ok(v) = rest.trim().parse::<f32>() {
                params.c_puct = v;
            }
        } else if let Some(rest) = line.strip_prefix("dir_alpha set ") {
            if let Ok(v) = rest.trim().parse::<f64>() {
                params.dir_alpha = v;
            }
        } else if let Some(rest) = line.strip_prefix("temp_cutoff set ") {
            if let Ok(v) = rest.trim().parse::<u32>() {
                params.temp_cutoff = v;
            }
        } else if let Some(rest) = line.strip_prefix("playouts set ") {
            if let Ok(v) = rest.trim().parse::<u64>() {
                params.playouts = v;
            }
        } else if let Some(rest) = line.strip_prefix("log ") {
            match NdjsonWriter::open_append(rest.trim()) {
                Ok(w) => writer = Some(w),
                Err(e) => eprintln!("failed to open log: {e}"),
            }
        } else if line == "params" {
            println!(
                "Parameters\nc_puct {}\ndir_alpha {}\ntemp_cutoff {}\nplayouts {}",
                params.c_puct, params.dir_alpha, params.temp_cutoff, params.playouts
            );
        } else if line == "sspgo" {
            match play_game(
                &UniformEvaluator,
                &params,
                &mut rng,
                game_id,
                writer.as_mut(),
            ) {
                Ok(record) => {
                    for mv in &record.moves {
                        for p in mv.search_probs {
                            print!("{p} ");
                        }
                        println!("~{}", mv.col);
                    }
                    println!("done");
                    game_id += 1;
                }
                Err(e) => eprintln!("selfplay failed: {e}"),
            }
        } else if line == "exit" {
            return;
        }
    }
}
