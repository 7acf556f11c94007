//! Lane Runner entry point
//!
//! The browser build is driven from JS through `platform::web`. Natively this
//! runs a headless game with the autopilot at a fixed 60 Hz frame rate and
//! reports the result.
//!
//! Usage: lane-runner [--seconds N] [--seed N] [--tuning FILE] [--profile FILE]

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use thiserror::Error;

    use lane_runner::Session;
    use lane_runner::persistence::{FileStore, KeyValueStore, MemoryStore, StoreError};
    use lane_runner::platform::entropy_seed;
    use lane_runner::sim::{GamePhase, autopilot};
    use lane_runner::tuning::{Tuning, TuningError};

    const FRAME_DT: f32 = 1.0 / 60.0;

    #[derive(Debug, Error)]
    pub enum CliError {
        #[error("{0}")]
        Usage(String),
        #[error("could not read {path}: {source}")]
        Read {
            path: PathBuf,
            #[source]
            source: std::io::Error,
        },
        #[error(transparent)]
        Tuning(#[from] TuningError),
        #[error(transparent)]
        Store(#[from] StoreError),
    }

    #[derive(Debug)]
    struct Options {
        seconds: f32,
        seed: Option<u64>,
        tuning: Option<PathBuf>,
        profile: Option<PathBuf>,
    }

    fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options, CliError> {
        let mut options = Options {
            seconds: 120.0,
            seed: None,
            tuning: None,
            profile: None,
        };

        while let Some(arg) = args.next() {
            let mut value = |name: &str| {
                args.next()
                    .ok_or_else(|| CliError::Usage(format!("{name} needs a value")))
            };
            match arg.as_str() {
                "--seconds" => {
                    options.seconds = value("--seconds")?
                        .parse()
                        .map_err(|_| CliError::Usage("--seconds must be a number".into()))?;
                }
                "--seed" => {
                    options.seed = Some(
                        value("--seed")?
                            .parse()
                            .map_err(|_| CliError::Usage("--seed must be an integer".into()))?,
                    );
                }
                "--tuning" => options.tuning = Some(value("--tuning")?.into()),
                "--profile" => options.profile = Some(value("--profile")?.into()),
                other => return Err(CliError::Usage(format!("unknown argument: {other}"))),
            }
        }
        Ok(options)
    }

    fn load_tuning(path: Option<&PathBuf>) -> Result<Tuning, CliError> {
        let Some(path) = path else {
            return Ok(Tuning::default());
        };
        let json = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.clone(),
            source,
        })?;
        Ok(Tuning::from_json(&json)?)
    }

    pub fn run() -> Result<(), CliError> {
        let options = parse_args(std::env::args().skip(1))?;
        let tuning = load_tuning(options.tuning.as_ref())?;
        let seed = options.seed.unwrap_or_else(entropy_seed);

        let store: Box<dyn KeyValueStore> = match &options.profile {
            Some(path) => Box::new(FileStore::open(path)?),
            None => Box::new(MemoryStore::new()),
        };

        let mut session = Session::new(store, tuning, seed);
        log::info!("Lane Runner (headless) seed={seed}");
        session.start_game();

        let max_frames = (options.seconds / FRAME_DT) as u64;
        let mut frames = 0;
        while session.phase() == GamePhase::Playing && frames < max_frames {
            let input = autopilot::drive(session.state());
            session.tick(&input, FRAME_DT);
            frames += 1;
        }

        let state = session.state();
        let outcome = if state.phase == GamePhase::GameOver {
            "game over"
        } else {
            "time limit"
        };
        println!(
            "{outcome} after {:.1}s: score {} ({:.0}m), coins {}, lives {}, high score {}, total coins {}",
            frames as f32 * FRAME_DT,
            state.score,
            state.distance,
            state.coins,
            state.lives,
            state.high_score,
            state.total_coins
        );
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(e) = headless::run() {
        log::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
