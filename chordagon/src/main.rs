//! Chordagon: a microtonal chord visualizer.
//!
//! Listens on every MIDI input, places each sounding note on the pitch circle
//! according to the configured tuning, and colors the line between every pair
//! of notes by interval class. This binary runs the frame loop headless and
//! hands each frame to a [`sink::FrameSink`]. Type `q` and Enter to stop.

mod setup;
mod sink;

use std::fs::File;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chordagon_core::config::Config;
use chordagon_core::pipeline::NotePipeline;

use setup::StartupError;
use sink::{FrameSink, LogSink};

#[derive(Debug, Default, PartialEq)]
struct Args {
    verbose: bool,
    list_ports: bool,
    duration: Option<Duration>,
    config_path: Option<PathBuf>,
}

impl Args {
    fn parse(args: &[String]) -> Self {
        let value_after = |flag: &str| {
            args.iter()
                .position(|a| a == flag)
                .and_then(|i| args.get(i + 1))
        };
        Self {
            verbose: args.iter().any(|a| a == "--verbose" || a == "-v"),
            list_ports: args.iter().any(|a| a == "--list-ports"),
            duration: value_after("--duration")
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|secs| secs.is_finite() && *secs >= 0.0)
                .map(Duration::from_secs_f64),
            config_path: value_after("--config").map(PathBuf::from),
        }
    }
}

fn init_logging(verbose: bool) {
    use simplelog::{
        ColorChoice, CombinedLogger, LevelFilter, SharedLogger, TermLogger, TerminalMode, WriteLogger,
    };

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };

    let log_path = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chordagon")
        .join("chordagon.log");
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Warn,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    match File::create(&log_path) {
        Ok(file) => loggers.push(WriteLogger::new(log_level, simplelog::Config::default(), file)),
        Err(e) => eprintln!("chordagon: cannot create {}: {}", log_path.display(), e),
    }
    if let Err(e) = CombinedLogger::init(loggers) {
        eprintln!("chordagon: logger init failed: {}", e);
    }

    log::info!("chordagon starting (log level: {:?})", log_level);
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let args = Args::parse(&args);
    init_logging(args.verbose);

    let config = match &args.config_path {
        Some(path) => Config::load_from(Some(path)),
        None => Config::load(),
    };

    let result = if args.list_ports {
        setup::print_ports(&config)
    } else {
        run(&config, args.duration, &mut LogSink::new())
    };

    std::process::exit(exit_code(&result));
}

/// The terminal logger already writes errors to stderr, so this only logs.
fn exit_code(result: &Result<(), StartupError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            log::error!("{}", e);
            1
        }
    }
}

/// Sets the returned flag once `q` is entered on stdin. EOF just stops watching.
fn spawn_quit_watcher() -> Arc<AtomicBool> {
    let quit = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&quit);
    let spawned = std::thread::Builder::new()
        .name("quit-watcher".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) if is_quit_command(&line) => {
                        flag.store(true, Ordering::Release);
                        return;
                    }
                    Ok(_) => {}
                    Err(_) => return,
                }
            }
        });
    if let Err(e) = spawned {
        log::warn!("quit watcher unavailable: {}", e);
    }
    quit
}

fn is_quit_command(line: &str) -> bool {
    matches!(line.trim(), "q" | "quit" | "exit")
}

fn run(config: &Config, duration: Option<Duration>, sink: &mut dyn FrameSink) -> Result<(), StartupError> {
    let (tuning, mut pipeline) = setup::build_pipeline(config)?;
    let midi = setup::connect_inputs(config, &pipeline)?;
    let quit = spawn_quit_watcher();

    let frame_period = Duration::from_secs_f64(1.0 / config.frame_rate() as f64);
    let started = Instant::now();
    log::info!(
        target: "frame",
        "running at {} fps, queue capacity {}",
        config.frame_rate(),
        config.queue_capacity()
    );

    loop {
        let frame_start = Instant::now();
        let frame = pipeline.update();
        sink.present(&frame, pipeline.edges());

        if quit.load(Ordering::Acquire) || duration.is_some_and(|d| started.elapsed() >= d) {
            break;
        }
        if let Some(rest) = frame_period.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    // inputs first so no callback outlives the queue's consumer
    drop(midi);
    release_all(&mut pipeline, sink);
    drop(pipeline);
    log::info!(
        target: "frame",
        "stopped after {:.1}s ({} tuning clients left)",
        started.elapsed().as_secs_f64(),
        tuning.client_count()
    );
    Ok(())
}

/// With the inputs closed their note-offs never arrive, so release everything
/// and hand the sink one last, empty frame.
fn release_all(pipeline: &mut NotePipeline, sink: &mut dyn FrameSink) {
    log::debug!(target: "frame", "releasing {} held notes", pipeline.notes().len());
    pipeline.clear();
    let frame = pipeline.frame();
    sink.present(&frame, pipeline.edges());
}

#[cfg(test)]
mod tests {
    use super::*;
    use chordagon_core::interval::EdgeTable;
    use chordagon_core::notes::NoteFrame;
    use chordagon_core::tuning::{TuningError, TuningHost};
    use chordagon_types::{NoteEvent, TuningParams};

    #[derive(Default)]
    struct Recorder {
        counts: Vec<usize>,
    }

    impl FrameSink for Recorder {
        fn present(&mut self, frame: &NoteFrame, _edges: &EdgeTable) {
            self.counts.push(frame.count());
        }
    }

    fn args(list: &[&str]) -> Args {
        let owned: Vec<String> = list.iter().map(|s| s.to_string()).collect();
        Args::parse(&owned)
    }

    #[test]
    fn parses_flags() {
        let parsed = args(&["chordagon", "-v", "--duration", "2.5", "--config", "/tmp/c.toml"]);
        assert!(parsed.verbose);
        assert!(!parsed.list_ports);
        assert_eq!(parsed.duration, Some(Duration::from_millis(2500)));
        assert_eq!(parsed.config_path, Some(PathBuf::from("/tmp/c.toml")));
    }

    #[test]
    fn no_flags_is_default() {
        assert_eq!(args(&["chordagon"]), Args::default());
    }

    #[test]
    fn bad_duration_is_ignored() {
        assert_eq!(args(&["chordagon", "--duration", "soon"]).duration, None);
        assert_eq!(args(&["chordagon", "--duration", "-1"]).duration, None);
        assert_eq!(args(&["chordagon", "--duration"]).duration, None);
    }

    #[test]
    fn quit_commands() {
        assert!(is_quit_command("q"));
        assert!(is_quit_command("  quit\n"));
        assert!(!is_quit_command(""));
        assert!(!is_quit_command("queue"));
    }

    #[test]
    fn shutdown_releases_held_notes() {
        let host = TuningHost::with_source(TuningParams::default());
        let mut pipeline = NotePipeline::new(64, &host).unwrap();
        let tx = pipeline.sender();
        tx.send(NoteEvent::note_on(60, 100));
        tx.send(NoteEvent::note_on(64, 100));

        let mut sink = Recorder::default();
        let frame = pipeline.update();
        sink.present(&frame, pipeline.edges());
        release_all(&mut pipeline, &mut sink);

        assert_eq!(sink.counts, [2, 0]);
        assert!(pipeline.notes().is_empty());
    }

    #[test]
    fn exit_code_follows_result() {
        assert_eq!(exit_code(&Ok(())), 0);
        assert_eq!(exit_code(&Err(TuningError::NoTuningLoaded.into())), 1);
    }

    #[test]
    fn list_ports_flag() {
        assert!(args(&["chordagon", "--list-ports"]).list_ports);
    }
}
