use sprited::cli::Args;
use sprited::config::{self, EditorSettings, PathConfig};
use sprited::core::editor_events::{CanvasRefreshEvent, FramesChangedEvent};
use sprited::core::event_bus::EventBus;
use sprited::core::player_events::{PlaybackStateChangedEvent, PreviewFrameEvent};
use sprited::editor::Editor;
use sprited::main_events::{self, EventResult};
use sprited::project_io;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Longest sleep between host-loop ticks during preview
const TICK_MS: u64 = 4;

fn init_logger(args: &Args, path_config: &PathConfig) -> Result<()> {
    // 0 (default) = warn, 1 (-v) = info, 2 (-vv) = debug, 3+ (-vvv) = trace
    let log_level = match args.verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    if let Some(log_path_opt) = &args.log_file {
        let log_path = log_path_opt
            .as_ref()
            .cloned()
            .unwrap_or_else(|| config::data_file(config::LOG_FILE, path_config));

        let file = std::fs::File::create(&log_path)
            .with_context(|| format!("Failed to create log file: {}", log_path.display()))?;

        env_logger::Builder::new()
            .filter_level(log_level)
            .format_timestamp_millis()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();

        info!("Logging to file: {} (level: {:?})", log_path.display(), log_level);
    } else {
        // Console logging (respects RUST_LOG if set)
        let default_level = match args.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .format_timestamp_millis()
            .init();
    }
    Ok(())
}

/// Drain the bus and route every event to the editor, then run deferred I/O
fn pump_events(bus: &EventBus, editor: &mut Editor) {
    loop {
        let events = bus.poll();
        if events.is_empty() {
            return;
        }
        for event in &events {
            if let Some(result) = main_events::handle_app_event(event, editor) {
                apply_deferred(result, editor);
            }
        }
    }
}

fn apply_deferred(result: EventResult, editor: &mut Editor) {
    if let Some(path) = result.load_project {
        if let Err(e) = project_io::load_project(editor, &path) {
            warn!("Load failed: {:#}", e);
        }
    }
    if let Some(path) = result.save_project {
        if let Err(e) = project_io::save_project(editor, &path) {
            warn!("Save failed: {:#}", e);
        }
    }
    if let Some(path) = result.export_frames {
        if let Err(e) = project_io::export_png_sequence(editor.frames(), &path, "frame") {
            warn!("Export failed: {:#}", e);
        }
    }
}

/// Headless preview: play for `cycles` full passes, logging every presented frame
fn run_preview(bus: &EventBus, editor: &mut Editor, cycles: u32) -> Result<usize> {
    let presented = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&presented);
    bus.subscribe::<PreviewFrameEvent, _>(move |e| {
        counter.fetch_add(1, Ordering::Relaxed);
        info!("Preview frame {}", e.index);
    });

    let period = editor.player().cycle_period_ms(editor.frames().num_frames());
    let run_for = Duration::from_millis(period * cycles as u64);
    let tick = Duration::from_millis(editor.player().delay_ms().min(TICK_MS));

    editor.play()?;
    let started = Instant::now();
    // Runs for exactly `cycles` periods after play
    while started.elapsed() < run_for {
        editor.tick();
        pump_events(bus, editor);
        std::thread::sleep(tick);
    }
    editor.stop();
    pump_events(bus, editor);

    bus.unsubscribe_all::<PreviewFrameEvent>();
    Ok(presented.load(Ordering::Relaxed))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let path_config = PathConfig::from_env_and_cli(args.config_dir.clone());
    if let Err(e) = config::ensure_dirs(&path_config) {
        eprintln!("Warning: Failed to create application directories: {}", e);
    }

    init_logger(&args, &path_config)?;
    info!("Sprited starting...");
    debug!("Command-line args: {:?}", args);

    let settings_path = config::config_file(config::SETTINGS_FILE, &path_config);
    info!("Config path: {}", settings_path.display());
    let mut settings = EditorSettings::load_or_default(&settings_path);
    if let Some((width, height)) = args.new_size {
        settings.canvas_width = width;
        settings.canvas_height = height;
    }

    let bus = EventBus::new();
    bus.subscribe::<FramesChangedEvent, _>(|e| debug!("Frames: {} (current {})", e.num_frames, e.current));
    bus.subscribe::<CanvasRefreshEvent, _>(|e| debug!("Canvas refresh {}x{}", e.0.width(), e.0.height()));
    bus.subscribe::<PlaybackStateChangedEvent, _>(|e| info!("Playing: {}", e.0));

    let mut editor = Editor::new(&settings, &bus)?;

    if let Some(project) = &args.project {
        if args.new_size.is_some() {
            warn!("--new given with a project, opening {}", project.display());
        }
        project_io::load_project(&mut editor, project)
            .with_context(|| format!("Failed to open project: {}", project.display()))?;
    }
    if let Some(fps) = args.fps {
        editor.update_fps(fps)?;
    }
    pump_events(&bus, &mut editor);

    if let Some(cycles) = args.play_cycles {
        let presented = run_preview(&bus, &mut editor, cycles)?;
        println!(
            "Previewed {} frames over {} cycle(s) at {} fps",
            presented,
            cycles,
            editor.player().fps()
        );
    }

    if let Some(dir) = &args.export_dir {
        let written = project_io::export_png_sequence(editor.frames(), dir, "frame")?;
        println!("Exported {} frames to {}", written.len(), dir.display());
    }

    if let Some(dir) = &args.save_dir {
        let manifest = project_io::save_project(&editor, dir)?;
        println!("Saved project {} to {}", manifest.id, dir.display());
    }

    Ok(())
}
