use clap::Parser;
use std::path::PathBuf;

use typing_cat::animator::Animator;
use typing_cat::config::Config;
use typing_cat::event_loop;
use typing_cat::pad::TypingPad;
use typing_cat::sprites::SpriteSet;
use typing_cat::terminal::TerminalGuard;

/// typing-cat: an ASCII cat overlay that reacts to your typing
#[derive(Parser)]
#[command(name = "typing-cat")]
#[command(version, about = "ASCII cat overlay that reacts to your typing")]
#[command(long_about = "Hosts a scratch typing surface and draws a transient \
    ASCII cat above the cursor: paws alternate while you type, the cat settles \
    and hides when you stop, and a sustained rapid streak earns a burst effect. \
    Alt+C toggles the cat, Esc quits.")]
struct Args {
    /// Path to config file (default: ~/.config/typing-cat/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start with the cat disabled (Alt+C re-enables it)
    #[arg(long)]
    disabled: bool,

    /// Override the rapid-streak threshold that triggers the burst effect
    #[arg(long)]
    burst_threshold: Option<u32>,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let args = Args::parse();

    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Merge settings: CLI args > config file > built-in defaults
    let mut animation = config.animation;
    if let Some(threshold) = args.burst_threshold {
        animation.burst_threshold = threshold;
    }
    let timings = match animation.timings() {
        Ok(timings) => timings,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let enabled = config.cat.enabled && !args.disabled;

    let mut guard = match TerminalGuard::enter() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: failed to set up terminal: {}", e);
            std::process::exit(1);
        }
    };

    let (cols, rows) = crossterm::terminal::size().unwrap_or((80, 24));
    let mut pad = TypingPad::new(cols, rows);
    let mut animator = Animator::new(timings);
    let sprites = SpriteSet::builtin();

    log::info!("typing-cat started ({}x{} cells)", cols, rows);

    let result = event_loop::run(&mut animator, &sprites, &mut pad, enabled).await;

    if let Err(e) = guard.restore() {
        log::warn!("failed to restore terminal: {}", e);
    }

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
