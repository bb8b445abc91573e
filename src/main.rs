//! GLOOMWALK runtime shell
//!
//! Opens the window, loads settings, sprites and sounds, then drives the
//! session manager at a fixed 60 Hz and presents each frame.

use macroquad::prelude::*;
use tracing::{error, info, warn};
use gloomwalk::audio::SoundBank;
use gloomwalk::config::{settings_path, Settings};
use gloomwalk::game::{draw_framebuffer, draw_hud, render_game, SessionManager, DEFAULT_ENTRY, TICK};
use gloomwalk::input::{Gamepad, InputState};
use gloomwalk::rasterizer::{Framebuffer, SpriteAtlas, HEIGHT, WIDTH};
use gloomwalk::storage::SaveSlot;
use gloomwalk::telemetry::init_logging;
use gloomwalk::world::DirectorySource;
use gloomwalk::VERSION;

/// Longest frame the accumulator will catch up on
const MAX_FRAME_TIME: f32 = 0.25;

fn window_conf() -> Conf {
    // Logging is not up yet; a bad file is reported again from main
    let scale = Settings::load(&settings_path())
        .map(|s| s.window_scale)
        .unwrap_or(2)
        .max(1) as i32;
    Conf {
        window_title: format!("GLOOMWALK v{}", VERSION),
        window_width: WIDTH as i32 * scale,
        window_height: HEIGHT as i32 * scale,
        window_resizable: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    init_logging();

    let path = settings_path();
    let settings = match Settings::load(&path) {
        Ok(s) => s,
        Err(e) => {
            error!(path = %path.display(), error = %e, "bad settings file");
            std::process::exit(1);
        }
    };
    info!(version = VERSION, start_level = %settings.start_level, "starting");

    let mut sessions = SessionManager::new(
        DirectorySource::new(&settings.levels_dir),
        settings.start_level.clone(),
        settings.seed,
    );
    if let Err(e) = sessions.load_level(None, DEFAULT_ENTRY) {
        error!(level = %settings.start_level, error = %e, "failed to load start level");
        std::process::exit(1);
    }
    if sessions.active().is_none() {
        error!(level = %settings.start_level, "start level has no default entry");
        std::process::exit(1);
    }

    let (save_dir, save_file) = settings.save_location();
    let save_slot = SaveSlot::new(save_dir, save_file);
    let stale = match save_slot.load() {
        Ok(Some(snapshot)) => !sessions.restore(&snapshot),
        Ok(None) => false,
        Err(e) => {
            warn!(error = %e, "could not read save, starting fresh");
            true
        }
    };
    if stale {
        if let Err(e) = save_slot.clear() {
            warn!(error = %e, "could not remove stale save");
        }
    }

    let atlas = SpriteAtlas::load_dir(&settings.sprites_dir);
    let sounds = SoundBank::load(&settings.sounds_dir).await;
    let mut gamepad = Gamepad::new();
    let mut fb = Framebuffer::new(WIDTH, HEIGHT);

    let mut paused = false;
    let mut accumulator = 0.0f32;
    let mut since_save = 0.0f32;

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        if is_key_pressed(KeyCode::P) {
            paused = !paused;
            info!(paused, "pause toggled");
        }

        let input = InputState::poll(&mut gamepad);
        let frame_time = get_frame_time().min(MAX_FRAME_TIME);
        accumulator += frame_time;
        while accumulator >= TICK {
            accumulator -= TICK;
            if paused {
                continue;
            }
            match sessions.tick(&input, TICK) {
                Ok(cues) => {
                    for cue in &cues {
                        sounds.play(cue);
                    }
                }
                Err(e) => error!(error = %e, "level change failed, staying put"),
            }
        }

        since_save += frame_time;
        if since_save >= settings.persist_interval {
            since_save = 0.0;
            if let Some(snapshot) = sessions.snapshot() {
                if let Err(e) = save_slot.save(&snapshot) {
                    warn!(error = %e, "failed to save player");
                }
            }
        }

        if let Some(game) = sessions.active_mut() {
            render_game(game, &mut fb, &atlas, settings.max_ray_distance);
            draw_framebuffer(&fb);
            draw_hud(game, paused);
        } else {
            clear_background(BLACK);
        }

        next_frame().await;
    }

    if let Some(snapshot) = sessions.snapshot() {
        if let Err(e) = save_slot.save(&snapshot) {
            warn!(error = %e, "failed to save player on exit");
        }
    }
    info!("bye");
}
