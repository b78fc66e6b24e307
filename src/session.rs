//! Game session lifecycle
//!
//! [`Session`] owns one [`GameState`] plus everything around it: the timer
//! source, the render sink, storage, tuning and the RNG. It turns fired timers
//! and player input into simulation calls, and simulation events into render
//! directives, timer restarts and persistence.
//!
//! Every session start bumps an epoch. Delayed tasks (slowdown revert, shield
//! flash) carry the epoch they were scheduled in and do nothing once a newer
//! session has started.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::error::StorageError;
use crate::highscores::{self, HighScores};
use crate::persistence::Storage;
use crate::renderer::{Directive, Glow, Handle, RenderSink, SpriteKind};
use crate::scheduler::{Fired, Scheduler, TimerHandle, TimerTask};
use crate::settings::Settings;
use crate::sim::{
    self, GameEvent, GamePhase, GameState, PowerUpKind, heading_degrees, position_on_orbit,
};
use crate::tuning::Tuning;
use crate::ui::{Button, InputEvent, Screen};

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverSummary {
    pub score: u64,
    /// Beat the stored best score
    pub new_high_score: bool,
    /// Position in the top-10 table, if it made the cut
    pub rank: Option<usize>,
}

/// Live timers of the running session
#[derive(Debug, Default)]
struct Timers {
    frame: Option<TimerHandle>,
    obstacle: Option<TimerHandle>,
    power_up: Option<TimerHandle>,
}

/// One game instance: menu, runs, game-over, high scores
pub struct Session<S: Scheduler, R: RenderSink, P: Storage> {
    scheduler: S,
    renderer: R,
    storage: P,
    tuning: Tuning,
    settings: Settings,
    state: GameState,
    rng: Pcg32,
    epoch: u64,
    /// A run was started and has not been recorded or abandoned yet
    in_run: bool,
    timers: Timers,
    last_timestamp: f64,
    screen: Screen,
    best_score: u64,
    high_scores: HighScores,
    last_summary: Option<GameOverSummary>,
}

impl<S: Scheduler, R: RenderSink, P: Storage> Session<S, R, P> {
    /// Load persisted records and show the menu
    pub fn new(scheduler: S, renderer: R, storage: P, tuning: Tuning, seed: u64) -> Self {
        let settings = Settings::load(&storage);
        let best_score = highscores::load_best_score(&storage);
        let high_scores = HighScores::load(&storage);
        let state = GameState::new(&tuning);
        let mut session = Self {
            scheduler,
            renderer,
            storage,
            tuning,
            settings,
            state,
            rng: Pcg32::seed_from_u64(seed),
            epoch: 0,
            in_run: false,
            timers: Timers::default(),
            last_timestamp: 0.0,
            screen: Screen::Menu,
            best_score,
            high_scores,
            last_summary: None,
        };
        session.renderer.apply(Directive::HighScore(best_score));
        session.show_screen(Screen::Menu);
        session
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn storage(&self) -> &P {
        &self.storage
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn last_summary(&self) -> Option<GameOverSummary> {
        self.last_summary
    }

    /// Interval of the live obstacle spawn timer
    pub fn obstacle_interval(&self) -> Option<f64> {
        self.timers
            .obstacle
            .and_then(|h| self.scheduler.interval_of(h))
    }

    /// Interval of the live power-up spawn timer
    pub fn power_up_interval(&self) -> Option<f64> {
        self.timers
            .power_up
            .and_then(|h| self.scheduler.interval_of(h))
    }

    /// Replace and persist the player preferences
    pub fn update_settings(&mut self, settings: Settings) -> Result<(), StorageError> {
        self.settings = settings;
        self.settings.save(&mut self.storage)
    }

    /// Begin a new run
    pub fn start_game(&mut self) {
        self.cancel_timers();
        self.reset_game_state();
        self.show_screen(Screen::Game);

        self.state.phase = GamePhase::Running;
        self.in_run = true;
        self.last_summary = None;
        self.last_timestamp = self.scheduler.now();
        self.render_ship();
        self.timers.frame = Some(self.scheduler.request_frame());
        self.restart_obstacle_timer();
        self.restart_power_up_timer();

        log::info!("Session {} started", self.epoch);
    }

    /// Reset the run state and clear leftover entity sprites
    ///
    /// Opens a new epoch, so delayed tasks from before the reset are dropped.
    /// During a run both spawn timers restart at the default rates.
    pub fn reset_game_state(&mut self) {
        for obstacle in &self.state.obstacles {
            self.renderer.apply(Directive::Destroy {
                handle: Handle::Obstacle(obstacle.id),
            });
        }
        for power_up in &self.state.power_ups {
            self.renderer.apply(Directive::Destroy {
                handle: Handle::PowerUp(power_up.id),
            });
        }
        let phase = self.state.phase;
        self.state = GameState::new(&self.tuning);
        self.state.phase = phase;

        self.renderer.apply(Directive::Glow {
            handle: Handle::Ship,
            glow: Glow::None,
        });
        self.renderer.apply(Directive::Score(0));

        self.epoch += 1;
        if self.in_run {
            self.restart_obstacle_timer();
            self.restart_power_up_timer();
        }
    }

    /// End the current run: stop timers, record scores, show the result
    ///
    /// Returns `None` when no run is in progress.
    pub fn game_over(&mut self) -> Option<GameOverSummary> {
        if !self.in_run {
            return None;
        }
        self.in_run = false;
        self.state.phase = GamePhase::Stopped;
        self.cancel_timers();

        let score = self.state.score;
        let new_high_score = score > self.best_score;
        if new_high_score {
            self.best_score = score;
            if let Err(e) = highscores::save_best_score(&mut self.storage, score) {
                log::warn!("Could not save best score: {e}");
            }
            self.renderer.apply(Directive::HighScore(score));
            log::info!("New high score: {score}");
        }

        let rank = self.high_scores.add_score(self.settings.display_name(), score);
        if rank.is_some() {
            if let Err(e) = self.high_scores.save(&mut self.storage) {
                log::warn!("Could not save high scores: {e}");
            }
        }

        let summary = GameOverSummary {
            score,
            new_high_score,
            rank,
        };
        self.renderer.apply(Directive::FinalScore {
            score,
            new_high_score,
        });
        self.show_screen(Screen::GameOver);
        self.last_summary = Some(summary);

        log::info!("Session {} over with score {score}", self.epoch);
        Some(summary)
    }

    /// Shift to the next orbit; ignored unless a run is in progress
    pub fn change_orbit(&mut self) -> bool {
        self.state.change_orbit()
    }

    /// Route raw player input
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        if !self.is_playing() || !event.is_orbit_shift(&self.tuning.action_key) {
            return false;
        }
        self.change_orbit()
    }

    /// Route a navigation button
    pub fn press(&mut self, button: Button) {
        match button {
            Button::Start | Button::PlayAgain => self.start_game(),
            Button::Instructions => self.show_screen(Screen::Instructions),
            Button::HighScores => self.open_high_scores(),
            Button::Menu | Button::Back | Button::BackFromScores => self.show_screen(Screen::Menu),
        }
    }

    /// Reload the table from storage and show it
    pub fn open_high_scores(&mut self) {
        self.high_scores = HighScores::load(&self.storage);
        self.renderer
            .apply(Directive::HighScoreList(self.high_scores.entries.clone()));
        self.show_screen(Screen::HighScores);
    }

    /// Show one screen, hide the rest
    ///
    /// Leaving the game screen mid-run abandons the run without recording it.
    pub fn show_screen(&mut self, screen: Screen) {
        if screen != Screen::Game && self.in_run {
            self.abandon();
        }
        for other in Screen::ALL {
            if other != screen {
                self.renderer.apply(Directive::HideScreen(other));
            }
        }
        self.renderer.apply(Directive::ShowScreen(screen));
        self.screen = screen;
    }

    fn abandon(&mut self) {
        self.in_run = false;
        self.state.phase = GamePhase::Stopped;
        self.cancel_timers();
        log::info!("Session {} abandoned at score {}", self.epoch, self.state.score);
    }

    /// Run a fired timer
    pub fn dispatch(&mut self, fired: Fired) {
        match fired.task {
            TimerTask::Frame => {
                if self.timers.frame == Some(fired.handle) {
                    self.timers.frame = None;
                }
                self.frame(fired.at);
            }
            TimerTask::SpawnObstacle => self.spawn_obstacle(),
            TimerTask::SpawnPowerUp => self.spawn_power_up(),
            TimerTask::RevertSlowdown { epoch } => self.revert_slowdown(epoch),
            TimerTask::ResetShipGlow { epoch } => {
                if epoch == self.epoch && self.is_playing() {
                    self.renderer.apply(Directive::Glow {
                        handle: Handle::Ship,
                        glow: self.resting_glow(),
                    });
                }
            }
        }
    }

    /// One game loop iteration at host time `timestamp` (ms)
    pub fn frame(&mut self, timestamp: f64) {
        if !self.is_playing() {
            return;
        }
        let dt = timestamp - self.last_timestamp;
        self.last_timestamp = timestamp;

        let report = sim::tick(&mut self.state, &self.tuning, dt);
        self.render_ship();
        for event in &report.events {
            self.apply_event(event);
        }
        if report.points > 0 {
            self.renderer.apply(Directive::Score(self.state.score));
        }

        if report.ship_destroyed() {
            self.game_over();
            return;
        }
        self.timers.frame = Some(self.scheduler.request_frame());
    }

    /// Fire every timer due up to `timestamp`, then the pending frame
    pub fn pump(&mut self, timestamp: f64) {
        while let Some(fired) = self.scheduler.poll_due(timestamp) {
            self.dispatch(fired);
        }
        self.scheduler.advance_clock(timestamp);
        if let Some(handle) = self.scheduler.take_frame() {
            self.dispatch(Fired {
                handle,
                task: TimerTask::Frame,
                at: timestamp,
            });
        }
    }

    /// Drive the session forward by `ms` at the tuning's frame cadence
    pub fn advance(&mut self, ms: f64) {
        let end = self.scheduler.now() + ms.max(0.0);
        loop {
            let next = (self.scheduler.now() + self.tuning.frame_ms).min(end);
            self.pump(next);
            if next >= end {
                break;
            }
        }
    }

    fn apply_event(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::ShieldAbsorbed { obstacle } => {
                self.renderer.apply(Directive::Destroy {
                    handle: Handle::Obstacle(obstacle),
                });
                if self.settings.reduced_motion {
                    self.renderer.apply(Directive::Glow {
                        handle: Handle::Ship,
                        glow: self.resting_glow(),
                    });
                } else {
                    self.renderer.apply(Directive::Glow {
                        handle: Handle::Ship,
                        glow: Glow::ShieldBreak,
                    });
                    self.scheduler.schedule_once(
                        self.tuning.shield_flash_ms,
                        TimerTask::ResetShipGlow { epoch: self.epoch },
                    );
                }
                log::debug!("Shield absorbed obstacle {obstacle}");
            }
            GameEvent::ShipDestroyed { obstacle } => {
                log::debug!("Ship destroyed by obstacle {obstacle}");
            }
            GameEvent::PowerUpCollected { id, kind } => {
                self.renderer.apply(Directive::Destroy {
                    handle: Handle::PowerUp(id),
                });
                if kind == PowerUpKind::Shield {
                    self.renderer.apply(Directive::Glow {
                        handle: Handle::Ship,
                        glow: Glow::Shielded,
                    });
                }
                log::debug!("Collected {} power-up {id}", kind.as_str());
            }
            GameEvent::SlowdownStarted { rate_ms } => {
                self.restart_obstacle_timer();
                self.scheduler.schedule_once(
                    self.tuning.slowdown_duration_ms,
                    TimerTask::RevertSlowdown { epoch: self.epoch },
                );
                log::debug!("Slowdown: obstacles every {rate_ms:.0} ms");
            }
            GameEvent::DifficultyIncreased { .. } => self.restart_obstacle_timer(),
        }
    }

    fn revert_slowdown(&mut self, epoch: u64) {
        if epoch != self.epoch || !self.is_playing() {
            log::debug!("Dropping stale slowdown revert from session {epoch}");
            return;
        }
        self.state.obstacle_rate_ms = (self.state.obstacle_rate_ms / self.tuning.slowdown_factor)
            .max(self.tuning.min_obstacle_rate_ms);
        self.restart_obstacle_timer();
        log::debug!(
            "Slowdown over: obstacles every {:.0} ms",
            self.state.obstacle_rate_ms
        );
    }

    fn spawn_obstacle(&mut self) {
        if !self.is_playing() {
            return;
        }
        let obstacle = sim::spawn_obstacle(&mut self.state, &mut self.rng, &self.tuning);
        let handle = Handle::Obstacle(obstacle.id);
        self.renderer.apply(Directive::Create {
            handle,
            kind: SpriteKind::Obstacle,
        });
        self.renderer.apply(Directive::Position {
            handle,
            pos: position_on_orbit(obstacle.orbit, obstacle.angle, &self.tuning),
        });
    }

    fn spawn_power_up(&mut self) {
        if !self.is_playing() {
            return;
        }
        let power_up = sim::spawn_power_up(&mut self.state, &mut self.rng, &self.tuning);
        let handle = Handle::PowerUp(power_up.id);
        self.renderer.apply(Directive::Create {
            handle,
            kind: SpriteKind::PowerUp(power_up.kind),
        });
        self.renderer.apply(Directive::Position {
            handle,
            pos: position_on_orbit(power_up.orbit, power_up.angle, &self.tuning),
        });
    }

    fn render_ship(&mut self) {
        self.renderer.apply(Directive::Position {
            handle: Handle::Ship,
            pos: position_on_orbit(self.state.orbit, self.state.ship_angle, &self.tuning),
        });
        self.renderer.apply(Directive::Rotate {
            handle: Handle::Ship,
            degrees: heading_degrees(self.state.ship_angle),
        });
    }

    fn resting_glow(&self) -> Glow {
        if self.state.has_shield {
            Glow::Shielded
        } else {
            Glow::None
        }
    }

    fn restart_obstacle_timer(&mut self) {
        if let Some(handle) = self.timers.obstacle.take() {
            self.scheduler.cancel(handle);
        }
        self.timers.obstacle = Some(
            self.scheduler
                .schedule_repeating(self.state.obstacle_rate_ms, TimerTask::SpawnObstacle),
        );
        log::debug!(
            "Obstacle timer restarted at {:.0} ms",
            self.state.obstacle_rate_ms
        );
    }

    fn restart_power_up_timer(&mut self) {
        if let Some(handle) = self.timers.power_up.take() {
            self.scheduler.cancel(handle);
        }
        self.timers.power_up = Some(
            self.scheduler
                .schedule_repeating(self.state.power_up_rate_ms, TimerTask::SpawnPowerUp),
        );
    }

    fn cancel_timers(&mut self) {
        let Timers {
            frame,
            obstacle,
            power_up,
        } = std::mem::take(&mut self.timers);
        for handle in [frame, obstacle, power_up].into_iter().flatten() {
            self.scheduler.cancel(handle);
        }
    }
}
