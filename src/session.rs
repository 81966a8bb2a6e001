//! Game session
//!
//! Owns the physics world, the entity registry and the lifecycle state, and
//! is the single entry point the platform layer drives: one `advance` call
//! per rendered frame, pointer events through `InputConsumer`, and menu
//! commands through `handle_command`.

use glam::Vec2;

use crate::audio::{AudioSink, SoundEffect};
use crate::box_to_stage_rect;
use crate::config::{ConfigError, GameConfig};
use crate::consts::*;
use crate::input::{GameplayCommand, InputConsumer, InputMapper, MenuLayout, PointerOutcome};
use crate::platform::{Node, NodeId, Presenter, Rect, StretchViewport, Viewport};
use crate::services::GameServices;
use crate::settings::Settings;
use crate::sim::{
    BodyDef, BodyType, CollisionObserver, Contact, DifficultyController, DifficultyTier,
    EnemySpawner, EntityKind, EntityRegistry, FixedStepDriver, GameState, GameplayEvent,
    MenuCommand, PhysicsWorld, Role, Runner, Score, SessionSummary, Transition, classify,
    dispatch_contact, scan_bounds,
};

/// Lifecycle state shared by every part of the session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionContext {
    pub state: GameState,
    /// Running time of the current session in seconds (paused time excluded)
    pub elapsed: f32,
    /// The first-run tutorial has been shown in this process
    pub tutorial_shown: bool,
}

/// The runner game core
pub struct GameSession<S: GameServices, P: Presenter, A: AudioSink> {
    config: GameConfig,
    ctx: SessionContext,
    world: PhysicsWorld,
    registry: EntityRegistry,
    runner: Option<Runner>,
    spawner: EnemySpawner,
    difficulty: DifficultyController,
    score: Score,
    driver: FixedStepDriver,
    viewport: StretchViewport,
    layout: MenuLayout,
    input: InputMapper,
    settings: Settings,
    /// Main-menu buttons currently shown
    menu_nodes: Vec<NodeId>,
    pause_button: Option<NodeId>,
    paused_label: Option<NodeId>,
    last_summary: Option<SessionSummary>,
    services: S,
    presenter: P,
    audio: A,
}

impl<S: GameServices, P: Presenter, A: AudioSink> GameSession<S, P, A> {
    /// Validate the config and bring up the pre-game menu
    pub fn new(config: GameConfig, services: S, presenter: P, audio: A) -> Result<Self, ConfigError> {
        config.validate()?;

        let difficulty = DifficultyController::new(
            config.difficulty.tiers.clone(),
            config.difficulty.scale,
            config.difficulty.reset_scale_each_check,
        );
        let score = Score::new(difficulty.tier().score_multiplier);

        let viewport = StretchViewport::new(config.viewport.layout, config.viewport.screen);

        let mut session = Self {
            ctx: SessionContext::default(),
            world: PhysicsWorld::new(config.physics.gravity),
            registry: EntityRegistry::new(),
            runner: None,
            spawner: EnemySpawner::new(config.seed),
            difficulty,
            score,
            driver: FixedStepDriver::new(&config.physics),
            layout: MenuLayout::new(viewport.layout_size()),
            viewport,
            input: InputMapper::new(),
            settings: config.settings.clone(),
            menu_nodes: Vec::new(),
            pause_button: None,
            paused_label: None,
            last_summary: None,
            config,
            services,
            presenter,
            audio,
        };

        session.build_base_world();
        session.add_node(Node::GameLabel, session.layout.game_label);

        session.audio.init();
        session.audio.set_sound_enabled(session.settings.sound_enabled);
        session.audio.set_music_enabled(session.settings.music_enabled);
        session.push_volumes();

        session.enter_over();
        log::info!(
            "Session ready ({} difficulty tiers, seed {})",
            session.difficulty.table().len(),
            session.config.seed
        );
        Ok(session)
    }

    pub fn state(&self) -> GameState {
        self.ctx.state
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    /// Running time of the current session
    pub fn elapsed(&self) -> f32 {
        self.ctx.elapsed
    }

    pub fn runner(&self) -> Option<&Runner> {
        self.runner.as_ref()
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn difficulty(&self) -> &DifficultyController {
        &self.difficulty
    }

    /// Scale adjustments go through here
    pub fn difficulty_mut(&mut self) -> &mut DifficultyController {
        &mut self.difficulty
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn layout(&self) -> &MenuLayout {
        &self.layout
    }

    /// Statistics of the last finished run
    pub fn last_summary(&self) -> Option<&SessionSummary> {
        self.last_summary.as_ref()
    }

    pub fn services(&self) -> &S {
        &self.services
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Screen size changed; layout coordinates stay fixed
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.viewport.resize(width, height);
        }
    }

    /// Per-frame entry point
    pub fn advance(&mut self, frame_delta: f32) {
        if !self.ctx.state.simulates() {
            return;
        }

        // Wall time counts in full; only the physics catch-up is capped
        let delta = frame_delta.max(0.0);

        if self.ctx.state.is_running() {
            self.score.accrue(delta);
            self.ctx.elapsed += delta;
            if let Some(tier) = self.difficulty.tick(self.ctx.elapsed).cloned() {
                self.apply_tier(&tier);
            }
        }

        let steps = self.driver.consume(delta);
        for _ in 0..steps {
            self.driver.step(&mut self.world);
            self.dispatch_contacts();
        }

        self.recycle_out_of_bounds();
    }

    fn push_volumes(&mut self) {
        self.audio.set_volumes(
            self.settings.effective_sfx_volume(),
            self.settings.effective_music_volume(),
        );
    }

    /// Single handler for every menu command
    pub fn handle_command(&mut self, command: MenuCommand) {
        match command {
            MenuCommand::ToggleSound => {
                let enabled = self.settings.toggle_sound();
                self.audio.set_sound_enabled(enabled);
                self.push_volumes();
                log::info!("Sound {}", if enabled { "on" } else { "off" });
            }
            MenuCommand::ToggleMusic => {
                let enabled = self.settings.toggle_music();
                self.audio.set_music_enabled(enabled);
                self.push_volumes();
                log::info!("Music {}", if enabled { "on" } else { "off" });
            }
            MenuCommand::Leaderboard => self.services.display_leaderboard(),
            MenuCommand::Achievements => self.services.display_achievements(),
            MenuCommand::Share => self.services.share(),
            _ => match self.ctx.state.transition_for(command) {
                Some(transition) => self.apply_transition(transition),
                None => log::warn!("Ignoring {:?} in state {:?}", command, self.ctx.state),
            },
        }
    }

    fn apply_transition(&mut self, transition: Transition) {
        let from = self.ctx.state;
        match transition {
            Transition::Start => self.start(),
            Transition::Pause => {
                self.ctx.state = GameState::Paused;
                if self.paused_label.is_none() {
                    self.paused_label = Some(self.add_node(Node::PausedLabel, self.layout.paused_label));
                }
            }
            Transition::Resume => {
                if let Some(id) = self.paused_label.take() {
                    self.presenter.remove_node(id);
                }
                self.ctx.state = GameState::Running;
            }
            Transition::GameOver => self.enter_over(),
            Transition::About => self.show_about(),
            Transition::GiveUp => {
                self.reset_scene();
                self.add_node(Node::GameLabel, self.layout.game_label);
                self.enter_over();
            }
        }
        log::info!("{:?} -> {:?}", from, transition.target());
    }

    /// Fresh world, runner and one enemy
    fn start(&mut self) {
        self.reset_scene();
        self.input.reset();
        self.driver.reset();

        self.difficulty.reset();
        self.ctx.elapsed = 0.0;
        let base = self.difficulty.tier().clone();
        self.score = Score::new(base.score_multiplier);
        self.last_summary = None;

        let runner = Runner::spawn(&mut self.world, &base);
        let rect = box_to_stage_rect(Vec2::new(RUNNER_X, RUNNER_Y), Runner::standing_half_extents());
        let node = self.presenter.add_node(Node::Runner, rect);
        self.registry.insert(runner.body, EntityKind::Runner, Some(node));
        self.runner = Some(runner);

        self.spawner
            .spawn_enemy(&base, &mut self.world, &mut self.registry, &mut self.presenter);
        self.pause_button = Some(self.add_node(Node::PauseButton, self.layout.pause));

        if !self.ctx.tutorial_shown {
            self.add_node(Node::TutorialLeft, self.layout.tutorial_left);
            self.add_node(Node::TutorialRight, self.layout.tutorial_right);
            self.ctx.tutorial_shown = true;
        }

        self.ctx.state = GameState::Running;
    }

    /// Main menu over whatever is on screen
    fn enter_over(&mut self) {
        self.ctx.state = GameState::Over;
        self.difficulty.reset();
        self.ctx.elapsed = 0.0;
        self.input.reset();

        for id in [self.pause_button.take(), self.paused_label.take()]
            .into_iter()
            .flatten()
        {
            self.presenter.remove_node(id);
        }

        if self.menu_nodes.is_empty() {
            for (node, rect) in [
                (Node::StartButton, self.layout.start),
                (Node::LeaderboardButton, self.layout.leaderboard),
                (Node::AboutButton, self.layout.about),
                (Node::ShareButton, self.layout.share),
                (Node::AchievementsButton, self.layout.achievements),
            ] {
                let id = self.add_node(node, rect);
                self.menu_nodes.push(id);
            }
        }
    }

    fn show_about(&mut self) {
        self.reset_scene();
        self.add_node(Node::GameLabel, self.layout.game_label);
        self.add_node(Node::AboutLabel, self.layout.about_label);
        self.add_node(Node::AboutButton, self.layout.about);
        self.ctx.state = GameState::About;
    }

    /// Drop every entity and node, then rebuild the static scene
    fn reset_scene(&mut self) {
        self.presenter.clear();
        self.registry.clear();
        self.world = PhysicsWorld::new(self.config.physics.gravity);
        self.runner = None;
        self.menu_nodes.clear();
        self.pause_button = None;
        self.paused_label = None;
        self.build_base_world();
    }

    /// Background, ground and the always-visible controls
    fn build_base_world(&mut self) {
        let full = Rect::new(0.0, 0.0, self.layout.size.x, self.layout.size.y);
        self.add_node(Node::Background, full);

        let ground_pos = Vec2::new(GROUND_X, GROUND_Y);
        let ground_half = Vec2::new(GROUND_WIDTH, GROUND_HEIGHT) / 2.0;
        let ground = self.world.create_body(BodyDef::new(
            BodyType::Static,
            Role::Ground,
            ground_pos,
            ground_half,
        ));
        let node = self
            .presenter
            .add_node(Node::Ground, box_to_stage_rect(ground_pos, ground_half));
        self.registry.insert(ground, EntityKind::Ground, Some(node));

        if self.config.world.ceiling {
            let ceiling = self.world.create_body(BodyDef::new(
                BodyType::Static,
                Role::Boundary,
                Vec2::new(GROUND_X, CEILING_Y),
                Vec2::new(GROUND_WIDTH, CEILING_HEIGHT) / 2.0,
            ));
            self.registry.insert(ceiling, EntityKind::Boundary, None);
        }

        self.add_node(Node::SoundButton, self.layout.sound);
        self.add_node(Node::MusicButton, self.layout.music);
        self.add_node(Node::Score, self.layout.score);
    }

    fn add_node(&mut self, node: Node, rect: Rect) -> NodeId {
        self.presenter.add_node(node, rect)
    }

    fn dispatch_contacts(&mut self) {
        for event in self.world.drain_events() {
            dispatch_contact(self, &event);
        }
    }

    /// New tier: faster enemies from now on, new multiplier and runner tuning
    fn apply_tier(&mut self, tier: &DifficultyTier) {
        self.score.set_multiplier(tier.score_multiplier);
        if let Some(runner) = self.runner.as_mut() {
            runner.on_difficulty_change(&mut self.world, tier);
        }
    }

    /// Remove bodies that left the world, replacing enemies while the runner is alive
    fn recycle_out_of_bounds(&mut self) {
        let gone = scan_bounds(&self.world);
        if gone.is_empty() {
            return;
        }

        for (id, role) in gone {
            let runner_alive = self.runner.as_ref().is_some_and(|r| !r.is_hit());
            if role == Role::Enemy && runner_alive {
                let tier = self.difficulty.tier().clone();
                self.spawner
                    .spawn_enemy(&tier, &mut self.world, &mut self.registry, &mut self.presenter);
            }

            self.registry.despawn(id, &mut self.world, &mut self.presenter);
            if self.runner.as_ref().is_some_and(|r| r.body == id) {
                self.runner = None;
            }
        }

        // End notifications from the removals
        self.dispatch_contacts();
    }

    fn on_runner_hit(&mut self) {
        let Some(transition) = self.ctx.state.on_runner_hit() else {
            log::debug!("Runner contact ignored in state {:?}", self.ctx.state);
            return;
        };
        let Some(runner) = self.runner.as_mut() else {
            return;
        };

        runner.hit(&mut self.world);
        let counts = runner.counts();
        self.play(SoundEffect::Hit);

        let summary = SessionSummary {
            score: self.score.score(),
            multiplier: self.score.multiplier(),
            jumps: counts.jumps,
            double_jumps: counts.double_jumps,
            power_stomps: counts.power_stomps,
            difficulty_level: self.difficulty.level(),
            difficulty_scale: self.difficulty.scale(),
        };
        self.services.submit_score(&summary);

        self.apply_transition(transition);

        self.services.add_game_played();
        self.services.add_jump_count(summary.jumps);
        self.services.add_double_jump_count(summary.double_jumps);
        self.services.add_power_stomp_count(summary.power_stomps);

        log::info!(
            "Game over: score {} (x{}), level {}, {} jumps, {} double jumps, {} stomps",
            summary.score,
            summary.multiplier,
            summary.difficulty_level,
            summary.jumps,
            summary.double_jumps,
            summary.power_stomps
        );
        self.last_summary = Some(summary);
    }

    fn apply_gameplay(&mut self, command: GameplayCommand) {
        let Some(runner) = self.runner.as_mut() else {
            return;
        };
        let before = runner.counts();

        match command {
            GameplayCommand::Jump => runner.jump(&mut self.world),
            GameplayCommand::Dodge => runner.dodge(&mut self.world),
            GameplayCommand::DodgeRelease => runner.stop_dodge(&mut self.world),
        }

        let after = runner.counts();
        if after.jumps > before.jumps {
            self.play(SoundEffect::Jump);
        } else if after.double_jumps > before.double_jumps {
            self.play(SoundEffect::DoubleJump);
        } else if after.power_stomps > before.power_stomps {
            self.play(SoundEffect::PowerStomp);
        }
    }

    fn play(&mut self, effect: SoundEffect) {
        if self.settings.sound_enabled {
            self.audio.play(effect);
        }
    }
}

impl<S: GameServices, P: Presenter, A: AudioSink> CollisionObserver for GameSession<S, P, A> {
    fn begin_contact(&mut self, contact: &Contact) {
        match classify(contact, self.runner.as_ref()) {
            Some(GameplayEvent::RunnerHit) => self.on_runner_hit(),
            Some(GameplayEvent::RunnerLanded) => {
                if let Some(runner) = self.runner.as_mut() {
                    runner.landed();
                }
            }
            None => {}
        }
    }

    fn end_contact(&mut self, _contact: &Contact) {}

    fn pre_solve(&mut self, _contact: &Contact) {}

    fn post_solve(&mut self, _contact: &Contact) {}
}

impl<S: GameServices, P: Presenter, A: AudioSink> InputConsumer for GameSession<S, P, A> {
    fn pointer_down(&mut self, x: i32, y: i32, pointer: u32, _button: u32) -> bool {
        let outcome = self.input.pointer_down(
            Vec2::new(x as f32, y as f32),
            pointer,
            self.ctx.state,
            &self.viewport,
            &self.layout,
        );
        match outcome {
            PointerOutcome::Menu(control) => {
                self.handle_command(control.command(self.ctx.state));
                true
            }
            PointerOutcome::Gameplay(command) => {
                self.apply_gameplay(command);
                true
            }
            PointerOutcome::Ignored => false,
        }
    }

    fn pointer_up(&mut self, _x: i32, _y: i32, pointer: u32, _button: u32) -> bool {
        match self.input.pointer_up(pointer, self.ctx.state) {
            PointerOutcome::Gameplay(command) => {
                self.apply_gameplay(command);
                true
            }
            _ => false,
        }
    }
}
