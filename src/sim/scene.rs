//! Game scene controller
//!
//! Owns the physics world, the ball, the obstacle spawner and the round
//! clock, and drives them from a fixed-timestep `update`. Touch and
//! accelerometer events arrive through dedicated handlers; round outcomes
//! leave through an [`OutcomeReporter`].

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::clock::{ClockEvent, GameClock};
use super::input::{AccelSample, TiltInput};
use super::physics::{BodyDesc, BodyId, Contact, EntityKind, PhysicsWorld, Shape};
use super::spawner::ObstacleSpawner;
use super::star::star_polygon;
use super::state::{GamePhase, Outcome, Session, StartButton};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::settings::Settings;

/// Receives the outcome of each finished round
pub trait OutcomeReporter {
    fn round_ended(&mut self, outcome: Outcome);
}

impl<F: FnMut(Outcome)> OutcomeReporter for F {
    fn round_ended(&mut self, outcome: Outcome) {
        self(outcome)
    }
}

pub struct Scene {
    settings: Settings,
    world: PhysicsWorld,
    ball: BodyId,
    spawner: ObstacleSpawner,
    clock: GameClock,
    input: TiltInput,
    rng: Pcg32,
    reporter: Box<dyn OutcomeReporter>,
    session: Session,
    phase: GamePhase,
    button: StartButton,
    time_label: Option<String>,
    accumulator: f32,
}

impl Scene {
    /// Build the scene; the ball exists from here on but stays out of play
    /// until a round starts
    pub fn new(settings: Settings, reporter: Box<dyn OutcomeReporter>) -> Self {
        let size = settings.scene_size();
        let mut world = PhysicsWorld::new(settings.gravity);
        world.set_edge_loop(Vec2::ZERO, size, settings.edge_loop);

        let ball = world.register(
            BodyDesc::new(
                EntityKind::Ball,
                Shape::Circle {
                    radius: settings.ball_radius,
                },
                size * 0.5,
            )
            .with_gravity(true)
            .with_velocity(Vec2::new(0.0, -settings.ball_fall_speed)),
        );
        world.set_enabled(ball, false);

        Self {
            spawner: ObstacleSpawner::new(&settings),
            clock: GameClock::new(settings.clock_interval, settings.win_seconds),
            input: TiltInput::new(settings.tilt_sensitivity),
            rng: Pcg32::seed_from_u64(settings.seed),
            button: StartButton::new(size * 0.5),
            world,
            ball,
            reporter,
            session: Session::default(),
            phase: GamePhase::Idle,
            time_label: None,
            accumulator: 0.0,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn elapsed(&self) -> u32 {
        self.clock.elapsed
    }

    pub fn button(&self) -> &StartButton {
        &self.button
    }

    pub fn time_label(&self) -> Option<&str> {
        self.time_label.as_deref()
    }

    pub fn ball(&self) -> BodyId {
        self.ball
    }

    pub fn ball_position(&self) -> Vec2 {
        self.world
            .get(self.ball)
            .map(|b| b.pos)
            .unwrap_or(self.settings.scene_size() * 0.5)
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    pub fn spawner(&self) -> &ObstacleSpawner {
        &self.spawner
    }

    /// Scene became visible; arms a round unless one is already armed or running
    pub fn present(&mut self) {
        if self.session.armed {
            self.session.paused = false;
            return;
        }
        self.spawner.arm_first_strip();
        self.session.paused = true;
        self.world
            .set_position(self.ball, self.settings.scene_size() * 0.5);
        self.button.show();
        self.session.armed = true;
        self.phase = GamePhase::Idle;
    }

    /// Scene went away; freeze everything
    pub fn dismiss(&mut self) {
        self.session.paused = true;
    }

    pub fn touch_down(&mut self, point: Vec2) {
        if self.button.visible && self.button.contains(point) {
            self.button.press();
        }
    }

    pub fn touch_up(&mut self, point: Vec2) {
        if !self.button.visible {
            return;
        }
        if self.button.contains(point) {
            self.start_round();
        } else {
            self.button.release();
        }
    }

    pub fn on_accelerometer(&mut self, sample: AccelSample) {
        let vx = self.input.horizontal_velocity(sample);
        if let Some(ball) = self.world.get_mut(self.ball) {
            ball.vel.x = vx;
        }
    }

    /// Advance by a frame delta, running whole fixed ticks
    pub fn update(&mut self, dt: f32) {
        if self.session.paused {
            return;
        }
        self.accumulator += dt.min(0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.tick();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
    }

    /// One fixed simulation step
    pub fn tick(&mut self) {
        if self.session.paused || !self.session.started {
            return;
        }

        self.spawner.tick(&mut self.world, &mut self.rng);

        match self.clock.tick() {
            ClockEvent::Idle => {}
            ClockEvent::Second(elapsed) => {
                self.session.elapsed = elapsed;
                self.time_label = Some(elapsed.to_string());
            }
            ClockEvent::Won(elapsed) => {
                self.session.elapsed = elapsed;
                self.end_round(Outcome::Win);
                return;
            }
        }

        let contacts = self.world.step(SIM_DT);
        self.dispatch(&contacts);
    }

    /// Tear the round down and report it; repeated calls are ignored
    pub fn end_round(&mut self, outcome: Outcome) {
        if self.phase != GamePhase::Running {
            return;
        }

        self.spawner.clear(&mut self.world);
        self.world.remove_kind(EntityKind::FloorStar);
        self.world.set_enabled(self.ball, false);
        self.clock.stop();
        self.session = Session {
            paused: true,
            ..Session::default()
        };
        self.time_label = None;
        self.accumulator = 0.0;
        self.phase = GamePhase::Ended(outcome);

        log::info!("Round ended: {:?}", outcome);
        self.reporter.round_ended(outcome);
    }

    fn start_round(&mut self) {
        self.session = Session::running();
        self.phase = GamePhase::Running;
        self.accumulator = 0.0;

        self.world.set_enabled(self.ball, true);
        self.spawn_floor_stars();
        self.spawner.start(&mut self.world, &mut self.rng);
        self.clock.start();
        self.time_label = Some("0".to_string());
        self.button.hide();

        log::info!("Round started");
    }

    fn spawn_floor_stars(&mut self) {
        let s = &self.settings;
        let count = (s.scene_width / s.star_size) as u32;
        if count == 0 {
            return;
        }
        let spacing = s.scene_width / count as f32;
        let shape = star_polygon(s.star_size, s.floor_star_spikes);
        let y = s.scene_height - shape.extent().y * 0.5 - s.safe_area_top;

        for i in 0..count {
            let x = i as f32 * spacing + spacing * 0.5;
            self.world.register(BodyDesc::new(
                EntityKind::FloorStar,
                Shape::Polygon(shape.clone()),
                Vec2::new(x, y),
            ));
        }
    }

    fn dispatch(&mut self, contacts: &[Contact]) {
        use EntityKind::*;

        for contact in contacts {
            if self.phase != GamePhase::Running {
                break;
            }
            log::debug!("Contact {:?} / {:?}", contact.a_kind, contact.b_kind);

            if let Some((strip, _)) = contact.matching(Strip, FloorStar) {
                self.world.remove(strip);
            } else if contact.matching(Ball, FloorStar).is_some()
                || contact.matching(Ball, MountedStar).is_some()
            {
                self.end_round(Outcome::Loss);
            } else if let Some((_, star)) = contact.matching(FloorStar, MountedStar) {
                self.world.remove(star);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::physics::EdgeLoop;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn scene_with_log(settings: Settings) -> (Scene, Rc<RefCell<Vec<Outcome>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let scene = Scene::new(
            settings,
            Box::new(move |outcome: Outcome| sink.borrow_mut().push(outcome)),
        );
        (scene, log)
    }

    fn mounted_star_at(scene: &mut Scene, pos: Vec2) -> BodyId {
        let shape = star_polygon(40.0, 8).rotated(std::f32::consts::PI);
        scene
            .world_mut()
            .register(BodyDesc::new(EntityKind::MountedStar, Shape::Polygon(shape), pos))
    }

    fn floor_star_position(scene: &Scene) -> Vec2 {
        scene
            .world()
            .bodies()
            .find(|b| b.kind == EntityKind::FloorStar)
            .map(|b| b.pos)
            .unwrap()
    }

    fn start(scene: &mut Scene) {
        scene.present();
        let center = scene.button().center;
        scene.touch_down(center);
        scene.touch_up(center);
    }

    #[test]
    fn test_present_arms_round() {
        let (mut scene, _) = scene_with_log(Settings::default());
        scene.present();
        assert!(scene.button().visible);
        assert!(scene.session().paused);
        assert!(scene.session().armed);
        assert_eq!(scene.phase(), GamePhase::Idle);
        assert_eq!(scene.ball_position(), Vec2::new(195.0, 422.0));
    }

    #[test]
    fn test_touch_feedback_and_release_off_button() {
        let (mut scene, _) = scene_with_log(Settings::default());
        scene.present();
        let center = scene.button().center;
        scene.touch_down(center);
        assert_eq!(scene.button().scale, 0.9);
        assert_eq!(scene.button().alpha, 0.8);

        scene.touch_up(Vec2::new(10.0, 10.0));
        assert_eq!(scene.button().scale, 1.0);
        assert_eq!(scene.phase(), GamePhase::Idle);
    }

    #[test]
    fn test_start_populates_scene() {
        let (mut scene, _) = scene_with_log(Settings::default());
        start(&mut scene);
        assert_eq!(scene.phase(), GamePhase::Running);
        assert!(!scene.button().visible);
        assert!(!scene.session().paused);
        assert_eq!(scene.time_label(), Some("0"));
        // 390 / 40 floor stars
        assert_eq!(scene.world().count_kind(EntityKind::FloorStar), 9);
        assert_eq!(scene.world().count_kind(EntityKind::Strip), 2);
        assert_eq!(scene.world().count_kind(EntityKind::MountedStar), 0);
    }

    #[test]
    fn test_floor_stars_evenly_spaced_below_top() {
        let (mut scene, _) = scene_with_log(Settings::default());
        start(&mut scene);
        let xs: Vec<f32> = scene
            .world()
            .bodies()
            .filter(|b| b.kind == EntityKind::FloorStar)
            .map(|b| b.pos.x)
            .collect();
        let spacing = 390.0 / 9.0;
        assert!((xs[0] - spacing / 2.0).abs() < 1e-3);
        assert!((xs[8] - (8.0 * spacing + spacing / 2.0)).abs() < 1e-3);
        let y = scene
            .world()
            .bodies()
            .find(|b| b.kind == EntityKind::FloorStar)
            .map(|b| b.pos.y)
            .unwrap();
        assert!((y - 824.0).abs() < 1e-3);
    }

    #[test]
    fn test_accelerometer_sets_only_horizontal_velocity() {
        let (mut scene, _) = scene_with_log(Settings::default());
        scene.on_accelerometer(AccelSample::tilt(0.4));
        let vel = scene.world().get(scene.ball()).unwrap().vel;
        assert_eq!(vel, Vec2::new(300.0, -1000.0));
    }

    #[test]
    fn test_pause_freezes_clock_and_strips() {
        let (mut scene, _) = scene_with_log(Settings::default());
        start(&mut scene);
        for _ in 0..150 {
            scene.update(SIM_DT);
        }
        assert_eq!(scene.elapsed(), 1);
        let strip_y = scene.spawner().pairs()[0].strip_y();

        scene.dismiss();
        for _ in 0..500 {
            scene.update(SIM_DT);
        }
        assert_eq!(scene.elapsed(), 1);
        assert_eq!(scene.spawner().pairs()[0].strip_y(), strip_y);

        // Re-presenting an in-progress round only unpauses
        scene.present();
        assert_eq!(scene.phase(), GamePhase::Running);
        for _ in 0..50 {
            scene.update(SIM_DT);
        }
        assert_eq!(scene.elapsed(), 2);
    }

    #[test]
    fn test_win_after_thirty_seconds() {
        let (mut scene, log) = scene_with_log(Settings::default());
        start(&mut scene);
        for _ in 0..2999 {
            scene.tick();
        }
        assert_eq!(scene.elapsed(), 29);
        assert!(log.borrow().is_empty());
        scene.tick();
        assert_eq!(*log.borrow(), vec![Outcome::Win]);
        assert_eq!(scene.phase(), GamePhase::Ended(Outcome::Win));
        assert_eq!(scene.elapsed(), 0);
        assert!(scene.session().paused);
        assert!(!scene.session().armed);
    }

    #[test]
    fn test_ball_star_contact_is_loss() {
        let (mut scene, log) = scene_with_log(Settings::default());
        start(&mut scene);
        let star_pos = floor_star_position(&scene);
        let ball = scene.ball();
        scene.world_mut().set_position(ball, star_pos);
        scene.world_mut().set_velocity(ball, 0.0, 0.0);
        scene.tick();
        assert_eq!(*log.borrow(), vec![Outcome::Loss]);
        assert_eq!(scene.world().count_kind(EntityKind::FloorStar), 0);
        assert_eq!(scene.world().count_kind(EntityKind::Strip), 0);
        assert!(scene.world().contains(ball));
    }

    #[test]
    fn test_ball_falls_freely_by_default() {
        let (mut scene, _) = scene_with_log(Settings::default());
        start(&mut scene);
        for _ in 0..200 {
            scene.tick();
        }
        assert!(scene.ball_position().y < 0.0);
        assert!(scene.session().started);
    }

    #[test]
    fn test_full_edge_loop_rests_ball_on_floor() {
        let settings = Settings {
            edge_loop: EdgeLoop::Full,
            ..Settings::default()
        };
        let (mut scene, _) = scene_with_log(settings);
        start(&mut scene);
        for _ in 0..200 {
            scene.tick();
        }
        assert_eq!(scene.ball_position().y, 20.0);
    }

    #[test]
    fn test_ball_mounted_star_contact_is_loss() {
        let (mut scene, log) = scene_with_log(Settings::default());
        start(&mut scene);
        let ball = scene.ball();
        let pos = Vec2::new(195.0, 300.0);
        scene.world_mut().set_position(ball, pos);
        scene.world_mut().set_velocity(ball, 0.0, 0.0);
        mounted_star_at(&mut scene, pos);

        scene.tick();
        assert_eq!(scene.phase(), GamePhase::Ended(Outcome::Loss));
        assert_eq!(*log.borrow(), vec![Outcome::Loss]);
    }

    #[test]
    fn test_floor_star_removes_mounted_star() {
        let (mut scene, log) = scene_with_log(Settings::default());
        start(&mut scene);
        let pos = floor_star_position(&scene);
        let star = mounted_star_at(&mut scene, pos);

        scene.tick();
        assert!(!scene.world().contains(star));
        assert_eq!(scene.phase(), GamePhase::Running);
        assert!(log.borrow().is_empty());
        assert_eq!(scene.world().count_kind(EntityKind::FloorStar), 9);
    }

    #[test]
    fn test_contact_rules_ignore_body_order() {
        let (mut scene, log) = scene_with_log(Settings::default());
        start(&mut scene);
        let strip = scene.spawner().pairs()[0].left;
        let floor = scene
            .world()
            .bodies()
            .find(|b| b.kind == EntityKind::FloorStar)
            .map(|b| b.id)
            .unwrap();

        scene.dispatch(&[Contact {
            a: floor,
            a_kind: EntityKind::FloorStar,
            b: strip,
            b_kind: EntityKind::Strip,
        }]);
        assert!(!scene.world().contains(strip));

        let star = mounted_star_at(&mut scene, Vec2::new(100.0, 100.0));
        let ball = scene.ball();
        scene.dispatch(&[Contact {
            a: star,
            a_kind: EntityKind::MountedStar,
            b: ball,
            b_kind: EntityKind::Ball,
        }]);
        assert_eq!(scene.phase(), GamePhase::Ended(Outcome::Loss));
        assert_eq!(*log.borrow(), vec![Outcome::Loss]);
    }

    #[test]
    fn test_end_round_is_idempotent() {
        let (mut scene, log) = scene_with_log(Settings::default());
        start(&mut scene);
        scene.end_round(Outcome::Loss);
        scene.end_round(Outcome::Loss);
        scene.end_round(Outcome::Win);
        assert_eq!(log.borrow().len(), 1);
        assert_eq!(scene.phase(), GamePhase::Ended(Outcome::Loss));
    }

    #[test]
    fn test_next_presentation_rearms() {
        let (mut scene, _) = scene_with_log(Settings::default());
        start(&mut scene);
        scene.end_round(Outcome::Loss);
        scene.present();
        assert_eq!(scene.phase(), GamePhase::Idle);
        assert!(scene.button().visible);
        assert_eq!(scene.ball_position(), Vec2::new(195.0, 422.0));
    }

    #[test]
    fn test_strip_removed_by_floor_star() {
        let (mut scene, _) = scene_with_log(Settings::default());
        start(&mut scene);
        let pair = scene.spawner().pairs()[0].clone();
        // Floor stars span 804..844, strips reach them after roughly 20s
        let mut removed_early = false;
        for _ in 0..pair.travel - 1 {
            scene.tick();
            if !scene.world().contains(pair.left) || !scene.world().contains(pair.right) {
                removed_early = true;
                break;
            }
        }
        assert!(removed_early);
    }
}
