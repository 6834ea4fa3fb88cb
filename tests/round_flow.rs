use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use tilt_gap::consts::SIM_DT;
use tilt_gap::results::PayloadSource;
use tilt_gap::sim::{EntityKind, GamePhase, Outcome};
use tilt_gap::{GameHost, Settings};

const BODY: &str = r#"{"winner":"https://example.com/winner","loser":"https://example.com/loser"}"#;

type Opened = Rc<RefCell<Vec<String>>>;

fn host(source: PayloadSource) -> (GameHost<PayloadSource>, Opened) {
    let opened: Opened = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&opened);
    let host = GameHost::new(Settings::default(), source, move |d: &str| {
        sink.borrow_mut().push(d.to_string())
    });
    (host, opened)
}

fn tap_start(host: &mut GameHost<PayloadSource>) {
    let center = host.scene().button().center;
    host.touch_down(center);
    host.touch_up(center);
}

fn advance(host: &mut GameHost<PayloadSource>, ticks: u32) {
    for _ in 0..ticks {
        host.update(SIM_DT);
    }
}

#[test]
fn test_survive_thirty_seconds_opens_winner() {
    let (mut host, opened) = host(PayloadSource::from_bytes(BODY));
    host.load();
    host.appear();
    tap_start(&mut host);

    advance(&mut host, 2999);
    assert_eq!(host.scene().elapsed(), 29);
    assert!(opened.borrow().is_empty());

    advance(&mut host, 1);
    assert_eq!(host.scene().phase(), GamePhase::Ended(Outcome::Win));
    assert_eq!(*opened.borrow(), vec!["https://example.com/winner".to_string()]);
}

#[test]
fn test_floor_star_contact_at_five_seconds_opens_loser() {
    let (mut host, opened) = host(PayloadSource::from_bytes(BODY));
    host.load();
    host.appear();
    tap_start(&mut host);

    advance(&mut host, 500);
    assert_eq!(host.scene().elapsed(), 5);

    let scene = host.scene_mut();
    let ball = scene.ball();
    let star = scene
        .world()
        .bodies()
        .find(|b| b.kind == EntityKind::FloorStar)
        .map(|b| b.pos)
        .unwrap();
    scene.world_mut().set_position(ball, star);
    scene.world_mut().set_velocity(ball, 0.0, 0.0);

    advance(&mut host, 1);
    assert_eq!(host.scene().phase(), GamePhase::Ended(Outcome::Loss));
    assert_eq!(host.scene().elapsed(), 0);
    assert_eq!(host.scene().session().elapsed, 0);
    assert_eq!(*opened.borrow(), vec!["https://example.com/loser".to_string()]);
}

#[test]
fn test_failed_fetch_makes_navigation_a_no_op() {
    let (mut host, opened) = host(PayloadSource::unreachable("offline"));
    host.load();
    host.appear();
    // The failure is consumed before the start tap
    advance(&mut host, 1);
    assert!(host.destinations().is_none());

    tap_start(&mut host);
    advance(&mut host, 3000);
    assert_eq!(host.scene().phase(), GamePhase::Ended(Outcome::Win));
    assert!(opened.borrow().is_empty());
}

#[test]
fn test_double_end_navigates_once() {
    let (mut host, opened) = host(PayloadSource::from_bytes(BODY));
    host.load();
    host.appear();
    tap_start(&mut host);
    advance(&mut host, 10);

    host.scene_mut().end_round(Outcome::Loss);
    host.scene_mut().end_round(Outcome::Loss);
    assert_eq!(opened.borrow().len(), 1);
    assert_eq!(host.scene().session().elapsed, 0);
    assert!(host.scene().session().paused);
}

#[test]
fn test_dismissed_round_keeps_elapsed_time() {
    let (mut host, _) = host(PayloadSource::from_bytes(BODY));
    host.load();
    host.appear();
    tap_start(&mut host);
    advance(&mut host, 350);

    host.disappear();
    advance(&mut host, 1000);
    host.appear();
    assert_eq!(host.scene().elapsed(), 3);
    assert_eq!(host.scene().phase(), GamePhase::Running);
}

#[test]
fn test_release_off_button_does_not_start() {
    let (mut host, _) = host(PayloadSource::from_bytes(BODY));
    host.appear();
    let center = host.scene().button().center;
    host.touch_down(center);
    host.touch_up(center + Vec2::new(200.0, 0.0));
    advance(&mut host, 200);
    assert_eq!(host.scene().phase(), GamePhase::Idle);
    assert_eq!(host.scene().button().scale, 1.0);
}
