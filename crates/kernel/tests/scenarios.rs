//! End-to-end scenarios through `Session`: world transitions, pick
//! dispatch, avatar animation and persistence working together.

use glam::{Vec2, Vec3};
use oasis_avatar::{AVATAR_CONFIG_KEY, Accessory, AnimationMode, AvatarConfig, BodyType, HeadDetail};
use oasis_common::{Color, LaunchLog, NotificationLog, Pose, WorldId};
use oasis_input::{Action, PointerEvent};
use oasis_kernel::worlds::{arcade, race, social};
use oasis_kernel::{
    BuildContext, LoadOutcome, Session, SessionConfig, TransitionPhase, TransitionState, World,
    WorldBuildError, WorldCatalog, WorldError,
};
use oasis_persist::{FileStore, MemoryStore, PersistenceAdapter};
use oasis_scene::{CameraPose, MemoryScene, NodeSpec, SceneGraph};
use std::collections::BTreeSet;
use std::rc::Rc;

struct Harness {
    session: Session,
    notes: Rc<NotificationLog>,
    games: Rc<LaunchLog>,
}

fn harness_with(catalog: WorldCatalog, store: Box<dyn PersistenceAdapter>) -> Harness {
    let notes = Rc::new(NotificationLog::new());
    let games = Rc::new(LaunchLog::new());
    let session = Session::new(SessionConfig::default(), MemoryScene::new())
        .with_catalog(catalog)
        .with_notifier(notes.clone())
        .with_launcher(games.clone())
        .with_store(store);
    Harness {
        session,
        notes,
        games,
    }
}

fn harness() -> Harness {
    harness_with(WorldCatalog::standard(), Box::new(MemoryStore::new()))
}

/// Pointer position that lands on `point` through the session's camera.
fn ndc_of(session: &Session, point: Vec3) -> Vec2 {
    session
        .camera()
        .view_projection(session.config().aspect)
        .project_point3(point)
        .truncate()
}

fn click(session: &mut Session, point: Vec3) -> Option<String> {
    let ndc = ndc_of(session, point);
    session
        .pointer(PointerEvent { ndc, click: true })
        .map(|id| id.to_string())
}

fn owners(session: &Session) -> BTreeSet<WorldId> {
    session.manager().registry().owners()
}

/// A world looked at head-on from +Z, so the screen center ray runs down -Z
/// through the origin.
fn test_world(
    id: WorldId,
    build: impl Fn(&mut BuildContext<'_>) -> Result<(), WorldBuildError> + 'static,
) -> World {
    World::new(
        id,
        CameraPose::look_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO),
        Pose::new(Vec3::new(6.0, 0.0, 6.0), 0.0),
        build,
    )
}

fn catalog_with(world: World) -> WorldCatalog {
    let mut catalog = WorldCatalog::standard();
    catalog.insert(world);
    catalog
}

#[test]
fn registry_only_holds_the_last_loaded_world() {
    let mut h = harness();
    let expected = [(WorldId::Social, 7), (WorldId::Arcade, 16), (WorldId::Race, 9)];
    let sequence = ["social", "arcade", "race", "social", "race", "arcade", "arcade", "social"];
    for name in sequence {
        h.session.load_world(name).unwrap();
        let active = h.session.active_world().unwrap();
        assert_eq!(owners(&h.session), BTreeSet::from([active]));
        let (_, count) = expected.iter().find(|(w, _)| *w == active).unwrap();
        assert_eq!(h.session.manager().registry().len(), *count, "after loading {name}");
        assert_eq!(h.session.scene().node_count(), h.session.manager().content_nodes().len());
    }
}

#[test]
fn reloading_the_active_world_changes_nothing() {
    let mut h = harness();
    h.session.start().unwrap();
    let nodes = h.session.manager().content_nodes().to_vec();
    let ids: Vec<_> = h.session.manager().registry().ids().cloned().collect();
    let notes_before = h.notes.len();

    let outcome = h.session.load_world("Social Hub").unwrap();
    assert_eq!(outcome, LoadOutcome::AlreadyActive(WorldId::Social));
    assert_eq!(h.session.manager().content_nodes(), nodes.as_slice());
    assert_eq!(h.session.manager().registry().ids().cloned().collect::<Vec<_>>(), ids);
    assert_eq!(h.notes.len(), notes_before);
}

#[test]
fn unknown_world_is_rejected_without_side_effects() {
    let mut h = harness();
    h.session.start().unwrap();
    let state = h.session.manager().state();
    let nodes = h.session.scene().node_count();

    let err = h.session.load_world("atlantis").unwrap_err();
    assert!(matches!(err, WorldError::InvalidWorld(_)));
    assert_eq!(h.session.manager().state(), state);
    assert_eq!(h.session.scene().node_count(), nodes);
    assert_eq!(owners(&h.session), BTreeSet::from([WorldId::Social]));
    assert!(h.notes.contains("Unknown world: atlantis"));
}

#[test]
fn nearest_registered_hit_wins() {
    let world = test_world(WorldId::Social, |ctx: &mut BuildContext<'_>| -> Result<(), WorldBuildError> {
        let near = ctx.spawn(NodeSpec::new("near").at(Vec3::new(0.0, 0.0, 0.0)).with_box(Vec3::ONE))?;
        let far = ctx.spawn(NodeSpec::new("far").at(Vec3::new(0.0, 0.0, -5.0)).with_box(Vec3::ONE))?;
        ctx.interactable("far", far, |c| c.notify("far"))?;
        ctx.interactable("near", near, |c| c.notify("near"))?;
        Ok(())
    });
    let mut h = harness_with(catalog_with(world), Box::new(MemoryStore::new()));
    h.session.load_world("social").unwrap();
    h.notes.clear();

    assert_eq!(click(&mut h.session, Vec3::ZERO).as_deref(), Some("social/near"));
    assert_eq!(h.notes.messages(), vec!["near".to_string()]);
}

#[test]
fn hits_resolve_to_the_nearest_registered_ancestor() {
    let world = test_world(WorldId::Social, |ctx: &mut BuildContext<'_>| -> Result<(), WorldBuildError> {
        // Unregistered glass pane in front of everything.
        ctx.spawn(NodeSpec::new("glass").at(Vec3::new(0.0, 0.0, 4.0)).with_box(Vec3::new(5.0, 5.0, 0.1)))?;
        let machine = ctx.spawn(NodeSpec::new("machine").at(Vec3::new(0.0, 0.0, -2.0)))?;
        let panel = ctx.spawn(NodeSpec::new("panel").child_of(machine).with_box(Vec3::ONE))?;
        ctx.spawn(NodeSpec::new("button").child_of(panel).at(Vec3::new(0.0, 0.0, 1.0)).with_box(Vec3::splat(0.2)))?;
        ctx.interactable("machine", machine, |c| c.notify("machine"))?;
        // Decor with no interactive ancestor, off to the side.
        ctx.spawn(NodeSpec::new("plant").at(Vec3::new(3.0, 0.0, 0.0)).with_box(Vec3::splat(0.5)))?;
        Ok(())
    });
    let mut h = harness_with(catalog_with(world), Box::new(MemoryStore::new()));
    h.session.load_world("social").unwrap();
    h.notes.clear();

    assert_eq!(click(&mut h.session, Vec3::new(0.0, 0.0, -1.0)).as_deref(), Some("social/machine"));
    assert_eq!(h.notes.messages(), vec!["machine".to_string()]);

    h.notes.clear();
    assert_eq!(click(&mut h.session, Vec3::new(3.0, 0.0, 0.0)), None);
    assert!(h.notes.is_empty());
}

#[test]
fn modal_suppresses_dispatch_and_hover() {
    let mut h = harness();
    h.session.start().unwrap();
    h.notes.clear();

    h.session.key_down(Action::ToggleMenu);
    assert_eq!(click(&mut h.session, social::RACE_PORTAL), None);
    assert_eq!(h.session.active_world(), Some(WorldId::Social));
    assert!(h.notes.is_empty());
    assert!(h.session.dispatcher().hovered().is_none());

    h.session.key_down(Action::ToggleMenu);
    assert!(click(&mut h.session, social::RACE_PORTAL).is_some());
}

#[test]
fn jump_lands_at_exact_duration() {
    let mut h = harness();
    h.session.start().unwrap();

    h.session.key_down(Action::Jump);
    h.session.update(0.125);
    let entered = h.session.avatar().animator().state().entered_at;
    assert_eq!(h.session.avatar().mode(), AnimationMode::Jump);

    h.session.key_down(Action::MoveForward);
    h.session.update(0.25);
    assert_eq!(h.session.avatar().mode(), AnimationMode::Jump);
    h.session.update(0.25);
    let state = h.session.avatar().animator().state();
    assert_eq!(state.mode, AnimationMode::Walk);
    assert_eq!(state.entered_at, entered + 0.5);

    h.session.key_up(Action::MoveForward);
    h.session.update(0.125);
    assert_eq!(h.session.avatar().mode(), AnimationMode::Idle);
}

#[test]
fn custom_config_survives_restart_via_file_store() {
    let tmp = tempfile::tempdir().unwrap();
    let config = AvatarConfig {
        body_type: BodyType::Heavy,
        head_detail: HeadDetail::Antenna,
        primary_color: Color::rgb(0x12, 0x34, 0x56),
        accessory: Accessory::Jetpack,
        ..AvatarConfig::default()
    };
    {
        let store = FileStore::open(tmp.path()).unwrap();
        let mut h = harness_with(WorldCatalog::standard(), Box::new(store));
        h.session.start().unwrap();
        h.session.set_avatar_config(config).unwrap();
    }
    let store = FileStore::open(tmp.path()).unwrap();
    let mut h = harness_with(WorldCatalog::standard(), Box::new(store));
    h.session.start().unwrap();
    assert_eq!(*h.session.avatar().config(), config);
    assert!(!h.notes.contains("default avatar"));
}

#[test]
fn corrupt_stored_config_falls_back_to_default() {
    let mut store = MemoryStore::new();
    store.set(AVATAR_CONFIG_KEY, r##"{"bodyType":"tank","primaryColor":"#zzzzzz"}"##).unwrap();
    let mut h = harness_with(WorldCatalog::standard(), Box::new(store));

    assert!(h.session.start().is_ok());
    assert_eq!(*h.session.avatar().config(), AvatarConfig::default());
    assert_eq!(h.notes.messages().iter().filter(|m| m.contains("default avatar")).count(), 1);
    assert_eq!(h.session.active_world(), Some(WorldId::Social));
}

#[test]
fn social_to_arcade_moves_avatar_and_swaps_interactables() {
    let mut h = harness();
    h.session.start().unwrap();
    assert_eq!(h.session.manager().registry().len(), 7);
    assert_eq!(h.session.avatar().pose(), social::SPAWN);

    h.session.load_world("arcade").unwrap();
    assert_eq!(h.session.manager().registry().len(), 16);
    assert_eq!(owners(&h.session), BTreeSet::from([WorldId::Arcade]));
    assert_eq!(h.session.avatar().pose().position, Vec3::new(0.0, 0.0, 15.0));
    assert_eq!(h.session.camera().eye, arcade::CAMERA_EYE);
}

#[test]
fn portal_click_switches_world_within_the_same_call() {
    let mut h = harness();
    h.session.start().unwrap();

    let picked = click(&mut h.session, social::RACE_PORTAL);
    assert_eq!(picked.as_deref(), Some("social/portal-race"));
    assert_eq!(h.session.active_world(), Some(WorldId::Race));
    assert_eq!(h.session.manager().state(), TransitionState {
        phase: TransitionPhase::Active,
        target: Some(WorldId::Race),
    });
    assert_eq!(owners(&h.session), BTreeSet::from([WorldId::Race]));
    assert_eq!(h.session.avatar().pose(), race::SPAWN);
    assert!(h.notes.contains("Entered RACE TRACK"));
    // The old hover target no longer exists.
    assert!(h.session.dispatcher().hovered().is_none());
}

#[test]
fn cabinet_click_starts_its_mini_game() {
    let mut h = harness();
    h.session.load_world("arcade").unwrap();
    let asteroids = arcade::CABINETS.iter().find(|c| c.game == "ASTEROIDS").unwrap();

    let picked = click(&mut h.session, Vec3::new(asteroids.x, 1.5, asteroids.z));
    assert_eq!(picked.as_deref(), Some("arcade/cabinet-asteroids"));
    assert_eq!(h.games.started(), vec!["ASTEROIDS".to_string()]);
    assert!(h.notes.contains("Starting ASTEROIDS..."));
    assert_eq!(h.session.active_world(), Some(WorldId::Arcade));
}

#[test]
fn race_start_line_announces_countdown() {
    let mut h = harness();
    h.session.load_world("race").unwrap();
    assert_eq!(click(&mut h.session, race::START_LINE).as_deref(), Some("race/start-line"));
    assert!(h.notes.contains(race::START_MESSAGE));
}

#[test]
fn failed_build_leaves_no_world_and_recovers() {
    let broken = test_world(WorldId::Race, |ctx: &mut BuildContext<'_>| -> Result<(), WorldBuildError> {
        let node = ctx.spawn(NodeSpec::new("grandstand").with_box(Vec3::ONE))?;
        ctx.interactable("grandstand", node, |_| {})?;
        Err(WorldBuildError::Content("grandstand collapsed".into()))
    });
    let mut h = harness_with(catalog_with(broken), Box::new(MemoryStore::new()));
    h.session.start().unwrap();
    let avatar_nodes = h.session.avatar().rig().unwrap().parts().len() + 1;

    let err = h.session.load_world("race").unwrap_err();
    assert!(matches!(err, WorldError::Build { world: WorldId::Race, .. }));
    assert_eq!(h.session.manager().state(), TransitionState::IDLE);
    assert_eq!(h.session.active_world(), None);
    assert!(h.session.manager().registry().is_empty());
    assert_eq!(h.session.scene().node_count(), avatar_nodes);
    assert!(h.notes.contains("Failed to load RACE TRACK"));

    // No world: pointer input resolves nothing.
    assert_eq!(h.session.pointer(PointerEvent::clicked(0.0, 0.0)), None);

    h.session.load_world("arcade").unwrap();
    assert_eq!(owners(&h.session), BTreeSet::from([WorldId::Arcade]));
}

#[test]
fn newest_load_request_in_a_batch_wins() {
    let world = test_world(WorldId::Social, |ctx: &mut BuildContext<'_>| -> Result<(), WorldBuildError> {
        let switch = ctx.spawn(NodeSpec::new("switch").with_box(Vec3::ONE))?;
        ctx.interactable("switch", switch, |c| {
            c.load_world("arcade");
            c.notify("switching");
            c.load_world("race");
        })?;
        Ok(())
    });
    let mut h = harness_with(catalog_with(world), Box::new(MemoryStore::new()));
    h.session.load_world("social").unwrap();
    h.notes.clear();

    assert!(click(&mut h.session, Vec3::ZERO).is_some());
    assert_eq!(h.session.active_world(), Some(WorldId::Race));
    assert_eq!(
        h.notes.messages(),
        vec![
            "switching".to_string(),
            "Loading RACE TRACK...".to_string(),
            "Entered RACE TRACK".to_string(),
        ]
    );
}

#[test]
fn handler_requesting_unknown_world_is_contained() {
    let world = test_world(WorldId::Social, |ctx: &mut BuildContext<'_>| -> Result<(), WorldBuildError> {
        let door = ctx.spawn(NodeSpec::new("door").with_box(Vec3::ONE))?;
        ctx.interactable("door", door, |c| c.load_world("the void"))?;
        Ok(())
    });
    let mut h = harness_with(catalog_with(world), Box::new(MemoryStore::new()));
    h.session.load_world("social").unwrap();

    assert_eq!(click(&mut h.session, Vec3::ZERO).as_deref(), Some("social/door"));
    assert_eq!(h.session.active_world(), Some(WorldId::Social));
    assert!(h.notes.contains("Unknown world: the void"));
}

#[test]
fn hover_enters_and_exits() {
    let mut h = harness();
    h.session.start().unwrap();
    h.notes.clear();

    let over = ndc_of(&h.session, social::ARCADE_PORTAL);
    h.session.pointer(PointerEvent { ndc: over, click: false });
    assert_eq!(
        h.session.dispatcher().hovered().map(|id| id.to_string()).as_deref(),
        Some("social/portal-arcade")
    );
    assert!(h.notes.contains("Portal to ARCADE"));

    // Straight up into the sky: nothing there.
    h.session.pointer(PointerEvent::moved(0.0, 1.0));
    assert!(h.session.dispatcher().hovered().is_none());
    assert_eq!(h.session.active_world(), Some(WorldId::Social));
}

#[test]
fn interact_key_clicks_at_last_pointer() {
    let mut h = harness();
    h.session.start().unwrap();
    let over = ndc_of(&h.session, social::RACE_PORTAL);
    h.session.pointer(PointerEvent { ndc: over, click: false });
    assert_eq!(h.session.active_world(), Some(WorldId::Social));

    h.session.press_key("e");
    assert_eq!(h.session.active_world(), Some(WorldId::Race));
}
