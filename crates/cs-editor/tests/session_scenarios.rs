//! Integration tests: editing session (cs-editor ↔ cs-core).
//!
//! Drives whole gestures through `Session` and checks the resulting space,
//! selection, and interaction state across the crate boundary.

use cs_core::{
    CardContents, CardId, Point, Position, Rect, Size, Space, SpaceMutation, User, UserId, Vec2,
};
use cs_editor::{ConnectionDraft, Session};
use pretty_assertions::assert_eq;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn session() -> Session {
    init_logging();
    Session::new(
        Space::new(),
        User {
            id: UserId::intern("scenario_user"),
            color: "#aaddff".into(),
        },
    )
}

fn card(s: &mut Session, name: &str, x: f64, y: f64) -> CardId {
    s.add_card(Position::new(x, y), Some(CardContents::named(name)))
        .unwrap()
}

fn pos(s: &Session, id: CardId) -> (f64, f64) {
    let c = s.space().card(id).unwrap();
    (c.x, c.y)
}

// ─── Dragging ───────────────────────────────────────────────────────────

#[test]
fn drag_without_selection_moves_only_the_dragged_card() {
    let mut s = session();
    let c1 = card(&mut s, "C1", 10.0, 10.0);
    let c2 = card(&mut s, "C2", 200.0, 10.0);

    assert!(s.start_card_drag(c1));
    s.drag_to(Point::new(40.0, 30.0), Point::new(20.0, 20.0));
    s.end_card_drag();

    assert_eq!(pos(&s, c1), (30.0, 20.0));
    assert_eq!(pos(&s, c2), (200.0, 10.0));
}

#[test]
fn drag_with_selection_moves_every_selected_card() {
    let mut s = session();
    let c1 = card(&mut s, "C1", 10.0, 10.0);
    let c2 = card(&mut s, "C2", 200.0, 10.0);
    let c3 = card(&mut s, "C3", 400.0, 10.0);
    s.set_selection([c1, c2]);

    assert!(s.start_card_drag(c1));
    s.drag_to(Point::new(40.0, 30.0), Point::new(20.0, 20.0));
    s.end_card_drag();

    assert_eq!(pos(&s, c1), (30.0, 20.0));
    assert_eq!(pos(&s, c2), (220.0, 20.0));
    assert_eq!(pos(&s, c3), (400.0, 10.0));
}

#[test]
fn drag_clamps_at_origin_and_refreshes_paths() {
    let mut s = session();
    let a = card(&mut s, "A", 5.0, 5.0);
    let b = card(&mut s, "B", 100.0, 100.0);
    s.start_connection(a, Point::new(13.0, 13.0));
    let conn = s.finish_connection(Some(b)).unwrap().unwrap();
    let before = s.space().connection(conn).unwrap().path.clone();

    s.start_card_drag(a);
    s.drag_to(Point::ZERO, Point::new(50.0, 50.0));
    s.end_card_drag();

    assert_eq!(pos(&s, a), (0.0, 0.0));
    assert_ne!(s.space().connection(conn).unwrap().path, before);
}

#[test]
fn drag_rejected_while_painting_is_locked() {
    let mut s = session();
    let a = card(&mut s, "A", 0.0, 0.0);
    s.set_painting_locked(true);
    assert!(s.viewport_is_locked());
    assert!(!s.start_card_drag(a));
    assert!(!s.drag_to(Point::new(10.0, 10.0), Point::ZERO));
    assert_eq!(pos(&s, a), (0.0, 0.0));
}

// ─── Connecting ─────────────────────────────────────────────────────────

#[test]
fn connection_gesture_reuses_last_type() {
    let mut s = session();
    let a = card(&mut s, "A", 0.0, 0.0);
    let b = card(&mut s, "B", 100.0, 0.0);
    let c = card(&mut s, "C", 200.0, 0.0);

    assert!(s.start_connection(a, Point::new(8.0, 8.0)));
    s.update_connection(ConnectionDraft {
        end_point: Some(Point::new(90.0, 10.0)),
        ..Default::default()
    });
    assert_eq!(
        s.interaction().current_connection.end_point,
        Some(Point::new(90.0, 10.0))
    );
    let ab = s.finish_connection(Some(b)).unwrap().unwrap();

    s.start_connection(c, Point::ZERO);
    let ca = s.finish_connection(Some(a)).unwrap().unwrap();

    assert_eq!(s.space().connection_types().len(), 1);
    let t = s.space().connection_types()[0].id;
    assert_eq!(s.space().connection(ab).unwrap().connection_type_id, t);
    assert_eq!(s.space().connection(ca).unwrap().connection_type_id, t);
    assert_eq!(s.space().card_connections(a).len(), 2);
}

#[test]
fn hovering_the_start_card_is_not_a_target() {
    let mut s = session();
    let a = card(&mut s, "A", 0.0, 0.0);
    s.start_connection(a, Point::ZERO);
    s.hover_connection_target(Some(a));
    assert_eq!(s.interaction().current_connection_success, None);
    assert_eq!(s.finish_connection(None).unwrap(), None);
    assert_eq!(s.space().connections().count(), 0);
}

#[test]
fn cancel_connection_leaves_space_untouched() {
    let mut s = session();
    let a = card(&mut s, "A", 0.0, 0.0);
    let b = card(&mut s, "B", 100.0, 0.0);
    s.start_connection(a, Point::ZERO);
    s.hover_connection_target(Some(b));
    s.cancel_connection();

    assert!(!s.interaction().is_drawing_connection);
    assert_eq!(s.finish_connection(Some(b)).unwrap(), None);
    assert_eq!(s.space().connections().count(), 0);
    assert!(s.space().connection_types().is_empty());
}

// ─── Painting ───────────────────────────────────────────────────────────

#[test]
fn paint_selection_then_bulk_remove() {
    let mut s = session();
    let a = card(&mut s, "A", 0.0, 0.0);
    let b = card(&mut s, "B", 60.0, 0.0);
    let keep = card(&mut s, "Keep", 500.0, 500.0);
    s.start_connection(a, Point::ZERO);
    s.finish_connection(Some(keep)).unwrap();
    s.refresh_spatial_map(&|_: CardId| Some(Size::new(40.0, 40.0)));

    assert!(s.start_painting());
    // rectangle drawn from bottom-right to top-left
    s.paint_select(Rect::new(120.0, 50.0, -10.0, -10.0));
    s.end_painting(Point::new(-10.0, -10.0));
    assert_eq!(s.selection().as_slice(), &[a, b]);
    assert!(s.interaction().multiple_card_actions.is_some());

    s.remove_selected_cards();

    assert_eq!(s.space().card_count(), 1);
    assert!(s.space().card(keep).is_some());
    assert_eq!(s.space().connections().count(), 0);
    assert!(s.selection().is_empty());
    assert_eq!(s.interaction().multiple_card_actions, None);

    s.apply(SpaceMutation::RemoveUnusedConnectionTypes).unwrap();
    assert!(s.space().connection_types().is_empty());
}

#[test]
fn empty_paint_opens_no_menu() {
    let mut s = session();
    card(&mut s, "A", 0.0, 0.0);
    s.refresh_spatial_map(&|_: CardId| Some(Size::new(40.0, 40.0)));
    s.start_painting();
    s.paint_select(Rect::new(300.0, 300.0, 400.0, 400.0));
    s.end_painting(Point::new(400.0, 400.0));
    assert!(s.selection().is_empty());
    assert_eq!(s.interaction().multiple_card_actions, None);
}

// ─── Details ────────────────────────────────────────────────────────────

#[test]
fn opening_details_closes_the_others() {
    let mut s = session();
    let a = card(&mut s, "A", 0.0, 0.0);
    let b = card(&mut s, "B", 100.0, 0.0);
    assert!(s.open_card_details(a));
    assert!(s.open_card_details(b));
    assert!(!s.space().card(a).unwrap().details_visible);
    assert!(s.space().card(b).unwrap().details_visible);
}

#[test]
fn mutations_through_the_session_keep_selection_consistent() {
    let mut s = session();
    let a = card(&mut s, "A", 0.0, 0.0);
    let b = card(&mut s, "B", 100.0, 0.0);
    s.set_selection([a, b]);
    s.apply(SpaceMutation::MoveCard {
        card_id: b,
        delta: Vec2::new(-500.0, 3.0),
    })
    .unwrap();
    s.apply(SpaceMutation::RemoveCard { card_id: a }).unwrap();

    assert_eq!(s.selection().as_slice(), &[b]);
    assert_eq!(pos(&s, b), (0.0, 3.0));
}
