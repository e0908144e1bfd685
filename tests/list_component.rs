//! List component mounted in a window, driven through clicks and the
//! component API

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::*;
use miniwin::dom::{classes, NodeId};
use miniwin::geometry::Point;
use miniwin::list::{ListAction, ListEvent, ListEventKind, ListPatch, RowKey, Selection};
use miniwin::messages::{KeyMsg, Msg, PointerMsg};
use miniwin::update::update;
use miniwin::window::{WindowConfig, WindowId};
use miniwin::Workspace;
use serde_json::{json, Value};

fn people() -> Value {
    json!([
        { "id": 1, "name": "Ada" },
        { "id": 2, "name": "Brian" },
        { "id": 3, "name": "Cleo" },
        { "id": 4, "name": "Dmitri" }
    ])
}

fn spawn_list(ws: &mut Workspace, list: Value) -> WindowId {
    let id = ws
        .spawn(
            WindowConfig::default()
                .id("people-window")
                .with("elements", json!([list])),
        )
        .unwrap()
        .id()
        .clone();
    ws.layout();
    id
}

fn row(ws: &mut Workspace, window: &WindowId, key: &str) -> Option<NodeId> {
    ws.with_list(window, "people", |list, _| list.row_node(&RowKey::new(key)))
        .flatten()
}

fn click_row(ws: &mut Workspace, window: &WindowId, key: &str) {
    let node = row(ws, window, key).expect("row rendered");
    let rect = ws.doc().rect(node);
    click(ws, Point::new(rect.x + 5.0, rect.mid_y()));
}

fn selected_keys(ws: &mut Workspace, window: &WindowId) -> Vec<String> {
    let rows = ws
        .with_list(window, "people", |list, _| {
            list.view().iter().map(|r| r.key.clone()).collect::<Vec<_>>()
        })
        .unwrap();
    rows.into_iter()
        .filter(|key| {
            let node = ws
                .with_list(window, "people", |list, _| list.row_node(key))
                .flatten()
                .unwrap();
            ws.doc().has_class(node, classes::SELECTED)
        })
        .map(|key| key.to_string())
        .collect()
}

fn selection(ws: &mut Workspace, window: &WindowId) -> Selection {
    ws.with_list(window, "people", |list, _| list.get_selection())
        .unwrap()
}

#[test]
fn test_single_select_replaces_previous_row() {
    let mut ws = test_workspace();
    let win = spawn_list(
        &mut ws,
        json!({ "type": "item_list", "id": "people", "items": people(), "label_field": "name" }),
    );
    let changes = Rc::new(RefCell::new(0));
    let c = changes.clone();
    ws.with_list(&win, "people", |list, _| {
        list.on(ListEventKind::SelectionChanged, move |_| *c.borrow_mut() += 1)
    });

    click_row(&mut ws, &win, "2");
    click_row(&mut ws, &win, "3");

    assert_eq!(selected_keys(&mut ws, &win), vec!["3"]);
    assert_eq!(
        selection(&mut ws, &win),
        Selection::Single(Some(json!({ "id": 3, "name": "Cleo" })))
    );
    assert_eq!(*changes.borrow(), 2);
}

#[test]
fn test_selection_key_survives_filter_sort_and_paging() {
    let mut ws = test_workspace();
    let win = spawn_list(
        &mut ws,
        json!({ "type": "item_list", "id": "people", "items": people(), "page_size": 2 }),
    );
    click_row(&mut ws, &win, "2");

    // Reverse order: page 1 is now [4, 3], key 2 is off-page
    ws.with_list(&win, "people", |list, doc| {
        list.set_sort(doc, |a, b| b["id"].as_i64().cmp(&a["id"].as_i64()))
    });
    assert_eq!(selection(&mut ws, &win), Selection::Single(None));

    ws.with_list(&win, "people", |list, doc| list.set_page(doc, 2));
    assert_eq!(selected_keys(&mut ws, &win), vec!["2"]);

    // Filtered out, then back: the key was never dropped
    ws.with_list(&win, "people", |list, doc| {
        list.set_filter(doc, |item| item["id"] != json!(2))
    });
    assert!(selection(&mut ws, &win).is_empty());
    ws.with_list(&win, "people", |list, doc| list.clear_filter(doc));
    assert_eq!(selected_keys(&mut ws, &win), vec!["2"]);

    // Page numbers past the end show the last page
    ws.with_list(&win, "people", |list, doc| list.set_page(doc, 9));
    assert_eq!(selected_keys(&mut ws, &win), vec!["2"]);
}

#[test]
fn test_multi_select_toggles() {
    let mut ws = test_workspace();
    let win = spawn_list(
        &mut ws,
        json!({ "type": "item_list", "id": "people", "items": people(), "multi": true }),
    );

    click_row(&mut ws, &win, "1");
    click_row(&mut ws, &win, "4");
    click_row(&mut ws, &win, "1");

    assert_eq!(selected_keys(&mut ws, &win), vec!["4"]);
    assert_eq!(
        selection(&mut ws, &win),
        Selection::Multi(vec![json!({ "id": 4, "name": "Dmitri" })])
    );
}

#[test]
fn test_render_precedence() {
    let mut ws = test_workspace();
    let win = spawn_list(
        &mut ws,
        json!({ "type": "item_list", "id": "people", "items": people() }),
    );
    let count = |ws: &mut Workspace, class: &'static str| {
        ws.with_list(&win, "people", |list, doc| {
            doc.descendants_with_class(list.root(), class).len()
        })
        .unwrap()
    };

    ws.with_list(&win, "people", |list, doc| {
        list.update(doc, ListPatch::new().loading(true).error(Some("boom".into())))
    });
    assert_eq!(count(&mut ws, classes::LIST_ERROR), 1);
    assert_eq!(count(&mut ws, classes::LIST_LOADING), 0);
    assert_eq!(count(&mut ws, classes::LIST_ROW), 0);

    ws.with_list(&win, "people", |list, doc| list.set_error(doc, None));
    assert_eq!(count(&mut ws, classes::LIST_LOADING), 1);
    assert_eq!(count(&mut ws, classes::LIST_ROW), 0);

    ws.with_list(&win, "people", |list, doc| {
        list.update(doc, ListPatch::new().loading(false).items(Vec::new()))
    });
    assert_eq!(count(&mut ws, classes::LIST_EMPTY), 1);

    ws.with_list(&win, "people", |list, doc| {
        list.set_items(doc, people().as_array().cloned().unwrap_or_default())
    });
    assert_eq!(count(&mut ws, classes::LIST_ROW), 4);
    assert_eq!(count(&mut ws, classes::LIST_EMPTY), 0);
}

#[test]
fn test_row_action_click_runs_handler_without_selecting() {
    let mut ws = test_workspace();
    let win = spawn_list(
        &mut ws,
        json!({ "type": "item_list", "id": "people", "items": people() }),
    );
    let deleted = Rc::new(RefCell::new(Vec::new()));
    let events = Rc::new(RefCell::new(Vec::new()));

    let d = deleted.clone();
    let e = events.clone();
    ws.with_list(&win, "people", |list, doc| {
        list.on(ListEventKind::RowAction, move |ev| {
            if let ListEvent::RowAction { action, key, .. } = ev {
                e.borrow_mut().push(format!("{action}:{key}"));
            }
        });
        list.set_actions(
            doc,
            vec![ListAction::new("delete", "Delete").on_click(move |item| {
                d.borrow_mut().push(item["id"].clone())
            })],
        );
    });
    ws.layout();

    let row3 = row(&mut ws, &win, "3").unwrap();
    let button = ws.doc().descendants_with_class(row3, classes::BUTTON)[0];
    let rect = ws.doc().rect(button);
    click(&mut ws, Point::new(rect.mid_x(), rect.mid_y()));

    assert_eq!(*deleted.borrow(), vec![json!(3)]);
    assert_eq!(*events.borrow(), vec!["delete:3"]);
    assert!(selected_keys(&mut ws, &win).is_empty());
}

#[test]
fn test_items_without_key_use_positional_keys() {
    let mut ws = test_workspace();
    let win = spawn_list(
        &mut ws,
        json!({ "type": "item_list", "id": "people", "items": ["red", "green"] }),
    );

    ws.with_list(&win, "people", |list, doc| {
        assert!(list.view().iter().all(|r| r.key.is_positional()));
        list.set_selection(doc, [json!("green")]);
    });

    assert_eq!(selected_keys(&mut ws, &win), vec!["__idx_1"]);
    assert_eq!(selection(&mut ws, &win), Selection::Single(Some(json!("green"))));
}

#[test]
fn test_selected_predicate_picks_initial_rows() {
    let mut ws = test_workspace();
    let win = spawn_list(&mut ws, json!({ "type": "item_list", "id": "people" }));

    // Single mode keeps the first match in view order
    ws.with_list(&win, "people", |list, doc| {
        list.update(
            doc,
            ListPatch::new()
                .sort(|a, b| b["id"].as_i64().cmp(&a["id"].as_i64()))
                .selected(|item| item["id"] == json!(2) || item["id"] == json!(3))
                .items(people().as_array().cloned().unwrap_or_default()),
        )
    });
    assert_eq!(selected_keys(&mut ws, &win), vec!["3"]);

    ws.with_list(&win, "people", |list, doc| {
        list.update(doc, ListPatch::new().multi(true).clear_sort());
        list.set_items(doc, people().as_array().cloned().unwrap_or_default());
    });
    assert_eq!(selected_keys(&mut ws, &win), vec!["2", "3"]);
}

#[test]
fn test_double_click_reports_row_without_selecting() {
    let mut ws = test_workspace();
    let win = spawn_list(
        &mut ws,
        json!({ "type": "item_list", "id": "people", "items": people(), "label_field": "name" }),
    );
    let opened = Rc::new(RefCell::new(Vec::new()));
    let o = opened.clone();
    ws.with_list(&win, "people", |list, _| {
        list.on(ListEventKind::RowDoubleClick, move |ev| {
            if let ListEvent::RowDoubleClick { key, item } = ev {
                o.borrow_mut().push((key.to_string(), item["name"].clone()));
            }
        })
    });

    let node = row(&mut ws, &win, "2").unwrap();
    let rect = ws.doc().rect(node);
    pointer(&mut ws, PointerMsg::DoubleClick { x: rect.x + 5.0, y: rect.mid_y() });

    assert_eq!(*opened.borrow(), vec![("2".to_string(), json!("Brian"))]);
    assert!(selected_keys(&mut ws, &win).is_empty());

    // Outside any row nothing fires
    let title = title_point(&ws, &win);
    pointer(&mut ws, PointerMsg::DoubleClick { x: title.x, y: title.y });
    assert_eq!(opened.borrow().len(), 1);
}

#[test]
fn test_card_rows_render_slots_and_stay_clickable() {
    let mut ws = test_workspace();
    let win = spawn_list(
        &mut ws,
        json!({
            "type": "item_list",
            "id": "people",
            "card": { "title": "name", "subtitle": "role", "badges": ["team"], "meta": "since" },
            "items": [
                { "id": 1, "name": "Ada", "role": "Engineer", "team": "core", "since": 2019 },
                { "id": 2, "name": "Brian", "role": "Designer" }
            ]
        }),
    );

    let ada = row(&mut ws, &win, "1").unwrap();
    let doc = ws.doc();
    let title = doc.descendants_with_class(ada, classes::LIST_TITLE)[0];
    assert_eq!(doc.text(title), Some("Ada"));
    let subtitle = doc.descendants_with_class(ada, classes::LIST_SUBTITLE)[0];
    assert_eq!(doc.text(subtitle), Some("Engineer"));
    let badges = doc.descendants_with_class(ada, classes::LIST_BADGE);
    assert_eq!(badges.iter().map(|b| doc.text(*b)).collect::<Vec<_>>(), [Some("core")]);
    let meta = doc.descendants_with_class(ada, classes::LIST_META)[0];
    assert_eq!(doc.text(meta), Some("2019"));
    assert!(doc.query_class(classes::LIST_HEADER).is_empty());

    let brian = row(&mut ws, &win, "2").unwrap();
    assert!(ws.doc().descendants_with_class(brian, classes::LIST_BADGES).is_empty());

    // A click on a slot selects its row
    let rect = ws.doc().rect(subtitle);
    click(&mut ws, Point::new(rect.mid_x(), rect.mid_y()));
    assert_eq!(selected_keys(&mut ws, &win), vec!["1"]);
}

#[test]
fn test_enter_and_space_activate_focused_row() {
    let mut ws = test_workspace();
    let win = spawn_list(
        &mut ws,
        json!({ "type": "item_list", "id": "people", "items": people(), "multi": true }),
    );
    let clicks = Rc::new(RefCell::new(Vec::new()));
    let c = clicks.clone();
    ws.with_list(&win, "people", |list, _| {
        list.on(ListEventKind::RowClick, move |ev| {
            if let ListEvent::RowClick { key, .. } = ev {
                c.borrow_mut().push(key.to_string());
            }
        })
    });
    let press = |ws: &mut Workspace, key: &str| {
        update(ws, Msg::Key(KeyMsg::Press { key: key.to_string() }));
    };

    // Clicking a row focuses it
    click_row(&mut ws, &win, "1");
    let first = row(&mut ws, &win, "1").unwrap();
    assert_eq!(ws.doc().focused(), Some(first));
    assert_eq!(ws.doc().attr(first, "tabindex"), Some("0"));

    let third = row(&mut ws, &win, "3").unwrap();
    ws.doc_mut().focus(third);
    press(&mut ws, "Enter");
    assert_eq!(selected_keys(&mut ws, &win), vec!["1", "3"]);

    press(&mut ws, "x");
    press(&mut ws, " ");
    assert_eq!(selected_keys(&mut ws, &win), vec!["1"]);
    assert_eq!(*clicks.borrow(), vec!["1", "3", "3"]);

    // Nothing focused: keys go nowhere
    ws.doc_mut().blur();
    press(&mut ws, "Enter");
    assert_eq!(clicks.borrow().len(), 3);
}
