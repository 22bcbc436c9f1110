use serde_json::json;

use tabfind_core::contract::ScriptFilterResponse;
use tabfind_core::model::{ActionDescriptor, DynamicState, ResultItem, TabRecord};
use tabfind_core::result_builder::build;

#[test]
fn action_descriptors_serialize_as_arrays() {
    let cases = [
        (ActionDescriptor::Space { window: 1, space: 2 }, json!(["space", 1, 2])),
        (ActionDescriptor::TopTab { window: 0, tab: 5 }, json!(["topTab", 0, 5])),
        (
            ActionDescriptor::Full {
                window: 0,
                space: 1,
                tab: 3,
            },
            json!(["full", 0, 1, 3]),
        ),
        (ActionDescriptor::Error, json!(["error"])),
    ];

    for (descriptor, expected) in cases {
        assert_eq!(serde_json::to_value(descriptor).unwrap(), expected);
        let decoded: ActionDescriptor = serde_json::from_value(expected).unwrap();
        assert_eq!(decoded, descriptor);
    }
}

#[test]
fn malformed_descriptors_are_rejected() {
    assert!(serde_json::from_value::<ActionDescriptor>(json!(["space", 1])).is_err());
    assert!(serde_json::from_value::<ActionDescriptor>(json!(["teleport", 1, 2])).is_err());
    assert!(serde_json::from_value::<ActionDescriptor>(json!([])).is_err());
}

#[test]
fn document_has_items_with_launcher_fields() {
    let records = vec![TabRecord::Pinned {
        title: "Repo".to_string(),
        url: "https://github.com/acme".to_string(),
        space_index: 0,
        tab_index: 1,
        space_title: "Work".to_string(),
    }];
    let mut dynamic = DynamicState {
        number_of_windows: 1,
        ..DynamicState::default()
    };
    dynamic.window_active_spaces.insert(0, "Work".to_string());

    let response = ScriptFilterResponse::from(build(&records, &dynamic, true));
    let value: serde_json::Value = serde_json::from_str(&response.to_json(false).unwrap()).unwrap();

    let item = &value["items"][0];
    assert_eq!(item["title"], json!("⭕️ Repo"));
    assert_eq!(item["subtitle"], json!("Pinned Tab in 'Work': https://github.com/acme"));
    assert_eq!(item["arg"], json!(["full", 0, 0, 1]));
    assert_eq!(item["icon"]["path"], json!("./script-filter-item-icons/iconTabPinned.png"));
    assert_eq!(item["mods"]["ctrl"]["arg"], json!("https://github.com/acme"));
    assert_eq!(item["mods"]["shift"]["subtitle"], json!("Copy title"));
    assert_eq!(item["mods"]["alt"]["arg"], json!("flush-cache"));
    assert_eq!(item["mods"]["cmd"]["arg"], json!(["full", 0, 0, 1]));
    assert!(item.get("valid").is_none());
}

#[test]
fn notice_items_serialize_with_empty_mods() {
    let response = ScriptFilterResponse::from(vec![ResultItem::notice("No tabs found", "Nothing")]);
    let value = serde_json::to_value(&response).unwrap();

    assert_eq!(
        value,
        json!({
            "items": [{
                "title": "No tabs found",
                "subtitle": "Nothing",
                "arg": ["error"],
                "icon": {"path": "./script-filter-item-icons/iconAlert.png"},
                "mods": {}
            }]
        })
    );
}

#[test]
fn document_round_trips_through_json() {
    let response = ScriptFilterResponse::from(vec![ResultItem::notice("A", "B")]);
    let encoded = response.to_json(true).unwrap();
    let decoded: ScriptFilterResponse = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, response);
}
