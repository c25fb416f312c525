use pokerroom_service::{ServiceConfig, TableRegistry, init_logging, init_test_logging};
use serial_test::serial;
use tracing::Level;

fn registry() -> TableRegistry {
    TableRegistry::new(ServiceConfig {
        bot_delay_ms: 0,
        ..Default::default()
    })
    .unwrap()
}

#[test]
#[serial]
fn table_creation_and_hand_start_are_logged() {
    let logs = init_test_logging();
    let reg = registry();
    let id = reg.create_table_with_seed(3, Some(1)).unwrap();
    reg.start_hand(&id).unwrap();

    let entries = logs.entries();
    let created = entries
        .iter()
        .find(|e| e.message.contains("table created"))
        .expect("creation logged");
    assert_eq!(created.level, Level::INFO);
    assert_eq!(created.field("table_id"), Some(id.as_str()));
    assert_eq!(created.field("seats"), Some("3"));

    assert!(entries
        .iter()
        .any(|e| e.message.contains("hand started") && e.field("hand") == Some("1")));
}

#[test]
#[serial]
fn stale_stamps_warn_and_rejections_inform() {
    let logs = init_test_logging();
    let reg = registry();
    let id = reg.create_table_with_seed(2, Some(2)).unwrap();
    reg.start_hand(&id).unwrap();

    let first = reg.pending_bot_turn(&id).unwrap().unwrap();
    reg.run_bots(&id).unwrap();
    assert!(!reg.apply_stamped(&id, first.stamp, first.action).unwrap());

    reg.join_seat(&id, 0, "").unwrap_err();

    let entries = logs.entries();
    assert!(entries
        .iter()
        .any(|e| e.level == Level::WARN && e.message.contains("stale")));
    assert!(entries.iter().any(|e| e.level == Level::INFO
        && e.message.contains("request rejected")
        && e.field("code") == Some("invalid_name")));
    assert!(entries
        .iter()
        .any(|e| e.level == Level::DEBUG && e.message.contains("action applied")));
}

#[test]
#[serial]
fn second_global_subscriber_is_reported() {
    let _logs = init_test_logging();
    assert!(init_logging().is_err());
}
