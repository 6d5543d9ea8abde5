//! Common step definitions used across features

use cucumber::{then, when};

use crate::features::support::TestWorld;
use hrms_portal::controller::NotificationLevel;

#[when("I open the departments screen")]
async fn open_departments_screen(world: &mut TestWorld) {
    world.open_screen().await;
}

#[then(expr = "I am notified {string}")]
async fn notified(world: &mut TestWorld, message: String) {
    let last = world.notifier.last().expect("No notification was raised");
    assert_eq!(last.message, message);
}

#[then(expr = "I see the error {string}")]
async fn notified_error(world: &mut TestWorld, message: String) {
    let last = world.notifier.last().expect("No notification was raised");
    assert_eq!(last.level, NotificationLevel::Error);
    assert_eq!(last.message, message);
}

#[then("no notification is shown")]
async fn no_notification(world: &mut TestWorld) {
    assert!(
        world.notifier.notifications().is_empty(),
        "Unexpected notifications: {:?}",
        world.notifier.notifications()
    );
}
