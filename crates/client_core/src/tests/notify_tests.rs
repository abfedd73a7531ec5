use std::time::Duration;

use crate::notify::{
    Notification, NotificationChannel, NotificationEvent, NotificationKind, DISMISS_AFTER,
};

fn drain(rx: &mut tokio::sync::broadcast::Receiver<NotificationEvent>) -> (usize, usize) {
    let mut shown = 0;
    let mut cleared = 0;
    while let Ok(event) = rx.try_recv() {
        match event {
            NotificationEvent::Shown(_) => shown += 1,
            NotificationEvent::Cleared => cleared += 1,
        }
    }
    (shown, cleared)
}

#[tokio::test(start_paused = true)]
async fn notification_clears_after_dismiss_window() {
    let channel = NotificationChannel::new();
    channel
        .show(NotificationKind::Success, "User saved successfully!")
        .await;
    assert_eq!(
        channel.current().await,
        Some(Notification {
            kind: NotificationKind::Success,
            message: "User saved successfully!".into(),
        })
    );

    tokio::time::sleep(DISMISS_AFTER + Duration::from_millis(10)).await;
    assert_eq!(channel.current().await, None);
}

#[tokio::test(start_paused = true)]
async fn notification_survives_until_the_deadline() {
    let channel = NotificationChannel::new();
    channel.show(NotificationKind::Error, "Failed to save user").await;

    tokio::time::sleep(DISMISS_AFTER - Duration::from_millis(10)).await;
    assert!(channel.current().await.is_some());
}

#[tokio::test(start_paused = true)]
async fn replacement_restarts_the_dismiss_window() {
    let channel = NotificationChannel::new();
    let mut rx = channel.subscribe();

    channel.show(NotificationKind::Success, "A").await;
    tokio::time::sleep(Duration::from_millis(1000)).await;
    channel.show(NotificationKind::Error, "B").await;

    // 3500 ms after the first show: the first timer's deadline has passed,
    // but it must not have cleared the replacement.
    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(
        channel.current().await,
        Some(Notification {
            kind: NotificationKind::Error,
            message: "B".into(),
        })
    );

    // 3000 ms after the second show the slot empties, exactly once.
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(channel.current().await, None);

    let (shown, cleared) = drain(&mut rx);
    assert_eq!(shown, 2);
    assert_eq!(cleared, 1);
}

#[tokio::test(start_paused = true)]
async fn each_show_emits_an_event() {
    let channel = NotificationChannel::new();
    let mut rx = channel.subscribe();

    channel.show(NotificationKind::Success, "first").await;
    channel.show(NotificationKind::Error, "second").await;

    let (shown, cleared) = drain(&mut rx);
    assert_eq!(shown, 2);
    assert_eq!(cleared, 0);
}
