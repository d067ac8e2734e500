//! Broadcast fan-out: per-recipient failures are counted, never fatal.

use std::time::Duration;

use abot_core::{Content, FileRef, Media, MediaKind};
use audiobook_bot::flows::broadcast::{deliver, BroadcastPayload, BroadcastReport};
use storage::IdentityStore;

mod recording_bot;
use recording_bot::{Harness, RecordingBot, Sent};

const ADMIN: i64 = 1;

async fn register_users(h: &Harness, ids: impl IntoIterator<Item = i64>) {
    for id in ids {
        h.identity
            .register_user(id, &format!("User {}", id))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_deliver_counts_failures() {
    let bot = RecordingBot::failing_for([2]);
    let report = deliver(
        &bot,
        &[1, 2, 3],
        &BroadcastPayload::Text("Salom".to_string()),
        Duration::ZERO,
    )
    .await;

    assert_eq!(
        report,
        BroadcastReport {
            total: 3,
            sent: 2,
            failed: 1
        }
    );
    assert!(bot.sent_to(1).iter().all(|s| s.text() == "Salom"));
    assert!(bot.sent_to(2).is_empty());
}

#[tokio::test]
async fn test_deliver_to_nobody() {
    let bot = RecordingBot::new();
    let report = deliver(
        &bot,
        &[],
        &BroadcastPayload::Text("Salom".to_string()),
        Duration::from_millis(10),
    )
    .await;
    assert_eq!(report, BroadcastReport::default());
    assert!(bot.sent().is_empty());
}

#[tokio::test]
async fn test_text_broadcast_reports_failures() {
    let h = Harness::with_bot(RecordingBot::failing_for([3, 5]), &[ADMIN]).await;
    register_users(&h, 1..=5).await;

    h.click(ADMIN, "admin_broadcast").await;
    assert_eq!(h.session(ADMIN).await, Some(("broadcast", "awaiting_message")));

    h.text(ADMIN, "Yangi <kitob>").await;
    assert_eq!(
        h.bot.last_text(),
        "📨 Matn yuborilsinmi?\n\nYangi &lt;kitob&gt;"
    );
    assert!(h.bot.last_keyboard().find("confirm_broadcast").is_some());
    assert_eq!(h.session(ADMIN).await, Some(("broadcast", "confirming")));

    h.click(ADMIN, "confirm_broadcast").await;
    let report = h.bot.last_text();
    assert!(report.contains("Umumiy foydalanuvchilar: 5"));
    assert!(report.contains("Yuborilganlar: 3"));
    assert!(report.contains("Xatoliklar: 2"));
    assert!(h.session(ADMIN).await.is_none());

    for id in [2, 4] {
        let received = h.bot.sent_to(id);
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].text(), "Yangi &lt;kitob&gt;");
    }
    assert!(h.bot.sent_to(3).is_empty());
}

#[tokio::test]
async fn test_media_broadcast_keeps_caption() {
    let h = Harness::new(&[ADMIN]).await;
    register_users(&h, [ADMIN, 2]).await;
    let photo = Media {
        kind: MediaKind::Photo,
        file: FileRef::Id("photo-1".to_string()),
    };

    h.click(ADMIN, "admin_broadcast").await;
    h.content(
        ADMIN,
        Content::Media {
            media: photo.clone(),
            caption: Some("Aksiya & chegirma".to_string()),
        },
    )
    .await;
    match h.bot.last() {
        Sent::Media {
            chat_id,
            media,
            caption,
            keyboard,
        } => {
            assert_eq!(chat_id, ADMIN);
            assert_eq!(media, photo);
            assert_eq!(
                caption.as_deref(),
                Some("Aksiya &amp; chegirma\n\n📸 Xabarni yuborishni tasdiqlaysizmi?")
            );
            assert!(keyboard.unwrap().find("confirm_broadcast").is_some());
        }
        other => panic!("expected a media preview, got {:?}", other),
    }

    h.click(ADMIN, "confirm_broadcast").await;
    let received = h.bot.sent_to(2);
    assert_eq!(received.len(), 1);
    assert_eq!(
        received[0],
        Sent::Media {
            chat_id: 2,
            media: photo,
            caption: Some("Aksiya &amp; chegirma".to_string()),
            keyboard: None,
        }
    );
    assert!(h.bot.last_text().contains("Yuborilganlar: 2"));
}

#[tokio::test]
async fn test_unsupported_content_reprompts() {
    let h = Harness::new(&[ADMIN]).await;

    h.click(ADMIN, "admin_broadcast").await;
    h.content(ADMIN, Content::Unsupported).await;
    assert!(h.bot.last_text().starts_with("❌ Ushbu turdagi fayl"));
    assert_eq!(h.session(ADMIN).await, Some(("broadcast", "awaiting_message")));
}

#[tokio::test]
async fn test_cancel_sends_nothing() {
    let h = Harness::new(&[ADMIN]).await;
    register_users(&h, [ADMIN, 2, 3]).await;

    h.click(ADMIN, "admin_broadcast").await;
    h.text(ADMIN, "Salom").await;
    h.text(ADMIN, "yana matn").await;
    assert!(h.bot.last_text().starts_with("👆 Yuborishni tasdiqlang"));
    assert_eq!(h.session(ADMIN).await, Some(("broadcast", "confirming")));

    h.click(ADMIN, "cancel_broadcast").await;
    assert_eq!(h.bot.last_text(), "❌ Xabar yuborish bekor qilindi.");
    assert!(h.session(ADMIN).await.is_none());
    assert!(h.bot.sent_to(2).is_empty());
    assert!(h.bot.sent_to(3).is_empty());
}
