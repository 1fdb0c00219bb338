mod common;

use std::sync::Arc;
use std::time::Duration;

use blockform::alert::alert_model::{Alert, AlertKind, AlertNode};
use blockform::alert::presenter::InstantPresenter;
use blockform::alert::queue::AlertQueue;
use blockform::form::form_model::{Control, Form, FormDocument, Opacity};
use common::{RecordingPresenter, StalledPresenter, TRANSITION};
use tokio::time::Instant;

fn queue() -> (Arc<AlertQueue>, Arc<RecordingPresenter>) {
    let presenter = Arc::new(RecordingPresenter::new());
    let form = Form::new(common::contact_document());
    (Arc::new(AlertQueue::new(form, presenter.clone())), presenter)
}

// =========================================================================
// show
// =========================================================================

#[tokio::test(start_paused = true)]
async fn show_inserts_one_node_per_alert_and_keeps_lock() {
    let (queue, presenter) = queue();
    let alerts = vec![Alert::success("Saved"), Alert::info("Mail queued")];

    let start = Instant::now();
    queue.show(&alerts).await;
    assert!(start.elapsed() >= TRANSITION);

    let form = queue.form();
    let region = form.alert_region().unwrap();
    assert!(!region.hidden);
    assert_eq!(region.opacity, Opacity::Opaque);
    assert_eq!(region.nodes.len(), 2);
    assert_eq!(region.nodes[0].class, "blockform-alert--success");
    assert_eq!(region.nodes[1].kind, AlertKind::Info);
    assert!(form.is_locked());
    assert!(form.snapshot().controls.iter().all(|c| c.disabled));

    assert_eq!(presenter.texts(), vec![vec!["Saved", "Mail queued"]]);
}

#[tokio::test(start_paused = true)]
async fn show_replaces_previous_content() {
    let (queue, _) = queue();

    queue.show(&[Alert::info("one"), Alert::info("two")]).await;
    queue.show(&[Alert::danger("three")]).await;

    let nodes = queue.form().alert_region().unwrap().nodes;
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].text, "three");
}

#[tokio::test(start_paused = true)]
async fn show_with_no_alerts_leaves_empty_visible_region() {
    let (queue, _) = queue();
    queue.show(&[]).await;

    let region = queue.form().alert_region().unwrap();
    assert!(!region.hidden);
    assert!(region.nodes.is_empty());
    assert!(queue.form().is_locked());
}

#[test]
fn alert_nodes_carry_clean_text() {
    let node = AlertNode::from(&Alert::danger("<strong>Error:</strong> try&nbsp;again"));
    assert_eq!(node.text, "Error: try again");
    assert_eq!(node.class, "blockform-alert--danger");
}

#[test]
fn alert_serializes_kind_as_type() {
    let json = serde_json::to_value(Alert::warning("Careful")).unwrap();
    assert_eq!(json, serde_json::json!({"text": "Careful", "type": "warning"}));
}

// =========================================================================
// show_then_hide
// =========================================================================

#[tokio::test(start_paused = true)]
async fn show_then_hide_restores_the_form() {
    let (queue, presenter) = queue();
    let wait = Duration::from_millis(5000);

    let start = Instant::now();
    queue.show_then_hide(&[Alert::success("Thanks")], wait).await;
    assert!(start.elapsed() >= wait + TRANSITION * 2);

    let form = queue.form();
    let region = form.alert_region().unwrap();
    assert!(region.hidden);
    assert!(region.nodes.is_empty());
    assert_eq!(region.opacity, Opacity::Transparent);
    assert!(!form.is_locked());
    assert!(form.snapshot().controls.iter().all(|c| !c.disabled));
    assert_eq!(presenter.renders().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn alerts_stay_visible_during_the_wait() {
    let (queue, _) = queue();

    let task = {
        let queue = queue.clone();
        tokio::spawn(async move {
            queue
                .show_then_hide(&[Alert::info("Hold on")], Duration::from_secs(5))
                .await
        })
    };

    tokio::time::sleep(Duration::from_secs(3)).await;
    let region = queue.form().alert_region().unwrap();
    assert!(!region.hidden);
    assert_eq!(region.nodes[0].text, "Hold on");
    assert!(queue.form().is_locked());

    task.await.unwrap();
    assert!(queue.form().alert_region().unwrap().hidden);
}

#[tokio::test(start_paused = true)]
async fn newer_sequence_supersedes_pending_hide() {
    let (queue, _) = queue();

    let first = {
        let queue = queue.clone();
        tokio::spawn(async move {
            queue
                .show_then_hide(&[Alert::info("first")], Duration::from_secs(5))
                .await
        })
    };
    tokio::time::sleep(Duration::from_secs(1)).await;

    let second = {
        let queue = queue.clone();
        tokio::spawn(async move {
            queue
                .show_then_hide(&[Alert::success("second")], Duration::from_secs(5))
                .await
        })
    };

    // Past the point where the first hide would have fired
    tokio::time::sleep(Duration::from_secs(5)).await;
    let region = queue.form().alert_region().unwrap();
    assert!(!region.hidden);
    assert_eq!(region.nodes.len(), 1);
    assert_eq!(region.nodes[0].text, "second");
    assert!(queue.form().is_locked());

    first.await.unwrap();
    second.await.unwrap();
    let region = queue.form().alert_region().unwrap();
    assert!(region.hidden);
    assert!(!queue.form().is_locked());
}

#[tokio::test(start_paused = true)]
async fn show_on_the_hide_deadline_stays_visible() {
    for _ in 0..50 {
        let form = Form::new(common::contact_document());
        let queue = Arc::new(AlertQueue::new(form, Arc::new(InstantPresenter)));

        let second = {
            let queue = queue.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(1)).await;
                queue.show(&[Alert::info("second")]).await
            })
        };
        let first = {
            let queue = queue.clone();
            tokio::spawn(async move {
                queue
                    .show_then_hide(&[Alert::info("first")], Duration::from_secs(1))
                    .await
            })
        };

        first.await.unwrap();
        second.await.unwrap();

        let region = queue.form().alert_region().unwrap();
        assert!(!region.hidden);
        assert_eq!(region.opacity, Opacity::Opaque);
        assert_eq!(region.nodes.len(), 1);
        assert_eq!(region.nodes[0].text, "second");
        assert!(queue.form().is_locked());
    }
}

#[tokio::test(start_paused = true)]
async fn stale_sequence_leaves_newer_region_untouched() {
    let (queue, _) = queue();

    let first = {
        let queue = queue.clone();
        tokio::spawn(async move {
            queue
                .show_then_hide(&[Alert::info("first")], Duration::from_secs(2))
                .await
        })
    };
    tokio::time::sleep(Duration::from_secs(1)).await;
    queue.show(&[Alert::danger("second")]).await;
    first.await.unwrap();

    tokio::time::sleep(Duration::from_secs(10)).await;
    let region = queue.form().alert_region().unwrap();
    assert!(!region.hidden);
    assert_eq!(region.opacity, Opacity::Opaque);
    assert_eq!(region.nodes[0].text, "second");
}

#[tokio::test(start_paused = true)]
async fn hide_closes_a_plain_show() {
    let (queue, _) = queue();
    queue.show(&[Alert::info("Connecting...")]).await;
    queue.hide().await;

    let region = queue.form().alert_region().unwrap();
    assert!(region.hidden);
    assert!(region.nodes.is_empty());
    assert!(!queue.form().is_locked());
}

// =========================================================================
// Edge cases
// =========================================================================

#[tokio::test(start_paused = true)]
async fn missing_region_is_a_no_op() {
    let doc = FormDocument::new("bare", "").with_control(Control::input("name", "text"));
    let queue = AlertQueue::new(Form::new(doc), Arc::new(InstantPresenter));

    let start = Instant::now();
    queue
        .show_then_hide(&[Alert::danger("nobody sees this")], Duration::from_secs(5))
        .await;

    assert_eq!(start.elapsed(), Duration::ZERO);
    assert!(queue.form().alert_region().is_none());
    assert!(!queue.form().is_locked());
}

#[tokio::test(start_paused = true)]
async fn stalled_presenter_falls_back_after_timeout() {
    let form = Form::new(common::contact_document());
    let queue = AlertQueue::new(form, Arc::new(StalledPresenter))
        .with_fallback(Duration::from_millis(2000));

    let start = Instant::now();
    queue
        .show_then_hide(&[Alert::info("slow")], Duration::from_millis(1000))
        .await;

    assert!(start.elapsed() >= Duration::from_millis(5000));
    let region = queue.form().alert_region().unwrap();
    assert!(region.hidden);
    assert!(!queue.form().is_locked());
}
