use crate::fixtures::test_app::TestApp;
use gatsishub_db::models::UserRole;
use serde_json::Value;

/// The fire-and-forget contract: creating a submission never moves the
/// quota counter; only verification does, exactly once.
#[tokio::test]
async fn submission_does_not_self_increment_quota() {
    let app = TestApp::spawn().await;
    let customer = app.signup_customer("sub1@gatsis.test", "Sub One").await;
    let worker = app
        .seed_staff("wrk1@gatsis.test", UserRole::Worker, "Worker One", None)
        .await;
    let ops = app
        .seed_staff("ops4@gatsis.test", UserRole::OperationalManager, "Ops", None)
        .await;

    let order_id = app.seed_order(customer.object_id(), 100).await;
    let quota_id = app.seed_quota("Week 32", 100, vec![order_id]).await;
    app.bump_quota_progress(quota_id, 40).await;

    // Worker reports 10 completed units
    let resp = app
        .auth_post("/api/submissions/create", &worker.access_token)
        .json(&serde_json::json!({
            "quota_id": quota_id.to_hex(),
            "order_id": order_id.to_hex(),
            "reported_completed": 10,
            "notes": "first batch",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let submission: Value = resp.json().await.unwrap();
    assert_eq!(submission["status"], "pending");
    let submission_id = submission["id"].as_str().unwrap().to_string();

    // Progress is still 40/100 before verification
    let resp = app
        .auth_get(
            &format!("/api/quotas/{}", quota_id.to_hex()),
            &ops.access_token,
        )
        .send()
        .await
        .unwrap();
    let quota: Value = resp.json().await.unwrap();
    assert_eq!(quota["finishedquota"], 40);
    assert_eq!(quota["targetquota"], 100);

    // Verification moves it to 50/100
    let resp = app
        .auth_patch(
            &format!("/api/submissions/{}/verify", submission_id),
            &ops.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .auth_get(
            &format!("/api/quotas/{}", quota_id.to_hex()),
            &ops.access_token,
        )
        .send()
        .await
        .unwrap();
    let quota: Value = resp.json().await.unwrap();
    assert_eq!(quota["finishedquota"], 50);

    // A second verify is a conflict and does not double-count
    let resp = app
        .auth_patch(
            &format!("/api/submissions/{}/verify", submission_id),
            &ops.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 409);

    let resp = app
        .auth_get(
            &format!("/api/quotas/{}", quota_id.to_hex()),
            &ops.access_token,
        )
        .send()
        .await
        .unwrap();
    let quota: Value = resp.json().await.unwrap();
    assert_eq!(quota["finishedquota"], 50);
}

#[tokio::test]
async fn rejected_submission_leaves_quota_untouched() {
    let app = TestApp::spawn().await;
    let customer = app.signup_customer("sub2@gatsis.test", "Sub Two").await;
    let worker = app
        .seed_staff("wrk2@gatsis.test", UserRole::Worker, "Worker Two", None)
        .await;
    let ops = app
        .seed_staff("ops5@gatsis.test", UserRole::OperationalManager, "Ops", None)
        .await;

    let order_id = app.seed_order(customer.object_id(), 100).await;
    let quota_id = app.seed_quota("Week 33", 200, vec![order_id]).await;

    let resp = app
        .auth_post("/api/submissions/create", &worker.access_token)
        .json(&serde_json::json!({
            "quota_id": quota_id.to_hex(),
            "order_id": order_id.to_hex(),
            "reported_completed": 25,
        }))
        .send()
        .await
        .unwrap();
    let submission: Value = resp.json().await.unwrap();
    let submission_id = submission["id"].as_str().unwrap().to_string();

    let resp = app
        .auth_patch(
            &format!("/api/submissions/{}/reject", submission_id),
            &ops.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "rejected");

    let resp = app
        .auth_get(
            &format!("/api/quotas/{}", quota_id.to_hex()),
            &ops.access_token,
        )
        .send()
        .await
        .unwrap();
    let quota: Value = resp.json().await.unwrap();
    assert_eq!(quota["finishedquota"], 0);

    // Verify after reject is a conflict too
    let resp = app
        .auth_patch(
            &format!("/api/submissions/{}/verify", submission_id),
            &ops.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 409);
}

#[tokio::test]
async fn invalid_submissions_are_rejected_up_front() {
    let app = TestApp::spawn().await;
    let customer = app.signup_customer("sub3@gatsis.test", "Sub Three").await;
    let worker = app
        .seed_staff("wrk3@gatsis.test", UserRole::Worker, "Worker Three", None)
        .await;

    let in_quota = app.seed_order(customer.object_id(), 100).await;
    let outside = app.seed_order(customer.object_id(), 100).await;
    let quota_id = app.seed_quota("Week 34", 100, vec![in_quota]).await;

    // Zero count
    let resp = app
        .auth_post("/api/submissions/create", &worker.access_token)
        .json(&serde_json::json!({
            "quota_id": quota_id.to_hex(),
            "order_id": in_quota.to_hex(),
            "reported_completed": 0,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);

    // Order not assigned to the quota
    let resp = app
        .auth_post("/api/submissions/create", &worker.access_token)
        .json(&serde_json::json!({
            "quota_id": quota_id.to_hex(),
            "order_id": outside.to_hex(),
            "reported_completed": 5,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);

    // Only workers submit
    let resp = app
        .auth_post("/api/submissions/create", &customer.access_token)
        .json(&serde_json::json!({
            "quota_id": quota_id.to_hex(),
            "order_id": in_quota.to_hex(),
            "reported_completed": 5,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}

#[tokio::test]
async fn submissions_notify_operational_managers() {
    let app = TestApp::spawn().await;
    let customer = app.signup_customer("sub4@gatsis.test", "Sub Four").await;
    let worker = app
        .seed_staff("wrk4@gatsis.test", UserRole::Worker, "Worker Four", None)
        .await;
    let ops = app
        .seed_staff("ops6@gatsis.test", UserRole::OperationalManager, "Ops", None)
        .await;

    let order_id = app.seed_order(customer.object_id(), 100).await;
    let quota_id = app.seed_quota("Week 35", 100, vec![order_id]).await;

    app.auth_post("/api/submissions/create", &worker.access_token)
        .json(&serde_json::json!({
            "quota_id": quota_id.to_hex(),
            "order_id": order_id.to_hex(),
            "reported_completed": 10,
        }))
        .send()
        .await
        .unwrap();

    let resp = app
        .auth_get(
            "/api/admin-notifications/operational_manager?filter=unread",
            &ops.access_token,
        )
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    let notifications = json.as_array().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["title"], "New production submission");

    // Staff can list the quota's submissions
    let resp = app
        .auth_get(
            &format!("/api/submissions/quota/{}", quota_id.to_hex()),
            &ops.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn active_quota_filter() {
    let app = TestApp::spawn().await;
    let customer = app.signup_customer("sub5@gatsis.test", "Sub Five").await;
    let ops = app
        .seed_staff("ops7@gatsis.test", UserRole::OperationalManager, "Ops", None)
        .await;

    let order_id = app.seed_order(customer.object_id(), 100).await;
    app.seed_quota("Active quota", 100, vec![order_id]).await;

    let resp = app
        .auth_get("/api/quotas?status=Active", &ops.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    let quotas = json.as_array().unwrap();
    assert_eq!(quotas.len(), 1);
    assert_eq!(quotas[0]["status"], "active");
}
