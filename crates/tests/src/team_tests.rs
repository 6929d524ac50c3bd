use crate::fixtures::test_app::TestApp;
use gatsishub_db::models::UserRole;
use serde_json::Value;

#[tokio::test]
async fn employee_orders_resolve_through_team() {
    let app = TestApp::spawn().await;
    let customer = app.signup_customer("team1@gatsis.test", "Team One").await;
    let worker = app
        .seed_staff("wrk5@gatsis.test", UserRole::Worker, "Worker Five", None)
        .await;

    let team_id = app.seed_team("Alpha", vec![worker.object_id()]).await;
    let assigned = app.seed_order(customer.object_id(), 100).await;
    let unassigned = app.seed_order(customer.object_id(), 200).await;
    app.assign_order_to_team(team_id, assigned).await;

    let resp = app
        .auth_get(
            &format!("/api/teams/employee/{}/orders", worker.id),
            &worker.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let json: Value = resp.json().await.unwrap();
    let orders = json.as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["orderid"], assigned.to_hex());
    assert_ne!(orders[0]["orderid"], unassigned.to_hex());
}

#[tokio::test]
async fn employee_without_team_is_not_found() {
    let app = TestApp::spawn().await;
    let worker = app
        .seed_staff("wrk6@gatsis.test", UserRole::Worker, "Worker Six", None)
        .await;

    let resp = app
        .auth_get(
            &format!("/api/teams/employee/{}/orders", worker.id),
            &worker.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn customers_cannot_browse_team_boards() {
    let app = TestApp::spawn().await;
    let customer = app.signup_customer("team2@gatsis.test", "Team Two").await;

    let resp = app
        .auth_get(
            &format!("/api/teams/employee/{}/orders", customer.id),
            &customer.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}
