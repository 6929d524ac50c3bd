use crate::fixtures::test_app::TestApp;
use gatsishub_db::models::UserRole;
use serde_json::Value;

#[tokio::test]
async fn create_and_list_materials() {
    let app = TestApp::spawn().await;
    let admin = app
        .seed_staff("sales@gatsis.test", UserRole::SalesAdmin, "Sales Admin", None)
        .await;

    let resp = app
        .auth_post("/api/materials", &admin.access_token)
        .json(&serde_json::json!({
            "materialname": "Beechwood",
            "features": ["sturdy", "sustainable"],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    let resp = app
        .auth_get("/api/materials", &admin.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let json: Value = resp.json().await.unwrap();
    let materials = json["materials"].as_array().unwrap();
    let matching: Vec<_> = materials
        .iter()
        .filter(|m| m["materialname"] == "Beechwood")
        .collect();
    assert_eq!(matching.len(), 1, "Created material appears exactly once");
}

#[tokio::test]
async fn duplicate_name_is_bad_request() {
    let app = TestApp::spawn().await;
    let admin = app
        .seed_staff("sales2@gatsis.test", UserRole::SalesAdmin, "Sales Admin", None)
        .await;

    let body = serde_json::json!({ "materialname": "Velvet", "features": [] });

    let resp = app
        .auth_post("/api/materials", &admin.access_token)
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    let resp = app
        .auth_post("/api/materials", &admin.access_token)
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn missing_name_is_bad_request() {
    let app = TestApp::spawn().await;
    let admin = app
        .seed_staff("sales3@gatsis.test", UserRole::SalesAdmin, "Sales Admin", None)
        .await;

    let resp = app
        .auth_post("/api/materials", &admin.access_token)
        .json(&serde_json::json!({ "features": ["nice"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn partial_update_preserves_other_fields() {
    let app = TestApp::spawn().await;
    let admin = app
        .seed_staff("sales4@gatsis.test", UserRole::SalesAdmin, "Sales Admin", None)
        .await;

    let resp = app
        .auth_post("/api/materials", &admin.access_token)
        .json(&serde_json::json!({
            "materialname": "Walnut",
            "features": ["dark", "heavy"],
        }))
        .send()
        .await
        .unwrap();
    let created: Value = resp.json().await.unwrap();
    let id = created["material"]["id"].as_str().unwrap();
    let created_updated_at = created["material"]["updated_at"].as_str().unwrap().to_string();

    let resp = app
        .auth_patch(&format!("/api/materials/{}", id), &admin.access_token)
        .json(&serde_json::json!({ "is_active": false }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let json: Value = resp.json().await.unwrap();
    let material = &json["material"];
    assert_eq!(material["materialname"], "Walnut");
    assert_eq!(material["features"], serde_json::json!(["dark", "heavy"]));
    assert_eq!(material["is_active"], false);
    let patched_updated_at = material["updated_at"].as_str().unwrap();
    assert!(
        patched_updated_at >= created_updated_at.as_str(),
        "updated_at must advance"
    );
}

#[tokio::test]
async fn update_unknown_id_is_not_found() {
    let app = TestApp::spawn().await;
    let admin = app
        .seed_staff("sales5@gatsis.test", UserRole::SalesAdmin, "Sales Admin", None)
        .await;

    let resp = app
        .auth_patch(
            "/api/materials/ffffffffffffffffffffffff",
            &admin.access_token,
        )
        .json(&serde_json::json!({ "is_active": false }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn inactive_filter_excludes_disabled() {
    let app = TestApp::spawn().await;
    let admin = app
        .seed_staff("sales6@gatsis.test", UserRole::SalesAdmin, "Sales Admin", None)
        .await;

    for name in ["Oak", "Pine"] {
        app.auth_post("/api/materials", &admin.access_token)
            .json(&serde_json::json!({ "materialname": name, "features": [] }))
            .send()
            .await
            .unwrap();
    }

    // Disable Pine
    let resp = app
        .auth_get("/api/materials", &admin.access_token)
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    let pine_id = json["materials"]
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["materialname"] == "Pine")
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    app.auth_patch(&format!("/api/materials/{}", pine_id), &admin.access_token)
        .json(&serde_json::json!({ "is_active": false }))
        .send()
        .await
        .unwrap();

    let resp = app
        .auth_get("/api/materials?is_active=true", &admin.access_token)
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    let names: Vec<&str> = json["materials"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["materialname"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"Oak"));
    assert!(!names.contains(&"Pine"));
}

#[tokio::test]
async fn delete_removes_material() {
    let app = TestApp::spawn().await;
    let admin = app
        .seed_staff("sales7@gatsis.test", UserRole::SalesAdmin, "Sales Admin", None)
        .await;

    let resp = app
        .auth_post("/api/materials", &admin.access_token)
        .json(&serde_json::json!({ "materialname": "Bamboo", "features": [] }))
        .send()
        .await
        .unwrap();
    let created: Value = resp.json().await.unwrap();
    let id = created["material"]["id"].as_str().unwrap().to_string();

    let resp = app
        .auth_delete(&format!("/api/materials/{}", id), &admin.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .auth_get("/api/materials", &admin.access_token)
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert!(
        json["materials"]
            .as_array()
            .unwrap()
            .iter()
            .all(|m| m["materialname"] != "Bamboo")
    );
}

#[tokio::test]
async fn customers_cannot_manage_materials() {
    let app = TestApp::spawn().await;
    let customer = app.signup_customer("cust@gatsis.test", "Cust Co").await;

    let resp = app
        .auth_get("/api/materials", &customer.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);

    let resp = app
        .auth_post("/api/materials", &customer.access_token)
        .json(&serde_json::json!({ "materialname": "Nope", "features": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}
