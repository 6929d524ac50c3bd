use crate::fixtures::test_app::TestApp;
use base64::Engine;
use gatsishub_db::models::UserRole;
use serde_json::Value;

#[tokio::test]
async fn fresh_pair_has_no_conversations_until_first_send() {
    let app = TestApp::spawn().await;
    let customer = app.signup_customer("conv1@gatsis.test", "Conv One").await;
    let admin = app
        .seed_staff("emp1@gatsis.test", UserRole::SalesAdmin, "Emp One", None)
        .await;

    // Empty list, not an error
    let resp = app
        .auth_get(
            &format!("/api/messages/conversations/customer/{}", customer.id),
            &customer.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json.as_array().unwrap().len(), 0);

    // One send creates the conversation
    let resp = app
        .auth_post("/api/messages/send", &customer.access_token)
        .json(&serde_json::json!({
            "customerid": customer.id,
            "employeeid": admin.id,
            "message": "Hello",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .auth_get(
            &format!("/api/messages/conversations/customer/{}", customer.id),
            &customer.access_token,
        )
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    let conversations = json.as_array().unwrap();
    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0]["lastMessage"], "Hello");
    assert_eq!(conversations[0]["counterpart_id"], admin.id.as_str());
}

#[tokio::test]
async fn thread_is_ordered_and_complete() {
    let app = TestApp::spawn().await;
    let customer = app.signup_customer("conv2@gatsis.test", "Conv Two").await;
    let admin = app
        .seed_staff("emp2@gatsis.test", UserRole::SalesAdmin, "Emp Two", None)
        .await;

    // Alternating senders
    for i in 1..=6 {
        let (token, text) = if i % 2 == 1 {
            (&customer.access_token, format!("customer {}", i))
        } else {
            (&admin.access_token, format!("staff {}", i))
        };
        let resp = app
            .auth_post("/api/messages/send", token)
            .json(&serde_json::json!({
                "customerid": customer.id,
                "employeeid": admin.id,
                "message": text,
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 200);
    }

    let resp = app
        .auth_get(
            &format!("/api/messages/conversation/{}/{}", customer.id, admin.id),
            &admin.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let json: Value = resp.json().await.unwrap();
    let messages = json.as_array().unwrap();
    assert_eq!(messages.len(), 6);

    // Non-decreasing timestamps
    let timestamps: Vec<&str> = messages
        .iter()
        .map(|m| m["timestamp"].as_str().unwrap())
        .collect();
    for pair in timestamps.windows(2) {
        assert!(pair[0] <= pair[1], "messages must be in timestamp order");
    }
}

#[tokio::test]
async fn empty_send_is_rejected() {
    let app = TestApp::spawn().await;
    let customer = app.signup_customer("conv3@gatsis.test", "Conv Three").await;
    let admin = app
        .seed_staff("emp3@gatsis.test", UserRole::SalesAdmin, "Emp Three", None)
        .await;

    let resp = app
        .auth_post("/api/messages/send", &customer.access_token)
        .json(&serde_json::json!({
            "customerid": customer.id,
            "employeeid": admin.id,
            "message": "   ",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn attachment_roundtrip_and_size_cap() {
    let app = TestApp::spawn().await;
    let customer = app.signup_customer("conv4@gatsis.test", "Conv Four").await;
    let admin = app
        .seed_staff("emp4@gatsis.test", UserRole::SalesAdmin, "Emp Four", None)
        .await;

    let payload = base64::engine::general_purpose::STANDARD.encode(b"fake-png-bytes");
    let resp = app
        .auth_post("/api/messages/send", &customer.access_token)
        .json(&serde_json::json!({
            "customerid": customer.id,
            "employeeid": admin.id,
            "attachment": {
                "filename": "design.png",
                "content_type": "image/png",
                "data_base64": payload,
            },
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["has_file"], true);
    assert_eq!(json["attachment"]["filename"], "design.png");

    // Oversized attachment is refused server-side
    let big = vec![0u8; (app.settings.uploads.max_attachment_bytes + 1) as usize];
    let payload = base64::engine::general_purpose::STANDARD.encode(&big);
    let resp = app
        .auth_post("/api/messages/send", &customer.access_token)
        .json(&serde_json::json!({
            "customerid": customer.id,
            "employeeid": admin.id,
            "attachment": {
                "filename": "huge.bin",
                "content_type": "application/octet-stream",
                "data_base64": payload,
            },
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn non_participants_cannot_read_or_send() {
    let app = TestApp::spawn().await;
    let customer = app.signup_customer("conv5@gatsis.test", "Conv Five").await;
    let intruder = app.signup_customer("intruder@gatsis.test", "Intruder").await;
    let admin = app
        .seed_staff("emp5@gatsis.test", UserRole::SalesAdmin, "Emp Five", None)
        .await;

    app.auth_post("/api/messages/send", &customer.access_token)
        .json(&serde_json::json!({
            "customerid": customer.id,
            "employeeid": admin.id,
            "message": "private",
        }))
        .send()
        .await
        .unwrap();

    let resp = app
        .auth_get(
            &format!("/api/messages/conversation/{}/{}", customer.id, admin.id),
            &intruder.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);

    let resp = app
        .auth_post("/api/messages/send", &intruder.access_token)
        .json(&serde_json::json!({
            "customerid": customer.id,
            "employeeid": admin.id,
            "message": "spoofed",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}

#[tokio::test]
async fn staff_conversation_list_groups_by_customer() {
    let app = TestApp::spawn().await;
    let c1 = app.signup_customer("convc1@gatsis.test", "Customer One").await;
    let c2 = app.signup_customer("convc2@gatsis.test", "Customer Two").await;
    let admin = app
        .seed_staff("emp6@gatsis.test", UserRole::SalesAdmin, "Emp Six", None)
        .await;

    for (customer, text) in [(&c1, "from one"), (&c2, "from two")] {
        app.auth_post("/api/messages/send", &customer.access_token)
            .json(&serde_json::json!({
                "customerid": customer.id,
                "employeeid": admin.id,
                "message": text,
            }))
            .send()
            .await
            .unwrap();
    }

    let resp = app
        .auth_get("/api/messages/conversations/admin", &admin.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    let conversations = json.as_array().unwrap();
    assert_eq!(conversations.len(), 2);

    // Newest activity first
    assert_eq!(conversations[0]["lastMessage"], "from two");
    assert_eq!(conversations[0]["counterpart_name"], "Customer Two");
}
