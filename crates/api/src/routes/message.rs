use axum::{
    Json,
    extract::{Path, State},
};
use base64::Engine;
use bson::oid::ObjectId;
use gatsishub_db::models::{Message, MessageAttachment, SenderType, UserRole};
use gatsishub_services::dao::message::ConversationSummary;
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub customerid: String,
    pub employeeid: String,
    pub message: Option<String>,
    pub attachment: Option<AttachmentRequest>,
}

#[derive(Debug, Deserialize)]
pub struct AttachmentRequest {
    pub filename: String,
    pub content_type: String,
    pub data_base64: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: String,
    pub customerid: String,
    pub employeeid: String,
    pub sender: String,
    pub sender_name: String,
    pub message: String,
    pub has_file: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<AttachmentResponse>,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct AttachmentResponse {
    pub filename: String,
    pub content_type: String,
    pub size: u64,
    pub data_base64: String,
}

#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub counterpart_id: String,
    pub counterpart_name: String,
    #[serde(rename = "lastMessage")]
    pub last_message: String,
    #[serde(rename = "lastMessageTime")]
    pub last_message_time: String,
    pub last_sender: String,
}

/// Staff view: one summary per customer this staff member has messaged with.
pub async fn conversations_admin(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<ConversationResponse>>, ApiError> {
    auth.require_staff()?;

    let summaries = state
        .messages
        .conversations_for_employee(auth.user_id)
        .await?;

    Ok(Json(resolve_names(&state, summaries).await?))
}

/// Customer view: one summary per staff counterpart.
pub async fn conversations_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<ConversationResponse>>, ApiError> {
    let customer_id = ObjectId::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid customer id".to_string()))?;

    // A customer may only list their own conversations; staff may look up any
    if auth.role == UserRole::Customer && auth.user_id != customer_id {
        return Err(ApiError::Forbidden("Not your conversations".to_string()));
    }

    let summaries = state
        .messages
        .conversations_for_customer(customer_id)
        .await?;

    Ok(Json(resolve_names(&state, summaries).await?))
}

/// Full ordered thread for one (customer, employee) pair.
pub async fn conversation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((customer_id, employee_id)): Path<(String, String)>,
) -> Result<Json<Vec<MessageResponse>>, ApiError> {
    let cid = ObjectId::parse_str(&customer_id)
        .map_err(|_| ApiError::BadRequest("Invalid customer id".to_string()))?;
    let eid = ObjectId::parse_str(&employee_id)
        .map_err(|_| ApiError::BadRequest("Invalid employee id".to_string()))?;

    require_participant(&auth, cid, eid)?;

    let messages = state.messages.find_conversation(cid, eid).await?;
    let response: Vec<MessageResponse> = messages.into_iter().map(to_response).collect();

    Ok(Json(response))
}

pub async fn send(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<SendMessageRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let cid = ObjectId::parse_str(&body.customerid)
        .map_err(|_| ApiError::BadRequest("Invalid customer id".to_string()))?;
    let eid = ObjectId::parse_str(&body.employeeid)
        .map_err(|_| ApiError::BadRequest("Invalid employee id".to_string()))?;

    require_participant(&auth, cid, eid)?;

    let content = body.message.unwrap_or_default().trim().to_string();

    let attachment = match body.attachment {
        Some(att) => Some(decode_attachment(&state, att)?),
        None => None,
    };

    if content.is_empty() && attachment.is_none() {
        return Err(ApiError::BadRequest(
            "Message text or attachment is required".to_string(),
        ));
    }

    let sender = if auth.role == UserRole::Customer {
        SenderType::Customer
    } else {
        SenderType::Staff
    };

    let sender_name = state
        .users
        .find_active_by_id(auth.user_id)
        .await
        .map(|u| u.display_name())
        .unwrap_or_else(|_| auth.email.clone());

    let message = state
        .messages
        .create(cid, eid, sender, sender_name, content, attachment)
        .await?;

    let response = to_response(message);

    // Change-feed fan-out: both participants' sockets plus the conversation
    // topic. The event carries ids only; clients refetch the thread.
    let event = serde_json::json!({
        "type": "message:create",
        "data": {
            "message_id": response.id,
            "customerid": body.customerid,
            "employeeid": body.employeeid,
            "sender": response.sender,
        }
    });
    crate::ws::dispatcher::broadcast(&state.ws_storage, &[cid, eid], &event).await;
    let topic = format!("conversation:{}:{}", body.customerid, body.employeeid);
    crate::ws::dispatcher::publish(&state.ws_storage, &topic, &event).await;

    Ok(Json(response))
}

fn require_participant(
    auth: &AuthUser,
    customer_id: ObjectId,
    employee_id: ObjectId,
) -> Result<(), ApiError> {
    let is_participant = match auth.role {
        UserRole::Customer => auth.user_id == customer_id,
        _ => auth.user_id == employee_id,
    };
    if !is_participant {
        return Err(ApiError::Forbidden(
            "Not a participant in this conversation".to_string(),
        ));
    }
    Ok(())
}

fn decode_attachment(
    state: &AppState,
    att: AttachmentRequest,
) -> Result<MessageAttachment, ApiError> {
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(att.data_base64.as_bytes())
        .map_err(|_| ApiError::BadRequest("Attachment is not valid base64".to_string()))?;

    let max = state.settings.uploads.max_attachment_bytes;
    if decoded.len() as u64 > max {
        return Err(ApiError::BadRequest(format!(
            "Attachment exceeds the {} byte limit",
            max
        )));
    }

    Ok(MessageAttachment {
        filename: att.filename,
        content_type: att.content_type,
        size: decoded.len() as u64,
        data_base64: att.data_base64,
    })
}

async fn resolve_names(
    state: &AppState,
    summaries: Vec<ConversationSummary>,
) -> Result<Vec<ConversationResponse>, ApiError> {
    let mut response = Vec::with_capacity(summaries.len());
    for summary in summaries {
        let counterpart_name = state
            .users
            .find_active_by_id(summary.counterpart_id)
            .await
            .map(|u| u.display_name())
            .unwrap_or_else(|_| "Unknown".to_string());

        response.push(ConversationResponse {
            counterpart_id: summary.counterpart_id.to_hex(),
            counterpart_name,
            last_message: summary.last_message,
            last_message_time: summary
                .last_message_at
                .try_to_rfc3339_string()
                .unwrap_or_default(),
            last_sender: sender_str(summary.last_sender).to_string(),
        });
    }
    Ok(response)
}

fn sender_str(sender: SenderType) -> &'static str {
    match sender {
        SenderType::Customer => "customer",
        SenderType::Staff => "staff",
    }
}

fn to_response(m: Message) -> MessageResponse {
    MessageResponse {
        id: m.id.unwrap().to_hex(),
        customerid: m.customer_id.to_hex(),
        employeeid: m.employee_id.to_hex(),
        sender: sender_str(m.sender).to_string(),
        sender_name: m.sender_name,
        message: m.content,
        has_file: m.attachment.is_some(),
        attachment: m.attachment.map(|a| AttachmentResponse {
            filename: a.filename,
            content_type: a.content_type,
            size: a.size,
            data_base64: a.data_base64,
        }),
        timestamp: m.created_at.try_to_rfc3339_string().unwrap_or_default(),
    }
}
