use bson::{DateTime, doc, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::Database;

use gatsishub_db::models::{Message, MessageAttachment, SenderType};

use super::base::{BaseDao, DaoResult};

/// One row per conversation partner, carrying the latest message for the
/// list view. Conversations are derived from messages, never stored.
#[derive(Debug, Clone)]
pub struct ConversationSummary {
    pub counterpart_id: ObjectId,
    pub last_message: String,
    pub last_message_at: DateTime,
    pub last_sender: SenderType,
}

pub struct MessageDao {
    pub base: BaseDao<Message>,
}

impl MessageDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Message::COLLECTION),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        customer_id: ObjectId,
        employee_id: ObjectId,
        sender: SenderType,
        sender_name: String,
        content: String,
        attachment: Option<MessageAttachment>,
    ) -> DaoResult<Message> {
        let message = Message {
            id: None,
            customer_id,
            employee_id,
            sender,
            sender_name,
            content,
            attachment,
            created_at: DateTime::now(),
        };

        let id = self.base.insert_one(&message).await?;
        self.base.find_by_id(id).await
    }

    /// Full thread for one (customer, employee) pair, oldest first.
    pub async fn find_conversation(
        &self,
        customer_id: ObjectId,
        employee_id: ObjectId,
    ) -> DaoResult<Vec<Message>> {
        self.base
            .find_many(
                doc! { "customer_id": customer_id, "employee_id": employee_id },
                Some(doc! { "created_at": 1 }),
            )
            .await
    }

    /// Conversation summaries for a customer, newest activity first.
    /// Counterparts are the staff members the customer has messaged with.
    pub async fn conversations_for_customer(
        &self,
        customer_id: ObjectId,
    ) -> DaoResult<Vec<ConversationSummary>> {
        self.summaries(doc! { "customer_id": customer_id }, "$employee_id")
            .await
    }

    /// Conversation summaries for a staff member; counterparts are customers.
    pub async fn conversations_for_employee(
        &self,
        employee_id: ObjectId,
    ) -> DaoResult<Vec<ConversationSummary>> {
        self.summaries(doc! { "employee_id": employee_id }, "$customer_id")
            .await
    }

    async fn summaries(
        &self,
        filter: bson::Document,
        group_key: &str,
    ) -> DaoResult<Vec<ConversationSummary>> {
        let pipeline = vec![
            doc! { "$match": filter },
            doc! { "$sort": { "created_at": -1 } },
            doc! { "$group": {
                "_id": group_key,
                "last": { "$first": "$$ROOT" },
            }},
            doc! { "$sort": { "last.created_at": -1 } },
        ];

        let mut cursor = self.base.collection().aggregate(pipeline).await?;
        let mut summaries = Vec::new();
        while let Some(doc) = cursor.try_next().await? {
            let counterpart_id = doc
                .get_object_id("_id")
                .map_err(|_| super::base::DaoError::Validation("Bad group key".to_string()))?;
            let last: Message = bson::from_document(
                doc.get_document("last")
                    .map_err(|_| {
                        super::base::DaoError::Validation("Missing last message".to_string())
                    })?
                    .clone(),
            )?;
            summaries.push(ConversationSummary {
                counterpart_id,
                last_message: last.content,
                last_message_at: last.created_at,
                last_sender: last.sender,
            });
        }
        Ok(summaries)
    }
}
