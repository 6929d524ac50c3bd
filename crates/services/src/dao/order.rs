use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;

use gatsishub_db::models::{Order, OrderLog, OrderStatus};

use super::base::{BaseDao, DaoResult, PaginatedResult, PaginationParams};

pub struct OrderDao {
    pub base: BaseDao<Order>,
    pub logs: BaseDao<OrderLog>,
}

impl OrderDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Order::COLLECTION),
            logs: BaseDao::new(db, OrderLog::COLLECTION),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        customer_id: ObjectId,
        quantity: i64,
        total_price: f64,
        deadline: Option<DateTime>,
        company_name: String,
        contact_person: String,
        delivery_address: Option<String>,
    ) -> DaoResult<Order> {
        let now = DateTime::now();
        let order = Order {
            id: None,
            customer_id,
            status: OrderStatus::Pending,
            quantity,
            total_price,
            deadline,
            company_name,
            contact_person,
            delivery_address,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&order).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_all(&self, params: &PaginationParams) -> DaoResult<PaginatedResult<Order>> {
        self.base
            .find_paginated(doc! {}, Some(doc! { "created_at": -1 }), params)
            .await
    }

    pub async fn find_by_customer(&self, customer_id: ObjectId) -> DaoResult<Vec<Order>> {
        self.base
            .find_many(
                doc! { "customer_id": customer_id },
                Some(doc! { "created_at": -1 }),
            )
            .await
    }

    pub async fn find_by_ids(&self, ids: &[ObjectId]) -> DaoResult<Vec<Order>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.base
            .find_many(
                doc! { "_id": { "$in": ids } },
                Some(doc! { "deadline": 1 }),
            )
            .await
    }

    /// Transition the status and append the matching history row.
    pub async fn update_status(
        &self,
        order_id: ObjectId,
        status: OrderStatus,
        note: Option<String>,
        actor_id: ObjectId,
    ) -> DaoResult<Order> {
        self.base.find_by_id(order_id).await?;

        self.base
            .update_by_id(
                order_id,
                doc! { "$set": {
                    "status": status.as_str(),
                    "updated_at": DateTime::now(),
                }},
            )
            .await?;

        let log = OrderLog {
            id: None,
            order_id,
            status,
            note,
            actor_id,
            created_at: DateTime::now(),
        };
        self.logs.insert_one(&log).await?;

        self.base.find_by_id(order_id).await
    }

    /// Status history of one order, oldest first.
    pub async fn find_logs(&self, order_id: ObjectId) -> DaoResult<Vec<OrderLog>> {
        self.logs
            .find_many(doc! { "order_id": order_id }, Some(doc! { "created_at": 1 }))
            .await
    }
}
