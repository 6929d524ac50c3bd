use mongodb::{Database, IndexModel, options::IndexOptions};
use tracing::info;

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Users
    create_indexes(
        db,
        "users",
        vec![
            index_unique(bson::doc! { "email": 1 }),
            index(bson::doc! { "role": 1 }),
            index(bson::doc! { "employee.team_id": 1 }),
        ],
    )
    .await?;

    // Messages
    create_indexes(
        db,
        "messages",
        vec![
            index(bson::doc! { "customer_id": 1, "employee_id": 1, "created_at": 1 }),
            index(bson::doc! { "employee_id": 1, "created_at": -1 }),
            index(bson::doc! { "customer_id": 1, "created_at": -1 }),
        ],
    )
    .await?;

    // Notifications
    create_indexes(
        db,
        "notifications",
        vec![
            index(bson::doc! { "customer_id": 1, "is_read": 1, "created_at": -1 }),
            index(bson::doc! { "order_id": 1 }),
        ],
    )
    .await?;

    // Admin Notifications
    create_indexes(
        db,
        "admin_notifications",
        vec![index(
            bson::doc! { "target_role": 1, "is_read": 1, "created_at": -1 },
        )],
    )
    .await?;

    // Orders
    create_indexes(
        db,
        "orders",
        vec![
            index(bson::doc! { "customer_id": 1, "created_at": -1 }),
            index(bson::doc! { "status": 1, "deadline": 1 }),
        ],
    )
    .await?;

    // Order Logs
    create_indexes(
        db,
        "order_logs",
        vec![index(bson::doc! { "order_id": 1, "created_at": 1 })],
    )
    .await?;

    // Materials
    create_indexes(
        db,
        "materials",
        vec![
            index_unique(bson::doc! { "material_name": 1 }),
            index(bson::doc! { "is_active": 1, "material_name": 1 }),
        ],
    )
    .await?;

    // Teams
    create_indexes(
        db,
        "teams",
        vec![
            index_unique(bson::doc! { "name": 1 }),
            index(bson::doc! { "member_ids": 1 }),
        ],
    )
    .await?;

    // Quotas
    create_indexes(
        db,
        "quotas",
        vec![
            index(bson::doc! { "status": 1, "starts_at": -1 }),
            index(bson::doc! { "order_ids": 1 }),
        ],
    )
    .await?;

    // Submissions
    create_indexes(
        db,
        "submissions",
        vec![
            index(bson::doc! { "quota_id": 1, "created_at": -1 }),
            index(bson::doc! { "employee_id": 1, "created_at": -1 }),
            index(bson::doc! { "status": 1 }),
        ],
    )
    .await?;

    // Login Codes
    create_indexes(
        db,
        "login_codes",
        vec![
            index(bson::doc! { "user_id": 1, "created_at": -1 }),
            index_ttl(bson::doc! { "expires_at": 1 }),
        ],
    )
    .await?;

    info!("All indexes ensured");
    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn index_unique(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

fn index_ttl(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(
            IndexOptions::builder()
                .expire_after(std::time::Duration::from_secs(24 * 3600))
                .build(),
        )
        .build()
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await?;
    info!(collection, "Indexes created");
    Ok(())
}
