use bson::Document;
use mongodb::{Database, IndexModel, options::IndexOptions};
use tracing::info;

use crate::models::{Doctor, User};

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    create_indexes(
        db,
        User::COLLECTION,
        vec![
            index_unique(bson::doc! { "email": 1 }),
            index(bson::doc! { "role": 1 }),
        ],
    )
    .await?;

    create_indexes(
        db,
        Doctor::COLLECTION,
        vec![
            index_unique(bson::doc! { "user_id": 1 }),
            index(bson::doc! { "specialization": 1, "name": 1 }),
        ],
    )
    .await?;

    info!("MongoDB indexes ensured");
    Ok(())
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<Document>(collection)
        .create_indexes(indexes)
        .await?;
    Ok(())
}

fn index(keys: Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn index_unique(keys: Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}
