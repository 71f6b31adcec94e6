mod client;
mod value;

pub use client::{Document, FirestoreClient};
pub use value::{TIMESTAMP_FIELD, Write, record_fields};

use anyhow::Result;
use jyut_types::VocabRecord;

/// Store one generated record with a server timestamp
pub async fn save_record(
    client: &FirestoreClient,
    collection: &str,
    record: &VocabRecord,
) -> Result<String> {
    let name = client.document_name(collection, &new_document_id());
    let write = Write::Set {
        name: name.clone(),
        fields: record_fields(record),
    };

    client.commit(&[write]).await?;
    Ok(name)
}

/// Delete every document in `collection`, then insert `records`
pub async fn replace_collection(
    client: &FirestoreClient,
    collection: &str,
    records: &[VocabRecord],
    batch_size: usize,
) -> Result<usize> {
    let existing = client.list_documents(collection).await?;
    let deletes: Vec<Write> = existing
        .into_iter()
        .map(|doc| Write::Delete { name: doc.name })
        .collect();

    let deleted = client.commit_batched(&deletes, batch_size).await?;
    tracing::info!("Deleted {} existing documents", deleted);

    let inserts: Vec<Write> = records
        .iter()
        .map(|record| Write::Set {
            name: client.document_name(collection, &new_document_id()),
            fields: record_fields(record),
        })
        .collect();

    let inserted = client.commit_batched(&inserts, batch_size).await?;
    tracing::info!("Uploaded {} entries to Firestore", inserted);

    Ok(inserted)
}

/// Stamp the server timestamp onto every document in `collection`
pub async fn add_timestamps(
    client: &FirestoreClient,
    collection: &str,
    batch_size: usize,
) -> Result<usize> {
    let documents = client.list_documents(collection).await?;
    tracing::info!("Found {} documents", documents.len());

    let touches: Vec<Write> = documents
        .into_iter()
        .map(|doc| Write::Touch { name: doc.name })
        .collect();

    client.commit_batched(&touches, batch_size).await
}

/// Auto IDs in the same 20 character alphanumeric shape Firestore clients use
fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..20].to_string()
}
