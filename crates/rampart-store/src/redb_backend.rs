// Copyright 2026 Rampart Dev
// SPDX-License-Identifier: Apache-2.0

//! redb-based policy storage backend.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{TimeZone, Utc};
use rampart_core::error::{Error, S3ErrorCode};
use rampart_core::types::{AccountId, BucketInfo, StoredPolicy};
use rampart_core::{Result, StoreConfig, SyncStrategy};
use redb::{Database, Durability, ReadableDatabase, ReadableTable, TableDefinition};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::PolicyBackend;

// === Table Definitions ===

/// Buckets table: bucket_name -> StoredBucketRecord (bincode)
const BUCKETS: TableDefinition<'_, &str, &[u8]> = TableDefinition::new("buckets");

/// Policies table: bucket_name -> StoredPolicyRecord (bincode)
const POLICIES: TableDefinition<'_, &str, &[u8]> = TableDefinition::new("policies");

// === Stored Types (for bincode serialization) ===

#[derive(Serialize, Deserialize)]
struct StoredBucketRecord {
    name: String,
    owner: String,
    created_at_millis: i64,
}

impl StoredBucketRecord {
    fn from_bucket_info(info: &BucketInfo) -> Self {
        Self {
            name: info.name.clone(),
            owner: info.owner.as_str().to_string(),
            created_at_millis: info.created_at.timestamp_millis(),
        }
    }

    fn to_bucket_info(&self) -> BucketInfo {
        BucketInfo {
            name: self.name.clone(),
            owner: AccountId::new(&self.owner),
            created_at: Utc
                .timestamp_millis_opt(self.created_at_millis)
                .single()
                .unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct StoredPolicyRecord {
    /// The document exactly as submitted.
    raw: Vec<u8>,
    last_modified_millis: i64,
}

impl StoredPolicyRecord {
    fn to_stored_policy(&self) -> StoredPolicy {
        StoredPolicy {
            raw: Bytes::from(self.raw.clone()),
            last_modified: Utc
                .timestamp_millis_opt(self.last_modified_millis)
                .single()
                .unwrap_or_else(Utc::now),
        }
    }
}

/// Convert any error with Display to our Error type.
fn db_err(e: impl std::fmt::Display) -> Error {
    Error::Database(e.to_string())
}

/// redb-based policy store.
///
/// All mutations go through redb write transactions, which serialize per
/// database, so a concurrent reader observes either the fully-old or
/// fully-new document for a bucket, never a partial write.
pub struct RedbPolicyStore {
    db: Arc<Database>,
    durability: Durability,
    retry_attempts: u32,
}

impl RedbPolicyStore {
    /// Open or create a redb database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open(path: &Path, config: &StoreConfig) -> Result<Self> {
        debug!(?path, sync = ?config.sync, "Opening redb policy store");

        let db = Database::create(path).map_err(db_err)?;

        // Initialize tables by opening them in a write transaction so
        // reads never race table creation
        {
            let txn = db.begin_write().map_err(db_err)?;
            let _ = txn.open_table(BUCKETS).map_err(db_err)?;
            let _ = txn.open_table(POLICIES).map_err(db_err)?;
            txn.commit().map_err(db_err)?;
        }

        Ok(Self {
            db: Arc::new(db),
            durability: Self::sync_to_durability(config.sync),
            retry_attempts: config.retry_attempts.max(1),
        })
    }

    /// Open an in-memory database for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let db = Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())
            .map_err(db_err)?;

        {
            let txn = db.begin_write().map_err(db_err)?;
            let _ = txn.open_table(BUCKETS).map_err(db_err)?;
            let _ = txn.open_table(POLICIES).map_err(db_err)?;
            txn.commit().map_err(db_err)?;
        }

        Ok(Self { db: Arc::new(db), durability: Durability::None, retry_attempts: 3 })
    }

    /// Map SyncStrategy to redb Durability.
    fn sync_to_durability(strategy: SyncStrategy) -> Durability {
        match strategy {
            SyncStrategy::Always => Durability::Immediate,
            SyncStrategy::None => Durability::None,
        }
    }

    /// Run a blocking database operation on the blocking pool, retrying
    /// transient faults up to the configured attempt count.
    ///
    /// Domain errors (`Error::S3`) are deterministic and returned on the
    /// first occurrence.
    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: Fn() -> Result<T> + Clone + Send + 'static,
    {
        let mut attempt = 1;
        loop {
            let op = op.clone();
            let result = tokio::task::spawn_blocking(op).await.map_err(db_err)?;

            match result {
                Err(e) if e.is_transient() && attempt < self.retry_attempts => {
                    warn!(attempt, error = %e, "Transient storage fault, retrying");
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

fn no_such_bucket(name: &str) -> Error {
    Error::s3_with_resource(
        S3ErrorCode::NoSuchBucket,
        "The specified bucket does not exist",
        name,
    )
}

#[async_trait]
impl PolicyBackend for RedbPolicyStore {
    async fn create_bucket(&self, name: &str, owner: AccountId) -> Result<BucketInfo> {
        let name = name.to_string();
        let now = Utc::now();
        let db = Arc::clone(&self.db);
        let durability = self.durability;

        self.run(move || {
            let mut txn = db.begin_write().map_err(db_err)?;

            let info = {
                let mut table = txn.open_table(BUCKETS).map_err(db_err)?;

                if table.get(name.as_str()).map_err(db_err)?.is_some() {
                    return Err(Error::s3_with_resource(
                        S3ErrorCode::BucketAlreadyExists,
                        "The bucket already exists",
                        name.clone(),
                    ));
                }

                let info = BucketInfo { name: name.clone(), owner: owner.clone(), created_at: now };
                let stored = StoredBucketRecord::from_bucket_info(&info);
                let serialized = bincode::serialize(&stored).map_err(db_err)?;

                table.insert(name.as_str(), serialized.as_slice()).map_err(db_err)?;
                info
            };

            txn.set_durability(durability).map_err(db_err)?;
            txn.commit().map_err(db_err)?;

            Ok(info)
        })
        .await
    }

    async fn delete_bucket(&self, name: &str) -> Result<()> {
        let name = name.to_string();
        let db = Arc::clone(&self.db);
        let durability = self.durability;

        self.run(move || {
            let mut txn = db.begin_write().map_err(db_err)?;

            {
                let mut buckets_table = txn.open_table(BUCKETS).map_err(db_err)?;

                if buckets_table.get(name.as_str()).map_err(db_err)?.is_none() {
                    return Err(no_such_bucket(&name));
                }

                buckets_table.remove(name.as_str()).map_err(db_err)?;

                // Bucket deletion discards any stored policy
                let mut policies_table = txn.open_table(POLICIES).map_err(db_err)?;
                policies_table.remove(name.as_str()).map_err(db_err)?;
            }

            txn.set_durability(durability).map_err(db_err)?;
            txn.commit().map_err(db_err)?;

            Ok(())
        })
        .await
    }

    async fn bucket_exists(&self, name: &str) -> Result<bool> {
        let name = name.to_string();
        let db = Arc::clone(&self.db);

        self.run(move || {
            let txn = db.begin_read().map_err(db_err)?;
            let table = txn.open_table(BUCKETS).map_err(db_err)?;

            Ok(table.get(name.as_str()).map_err(db_err)?.is_some())
        })
        .await
    }

    async fn get_bucket(&self, name: &str) -> Result<BucketInfo> {
        let name = name.to_string();
        let db = Arc::clone(&self.db);

        self.run(move || {
            let txn = db.begin_read().map_err(db_err)?;
            let table = txn.open_table(BUCKETS).map_err(db_err)?;

            match table.get(name.as_str()).map_err(db_err)? {
                Some(value) => {
                    let stored: StoredBucketRecord =
                        bincode::deserialize(value.value()).map_err(db_err)?;
                    Ok(stored.to_bucket_info())
                }
                None => Err(no_such_bucket(&name)),
            }
        })
        .await
    }

    async fn get_policy(&self, name: &str) -> Result<StoredPolicy> {
        let name = name.to_string();
        let db = Arc::clone(&self.db);

        self.run(move || {
            let txn = db.begin_read().map_err(db_err)?;

            // Bucket absence is reported before policy absence
            let buckets_table = txn.open_table(BUCKETS).map_err(db_err)?;
            if buckets_table.get(name.as_str()).map_err(db_err)?.is_none() {
                return Err(no_such_bucket(&name));
            }

            let policies_table = txn.open_table(POLICIES).map_err(db_err)?;
            match policies_table.get(name.as_str()).map_err(db_err)? {
                Some(value) => {
                    let stored: StoredPolicyRecord =
                        bincode::deserialize(value.value()).map_err(db_err)?;
                    Ok(stored.to_stored_policy())
                }
                None => Err(Error::s3_with_resource(
                    S3ErrorCode::NoSuchBucketPolicy,
                    "The bucket policy does not exist",
                    name.clone(),
                )),
            }
        })
        .await
    }

    async fn put_policy(&self, name: &str, raw: Bytes) -> Result<()> {
        let name = name.to_string();
        let db = Arc::clone(&self.db);
        let durability = self.durability;

        self.run(move || {
            let mut txn = db.begin_write().map_err(db_err)?;

            {
                let buckets_table = txn.open_table(BUCKETS).map_err(db_err)?;
                if buckets_table.get(name.as_str()).map_err(db_err)?.is_none() {
                    return Err(no_such_bucket(&name));
                }

                let record = StoredPolicyRecord {
                    raw: raw.to_vec(),
                    last_modified_millis: Utc::now().timestamp_millis(),
                };
                let serialized = bincode::serialize(&record).map_err(db_err)?;

                // Full replace of any existing document
                let mut policies_table = txn.open_table(POLICIES).map_err(db_err)?;
                policies_table.insert(name.as_str(), serialized.as_slice()).map_err(db_err)?;
            }

            txn.set_durability(durability).map_err(db_err)?;
            txn.commit().map_err(db_err)?;

            debug!(bucket = %name, "Stored bucket policy");
            Ok(())
        })
        .await
    }

    async fn delete_policy(&self, name: &str) -> Result<()> {
        let name = name.to_string();
        let db = Arc::clone(&self.db);
        let durability = self.durability;

        self.run(move || {
            let mut txn = db.begin_write().map_err(db_err)?;

            {
                let buckets_table = txn.open_table(BUCKETS).map_err(db_err)?;
                if buckets_table.get(name.as_str()).map_err(db_err)?.is_none() {
                    return Err(no_such_bucket(&name));
                }

                // Removing an absent policy is not an error here
                let mut policies_table = txn.open_table(POLICIES).map_err(db_err)?;
                policies_table.remove(name.as_str()).map_err(db_err)?;
            }

            txn.set_durability(durability).map_err(db_err)?;
            txn.commit().map_err(db_err)?;

            Ok(())
        })
        .await
    }
}
