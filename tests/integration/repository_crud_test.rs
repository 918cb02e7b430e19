// End-to-end CRUD behavior against a real MongoDB instance.
//
// Requires MONGODB_URI to point at a running server; each test binds a
// uniquely named database and drops it on completion. Tests skip silently
// when no server is configured.

use docstore::{doc, Document, ObjectId, Repository, StoreContext};
use futures_util::TryStreamExt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Customer {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    tier: String,
}

impl Document for Customer {
    const COLLECTION: &'static str = "customers";

    fn id(&self) -> ObjectId {
        self.id
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = id;
    }
}

impl Customer {
    fn new(name: &str, tier: &str) -> Self {
        Customer {
            id: ObjectId::new(),
            name: name.to_string(),
            tier: tier.to_string(),
        }
    }
}

fn test_context() -> Option<StoreContext> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docstore=debug".into()),
        )
        .try_init();

    let uri = match std::env::var("MONGODB_URI") {
        Ok(uri) => uri,
        Err(_) => {
            eprintln!("MONGODB_URI not set; skipping");
            return None;
        }
    };

    let database = format!("docstore_test_{}", ObjectId::new().to_hex());
    Some(StoreContext::new(database, uri))
}

async fn drop_database(context: &StoreContext) {
    let client = docstore::mongodb::Client::with_uri_str(&context.connection_string)
        .await
        .expect("client for cleanup");
    client
        .database(&context.database_name)
        .drop()
        .await
        .expect("drop test database");
}

#[tokio::test]
async fn insert_then_find_by_id_round_trips() {
    let Some(context) = test_context() else { return };
    let repo = Repository::<Customer>::connect(&context).await.unwrap();

    let customer = Customer::new("Ada", "gold");
    repo.insert_one(&customer).await.unwrap();

    let found = repo
        .find_by_id(&customer.id.to_hex())
        .await
        .unwrap()
        .expect("inserted customer");

    assert_eq!(found, customer);
    assert_eq!(found.created_at(), customer.created_at());

    drop_database(&context).await;
}

#[tokio::test]
async fn full_document_lifecycle() {
    let Some(context) = test_context() else { return };
    let repo = Repository::<Customer>::connect(&context).await.unwrap();

    let mut customer = Customer::new("Grace", "silver");
    repo.insert_one(&customer).await.unwrap();

    let id = customer.id.to_hex();
    assert_eq!(repo.find_by_id(&id).await.unwrap().unwrap().tier, "silver");

    customer.tier = "gold".to_string();
    repo.replace_one(&customer).await.unwrap();
    assert_eq!(repo.find_by_id(&id).await.unwrap().unwrap().tier, "gold");

    repo.delete_by_id(&id).await.unwrap();
    assert!(repo.find_by_id(&id).await.unwrap().is_none());

    drop_database(&context).await;
}

#[tokio::test]
async fn find_yields_an_empty_stream_when_nothing_matches() {
    let Some(context) = test_context() else { return };
    let repo = Repository::<Customer>::connect(&context).await.unwrap();

    let matches: Vec<Customer> = repo
        .find(doc! { "tier": "platinum" })
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert!(matches.is_empty());
    assert!(repo
        .find_one(doc! { "tier": "platinum" })
        .await
        .unwrap()
        .is_none());

    drop_database(&context).await;
}

#[tokio::test]
async fn find_filters_on_document_fields() {
    let Some(context) = test_context() else { return };
    let repo = Repository::<Customer>::connect(&context).await.unwrap();

    repo.insert_many(&[
        Customer::new("Ada", "gold"),
        Customer::new("Grace", "silver"),
        Customer::new("Edsger", "gold"),
    ])
    .await
    .unwrap();

    let gold: Vec<Customer> = repo
        .find(doc! { "tier": "gold" })
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(gold.len(), 2);
    assert!(gold.iter().all(|c| c.tier == "gold"));

    drop_database(&context).await;
}

#[tokio::test]
async fn projection_is_computed_store_side() {
    #[derive(Debug, Deserialize)]
    struct NameOnly {
        name: String,
    }

    let Some(context) = test_context() else { return };
    let repo = Repository::<Customer>::connect(&context).await.unwrap();

    repo.insert_many(&[Customer::new("Ada", "gold"), Customer::new("Grace", "silver")])
        .await
        .unwrap();

    let mut names: Vec<String> = repo
        .find_projected::<NameOnly>(doc! {}, doc! { "name": 1, "_id": 0 })
        .await
        .unwrap()
        .try_collect::<Vec<_>>()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    names.sort();

    assert_eq!(names, vec!["Ada".to_string(), "Grace".to_string()]);

    drop_database(&context).await;
}

#[tokio::test]
async fn delete_by_id_is_an_idempotent_noop_on_absence() {
    let Some(context) = test_context() else { return };
    let repo = Repository::<Customer>::connect(&context).await.unwrap();

    let absent = ObjectId::new().to_hex();
    repo.delete_by_id(&absent).await.unwrap();

    let customer = Customer::new("Ada", "gold");
    repo.insert_one(&customer).await.unwrap();

    let id = customer.id.to_hex();
    repo.delete_by_id(&id).await.unwrap();
    repo.delete_by_id(&id).await.unwrap();
    assert!(repo.find_by_id(&id).await.unwrap().is_none());

    drop_database(&context).await;
}

#[tokio::test]
async fn delete_many_removes_all_matches_and_tolerates_none() {
    let Some(context) = test_context() else { return };
    let repo = Repository::<Customer>::connect(&context).await.unwrap();

    repo.delete_many(doc! { "tier": "gold" }).await.unwrap();

    repo.insert_many(&[
        Customer::new("Ada", "gold"),
        Customer::new("Grace", "gold"),
        Customer::new("Edsger", "silver"),
    ])
    .await
    .unwrap();

    repo.delete_many(doc! { "tier": "gold" }).await.unwrap();

    let remaining: Vec<Customer> = repo.find(doc! {}).await.unwrap().try_collect().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].tier, "silver");

    drop_database(&context).await;
}

#[tokio::test]
async fn replace_one_with_missing_identity_is_a_noop() {
    let Some(context) = test_context() else { return };
    let repo = Repository::<Customer>::connect(&context).await.unwrap();

    let never_inserted = Customer::new("Ghost", "gold");
    repo.replace_one(&never_inserted).await.unwrap();

    assert!(repo
        .find_by_id(&never_inserted.id.to_hex())
        .await
        .unwrap()
        .is_none());

    drop_database(&context).await;
}

#[tokio::test]
async fn insert_many_surfaces_a_duplicate_id_conflict() {
    let Some(context) = test_context() else { return };
    let repo = Repository::<Customer>::connect(&context).await.unwrap();

    let customer = Customer::new("Ada", "gold");
    let err = repo
        .insert_many(&[customer.clone(), customer])
        .await
        .unwrap_err();

    assert!(err.is_duplicate_key(), "got: {:?}", err);

    drop_database(&context).await;
}

#[tokio::test]
async fn insert_one_surfaces_a_duplicate_id_conflict() {
    let Some(context) = test_context() else { return };
    let repo = Repository::<Customer>::connect(&context).await.unwrap();

    let customer = Customer::new("Ada", "gold");
    repo.insert_one(&customer).await.unwrap();

    let err = repo.insert_one(&customer).await.unwrap_err();
    assert!(err.is_duplicate_key(), "got: {:?}", err);

    drop_database(&context).await;
}

#[tokio::test]
async fn find_by_id_rejects_a_malformed_id_before_querying() {
    let Some(context) = test_context() else { return };
    let repo = Repository::<Customer>::connect(&context).await.unwrap();

    let err = repo.find_by_id("definitely-not-an-id").await.unwrap_err();
    assert!(matches!(err, docstore::StoreError::InvalidId { .. }));

    drop_database(&context).await;
}
