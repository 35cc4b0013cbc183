#![cfg(feature = "db-tests")]
//! PostgreSQL-backed store tests. Requires a reachable database configured
//! through the `ROSTER_DB_*` variables.

use std::sync::Arc;

use roster_api::{AgentService, ApiResult, CreateAgentRequest, DbClient, DbConfig};
use roster_core::{format_timestamp, Agent, RosterError, StorageError, SYSTEM_CREATOR};
use roster_storage::{AgentRow, AgentStore, AGENT_NAME_CONSTRAINT};
use roster_test_utils::{named_draft, test_allow_lists};
use uuid::Uuid;

async fn test_db() -> ApiResult<DbClient> {
    let db = DbClient::from_config(&DbConfig::from_env())?;
    db.migrate().await?;
    Ok(db)
}

fn unique_name() -> String {
    format!("db-test-{}", &Uuid::now_v7().simple().to_string()[..16])
}

#[tokio::test]
async fn test_save_then_exists() -> Result<(), Box<dyn std::error::Error>> {
    let db = test_db().await?;
    let name = unique_name();
    assert!(!db.exists_by_name(&name).await?);

    let agent = Agent::register(named_draft(&name), SYSTEM_CREATOR);
    let saved = Agent::from(db.save(AgentRow::from(&agent)).await?);

    assert_eq!(saved.id, agent.id);
    assert_eq!(saved.draft(), agent.draft());
    // The column keeps microseconds; compare at wire precision.
    assert_eq!(
        format_timestamp(&saved.created_at),
        format_timestamp(&agent.created_at)
    );
    assert!(db.exists_by_name(&name).await?);
    Ok(())
}

#[tokio::test]
async fn test_duplicate_name_violates_unique_constraint() -> Result<(), Box<dyn std::error::Error>>
{
    let db = test_db().await?;
    let name = unique_name();

    let first = Agent::register(named_draft(&name), SYSTEM_CREATOR);
    db.save(AgentRow::from(&first)).await?;

    let second = Agent::register(named_draft(&name), SYSTEM_CREATOR);
    let err = db.save(AgentRow::from(&second)).await;
    assert!(matches!(
        err,
        Err(StorageError::UniqueViolation { ref constraint }) if constraint == AGENT_NAME_CONSTRAINT
    ));
    Ok(())
}

#[tokio::test]
async fn test_service_reports_duplicate_from_database() -> Result<(), Box<dyn std::error::Error>> {
    let db = test_db().await?;
    let service = AgentService::new(Arc::new(db), Arc::new(test_allow_lists()));
    let name = unique_name();
    let req = CreateAgentRequest::from(named_draft(&name));

    service.create_agent(req.clone()).await?;
    let err = service.create_agent(req).await;
    assert!(matches!(err, Err(RosterError::NameExists { name: ref n }) if *n == name));
    Ok(())
}

#[tokio::test]
async fn test_ping() -> Result<(), Box<dyn std::error::Error>> {
    let db = test_db().await?;
    db.ping().await?;
    Ok(())
}
