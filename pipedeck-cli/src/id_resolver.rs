//! ID resolver module
//!
//! Resolves UUID prefixes to full UUIDs by listing the resource through the
//! API, so users can type short, unambiguous prefixes.

use anyhow::{Context, Result, anyhow};
use pipedeck_client::PipedeckClient;
use uuid::Uuid;

use crate::types::IdOrPrefix;

/// Resolve a pipeline ID or prefix to a full UUID
pub async fn resolve_pipeline_id(client: &PipedeckClient, id: &IdOrPrefix) -> Result<Uuid> {
    let prefix = match id {
        IdOrPrefix::Full(uuid) => return Ok(*uuid),
        IdOrPrefix::Prefix(prefix) => prefix,
    };

    let pipelines = client
        .list_pipelines()
        .await
        .context("Failed to fetch pipelines for ID resolution")?;

    match_prefix("pipeline", prefix, pipelines.iter().map(|p| p.pipeline.id))
}

/// Resolve an execution ID or prefix to a full UUID
///
/// Only the recent executions the server lists are searched.
pub async fn resolve_execution_id(client: &PipedeckClient, id: &IdOrPrefix) -> Result<Uuid> {
    let prefix = match id {
        IdOrPrefix::Full(uuid) => return Ok(*uuid),
        IdOrPrefix::Prefix(prefix) => prefix,
    };

    let executions = client
        .list_executions()
        .await
        .context("Failed to fetch executions for ID resolution")?;

    match_prefix("execution", prefix, executions.iter().map(|e| e.execution.id))
}

/// Pick the single candidate whose ID starts with `prefix`
fn match_prefix(
    kind: &str,
    prefix: &str,
    candidates: impl IntoIterator<Item = Uuid>,
) -> Result<Uuid> {
    let matches: Vec<Uuid> = candidates
        .into_iter()
        .filter(|id| id.to_string().starts_with(prefix))
        .collect();

    match matches.as_slice() {
        [] => Err(anyhow!("No {} found with ID starting with '{}'", kind, prefix)),
        [id] => Ok(*id),
        _ => {
            let ids: Vec<String> = matches.iter().map(Uuid::to_string).collect();
            Err(anyhow!(
                "Ambiguous prefix '{}' matches multiple {}s: {}",
                prefix,
                kind,
                ids.join(", ")
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Uuid {
        Uuid::parse_str(s).unwrap()
    }

    #[test]
    fn test_unique_prefix() {
        let a = id("3f2a0000-0000-4000-8000-000000000001");
        let b = id("9c1d0000-0000-4000-8000-000000000002");
        assert_eq!(match_prefix("pipeline", "3f", [a, b]).unwrap(), a);
    }

    #[test]
    fn test_no_match() {
        let a = id("3f2a0000-0000-4000-8000-000000000001");
        let err = match_prefix("pipeline", "ff", [a]).unwrap_err();
        assert!(err.to_string().contains("No pipeline found"));
    }

    #[test]
    fn test_ambiguous_prefix() {
        let a = id("3f2a0000-0000-4000-8000-000000000001");
        let b = id("3f2b0000-0000-4000-8000-000000000002");
        let err = match_prefix("execution", "3f2", [a, b]).unwrap_err();
        assert!(err.to_string().contains("multiple executions"));
    }
}
