//! Demo data set
//!
//! Wipes every table and loads a small, fixed data set: templates, one
//! repository with a DMIAC and a CI/CD pipeline, three agents with a day of
//! half-hourly samples, two executions and two feedback entries.

use chrono::{DateTime, TimeDelta, Utc};
use pipedeck_core::domain::agent::{Agent, AgentMonitoring, AgentStatus};
use pipedeck_core::domain::execution::{ExecutionStatus, PipelineExecution, TriggerType};
use pipedeck_core::domain::feedback::{FeedbackCategory, PipelineFeedback};
use pipedeck_core::domain::pipeline::PipelineType;
use pipedeck_core::domain::template::RefactorTemplate;
use pipedeck_core::dto::pipeline::NewPipeline;
use pipedeck_core::dto::repository::NewRepository;
use pipedeck_core::lifecycle::LifecycleTiming;
use pipedeck_core::render::dmiac::PHASE_DIAGRAM;
use serde_json::{Value, json};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::repository::{
    agent_repository, execution_repository, feedback_repository, pipeline_repository,
    repo_repository, template_repository,
};

/// Samples per agent, one every half hour
const SAMPLES_PER_AGENT: i64 = 48;

/// Replace all data with the demo set
///
/// Runs in one transaction; on error the previous data is left in place.
pub async fn seed_demo_data(pool: &PgPool, timing: &LifecycleTiming) -> Result<(), sqlx::Error> {
    tracing::info!("Seeding demo data...");
    let now = Utc::now();

    let mut tx = pool.begin().await?;

    db::clear_all(&mut tx).await?;

    for template in templates(now) {
        template_repository::create(&mut *tx, &template).await?;
    }

    let repo = repo_repository::create(
        &mut *tx,
        NewRepository {
            name: "pipeline-demo-app".to_string(),
            owner: "demo-org".to_string(),
            url: "https://github.com/demo-org/pipeline-demo-app".to_string(),
            branch: "main".to_string(),
            token: None,
            is_active: true,
        },
    )
    .await?;

    let dmiac = pipeline_repository::create(
        &mut *tx,
        NewPipeline {
            name: "Quality Improvement DMIAC".to_string(),
            pipeline_type: PipelineType::Dmiac,
            description: Some("A DMIAC workflow for improving code quality metrics".to_string()),
            config: dmiac_config(),
            ascii_visualization: Some(PHASE_DIAGRAM.to_string()),
            markdown_export: None,
            repository_id: Some(repo.id),
            is_template: false,
        },
    )
    .await?;

    let cicd = pipeline_repository::create(
        &mut *tx,
        NewPipeline {
            name: "Full Stack CI/CD Pipeline".to_string(),
            pipeline_type: PipelineType::CiCd,
            description: Some("Complete CI/CD pipeline for full stack applications".to_string()),
            config: cicd_config(),
            ascii_visualization: None,
            markdown_export: None,
            repository_id: Some(repo.id),
            is_template: false,
        },
    )
    .await?;

    let agents = agents(now);
    for (index, agent) in agents.iter().enumerate() {
        agent_repository::create(&mut *tx, agent).await?;
        for step in 0..SAMPLES_PER_AGENT {
            agent_repository::create_sample(&mut *tx, &monitoring_sample(agent.id, index, step, now))
                .await?;
        }
    }

    for execution in executions(cicd.id, dmiac.id, now, timing) {
        execution_repository::create(&mut *tx, &execution).await?;
    }

    for feedback in feedback(cicd.id, dmiac.id, now) {
        feedback_repository::create(&mut *tx, &feedback).await?;
    }

    tx.commit().await?;

    tracing::info!(
        "Demo data seeded: 3 templates, 1 repository, 2 pipelines, {} agents, {} samples",
        agents.len(),
        agents.len() as i64 * SAMPLES_PER_AGENT
    );
    Ok(())
}

fn templates(now: DateTime<Utc>) -> Vec<RefactorTemplate> {
    let template = |name: &str, description: &str, category: &str, body: Value| RefactorTemplate {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: Some(description.to_string()),
        category: category.to_string(),
        template: body,
        is_built_in: true,
        usage_count: 0,
        created_at: now,
    };

    vec![
        template(
            "Clean Architecture Refactor",
            "Refactor codebase to follow clean architecture principles",
            "Architecture",
            json!({
                "steps": [
                    "Identify domain entities and business logic",
                    "Create domain layer with entities and use cases",
                    "Implement repository pattern for data access",
                    "Separate presentation layer from business logic",
                    "Add dependency injection container",
                    "Update tests to match new architecture"
                ],
                "estimatedHours": 40,
                "dependencies": ["typescript", "jest"],
                "checklist": [
                    "Domain models defined",
                    "Use cases implemented",
                    "Repository interfaces created",
                    "Controllers refactored",
                    "Tests updated"
                ]
            }),
        ),
        template(
            "Performance Optimization",
            "Optimize application performance and reduce bottlenecks",
            "Performance",
            json!({
                "steps": [
                    "Profile application performance",
                    "Identify performance bottlenecks",
                    "Optimize database queries",
                    "Implement caching strategies",
                    "Optimize frontend assets",
                    "Add performance monitoring"
                ],
                "estimatedHours": 24,
                "tools": ["lighthouse", "webpack-bundle-analyzer", "redis"],
                "checklist": [
                    "Performance baseline established",
                    "Critical path optimized",
                    "Caching implemented",
                    "Bundle size reduced",
                    "Monitoring in place"
                ]
            }),
        ),
        template(
            "Legacy Code Modernization",
            "Update legacy code to modern standards and frameworks",
            "Modernization",
            json!({
                "steps": [
                    "Audit existing codebase",
                    "Create migration plan",
                    "Update dependencies",
                    "Refactor deprecated patterns",
                    "Add modern testing framework",
                    "Update documentation"
                ],
                "estimatedHours": 60,
                "technologies": ["typescript", "react", "node.js"],
                "checklist": [
                    "Legacy code audited",
                    "Dependencies updated",
                    "Code patterns modernized",
                    "Tests migrated",
                    "Documentation updated"
                ]
            }),
        ),
    ]
}

fn dmiac_config() -> Value {
    json!({
        "phases": {
            "Define": {
                "description": "Scope the quality problem with the development and QA teams",
                "objectives": ["Reduce bug count by 50%", "Improve test coverage to 90%"],
                "tools": ["Stakeholder interviews"],
                "deliverables": ["Project charter (2 weeks)"]
            },
            "Measure": {
                "description": "Baseline: 45 open bugs, 65% coverage",
                "objectives": ["Track bug count, test coverage and code complexity"],
                "tools": ["SonarQube", "Jest", "ESLint"],
                "deliverables": ["Baseline report"]
            },
            "Analyze": {
                "objectives": ["Insufficient testing", "Complex code structure"],
                "tools": ["Fishbone diagram", "Statistical analysis"],
                "deliverables": ["Validated root causes"]
            },
            "Improve": {
                "description": "Pilot on the user authentication module",
                "objectives": ["Implement TDD", "Refactor complex functions", "Add automated testing"],
                "tools": ["A/B testing on selected modules"],
                "deliverables": ["Improved modules"]
            },
            "Control": {
                "objectives": ["Daily bug reports", "Weekly coverage reports"],
                "tools": ["Monthly review meetings"],
                "deliverables": ["Updated testing guidelines", "Code review checklist"]
            }
        }
    })
}

fn cicd_config() -> Value {
    let setup = json!([
        { "name": "Checkout code", "uses": "actions/checkout@v3" },
        { "name": "Setup Node.js", "uses": "actions/setup-node@v3", "with": { "node-version": "18" } },
        { "name": "Install dependencies", "run": "npm ci" }
    ]);
    let job = |name: &str, extra: Value| {
        let mut steps = setup.as_array().cloned().unwrap_or_default();
        steps.extend(extra.as_array().cloned().unwrap_or_default());
        json!({ "name": name, "runsOn": "ubuntu-latest", "steps": steps })
    };

    json!({
        "ci": {
            "triggers": ["push", "pull_request"],
            "jobs": [
                job("test", json!([
                    { "name": "Run tests", "run": "npm test" },
                    { "name": "Coverage report", "run": "npm run coverage" }
                ])),
                job("lint", json!([{ "name": "Run lint", "run": "npm run lint" }])),
                job("build", json!([
                    { "name": "Build app", "run": "npm run build" },
                    { "name": "Build docker image", "run": "docker build -t app:latest ." }
                ]))
            ]
        },
        "cd": {
            "environments": ["staging", "production"]
        }
    })
}

fn agents(now: DateTime<Utc>) -> Vec<Agent> {
    let agent = |name: &str,
                 kind: &str,
                 status: AgentStatus,
                 endpoint: &str,
                 version: &str,
                 deployed: DateTime<Utc>,
                 seen: DateTime<Utc>,
                 config: Value| {
        Agent {
            id: Uuid::new_v4(),
            name: name.to_string(),
            agent_type: kind.to_string(),
            status,
            endpoint: Some(endpoint.to_string()),
            version: Some(version.to_string()),
            config,
            deployed_at: Some(deployed),
            last_seen: Some(seen),
            created_at: now,
        }
    };

    vec![
        agent(
            "Production Monitor",
            "monitoring",
            AgentStatus::Active,
            "https://api.example.com/monitor",
            "1.2.0",
            now,
            now,
            json!({ "interval": 60, "metrics": ["cpu", "memory", "errors"], "alertThreshold": 80 }),
        ),
        agent(
            "Error Reporter",
            "error-tracking",
            AgentStatus::Active,
            "https://api.example.com/errors",
            "1.1.0",
            now,
            now,
            json!({ "errorTypes": ["runtime", "network", "validation"], "reportLevel": "error" }),
        ),
        agent(
            "Load Balancer Monitor",
            "network",
            AgentStatus::Inactive,
            "https://lb.example.com/monitor",
            "2.0.0",
            now - TimeDelta::days(1),
            now - TimeDelta::hours(1),
            json!({ "checkInterval": 30, "healthEndpoints": ["/health", "/status"] }),
        ),
    ]
}

/// Sample `step` half-hours before `now`; values follow a fixed wave per agent
fn monitoring_sample(agent_id: Uuid, agent_index: usize, step: i64, now: DateTime<Utc>) -> AgentMonitoring {
    let phase = (step as f64 / 4.0) + agent_index as f64;
    let cpu = 45.0 + 30.0 * phase.sin();
    let memory = 55.0 + 20.0 * (phase * 0.5).cos();

    AgentMonitoring {
        id: Uuid::new_v4(),
        agent_id,
        timestamp: now - TimeDelta::minutes(30 * step),
        status: "healthy".to_string(),
        cpu_usage: Some(round2(cpu)),
        memory_usage: Some(round2(memory)),
        error_count: ((step + agent_index as i64) % 5) as i32,
        metrics: json!({
            "requestCount": 400 + (step * 37 + agent_index as i64 * 101) % 600,
            "responseTime": round2(120.0 + 80.0 * (phase * 0.7).sin().abs()),
            "uptime": round2(99.0 + (step % 10) as f64 / 10.0),
        }),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn executions(
    cicd_id: Uuid,
    dmiac_id: Uuid,
    now: DateTime<Utc>,
    timing: &LifecycleTiming,
) -> [PipelineExecution; 2] {
    [
        PipelineExecution {
            id: Uuid::new_v4(),
            pipeline_id: cicd_id,
            status: ExecutionStatus::Success,
            trigger_type: TriggerType::Manual,
            started_at: now - TimeDelta::minutes(5),
            completed_at: Some(now),
            logs: "Pipeline executed successfully. All tests passed. Deployment completed."
                .to_string(),
            output: json!({
                "tests": { "passed": 45, "failed": 0, "coverage": "92%" },
                "build": { "status": "success", "artifacts": ["app.zip", "docker-image:latest"] },
                "deployment": { "environment": "staging", "url": "https://staging.example.com" }
            }),
            error_msg: None,
            next_transition_at: None,
        },
        PipelineExecution {
            id: Uuid::new_v4(),
            pipeline_id: dmiac_id,
            status: ExecutionStatus::Running,
            trigger_type: TriggerType::Manual,
            started_at: now,
            completed_at: None,
            logs: "Currently in Analyze phase. Root cause analysis in progress.".to_string(),
            output: json!({
                "currentPhase": "Analyze",
                "progress": "60%",
                "findings": ["Testing gaps identified", "Code complexity hotspots found"]
            }),
            error_msg: None,
            next_transition_at: Some(now + timing.run_duration),
        },
    ]
}

fn feedback(cicd_id: Uuid, dmiac_id: Uuid, now: DateTime<Utc>) -> [PipelineFeedback; 2] {
    [
        PipelineFeedback {
            id: Uuid::new_v4(),
            pipeline_id: cicd_id,
            user_id: "developer1".to_string(),
            rating: 5,
            comment: Some("Pipeline works great! Fast execution and clear feedback.".to_string()),
            category: FeedbackCategory::Usability,
            created_at: now,
        },
        PipelineFeedback {
            id: Uuid::new_v4(),
            pipeline_id: dmiac_id,
            user_id: "developer2".to_string(),
            rating: 4,
            comment: Some(
                "DMIAC workflow is helpful, but could use more automation in the Measure phase."
                    .to_string(),
            ),
            category: FeedbackCategory::FeatureRequest,
            created_at: now,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipedeck_core::domain::pipeline::Pipeline;
    use pipedeck_core::render;

    fn pipeline(pipeline_type: PipelineType, config: Value) -> Pipeline {
        let now = Utc::now();
        Pipeline {
            id: Uuid::new_v4(),
            name: "Seeded".to_string(),
            pipeline_type,
            description: None,
            config,
            ascii_visualization: None,
            markdown_export: None,
            repository_id: None,
            is_active: true,
            is_template: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_seeded_configs_export() {
        let files = render::export(&pipeline(PipelineType::CiCd, cicd_config())).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].content.contains("npm run lint"));

        let files = render::export(&pipeline(PipelineType::Dmiac, dmiac_config())).unwrap();
        assert!(files[0].content.contains("- SonarQube\n"));
    }

    #[test]
    fn test_monitoring_samples_are_deterministic() {
        let now = Utc::now();
        let agent = Uuid::new_v4();
        let a = monitoring_sample(agent, 1, 7, now);
        let b = monitoring_sample(agent, 1, 7, now);
        assert_eq!(a.cpu_usage, b.cpu_usage);
        assert_eq!(a.metrics, b.metrics);
        assert_eq!(a.timestamp, now - TimeDelta::minutes(210));

        for step in 0..SAMPLES_PER_AGENT {
            let s = monitoring_sample(agent, 2, step, now);
            let cpu = s.cpu_usage.unwrap();
            assert!((0.0..=100.0).contains(&cpu));
            assert!((0..5).contains(&s.error_count));
        }
    }

    #[test]
    fn test_seeded_executions_are_consistent() {
        let now = Utc::now();
        let execs = executions(Uuid::new_v4(), Uuid::new_v4(), now, &LifecycleTiming::default());
        assert!(execs.iter().all(|e| e.is_consistent()));
        assert_eq!(execs[1].next_transition_at, Some(now + TimeDelta::seconds(15)));
    }

    async fn count(pool: &PgPool, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    #[ignore = "needs PostgreSQL at DATABASE_URL"]
    async fn test_seed_replaces_existing_data() {
        let (pool, _guard) = crate::db::testing::database().await;
        let timing = LifecycleTiming::default();

        seed_demo_data(&pool, &timing).await.unwrap();
        seed_demo_data(&pool, &timing).await.unwrap();

        assert_eq!(count(&pool, "refactor_templates").await, 3);
        assert_eq!(count(&pool, "repositories").await, 1);
        assert_eq!(count(&pool, "pipelines").await, 2);
        assert_eq!(count(&pool, "agents").await, 3);
        assert_eq!(count(&pool, "agent_monitoring").await, 3 * SAMPLES_PER_AGENT);
        assert_eq!(count(&pool, "pipeline_executions").await, 2);
        assert_eq!(count(&pool, "pipeline_feedback").await, 2);
    }
}
