//! GitHub Actions workflow rendering
//!
//! Expected config shape:
//!
//! ```json
//! { "ci": { "triggers": ["push"], "jobs": [
//!     { "name": "test", "runsOn": "ubuntu-latest",
//!       "steps": [{ "name": "Checkout", "uses": "actions/checkout@v3" }] } ] } }
//! ```

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{RenderError, section};
use crate::dto::pipeline::ExportedFile;

const CI_WORKFLOW_NAME: &str = "CI Pipeline";
const CD_WORKFLOW_NAME: &str = "CD Pipeline";
const DEFAULT_RUNNER: &str = "ubuntu-latest";

/// Deploy environments and the branch each one deploys from
const DEPLOY_TARGETS: [(&str, &str); 2] = [("staging", "develop"), ("production", "main")];

/// The `ci` section of a CI/CD pipeline config
#[derive(Debug, Clone, Deserialize)]
pub struct CiSection {
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub jobs: Vec<JobSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSpec {
    pub name: String,
    #[serde(default = "default_runner")]
    pub runs_on: String,
    #[serde(default)]
    pub steps: Vec<StepSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StepSpec {
    pub name: String,
    pub uses: Option<String>,
    pub run: Option<String>,
    pub with: Option<BTreeMap<String, serde_json::Value>>,
}

fn default_runner() -> String {
    DEFAULT_RUNNER.to_string()
}

#[derive(Serialize)]
struct Workflow {
    name: String,
    on: serde_yaml::Value,
    jobs: serde_yaml::Mapping,
}

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct WorkflowJob {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    needs: Vec<String>,
    #[serde(rename = "if", skip_serializing_if = "Option::is_none")]
    condition: Option<String>,
    runs_on: String,
    steps: Vec<WorkflowStep>,
}

#[derive(Serialize)]
struct WorkflowStep {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    uses: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    run: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    with: Option<BTreeMap<String, serde_json::Value>>,
}

impl From<&StepSpec> for WorkflowStep {
    fn from(step: &StepSpec) -> Self {
        // A step either uses an action or runs a command
        let (uses, run) = match &step.uses {
            Some(uses) => (Some(uses.clone()), None),
            None => (None, Some(step.run.clone().unwrap_or_default())),
        };
        WorkflowStep {
            name: step.name.clone(),
            uses,
            run,
            with: step.with.clone().filter(|w| !w.is_empty()),
        }
    }
}

/// Render the CI (and CD) workflows of a CI/CD pipeline config
///
/// Separate mode yields `ci.yml` plus a `cd.yml` chained on the CI workflow.
/// Combined mode yields one workflow whose deploy jobs need every CI job.
pub fn render(
    pipeline_name: &str,
    config: &serde_json::Value,
    combined: bool,
) -> Result<Vec<ExportedFile>, RenderError> {
    let ci: CiSection = serde_json::from_value(section(config, "ci")?.clone())
        .map_err(|source| RenderError::InvalidConfig {
            section: "ci",
            source,
        })?;
    validate_jobs(&ci.jobs)?;

    let triggers = if ci.triggers.is_empty() {
        vec!["push".to_string()]
    } else {
        ci.triggers.clone()
    };

    let mut jobs = ci_jobs(&ci.jobs)?;

    if combined {
        let needs: Vec<String> = ci.jobs.iter().map(|j| j.name.clone()).collect();
        append_deploy_jobs(&mut jobs, &needs)?;

        let workflow = Workflow {
            name: pipeline_name.to_string(),
            on: serde_yaml::to_value(&triggers)?,
            jobs,
        };
        return Ok(vec![ExportedFile {
            path: ".github/workflows/pipeline.yml".to_string(),
            content: serde_yaml::to_string(&workflow)?,
        }]);
    }

    let ci_workflow = Workflow {
        name: CI_WORKFLOW_NAME.to_string(),
        on: serde_yaml::to_value(&triggers)?,
        jobs,
    };

    let mut cd_jobs = serde_yaml::Mapping::new();
    append_deploy_jobs(&mut cd_jobs, &[])?;
    let cd_workflow = Workflow {
        name: CD_WORKFLOW_NAME.to_string(),
        on: serde_yaml::to_value(json!({
            "workflow_run": {
                "workflows": [CI_WORKFLOW_NAME],
                "types": ["completed"],
                "branches": ["main", "develop"],
            }
        }))?,
        jobs: cd_jobs,
    };

    Ok(vec![
        ExportedFile {
            path: ".github/workflows/ci.yml".to_string(),
            content: serde_yaml::to_string(&ci_workflow)?,
        },
        ExportedFile {
            path: ".github/workflows/cd.yml".to_string(),
            content: serde_yaml::to_string(&cd_workflow)?,
        },
    ])
}

fn validate_jobs(jobs: &[JobSpec]) -> Result<(), RenderError> {
    if jobs.is_empty() {
        return Err(RenderError::NoJobs);
    }

    let mut seen = HashSet::new();
    for job in jobs {
        let reserved = DEPLOY_TARGETS
            .iter()
            .any(|(environment, _)| deploy_job_name(environment) == job.name);
        if reserved || job.name.trim().is_empty() || !seen.insert(job.name.as_str()) {
            return Err(RenderError::BadJobName(job.name.clone()));
        }
    }
    Ok(())
}

fn ci_jobs(specs: &[JobSpec]) -> Result<serde_yaml::Mapping, RenderError> {
    let mut jobs = serde_yaml::Mapping::new();
    for spec in specs {
        let job = WorkflowJob {
            needs: Vec::new(),
            condition: None,
            runs_on: spec.runs_on.clone(),
            steps: spec.steps.iter().map(WorkflowStep::from).collect(),
        };
        jobs.insert(
            serde_yaml::Value::String(spec.name.clone()),
            serde_yaml::to_value(&job)?,
        );
    }
    Ok(jobs)
}

fn append_deploy_jobs(
    jobs: &mut serde_yaml::Mapping,
    needs: &[String],
) -> Result<(), RenderError> {
    for (environment, branch) in DEPLOY_TARGETS {
        let job = WorkflowJob {
            needs: needs.to_vec(),
            condition: Some(format!("github.ref == 'refs/heads/{}'", branch)),
            runs_on: DEFAULT_RUNNER.to_string(),
            steps: vec![WorkflowStep {
                name: format!("Deploy to {}", environment),
                uses: None,
                run: Some(format!("echo \"Deploying to {}\"", environment)),
                with: None,
            }],
        };
        jobs.insert(
            serde_yaml::Value::String(deploy_job_name(environment)),
            serde_yaml::to_value(&job)?,
        );
    }
    Ok(())
}

fn deploy_job_name(environment: &str) -> String {
    format!("deploy-{}", environment)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder_config() -> serde_json::Value {
        json!({
            "ci": {
                "triggers": ["push", "pull_request"],
                "jobs": [
                    {
                        "name": "test",
                        "runsOn": "ubuntu-latest",
                        "steps": [
                            { "name": "Checkout code", "uses": "actions/checkout@v3" },
                            { "name": "Setup Node.js", "uses": "actions/setup-node@v3",
                              "with": { "node-version": "18" } },
                            { "name": "Run tests", "run": "npm test" }
                        ]
                    },
                    { "name": "lint", "steps": [{ "name": "Lint" }] }
                ]
            }
        })
    }

    fn parse(file: &ExportedFile) -> serde_yaml::Value {
        serde_yaml::from_str(&file.content).unwrap()
    }

    #[test]
    fn test_separate_mode_writes_ci_and_cd() {
        let files = render("Full Stack", &builder_config(), false).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path, ".github/workflows/ci.yml");
        assert_eq!(files[1].path, ".github/workflows/cd.yml");

        let ci = parse(&files[0]);
        assert_eq!(ci["name"].as_str(), Some("CI Pipeline"));
        assert_eq!(ci["on"][1].as_str(), Some("pull_request"));
        let steps = &ci["jobs"]["test"]["steps"];
        assert_eq!(steps[0]["uses"].as_str(), Some("actions/checkout@v3"));
        assert_eq!(steps[1]["with"]["node-version"].as_str(), Some("18"));
        assert_eq!(steps[2]["run"].as_str(), Some("npm test"));
        assert_eq!(ci["jobs"]["lint"]["runs-on"].as_str(), Some("ubuntu-latest"));
        assert_eq!(ci["jobs"]["lint"]["steps"][0]["run"].as_str(), Some(""));

        let cd = parse(&files[1]);
        assert_eq!(
            cd["on"]["workflow_run"]["workflows"][0].as_str(),
            Some("CI Pipeline")
        );
        assert!(cd["jobs"]["deploy-staging"]["needs"].is_null());
    }

    #[test]
    fn test_combined_mode_chains_deploys() {
        let files = render("Full Stack", &builder_config(), true).unwrap();
        assert_eq!(files.len(), 1);

        let workflow = parse(&files[0]);
        assert_eq!(workflow["name"].as_str(), Some("Full Stack"));
        let needs = &workflow["jobs"]["deploy-production"]["needs"];
        assert_eq!(needs[0].as_str(), Some("test"));
        assert_eq!(needs[1].as_str(), Some("lint"));
        assert_eq!(
            workflow["jobs"]["deploy-production"]["if"].as_str(),
            Some("github.ref == 'refs/heads/main'")
        );
    }

    #[test]
    fn test_empty_triggers_default_to_push() {
        let config = json!({ "ci": { "jobs": [{ "name": "build" }] } });
        let files = render("x", &config, false).unwrap();
        assert_eq!(parse(&files[0])["on"][0].as_str(), Some("push"));
    }

    #[test]
    fn test_rejects_duplicate_job_names() {
        let config = json!({ "ci": { "jobs": [{ "name": "a" }, { "name": "a" }] } });
        assert!(matches!(
            render("x", &config, false),
            Err(RenderError::BadJobName(name)) if name == "a"
        ));
    }

    #[test]
    fn test_rejects_deploy_job_names() {
        for name in ["deploy-staging", "deploy-production"] {
            let config = json!({ "ci": { "jobs": [{ "name": "build" }, { "name": name }] } });
            for combined in [false, true] {
                assert!(matches!(
                    render("x", &config, combined),
                    Err(RenderError::BadJobName(bad)) if bad == name
                ));
            }
        }

        let config = json!({ "ci": { "jobs": [{ "name": "deploy-docs" }] } });
        assert!(render("x", &config, true).is_ok());
    }

    #[test]
    fn test_rejects_no_jobs_and_bad_shape() {
        assert!(matches!(
            render("x", &json!({ "ci": { "jobs": [] } }), false),
            Err(RenderError::NoJobs)
        ));
        assert!(matches!(
            render("x", &json!({ "ci": { "jobs": "build" } }), false),
            Err(RenderError::InvalidConfig { section: "ci", .. })
        ));
    }
}
