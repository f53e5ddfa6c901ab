//! DMIAC workflow rendering

use serde::Deserialize;

use super::{RenderError, section};
use crate::domain::pipeline::Pipeline;
use crate::dto::pipeline::ExportedFile;

pub const PHASE_DIAGRAM: &str = r#"
    ┌─────────┐    ┌─────────┐    ┌─────────┐    ┌─────────┐    ┌─────────┐
    │ DEFINE  │───▶│ MEASURE │───▶│ ANALYZE │───▶│ IMPROVE │───▶│ CONTROL │
    └─────────┘    └─────────┘    └─────────┘    └─────────┘    └─────────┘
         │              │              │              │              │
    ┌────▼────┐    ┌────▼────┐    ┌────▼────┐    ┌────▼────┐    ┌────▼────┐
    │Goals &  │    │Collect  │    │Root     │    │Implement│    │Monitor  │
    │Problems │    │Baseline │    │Cause    │    │Solutions│    │& Sustain│
    │         │    │Data     │    │Analysis │    │         │    │         │
    └─────────┘    └─────────┘    └─────────┘    └─────────┘    └─────────┘
"#;

const MARKDOWN_PATH: &str = "dmiac-workflow.md";
const DIAGRAM_PATH: &str = "dmiac-workflow.txt";

/// Phase titles and summaries, in execution order
const PHASES: [(&str, &str); 5] = [
    (
        "Define",
        "Define the problem, project goals, and customer requirements",
    ),
    ("Measure", "Collect data and establish baseline performance"),
    ("Analyze", "Identify root causes and validate with data"),
    ("Improve", "Implement solutions and validate improvements"),
    ("Control", "Monitor and sustain the improvements"),
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DmiacPhases {
    #[serde(default)]
    pub define: DmiacPhase,
    #[serde(default)]
    pub measure: DmiacPhase,
    #[serde(default)]
    pub analyze: DmiacPhase,
    #[serde(default)]
    pub improve: DmiacPhase,
    #[serde(default)]
    pub control: DmiacPhase,
}

impl DmiacPhases {
    fn in_order(&self) -> [&DmiacPhase; 5] {
        [
            &self.define,
            &self.measure,
            &self.analyze,
            &self.improve,
            &self.control,
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DmiacPhase {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub objectives: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub deliverables: Vec<String>,
}

/// Render the Markdown plan and phase diagram of a DMIAC pipeline
///
/// Falls back to the stored `markdown_export` / `ascii_visualization` when
/// the config carries no `phases` section.
pub fn render(pipeline: &Pipeline) -> Result<Vec<ExportedFile>, RenderError> {
    let markdown = match section(&pipeline.config, "phases") {
        Ok(phases) => {
            let phases: DmiacPhases =
                serde_json::from_value(phases.clone()).map_err(|source| {
                    RenderError::InvalidConfig {
                        section: "phases",
                        source,
                    }
                })?;
            markdown(
                &pipeline.name,
                pipeline.description.as_deref().unwrap_or_default(),
                &phases,
            )
        }
        Err(missing) => pipeline.markdown_export.clone().ok_or(missing)?,
    };

    let diagram = pipeline
        .ascii_visualization
        .clone()
        .unwrap_or_else(|| PHASE_DIAGRAM.to_string());

    Ok(vec![
        ExportedFile {
            path: MARKDOWN_PATH.to_string(),
            content: markdown,
        },
        ExportedFile {
            path: DIAGRAM_PATH.to_string(),
            content: diagram,
        },
    ])
}

/// Build the Markdown document for a workflow
pub fn markdown(name: &str, description: &str, phases: &DmiacPhases) -> String {
    let mut out = format!("# DMIAC Workflow: {}\n\n## Overview\n", name);
    if !description.trim().is_empty() {
        out.push_str(description.trim());
        out.push('\n');
    }

    for (index, ((title, summary), phase)) in PHASES.iter().zip(phases.in_order()).enumerate() {
        out.push_str(&format!("\n## Phase {}: {}\n{}\n", index + 1, title, summary));

        if !phase.description.trim().is_empty() {
            out.push_str(&format!("\n{}\n", phase.description.trim()));
        }

        push_list(&mut out, "Objectives", &phase.objectives);
        push_list(&mut out, "Tools & Techniques", &phase.tools);
        push_list(&mut out, "Deliverables", &phase.deliverables);
    }

    out
}

fn push_list(out: &mut String, heading: &str, items: &[String]) {
    let items: Vec<&str> = items
        .iter()
        .map(|i| i.trim())
        .filter(|i| !i.is_empty())
        .collect();
    if items.is_empty() {
        return;
    }

    out.push_str(&format!("\n### {}\n", heading));
    for item in items {
        out.push_str(&format!("- {}\n", item));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pipeline::PipelineType;
    use serde_json::json;
    use uuid::Uuid;

    fn dmiac_pipeline(config: serde_json::Value) -> Pipeline {
        let now = chrono::Utc::now();
        Pipeline {
            id: Uuid::new_v4(),
            name: "Quality Improvement".to_string(),
            pipeline_type: PipelineType::Dmiac,
            description: Some("Improve code quality".to_string()),
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
    fn test_markdown_orders_phases_and_skips_blanks() {
        let pipeline = dmiac_pipeline(json!({
            "phases": {
                "Control": { "objectives": ["Weekly review"] },
                "Define": {
                    "description": "Scope the work",
                    "objectives": ["Reduce bugs", "  "],
                    "tools": ["SonarQube"]
                }
            }
        }));

        let files = render(&pipeline).unwrap();
        let md = &files[0].content;

        assert!(md.starts_with("# DMIAC Workflow: Quality Improvement\n"));
        assert!(md.contains("## Overview\nImprove code quality\n"));

        let define = md.find("## Phase 1: Define").unwrap();
        let control = md.find("## Phase 5: Control").unwrap();
        assert!(define < control);
        assert!(md.contains("Scope the work"));
        assert!(md.contains("- Reduce bugs\n"));
        assert!(!md.contains("-   \n"));
        assert!(md.contains("### Tools & Techniques\n- SonarQube\n"));
        assert!(md.contains("- Weekly review\n"));
        assert_eq!(files[1].content, PHASE_DIAGRAM);
    }

    #[test]
    fn test_falls_back_to_stored_export() {
        let mut pipeline = dmiac_pipeline(json!({}));
        pipeline.markdown_export = Some("# Stored".to_string());
        pipeline.ascii_visualization = Some("[D]->[M]".to_string());

        let files = render(&pipeline).unwrap();
        assert_eq!(files[0].content, "# Stored");
        assert_eq!(files[1].content, "[D]->[M]");
    }

    #[test]
    fn test_missing_phases_without_stored_export() {
        let pipeline = dmiac_pipeline(json!({}));
        assert!(matches!(
            render(&pipeline),
            Err(RenderError::MissingSection("phases"))
        ));
    }
}
