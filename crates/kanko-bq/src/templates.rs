//! SQL template loading, placeholder substitution, and the warehouse run.

use std::path::Path;

use crate::client::BigQueryClient;
use crate::error::BigQueryError;

/// The two feature-table templates executed by a warehouse run.
const TEMPLATE_FILES: [(&str, &str); 2] = [
    ("youtube_video_features.sql", "YouTube video features"),
    ("gmap_place_features.sql", "Google Maps place features"),
];

/// How much of a failing statement is echoed for diagnostics.
const SQL_ECHO_CHARS: usize = 500;

/// Values substituted into the templates by literal replacement.
#[derive(Debug, Clone)]
pub struct TemplateVars {
    pub project_id: String,
    pub dataset: String,
    pub bucket: String,
}

/// Replace the three named placeholders by literal string replacement.
#[must_use]
pub fn substitute_placeholders(sql: &str, vars: &TemplateVars) -> String {
    sql.replace("${PROJECT_ID}", &vars.project_id)
        .replace("${BQ_DATASET}", &vars.dataset)
        .replace("${GCS_BUCKET}", &vars.bucket)
}

/// Load both SQL templates from `sql_dir`, substitute placeholders, and
/// execute each as a blocking query job.
///
/// # Errors
///
/// Returns [`BigQueryError::TemplateIo`] if a template cannot be read.
/// Execution failures are propagated after echoing the first 500 characters
/// of the offending SQL.
pub async fn run_warehouse(
    client: &BigQueryClient,
    sql_dir: &Path,
    vars: &TemplateVars,
) -> Result<(), BigQueryError> {
    for (file, name) in TEMPLATE_FILES {
        let path = sql_dir.join(file);
        let template = std::fs::read_to_string(&path).map_err(|e| BigQueryError::TemplateIo {
            path: path.display().to_string(),
            source: e,
        })?;
        let sql = substitute_placeholders(&template, vars);

        tracing::info!(query = name, "running warehouse query");
        if let Err(e) = client.run_query(&sql).await {
            let head: String = sql.chars().take(SQL_ECHO_CHARS).collect();
            eprintln!("ERROR in {name} query");
            eprintln!("----- SQL Start -----");
            eprintln!("{head}");
            eprintln!("----- SQL End -------");
            return Err(e);
        }
        tracing::info!(query = name, "warehouse query completed");
    }
    Ok(())
}
