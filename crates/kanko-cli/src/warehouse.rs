//! Handler for the warehouse subcommand.

use std::path::Path;

use kanko_bq::{BigQueryClient, TemplateVars};
use kanko_core::AppConfig;

pub(crate) async fn run(config: &AppConfig, sql_dir: &Path) -> anyhow::Result<()> {
    let (project_id, dataset, bucket, access_token) = config.require_warehouse()?;
    let client = BigQueryClient::new(
        project_id,
        access_token,
        config.http_timeout_secs,
        &config.user_agent,
    )?;

    let vars = TemplateVars {
        project_id: project_id.to_owned(),
        dataset: dataset.to_owned(),
        bucket: bucket.to_owned(),
    };
    kanko_bq::run_warehouse(&client, sql_dir, &vars).await?;
    println!("all queries finished; tables created in {project_id}.{dataset}");
    Ok(())
}
