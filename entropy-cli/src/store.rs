//! Read-only fetch of rows from the hosted store's REST endpoint.

use anyhow::{Context, Result, bail};
use entropy_ingest::{RawActivityRow, RawProjectRow, RawTaskRow};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::StoreSection;

const ACTIVE_TASK_SELECT: &str = "id,title,description,project_id,due_date,est_duration_minutes,\
energy_tag,last_touched_at,created_at,recurrence_interval_days,state,\
projects(name,tier,decay_threshold_days,last_touched_at)";

pub struct StoreClient {
    base_url: String,
    http: reqwest::Client,
}

impl StoreClient {
    pub fn from_config(cfg: &StoreSection) -> Result<Self> {
        let Some(url) = cfg.url.as_deref().filter(|u| !u.trim().is_empty()) else {
            bail!("store.url is not set in config.toml (run: entropy config init)");
        };
        let key = std::env::var(&cfg.api_key_env)
            .with_context(|| format!("missing store key; set {}", cfg.api_key_env))?;

        let mut headers = HeaderMap::new();
        headers.insert("apikey", HeaderValue::from_str(&key).context("store key header")?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {key}")).context("store auth header")?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("build http client")?;

        Ok(Self {
            base_url: url.trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn get_rows<T: DeserializeOwned>(&self, table: &str, query: &[(&str, &str)]) -> Result<Vec<T>> {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        debug!(%url, ?query, "store request");

        let resp = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("store returned {status} for {table}: {body}");
        }

        let rows: Vec<T> = resp.json().await.with_context(|| format!("decode {table} rows"))?;
        info!(table, rows = rows.len(), "fetched rows");
        Ok(rows)
    }

    pub async fn active_tasks(&self) -> Result<Vec<RawTaskRow>> {
        self.get_rows("tasks", &[("select", ACTIVE_TASK_SELECT), ("state", "eq.Active")])
            .await
    }

    pub async fn projects(&self) -> Result<Vec<RawProjectRow>> {
        self.get_rows("projects", &[("select", "*"), ("order", "tier.asc")])
            .await
    }

    pub async fn activity_logs(&self, project_id: &str, since_rfc3339: &str) -> Result<Vec<RawActivityRow>> {
        let project = format!("eq.{project_id}");
        let since = format!("gte.{since_rfc3339}");
        self.get_rows(
            "activity_logs",
            &[
                ("select", "*"),
                ("project_id", project.as_str()),
                ("completed_at", since.as_str()),
            ],
        )
        .await
    }
}
