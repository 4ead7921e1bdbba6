//! HTTP client for the vault API.

use color_eyre::{eyre::eyre, Result};
use url::Url;

use crate::config::Config;

use super::api_types::ApiFilePage;
use super::error::ApiError;
use super::params::QueryParams;
use super::types::{Download, FilePage};

/// Name used when the server suggests none.
const FALLBACK_DOWNLOAD_NAME: &str = "downloaded_file";

/// Thin client over the vault's REST endpoints.
#[derive(Clone)]
pub struct VaultClient {
  http: reqwest::Client,
  base_url: Url,
  token: String,
}

impl VaultClient {
  pub fn new(config: &Config) -> Result<Self> {
    let token = Config::get_api_token()?;

    let base_url = Url::parse(&config.vault.url)
      .map_err(|e| eyre!("Invalid vault URL {}: {}", config.vault.url, e))?;

    Ok(Self {
      http: reqwest::Client::new(),
      base_url,
      token,
    })
  }

  fn endpoint(&self, path: &str) -> String {
    format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path)
  }

  /// List one page of files.
  ///
  /// The server does the filtering, sorting and pagination; every parameter
  /// field is forwarded, filters only when set.
  pub async fn list_files(&self, params: &QueryParams) -> Result<FilePage, ApiError> {
    let mut query: Vec<(&str, String)> = vec![
      ("page", params.page.to_string()),
      ("limit", params.limit.as_u32().to_string()),
      ("sortBy", params.sort_by.as_param().to_string()),
      ("sortOrder", params.sort_order.as_param().to_string()),
    ];

    let filters = &params.filters;
    if let Some(name) = &filters.name {
      query.push(("name", name.clone()));
    }
    if let Some(description) = &filters.description {
      query.push(("description", description.clone()));
    }
    if let Some(email) = &filters.uploader_email {
      query.push(("uploaderEmail", email.clone()));
    }
    if let Some(after) = filters.uploaded_after {
      query.push(("uploadedAfter", after.to_string()));
    }
    if let Some(before) = filters.uploaded_before {
      query.push(("uploadedBefore", before.to_string()));
    }

    let response = self
      .http
      .get(self.endpoint("api"))
      .bearer_auth(&self.token)
      .query(&query)
      .send()
      .await?;

    if !response.status().is_success() {
      return Err(ApiError::from_status(response.status()));
    }

    let page: ApiFilePage = response.json().await?;
    Ok(page.into_page(params.page, params.limit.as_u32()))
  }

  /// Delete one file by storage key. Not resent on ambiguous failure.
  pub async fn delete_file(&self, key: &str) -> Result<(), ApiError> {
    let response = self
      .http
      .delete(self.endpoint("api/delete"))
      .bearer_auth(&self.token)
      .query(&[("s3Key", key)])
      .send()
      .await?;

    if !response.status().is_success() {
      return Err(ApiError::from_status(response.status()));
    }

    Ok(())
  }

  /// Download one file, taking the suggested name from Content-Disposition.
  pub async fn download_file(&self, key: &str) -> Result<Download, ApiError> {
    let response = self
      .http
      .get(self.endpoint("api/download"))
      .bearer_auth(&self.token)
      .query(&[("s3Key", key)])
      .send()
      .await?;

    if !response.status().is_success() {
      return Err(ApiError::from_status(response.status()));
    }

    let file_name = response
      .headers()
      .get(reqwest::header::CONTENT_DISPOSITION)
      .and_then(|value| value.to_str().ok())
      .and_then(file_name_from_disposition)
      .unwrap_or_else(|| FALLBACK_DOWNLOAD_NAME.to_string());

    let bytes = response.bytes().await?;

    Ok(Download {
      file_name,
      bytes: bytes.to_vec(),
    })
  }
}

/// Pull the suggested file name out of a Content-Disposition header value.
fn file_name_from_disposition(value: &str) -> Option<String> {
  let (_, rest) = value.split_once("filename=")?;
  let name = rest
    .split(';')
    .next()
    .unwrap_or(rest)
    .replace('"', "")
    .trim()
    .to_string();

  if name.is_empty() {
    None
  } else {
    Some(name)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_file_name_from_quoted_disposition() {
    assert_eq!(
      file_name_from_disposition(r#"attachment; filename="report q3.pdf""#),
      Some("report q3.pdf".to_string())
    );
  }

  #[test]
  fn test_file_name_from_bare_disposition() {
    assert_eq!(
      file_name_from_disposition("attachment; filename=plain.txt; size=3"),
      Some("plain.txt".to_string())
    );
  }

  #[test]
  fn test_file_name_absent() {
    assert_eq!(file_name_from_disposition("attachment"), None);
    assert_eq!(file_name_from_disposition(r#"attachment; filename="""#), None);
  }
}
