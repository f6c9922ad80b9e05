//! InfluxDB v2 HTTP implementation of [`TsdbClient`].
//!
//! Query responses arrive as CSV. The parser keeps only the header names and
//! cell values; annotation lines (leading `#`) are skipped and sections (one
//! per Flux table) are merged by column name, so the mapper sees one logical
//! table addressed by column name.

use crate::client::{QueryTable, TsdbClient};
use crate::error::StoreError;
use crate::DatabaseConfig;

pub struct InfluxClient {
    http: reqwest::blocking::Client,
    url: String,
    org: String,
    token: String,
}

impl InfluxClient {
    pub fn new(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|error| StoreError::Connection(error.to_string()))?;
        Ok(Self {
            http,
            url: config.url.trim_end_matches('/').to_string(),
            org: config.org.clone(),
            token: config.token.clone(),
        })
    }

    fn auth_header(&self) -> String {
        format!("Token {}", self.token)
    }
}

impl TsdbClient for InfluxClient {
    fn write_lines(&self, bucket: &str, lines: &str) -> Result<(), StoreError> {
        let response = self
            .http
            .post(format!("{}/api/v2/write", self.url))
            .query(&[
                ("org", self.org.as_str()),
                ("bucket", bucket),
                ("precision", "ns"),
            ])
            .header("Authorization", self.auth_header())
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(lines.to_string())
            .send()
            .map_err(|error| StoreError::Connection(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Write {
                status: status.as_u16(),
                message: response.text().unwrap_or_default(),
            });
        }
        Ok(())
    }

    fn query(&self, flux: &str) -> Result<QueryTable, StoreError> {
        let body = serde_json::json!({
            "query": flux,
            "type": "flux",
            "dialect": { "header": true, "annotations": [] },
        });
        let response = self
            .http
            .post(format!("{}/api/v2/query", self.url))
            .query(&[("org", self.org.as_str())])
            .header("Authorization", self.auth_header())
            .json(&body)
            .send()
            .map_err(|error| StoreError::Connection(error.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|error| StoreError::Query(error.to_string()))?;
        if !status.is_success() {
            return Err(StoreError::Query(format!("status {status}: {text}")));
        }
        Ok(parse_csv_response(&text))
    }

    fn delete_range(
        &self,
        bucket: &str,
        start: &str,
        stop: &str,
        predicate: &str,
    ) -> Result<(), StoreError> {
        let body = serde_json::json!({
            "start": start,
            "stop": stop,
            "predicate": predicate,
        });
        let response = self
            .http
            .post(format!("{}/api/v2/delete", self.url))
            .query(&[("org", self.org.as_str()), ("bucket", bucket)])
            .header("Authorization", self.auth_header())
            .json(&body)
            .send()
            .map_err(|error| StoreError::Connection(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Query(format!(
                "delete rejected with status {}: {}",
                status,
                response.text().unwrap_or_default()
            )));
        }
        Ok(())
    }
}

/// Parses a CSV query response into one table.
///
/// Sections restart after blank or annotation lines. Section headers are
/// merged by column NAME into one union header: a row keeps its cells under
/// their own column names, and columns a section lacks stay empty, so the
/// mapper sees them as missing cells and its strictness policy decides. No
/// row is ever dropped here.
fn parse_csv_response(text: &str) -> QueryTable {
    let mut columns: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();
    // Union-column index for each column of the current section.
    let mut section_map: Vec<usize> = Vec::new();
    let mut expect_header = true;

    for raw in text.lines() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.is_empty() || line.starts_with('#') {
            expect_header = true;
            continue;
        }

        let cells = parse_csv_record(line);
        if expect_header {
            expect_header = false;
            section_map.clear();
            for name in cells {
                let index = columns.iter().position(|column| *column == name);
                section_map.push(index.unwrap_or_else(|| {
                    columns.push(name);
                    for row in &mut rows {
                        row.push(String::new());
                    }
                    columns.len() - 1
                }));
            }
            continue;
        }

        let mut row = vec![String::new(); columns.len()];
        for (cell, &index) in cells.into_iter().zip(&section_map) {
            row[index] = cell;
        }
        rows.push(row);
    }

    let mut table = QueryTable::new(columns);
    for row in rows {
        table.push_row(row);
    }
    table
}

/// Splits one CSV record, honoring double-quoted cells with `""` escapes.
fn parse_csv_record(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    cell.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                cells.push(std::mem::take(&mut cell));
            }
            _ => cell.push(ch),
        }
    }
    cells.push(cell);
    cells
}
