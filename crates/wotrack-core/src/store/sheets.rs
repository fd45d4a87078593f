use super::RecordStore;
use crate::error::{Result, WotrackError};
use crate::paths;
use crate::record::{Cell, RecordSet};
use reqwest::blocking::{Client, Response};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRangeBody<'a> {
    range: &'a str,
    major_dimension: &'static str,
    values: Vec<Vec<Value>>,
}

/// Google Sheets v4 `values` API.
///
/// Cells are read as displayed text and written back as if typed, so the
/// sheet re-parses numbers and dates instead of storing them as text.
pub struct SheetsStore {
    spreadsheet_id: String,
    access_token: String,
    api_base_url: String,
    http_client: Client,
}

impl SheetsStore {
    /// `source` is a spreadsheet share URL or a bare spreadsheet id.
    pub fn new(source: &str, access_token: impl Into<String>, api_base_url: &str) -> Result<Self> {
        let spreadsheet_id = paths::spreadsheet_id(source)?;
        let access_token = access_token.into();
        if access_token.trim().is_empty() {
            return Err(WotrackError::StoreUnavailable(
                "empty access token".to_string(),
            ));
        }
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            spreadsheet_id,
            access_token,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    fn api_url(&self, tail: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.api_base_url)
            .map_err(|e| WotrackError::InvalidSource(format!("{}: {e}", self.api_base_url)))?;
        url.path_segments_mut()
            .map_err(|_| WotrackError::InvalidSource(self.api_base_url.clone()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str()])
            .extend(tail);
        Ok(url)
    }

    fn values_url(&self, range: &str) -> Result<Url> {
        self.api_url(&["values", range])
    }

    fn check(sheet: &str, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        // A sheet that does not exist surfaces as an unparseable range.
        if status == StatusCode::NOT_FOUND
            || (status == StatusCode::BAD_REQUEST && body.contains("Unable to parse range"))
        {
            return Err(WotrackError::SheetNotFound(sheet.to_string()));
        }
        Err(WotrackError::StoreUnavailable(format!(
            "sheets api returned {status} for '{sheet}'"
        )))
    }
}

fn cell_from_json(value: Value) -> Cell {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        // Only unformatted reads return numbers; `1200.0` is the artifact key
        // normalization removes.
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string().to_uppercase()),
        other => Some(other.to_string()),
    }
}

fn cell_to_json(cell: Cell) -> Value {
    Value::String(cell.unwrap_or_default())
}

/// Spreadsheet column letters for a 1-based column number (`1` -> `A`,
/// `27` -> `AA`).
fn column_letters(mut column: usize) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let rem = (column - 1) % 26;
        letters.push(b'A' + rem as u8);
        column = (column - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// A1 notation for `cells` on `sheet`, quoting the sheet name when needed.
fn a1_range(sheet: &str, cells: &str) -> String {
    if sheet.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        format!("{sheet}!{cells}")
    } else {
        format!("'{}'!{cells}", sheet.replace('\'', "''"))
    }
}

/// Ranges outside a `rows` x `columns` block anchored at A1: every row below
/// it and every column to its right.
fn stale_ranges(sheet: &str, rows: usize, columns: usize) -> Vec<String> {
    vec![
        a1_range(sheet, &format!("A{}:{LAST_COLUMN}", rows + 1)),
        a1_range(
            sheet,
            &format!("{}1:{LAST_COLUMN}", column_letters(columns + 1)),
        ),
    ]
}

const LAST_COLUMN: &str = "ZZZ";

impl RecordStore for SheetsStore {
    fn read(&self, sheet: &str) -> Result<RecordSet> {
        let url = self.values_url(sheet)?;
        tracing::debug!(sheet, spreadsheet = %self.spreadsheet_id, "reading sheet");
        let response = self
            .http_client
            .get(url)
            .query(&[("valueRenderOption", "FORMATTED_VALUE")])
            .bearer_auth(&self.access_token)
            .send()?;
        let range: ValueRange = Self::check(sheet, response)?.json()?;

        let mut rows = range.values.into_iter();
        let header: Vec<String> = rows
            .next()
            .unwrap_or_default()
            .into_iter()
            .map(|v| cell_from_json(v).unwrap_or_default())
            .collect();
        let rows: Vec<Vec<Cell>> = rows
            .map(|row| row.into_iter().map(cell_from_json).collect())
            .collect();
        let set = RecordSet::from_grid(sheet, header, rows);
        set.require_unique_columns()?;
        Ok(set)
    }

    fn write(&self, sheet: &str, records: &RecordSet) -> Result<()> {
        let (header, rows) = records.to_grid();
        let width = header.len();
        let height = rows.len() + 1;
        let mut values: Vec<Vec<Value>> = Vec::with_capacity(height);
        values.push(header.into_iter().map(Value::String).collect());
        values.extend(
            rows.into_iter()
                .map(|row| row.into_iter().map(cell_to_json).collect::<Vec<_>>()),
        );

        // Nothing is cleared until the grid has been written.
        let range = a1_range(sheet, "A1");
        let body = ValueRangeBody {
            range: &range,
            major_dimension: "ROWS",
            values,
        };
        let response = self
            .http_client
            .put(self.values_url(&range)?)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()?;
        Self::check(sheet, response)?;

        // Drop rows and columns left over from a larger previous grid.
        let response = self
            .http_client
            .post(self.api_url(&["values:batchClear"])?)
            .bearer_auth(&self.access_token)
            .json(&serde_json::json!({ "ranges": stale_ranges(sheet, height, width) }))
            .send()?;
        Self::check(sheet, response)?;

        tracing::debug!(sheet, rows = records.len(), "wrote sheet");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const ID: &str = "1AbCdEfGhIjKlMn";

    fn store(server: &mockito::Server) -> SheetsStore {
        SheetsStore::new(
            &format!("https://docs.google.com/spreadsheets/d/{ID}/edit"),
            "test-token",
            &server.url(),
        )
        .unwrap()
    }

    #[test]
    fn read_parses_header_and_pads_short_rows() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", format!("/v4/spreadsheets/{ID}/values/WO_Log").as_str())
            .match_query(Matcher::UrlEncoded(
                "valueRenderOption".into(),
                "FORMATTED_VALUE".into(),
            ))
            .match_header("authorization", "Bearer test-token")
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"range":"WO_Log!A1:C3","majorDimension":"ROWS","values":[
                    ["WO Number","Status","Assigned To"],
                    ["1200.0","Pending",""],
                    ["WO-867","Completed"]
                ]}"#,
            )
            .create();

        let set = store(&server).read("WO_Log").unwrap();
        mock.assert();
        assert_eq!(set.columns(), ["WO Number", "Status", "Assigned To"]);
        assert_eq!(set.records()[0].get("WO Number"), Some("1200.0"));
        assert_eq!(set.keys(), ["1200", "WO-867"]);
        assert_eq!(set.records()[0].get("Assigned To"), None);
        assert_eq!(set.records()[1].get("Assigned To"), None);
    }

    #[test]
    fn read_empty_sheet() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", format!("/v4/spreadsheets/{ID}/values/users").as_str())
            .match_query(Matcher::Any)
            .with_body(r#"{"range":"users!A1:Z1000","majorDimension":"ROWS"}"#)
            .create();

        let set = store(&server).read("users").unwrap();
        assert!(set.is_empty());
        assert!(set.columns().is_empty());
    }

    #[test]
    fn read_unknown_sheet_maps_to_sheet_not_found() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", format!("/v4/spreadsheets/{ID}/values/nope").as_str())
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(r#"{"error":{"code":400,"message":"Unable to parse range: nope"}}"#)
            .create();

        assert!(matches!(
            store(&server).read("nope"),
            Err(WotrackError::SheetNotFound(s)) if s == "nope"
        ));
    }

    #[test]
    fn permission_denied_is_store_unavailable() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", format!("/v4/spreadsheets/{ID}/values/WO_Log").as_str())
            .match_query(Matcher::Any)
            .with_status(403)
            .create();

        assert!(matches!(
            store(&server).read("WO_Log"),
            Err(WotrackError::StoreUnavailable(_))
        ));
    }

    fn two_column_set() -> RecordSet {
        RecordSet::from_grid(
            "WO_Log",
            vec!["WO Number".into(), "Status".into()],
            vec![vec![Some("1200".into()), None]],
        )
    }

    #[test]
    fn write_puts_grid_then_clears_stale_area() {
        let mut server = mockito::Server::new();
        let put = server
            .mock("PUT", format!("/v4/spreadsheets/{ID}/values/WO_Log!A1").as_str())
            .match_query(Matcher::UrlEncoded(
                "valueInputOption".into(),
                "USER_ENTERED".into(),
            ))
            .match_body(Matcher::PartialJson(serde_json::json!({
                "range": "WO_Log!A1",
                "majorDimension": "ROWS",
                "values": [["WO Number", "Status"], ["1200", ""]]
            })))
            .with_body("{}")
            .create();
        let clear = server
            .mock("POST", format!("/v4/spreadsheets/{ID}/values:batchClear").as_str())
            .match_body(Matcher::Json(serde_json::json!({
                "ranges": ["WO_Log!A3:ZZZ", "WO_Log!C1:ZZZ"]
            })))
            .with_body("{}")
            .create();

        store(&server).write("WO_Log", &two_column_set()).unwrap();
        put.assert();
        clear.assert();
    }

    #[test]
    fn failed_put_never_clears() {
        let mut server = mockito::Server::new();
        let put = server
            .mock("PUT", format!("/v4/spreadsheets/{ID}/values/WO_Log!A1").as_str())
            .match_query(Matcher::Any)
            .with_status(503)
            .create();
        let clear = server
            .mock("POST", format!("/v4/spreadsheets/{ID}/values:batchClear").as_str())
            .expect(0)
            .create();

        assert!(matches!(
            store(&server).write("WO_Log", &two_column_set()),
            Err(WotrackError::StoreUnavailable(_))
        ));
        put.assert();
        clear.assert();
    }

    #[test]
    fn read_then_write_sends_displayed_values_back() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", format!("/v4/spreadsheets/{ID}/values/WO_Log").as_str())
            .match_query(Matcher::Any)
            .with_body(
                r#"{"values":[["WO Number","Date","Status"],["1200","5/1/2024","Pending"]]}"#,
            )
            .create();
        let put = server
            .mock("PUT", format!("/v4/spreadsheets/{ID}/values/WO_Log!A1").as_str())
            .match_query(Matcher::UrlEncoded(
                "valueInputOption".into(),
                "USER_ENTERED".into(),
            ))
            .match_body(Matcher::PartialJson(serde_json::json!({
                "values": [["WO Number", "Date", "Status"], ["1200", "5/1/2024", "Pending"]]
            })))
            .with_body("{}")
            .create();
        server
            .mock("POST", format!("/v4/spreadsheets/{ID}/values:batchClear").as_str())
            .with_body("{}")
            .create();

        let sheets = store(&server);
        let set = sheets.read("WO_Log").unwrap();
        assert_eq!(set.records()[0].get("Date"), Some("5/1/2024"));
        sheets.write("WO_Log", &set).unwrap();
        put.assert();
    }

    #[test]
    fn column_letters_wrap_past_z() {
        assert_eq!(column_letters(1), "A");
        assert_eq!(column_letters(26), "Z");
        assert_eq!(column_letters(27), "AA");
        assert_eq!(column_letters(703), "AAA");
    }

    #[test]
    fn sheet_names_with_spaces_are_quoted() {
        assert_eq!(a1_range("WO_Log", "A1"), "WO_Log!A1");
        assert_eq!(a1_range("WO Log", "A1"), "'WO Log'!A1");
        assert_eq!(
            stale_ranges("users", 5, 1),
            ["users!A6:ZZZ", "users!B1:ZZZ"]
        );
    }

    #[test]
    fn rejects_bad_source_and_empty_token() {
        assert!(matches!(
            SheetsStore::new("not a url", "t", DEFAULT_BASE),
            Err(WotrackError::InvalidSource(_))
        ));
        assert!(matches!(
            SheetsStore::new(ID, "  ", DEFAULT_BASE),
            Err(WotrackError::StoreUnavailable(_))
        ));
    }

    const DEFAULT_BASE: &str = crate::config::DEFAULT_SHEETS_API;
}
