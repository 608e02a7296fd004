use cucumber::{given, then, when};
use reqwest::Method;
use serde_json::{Map, Value};

use crate::world::CertWorld;

/// Navigate a JSON value by dot-separated path (e.g., "company.jobs")
fn json_at_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for key in path.split('.') {
        current = match current {
            Value::Array(items) => items.get(key.parse::<usize>().ok()?)?,
            other => other.get(key)?,
        };
    }
    Some(current)
}

/// Table cells become JSON numbers when they parse as one; empty cells are left out.
fn row_to_body(header: &[String], row: &[String]) -> Value {
    let mut body = Map::new();
    for (key, cell) in header.iter().zip(row) {
        let cell = cell.trim();
        if cell.is_empty() {
            continue;
        }
        let value = match serde_json::from_str::<Value>(cell) {
            Ok(v @ Value::Number(_)) => v,
            _ => Value::String(cell.to_string()),
        };
        body.insert(key.trim().to_string(), value);
    }
    Value::Object(body)
}

async fn send(
    world: &mut CertWorld,
    method: Method,
    path: &str,
    body: Option<Value>,
    as_admin: bool,
) -> (u16, Value) {
    let url = format!("{}{}", world.server_addr(), world.resolve(path));
    let mut req = world.client.request(method, &url);
    if as_admin {
        if let Some(token) = &world.admin_token {
            req = req.bearer_auth(token);
        }
    }
    if let Some(body) = body {
        req = req.json(&body);
    }
    let resp = req.send().await.unwrap();
    let status = resp.status().as_u16();
    let text = resp.text().await.unwrap();
    let value = serde_json::from_str(&text).unwrap_or(Value::Null);

    world.last_status = Some(status);
    world.last_response = Some(value.clone());
    (status, value)
}

fn parse_body(raw: &str) -> Value {
    serde_json::from_str(raw.trim()).expect("invalid JSON body in step")
}

#[given("a Jobly server is running")]
async fn server_running(world: &mut CertWorld) {
    assert!(
        world.server_addr.is_some(),
        "server_addr must be set before this step"
    );
}

#[given("I have created companies:")]
async fn create_companies(world: &mut CertWorld, step: &cucumber::gherkin::Step) {
    let table = step.table.as_ref().expect("expected a table");
    let header = &table.rows[0];
    for row in table.rows.iter().skip(1) {
        let body = row_to_body(header, row);
        let (status, resp) = send(world, Method::POST, "/companies", Some(body), true).await;
        assert_eq!(status, 201, "POST /companies failed: {resp}");
    }
}

#[given("I have created jobs:")]
async fn create_jobs(world: &mut CertWorld, step: &cucumber::gherkin::Step) {
    let table = step.table.as_ref().expect("expected a table");
    let header = &table.rows[0];
    for row in table.rows.iter().skip(1) {
        let body = row_to_body(header, row);
        let (status, resp) = send(world, Method::POST, "/jobs", Some(body), true).await;
        assert_eq!(status, 201, "POST /jobs failed: {resp}");

        let title = resp["job"]["title"].as_str().expect("job has no title");
        let id = resp["job"]["id"].as_i64().expect("job has no id");
        world.job_ids.insert(title.to_string(), id);
    }
}

#[when(regex = r#"^I GET "([^"]+)"$"#)]
async fn get(world: &mut CertWorld, path: String) {
    send(world, Method::GET, &path, None, false).await;
}

#[when(regex = r#"^I POST "([^"]+)" with body (.+)$"#)]
async fn post(world: &mut CertWorld, path: String, raw: String) {
    send(world, Method::POST, &path, Some(parse_body(&raw)), true).await;
}

#[when(regex = r#"^I anonymously POST "([^"]+)" with body (.+)$"#)]
async fn post_anonymously(world: &mut CertWorld, path: String, raw: String) {
    send(world, Method::POST, &path, Some(parse_body(&raw)), false).await;
}

#[when(regex = r#"^I PATCH "([^"]+)" with body (.+)$"#)]
async fn patch(world: &mut CertWorld, path: String, raw: String) {
    send(world, Method::PATCH, &path, Some(parse_body(&raw)), true).await;
}

#[when(regex = r#"^I DELETE "([^"]+)"$"#)]
async fn delete(world: &mut CertWorld, path: String) {
    send(world, Method::DELETE, &path, None, true).await;
}

// ---- Then assertions ----

#[then(regex = r#"^the response status should be (\d+)$"#)]
async fn assert_status(world: &mut CertWorld, status: u16) {
    assert_eq!(
        world.last_status,
        Some(status),
        "unexpected status, body: {}",
        world.response()
    );
}

#[then(regex = r#"^the response at "([^"]+)" should be "([^"]*)"$"#)]
async fn assert_path_string(world: &mut CertWorld, path: String, expected: String) {
    let resp = world.response();
    let value = json_at_path(resp, &path)
        .unwrap_or_else(|| panic!("path '{path}' not found in response: {resp}"));
    let actual = value
        .as_str()
        .unwrap_or_else(|| panic!("value at '{path}' is not a string: {value}"));
    assert_eq!(actual, expected, "mismatch at path '{path}'");
}

#[then(regex = r#"^the response at "([^"]+)" should equal (.+)$"#)]
async fn assert_path_json(world: &mut CertWorld, path: String, raw: String) {
    let resp = world.response();
    let expected = parse_body(&raw);
    let value = json_at_path(resp, &path)
        .unwrap_or_else(|| panic!("path '{path}' not found in response: {resp}"));
    assert_eq!(value, &expected, "mismatch at path '{path}'");
}

#[then(regex = r#"^the response at "([^"]+)" should have (\d+) items?$"#)]
async fn assert_path_array_count(world: &mut CertWorld, path: String, count: usize) {
    let resp = world.response();
    let arr = json_at_path(resp, &path)
        .and_then(Value::as_array)
        .unwrap_or_else(|| panic!("no array at '{path}' in response: {resp}"));
    assert_eq!(arr.len(), count, "array count mismatch at path '{path}'");
}

#[then(regex = r#"^the response at "([^"]+)" should list (\w+) values "([^"]*)"$"#)]
async fn assert_listed_values(world: &mut CertWorld, path: String, field: String, expected: String) {
    let resp = world.response();
    let arr = json_at_path(resp, &path)
        .and_then(Value::as_array)
        .unwrap_or_else(|| panic!("no array at '{path}' in response: {resp}"));
    let actual: Vec<&str> = arr
        .iter()
        .map(|item| item[field.as_str()].as_str().unwrap_or_default())
        .collect();
    let expected: Vec<&str> = expected
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    assert_eq!(actual, expected, "listed {field} values at '{path}'");
}
