//! Verify `build_request` / `parse_response` against JSON test vectors in
//! `test-vectors/`.
//!
//! Records are compared as parsed JSON, so key order in the vectors does
//! not matter.

use adresse_core::{
    Address, AddressClient, BoundingBox, HttpResponse, Pagination, Query, ServiceErrorOrigin,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000/AdresseWS/adresse";

fn client() -> AddressClient {
    AddressClient::new(BASE_URL)
}

fn f(input: &Value, key: &str) -> f64 {
    input[key].as_f64().unwrap()
}

/// Build a `Query` from a vector's `input` object.
fn parse_query(input: &Value) -> Query {
    let query = match input["kind"].as_str().unwrap() {
        "text" => Query::text(input["text"].as_str().unwrap()),
        "radius" => {
            let q = Query::radius(f(input, "north"), f(input, "east"));
            match input["radius"].as_f64() {
                Some(r) => q.with_radius(r),
                None => q,
            }
        }
        "box" => Query::bounding_box(BoundingBox::new(
            f(input, "north_lower"),
            f(input, "east_lower"),
            f(input, "north_upper"),
            f(input, "east_upper"),
        )),
        other => panic!("unknown query kind: {other}"),
    };

    let mut pagination = Pagination::default();
    if let Some(page) = input["page"].as_u64() {
        pagination = pagination.page(page as u32);
    }
    if let Some(per_page) = input["per_page"].as_u64() {
        pagination = pagination.per_page(per_page as u32);
    }
    query.with_pagination(pagination)
}

fn parse_origin(s: &str) -> ServiceErrorOrigin {
    match s {
        "transport" => ServiceErrorOrigin::Transport,
        "invalid_response" => ServiceErrorOrigin::InvalidResponse,
        "remote" => ServiceErrorOrigin::Remote,
        other => panic!("unknown origin: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Build
// ---------------------------------------------------------------------------

#[test]
fn build_test_vectors() {
    let raw = include_str!("../../test-vectors/build.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let query = parse_query(&case["input"]);
        let expected = &case["expected_request"];

        let req = c.build_request(&query).unwrap();
        assert_eq!(
            req.path,
            format!("{BASE_URL}{}", expected["path"].as_str().unwrap()),
            "{name}: path"
        );

        let expected_query: Vec<(String, String)> = expected["query"]
            .as_array()
            .unwrap()
            .iter()
            .map(|pair| {
                let arr = pair.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.query, expected_query, "{name}: query");
    }
}

// ---------------------------------------------------------------------------
// Parse
// ---------------------------------------------------------------------------

#[test]
fn parse_test_vectors() {
    let raw = include_str!("../../test-vectors/parse.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let sim = &case["simulated_response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            body: sim["body"].as_str().unwrap().to_string(),
        };
        let result = c.parse_response(response);

        if let Some(expected) = case.get("expected_result") {
            let expected: Vec<Address> = serde_json::from_value(expected.clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
            continue;
        }

        let expected = &case["expected_error"];
        let err = result.unwrap_err();
        assert_eq!(
            err.origin(),
            Some(parse_origin(expected["origin"].as_str().unwrap())),
            "{name}: origin"
        );
        if let Some(message) = expected["message"].as_str() {
            assert_eq!(err.message(), message, "{name}: message");
        }
        if let Some(prefix) = expected["message_prefix"].as_str() {
            assert!(err.message().starts_with(prefix), "{name}: {err}");
        }
    }
}
