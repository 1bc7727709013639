//! Benchmark inputs for jsonarena
//!
//! Generates documents of different shapes so benches compare the arena
//! parser against `serde_json` on identical bytes.

/// Flat object with a few scalar members
pub const SMALL_JSON: &str = r#"{"id": 1, "name": "test", "status": "active"}"#;

/// Nested record with arrays and objects
pub const MEDIUM_JSON: &str = r#"{
  "user": {
    "id": 12345,
    "name": "John Doe",
    "email": "john.doe@example.com",
    "status": "active",
    "profile": {
      "bio": "Software engineer",
      "location": "San Francisco",
      "company": "TechCorp"
    },
    "posts": [
      {"id": 1, "title": "Hello World", "likes": 25},
      {"id": 2, "title": "Tech Tips", "likes": 42}
    ]
  }
}"#;

/// Array of `count` catalogue records
pub fn records(count: usize) -> String {
    let items: Vec<String> = (0..count)
        .map(|i| {
            format!(
                r#"{{"id": {i}, "name": "Item {i}", "price": {:.2}, "active": {}, "tags": ["a", "b", "é"]}}"#,
                i as f64 * 1.5 + 10.0,
                i % 2 == 0
            )
        })
        .collect();
    format!(r#"{{"data": [{}], "total": {count}}}"#, items.join(","))
}

/// Flat array of `count` numbers mixing integers and doubles
pub fn numbers(count: usize) -> String {
    let items: Vec<String> = (0..count)
        .map(|i| {
            if i % 2 == 0 {
                i.to_string()
            } else {
                format!("{}.{}e-3", i, i % 7)
            }
        })
        .collect();
    format!("[{}]", items.join(","))
}

/// Object with `count` members, exercising the key index
pub fn wide_object(count: usize) -> String {
    let members: Vec<String> = (0..count).map(|i| format!(r#""key{i}": {i}"#)).collect();
    format!("{{{}}}", members.join(","))
}
