use psycho_client::transport::transport_model::Method;
use serde_json::{Value, json};

use crate::common::mock_transport::MockTransport;

pub const FORM_HTML: &str = r#"<form name="psychoform">
  <label>Name <input type="text" name="name"></label>
  <label>Favourite colour <input type="text" name="color"></label>
  <select name="job">
    <option value="ceo">CEO</option>
    <option value="doctor" selected>Doctor</option>
    <option value="garbage">Garbage</option>
  </select>
  <input type="radio" name="q1" value="agree">
  <input type="radio" name="q1" value="neutral" checked>
  <input type="radio" name="q1" value="disagree">
  <input type="checkbox" name="pets" value="cat">
  <input type="checkbox" name="pets" value="dog">
  <input type="checkbox" name="pets" value="fish">
  <input type="checkbox" name="hobbies" value="music">
  <textarea name="notes">hello</textarea>
  <button type="button">Submit</button>
</form>"#;

pub const HOME_HTML: &str = r#"<!DOCTYPE html>
<html><head><title>Home</title></head>
<body><div id="mydiv1"><p>Welcome to the survey</p></div></body></html>"#;

pub fn profile_json(pets: Value) -> Value {
    json!({
        "name": "Ada",
        "career": { "desired": "doctor", "suitability": 4.5 },
        "movies": {
            "job": {
                "Title": "Patch Adams",
                "Year": "1998",
                "Plot": "A doctor uses humour.",
                "Rated": "PG-13",
                "local_poster": "/posters/patch.jpg"
            },
            "psych": {
                "Title": "Up",
                "Year": 2009,
                "Plot": "A balloon house.",
                "Rated": "PG",
                "local_poster": "/posters/up.jpg",
                "suitability": 2.5
            }
        },
        "pets": pets,
        "max_score": 5
    })
}

/// A server that serves the form and accepts submissions.
pub fn form_server() -> MockTransport {
    MockTransport::new()
        .on_html(Method::Get, "/form", 200, FORM_HTML)
        .on_json(Method::Post, "/submit", 200, json!({ "message": "Form submitted" }))
}
