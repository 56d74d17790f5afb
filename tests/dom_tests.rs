use psycho_client::dom::dom_model::{Document, Element};
use psycho_client::dom::form::{checkbox_names, form_data_entries, named_items, option_values};
use psycho_client::dom::parser::decode_entities;
use psycho_client::ClientError;

mod common;
use crate::common::fixtures::FORM_HTML;

fn fixture_form() -> (Document, psycho_client::dom::dom_model::NodeId) {
    let doc = Document::parse(FORM_HTML).expect("fixture parses");
    let form = doc.find_form("psychoform").expect("form present");
    (doc, form)
}

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn parse_nested_elements_and_text() {
    let doc = Document::parse("<div id=\"a\"><p>Hello <b>world</b></p></div>").unwrap();
    let div = doc.by_id("a").unwrap();
    assert_eq!(doc.text_content(div), "Hello world");
    assert_eq!(doc.inner_html(div), "<p>Hello <b>world</b></p>");
}

#[test]
fn parse_lowercases_tags_and_attribute_names() {
    let doc = Document::parse("<DIV ID=\"x\" Class=\"Big\">t</DIV>").unwrap();
    let div = doc.by_id("x").unwrap();
    let e = doc.element(div).unwrap();
    assert_eq!(e.tag, "div");
    assert_eq!(e.attr("class"), Some("Big"));
}

#[test]
fn parse_skips_doctype_and_comments() {
    let doc = Document::parse("<!DOCTYPE html><!-- note --><p>x</p>").unwrap();
    assert_eq!(doc.inner_html(doc.root()), "<p>x</p>");
}

#[test]
fn parse_unclosed_comment_is_an_error() {
    let err = Document::parse("<p>x</p><!-- never closed").unwrap_err();
    assert!(matches!(err, ClientError::HtmlParse(_)));
}

#[test]
fn parse_void_and_self_closing_tags_take_no_children() {
    let doc = Document::parse("<div id=\"d\"><br><img src=\"a.png\"/><span>s</span></div>").unwrap();
    let div = doc.by_id("d").unwrap();
    assert_eq!(doc.children(div).len(), 3);
    assert_eq!(doc.inner_html(div), "<br><img src=\"a.png\"><span>s</span>");
}

#[test]
fn parse_unquoted_and_single_quoted_attributes() {
    let doc = Document::parse("<input name=q1 value='a b' type=radio>").unwrap();
    let input = doc.descendants(doc.root())[0];
    let e = doc.element(input).unwrap();
    assert_eq!(e.attr("name"), Some("q1"));
    assert_eq!(e.value, "a b");
    assert_eq!(e.control_type(), Some("radio"));
}

#[test]
fn parse_first_duplicate_attribute_wins() {
    let doc = Document::parse("<p id=\"one\" id=\"two\">x</p>").unwrap();
    assert!(doc.by_id("one").is_some());
    assert!(doc.by_id("two").is_none());
}

#[test]
fn parse_ignores_stray_end_tags() {
    let doc = Document::parse("<div id=\"d\">a</span>b</div>").unwrap();
    assert_eq!(doc.text_content(doc.by_id("d").unwrap()), "ab");
}

#[test]
fn parse_script_body_is_raw_text() {
    let doc = Document::parse("<script>if (a < b) { x(); }</script>").unwrap();
    assert_eq!(
        doc.inner_html(doc.root()),
        "<script>if (a < b) { x(); }</script>"
    );
}

#[test]
fn parse_option_implicitly_closes_previous_option() {
    let doc = Document::parse("<select name=\"s\"><option>a<option>b</select>").unwrap();
    let select = doc.descendants(doc.root())[0];
    assert_eq!(doc.children(select).len(), 2);
    assert_eq!(option_values(&doc, select), vec!["a", "b"]);
}

#[test]
fn decode_entities_handles_named_and_numeric_references() {
    assert_eq!(decode_entities("a &amp; b &lt;c&gt; &#65;&#x42;"), "a & b <c> AB");
    assert_eq!(decode_entities("fish & chips"), "fish & chips");
    assert_eq!(decode_entities("&bogus;"), "&bogus;");
}

// ============================================================================
// Tree edits and serialization
// ============================================================================

#[test]
fn text_is_escaped_on_output() {
    let mut doc = Document::new();
    let root = doc.root();
    let p = doc.append_element(root, Element::new("p", vec![]));
    doc.append_text(p, "<b>not bold</b> & more");
    assert_eq!(doc.inner_html(root), "<p>&lt;b&gt;not bold&lt;/b&gt; &amp; more</p>");
}

#[test]
fn boolean_attributes_serialize_without_value() {
    let html = "<input type=\"checkbox\" name=\"a\" value=\"x\" checked disabled><input name=\"b\" value=\"\">";
    let doc = Document::parse(html).unwrap();
    assert_eq!(doc.inner_html(doc.root()), html);
}

#[test]
fn detach_hides_node_from_queries() {
    let mut doc = Document::parse("<div id=\"a\"><span id=\"b\">x</span></div>").unwrap();
    let span = doc.by_id("b").unwrap();
    doc.detach(span);
    assert!(!doc.is_attached(span));
    assert!(doc.by_id("b").is_none());

    let div = doc.by_id("a").unwrap();
    doc.append_child(div, span);
    assert!(doc.is_attached(span));
    assert_eq!(doc.by_id("b"), Some(span));
}

#[test]
fn compact_drops_detached_nodes_and_renumbers() {
    let mut doc = Document::parse("<div id=\"a\"><b>x</b><i>y</i></div><p id=\"c\">z</p>").unwrap();
    let before = doc.node_count();
    let div = doc.by_id("a").unwrap();
    let p = doc.by_id("c").unwrap();
    doc.clear_children(div);

    let p = doc.compact(p).expect("paragraph still attached");
    assert_eq!(doc.node_count(), before - 4);
    assert_eq!(doc.by_id("c"), Some(p));
    assert_eq!(doc.text_content(p), "z");
    assert_eq!(doc.inner_html(doc.root()), "<div id=\"a\"></div><p id=\"c\">z</p>");
}

#[test]
fn compact_forgets_a_detached_keep() {
    let mut doc = Document::parse("<div id=\"a\"><span id=\"b\">x</span></div>").unwrap();
    let span = doc.by_id("b").unwrap();
    doc.detach(span);
    assert_eq!(doc.compact(span), None);
    assert_eq!(doc.node_count(), 2);
}

#[test]
fn set_text_content_replaces_children() {
    let mut doc = Document::parse("<div id=\"a\"><b>x</b><i>y</i></div>").unwrap();
    let div = doc.by_id("a").unwrap();
    doc.set_text_content(div, "plain");
    assert_eq!(doc.inner_html(div), "plain");
}

#[test]
fn elements_by_class_matches_any_class_token() {
    let doc = Document::parse("<div class=\"a message-container b\">m</div><div class=\"other\"></div>")
        .unwrap();
    assert_eq!(doc.elements_by_class(doc.root(), "message-container").len(), 1);
}

#[test]
fn serialization_reflects_live_control_state() {
    let (mut doc, form) = fixture_form();
    let color = named_items(&doc, form, "color")[0];
    {
        let e = doc.element_mut(color).unwrap();
        e.value = "blue".into();
        e.disabled = true;
    }
    let html = doc.inner_html(form);
    assert!(
        html.contains("<input type=\"text\" name=\"color\" value=\"blue\" disabled>"),
        "{}",
        html
    );

    let cat = named_items(&doc, form, "pets")[0];
    doc.element_mut(cat).unwrap().checked = true;
    assert!(doc
        .inner_html(form)
        .contains("<input type=\"checkbox\" name=\"pets\" value=\"cat\" checked>"));
}

#[test]
fn select_value_drives_selected_option() {
    let (mut doc, form) = fixture_form();
    let job = named_items(&doc, form, "job")[0];
    assert_eq!(doc.element(job).unwrap().value, "doctor");

    doc.element_mut(job).unwrap().value = "ceo".into();
    let html = doc.inner_html(form);
    assert!(html.contains("<option value=\"ceo\" selected>"), "{}", html);
    assert!(html.contains("<option value=\"doctor\">"), "{}", html);
}

// ============================================================================
// Form helpers
// ============================================================================

#[test]
fn find_form_by_name() {
    let (doc, _) = fixture_form();
    assert!(doc.find_form("psychoform").is_some());
    assert!(doc.find_form("viewpsychoform").is_none());
}

#[test]
fn named_items_groups_radios_and_checkboxes() {
    let (doc, form) = fixture_form();
    assert_eq!(named_items(&doc, form, "q1").len(), 3);
    assert_eq!(named_items(&doc, form, "pets").len(), 3);
    assert!(named_items(&doc, form, "missing").is_empty());
}

#[test]
fn checkbox_names_in_document_order() {
    let (doc, form) = fixture_form();
    assert_eq!(checkbox_names(&doc, form), vec!["pets", "hobbies"]);
}

#[test]
fn form_data_entries_skip_unchecked_and_buttons() {
    let (doc, form) = fixture_form();
    let entries = form_data_entries(&doc, form);
    let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["name", "color", "job", "q1", "notes"]);
    assert!(entries.contains(&("q1".to_string(), "neutral".to_string())));
    assert!(entries.contains(&("notes".to_string(), "hello".to_string())));
}

#[test]
fn form_data_entries_skip_disabled_controls() {
    let (mut doc, form) = fixture_form();
    let color = named_items(&doc, form, "color")[0];
    doc.element_mut(color).unwrap().disabled = true;
    assert!(form_data_entries(&doc, form).iter().all(|(n, _)| n != "color"));
}

#[test]
fn checkbox_without_value_defaults_to_on() {
    let doc = Document::parse("<input type=\"checkbox\" name=\"agree\">").unwrap();
    let input = doc.descendants(doc.root())[0];
    assert_eq!(doc.element(input).unwrap().value, "on");
}
