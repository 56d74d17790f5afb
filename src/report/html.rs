use crate::dom::dom_model::escape_text;
use crate::report::report_model::RunReport;
use crate::ui::panel::PanelName;
use crate::ui::ui_state::{RENDER_TARGET_ID, UiState};

// ============================================================================
// Page export: the current page as a standalone HTML document
// ============================================================================

/// Snapshot the page: the three panel buttons with their current labels,
/// followed by the render target's content.
pub fn render_page_html(state: &UiState) -> String {
    let mut buttons = String::new();
    for panel in PanelName::ALL {
        let button = state.button(panel);
        buttons.push_str(&format!(
            "<button id=\"{id}\" class=\"{class}\">{label}</button>\n",
            id = panel.button().element_id,
            class = if button.is_active() { "nav active" } else { "nav" },
            label = escape_text(&button.label),
        ));
    }

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>Psychological Profile</title>
<style>
body {{ font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; margin: 0; background: #f5f5f5; }}
nav {{ background: #333; padding: 12px 20px; }}
nav button {{ margin-right: 8px; }}
nav button.active {{ font-weight: bold; }}
#{target} {{ max-width: 900px; margin: 20px auto; padding: 0 20px; }}
.message-container {{ background: white; border-radius: 6px; padding: 16px 20px; }}
.info-container {{ background: white; border-radius: 6px; padding: 16px 20px; margin-bottom: 12px; }}
</style>
</head>
<body>
<nav>
{buttons}</nav>
<div id="{target}">{content}</div>
</body>
</html>"##,
        target = RENDER_TARGET_ID,
        buttons = buttons,
        content = state.target_html(),
    )
}

// ============================================================================
// HTML reporter: self-contained report of a script run
// ============================================================================

/// Generate a self-contained HTML report: green/red header, one section per
/// script, failed assertions listed under their script.
pub fn generate_html_report(report: &RunReport) -> String {
    let header_color = if report.all_passed() {
        "#4CAF50"
    } else {
        "#f44336"
    };

    let status_text = if report.all_passed() {
        "ALL SCRIPTS PASSED"
    } else {
        "SOME SCRIPTS FAILED"
    };

    let duration_text = report
        .duration_ms
        .map(|ms| format!(" in {:.1}s", ms as f64 / 1000.0))
        .unwrap_or_default();

    let mut cases = String::new();
    for result in &report.script_results {
        let (class, marker) = if result.passed {
            ("pass", "\u{2713}")
        } else {
            ("fail", "\u{2717}")
        };

        cases.push_str(&format!(
            "<div class=\"script {class}\">\n<h3>{marker} {name}</h3>\n<p>Steps: {steps} | Assertions: {assertions}</p>\n",
            class = class,
            marker = marker,
            name = escape_text(&result.script_name),
            steps = result.steps_run,
            assertions = result.assertion_results.len(),
        ));

        if let Some(ref error) = result.error {
            cases.push_str(&format!(
                "<p class=\"error\">Error: {}</p>\n",
                escape_text(error)
            ));
        }

        let failed: Vec<_> = result
            .assertion_results
            .iter()
            .filter(|ar| !ar.passed)
            .collect();
        if !failed.is_empty() {
            cases.push_str("<ul class=\"failures\">\n");
            for ar in failed {
                let msg = ar.message.as_deref().unwrap_or("assertion failed");
                cases.push_str(&format!(
                    "<li>Step {}: {}</li>\n",
                    ar.step_index,
                    escape_text(msg)
                ));
            }
            cases.push_str("</ul>\n");
        }

        cases.push_str("</div>\n");
    }

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>{suite_name} - Session Report</title>
<style>
body {{ font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; margin: 0; background: #f5f5f5; }}
.header {{ background: {header_color}; color: white; padding: 20px 30px; }}
.content {{ max-width: 900px; margin: 20px auto; padding: 0 20px; }}
.script {{ background: white; border-radius: 6px; padding: 16px 20px; margin-bottom: 12px; border-left: 4px solid #ccc; }}
.script.pass {{ border-left-color: #4CAF50; }}
.script.fail {{ border-left-color: #f44336; }}
.error {{ color: #f44336; font-weight: bold; }}
.failures li {{ color: #c62828; font-size: 13px; }}
</style>
</head>
<body>
<div class="header">
<h1>{status_text}</h1>
<p>{suite_name}: {passed} passed, {failed} failed ({total} total){duration}</p>
</div>
<div class="content">
{cases}
</div>
</body>
</html>"##,
        suite_name = escape_text(&report.suite_name),
        header_color = header_color,
        status_text = status_text,
        passed = report.passed,
        failed = report.failed,
        total = report.total,
        duration = duration_text,
        cases = cases,
    )
}
