//! HTML pages: the generation form and the result view.

use crate::utils::html::escape_html;
use axum::{extract::Query, response::Html};
use serde::Deserialize;

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");
const RESULT_TEMPLATE: &str = include_str!("../../templates/result.html");
const FILENAME_PLACEHOLDER: &str = "{{filename}}";
const FILENAME_PATH_PLACEHOLDER: &str = "{{filename_path}}";

#[derive(Debug, Deserialize)]
pub struct ResultQuery {
    #[serde(default)]
    filename: Option<String>,
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_TEMPLATE)
}

/// Render the result page. The file is not checked here; a bad name shows a broken preview.
pub async fn result(Query(query): Query<ResultQuery>) -> Html<String> {
    Html(render_result(query.filename.as_deref().unwrap_or_default()))
}

/// The filename is percent-encoded as a path segment in links and HTML-escaped everywhere.
fn render_result(filename: &str) -> String {
    let path_segment = escape_html(&urlencoding::encode(filename));
    RESULT_TEMPLATE
        .replace(FILENAME_PATH_PLACEHOLDER, &path_segment)
        .replace(FILENAME_PLACEHOLDER, &escape_html(filename))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_page_references_output_and_download() {
        let page = render_result("generated_20240101_120000_deadbeef.png");
        assert!(page.contains("/output/generated_20240101_120000_deadbeef.png"));
        assert!(page.contains("/download/generated_20240101_120000_deadbeef.png"));
        assert!(!page.contains(FILENAME_PLACEHOLDER));
        assert!(!page.contains(FILENAME_PATH_PLACEHOLDER));
    }

    #[test]
    fn result_links_percent_encode_the_filename() {
        let page = render_result("../a b?x=1#frag");
        assert!(page.contains(r#"src="/output/..%2Fa%20b%3Fx%3D1%23frag""#));
        assert!(page.contains(r#"href="/download/..%2Fa%20b%3Fx%3D1%23frag""#));
        assert!(!page.contains("/output/../"));
    }

    #[test]
    fn result_page_escapes_filename() {
        let page = render_result("\"><script>alert(1)</script>");
        assert!(!page.contains("<script>alert(1)</script>"));
        assert!(page.contains("&lt;script&gt;"));
    }
}
