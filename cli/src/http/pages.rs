//! HTML rendering for the single report endpoint. Everything here is a pure
//! function of a `ReportSnapshot`.

use axum::http::{header, HeaderName, HeaderValue};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use covwatch_core::api::ReportSnapshot;

pub const CONTENT_TYPE_HTML: &str = "text/html; charset=UTF-8";
pub const X_PROGRESS: &str = "x-progress";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Complete,
    InProgress,
}

impl Progress {
    pub fn as_str(self) -> &'static str {
        match self {
            Progress::Complete => "complete",
            Progress::InProgress => "progress",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub progress: Progress,
    pub body: Bytes,
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        (
            [
                (header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_HTML)),
                (
                    HeaderName::from_static(X_PROGRESS),
                    HeaderValue::from_static(self.progress.as_str()),
                ),
            ],
            self.body,
        )
            .into_response()
    }
}

const PROCESSING_PAGE: &str = concat!(
    "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>covwatch</title></head>",
    "<body>processing...",
    "<script>setTimeout(function(){location.reload();},1000);</script>",
    "</body></html>"
);

// Polls `/` once a second. `progress` responses patch the two <pre> regions
// in place; a `complete` response reloads the page to show the report.
const POLL_SCRIPT: &str = r#"<script>
(function () {
  var POLL_MS = 1000;
  function patch(doc, id) {
    var next = doc && doc.getElementById(id);
    var cur = document.getElementById(id);
    if (next && cur) {
      cur.textContent = next.textContent;
    }
  }
  function poll() {
    var xhr = new XMLHttpRequest();
    xhr.open("GET", "/");
    xhr.responseType = "document";
    xhr.addEventListener("loadend", function () {
      if (xhr.getResponseHeader("X-Progress") === "complete") {
        location.reload();
        return;
      }
      if (xhr.status === 200) {
        patch(xhr.responseXML, "stdout");
        patch(xhr.responseXML, "stderr");
      }
      setTimeout(poll, POLL_MS);
    });
    xhr.send();
  }
  setTimeout(poll, POLL_MS);
})();
</script>"#;

pub fn render(snapshot: &ReportSnapshot) -> Page {
    if let Some(report) = &snapshot.report {
        return Page {
            progress: Progress::Complete,
            body: report.clone(),
        };
    }

    if !snapshot.started {
        return Page {
            progress: Progress::InProgress,
            body: Bytes::from_static(PROCESSING_PAGE.as_bytes()),
        };
    }

    let mut html = String::with_capacity(snapshot.stdout.len() + snapshot.stderr.len() + 1024);
    html.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\">");
    html.push_str("<title>covwatch: run ");
    html.push_str(&snapshot.run_id.to_string());
    html.push_str("</title></head><body>");
    push_stream(&mut html, "StdOut:", "stdout", &snapshot.stdout, snapshot.stdout_dropped);
    push_stream(&mut html, "StdErr:", "stderr", &snapshot.stderr, snapshot.stderr_dropped);
    html.push_str(POLL_SCRIPT);
    html.push_str("</body></html>");

    Page {
        progress: Progress::InProgress,
        body: Bytes::from(html),
    }
}

fn push_stream(html: &mut String, title: &str, id: &str, data: &[u8], dropped: u64) {
    html.push_str("<h1>");
    html.push_str(title);
    html.push_str("</h1><pre id=\"");
    html.push_str(id);
    html.push_str("\">");
    if dropped > 0 {
        html.push_str(&format!("[{dropped} earlier bytes omitted]\n"));
    }
    html.push_str(&html_escape::encode_safe(&String::from_utf8_lossy(data)));
    html.push_str("</pre>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn body(page: &Page) -> String {
        String::from_utf8(page.body.to_vec()).unwrap()
    }

    #[test]
    fn nothing_started_renders_processing_page() {
        let page = render(&ReportSnapshot::default());
        assert_eq!(page.progress, Progress::InProgress);
        assert!(body(&page).contains("processing..."));
        assert!(body(&page).contains("location.reload()"));
    }

    #[test]
    fn started_run_renders_both_streams_escaped() {
        let snap = ReportSnapshot {
            started: true,
            run_id: 3,
            stdout: b"=== RUN TestLess\n--- PASS: TestLess (a<b && b>c)\n".to_vec(),
            stderr: b"go: downloading \"x\"".to_vec(),
            ..ReportSnapshot::default()
        };
        let page = render(&snap);
        let html = body(&page);

        assert_eq!(page.progress, Progress::InProgress);
        assert!(html.contains("<pre id=\"stdout\">=== RUN TestLess\n--- PASS: TestLess (a&lt;b &amp;&amp; b&gt;c)\n</pre>"));
        assert!(html.contains("<pre id=\"stderr\">go: downloading &quot;x&quot;</pre>"));
        assert!(html.contains("XMLHttpRequest"));
        assert!(html.contains("covwatch: run 3"));
    }

    #[test]
    fn started_run_with_no_output_has_empty_panes() {
        let snap = ReportSnapshot {
            started: true,
            run_id: 1,
            ..ReportSnapshot::default()
        };
        let html = body(&render(&snap));
        assert!(html.contains("<pre id=\"stdout\"></pre>"));
        assert!(html.contains("<pre id=\"stderr\"></pre>"));
    }

    #[test]
    fn truncated_output_is_noted() {
        let snap = ReportSnapshot {
            started: true,
            stdout: b"tail".to_vec(),
            stdout_dropped: 42,
            ..ReportSnapshot::default()
        };
        let html = body(&render(&snap));
        assert!(html.contains("<pre id=\"stdout\">[42 earlier bytes omitted]\ntail</pre>"));
    }

    #[test]
    fn invalid_utf8_is_replaced_not_dropped() {
        let snap = ReportSnapshot {
            started: true,
            stdout: vec![b'o', b'k', 0xff],
            ..ReportSnapshot::default()
        };
        assert!(body(&render(&snap)).contains("ok\u{FFFD}"));
    }

    #[test]
    fn report_is_served_verbatim() {
        let snap = ReportSnapshot {
            started: true,
            report: Some(Bytes::from_static(b"<html>OK</html>")),
            stdout: b"PASS".to_vec(),
            ..ReportSnapshot::default()
        };
        let page = render(&snap);
        assert_eq!(page.progress, Progress::Complete);
        assert_eq!(page.body, Bytes::from_static(b"<html>OK</html>"));
    }
}
