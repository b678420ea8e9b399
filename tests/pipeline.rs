use page_report::report::{NO_COMMENTS, NO_COOKIES, labels};
use page_report::{
    BrowserSession, CleanupPolicy, CookieRecord, PageReport, RenderedPage, ReportError, Result,
    TimingSample,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// What the fake browser does when asked to render
enum Behavior {
    Render(String),
    RenderWithoutCookies(String),
    Timeout,
    DriverFailure,
}

struct FakeSession {
    behavior: Behavior,
    events: Rc<RefCell<Vec<&'static str>>>,
}

impl FakeSession {
    fn new(behavior: Behavior) -> (Self, Rc<RefCell<Vec<&'static str>>>) {
        let events = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                behavior,
                events: Rc::clone(&events),
            },
            events,
        )
    }
}

impl BrowserSession for FakeSession {
    async fn render(&mut self, _url: &str, wait: Duration) -> Result<RenderedPage> {
        self.events.borrow_mut().push("render");
        match &self.behavior {
            Behavior::Render(markup) | Behavior::RenderWithoutCookies(markup) => {
                Ok(RenderedPage::new(markup.clone(), 0.42))
            }
            Behavior::Timeout => Err(ReportError::RenderTimeout {
                seconds: wait.as_secs(),
            }),
            Behavior::DriverFailure => Err(ReportError::Driver("session not created".to_string())),
        }
    }

    async fn cookies(&mut self) -> Result<Vec<CookieRecord>> {
        self.events.borrow_mut().push("cookies");
        match &self.behavior {
            Behavior::RenderWithoutCookies(_) => {
                Err(ReportError::Driver("no such window".to_string()))
            }
            _ => Ok(vec![CookieRecord {
                name: "session".to_string(),
                value: "abc".to_string(),
                domain: Some("example.com".to_string()),
                path: Some("/".to_string()),
                secure: true,
                http_only: true,
                expiry: None,
                same_site: Some("Lax".to_string()),
            }]),
        }
    }

    async fn close(self) -> Result<()> {
        self.events.borrow_mut().push("close");
        Ok(())
    }

    async fn leave_open(self) -> Result<()> {
        self.events.borrow_mut().push("leave_open");
        Ok(())
    }
}

fn fixture() -> String {
    format!(
        r#"<html><head><title>Fixture Page</title></head><body>
<h1>Main heading</h1>
<h2>Sub heading</h2>
<p>First paragraph.</p>
<p>Second paragraph.</p>
<p>{}</p>
<form action="/submit" method="post">
  <input type="text" name="username">
  <input type="password" name="password">
</form>
</body></html>"#,
        "x".repeat(250)
    )
}

fn ok_sample() -> TimingSample {
    TimingSample::Response {
        status_code: 200,
        elapsed_ms: 12.34,
    }
}

#[tokio::test]
async fn test_fixture_report_contents() {
    let (session, events) = FakeSession::new(Behavior::Render(fixture()));
    let report = PageReport::new("https://example.com")
        .build_report(ok_sample(), session)
        .await
        .unwrap();

    let order: Vec<&str> = report.sections().iter().map(|s| s.label.as_str()).collect();
    assert_eq!(order, labels::ORDER);

    let lines = |label: &str| report.section(label).unwrap().lines.clone();
    assert_eq!(lines(labels::TITLE), vec!["Fixture Page"]);
    assert_eq!(
        lines(labels::HEADINGS),
        vec!["<H1>: Main heading", "<H2>: Sub heading"]
    );

    let paragraphs = lines(labels::PARAGRAPHS);
    assert_eq!(paragraphs.len(), 3);
    assert_eq!(paragraphs[0], "Paragraph 1: First paragraph.");
    assert_eq!(
        paragraphs[2],
        format!("Paragraph 3: {}...", "x".repeat(200))
    );

    let forms = lines(labels::FORMS);
    assert_eq!(
        forms,
        vec![
            "Form 1:",
            "  action: /submit",
            "  method: post",
            "  Input fields:",
            "    - type: text, name: username",
            "    - type: password, name: password",
        ]
    );

    assert_eq!(lines(labels::COMMENTS), vec![NO_COMMENTS]);
    assert!(lines(labels::COOKIES).iter().any(|l| l.contains("\"session\"")));
    assert_eq!(lines(labels::LOAD), vec!["Browser load time: 0.42 s"]);

    let text = report.render();
    let title_at = text.find("--- Title ---").unwrap();
    let headings_at = text.find("--- Headings").unwrap();
    let forms_at = text.find("--- Forms ---").unwrap();
    let raw_at = text.find("--- Raw HTML source ---").unwrap();
    assert!(title_at < headings_at && headings_at < forms_at && forms_at < raw_at);
    assert!(text.ends_with("</body></html>"));

    assert_eq!(*events.borrow(), vec!["render", "cookies", "close"]);
}

#[tokio::test]
async fn test_probe_timeout_is_isolated() {
    let builder = PageReport::new("https://example.com");

    let (session, _) = FakeSession::new(Behavior::Render(fixture()));
    let with_response = builder.build_report(ok_sample(), session).await.unwrap();

    let (session, _) = FakeSession::new(Behavior::Render(fixture()));
    let with_timeout = builder
        .build_report(TimingSample::Timeout, session)
        .await
        .unwrap();

    assert_eq!(
        with_timeout.section(labels::LATENCY).unwrap().lines,
        vec!["Response time measurement failed: request timed out"]
    );
    assert_eq!(with_response.sections()[1..], with_timeout.sections()[1..]);
}

#[tokio::test]
async fn test_render_failure_leaves_session_open() {
    let (session, events) = FakeSession::new(Behavior::Timeout);
    let err = PageReport::new("https://example.com")
        .with_wait_seconds(3)
        .build_report(ok_sample(), session)
        .await
        .unwrap_err();

    assert!(matches!(err, ReportError::RenderTimeout { seconds: 3 }));
    assert_eq!(*events.borrow(), vec!["render", "leave_open"]);
}

#[tokio::test]
async fn test_always_policy_closes_after_failure() {
    let (session, events) = FakeSession::new(Behavior::DriverFailure);
    let err = PageReport::new("https://example.com")
        .with_cleanup_policy(CleanupPolicy::Always)
        .build_report(ok_sample(), session)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "driver_error");
    assert_eq!(*events.borrow(), vec!["render", "close"]);
}

#[tokio::test]
async fn test_cookie_failure_degrades_to_placeholder() {
    let (session, events) = FakeSession::new(Behavior::RenderWithoutCookies(fixture()));
    let report = PageReport::new("https://example.com")
        .build_report(ok_sample(), session)
        .await
        .unwrap();

    assert_eq!(
        report.section(labels::COOKIES).unwrap().lines,
        vec![NO_COOKIES]
    );
    assert_eq!(*events.borrow(), vec!["render", "cookies", "close"]);
}

#[tokio::test]
async fn test_generate_with_session_writes_file() {
    // Reserve a local port and release it so the probe is refused
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());
    drop(listener);

    let dir = std::env::temp_dir().join(format!("page-report-it-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let output = dir.join("report.txt");

    let (session, _) = FakeSession::new(Behavior::Render(fixture()));
    let path = PageReport::new(&url)
        .with_output_filename(output.to_str().unwrap())
        .with_probe_timeout(2)
        .generate_with_session(session)
        .await
        .unwrap();

    assert_eq!(path, output);
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains(&format!("Page report for URL: {}", url)));
    assert!(text.contains("Response time measurement failed: request error"));
    assert!(text.contains("Fixture Page"));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_failed_render_writes_no_file() {
    let dir = std::env::temp_dir().join(format!("page-report-none-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let output = dir.join("report.txt");

    let (session, _) = FakeSession::new(Behavior::Timeout);
    let result = PageReport::new("http://127.0.0.1:9/")
        .with_output_filename(output.to_str().unwrap())
        .with_probe_timeout(1)
        .generate_with_session(session)
        .await;

    assert!(result.is_err());
    assert!(!output.exists());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_empty_url_is_rejected() {
    let (session, events) = FakeSession::new(Behavior::Render(fixture()));
    let err = PageReport::new("  ")
        .generate_with_session(session)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "config_error");
    assert!(events.borrow().is_empty());
}
