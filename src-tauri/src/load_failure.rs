use std::{
    io,
    net::{TcpStream, ToSocketAddrs},
    time::Duration,
};

use crate::BRAND_NAME;

// Chromium net error numbers, which is what the in-page message reports.
pub(crate) const ERR_FAILED: i32 = -2;
pub(crate) const ERR_ABORTED: i32 = -3;
pub(crate) const ERR_CONNECTION_REFUSED: i32 = -102;
pub(crate) const ERR_NAME_NOT_RESOLVED: i32 = -105;
pub(crate) const ERR_INTERNET_DISCONNECTED: i32 = -106;
pub(crate) const ERR_CONNECTION_TIMED_OUT: i32 = -118;

const BENIGN_ERROR_CODES: &[i32] = &[ERR_ABORTED, ERR_NAME_NOT_RESOLVED, ERR_INTERNET_DISCONNECTED];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LoadFailure {
    pub(crate) code: i32,
    pub(crate) description: String,
    pub(crate) url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FailureResponse {
    pub(crate) show_fallback: bool,
    pub(crate) schedule_reload: bool,
}

pub(crate) fn is_benign_error_code(code: i32) -> bool {
    BENIGN_ERROR_CODES.contains(&code)
}

pub(crate) fn decide_failure_response(code: i32, auto_reload: bool) -> FailureResponse {
    FailureResponse {
        show_fallback: !is_benign_error_code(code),
        schedule_reload: auto_reload && code != ERR_ABORTED,
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub(crate) fn fallback_page_html(failure: &LoadFailure) -> String {
    format!(
        concat!(
            "<div style=\"padding: 20px; font-family: sans-serif;\">",
            "<h1>Failed to load {brand}</h1>",
            "<p>The page could not be loaded.</p>",
            "<p>Error code: {code}</p>",
            "<p>{description}</p>",
            "<button onclick=\"location.reload()\" style=\"padding: 10px 20px; background: #007bff; ",
            "color: white; border: none; border-radius: 4px; cursor: pointer;\">Reload</button>",
            "</div>"
        ),
        brand = BRAND_NAME,
        code = failure.code,
        description = escape_html(&failure.description),
    )
}

pub(crate) fn fallback_page_script(failure: &LoadFailure) -> String {
    let html = serde_json::to_string(&fallback_page_html(failure))
        .unwrap_or_else(|_| "\"\"".to_string());
    format!(
        "(function () {{ try {{ if (document.querySelector('#__next, main, [role=\"main\"]')) return; if (!document.body) {{ document.documentElement.appendChild(document.createElement('body')); }} document.body.innerHTML = {html}; }} catch (e) {{}} }})();"
    )
}

pub(crate) fn classify_probe_error(error: &io::Error) -> (i32, String) {
    let code = match error.kind() {
        io::ErrorKind::ConnectionRefused => ERR_CONNECTION_REFUSED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => ERR_CONNECTION_TIMED_OUT,
        io::ErrorKind::NotConnected
        | io::ErrorKind::AddrNotAvailable
        | io::ErrorKind::NetworkUnreachable
        | io::ErrorKind::HostUnreachable => ERR_INTERNET_DISCONNECTED,
        _ => ERR_FAILED,
    };
    (code, error.to_string())
}

/// Tries to open a TCP connection to `host:port`; `None` means reachable.
pub(crate) fn probe_connectivity(host: &str, port: u16, timeout: Duration) -> Option<(i32, String)> {
    let addrs = match (host, port).to_socket_addrs() {
        Ok(addrs) => addrs.collect::<Vec<_>>(),
        Err(error) => {
            return Some((
                ERR_NAME_NOT_RESOLVED,
                format!("failed to resolve {host}: {error}"),
            ))
        }
    };
    if addrs.is_empty() {
        return Some((ERR_NAME_NOT_RESOLVED, format!("no addresses for {host}")));
    }

    let mut last_error = None;
    for address in &addrs {
        match TcpStream::connect_timeout(address, timeout.max(Duration::from_millis(50))) {
            Ok(_) => return None,
            Err(error) => last_error = Some(error),
        }
    }
    last_error.map(|error| classify_probe_error(&error))
}
