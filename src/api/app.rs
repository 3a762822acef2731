// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Portal app shell served at `/`.
//!
//! A minimal server-rendered page; the client-side portal mounts into
//! `#portal-root`. While maintenance mode is on, only privileged viewers
//! reach this handler and the gate adds the admin banner to it.

use axum::response::Html;

const APP_SHELL: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>Relational Portal</title>
<style>
body{margin:0;font-family:-apple-system,'Segoe UI',sans-serif;background:#0b1020;color:#e2e8f0}
header{display:flex;justify-content:space-between;align-items:center;padding:16px 32px;border-bottom:1px solid #1e293b}
header a{color:#a5b4fc;text-decoration:none;margin-left:20px}
#portal-root{max-width:1100px;margin:0 auto;padding:48px 32px}
</style>
</head>
<body>
<header><strong>Relational Portal</strong><nav><a href="/docs">API</a><a href="/health">Status</a></nav></header>
<div id="portal-root" data-version="{{VERSION}}"></div>
</body>
</html>
"#;

/// Portal app shell.
#[utoipa::path(
    get,
    path = "/",
    tag = "Portal",
    responses(
        (status = 200, description = "Portal app shell", body = String, content_type = "text/html"),
        (status = 503, description = "Maintenance page", body = String, content_type = "text/html")
    )
)]
pub async fn app_shell() -> Html<String> {
    Html(APP_SHELL.replace("{{VERSION}}", env!("CARGO_PKG_VERSION")))
}
