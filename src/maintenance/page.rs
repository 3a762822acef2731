// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Maintenance page renderer.
//!
//! A pure function of the content record and a countdown snapshot. All text
//! is HTML-escaped; colors are inserted as CSS custom properties without
//! validation, so an unparseable color is simply ignored by the browser.

use super::content::MaintenanceContent;
use super::countdown::Countdown;
use super::video::embed_url;

/// Path of the countdown event stream the page subscribes to.
pub const COUNTDOWN_STREAM_PATH: &str = "/maintenance/countdown";

/// Render the full maintenance page document.
pub fn render_page(content: &MaintenanceContent, countdown: &Countdown) -> String {
    let mut html = String::with_capacity(8192);

    html.push_str(&format!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\"/>\
         <meta name=\"viewport\" content=\"width=device-width,initial-scale=1\"/>\
         <title>{title}</title>\n<style>:root{{--bg:{bg};--text:{text};--accent:{accent}}}</style>\n\
         {PAGE_CSS}</head>\n<body class=\"maintenance\">\n<main>\n",
        title = escape_html(&content.title),
        bg = escape_html(&content.background_color),
        text = escape_html(&content.text_color),
        accent = escape_html(&content.accent_color),
    ));

    html.push_str(&format!(
        "<header><h1>{}</h1><h2>{}</h2></header>\n<p class=\"description\">{}</p>\n",
        escape_html(&content.title),
        escape_html(&content.subtitle),
        escape_html(&content.description),
    ));

    html.push_str(&render_countdown(countdown));

    html.push_str(&format!(
        "<p class=\"estimated\">Estimated time: <strong>{}</strong></p>\n",
        escape_html(&content.estimated_time),
    ));

    if let Some(src) = content.video_url.as_deref().and_then(embed_url) {
        html.push_str(&format!(
            "<section class=\"video\"><iframe src=\"{}\" title=\"Maintenance video\" \
             allow=\"autoplay; encrypted-media; picture-in-picture\" allowfullscreen></iframe></section>\n",
            escape_html(&src),
        ));
    }

    html.push_str(&format!(
        "<section class=\"about\">\
         <article class=\"mission\"><h3>Our Mission</h3><p>{}</p></article>\
         <article class=\"vision\"><h3>Our Vision</h3><p>{}</p></article>\
         </section>\n<p class=\"info\">{}</p>\n",
        escape_html(&content.mission),
        escape_html(&content.vision),
        escape_html(&content.additional_info),
    ));

    html.push_str(&format!(
        "<a class=\"contact\" href=\"mailto:{}\">Contact Support</a>\n",
        escape_html(&content.contact_email),
    ));

    let links = content.social_links.present();
    if !links.is_empty() {
        html.push_str("<nav class=\"social\">");
        for (name, url) in links {
            html.push_str(&format!(
                "<a href=\"{}\" rel=\"noopener noreferrer\" target=\"_blank\">{}</a>",
                escape_html(url),
                name,
            ));
        }
        html.push_str("</nav>\n");
    }

    html.push_str("</main>\n");
    html.push_str(&COUNTDOWN_SCRIPT.replace("{{STREAM}}", COUNTDOWN_STREAM_PATH));
    html.push_str("</body></html>\n");
    html
}

fn render_countdown(countdown: &Countdown) -> String {
    let units = [
        ("days", "Days", countdown.days),
        ("hours", "Hours", countdown.hours),
        ("minutes", "Minutes", countdown.minutes),
        ("seconds", "Seconds", countdown.seconds),
    ];

    let mut html = String::from("<section class=\"countdown\" id=\"countdown\">");
    for (unit, label, value) in units {
        html.push_str(&format!(
            "<div><span data-unit=\"{unit}\">{value:02}</span><small>{label}</small></div>"
        ));
    }
    html.push_str("</section>\n");
    html
}

/// Escape text for HTML element content and double-quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const PAGE_CSS: &str = r##"<style>
*,*::before,*::after{box-sizing:border-box;margin:0;padding:0}
body{font-family:-apple-system,'Segoe UI',sans-serif;background:var(--bg);color:var(--text);line-height:1.6;min-height:100vh}
main{max-width:860px;margin:0 auto;padding:72px 24px;text-align:center}
h1{font-size:48px;font-weight:800;letter-spacing:-1px;margin-bottom:8px}
h2{font-size:20px;font-weight:500;opacity:.8;margin-bottom:24px}
.description{font-size:17px;max-width:620px;margin:0 auto 40px}
.countdown{display:flex;gap:16px;justify-content:center;margin-bottom:24px}
.countdown div{min-width:88px;padding:16px;border-radius:16px;border:1px solid var(--accent)}
.countdown span{display:block;font-size:36px;font-weight:700;color:var(--accent)}
.countdown small{font-size:12px;text-transform:uppercase;letter-spacing:1px;opacity:.7}
.estimated{margin-bottom:40px}
.video iframe{width:100%;aspect-ratio:16/9;border:0;border-radius:16px;margin-bottom:40px}
.about{display:grid;grid-template-columns:1fr 1fr;gap:18px;margin-bottom:32px;text-align:left}
.about article{padding:24px;border-radius:16px;background:rgba(255,255,255,.04)}
.about h3{color:var(--accent);margin-bottom:8px}
.info{opacity:.8;margin-bottom:32px}
.contact{display:inline-block;padding:12px 28px;border-radius:50px;background:var(--accent);color:var(--bg);font-weight:700;text-decoration:none}
.social{display:flex;gap:20px;justify-content:center;margin-top:32px}
.social a{color:var(--text);opacity:.7}
@media(max-width:640px){h1{font-size:32px}.about{grid-template-columns:1fr}.countdown div{min-width:64px}}
</style>"##;

const COUNTDOWN_SCRIPT: &str = r##"<script>
(function(){
  if(!window.EventSource){return;}
  var source=new EventSource("{{STREAM}}");
  source.addEventListener("countdown",function(e){
    var c=JSON.parse(e.data);
    ["days","hours","minutes","seconds"].forEach(function(u){
      var el=document.querySelector('[data-unit="'+u+'"]');
      if(el){el.textContent=String(c[u]).padStart(2,"0");}
    });
  });
})();
</script>
"##;
