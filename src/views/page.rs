//! Server-rendered dashboard page.
//!
//! The page is plain HTML with two tabs. Charts and the map are drawn in
//! the browser by Chart.js and Leaflet from JSON embedded in the page.

use super::{DashboardView, RenderError};
use crate::models::{ChatMessage, Speaker};
use crate::utils::html::{escape_html, script_json};
use crate::utils::units::DEFAULT_BACKGROUND;
use std::fmt::Write as _;
use tracing::warn;

const CHART_JS_URL: &str = "https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js";
const LEAFLET_JS_URL: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const LEAFLET_CSS_URL: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";

/// Which tab is shown on load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveTab {
    #[default]
    Forecast,
    Chat,
}

impl ActiveTab {
    /// Anything other than "chat" selects the forecast tab
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("chat") => ActiveTab::Chat,
            _ => ActiveTab::Forecast,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActiveTab::Forecast => "forecast",
            ActiveTab::Chat => "chat",
        }
    }
}

/// Content of the forecast tab
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherPanel {
    /// No city requested yet
    Intro,
    Report(Box<DashboardView>),
    /// The current-conditions lookup failed; `detail` is shown under the banner
    LookupFailed { city: String, detail: Option<String> },
}

pub struct PageContext<'a> {
    pub city: Option<&'a str>,
    pub tab: ActiveTab,
    pub panel: &'a WeatherPanel,
    pub transcript: &'a [ChatMessage],
}

/// Render the complete dashboard page
pub fn render_page(ctx: &PageContext<'_>) -> String {
    let background = match ctx.panel {
        WeatherPanel::Report(view) => view.background.as_str(),
        _ => DEFAULT_BACKGROUND,
    };
    let city_value = escape_html(ctx.city.unwrap_or_default());

    let mut html = String::with_capacity(16 * 1024);
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Weather Forecast AI</title>
<link rel="stylesheet" href="{LEAFLET_CSS_URL}">
<style>
body {{ margin: 0; font-family: sans-serif; color: #fff; display: flex; min-height: 100vh;
  background: url('/assets/{background}') center / cover no-repeat fixed; }}
aside {{ width: 260px; padding: 24px; background: rgba(0, 0, 0, 0.6); }}
main {{ flex: 1; padding: 24px 40px; background: rgba(0, 0, 0, 0.35); }}
.tabs a {{ color: #fff; margin-right: 16px; text-decoration: none; padding-bottom: 4px; }}
.tabs a.active {{ border-bottom: 2px solid #fff; }}
.tab {{ display: none; }}
.tab.active {{ display: block; }}
.metrics {{ display: grid; grid-template-columns: repeat(2, 1fr); gap: 12px; max-width: 520px; }}
.metric {{ background: rgba(255, 255, 255, 0.15); padding: 12px; border-radius: 8px; }}
.metric b {{ display: block; font-size: 1.6em; }}
table.daily td, table.daily th {{ padding: 4px 12px; text-align: left; }}
.error {{ background: rgba(180, 0, 0, 0.7); padding: 12px; border-radius: 8px; }}
.notice {{ color: #ffd27f; }}
#map {{ height: 360px; max-width: 720px; }}
.chart {{ max-width: 720px; background: rgba(255, 255, 255, 0.9); margin-bottom: 16px; }}
.msg {{ margin: 6px 0; padding: 8px 12px; border-radius: 8px; max-width: 640px; }}
.msg.user {{ background: rgba(0, 90, 200, 0.6); }}
.msg.assistant {{ background: rgba(255, 255, 255, 0.2); }}
.typing {{ width: 22ch; white-space: nowrap; overflow: hidden; font-size: 2.5em; font-weight: bold;
  text-align: center; margin: 40px auto; animation: typing 2s steps(22); }}
@keyframes typing {{ from {{ width: 0 }} to {{ width: 22ch }} }}
</style>
</head>
<body>
<aside>
<h2>⛅ Weather Forecast AI</h2>
<form method="get" action="/">
<label for="city">Enter City Name:</label><br>
<input id="city" name="city" value="{city_value}">
<input type="hidden" name="view" value="forecast">
<button type="submit">Get Weather</button>
</form>
</aside>
<main>
<nav class="tabs">
<a href="/?view=forecast" class="{forecast_active}">Forecast</a>
<a href="/?view=chat" class="{chat_active}">Chat</a>
</nav>
"#,
        forecast_active = active_class(ctx.tab == ActiveTab::Forecast),
        chat_active = active_class(ctx.tab == ActiveTab::Chat),
    );

    let _ = write!(
        html,
        r#"<section id="forecast" class="tab {}">"#,
        active_class(ctx.tab == ActiveTab::Forecast)
    );
    render_weather_panel(&mut html, ctx.panel);
    html.push_str("</section>\n");

    let _ = write!(
        html,
        r#"<section id="chat" class="tab {}">"#,
        active_class(ctx.tab == ActiveTab::Chat)
    );
    render_chat(&mut html, ctx.transcript);
    html.push_str("</section>\n</main>\n</body>\n</html>\n");

    html
}

fn active_class(active: bool) -> &'static str {
    if active { "active" } else { "" }
}

fn render_weather_panel(html: &mut String, panel: &WeatherPanel) {
    match panel {
        WeatherPanel::Intro => {
            html.push_str(r#"<div class="typing">Weather Chatbot</div>"#);
        }
        WeatherPanel::LookupFailed { city, detail } => {
            let _ = write!(
                html,
                "<h1>Weather Updates for {}:</h1>\n<div class=\"error\">‼ Error: City not found ‼</div>\n",
                escape_html(city)
            );
            if let Some(detail) = detail {
                let _ = write!(html, "<p class=\"notice\">{}</p>\n", escape_html(detail));
            }
        }
        WeatherPanel::Report(view) => render_report(html, view),
    }
}

fn render_report(html: &mut String, view: &DashboardView) {
    let current = &view.current;
    let _ = write!(
        html,
        r#"<h1>Weather Updates for {city}:</h1>
<p>{icon} {description}</p>
<div class="metrics">
<div class="metric">Temperature 🌡<b>{temperature}</b></div>
<div class="metric">Pressure 🌌<b>{pressure}</b></div>
<div class="metric">Humidity 💧<b>{humidity}</b></div>
<div class="metric">Wind Speed 🌫<b>{wind}</b></div>
</div>
<h2>AI Weather Summary</h2>
<p class="{summary_class}">{summary}</p>
"#,
        city = escape_html(&view.city),
        icon = current.icon,
        description = escape_html(&current.description),
        temperature = escape_html(&current.temperature),
        pressure = escape_html(&current.pressure),
        humidity = escape_html(&current.humidity),
        wind = escape_html(&current.wind_speed),
        summary_class = if view.summary_is_fallback { "notice" } else { "" },
        summary = escape_html(&view.summary),
    );

    match &view.forecast_error {
        Some(error) => {
            let _ = write!(
                html,
                "<div class=\"error\">Error fetching forecast!</div>\n<p class=\"notice\">{}</p>\n",
                escape_html(error)
            );
        }
        None => {
            render_daily(html, view);
            if let Err(e) = render_charts(html, view) {
                warn!(error = %e, "Chart data could not be embedded");
                render_inline_error(html, "Charts unavailable", &e);
            }
        }
    }

    if let Err(e) = render_map(html, view) {
        warn!(error = %e, "Map could not be rendered");
        render_inline_error(html, "Map unavailable", &e);
    }
}

fn render_daily(html: &mut String, view: &DashboardView) {
    html.push_str(
        "<h2>Weekly Weather Forecast</h2>\n<table class=\"daily\">\n\
         <tr><th>Day</th><th>Desc</th><th>Min Temp</th><th>Max Temp</th></tr>\n",
    );
    for day in &view.daily {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{} {}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&day.day),
            day.icon,
            escape_html(&day.description),
            escape_html(&day.min_temp),
            escape_html(&day.max_temp),
        );
    }
    html.push_str("</table>\n");
}

fn render_charts(html: &mut String, view: &DashboardView) -> Result<(), RenderError> {
    let Some(charts) = &view.charts else {
        return Ok(());
    };
    let data = script_json(charts)?;

    let _ = write!(
        html,
        r#"<h2>Temperature Chart</h2>
<div class="chart"><canvas id="temperature-chart"></canvas></div>
<div class="chart"><canvas id="humidity-chart"></canvas></div>
<script src="{CHART_JS_URL}"></script>
<script>
(function () {{
  const charts = {data};
  for (const [id, chart] of [["temperature-chart", charts.temperature], ["humidity-chart", charts.humidity]]) {{
    new Chart(document.getElementById(id), {{
      type: "line",
      data: {{
        labels: chart.labels,
        datasets: chart.series.map(s => ({{ label: s.label, data: s.values, tension: 0.3 }}))
      }},
      options: {{ plugins: {{ title: {{ display: true, text: chart.title }} }} }}
    }});
  }}
}})();
</script>
"#
    );
    Ok(())
}

fn render_map(html: &mut String, view: &DashboardView) -> Result<(), RenderError> {
    let map = match (&view.map.map, &view.map.error) {
        (Some(map), _) => map,
        (None, Some(error)) => {
            let _ = write!(
                html,
                "<div class=\"error\">Map unavailable: {}</div>\n",
                escape_html(error)
            );
            return Ok(());
        }
        (None, None) => return Ok(()),
    };
    let data = script_json(map)?;

    let _ = write!(
        html,
        r#"<h2>Map</h2>
<div id="map"></div>
<script src="{LEAFLET_JS_URL}"></script>
<script>
(function () {{
  const view = {data};
  const map = L.map("map").setView([view.lat, view.lon], view.zoom);
  L.tileLayer("https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png", {{
    attribution: "&copy; OpenStreetMap contributors"
  }}).addTo(map);
  L.marker([view.lat, view.lon]).addTo(map).bindPopup(view.popup_html).openPopup();
  L.circle([view.lat, view.lon], {{ radius: view.circle_radius_m, fillOpacity: 0.2 }}).addTo(map);
}})();
</script>
"#
    );
    Ok(())
}

fn render_inline_error(html: &mut String, title: &str, error: &RenderError) {
    let _ = write!(
        html,
        "<div class=\"error\">{}: {}</div>\n",
        escape_html(title),
        escape_html(&error.to_string())
    );
}

fn render_chat(html: &mut String, transcript: &[ChatMessage]) {
    html.push_str("<h1>Weather Chat</h1>\n<div class=\"transcript\">\n");
    if transcript.is_empty() {
        html.push_str("<p class=\"notice\">Ask about the weather in any city.</p>\n");
    }
    for message in transcript {
        let (class, who) = match message.speaker {
            Speaker::User => ("user", "You"),
            Speaker::Assistant => ("assistant", "Bot"),
        };
        let _ = write!(
            html,
            "<div class=\"msg {class}\"><b>{who}:</b> {}</div>\n",
            escape_html(&message.text)
        );
    }
    html.push_str(
        r#"</div>
<form method="post" action="/chat">
<input name="message" placeholder="Ask about the weather..." required>
<button type="submit">Send</button>
</form>
"#,
    );
}
