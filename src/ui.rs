use crate::state::PageSession;

pub fn render_index(session: &PageSession, alert: Option<&str>) -> String {
    let accuracy = session.accuracy().display();
    let (card_class, units, percentage, demand_high, r2, predicted_at) = match session.result() {
        Some(panel) => (
            "result-card",
            panel.predicted_units.to_string(),
            panel.predicted_demand_percentage.to_string(),
            panel.is_demand_high.to_string(),
            panel.r2_score.map(|score| score.to_string()).unwrap_or_default(),
            format!("{} at {}", panel.label, panel.predicted_at.format("%H:%M:%S")),
        ),
        None => (
            "result-card d-none",
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        ),
    };
    let chart = session.chart();
    let revision = chart.chart().map_or(0, |chart| chart.revision());

    INDEX_HTML
        .replace("{{ACCURACY}}", &escape_html(&accuracy))
        .replace("{{CARD_CLASS}}", card_class)
        .replace("{{UNITS}}", &escape_html(&units))
        .replace("{{PERCENTAGE}}", &escape_html(&percentage))
        .replace("{{DEMAND_HIGH}}", &escape_html(&demand_high))
        .replace("{{R2}}", &escape_html(&r2))
        .replace("{{PREDICTED_AT}}", &escape_html(&predicted_at))
        .replace("{{REVISION}}", &revision.to_string())
        .replace("{{CHART}}", &chart.to_svg())
        .replace("{{ALERT}}", &alert_script(alert))
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '{' => escaped.push_str("&#123;"),
            '}' => escaped.push_str("&#125;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Blocking alert for a queued failure message.
fn alert_script(alert: Option<&str>) -> String {
    let Some(message) = alert else {
        return String::new();
    };
    let literal = serde_json::to_string(message)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/");
    format!("<script>window.alert({literal});</script>")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Demand Forecast</title>
  <style>
    :root {
      --paper: #f4f1ea;
      --panel: #ffffff;
      --ink: #1d2b24;
      --muted: #62716a;
      --line: #d9dfd8;
      --bar: #007bff;
      --highlight: #0f7a5c;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--paper);
      color: var(--ink);
      font-family: "IBM Plex Sans", "Segoe UI", Helvetica, Arial, sans-serif;
      line-height: 1.4;
    }

    .app {
      max-width: 1040px;
      margin: 0 auto;
      padding: 24px 20px 40px;
      display: grid;
      grid-template-columns: 320px 1fr;
      grid-template-areas:
        "head head"
        "form result"
        "form chart";
      gap: 20px;
    }

    header {
      grid-area: head;
      display: flex;
      flex-wrap: wrap;
      align-items: baseline;
      justify-content: space-between;
      border-bottom: 2px solid var(--ink);
      padding-bottom: 12px;
    }

    h1 {
      font-size: 1.6rem;
      letter-spacing: -0.01em;
      margin: 0;
    }

    .subtitle {
      margin: 4px 0 0;
      color: var(--muted);
      font-size: 0.95rem;
    }

    .banner {
      margin: 0;
      padding: 6px 12px;
      border: 1px solid var(--line);
      border-radius: 4px;
      background: var(--panel);
      font-size: 0.9rem;
    }

    #accuracyVal {
      font-weight: 700;
      color: var(--highlight);
    }

    form {
      grid-area: form;
      align-self: start;
      display: flex;
      flex-direction: column;
      gap: 12px;
      background: var(--panel);
      border: 1px solid var(--line);
      border-radius: 6px;
      padding: 18px;
    }

    label {
      display: flex;
      flex-direction: column;
      gap: 4px;
      font-size: 0.8rem;
      font-weight: 600;
      color: var(--muted);
    }

    input, select {
      font: inherit;
      font-size: 0.95rem;
      padding: 7px 9px;
      border-radius: 4px;
      border: 1px solid #b9c3bc;
      background: #fbfcfb;
      color: var(--ink);
    }

    input:focus, select:focus {
      outline: 2px solid var(--bar);
      outline-offset: 1px;
    }

    button {
      margin-top: 6px;
      border: none;
      border-radius: 4px;
      padding: 10px 14px;
      font: inherit;
      font-weight: 700;
      cursor: pointer;
      background: var(--ink);
      color: var(--paper);
    }

    button:hover {
      background: var(--highlight);
    }

    .result-card {
      grid-area: result;
      display: grid;
      grid-template-columns: repeat(4, 1fr);
      gap: 0;
      background: var(--panel);
      border: 1px solid var(--line);
      border-left: 5px solid var(--highlight);
      border-radius: 6px;
    }

    .d-none {
      display: none;
    }

    .stat {
      padding: 14px 16px;
      border-right: 1px solid var(--line);
      display: flex;
      flex-direction: column;
      gap: 2px;
    }

    .stat:last-of-type {
      border-right: none;
    }

    .stat .label {
      font-size: 0.75rem;
      font-weight: 600;
      color: var(--muted);
    }

    .stat .value {
      font-size: 1.35rem;
      font-weight: 700;
      font-variant-numeric: tabular-nums;
    }

    .result-card .hint {
      grid-column: 1 / -1;
      padding: 6px 16px 10px;
      border-top: 1px solid var(--line);
    }

    .chart-card {
      grid-area: chart;
      background: var(--panel);
      border: 1px solid var(--line);
      border-radius: 6px;
      padding: 12px;
    }

    #demandChart {
      width: 100%;
      height: 280px;
      display: block;
    }

    .chart-bar {
      fill: var(--bar);
    }

    .chart-bar:hover {
      fill: var(--highlight);
    }

    .chart-grid {
      stroke: var(--line);
    }

    .chart-label {
      fill: var(--muted);
      font-size: 10px;
    }

    .chart-title {
      fill: var(--ink);
      font-size: 11px;
      font-weight: 700;
    }

    .hint {
      margin: 0;
      color: var(--muted);
      font-size: 0.8rem;
    }

    footer {
      grid-column: 1 / -1;
    }

    @media (max-width: 760px) {
      .app {
        grid-template-columns: 1fr;
        grid-template-areas:
          "head"
          "form"
          "result"
          "chart";
      }

      .result-card {
        grid-template-columns: repeat(2, 1fr);
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Demand Forecast</h1>
      <p class="subtitle">Predict units sold for a store and SKU.</p>
      <p class="banner">Model accuracy (R&sup2;): <span id="accuracyVal">{{ACCURACY}}</span></p>
    </header>

    <form id="predictForm" method="post" action="/predict">
      <label>Store ID <input id="store_id" name="store_id" type="number" required /></label>
      <label>SKU ID <input id="sku_id" name="sku_id" type="number" required /></label>
      <label>Total price <input id="total_price" name="total_price" type="number" step="any" required /></label>
      <label>Base price <input id="base_price" name="base_price" type="number" step="any" required /></label>
      <label>Featured SKU
        <select id="is_featured_sku" name="is_featured_sku">
          <option value="0">No</option>
          <option value="1">Yes</option>
        </select>
      </label>
      <label>Display SKU
        <select id="is_display_sku" name="is_display_sku">
          <option value="0">No</option>
          <option value="1">Yes</option>
        </select>
      </label>
      <button type="submit">Predict</button>
    </form>

    <section id="resultCard" class="{{CARD_CLASS}}">
      <div class="stat">
        <span class="label">Predicted units</span>
        <span id="units" class="value">{{UNITS}}</span>
      </div>
      <div class="stat">
        <span class="label">Demand %</span>
        <span id="percentage" class="value">{{PERCENTAGE}}</span>
      </div>
      <div class="stat">
        <span class="label">High demand</span>
        <span id="demandHigh" class="value">{{DEMAND_HIGH}}</span>
      </div>
      <div class="stat">
        <span class="label">Model R&sup2;</span>
        <span id="r2Display" class="value">{{R2}}</span>
      </div>
      <p class="hint">{{PREDICTED_AT}}</p>
    </section>

    <section class="chart-card">
      <svg id="demandChart" viewBox="0 0 600 260" aria-label="Predicted Demand (%)" role="img" data-revision="{{REVISION}}">{{CHART}}</svg>
    </section>

    <footer class="hint">Each prediction adds a bar. The chart resets when the dashboard restarts.</footer>
  </main>
  {{ALERT}}
</body>
</html>
"#;
