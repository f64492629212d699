//! Interactive charts as standalone HTML pages rendered by Plotly.js.

use crate::analysis::moving_average::MovingAverageSet;
use crate::compare::NormalizedSeries;
use crate::domain::series::PriceSeries;
use serde_json::{json, Value};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn price_chart_html(series: &PriceSeries, averages: &MovingAverageSet, period: &str) -> String {
    let dates: Vec<String> = series
        .dates()
        .iter()
        .map(|d| d.format(DATE_FORMAT).to_string())
        .collect();

    let traces = json!([
        {
            "type": "scatter", "mode": "lines", "name": "Close Price",
            "x": dates, "y": series.closes(),
            "line": {"color": "blue", "width": 2}
        },
        {
            "type": "scatter", "mode": "lines", "name": format!("{}-Day SMA", averages.short_window),
            "x": dates, "y": averages.short,
            "line": {"color": "orange", "width": 1, "dash": "dot"}
        },
        {
            "type": "scatter", "mode": "lines", "name": format!("{}-Day SMA", averages.long_window),
            "x": dates, "y": averages.long,
            "line": {"color": "red", "width": 1, "dash": "dash"}
        }
    ]);

    let layout = json!({
        "title": {"text": format!("{} Close Price with Moving Averages ({period})", series.symbol())},
        "xaxis": {"title": {"text": "Date"}, "rangeslider": {"visible": true}},
        "yaxis": {"title": {"text": "Price (USD)"}},
        "hovermode": "x unified",
        "template": "plotly_white"
    });

    page(&format!("{} price chart", series.symbol()), &traces, &layout)
}

pub fn comparison_chart_html(performance: &[NormalizedSeries], period: &str) -> String {
    let traces: Vec<Value> = performance
        .iter()
        .map(|s| {
            let x: Vec<String> = s
                .points
                .iter()
                .map(|(d, _)| d.format(DATE_FORMAT).to_string())
                .collect();
            let y: Vec<f64> = s.points.iter().map(|(_, v)| *v).collect();
            json!({
                "type": "scatter", "mode": "lines", "name": s.symbol,
                "x": x, "y": y,
                "hovertemplate": format!("{}: %{{y:.3f}}<extra></extra>", s.symbol)
            })
        })
        .collect();

    let layout = json!({
        "title": {"text": format!("Normalized Stock Performance ({period})")},
        "xaxis": {"title": {"text": "Date"}, "rangeslider": {"visible": true}},
        "yaxis": {"title": {"text": "Normalized Price (Starting at 1.0)"}},
        "hovermode": "x unified",
        "template": "plotly_white"
    });

    page("Stock comparison", &Value::Array(traces), &layout)
}

fn page(title: &str, traces: &Value, layout: &Value) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{PLOTLY_CDN}"></script>
</head>
<body>
<div id="chart" style="width:100%;height:90vh;"></div>
<script>
Plotly.newPlot("chart", {traces}, {layout}, {{responsive: true}});
</script>
</body>
</html>
"#,
        title = escape_html(title),
        traces = script_json(traces),
        layout = script_json(layout),
    )
}

// JSON is embedded inside <script>; a literal "</" would end the element early.
fn script_json(v: &Value) -> String {
    v.to_string().replace("</", "<\\/")
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::PricePoint;
    use chrono::NaiveDate;

    fn small_series() -> PriceSeries {
        let points = (1..=3)
            .map(|d| PricePoint {
                date: NaiveDate::from_ymd_opt(2026, 4, d).unwrap(),
                close: 10.0 * d as f64,
            })
            .collect();
        PriceSeries::new("AAPL", points).unwrap()
    }

    #[test]
    fn price_chart_embeds_three_traces_with_null_gaps() {
        let series = small_series();
        let averages = MovingAverageSet::compute(&series, 2, 3).unwrap();
        let html = price_chart_html(&series, &averages, "1 Year");

        assert!(html.contains(PLOTLY_CDN));
        assert!(html.contains("\"Close Price\""));
        assert!(html.contains("\"2-Day SMA\""));
        assert!(html.contains("\"3-Day SMA\""));
        assert!(html.contains("[null,15.0,25.0]"));
        assert!(html.contains("[null,null,20.0]"));
        assert!(html.contains("AAPL Close Price with Moving Averages (1 Year)"));
    }

    #[test]
    fn comparison_chart_has_one_trace_per_symbol() {
        let perf = vec![
            NormalizedSeries {
                symbol: "AAPL".to_string(),
                points: vec![(NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(), 1.0)],
            },
            NormalizedSeries {
                symbol: "MSFT".to_string(),
                points: vec![(NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(), 1.0)],
            },
        ];
        let html = comparison_chart_html(&perf, "1 Year");
        assert!(html.contains("\"name\":\"AAPL\""));
        assert!(html.contains("\"name\":\"MSFT\""));
        assert!(html.contains("\"2026-04-01\""));
    }

    #[test]
    fn script_payload_cannot_close_the_tag() {
        let v = json!({"title": "</script><b>"});
        assert!(!script_json(&v).contains("</script>"));
    }
}
