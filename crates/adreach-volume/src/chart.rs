//! Standalone HTML line chart of daily reach totals, drawn with plotly.js.

use serde_json::{json, Value};

use crate::daily::DailyTotal;

const PLOTLY_SRC: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const GRID_COLOR: &str = "rgba(128, 128, 128, 0.2)";
const LINE_COLOR: &str = "rgb(204, 204, 204)";

#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub title: String,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: "Ad Reach Over Time".to_owned(),
        }
    }
}

/// Builds the plotly figure (`{"data": [...], "layout": {...}}`) for
/// `totals`.
#[must_use]
pub fn chart_figure(totals: &[DailyTotal], options: &ChartOptions) -> Value {
    let x: Vec<String> = totals
        .iter()
        .map(|t| t.date.format("%Y-%m-%d").to_string())
        .collect();
    let y: Vec<f64> = totals.iter().map(|t| t.total_reach).collect();

    let axis = |extra: Value| {
        let mut base = json!({
            "showgrid": true,
            "gridwidth": 1,
            "gridcolor": GRID_COLOR,
            "showline": true,
            "linewidth": 1,
            "linecolor": LINE_COLOR,
        });
        if let (Some(fields), Value::Object(extra)) = (base.as_object_mut(), extra) {
            fields.extend(extra);
        }
        base
    };

    json!({
        "data": [{
            "type": "scatter",
            "x": x,
            "y": y,
            "mode": "lines+markers",
            "name": "Total Ad Volume",
            "hovertemplate": "<b>Date:</b> %{x|%Y-%m-%d}<br><b>Total Volume:</b> %{y:,.0f}<br><extra></extra>",
        }],
        "layout": {
            "title": {"text": options.title, "x": 0.5, "xanchor": "center"},
            "xaxis": axis(json!({})),
            "yaxis": axis(json!({
                "title": {"text": "Total Reach (Users)"},
                "tickformat": ".0s",
            })),
            "plot_bgcolor": "white",
            "paper_bgcolor": "white",
            "hovermode": "x unified",
            "showlegend": false,
        },
    })
}

/// Renders a self-contained HTML page showing `totals` as a lines+markers
/// chart.
#[must_use]
pub fn render_chart(totals: &[DailyTotal], options: &ChartOptions) -> String {
    // "</" inside the inline script would end the element early.
    let figure = chart_figure(totals, options)
        .to_string()
        .replace("</", "<\\/");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{PLOTLY_SRC}" charset="utf-8"></script>
<style>
html,body{{margin:0;padding:0;height:100%;background:#fff;}}
#chart{{width:100%;height:100vh;}}
</style>
</head>
<body>
<div id="chart"></div>
<script>
const figure = {figure};
Plotly.newPlot("chart", figure.data, figure.layout, {{"responsive": true}});
</script>
</body>
</html>
"#,
        title = html_escape(&options.title),
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn totals() -> Vec<DailyTotal> {
        vec![
            DailyTotal {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                total_reach: 10_000.0,
            },
            DailyTotal {
                date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                total_reach: 65_000.0,
            },
        ]
    }

    #[test]
    fn figure_carries_the_daily_series() {
        let figure = chart_figure(&totals(), &ChartOptions::default());
        let trace = &figure["data"][0];
        assert_eq!(trace["x"], json!(["2024-01-01", "2024-01-02"]));
        assert_eq!(trace["y"], json!([10_000.0, 65_000.0]));
        assert_eq!(trace["mode"], "lines+markers");
        assert_eq!(trace["name"], "Total Ad Volume");
    }

    #[test]
    fn layout_matches_house_style() {
        let figure = chart_figure(&totals(), &ChartOptions::default());
        let layout = &figure["layout"];
        assert_eq!(layout["title"]["text"], "Ad Reach Over Time");
        assert_eq!(layout["title"]["xanchor"], "center");
        assert_eq!(layout["yaxis"]["title"]["text"], "Total Reach (Users)");
        assert_eq!(layout["yaxis"]["tickformat"], ".0s");
        assert_eq!(layout["yaxis"]["gridcolor"], GRID_COLOR);
        assert_eq!(layout["xaxis"]["linecolor"], LINE_COLOR);
        assert_eq!(layout["hovermode"], "x unified");
        assert_eq!(layout["showlegend"], false);
        assert_eq!(layout["plot_bgcolor"], "white");
    }

    #[test]
    fn html_embeds_plotly_and_figure() {
        let html = render_chart(&totals(), &ChartOptions::default());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(PLOTLY_SRC));
        assert!(html.contains("Plotly.newPlot(\"chart\""));
        assert!(html.contains("\"2024-01-02\""));
        assert!(html.contains("<title>Ad Reach Over Time</title>"));
    }

    #[test]
    fn title_cannot_break_out_of_the_page() {
        let options = ChartOptions {
            title: "</script><b>x & y</b>".to_owned(),
        };
        let html = render_chart(&totals(), &options);
        assert!(html.contains("<title>&lt;/script&gt;&lt;b&gt;x &amp; y&lt;/b&gt;</title>"));
        assert_eq!(html.matches("</script>").count(), 2);
    }
}
