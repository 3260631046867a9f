//!  Farecast Fare Estimator
//!
//!  Copyright (C) 2026  Mamy Ratsimbazafy
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! # Comparison Report
//!
//! Side-effect free rendering of a [`Comparison`]: the HTML page served by the
//! web front end and the JSON payload returned by the CLI and MCP tool.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::estimator::{Comparison, FareQuote, TrendPoint};
use crate::trip_request::PriceBand;
use crate::vocabulary::{CityColumns, Vocabulary};

const HOME_TEMPLATE: &str = include_str!("../assets/home.html");

/// What the page shows below the form
#[derive(Debug, Clone, Copy)]
pub enum PageBody<'a> {
    Form,
    Comparison(&'a Comparison),
    Error(&'a str),
}

impl Comparison {
    pub fn best_text(&self) -> String {
        format!(
            "Best Fare Today: {} — ₹{:.2}",
            self.best.airline, self.best.fare
        )
    }

    pub fn status_text(&self) -> String {
        let day = self.journey_date.day();
        let month = self.journey_date.month();
        if self.has_fare_in_range() {
            format!(
                "Flights available within your expected range on {}-{}",
                day, month
            )
        } else {
            format!(
                "⚠️ No flights matched your expected price range on {}-{}",
                day, month
            )
        }
    }

    pub fn cheapest_text(&self) -> String {
        format!(
            "Cheapest day: {} — ₹{:.2} ({})",
            fmt_day_month(self.cheapest_day.date),
            self.cheapest_day.fare,
            self.cheapest_day.airline
        )
    }

    pub fn to_api_response(&self) -> ComparisonResponse {
        ComparisonResponse {
            journey_date: self.journey_date,
            price_band: self.price_band,
            best_text: self.best_text(),
            status_text: self.status_text(),
            cheapest_text: self.cheapest_text(),
            fares: self.fares.clone(),
            trend: self.trend.clone(),
            cheapest_day: self.cheapest_day.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ComparisonResponse {
    pub journey_date: NaiveDate,
    pub price_band: PriceBand,
    pub best_text: String,
    pub status_text: String,
    pub cheapest_text: String,
    pub fares: Vec<FareQuote>,
    pub trend: Vec<TrendPoint>,
    pub cheapest_day: TrendPoint,
}

/// `02-Nov` style label used by the trend chart
pub fn fmt_day_month(date: NaiveDate) -> String {
    date.format("%d-%b").to_string()
}

pub fn trend_json(trend: &[TrendPoint]) -> Value {
    Value::Array(
        trend
            .iter()
            .map(|p| json!({ "date": fmt_day_month(p.date), "fare": p.fare }))
            .collect(),
    )
}

pub fn calendar_json(trend: &[TrendPoint]) -> Value {
    Value::Array(
        trend
            .iter()
            .map(|p| json!({ "date": fmt_day_month(p.date), "fare": p.fare, "airline": p.airline }))
            .collect(),
    )
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn fare_table_html(fares: &[FareQuote]) -> String {
    let mut html = String::from(
        "<table border=\"1\" class=\"dataframe table table-striped table-bordered text-center\">\n\
         \x20 <thead>\n\
         \x20   <tr style=\"text-align: right;\">\n\
         \x20     <th>Airline</th>\n\
         \x20     <th>Predicted Fare (₹)</th>\n\
         \x20     <th>Fare Status</th>\n\
         \x20   </tr>\n\
         \x20 </thead>\n\
         \x20 <tbody>\n",
    );
    for quote in fares {
        html.push_str(&format!(
            "    <tr>\n      <td>{}</td>\n      <td>{:.2}</td>\n      <td>{}</td>\n    </tr>\n",
            escape_html(&quote.airline),
            quote.fare,
            quote.status
        ));
    }
    html.push_str("  </tbody>\n</table>");
    html
}

pub fn render_page(vocabulary: &Vocabulary, body: PageBody<'_>) -> String {
    let source_options = city_options(&vocabulary.origins);
    let destination_options = city_options(&vocabulary.destinations);

    let (best, status, table, cheapest, trend, calendar) = match body {
        PageBody::Form => (
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            Value::Array(Vec::new()),
            Value::Array(Vec::new()),
        ),
        PageBody::Comparison(comparison) => (
            escape_html(&comparison.best_text()),
            escape_html(&comparison.status_text()),
            fare_table_html(&comparison.fares),
            escape_html(&comparison.cheapest_text()),
            trend_json(&comparison.trend),
            calendar_json(&comparison.trend),
        ),
        PageBody::Error(message) => (
            String::new(),
            String::new(),
            format!("<p style='color:red;'>Error: {}</p>", escape_html(message)),
            String::new(),
            Value::Array(Vec::new()),
            Value::Array(Vec::new()),
        ),
    };

    let trend = script_json(&trend);
    let calendar = script_json(&calendar);
    fill_template(
        HOME_TEMPLATE,
        &[
            ("source_options", source_options.as_str()),
            ("destination_options", destination_options.as_str()),
            ("best_text", best.as_str()),
            ("status_text", status.as_str()),
            ("result_table", table.as_str()),
            ("cheapest_text", cheapest.as_str()),
            ("trend_data", trend.as_str()),
            ("calendar_data", calendar.as_str()),
        ],
    )
}

fn city_options(columns: &CityColumns) -> String {
    columns
        .cities()
        .map(|city| {
            let city = escape_html(city);
            format!("        <option value=\"{}\">{}</option>", city, city)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// JSON safe to inline in a `<script>` element
fn script_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

/// Substitute `{{ name }}` markers in a single pass, so substituted text is never rescanned
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + 4096);
    let mut rest = template;
    while let Some(start) = rest.find("{{ ") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 3..];
        let Some(end) = after.find(" }}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after[..end];
        match values.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => {
                tracing::warn!("Unknown template marker: {}", key);
                out.push_str(&rest[start..start + 3 + end + 3]);
            }
        }
        rest = &after[end + 3..];
    }
    out.push_str(rest);
    out
}
