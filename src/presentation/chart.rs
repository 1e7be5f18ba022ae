use serde_json::json;
use thiserror::Error;
use url::Url;

use crate::config::Config;

const WIDGET_BASE_URL: &str = "https://s.tradingview.com/widgetembed/";
const WIDGET_SCRIPT_URL: &str = "https://s3.tradingview.com/tv.js";
const CONTAINER_ID: &str = "fibo_planner_chart";

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("chart url: {0}")]
    Url(#[from] url::ParseError),

    #[error("chart config: {0}")]
    Config(#[from] serde_json::Error),
}

/// Third-party chart widget pinned to one symbol and interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartWidget {
    pub symbol: String,
    pub interval: String,
    pub theme: String,
    pub height: u32,
}

impl ChartWidget {
    pub fn new(symbol: &str, interval: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            interval: interval.to_string(),
            theme: "dark".to_string(),
            height: 500,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(&cfg.chart_symbol, &cfg.chart_interval)
    }

    pub fn embed_url(&self) -> Result<String, ChartError> {
        let url = Url::parse_with_params(
            WIDGET_BASE_URL,
            &[
                ("symbol", self.symbol.as_str()),
                ("interval", self.interval.as_str()),
                ("theme", self.theme.as_str()),
            ],
        )?;
        Ok(url.into())
    }

    /// Script snippet that mounts the widget. The config object is JSON with
    /// `</` escaped so a symbol cannot close the surrounding script tag.
    pub fn embed_html(&self) -> Result<String, ChartError> {
        let config = json!({
            "container_id": CONTAINER_ID,
            "symbol": self.symbol,
            "interval": self.interval,
            "theme": self.theme,
            "height": self.height,
            "width": "100%",
            "locale": "en",
        });
        let config = serde_json::to_string(&config)?.replace("</", "<\\/");

        Ok(format!(
            r#"<div id="{id}"></div>
<script src="{script}"></script>
<script>
new TradingView.widget({config});
</script>"#,
            id = CONTAINER_ID,
            script = WIDGET_SCRIPT_URL,
            config = config,
        ))
    }
}
