use anyhow::Result;
use tinylink_registry::Link;

/// Renders links either as JSON or as one line per link.
pub struct Printer {
    json: bool,
    base_url: String,
}

impl Printer {
    pub fn new(json: bool, base_url: impl Into<String>) -> Self {
        Self {
            json,
            base_url: base_url.into(),
        }
    }

    pub fn link(&self, link: &Link) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(link)?);
        } else {
            println!("{}", self.line(link));
        }
        Ok(())
    }

    pub fn links(&self, links: &[Link]) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(links)?);
        } else if links.is_empty() {
            println!("no links");
        } else {
            for link in links {
                println!("{}", self.line(link));
            }
        }
        Ok(())
    }

    pub fn removed(&self, code: &str) -> Result<()> {
        if self.json {
            println!("{}", serde_json::json!({ "ok": true, "code": code }));
        } else {
            println!("removed {code}");
        }
        Ok(())
    }

    pub fn target(&self, link: &Link) -> Result<()> {
        if self.json {
            println!("{}", serde_json::json!({ "target_url": link.target_url }));
        } else {
            println!("{}", link.target_url);
        }
        Ok(())
    }

    fn line(&self, link: &Link) -> String {
        let last_clicked = link
            .last_clicked
            .map(|ts| ts.to_string())
            .unwrap_or_else(|| "never".to_string());

        format!(
            "{} -> {}  clicks={} last_clicked={} created_at={}",
            link.code.to_url(&self.base_url),
            link.target_url,
            link.clicks,
            last_clicked,
            link.created_at
        )
    }
}
