use anyhow::{ensure, Result};

pub const CUSTOMER_ID_PLACEHOLDER: &str = "{customer_id}";
pub const DEFAULT_LINK_TEMPLATE: &str =
    "https://dashboard.example.com/customers#filter=V:{customer_id}~";

/// Builds the dashboard deep link for a customer.
pub trait LinkGenerator: Send + Sync {
    fn link(&self, customer_id: i64) -> String;
}

/// URL template with a literal `{customer_id}` placeholder.
#[derive(Debug, Clone)]
pub struct LinkTemplate {
    template: String,
}

impl LinkTemplate {
    pub fn new(template: &str) -> Result<Self> {
        ensure!(
            template.contains(CUSTOMER_ID_PLACEHOLDER),
            "link template '{}' does not contain {}",
            template,
            CUSTOMER_ID_PLACEHOLDER
        );
        Ok(Self {
            template: template.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }
}

impl Default for LinkTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_LINK_TEMPLATE.to_string(),
        }
    }
}

impl LinkGenerator for LinkTemplate {
    fn link(&self, customer_id: i64) -> String {
        self.template
            .replace(CUSTOMER_ID_PLACEHOLDER, &customer_id.to_string())
    }
}
