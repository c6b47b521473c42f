//! Coach pricing display: currency symbols and rates net of the platform fee.

use serde::{Deserialize, Serialize};

/// Default platform fee taken from coach rates, in percent.
pub const DEFAULT_PLATFORM_FEE_PERCENT: f64 = 15.0;

/// Symbol used when the currency code is missing or unknown.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

/// Known currency codes and their display symbols.
const CURRENCY_SYMBOLS: &[(&str, &str)] = &[
    ("USD", "$"),
    ("EUR", "€"),
    ("GBP", "£"),
    ("AUD", "A$"),
    ("NZD", "NZ$"),
    ("CAD", "C$"),
    ("JPY", "¥"),
    ("CHF", "CHF "),
];

/// Look up the display symbol for an ISO currency code (case-insensitive).
pub fn currency_symbol(code: Option<&str>) -> &'static str {
    let Some(code) = code.map(str::trim) else {
        return DEFAULT_CURRENCY_SYMBOL;
    };
    CURRENCY_SYMBOLS
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map_or(DEFAULT_CURRENCY_SYMBOL, |(_, symbol)| symbol)
}

/// How a coach charges for their time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingModel {
    Hourly,
    Session,
    Package,
}

impl PricingModel {
    pub fn parse(value: &str) -> Result<Self, String> {
        match value.trim() {
            "hourly" => Ok(PricingModel::Hourly),
            "session" => Ok(PricingModel::Session),
            "package" => Ok(PricingModel::Package),
            other => Err(format!(
                "Invalid pricing model '{other}'. Must be one of: hourly, session, package"
            )),
        }
    }

    fn unit_suffix(self) -> &'static str {
        match self {
            PricingModel::Hourly => "/hr",
            PricingModel::Session => "/session",
            PricingModel::Package => "",
        }
    }
}

/// A coach rate as shown to the coach: gross, fee, and what they receive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateBreakdown {
    pub pricing_model: PricingModel,
    pub gross_rate: f64,
    pub platform_fee_percent: f64,
    /// Net rate rounded to a whole currency unit.
    pub net_rate: i64,
    pub currency_symbol: &'static str,
    pub gross_display: String,
    pub net_display: String,
}

/// Parse a rate entered as text (e.g. `"100"`, `" 42.50 "`).
pub fn parse_rate(raw: &str) -> Result<f64, String> {
    let rate: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("Rate '{raw}' is not a number"))?;
    if !rate.is_finite() || rate < 0.0 {
        return Err(format!("Rate '{raw}' must be a non-negative number"));
    }
    Ok(rate)
}

/// Validate a platform fee percentage.
pub fn validate_fee_percent(fee_percent: f64) -> Result<(), String> {
    if (0.0..=100.0).contains(&fee_percent) {
        Ok(())
    } else {
        Err(format!(
            "Platform fee must be between 0 and 100 percent, got {fee_percent}"
        ))
    }
}

/// Rate after the platform fee, rounded to an integer.
pub fn net_rate(gross: f64, fee_percent: f64) -> i64 {
    (gross * (100.0 - fee_percent) / 100.0).round() as i64
}

/// Build the full rate breakdown for display.
pub fn rate_breakdown(
    pricing_model: PricingModel,
    gross: f64,
    currency: Option<&str>,
    fee_percent: f64,
) -> Result<RateBreakdown, String> {
    validate_fee_percent(fee_percent)?;
    if !gross.is_finite() || gross < 0.0 {
        return Err(format!("Rate {gross} must be a non-negative number"));
    }
    let net = net_rate(gross, fee_percent);
    let symbol = currency_symbol(currency);
    let suffix = pricing_model.unit_suffix();

    Ok(RateBreakdown {
        pricing_model,
        gross_rate: gross,
        platform_fee_percent: fee_percent,
        net_rate: net,
        currency_symbol: symbol,
        gross_display: format!("{symbol}{}{suffix}", format_amount(gross)),
        net_display: format!("{symbol}{net}{suffix}"),
    })
}

/// Whole amounts print without decimals, others with two.
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{amount:.0}")
    } else {
        format!("{amount:.2}")
    }
}
