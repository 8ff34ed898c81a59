// ---------------------------------------------------------------------------
// Display formatting for metric tiles and tables
// ---------------------------------------------------------------------------

/// Compact a currency amount: `$1.2M`, `$2.5K`, `$500`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }
    if value >= 1_000_000.0 {
        format!("${:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("${:.1}K", value / 1_000.0)
    } else {
        format!("${value:.0}")
    }
}

/// Currency for an optional aggregate (e.g. the mean of an empty set).
pub fn format_currency_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), format_currency)
}

/// Years with one decimal.
pub fn format_years(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.1}"))
}

/// Exact amount with thousands separators, for the detail table: `$52,000`.
pub fn format_salary(value: f64) -> String {
    let whole = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}
