//! Field cleaning for scraped market values
//!
//! Raw cell text arrives with currency symbols, thousands separators, and
//! percent signs; cleaned values keep only digits, an optional leading
//! sign, and a single `.` decimal separator.

/// Decimal convention of the source site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecimalStyle {
    /// `.` is the decimal separator, `,` separates thousands.
    Dot,
    /// `,` is the decimal separator, `.` separates thousands.
    Comma,
}

/// Strip everything but digits and separators, then normalize the decimal
/// separator to `.` per the source's convention.
pub fn clean_numeric(raw: &str, style: DecimalStyle) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();

    match style {
        DecimalStyle::Dot => kept.replace(',', ""),
        DecimalStyle::Comma => kept.replace('.', "").replace(',', "."),
    }
}

/// Clean a 24h-change cell.
///
/// The sign comes from a leading `+`/`-` in the text when present,
/// otherwise from a CSS class on the cell's indicator icon containing
/// "up" or "down". When neither matches the value stays unsigned, an
/// ambiguity consumers must tolerate.
pub fn clean_change(raw: &str, icon_class: Option<&str>, style: DecimalStyle) -> String {
    let trimmed = raw.trim();
    let sign = if trimmed.starts_with('+') {
        "+"
    } else if trimmed.starts_with('-') {
        "-"
    } else {
        match icon_class {
            Some(class) if class.contains("up") => "+",
            Some(class) if class.contains("down") => "-",
            _ => "",
        }
    };
    format!("{sign}{}", clean_numeric(trimmed, style))
}
