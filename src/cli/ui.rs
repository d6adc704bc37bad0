use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::core::{ConversionOutcome, Direction, FormView, REFERENCE_CURRENCY};

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Result,
    Error,
    Warning,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Result => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Warning => style(text).yellow(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Formats an `Option<T>` into a `Cell`. `None` is displayed as "N/A".
pub fn format_optional_cell<T>(value: Option<T>, format_fn: impl Fn(T) -> String) -> Cell {
    value.map_or(
        Cell::new("N/A")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
        |v| Cell::new(format_fn(v)).set_alignment(CellAlignment::Right),
    )
}

/// Spinner shown while a request is in flight.
pub fn new_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// One-line summary of a conversion, rounded to two decimals for display.
pub fn format_outcome(outcome: &ConversionOutcome) -> String {
    match outcome.direction {
        Direction::ToReference => format!(
            "{} {} = {:.2} {}",
            outcome.amount_in, outcome.currency_code, outcome.result, REFERENCE_CURRENCY
        ),
        Direction::FromReference => format!(
            "{} {} = {:.2} {}",
            outcome.amount_in, REFERENCE_CURRENCY, outcome.result, outcome.currency_code
        ),
    }
}

/// Renders the currency list with the selected code marked.
pub fn currencies_table(view: &FormView) -> Table {
    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell(""),
        header_cell("Code"),
        header_cell("Name"),
        header_cell("Rate"),
    ]);
    for currency in &view.currencies {
        let marker = if view.selected_currency.as_deref() == Some(currency.code.as_str()) {
            Cell::new("*").fg(Color::Green)
        } else {
            Cell::new("")
        };
        table.add_row(vec![
            marker,
            Cell::new(&currency.code).add_attribute(Attribute::Bold),
            Cell::new(&currency.name),
            format_optional_cell(currency.rate, |r| format!("{r:.4}")),
        ]);
    }
    table
}

/// Text rendering of the whole form.
pub fn render_view(view: &FormView) -> String {
    let or_unset = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());

    let mut output = format!(
        "Date: {}  Currency: {}  Amount: {}\n",
        or_unset(view.selected_date.map(|d| d.to_string())),
        or_unset(view.selected_currency.clone()),
        if view.amount.is_empty() {
            "-"
        } else {
            view.amount.as_str()
        },
    );

    if view.is_loading_currencies {
        output.push_str(&style_text("Loading currencies...\n", StyleType::Subtle));
    } else if view.currencies.is_empty() {
        output.push_str(&style_text("No currencies available\n", StyleType::Subtle));
    } else {
        let codes: Vec<&str> = view.currencies.iter().map(|c| c.code.as_str()).collect();
        output.push_str(&format!(
            "Currencies ({}): {}\n",
            or_unset(view.catalog_date.map(|d| d.to_string())),
            codes.join(", ")
        ));
    }
    if let Some(error) = &view.currency_error {
        output.push_str(&style_text(error, StyleType::Warning));
        output.push('\n');
    }

    if let Some(outcome) = &view.conversion_result {
        output.push_str(&format!(
            "Result: {} (date: {})\n",
            style_text(&format_outcome(outcome), StyleType::Result),
            outcome.date
        ));
    }
    if let Some(error) = &view.conversion_error {
        output.push_str(&style_text(error, StyleType::Error));
        output.push('\n');
    }

    let button = |direction: Direction, label: &str| {
        if view.is_converting_to(direction) {
            "Converting...".to_string()
        } else if view.can_convert {
            label.to_string()
        } else {
            style_text(label, StyleType::Subtle)
        }
    };
    output.push_str(&format!(
        "[{}] [{}]",
        button(Direction::ToReference, "to: Convert to Manat"),
        button(Direction::FromReference, "from: Convert from Manat"),
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Currency;
    use chrono::NaiveDate;

    fn outcome(direction: Direction) -> ConversionOutcome {
        ConversionOutcome {
            direction,
            amount_in: 100.0,
            result: 170.004,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            currency_code: "USD".to_string(),
        }
    }

    #[test]
    fn test_format_outcome_by_direction() {
        assert_eq!(
            format_outcome(&outcome(Direction::ToReference)),
            "100 USD = 170.00 AZN"
        );
        assert_eq!(
            format_outcome(&outcome(Direction::FromReference)),
            "100 AZN = 170.00 USD"
        );
    }

    #[test]
    fn test_render_view_shows_state() {
        console::set_colors_enabled(false);
        let view = FormView {
            selected_currency: Some("USD".to_string()),
            amount: "100".to_string(),
            currencies: vec![Currency::new("USD", "US Dollar")],
            currency_error: Some("Failed to load currencies.".to_string()),
            conversion_result: Some(outcome(Direction::ToReference)),
            can_convert: true,
            ..FormView::default()
        };

        let text = render_view(&view);
        assert!(text.contains("Currency: USD"));
        assert!(text.contains("Failed to load currencies."));
        assert!(text.contains("100 USD = 170.00 AZN"));
        assert!(text.contains("Convert to Manat"));
    }

    #[test]
    fn test_currencies_table_marks_selection() {
        let view = FormView {
            selected_currency: Some("EUR".to_string()),
            currencies: vec![
                Currency::new("USD", "US Dollar"),
                Currency {
                    rate: Some(1.8501),
                    ..Currency::new("EUR", "Euro")
                },
            ],
            ..FormView::default()
        };

        let rendered = currencies_table(&view).to_string();
        assert!(rendered.contains("Euro"));
        assert!(rendered.contains("1.8501"));
        assert!(rendered.contains("N/A"));
    }
}
