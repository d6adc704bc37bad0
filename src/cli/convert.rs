use super::ui;
use crate::core::{Direction, FormController};
use anyhow::{Result, anyhow};
use tracing::debug;

/// Runs one conversion through the form, the same way a user would fill it
/// in: date, then currency, then amount, then the button.
pub async fn run(
    form: &FormController,
    direction: Direction,
    date: &str,
    currency: Option<&str>,
    amount: &str,
) -> Result<()> {
    let spinner = ui::new_spinner("Loading currencies...");
    let result = convert(form, &spinner, direction, date, currency, amount).await;
    spinner.finish_and_clear();

    let line = result?;
    println!("{line}");
    Ok(())
}

async fn convert(
    form: &FormController,
    spinner: &indicatif::ProgressBar,
    direction: Direction,
    date: &str,
    currency: Option<&str>,
    amount: &str,
) -> Result<String> {
    form.mount().await;
    let view = form.set_date(date).await?;
    if let Some(error) = &view.currency_error {
        spinner.suspend(|| eprintln!("{}", ui::style_text(error, ui::StyleType::Warning)));
    }

    if let Some(code) = currency {
        form.set_currency(&code.trim().to_uppercase()).await?;
    }
    form.set_amount(amount).await;

    spinner.set_message("Converting...");
    let view = form.request_conversion(direction).await?;
    debug!(?view, "Conversion finished");

    match (view.conversion_result, view.conversion_error) {
        (Some(outcome), _) => Ok(format!(
            "{}\n{}",
            ui::style_text(&ui::format_outcome(&outcome), ui::StyleType::Result),
            ui::style_text(&format!("Date: {}", outcome.date), ui::StyleType::Subtle)
        )),
        (None, Some(error)) => Err(anyhow!(error)),
        (None, None) => Err(anyhow!("Conversion produced no result")),
    }
}
