use super::ui;
use crate::core::{FormController, FormView};
use anyhow::Result;

fn display_catalog(view: &FormView) -> String {
    let date = view
        .catalog_date
        .map_or_else(|| "today".to_string(), |d| d.to_string());
    let mut output = format!(
        "{}\n\n",
        ui::style_text(&format!("Currencies for {date}"), ui::StyleType::Title)
    );

    if let Some(error) = &view.currency_error {
        output.push_str(&ui::style_text(error, ui::StyleType::Warning));
        output.push_str("\n\n");
    }

    if view.currencies.is_empty() {
        output.push_str(&ui::style_text(
            "No currencies available",
            ui::StyleType::Subtle,
        ));
    } else {
        output.push_str(&ui::currencies_table(view).to_string());
    }
    output
}

/// Lists the catalog for `date`, or for today when no date is given.
pub async fn run(form: &FormController, date: Option<&str>) -> Result<()> {
    let spinner = ui::new_spinner("Loading currencies...");
    let mut view = form.mount().await;
    if let Some(date) = date {
        view = match form.set_date(date).await {
            Ok(view) => view,
            Err(e) => {
                spinner.finish_and_clear();
                return Err(e.into());
            }
        };
    }
    spinner.finish_and_clear();

    println!("{}", display_catalog(&view));
    Ok(())
}
