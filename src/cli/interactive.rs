use super::ui;
use crate::core::{Direction, FormController, FormError, FormView};
use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Commands:
  date YYYY-MM-DD   select a date and reload currencies
  currency CODE     select a currency
  amount N          set the amount
  to                convert the amount into manat
  from              convert the amount of manat into the currency
  list              show the currency table
  show              show the form
  quit              exit";

/// One line of user input.
#[derive(Debug, PartialEq)]
enum Intent {
    Date(String),
    Currency(String),
    Amount(String),
    Convert(Direction),
    List,
    Show,
    Help,
    Quit,
}

fn parse_line(line: &str) -> Option<Intent> {
    let mut parts = line.trim().splitn(2, char::is_whitespace);
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(str::trim).unwrap_or_default().to_string();
    match command.as_str() {
        "date" => Some(Intent::Date(argument)),
        "currency" => Some(Intent::Currency(argument.to_uppercase())),
        "amount" => Some(Intent::Amount(argument)),
        "to" => Some(Intent::Convert(Direction::ToReference)),
        "from" => Some(Intent::Convert(Direction::FromReference)),
        "list" => Some(Intent::List),
        "show" => Some(Intent::Show),
        "help" | "?" => Some(Intent::Help),
        "quit" | "exit" | "q" => Some(Intent::Quit),
        _ => None,
    }
}

fn report(result: Result<FormView, FormError>) -> String {
    match result {
        Ok(view) => ui::render_view(&view),
        Err(e) => ui::style_text(&e.to_string(), ui::StyleType::Error),
    }
}

/// Line-oriented session over a single form, until `quit` or end of input.
pub async fn run(form: &FormController) -> Result<()> {
    println!("{}", ui::style_text("Currency Converter", ui::StyleType::Title));
    let spinner = ui::new_spinner("Loading currencies...");
    let view = form.mount().await;
    spinner.finish_and_clear();
    println!("{}\n\n{HELP}", ui::render_view(&view));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let output = match parse_line(&line) {
            Some(Intent::Date(date)) => report(form.set_date(&date).await),
            Some(Intent::Currency(code)) => report(form.set_currency(&code).await),
            Some(Intent::Amount(amount)) => ui::render_view(&form.set_amount(&amount).await),
            Some(Intent::Convert(direction)) => report(form.request_conversion(direction).await),
            Some(Intent::List) => ui::currencies_table(&form.view().await).to_string(),
            Some(Intent::Show) => ui::render_view(&form.view().await),
            Some(Intent::Help) => HELP.to_string(),
            Some(Intent::Quit) => break,
            None => format!("Unknown command: {}\n{HELP}", line.trim()),
        };
        println!("{output}\n");
    }
    Ok(())
}
