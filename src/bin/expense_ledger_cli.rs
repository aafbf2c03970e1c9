use std::{collections::HashMap, env, error::Error, path::PathBuf, process};

use colored::Colorize;
use expense_ledger::{
    config::{Config, ConfigManager},
    currency::{format_cents, CurrencyCode},
    export::write_csv_export,
    init,
    ledger::LedgerStore,
    query::{chart_bars, filtered_view, ranked_breakdown, AlertSeverity, BudgetState, FilterSpec},
    storage::JsonFileStore,
    time::{Clock, SystemClock},
    utils::{build_info, paths},
    ExpenseId, ExpenseInput,
};

type CliResult<T = ()> = Result<T, Box<dyn Error>>;

const CHART_WIDTH: usize = 20;

fn main() {
    init();

    if let Err(err) = run() {
        eprintln!("{} {err}", "Error:".red().bold());
        process::exit(1);
    }
}

fn run() -> CliResult {
    let mut args = env::args().skip(1);
    let Some(command) = args.next() else {
        print_usage();
        process::exit(1);
    };
    let rest: Vec<String> = args.collect();

    match command.as_str() {
        "help" | "--help" | "-h" => {
            println!("{}", usage());
            Ok(())
        }
        "version" | "--version" => {
            println!("{}", build_info::current().summary());
            Ok(())
        }
        "config" => run_config(&rest),
        "add" => Session::open()?.add(&rest),
        "list" => Session::open()?.list(&rest),
        "delete" => Session::open()?.delete(&rest),
        "stats" => Session::open()?.stats(&rest),
        "budget" => Session::open()?.budget(&rest),
        "export" => Session::open()?.export(&rest),
        _ => {
            print_usage();
            process::exit(1);
        }
    }
}

/// Everything a ledger command needs, loaded from the data directory.
struct Session {
    base: PathBuf,
    config: Config,
    currency: CurrencyCode,
    store: LedgerStore,
    clock: SystemClock,
}

impl Session {
    fn open() -> CliResult<Self> {
        let base = paths::app_data_dir();
        let config = ConfigManager::with_base_dir(base.clone())?.load()?;
        if !config.ui_color_enabled {
            colored::control::set_override(false);
        }
        let currency = config.currency_code();
        let storage = JsonFileStore::new(Some(paths::data_dir_in(&base)))?;
        let store = LedgerStore::open(Box::new(storage)).with_currency(currency.clone());
        Ok(Self {
            base,
            config,
            currency,
            store,
            clock: SystemClock,
        })
    }

    fn money(&self, cents: i64) -> String {
        format_cents(cents, &self.currency)
    }

    fn add(&mut self, args: &[String]) -> CliResult {
        let parsed = Flags::parse(args, &["date"])?;
        let [amount, category, description @ ..] = parsed.positional.as_slice() else {
            return Err("usage: add <amount> <category> [--date YYYY-MM-DD] [description...]".into());
        };
        let date = parsed
            .value("date")
            .map(str::to_string)
            .unwrap_or_else(|| self.clock.today().format("%Y-%m-%d").to_string());
        let input = ExpenseInput::new(amount, category, date, description.join(" "));

        let submission = self.store.submit_expense(&input, &self.clock)?;
        let record = &submission.record;
        println!(
            "Recorded {} {} {} on {}",
            record.id.to_string().dimmed(),
            record.category,
            self.money(record.amount_cents).bold(),
            record.date
        );
        if let Some(alert) = submission.alert {
            let title = match alert.severity {
                AlertSeverity::Exceeded => alert.severity.title().red().bold(),
                AlertSeverity::Warning => alert.severity.title().yellow().bold(),
            };
            println!("{title} {}", alert.message);
        }
        Ok(())
    }

    fn list(&self, args: &[String]) -> CliResult {
        let filter = Flags::parse(args, FILTER_FLAGS)?.filter()?;
        let view = filtered_view(self.store.records(), &filter);
        if view.is_empty() {
            println!("{}", "No expenses found.".dimmed());
            return Ok(());
        }
        println!(
            "{:<10}  {:<13}  {:>12}  {:<24}  {}",
            "Date", "Category", "Amount", "Description", "Id"
        );
        for record in &view {
            println!(
                "{:<10}  {:<13}  {:>12}  {:<24}  {}",
                record.date,
                record.category,
                self.money(record.amount_cents),
                truncate(&record.description, 24),
                record.id.to_string().dimmed()
            );
        }
        Ok(())
    }

    fn delete(&mut self, args: &[String]) -> CliResult {
        let [id] = args else {
            return Err("usage: delete <id>".into());
        };
        match self.store.delete_record(&ExpenseId::new(id.as_str()))? {
            Some(record) => println!("Deleted {} ({})", record.id, self.money(record.amount_cents)),
            None => println!("{}", format!("No expense with id {id}").dimmed()),
        }
        Ok(())
    }

    fn stats(&self, args: &[String]) -> CliResult {
        let filter = Flags::parse(args, FILTER_FLAGS)?.filter()?;
        let summary = self.store.summarize(&filter, self.clock.today());

        println!("Total spent:    {}", self.money(summary.total_cents).bold());
        println!("Transactions:   {}", summary.transaction_count);
        println!("Monthly budget: {}", self.money(summary.budget.budget_cents));
        match summary.budget.state {
            BudgetState::NoBudget => println!("Remaining:      -"),
            state => {
                let remaining = self.money(summary.budget.remaining);
                let remaining = match state {
                    BudgetState::Exceeded => remaining.red(),
                    BudgetState::Warning => remaining.yellow(),
                    _ => remaining.normal(),
                };
                println!("Remaining:      {remaining}");
                if let Some(line) = summary.budget.status_line(&self.currency) {
                    println!("                {line}");
                }
            }
        }

        println!();
        for bar in chart_bars(&summary.breakdown) {
            let filled = usize::from(bar.percent) * CHART_WIDTH / 100;
            println!(
                "{:<13} {:<width$} {}",
                bar.category,
                "#".repeat(filled),
                self.money(bar.cents),
                width = CHART_WIDTH
            );
        }

        let ranked = ranked_breakdown(&summary.breakdown);
        if !ranked.is_empty() {
            println!();
            for (category, cents) in ranked {
                println!("  {:<13} {:>12}", category, self.money(cents));
            }
        }
        Ok(())
    }

    fn budget(&mut self, args: &[String]) -> CliResult {
        match args {
            [] => self.show_budget(),
            [action] if action == "show" => self.show_budget(),
            [action, amount] if action == "set" => {
                let cents = self.store.set_budget(amount)?;
                println!("Monthly budget set to {}", self.money(cents));
                Ok(())
            }
            [action] if action == "clear" => {
                self.store.clear_budget()?;
                println!("Monthly budget cleared");
                Ok(())
            }
            _ => Err("usage: budget [show | set <amount> | clear]".into()),
        }
    }

    fn show_budget(&self) -> CliResult {
        let today = self.clock.today();
        let status = self.store.summarize(&FilterSpec::default(), today).budget;
        match status.status_line(&self.currency) {
            Some(line) => println!(
                "{} budget, {} spent this month: {line}",
                self.money(status.budget_cents),
                self.money(status.spent_cents)
            ),
            None => println!("No monthly budget set"),
        }
        Ok(())
    }

    fn export(&self, args: &[String]) -> CliResult {
        let parsed = Flags::parse(args, &["category", "from", "to", "out"])?;
        let filter = parsed.filter()?;
        let dir = parsed
            .value("out")
            .map(PathBuf::from)
            .unwrap_or_else(|| self.config.resolve_export_dir(&self.base));
        let view = filtered_view(self.store.records(), &filter);
        let path = write_csv_export(&view, &dir, self.clock.now().date_naive())?;
        println!("Exported {} expenses to {}", view.len(), path.display());
        Ok(())
    }
}

fn run_config(args: &[String]) -> CliResult {
    let manager = ConfigManager::new_default()?;
    let mut config = manager.load()?;
    match args {
        [] => {}
        [action] if action == "show" => {}
        [action, code] if action == "set-currency" => {
            config.currency = config_currency(code)?;
            manager.save(&config)?;
        }
        [action, value] if action == "set-color" => {
            config.ui_color_enabled = match value.as_str() {
                "on" => true,
                "off" => false,
                _ => return Err("usage: config set-color <on|off>".into()),
            };
            manager.save(&config)?;
        }
        _ => {
            return Err(
                "usage: config [show | set-currency <code> | set-color <on|off>]".into(),
            )
        }
    }
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn config_currency(code: &str) -> CliResult<String> {
    let code = CurrencyCode::new(code);
    if code.as_str().len() != 3 || !code.as_str().chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(format!("`{}` is not a three-letter currency code", code.as_str()).into());
    }
    Ok(code.as_str().to_string())
}

const FILTER_FLAGS: &[&str] = &["category", "from", "to"];

/// `--name value` pairs plus positional arguments.
struct Flags {
    values: HashMap<String, String>,
    positional: Vec<String>,
}

impl Flags {
    fn parse(args: &[String], allowed: &[&str]) -> CliResult<Self> {
        let mut values = HashMap::new();
        let mut positional = Vec::new();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            let Some(name) = arg.strip_prefix("--") else {
                positional.push(arg.clone());
                continue;
            };
            if !allowed.contains(&name) {
                return Err(format!("unknown option `--{name}`").into());
            }
            let value = iter
                .next()
                .ok_or_else(|| format!("option `--{name}` needs a value"))?;
            values.insert(name.to_string(), value.clone());
        }
        Ok(Self { values, positional })
    }

    fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    fn filter(&self) -> CliResult<FilterSpec> {
        Ok(FilterSpec::from_inputs(
            self.value("category").unwrap_or("all"),
            self.value("from").unwrap_or(""),
            self.value("to").unwrap_or(""),
        )?)
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn usage() -> &'static str {
    "Usage: expense_ledger_cli <command>\n\
     Commands:\n  \
     add <amount> <category> [--date YYYY-MM-DD] [description...]\n  \
     list [--category <name|all>] [--from YYYY-MM-DD] [--to YYYY-MM-DD]\n  \
     delete <id>\n  \
     stats [filters]\n  \
     budget [show | set <amount> | clear]\n  \
     export [filters] [--out <dir>]\n  \
     config [show | set-currency <code> | set-color <on|off>]\n  \
     version"
}

fn print_usage() {
    eprintln!("{}", usage());
}
