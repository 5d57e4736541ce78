//! Terminal front end for the calculator session.

mod cli;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use cli::prelude::*;
use mintcalc::calculator::{BASIC_KEYPAD, Calculator, SCIENTIFIC_KEYPAD, Token};
use mintcalc::config::Config;
use mintcalc::converters::{self, Category, finance, health};
use mintcalc::history::render_table;
use mintcalc::logging::init_logging;
use mintcalc::preferences::{ActiveTab, Theme};
use mintcalc::speech::{Muted, Speaker};
use mintcalc::storage::FileStorage;
use mintcalc::voice::{ScriptedRecognizer, VoiceSession};
use mintcalc::Session;

fn main() -> Result<()> {
    let opt = Opt::parse();
    init_logging(opt.verbose);
    tracing::debug!("Command line arguments: {:#?}", opt);

    let config_path = opt.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    match opt.cmd {
        None | Some(Cmd::Repl) => main_repl(open_session(&opt, &config)?),
        Some(Cmd::Eval(ref cmd)) => main_eval(open_session(&opt, &config)?, cmd),
        Some(Cmd::Press(ref cmd)) => main_press(open_session(&opt, &config)?, cmd),
        Some(Cmd::Say(ref cmd)) => main_say(open_session(&opt, &config)?, cmd),
        Some(Cmd::History(ref cmd)) => main_history(open_session(&opt, &config)?, cmd),
        Some(Cmd::Theme(ref cmd)) => main_theme(open_session(&opt, &config)?, cmd),
        Some(Cmd::Tab(ref cmd)) => main_tab(open_session(&opt, &config)?, cmd),
        Some(Cmd::Convert(ref cmd)) => main_convert(cmd),
        Some(Cmd::Units(ref cmd)) => main_units(cmd),
        Some(Cmd::Bmi(ref cmd)) => main_bmi(cmd),
        Some(Cmd::Bmr(ref cmd)) => main_bmr(cmd),
        Some(Cmd::BodyFat(ref cmd)) => main_body_fat(cmd),
        Some(Cmd::Water(ref cmd)) => main_water(cmd),
        Some(Cmd::Loan(ref cmd)) => main_loan(cmd),
        Some(Cmd::Discount(ref cmd)) => main_discount(cmd),
    }
}

/// Build a session from config, with command line flags taking precedence.
fn open_session(opt: &Opt, config: &Config) -> Result<Session> {
    let mut mode = config.mode();
    if opt.deg {
        mode.radians = false;
    }
    if opt.rad {
        mode.radians = true;
    }
    if opt.scientific {
        mode.scientific = true;
    }

    let engine = opt.engine.unwrap_or(config.engine);
    let calculator = Calculator::new(engine.evaluator()).with_mode(mode);

    let storage_path = opt.storage.clone().unwrap_or_else(|| config.storage_path());
    let storage = FileStorage::open(&storage_path)
        .with_context(|| format!("Failed to open storage at {}", storage_path.display()))?;

    let speaker: Box<dyn Speaker> = if opt.mute {
        Box::new(Muted)
    } else {
        config.speech.speaker()
    };

    Ok(Session::load(calculator, Box::new(storage), speaker))
}

/// Accept an entry id or a 1-based position in the history list.
fn resolve_entry(session: &Session, key: &str) -> Result<String> {
    if let Ok(position) = key.parse::<usize>()
        && let Some(entry) = position
            .checked_sub(1)
            .and_then(|i| session.history().entries().get(i))
    {
        return Ok(entry.id.clone());
    }
    session
        .history()
        .get(key)
        .map(|entry| entry.id.clone())
        .ok_or_else(|| anyhow!("No history entry {:?}", key))
}

fn print_state(session: &Session) {
    println!("{}", session.expression());
    println!("= {}", session.display());
}

fn print_keypad(scientific: bool) {
    let keypad = if scientific {
        SCIENTIFIC_KEYPAD
    } else {
        BASIC_KEYPAD
    };
    for row in keypad {
        println!("  {}", row.join("  "));
    }
}

fn print_history(session: &Session) {
    if session.history().is_empty() {
        println!("No calculations yet.");
        return;
    }
    for (i, entry) in session.history().iter().enumerate() {
        println!("{:>3}. {} = {}  [{}]", i + 1, entry.expression, entry.result, entry.id);
    }
}

fn main_repl(mut session: Session) -> Result<()> {
    tracing::info!("Starting interactive session");
    print_keypad(session.calculator().mode().scientific);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        if stdin
            .lock()
            .read_line(&mut line)
            .context("Failed to read input")?
            == 0
        {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix(':') {
            let (name, rest) = command.split_once(' ').unwrap_or((command, ""));
            let rest = rest.trim();
            match name {
                "quit" | "q" => break,
                "say" => session.apply_voice(rest),
                "history" => {
                    print_history(&session);
                    continue;
                }
                "recall" => match resolve_entry(&session, rest) {
                    Ok(id) => session.recall(&id)?,
                    Err(e) => eprintln!("{}", e),
                },
                "rad" => session.set_radians(true),
                "deg" => session.set_radians(false),
                "sci" => {
                    session.set_scientific(true);
                    print_keypad(true);
                }
                "basic" => {
                    session.set_scientific(false);
                    print_keypad(false);
                }
                other => {
                    eprintln!("Unknown command :{}", other);
                    continue;
                }
            }
        } else {
            for label in line.split_whitespace() {
                if let Err(e) = session.press_label(label) {
                    eprintln!("{}", e);
                }
            }
        }

        print_state(&session);
    }

    Ok(())
}

fn main_eval(mut session: Session, cmd: &cmd::Eval) -> Result<()> {
    session.set_expression(cmd.expression.as_str());
    session.press(Token::Evaluate);
    if session.display().is_error() {
        bail!("{}", session.display());
    }
    println!("{}", session.display());
    Ok(())
}

fn main_press(mut session: Session, cmd: &cmd::Press) -> Result<()> {
    for label in &cmd.labels {
        session.press_label(label)?;
    }
    print_state(&session);
    Ok(())
}

fn main_say(mut session: Session, cmd: &cmd::Say) -> Result<()> {
    let recognizer = ScriptedRecognizer::utterance(cmd.transcript.join(" "));
    session.attach_voice(VoiceSession::new(Box::new(recognizer)));
    session.toggle_voice()?;
    session.pump_voice();
    print_state(&session);
    Ok(())
}

fn main_history(mut session: Session, cmd: &cmd::History) -> Result<()> {
    match cmd {
        cmd::History::List => print_history(&session),
        cmd::History::Clear => {
            session.clear_history();
            println!("History cleared.");
        }
        cmd::History::Delete { entry } => {
            let id = resolve_entry(&session, entry)?;
            let removed = session.delete_entry(&id)?;
            println!("Deleted {} = {}", removed.expression, removed.result);
        }
        cmd::History::Edit { entry, expression } => {
            let id = resolve_entry(&session, entry)?;
            let result = session.edit_entry(&id, expression)?;
            println!("{} = {}", expression, result);
        }
        cmd::History::Recall { entry } => {
            let id = resolve_entry(&session, entry)?;
            session.recall(&id)?;
            println!("{}", session.expression());
        }
        cmd::History::Export { json } => {
            let rows = session.export_history()?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print!("{}", render_table(&rows, chrono::Local::now()));
            }
        }
    }
    Ok(())
}

fn main_theme(mut session: Session, cmd: &cmd::Theme) -> Result<()> {
    match cmd.name {
        Some(theme) => {
            session.set_theme(theme);
            println!("Theme set to {}", theme.name());
        }
        None => {
            for theme in Theme::ALL {
                let marker = if theme == session.theme() { "*" } else { " " };
                println!("{} {:<10} {}", marker, theme.id(), theme.name());
            }
        }
    }
    Ok(())
}

fn main_tab(mut session: Session, cmd: &cmd::Tab) -> Result<()> {
    match cmd.name {
        Some(tab) => {
            session.set_tab(tab);
            println!("Active tab: {}", tab);
        }
        None => {
            for tab in ActiveTab::ALL {
                let marker = if tab == session.tab() { "*" } else { " " };
                println!("{} {}", marker, tab);
            }
        }
    }
    Ok(())
}

fn main_convert(cmd: &cmd::Convert) -> Result<()> {
    let result = converters::convert(cmd.category, &cmd.from, &cmd.to, &cmd.value)?;
    println!("{}", result);
    Ok(())
}

fn main_units(cmd: &cmd::Units) -> Result<()> {
    match cmd.category {
        Some(category) => {
            for unit in category.units() {
                println!("{:<20} {}", unit.abbreviation(), unit.label);
            }
        }
        None => {
            for category in Category::ALL {
                println!("{}", category);
            }
        }
    }
    Ok(())
}

fn main_bmi(cmd: &cmd::Bmi) -> Result<()> {
    let bmi = health::bmi(cmd.height_cm, cmd.weight_kg)
        .context("Height and weight must be positive")?;
    println!("BMI: {:.2} ({})", bmi.value, bmi.category);
    Ok(())
}

fn main_bmr(cmd: &cmd::Bmr) -> Result<()> {
    let bmr = health::bmr(cmd.gender, cmd.age, cmd.height_cm, cmd.weight_kg)
        .context("Age, height and weight must be positive")?;
    println!("BMR: {:.2} kcal/day", bmr);
    Ok(())
}

fn main_body_fat(cmd: &cmd::BodyFat) -> Result<()> {
    let fat = health::body_fat(cmd.gender, cmd.height_cm, cmd.neck_cm, cmd.waist_cm, cmd.hip_cm)
        .context("Invalid measurements")?;
    println!("Body fat: {:.1}%", fat);
    Ok(())
}

fn main_water(cmd: &cmd::Water) -> Result<()> {
    let liters = health::water_intake(cmd.weight_kg, cmd.minutes)
        .context("Weight must be positive and activity not negative")?;
    println!("Water intake: {:.2} L/day", liters);
    Ok(())
}

fn main_loan(cmd: &cmd::Loan) -> Result<()> {
    let summary = finance::loan(cmd.principal, cmd.rate, cmd.years)
        .context("Principal and tenure must be positive and the rate not negative")?;
    println!("Monthly installment: {:.2}", summary.emi);
    println!("Total interest:      {:.2}", summary.total_interest);
    println!("Total payable:       {:.2}", summary.total_payable);
    Ok(())
}

fn main_discount(cmd: &cmd::Discount) -> Result<()> {
    let summary = finance::discount(cmd.price, cmd.discount, cmd.tax)
        .context("Price must be positive, discount 0 to 100 and tax not negative")?;
    println!("Final price: {:.2}", summary.final_price);
    println!("You save:    {:.2}", summary.you_save);
    Ok(())
}
