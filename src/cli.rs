use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mintcalc::calculator::Engine;

#[derive(Parser, Debug)]
#[command(name = "mintcalc", version, about = "Keypad, keyboard and voice driven calculator")]
pub struct Opt {
    /// Config file (default: <config dir>/mintcalc/config.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Trigonometric functions take degrees.
    #[arg(long, global = true, conflicts_with = "rad")]
    pub deg: bool,
    /// Trigonometric functions take radians.
    #[arg(long, global = true)]
    pub rad: bool,
    /// Start with the scientific keypad.
    #[arg(long, global = true)]
    pub scientific: bool,
    /// Expression engine.
    #[arg(long, global = true, value_enum)]
    pub engine: Option<Engine>,
    /// Storage file for history and preferences.
    #[arg(long, global = true)]
    pub storage: Option<PathBuf>,
    /// Do not read results out loud.
    #[arg(long, global = true)]
    pub mute: bool,
    /// Debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub cmd: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Interactive keypad (default).
    Repl,
    /// Evaluate an expression and record it in the history.
    Eval(cmd::Eval),
    /// Press keypad buttons in order.
    Press(cmd::Press),
    /// Apply a spoken transcript.
    Say(cmd::Say),
    /// Inspect and edit the calculation history.
    #[command(subcommand)]
    History(cmd::History),
    /// Convert a value between units.
    Convert(cmd::Convert),
    /// List conversion categories, or the units of one category.
    Units(cmd::Units),
    /// Body mass index.
    Bmi(cmd::Bmi),
    /// Basal metabolic rate.
    Bmr(cmd::Bmr),
    /// Body fat percentage (US Navy method).
    BodyFat(cmd::BodyFat),
    /// Daily water intake.
    Water(cmd::Water),
    /// Loan installment.
    Loan(cmd::Loan),
    /// Price after discount and tax.
    Discount(cmd::Discount),
    /// Show or set the color theme.
    Theme(cmd::Theme),
    /// Show or set the active tab.
    Tab(cmd::Tab),
}

pub mod cmd {
    use clap::{Args, Subcommand};
    use mintcalc::converters::Category;
    use mintcalc::converters::health::Gender;
    use mintcalc::preferences::{ActiveTab, Theme as ThemeId};

    #[derive(Args, Debug)]
    pub struct Eval {
        /// The expression, e.g. `2*(3+4)` or `√16+2π`.
        pub expression: String,
    }

    #[derive(Args, Debug)]
    pub struct Press {
        /// Keypad labels: digits, `+ - * / ^ %`, `( ) . π e √`, `sin cos tan
        /// log ln x!`, `C`, `⌫`, `=`.
        #[arg(required = true, allow_hyphen_values = true)]
        pub labels: Vec<String>,
    }

    #[derive(Args, Debug)]
    pub struct Say {
        /// Transcript words, e.g. `what is 2 plus 3 equals`.
        #[arg(required = true)]
        pub transcript: Vec<String>,
    }

    #[derive(Subcommand, Debug)]
    pub enum History {
        /// List entries, newest first.
        List,
        /// Remove every entry.
        Clear,
        /// Remove one entry.
        Delete {
            /// Entry id or list position.
            entry: String,
        },
        /// Replace an entry's expression and re-evaluate it.
        Edit {
            /// Entry id or list position.
            entry: String,
            expression: String,
        },
        /// Print an entry's expression.
        Recall {
            /// Entry id or list position.
            entry: String,
        },
        /// Print a history report.
        Export {
            /// JSON rows instead of a text table.
            #[arg(long)]
            json: bool,
        },
    }

    #[derive(Args, Debug)]
    pub struct Convert {
        pub category: Category,
        #[arg(allow_hyphen_values = true)]
        pub value: String,
        /// Unit label or abbreviation.
        pub from: String,
        /// Unit label or abbreviation.
        pub to: String,
    }

    #[derive(Args, Debug)]
    pub struct Units {
        pub category: Option<Category>,
    }

    #[derive(Args, Debug)]
    pub struct Bmi {
        pub height_cm: f64,
        pub weight_kg: f64,
    }

    #[derive(Args, Debug)]
    pub struct Bmr {
        #[arg(long, default_value = "male")]
        pub gender: Gender,
        pub age: f64,
        pub height_cm: f64,
        pub weight_kg: f64,
    }

    #[derive(Args, Debug)]
    pub struct BodyFat {
        #[arg(long, default_value = "male")]
        pub gender: Gender,
        pub height_cm: f64,
        pub neck_cm: f64,
        pub waist_cm: f64,
        /// Required for women.
        #[arg(long, default_value_t = 0.0)]
        pub hip_cm: f64,
    }

    #[derive(Args, Debug)]
    pub struct Water {
        pub weight_kg: f64,
        /// Daily activity.
        #[arg(long, default_value_t = 0.0)]
        pub minutes: f64,
    }

    #[derive(Args, Debug)]
    pub struct Loan {
        pub principal: f64,
        /// Annual interest rate in percent.
        pub rate: f64,
        /// Tenure in years.
        pub years: f64,
    }

    #[derive(Args, Debug)]
    pub struct Discount {
        pub price: f64,
        /// Discount in percent.
        pub discount: f64,
        /// Tax in percent.
        #[arg(long, default_value_t = 0.0)]
        pub tax: f64,
    }

    #[derive(Args, Debug)]
    pub struct Theme {
        pub name: Option<ThemeId>,
    }

    #[derive(Args, Debug)]
    pub struct Tab {
        pub name: Option<ActiveTab>,
    }
}

pub mod prelude {
    pub use super::{Cmd, Opt, cmd};
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Opt::command().debug_assert();
    }

    #[test]
    fn test_parse_flags_and_subcommand() {
        let opt = Opt::parse_from(["mintcalc", "--deg", "--engine", "fend", "eval", "2+2"]);
        assert!(opt.deg);
        assert_eq!(opt.engine, Some(Engine::Fend));
        assert!(matches!(opt.cmd, Some(Cmd::Eval(ref e)) if e.expression == "2+2"));
    }

    #[test]
    fn test_default_is_repl() {
        let opt = Opt::parse_from(["mintcalc"]);
        assert!(opt.cmd.is_none());
    }

    #[test]
    fn test_convert_args() {
        let opt = Opt::parse_from(["mintcalc", "convert", "temperature", "-40", "C", "F"]);
        match opt.cmd {
            Some(Cmd::Convert(c)) => {
                assert_eq!(c.category, mintcalc::converters::Category::Temperature);
                assert_eq!(c.value, "-40");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_deg_and_rad_conflict() {
        assert!(Opt::try_parse_from(["mintcalc", "--deg", "--rad"]).is_err());
    }
}
