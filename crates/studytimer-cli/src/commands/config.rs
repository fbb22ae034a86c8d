use clap::Subcommand;
use studytimer_core::{Settings, Theme};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a settings value
    Get {
        /// Settings key (e.g. "study_duration_seconds", "theme.accent_color")
        key: String,
    },
    /// Set a settings value
    Set {
        /// Settings key
        key: String,
        /// New value
        value: String,
    },
    /// List all settings as JSON
    List,
    /// Reset settings to defaults, keeping the study total
    Reset,
    /// Apply a built-in colour theme (pink, blue, green)
    Theme {
        /// Preset name
        name: String,
    },
    /// Print the settings file location
    Path,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let settings = Settings::load()?;
            match settings.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut settings = Settings::load()?;
            settings.set(&key, &value)?;
            settings.save()?;
            println!("ok");
        }
        ConfigAction::List => {
            let settings = Settings::load()?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        ConfigAction::Reset => {
            let total = Settings::load_or_default().total_study_seconds;
            let settings = Settings {
                total_study_seconds: total,
                ..Settings::default()
            };
            settings.save()?;
            println!("settings reset to defaults");
        }
        ConfigAction::Theme { name } => {
            let theme = Theme::preset(&name)?;
            let mut settings = Settings::load()?;
            settings.theme = theme;
            settings.save()?;
            println!("ok");
        }
        ConfigAction::Path => {
            println!("{}", Settings::path()?.display());
        }
    }
    Ok(())
}
