use tomata_client::domain::{Phase, TimerSettings};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerState {
    Idle,
    Running,
}

/// Provenance of the countdown currently on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyncOrigin {
    /// Anchored on an authoritative server response.
    Synced,
    /// Locally assumed duration; remote confirmation pending or failed.
    Optimistic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View {
    Timer,
    Settings,
    ConfirmReset,
}

/// Snapshot handed to the view layer, recomputed every tick. Never
/// authoritative; always derivable from the session and "now".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClientView {
    pub time_left_secs: u64,
    pub phase: Phase,
    pub is_running: bool,
    pub progress_fraction: f64,
    pub synced: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettingsField {
    WorkMinutes,
    ShortBreakMinutes,
    LongBreakMinutes,
    PomodorosBeforeLongBreak,
}

/// Editable settings overlay. Inputs hold raw digits; nothing is applied
/// (locally or remotely) until the whole form validates.
#[derive(Debug, Clone)]
pub struct SettingsForm {
    pub work_input: String,
    pub short_break_input: String,
    pub long_break_input: String,
    pub cycle_input: String,
    pub focused_field: SettingsField,
    pub error: Option<String>,
}

impl SettingsForm {
    pub fn from_settings(settings: &TimerSettings) -> Self {
        Self {
            work_input: settings.work_minutes.to_string(),
            short_break_input: settings.short_break_minutes.to_string(),
            long_break_input: settings.long_break_minutes.to_string(),
            cycle_input: settings.pomodoros_before_long_break.to_string(),
            focused_field: SettingsField::WorkMinutes,
            error: None,
        }
    }

    pub fn next_field(&mut self) {
        self.focused_field = match self.focused_field {
            SettingsField::WorkMinutes => SettingsField::ShortBreakMinutes,
            SettingsField::ShortBreakMinutes => SettingsField::LongBreakMinutes,
            SettingsField::LongBreakMinutes => SettingsField::PomodorosBeforeLongBreak,
            SettingsField::PomodorosBeforeLongBreak => SettingsField::WorkMinutes,
        };
    }

    pub fn prev_field(&mut self) {
        self.focused_field = match self.focused_field {
            SettingsField::WorkMinutes => SettingsField::PomodorosBeforeLongBreak,
            SettingsField::ShortBreakMinutes => SettingsField::WorkMinutes,
            SettingsField::LongBreakMinutes => SettingsField::ShortBreakMinutes,
            SettingsField::PomodorosBeforeLongBreak => SettingsField::LongBreakMinutes,
        };
    }

    fn focused_input_mut(&mut self) -> &mut String {
        match self.focused_field {
            SettingsField::WorkMinutes => &mut self.work_input,
            SettingsField::ShortBreakMinutes => &mut self.short_break_input,
            SettingsField::LongBreakMinutes => &mut self.long_break_input,
            SettingsField::PomodorosBeforeLongBreak => &mut self.cycle_input,
        }
    }

    pub fn input_char(&mut self, c: char) {
        if c.is_ascii_digit() {
            let input = self.focused_input_mut();
            if input.len() < 3 {
                input.push(c);
            }
        }
    }

    pub fn backspace(&mut self) {
        self.focused_input_mut().pop();
    }

    /// Parse and validate the form into a full settings value. The
    /// auto-start flags are carried over from the base settings.
    pub fn parse(&self, base: &TimerSettings) -> Result<TimerSettings, String> {
        let field = |input: &str, name: &str| -> Result<u32, String> {
            input
                .parse::<u32>()
                .map_err(|_| format!("{name} must be a number"))
        };

        let settings = TimerSettings {
            work_minutes: field(&self.work_input, "work duration")?,
            short_break_minutes: field(&self.short_break_input, "short break")?,
            long_break_minutes: field(&self.long_break_input, "long break")?,
            pomodoros_before_long_break: field(&self.cycle_input, "pomodoros per cycle")?,
            auto_start_breaks: base.auto_start_breaks,
            auto_start_work: base.auto_start_work,
        };
        settings.validate().map_err(|e| e.to_string())?;
        Ok(settings)
    }
}
