use quiz_core::model::OptionSlot;

/// One line of player input, interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCommand {
    /// A 1-based option number as typed, already converted to a slot.
    Select(OptionSlot),
    Advance,
    Restart,
    Quit,
    Unknown(String),
}

impl PlayerCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" | "n" | "next" => Self::Advance,
            "r" | "restart" => Self::Restart,
            "q" | "quit" | "exit" => Self::Quit,
            _ => match trimmed.parse::<usize>() {
                Ok(number) if number > 0 => Self::Select(OptionSlot::new(number - 1)),
                _ => Self::Unknown(trimmed.to_string()),
            },
        }
    }
}
