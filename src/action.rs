//! The decision type that crosses the agent boundary, and parsers for
//! free-text responses that produce it.
//!
//! Everything downstream of this module works with [`Action`] only. Text is
//! validated once here; anything that cannot be understood becomes a fold (for
//! decisions) or an empty discard (for the draw).

use std::fmt;
use std::str::FromStr;

/// A betting decision. `Raise` carries the new total bet for the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Fold,
    /// Match the current bet; a check when nothing is owed.
    Call,
    Raise { amount: u64 },
}

impl Action {
    pub const fn raise_to(amount: u64) -> Self {
        Action::Raise { amount }
    }

    pub fn label(self) -> &'static str {
        match self {
            Action::Fold => "fold",
            Action::Call => "call",
            Action::Raise { .. } => "raise",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Raise { amount } => write!(f, "raise {amount}"),
            other => f.write_str(other.label()),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionParseError {
    #[error("empty action")]
    Empty,
    #[error("unknown action: '{0}'")]
    UnknownKind(String),
    #[error("invalid raise amount: '{0}'")]
    Amount(String),
}

/// Parses `fold`, `call`, `check` and `raise [amount]`.
///
/// The amount is the leading integer of the next word: a `$` prefix and `,`
/// separators are skipped and anything from the first other character on
/// (such as a decimal point) is ignored. A missing amount parses as zero, a
/// negative one clamps to zero and one past `u64::MAX` saturates; the betting
/// engine then lifts or caps it to a legal raise.
///
/// ```
/// use draw_poker::action::Action;
///
/// assert_eq!("raise 200".parse::<Action>().unwrap(), Action::raise_to(200));
/// assert_eq!("Check".parse::<Action>().unwrap(), Action::Call);
/// assert_eq!("raise -5".parse::<Action>().unwrap(), Action::raise_to(0));
/// assert_eq!("raise 100.50".parse::<Action>().unwrap(), Action::raise_to(100));
/// assert_eq!("raise $1,000".parse::<Action>().unwrap(), Action::raise_to(1000));
/// ```
impl FromStr for Action {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let kind = words.next().ok_or(ActionParseError::Empty)?;
        let kind = kind.trim_matches(|c: char| !c.is_ascii_alphabetic()).to_ascii_lowercase();
        match kind.as_str() {
            "fold" => Ok(Action::Fold),
            "call" | "check" => Ok(Action::Call),
            "raise" | "bet" => {
                let Some(raw) = words.next() else {
                    return Ok(Action::raise_to(0));
                };
                parse_amount(raw).map(Action::raise_to)
            }
            _ => Err(ActionParseError::UnknownKind(kind)),
        }
    }
}

fn parse_amount(raw: &str) -> Result<u64, ActionParseError> {
    let body = raw.trim_start_matches('$');
    let (negative, body) = match body.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start_matches('$')),
        None => (false, body),
    };
    let digits: String = body
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ',')
        .filter(char::is_ascii_digit)
        .collect();
    if digits.is_empty() {
        return Err(ActionParseError::Amount(raw.to_string()));
    }
    if negative {
        return Ok(0);
    }
    // only digits remain, so the sole failure is overflow
    Ok(digits.parse().unwrap_or(u64::MAX))
}

fn labelled_line<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    text.lines().find_map(|line| {
        let line = line.trim();
        let head = line.get(..label.len())?;
        head.eq_ignore_ascii_case(label).then(|| line[label.len()..].trim())
    })
}

/// Text after `label` anywhere in a line, matched without case. `label` is
/// upper case.
fn inline_label<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    text.lines().find_map(|line| {
        let at = line.to_ascii_uppercase().find(label)?;
        Some(line[at + label.len()..].trim())
    })
}

/// Extract the decision from a response containing a `DECISION:` line.
///
/// Falls back to the whole first line when no label is present and to
/// [`Action::Fold`] when nothing parses.
///
/// ```
/// use draw_poker::action::{parse_decision, Action};
///
/// let text = "REASONING: strong pair\nDECISION: raise 120";
/// assert_eq!(parse_decision(text), Action::raise_to(120));
/// assert_eq!(parse_decision("I think I'll dance"), Action::Fold);
/// ```
pub fn parse_decision(response: &str) -> Action {
    let candidate = labelled_line(response, "DECISION:")
        .or_else(|| response.lines().map(str::trim).find(|l| !l.is_empty()));
    match candidate.map(Action::from_str) {
        Some(Ok(action)) => action,
        Some(Err(e)) => {
            log::debug!("unparseable decision, folding: {e}");
            Action::Fold
        }
        None => Action::Fold,
    }
}

/// Text after a `REASONING:` label, if any.
///
/// The label may start its own line or follow the decision on the same one.
///
/// ```
/// use draw_poker::action::parse_reasoning;
///
/// let text = "DECISION: call, REASONING: cheap to see a draw";
/// assert_eq!(parse_reasoning(text).as_deref(), Some("cheap to see a draw"));
/// ```
pub fn parse_reasoning(response: &str) -> Option<String> {
    let text = inline_label(response, "REASONING:")?;
    let end = text.to_ascii_uppercase().find("DECISION:").unwrap_or(text.len());
    Some(text[..end].trim().trim_end_matches(',').trim_end().to_string())
}

/// Extract discard positions from a `DISCARD:` line such as `[0, 2]` or `none`.
///
/// Any malformed entry discards nothing. Range checking is the draw engine's job.
///
/// ```
/// use draw_poker::action::parse_discard;
///
/// assert_eq!(parse_discard("DISCARD: [0, 3]"), vec![0, 3]);
/// assert!(parse_discard("DISCARD: none").is_empty());
/// assert!(parse_discard("DISCARD: [x]").is_empty());
/// ```
pub fn parse_discard(response: &str) -> Vec<usize> {
    let Some(body) = labelled_line(response, "DISCARD:") else {
        return Vec::new();
    };
    let body = body.trim_start_matches('[').trim_end_matches(']').trim();
    if body.is_empty() || body.eq_ignore_ascii_case("none") {
        return Vec::new();
    }
    let parsed: Result<Vec<usize>, _> =
        body.split(',').map(str::trim).filter(|t| !t.is_empty()).map(str::parse).collect();
    parsed.unwrap_or_else(|_| {
        log::debug!("unparseable discard list '{body}', keeping hand");
        Vec::new()
    })
}
