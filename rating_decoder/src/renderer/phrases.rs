//! English phrases for operators, rounding codes and jump targets

use crate::ast::JumpTarget;

pub fn operator_phrase(operator: &str) -> String {
    let phrase = match operator.trim() {
        "=" => "equals",
        ">" => "greater than",
        "<" => "less than",
        "<=" => "less than or equal to",
        ">=" => "greater than or equal to",
        "!=" | "<>" => "not equal to",
        "@" => "bitwise AND",
        "^" => "bitwise OR",
        "+" => "plus",
        "-" => "minus",
        "*" => "times",
        "/" => "divided by",
        "%" => "modulo",
        other => return other.to_string(),
    };
    phrase.to_string()
}

fn places(count: &str) -> String {
    if count == "1" {
        "1 place".to_string()
    } else {
        format!("{} places", count)
    }
}

fn all_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Phrase for a rounding code given without its `!` marker
pub fn rounding_phrase(code: &str) -> String {
    let code = code.trim().trim_start_matches('!');
    match code {
        "RN" => return "round to the nearest whole number".to_string(),
        "RS" => return "round to significant digits".to_string(),
        "NR" => return "no rounding".to_string(),
        "RP" => return "round up".to_string(),
        "RM" => return "round down".to_string(),
        _ => {}
    }

    if let Some(n) = code.strip_prefix("RP").filter(|n| all_digits(n)) {
        format!("round up {}", places(n))
    } else if let Some(n) = code.strip_prefix("RM").filter(|n| all_digits(n)) {
        format!("round down {}", places(n))
    } else if let Some(n) = code.strip_prefix('R').filter(|n| all_digits(n)) {
        format!("round to {}", places(n))
    } else {
        format!("apply rounding {}", code)
    }
}

pub fn jump_phrase(target: JumpTarget) -> String {
    match target {
        JumpTarget::Step(step) => format!("go to Step {}", step),
        JumpTarget::ExitLoop => "exit the loop".to_string(),
        JumpTarget::Done => "finish".to_string(),
        JumpTarget::NextStep => "continue with the next step".to_string(),
        JumpTarget::NoBranch => "do nothing".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_phrases() {
        assert_eq!(operator_phrase("<>"), "not equal to");
        assert_eq!(operator_phrase("!="), "not equal to");
        assert_eq!(operator_phrase("@"), "bitwise AND");
        assert_eq!(operator_phrase(">="), "greater than or equal to");
        assert_eq!(operator_phrase("~~"), "~~");
    }

    #[test]
    fn test_rounding_phrases() {
        assert_eq!(rounding_phrase("RN"), "round to the nearest whole number");
        assert_eq!(rounding_phrase("RP2"), "round up 2 places");
        assert_eq!(rounding_phrase("RM1"), "round down 1 place");
        assert_eq!(rounding_phrase("R2"), "round to 2 places");
        assert_eq!(rounding_phrase("NR"), "no rounding");
        assert_eq!(rounding_phrase("RS"), "round to significant digits");
        assert_eq!(rounding_phrase("!RN"), "round to the nearest whole number");
        assert_eq!(rounding_phrase("QQ"), "apply rounding QQ");
    }

    #[test]
    fn test_jump_phrases() {
        assert_eq!(jump_phrase(JumpTarget::Step(5)), "go to Step 5");
        assert_eq!(jump_phrase(JumpTarget::ExitLoop), "exit the loop");
        assert_eq!(jump_phrase(JumpTarget::Done), "finish");
        assert_eq!(jump_phrase(JumpTarget::NextStep), "continue with the next step");
    }
}
