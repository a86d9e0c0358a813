use crate::entity::{Currency, UserIntent};

/// Register all shell commands with their descriptions
pub fn register_commands() -> Vec<(&'static str, &'static str)> {
    vec![
        ("amount <value>", "set the amount to spend, e.g. amount 1000.0"),
        ("currency <usdt|usdc>", "choose the stablecoin to pay with"),
        ("approve", "approve the sale contract to spend the amount"),
        ("buy", "buy AXXIS with the approved amount"),
        ("refresh", "reload balances and allowances"),
        ("status", "show the current state"),
        ("help", "display this help message"),
        ("quit", "leave the presale"),
    ]
}

/// Parse one line of shell input
pub fn parse_intent(line: &str) -> Option<UserIntent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (command, argument) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let intent = match command.to_lowercase().as_str() {
        // The raw text goes to the session as typed; validation happens there
        "amount" => UserIntent::SetAmount(argument.to_string()),
        "currency" => match argument.parse::<Currency>() {
            Ok(currency) => UserIntent::SelectCurrency(currency),
            Err(_) => UserIntent::Unknown(line.to_string()),
        },
        "usdt" => UserIntent::SelectCurrency(Currency::Usdt),
        "usdc" => UserIntent::SelectCurrency(Currency::Usdc),
        "approve" => UserIntent::Approve,
        "buy" => UserIntent::Buy,
        "refresh" => UserIntent::Refresh,
        "status" => UserIntent::Status,
        "help" | "?" => UserIntent::Help,
        "quit" | "exit" => UserIntent::Quit,
        _ => UserIntent::Unknown(line.to_string()),
    };

    Some(intent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_amount_verbatim() {
        assert_eq!(
            parse_intent("amount 1000.0"),
            Some(UserIntent::SetAmount("1000.0".to_string()))
        );
        assert_eq!(
            parse_intent("amount abc"),
            Some(UserIntent::SetAmount("abc".to_string()))
        );
        assert_eq!(parse_intent("amount"), Some(UserIntent::SetAmount(String::new())));
    }

    #[test]
    fn parses_currency_selection() {
        assert_eq!(
            parse_intent("currency USDT"),
            Some(UserIntent::SelectCurrency(Currency::Usdt))
        );
        assert_eq!(parse_intent("usdc"), Some(UserIntent::SelectCurrency(Currency::Usdc)));
        assert_eq!(
            parse_intent("currency dai"),
            Some(UserIntent::Unknown("currency dai".to_string()))
        );
    }

    #[test]
    fn parses_actions() {
        assert_eq!(parse_intent(" Approve "), Some(UserIntent::Approve));
        assert_eq!(parse_intent("buy"), Some(UserIntent::Buy));
        assert_eq!(parse_intent("exit"), Some(UserIntent::Quit));
        assert_eq!(parse_intent("   "), None);
        assert_eq!(parse_intent("sell"), Some(UserIntent::Unknown("sell".to_string())));
    }
}
