use rust_decimal::{Decimal, RoundingStrategy};

fn format_with_commas(digits: &str) -> String {
    let mut out = Vec::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.into_iter().rev().collect()
}

/// `1234.5` with symbol `$` becomes `$ 1,234.50`; negatives get a leading `-`.
pub fn format_currency(amount: Decimal, symbol: &str) -> String {
    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{} {}", sign, symbol, format_plain(amount.abs()))
}

/// Two decimal places with thousands separators and no symbol.
pub fn format_plain(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}.{}", sign, format_with_commas(whole), fraction)
}

/// Whole-number percentage for labels and bar widths.
pub fn format_percent(pct: Decimal) -> String {
    format!(
        "{}%",
        pct.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .normalize()
    )
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{format_currency, format_percent, format_plain};

    fn dec(raw: &str) -> Decimal {
        raw.parse().unwrap()
    }

    #[test]
    fn groups_thousands_and_pads_cents() {
        assert_eq!(format_currency(dec("1234.5"), "$"), "$ 1,234.50");
        assert_eq!(format_currency(dec("1000000"), "৳"), "৳ 1,000,000.00");
        assert_eq!(format_currency(dec("12"), "€"), "€ 12.00");
    }

    #[test]
    fn negatives_keep_their_sign() {
        assert_eq!(format_currency(dec("-2500.125"), "$"), "-$ 2,500.13");
        assert_eq!(format_plain(dec("-0.5")), "-0.50");
        assert_eq!(format_currency(dec("-0.00"), "$"), "$ 0.00");
    }

    #[test]
    fn percent_is_rounded_to_whole_numbers() {
        assert_eq!(format_percent(dec("40.0000")), "40%");
        assert_eq!(format_percent(dec("33.3333")), "33%");
        assert_eq!(format_percent(dec("66.5")), "67%");
    }
}
