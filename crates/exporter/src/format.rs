use rust_decimal::Decimal;

/// Money with thousands separators and no decimals, e.g. `Rs.1,234,568`.
pub fn format_money(amount: Decimal, currency_label: &str) -> String {
    let rounded = amount.round_dp(0);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}{}{}", sign, currency_label, grouped)
}

/// A ratio to two decimal places, e.g. `2.00`.
pub fn format_ratio(ratio: Decimal) -> String {
    format!("{:.2}", ratio.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn money_groups_thousands_and_drops_decimals() {
        assert_eq!(format_money(dec!(1234567.89), "Rs."), "Rs.1,234,568");
        assert_eq!(format_money(dec!(999), "Rs."), "Rs.999");
        assert_eq!(format_money(dec!(1000), ""), "1,000");
        assert_eq!(format_money(Decimal::ZERO, "Rs."), "Rs.0");
        assert_eq!(format_money(dec!(-2500), "Rs."), "-Rs.2,500");
    }

    #[test]
    fn ratios_have_two_decimals() {
        assert_eq!(format_ratio(dec!(2)), "2.00");
        assert_eq!(format_ratio(dec!(0.625)), "0.62");
        assert_eq!(format_ratio(dec!(-1)), "-1.00");
        assert_eq!(format_ratio(dec!(3.756)), "3.76");
    }
}
