// Number helpers shared across the engine and its hosts.

pub mod brazilian_format {
    use anyhow::{anyhow, Result};
    use std::str::FromStr;

    /// Parses a form value that may be either a plain number ("12.5", as
    /// produced by numeric inputs) or a pt-BR formatted one ("1.234,56").
    ///
    /// A comma switches to pt-BR mode: dots are thousands separators and the
    /// comma is the decimal mark. Without a comma the dot stays a decimal
    /// point and only whitespace is removed. The longest numeric prefix is
    /// taken, so trailing garbage is ignored the way a browser `parseFloat`
    /// ignores it. Missing, empty or unparsable input yields `0.0`.
    pub fn parse_decimal(raw: Option<&str>) -> f64 {
        let Some(raw) = raw else { return 0.0 };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return 0.0;
        }

        leading_decimal(&normalize_field(trimmed)).unwrap_or(0.0)
    }

    /// Same reading rules as [`parse_decimal`], but the whole value must be
    /// numeric: `"1.234,5"`, `"1000.5"` and `"0,75"` parse, `"12abc"` and
    /// empty input are errors. Used for values typed on the command line.
    pub fn try_parse_field_decimal(s: &str) -> Result<f64> {
        let normalized = normalize_field(s.trim());
        match leading_decimal(&normalized) {
            Some(value) if numeric_prefix_len(&normalized) == normalized.len() => Ok(value),
            _ => Err(anyhow!("Failed to parse decimal '{}'", s)),
        }
    }

    fn normalize_field(trimmed: &str) -> String {
        if trimmed.contains(',') {
            trimmed.replace('.', "").replace(',', ".")
        } else {
            trimmed.chars().filter(|c| !c.is_whitespace()).collect()
        }
    }

    /// Strict pt-BR parse used for imported files: dots are always thousands
    /// separators, the comma is the decimal mark, and the whole field must be
    /// numeric.
    pub fn try_parse_decimal(s: &str) -> Result<f64> {
        let normalized = s.trim()
            .replace('.', "")  // Remove thousand separators
            .replace(',', "."); // Replace decimal separator

        let value = f64::from_str(&normalized)
            .map_err(|e| anyhow!("Failed to parse decimal '{}': {}", s, e))?;
        if !value.is_finite() {
            return Err(anyhow!("Failed to parse decimal '{}': not a finite number", s));
        }
        Ok(value)
    }

    /// Renders `value` with two decimals, `,` as decimal mark and `.` grouping
    /// thousands: `1234.5` becomes `"1.234,50"`.
    pub fn format_decimal(value: f64) -> String {
        if !value.is_finite() {
            return "0,00".to_string();
        }
        let fixed = format_fixed(value);
        let (sign, digits) = match fixed.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", fixed.as_str()),
        };
        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));

        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }
        format!("{}{},{}", sign, grouped, frac_part)
    }

    /// Two-decimal rendering with a plain dot, no grouping. Values exactly
    /// halfway between two hundredths round away from zero (`0.125` gives
    /// `"0.13"`); everything else rounds to the nearest hundredth of its exact
    /// binary value, so `1.005` stays `"1.00"`.
    pub fn format_fixed(value: f64) -> String {
        // Adding zero folds -0.0 into 0.0.
        let value = value + 0.0;
        if is_hundredths_tie(value) {
            let cents = (value.abs() * 100.0).round();
            let sign = if value < 0.0 { "-" } else { "" };
            return format!("{}{}.{:02}", sign, (cents / 100.0).trunc(), cents % 100.0);
        }
        format!("{:.2}", value)
    }

    // `{:.2}` breaks exact ties to even. The only binary values sitting
    // exactly halfway between two hundredths are odd multiples of 1/8.
    fn is_hundredths_tie(value: f64) -> bool {
        let eighths = value.abs() * 8.0;
        eighths.is_finite() && eighths.fract() == 0.0 && eighths % 2.0 == 1.0
    }

    // Longest prefix of `s` that reads as a decimal literal: optional sign,
    // digits with an optional fraction, optional exponent.
    fn leading_decimal(s: &str) -> Option<f64> {
        let end = numeric_prefix_len(s);
        if end == 0 {
            return None;
        }
        s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
    }

    // Byte length of that prefix, 0 when there is none.
    fn numeric_prefix_len(s: &str) -> usize {
        let bytes = s.as_bytes();
        let digits_from = |mut at: usize| {
            while at < bytes.len() && bytes[at].is_ascii_digit() {
                at += 1;
            }
            at
        };

        let mut end = if matches!(bytes.first(), Some(b'+' | b'-')) { 1 } else { 0 };
        let int_end = digits_from(end);
        let mut mantissa_digits = int_end - end;
        end = int_end;

        if bytes.get(end) == Some(&b'.') {
            let frac_end = digits_from(end + 1);
            let frac_digits = frac_end - (end + 1);
            if mantissa_digits + frac_digits > 0 {
                mantissa_digits += frac_digits;
                end = frac_end;
            }
        }
        if mantissa_digits == 0 {
            return 0;
        }

        if matches!(bytes.get(end), Some(b'e' | b'E')) {
            let mut exp_start = end + 1;
            if matches!(bytes.get(exp_start), Some(b'+' | b'-')) {
                exp_start += 1;
            }
            let exp_end = digits_from(exp_start);
            if exp_end > exp_start {
                end = exp_end;
            }
        }
        end
    }

}
