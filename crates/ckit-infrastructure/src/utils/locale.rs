//! Accept-Language negotiation

/// Pick the preferred locale from an `Accept-Language` style header
///
/// Entries look like `locale[;q=weight]`. A weight is read from its leading
/// number, so `0.5abc` weighs 0.5. Missing or unparsable weights count as 1,
/// except for `*` which counts as 0. The heaviest entry wins, ties keep
/// header order. A winning `*`, or an empty header, yields `default_lang`.
///
/// An explicit `q=0` stays 0 and marks the locale as not acceptable, as
/// RFC 9110 reads it, instead of being lifted to the default weight.
pub fn get_lang_or_default(input: Option<&str>, default_lang: &str) -> String {
    let Some(input) = input.filter(|s| !s.trim().is_empty()) else {
        return default_lang.to_string();
    };

    let mut entries: Vec<(&str, f64)> = input
        .split(',')
        .filter_map(|part| {
            let mut pieces = part.trim().splitn(2, ";q=");
            let locale = pieces.next()?.trim();
            if locale.is_empty() {
                return None;
            }
            let default_q = if locale == "*" { 0.0 } else { 1.0 };
            let q = pieces
                .next()
                .and_then(leading_weight)
                .unwrap_or(default_q);
            Some((locale, q))
        })
        .collect();

    entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    match entries.first() {
        Some((locale, _)) if *locale != "*" => (*locale).to_string(),
        _ => default_lang.to_string(),
    }
}

/// Parse the longest numeric prefix of a weight
fn leading_weight(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let end = raw
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (c == '.' && !raw[..i].contains('.'))))
        .map_or(raw.len(), |(i, _)| i);
    raw[..end].parse::<f64>().ok().filter(|q| q.is_finite())
}
